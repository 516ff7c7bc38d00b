use serde::Serialize;

use crate::track::{Track, TrackPoint};

/// Mean Earth radius used for route distances, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two points in metres.
pub fn haversine_distance(a: &TrackPoint, b: &TrackPoint) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude() - a.longitude()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Bounding box of a track, elevation included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
}

impl TrackBounds {
    /// Midpoint as (latitude, longitude).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_latitude + self.max_latitude) / 2.0,
            (self.min_longitude + self.max_longitude) / 2.0,
        )
    }

    fn include(&mut self, p: &TrackPoint) {
        self.min_latitude = self.min_latitude.min(p.latitude());
        self.max_latitude = self.max_latitude.max(p.latitude());
        self.min_longitude = self.min_longitude.min(p.longitude());
        self.max_longitude = self.max_longitude.max(p.longitude());
        self.min_elevation = self.min_elevation.min(p.elevation());
        self.max_elevation = self.max_elevation.max(p.elevation());
    }

    fn of(p: &TrackPoint) -> Self {
        Self {
            min_latitude: p.latitude(),
            max_latitude: p.latitude(),
            min_longitude: p.longitude(),
            max_longitude: p.longitude(),
            min_elevation: p.elevation(),
            max_elevation: p.elevation(),
        }
    }
}

impl Track {
    /// `None` for an empty track.
    pub fn bounds(&self) -> Option<TrackBounds> {
        let (first, rest) = self.points().split_first()?;
        let mut bounds = TrackBounds::of(first);
        for p in rest {
            bounds.include(p);
        }
        Some(bounds)
    }
}

/// Cumulative distance per point and slope per segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlopeProfile {
    /// Metres from the start, one entry per point.
    pub distances: Vec<f64>,
    /// Percent grade, one entry per segment.
    pub slopes: Vec<f64>,
}

pub fn slope_profile(track: &Track) -> SlopeProfile {
    let mut profile = SlopeProfile {
        distances: Vec::with_capacity(track.len()),
        slopes: Vec::with_capacity(track.len().saturating_sub(1)),
    };
    if track.is_empty() {
        return profile;
    }

    let mut total = 0.0;
    profile.distances.push(total);
    for pair in track.points().windows(2) {
        let dist = haversine_distance(&pair[0], &pair[1]);
        let rise = pair[1].elevation() - pair[0].elevation();
        total += dist;
        profile.distances.push(total);
        profile.slopes.push(if dist > 0.0 { rise / dist * 100.0 } else { 0.0 });
    }
    profile
}

/// Route metadata sent along with an uploaded route file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub point_count: usize,
    /// Metres.
    pub distance: f64,
    pub elevation_gain: f64,
    pub elevation_loss: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
}

pub fn summarize(track: &Track) -> TrackSummary {
    let Some(bounds) = track.bounds() else {
        return TrackSummary::default();
    };

    let mut summary = TrackSummary {
        point_count: track.len(),
        min_elevation: bounds.min_elevation,
        max_elevation: bounds.max_elevation,
        ..TrackSummary::default()
    };
    for pair in track.points().windows(2) {
        summary.distance += haversine_distance(&pair[0], &pair[1]);
        let rise = pair[1].elevation() - pair[0].elevation();
        if rise > 0.0 {
            summary.elevation_gain += rise;
        } else {
            summary.elevation_loss -= rise;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64, ele: f64) -> TrackPoint {
        TrackPoint::new(lat, lon, ele).unwrap()
    }

    #[test]
    fn test_haversine_distance() {
        // One degree of longitude at the equator.
        let d = haversine_distance(&pt(0.0, 0.0, 0.0), &pt(0.0, 1.0, 0.0));
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
        assert_eq!(haversine_distance(&pt(45.0, 6.0, 0.0), &pt(45.0, 6.0, 100.0)), 0.0);
    }

    #[test]
    fn test_bounds() {
        let track = Track::new(vec![pt(45.0, 6.0, 1000.0), pt(45.2, 5.8, 1200.0), pt(44.9, 6.1, 900.0)]);
        let b = track.bounds().unwrap();
        assert_eq!(b.min_latitude, 44.9);
        assert_eq!(b.max_latitude, 45.2);
        assert_eq!(b.min_longitude, 5.8);
        assert_eq!(b.max_longitude, 6.1);
        assert_eq!(b.min_elevation, 900.0);
        assert_eq!(b.max_elevation, 1200.0);
        let (lat, lon) = b.center();
        assert!((lat - 45.05).abs() < 1e-9);
        assert!((lon - 5.95).abs() < 1e-9);

        assert!(Track::default().bounds().is_none());
    }

    #[test]
    fn test_slope_profile() {
        let track = Track::new(vec![pt(0.0, 0.0, 0.0), pt(0.0, 0.001, 11.0), pt(0.0, 0.001, 20.0)]);
        let profile = slope_profile(&track);
        assert_eq!(profile.distances.len(), 3);
        assert_eq!(profile.slopes.len(), 2);
        assert_eq!(profile.distances[0], 0.0);
        assert!((profile.distances[1] - 111.19).abs() < 0.01);
        assert!((profile.slopes[0] - 9.89).abs() < 0.01);
        // Zero-length segment.
        assert_eq!(profile.slopes[1], 0.0);
        assert_eq!(profile.distances[2], profile.distances[1]);
    }

    #[test]
    fn test_slope_profile_empty() {
        assert_eq!(slope_profile(&Track::default()), SlopeProfile::default());
    }

    #[test]
    fn test_summary() {
        let track = Track::new(vec![
            pt(45.0, 6.0, 1000.0),
            pt(45.001, 6.0, 1005.0),
            pt(45.002, 6.0, 995.0),
            pt(45.003, 6.0, 1010.0),
        ]);
        let s = summarize(&track);
        assert_eq!(s.point_count, 4);
        assert!((s.distance - 333.58).abs() < 0.1, "got {}", s.distance);
        assert_eq!(s.elevation_gain, 20.0);
        assert_eq!(s.elevation_loss, 10.0);
        assert_eq!(s.min_elevation, 995.0);
        assert_eq!(s.max_elevation, 1010.0);
    }

    #[test]
    fn test_summary_empty_track() {
        assert_eq!(summarize(&Track::default()), TrackSummary::default());
    }
}
