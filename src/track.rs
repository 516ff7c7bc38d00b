use serde::Serialize;

use crate::error::PointDefect;

/// A single GPS sample along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    #[serde(rename = "lat")]
    latitude: f64,
    #[serde(rename = "lon")]
    longitude: f64,
    #[serde(rename = "ele")]
    elevation: f64,
}

impl TrackPoint {
    /// Build a point, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Result<Self, PointDefect> {
        check_coordinate("lat", latitude, 90.0)?;
        check_coordinate("lon", longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
            elevation: if elevation.is_finite() { elevation } else { 0.0 },
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }
}

fn check_coordinate(attribute: &'static str, value: f64, limit: f64) -> Result<(), PointDefect> {
    if !value.is_finite() {
        return Err(PointDefect::InvalidAttribute {
            attribute,
            value: value.to_string(),
        });
    }
    if value.abs() > limit {
        return Err(PointDefect::OutOfRange { attribute, value });
    }
    Ok(())
}

/// Ordered track points, in the order they appear in the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Track {
    points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TrackPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrackPoint> {
        self.points.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackPoint> {
        self.points.iter()
    }

    pub(crate) fn push(&mut self, point: TrackPoint) {
        self.points.push(point);
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TrackPoint;
    type IntoIter = std::slice::Iter<'a, TrackPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl From<Track> for Vec<TrackPoint> {
    fn from(track: Track) -> Self {
        track.points
    }
}
