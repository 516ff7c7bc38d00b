use serde::Serialize;

use crate::geometry::TrackBounds;
use crate::options::ViewOptions;
use crate::track::{Track, TrackPoint};

/// A vertex of the 3D route line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneVertex {
    /// x (east), y (up), z (north).
    pub position: [f64; 3],
    /// RGB in 0..1, blue at the lowest point through green to red.
    pub color: [f64; 3],
}

/// Route line fitted into a square scene, plus start and finish markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneGeometry {
    pub vertices: Vec<SceneVertex>,
    pub start: [f64; 3],
    pub finish: [f64; 3],
}

/// Project a track into scene coordinates. `None` below two points.
pub fn project_scene(track: &Track, opts: &ViewOptions) -> Option<SceneGeometry> {
    if track.len() < 2 {
        return None;
    }
    let bounds = track.bounds()?;
    let projection = Projection {
        bounds,
        extent: opts.scene_extent,
        elevation_scale: opts.elevation_scale,
    };

    let vertices: Vec<SceneVertex> = track
        .iter()
        .map(|p| SceneVertex {
            position: projection.position(p),
            color: altitude_color(projection.altitude_ratio(p)),
        })
        .collect();
    let start = vertices.first()?.position;
    let finish = vertices.last()?.position;

    Some(SceneGeometry {
        vertices,
        start,
        finish,
    })
}

struct Projection {
    bounds: TrackBounds,
    extent: f64,
    elevation_scale: f64,
}

impl Projection {
    fn position(&self, p: &TrackPoint) -> [f64; 3] {
        let b = &self.bounds;
        let half = self.extent / 2.0;
        let x = normalize(p.longitude(), b.min_longitude, b.max_longitude, 0.5) * self.extent - half;
        let z = normalize(p.latitude(), b.min_latitude, b.max_latitude, 0.5) * self.extent - half;
        let y = self.altitude_ratio(p) * self.elevation_scale;
        [x, y, z]
    }

    fn altitude_ratio(&self, p: &TrackPoint) -> f64 {
        normalize(p.elevation(), self.bounds.min_elevation, self.bounds.max_elevation, 0.0)
    }
}

/// Map `value` from `min..max` to `0..1`; a zero span maps to `flat`.
fn normalize(value: f64, min: f64, max: f64, flat: f64) -> f64 {
    let span = max - min;
    if span > 0.0 { (value - min) / span } else { flat }
}

fn altitude_color(ratio: f64) -> [f64; 3] {
    if ratio < 0.5 {
        [0.0, ratio * 2.0, 1.0 - ratio * 2.0]
    } else {
        let r = (ratio - 0.5) * 2.0;
        [r, 1.0 - r, 0.0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerRole {
    Start,
    Checkpoint,
    Finish,
}

/// A marker shown on the map along the route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlPoint {
    /// Position of the point in the track.
    pub index: usize,
    pub role: MarkerRole,
    pub point: TrackPoint,
    /// Elevation in metres, rounded half up.
    pub altitude: f64,
}

/// Pick the first, the last and roughly `divisions` evenly spaced points.
pub fn control_points(track: &Track, divisions: usize) -> Vec<ControlPoint> {
    let len = track.len();
    let step = (len / divisions.max(1)).max(1);

    let picked: Vec<(usize, &TrackPoint)> = track
        .iter()
        .enumerate()
        .filter(|(i, _)| *i == 0 || *i == len - 1 || i % step == 0)
        .collect();

    let last = picked.len().saturating_sub(1);
    picked
        .into_iter()
        .enumerate()
        .map(|(n, (index, point))| ControlPoint {
            index,
            role: match n {
                0 => MarkerRole::Start,
                n if n == last => MarkerRole::Finish,
                _ => MarkerRole::Checkpoint,
            },
            point: *point,
            altitude: (point.elevation() + 0.5).floor(),
        })
        .collect()
}
