use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::geometry::{summarize, TrackSummary};
use crate::options::ViewOptions;
use crate::scene::{control_points, ControlPoint};
use crate::track::{Track, TrackPoint};

/// Convert a track to a GeoJSON FeatureCollection for the tile maps.
///
/// The route comes first (a LineString, or a Point for a single-point
/// track), followed by one Point feature per control marker.
pub fn to_feature_collection(track: &Track, opts: &ViewOptions) -> FeatureCollection {
    let mut features = Vec::new();

    if let Some(route) = route_feature(track) {
        features.push(route);
    }
    features.extend(
        control_points(track, opts.control_point_divisions)
            .iter()
            .map(control_point_feature),
    );

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn route_feature(track: &Track) -> Option<Feature> {
    let value = match track.points() {
        [] => return None,
        [single] => Value::Point(point_coords(single)),
        points => Value::LineString(points.iter().map(point_coords).collect()),
    };

    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String("route".to_string()));
    insert_summary(&mut props, &summarize(track));

    Some(feature(value, props))
}

fn control_point_feature(cp: &ControlPoint) -> Feature {
    let mut props = Map::new();
    props.insert(
        "kind".to_string(),
        JsonValue::String("controlPoint".to_string()),
    );
    props.insert(
        "role".to_string(),
        serde_json::to_value(cp.role).unwrap_or(JsonValue::Null),
    );
    props.insert("index".to_string(), JsonValue::from(cp.index));
    props.insert("altitude".to_string(), JsonValue::from(cp.altitude));

    feature(Value::Point(point_coords(&cp.point)), props)
}

fn insert_summary(props: &mut Map<String, JsonValue>, summary: &TrackSummary) {
    if let Ok(JsonValue::Object(fields)) = serde_json::to_value(summary) {
        props.extend(fields);
    }
}

fn feature(value: Value, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// GeoJSON positions are longitude first.
fn point_coords(pt: &TrackPoint) -> Vec<f64> {
    vec![pt.longitude(), pt.latitude(), pt.elevation()]
}
