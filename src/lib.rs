pub mod converter;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod options;
pub mod parser;
pub mod scene;
pub mod source;
pub mod track;

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::options::{ParseOptions, ViewOptions};

pub use crate::error::{ParseError, PointDefect, Result, TrackError};
pub use crate::parser::{parse, parse_with_options};
pub use crate::source::{TrackSource, parse_from_source, parse_from_source_with_options};
pub use crate::track::{Track, TrackPoint};

/// Parse a GPX string into an array of `{ lat, lon, ele }` objects.
#[wasm_bindgen(js_name = parseGpx)]
pub fn parse_gpx(document: &str, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ParseOptions = js_options(options)?;
    let track = parser::parse_with_options(document, &opts)?;
    to_js(&track)
}

/// Read a `File`/`Blob` and parse it, resolving to the same shape as `parseGpx`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = parseGpxFile)]
pub async fn parse_gpx_file(
    file: web_sys::Blob,
    options: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts: ParseOptions = js_options(options)?;
    let track =
        source::parse_from_source_with_options(source::BlobSource::new(file), &opts).await?;
    to_js(&track)
}

/// Route metadata (distance, elevation gain/loss, min/max elevation).
#[wasm_bindgen(js_name = summarizeGpx)]
pub fn summarize_gpx(document: &str, options: JsValue) -> std::result::Result<JsValue, JsValue> {
    let opts: ParseOptions = js_options(options)?;
    let track = parser::parse_with_options(document, &opts)?;
    to_js(&geometry::summarize(&track))
}

/// 3D line vertices and start/finish markers, or `null` below two points.
#[wasm_bindgen(js_name = gpxToSceneGeometry)]
pub fn gpx_to_scene_geometry(
    document: &str,
    view_options: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    let opts: ViewOptions = js_options(view_options)?;
    let track = parser::parse(document)?;
    match scene::project_scene(&track, &opts) {
        Some(geometry) => to_js(&geometry),
        None => Ok(JsValue::NULL),
    }
}

/// Route line and control markers as a GeoJSON string.
#[wasm_bindgen(js_name = gpxToGeoJsonString)]
pub fn gpx_to_geojson_string(
    document: &str,
    view_options: JsValue,
) -> std::result::Result<String, JsValue> {
    let opts: ViewOptions = js_options(view_options)?;
    let track = parser::parse(document)?;
    let fc = converter::to_feature_collection(&track, &opts);
    serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = isGpxFileName)]
pub fn is_gpx_file_name(name: &str) -> bool {
    source::is_track_file_name(name)
}

#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    logging::init_logging(level.as_deref());
}

fn js_options<T: DeserializeOwned + Default>(options: JsValue) -> std::result::Result<T, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(T::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn to_js<T: Serialize>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
