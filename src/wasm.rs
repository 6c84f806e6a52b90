use wasm_bindgen::prelude::*;

use crate::config::RoadGraphConfig;
use crate::geojson_io::process_geojson_str;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Builds and resolves a road graph from a GeoJSON FeatureCollection of road LineStrings.
/// Returns the trimmed elements and junction caps as a GeoJSON string.
#[wasm_bindgen]
pub fn build_road_graph(geojson_str: &str) -> Result<String, JsValue> {
    process_geojson_str(geojson_str, RoadGraphConfig::default())
        .map_err(|e| JsValue::from_str(&format!("Road graph failed: {}", e)))
}

/// Same as [`build_road_graph`] with an explicit tolerance and minimum offset, returning a
/// parsed JS object instead of a string.
#[wasm_bindgen]
pub fn build_road_graph_with(
    geojson_str: &str,
    tolerance: f64,
    min_offset: f64,
) -> Result<JsValue, JsValue> {
    let config = RoadGraphConfig::new()
        .with_tolerance(tolerance)
        .with_offset(min_offset);
    let out = process_geojson_str(geojson_str, config)
        .map_err(|e| JsValue::from_str(&format!("Road graph failed: {}", e)))?;
    let value: serde_json::Value = serde_json::from_str(&out)
        .map_err(|e| JsValue::from_str(&format!("Invalid output: {}", e)))?;
    serde_wasm_bindgen::to_value(&value).map_err(JsValue::from)
}
