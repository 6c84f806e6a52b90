//! GeoJSON adapter: LineString features in, trimmed elements and junction caps out.
//!
//! Input features carry `type` (`car`, `bike` or `pedestrian`), optional `width` (default 0,
//! meaning "use the minimum offset") and `lanes` (default 1). A third coordinate, when
//! present, is the elevation.

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};
use std::str::FromStr;

use crate::config::RoadGraphConfig;
use crate::error::{Result, RoadGraphError};
use crate::graph::{RoadElement, RoadGraph, RoadPoint, RoadType};
use crate::tiling::build_road_graph;

pub fn elements_from_geojson(geojson: &GeoJson) -> Result<Vec<RoadElement>> {
    let mut elements = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for (i, feature) in fc.features.iter().enumerate() {
                if let Some(el) = element_from_feature(feature, i as u64)? {
                    elements.push(el);
                }
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(el) = element_from_feature(feature, 0)? {
                elements.push(el);
            }
        }
        GeoJson::Geometry(_) => {
            return Err(RoadGraphError::InvalidArgument(
                "bare geometries carry no road type; wrap them in features".to_string(),
            ));
        }
    }
    Ok(elements)
}

/// Non-LineString features are skipped.
fn element_from_feature(feature: &Feature, fallback_id: u64) -> Result<Option<RoadElement>> {
    let Some(geometry) = &feature.geometry else {
        return Ok(None);
    };
    let Value::LineString(positions) = &geometry.value else {
        return Ok(None);
    };

    let id = match &feature.id {
        Some(Id::Number(n)) => n.as_u64(),
        _ => None,
    }
    .or_else(|| feature.property("id").and_then(JsonValue::as_u64))
    .unwrap_or(fallback_id);

    let road_type = feature
        .property("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| {
            RoadGraphError::InvalidArgument(format!("feature {} has no road type", id))
        })
        .and_then(|s| s.parse::<RoadType>())?;
    let width = feature
        .property("width")
        .and_then(JsonValue::as_f64)
        .unwrap_or(0.0);
    let lanes = feature
        .property("lanes")
        .and_then(JsonValue::as_u64)
        .map_or(Ok(1), u32::try_from)
        .map_err(|_| {
            RoadGraphError::InvalidArgument(format!("feature {} has too many lanes", id))
        })?;

    let mut points = Vec::with_capacity(positions.len());
    for pos in positions {
        let point = match pos.as_slice() {
            [x, y] => RoadPoint::new(*x, *y),
            [x, y, z, ..] => RoadPoint::with_elevation(*x, *y, *z),
            _ => {
                return Err(RoadGraphError::Geojson(format!(
                    "feature {} has a position with {} coordinates",
                    id,
                    pos.len()
                )))
            }
        };
        points.push(point);
    }

    Ok(Some(RoadElement::new(id, road_type, width, lanes, points)))
}

fn position(p: &RoadPoint) -> Vec<f64> {
    vec![p.x, p.y, p.elevation]
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Elements as LineStrings, then resolved junction caps as Polygons.
pub fn graph_to_geojson(graph: &RoadGraph) -> FeatureCollection {
    let mut features = Vec::with_capacity(graph.elements().len() + graph.junctions().len());

    for el in graph.elements() {
        let mut props = JsonObject::new();
        props.insert("id".to_string(), JsonValue::from(el.id.to_string()));
        props.insert("type".to_string(), JsonValue::from(el.road_type.to_string()));
        props.insert("width".to_string(), JsonValue::from(el.width));
        props.insert("lanes".to_string(), JsonValue::from(el.lanes));
        props.insert("start".to_string(), el.start.map_or(JsonValue::Null, JsonValue::from));
        props.insert("end".to_string(), el.end.map_or(JsonValue::Null, JsonValue::from));
        let line = el.points.iter().map(position).collect();
        features.push(feature(Value::LineString(line), props));
    }

    for (j, junction) in graph.junctions().iter().enumerate() {
        if !junction.is_resolved() {
            continue;
        }
        let mut props = JsonObject::new();
        props.insert("junction".to_string(), JsonValue::from(j));
        props.insert("type".to_string(), JsonValue::from(junction.road_type.to_string()));
        props.insert(
            "connections".to_string(),
            JsonValue::from(junction.connections.len()),
        );
        let mut ring: Vec<Vec<f64>> = junction.polygon.iter().map(position).collect();
        ring.push(position(&junction.polygon[0]));
        features.push(feature(Value::Polygon(vec![ring]), props));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Parses GeoJSON road features, builds and resolves one tile, and serializes the result.
pub fn process_geojson_str(input: &str, config: RoadGraphConfig) -> Result<String> {
    let geojson = GeoJson::from_str(input)
        .map_err(|e| RoadGraphError::Geojson(format!("Failed to parse GeoJSON: {}", e)))?;
    let elements = elements_from_geojson(&geojson)?;
    let graph = build_road_graph(elements, config)?;
    Ok(GeoJson::FeatureCollection(graph_to_geojson(&graph)).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 11,
                "properties": { "type": "car", "width": 4.0, "lanes": 2 },
                "geometry": { "type": "LineString", "coordinates": [[0, 0, 1], [10, 0, 1], [20, 0, 1]] }
            },
            {
                "type": "Feature",
                "properties": { "id": 12, "type": "car", "width": 4.0 },
                "geometry": { "type": "LineString", "coordinates": [[10, 10], [10, 0], [10, -10]] }
            },
            {
                "type": "Feature",
                "properties": { "type": "car" },
                "geometry": { "type": "Point", "coordinates": [3, 3] }
            }
        ]
    }"#;

    #[test]
    fn test_reads_road_features() {
        let geojson = GeoJson::from_str(CROSS).unwrap();
        let elements = elements_from_geojson(&geojson).unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].id, crate::graph::RoadId::Source(11));
        assert_eq!(elements[0].lanes, 2);
        assert_eq!(elements[0].points[1].elevation, 1.0);
        assert_eq!(elements[1].id, crate::graph::RoadId::Source(12));
        assert_eq!(elements[1].lanes, 1);
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let input = r#"{
            "type": "Feature",
            "properties": { "width": 2 },
            "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 0]] }
        }"#;
        let geojson = GeoJson::from_str(input).unwrap();
        assert!(matches!(
            elements_from_geojson(&geojson),
            Err(RoadGraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_oversized_lane_count_is_rejected() {
        let input = r#"{
            "type": "Feature",
            "properties": { "type": "bike", "lanes": 4294967296 },
            "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 0]] }
        }"#;
        let geojson = GeoJson::from_str(input).unwrap();
        assert!(matches!(
            elements_from_geojson(&geojson),
            Err(RoadGraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_process_writes_elements_and_caps() {
        let out = process_geojson_str(CROSS, RoadGraphConfig::default()).unwrap();
        let geojson = GeoJson::from_str(&out).unwrap();
        let GeoJson::FeatureCollection(fc) = geojson else {
            panic!("expected a feature collection");
        };
        let lines = fc
            .features
            .iter()
            .filter(|f| matches!(f.geometry.as_ref().map(|g| &g.value), Some(Value::LineString(_))))
            .count();
        let caps: Vec<_> = fc
            .features
            .iter()
            .filter_map(|f| match f.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Polygon(rings)) => Some(rings),
                _ => None,
            })
            .collect();
        assert_eq!(lines, 4);
        assert_eq!(caps.len(), 1);
        // 8 vertices plus the closing one
        assert_eq!(caps[0][0].len(), 9);
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            process_geojson_str("{ not json", RoadGraphConfig::default()),
            Err(RoadGraphError::Geojson(_))
        ));
    }
}
