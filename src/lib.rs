pub mod builder;
pub mod config;
pub mod error;
pub mod geojson_io;
pub mod geometry;
pub mod graph;
pub mod tiling;
pub mod utils;
pub mod wasm;

pub use builder::RoadGraphBuilder;
pub use config::{RoadGraphConfig, DEFAULT_OFFSET, DEFAULT_TOLERANCE};
pub use error::{Result, RoadGraphError};
pub use geometry::JunctionGeometryResolver;
pub use graph::{
    Connection, ElementId, JunctionId, RoadElement, RoadEnd, RoadGraph, RoadId, RoadJunction,
    RoadPoint, RoadType,
};
pub use tiling::{build_road_graph, TileBatch, TileOutcome};
