pub mod element;
pub mod junction;
pub mod road_graph;

#[cfg(test)]
mod tests;

pub use element::{ElementId, JunctionId, RoadElement, RoadEnd, RoadId, RoadPoint, RoadType};
pub use junction::{Connection, RoadJunction};
pub use road_graph::RoadGraph;
