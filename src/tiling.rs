use log::{debug, warn};

use crate::builder::RoadGraphBuilder;
use crate::config::RoadGraphConfig;
use crate::error::Result;
use crate::geometry::JunctionGeometryResolver;
use crate::graph::{RoadElement, RoadGraph};
use crate::utils::parallel::map_collect;

/// Runs both passes for one tile: topology, then geometry for every junction.
pub fn build_road_graph<I>(elements: I, config: RoadGraphConfig) -> Result<RoadGraph>
where
    I: IntoIterator<Item = RoadElement>,
{
    let mut builder = RoadGraphBuilder::with_config(config)?;
    builder.extend(elements)?;
    let mut graph = builder.build()?;
    JunctionGeometryResolver::with_config(config)?.resolve(&mut graph)?;
    Ok(graph)
}

/// Road elements of one tile, already projected to tile-local coordinates.
#[derive(Clone, Debug)]
pub struct TileInput {
    pub id: u64,
    pub elements: Vec<RoadElement>,
}

#[derive(Debug)]
pub struct TileOutcome {
    pub id: u64,
    pub result: Result<RoadGraph>,
}

/// Builds many independent tiles. Each tile gets its own builder, so tiles run in parallel
/// while the work inside a tile stays single-threaded.
pub struct TileBatch {
    config: RoadGraphConfig,
    tiles: Vec<TileInput>,
}

impl Default for TileBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl TileBatch {
    pub fn new() -> Self {
        Self {
            config: RoadGraphConfig::default(),
            tiles: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: RoadGraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_tile(&mut self, id: u64, elements: Vec<RoadElement>) {
        self.tiles.push(TileInput { id, elements });
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Processes every tile. A failing tile is logged and reported in its outcome; the
    /// rest of the batch still completes. Outcomes follow insertion order.
    pub fn process(self) -> Vec<TileOutcome> {
        let config = self.config;
        map_collect(self.tiles, |tile| {
            let count = tile.elements.len();
            let result = build_road_graph(tile.elements, config);
            match &result {
                Ok(graph) => debug!(
                    "tile {}: {} elements in, {} out, {} junctions",
                    tile.id,
                    count,
                    graph.elements().len(),
                    graph.junctions().len()
                ),
                Err(e) => warn!("tile {} skipped: {}", tile.id, e),
            }
            TileOutcome {
                id: tile.id,
                result,
            }
        })
    }
}

#[cfg(test)]
#[path = "tiling_tests.rs"]
mod tests;
