use super::element::{ElementId, JunctionId, RoadElement, RoadId};
use super::junction::RoadJunction;
use crate::error::{Result, RoadGraphError};

/// Final road network for one tile.
///
/// Produced by [`crate::RoadGraphBuilder::build`]. Topology is fixed from then on; the only
/// mutation left is the geometry pass run by [`crate::JunctionGeometryResolver`], which trims
/// connected elements and fills junction polygons.
#[derive(Clone, Debug, Default)]
pub struct RoadGraph {
    /// All elements. Index is `ElementId`.
    pub(crate) elements: Vec<RoadElement>,
    /// All junctions. Index is `JunctionId`.
    pub(crate) junctions: Vec<RoadJunction>,
}

impl RoadGraph {
    pub(crate) fn new(elements: Vec<RoadElement>, junctions: Vec<RoadJunction>) -> Self {
        Self { elements, junctions }
    }

    pub fn elements(&self) -> &[RoadElement] {
        &self.elements
    }

    pub fn junctions(&self) -> &[RoadJunction] {
        &self.junctions
    }

    pub fn element(&self, id: ElementId) -> Result<&RoadElement> {
        self.elements
            .get(id)
            .ok_or_else(|| RoadGraphError::InvalidArgument(format!("no element {}", id)))
    }

    pub fn junction(&self, id: JunctionId) -> Result<&RoadJunction> {
        self.junctions
            .get(id)
            .ok_or_else(|| RoadGraphError::InvalidArgument(format!("no junction {}", id)))
    }

    pub fn find_element(&self, id: RoadId) -> Option<ElementId> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Junctions touched by either end of an element.
    pub fn junctions_of(&self, id: ElementId) -> Vec<JunctionId> {
        let Some(el) = self.elements.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<JunctionId> = el.start.into_iter().chain(el.end).collect();
        out.dedup();
        out
    }

    /// True once every junction carries its cap polygon.
    pub fn is_resolved(&self) -> bool {
        self.junctions.iter().all(RoadJunction::is_resolved)
    }

    pub fn into_parts(self) -> (Vec<RoadElement>, Vec<RoadJunction>) {
        (self.elements, self.junctions)
    }
}
