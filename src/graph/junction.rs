use smallvec::SmallVec;

use super::element::{ElementId, RoadEnd, RoadPoint, RoadType};

/// One end of one element meeting a junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub element: ElementId,
    pub end: RoadEnd,
}

impl Connection {
    pub fn new(element: ElementId, end: RoadEnd) -> Self {
        Self { element, end }
    }

    /// True when the junction end of the element is its first point.
    pub fn is_reversed(&self) -> bool {
        self.end == RoadEnd::Start
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoadJunction {
    pub center: RoadPoint,
    pub road_type: RoadType,
    /// Most junctions are 3 or 4 way.
    pub connections: SmallVec<[Connection; 4]>,
    /// Cap ring, empty until geometry resolution. Not explicitly closed.
    pub polygon: Vec<RoadPoint>,
}

impl RoadJunction {
    pub fn new(center: RoadPoint, road_type: RoadType) -> Self {
        Self {
            center,
            road_type,
            connections: SmallVec::new(),
            polygon: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.polygon.is_empty()
    }

    /// Distinct elements touching this junction.
    pub fn elements(&self) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.connections.iter().map(|c| c.element).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn to_polygon(&self) -> Option<geo_types::Polygon<f64>> {
        if !self.is_resolved() {
            return None;
        }
        let mut coords: Vec<_> = self.polygon.iter().map(RoadPoint::coord).collect();
        coords.push(coords[0]);
        Some(geo_types::Polygon::new(geo_types::LineString::new(coords), vec![]))
    }
}
