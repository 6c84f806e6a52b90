use geo_types::Coord;
use std::fmt;
use std::str::FromStr;

use crate::error::RoadGraphError;

// Type aliases for arena indices to ensure we don't mix them up
pub type ElementId = usize;
pub type JunctionId = usize;

/// Road class. Only elements of the same class may share a junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoadType {
    Car,
    Bike,
    Pedestrian,
}

impl fmt::Display for RoadType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            RoadType::Car => "car",
            RoadType::Bike => "bike",
            RoadType::Pedestrian => "pedestrian",
        };
        f.write_str(s)
    }
}

impl FromStr for RoadType {
    type Err = RoadGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "car" => Ok(RoadType::Car),
            "bike" => Ok(RoadType::Bike),
            "pedestrian" => Ok(RoadType::Pedestrian),
            other => Err(RoadGraphError::InvalidArgument(format!(
                "unknown road type {:?}",
                other
            ))),
        }
    }
}

/// Tile-local metric point. Planar operations ignore `elevation`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RoadPoint {
    pub x: f64,
    pub y: f64,
    pub elevation: f64,
}

impl RoadPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, elevation: 0.0 }
    }

    pub fn with_elevation(x: f64, y: f64, elevation: f64) -> Self {
        Self { x, y, elevation }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.elevation.is_finite()
    }

    pub fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl From<(f64, f64)> for RoadPoint {
    fn from((x, y): (f64, f64)) -> Self {
        RoadPoint::new(x, y)
    }
}

impl From<(f64, f64, f64)> for RoadPoint {
    fn from((x, y, elevation): (f64, f64, f64)) -> Self {
        RoadPoint::with_elevation(x, y, elevation)
    }
}

impl From<Coord<f64>> for RoadPoint {
    fn from(c: Coord<f64>) -> Self {
        RoadPoint::new(c.x, c.y)
    }
}

impl From<RoadPoint> for Coord<f64> {
    fn from(p: RoadPoint) -> Self {
        p.coord()
    }
}

/// Stable element identifier. Split halves get a `Synthetic` id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoadId {
    Source(u64),
    Synthetic(u64),
}

impl fmt::Display for RoadId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoadId::Source(id) => write!(f, "{}", id),
            RoadId::Synthetic(id) => write!(f, "synthetic-{}", id),
        }
    }
}

/// Which end of an element touches a junction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoadEnd {
    Start,
    End,
}

impl RoadEnd {
    pub fn opposite(self) -> Self {
        match self {
            RoadEnd::Start => RoadEnd::End,
            RoadEnd::End => RoadEnd::Start,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoadElement {
    pub id: RoadId,
    pub road_type: RoadType,
    pub width: f64,
    pub lanes: u32,
    /// Ordered centerline, at least two points once inside a graph.
    pub points: Vec<RoadPoint>,
    /// Junction at `points[0]`, if any.
    pub start: Option<JunctionId>,
    /// Junction at the last point, if any.
    pub end: Option<JunctionId>,
}

impl RoadElement {
    pub fn new<P: Into<RoadPoint>>(
        id: u64,
        road_type: RoadType,
        width: f64,
        lanes: u32,
        points: Vec<P>,
    ) -> Self {
        Self {
            id: RoadId::Source(id),
            road_type,
            width,
            lanes,
            points: points.into_iter().map(Into::into).collect(),
            start: None,
            end: None,
        }
    }

    pub fn junction_at(&self, end: RoadEnd) -> Option<JunctionId> {
        match end {
            RoadEnd::Start => self.start,
            RoadEnd::End => self.end,
        }
    }

    pub(crate) fn set_junction(&mut self, end: RoadEnd, junction: Option<JunctionId>) {
        match end {
            RoadEnd::Start => self.start = junction,
            RoadEnd::End => self.end = junction,
        }
    }

    pub fn endpoint(&self, end: RoadEnd) -> Option<RoadPoint> {
        match end {
            RoadEnd::Start => self.points.first().copied(),
            RoadEnd::End => self.points.last().copied(),
        }
    }

    /// Planar polyline length.
    pub fn length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| crate::utils::distance(w[0], w[1]))
            .sum()
    }

    pub fn to_line_string(&self) -> geo_types::LineString<f64> {
        geo_types::LineString::new(self.points.iter().map(RoadPoint::coord).collect())
    }
}
