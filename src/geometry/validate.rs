use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::Line;
use rstar::{RTree, RTreeObject, AABB};

use crate::error::{Result, RoadGraphError};
use crate::graph::{JunctionId, RoadPoint};
use crate::utils::distance_squared;

// Cap vertices closer than this are treated as the same vertex.
const VERTEX_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug)]
struct IndexedLine {
    line: Line<f64>,
    index: usize,
}

impl RTreeObject for IndexedLine {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        let p1 = self.line.start;
        let p2 = self.line.end;
        AABB::from_corners(
            [p1.x.min(p2.x), p1.y.min(p2.y)],
            [p1.x.max(p2.x), p1.y.max(p2.y)]
        )
    }
}

/// Checks that a cap ring (implicitly closed) is finite, has distinct vertices and does not
/// cross itself.
pub fn check_cap_ring(ring: &[RoadPoint], junction: JunctionId) -> Result<()> {
    let fail = |what: String| {
        Err(RoadGraphError::Algorithm(format!("junction {} cap {}", junction, what)))
    };

    if ring.len() < 3 {
        return fail(format!("has only {} vertices", ring.len()));
    }
    if let Some(p) = ring.iter().find(|p| !p.is_finite()) {
        return fail(format!("has non-finite vertex {:?}", p));
    }
    for i in 0..ring.len() {
        for j in (i + 1)..ring.len() {
            if distance_squared(ring[i], ring[j]) <= VERTEX_EPSILON * VERTEX_EPSILON {
                return fail(format!("repeats vertex ({}, {})", ring[i].x, ring[i].y));
            }
        }
    }

    let n = ring.len();
    let indexed: Vec<IndexedLine> = (0..n)
        .map(|i| IndexedLine {
            line: Line::new(ring[i].coord(), ring[(i + 1) % n].coord()),
            index: i,
        })
        .collect();
    let tree = RTree::bulk_load(indexed);

    for (a, b) in tree.intersection_candidates_with_other_tree(&tree) {
        let (i, j) = (a.index, b.index);
        if i >= j {
            continue; // Handle unique pairs
        }
        let adjacent = j == i + 1 || (i == 0 && j == n - 1);
        match line_intersection(a.line, b.line) {
            None => {}
            // Neighbouring edges always meet at their shared vertex.
            Some(LineIntersection::SinglePoint { .. }) if adjacent => {}
            Some(_) => return fail(format!("edges {} and {} intersect", i, j)),
        }
    }
    Ok(())
}
