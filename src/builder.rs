use log::{debug, trace};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::mem;

use crate::config::RoadGraphConfig;
use crate::error::{Result, RoadGraphError};
use crate::graph::{
    Connection, ElementId, JunctionId, RoadElement, RoadEnd, RoadGraph, RoadId, RoadJunction,
    RoadPoint, RoadType,
};
use crate::utils::{dedup_points, distance_squared};

// Wrapper for a quantized coordinate to be Hashable (since f64 is not Hash)
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct NodeKey(i64, i64);

impl NodeKey {
    /// Cell of side `cell` containing `p`.
    pub fn quantize(p: RoadPoint, cell: f64) -> Self {
        NodeKey((p.x / cell).floor() as i64, (p.y / cell).floor() as i64)
    }

    /// The 3x3 block of cells around this one. A point within one cell size of `p`
    /// always falls in this block.
    fn neighbourhood(self) -> impl Iterator<Item = NodeKey> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dy| NodeKey(self.0 + dx, self.1 + dy)))
    }
}

/// Spatial hash of every live element vertex and junction center, scoped to one builder.
///
/// Lookups return candidates only; callers confirm with an exact distance test.
#[derive(Debug)]
pub struct CoincidenceIndex {
    cell: f64,
    vertices: HashMap<NodeKey, SmallVec<[ElementId; 2]>>,
    junctions: HashMap<NodeKey, SmallVec<[JunctionId; 1]>>,
}

impl CoincidenceIndex {
    pub fn new(cell: f64) -> Self {
        Self {
            cell,
            vertices: HashMap::new(),
            junctions: HashMap::new(),
        }
    }

    pub fn insert_element(&mut self, id: ElementId, points: &[RoadPoint]) {
        for &p in points {
            let bucket = self.vertices.entry(NodeKey::quantize(p, self.cell)).or_default();
            if !bucket.contains(&id) {
                bucket.push(id);
            }
        }
    }

    pub fn remove_element(&mut self, id: ElementId, points: &[RoadPoint]) {
        for &p in points {
            let key = NodeKey::quantize(p, self.cell);
            if let Some(bucket) = self.vertices.get_mut(&key) {
                bucket.retain(|e| *e != id);
                if bucket.is_empty() {
                    self.vertices.remove(&key);
                }
            }
        }
    }

    pub fn insert_junction(&mut self, id: JunctionId, center: RoadPoint) {
        self.junctions
            .entry(NodeKey::quantize(center, self.cell))
            .or_default()
            .push(id);
    }

    pub fn elements_near(&self, p: RoadPoint) -> Vec<ElementId> {
        let mut out: Vec<ElementId> = NodeKey::quantize(p, self.cell)
            .neighbourhood()
            .filter_map(|k| self.vertices.get(&k))
            .flatten()
            .copied()
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub fn junctions_near(&self, p: RoadPoint) -> Vec<JunctionId> {
        let mut out: Vec<JunctionId> = NodeKey::quantize(p, self.cell)
            .neighbourhood()
            .filter_map(|k| self.junctions.get(&k))
            .flatten()
            .copied()
            .collect();
        out.sort_unstable();
        out
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.junctions.clear();
    }
}

/// Incrementally merges road elements into a graph.
///
/// Every vertex of an added element is probed against existing junctions and the vertices of
/// other elements of the same [`RoadType`]. Each hit becomes a junction site: free endpoints
/// there attach to the junction and elements passing through it are split in two.
///
/// Not synchronized. One builder serves one tile-build pass.
pub struct RoadGraphBuilder {
    config: RoadGraphConfig,
    /// Live elements. Index is `ElementId`; a split reuses the slot for its first half.
    elements: Vec<RoadElement>,
    junctions: Vec<RoadJunction>,
    index: CoincidenceIndex,
    next_synthetic_id: u64,
    built: bool,
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        let config = RoadGraphConfig::default();
        Self {
            index: CoincidenceIndex::new(config.tolerance),
            config,
            elements: Vec::new(),
            junctions: Vec::new(),
            next_synthetic_id: 0,
            built: false,
        }
    }

    pub fn with_config(config: RoadGraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            index: CoincidenceIndex::new(config.tolerance),
            config,
            ..Self::new()
        })
    }

    pub fn config(&self) -> &RoadGraphConfig {
        &self.config
    }

    pub fn elements(&self) -> &[RoadElement] {
        &self.elements
    }

    pub fn junctions(&self) -> &[RoadJunction] {
        &self.junctions
    }

    /// Adds one element, merging it with what is already there.
    pub fn add(&mut self, mut element: RoadElement) -> Result<()> {
        if self.built {
            return Err(RoadGraphError::InvalidState(
                "add called after build".to_string(),
            ));
        }
        if !element.width.is_finite() || element.width < 0.0 {
            return Err(RoadGraphError::InvalidArgument(format!(
                "element {} has invalid width {}",
                element.id, element.width
            )));
        }
        if let Some(p) = element.points.iter().find(|p| !p.is_finite()) {
            return Err(RoadGraphError::InvalidArgument(format!(
                "element {} has non-finite point {:?}",
                element.id, p
            )));
        }

        dedup_points(&mut element.points, self.config.tolerance);
        if element.points.len() < 2 {
            return Err(RoadGraphError::InvalidArgument(format!(
                "element {} needs at least 2 distinct points, got {}",
                element.id,
                element.points.len()
            )));
        }
        element.start = None;
        element.end = None;

        // Probe before inserting so the element never matches its own vertices.
        let road_type = element.road_type;
        let mut sites: Vec<RoadPoint> = Vec::new();
        for &p in &element.points {
            if sites.iter().any(|s| self.coincident(*s, p)) {
                continue;
            }
            if self.is_junction_site(p, road_type) {
                sites.push(p);
            }
        }

        let id = self.elements.len();
        self.index.insert_element(id, &element.points);
        trace!("element {} added as {} with {} junction sites", element.id, id, sites.len());
        self.elements.push(element);

        for site in sites {
            self.join_at(site, road_type);
        }
        Ok(())
    }

    pub fn extend<I: IntoIterator<Item = RoadElement>>(&mut self, elements: I) -> Result<()> {
        for element in elements {
            self.add(element)?;
        }
        Ok(())
    }

    /// Finalizes the topology. The builder accepts nothing afterwards.
    pub fn build(&mut self) -> Result<RoadGraph> {
        if self.built {
            return Err(RoadGraphError::InvalidState(
                "build called twice".to_string(),
            ));
        }
        self.built = true;
        self.index.clear();
        debug!(
            "built road graph with {} elements and {} junctions",
            self.elements.len(),
            self.junctions.len()
        );
        Ok(RoadGraph::new(
            mem::take(&mut self.elements),
            mem::take(&mut self.junctions),
        ))
    }

    #[inline]
    fn coincident(&self, a: RoadPoint, b: RoadPoint) -> bool {
        distance_squared(a, b) <= self.config.tolerance * self.config.tolerance
    }

    fn find_junction(&self, p: RoadPoint, road_type: RoadType) -> Option<JunctionId> {
        self.index
            .junctions_near(p)
            .into_iter()
            .filter(|&j| {
                let junction = &self.junctions[j];
                junction.road_type == road_type && self.coincident(junction.center, p)
            })
            .min_by(|&a, &b| {
                let da = distance_squared(self.junctions[a].center, p);
                let db = distance_squared(self.junctions[b].center, p);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn is_junction_site(&self, p: RoadPoint, road_type: RoadType) -> bool {
        if self.find_junction(p, road_type).is_some() {
            return true;
        }
        self.index.elements_near(p).into_iter().any(|e| {
            let el = &self.elements[e];
            el.road_type == road_type && el.points.iter().any(|q| self.coincident(*q, p))
        })
    }

    /// Finds a vertex at `center` that still has to be merged: a free endpoint or an
    /// interior vertex.
    fn find_unresolved_vertex(
        &self,
        center: RoadPoint,
        road_type: RoadType,
    ) -> Option<(ElementId, usize)> {
        for e in self.index.elements_near(center) {
            let el = &self.elements[e];
            if el.road_type != road_type {
                continue;
            }
            let last = el.points.len() - 1;
            for (i, q) in el.points.iter().enumerate() {
                if !self.coincident(*q, center) {
                    continue;
                }
                let unresolved = match i {
                    0 => el.start.is_none(),
                    i if i == last => el.end.is_none(),
                    _ => true,
                };
                if unresolved {
                    return Some((e, i));
                }
            }
        }
        None
    }

    /// Creates or grows the junction at `p` and merges every same-type vertex there.
    fn join_at(&mut self, p: RoadPoint, road_type: RoadType) -> JunctionId {
        let j = match self.find_junction(p, road_type) {
            Some(j) => j,
            None => {
                let j = self.junctions.len();
                self.junctions.push(RoadJunction::new(p, road_type));
                self.index.insert_junction(j, p);
                debug!("new {} junction {} at ({}, {})", road_type, j, p.x, p.y);
                j
            }
        };

        let center = self.junctions[j].center;
        while let Some((e, vertex)) = self.find_unresolved_vertex(center, road_type) {
            let last = self.elements[e].points.len() - 1;
            if vertex == 0 {
                self.attach(j, e, RoadEnd::Start);
            } else if vertex == last {
                self.attach(j, e, RoadEnd::End);
            } else {
                self.split(e, vertex);
            }
        }
        j
    }

    fn attach(&mut self, j: JunctionId, e: ElementId, end: RoadEnd) {
        let center = self.junctions[j].center;
        self.reindex(e, |el| {
            let idx = match end {
                RoadEnd::Start => 0,
                RoadEnd::End => el.points.len() - 1,
            };
            // Snap so all connections share the exact center.
            el.points[idx].x = center.x;
            el.points[idx].y = center.y;
            el.set_junction(end, Some(j));
        });
        self.junctions[j].connections.push(Connection::new(e, end));
        trace!("element {} {:?} attached to junction {}", self.elements[e].id, end, j);
    }

    /// Splits element `e` at interior vertex `vertex`. The head keeps slot `e`, the tail
    /// is appended and inherits the far-end junction.
    fn split(&mut self, e: ElementId, vertex: usize) {
        let tail_slot = self.elements.len();
        let head_id = self.next_synthetic();
        let tail_id = self.next_synthetic();

        let old = &self.elements[e];
        let original_id = old.id;
        let original_end = old.end;
        self.index.remove_element(e, &old.points);

        let tail = RoadElement {
            id: tail_id,
            road_type: old.road_type,
            width: old.width,
            lanes: old.lanes,
            points: old.points[vertex..].to_vec(),
            start: None,
            end: original_end,
        };

        let head = &mut self.elements[e];
        head.id = head_id;
        head.points.truncate(vertex + 1);
        head.end = None;
        self.index.insert_element(e, &head.points);

        if let Some(k) = original_end {
            for c in self.junctions[k].connections.iter_mut() {
                if c.element == e && c.end == RoadEnd::End {
                    c.element = tail_slot;
                }
            }
        }

        self.index.insert_element(tail_slot, &tail.points);
        self.elements.push(tail);
        debug!(
            "split element {} at vertex {} into {} and {}",
            original_id, vertex, head_id, tail_id
        );
    }

    fn reindex<F: FnOnce(&mut RoadElement)>(&mut self, e: ElementId, f: F) {
        self.index.remove_element(e, &self.elements[e].points);
        f(&mut self.elements[e]);
        self.index.insert_element(e, &self.elements[e].points);
    }

    fn next_synthetic(&mut self) -> RoadId {
        let id = RoadId::Synthetic(self.next_synthetic_id);
        self.next_synthetic_id += 1;
        id
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
