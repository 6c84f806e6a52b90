use log::{debug, trace};
use std::cmp::Ordering;

use super::validate::check_cap_ring;
use crate::config::RoadGraphConfig;
use crate::error::{Result, RoadGraphError};
use crate::graph::{Connection, ElementId, JunctionId, RoadGraph, RoadPoint};
use crate::utils::{distance, lerp, normalize_degrees, unit_direction};

// Vectors shorter than this have no usable direction.
const DIRECTION_EPSILON: f64 = 1e-9;

/// Cuts the junction end of `points` back to the point exactly `threshold` away from it.
///
/// The junction end is `points[0]` when `reversed`, otherwise the last point. Points closer
/// than `threshold` to that end are dropped and the polyline ends on the interpolated join
/// point instead, which is returned. Distance is measured straight from the junction end, so
/// clusters of near-duplicate points inside the radius are skipped over rather than stopping
/// the walk. A polyline that never leaves the radius collapses to `[far, far]`.
pub fn truncate_to_join_point(
    points: &mut Vec<RoadPoint>,
    threshold: f64,
    reversed: bool,
) -> Result<RoadPoint> {
    if points.len() < 2 {
        return Err(RoadGraphError::InvalidArgument(format!(
            "cannot truncate a polyline of {} points",
            points.len()
        )));
    }
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(RoadGraphError::InvalidArgument(format!(
            "truncation threshold must be finite and non-negative, got {}",
            threshold
        )));
    }

    // Work with the junction end last.
    if reversed {
        points.reverse();
    }
    let join = truncate_tail(points, threshold);
    if reversed {
        points.reverse();
    }
    Ok(join)
}

fn truncate_tail(points: &mut Vec<RoadPoint>, threshold: f64) -> RoadPoint {
    let last = points.len() - 1;
    let end = points[last];

    let Some(outside) = (0..last).rev().find(|&i| distance(end, points[i]) >= threshold) else {
        let far = points[0];
        points.clear();
        points.push(far);
        points.push(far);
        return far;
    };

    let inside_pt = points[outside + 1];
    let outside_pt = points[outside];
    let join = circle_exit(end, threshold, inside_pt, outside_pt);

    points.truncate(outside + 1);
    let lands_on_vertex = distance(join, outside_pt) <= DIRECTION_EPSILON;
    if !lands_on_vertex || points.len() < 2 {
        points.push(join);
    }
    join
}

/// Point on segment `inside -> outside` at distance `radius` from `center`. `inside` lies
/// within the circle and `outside` on or beyond it.
fn circle_exit(center: RoadPoint, radius: f64, inside: RoadPoint, outside: RoadPoint) -> RoadPoint {
    let (dx, dy) = (outside.x - inside.x, outside.y - inside.y);
    let (fx, fy) = (inside.x - center.x, inside.y - center.y);
    let a = dx * dx + dy * dy;
    if a <= DIRECTION_EPSILON * DIRECTION_EPSILON {
        return outside;
    }
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - radius * radius;
    let disc = (b * b - 4.0 * a * c).max(0.0);
    let t = (-b + disc.sqrt()) / (2.0 * a);
    lerp(inside, outside, t)
}

/// The cap edge contributed by one connection: the two points `width / 2` to either side of
/// the centerline at its junction end, as `(left, right)` looking towards the junction.
///
/// Returns `None` when the polyline has no segment long enough to define a direction.
pub fn join_segment(
    points: &[RoadPoint],
    width: f64,
    reversed: bool,
) -> Option<(RoadPoint, RoadPoint)> {
    let end = if reversed { *points.first()? } else { *points.last()? };
    let direction = if reversed {
        points
            .iter()
            .skip(1)
            .find_map(|p| unit_direction(*p, end, DIRECTION_EPSILON))
    } else {
        points
            .iter()
            .rev()
            .skip(1)
            .find_map(|p| unit_direction(*p, end, DIRECTION_EPSILON))
    }?;
    Some(offset_pair(end, direction, width))
}

fn offset_pair(at: RoadPoint, (dx, dy): (f64, f64), width: f64) -> (RoadPoint, RoadPoint) {
    let half = width / 2.0;
    // Left normal of the travel direction.
    let (nx, ny) = (-dy, dx);
    let left = RoadPoint::with_elevation(at.x + nx * half, at.y + ny * half, at.elevation);
    let right = RoadPoint::with_elevation(at.x - nx * half, at.y - ny * half, at.elevation);
    (left, right)
}

/// Clockwise sweep in degrees, in [0, 360), from ray `pivot -> reference` to ray
/// `pivot -> candidate`. Degenerate rays give 0.
pub fn turn_angle(reference: RoadPoint, pivot: RoadPoint, candidate: RoadPoint) -> f64 {
    let (rx, ry) = (reference.x - pivot.x, reference.y - pivot.y);
    let (cx, cy) = (candidate.x - pivot.x, candidate.y - pivot.y);
    if rx.hypot(ry) <= DIRECTION_EPSILON || cx.hypot(cy) <= DIRECTION_EPSILON {
        return 0.0;
    }
    let swept = ry.atan2(rx) - cy.atan2(cx);
    normalize_degrees(swept.to_degrees())
}

/// Stable sort of `points` by [`turn_angle`] around `pivot`.
pub fn sort_by_angle(reference: RoadPoint, pivot: RoadPoint, points: &mut [RoadPoint]) {
    points.sort_by(|a, b| {
        turn_angle(reference, pivot, *a)
            .partial_cmp(&turn_angle(reference, pivot, *b))
            .unwrap_or(Ordering::Equal)
    });
}

/// Computes trimmed centerlines and cap polygons for a built [`RoadGraph`].
pub struct JunctionGeometryResolver {
    config: RoadGraphConfig,
}

impl Default for JunctionGeometryResolver {
    fn default() -> Self {
        Self::new()
    }
}

// One connection after truncation.
struct Arm {
    connection: Connection,
    /// Index into the scratch centerlines of the junction being resolved.
    slot: usize,
    join: RoadPoint,
    /// Point used to order the arm around the center.
    heading: RoadPoint,
    width: f64,
}

impl JunctionGeometryResolver {
    pub fn new() -> Self {
        Self {
            config: RoadGraphConfig::default(),
        }
    }

    pub fn with_config(config: RoadGraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_offset(self, offset: f64) -> Result<Self> {
        Self::with_config(self.config.with_offset(offset))
    }

    pub fn config(&self) -> &RoadGraphConfig {
        &self.config
    }

    /// Resolves every junction of `graph`, in id order, on the calling thread.
    pub fn resolve(&self, graph: &mut RoadGraph) -> Result<()> {
        for j in 0..graph.junctions.len() {
            self.complete_junction(graph, j)?;
        }
        debug!("resolved {} junctions", graph.junctions.len());
        Ok(())
    }

    /// Truncates every connection of junction `j` and assembles its cap polygon.
    ///
    /// Must run exactly once per junction. Truncation happens on copies of the centerlines
    /// that are written back only once the cap is valid, so a failed call leaves `graph`
    /// untouched.
    ///
    /// An element linking two different junctions is cut back by at most half the distance
    /// between their centers, so a link shorter than its thresholds shrinks towards its
    /// midpoint instead of vanishing.
    pub fn complete_junction(&self, graph: &mut RoadGraph, j: JunctionId) -> Result<()> {
        let junction = graph.junction(j)?;
        if junction.is_resolved() {
            return Err(RoadGraphError::InvalidState(format!(
                "junction {} is already resolved",
                j
            )));
        }
        if junction.connections.len() < 2 {
            return Err(RoadGraphError::InvalidArgument(format!(
                "junction {} has {} connections, need at least 2",
                j,
                junction.connections.len()
            )));
        }
        let center = junction.center;
        let connections = junction.connections.clone();

        // A loop shows up twice, so both of its ends trim the same copy.
        let mut trimmed: Vec<(ElementId, Vec<RoadPoint>)> = Vec::with_capacity(connections.len());
        let mut arms = Vec::with_capacity(connections.len());
        for connection in connections {
            let element = graph.elements.get(connection.element).ok_or_else(|| {
                RoadGraphError::InvalidArgument(format!(
                    "junction {} references missing element {}",
                    j, connection.element
                ))
            })?;
            let width = self.config.threshold_for(element.width);
            let radius = match element.junction_at(connection.end.opposite()) {
                Some(other) if other != j => {
                    width.min(distance(center, graph.junction(other)?.center) / 2.0)
                }
                _ => width,
            };
            let reversed = connection.is_reversed();

            let slot = match trimmed.iter().position(|(e, _)| *e == connection.element) {
                Some(slot) => slot,
                None => {
                    trimmed.push((connection.element, element.points.clone()));
                    trimmed.len() - 1
                }
            };
            let points = &mut trimmed[slot].1;
            let untrimmed_heading = heading_point(points, center, reversed);
            let join = truncate_to_join_point(points, radius, reversed)?;
            trace!("junction {}: element {} joins at ({}, {})", j, element.id, join.x, join.y);

            let heading = heading_point(points, center, reversed)
                .or(untrimmed_heading)
                .ok_or_else(|| {
                    RoadGraphError::Algorithm(format!(
                        "element {} has no direction away from junction {}",
                        element.id, j
                    ))
                })?;
            arms.push(Arm {
                connection,
                slot,
                join,
                heading,
                width,
            });
        }

        // Fixed reference: straight down from the center.
        let reference = RoadPoint::new(center.x, center.y - 1.0);
        arms.sort_by(|a, b| {
            turn_angle(reference, center, a.heading)
                .partial_cmp(&turn_angle(reference, center, b.heading))
                .unwrap_or(Ordering::Equal)
        });

        let mut polygon = Vec::with_capacity(arms.len() * 2);
        for arm in &arms {
            let points = &trimmed[arm.slot].1;
            let (left, right) = join_segment(points, arm.width, arm.connection.is_reversed())
                .or_else(|| {
                    unit_direction(arm.heading, center, DIRECTION_EPSILON)
                        .map(|dir| offset_pair(arm.join, dir, arm.width))
                })
                .ok_or_else(|| {
                    RoadGraphError::Algorithm(format!(
                        "no join segment for element {} at junction {}",
                        graph.elements[arm.connection.element].id, j
                    ))
                })?;
            polygon.push(left);
            polygon.push(right);
        }
        // Acute neighbours can have overlapping spans; ordering the whole ring keeps it simple.
        sort_by_angle(reference, center, &mut polygon);
        check_cap_ring(&polygon, j)?;

        for (e, points) in trimmed {
            graph.elements[e].points = points;
        }
        let junction = &mut graph.junctions[j];
        junction.connections = arms.iter().map(|a| a.connection).collect();
        junction.polygon = polygon;
        Ok(())
    }
}

/// First point of a trimmed polyline, walking away from its junction end, that is distinct
/// from the junction center.
fn heading_point(points: &[RoadPoint], center: RoadPoint, reversed: bool) -> Option<RoadPoint> {
    let distinct = |p: &&RoadPoint| distance(**p, center) > DIRECTION_EPSILON;
    if reversed {
        points.iter().find(distinct).copied()
    } else {
        points.iter().rev().find(distinct).copied()
    }
}
