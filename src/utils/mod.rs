pub mod parallel;

use crate::graph::RoadPoint;

/// Planar distance, elevation ignored.
#[inline]
pub fn distance(a: RoadPoint, b: RoadPoint) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

#[inline]
pub fn distance_squared(a: RoadPoint, b: RoadPoint) -> f64 {
    (b.x - a.x).powi(2) + (b.y - a.y).powi(2)
}

/// Linear interpolation, elevation included. `t` is clamped to [0, 1].
#[inline]
pub fn lerp(a: RoadPoint, b: RoadPoint, t: f64) -> RoadPoint {
    let t = t.clamp(0.0, 1.0);
    RoadPoint {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
        elevation: a.elevation + (b.elevation - a.elevation) * t,
    }
}

/// Unit vector from `from` towards `to`, or `None` when the two are closer than `eps`.
#[inline]
pub fn unit_direction(from: RoadPoint, to: RoadPoint, eps: f64) -> Option<(f64, f64)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    if !len.is_finite() || len <= eps {
        return None;
    }
    Some((dx / len, dy / len))
}

/// Collapses runs of points closer than `tol` into their first point.
pub fn dedup_points(points: &mut Vec<RoadPoint>, tol: f64) {
    let tol2 = tol * tol;
    points.dedup_by(|b, a| distance_squared(*a, *b) <= tol2);
}

/// Normalizes an angle in degrees into [0, 360).
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_dedup_points_collapses_clusters() {
        let mut pts = vec![
            RoadPoint::new(0.0, 0.0),
            RoadPoint::new(0.0, 0.0),
            RoadPoint::new(0.0005, 0.0),
            RoadPoint::new(5.0, 0.0),
            RoadPoint::new(5.0, 0.0),
        ];
        dedup_points(&mut pts, 1e-3);
        assert_eq!(pts, vec![RoadPoint::new(0.0, 0.0), RoadPoint::new(5.0, 0.0)]);
    }

    #[test]
    fn test_lerp_interpolates_elevation() {
        let a = RoadPoint::with_elevation(0.0, 0.0, 10.0);
        let b = RoadPoint::with_elevation(10.0, 0.0, 20.0);
        let mid = lerp(a, b, 0.5);
        assert_abs_diff_eq!(mid.x, 5.0);
        assert_abs_diff_eq!(mid.elevation, 15.0);
    }

    #[test]
    fn test_unit_direction_degenerate() {
        let a = RoadPoint::new(1.0, 1.0);
        assert!(unit_direction(a, a, 1e-9).is_none());
        let (dx, dy) = unit_direction(a, RoadPoint::new(1.0, 3.0), 1e-9).unwrap();
        assert_abs_diff_eq!(dx, 0.0);
        assert_abs_diff_eq!(dy, 1.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_abs_diff_eq!(normalize_degrees(-90.0), 270.0);
        assert_abs_diff_eq!(normalize_degrees(360.0), 0.0);
        assert!(normalize_degrees(-1e-300) < 360.0);
    }
}
