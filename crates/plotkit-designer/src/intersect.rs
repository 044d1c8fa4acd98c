//! Line-line intersection.
//!
//! The determinant method on the carrier (infinite) lines, with a
//! T-intersection fallback when the denominator vanishes: if the
//! segments are parallel but one segment's endpoint lies on the other
//! segment within tolerance, that endpoint is the intersection.
//! Fillet, chamfer, trim, and extend are all built on this.

use crate::shapes::{Line, Point, GEOM_EPSILON};

/// Tolerance for the T-intersection endpoint-on-segment test.
pub const T_INTERSECT_TOLERANCE: f64 = 1e-6;

/// Intersection of the carrier lines of two segments.
///
/// Returns the intersection point, or `None` when the lines are
/// parallel and no endpoint of either segment lies on the other.
/// Callers that need the point to lie on a given segment check the
/// parameter themselves via [`Line::project_param`].
pub fn intersect_lines(a: &Line, b: &Line) -> Option<Point> {
    let d1 = a.start.vector_to(&a.end);
    let d2 = b.start.vector_to(&b.end);
    let den = d1.cross(d2);

    if den.abs() < GEOM_EPSILON {
        return t_intersection(a, b);
    }

    let t = a.start.vector_to(&b.start).cross(d2) / den;
    Some(a.point_at(t))
}

/// Intersection restricted to both segments (with tolerance).
pub fn intersect_segments(a: &Line, b: &Line) -> Option<Point> {
    let p = intersect_lines(a, b)?;
    let ta = a.project_param(&p);
    let tb = b.project_param(&p);
    let tol = T_INTERSECT_TOLERANCE;
    if (-tol..=1.0 + tol).contains(&ta) && (-tol..=1.0 + tol).contains(&tb) {
        Some(p)
    } else {
        None
    }
}

/// Parallel fallback: an endpoint of one segment lying on the other.
fn t_intersection(a: &Line, b: &Line) -> Option<Point> {
    for p in [a.start, a.end] {
        if b.distance_to_point(&p) < T_INTERSECT_TOLERANCE {
            return Some(p);
        }
    }
    for p in [b.start, b.end] {
        if a.distance_to_point(&p) < T_INTERSECT_TOLERANCE {
            return Some(p);
        }
    }
    None
}
