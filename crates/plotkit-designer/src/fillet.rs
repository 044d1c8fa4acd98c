//! Fillet and chamfer corner construction.
//!
//! Both operations share the same corner setup: find the intersection
//! of the two carrier lines, orient a unit vector along each line
//! pointing away from the intersection, and measure the corner angle
//! between them. A fillet inserts a tangent arc on the bisector; a
//! chamfer connects the two tangent points with a straight bevel. In
//! both cases the segments are trimmed back to the tangent points and
//! the far endpoints are kept.

use crate::intersect::intersect_lines;
use crate::shapes::{Arc, Line, Point, Vec2};
use plotkit_core::GeometryError;

/// Corners tighter than this (or flatter than pi minus this) are
/// rejected as near-parallel.
pub const MIN_CORNER_ANGLE_RAD: f64 = 0.1;

/// Shared corner geometry for fillet and chamfer.
#[derive(Debug, Clone, Copy)]
struct CornerFrame {
    /// Carrier-line intersection.
    ip: Point,
    /// Unit vector along line 1, away from the intersection.
    v1: Vec2,
    /// Unit vector along line 2, away from the intersection.
    v2: Vec2,
    /// Kept (far) endpoint of line 1.
    far1: Point,
    /// Kept (far) endpoint of line 2.
    far2: Point,
    /// Corner angle between the outward vectors, radians.
    angle: f64,
    /// Cross product of the outward vectors; sign is corner convexity.
    cross: f64,
}

fn outward(line: &Line, ip: &Point) -> Option<(Vec2, Point)> {
    let dir = line.direction()?;
    // Intersection nearer the start means the outward direction runs
    // toward the end, and vice versa.
    if line.project_param(ip) < 0.5 {
        Some((dir, line.end))
    } else {
        Some((dir.negated(), line.start))
    }
}

fn corner_frame(l1: &Line, l2: &Line) -> Result<CornerFrame, GeometryError> {
    let ip = intersect_lines(l1, l2).ok_or(GeometryError::NoIntersection)?;

    let (v1, far1) = outward(l1, &ip).ok_or_else(|| GeometryError::InvalidSelection {
        reason: "first line is degenerate".to_string(),
    })?;
    let (v2, far2) = outward(l2, &ip).ok_or_else(|| GeometryError::InvalidSelection {
        reason: "second line is degenerate".to_string(),
    })?;

    let angle = v1.dot(v2).clamp(-1.0, 1.0).acos();
    if angle < MIN_CORNER_ANGLE_RAD || std::f64::consts::PI - angle < MIN_CORNER_ANGLE_RAD {
        return Err(GeometryError::NearParallel {
            min_angle_rad: MIN_CORNER_ANGLE_RAD,
        });
    }

    Ok(CornerFrame {
        ip,
        v1,
        v2,
        far1,
        far2,
        angle,
        cross: v1.cross(v2),
    })
}

/// Result of a fillet: two trimmed replacement segments and the
/// tangent arc between them.
#[derive(Debug, Clone, PartialEq)]
pub struct FilletResult {
    /// Line 1 trimmed back to its tangent point (far endpoint kept).
    pub trimmed_a: Line,
    /// Line 2 trimmed back to its tangent point (far endpoint kept).
    pub trimmed_b: Line,
    /// The corner-filling arc, tangent to both lines.
    pub arc: Arc,
    /// Tangent point on line 1.
    pub tangent_a: Point,
    /// Tangent point on line 2.
    pub tangent_b: Point,
}

/// Replaces the corner between two lines with a tangent arc of the
/// given radius.
///
/// The tangent points sit `r / tan(angle/2)` from the intersection
/// along each outward vector; the arc center sits `r / sin(angle/2)`
/// out along the bisector. The arc extent is normalized into
/// (-360, 360) and sign-corrected against the corner convexity so it
/// sweeps the short, corner-filling way.
pub fn fillet(l1: &Line, l2: &Line, radius: f64) -> Result<FilletResult, GeometryError> {
    if radius <= 0.0 {
        return Err(GeometryError::NonPositiveDimension { value: radius });
    }
    let frame = corner_frame(l1, l2)?;

    let half = frame.angle / 2.0;
    let tangent_len = radius / half.tan();
    let tangent_a = frame.ip.offset(frame.v1, tangent_len);
    let tangent_b = frame.ip.offset(frame.v2, tangent_len);

    let bisector = (frame.v1 + frame.v2)
        .normalized()
        .ok_or(GeometryError::NearParallel {
            min_angle_rad: MIN_CORNER_ANGLE_RAD,
        })?;
    let center = frame.ip.offset(bisector, radius / half.sin());

    let start_deg = (tangent_a.y - center.y)
        .atan2(tangent_a.x - center.x)
        .to_degrees();
    let end_deg = (tangent_b.y - center.y)
        .atan2(tangent_b.x - center.x)
        .to_degrees();

    let mut extent = (end_deg - start_deg) % 360.0;
    // The corner-filling sweep runs opposite the convexity sign.
    if extent != 0.0 && (extent > 0.0) == (frame.cross > 0.0) {
        extent += if extent > 0.0 { -360.0 } else { 360.0 };
    }

    Ok(FilletResult {
        trimmed_a: Line::new(tangent_a, frame.far1),
        trimmed_b: Line::new(tangent_b, frame.far2),
        arc: Arc::new(center, radius, radius, start_deg, extent),
        tangent_a,
        tangent_b,
    })
}

/// Result of a chamfer: two trimmed segments and the straight bevel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChamferResult {
    /// Line 1 trimmed back to its tangent point.
    pub trimmed_a: Line,
    /// Line 2 trimmed back to its tangent point.
    pub trimmed_b: Line,
    /// The bevel segment connecting the two tangent points.
    pub bevel: Line,
}

/// Replaces the corner between two lines with a straight bevel cut at
/// `size` units from the intersection along each line.
pub fn chamfer(l1: &Line, l2: &Line, size: f64) -> Result<ChamferResult, GeometryError> {
    if size <= 0.0 {
        return Err(GeometryError::NonPositiveDimension { value: size });
    }
    let frame = corner_frame(l1, l2)?;

    let tangent_a = frame.ip.offset(frame.v1, size);
    let tangent_b = frame.ip.offset(frame.v2, size);

    Ok(ChamferResult {
        trimmed_a: Line::new(tangent_a, frame.far1),
        trimmed_b: Line::new(tangent_b, frame.far2),
        bevel: Line::new(tangent_a, tangent_b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn right_angle_fillet_matches_hand_computation() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 10.0, 10.0);
        let f = fillet(&a, &b, 2.0).unwrap();

        assert!((f.arc.center.x - 8.0).abs() < 1e-9);
        assert!((f.arc.center.y - 2.0).abs() < 1e-9);
        assert!((f.tangent_a.x - 8.0).abs() < 1e-9);
        assert!(f.tangent_a.y.abs() < 1e-9);
        assert!((f.tangent_b.x - 10.0).abs() < 1e-9);
        assert!((f.tangent_b.y - 2.0).abs() < 1e-9);
        assert!((f.arc.extent_deg.abs() - 90.0).abs() < 1e-9);

        // Far endpoints are kept.
        assert_eq!(f.trimmed_a.end, Point::new(0.0, 0.0));
        assert_eq!(f.trimmed_b.end, Point::new(10.0, 10.0));
    }

    #[test]
    fn mirrored_corner_sweeps_the_other_way() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 10.0, -10.0);
        let f = fillet(&a, &b, 2.0).unwrap();
        assert!((f.arc.center.x - 8.0).abs() < 1e-9);
        assert!((f.arc.center.y + 2.0).abs() < 1e-9);
        assert!((f.arc.extent_deg.abs() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn fillet_arc_is_tangent_to_both_lines() {
        let a = line(0.0, 0.0, 20.0, 0.0);
        let b = line(20.0, 0.0, 0.0, 15.0);
        let f = fillet(&a, &b, 3.0).unwrap();
        // Center is exactly one radius from each carrier line.
        assert!((a.distance_to_point(&f.arc.center) - 3.0).abs() < 1e-9);
        assert!((b.distance_to_point(&f.arc.center) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn refilleting_trimmed_segments_reconstructs_the_corner() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 10.0, 10.0);
        let first = fillet(&a, &b, 2.0).unwrap();
        let second = fillet(&first.trimmed_a, &first.trimmed_b, 2.0).unwrap();

        assert!(first.arc.center.distance_to(&second.arc.center) < 1e-9);
        assert!(first.tangent_a.distance_to(&second.tangent_a) < 1e-9);
        assert!(first.tangent_b.distance_to(&second.tangent_b) < 1e-9);
    }

    #[test]
    fn rejects_parallel_lines() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(0.0, 5.0, 10.0, 5.0);
        assert!(matches!(
            fillet(&a, &b, 2.0),
            Err(GeometryError::NoIntersection)
        ));
    }

    #[test]
    fn rejects_near_parallel_corner() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 0.0, 0.01);
        assert!(matches!(
            fillet(&a, &b, 1.0),
            Err(GeometryError::NearParallel { .. })
        ));
    }

    #[test]
    fn rejects_non_positive_radius() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 10.0, 10.0);
        assert!(matches!(
            fillet(&a, &b, 0.0),
            Err(GeometryError::NonPositiveDimension { .. })
        ));
        assert!(matches!(
            chamfer(&a, &b, -1.0),
            Err(GeometryError::NonPositiveDimension { .. })
        ));
    }

    #[test]
    fn chamfer_connects_points_equidistant_from_corner() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 10.0, 10.0);
        let c = chamfer(&a, &b, 2.0).unwrap();
        assert!((c.bevel.start.x - 8.0).abs() < 1e-9);
        assert!(c.bevel.start.y.abs() < 1e-9);
        assert!((c.bevel.end.x - 10.0).abs() < 1e-9);
        assert!((c.bevel.end.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn chamfer_converges_to_sharp_corner_as_size_shrinks() {
        let a = line(0.0, 0.0, 10.0, 0.0);
        let b = line(10.0, 0.0, 10.0, 10.0);
        let corner = Point::new(10.0, 0.0);
        let mut size = 1.0;
        while size > 1e-9 {
            let c = chamfer(&a, &b, size).unwrap();
            assert!(c.bevel.start.distance_to(&corner) <= size * 1.0001);
            assert!(c.bevel.end.distance_to(&corner) <= size * 1.0001);
            size /= 10.0;
        }
    }
}
