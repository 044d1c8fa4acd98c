//! Mirror and rotate transformations.
//!
//! Both operate on the flattened form for parametric shapes: a
//! mirrored or rotated rectangle is generally no longer axis-aligned,
//! so rectangles and circles come back as polygons. Arcs survive
//! rotation in parametric form (center moves, start angle shifts);
//! mirroring flattens them.

use crate::shapes::{rotate_point, Line, Point, Polygon, Polyline, Shape};
use plotkit_core::GeometryError;

/// Rotation snap increment in degrees.
pub const ANGLE_SNAP_DEG: f64 = 5.0;

/// Reflects a point across the carrier line of `axis`.
pub fn mirror_point(p: &Point, axis: &Line) -> Result<Point, GeometryError> {
    let dir = axis
        .direction()
        .ok_or_else(|| GeometryError::InvalidSelection {
            reason: "mirror axis is degenerate".to_string(),
        })?;
    let normal = dir.perp();
    let offset = axis.start.vector_to(p).dot(normal);
    Ok(Point::new(
        p.x - 2.0 * offset * normal.x,
        p.y - 2.0 * offset * normal.y,
    ))
}

/// Mirrors a shape across an axis line.
///
/// Lines, polylines, and polygons keep their variant; rectangles and
/// circles become polygons; arcs become polylines.
pub fn mirror_shape(shape: &Shape, axis: &Line) -> Result<Shape, GeometryError> {
    let map = |pts: &[Point]| -> Result<Vec<Point>, GeometryError> {
        pts.iter().map(|p| mirror_point(p, axis)).collect()
    };

    Ok(match shape {
        Shape::Line(l) => Shape::Line(Line::new(
            mirror_point(&l.start, axis)?,
            mirror_point(&l.end, axis)?,
        )),
        Shape::Polyline(p) => Shape::Polyline(Polyline::new(map(&p.points)?)),
        Shape::Polygon(p) => Shape::Polygon(Polygon::new(map(&p.points)?)),
        Shape::Rectangle(_) | Shape::Circle(_) => {
            Shape::Polygon(Polygon::new(map(&shape.flatten())?))
        }
        Shape::Arc(_) => Shape::Polyline(Polyline::new(map(&shape.flatten())?)),
    })
}

/// Mirrors across the vertical centerline of the shape's own bounding
/// box (quick flip-horizontal).
pub fn flip_horizontal(shape: &Shape) -> Result<Shape, GeometryError> {
    let (min_x, min_y, max_x, max_y) = shape.bounding_box();
    let cx = (min_x + max_x) / 2.0;
    let axis = Line::new(Point::new(cx, min_y), Point::new(cx, max_y.max(min_y + 1.0)));
    mirror_shape(shape, &axis)
}

/// Mirrors across the horizontal centerline of the shape's own
/// bounding box (quick flip-vertical).
pub fn flip_vertical(shape: &Shape) -> Result<Shape, GeometryError> {
    let (min_x, min_y, max_x, max_y) = shape.bounding_box();
    let cy = (min_y + max_y) / 2.0;
    let axis = Line::new(Point::new(min_x, cy), Point::new(max_x.max(min_x + 1.0), cy));
    mirror_shape(shape, &axis)
}

/// Snaps an angle to the nearest 5-degree increment.
pub fn snap_angle(angle_deg: f64) -> f64 {
    (angle_deg / ANGLE_SNAP_DEG).round() * ANGLE_SNAP_DEG
}

/// Rotates a shape about a pivot point.
///
/// Arcs rotate in parametric form (the stored start angle shifts by
/// the rotation, extent unchanged). Rectangles and circles convert to
/// polygons on first rotation; the variant change is the permanent
/// marker that later operations treat them as polygons.
pub fn rotate_shape(shape: &Shape, pivot: &Point, angle_deg: f64, snap: bool) -> Shape {
    let angle = if snap { snap_angle(angle_deg) } else { angle_deg };
    let map = |pts: &[Point]| -> Vec<Point> {
        pts.iter().map(|p| rotate_point(*p, *pivot, angle)).collect()
    };

    match shape {
        Shape::Line(l) => Shape::Line(Line::new(
            rotate_point(l.start, *pivot, angle),
            rotate_point(l.end, *pivot, angle),
        )),
        Shape::Polyline(p) => Shape::Polyline(Polyline::new(map(&p.points))),
        Shape::Polygon(p) => Shape::Polygon(Polygon::new(map(&p.points))),
        Shape::Arc(a) => {
            let mut rotated = *a;
            rotated.center = rotate_point(a.center, *pivot, angle);
            rotated.start_deg += angle;
            Shape::Arc(rotated)
        }
        Shape::Rectangle(_) | Shape::Circle(_) => {
            Shape::Polygon(Polygon::new(map(&shape.flatten())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Arc, Circle, Rectangle};

    #[test]
    fn mirror_across_y_axis_negates_x() {
        let axis = Line::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        let seg = Shape::Line(Line::new(Point::new(2.0, 2.0), Point::new(6.0, 2.0)));
        let Shape::Line(m) = mirror_shape(&seg, &axis).unwrap() else {
            panic!("line should mirror to a line");
        };
        assert!((m.start.x + 2.0).abs() < 1e-9);
        assert!((m.start.y - 2.0).abs() < 1e-9);
        assert!((m.end.x + 6.0).abs() < 1e-9);
        assert!((m.end.y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn mirror_is_an_involution() {
        let axis = Line::new(Point::new(1.0, -2.0), Point::new(4.0, 7.0));
        let shape = Shape::Polyline(Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 1.5),
            Point::new(-2.0, 4.0),
        ]));
        let twice = mirror_shape(&mirror_shape(&shape, &axis).unwrap(), &axis).unwrap();
        let (Shape::Polyline(orig), Shape::Polyline(back)) = (&shape, &twice) else {
            panic!("variant changed");
        };
        for (a, b) in orig.points.iter().zip(&back.points) {
            assert!(a.distance_to(b) < 1e-9);
        }
    }

    #[test]
    fn mirrored_rectangle_becomes_polygon() {
        let axis = Line::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let rect = Shape::Rectangle(Rectangle::new(1.0, 2.0, 3.0, 4.0));
        let mirrored = mirror_shape(&rect, &axis).unwrap();
        assert!(matches!(mirrored, Shape::Polygon(_)));
    }

    #[test]
    fn flip_horizontal_keeps_bounding_box() {
        let shape = Shape::Polygon(Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 3.0),
        ]));
        let flipped = flip_horizontal(&shape).unwrap();
        let (a, b, c, d) = shape.bounding_box();
        let (fa, fb, fc, fd) = flipped.bounding_box();
        assert!((a - fa).abs() < 1e-9 && (b - fb).abs() < 1e-9);
        assert!((c - fc).abs() < 1e-9 && (d - fd).abs() < 1e-9);
    }

    #[test]
    fn rotation_round_trips() {
        let shape = Shape::Line(Line::new(Point::new(1.0, 1.0), Point::new(5.0, 3.0)));
        let pivot = Point::new(2.0, 2.0);
        let there = rotate_shape(&shape, &pivot, 33.3, false);
        let back = rotate_shape(&there, &pivot, -33.3, false);
        let (Shape::Line(orig), Shape::Line(rt)) = (&shape, &back) else {
            panic!("variant changed");
        };
        assert!(orig.start.distance_to(&rt.start) < 1e-9);
        assert!(orig.end.distance_to(&rt.end) < 1e-9);
    }

    #[test]
    fn snapped_rotation_lands_on_5_degree_grid() {
        assert_eq!(snap_angle(33.3), 35.0);
        assert_eq!(snap_angle(-12.4), -10.0);
        assert_eq!(snap_angle(2.4), 0.0);
    }

    #[test]
    fn rotated_arc_shifts_start_angle_only() {
        let arc = Shape::Arc(Arc::new(Point::new(10.0, 0.0), 5.0, 5.0, 30.0, 90.0));
        let rotated = rotate_shape(&arc, &Point::new(0.0, 0.0), 90.0, false);
        let Shape::Arc(r) = rotated else {
            panic!("arc should stay an arc");
        };
        assert!((r.start_deg - 120.0).abs() < 1e-9);
        assert!((r.extent_deg - 90.0).abs() < 1e-9);
        assert!(r.center.x.abs() < 1e-9);
        assert!((r.center.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rotated_circle_becomes_polygon() {
        let c = Shape::Circle(Circle::round(Point::new(0.0, 0.0), 2.0));
        let rotated = rotate_shape(&c, &Point::new(1.0, 1.0), 45.0, false);
        assert!(matches!(rotated, Shape::Polygon(_)));
    }
}
