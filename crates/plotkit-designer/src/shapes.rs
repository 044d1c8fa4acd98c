//! Geometric shapes for the plotter canvas.
//!
//! Shapes are plain value types in canvas space. Parametric shapes
//! (rectangle, circle, arc) are lazily convertible to point lists
//! ("flattened") for operations that need a general polyline form.

use serde::{Deserialize, Serialize};

/// Tolerance for coincidence / on-segment tests, in canvas units.
pub const GEOM_EPSILON: f64 = 1e-6;

/// Represents a 2D point with X and Y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Vector from `self` to `other`.
    pub fn vector_to(&self, other: &Point) -> Vec2 {
        Vec2::new(other.x - self.x, other.y - self.y)
    }

    /// Point offset by a vector scaled by `len`.
    pub fn offset(&self, dir: Vec2, len: f64) -> Point {
        Point::new(self.x + dir.x * len, self.y + dir.y * len)
    }
}

/// A 2D vector. Kept separate from `Point` so direction math reads
/// as direction math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit-length copy, or `None` for a degenerate vector.
    pub fn normalized(&self) -> Option<Vec2> {
        let len = self.length();
        if len < GEOM_EPSILON {
            None
        } else {
            Some(Vec2::new(self.x / len, self.y / len))
        }
    }

    pub fn dot(&self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product (convexity sign).
    pub fn cross(&self, other: Vec2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(&self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn negated(&self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Rotates a point about a center by an angle in degrees.
pub fn rotate_point(p: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg.abs() < GEOM_EPSILON {
        return p;
    }
    let angle_rad = angle_deg.to_radians();
    let cos_a = angle_rad.cos();
    let sin_a = angle_rad.sin();
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point {
        x: center.x + dx * cos_a - dy * sin_a,
        y: center.y + dx * sin_a + dy * cos_a,
    }
}

/// A line defined by two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Direction from start to end, unit length.
    pub fn direction(&self) -> Option<Vec2> {
        self.start.vector_to(&self.end).normalized()
    }

    /// Parameter of the projection of `p` onto the carrier line
    /// (0 at start, 1 at end, unclamped).
    pub fn project_param(&self, p: &Point) -> f64 {
        let d = self.start.vector_to(&self.end);
        let len2 = d.dot(d);
        if len2 < GEOM_EPSILON * GEOM_EPSILON {
            return 0.0;
        }
        self.start.vector_to(p).dot(d) / len2
    }

    /// Point at parameter `t` on the carrier line.
    pub fn point_at(&self, t: f64) -> Point {
        Point::new(
            self.start.x + (self.end.x - self.start.x) * t,
            self.start.y + (self.end.y - self.start.y) * t,
        )
    }

    /// Distance from `p` to the segment (projection clamped to ends).
    pub fn distance_to_point(&self, p: &Point) -> f64 {
        let t = self.project_param(p).clamp(0.0, 1.0);
        self.point_at(t).distance_to(p)
    }
}

/// An open chain of points (freehand strokes, flattened curves).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// A closed polygon; the edge back to the first point is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

/// An axis-aligned rectangle defined by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x + self.width, self.y),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y + self.height),
        ]
    }
}

/// A circle or axis-aligned ellipse defined by center and radii.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
}

impl Circle {
    pub fn new(center: Point, rx: f64, ry: f64) -> Self {
        Self { center, rx, ry }
    }

    /// Circle with equal radii.
    pub fn round(center: Point, r: f64) -> Self {
        Self::new(center, r, r)
    }
}

/// An elliptical arc: center, radii, start angle and sweep in degrees.
///
/// Positive extent sweeps counter-clockwise in the mathematical sense
/// (before any canvas Y flip at render/output time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub start_deg: f64,
    pub extent_deg: f64,
}

impl Arc {
    pub fn new(center: Point, rx: f64, ry: f64, start_deg: f64, extent_deg: f64) -> Self {
        Self {
            center,
            rx,
            ry,
            start_deg,
            extent_deg,
        }
    }

    /// Point on the arc at the given angle in degrees.
    pub fn point_at_deg(&self, deg: f64) -> Point {
        let rad = deg.to_radians();
        Point::new(
            self.center.x + self.rx * rad.cos(),
            self.center.y + self.ry * rad.sin(),
        )
    }
}

/// Number of flattening segments for a sweep: at least 36, more for
/// larger sweeps (one segment per 5 degrees).
fn segments_for_sweep(extent_deg: f64) -> usize {
    (extent_deg.abs() / 5.0).ceil().max(36.0) as usize
}

/// Types of shapes that can live on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Line,
    Polyline,
    Rectangle,
    Circle,
    Arc,
    Polygon,
}

/// Enum wrapper for all drawable shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Polyline(Polyline),
    Rectangle(Rectangle),
    Circle(Circle),
    Arc(Arc),
    Polygon(Polygon),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Line(_) => ShapeType::Line,
            Shape::Polyline(_) => ShapeType::Polyline,
            Shape::Rectangle(_) => ShapeType::Rectangle,
            Shape::Circle(_) => ShapeType::Circle,
            Shape::Arc(_) => ShapeType::Arc,
            Shape::Polygon(_) => ShapeType::Polygon,
        }
    }

    /// Whether the flattened outline closes back to its first point.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            Shape::Rectangle(_) | Shape::Polygon(_) | Shape::Circle(_)
        )
    }

    /// Flattens the shape into an ordered point list.
    ///
    /// Circles and arcs use `max(36, |extent| / 5)` segments; the
    /// closing edge of rectangles/polygons/circles is implicit (use
    /// [`Shape::is_closed`]).
    pub fn flatten(&self) -> Vec<Point> {
        match self {
            Shape::Line(l) => vec![l.start, l.end],
            Shape::Polyline(p) => p.points.clone(),
            Shape::Polygon(p) => p.points.clone(),
            Shape::Rectangle(r) => r.corners().to_vec(),
            Shape::Circle(c) => {
                let arc = Arc::new(c.center, c.rx, c.ry, 0.0, 360.0);
                let mut pts = flatten_arc(&arc);
                // Closing edge is implicit for circles.
                pts.pop();
                pts
            }
            Shape::Arc(a) => flatten_arc(a),
        }
    }

    /// Axis-aligned bounding box `(min_x, min_y, max_x, max_y)` of the
    /// flattened outline.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let pts = self.flatten();
        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in &pts {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        (min_x, min_y, max_x, max_y)
    }
}

/// Flattens an arc into `segments_for_sweep` + 1 points.
pub fn flatten_arc(arc: &Arc) -> Vec<Point> {
    let n = segments_for_sweep(arc.extent_deg);
    let mut pts = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let deg = arc.start_deg + arc.extent_deg * (i as f64) / (n as f64);
        pts.push(arc.point_at_deg(deg));
    }
    pts
}

/// Stroke styling carried by every shape record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stroke width in canvas units.
    pub width: f64,
    /// Stroke color, CSS-style (e.g. "#000000").
    pub color: String,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: "#000000".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_circle_has_at_least_36_segments() {
        let c = Shape::Circle(Circle::round(Point::new(0.0, 0.0), 10.0));
        let pts = c.flatten();
        assert_eq!(pts.len(), 72); // 360/5 segments, closing edge implicit
        for p in &pts {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!((r - 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn flatten_small_arc_still_uses_36_segments() {
        let a = Arc::new(Point::new(0.0, 0.0), 5.0, 5.0, 0.0, 30.0);
        let pts = flatten_arc(&a);
        assert_eq!(pts.len(), 37);
        assert!((pts[0].x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn rectangle_corners_in_order() {
        let r = Rectangle::new(1.0, 2.0, 3.0, 4.0);
        let c = r.corners();
        assert_eq!(c[0], Point::new(1.0, 2.0));
        assert_eq!(c[2], Point::new(4.0, 6.0));
    }

    #[test]
    fn project_param_is_linear_along_segment() {
        let l = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((l.project_param(&Point::new(2.5, 3.0)) - 0.25).abs() < 1e-12);
        assert!((l.project_param(&Point::new(15.0, 0.0)) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn distance_to_point_clamps_to_segment() {
        let l = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((l.distance_to_point(&Point::new(5.0, 4.0)) - 4.0).abs() < 1e-12);
        assert!((l.distance_to_point(&Point::new(13.0, 4.0)) - 5.0).abs() < 1e-12);
    }
}
