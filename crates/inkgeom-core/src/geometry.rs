//! Primitive geometry shared by hit testing and handle generation.

use kurbo::{Affine, Point, Rect, Vec2};

use crate::shapes::{Shape, ShapeKind};

/// Axis-aligned box of a shape in absolute coordinates, with its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub cx: f64,
    pub cy: f64,
}

impl BoundingBox {
    /// Box from two corners, center at their midpoint.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            cx: (x1 + x2) / 2.0,
            cy: (y1 + y2) / 2.0,
        }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.x1, rect.y1)
    }

    /// Swap flipped axes so that `x1 <= x2` and `y1 <= y2`.
    pub fn normalized(self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            x2: self.x1.max(self.x2),
            y1: self.y1.min(self.y2),
            y2: self.y1.max(self.y2),
            ..self
        }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// Inclusive containment.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 && point.x <= self.x2 && point.y >= self.y1 && point.y <= self.y2
    }
}

/// Rotate `point` about `pivot` by `angle` radians.
pub fn rotate_point(point: Point, pivot: Point, angle: f64) -> Point {
    Affine::rotate_about(angle, pivot) * point
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Unrotated box of a shape in absolute coordinates.
///
/// Vertex-based shapes use the extent of their vertices; everything else uses
/// position and size.
pub fn absolute_coords(shape: &Shape) -> BoundingBox {
    match shape.points() {
        Some(points) if !points.is_empty() => {
            let mut min = Point::new(f64::INFINITY, f64::INFINITY);
            let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
            for p in points {
                min.x = min.x.min(p.x);
                min.y = min.y.min(p.y);
                max.x = max.x.max(p.x);
                max.y = max.y.max(p.y);
            }
            BoundingBox::new(
                min.x + shape.position.x,
                min.y + shape.position.y,
                max.x + shape.position.x,
                max.y + shape.position.y,
            )
        }
        Some(_) => BoundingBox::new(
            shape.position.x,
            shape.position.y,
            shape.position.x,
            shape.position.y,
        ),
        None => BoundingBox::new(
            shape.position.x,
            shape.position.y,
            shape.position.x + shape.width,
            shape.position.y + shape.height,
        ),
    }
}

/// Axis-aligned bounds of a shape after applying its rotation.
pub fn element_bounds(shape: &Shape) -> Rect {
    let bbox = absolute_coords(shape);
    let center = bbox.center();
    if shape.angle == 0.0 {
        return Rect::new(bbox.x1, bbox.y1, bbox.x2, bbox.y2).abs();
    }

    match &shape.kind {
        ShapeKind::Ellipse => {
            let a = shape.width.abs() / 2.0;
            let b = shape.height.abs() / 2.0;
            let (sin, cos) = shape.angle.sin_cos();
            let w = ((a * cos).powi(2) + (b * sin).powi(2)).sqrt();
            let h = ((a * sin).powi(2) + (b * cos).powi(2)).sqrt();
            Rect::new(center.x - w, center.y - h, center.x + w, center.y + h)
        }
        ShapeKind::Diamond => {
            let origin = shape.position.to_vec2();
            bounds_of_rotated(
                diamond_points(shape).iter().map(|p| *p + origin),
                center,
                shape.angle,
            )
        }
        ShapeKind::Line(_) | ShapeKind::Arrow(_) | ShapeKind::Freehand(_) => {
            let origin = shape.position.to_vec2();
            let points = shape.points().unwrap_or_default();
            bounds_of_rotated(points.iter().map(|p| *p + origin), center, shape.angle)
        }
        _ => bounds_of_rotated(
            [
                Point::new(bbox.x1, bbox.y1),
                Point::new(bbox.x2, bbox.y1),
                Point::new(bbox.x2, bbox.y2),
                Point::new(bbox.x1, bbox.y2),
            ],
            center,
            shape.angle,
        ),
    }
}

fn bounds_of_rotated(points: impl IntoIterator<Item = Point>, pivot: Point, angle: f64) -> Rect {
    let rot = Affine::rotate_about(angle, pivot);
    let mut rect: Option<Rect> = None;
    for p in points {
        let p = rot * p;
        rect = Some(match rect {
            Some(r) => r.union_pt(p),
            None => Rect::from_points(p, p),
        });
    }
    rect.unwrap_or_else(|| Rect::from_points(pivot, pivot))
}

/// Union of the rotated bounds of several shapes.
pub fn common_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Option<Rect> {
    shapes
        .into_iter()
        .map(element_bounds)
        .reduce(|acc, r| acc.union(r))
}

/// Diamond vertices (top, right, bottom, left) relative to the shape position.
///
/// The top/bottom x and left/right y are nudged by one unit so that no vertex
/// pair collapses onto an axis for tiny diamonds.
pub fn diamond_points(shape: &Shape) -> [Point; 4] {
    let top_x = (shape.width / 2.0).floor() + 1.0;
    let right_y = (shape.height / 2.0).floor() + 1.0;
    [
        Point::new(top_x, 0.0),
        Point::new(shape.width, right_y),
        Point::new(top_x, shape.height),
        Point::new(0.0, right_y),
    ]
}

/// First and last vertex of a line or arrow, relative to the shape position.
pub fn line_points(shape: &Shape) -> Option<(Point, Point)> {
    let points = &shape.as_linear()?.points;
    Some((*points.first()?, *points.last()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_to_segment_dist() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-9);
        // Degenerate segment falls back to point distance
        assert!((point_to_segment_dist(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotate_point_quarter_turn() {
        let p = rotate_point(Point::new(10.0, 0.0), Point::ZERO, FRAC_PI_2);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute_coords_linear() {
        let arrow = Shape::arrow(
            Point::new(100.0, 100.0),
            vec![Point::ZERO, Point::new(-20.0, 50.0)],
        );
        let bbox = absolute_coords(&arrow);
        assert_eq!(bbox, BoundingBox::new(80.0, 100.0, 100.0, 150.0));
        assert!((bbox.cx - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalized_swaps_axes() {
        let bbox = BoundingBox::new(10.0, 10.0, 0.0, -5.0).normalized();
        assert!(bbox.x1 <= bbox.x2);
        assert!(bbox.y1 <= bbox.y2);
        assert!((bbox.cx - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_element_bounds_rotated_rectangle() {
        let rect = Shape::rectangle(Point::ZERO, 100.0, 50.0).with_angle(FRAC_PI_2);
        let bounds = element_bounds(&rect);
        assert!((bounds.width() - 50.0).abs() < 1e-9);
        assert!((bounds.height() - 100.0).abs() < 1e-9);
        assert!((bounds.center().x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_diamond_points() {
        let diamond = Shape::diamond(Point::new(5.0, 5.0), 100.0, 60.0);
        let [top, right, bottom, left] = diamond_points(&diamond);
        assert_eq!(top, Point::new(51.0, 0.0));
        assert_eq!(right, Point::new(100.0, 31.0));
        assert_eq!(bottom, Point::new(51.0, 60.0));
        assert_eq!(left, Point::new(0.0, 31.0));
    }

    #[test]
    fn test_common_bounds() {
        let a = Shape::rectangle(Point::ZERO, 10.0, 10.0);
        let b = Shape::rectangle(Point::new(20.0, -5.0), 10.0, 10.0);
        let bounds = common_bounds([&a, &b]).unwrap();
        assert_eq!(bounds, Rect::new(0.0, -5.0, 30.0, 10.0));
        assert!(common_bounds(std::iter::empty::<&Shape>()).is_none());
    }
}
