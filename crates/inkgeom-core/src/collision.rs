//! Point-versus-shape hit testing.
//!
//! Every test runs in the shape's unrotated frame: callers either undo the
//! shape rotation first or pass the query through [`to_shape_space`].

use kurbo::{Point, Vec2};

use crate::config::InteractionConfig;
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{
    absolute_coords, diamond_points, line_points, point_to_segment_dist, rotate_point,
};
use crate::outline::hit_test_sketchy_path;
use crate::shapes::{Shape, ShapeKind};

/// Distance within which a point counts as touching an edge.
pub const LINE_THRESHOLD: f64 = 10.0;

/// Refinement passes for the nearest point on an ellipse.
const ELLIPSE_ITERATIONS: usize = 4;

/// Starting parametric direction, roughly the diagonal.
const ELLIPSE_INITIAL_GUESS: f64 = 0.707;

/// Outline segments an arrow needs before it can be hit: shaft and two head strokes.
const ARROW_OUTLINE_SEGMENTS: usize = 3;

/// Filled or selected shapes accept hits anywhere inside, not only near the border.
pub fn is_draggable_from_inside(shape: &Shape) -> bool {
    shape.style.has_fill() || shape.is_selected
}

/// Check whether `point` is on or inside `shape`, using the default threshold.
pub fn hit_test(shape: &Shape, point: Point) -> GeometryResult<bool> {
    hit_test_with(shape, point, &InteractionConfig::default())
}

/// Check whether `point` is on or inside `shape`.
///
/// Returns [`GeometryError::UnsupportedShapeKind`] for kinds the engine has no
/// algorithm for. A selection marquee is never hit.
pub fn hit_test_with(
    shape: &Shape,
    point: Point,
    config: &InteractionConfig,
) -> GeometryResult<bool> {
    let threshold = config.line_threshold;

    let hit = match &shape.kind {
        ShapeKind::Rectangle => !is_zero_size(shape) && hit_rectangle(shape, point, threshold),
        ShapeKind::Ellipse => !is_zero_size(shape) && hit_ellipse(shape, point, threshold),
        ShapeKind::Diamond => !is_zero_size(shape) && hit_diamond(shape, point, threshold),
        ShapeKind::Line(_) => !has_coincident_points(shape) && hit_line(shape, point, threshold),
        ShapeKind::Arrow(_) => !has_coincident_points(shape) && hit_arrow(shape, point),
        ShapeKind::Text(_) => {
            !is_zero_size(shape) && absolute_coords(shape).normalized().contains(point)
        }
        ShapeKind::Selection => {
            log::warn!("Hit test reached selection marquee {}; treating as a miss", shape.id());
            false
        }
        ShapeKind::Freehand(_) => {
            return Err(GeometryError::UnsupportedShapeKind(shape.kind.name().to_string()));
        }
    };
    Ok(hit)
}

/// Map an absolute point into the unrotated frame of `shape`.
pub fn to_shape_space(shape: &Shape, point: Point) -> Point {
    if shape.angle == 0.0 {
        return point;
    }
    rotate_point(point, absolute_coords(shape).center(), -shape.angle)
}

fn is_zero_size(shape: &Shape) -> bool {
    shape.width == 0.0 && shape.height == 0.0
}

fn has_coincident_points(shape: &Shape) -> bool {
    match shape.points() {
        Some([first, rest @ ..]) => rest.iter().all(|p| p == first),
        _ => true,
    }
}

fn hit_rectangle(shape: &Shape, point: Point, threshold: f64) -> bool {
    let b = absolute_coords(shape).normalized();

    if is_draggable_from_inside(shape) {
        return point.x > b.x1 - threshold
            && point.x < b.x2 + threshold
            && point.y > b.y1 - threshold
            && point.y < b.y2 + threshold;
    }

    // (x1, y1) --A-- (x2, y1)
    //    |D             |B
    // (x1, y2) --C-- (x2, y2)
    let tl = Point::new(b.x1, b.y1);
    let tr = Point::new(b.x2, b.y1);
    let br = Point::new(b.x2, b.y2);
    let bl = Point::new(b.x1, b.y2);
    [(tl, tr), (tr, br), (br, bl), (bl, tl)]
        .iter()
        .any(|&(p, q)| point_to_segment_dist(point, p, q) < threshold)
}

fn hit_ellipse(shape: &Shape, point: Point, threshold: f64) -> bool {
    let a = shape.width.abs() / 2.0;
    let b = shape.height.abs() / 2.0;
    let center = shape.position + Vec2::new(shape.width / 2.0, shape.height / 2.0);

    if a < f64::EPSILON || b < f64::EPSILON {
        // Flattened to a segment along the remaining axis.
        let half = Vec2::new(a, b);
        return point_to_segment_dist(point, center - half, center + half) < threshold;
    }

    let px = (point.x - center.x).abs();
    let py = (point.y - center.y).abs();
    let nearest = nearest_point_on_ellipse(a, b, Point::new(px, py));

    if is_draggable_from_inside(shape) {
        nearest.x - (px - threshold) >= 0.0 && nearest.y - (py - threshold) >= 0.0
    } else {
        (nearest.x - px).hypot(nearest.y - py) < threshold
    }
}

/// Nearest point on the boundary of an axis-aligned ellipse centered at the
/// origin, for a query in the first quadrant.
///
/// Runs a fixed number of evolute-based corrections on the parametric
/// direction `(tx, ty)`, starting from the diagonal. `a` and `b` must be
/// positive.
pub fn nearest_point_on_ellipse(a: f64, b: f64, query: Point) -> Point {
    let (px, py) = (query.x, query.y);
    let mut tx = ELLIPSE_INITIAL_GUESS;
    let mut ty = ELLIPSE_INITIAL_GUESS;

    for _ in 0..ELLIPSE_ITERATIONS {
        let xx = a * tx;
        let yy = b * ty;

        let ex = ((a * a - b * b) * tx.powi(3)) / a;
        let ey = ((b * b - a * a) * ty.powi(3)) / b;

        let rx = xx - ex;
        let ry = yy - ey;
        let qx = px - ex;
        let qy = py - ey;

        let r = ry.hypot(rx);
        let q = qy.hypot(qx);
        if q < f64::EPSILON {
            // Query sits on the evolute point; no direction to correct along.
            continue;
        }

        tx = (((qx * r) / q + ex) / a).clamp(0.0, 1.0);
        ty = (((qy * r) / q + ey) / b).clamp(0.0, 1.0);
        let t = ty.hypot(tx);
        if t < f64::EPSILON {
            continue;
        }
        tx /= t;
        ty /= t;
    }

    Point::new(a * tx, b * ty)
}

fn hit_diamond(shape: &Shape, point: Point, threshold: f64) -> bool {
    let local = point - shape.position.to_vec2();
    let (x, y) = (local.x, local.y);
    let [top, right, bottom, left] = diamond_points(shape);

    if is_draggable_from_inside(shape) {
        let (top_x, right_y, bottom_x, left_y) = (top.x, right.y, bottom.x, left.y);
        let (mut top_y, mut bottom_y) = (top.y, bottom.y);
        let (mut left_x, mut right_x) = (left.x, right.x);
        if top_y > bottom_y {
            std::mem::swap(&mut top_y, &mut bottom_y);
        }
        if right_x < left_x {
            std::mem::swap(&mut left_x, &mut right_x);
        }

        top_y -= threshold;
        bottom_y += threshold;
        left_x -= threshold;
        right_x += threshold;

        // Each delta must be <= 0; a positive one is on the outer side of that edge.
        //
        //            (top)
        //        D  /     \  A
        //    (left)         (right)
        //        C  \     /  B
        //           (bottom)
        let d = (left_x - top_x) * (y - left_y) - (left_x - x) * (top_y - left_y);
        let a = (top_x - right_x) * (y - right_y) - (x - right_x) * (top_y - right_y);
        let b = (right_x - bottom_x) * (y - bottom_y) - (x - bottom_x) * (right_y - bottom_y);
        let c = (bottom_x - left_x) * (y - left_y) - (x - left_x) * (bottom_y - left_y);
        return d <= 0.0 && a <= 0.0 && b <= 0.0 && c <= 0.0;
    }

    [(top, right), (right, bottom), (bottom, left), (left, top)]
        .iter()
        .any(|&(p, q)| point_to_segment_dist(local, p, q) < threshold)
}

fn hit_line(shape: &Shape, point: Point, threshold: f64) -> bool {
    let Some((start, end)) = line_points(shape) else {
        return false;
    };
    let local = point - shape.position.to_vec2();
    point_to_segment_dist(local, start, end) < threshold
}

fn hit_arrow(shape: &Shape, point: Point) -> bool {
    let outline = match shape.as_linear().and_then(|l| l.outline.as_ref()) {
        Some(outline) if outline.len() >= ARROW_OUTLINE_SEGMENTS => outline,
        _ => {
            log::trace!("Arrow {} has no usable outline yet", shape.id());
            return false;
        }
    };

    let local = point - shape.position.to_vec2();
    outline.segments()[..ARROW_OUTLINE_SEGMENTS]
        .iter()
        .any(|segment| hit_test_sketchy_path(segment, local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::StrokeOutline;
    use crate::shapes::SerializableColor;
    use kurbo::BezPath;
    use std::f64::consts::FRAC_PI_2;

    fn red() -> SerializableColor {
        SerializableColor::new(255, 0, 0, 255)
    }

    fn hit(shape: &Shape, x: f64, y: f64) -> bool {
        hit_test(shape, Point::new(x, y)).unwrap()
    }

    fn curve(from: Point, to: Point) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(from);
        path.curve_to(from.lerp(to, 1.0 / 3.0), from.lerp(to, 2.0 / 3.0), to);
        path
    }

    fn arrow_with_outline() -> Shape {
        // Shaft from (0,0) to (100,0), head strokes back to (90,-5) and (90,5).
        let tip = Point::new(100.0, 0.0);
        Shape::arrow(Point::new(50.0, 50.0), vec![Point::ZERO, tip]).with_outline(
            StrokeOutline::new(vec![
                curve(Point::ZERO, tip),
                curve(tip, Point::new(90.0, -5.0)),
                curve(tip, Point::new(90.0, 5.0)),
            ]),
        )
    }

    #[test]
    fn test_filled_rectangle() {
        let rect = Shape::rectangle(Point::ZERO, 10.0, 10.0).with_fill(red());
        assert!(hit(&rect, 5.0, 5.0));
        assert!(hit(&rect, 19.0, 5.0));
        assert!(!hit(&rect, 20.0, 5.0));
        assert!(!hit(&rect, 25.0, 25.0));
    }

    #[test]
    fn test_outlined_rectangle_ignores_interior() {
        let rect = Shape::rectangle(Point::ZERO, 100.0, 100.0);
        assert!(hit(&rect, 0.0, 50.0));
        assert!(hit(&rect, 95.0, 50.0));
        assert!(hit(&rect, 50.0, -9.0));
        assert!(!hit(&rect, 50.0, 50.0));
        assert!(!hit(&rect, 50.0, -11.0));
    }

    #[test]
    fn test_selected_rectangle_is_draggable_from_inside() {
        let rect = Shape::rectangle(Point::ZERO, 100.0, 100.0).with_selected(true);
        assert!(is_draggable_from_inside(&rect));
        assert!(hit(&rect, 50.0, 50.0));
    }

    #[test]
    fn test_flipped_rectangle_is_normalized() {
        let rect = Shape::rectangle(Point::new(100.0, 100.0), -100.0, -100.0).with_fill(red());
        assert!(hit(&rect, 50.0, 50.0));
    }

    #[test]
    fn test_outlined_ellipse() {
        let ellipse = Shape::ellipse(Point::ZERO, 100.0, 60.0);
        assert!(hit(&ellipse, 100.0, 30.0));
        assert!(hit(&ellipse, 0.0, 30.0));
        assert!(hit(&ellipse, 50.0, -5.0));
        assert!(hit(&ellipse, 85.0, 55.0));
        assert!(!hit(&ellipse, 50.0, 30.0));
        assert!(!hit(&ellipse, 115.0, 30.0));
        assert!(!hit(&ellipse, 50.0, -15.0));
    }

    #[test]
    fn test_filled_ellipse() {
        let ellipse = Shape::ellipse(Point::ZERO, 100.0, 60.0).with_fill(red());
        assert!(hit(&ellipse, 50.0, 30.0));
        assert!(hit(&ellipse, 105.0, 30.0));
        assert!(!hit(&ellipse, 115.0, 30.0));
        assert!(!hit(&ellipse, 50.0, 75.0));
    }

    #[test]
    fn test_circle_center_is_stable() {
        let circle = Shape::ellipse(Point::ZERO, 100.0, 100.0);
        assert!(!hit(&circle, 50.0, 50.0));
        let filled = circle.with_fill(red());
        assert!(hit(&filled, 50.0, 50.0));
    }

    #[test]
    fn test_nearest_point_on_circle() {
        let p = nearest_point_on_ellipse(10.0, 10.0, Point::new(30.0, 40.0));
        assert!((p.x - 6.0).abs() < 1e-6);
        assert!((p.y - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_ellipse_acts_as_segment() {
        let ellipse = Shape::ellipse(Point::ZERO, 100.0, 0.0);
        assert!(hit(&ellipse, 50.0, 5.0));
        assert!(!hit(&ellipse, 50.0, 15.0));
    }

    #[test]
    fn test_diamond_vertices_hit_when_outlined() {
        let diamond = Shape::diamond(Point::new(20.0, 20.0), 100.0, 60.0);
        for vertex in diamond_points(&diamond) {
            let p = vertex + diamond.position.to_vec2();
            assert!(hit(&diamond, p.x, p.y), "vertex {p:?} should hit");
        }
        assert!(!hit(&diamond, 70.0, 50.0));
    }

    #[test]
    fn test_filled_diamond() {
        let diamond = Shape::diamond(Point::ZERO, 100.0, 60.0).with_fill(red());
        assert!(hit(&diamond, 50.0, 30.0));
        assert!(hit(&diamond, 51.0, -5.0));
        assert!(hit(&diamond, 105.0, 31.0));
        assert!(!hit(&diamond, 51.0, -15.0));
        assert!(!hit(&diamond, 115.0, 31.0));
        // Corner of the bounding box lies outside the diamond.
        assert!(!hit(&diamond, 5.0, 5.0));
    }

    #[test]
    fn test_line() {
        let line = Shape::line(Point::new(10.0, 10.0), vec![Point::ZERO, Point::new(100.0, 0.0)]);
        assert!(hit(&line, 60.0, 15.0));
        assert!(!hit(&line, 60.0, 25.0));
        assert!(!hit(&line, 125.0, 10.0));
    }

    #[test]
    fn test_arrow_uses_outline() {
        let arrow = arrow_with_outline();
        assert!(hit(&arrow, 100.0, 50.0));
        assert!(hit(&arrow, 145.0, 52.0));
        assert!(!hit(&arrow, 100.0, 70.0));
    }

    #[test]
    fn test_arrow_without_outline_never_hits() {
        let arrow = Shape::arrow(Point::ZERO, vec![Point::ZERO, Point::new(100.0, 0.0)]);
        assert!(!hit(&arrow, 50.0, 0.0));

        let short = arrow.with_outline(StrokeOutline::new(vec![curve(
            Point::ZERO,
            Point::new(100.0, 0.0),
        )]));
        assert!(!hit(&short, 50.0, 0.0));
    }

    #[test]
    fn test_text_is_plain_box() {
        let text = Shape::text(Point::new(10.0, 10.0), 50.0, 20.0, "hello");
        assert!(hit(&text, 10.0, 10.0));
        assert!(hit(&text, 35.0, 20.0));
        assert!(!hit(&text, 61.0, 20.0));
    }

    #[test]
    fn test_selection_marquee_is_a_miss() {
        let marquee = Shape::selection(Point::ZERO, 100.0, 100.0);
        assert!(!hit(&marquee, 50.0, 50.0));
    }

    #[test]
    fn test_freehand_is_unsupported() {
        let stroke = Shape::freehand(Point::ZERO, vec![Point::ZERO, Point::new(10.0, 10.0)]);
        let err = hit_test(&stroke, Point::new(5.0, 5.0)).unwrap_err();
        assert!(matches!(err, GeometryError::UnsupportedShapeKind(ref k) if k == "freehand"));
    }

    #[test]
    fn test_zero_size_shapes_never_hit() {
        let filled = red();
        for shape in [
            Shape::rectangle(Point::ZERO, 0.0, 0.0).with_fill(filled),
            Shape::ellipse(Point::ZERO, 0.0, 0.0).with_fill(filled),
            Shape::diamond(Point::ZERO, 0.0, 0.0).with_fill(filled),
            Shape::text(Point::ZERO, 0.0, 0.0, ""),
            Shape::line(Point::ZERO, vec![Point::ZERO, Point::ZERO]),
        ] {
            assert!(!hit(&shape, 0.0, 0.0), "{} should not hit", shape.kind.name());
        }
    }

    #[test]
    fn test_custom_threshold() {
        let rect = Shape::rectangle(Point::ZERO, 100.0, 100.0);
        let config = InteractionConfig {
            line_threshold: 2.0,
            ..Default::default()
        };
        assert!(!hit_test_with(&rect, Point::new(50.0, 5.0), &config).unwrap());
        assert!(hit_test_with(&rect, Point::new(50.0, 1.0), &config).unwrap());
    }

    #[test]
    fn test_to_shape_space_undoes_rotation() {
        let rect = Shape::rectangle(Point::ZERO, 100.0, 20.0).with_angle(FRAC_PI_2);
        // After a quarter turn about (50, 10) the top edge sits at x = 60.
        let local = to_shape_space(&rect, Point::new(60.0, 10.0));
        assert!((local.x - 50.0).abs() < 1e-9);
        assert!(local.y.abs() < 1e-9);
        assert!(hit_test(&rect, local).unwrap());
    }
}
