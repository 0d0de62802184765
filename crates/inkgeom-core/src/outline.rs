//! Sketchy stroke outlines and point membership against them.
//!
//! The renderer turns a line or arrow into a hand-drawn outline made of a few
//! path segments (the shaft followed by the two arrowhead strokes). The core
//! never builds these; it only reads them to decide whether the pointer sits
//! on the drawn ink.

use kurbo::{BezPath, PathEl, Point};

/// Maximum per-axis distance between the query and the sampled curve.
pub const BEZIER_EPSILON: f64 = 3.0;

/// Parameter increment used when sampling a cubic curve.
const BEZIER_STEP: f64 = 0.01;

/// Precomputed outline of a linear shape, in shape-local coordinates.
#[derive(Debug, Clone, Default)]
pub struct StrokeOutline {
    segments: Vec<BezPath>,
}

impl StrokeOutline {
    pub fn new(segments: Vec<BezPath>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[BezPath] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl From<Vec<BezPath>> for StrokeOutline {
    fn from(segments: Vec<BezPath>) -> Self {
        Self::new(segments)
    }
}

/// Check whether `point` lies on one drawn segment of a sketchy outline.
///
/// Only cubic curves are evaluated. Straight and quadratic elements are
/// recognized but never match, and they do not advance the running start
/// point.
pub fn hit_test_sketchy_path(path: &BezPath, point: Point) -> bool {
    let mut p0 = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => p0 = p,
            PathEl::CurveTo(p1, p2, p3) => {
                let hit = point_in_bezier_equation(p0.x, p1.x, p2.x, p3.x, point.x)
                    && point_in_bezier_equation(p0.y, p1.y, p2.y, p3.y, point.y);
                p0 = p3;
                if hit {
                    return true;
                }
            }
            // TODO: evaluate straight and quadratic segments, they never match yet.
            PathEl::LineTo(_) | PathEl::QuadTo(_, _) | PathEl::ClosePath => {}
        }
    }
    false
}

/// Sample one axis of a cubic curve and report whether any sample lands
/// within [`BEZIER_EPSILON`] of `m`.
///
/// The curve is walked from its end (`t = 0` yields `p3`) back to its start.
fn point_in_bezier_equation(p0: f64, p1: f64, p2: f64, p3: f64, m: f64) -> bool {
    let equation = |t: f64| {
        (1.0 - t).powi(3) * p3
            + 3.0 * t * (1.0 - t).powi(2) * p2
            + 3.0 * t.powi(2) * (1.0 - t) * p1
            + p0 * t.powi(3)
    };

    let mut t = 0.0;
    while t <= 1.0 {
        if (m - equation(t)).abs() < BEZIER_EPSILON {
            return true;
        }
        t += BEZIER_STEP;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_curve(from: Point, to: Point) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(from);
        path.curve_to(from.lerp(to, 1.0 / 3.0), from.lerp(to, 2.0 / 3.0), to);
        path
    }

    #[test]
    fn test_bezier_axis_sampling() {
        assert!(point_in_bezier_equation(0.0, 33.0, 66.0, 100.0, 50.0));
        assert!(point_in_bezier_equation(0.0, 0.0, 0.0, 0.0, 2.0));
        assert!(!point_in_bezier_equation(0.0, 0.0, 0.0, 0.0, 5.0));
    }

    #[test]
    fn test_point_on_curve() {
        let path = straight_curve(Point::ZERO, Point::new(100.0, 0.0));
        assert!(hit_test_sketchy_path(&path, Point::new(50.0, 0.0)));
        assert!(hit_test_sketchy_path(&path, Point::new(50.0, 2.0)));
        assert!(!hit_test_sketchy_path(&path, Point::new(50.0, 10.0)));
        assert!(!hit_test_sketchy_path(&path, Point::new(120.0, 0.0)));
    }

    #[test]
    fn test_axes_are_tested_independently() {
        // Off the diagonal, but each coordinate alone is reached by some t.
        let path = straight_curve(Point::ZERO, Point::new(100.0, 100.0));
        assert!(hit_test_sketchy_path(&path, Point::new(90.0, 10.0)));
    }

    #[test]
    fn test_start_point_follows_previous_curve() {
        let mut path = straight_curve(Point::ZERO, Point::new(100.0, 0.0));
        path.curve_to(
            Point::new(100.0, 33.0),
            Point::new(100.0, 66.0),
            Point::new(100.0, 100.0),
        );
        assert!(hit_test_sketchy_path(&path, Point::new(100.0, 50.0)));
        // Would match if the second curve still started at the origin.
        assert!(!hit_test_sketchy_path(&path, Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_straight_segments_never_match() {
        let mut path = BezPath::new();
        path.move_to(Point::ZERO);
        path.line_to(Point::new(100.0, 0.0));
        path.quad_to(Point::new(150.0, 0.0), Point::new(200.0, 0.0));
        assert!(!hit_test_sketchy_path(&path, Point::new(50.0, 0.0)));
        assert!(!hit_test_sketchy_path(&path, Point::new(150.0, 0.0)));
    }
}
