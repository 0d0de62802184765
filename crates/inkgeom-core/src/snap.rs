//! Snap records used to highlight transform handles.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Two points closer than this on both axes are considered the same point.
pub const SNAP_PRECISION: f64 = 1e-6;

/// A snap found by the snapping pass for the current drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Snap {
    /// A dragged point aligned with a reference point.
    Point {
        /// The dragged point and the reference it aligned with.
        points: [Point; 2],
    },
    /// Equal spacing between the dragged selection and a neighbour.
    Gap { start: Point, end: Point },
}

/// Collection of snaps for the current frame.
pub type Snaps = Vec<Snap>;

/// Check whether `point` coincides with either end of any point snap.
pub fn is_point_snapped(point: Point, snaps: &[Snap]) -> bool {
    snaps.iter().any(|snap| match snap {
        Snap::Point { points } => points.iter().any(|p| points_equal(*p, point)),
        Snap::Gap { .. } => false,
    })
}

fn points_equal(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < SNAP_PRECISION && (a.y - b.y).abs() < SNAP_PRECISION
}
