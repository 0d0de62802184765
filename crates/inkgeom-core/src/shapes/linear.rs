//! Vertex-based shapes: lines, arrows and freehand strokes.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::outline::StrokeOutline;

/// Payload of a line or arrow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearShape {
    /// Vertices relative to the shape position. The first one sits at the origin.
    pub points: Vec<Point>,
    /// Sketchy outline produced by the renderer, if it has run yet.
    #[serde(skip)]
    pub outline: Option<StrokeOutline>,
}

impl LinearShape {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            outline: None,
        }
    }
}

/// Payload of a freehand stroke.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Freehand {
    /// Sampled pointer positions relative to the shape position.
    pub points: Vec<Point>,
}
