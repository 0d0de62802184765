//! Text shape payload.

use serde::{Deserialize, Serialize};

use super::ShapeId;

/// Text content. Its box is given by the owning shape's width and height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Container the text is bound to, if any.
    #[serde(default)]
    pub container_id: Option<ShapeId>,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 20.0;

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            container_id: None,
        }
    }
}
