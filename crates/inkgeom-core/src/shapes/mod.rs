//! Shape definitions consumed by hit testing and handle generation.

mod linear;
mod text;

pub use linear::{Freehand, LinearShape};
pub use text::Text;

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::outline::StrokeOutline;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Background color (None = transparent).
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// Whether the background paints the interior of the shape.
    pub fn has_fill(&self) -> bool {
        self.fill().is_some_and(|c| c.components[3] > 0.0)
    }

    /// Background as a peniko Color, as the renderer paints it.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(Color::from)
    }

    /// Set the background from a peniko Color.
    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill_color = color.map(|c| c.into());
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::black(),
            stroke_width: 2.0,
            fill_color: None,
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Kind-specific payload of a shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    Diamond,
    Line(LinearShape),
    Arrow(LinearShape),
    Freehand(Freehand),
    Text(Text),
    /// The rubber-band marquee drawn while box-selecting.
    Selection,
}

impl ShapeKind {
    /// Short lowercase name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Line(_) => "line",
            ShapeKind::Arrow(_) => "arrow",
            ShapeKind::Freehand(_) => "freehand",
            ShapeKind::Text(_) => "text",
            ShapeKind::Selection => "selection",
        }
    }
}

/// One element of the drawing scene.
///
/// `position` is the local origin: the top-left corner for box-like kinds and
/// the first vertex for lines, arrows and freehand strokes (whose vertices are
/// stored relative to it). `angle` rotates the shape about its own center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation angle in radians (around center).
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub is_selected: bool,
    pub style: ShapeStyle,
    pub kind: ShapeKind,
}

impl Shape {
    /// Create a shape of the given kind with default style.
    pub fn new(kind: ShapeKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            angle: 0.0,
            locked: false,
            is_selected: false,
            style: ShapeStyle::default(),
            kind,
        }
    }

    pub fn rectangle(position: Point, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Rectangle, position, width, height)
    }

    pub fn ellipse(position: Point, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Ellipse, position, width, height)
    }

    pub fn diamond(position: Point, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Diamond, position, width, height)
    }

    pub fn selection(position: Point, width: f64, height: f64) -> Self {
        Self::new(ShapeKind::Selection, position, width, height)
    }

    /// Create a line; `points` are relative to `position`.
    pub fn line(position: Point, points: Vec<Point>) -> Self {
        let (width, height) = extent(&points);
        Self::new(ShapeKind::Line(LinearShape::new(points)), position, width, height)
    }

    /// Create an arrow; `points` are relative to `position`.
    pub fn arrow(position: Point, points: Vec<Point>) -> Self {
        let (width, height) = extent(&points);
        Self::new(ShapeKind::Arrow(LinearShape::new(points)), position, width, height)
    }

    /// Create a freehand stroke; `points` are relative to `position`.
    pub fn freehand(position: Point, points: Vec<Point>) -> Self {
        let (width, height) = extent(&points);
        Self::new(ShapeKind::Freehand(Freehand { points }), position, width, height)
    }

    pub fn text(position: Point, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self::new(ShapeKind::Text(Text::new(text)), position, width, height)
    }

    /// Get the unique identifier.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn with_fill(mut self, color: SerializableColor) -> Self {
        self.style.fill_color = Some(color);
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        self
    }

    /// Attach a precomputed stroke outline. Ignored for non-linear kinds.
    pub fn with_outline(mut self, outline: StrokeOutline) -> Self {
        if let Some(linear) = self.as_linear_mut() {
            linear.outline = Some(outline);
        }
        self
    }

    /// Vertices of a line or arrow.
    pub fn as_linear(&self) -> Option<&LinearShape> {
        match &self.kind {
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_linear_mut(&mut self) -> Option<&mut LinearShape> {
        match &mut self.kind {
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => Some(l),
            _ => None,
        }
    }

    /// Local vertices for lines, arrows and freehand strokes.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.kind {
            ShapeKind::Line(l) | ShapeKind::Arrow(l) => Some(&l.points),
            ShapeKind::Freehand(f) => Some(&f.points),
            _ => None,
        }
    }

    /// Check if this is a line or an arrow.
    pub fn is_linear(&self) -> bool {
        matches!(self.kind, ShapeKind::Line(_) | ShapeKind::Arrow(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ShapeKind::Text(_))
    }

    /// Text bound inside a container shape.
    pub fn is_bound_to_container(&self) -> bool {
        matches!(&self.kind, ShapeKind::Text(t) if t.container_id.is_some())
    }
}

fn extent(points: &[Point]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let (min_x, max_x) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(mn, mx), p| (mn.min(p.x), mx.max(p.x)));
    let (min_y, max_y) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(mn, mx), p| (mn.min(p.y), mx.max(p.y)));
    (max_x - min_x, max_y - min_y)
}
