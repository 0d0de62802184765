//! Resize and rotate handles for the current selection.
//!
//! Handles are rebuilt from scratch whenever the selection, zoom or pointer
//! device changes. They keep a constant on-screen size, so every distance here
//! is divided by the zoom factor.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{BoundingBox, absolute_coords, common_bounds, rotate_point};
use crate::selection::InteractionState;
use crate::shapes::{Shape, ShapeKind};
use crate::snap::{Snap, is_point_snapped};

/// Visual gap between a shape and its dashed selection outline.
pub const DEFAULT_SPACING: f64 = 2.0;

/// Extra gap between the n handle and the rotation handle.
const ROTATION_RESIZE_HANDLE_GAP: f64 = 16.0;

/// Extra outline margin for lines and arrows.
const LINEAR_EXTRA_SPACING: f64 = 8.0;

/// Input device class, selecting the physical handle size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerType {
    /// Handle side length in screen pixels.
    pub fn handle_size(self) -> f64 {
        match self {
            PointerType::Mouse => 8.0,
            PointerType::Pen => 16.0,
            PointerType::Touch => 28.0,
        }
    }
}

/// Canvas zoom factor. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom(f64);

impl Zoom {
    pub fn new(value: f64) -> GeometryResult<Self> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(GeometryError::InvalidZoom(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Which handle of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformHandleType {
    Nw,
    Ne,
    Sw,
    Se,
    Rotation,
    N,
    S,
    W,
    E,
}

impl TransformHandleType {
    /// All handle types, in lookup order.
    pub const ALL: [TransformHandleType; 9] = [
        TransformHandleType::Nw,
        TransformHandleType::Ne,
        TransformHandleType::Sw,
        TransformHandleType::Se,
        TransformHandleType::Rotation,
        TransformHandleType::N,
        TransformHandleType::S,
        TransformHandleType::W,
        TransformHandleType::E,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Cardinal edge handles (n, s, w, e).
    pub fn is_edge(self) -> bool {
        matches!(
            self,
            TransformHandleType::N
                | TransformHandleType::S
                | TransformHandleType::W
                | TransformHandleType::E
        )
    }
}

/// One handle rectangle in absolute canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformHandle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Drawn emphasized because its anchor is currently snapped.
    pub highlighted: bool,
}

impl TransformHandle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Set of handle types to leave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OmitSides(u16);

impl OmitSides {
    pub const NONE: OmitSides = OmitSides(0);

    pub const fn with(self, handle: TransformHandleType) -> Self {
        Self(self.0 | 1 << handle.index())
    }

    pub fn contains(self, handle: TransformHandleType) -> bool {
        self.0 & (1 << handle.index()) != 0
    }

    const fn edges() -> Self {
        Self::NONE
            .with(TransformHandleType::N)
            .with(TransformHandleType::S)
            .with(TransformHandleType::W)
            .with(TransformHandleType::E)
    }
}

pub const OMIT_SIDES_FOR_MULTIPLE_ELEMENTS: OmitSides = OmitSides::edges();
pub const OMIT_SIDES_FOR_TEXT_ELEMENT: OmitSides = OmitSides::edges();
pub const OMIT_SIDES_FOR_LINE_SLASH: OmitSides = OmitSides::edges()
    .with(TransformHandleType::Nw)
    .with(TransformHandleType::Se);
pub const OMIT_SIDES_FOR_LINE_BACKSLASH: OmitSides = OmitSides::edges();

/// Handles produced for a selection; absent handle types are left out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformHandles {
    handles: [Option<TransformHandle>; 9],
}

impl TransformHandles {
    pub fn get(&self, handle: TransformHandleType) -> Option<&TransformHandle> {
        self.handles[handle.index()].as_ref()
    }

    pub fn contains(&self, handle: TransformHandleType) -> bool {
        self.handles[handle.index()].is_some()
    }

    fn insert(&mut self, kind: TransformHandleType, handle: TransformHandle) {
        self.handles[kind.index()] = Some(handle);
    }

    pub fn is_empty(&self) -> bool {
        self.handles.iter().all(Option::is_none)
    }

    pub fn len(&self) -> usize {
        self.handles.iter().filter(|h| h.is_some()).count()
    }

    /// Present handles in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = (TransformHandleType, &TransformHandle)> {
        TransformHandleType::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|h| (kind, h)))
    }
}

/// Build handles around `bbox`, rotated by `angle` about the box center.
///
/// `margin` is the screen-space gap between the box and the dashed outline the
/// handles sit on. Edge handles appear only when the matching dimension is
/// strictly larger than five mouse handles.
pub fn get_transform_handles_from_coords(
    bbox: BoundingBox,
    angle: f64,
    zoom: Zoom,
    pointer_type: PointerType,
    omit_sides: OmitSides,
    margin: f64,
    snaps: Option<&[Snap]>,
) -> TransformHandles {
    let zoom = zoom.value();
    let size = pointer_type.handle_size();
    let handle_width = size / zoom;
    let handle_height = size / zoom;

    let handle_margin_x = size / zoom;
    let handle_margin_y = size / zoom;

    let BoundingBox { x1, y1, x2, y2, .. } = bbox;
    let width = x2 - x1;
    let height = y2 - y1;
    let dashed_line_margin = margin / zoom;
    let centering_offset = (size - DEFAULT_SPACING * 2.0) / (2.0 * zoom);

    let center = bbox.center();
    let snaps = snaps.unwrap_or_default();

    let generate = |anchor: Point, offset: Vec2, highlighted: Option<bool>| {
        let highlighted = highlighted
            .unwrap_or_else(|| is_point_snapped(rotate_point(anchor, center, angle), snaps));
        let c = rotate_point(
            anchor + offset + Vec2::new(handle_width / 2.0, handle_height / 2.0),
            center,
            angle,
        );
        TransformHandle {
            x: c.x - handle_width / 2.0,
            y: c.y - handle_height / 2.0,
            width: handle_width,
            height: handle_height,
            highlighted,
        }
    };

    let top_offset = centering_offset - dashed_line_margin - handle_margin_y;
    let left_offset = centering_offset - dashed_line_margin - handle_margin_x;
    let far_offset = dashed_line_margin - centering_offset;

    let mut handles = TransformHandles::default();
    let corners = [
        (TransformHandleType::Nw, Point::new(x1, y1), Vec2::new(left_offset, top_offset)),
        (TransformHandleType::Ne, Point::new(x2, y1), Vec2::new(far_offset, top_offset)),
        (TransformHandleType::Sw, Point::new(x1, y2), Vec2::new(left_offset, far_offset)),
        (TransformHandleType::Se, Point::new(x2, y2), Vec2::new(far_offset, far_offset)),
    ];
    for (kind, anchor, offset) in corners {
        if !omit_sides.contains(kind) {
            handles.insert(kind, generate(anchor, offset, None));
        }
    }

    if !omit_sides.contains(TransformHandleType::Rotation) {
        handles.insert(
            TransformHandleType::Rotation,
            generate(
                Point::new(x1 + width / 2.0, y1),
                Vec2::new(
                    -handle_width / 2.0,
                    top_offset - ROTATION_RESIZE_HANDLE_GAP / zoom,
                ),
                Some(false),
            ),
        );
    }

    // Handles render at mouse size, so the size gate uses it too.
    let minimum_size_for_eight_handles = (5.0 * PointerType::Mouse.handle_size()) / zoom;
    let mut edges = Vec::with_capacity(4);
    if width.abs() > minimum_size_for_eight_handles {
        edges.push((
            TransformHandleType::N,
            Point::new(x1 + width / 2.0, y1),
            Vec2::new(-handle_width / 2.0, top_offset),
        ));
        edges.push((
            TransformHandleType::S,
            Point::new(x1 + width / 2.0, y2),
            Vec2::new(-handle_width / 2.0, far_offset),
        ));
    }
    if height.abs() > minimum_size_for_eight_handles {
        edges.push((
            TransformHandleType::W,
            Point::new(x1, y1 + height / 2.0),
            Vec2::new(left_offset, -handle_height / 2.0),
        ));
        edges.push((
            TransformHandleType::E,
            Point::new(x2, y1 + height / 2.0),
            Vec2::new(far_offset, -handle_height / 2.0),
        ));
    }
    for (kind, anchor, offset) in edges {
        if !omit_sides.contains(kind) {
            handles.insert(kind, generate(anchor, offset, None));
        }
    }

    handles
}

/// Handle types a single shape never shows.
///
/// A two-point line or arrow keeps only the corners that do not sit on top of
/// the segment itself; text resizes by font scale, so it has no edge handles.
pub fn omit_sides_for_shape(shape: &Shape) -> OmitSides {
    match &shape.kind {
        ShapeKind::Line(_) | ShapeKind::Arrow(_) | ShapeKind::Freehand(_) => {
            match shape.points() {
                // The first point is always the origin, so the slope is the last point's.
                Some([_, end]) => {
                    let omit = if end.x == 0.0 || end.y == 0.0 {
                        OMIT_SIDES_FOR_LINE_BACKSLASH
                    } else if (end.x > 0.0) != (end.y > 0.0) {
                        OMIT_SIDES_FOR_LINE_SLASH
                    } else {
                        OMIT_SIDES_FOR_LINE_BACKSLASH
                    };
                    log::debug!(
                        "Two-point {} {} uses {} handle set",
                        shape.kind.name(),
                        shape.id(),
                        if omit == OMIT_SIDES_FOR_LINE_SLASH { "slash" } else { "backslash" }
                    );
                    omit
                }
                _ => OmitSides::NONE,
            }
        }
        ShapeKind::Text(_) => OMIT_SIDES_FOR_TEXT_ELEMENT,
        _ => OmitSides::NONE,
    }
}

/// Handles for a single shape. Locked shapes get none.
pub fn get_transform_handles(
    shape: &Shape,
    zoom: Zoom,
    pointer_type: PointerType,
    snaps: Option<&[Snap]>,
) -> TransformHandles {
    // A locked shape shows no handles so it reads as not resizable.
    if shape.locked {
        return TransformHandles::default();
    }

    let margin = if shape.is_linear() {
        DEFAULT_SPACING + LINEAR_EXTRA_SPACING
    } else {
        DEFAULT_SPACING
    };
    get_transform_handles_from_coords(
        absolute_coords(shape).normalized(),
        shape.angle,
        zoom,
        pointer_type,
        omit_sides_for_shape(shape),
        margin,
        snaps,
    )
}

/// Handles for a whole selection.
///
/// One shape delegates to [`get_transform_handles`]; several shapes share an
/// unrotated box around their common bounds with corners and rotation only.
pub fn get_transform_handles_for_selection(
    shapes: &[Shape],
    zoom: Zoom,
    pointer_type: PointerType,
    snaps: Option<&[Snap]>,
) -> TransformHandles {
    match shapes {
        [] => TransformHandles::default(),
        [shape] => get_transform_handles(shape, zoom, pointer_type, snaps),
        _ if shapes.iter().all(|s| s.locked) => TransformHandles::default(),
        _ => match common_bounds(shapes) {
            Some(bounds) => get_transform_handles_from_coords(
                BoundingBox::from_rect(bounds),
                0.0,
                zoom,
                pointer_type,
                OMIT_SIDES_FOR_MULTIPLE_ELEMENTS,
                DEFAULT_SPACING,
                snaps,
            ),
            None => TransformHandles::default(),
        },
    }
}

/// First handle, in lookup order, whose rectangle contains `point`.
pub fn transform_handle_at(
    handles: &TransformHandles,
    point: Point,
) -> Option<TransformHandleType> {
    handles
        .iter()
        .find(|(_, handle)| handle.contains(point))
        .map(|(kind, _)| kind)
}

/// Whether the dashed bounding box is drawn around the selection.
///
/// Hidden while a line is being point-edited and for a lone two-point line or
/// arrow, which is its own outline.
pub fn should_show_bounding_box(shapes: &[Shape], state: &InteractionState) -> bool {
    if state.editing_linear_element.is_some() {
        return false;
    }
    match shapes {
        [shape] => shape.as_linear().is_none_or(|l| l.points.len() > 2),
        _ => true,
    }
}
