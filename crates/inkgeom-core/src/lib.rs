//! InkGeom Core Library
//!
//! Pointer hit testing and transform-handle layout for a sketch-style
//! whiteboard. Rendering and event handling live elsewhere; this crate only
//! answers "what is under the pointer" and "where do the handles go".

pub mod collision;
pub mod config;
pub mod error;
pub mod geometry;
pub mod handles;
pub mod outline;
pub mod selection;
pub mod shapes;
pub mod snap;

pub use collision::{
    LINE_THRESHOLD, hit_test, hit_test_with, is_draggable_from_inside, nearest_point_on_ellipse,
};
pub use config::InteractionConfig;
pub use error::{GeometryError, GeometryResult};
pub use geometry::{BoundingBox, absolute_coords, common_bounds, element_bounds};
pub use handles::{
    DEFAULT_SPACING, OmitSides, PointerType, TransformHandle, TransformHandleType,
    TransformHandles, Zoom, get_transform_handles, get_transform_handles_for_selection,
    get_transform_handles_from_coords, should_show_bounding_box, transform_handle_at,
};
pub use outline::{StrokeOutline, hit_test_sketchy_path};
pub use selection::{
    InteractionState, element_at_position, elements_within_selection, target_shapes,
};
pub use shapes::{SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle};
pub use snap::{Snap, Snaps, is_point_snapped};
