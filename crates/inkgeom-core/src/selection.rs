//! Scene-level picking and selection queries.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::collision::{hit_test_with, to_shape_space};
use crate::config::InteractionConfig;
use crate::geometry::{absolute_coords, element_bounds};
use crate::shapes::{Shape, ShapeId, ShapeKind};

/// Editing state that changes how the selection is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    /// Shape whose content (usually text) is being edited.
    pub editing_element: Option<ShapeId>,
    /// Line or arrow whose points are being edited.
    pub editing_linear_element: Option<ShapeId>,
}

/// Topmost shape under `point`.
///
/// `shapes` is in z-order, back to front. Kinds without a hit-test algorithm
/// are skipped.
pub fn element_at_position<'a>(
    shapes: &'a [Shape],
    point: Point,
    config: &InteractionConfig,
) -> Option<&'a Shape> {
    shapes.iter().rev().find(|shape| {
        if matches!(shape.kind, ShapeKind::Selection) {
            return false;
        }
        match hit_test_with(shape, to_shape_space(shape, point), config) {
            Ok(hit) => hit,
            Err(e) => {
                log::debug!("Skipping {} while picking: {}", shape.id(), e);
                false
            }
        }
    })
}

/// Shapes fully enclosed by a rubber-band marquee.
///
/// Locked shapes, other marquees and text bound to a container are never
/// picked up directly.
pub fn elements_within_selection<'a>(shapes: &'a [Shape], marquee: &Shape) -> Vec<&'a Shape> {
    let area = absolute_coords(marquee).normalized();
    let area = Rect::new(area.x1, area.y1, area.x2, area.y2);

    shapes
        .iter()
        .filter(|s| {
            !s.locked && !matches!(s.kind, ShapeKind::Selection) && !s.is_bound_to_container()
        })
        .filter(|s| {
            let bounds = element_bounds(s);
            bounds.x0 >= area.x0
                && bounds.y0 >= area.y0
                && bounds.x1 <= area.x1
                && bounds.y1 <= area.y1
        })
        .collect()
}

pub fn selected_shapes(shapes: &[Shape]) -> Vec<&Shape> {
    shapes.iter().filter(|s| s.is_selected).collect()
}

pub fn is_some_shape_selected(shapes: &[Shape]) -> bool {
    shapes.iter().any(|s| s.is_selected)
}

/// Value of an attribute shared by every selected shape.
///
/// Returns `None` when nothing is selected or when selected shapes disagree.
pub fn common_attribute_of_selected<T, F>(shapes: &[Shape], attribute: F) -> Option<T>
where
    T: PartialEq,
    F: Fn(&Shape) -> T,
{
    let mut values = shapes.iter().filter(|s| s.is_selected).map(attribute);
    let first = values.next()?;
    values.all(|v| v == first).then_some(first)
}

/// Shapes an action should apply to.
///
/// The shape being edited wins; otherwise the selection plus any text bound to
/// a selected container.
pub fn target_shapes<'a>(shapes: &'a [Shape], state: &InteractionState) -> Vec<&'a Shape> {
    if let Some(editing) = state
        .editing_element
        .and_then(|id| shapes.iter().find(|s| s.id() == id))
    {
        return vec![editing];
    }

    let selected: Vec<ShapeId> = shapes
        .iter()
        .filter(|s| s.is_selected)
        .map(Shape::id)
        .collect();

    shapes
        .iter()
        .filter(|s| {
            s.is_selected
                || matches!(
                    &s.kind,
                    ShapeKind::Text(t) if t.container_id.is_some_and(|c| selected.contains(&c))
                )
        })
        .collect()
}
