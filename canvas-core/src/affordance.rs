//! Hit-testing of element bodies and their on-element controls.
//!
//! Controls sit inside the element box, inset from its corners, and rotate
//! with it. Positions are given in element-local coordinates.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::geometry::Point;

/// Side length of the corner handles.
pub const HANDLE_SIZE: f32 = 16.0;

/// Side length of the flip card color picker.
pub const PICKER_SIZE: f32 = 24.0;

/// Distance between a control and the element's edges.
pub const HANDLE_INSET: f32 = 4.0;

/// The part of an element a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    /// The element itself; starts a drag.
    Body,
    /// Bottom-right handle; starts a resize.
    ResizeHandle,
    /// Top-right handle; starts a rotation.
    RotateHandle,
    /// Top-left button; deletes the element.
    DeleteButton,
    /// Bottom-left swatch on flip cards; opens a color picker.
    ColorPicker,
}

impl Affordance {
    /// Local-space rectangle `(left, top, right, bottom)` of this control on
    /// an element of the given size, or `None` for the body.
    #[must_use]
    pub fn bounds(self, width: f32, height: f32) -> Option<(f32, f32, f32, f32)> {
        let near = HANDLE_INSET;
        let far_x = width - HANDLE_INSET;
        let far_y = height - HANDLE_INSET;
        match self {
            Self::Body => None,
            Self::ResizeHandle => Some((far_x - HANDLE_SIZE, far_y - HANDLE_SIZE, far_x, far_y)),
            Self::RotateHandle => Some((far_x - HANDLE_SIZE, near, far_x, near + HANDLE_SIZE)),
            Self::DeleteButton => Some((near, near, near + HANDLE_SIZE, near + HANDLE_SIZE)),
            Self::ColorPicker => Some((near, far_y - PICKER_SIZE, near + PICKER_SIZE, far_y)),
        }
    }
}

/// Controls in hit-test priority order.
const CONTROLS: [Affordance; 4] = [
    Affordance::ResizeHandle,
    Affordance::RotateHandle,
    Affordance::DeleteButton,
    Affordance::ColorPicker,
];

/// Find which part of `element` (if any) is under `point`.
///
/// Controls take priority over the body. The color picker only exists on
/// flip cards.
#[must_use]
pub fn hit_test(element: &Element, point: Point) -> Option<Affordance> {
    let t = &element.transform;
    if !t.contains(point) {
        return None;
    }
    let local = t.to_local(point);

    CONTROLS
        .iter()
        .copied()
        .filter(|a| *a != Affordance::ColorPicker || element.kind.is_flip())
        .find(|a| {
            a.bounds(t.width, t.height)
                .is_some_and(|(left, top, right, bottom)| {
                    local.x >= left && local.x <= right && local.y >= top && local.y <= bottom
                })
        })
        .or(Some(Affordance::Body))
}
