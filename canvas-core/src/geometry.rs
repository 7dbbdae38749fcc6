//! Grid snapping and gesture geometry.
//!
//! Every function here is pure. The manipulation controller feeds pointer
//! samples in and applies the results to the document.

use serde::{Deserialize, Serialize};

/// Grid unit in pixels. Drag and resize results are multiples of this.
pub const GRID_SIZE: f32 = 20.0;

/// Smallest width or height an element can be resized to, before snapping.
pub const MIN_ELEMENT_SIZE: f32 = 50.0;

/// A position in page coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to this point.
    #[must_use]
    pub fn offset_from(self, origin: Point) -> Vector {
        Vector::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A relative movement in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vector {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Round to the nearest integer, with exact halves rounding towards
/// positive infinity (`2.5 -> 3`, `-2.5 -> -2`).
#[must_use]
pub fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Snap a coordinate or dimension to the nearest grid line.
///
/// Half-grid inputs snap upwards: `snap_to_grid(50.0) == 60.0` and
/// `snap_to_grid(-10.0) == 0.0`.
#[must_use]
pub fn snap_to_grid(value: f32) -> f32 {
    round_half_up(value / GRID_SIZE) * GRID_SIZE
}

/// Snapped element origin for a drag, keeping the grab offset between the
/// pointer and the element's top-left corner.
#[must_use]
pub fn drag_position(pointer: Point, grab_offset: Vector) -> Point {
    Point::new(
        snap_to_grid(pointer.x - grab_offset.x),
        snap_to_grid(pointer.y - grab_offset.y),
    )
}

/// New element size after a resize movement.
///
/// The minimum size is applied before snapping, so a collapsed dimension
/// lands on `snap_to_grid(MIN_ELEMENT_SIZE)`.
#[must_use]
pub fn resize_dimensions(current: Size, delta: Vector) -> Size {
    Size::new(
        snap_to_grid((current.width + delta.x).max(MIN_ELEMENT_SIZE)),
        snap_to_grid((current.height + delta.y).max(MIN_ELEMENT_SIZE)),
    )
}

/// Rotation in whole degrees that points an element from `center` towards
/// `pointer`. The result lies in `-180..=180` and is not normalized.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn rotation_towards(center: Point, pointer: Point) -> i32 {
    let angle = (pointer.y - center.y).atan2(pointer.x - center.x);
    round_half_up(angle.to_degrees()) as i32
}

/// Rotate `point` around `pivot` by `degrees` (clockwise in screen space).
#[must_use]
pub fn rotate_about(point: Point, pivot: Point, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point.offset_from(pivot);
    Point::new(
        pivot.x + d.x * cos - d.y * sin,
        pivot.y + d.x * sin + d.y * cos,
    )
}
