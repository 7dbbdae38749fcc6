//! Pointer input for direct manipulation.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Vector};

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// The platform took the pointer away (left the window, lost focus).
    Cancel,
}

/// A pointer event in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in page coordinates.
    pub x: f32,
    /// Y position in page coordinates.
    pub y: f32,
    /// Movement since the previous pointer event, if the platform reports it.
    #[serde(default)]
    pub movement: Option<Vector>,
}

impl PointerEvent {
    /// Create a pointer event without an explicit movement.
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            movement: None,
        }
    }

    /// Pointer pressed at `(x, y)`.
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    /// Pointer moved to `(x, y)`.
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    /// Pointer released at `(x, y)`.
    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }

    /// Pointer cancelled at `(x, y)`.
    #[must_use]
    pub fn cancel(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Cancel, x, y)
    }

    /// Attach a platform-reported movement.
    #[must_use]
    pub fn with_movement(mut self, dx: f32, dy: f32) -> Self {
        self.movement = Some(Vector::new(dx, dy));
        self
    }

    /// Pointer position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
