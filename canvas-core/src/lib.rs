//! # Pageboard Canvas Core
//!
//! Document model and direct-manipulation engine for a multi-page canvas
//! editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                canvas-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Document Model    │  Manipulation          │
//! │  - Pages           │  - Drag / resize /     │
//! │  - Elements        │    rotate sessions     │
//! │  - Partial updates │  - Affordance hits     │
//! ├─────────────────────────────────────────────┤
//! │  Geometry: grid snapping, resize floor,     │
//! │  rotation towards the pointer               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! All mutation is single-threaded: each pointer event runs to completion
//! before the next one is handled.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod affordance;
pub mod document;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod page;

pub use affordance::{hit_test, Affordance};
pub use document::Document;
pub use element::{Element, ElementId, ElementKind, ElementPatch, Transform};
pub use error::{CanvasError, CanvasResult};
pub use event::{PointerEvent, PointerPhase};
pub use geometry::{Point, Size, Vector, GRID_SIZE, MIN_ELEMENT_SIZE};
pub use gesture::{
    CaptureRegistry, GestureKind, GestureSession, Interaction, ManipulationController,
    PointerCapture,
};
pub use page::{Page, PageId};

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
