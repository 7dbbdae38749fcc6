//! # Pageboard Canvas Renderer
//!
//! Projects pages onto a render surface and captures them as images.
//!
//! ## Export Pipeline
//!
//! ```text
//! ┌──────────┐   project   ┌────────────┐  svg  ┌─────────┐
//! │   Page   │ ──────────▶ │ SceneGraph │ ────▶ │  resvg  │
//! └──────────┘             └────────────┘       └────┬────┘
//!                                                    │ Pixmap (2x)
//!                                          ┌─────────┴─────────┐
//!                                          ▼                   ▼
//!                                 canvas-page-N.png   canvas-page-N.pdf
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod source;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use export::{
    file_name, ExportArtifact, ExportConfig, ExportFormat, Orientation, PageExporter,
};
pub use source::ImageSource;
pub use surface::{NodeContent, RenderNode, RenderSurface, SceneGraph};
