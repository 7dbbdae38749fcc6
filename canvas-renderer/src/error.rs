//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while capturing or encoding a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An element's resource could not be loaded.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Rasterizing or encoding the captured page failed.
    #[error("Export failed: {0}")]
    Export(String),
}
