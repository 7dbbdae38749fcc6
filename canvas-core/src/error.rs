//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Most document mutations degrade to silent no-ops instead of returning
/// these; errors are reserved for precondition violations a caller should
/// be able to observe.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    /// Element not found on the page.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Page index outside the document.
    #[error("Page index {index} out of range (document has {len} pages)")]
    PageOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of pages in the document.
        len: usize,
    },

    /// A gesture is already active; only one may run at a time.
    #[error("Gesture already in progress on element {0}")]
    GestureInProgress(String),
}
