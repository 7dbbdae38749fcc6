//! Editing scripts.
//!
//! A script is a JSON array of commands, each tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "add_element", "name": "card", "kind": { "type": "flip", "front": "Q", "back": "A" } },
//!   { "op": "pointer", "phase": "down", "x": 120, "y": 120 },
//!   { "op": "pointer", "phase": "move", "x": 181, "y": 139 },
//!   { "op": "frame" },
//!   { "op": "pointer", "phase": "up", "x": 181, "y": 139 },
//!   { "op": "export", "format": "png" }
//! ]
//! ```
//!
//! Elements are addressed by the `name` given when they were added.

use canvas_core::{ElementKind, ElementPatch, PointerEvent};
use canvas_renderer::ExportFormat;
use serde::{Deserialize, Serialize};

/// One step of an editing script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    /// Append a page and make it active.
    AddPage,
    /// Remove the page at `index`.
    RemovePage {
        /// Zero-based page index.
        index: usize,
    },
    /// Make the page at `index` active.
    SwitchPage {
        /// Zero-based page index.
        index: usize,
    },
    /// Add an element to the active page.
    AddElement {
        /// Script-local name used by later commands.
        #[serde(default)]
        name: Option<String>,
        /// What to add.
        kind: ElementKind,
        /// Width override.
        #[serde(default)]
        width: Option<f32>,
        /// Height override.
        #[serde(default)]
        height: Option<f32>,
    },
    /// Merge a partial update into a named element on the active page.
    UpdateElement {
        /// Element name.
        element: String,
        /// Fields to change.
        patch: ElementPatch,
    },
    /// Remove a named element from the active page.
    DeleteElement {
        /// Element name.
        element: String,
    },
    /// Feed a raw pointer event to the manipulation controller.
    Pointer(PointerEvent),
    /// Animation frame: apply the latest pending drag position.
    Frame,
    /// Turn a named flip card over.
    ToggleFlip {
        /// Element name.
        element: String,
    },
    /// Change a named flip card's color.
    Recolor {
        /// Element name.
        element: String,
        /// New color value.
        color: String,
    },
    /// Mount a render surface, replacing any mounted one.
    Mount {
        /// Surface width in CSS pixels.
        width: u32,
        /// Surface height in CSS pixels.
        height: u32,
    },
    /// Unmount the render surface. Exports are skipped until the next mount.
    Unmount,
    /// Export the active page.
    Export {
        /// Output format.
        format: ExportKind,
    },
}

/// Export format as written in scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// PNG image.
    Png,
    /// Single-page PDF.
    Pdf,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Png => Self::Png,
            ExportKind::Pdf => Self::Pdf,
        }
    }
}

/// Parse a JSON editing script.
///
/// # Errors
///
/// Returns an error if the input is not a JSON array of known commands.
pub fn parse_script(json: &str) -> anyhow::Result<Vec<Command>> {
    let commands: Vec<Command> = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("Invalid editing script: {e}"))?;
    tracing::debug!("Parsed script with {} commands", commands.len());
    Ok(commands)
}
