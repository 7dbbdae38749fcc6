//! # Pageboard Canvas CLI
//!
//! Headless host for the canvas editor core. Plays a JSON editing script
//! (page and element commands plus raw pointer events) against a document,
//! drives the manipulation controller one frame at a time, and writes page
//! exports to an output directory.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p canvas-cli -- script.json --out-dir exports
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `EditorConfig` - Surface size, export scale and output directory
//! - `Command` - One step of an editing script
//! - `EditorSession` - Document, controller, surface and pending exports

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod script;
mod session;

pub use script::{parse_script, Command, ExportKind};
pub use session::{EditorSession, RunReport};

use std::path::PathBuf;

use canvas_renderer::surface::{DEFAULT_SURFACE_HEIGHT, DEFAULT_SURFACE_WIDTH};
use clap::Parser;

/// Command-line arguments for canvas-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-cli")]
#[command(about = "Play a Pageboard editing script and export its pages")]
#[command(version)]
pub struct CliArgs {
    /// Path to the JSON editing script
    pub script: PathBuf,

    /// Render surface width in CSS pixels
    #[arg(long, env = "CANVAS_SURFACE_WIDTH", default_value = "1024")]
    pub surface_width: u32,

    /// Render surface height in CSS pixels
    #[arg(long, env = "CANVAS_SURFACE_HEIGHT", default_value = "700")]
    pub surface_height: u32,

    /// Export pixel density multiplier
    #[arg(long, env = "CANVAS_EXPORT_SCALE", default_value = "2.0")]
    pub scale: f32,

    /// Directory exported files are written to
    #[arg(long, env = "CANVAS_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

/// Editor host configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Surface width in CSS pixels.
    pub surface_width: u32,
    /// Surface height in CSS pixels.
    pub surface_height: u32,
    /// Export pixel density multiplier.
    pub scale: f32,
    /// Output directory for exports.
    pub out_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfig {
    /// Create a new editor configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surface_width: DEFAULT_SURFACE_WIDTH,
            surface_height: DEFAULT_SURFACE_HEIGHT,
            scale: 2.0,
            out_dir: PathBuf::from("."),
        }
    }
}

impl From<CliArgs> for EditorConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            surface_width: args.surface_width,
            surface_height: args.surface_height,
            scale: args.scale,
            out_dir: args.out_dir,
        }
    }
}
