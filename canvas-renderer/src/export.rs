//! Page export to PNG and PDF.
//!
//! The active page is projected onto the render surface, written out as an
//! SVG scene, rasterized with resvg/tiny-skia at the configured pixel
//! density, then encoded as PNG or placed on a single PDF page of exactly
//! the bitmap's size.

use std::fmt::Write;

use canvas_core::Document;

use crate::error::{RenderError, RenderResult};
use crate::source::{self, ImageSource};
use crate::surface::{NodeContent, RenderNode, RenderSurface, SceneGraph};

/// Line height of text boxes, in CSS pixels.
const LINE_HEIGHT: f32 = 24.0;

/// Font size of text boxes and cards, in CSS pixels.
const FONT_SIZE: f32 = 16.0;

/// Inner padding of text boxes.
const TEXT_PADDING: f32 = 12.0;

/// Rough advance of one character, used for wrapping.
const CHAR_WIDTH: f32 = FONT_SIZE * 0.55;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// Single-page PDF with the page bitmap as its only content.
    Pdf,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

/// Page orientation of an exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Height greater than or equal to width.
    Portrait,
    /// Width greater than height.
    Landscape,
}

impl Orientation {
    /// Orientation for a bitmap of the given size.
    #[must_use]
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Configuration for page export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Pixel density multiplier (2.0 captures at twice the surface size).
    pub scale: f32,
    /// Background color as RGBA bytes.
    pub background: [u8; 4],
    /// Resolution at which PDF pages map pixels to physical size.
    pub dpi: f32,
    /// Load the system font database before rasterizing text.
    pub system_fonts: bool,
    /// Download `http(s)` images. When off they paint as placeholders.
    pub fetch_remote_images: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: [255, 255, 255, 255],
            dpi: 96.0,
            system_fonts: true,
            fetch_remote_images: true,
        }
    }
}

/// An encoded export, ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested file name, `canvas-page-<N>.<ext>` with a 1-based page number.
    pub file_name: String,
    /// Encoding of `bytes`.
    pub format: ExportFormat,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
    /// Width of the captured bitmap.
    pub pixel_width: u32,
    /// Height of the captured bitmap.
    pub pixel_height: u32,
    /// Orientation derived from the bitmap's aspect ratio.
    pub orientation: Orientation,
}

/// File name for an export of the 1-based page `page_number`.
#[must_use]
pub fn file_name(page_number: usize, format: ExportFormat) -> String {
    format!("canvas-page-{page_number}.{}", format.extension())
}

/// Captures pages and encodes them. Never modifies the document.
#[derive(Debug, Clone, Default)]
pub struct PageExporter {
    config: ExportConfig,
}

impl PageExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Export the document's active page.
    ///
    /// Returns `Ok(None)` without doing anything when no surface is mounted.
    ///
    /// # Errors
    ///
    /// Returns an error if capture or encoding fails.
    pub fn export(
        &self,
        doc: &Document,
        surface: Option<&RenderSurface>,
        format: ExportFormat,
    ) -> RenderResult<Option<ExportArtifact>> {
        let Some(surface) = surface else {
            tracing::debug!("Export skipped: no surface mounted");
            return Ok(None);
        };
        let scene = surface.project(doc.active_page());
        self.export_scene(&scene, doc.active_index() + 1, format)
            .map(Some)
    }

    /// Encode an already projected page. `page_number` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns an error if capture or encoding fails.
    pub fn export_scene(
        &self,
        scene: &SceneGraph,
        page_number: usize,
        format: ExportFormat,
    ) -> RenderResult<ExportArtifact> {
        let pixmap = self.capture(scene)?;
        let (pixel_width, pixel_height) = (pixmap.width(), pixmap.height());
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;

        let bytes = match format {
            ExportFormat::Png => png,
            ExportFormat::Pdf => self.build_pdf(&png, pixel_width, pixel_height)?,
        };

        let artifact = ExportArtifact {
            file_name: file_name(page_number, format),
            format,
            bytes,
            pixel_width,
            pixel_height,
            orientation: Orientation::from_dimensions(pixel_width, pixel_height),
        };
        tracing::info!(
            "Exported {} ({}x{}, {} bytes)",
            artifact.file_name,
            pixel_width,
            pixel_height,
            artifact.bytes.len()
        );
        Ok(artifact)
    }

    /// Rasterize a projected page at the configured pixel density.
    ///
    /// # Errors
    ///
    /// Returns an error if an image resource cannot be loaded or the scene
    /// cannot be rasterized.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn capture(&self, scene: &SceneGraph) -> RenderResult<tiny_skia::Pixmap> {
        let svg = self.render_to_svg(scene)?;

        let mut opt = usvg::Options::default();
        if self.config.system_fonts {
            opt.fontdb_mut().load_system_fonts();
        }
        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }

    /// Write a projected page as the SVG scene that [`Self::capture`] rasterizes.
    ///
    /// # Errors
    ///
    /// Returns an error if an image resource cannot be loaded.
    #[allow(clippy::cast_precision_loss)]
    pub fn render_to_svg(&self, scene: &SceneGraph) -> RenderResult<String> {
        let (out_w, out_h) = self.output_dimensions(scene);

        let mut svg = String::with_capacity(4096);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
            scene.width, scene.height,
        );

        let bg = &self.config.background;
        let bg_alpha = f32::from(bg[3]) / 255.0;
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgb({},{},{})\" fill-opacity=\"{bg_alpha}\"/>",
            bg[0], bg[1], bg[2],
        );

        for node in &scene.nodes {
            render_node_svg(&mut svg, node, self.config.fetch_remote_images)?;
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Place a PNG on a single PDF page sized to its pixel dimensions.
    fn build_pdf(&self, png: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
        let dpi = self.config.dpi;
        tracing::debug!(
            "Building {:?} PDF page {width}x{height}px",
            Orientation::from_dimensions(width, height)
        );

        let (doc, page1, layer1) = printpdf::PdfDocument::new(
            "Canvas Export",
            page_mm(pixels_to_points(width, dpi)),
            page_mm(pixels_to_points(height, dpi)),
            "Layer 1",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);

        let dynamic_image = printpdf::image_crate::load_from_memory(png)
            .map_err(|e| RenderError::Export(format!("Failed to decode PNG for PDF: {e}")))?;
        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

        // At the page's own DPI the image covers the page exactly.
        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(0.0)),
            translate_y: Some(printpdf::Mm(0.0)),
            dpi: Some(dpi),
            ..Default::default()
        };
        pdf_image.add_to_layer(current_layer, transform);

        doc.save_to_bytes()
            .map_err(|e| RenderError::Export(format!("PDF save failed: {e}")))
    }

    /// Bitmap dimensions (width, height) in pixels.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn output_dimensions(&self, scene: &SceneGraph) -> (u32, u32) {
        let scale = self.config.scale.max(f32::EPSILON);
        let out_w = (scene.width as f32 * scale).round() as u32;
        let out_h = (scene.height as f32 * scale).round() as u32;
        (out_w.max(1), out_h.max(1))
    }
}

/// Physical size of `pixels` at `dpi`, in PDF points.
#[allow(clippy::cast_possible_truncation)]
fn pixels_to_points(pixels: u32, dpi: f32) -> f32 {
    (f64::from(pixels) * 72.0 / f64::from(dpi)) as f32
}

/// Millimetres that printpdf turns back into exactly `points`, or the
/// nearest value when no exact one exists.
fn page_mm(points: f32) -> printpdf::Mm {
    let error = |mm: f32| (printpdf::Pt::from(printpdf::Mm(mm)).0 - points).abs();
    let guess = points / 2.834_646;
    let best = (-8..=8)
        .map(|ulps| f32::from_bits(guess.to_bits().wrapping_add_signed(ulps)))
        .min_by(|a, b| error(*a).total_cmp(&error(*b)))
        .unwrap_or(guess);
    printpdf::Mm(best)
}

/// Render a single node to SVG in its own translated, rotated group.
fn render_node_svg(svg: &mut String, node: &RenderNode, fetch_remote: bool) -> RenderResult<()> {
    let (w, h) = (node.width, node.height);
    let _ = write!(
        svg,
        "<g transform=\"translate({},{}) rotate({},{},{})\">",
        node.x,
        node.y,
        node.rotation,
        w / 2.0,
        h / 2.0,
    );

    match &node.content {
        NodeContent::TextBox { text } => {
            let _ = write!(
                svg,
                "<rect width=\"{w}\" height=\"{h}\" rx=\"8\" fill=\"#111827\" stroke=\"#e5e7eb\" stroke-width=\"1\"/>",
            );
            let _ = write!(
                svg,
                "<text font-size=\"{FONT_SIZE}\" fill=\"#ffffff\" font-family=\"sans-serif\">",
            );
            for (i, line) in wrap_text(text, w - TEXT_PADDING * 2.0).iter().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let y = TEXT_PADDING + FONT_SIZE + i as f32 * LINE_HEIGHT;
                let _ = write!(
                    svg,
                    "<tspan x=\"{TEXT_PADDING}\" y=\"{y}\">{}</tspan>",
                    escape_xml(line),
                );
            }
            svg.push_str("</text>");
        }

        NodeContent::Picture { src } => {
            let _ = write!(
                svg,
                "<rect width=\"{w}\" height=\"{h}\" rx=\"8\" fill=\"#d1d5db\"/>",
            );
            match source::resolve(src, fetch_remote)? {
                ImageSource::Inline(uri) => {
                    let _ = write!(
                        svg,
                        "<image width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"xMidYMid slice\" href=\"{}\"/>",
                        escape_xml(&uri),
                    );
                }
                ImageSource::Remote(url) => {
                    tracing::warn!("Remote image {url} not fetched, drawing placeholder");
                }
            }
        }

        NodeContent::Card { label, color, .. } => {
            let _ = write!(
                svg,
                "<rect width=\"{w}\" height=\"{h}\" rx=\"8\" fill=\"{}\"/>",
                sanitize_color(color),
            );
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" font-size=\"{FONT_SIZE}\" font-weight=\"600\" fill=\"#1f2937\" text-anchor=\"middle\" font-family=\"sans-serif\">{}</text>",
                w / 2.0,
                h / 2.0 + FONT_SIZE * 0.35,
                escape_xml(label),
            );
        }
    }

    svg.push_str("</g>");
    Ok(())
}

/// Greedy word wrap to lines that fit `max_width` at the nominal character width.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn wrap_text(text: &str, max_width: f32) -> Vec<String> {
    let max_chars = ((max_width / CHAR_WIDTH).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Accept `#rgb` and `#rrggbb` colors; anything else falls back to the
/// default card color.
fn sanitize_color(color: &str) -> &str {
    let hex = color.strip_prefix('#').unwrap_or("");
    let valid = matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        color
    } else {
        canvas_core::element::DEFAULT_FLIP_COLOR
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
