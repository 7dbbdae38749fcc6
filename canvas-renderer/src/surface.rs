//! The render surface: a projection of one page into positioned nodes.

use canvas_core::{ElementId, ElementKind, Page};

/// Default surface width in CSS pixels.
pub const DEFAULT_SURFACE_WIDTH: u32 = 1024;

/// Default surface height in CSS pixels.
pub const DEFAULT_SURFACE_HEIGHT: u32 = 700;

/// A mounted drawing surface of fixed size onto which pages are projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSurface {
    width: u32,
    height: u32,
}

impl RenderSurface {
    /// Mount a surface of the given size. Zero dimensions are raised to 1.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Surface width in CSS pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in CSS pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Project a page's elements into render nodes, in paint order.
    #[must_use]
    pub fn project(&self, page: &Page) -> SceneGraph {
        let nodes = page
            .elements()
            .iter()
            .map(|element| {
                let t = &element.transform;
                let content = match &element.kind {
                    ElementKind::Text { content } => NodeContent::TextBox {
                        text: content.clone(),
                    },
                    ElementKind::Image { src } => NodeContent::Picture { src: src.clone() },
                    ElementKind::Flip {
                        front,
                        back,
                        is_flipped,
                        color,
                    } => NodeContent::Card {
                        label: (if *is_flipped { back } else { front }).clone(),
                        color: color.clone(),
                        flipped: *is_flipped,
                    },
                };
                RenderNode {
                    element: element.id,
                    x: t.x,
                    y: t.y,
                    width: t.width,
                    height: t.height,
                    rotation: t.rotation,
                    content,
                }
            })
            .collect();

        SceneGraph {
            width: self.width,
            height: self.height,
            nodes,
        }
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new(DEFAULT_SURFACE_WIDTH, DEFAULT_SURFACE_HEIGHT)
    }
}

/// A projected page, ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    /// Surface width in CSS pixels.
    pub width: u32,
    /// Surface height in CSS pixels.
    pub height: u32,
    /// Nodes in paint order.
    pub nodes: Vec<RenderNode>,
}

/// One element placed on the surface: translated to `(x, y)`, then rotated
/// by `rotation` degrees about its own center.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    /// Source element.
    pub element: ElementId,
    /// Left edge before rotation.
    pub x: f32,
    /// Top edge before rotation.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Rotation in degrees about the center.
    pub rotation: i32,
    /// What to draw.
    pub content: NodeContent,
}

/// Visual content of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// Dark box with wrapped white text.
    TextBox {
        /// Text to show.
        text: String,
    },
    /// Cover-fitted picture.
    Picture {
        /// Image source as stored on the element.
        src: String,
    },
    /// Colored card showing whichever face is up.
    Card {
        /// Text of the visible face.
        label: String,
        /// Card background color.
        color: String,
        /// Whether the back face is up.
        flipped: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::{Document, ElementPatch};

    #[test]
    fn test_projection_keeps_paint_order_and_geometry() {
        let mut doc = Document::new();
        let a = doc.add_element(ElementKind::text("first"), None, None);
        let b = doc.add_element(ElementKind::image("b.png"), None, None);
        doc.update_element(0, b, &ElementPatch::rotation(-45));

        let scene = RenderSurface::new(800, 600).project(doc.active_page());
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.nodes[0].element, a);
        assert_eq!(scene.nodes[1].element, b);
        assert_eq!(scene.nodes[1].rotation, -45);
        assert!((scene.nodes[1].width - 400.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_flip_card_shows_visible_face() {
        let mut doc = Document::new();
        let id = doc.add_element(ElementKind::flip("Question", "Answer"), None, None);
        let surface = RenderSurface::default();

        let front = surface.project(doc.active_page());
        assert!(matches!(
            &front.nodes[0].content,
            NodeContent::Card { label, flipped: false, .. } if label == "Question"
        ));

        doc.update_element(0, id, &ElementPatch::flipped(true));
        let back = surface.project(doc.active_page());
        assert!(matches!(
            &back.nodes[0].content,
            NodeContent::Card { label, flipped: true, .. } if label == "Answer"
        ));
    }

    #[test]
    fn test_zero_sized_surface_is_clamped() {
        let s = RenderSurface::new(0, 0);
        assert_eq!((s.width(), s.height()), (1, 1));
    }
}
