//! Canvas elements - the building blocks of a page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{rotate_about, Point, Size};

/// Origin every new element is placed at, regardless of what else is on the page.
pub const DEFAULT_POSITION: Point = Point::new(50.0, 50.0);

/// Background color of a new flip card.
pub const DEFAULT_FLIP_COLOR: &str = "#e5e7eb";

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The content an element carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A block of text.
    Text {
        /// Display string.
        content: String,
    },

    /// A picture loaded from a URL, file path or data URI.
    Image {
        /// Image source.
        src: String,
    },

    /// A two-sided card that flips between a front and a back string.
    Flip {
        /// Text on the front face.
        front: String,
        /// Text on the back face.
        back: String,
        /// Whether the back face is showing.
        #[serde(default)]
        is_flipped: bool,
        /// Card background as a CSS hex color.
        #[serde(default = "default_flip_color")]
        color: String,
    },
}

fn default_flip_color() -> String {
    DEFAULT_FLIP_COLOR.to_string()
}

impl ElementKind {
    /// A text block.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// An image.
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self::Image { src: src.into() }
    }

    /// A flip card showing its front in the default color.
    #[must_use]
    pub fn flip(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self::Flip {
            front: front.into(),
            back: back.into(),
            is_flipped: false,
            color: default_flip_color(),
        }
    }

    /// Size a new element of this kind gets when none is given.
    #[must_use]
    pub fn default_size(&self) -> Size {
        match self {
            Self::Text { .. } => Size::new(150.0, 100.0),
            Self::Image { .. } => Size::new(400.0, 400.0),
            Self::Flip { .. } => Size::new(150.0, 150.0),
        }
    }

    /// Short lowercase name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Flip { .. } => "flip",
        }
    }

    /// Whether this is a flip card.
    #[must_use]
    pub fn is_flip(&self) -> bool {
        matches!(self, Self::Flip { .. })
    }
}

/// Position, size and rotation of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position of the top-left corner.
    pub x: f32,
    /// Y position of the top-left corner.
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Rotation about the center, in whole degrees. Not normalized.
    pub rotation: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: DEFAULT_POSITION.x,
            y: DEFAULT_POSITION.y,
            width: 150.0,
            height: 100.0,
            rotation: 0,
        }
    }
}

impl Transform {
    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Geometric center. Rotation happens about this point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Map a page-space point into the element's un-rotated local space,
    /// where `(0, 0)` is the top-left corner.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_local(&self, point: Point) -> Point {
        let unrotated = rotate_about(point, self.center(), -(self.rotation as f32));
        Point::new(unrotated.x - self.x, unrotated.y - self.y)
    }

    /// Check if a page-space point falls inside the (rotated) element box.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let local = self.to_local(point);
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }
}

/// A canvas element with content and transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Position, size and rotation.
    pub transform: Transform,
}

impl Element {
    /// Create a new element at the default position with the kind's default size.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        let size = kind.default_size();
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform {
                width: size.width,
                height: size.height,
                ..Transform::default()
            },
        }
    }

    /// Override the width and/or height.
    #[must_use]
    pub fn with_size(mut self, width: Option<f32>, height: Option<f32>) -> Self {
        if let Some(width) = width {
            self.transform.width = width;
        }
        if let Some(height) = height {
            self.transform.height = height;
        }
        self
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Apply a partial update. Fields absent from the patch are untouched,
    /// as are fields that do not exist on this element's kind.
    pub fn apply(&mut self, patch: &ElementPatch) {
        let t = &mut self.transform;
        if let Some(x) = patch.x {
            t.x = x;
        }
        if let Some(y) = patch.y {
            t.y = y;
        }
        if let Some(width) = patch.width {
            t.width = width;
        }
        if let Some(height) = patch.height {
            t.height = height;
        }
        if let Some(rotation) = patch.rotation {
            t.rotation = rotation;
        }

        match &mut self.kind {
            ElementKind::Text { content } => {
                if let Some(c) = &patch.content {
                    content.clone_from(c);
                }
            }
            ElementKind::Image { src } => {
                if let Some(c) = &patch.content {
                    src.clone_from(c);
                }
            }
            ElementKind::Flip {
                front,
                back,
                is_flipped,
                color,
            } => {
                if let Some(f) = &patch.front {
                    front.clone_from(f);
                }
                if let Some(b) = &patch.back {
                    back.clone_from(b);
                }
                if let Some(flipped) = patch.is_flipped {
                    *is_flipped = flipped;
                }
                if let Some(c) = &patch.color {
                    color.clone_from(c);
                }
            }
        }
    }
}

/// A partial element update. `None` leaves the field as it is.
///
/// `content` addresses the text of a Text element and the source of an
/// Image element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New x position.
    pub x: Option<f32>,
    /// New y position.
    pub y: Option<f32>,
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New rotation in degrees.
    pub rotation: Option<i32>,
    /// New text content or image source.
    pub content: Option<String>,
    /// New flip card front.
    pub front: Option<String>,
    /// New flip card back.
    pub back: Option<String>,
    /// New flip state.
    pub is_flipped: Option<bool>,
    /// New flip card color.
    pub color: Option<String>,
}

impl ElementPatch {
    /// Move to a new origin.
    #[must_use]
    pub fn position(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            ..Self::default()
        }
    }

    /// Resize.
    #[must_use]
    pub fn size(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..Self::default()
        }
    }

    /// Rotate.
    #[must_use]
    pub fn rotation(degrees: i32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    /// Set the flip state.
    #[must_use]
    pub fn flipped(is_flipped: bool) -> Self {
        Self {
            is_flipped: Some(is_flipped),
            ..Self::default()
        }
    }

    /// Set the flip card color.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }
}
