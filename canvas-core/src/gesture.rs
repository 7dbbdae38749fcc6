//! Direct manipulation: turns a stream of pointer events into document edits.
//!
//! A gesture (drag, resize or rotate) runs Idle -> Active -> Idle. While it
//! is active the controller owns a [`GestureSession`], which holds a
//! [`PointerCapture`] for the whole input surface. Ending the gesture drops
//! the session and with it the capture, on every exit path.
//!
//! ```text
//!   pointer down on body ─────► Drag    ─┐
//!   pointer down on resize ───► Resize  ─┼─ move* ─► up / cancel ─► Idle
//!   pointer down on rotate ───► Rotate  ─┘
//! ```
//!
//! Only one gesture runs at a time. Starting another while one is active is
//! rejected without touching the document.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::affordance::Affordance;
use crate::element::{ElementId, ElementKind, ElementPatch};
use crate::event::{PointerEvent, PointerPhase};
use crate::geometry::{drag_position, resize_dimensions, rotation_towards, Point, Vector};
use crate::page::PageId;
use crate::{CanvasError, CanvasResult, Document};

/// The kinds of pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// Move the element, keeping the grab offset.
    Drag,
    /// Grow or shrink from the bottom-right corner.
    Resize,
    /// Turn the element to face the pointer.
    Rotate,
}

impl std::fmt::Display for GestureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Drag => "drag",
            Self::Resize => "resize",
            Self::Rotate => "rotate",
        };
        f.write_str(name)
    }
}

/// Counts pointer captures currently held on the input surface.
///
/// A host routes surface-wide move and release events to the controller
/// while [`CaptureRegistry::active`] is non-zero.
#[derive(Debug, Clone, Default)]
pub struct CaptureRegistry {
    active: Rc<Cell<usize>>,
}

impl CaptureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of captures currently held.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active.get()
    }

    fn acquire(&self, kind: GestureKind) -> PointerCapture {
        self.active.set(self.active.get() + 1);
        tracing::trace!("Pointer captured for {kind}");
        PointerCapture {
            registry: Rc::clone(&self.active),
            kind,
        }
    }
}

/// A held pointer capture. Released when dropped.
#[derive(Debug)]
pub struct PointerCapture {
    registry: Rc<Cell<usize>>,
    kind: GestureKind,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.registry.set(self.registry.get().saturating_sub(1));
        tracing::trace!("Pointer released from {}", self.kind);
    }
}

/// Per-kind state carried between pointer events.
#[derive(Debug)]
enum Progress {
    Drag {
        grab_offset: Vector,
        start: Point,
        pending: Option<Point>,
        moved: bool,
    },
    Resize {
        last_pointer: Point,
    },
    Rotate,
}

/// The state of one active gesture.
#[derive(Debug)]
pub struct GestureSession {
    kind: GestureKind,
    element: ElementId,
    page: PageId,
    progress: Progress,
    _capture: PointerCapture,
}

impl GestureSession {
    /// The gesture kind.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    /// The element being manipulated.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The page the element lives on.
    #[must_use]
    pub fn page(&self) -> PageId {
        self.page
    }
}

/// What a pointer event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Nothing was hit or nothing is active.
    None,
    /// A gesture started.
    Started(GestureKind, ElementId),
    /// A new gesture was refused because one is already active.
    Rejected,
    /// The active gesture advanced. Drag moves are held until the next frame.
    Moved(GestureKind, ElementId),
    /// The active gesture finished.
    Ended(GestureKind, ElementId),
    /// A flip card was clicked and turned over.
    Flipped(ElementId),
    /// The element's delete button was pressed.
    Deleted(ElementId),
    /// The flip card's color swatch was pressed; the host should show a
    /// picker and call [`ManipulationController::recolor`] with the choice.
    PickColor(ElementId),
}

/// Owns the active gesture, if any, and applies pointer input to a document.
#[derive(Debug, Default)]
pub struct ManipulationController {
    captures: CaptureRegistry,
    session: Option<GestureSession>,
}

impl ManipulationController {
    /// Create an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer capture registry this controller acquires from.
    #[must_use]
    pub fn captures(&self) -> &CaptureRegistry {
        &self.captures
    }

    /// The active gesture, if any.
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Whether no gesture is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    /// Dispatch a pointer event.
    ///
    /// Pointer-down hit-tests the active page. Move, up and cancel go to the
    /// active gesture wherever the pointer is.
    pub fn handle(&mut self, doc: &mut Document, event: &PointerEvent) -> Interaction {
        match event.phase {
            PointerPhase::Down => self.pointer_down(doc, event.position()),
            PointerPhase::Move => self.pointer_move(doc, event),
            PointerPhase::Up | PointerPhase::Cancel => self.end(doc),
        }
    }

    fn pointer_down(&mut self, doc: &mut Document, pointer: Point) -> Interaction {
        if let Some(session) = &self.session {
            tracing::warn!(
                "Pointer down ignored: {} on {} still active",
                session.kind,
                session.element
            );
            return Interaction::Rejected;
        }

        let Some((id, part)) = doc.active_page().element_at(pointer) else {
            return Interaction::None;
        };

        let kind = match part {
            Affordance::Body => GestureKind::Drag,
            Affordance::ResizeHandle => GestureKind::Resize,
            Affordance::RotateHandle => GestureKind::Rotate,
            Affordance::DeleteButton => {
                doc.delete_element(doc.active_index(), id);
                return Interaction::Deleted(id);
            }
            Affordance::ColorPicker => return Interaction::PickColor(id),
        };

        match self.begin(doc, kind, id, pointer) {
            Ok(()) => Interaction::Started(kind, id),
            Err(e) => {
                tracing::warn!("Could not start {kind}: {e}");
                Interaction::Rejected
            }
        }
    }

    /// Start a gesture on an element of the active page.
    ///
    /// For a drag the grab offset is fixed here as `pointer - origin`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::GestureInProgress`] if a gesture is already
    /// active and [`CanvasError::ElementNotFound`] if the element is not on
    /// the active page. The controller is unchanged in both cases.
    pub fn begin(
        &mut self,
        doc: &Document,
        kind: GestureKind,
        id: ElementId,
        pointer: Point,
    ) -> CanvasResult<()> {
        if let Some(session) = &self.session {
            return Err(CanvasError::GestureInProgress(session.element.to_string()));
        }
        let element = doc
            .active_element(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))?;

        let t = &element.transform;
        let progress = match kind {
            GestureKind::Drag => Progress::Drag {
                grab_offset: pointer.offset_from(t.origin()),
                start: t.origin(),
                pending: None,
                moved: false,
            },
            GestureKind::Resize => Progress::Resize {
                last_pointer: pointer,
            },
            GestureKind::Rotate => Progress::Rotate,
        };

        tracing::debug!("Starting {kind} on {} {id}", element.kind.name());
        self.session = Some(GestureSession {
            kind,
            element: id,
            page: doc.active_page().id(),
            progress,
            _capture: self.captures.acquire(kind),
        });
        Ok(())
    }

    /// Advance the active gesture with a pointer move.
    ///
    /// Resize and rotate edit the document immediately. A drag only records
    /// the latest target; [`Self::flush_frame`] applies it.
    pub fn pointer_move(&mut self, doc: &mut Document, event: &PointerEvent) -> Interaction {
        let Some(session) = self.session.as_mut() else {
            return Interaction::None;
        };
        let Some(page) = doc.index_of(session.page) else {
            return Interaction::None;
        };
        let pointer = event.position();
        let id = session.element;

        match &mut session.progress {
            Progress::Drag {
                grab_offset,
                start,
                pending,
                moved,
            } => {
                let target = drag_position(pointer, *grab_offset);
                *moved |= target != *start;
                *pending = Some(target);
            }
            Progress::Resize { last_pointer } => {
                let delta = event
                    .movement
                    .unwrap_or_else(|| pointer.offset_from(*last_pointer));
                *last_pointer = pointer;
                let Some(current) = doc
                    .page(page)
                    .and_then(|p| p.get(id))
                    .map(|e| e.transform.size())
                else {
                    return Interaction::None;
                };
                let size = resize_dimensions(current, delta);
                doc.update_element(page, id, &ElementPatch::size(size));
            }
            Progress::Rotate => {
                let Some(center) = doc
                    .page(page)
                    .and_then(|p| p.get(id))
                    .map(|e| e.transform.center())
                else {
                    return Interaction::None;
                };
                let rotation = rotation_towards(center, pointer);
                doc.update_element(page, id, &ElementPatch::rotation(rotation));
            }
        }

        Interaction::Moved(session.kind, id)
    }

    /// Apply the drag position held since the last frame, if any.
    ///
    /// Call once per rendered frame. Returns whether the document changed.
    pub fn flush_frame(&mut self, doc: &mut Document) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Progress::Drag { pending, .. } = &mut session.progress else {
            return false;
        };
        let Some(target) = pending.take() else {
            return false;
        };
        match doc.index_of(session.page) {
            Some(page) => doc.update_element(page, session.element, &ElementPatch::position(target)),
            None => false,
        }
    }

    /// End the active gesture and release its pointer capture.
    ///
    /// A pending drag position is applied first. A drag on a flip card that
    /// never moved it counts as a click and turns the card over.
    pub fn end(&mut self, doc: &mut Document) -> Interaction {
        self.flush_frame(doc);
        let Some(session) = self.session.take() else {
            return Interaction::None;
        };
        let kind = session.kind;
        let id = session.element;
        tracing::debug!("Ending {kind} on {id}");

        let clicked = matches!(session.progress, Progress::Drag { moved: false, .. });
        let page = doc.index_of(session.page);
        drop(session);

        if clicked {
            if let Some(page) = page {
                if Self::toggle_flip(doc, page, id) {
                    return Interaction::Flipped(id);
                }
            }
        }
        Interaction::Ended(kind, id)
    }

    /// Turn a flip card over. Returns `false` for other kinds or missing elements.
    pub fn toggle_flip(doc: &mut Document, page: usize, id: ElementId) -> bool {
        let Some(ElementKind::Flip { is_flipped, .. }) =
            doc.page(page).and_then(|p| p.get(id)).map(|e| &e.kind)
        else {
            return false;
        };
        let flipped = !*is_flipped;
        doc.update_element(page, id, &ElementPatch::flipped(flipped))
    }

    /// Set a flip card's color. Returns `false` for other kinds or missing elements.
    pub fn recolor(doc: &mut Document, page: usize, id: ElementId, color: &str) -> bool {
        let is_flip = doc
            .page(page)
            .and_then(|p| p.get(id))
            .is_some_and(|e| e.kind.is_flip());
        is_flip && doc.update_element(page, id, &ElementPatch::color(color))
    }
}
