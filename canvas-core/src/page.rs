//! A page: one exportable canvas surface holding elements in paint order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::affordance::{hit_test, Affordance};
use crate::element::{Element, ElementId, ElementPatch};
use crate::geometry::Point;

/// Stable identifier for a page, independent of its position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(Uuid);

impl PageId {
    /// Create a new unique page ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An ordered list of elements. Later elements paint above earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    id: PageId,
    elements: Vec<Element>,
}

impl Page {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The page's stable identifier.
    #[must_use]
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Append an element on top of the others.
    pub fn push(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Apply a partial update to the matching element.
    ///
    /// Returns `false` (and changes nothing) when no element matches.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => {
                element.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the matching element, keeping the order of the rest.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Number of elements on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the page has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Find the topmost element under `point` and the part of it that was hit.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<(ElementId, Affordance)> {
        self.elements
            .iter()
            .rev()
            .find_map(|e| hit_test(e, point).map(|a| (e.id, a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn test_topmost_element_wins() {
        let mut page = Page::new();
        let below = page.push(Element::new(ElementKind::text("below")));
        let above = page.push(Element::new(ElementKind::text("above")));

        let (hit, part) = page.element_at(Point::new(120.0, 100.0)).expect("hit");
        assert_eq!(hit, above);
        assert_eq!(part, Affordance::Body);
        assert_ne!(hit, below);
    }

    #[test]
    fn test_update_and_remove_miss_are_noops() {
        let mut page = Page::new();
        page.push(Element::new(ElementKind::text("a")));
        page.push(Element::new(ElementKind::image("b.png")));
        let before = page.clone();

        let stranger = ElementId::new();
        assert!(!page.update(stranger, &ElementPatch::rotation(45)));
        assert!(page.remove(stranger).is_none());
        assert_eq!(page, before);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut page = Page::new();
        let a = page.push(Element::new(ElementKind::text("a")));
        let b = page.push(Element::new(ElementKind::text("b")));
        let c = page.push(Element::new(ElementKind::text("c")));

        page.remove(b);
        let ids: Vec<_> = page.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, c]);
    }
}
