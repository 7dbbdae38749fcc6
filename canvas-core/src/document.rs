//! The multi-page document and its mutation surface.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use crate::page::{Page, PageId};
use crate::{CanvasError, CanvasResult};

/// An ordered list of pages plus the index of the page being edited.
///
/// A document always holds at least one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pages: Vec<Page>,
    active: usize,
}

impl Document {
    /// Create a document with a single empty page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new()],
            active: 0,
        }
    }

    /// Append an empty page and make it the active page.
    pub fn add_page(&mut self) -> PageId {
        let page = Page::new();
        let id = page.id();
        self.pages.push(page);
        self.active = self.pages.len() - 1;
        tracing::debug!("Added page {id}, now {} pages", self.pages.len());
        id
    }

    /// Remove the page at `index`.
    ///
    /// Does nothing and returns `false` when `index` is out of range or the
    /// page is the last one left. The active page stays the same page when
    /// an earlier page is removed; removing the active page activates the
    /// page that took its place, or the new last page.
    pub fn remove_page(&mut self, index: usize) -> bool {
        if self.pages.len() <= 1 || index >= self.pages.len() {
            tracing::debug!(
                "Ignoring removal of page {index} from {}-page document",
                self.pages.len()
            );
            return false;
        }

        let removed = self.pages.remove(index);
        if index < self.active {
            self.active -= 1;
        }
        self.active = self.active.min(self.pages.len() - 1);

        tracing::debug!(
            "Removed page {} ({} elements), active page {}",
            removed.id(),
            removed.len(),
            self.active
        );
        true
    }

    /// Make the page at `index` the active page.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::PageOutOfRange`] and leaves the active page
    /// unchanged if `index` is not a page.
    pub fn switch_page(&mut self, index: usize) -> CanvasResult<()> {
        if index >= self.pages.len() {
            return Err(CanvasError::PageOutOfRange {
                index,
                len: self.pages.len(),
            });
        }
        self.active = index;
        Ok(())
    }

    /// Create an element at the default position on the active page.
    ///
    /// `width` and `height` override the kind's default size.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        width: Option<f32>,
        height: Option<f32>,
    ) -> ElementId {
        let element = Element::new(kind).with_size(width, height);
        tracing::debug!(
            "Adding {} element {} to page {}",
            element.kind.name(),
            element.id,
            self.active
        );
        let active = self.active;
        self.pages[active].push(element)
    }

    /// Apply a partial update to an element.
    ///
    /// Returns `false` and changes nothing if the page or element does not exist.
    pub fn update_element(&mut self, page: usize, id: ElementId, patch: &ElementPatch) -> bool {
        let applied = self
            .pages
            .get_mut(page)
            .is_some_and(|p| p.update(id, patch));
        if applied {
            tracing::trace!("Updated element {id} on page {page}");
        } else {
            tracing::debug!("Update for missing element {id} on page {page} ignored");
        }
        applied
    }

    /// Delete an element.
    ///
    /// Returns `false` and changes nothing if the page or element does not exist.
    pub fn delete_element(&mut self, page: usize, id: ElementId) -> bool {
        let removed = self.pages.get_mut(page).and_then(|p| p.remove(id));
        match removed {
            Some(element) => {
                tracing::debug!("Deleted {} element {id} from page {page}", element.kind.name());
                true
            }
            None => false,
        }
    }

    /// Index of the active page.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active page.
    #[must_use]
    pub fn active_page(&self) -> &Page {
        &self.pages[self.active]
    }

    /// Get a page by index.
    #[must_use]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// All pages in display order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Current index of the page with the given ID.
    #[must_use]
    pub fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == id)
    }

    /// Look up an element on the active page.
    #[must_use]
    pub fn active_element(&self, id: ElementId) -> Option<&Element> {
        self.active_page().get(id)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_one_empty_page() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.active_index(), 0);
        assert!(doc.active_page().is_empty());
    }

    #[test]
    fn test_add_page_activates_it() {
        let mut doc = Document::new();
        let id = doc.add_page();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.active_index(), 1);
        assert_eq!(doc.index_of(id), Some(1));
    }

    #[test]
    fn test_last_page_cannot_be_removed() {
        let mut doc = Document::new();
        assert!(!doc.remove_page(0));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_remove_out_of_range_is_ignored() {
        let mut doc = Document::new();
        doc.add_page();
        assert!(!doc.remove_page(5));
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_remove_active_last_page_clamps() {
        let mut doc = Document::new();
        doc.add_page();
        doc.add_page();
        assert_eq!(doc.active_index(), 2);
        assert!(doc.remove_page(2));
        assert_eq!(doc.active_index(), 1);
    }

    #[test]
    fn test_remove_earlier_page_keeps_active_page() {
        let mut doc = Document::new();
        doc.add_page();
        let third = doc.add_page();
        doc.add_page();
        doc.switch_page(2).expect("switch");

        assert!(doc.remove_page(0));
        assert_eq!(doc.active_page().id(), third);
        assert_eq!(doc.active_index(), 1);
    }

    #[test]
    fn test_switch_page_out_of_range_rejected() {
        let mut doc = Document::new();
        let err = doc.switch_page(3).expect_err("out of range");
        assert_eq!(err, CanvasError::PageOutOfRange { index: 3, len: 1 });
        assert_eq!(doc.active_index(), 0);
    }

    #[test]
    fn test_elements_go_to_active_page() {
        let mut doc = Document::new();
        doc.add_page();
        let id = doc.add_element(ElementKind::text("hi"), None, None);
        assert!(doc.page(0).expect("page 0").is_empty());
        assert!(doc.active_element(id).is_some());
    }

    #[test]
    fn test_update_on_missing_page_is_noop() {
        let mut doc = Document::new();
        let id = doc.add_element(ElementKind::text("hi"), None, None);
        assert!(!doc.update_element(4, id, &ElementPatch::rotation(10)));
        assert!(!doc.delete_element(4, id));
        assert_eq!(doc.active_page().len(), 1);
    }
}
