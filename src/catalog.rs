use std::collections::BTreeSet;

use crate::pdf::{PreviewHandle, RenderedPage};

/// One page of the loaded document.
///
/// `id` is the 1-based position in the loaded document and is stable for the
/// session; `original_index` is the 0-based position in the source bytes and
/// always equals `id - 1`.
#[derive(Debug, Clone)]
pub struct PageDescriptor {
    pub id: u32,
    pub original_index: usize,
    pub selected: bool,
    pub preview: PreviewHandle,
    pub width: f32,
    pub height: f32,
}

/// Ordered page list for the active document.
///
/// Built once per load from the renderer's output. Page order never changes
/// afterwards; only the `selected` flag mutates, and only through the
/// selection engine.
#[derive(Debug, Default)]
pub struct PageCatalog {
    pages: Vec<PageDescriptor>,
}

impl PageCatalog {
    /// Build the catalog from rendered pages, assigning 1-based ids in
    /// source order.
    pub fn from_rendered(rendered: Vec<RenderedPage>) -> Self {
        let pages = rendered
            .into_iter()
            .enumerate()
            .map(|(i, page)| {
                debug_assert_eq!(page.index, i);
                PageDescriptor {
                    id: i as u32 + 1,
                    original_index: i,
                    selected: false,
                    preview: page.preview,
                    width: page.width,
                    height: page.height,
                }
            })
            .collect();
        PageCatalog { pages }
    }

    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        &self.pages
    }

    pub(crate) fn pages_mut(&mut self) -> &mut [PageDescriptor] {
        &mut self.pages
    }

    /// Flip the selected flag of `id`. Unknown ids are ignored.
    pub(crate) fn toggle(&mut self, id: u32) {
        if let Some(page) = self.pages.iter_mut().find(|p| p.id == id) {
            page.selected = !page.selected;
        }
    }

    /// Ids of the currently selected pages.
    pub fn selected_ids(&self) -> BTreeSet<u32> {
        self.pages
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.id)
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.pages.iter().filter(|p| p.selected).count()
    }

    /// 0-based source indices of the pages that survive a removal, in
    /// original document order.
    pub fn kept_indices(&self) -> Vec<usize> {
        self.pages
            .iter()
            .filter(|p| !p.selected)
            .map(|p| p.original_index)
            .collect()
    }
}
