pub mod render;
pub mod write;

#[cfg(test)]
pub mod test_fixtures;

pub use render::LopdfRenderer;
pub use write::LopdfWriter;

use crate::error::{LoadError, WriteError};

/// Opaque token identifying a page preview owned by the renderer that
/// produced it. The core never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewHandle(pub u64);

/// One page as reported by a renderer: its 0-based position in the source
/// bytes, a preview handle, and the page dimensions in points.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub index: usize,
    pub preview: PreviewHandle,
    pub width: f32,
    pub height: f32,
}

/// Renders a document's pages for cataloging.
///
/// Invoked exactly once per load, with an independent copy of the source
/// bytes. Implementations call `on_progress` once per completed page with a
/// monotonically non-decreasing percentage in `0..=100`.
pub trait DocumentRenderer: Send + Sync {
    fn render(
        &self,
        bytes: &[u8],
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<Vec<RenderedPage>, LoadError>;
}

/// Composes a new document from a subset of another document's pages.
///
/// `kept` holds 0-based page indices in the order the output should carry
/// them; the reconstruction pipeline always passes them ascending. The writer
/// receives an independent copy of the source bytes and must never be called
/// with an empty `kept` list.
pub trait DocumentWriter: Send + Sync {
    fn compose(&self, bytes: &[u8], kept: &[usize]) -> Result<Vec<u8>, WriteError>;
}
