use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::{PageCatalog, PageDescriptor};
use crate::error::{LoadError, ReconstructionError, ValidationError};
use crate::pdf::{DocumentRenderer, DocumentWriter};
use crate::pipeline;
use crate::selection::{Parity, SelectionEngine, SelectionHistory};
use crate::stats::{compute_stats, ProcessingStats};

/// Where the session currently is in its lifecycle.
///
/// `LoadError` is terminal until a fresh load; `ReconstructError` is
/// recoverable: the catalog and selection survive, so the same or an adjusted
/// selection can be retried without reloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Ready,
    LoadError,
    Analyzing,
    Success,
    ReconstructError,
}

/// The active document: its identity, the authoritative source bytes, and
/// the page catalog built from them.
///
/// The source bytes are exclusively owned here until reset; the renderer and
/// writer each work on an independent copy.
#[derive(Debug)]
pub struct LoadedDocument {
    name: String,
    source_bytes: Vec<u8>,
    catalog: PageCatalog,
}

impl LoadedDocument {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.source_bytes.len()
    }

    pub fn page_count(&self) -> u32 {
        self.catalog.page_count()
    }

    pub fn pages(&self) -> &[PageDescriptor] {
        self.catalog.pages()
    }

    pub fn selected_count(&self) -> usize {
        self.catalog.selected_count()
    }
}

/// The reconstructed document, ready to hand to a download or export step.
#[derive(Debug)]
pub struct Output {
    name: String,
    bytes: Vec<u8>,
}

impl Output {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A page-removal session: one document at a time, explicit lifecycle.
///
/// Owns the loaded document, the selection engine and its history, and the
/// output of a successful removal. All long-running work (rendering during
/// load, reconstruction) runs as async tasks on the blocking pool; the
/// session itself is single-threaded and processes one operation at a time,
/// which `&mut self` enforces. Cancellation is not supported: a started load
/// or removal runs to completion or failure.
pub struct Session<R, W> {
    renderer: Arc<R>,
    writer: Arc<W>,
    status: SessionStatus,
    document: Option<LoadedDocument>,
    engine: SelectionEngine,
    output: Option<Output>,
    stats: Option<ProcessingStats>,
}

impl<R, W> Session<R, W>
where
    R: DocumentRenderer + 'static,
    W: DocumentWriter + 'static,
{
    pub fn new(renderer: R, writer: W) -> Self {
        Session {
            renderer: Arc::new(renderer),
            writer: Arc::new(writer),
            status: SessionStatus::Idle,
            document: None,
            engine: SelectionEngine::new(),
            output: None,
            stats: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn stats(&self) -> Option<&ProcessingStats> {
        self.stats.as_ref()
    }

    pub fn output(&self) -> Option<&Output> {
        self.output.as_ref()
    }

    pub fn take_output(&mut self) -> Option<Output> {
        self.output.take()
    }

    pub fn history(&self) -> &SelectionHistory {
        self.engine.history()
    }

    /// Load a document, replacing whatever the session held before.
    ///
    /// The renderer is invoked exactly once, on an independent copy of
    /// `bytes`, and is not retried on failure. `on_progress` is called once
    /// per rendered page with a monotonically non-decreasing percentage in
    /// `0..=100`.
    pub async fn load<F>(
        &mut self,
        name: impl Into<String>,
        bytes: Vec<u8>,
        mut on_progress: F,
    ) -> Result<(), LoadError>
    where
        F: FnMut(u8) + Send + 'static,
    {
        self.reset();
        self.status = SessionStatus::Loading;

        let name = name.into();
        debug!(name = %name, size = bytes.len(), "loading document");

        // The renderer gets its own copy so it can never consume or mutate
        // the bytes reconstruction needs later.
        let render_bytes = bytes.clone();
        let renderer = Arc::clone(&self.renderer);
        let rendered = tokio::task::spawn_blocking(move || {
            renderer.render(&render_bytes, &mut on_progress)
        })
        .await
        .map_err(|e| LoadError::IoFailure(e.to_string()))
        .and_then(|r| r);

        match rendered {
            Ok(pages) => {
                let catalog = PageCatalog::from_rendered(pages);
                info!(name = %name, pages = catalog.page_count(), "document loaded");
                self.document = Some(LoadedDocument {
                    name,
                    source_bytes: bytes,
                    catalog,
                });
                self.engine = SelectionEngine::new();
                self.status = SessionStatus::Ready;
                Ok(())
            }
            Err(e) => {
                self.status = SessionStatus::LoadError;
                Err(e)
            }
        }
    }

    /// Discard the document, selection, history, and any output.
    pub fn reset(&mut self) {
        self.document = None;
        self.engine = SelectionEngine::new();
        self.output = None;
        self.stats = None;
        self.status = SessionStatus::Idle;
    }

    pub fn toggle(&mut self, id: u32) -> Result<(), ValidationError> {
        let (catalog, engine) = self.parts()?;
        engine.toggle(catalog, id);
        Ok(())
    }

    pub fn select_all(&mut self) -> Result<(), ValidationError> {
        let (catalog, engine) = self.parts()?;
        engine.select_all(catalog);
        Ok(())
    }

    pub fn deselect_all(&mut self) -> Result<(), ValidationError> {
        let (catalog, engine) = self.parts()?;
        engine.deselect_all(catalog);
        Ok(())
    }

    pub fn invert(&mut self) -> Result<(), ValidationError> {
        let (catalog, engine) = self.parts()?;
        engine.invert(catalog);
        Ok(())
    }

    pub fn select_by_parity(&mut self, parity: Parity) -> Result<(), ValidationError> {
        let (catalog, engine) = self.parts()?;
        engine.select_by_parity(catalog, parity);
        Ok(())
    }

    /// Add the pages named by `expr` to the selection (additive; see
    /// [`SelectionEngine::apply_range`]).
    pub fn apply_range(&mut self, expr: &str) -> Result<(), ValidationError> {
        let (catalog, engine) = self.parts()?;
        engine.apply_range(catalog, expr);
        Ok(())
    }

    /// Remove the selected pages: reconstruct the document from the kept
    /// pages and record the output and stats.
    ///
    /// A selection covering every page is rejected before any work begins
    /// and leaves the session state untouched. Writer failures move the
    /// session to `ReconstructError` but preserve the catalog and selection
    /// for a retry.
    pub async fn remove_selected(&mut self) -> Result<ProcessingStats, ReconstructionError> {
        let (source, kept, original_pages) = {
            let doc = self
                .document
                .as_ref()
                .ok_or(ValidationError::NoDocument)?;
            let kept = doc.catalog.kept_indices();
            if kept.is_empty() {
                return Err(ValidationError::AllPagesSelectedForDeletion.into());
            }
            (doc.source_bytes.clone(), kept, doc.catalog.page_count())
        };

        self.status = SessionStatus::Analyzing;
        let kept_pages = kept.len() as u32;

        match pipeline::reconstruct(Arc::clone(&self.writer), source, kept).await {
            Ok(bytes) => {
                let stats = compute_stats(original_pages, kept_pages);
                let name = self
                    .document
                    .as_ref()
                    .map(|d| format!("processed_{}", d.name))
                    .unwrap_or_else(|| "processed_document".into());
                info!(
                    name = %name,
                    kept = stats.kept_pages,
                    deleted = stats.deleted_pages,
                    "removal complete"
                );
                self.output = Some(Output { name, bytes });
                self.stats = Some(stats);
                self.status = SessionStatus::Success;
                Ok(stats)
            }
            Err(e) => {
                self.status = SessionStatus::ReconstructError;
                Err(e)
            }
        }
    }

    fn parts(&mut self) -> Result<(&mut PageCatalog, &mut SelectionEngine), ValidationError> {
        match self.document.as_mut() {
            Some(doc) => Ok((&mut doc.catalog, &mut self.engine)),
            None => Err(ValidationError::NoDocument),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::error::WriteError;
    use crate::pdf::test_fixtures::{page_contents, sample_pdf};
    use crate::pdf::{LopdfRenderer, LopdfWriter};

    fn session() -> Session<LopdfRenderer, LopdfWriter> {
        Session::new(LopdfRenderer, LopdfWriter)
    }

    #[tokio::test]
    async fn test_load_builds_catalog_with_contiguous_ids() {
        let mut session = session();
        session
            .load("manual.pdf", sample_pdf(10), |_| {})
            .await
            .unwrap();

        assert_eq!(session.status(), SessionStatus::Ready);
        let doc = session.document().unwrap();
        assert_eq!(doc.page_count(), 10);
        for (i, page) in doc.pages().iter().enumerate() {
            assert_eq!(page.id, i as u32 + 1);
            assert_eq!(page.original_index, page.id as usize - 1);
        }
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_load_progress_is_monotonic_and_reaches_100() {
        let progress = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&progress);

        let mut session = session();
        session
            .load("manual.pdf", sample_pdf(8), move |pct| {
                sink.lock().unwrap().push(pct);
            })
            .await
            .unwrap();

        let progress = progress.lock().unwrap();
        assert_eq!(progress.len(), 8);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*progress.last().unwrap(), 100);
    }

    #[tokio::test]
    async fn test_load_failure_is_terminal_until_new_load() {
        let mut session = session();
        let err = session
            .load("broken.pdf", b"not a pdf".to_vec(), |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::Corrupt(_)));
        assert_eq!(session.status(), SessionStatus::LoadError);
        assert!(session.document().is_none());
        assert_eq!(session.toggle(1), Err(ValidationError::NoDocument));
    }

    #[tokio::test]
    async fn test_end_to_end_odd_parity_removal() {
        let mut session = session();
        session
            .load("manual.pdf", sample_pdf(10), |_| {})
            .await
            .unwrap();

        session.select_by_parity(Parity::Odd).unwrap();
        assert_eq!(session.document().unwrap().selected_count(), 5);

        let stats = session.remove_selected().await.unwrap();
        assert_eq!(session.status(), SessionStatus::Success);
        assert_eq!(stats.original_pages, 10);
        assert_eq!(stats.deleted_pages, 5);
        assert_eq!(stats.kept_pages, 5);
        assert!((stats.saved_size_ratio - 0.5).abs() < f64::EPSILON);

        let output = session.output().unwrap();
        assert_eq!(output.name(), "processed_manual.pdf");
        // Odd ids removed, so source indices 1,3,5,7,9 (0-based) survive.
        let contents = page_contents(output.bytes());
        assert_eq!(contents.len(), 5);
        for (i, expected) in ["Page 2", "Page 4", "Page 6", "Page 8", "Page 10"]
            .iter()
            .enumerate()
        {
            assert!(contents[i].contains(expected));
        }
    }

    #[tokio::test]
    async fn test_removing_every_page_is_rejected_without_state_change() {
        let mut session = session();
        session
            .load("manual.pdf", sample_pdf(3), |_| {})
            .await
            .unwrap();
        session.select_all().unwrap();

        let err = session.remove_selected().await.unwrap_err();
        assert!(matches!(
            err,
            ReconstructionError::Invalid(ValidationError::AllPagesSelectedForDeletion)
        ));
        assert_eq!(session.status(), SessionStatus::Ready);
        assert!(session.output().is_none());

        // The selection can be adjusted and the removal retried.
        session.toggle(2).unwrap();
        let stats = session.remove_selected().await.unwrap();
        assert_eq!(stats.kept_pages, 1);
    }

    #[tokio::test]
    async fn test_additive_range_selection_end_to_end() {
        let mut session = session();
        session
            .load("manual.pdf", sample_pdf(10), |_| {})
            .await
            .unwrap();

        session.apply_range("2-4").unwrap();
        session.apply_range("6").unwrap();

        let doc = session.document().unwrap();
        let selected: Vec<u32> = doc
            .pages()
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.id)
            .collect();
        assert_eq!(selected, vec![2, 3, 4, 6]);
    }

    /// Writer that fails the first compose, then defers to lopdf.
    struct FlakyWriter {
        failed_once: AtomicBool,
    }

    impl crate::pdf::DocumentWriter for FlakyWriter {
        fn compose(&self, bytes: &[u8], kept: &[usize]) -> Result<Vec<u8>, WriteError> {
            if !self.failed_once.swap(true, Ordering::SeqCst) {
                return Err(WriteError("synthetic compose failure".into()));
            }
            LopdfWriter.compose(bytes, kept)
        }
    }

    #[tokio::test]
    async fn test_writer_failure_is_recoverable_with_selection_intact() {
        let mut session = Session::new(
            LopdfRenderer,
            FlakyWriter {
                failed_once: AtomicBool::new(false),
            },
        );
        session
            .load("manual.pdf", sample_pdf(4), |_| {})
            .await
            .unwrap();
        session.apply_range("1-2").unwrap();

        let err = session.remove_selected().await.unwrap_err();
        assert!(matches!(err, ReconstructionError::Writer(_)));
        assert_eq!(session.status(), SessionStatus::ReconstructError);
        assert_eq!(session.document().unwrap().selected_count(), 2);

        let stats = session.remove_selected().await.unwrap();
        assert_eq!(stats.kept_pages, 2);
        assert_eq!(session.status(), SessionStatus::Success);
    }

    #[tokio::test]
    async fn test_reset_releases_everything() {
        let mut session = session();
        session
            .load("manual.pdf", sample_pdf(2), |_| {})
            .await
            .unwrap();
        session.toggle(1).unwrap();
        session.remove_selected().await.unwrap();
        assert_eq!(session.status(), SessionStatus::Success);

        session.reset();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.document().is_none());
        assert!(session.output().is_none());
        assert!(session.stats().is_none());
        assert_eq!(session.history().len(), 1);
    }
}
