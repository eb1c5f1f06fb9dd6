use serde::Serialize;

/// Summary of a completed removal run.
///
/// `saved_size_ratio` is a page-count approximation (`1 - kept/original`),
/// not a byte-level size measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProcessingStats {
    pub original_pages: u32,
    pub deleted_pages: u32,
    pub kept_pages: u32,
    pub saved_size_ratio: f64,
}

/// Derive stats from before/after page counts.
///
/// Pure; the caller guarantees `1 <= kept_pages <= original_pages`.
pub fn compute_stats(original_pages: u32, kept_pages: u32) -> ProcessingStats {
    ProcessingStats {
        original_pages,
        deleted_pages: original_pages - kept_pages,
        kept_pages,
        saved_size_ratio: 1.0 - f64::from(kept_pages) / f64::from(original_pages),
    }
}
