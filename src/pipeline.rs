use std::sync::Arc;

use tracing::debug;

use crate::error::{ReconstructionError, ValidationError};
use crate::pdf::DocumentWriter;

/// Produce new document bytes containing exactly the kept pages, in original
/// relative order.
///
/// This is a terminal async task: it resolves to the output bytes or a single
/// failure, with no intermediate progress and no automatic retry. An empty
/// `kept` list is rejected up front, before the writer is ever invoked. The
/// writer works on the owned `source` copy, never on a buffer shared with the
/// catalog.
pub async fn reconstruct<W>(
    writer: Arc<W>,
    source: Vec<u8>,
    kept: Vec<usize>,
) -> Result<Vec<u8>, ReconstructionError>
where
    W: DocumentWriter + ?Sized + 'static,
{
    if kept.is_empty() {
        return Err(ValidationError::AllPagesSelectedForDeletion.into());
    }

    debug!(kept = kept.len(), source_len = source.len(), "reconstructing document");

    let bytes = tokio::task::spawn_blocking(move || writer.compose(&source, &kept))
        .await
        .map_err(|e| ReconstructionError::Task(e.to_string()))??;

    debug!(output_len = bytes.len(), "reconstruction complete");
    Ok(bytes)
}
