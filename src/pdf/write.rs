use std::collections::BTreeSet;

use lopdf::Document;

use super::DocumentWriter;
use crate::error::WriteError;

/// [`DocumentWriter`] backed by lopdf.
///
/// Re-parses the source bytes, deletes every page not in the kept list, and
/// serializes the result. Remaining pages keep their source order, which is
/// exactly the ascending order the pipeline passes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfWriter;

impl DocumentWriter for LopdfWriter {
    fn compose(&self, bytes: &[u8], kept: &[usize]) -> Result<Vec<u8>, WriteError> {
        let mut doc = Document::load_mem(bytes)
            .map_err(|e| WriteError(format!("failed to parse source document: {}", e)))?;

        let total = doc.get_pages().len();
        for &index in kept {
            if index >= total {
                return Err(WriteError(format!(
                    "page index {} out of range (document has {} pages)",
                    index, total
                )));
            }
        }

        // lopdf numbers pages from 1.
        let keep: BTreeSet<u32> = kept.iter().map(|&i| i as u32 + 1).collect();
        let delete: Vec<u32> = (1..=total as u32).filter(|n| !keep.contains(n)).collect();
        if !delete.is_empty() {
            doc.delete_pages(&delete);
        }
        doc.prune_objects();

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| WriteError(format!("failed to serialize output document: {}", e)))?;
        Ok(out)
    }
}
