use lopdf::{Document, Object};

use super::{DocumentRenderer, PreviewHandle, RenderedPage};
use crate::error::LoadError;

// Fallback when no MediaBox is found anywhere in the page tree (US Letter).
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// [`DocumentRenderer`] backed by lopdf.
///
/// Parses the document structure and reports each page's dimensions from its
/// MediaBox (following Parent inheritance). The preview handle encodes the
/// page's object id; rasterization is left to a richer renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfRenderer;

impl DocumentRenderer for LopdfRenderer {
    fn render(
        &self,
        bytes: &[u8],
        on_progress: &mut dyn FnMut(u8),
    ) -> Result<Vec<RenderedPage>, LoadError> {
        let doc = Document::load_mem(bytes).map_err(|e| LoadError::Corrupt(e.to_string()))?;

        if doc.is_encrypted() {
            return Err(LoadError::Encrypted);
        }

        let mut page_ids: Vec<_> = doc.get_pages().into_iter().collect();
        page_ids.sort_by_key(|(num, _)| *num);

        if page_ids.is_empty() {
            return Err(LoadError::Unsupported("document has no pages".into()));
        }

        let total = page_ids.len();
        let mut pages = Vec::with_capacity(total);
        for (i, (_, object_id)) in page_ids.into_iter().enumerate() {
            let (width, height) = media_box_size(&doc, object_id).unwrap_or(DEFAULT_PAGE_SIZE);
            pages.push(RenderedPage {
                index: i,
                preview: PreviewHandle((u64::from(object_id.0) << 16) | u64::from(object_id.1)),
                width,
                height,
            });
            on_progress((((i + 1) * 100) / total) as u8);
        }

        Ok(pages)
    }
}

/// Width and height from the page's MediaBox, walking up the Parent chain
/// when the page dictionary does not carry one itself.
fn media_box_size(doc: &Document, page_id: lopdf::ObjectId) -> Option<(f32, f32)> {
    let mut current = page_id;
    for _ in 0..32 {
        let dict = doc.get_object(current).ok()?.as_dict().ok()?;

        if let Ok(media_box) = dict.get(b"MediaBox") {
            let media_box = resolve(doc, media_box)?;
            if let Object::Array(values) = media_box {
                if values.len() == 4 {
                    let nums: Vec<f32> = values.iter().filter_map(number).collect();
                    if let [x0, y0, x1, y1] = nums[..] {
                        return Some(((x1 - x0).abs(), (y1 - y0).abs()));
                    }
                }
            }
            return None;
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return None,
        }
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::test_fixtures::sample_pdf;

    #[test]
    fn test_render_reports_all_pages_in_order() {
        let bytes = sample_pdf(4);
        let mut progress = Vec::new();
        let pages = LopdfRenderer
            .render(&bytes, &mut |pct| progress.push(pct))
            .unwrap();

        assert_eq!(pages.len(), 4);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.index, i);
            assert_eq!(page.width, 612.0);
            assert_eq!(page.height, 792.0);
        }
        assert_eq!(progress, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_render_rejects_garbage() {
        let mut noop = |_: u8| {};
        let err = LopdfRenderer
            .render(b"not a pdf", &mut noop)
            .unwrap_err();
        assert!(matches!(err, LoadError::Corrupt(_)));
    }
}
