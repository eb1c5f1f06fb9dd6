use std::path::Path;

use anyhow::{Context, Result};

use crate::pdf::{LopdfRenderer, LopdfWriter};
use crate::session::Session;

pub async fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read PDF: {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    let mut session = Session::new(LopdfRenderer, LopdfWriter);
    session
        .load(name, bytes, |_| {})
        .await
        .with_context(|| format!("Failed to load PDF: {}", path.display()))?;

    let doc = session.document().expect("document is loaded");
    println!("File: {}", path.display());
    println!("Size: {}", format_file_size(doc.size() as u64));
    println!("Pages: {}", doc.page_count());

    let mut sizes: Vec<(u32, u32)> = doc
        .pages()
        .iter()
        .map(|p| (p.width.round() as u32, p.height.round() as u32))
        .collect();
    sizes.dedup();
    match sizes.as_slice() {
        [(w, h)] => println!("Page size: {} x {} pt", w, h),
        _ => println!("Page size: mixed"),
    }

    Ok(())
}

fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    if exponent == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[exponent])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.00 MB");
    }
}
