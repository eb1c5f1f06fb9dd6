use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::pdf::{LopdfRenderer, LopdfWriter};
use crate::selection::Parity;
use crate::session::Session;

pub struct RemoveOptions {
    pub pages: Option<String>,
    pub odd: bool,
    pub even: bool,
    pub invert: bool,
    pub output: Option<PathBuf>,
    pub json: bool,
}

pub async fn run<P: AsRef<Path>>(input: P, options: &RemoveOptions) -> Result<()> {
    let input = input.as_ref();

    if options.pages.is_none() && !options.odd && !options.even {
        anyhow::bail!("No pages specified (pass a range like \"1-3,5\", --odd, or --even)");
    }
    if options.odd && options.even {
        anyhow::bail!("--odd and --even together would select every page");
    }

    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?;
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    let mut session = Session::new(LopdfRenderer, LopdfWriter);
    session
        .load(name, bytes, |pct| debug!(pct, "rendering page previews"))
        .await
        .with_context(|| format!("Failed to load PDF: {}", input.display()))?;

    // Parity replaces the selection, so apply it before the additive range.
    if options.odd {
        session.select_by_parity(Parity::Odd)?;
    }
    if options.even {
        session.select_by_parity(Parity::Even)?;
    }
    if let Some(pages) = &options.pages {
        session.apply_range(pages)?;
        if session.document().map_or(0, |d| d.selected_count()) == 0 {
            anyhow::bail!("Page range \"{}\" matches no pages in the document", pages);
        }
    }
    if options.invert {
        session.invert()?;
    }

    let stats = session.remove_selected().await?;

    let output = session
        .take_output()
        .context("Removal succeeded but produced no output")?;
    let output_path = match &options.output {
        Some(path) => path.clone(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(output.name()),
    };
    std::fs::write(&output_path, output.bytes())
        .with_context(|| format!("Failed to write PDF: {}", output_path.display()))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "Removed {} page(s), kept {} of {}",
            stats.deleted_pages, stats.kept_pages, stats.original_pages
        );
        println!("Wrote {}", output_path.display());
    }

    Ok(())
}
