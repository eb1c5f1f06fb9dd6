use std::path::Path;

use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::pdf::{LopdfRenderer, LopdfWriter};
use crate::selection::Parity;
use crate::session::Session;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PdfRemovePagesRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Pages to remove, e.g. '1-3,5' (bounds may be reversed); \
                              'odd' and 'even' remove every odd/even page")]
    pub pages: String,
    #[schemars(description = "Output file path (default: processed_<input-name> next to the input)")]
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PagedropServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl PagedropServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for PagedropServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn load_session(path: &str) -> Result<Session<LopdfRenderer, LopdfWriter>> {
    let bytes = std::fs::read(path)?;
    let name = Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document.pdf")
        .to_string();
    let mut session = Session::new(LopdfRenderer, LopdfWriter);
    session.load(name, bytes, |_| {}).await?;
    Ok(session)
}

#[tool_router]
impl PagedropServer {
    #[tool(description = "Get page count and page dimensions of a PDF")]
    async fn pdf_info(&self, Parameters(PdfInfoRequest { path }): Parameters<PdfInfoRequest>) -> String {
        let session = match load_session(&path).await {
            Ok(s) => s,
            Err(e) => return format!("Error: {}", e),
        };
        let doc = match session.document() {
            Some(d) => d,
            None => return "Error: no document loaded".to_string(),
        };
        let result = PdfInfoResult {
            path,
            page_count: doc.page_count(),
            pages: doc
                .pages()
                .iter()
                .map(|p| PageInfoResult {
                    id: p.id,
                    width: p.width,
                    height: p.height,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(
        description = "Remove pages from a PDF and save the remaining pages to a new file. \
                       Use page range syntax like '1-3,5', or 'odd'/'even'."
    )]
    async fn pdf_remove_pages(
        &self,
        Parameters(req): Parameters<PdfRemovePagesRequest>,
    ) -> String {
        let mut session = match load_session(&req.path).await {
            Ok(s) => s,
            Err(e) => return format!("Error: {}", e),
        };

        let selected = match req.pages.trim() {
            "odd" => session.select_by_parity(Parity::Odd),
            "even" => session.select_by_parity(Parity::Even),
            expr => session.apply_range(expr),
        };
        if let Err(e) = selected {
            return format!("Error: {}", e);
        }
        if session.document().map_or(0, |d| d.selected_count()) == 0 {
            return format!("Error: '{}' matches no pages in the document", req.pages);
        }

        let stats = match session.remove_selected().await {
            Ok(s) => s,
            Err(e) => return format!("Error: {}", e),
        };
        let output = match session.take_output() {
            Some(o) => o,
            None => return "Error: removal produced no output".to_string(),
        };

        let output_path = req.output.unwrap_or_else(|| {
            Path::new(&req.path)
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(output.name())
                .display()
                .to_string()
        });
        if let Err(e) = std::fs::write(&output_path, output.bytes()) {
            return format!("Error: {}", e);
        }

        let result = RemovePagesResult {
            output_path,
            original_pages: stats.original_pages,
            deleted_pages: stats.deleted_pages,
            kept_pages: stats.kept_pages,
            saved_size_ratio: stats.saved_size_ratio,
        };
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PageInfoResult {
    pub id: u32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub pages: Vec<PageInfoResult>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RemovePagesResult {
    pub output_path: String,
    pub original_pages: u32,
    pub deleted_pages: u32,
    pub kept_pages: u32,
    pub saved_size_ratio: f64,
}

impl ServerHandler for PagedropServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF page removal tools. Use pdf_info to inspect a document's pages and \
                 pdf_remove_pages to delete a set of pages and write the remaining ones \
                 to a new PDF."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = PagedropServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
