use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pagedrop")]
#[command(about = "Remove pages from a PDF, with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Show page count and page dimensions
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Remove pages and write the remaining ones to a new PDF
    #[command(alias = "rm")]
    Remove {
        /// PDF file to remove pages from
        path: PathBuf,

        /// Pages to remove (e.g. "1-3,5"; bounds may be reversed)
        pages: Option<String>,

        /// Also remove all odd-numbered pages
        #[arg(long)]
        odd: bool,

        /// Also remove all even-numbered pages
        #[arg(long)]
        even: bool,

        /// Invert the selection before removing (keep the named pages)
        #[arg(long)]
        invert: bool,

        /// Output file (default: processed_<input-name> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the processing stats as JSON
        #[arg(long)]
        json: bool,
    },
}
