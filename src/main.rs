mod catalog;
mod cli;
mod commands;
mod error;
mod mcp;
mod page_range;
mod pdf;
mod pipeline;
mod selection;
mod session;
mod stats;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr so MCP stdio traffic stays clean.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagedrop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Info { path } => {
            commands::info::run(&path).await?;
        }
        Commands::Remove {
            path,
            pages,
            odd,
            even,
            invert,
            output,
            json,
        } => {
            let options = commands::remove::RemoveOptions {
                pages,
                odd,
                even,
                invert,
                output,
                json,
            };
            commands::remove::run(&path, &options).await?;
        }
    }

    Ok(())
}
