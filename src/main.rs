//! Kagi MCP Server
//!
//! Exposes Kagi web search (`kagi_search`) and FastGPT answers
//! (`kagi_fastgpt`) as MCP tools over stdio.
//!
//! # Configuration
//! Set the `KAGI_API_KEY` env var (required); optionally `KAGI_BASE_URL`
//! or configure in `~/.config/kagi-mcp.toml`

use rmcp::{transport::stdio, ServiceExt};

mod client;
mod config;
mod error;
mod init;
mod server;
mod types;

use config::Config;
use server::KagiMcpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init::init_tracing("kagi_mcp")?;

    tracing::info!("Starting Kagi MCP Server");

    let config = Config::load()?;
    tracing::info!("Kagi API base URL: {}", config.api.base_url);

    let server = KagiMcpServer::new(&config)?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
