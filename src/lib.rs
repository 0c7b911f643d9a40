//! Kagi MCP Library
//!
//! Exposes Kagi web search and FastGPT answers as MCP tools.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use kagi_mcp::{Config, KagiMcpServer};
//!
//! let config = Config::load()?;
//! let server = KagiMcpServer::new(&config)?;
//! // Serve via stdio, or call tools in-process:
//! let result = server.call_tool("kagi_search", serde_json::json!({"query": "rust"})).await?;
//! ```
//!
//! # Configuration
//! Set the `KAGI_API_KEY` env var (required); optionally `KAGI_BASE_URL`,
//! `KAGI_HTTP_TIMEOUT_SECS`, or `~/.config/kagi-mcp.toml`.

pub mod client;
pub mod config;
pub mod error;
pub mod init;
pub mod server;
pub mod types;

// Re-export main server type
pub use server::KagiMcpServer;

// Re-export parameter types for direct API usage
pub use client::KagiClient;
pub use config::Config;
pub use error::Error;
pub use server::{FastGptToolParams, SearchToolParams};
