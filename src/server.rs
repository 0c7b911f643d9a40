//! MCP server implementation for the Kagi tools
//!
//! Exposes exactly two tools, `kagi_search` and `kagi_fastgpt`. Remote API
//! failures are returned as error-flagged tool results so the calling agent
//! can see and react to them; only an unknown tool name or malformed
//! arguments surface as protocol-level errors.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ErrorCode, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::client::KagiClient;
use crate::config::Config;
use crate::error::Error;
use crate::types::{FastGptParams, FastGptToolOutput, SearchParams, SearchToolOutput};

/// The main Kagi MCP Server
#[derive(Clone)]
pub struct KagiMcpServer {
    client: Arc<KagiClient>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchToolParams {
    #[schemars(description = "Search query")]
    pub query: String,
    #[schemars(description = "Number of results (default: 10)", range(min = 1, max = 50))]
    pub limit: Option<u32>,
    #[schemars(description = "Results offset for pagination", range(min = 0))]
    pub offset: Option<u32>,
    #[schemars(description = "Language filter (e.g., \"en\")")]
    pub language: Option<String>,
    #[schemars(description = "Bypass cache for fresh results")]
    pub no_cache: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FastGptToolParams {
    #[schemars(description = "Query or prompt for FastGPT")]
    pub query: String,
    #[schemars(description = "Use cached responses if available (default: true)")]
    pub cache: Option<bool>,
    #[schemars(description = "Include web search results (default: true)")]
    pub web_search: Option<bool>,
}

impl From<SearchToolParams> for SearchParams {
    fn from(params: SearchToolParams) -> Self {
        Self {
            query: params.query,
            limit: params.limit,
            offset: params.offset,
            language: params.language,
            no_cache: params.no_cache,
        }
    }
}

impl From<FastGptToolParams> for FastGptParams {
    fn from(params: FastGptToolParams) -> Self {
        Self {
            query: params.query,
            cache: params.cache,
            web_search: params.web_search,
        }
    }
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl KagiMcpServer {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = KagiClient::from_config(config)?;

        Ok(Self {
            client: Arc::new(client),
            tool_router: Self::tool_router(),
        })
    }

    #[tool(
        description = "Search the web using Kagi Search API. Returns high-quality search results without ads or tracking. Use this tool when you need factual information from the web, especially for recent events, technical topics, or when you need multiple sources."
    )]
    async fn kagi_search(
        &self,
        Parameters(params): Parameters<SearchToolParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("kagi_search: {} (limit: {:?})", params.query, params.limit);

        let response = match self.client.search(&params.into()).await {
            Ok(response) => response,
            Err(e) => return Ok(error_result(e)),
        };

        json_success(&SearchToolOutput::from(response))
    }

    #[tool(
        description = "Get AI-powered search responses using Kagi FastGPT. Returns a comprehensive answer with citations to source material. Use this tool when you need a detailed answer to a specific question with references to back up the information."
    )]
    async fn kagi_fastgpt(
        &self,
        Parameters(params): Parameters<FastGptToolParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("kagi_fastgpt: {}", params.query);

        let response = match self.client.fastgpt(&params.into()).await {
            Ok(response) => response,
            Err(e) => return Ok(error_result(e)),
        };

        json_success(&FastGptToolOutput::from(response))
    }
}

// ============================================================================
// In-Process Invocation
// ============================================================================

impl KagiMcpServer {
    /// The static tool catalog.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Dispatch a tool call by name, mirroring the wire-level router.
    ///
    /// An unknown tool name is a protocol fault (method not found), not an
    /// error-flagged result.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, McpError> {
        match name {
            "kagi_search" => {
                let params: SearchToolParams = serde_json::from_value(arguments)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.kagi_search(Parameters(params)).await
            }
            "kagi_fastgpt" => {
                let params: FastGptToolParams = serde_json::from_value(arguments)
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                self.kagi_fastgpt(Parameters(params)).await
            }
            _ => Err(McpError::new(
                ErrorCode::METHOD_NOT_FOUND,
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }
}

fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn error_result(error: Error) -> CallToolResult {
    CallToolResult::error(vec![Content::text(error.to_string())])
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for KagiMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Kagi MCP Server - provides web search via the Kagi Search API and \
                 AI-generated answers with citations via Kagi FastGPT. \
                 Requires a KAGI_API_KEY."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn test_server() -> KagiMcpServer {
        let config = Config {
            api_key: "test-key".to_string(),
            api: ApiConfig {
                // Nothing listens here; only catalog-level tests use this.
                base_url: "http://127.0.0.1:9".to_string(),
                timeout_seconds: Some(1),
            },
        };
        KagiMcpServer::new(&config).expect("server should build")
    }

    #[test]
    fn catalog_has_exactly_two_tools() {
        let server = test_server();
        let tools = server.list_tools();

        assert_eq!(tools.len(), 2);
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"kagi_search"));
        assert!(names.contains(&"kagi_fastgpt"));
    }

    #[test]
    fn search_schema_requires_query() {
        let server = test_server();
        let tool = server
            .list_tools()
            .into_iter()
            .find(|t| t.name == "kagi_search")
            .unwrap();

        let schema = serde_json::to_value(&tool.input_schema).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "query"));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_protocol_fault() {
        let server = test_server();
        let result = server.call_tool("unknown_tool", serde_json::json!({})).await;

        let err = result.expect_err("unknown tool must not produce a tool result");
        assert_eq!(err.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(err.message.contains("unknown_tool"));
    }

    #[tokio::test]
    async fn malformed_arguments_are_invalid_params() {
        let server = test_server();
        let result = server
            .call_tool("kagi_search", serde_json::json!({ "query": 42 }))
            .await;

        let err = result.expect_err("bad arguments must not produce a tool result");
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }
}
