//! Error types for the Kagi MCP server
//!
//! A small closed enumeration covering the three failure domains:
//! startup configuration, the remote Kagi API, and the HTTP transport.
//! Protocol faults (unknown tool name, bad arguments) are not represented
//! here - those are `rmcp::ErrorData` values produced at the dispatcher
//! boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The credential was not found in the environment at startup. Fatal.
    #[error("KAGI_API_KEY environment variable is required")]
    MissingApiKey,

    /// Bad base URL, unreadable config file, or an invalid override value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Non-2xx response from the Kagi API. The message is either the
    /// provider's structured error message or an `HTTP <status>: <reason>`
    /// fallback.
    #[error("Kagi API error: {0}")]
    Api(String),

    /// Connection, timeout, or body-decoding failure below the API layer.
    #[error("Kagi API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_provider_message() {
        let err = Error::Api("forbidden".to_string());
        assert_eq!(err.to_string(), "Kagi API error: forbidden");
    }

    #[test]
    fn missing_key_names_the_variable() {
        assert!(Error::MissingApiKey.to_string().contains("KAGI_API_KEY"));
    }
}
