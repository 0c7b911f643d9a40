//! HTTP client for the Kagi API
//!
//! Single authenticated gateway to the two Kagi endpoints. Every request
//! carries `Authorization: Bot <key>` and a JSON content type. Non-2xx
//! responses are normalized into `Error::Api`: the provider's structured
//! error message when the body carries one, otherwise an
//! `HTTP <status>: <reason>` fallback. No retries, one attempt per call.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::error::Error;
use crate::types::{FastGptParams, FastGptResponse, SearchParams, SearchResponse};

/// Kagi API client
pub struct KagiClient {
    http: Client,
    base_url: String,
}

// Provider error body: {"error": {"code": ..., "message": ...}}.
// Only the message is ever surfaced.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl KagiClient {
    /// Build a client holding the credential.
    ///
    /// The base URL is validated up front; the timeout is optional and the
    /// default is to wait for the transport.
    pub fn new(api_key: &str, base_url: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid Kagi base URL {base_url:?}: {e}")))?;

        let mut auth = HeaderValue::from_str(&format!("Bot {api_key}"))
            .map_err(|_| Error::Config("API key contains invalid header characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .user_agent(concat!("kagi-mcp/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(
            &config.api_key,
            &config.api.base_url,
            config.api.timeout_seconds.map(Duration::from_secs),
        )
    }

    /// GET `/search` with only the present-and-meaningful query parameters.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse, Error> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&search_query_pairs(params))
            .send()
            .await?;

        Self::read_response(response).await
    }

    /// POST `/fastgpt`. Both flags are true on the wire unless explicitly
    /// passed `Some(false)`.
    pub async fn fastgpt(&self, params: &FastGptParams) -> Result<FastGptResponse, Error> {
        let url = format!("{}/fastgpt", self.base_url);
        let body = serde_json::json!({
            "query": params.query,
            "cache": params.cache.unwrap_or(true),
            "web_search": params.web_search.unwrap_or(true),
        });

        let response = self.http.post(&url).json(&body).send().await?;

        Self::read_response(response).await
    }

    async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(error_message(status, &body)));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Build the `/search` query pairs from the parameter set.
///
/// `q` is always present; each optional pair is emitted only when supplied
/// and meaningful (nonzero limit/offset, nonempty language, no_cache true).
pub fn search_query_pairs(params: &SearchParams) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("q", params.query.clone())];

    if let Some(limit) = params.limit.filter(|n| *n > 0) {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(offset) = params.offset.filter(|n| *n > 0) {
        pairs.push(("offset", offset.to_string()));
    }
    if let Some(language) = params.language.as_deref().filter(|s| !s.is_empty()) {
        pairs.push(("language", language.to_string()));
    }
    if params.no_cache == Some(true) {
        pairs.push(("no_cache", "true".to_string()));
    }

    pairs
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.and_then(|detail| detail.message) {
            return message;
        }
    }

    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_always_include_q() {
        let params = SearchParams {
            query: "rust mcp".to_string(),
            ..Default::default()
        };
        assert_eq!(
            search_query_pairs(&params),
            vec![("q", "rust mcp".to_string())]
        );
    }

    #[test]
    fn query_pairs_include_supplied_optionals() {
        let params = SearchParams {
            query: "x".to_string(),
            limit: Some(5),
            offset: Some(10),
            language: Some("en".to_string()),
            no_cache: Some(true),
        };
        assert_eq!(
            search_query_pairs(&params),
            vec![
                ("q", "x".to_string()),
                ("limit", "5".to_string()),
                ("offset", "10".to_string()),
                ("language", "en".to_string()),
                ("no_cache", "true".to_string()),
            ]
        );
    }

    #[test]
    fn query_pairs_skip_zero_and_empty_values() {
        let params = SearchParams {
            query: "x".to_string(),
            limit: Some(0),
            offset: Some(0),
            language: Some(String::new()),
            no_cache: Some(false),
        };
        assert_eq!(search_query_pairs(&params), vec![("q", "x".to_string())]);
    }

    #[test]
    fn error_message_prefers_structured_envelope() {
        let body = r#"{"error":{"code":"X","message":"forbidden"}}"#;
        assert_eq!(error_message(StatusCode::FORBIDDEN, body), "forbidden");
    }

    #[test]
    fn error_message_falls_back_on_plain_body() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "backend exploded"),
            "HTTP 500: Internal Server Error"
        );
    }

    #[test]
    fn error_message_falls_back_on_envelope_without_message() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"error":{}}"#),
            "HTTP 502: Bad Gateway"
        );
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        let result = KagiClient::new("key", "not a url", None);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
