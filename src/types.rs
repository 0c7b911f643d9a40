//! Parameter, wire, and tool-output types for the Kagi API
//!
//! Wire types mirror the JSON the provider actually returns (optional
//! fields are defaulted rather than rejected). Tool-output types are the
//! reshaped, agent-facing structures serialized into tool results.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Parameters
// ============================================================================

/// Parameters for the Kagi `/search` endpoint.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// The search query (sent as `q`)
    pub query: String,
    /// Number of results, 1-50
    pub limit: Option<u32>,
    /// Results offset for pagination
    pub offset: Option<u32>,
    /// Language filter (e.g., "en")
    pub language: Option<String>,
    /// Bypass the provider cache
    pub no_cache: Option<bool>,
}

/// Parameters for the Kagi `/fastgpt` endpoint.
///
/// Both flags default to `true` on the wire unless explicitly `Some(false)`.
#[derive(Debug, Clone, Default)]
pub struct FastGptParams {
    pub query: String,
    pub cache: Option<bool>,
    pub web_search: Option<bool>,
}

// ============================================================================
// Wire Types (provider JSON)
// ============================================================================

/// Response from GET `/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub meta: SearchMeta,
    pub data: SearchData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchMeta {
    pub id: String,
    pub node: String,
    pub ms: u64,
    /// Total result count (may be absent on some plans)
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub api_balance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub results: Vec<RawSearchResult>,
}

/// A single provider-supplied search result.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResult {
    #[serde(default)]
    pub rank: Option<u32>,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub published: Option<String>,
}

/// Response from POST `/fastgpt`.
#[derive(Debug, Clone, Deserialize)]
pub struct FastGptResponse {
    pub meta: FastGptMeta,
    pub data: FastGptData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FastGptMeta {
    pub id: String,
    pub node: String,
    pub ms: u64,
    #[serde(default)]
    pub api_balance: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FastGptData {
    pub output: String,
    #[serde(default)]
    pub tokens: u64,
    #[serde(default)]
    pub references: Option<Vec<Reference>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

// ============================================================================
// Tool Output Types (agent-facing)
// ============================================================================

/// Reshaped search result set returned to the agent.
///
/// Raw fields like `rank` and `relevance_score` are dropped; `published`
/// is always emitted, `null` when the provider did not supply one.
#[derive(Debug, Clone, Serialize)]
pub struct SearchToolOutput {
    pub meta: SearchToolMeta,
    pub results: Vec<SearchToolResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchToolMeta {
    pub total_results: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_balance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchToolResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub published: Option<String>,
}

impl From<SearchResponse> for SearchToolOutput {
    fn from(response: SearchResponse) -> Self {
        Self {
            meta: SearchToolMeta {
                total_results: response.meta.total,
                api_balance: response.meta.api_balance,
            },
            results: response
                .data
                .results
                .into_iter()
                .map(|item| SearchToolResult {
                    title: item.title,
                    url: item.url,
                    snippet: item.snippet,
                    published: item.published,
                })
                .collect(),
        }
    }
}

/// Reshaped FastGPT answer returned to the agent.
///
/// `sources` defaults to an empty list when the provider returned no
/// references; each source snippet is `null` when absent.
#[derive(Debug, Clone, Serialize)]
pub struct FastGptToolOutput {
    pub answer: String,
    pub sources: Vec<SourceReference>,
    pub meta: FastGptToolMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReference {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FastGptToolMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_balance: Option<f64>,
}

impl From<FastGptResponse> for FastGptToolOutput {
    fn from(response: FastGptResponse) -> Self {
        Self {
            answer: response.data.output,
            sources: response
                .data
                .references
                .unwrap_or_default()
                .into_iter()
                .map(|reference| SourceReference {
                    title: reference.title,
                    url: reference.url,
                    snippet: reference.snippet,
                })
                .collect(),
            meta: FastGptToolMeta {
                api_balance: response.meta.api_balance,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_search_response() -> SearchResponse {
        serde_json::from_value(json!({
            "meta": { "id": "req-1", "node": "us-east", "ms": 42, "total": 2 },
            "data": {
                "results": [
                    {
                        "rank": 1,
                        "url": "https://example.com/a",
                        "title": "Result A",
                        "snippet": "First hit",
                        "relevance_score": 0.91,
                        "published": "2024-01-02"
                    },
                    {
                        "rank": 2,
                        "url": "https://example.com/b",
                        "title": "Result B",
                        "snippet": "Second hit"
                    }
                ]
            }
        }))
        .expect("valid search response")
    }

    #[test]
    fn search_reshape_drops_rank_and_score() {
        let output = SearchToolOutput::from(sample_search_response());
        let value = serde_json::to_value(&output).unwrap();

        let first = &value["results"][0];
        let mut keys: Vec<&str> = first.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["published", "snippet", "title", "url"]);
        assert!(first.get("rank").is_none());
        assert!(first.get("relevance_score").is_none());
    }

    #[test]
    fn search_reshape_defaults_published_to_null() {
        let output = SearchToolOutput::from(sample_search_response());
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["results"][0]["published"], json!("2024-01-02"));
        assert_eq!(value["results"][1]["published"], json!(null));
    }

    #[test]
    fn search_reshape_omits_absent_balance() {
        let output = SearchToolOutput::from(sample_search_response());
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["meta"]["total_results"], json!(2));
        assert!(value["meta"].get("api_balance").is_none());
    }

    #[test]
    fn fastgpt_reshape_defaults_sources_to_empty() {
        let response: FastGptResponse = serde_json::from_value(json!({
            "meta": { "id": "req-2", "node": "us-east", "ms": 120, "api_balance": 4.5 },
            "data": { "output": "The answer.", "tokens": 31 }
        }))
        .unwrap();

        let output = FastGptToolOutput::from(response);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["answer"], json!("The answer."));
        assert_eq!(value["sources"], json!([]));
        assert_eq!(value["meta"]["api_balance"], json!(4.5));
    }

    #[test]
    fn fastgpt_reshape_keeps_null_snippets() {
        let response: FastGptResponse = serde_json::from_value(json!({
            "meta": { "id": "req-3", "node": "eu-west", "ms": 90 },
            "data": {
                "output": "Cited answer.",
                "tokens": 12,
                "references": [
                    { "title": "Ref", "url": "https://example.com/ref" }
                ]
            }
        }))
        .unwrap();

        let output = FastGptToolOutput::from(response);
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["sources"][0]["snippet"], json!(null));
        assert!(value["meta"].get("api_balance").is_none());
    }
}
