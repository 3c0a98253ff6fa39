use archivist_common::SearchResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HTTP verb of an outgoing engine request. Only GET is used today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    Get,
}

/// Request descriptor filled in by an engine and executed by the caller.
///
/// The caller hands in a (possibly pre-seeded) descriptor; the engine sets
/// `query` and `url` and adds its own headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub method: HttpMethod,
    pub query: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// Signal that an engine has nothing to ask for this query.
///
/// Callers skip the engine for this search; it is not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("engine skipped: no request for this query")]
pub struct NoRequest;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// Body was not JSON, lacked a required field, or held a value we could
    /// not interpret.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::MalformedResponse(e.to_string())
    }
}

/// Result categories an engine contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Videos,
}

/// Descriptive metadata for the engine registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineAbout {
    pub website: &'static str,
    pub official_api_documentation: &'static str,
    pub use_official_api: bool,
    pub require_api_key: bool,
    /// Response encoding, e.g. `JSON`.
    pub results: &'static str,
}

/// Behavioural flags the registry uses when scheduling an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineTraits {
    pub categories: &'static [Category],
    pub paging: bool,
}

/// Plugin contract between the aggregator and one search backend.
///
/// Both halves are pure: the caller performs the HTTP exchange between
/// [`SearchEngine::request`] and [`SearchEngine::response`].
pub trait SearchEngine: Send + Sync {
    /// Registry name of this engine instance.
    fn name(&self) -> &str;

    fn about(&self) -> &EngineAbout;

    fn traits(&self) -> &EngineTraits;

    /// Fill in `params` for `query`, or return [`NoRequest`] to be skipped.
    fn request(&self, query: &str, params: SearchRequest) -> Result<SearchRequest, NoRequest>;

    /// Turn a raw response body into normalized results, in source order.
    fn response(&self, body: &[u8]) -> Result<Vec<SearchResult>, EngineError>;
}
