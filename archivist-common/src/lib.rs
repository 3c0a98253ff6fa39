//! Common types and utilities shared across the archivist-search crates.
//!
//! This crate defines the normalized result schema every engine adapter emits,
//! the output format enum used by front ends, and the observability helpers.
//! It stays dependency-light so engines and binaries can both depend on it.
//!
//! # Overview
//!
//! - [`SearchResult`]: one normalized record handed back to the aggregator
//! - [`ResultTemplate`]: presentation hint attached to video-type records
//! - [`OutputFormat`]: how the CLI renders results
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use archivist_common::{ResultTemplate, SearchResult};
//!
//! let result = SearchResult {
//!     url: "http://ta.local/video/abc/".into(),
//!     title: "A talk".into(),
//!     template: Some(ResultTemplate::Videos),
//!     ..SearchResult::default()
//! };
//! assert!(result.is_video());
//! ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod observability;

/// Rendering hint understood by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultTemplate {
    /// Video card with duration, view count and thumbnail.
    #[serde(rename = "videos.html")]
    Videos,
}

impl ResultTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultTemplate::Videos => "videos.html",
        }
    }
}

/// A single record in the aggregator's common result schema.
///
/// Optional fields are omitted from the serialized form when absent, so a
/// channel record carries no `length`, `template` or `publishedDate` keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    /// Plain text, markup already stripped.
    pub content: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// Humanized count, e.g. `12.3K`.
    pub views: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<ResultTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
    pub thumbnail: String,
    /// Facts joined with ` | `; may be empty.
    pub metadata: String,
}

impl SearchResult {
    pub fn is_video(&self) -> bool {
        self.template == Some(ResultTemplate::Videos)
    }
}

/// Preferred output format for rendered results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Text => f.write_str("text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "plain" => Ok(OutputFormat::Text),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn channel_record_omits_video_only_keys() {
        let result = SearchResult {
            url: "http://ta.local/channel/UC1".into(),
            title: "Chan".into(),
            author: "Chan".into(),
            views: "1.2K".into(),
            thumbnail: "http://ta.local/cache/c.jpg?auth=".into(),
            ..SearchResult::default()
        };
        let v = serde_json::to_value(&result).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("length"));
        assert!(!obj.contains_key("template"));
        assert!(!obj.contains_key("publishedDate"));
        assert_eq!(obj["metadata"], json!(""));
    }

    #[test]
    fn video_record_uses_camel_case_and_template_name() {
        let result = SearchResult {
            template: Some(ResultTemplate::Videos),
            published_date: Some(Utc.with_ymd_and_hms(2023, 5, 4, 0, 0, 0).unwrap()),
            length: Some("12:01".into()),
            ..SearchResult::default()
        };
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["template"], json!("videos.html"));
        assert_eq!(v["publishedDate"], json!("2023-05-04T00:00:00Z"));
        assert_eq!(v["length"], json!("12:01"));
        assert!(result.is_video());
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!(" text ".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
