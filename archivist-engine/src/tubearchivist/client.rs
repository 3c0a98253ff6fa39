//! Engine adapter for a self-hosted Tube Archivist instance.
//!
//! Builds the `/api/search` request with token auth and maps channel and video
//! hits onto [`SearchResult`]. All state is the per-instance configuration, so
//! one process may hold several adapters pointing at different instances.
use super::types::{ChannelResult, SearchResults, VideoResult};
use crate::engine::{
    Category, EngineAbout, EngineError, EngineTraits, HttpMethod, NoRequest, SearchEngine,
    SearchRequest,
};
use crate::text::{html_to_text, humanize_number, parse_date};
use archivist_common::{ResultTemplate, SearchResult};
use serde::Deserialize;
use std::fmt;
use url::form_urlencoded;

const LOG_TARGET: &str = "engine.tubearchivist";
const METADATA_SEPARATOR: &str = " | ";

static ABOUT: EngineAbout = EngineAbout {
    website: "https://www.tubearchivist.com",
    official_api_documentation: "https://github.com/tubearchivist/tubearchivist",
    use_official_api: true,
    require_api_key: false,
    results: "JSON",
};

static TRAITS: EngineTraits = EngineTraits {
    categories: &[Category::Videos],
    paging: true,
};

/// Connection settings for one instance.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TubeArchivistConfig {
    /// Instance root, e.g. `http://ta.local:8000/`. Trailing slashes are ignored.
    pub base_url: String,
    /// API token; empty means the instance does not require one.
    pub token: String,
}

impl TubeArchivistConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }
}

impl fmt::Debug for TubeArchivistConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TubeArchivistConfig")
            .field("base_url", &self.base_url)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct TubeArchivist {
    name: String,
    config: TubeArchivistConfig,
}

impl TubeArchivist {
    /// Create an adapter registered as `tubearchivist`.
    ///
    /// ```
    /// use archivist_engine::{SearchEngine, SearchRequest, TubeArchivist, TubeArchivistConfig};
    ///
    /// let engine = TubeArchivist::new(TubeArchivistConfig::new("http://ta.local/", "abc"));
    /// let req = engine
    ///     .request("rust talks", SearchRequest::default())
    ///     .expect("non-empty query");
    /// assert_eq!(req.url, "http://ta.local/api/search?query=rust+talks");
    /// assert_eq!(req.headers["Authorization"], "Token abc");
    /// ```
    pub fn new(config: TubeArchivistConfig) -> Self {
        Self::with_name("tubearchivist", config)
    }

    /// Create an adapter under a custom registry name (one per instance).
    pub fn with_name(name: impl Into<String>, config: TubeArchivistConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    pub fn config(&self) -> &TubeArchivistConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn absolute_url(&self, relative: &str) -> String {
        let url = format!("{}{}", self.base_url(), relative);
        tracing::debug!(target: LOG_TARGET, engine = %self.name, %url, "absolute_url");
        url
    }

    fn thumbnail_url(&self, relative: &str) -> String {
        format!("{}?auth={}", self.absolute_url(relative), self.config.token)
    }

    fn channel_result(&self, channel: &ChannelResult) -> SearchResult {
        SearchResult {
            url: self.absolute_url(&format!("/channel/{}", channel.channel_id)),
            title: channel.channel_name.clone(),
            content: html_to_text(&channel.channel_description),
            author: channel.channel_name.clone(),
            length: None,
            views: humanize_number(channel.channel_subs),
            template: None,
            published_date: None,
            thumbnail: self.thumbnail_url(&channel.channel_thumb_url),
            metadata: String::new(),
        }
    }

    fn video_result(&self, video: &VideoResult) -> Result<SearchResult, EngineError> {
        let published_date = parse_date(&video.published).ok_or_else(|| {
            EngineError::MalformedResponse(format!(
                "unparseable published date {:?} for video {:?}",
                video.published, video.title
            ))
        })?;

        let tags = video.tags.join(METADATA_SEPARATOR);
        let metadata = [video.channel.channel_name.as_str(), tags.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(METADATA_SEPARATOR);

        Ok(SearchResult {
            // Media paths are joined by hand; only thumbnails go through `absolute_url`.
            url: format!("{}{}", self.base_url(), video.media_url),
            title: video.title.clone(),
            content: html_to_text(&video.description),
            author: video.channel.channel_name.clone(),
            length: Some(video.player.duration_str.clone()),
            views: humanize_number(video.stats.view_count),
            template: Some(ResultTemplate::Videos),
            published_date: Some(published_date),
            thumbnail: self.thumbnail_url(&video.vid_thumb_url),
            metadata,
        })
    }
}

impl SearchEngine for TubeArchivist {
    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> &EngineAbout {
        &ABOUT
    }

    fn traits(&self) -> &EngineTraits {
        &TRAITS
    }

    fn request(&self, query: &str, mut params: SearchRequest) -> Result<SearchRequest, NoRequest> {
        if query.is_empty() {
            tracing::debug!(target: LOG_TARGET, engine = %self.name, "request.skipped.empty_query");
            return Err(NoRequest);
        }

        let encoded = form_urlencoded::Serializer::new(String::new())
            .append_pair("query", query)
            .finish();

        params.method = HttpMethod::Get;
        params.query = query.to_string();
        params.url = format!("{}/api/search?{}", self.base_url(), encoded);
        params.headers.insert(
            "Authorization".to_string(),
            format!("Token {}", self.config.token),
        );

        tracing::debug!(
            target: LOG_TARGET,
            engine = %self.name,
            url = %params.url,
            has_token = !self.config.token.is_empty(),
            "request.built"
        );
        Ok(params)
    }

    fn response(&self, body: &[u8]) -> Result<Vec<SearchResult>, EngineError> {
        let json: serde_json::Value = serde_json::from_slice(body)?;

        let Some(raw) = json.get("results") else {
            tracing::debug!(target: LOG_TARGET, engine = %self.name, "response.no_results_key");
            return Ok(Vec::new());
        };

        let results = SearchResults::deserialize(raw).map_err(|e| {
            EngineError::MalformedResponse(format!("unexpected `results` shape: {e}"))
        })?;

        let mut out =
            Vec::with_capacity(results.channel_results.len() + results.video_results.len());
        for channel in &results.channel_results {
            out.push(self.channel_result(channel));
        }
        for video in &results.video_results {
            out.push(self.video_result(video)?);
        }

        tracing::debug!(
            target: LOG_TARGET,
            engine = %self.name,
            channels = results.channel_results.len(),
            videos = results.video_results.len(),
            "response.parsed"
        );
        Ok(out)
    }
}
