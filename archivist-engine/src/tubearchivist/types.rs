//! Wire models for the Tube Archivist `/api/search` endpoint.
//!
//! Every field the adapter reads is required; serde rejects an entry that
//! lacks one, which fails the whole parse.
use serde::Deserialize;

/// Value of the top-level `results` key.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    pub channel_results: Vec<ChannelResult>,
    pub video_results: Vec<VideoResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelResult {
    pub channel_id: String,
    pub channel_name: String,
    pub channel_description: String,
    pub channel_subs: u64,
    /// Relative to the instance base URL.
    pub channel_thumb_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoResult {
    pub title: String,
    pub description: String,
    /// Relative to the instance base URL.
    pub media_url: String,
    pub channel: VideoChannel,
    pub player: Player,
    pub stats: Stats,
    pub published: String,
    pub vid_thumb_url: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoChannel {
    pub channel_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Player {
    /// Already formatted by the server, e.g. `12:01`.
    pub duration_str: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stats {
    pub view_count: u64,
}
