//! YouTube Data API video search. Any failure yields an empty result.

use crate::provider::{http_client, VideoSearch};
use edufinder_core::VideoInfo;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

pub const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub struct YouTubeSearch {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl YouTubeSearch {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: http_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: YOUTUBE_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn try_search(&self, key: &str, query: &str, limit: usize) -> Result<Vec<VideoInfo>, reqwest::Error> {
        let base = self.base_url.trim_end_matches('/');
        let max_results = limit.to_string();

        let search: SearchResponse = self
            .client
            .get(format!("{}/search", base))
            .query(&[
                ("part", "id,snippet"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("type", "video"),
                ("order", "relevance"),
            ])
            .header("x-goog-api-key", key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let videos: VideosResponse = self
            .client
            .get(format!("{}/videos", base))
            .query(&[
                ("part", "snippet,statistics,contentDetails"),
                ("id", joined.as_str()),
            ])
            .header("x-goog-api-key", key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(videos.items.into_iter().map(VideoItem::into_info).collect())
    }
}

#[async_trait::async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<VideoInfo> {
        let Some(key) = self.api_key.as_deref() else {
            info!("Video search not configured, returning no videos");
            return Vec::new();
        };

        match self.try_search(key, query, limit).await {
            Ok(videos) => {
                info!("Found {} videos for query: {}", videos.len(), query);
                videos
            }
            Err(e) => {
                warn!("Video search failed for '{}': {}", query, e.without_url());
                Vec::new()
            }
        }
    }
}

/// Render a raw view count as `"1,234,567 views"`.
pub fn format_views(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return "0 views".to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{} views", out)
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(rename = "contentDetails", default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    title: Option<String>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

impl VideoItem {
    fn into_info(self) -> VideoInfo {
        let published = self
            .snippet
            .published_at
            .map(|p| p.chars().take(10).collect())
            .unwrap_or_else(|| "Unknown Date".to_string());
        VideoInfo {
            title: self.snippet.title.unwrap_or_else(|| "Unknown Title".into()),
            channel: self
                .snippet
                .channel_title
                .unwrap_or_else(|| "Unknown Channel".into()),
            duration_text: self
                .content_details
                .duration
                .unwrap_or_else(|| "Unknown Duration".into()),
            views_text: format_views(self.statistics.view_count.as_deref().unwrap_or("0")),
            url: format!("https://www.youtube.com/watch?v={}", self.id),
            published_date: published,
        }
    }
}
