//! Video Feed
//!
//! Most viewed long-form uploads of the channel, read from the YouTube Data
//! API. Failures are logged and yield an empty list.

use html_escape::decode_html_entities;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Videos listed when the caller does not ask for a count
pub const DEFAULT_MAX_RESULTS: u32 = 3;

/// Uploads shorter than this are Shorts and never listed
pub const MIN_DURATION_SECS: u64 = 180;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub published_at: String,
    /// `M:SS` or `H:MM:SS`
    pub duration: Option<String>,
    /// Compact count such as `1.2M`
    pub view_count: Option<String>,
}

// ========== Wire shapes ==========

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    items: Vec<VideoDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoDetails {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    statistics: Option<Statistics>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorReason>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorReason {
    #[serde(default)]
    reason: String,
}

// ========== Feed ==========

#[derive(Debug, Clone)]
pub struct VideoFeed {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    channel_id: String,
    excluded_titles: Vec<String>,
}

impl VideoFeed {
    pub fn new(api_key: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: YOUTUBE_API_BASE.to_string(),
            api_key: api_key.into(),
            channel_id: channel_id.into(),
            excluded_titles: Vec::new(),
        }
    }

    /// `None` unless both the API key and the channel are configured.
    pub fn from_config(config: &ClientConfig) -> Option<Self> {
        match (&config.youtube_api_key, &config.youtube_channel_id) {
            (Some(key), Some(channel)) => Some(Self::new(key, channel)),
            _ => None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Titles never shown, matched exactly after entity decoding
    pub fn with_excluded_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_titles = titles.into_iter().map(Into::into).collect();
        self
    }

    /// Most viewed videos of the channel, [`DEFAULT_MAX_RESULTS`] unless
    /// `max_results` says otherwise.
    ///
    /// Shorts are dropped after the search, so fewer videos than asked for
    /// may come back. Any failure gives an empty list.
    pub async fn latest(&self, max_results: Option<u32>) -> Vec<Video> {
        let max_results = max_results.unwrap_or(DEFAULT_MAX_RESULTS);
        match self.try_latest(max_results).await {
            Ok(videos) => {
                tracing::debug!(count = videos.len(), "Fetched videos");
                videos
            }
            Err(e) => {
                tracing::error!(channel_id = %self.channel_id, error = %e, "Failed to fetch videos");
                Vec::new()
            }
        }
    }

    async fn try_latest(&self, max_results: u32) -> ClientResult<Vec<Video>> {
        let max_results = max_results.to_string();
        let search: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("key", self.api_key.as_str()),
                    ("channelId", self.channel_id.as_str()),
                    ("part", "snippet"),
                    ("order", "viewCount"),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;
        if search.items.is_empty() {
            return Ok(Vec::new());
        }

        let ids = search
            .items
            .iter()
            .filter_map(|item| item.id.video_id.as_deref())
            .collect::<Vec<_>>()
            .join(",");
        let details: DetailsResponse = self
            .get_json(
                "videos",
                &[
                    ("key", self.api_key.as_str()),
                    ("id", ids.as_str()),
                    ("part", "contentDetails,statistics"),
                ],
            )
            .await?;

        Ok(assemble(search.items, details.items, &self.excluded_titles))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.api_base, resource);
        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let parsed = serde_json::from_slice::<ApiErrorBody>(&bytes).ok();
            let quota_exceeded = parsed
                .as_ref()
                .is_some_and(|b| b.error.errors.iter().any(|e| e.reason == "quotaExceeded"));
            if quota_exceeded {
                tracing::warn!(resource, "YouTube API quota exceeded");
            }
            let message = parsed
                .map(|b| b.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("YouTube API {resource} failed"));
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
                details: serde_json::from_slice(&bytes).ok(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Join search hits with their details, keeping search order.
///
/// A hit without details is kept with no duration or count.
fn assemble(items: Vec<SearchItem>, details: Vec<VideoDetails>, excluded: &[String]) -> Vec<Video> {
    items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let detail = details.iter().find(|d| d.id == video_id);
            let iso = detail
                .and_then(|d| d.content_details.as_ref())
                .map(|c| c.duration.as_str());

            if iso.is_some_and(|iso| parse_duration(iso) < MIN_DURATION_SECS) {
                return None;
            }
            let title = decode_html_entities(&item.snippet.title).into_owned();
            if excluded.iter().any(|t| *t == title) {
                return None;
            }

            Some(Video {
                id: video_id.clone(),
                thumbnail: format!("https://i.ytimg.com/vi/{video_id}/maxresdefault.jpg"),
                title,
                description: decode_html_entities(&item.snippet.description).into_owned(),
                published_at: item.snippet.published_at,
                duration: detail.map(|_| format_duration(iso.unwrap_or_default())),
                view_count: detail
                    .and_then(|d| d.statistics.as_ref())
                    .and_then(|s| s.view_count.as_deref())
                    .map(format_view_count),
                video_id,
            })
        })
        .collect()
}

/// Hours, minutes and seconds of an ISO 8601 duration such as `PT1H2M3S`
fn duration_parts(iso: &str) -> Option<(u64, u64, u64)> {
    let start = iso.find("PT")?;
    let (mut hours, mut minutes, mut seconds) = (0, 0, 0);
    let mut value: Option<u64> = None;
    for ch in iso[start + 2..].chars() {
        match ch {
            '0'..='9' => {
                let digit = u64::from(ch) - u64::from('0');
                value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit));
            }
            'H' => hours = value.take()?,
            'M' => minutes = value.take()?,
            'S' => seconds = value.take()?,
            _ => break,
        }
    }
    Some((hours, minutes, seconds))
}

/// Total seconds of an ISO 8601 duration, 0 when it does not parse
pub fn parse_duration(iso: &str) -> u64 {
    duration_parts(iso)
        .map(|(h, m, s)| h.saturating_mul(3600).saturating_add(m * 60).saturating_add(s))
        .unwrap_or(0)
}

/// `H:MM:SS` past the hour, `M:SS` below it, `0:00` when unparsable
pub fn format_duration(iso: &str) -> String {
    match duration_parts(iso) {
        None => "0:00".to_string(),
        Some((h, m, s)) if h > 0 => format!("{h}:{m:02}:{s:02}"),
        Some((_, m, s)) => format!("{m}:{s:02}"),
    }
}

/// `1.2M`, `3.4K` or the plain number; unparsable input comes back as is.
pub fn format_view_count(count: &str) -> String {
    match count.trim().parse::<u64>() {
        Ok(n) if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1_000_000.0),
        Ok(n) if n >= 1_000 => format!("{:.1}K", n as f64 / 1_000.0),
        Ok(n) => n.to_string(),
        Err(_) => count.to_string(),
    }
}
