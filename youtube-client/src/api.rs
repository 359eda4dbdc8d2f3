use crate::metrics::{ApiMetrics, MetricsCollector, RequestMetrics};
use async_trait::async_trait;
use audience_core::config::{AppConfig, MAX_RECENT_VIDEOS};
use audience_core::{
    ChannelRecord, ChannelSource, ConfigError, CoreError, VideoSnippet, YouTubeApiError,
};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

const CHANNELS_ENDPOINT: &str = "/channels";
const VIDEOS_ENDPOINT: &str = "/videos";
const SEARCH_ENDPOINT: &str = "/search";

const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded"];
const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelItem {
    pub id: String,
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: ChannelStatistics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// The API encodes counters as decimal strings and omits hidden ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    pub subscriber_count: Option<String>,
    pub video_count: Option<String>,
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoItemSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItemSnippet {
    pub channel_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEntry {
    #[serde(default)]
    pub reason: String,
}

pub fn parse_count(value: Option<&str>) -> u64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

impl From<ChannelItem> for ChannelRecord {
    fn from(item: ChannelItem) -> Self {
        Self {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            subscriber_count: parse_count(item.statistics.subscriber_count.as_deref()),
            video_count: parse_count(item.statistics.video_count.as_deref()),
            view_count: parse_count(item.statistics.view_count.as_deref()),
        }
    }
}

impl From<SearchItem> for VideoSnippet {
    fn from(item: SearchItem) -> Self {
        Self {
            video_id: item.id.video_id.unwrap_or_default(),
            title: item.snippet.title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
        }
    }
}

/// Maps a non-success response onto the error taxonomy.
///
/// Quota exhaustion is recognised by its error reason regardless of status.
pub fn map_error_response(status: u16, body: &str, endpoint: &str) -> YouTubeApiError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let reasons: Vec<&str> = parsed
        .as_ref()
        .map(|b| b.error.errors.iter().map(|e| e.reason.as_str()).collect())
        .unwrap_or_default();
    let message = parsed
        .as_ref()
        .map(|b| b.error.message.clone())
        .filter(|m| !m.is_empty());

    let has_reason = |known: &[&str]| {
        reasons.iter().any(|r| known.contains(r))
            || (parsed.is_none() && known.iter().any(|k| body.contains(k)))
    };

    if has_reason(QUOTA_REASONS) {
        return YouTubeApiError::QuotaExceeded;
    }
    if status == 429 || has_reason(RATE_LIMIT_REASONS) {
        return YouTubeApiError::RateLimited {
            status_code: status,
        };
    }

    match status {
        400 => YouTubeApiError::BadRequest {
            reason: message.unwrap_or_else(|| "invalid parameters".to_string()),
        },
        403 => YouTubeApiError::Forbidden {
            reason: message.unwrap_or_else(|| "forbidden".to_string()),
        },
        404 => YouTubeApiError::NotFound {
            resource: message.unwrap_or_else(|| endpoint.to_string()),
        },
        status_code => YouTubeApiError::ServerError { status_code },
    }
}

fn map_transport_error(e: reqwest::Error) -> YouTubeApiError {
    // Request URLs carry the API key.
    let e = e.without_url();
    if e.is_timeout() {
        YouTubeApiError::RequestTimeout
    } else {
        YouTubeApiError::Transport {
            details: e.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct YouTubeApiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    metrics: Arc<MetricsCollector>,
}

impl YouTubeApiClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        if api_key.trim().is_empty() {
            return Err(CoreError::InvalidInput {
                message: "YouTube API key is empty".to_string(),
            });
        }

        let http_client = Client::builder()
            .user_agent(concat!("yt-audience/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    /// A blank key is reported against the configured key file.
    pub fn from_config(config: &AppConfig, api_key: String) -> Result<Self, CoreError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey {
                key_file: config.api_key_file.display().to_string(),
            }
            .into());
        }
        Self::new(api_key, &config.api_base_url, config.request_timeout())
    }

    pub fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, YouTubeApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint)).map_err(|e| {
            YouTubeApiError::BadRequest {
                reason: format!("invalid API URL: {}", e),
            }
        })?;
        url.query_pairs_mut()
            .extend_pairs(params.iter())
            .append_pair("key", &self.api_key);
        Ok(url)
    }

    pub async fn make_request(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Response, YouTubeApiError> {
        let url = self.build_url(endpoint, params)?;
        let start_time = Instant::now();

        debug!("Making YouTube API request: GET {} {:?}", endpoint, params);
        let outcome = match self.http_client.get(url).send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                let api_error = map_error_response(status, &body, endpoint);
                error!(
                    "Request failed with status {} for {}: {}",
                    status, endpoint, api_error
                );
                Err((Some(status), api_error))
            }
            Err(e) => {
                let api_error = map_transport_error(e);
                error!("Network error for GET {}: {}", endpoint, api_error);
                Err((None, api_error))
            }
        };

        let (status_code, success, quota_exceeded) = match &outcome {
            Ok(response) => (Some(response.status().as_u16()), true, false),
            Err((status, api_error)) => (
                *status,
                false,
                matches!(api_error, YouTubeApiError::QuotaExceeded),
            ),
        };
        self.metrics
            .record_request(RequestMetrics {
                endpoint: endpoint.to_string(),
                status_code,
                response_time: start_time.elapsed(),
                success,
                quota_exceeded,
            })
            .await;

        outcome.map_err(|(_, api_error)| api_error)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YouTubeApiError> {
        let response = self.make_request(endpoint, params).await?;
        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse {} response: {}", endpoint, e.without_url());
            YouTubeApiError::InvalidResponse {
                details: format!("unexpected {} payload", endpoint),
            }
        })
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }
}

#[async_trait]
impl ChannelSource for YouTubeApiClient {
    async fn get_channel(&self, channel_id: &str) -> Result<Option<ChannelRecord>, YouTubeApiError> {
        let listing: ListResponse<ChannelItem> = self
            .get_json(
                CHANNELS_ENDPOINT,
                &[("part", "snippet,statistics"), ("id", channel_id)],
            )
            .await?;

        let channel = listing.items.into_iter().next().map(ChannelRecord::from);
        match &channel {
            Some(channel) => info!("Retrieved channel '{}' ({})", channel.title, channel.id),
            None => warn!("No channel returned for id {}", channel_id),
        }
        Ok(channel)
    }

    async fn get_video_channel_id(&self, video_id: &str) -> Result<Option<String>, YouTubeApiError> {
        let listing: ListResponse<VideoItem> = self
            .get_json(VIDEOS_ENDPOINT, &[("part", "snippet"), ("id", video_id)])
            .await?;

        let channel_id = listing
            .items
            .into_iter()
            .next()
            .map(|video| video.snippet.channel_id)
            .filter(|id| !id.is_empty());
        debug!("Video {} belongs to channel {:?}", video_id, channel_id);
        Ok(channel_id)
    }

    async fn get_recent_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoSnippet>, YouTubeApiError> {
        let limit = limit.clamp(1, MAX_RECENT_VIDEOS);
        let max_results = limit.to_string();
        let listing: ListResponse<SearchItem> = self
            .get_json(
                SEARCH_ENDPOINT,
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("type", "video"),
                    ("order", "date"),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        let mut videos: Vec<VideoSnippet> = listing.items.into_iter().map(VideoSnippet::from).collect();
        videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        videos.truncate(limit as usize);

        debug!("Retrieved {} recent videos for {}", videos.len(), channel_id);
        Ok(videos)
    }
}
