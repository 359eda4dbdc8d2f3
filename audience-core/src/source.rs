use async_trait::async_trait;

use crate::error::YouTubeApiError;
use crate::types::{ChannelRecord, VideoSnippet};

/// Remote lookups needed to classify a channel.
///
/// `Ok(None)` means the id was valid but the API returned no item for it.
#[async_trait]
pub trait ChannelSource: Send + Sync {
    async fn get_channel(&self, channel_id: &str) -> Result<Option<ChannelRecord>, YouTubeApiError>;

    /// Resolves the owning channel id of a video.
    async fn get_video_channel_id(&self, video_id: &str) -> Result<Option<String>, YouTubeApiError>;

    /// Most recent uploads, newest first, at most `limit` items.
    async fn get_recent_videos(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<VideoSnippet>, YouTubeApiError>;
}
