use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LexiconError;

/// Snapshot of a channel as returned by the data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub view_count: u64,
}

/// One recent upload of a channel; only its text feeds the corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoSnippet {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Channel,
    CustomName,
    Username,
    Handle,
    Video,
}

impl EntityKind {
    pub fn is_video(self) -> bool {
        matches!(self, EntityKind::Video)
    }

    /// Custom names, usernames and handles are display names, not channel ids.
    pub fn needs_name_lookup(self) -> bool {
        matches!(
            self,
            EntityKind::CustomName | EntityKind::Username | EntityKind::Handle
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Channel => "channel",
            EntityKind::CustomName => "custom name",
            EntityKind::Username => "username",
            EntityKind::Handle => "handle",
            EntityKind::Video => "video",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub id: String,
    pub kind: EntityKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Kids,
    Teen,
    Serious,
}

impl Category {
    /// Fixed order, also the tie-break priority for the primary category.
    pub const ALL: [Category; 3] = [Category::Kids, Category::Teen, Category::Serious];

    pub fn key(self) -> &'static str {
        match self {
            Category::Kids => "kids",
            Category::Teen => "teen",
            Category::Serious => "serious",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = LexiconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kids" => Ok(Category::Kids),
            "teen" => Ok(Category::Teen),
            "serious" => Ok(Category::Serious),
            other => Err(LexiconError::UnknownCategory {
                name: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryCategory {
    Kids,
    Teen,
    Serious,
    Mixed,
}

impl PrimaryCategory {
    pub const ALL: [PrimaryCategory; 4] = [
        PrimaryCategory::Kids,
        PrimaryCategory::Teen,
        PrimaryCategory::Serious,
        PrimaryCategory::Mixed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PrimaryCategory::Kids => "Kids",
            PrimaryCategory::Teen => "Teen",
            PrimaryCategory::Serious => "Serious",
            PrimaryCategory::Mixed => "Mixed",
        }
    }
}

impl From<Category> for PrimaryCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Kids => PrimaryCategory::Kids,
            Category::Teen => PrimaryCategory::Teen,
            Category::Serious => PrimaryCategory::Serious,
        }
    }
}

impl fmt::Display for PrimaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per audience category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores<T> {
    pub kids: T,
    pub teen: T,
    pub serious: T,
}

impl<T: Copy> CategoryScores<T> {
    pub fn get(&self, category: Category) -> T {
        match category {
            Category::Kids => self.kids,
            Category::Teen => self.teen,
            Category::Serious => self.serious,
        }
    }

    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            kids: f(Category::Kids),
            teen: f(Category::Teen),
            serious: f(Category::Serious),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    /// Keyword hit counts.
    pub raw: CategoryScores<u32>,
    /// Independently rounded shares of the total, 0..=100 each.
    pub percent: CategoryScores<u8>,
    pub primary: PrimaryCategory,
}

/// One classified URL, flattened for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub url: String,
    pub channel_title: String,
    pub subscribers: u64,
    pub videos: u64,
    pub views: u64,
    pub primary_category: PrimaryCategory,
    pub kids_pct: u8,
    pub teen_pct: u8,
    pub serious_pct: u8,
}

impl AnalysisRecord {
    pub fn new(url: impl Into<String>, channel: &ChannelRecord, score: &ScoreResult) -> Self {
        Self {
            url: url.into(),
            channel_title: channel.title.clone(),
            subscribers: channel.subscriber_count,
            videos: channel.video_count,
            views: channel.view_count,
            primary_category: score.primary,
            kids_pct: score.percent.kids,
            teen_pct: score.percent.teen,
            serious_pct: score.percent.serious,
        }
    }
}
