//! Keyword-frequency scoring of channel text.

use tracing::debug;

use crate::lexicon::KeywordLexicon;
use crate::types::{
    Category, CategoryScores, ChannelRecord, PrimaryCategory, ScoreResult, VideoSnippet,
};

/// A category must exceed this share (in percent) to become primary.
pub const PRIMARY_THRESHOLD_PCT: u8 = 40;

/// Concatenates channel and video titles/descriptions, separated by single spaces.
pub fn build_corpus(channel: &ChannelRecord, videos: &[VideoSnippet]) -> String {
    let mut parts = Vec::with_capacity(2 + videos.len() * 2);
    parts.push(channel.title.as_str());
    parts.push(channel.description.as_str());
    for video in videos {
        parts.push(video.title.as_str());
        parts.push(video.description.as_str());
    }
    parts.join(" ")
}

/// Non-overlapping literal occurrences of `needle` in `haystack`.
///
/// An empty needle never counts.
pub fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count() as u32
}

/// Share of `part` in `total` as a whole percentage, rounding half to even.
fn percentage(part: u32, total: u32) -> u8 {
    let total = u64::from(total.max(1));
    let scaled = u64::from(part) * 100;
    let quotient = scaled / total;
    let remainder = scaled % total;
    let rounded = match (remainder * 2).cmp(&total) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 1 => quotient + 1,
        _ => quotient,
    };
    rounded.min(100) as u8
}

fn primary_category(percent: &CategoryScores<u8>) -> PrimaryCategory {
    let max_pct = Category::ALL
        .iter()
        .map(|category| percent.get(*category))
        .max()
        .unwrap_or(0);

    if max_pct <= PRIMARY_THRESHOLD_PCT {
        return PrimaryCategory::Mixed;
    }

    Category::ALL
        .iter()
        .find(|category| percent.get(**category) == max_pct)
        .map(|category| PrimaryCategory::from(*category))
        .unwrap_or(PrimaryCategory::Mixed)
}

/// Scores text against a lexicon whose keywords were flattened once up front.
#[derive(Debug, Clone)]
pub struct Classifier {
    kids: Vec<String>,
    teen: Vec<String>,
    serious: Vec<String>,
}

impl Classifier {
    pub fn new(lexicon: &KeywordLexicon) -> Self {
        Self {
            kids: lexicon.flatten(Category::Kids),
            teen: lexicon.flatten(Category::Teen),
            serious: lexicon.flatten(Category::Serious),
        }
    }

    fn keywords(&self, category: Category) -> &[String] {
        match category {
            Category::Kids => &self.kids,
            Category::Teen => &self.teen,
            Category::Serious => &self.serious,
        }
    }

    pub fn raw_scores(&self, corpus: &str) -> CategoryScores<u32> {
        let corpus = corpus.to_lowercase();
        CategoryScores::from_fn(|category| {
            self.keywords(category)
                .iter()
                .map(|keyword| count_occurrences(&corpus, keyword))
                .sum()
        })
    }

    pub fn classify(&self, corpus: &str) -> ScoreResult {
        let result = score(self.raw_scores(corpus));
        debug!(
            "Scored corpus of {} chars: raw {:?}, percent {:?}, primary {}",
            corpus.len(),
            result.raw,
            result.percent,
            result.primary
        );
        result
    }
}

fn score(raw: CategoryScores<u32>) -> ScoreResult {
    let total = raw.kids + raw.teen + raw.serious;
    let percent = CategoryScores::from_fn(|category| percentage(raw.get(category), total));
    let primary = primary_category(&percent);
    ScoreResult {
        raw,
        percent,
        primary,
    }
}

/// One-shot classification; prefer [`Classifier`] when scoring many corpora.
pub fn classify(corpus: &str, lexicon: &KeywordLexicon) -> ScoreResult {
    Classifier::new(lexicon).classify(corpus)
}
