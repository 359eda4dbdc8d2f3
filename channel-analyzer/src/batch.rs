use audience_core::{
    build_corpus, try_resolve, AnalysisRecord, AppConfig, ChannelSource, Classifier, CoreError,
    ErrorExt, ErrorRecovery, KeywordLexicon, RecoveryResult, ResolveError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    /// Pause between consecutive URLs.
    pub request_delay: Duration,
    pub recent_video_limit: u32,
}

impl BatchConfig {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            request_delay: config.request_delay(),
            recent_video_limit: config.recent_video_limit,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Reported once per URL, after the URL has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position in the batch.
    pub index: usize,
    pub total: usize,
    pub url: String,
}

#[derive(Debug)]
pub struct SkipNotice {
    pub index: usize,
    pub url: String,
    pub reason: CoreError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchHalt {
    /// The API quota ran out while handling `url`; nothing after it was attempted.
    QuotaExceeded { at_index: usize, url: String },
    /// The cancel flag was raised before item `at_index` started.
    Cancelled { at_index: usize },
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<AnalysisRecord>,
    pub skipped: Vec<SkipNotice>,
    pub halt: Option<BatchHalt>,
}

impl BatchOutcome {
    /// True when some URLs were never attempted.
    pub fn is_truncated(&self) -> bool {
        self.halt.is_some()
    }

    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self.halt, Some(BatchHalt::QuotaExceeded { .. }))
    }
}

pub struct BatchAnalyzer {
    config: BatchConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl BatchAnalyzer {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Analyses `urls` one after another.
    ///
    /// Blank entries are dropped before numbering. Quota exhaustion stops
    /// the run and keeps every record gathered so far; any other per-URL
    /// failure becomes a [`SkipNotice`].
    pub async fn run<S, F>(
        &self,
        urls: &[String],
        source: &S,
        lexicon: &KeywordLexicon,
        mut progress: F,
    ) -> BatchOutcome
    where
        S: ChannelSource + ?Sized,
        F: FnMut(&Progress),
    {
        let urls: Vec<&str> = urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .collect();
        let total = urls.len();
        let run_id = Uuid::new_v4();
        let span = info_span!("analysis_run", %run_id, total);

        async move {
            info!("Starting analysis of {} URLs", total);
            let classifier = Classifier::new(lexicon);
            let mut outcome = BatchOutcome::default();

            for (position, url) in urls.iter().enumerate() {
                let index = position + 1;

                if self.is_cancelled() {
                    warn!("Analysis cancelled before item {}/{}", index, total);
                    outcome.halt = Some(BatchHalt::Cancelled { at_index: index });
                    break;
                }

                let result = self.analyze_url(url, source, &classifier).await;
                match ErrorRecovery::apply(result) {
                    RecoveryResult::Recovered(record) => {
                        debug!(
                            "{} classified as {} ({}/{}/{})",
                            url,
                            record.primary_category,
                            record.kids_pct,
                            record.teen_pct,
                            record.serious_pct
                        );
                        outcome.records.push(record);
                    }
                    RecoveryResult::Halted(error) => {
                        error.log_error();
                        warn!(
                            "Stopping at {}/{}: {}; keeping {} results",
                            index,
                            total,
                            error.user_friendly_message(),
                            outcome.records.len()
                        );
                        outcome.halt = Some(BatchHalt::QuotaExceeded {
                            at_index: index,
                            url: url.to_string(),
                        });
                    }
                    RecoveryResult::Skipped(error) => {
                        warn!("Skipping {} [{}]: {}", url, error.error_code(), error);
                        outcome.skipped.push(SkipNotice {
                            index,
                            url: url.to_string(),
                            reason: error,
                        });
                    }
                }

                progress(&Progress {
                    index,
                    total,
                    url: url.to_string(),
                });

                if outcome.halt.is_some() {
                    break;
                }
                if index < total && !self.config.request_delay.is_zero() {
                    tokio::time::sleep(self.config.request_delay).await;
                }
            }

            info!(
                "Analysis finished: {} classified, {} skipped{}",
                outcome.records.len(),
                outcome.skipped.len(),
                if outcome.is_truncated() { ", truncated" } else { "" }
            );
            outcome
        }
        .instrument(span)
        .await
    }

    async fn analyze_url<S>(
        &self,
        url: &str,
        source: &S,
        classifier: &Classifier,
    ) -> Result<AnalysisRecord, CoreError>
    where
        S: ChannelSource + ?Sized,
    {
        let entity = try_resolve(url)?;
        if entity.kind.needs_name_lookup() {
            return Err(ResolveError::UnsupportedEntityType {
                kind: entity.kind.to_string(),
                name: entity.id,
            }
            .into());
        }

        let channel_id = if entity.kind.is_video() {
            source
                .get_video_channel_id(&entity.id)
                .await?
                .ok_or_else(|| ResolveError::NoDataFound {
                    id: entity.id.clone(),
                })?
        } else {
            entity.id
        };

        let channel = source
            .get_channel(&channel_id)
            .await?
            .ok_or_else(|| ResolveError::NoDataFound {
                id: channel_id.clone(),
            })?;

        // Any upload lookup failure, quota included, leaves the corpus to the
        // channel text alone.
        let uploads = source
            .get_recent_videos(&channel_id, self.config.recent_video_limit)
            .await
            .map_err(CoreError::from);
        let videos = ErrorRecovery::degrade(uploads, "Fetching recent videos");

        let corpus = build_corpus(&channel, &videos);
        let score = classifier.classify(&corpus);
        Ok(AnalysisRecord::new(url, &channel, &score))
    }
}
