//! Error recovery policy for batch processing.
//!
//! Every failure met while analysing one URL is mapped onto a strategy:
//! quota exhaustion halts the whole batch and anything else skips the item.
//! Optional lookups (recent uploads) degrade to an empty value instead.
//! Nothing is retried.

use crate::{CoreError, ErrorExt};
use tracing::warn;

/// Recovery strategy for handling errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Stop the batch, keeping what was accumulated so far
    Halt,
    /// Report the item as skipped and continue with the next one
    Skip,
}

/// Outcome of applying a strategy to one item of the batch
#[derive(Debug)]
pub enum RecoveryResult<T> {
    /// The item succeeded
    Recovered(T),
    /// The item should be skipped
    Skipped(CoreError),
    /// The batch must stop
    Halted(CoreError),
}

impl<T> RecoveryResult<T> {
    pub fn is_recovered(&self) -> bool {
        matches!(self, RecoveryResult::Recovered(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RecoveryResult::Skipped(_))
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, RecoveryResult::Halted(_))
    }
}

pub struct ErrorRecovery;

impl ErrorRecovery {
    /// Determine the appropriate recovery strategy for a given error
    pub fn determine_strategy(error: &CoreError) -> RecoveryStrategy {
        if error.halts_batch() {
            RecoveryStrategy::Halt
        } else {
            RecoveryStrategy::Skip
        }
    }

    /// Classify the result of the per-item pipeline
    pub fn apply<T>(result: Result<T, CoreError>) -> RecoveryResult<T> {
        match result {
            Ok(value) => RecoveryResult::Recovered(value),
            Err(error) => match Self::determine_strategy(&error) {
                RecoveryStrategy::Halt => RecoveryResult::Halted(error),
                RecoveryStrategy::Skip => RecoveryResult::Skipped(error),
            },
        }
    }

    /// Optional lookups never stop processing, quota exhaustion included;
    /// failures fall back to `T::default()`.
    pub fn degrade<T: Default>(result: Result<T, CoreError>, context: &str) -> T {
        result.unwrap_or_else(|error| {
            warn!(
                "{} failed, continuing without it: {}",
                context,
                error.user_friendly_message()
            );
            T::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, ResolveError, YouTubeApiError};

    #[test]
    fn test_determine_strategy() {
        let quota = CoreError::YouTubeApi(YouTubeApiError::QuotaExceeded);
        assert_eq!(
            ErrorRecovery::determine_strategy(&quota),
            RecoveryStrategy::Halt
        );

        let per_item = [
            CoreError::YouTubeApi(YouTubeApiError::RateLimited { status_code: 429 }),
            CoreError::YouTubeApi(YouTubeApiError::ServerError { status_code: 503 }),
            CoreError::YouTubeApi(YouTubeApiError::Transport {
                details: "connection reset".to_string(),
            }),
            CoreError::Resolve(ResolveError::UnrecognizedUrl {
                url: "x".to_string(),
            }),
            CoreError::Resolve(ResolveError::NoDataFound {
                id: "UC1".to_string(),
            }),
        ];
        for error in &per_item {
            assert_eq!(
                ErrorRecovery::determine_strategy(error),
                RecoveryStrategy::Skip,
                "{error}"
            );
        }

        let config = CoreError::Config(ConfigError::InvalidValue {
            field: "recent_video_limit".to_string(),
            value: "0".to_string(),
        });
        assert_eq!(
            ErrorRecovery::determine_strategy(&config),
            RecoveryStrategy::Skip
        );
    }

    #[test]
    fn test_apply() {
        assert!(ErrorRecovery::apply::<u32>(Ok(1)).is_recovered());
        assert!(ErrorRecovery::apply::<u32>(Err(YouTubeApiError::QuotaExceeded.into())).is_halted());
        assert!(ErrorRecovery::apply::<u32>(Err(YouTubeApiError::BadRequest {
            reason: "invalid id".to_string()
        }
        .into()))
        .is_skipped());
    }

    #[test]
    fn test_degrade_falls_back_to_default() {
        let quota: Vec<u32> =
            ErrorRecovery::degrade(Err(YouTubeApiError::QuotaExceeded.into()), "recent uploads");
        assert!(quota.is_empty());

        let server: Vec<u32> = ErrorRecovery::degrade(
            Err(YouTubeApiError::ServerError { status_code: 500 }.into()),
            "recent uploads",
        );
        assert!(server.is_empty());

        assert_eq!(
            ErrorRecovery::degrade(Ok(vec![1, 2]), "recent uploads"),
            vec![1, 2]
        );
    }
}
