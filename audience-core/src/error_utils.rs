use crate::error::*;
use tracing::{error, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    /// True when no further API call can succeed in this run.
    fn halts_batch(&self) -> bool;
    /// True when the current item can be skipped and the run continued.
    fn is_recoverable(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::YouTubeApi(e) => {
                error!("YouTube API error details: {:?}", e);
            }
            CoreError::Resolve(e) => {
                error!("Resolution error details: {:?}", e);
            }
            CoreError::Lexicon(e) => {
                error!("Lexicon error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn halts_batch(&self) -> bool {
        match self {
            CoreError::YouTubeApi(e) => e.halts_batch(),
            _ => false,
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            CoreError::YouTubeApi(e) => e.is_recoverable(),
            CoreError::Resolve(e) => e.is_recoverable(),
            CoreError::Network(_) => true,
            CoreError::InvalidInput { .. } => true,
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::YouTubeApi(e) => e.user_friendly_message(),
            CoreError::Resolve(e) => e.user_friendly_message(),
            CoreError::Lexicon(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            CoreError::Io(e) => format!("Could not read or write a file: {}", e),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::YouTubeApi(_) => "YOUTUBE_API".to_string(),
            CoreError::Resolve(_) => "RESOLVE".to_string(),
            CoreError::Lexicon(_) => "LEXICON".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Io(_) => "IO".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
        }
    }
}

impl ErrorExt for YouTubeApiError {
    fn log_error(&self) -> &Self {
        error!("YouTubeApiError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("YouTubeApiError (warning): {}", self);
        self
    }

    fn halts_batch(&self) -> bool {
        matches!(self, YouTubeApiError::QuotaExceeded)
    }

    fn is_recoverable(&self) -> bool {
        !self.halts_batch()
    }

    fn user_friendly_message(&self) -> String {
        match self {
            YouTubeApiError::QuotaExceeded => {
                "YouTube API quota is exhausted. Try again tomorrow or use another API key."
                    .to_string()
            }
            YouTubeApiError::RateLimited { .. } => {
                "Too many requests to the YouTube API. Please slow down and try again.".to_string()
            }
            YouTubeApiError::Forbidden { reason } => format!("Access denied by YouTube: {}", reason),
            YouTubeApiError::BadRequest { reason } => {
                format!("YouTube rejected the request, check the URL: {}", reason)
            }
            YouTubeApiError::NotFound { resource } => format!("{} does not exist.", resource),
            YouTubeApiError::RequestTimeout => {
                "Request to YouTube timed out. Please try again.".to_string()
            }
            YouTubeApiError::Transport { .. } => {
                "Could not reach the YouTube API. Please check your connection.".to_string()
            }
            _ => "YouTube API error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            YouTubeApiError::QuotaExceeded => "YOUTUBE_QUOTA_EXCEEDED".to_string(),
            YouTubeApiError::RateLimited { .. } => "YOUTUBE_RATE_LIMIT".to_string(),
            YouTubeApiError::Forbidden { .. } => "YOUTUBE_FORBIDDEN".to_string(),
            YouTubeApiError::BadRequest { .. } => "YOUTUBE_BAD_REQUEST".to_string(),
            YouTubeApiError::NotFound { .. } => "YOUTUBE_NOT_FOUND".to_string(),
            YouTubeApiError::ServerError { .. } => "YOUTUBE_SERVER_ERROR".to_string(),
            YouTubeApiError::RequestTimeout => "YOUTUBE_TIMEOUT".to_string(),
            YouTubeApiError::Transport { .. } => "YOUTUBE_TRANSPORT".to_string(),
            YouTubeApiError::InvalidResponse { .. } => "YOUTUBE_INVALID_RESPONSE".to_string(),
        }
    }
}

impl ErrorExt for ResolveError {
    fn log_error(&self) -> &Self {
        error!("ResolveError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ResolveError (warning): {}", self);
        self
    }

    fn halts_batch(&self) -> bool {
        false
    }

    fn is_recoverable(&self) -> bool {
        true
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ResolveError::UnrecognizedUrl { url } => format!("Not a YouTube channel or video URL: {}", url),
            ResolveError::UnsupportedEntityType { kind, .. } => format!(
                "URLs by {} are not supported, use the /channel/<id> URL instead.",
                kind
            ),
            ResolveError::NoDataFound { id } => format!("YouTube returned no data for {}.", id),
        }
    }

    fn error_code(&self) -> String {
        match self {
            ResolveError::UnrecognizedUrl { .. } => "UNRECOGNIZED_URL".to_string(),
            ResolveError::UnsupportedEntityType { .. } => "UNSUPPORTED_ENTITY_TYPE".to_string(),
            ResolveError::NoDataFound { .. } => "NO_DATA_FOUND".to_string(),
        }
    }
}

impl ErrorExt for LexiconError {
    fn log_error(&self) -> &Self {
        error!("LexiconError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("LexiconError (warning): {}", self);
        self
    }

    fn halts_batch(&self) -> bool {
        false
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            LexiconError::WriteFailed { path } => {
                format!("Could not save classification words to {}.", path)
            }
            LexiconError::UnknownCategory { name } => format!(
                "Unknown category '{}'. Use kids, teen or serious.",
                name
            ),
            LexiconError::LanguageRequired { category } => format!(
                "Category '{}' is split by language, pass a language tag.",
                category
            ),
            LexiconError::NotPartitioned { category } => format!(
                "Category '{}' is a single list, omit the language tag.",
                category
            ),
            _ => "Classification words could not be read. Defaults are used.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            LexiconError::Unreadable { .. } => "LEXICON_UNREADABLE".to_string(),
            LexiconError::WriteFailed { .. } => "LEXICON_WRITE_FAILED".to_string(),
            LexiconError::UnknownCategory { .. } => "LEXICON_UNKNOWN_CATEGORY".to_string(),
            LexiconError::LanguageRequired { .. } => "LEXICON_LANGUAGE_REQUIRED".to_string(),
            LexiconError::NotPartitioned { .. } => "LEXICON_NOT_PARTITIONED".to_string(),
            LexiconError::Format(_) => "LEXICON_FORMAT".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn halts_batch(&self) -> bool {
        false
    }

    fn is_recoverable(&self) -> bool {
        false // Config errors need user intervention
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => format!("Configuration file {} not found.", path),
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::MissingApiKey { key_file } => format!(
                "No YouTube Data API key. Set YOUTUBE_API_KEY or write the key into {}.",
                key_file
            ),
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::MissingApiKey { .. } => "CONFIG_MISSING_API_KEY".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}
