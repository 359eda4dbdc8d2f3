use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("YouTube API error: {0}")]
    YouTubeApi(#[from] YouTubeApiError),

    #[error("URL resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Failures reported by the YouTube Data API collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YouTubeApiError {
    #[error("Daily API quota exceeded")]
    QuotaExceeded,

    #[error("Rate limited by the API (HTTP {status_code})")]
    RateLimited { status_code: u16 },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Bad request: {reason}")]
    BadRequest { reason: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Transport failure: {details}")]
    Transport { details: String },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unrecognized YouTube URL: {url}")]
    UnrecognizedUrl { url: String },

    #[error("Unsupported {kind} reference '{name}' (channel id required)")]
    UnsupportedEntityType { kind: String, name: String },

    #[error("No data found for {id}")]
    NoDataFound { id: String },
}

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Lexicon file unreadable: {path}")]
    Unreadable { path: String },

    #[error("Lexicon file could not be written: {path}")]
    WriteFailed { path: String },

    #[error("Unknown category: {name}")]
    UnknownCategory { name: String },

    #[error("Category '{category}' is partitioned by language; a language tag is required")]
    LanguageRequired { category: String },

    #[error("Category '{category}' is a flat list and has no language partitions")]
    NotPartitioned { category: String },

    #[error("Invalid lexicon format: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("YouTube API key missing: set YOUTUBE_API_KEY, pass --api-key or fill {key_file}")]
    MissingApiKey { key_file: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
