//! Application settings: defaults, optional TOML file, environment.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{ConfigError, CoreError};

pub const DEFAULT_CONFIG_FILE: &str = "yt-audience.toml";
pub const API_KEY_ENV_VAR: &str = "YOUTUBE_API_KEY";
pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// The search endpoint accepts at most this many results per page.
pub const MAX_RECENT_VIDEOS: u32 = 50;

/// Key file contents that mean "not filled in yet".
const API_KEY_PLACEHOLDERS: &[&str] = &["YOUR_YOUTUBE_DATA_API_KEY_HERE", "ZADEJTE_VAS_API_KLIC_ZDE"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_key_file: PathBuf,
    pub lexicon_path: PathBuf,
    pub request_delay_ms: u64,
    pub recent_video_limit: u32,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_file: PathBuf::from("api_key.txt"),
            lexicon_path: PathBuf::from("classification_words.json"),
            request_delay_ms: 100,
            recent_video_limit: 5,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// An explicit path must exist; otherwise the default file is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, CoreError> {
        match explicit_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.recent_video_limit == 0 || self.recent_video_limit > MAX_RECENT_VIDEOS {
            return Err(ConfigError::InvalidValue {
                field: "recent_video_limit".to_string(),
                value: self.recent_video_limit.to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".to_string(),
                value: self.api_base_url.clone(),
            });
        }
        Ok(())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Explicit key, then `YOUTUBE_API_KEY`, then the key file.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        let env_key = std::env::var(API_KEY_ENV_VAR).ok();
        let file_key = fs::read_to_string(&self.api_key_file).ok();
        pick_api_key(
            self.api_key.as_deref(),
            env_key.as_deref(),
            file_key.as_deref(),
        )
        .ok_or_else(|| ConfigError::MissingApiKey {
            key_file: self.api_key_file.display().to_string(),
        })
    }
}

fn usable_key(candidate: Option<&str>) -> Option<String> {
    let key = candidate?.trim();
    if key.is_empty() || API_KEY_PLACEHOLDERS.contains(&key) {
        None
    } else {
        Some(key.to_string())
    }
}

fn pick_api_key(explicit: Option<&str>, env: Option<&str>, file: Option<&str>) -> Option<String> {
    usable_key(explicit)
        .or_else(|| usable_key(env))
        .or_else(|| usable_key(file))
}
