use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_APP_DOMAIN: &str = "scripts.mkr.cx";
const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("api base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
    #[error("debounce window must be between 1 and {MAX_DEBOUNCE_MS} ms (got {0})")]
    InvalidDebounce(u64),
    #[error("app domain must not be empty")]
    EmptyAppDomain,
    #[error("failed to decode client config: {0}")]
    Decode(String),
}

/// Runtime settings for the console client.
///
/// An empty `api_base_url` means API paths are sent relative to the page
/// origin, which is how the console is normally served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub debounce_window: Duration,
    pub app_domain: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debounce_window: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            app_domain: DEFAULT_APP_DOMAIN.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClientConfig {
    #[serde(default)]
    api_base_url: Option<String>,
    #[serde(default)]
    debounce_ms: Option<u64>,
    #[serde(default)]
    app_domain: Option<String>,
}

impl ClientConfig {
    /// Parses an override object such as `{"apiBaseUrl": "...", "debounceMs": 300}`.
    /// Missing keys keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let raw: RawClientConfig =
            serde_json::from_str(raw).map_err(|error| ConfigError::Decode(error.to_string()))?;
        let mut config = Self::default();

        if let Some(base_url) = raw.api_base_url {
            config.api_base_url = normalize_base_url(&base_url)?;
        }
        if let Some(debounce_ms) = raw.debounce_ms {
            if debounce_ms == 0 || debounce_ms > MAX_DEBOUNCE_MS {
                return Err(ConfigError::InvalidDebounce(debounce_ms));
            }
            config.debounce_window = Duration::from_millis(debounce_ms);
        }
        if let Some(app_domain) = raw.app_domain {
            let app_domain = app_domain.trim().trim_matches('.').to_ascii_lowercase();
            if app_domain.is_empty() {
                return Err(ConfigError::EmptyAppDomain);
            }
            config.app_domain = app_domain;
        }

        Ok(config)
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base_url)
    }
}

/// Empty input stays empty (same origin); anything else must be an absolute
/// http(s) URL and loses its trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl);
    }
    let Some((_, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidBaseUrl);
    };
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}
