use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const MIN_POLL_INTERVAL_MS: u64 = 250;

pub const TRANSACTIONS_PATH: &str = "/transactions";

/// Markers the server-rendered template puts on the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomSelectors {
    pub table_rows: String,
    pub search_input_id: String,
    pub row_id_attribute: String,
    pub phone_input: String,
    pub badge: String,
    pub clickable_badge: String,
    pub badge_action_attribute: String,
}

impl Default for DomSelectors {
    fn default() -> Self {
        Self {
            table_rows: "#txnTable tbody tr".to_string(),
            search_input_id: "search".to_string(),
            row_id_attribute: "data-id".to_string(),
            phone_input: ".phone".to_string(),
            badge: ".badge".to_string(),
            clickable_badge: ".badge-clickable".to_string(),
            badge_action_attribute: "data-action".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Empty means same origin: requests go to relative paths.
    pub base_url: String,
    pub poll_interval: Duration,
    pub selectors: DomSelectors,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            selectors: DomSelectors::default(),
        }
    }
}

impl SyncConfig {
    pub fn from_overrides(
        base_url: Option<&str>,
        poll_interval_ms: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = base_url {
            config.base_url = normalize_base_url(raw)?;
        }
        if let Some(interval_ms) = poll_interval_ms {
            config.poll_interval = Duration::from_millis(interval_ms.max(MIN_POLL_INTERVAL_MS));
        }
        Ok(config)
    }

    pub fn endpoint(&self, path: &str) -> String {
        let trimmed = path.trim().trim_start_matches('/');
        format!("{}/{}", self.base_url, trimmed)
    }

    pub fn transactions_url(&self) -> String {
        self.endpoint(TRANSACTIONS_PATH)
    }

    pub fn update_phone_url(&self, id: &str) -> String {
        self.endpoint(&format!("/update_phone/{}", id.trim()))
    }

    pub fn call_url(&self, id: &str) -> String {
        self.endpoint(&format!("/call/{}", id.trim()))
    }

    pub fn set_action_url(&self, id: &str) -> String {
        self.endpoint(&format!("/set_action/{}", id.trim()))
    }
}

/// Blank input selects same-origin requests; anything else must be an absolute
/// http(s) URL with a host.
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
