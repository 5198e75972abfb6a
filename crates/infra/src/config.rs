//! Store configuration, read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_TABLE: &str = "inventory";
pub const DEFAULT_BUCKET: &str = "inventory";
pub const DEFAULT_LOCAL_KEY: &str = "mattress_hero_inventory";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_FEED_POLL_MS: u64 = 5_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Where the repository keeps its data.
///
/// `remote_url` and `remote_key` are both optional; without them the client
/// starts directly in offline mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
    pub table: String,
    pub bucket: String,
    pub local_key: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub feed_poll_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_key: None,
            table: DEFAULT_TABLE.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            local_key: DEFAULT_LOCAL_KEY.to_string(),
            data_dir: default_data_dir(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            feed_poll_interval: Duration::from_millis(DEFAULT_FEED_POLL_MS),
        }
    }
}

/// `<platform data dir>/resale`, or `./resale-data` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("resale"))
        .unwrap_or_else(|| PathBuf::from("resale-data"))
}

impl StoreConfig {
    /// Read `RESALE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        cfg.remote_url = get("RESALE_REMOTE_URL").map(|u| u.trim_end_matches('/').to_string());
        cfg.remote_key = get("RESALE_REMOTE_KEY");
        if let Some(v) = get("RESALE_TABLE") {
            cfg.table = v;
        }
        if let Some(v) = get("RESALE_BUCKET") {
            cfg.bucket = v;
        }
        if let Some(v) = get("RESALE_LOCAL_KEY") {
            cfg.local_key = v;
        }
        if let Some(v) = get("RESALE_DATA_DIR") {
            cfg.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("RESALE_REQUEST_TIMEOUT_MS") {
            cfg.request_timeout = parse_millis("RESALE_REQUEST_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("RESALE_FEED_POLL_MS") {
            cfg.feed_poll_interval = parse_millis("RESALE_FEED_POLL_MS", &v)?;
        }

        Ok(cfg)
    }

    /// True when both the URL and the key of the hosted backend are known.
    pub fn has_remote(&self) -> bool {
        self.remote_url.is_some() && self.remote_key.is_some()
    }
}

fn parse_millis(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let ms: u64 = raw.parse().map_err(|e| ConfigError::Invalid {
        key,
        reason: format!("{raw:?}: {e}"),
    })?;
    if ms == 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_millis(ms))
}
