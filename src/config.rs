use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::render::DisplayZone;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

const RECORDS_PATH: &str = "v1/containers/";
const HEALTH_PATH: &str = "health";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {0:?}: {1}")]
    InvalidUrl(String, String),

    #[error("interval must be at least 1s, got {0:?}")]
    IntervalTooShort(Duration),
}

/// Everything the view needs from its host, fixed at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub interval: Duration,
    pub timeout: Duration,
    pub zone: DisplayZone,
    pub color: bool,
}

impl Config {
    pub fn new(base_url: &str) -> Result<Config, ConfigError> {
        Ok(Config {
            base_url: parse_base_url(base_url)?,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            zone: DisplayZone::Local,
            color: false,
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Result<Config, ConfigError> {
        if interval < MIN_INTERVAL {
            return Err(ConfigError::IntervalTooShort(interval));
        }
        self.interval = interval;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Config {
        self.timeout = timeout;
        self
    }

    pub fn with_zone(mut self, zone: DisplayZone) -> Config {
        self.zone = zone;
        self
    }

    pub fn with_color(mut self, color: bool) -> Config {
        self.color = color;
        self
    }

    pub fn records_url(&self) -> Url {
        self.endpoint(RECORDS_PATH)
    }

    pub fn health_url(&self) -> Url {
        self.endpoint(HEALTH_PATH)
    }

    fn endpoint(&self, path: &str) -> Url {
        // base_url always ends with '/', so join appends instead of replacing
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(
            raw.to_string(),
            "expected an http(s) url".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
