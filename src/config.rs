//! Runtime configuration passed into the pipeline and scheduler.
//!
//! `Config::default()` matches the production constants: the JCDecaux v3
//! endpoint, a 60 second interval and a map of France written to `index.html`.

use anyhow::{Result, bail};
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::redact_url;

pub const DEFAULT_API_URL: &str = "https://api.jcdecaux.com/vls/v3/stations";
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub output_path: PathBuf,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 48.8566,
            center_lon: 2.3522,
            zoom: 5,
            output_path: PathBuf::from("index.html"),
            tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_url: String,
    /// Sent as the `apiKey` query parameter when set.
    pub api_key: Option<String>,
    pub interval: Duration,
    pub request_timeout: Duration,
    /// Number of cycles to run; 0 runs until cancelled.
    pub max_cycles: usize,
    pub map: MapConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_cycles: 0,
            map: MapConfig::default(),
        }
    }
}

// Hand-written so the API key never reaches log output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &redact_url(&self.api_url))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("interval", &self.interval)
            .field("request_timeout", &self.request_timeout)
            .field("max_cycles", &self.max_cycles)
            .field("map", &self.map)
            .finish()
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = reqwest::Url::parse(&self.api_url) {
            bail!("invalid api url {:?}: {}", redact_url(&self.api_url), e);
        }
        if !(-90.0..=90.0).contains(&self.map.center_lat) {
            bail!("map center latitude {} out of range", self.map.center_lat);
        }
        if !(-180.0..=180.0).contains(&self.map.center_lon) {
            bail!("map center longitude {} out of range", self.map.center_lon);
        }
        if self.map.zoom > 19 {
            bail!("map zoom {} exceeds 19", self.map.zoom);
        }
        if self.request_timeout.is_zero() {
            bail!("request timeout must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_production_constants() {
        let config = Config::default();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.map.center_lat, 48.8566);
        assert_eq!(config.map.center_lon, 2.3522);
        assert_eq!(config.map.zoom, 5);
        assert_eq!(config.map.output_path, PathBuf::from("index.html"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_is_valid() {
        let config = Config {
            interval: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url_and_center() {
        let bad_url = Config {
            api_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());

        let mut bad_center = Config::default();
        bad_center.map.center_lat = 123.0;
        assert!(bad_center.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config {
            api_key: Some("secret-key".to_string()),
            ..Config::default()
        };
        let printed = format!("{config:?}");

        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_debug_strips_key_embedded_in_url() {
        let config = Config {
            api_url: "https://api.jcdecaux.com/vls/v3/stations?apiKey=inline-key".to_string(),
            ..Config::default()
        };
        let printed = format!("{config:?}");

        assert!(!printed.contains("inline-key"));
        assert!(printed.contains("https://api.jcdecaux.com/vls/v3/stations"));
    }
}
