//! Runtime configuration, injected into the provider and the pipeline.
//!
//! Precedence: built-in defaults < `~/.area_places/config.json` (or `--config`)
//! < `GOOGLE_MAPS_API_KEY` < command-line flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No API key configured. Set GOOGLE_MAPS_API_KEY, pass --api-key, or add \"api_key\" to the config file")]
    MissingApiKey,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub geocode_url: String,
    pub nearby_search_url: String,
    pub text_search_url: String,
    /// Response language requested from the provider.
    pub language: String,
    /// Region bias (ccTLD) for geocoding and text search.
    pub region: String,
    /// Country qualifier appended to bare area names before geocoding.
    pub country_suffix: String,
    /// Informational price of one API call, in USD.
    pub price_per_call: f64,
    /// Wait before fetching a continuation page; the provider needs it to activate the token.
    pub page_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocode_url: "https://maps.googleapis.com/maps/api/geocode/json".into(),
            nearby_search_url: "https://maps.googleapis.com/maps/api/place/nearbysearch/json".into(),
            text_search_url: "https://maps.googleapis.com/maps/api/place/textsearch/json".into(),
            language: "vi".into(),
            region: "vn".into(),
            country_suffix: "Việt Nam".into(),
            price_per_call: 0.032,
            page_delay_ms: 2000,
            timeout_secs: 10,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("geocode_url", &self.geocode_url)
            .field("nearby_search_url", &self.nearby_search_url)
            .field("text_search_url", &self.text_search_url)
            .field("language", &self.language)
            .field("region", &self.region)
            .field("country_suffix", &self.country_suffix)
            .field("price_per_call", &self.price_per_call)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Default config file location (~/.area_places/config.json).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".area_places")
            .join("config.json")
    }

    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read { path: path.to_path_buf(), source });
            }
        };
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Override the API key with a value taken from the environment, if present and non-empty.
    pub fn with_env_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key.trim().to_string();
        }
        self
    }

    /// Reads [`API_KEY_ENV`] from the process environment.
    pub fn apply_env(self) -> Self {
        let key = std::env::var(API_KEY_ENV).ok();
        self.with_env_key(key)
    }

    /// Apply command-line overrides; these win over file and environment.
    pub fn with_overrides(mut self, api_key: Option<String>, page_delay_ms: Option<u64>) -> Self {
        self = self.with_env_key(api_key);
        if let Some(ms) = page_delay_ms {
            self.page_delay_ms = ms;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
