use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_OMDB_URL: &str = "https://www.omdbapi.com/";
pub const DEFAULT_YOUTUBE_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const DEFAULT_DATA_DIR: &str = ".movie-explorer";
const DEFAULT_DEBOUNCE_MILLIS: u64 = 300;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Configuration {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub youtube: YoutubeConfig,
    pub storage: Option<StorageConfig>,
    pub search: Option<SearchConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    #[serde(rename = "baseUrl", default = "default_omdb_url")]
    pub base_url: String,
    #[serde(rename = "apikey", default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YoutubeConfig {
    #[serde(rename = "baseUrl", default = "default_youtube_url")]
    pub base_url: String,
    #[serde(rename = "apikey")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(rename = "dataDir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(rename = "debounceMillis")]
    pub debounce_millis: u64,
}

fn default_omdb_url() -> String {
    DEFAULT_OMDB_URL.to_string()
}

fn default_youtube_url() -> String {
    DEFAULT_YOUTUBE_URL.to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_omdb_url(),
            api_key: String::new(),
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            base_url: default_youtube_url(),
            api_key: None,
        }
    }
}

impl Configuration {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Configuration = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Reads the file when it exists, falls back to defaults otherwise, then
    /// applies `OMDB_API_KEY` / `YOUTUBE_API_KEY` from the environment.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = if path.exists() {
            info!("Loading configuration from: {}", path.display());
            Self::from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        let config = config.with_api_keys(
            std::env::var("OMDB_API_KEY").ok(),
            std::env::var("YOUTUBE_API_KEY").ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Overrides API keys with any non-blank values given.
    pub fn with_api_keys(mut self, omdb: Option<String>, youtube: Option<String>) -> Self {
        if let Some(key) = omdb.filter(|k| !k.trim().is_empty()) {
            self.omdb.api_key = key;
        }
        if let Some(key) = youtube.filter(|k| !k.trim().is_empty()) {
            self.youtube.api_key = Some(key);
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.api_key.trim().is_empty() {
            bail!("OMDb API key missing: set omdb.apikey in the config file or OMDB_API_KEY");
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .as_ref()
            .map(|s| s.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(
            self.search
                .as_ref()
                .map(|s| s.debounce_millis)
                .unwrap_or(DEFAULT_DEBOUNCE_MILLIS),
        )
    }
}
