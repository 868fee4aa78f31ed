use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domains::ui::views::carousel::CarouselConfig;
use crate::infra::api_client::normalize_base_url;

/// Environment override for [`Config::api_url`].
pub const API_URL_ENV: &str = "POPSTORE_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the listing API.
    pub api_url: String,
    /// Base URL of the public web front, used to build share links.
    pub web_url: String,
    pub request_timeout_secs: u64,
    pub carousel: CarouselSettings,
    /// How long the "link copied" toast stays up after a clipboard share.
    pub share_toast_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselSettings {
    pub max_items: usize,
    pub autoplay_interval_ms: u64,
    pub settle_debounce_ms: u64,
    pub leading_inset: f32,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        let defaults = CarouselConfig::popup_defaults();
        Self {
            max_items: defaults.max_items,
            autoplay_interval_ms: defaults.autoplay_interval.as_millis() as u64,
            settle_debounce_ms: defaults.settle_debounce.as_millis() as u64,
            leading_inset: defaults.leading_inset,
        }
    }
}

impl CarouselSettings {
    pub fn to_config(&self) -> CarouselConfig {
        CarouselConfig {
            max_items: self.max_items,
            autoplay_interval: Duration::from_millis(
                self.autoplay_interval_ms.max(1),
            ),
            settle_debounce: Duration::from_millis(self.settle_debounce_ms),
            leading_inset: self.leading_inset,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            web_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
            carousel: CarouselSettings::default(),
            share_toast_ms: 2000,
        }
    }
}

impl Config {
    /// Default on-disk location: `<config_dir>/popstore/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("popstore").join("config.json"))
    }

    /// Defaults, then the config file, then the environment.
    pub fn load() -> Self {
        let mut config = Self::default_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default();

        // Allow env var to override config file for the API URL
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            config.api_url = api_url;
        }

        config.normalized()
    }

    /// Add a missing scheme to both base URLs and drop trailing slashes.
    pub fn normalized(mut self) -> Self {
        self.api_url = normalize_base_url(&self.api_url);
        self.web_url = normalize_base_url(&self.web_url);
        self
    }

    /// Read a config file. Missing or malformed files yield `None`.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Config>(&content) {
            Ok(config) => Some(config.normalized()),
            Err(e) => {
                log::warn!(
                    "Ignoring malformed config at {}: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }

    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(path) = Self::default_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn share_toast(&self) -> Duration {
        Duration::from_millis(self.share_toast_ms)
    }
}
