use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE: &str = "https://api.data.gov.sg";
pub const DEFAULT_TARGET_AREA: &str = "Pasir Ris";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30 * 60;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Settings for the weather widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Scheme and host of the environment API, without a trailing slash.
    pub api_base: String,

    /// Matched case-insensitively as a substring of the forecast area name.
    pub target_area: String,

    pub refresh_interval_secs: u64,

    /// `None` leaves the HTTP client's own default in place.
    pub request_timeout_secs: Option<u64>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            target_area: DEFAULT_TARGET_AREA.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            request_timeout_secs: None,
        }
    }
}

impl WeatherConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Totals shown by the impact counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    pub cleanups: u64,
    pub volunteers: u64,
    pub trash_kg: u64,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            cleanups: 150,
            volunteers: 1200,
            trash_kg: 5000,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// target_area = "Pasir Ris"
/// refresh_interval_secs = 1800
///
/// [impact]
/// volunteers = 1250
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub impact: ImpactConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: nothing saved yet.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "shoreline", "shoreline-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.weather.target_area.trim().is_empty() {
            return Err(anyhow!("weather.target_area must not be empty"));
        }
        let interval = self.weather.refresh_interval_secs;
        if !(1..=MAX_REFRESH_INTERVAL_SECS).contains(&interval) {
            return Err(anyhow!(
                "weather.refresh_interval_secs must be between 1 and {}, got {}",
                MAX_REFRESH_INTERVAL_SECS,
                interval
            ));
        }
        if !(self.weather.api_base.starts_with("http://")
            || self.weather.api_base.starts_with("https://"))
        {
            return Err(anyhow!(
                "weather.api_base must be an http(s) URL, got '{}'",
                self.weather.api_base
            ));
        }
        Ok(())
    }

    /// Replace the target area; surrounding whitespace is dropped.
    pub fn set_target_area(&mut self, area: &str) {
        self.weather.target_area = area.trim().to_string();
    }

    /// Store the API base without a trailing slash so endpoint paths join cleanly.
    pub fn set_api_base(&mut self, base: &str) {
        self.weather.api_base = base.trim().trim_end_matches('/').to_string();
    }
}
