use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::geocode::GeocoderId;

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default geocoder id, e.g. "mapquest" or "opencage".
    pub default_geocoder: Option<String>,

    /// Example TOML:
    /// [geocoders.mapquest]
    /// api_key = "..."
    pub geocoders: HashMap<String, ProviderConfig>,

    /// Forecast provider credentials:
    /// [forecast]
    /// api_key = "..."
    pub forecast: Option<ProviderConfig>,
}

impl Config {
    /// Return the default geocoder as a strongly-typed GeocoderId.
    pub fn default_geocoder_id(&self) -> Result<GeocoderId> {
        let s = self.default_geocoder.as_ref().ok_or_else(|| {
            anyhow!(
                "No default geocoder configured.\n\
                 Hint: run `placecast configure <geocoder>` (e.g. `placecast configure mapquest`) first."
            )
        })?;

        GeocoderId::try_from(s.as_str())
    }

    /// Store default geocoder as string.
    pub fn set_default_geocoder(&mut self, id: GeocoderId) {
        self.default_geocoder = Some(id.as_str().to_string());
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

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

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "placecast", "placecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a geocoder API key and, if none is set yet, make that
    /// geocoder the default.
    pub fn upsert_geocoder_api_key(&mut self, id: GeocoderId, api_key: String) {
        self.geocoders.insert(id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_geocoder.is_none() {
            self.default_geocoder = Some(id.to_string());
        }
    }

    /// Returns API key for a geocoder, if present.
    pub fn geocoder_api_key(&self, id: GeocoderId) -> Option<&str> {
        self.geocoders.get(id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_geocoder_configured(&self, id: GeocoderId) -> bool {
        self.geocoder_api_key(id).is_some()
    }

    pub fn set_forecast_api_key(&mut self, api_key: String) {
        self.forecast = Some(ProviderConfig { api_key });
    }

    pub fn forecast_api_key(&self) -> Option<&str> {
        self.forecast.as_ref().map(|cfg| cfg.api_key.as_str())
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(std::env::vars());
    }

    /// Apply environment overrides from an explicit variable set.
    ///
    /// Environment wins over the on-disk file. Taking the variables as an
    /// argument keeps this testable without touching process state.
    pub fn apply_env_from(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            if value.trim().is_empty() {
                continue;
            }
            match key.as_str() {
                "MAPQUEST_API_KEY" => {
                    self.geocoders.insert(
                        GeocoderId::MapQuest.as_str().to_string(),
                        ProviderConfig { api_key: value },
                    );
                }
                "OPENCAGE_API_KEY" => {
                    self.geocoders.insert(
                        GeocoderId::OpenCage.as_str().to_string(),
                        ProviderConfig { api_key: value },
                    );
                }
                "DARKSKY_API_KEY" => {
                    self.forecast = Some(ProviderConfig { api_key: value });
                }
                "PLACECAST_DEFAULT_GEOCODER" => {
                    self.default_geocoder = Some(value);
                }
                _ => {}
            }
        }
    }
}
