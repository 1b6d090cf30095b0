//! Configuration loading for goes-imagery.
//!
//! An optional YAML file supplies the satellite table and run defaults.
//! Missing sections fall back to the built-in table and constants.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use goes_common::{SatelliteEntry, SatelliteRegistry, DEFAULT_PRODUCT, LOOKBACK_HOURS};
use ingestion::SearchOptions;

/// Config file used when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_PATH: &str = "config/goes-imagery.yaml";

/// Root of the YAML configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageryConfig {
    /// Replaces the built-in satellite table when non-empty
    #[serde(default)]
    pub satellites: Vec<SatelliteEntry>,
    #[serde(default)]
    pub defaults: RunDefaults,
}

/// Values used when the matching command-line flag is absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunDefaults {
    pub satellite: Option<String>,
    pub product: Option<String>,
    pub lookback_hours: Option<u32>,
    pub earth_size: Option<usize>,
    pub padding: Option<f64>,
    pub gamma: Option<f32>,
}

impl ImageryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse goes-imagery config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        info!(
            path = %path.display(),
            satellites = config.satellites.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load `explicit` if given, else the default path if it exists, else
    /// an empty configuration.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    debug!("No config file, using built-in satellite table");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn registry(&self) -> Result<SatelliteRegistry> {
        if self.satellites.is_empty() {
            return Ok(SatelliteRegistry::builtin());
        }
        SatelliteRegistry::from_entries(self.satellites.clone())
            .context("Invalid satellite table in config")
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            product: self
                .defaults
                .product
                .clone()
                .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
            lookback_hours: self.defaults.lookback_hours.unwrap_or(LOOKBACK_HOURS),
        }
    }
}
