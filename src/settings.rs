use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "lowercase")]
pub struct Settings {
    #[serde(alias = "TAMBO")]
    pub tambo: TamboSection,
    #[serde(alias = "COMPLIANCE")]
    pub compliance: ComplianceSettings,
    #[serde(alias = "CHART")]
    pub chart: ChartSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub struct TamboSection {
    /// Site identifier the measurement series belongs to.
    #[serde(alias = "NAME")]
    pub name: String,
    #[serde(alias = "DEBUG")]
    pub debug: bool,
}

/// Wet/dry cycle tolerance windows and the ON-code table.
///
/// `on_codes` is the single place deciding which raw state codes count as
/// "sprayers ON" for compliance. The controller reports MAX as 3 or 13
/// (degraded); only 3 counts by default, add 13 here if degraded MAX
/// readings should open a wet phase.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub struct ComplianceSettings {
    #[serde(alias = "WET_TARGET_SECS")]
    pub wet_target_secs: f64,
    #[serde(alias = "WET_MIN_SECS")]
    pub wet_min_secs: f64,
    #[serde(alias = "WET_MAX_SECS")]
    pub wet_max_secs: f64,
    #[serde(alias = "DRY_TARGET_SECS")]
    pub dry_target_secs: f64,
    #[serde(alias = "DRY_MIN_SECS")]
    pub dry_min_secs: f64,
    #[serde(alias = "DRY_MAX_SECS")]
    pub dry_max_secs: f64,
    #[serde(alias = "ON_CODES")]
    pub on_codes: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub struct ChartSettings {
    /// Downsampling budget for chart series.
    #[serde(alias = "MAX_POINTS")]
    pub max_points: usize,
    /// Horizontal pixel radius for nearest-point hit-testing.
    #[serde(alias = "HIT_RADIUS_PX")]
    pub hit_radius_px: f64,
    #[serde(alias = "ZOOM_CEILING")]
    pub zoom_ceiling: f64,
}

impl Default for TamboSection {
    fn default() -> Self {
        Self {
            name: "tambo".to_string(),
            debug: false,
        }
    }
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        // Target: 40s water + 7m air.
        Self {
            wet_target_secs: 40.0,
            wet_min_secs: 30.0,
            wet_max_secs: 60.0,
            dry_target_secs: 420.0,
            dry_min_secs: 300.0,
            dry_max_secs: 600.0,
            on_codes: vec![3],
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            max_points: 100,
            hit_radius_px: 20.0,
            zoom_ceiling: 4.0,
        }
    }
}

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("TOML serialization failed: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported dump format: {0}")]
    UnsupportedFormat(String),
}

impl Settings {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // 1. Load defaults
        let default_settings = Settings::default();
        builder = builder.add_source(Config::try_from(&default_settings)?);

        // 2. Load from file if specified
        if let Some(path) = config_path {
            if path.exists() {
                builder = builder.add_source(File::from(path));
            } else {
                warn!("Configuration file not found: {:?}", path);
            }
        } else {
            // Standard search path
            if let Some(home) = dirs::home_dir() {
                let toml_path = home.join(".tambo-ith").join("settings.toml");
                let yaml_path = home.join(".tambo-ith").join("settings.yaml");

                if toml_path.exists() {
                    builder = builder.add_source(File::from(toml_path));
                } else if yaml_path.exists() {
                    builder = builder.add_source(File::from(yaml_path));
                }
            }
        }

        // 3. Environment variables
        builder = builder.add_source(
            Environment::with_prefix("TAMBOITH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;

        // Detect unknown sections so a typo does not silently fall back to defaults
        if let Ok(table) = config.clone().try_deserialize::<serde_json::Value>() {
            if let Some(map) = table.as_object() {
                let known_sections = ["tambo", "compliance", "chart"];
                for key in map.keys() {
                    let lower_key = key.to_lowercase();
                    if !known_sections.contains(&lower_key.as_str()) {
                        warn!("Unknown configuration section: {}", key);
                    }
                }
            }
        }

        config.try_deserialize()
    }

    pub fn dump(&self, format: &str) -> Result<String, DumpError> {
        match format.to_lowercase().as_str() {
            "toml" => Ok(toml::to_string_pretty(self)?),
            "yaml" | "yml" => Ok(serde_yaml::to_string(self)?),
            other => Err(DumpError::UnsupportedFormat(other.to_string())),
        }
    }
}
