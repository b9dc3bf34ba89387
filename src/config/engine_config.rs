use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::modules::emotion::Intensity;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaConfig {
    pub base_factor: f64,
    pub heavy_scale: f64,
}

impl InertiaConfig {
    pub fn new(base_factor: impl Into<f64>, heavy_scale: impl Into<f64>) -> Self {
        Self {
            base_factor: base_factor.into(),
            heavy_scale: heavy_scale.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let factors = [("base_factor", self.base_factor), ("heavy_scale", self.heavy_scale)];

        for (name, value) in factors {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!(
                    "Inertia setting '{}' has value {}, but must be in (0.0, 1.0]",
                    name, value
                ));
            }
        }

        Ok(())
    }
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub threshold: Intensity,
    pub max_stops: usize,
    pub angle_deg: u16,
    pub min_lightness: f64,
}

impl GradientConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_stops == 0 {
            return Err("Gradient max_stops must be at least 1".to_string());
        }
        if self.threshold > 100 {
            return Err(format!("Gradient threshold {} is above 100", self.threshold));
        }
        if !(0.0..1.0).contains(&self.min_lightness) {
            return Err(format!(
                "Gradient min_lightness {} must be in [0.0, 1.0)",
                self.min_lightness
            ));
        }
        Ok(())
    }
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            threshold: 20,
            max_stops: 4,
            angle_deg: 135,
            min_lightness: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub storage_key: String,
    pub history_limit: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            storage_key: "persona_affect_state".to_string(),
            history_limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrazyModeConfig {
    pub interval_ms: u64,
}

impl Default for CrazyModeConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub inertia: InertiaConfig,
    pub gradient: GradientConfig,
    pub persistence: PersistenceConfig,
    pub crazy_mode: CrazyModeConfig,
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.inertia.validate()?;
        self.gradient.validate()?;

        if self.persistence.storage_key.trim().is_empty() {
            return Err("Persistence storage_key must not be empty".to_string());
        }
        if self.crazy_mode.interval_ms == 0 {
            return Err("Crazy mode interval_ms must be greater than 0".to_string());
        }

        Ok(())
    }
}
