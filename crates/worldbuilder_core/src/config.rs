//! World configuration
//!
//! Loaded from TOML, for example:
//!
//! ```toml
//! width = 64
//! height = 48
//! propagation = "deep"
//! shadow_connection_radius = 2
//! rng_seed = 7
//! ```
//!
//! Every field is optional and falls back to [`WorldConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default world size in cells along each axis
pub const DEFAULT_WORLD_SIZE: u32 = 32;

/// Default reach of shadow connectivity, in cells along each axis
pub const DEFAULT_SHADOW_CONNECTION_RADIUS: u32 = 2;

/// Errors that can occur when loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How far neighbor re-resolution reaches after a cell changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropagationMode {
    /// Re-resolve only the 4 orthogonal neighbors of the changed cell
    #[default]
    OneHop,
    /// Keep re-resolving outward while variants change; each cell at most
    /// once per operation
    Deep,
}

/// Settings for a world editing session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub propagation: PropagationMode,
    pub shadow_connection_radius: u32,
    /// Seed for the random bridge variants. `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_SIZE,
            height: DEFAULT_WORLD_SIZE,
            propagation: PropagationMode::OneHop,
            shadow_connection_radius: DEFAULT_SHADOW_CONNECTION_RADIUS,
            rng_seed: None,
        }
    }
}

impl WorldConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_propagation(mut self, propagation: PropagationMode) -> Self {
        self.propagation = propagation;
        self
    }

    pub fn with_shadow_connection_radius(mut self, radius: u32) -> Self {
        self.shadow_connection_radius = radius;
        self
    }

    /// Check that the configuration describes a usable world
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "world dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(ConfigError::Invalid(format!(
                "world dimensions {}x{} exceed the addressable range",
                self.width, self.height
            )));
        }
        if self.shadow_connection_radius == 0 {
            return Err(ConfigError::Invalid(
                "shadow_connection_radius must be at least 1".to_string(),
            ));
        }
        let extent = self.width.max(self.height);
        if self.shadow_connection_radius > extent {
            return Err(ConfigError::Invalid(format!(
                "shadow_connection_radius {} exceeds the {}x{} world",
                self.shadow_connection_radius, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded world config from {}: {}x{}, {:?} propagation",
            path.display(),
            config.width,
            config.height,
            config.propagation
        );
        Ok(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
