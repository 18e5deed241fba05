//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (seconds, Hz, world units, etc.)
//! - Documented ranges and meanings
//! - A `validate()` per struct, checked when an engine is constructed

mod analysis;
mod device;
mod particles;
mod physics;
mod spatial;

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

// Re-export all types
pub use analysis::AnalysisConfig;
pub use device::DeviceConfig;
pub use particles::ParticleConfig;
pub use physics::PhysicsConfig;
pub use spatial::{DopplerConvention, SpatialConfig, SPEED_OF_SOUND};

/// Complete configuration for one pipeline, loadable from TOML.
///
/// Every section and field is optional in the file; missing values take
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub analysis: AnalysisConfig,
    pub particles: ParticleConfig,
    pub physics: PhysicsConfig,
    pub spatial: SpatialConfig,
    pub device: DeviceConfig,
}

impl SimulationConfig {
    /// Parse from TOML text and validate
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        self.particles.validate()?;
        self.physics.validate()?;
        self.spatial.validate()?;
        self.device.validate()
    }
}
