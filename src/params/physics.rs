//! N-body integrator parameters.

use serde::Deserialize;

use crate::error::ConfigError;

/// Physics integrator configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational constant, scaled for visualization (not 6.674e-11)
    pub gravitational_constant: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 0.1,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gravitational_constant.is_finite() && self.gravitational_constant >= 0.0) {
            return Err(ConfigError::out_of_range(
                "gravitational_constant",
                "must be finite and >= 0",
            ));
        }
        Ok(())
    }
}
