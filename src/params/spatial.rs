//! Positional audio parameters.

use serde::Deserialize;

use crate::error::ConfigError;

/// Speed of sound in world units per second
pub const SPEED_OF_SOUND: f32 = 343.0;

/// Sign convention of the Doppler ratio.
///
/// Velocities are projected on the unit axis `u` from source to listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DopplerConvention {
    /// `(c + v_listener·u) / (c + v_source·u)`
    #[default]
    AxisSigned,
    /// `(c − v_listener·u) / (c − v_source·u)`: an approaching source
    /// raises the pitch
    Physical,
}

impl DopplerConvention {
    /// Multiplier applied to both projected velocities
    pub fn sign(self) -> f32 {
        match self {
            DopplerConvention::AxisSigned => 1.0,
            DopplerConvention::Physical => -1.0,
        }
    }
}

/// Spatial audio engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Inverse-distance rolloff factor
    /// Formula: gain = 1 / (1 + rolloff * distance)
    pub rolloff: f32,

    /// Distance at and beyond which a source is silent (world units)
    pub max_distance: f32,

    /// Speed of sound (world units/s)
    pub speed_of_sound: f32,

    /// Doppler intensity (0 = off, 1 = physical)
    pub doppler_intensity: f32,

    /// Sign convention of the Doppler ratio
    pub doppler_convention: DopplerConvention,

    /// Output level of the binaural tone pair (0-1)
    pub binaural_gain: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            rolloff: 0.05,
            max_distance: 200.0,
            speed_of_sound: SPEED_OF_SOUND,
            doppler_intensity: 1.0,
            doppler_convention: DopplerConvention::default(),
            binaural_gain: 0.2,
        }
    }
}

impl SpatialConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rolloff >= 0.0) {
            return Err(ConfigError::out_of_range("rolloff", "must be >= 0"));
        }
        if !(self.max_distance > 0.0) {
            return Err(ConfigError::out_of_range("max_distance", "must be > 0"));
        }
        if !(self.speed_of_sound > 0.0) {
            return Err(ConfigError::out_of_range("speed_of_sound", "must be > 0"));
        }
        if !(self.doppler_intensity >= 0.0) {
            return Err(ConfigError::out_of_range("doppler_intensity", "must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.binaural_gain) {
            return Err(ConfigError::out_of_range("binaural_gain", "must be within [0, 1]"));
        }
        Ok(())
    }
}
