//! Error types for setup-time operations.
//!
//! Per-frame calls never fail; these errors only come out of configuration,
//! device acquisition and registry mutations.

use thiserror::Error;

/// Invalid configuration values, rejected before any engine is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value fell outside its documented range
    #[error("{field} out of range: {reason}")]
    OutOfRange {
        /// Name of the offending field
        field: &'static str,
        /// What was expected
        reason: String,
    },

    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(String),

    /// Config file could not be parsed
    #[error("failed to parse config file: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn out_of_range(field: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field,
            reason: reason.into(),
        }
    }
}

/// Audio device acquisition failures.
///
/// These are expected states (no microphone, permission denied); callers
/// fall back to silent analysis instead of aborting.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// No default input device present
    #[error("no audio input device found")]
    NoDevice,

    /// Device reported a config we cannot use
    #[error("unsupported input config: {0}")]
    UnsupportedConfig(String),

    /// Stream could not be built
    #[error("failed to build input stream: {0}")]
    BuildStream(String),

    /// Stream could not be started
    #[error("failed to start input stream: {0}")]
    PlayStream(String),

    /// Device config rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Body registry errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be finite and strictly positive
    #[error("body '{id}' has invalid mass {mass}")]
    InvalidMass {
        /// Body id
        id: String,
        /// Rejected mass
        mass: f32,
    },

    /// Radius must be finite and non-negative
    #[error("body '{id}' has invalid radius {radius}")]
    InvalidRadius {
        /// Body id
        id: String,
        /// Rejected radius
        radius: f32,
    },

    /// Id already registered
    #[error("body '{0}' already exists")]
    DuplicateBody(String),

    /// Id not registered
    #[error("body '{0}' not found")]
    UnknownBody(String),

    /// Body sits on its orbit center
    #[error("body '{body}' coincides with center '{center}'")]
    DegenerateOrbit {
        /// Orbiting body
        body: String,
        /// Center body
        center: String,
    },
}

/// Spatial audio registry errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    /// Source id already registered
    #[error("audio source '{0}' already exists")]
    DuplicateSource(String),

    /// Source id not registered
    #[error("audio source '{0}' not found")]
    UnknownSource(String),

    /// Zone id already registered
    #[error("audio zone '{0}' already exists")]
    DuplicateZone(String),

    /// Zone radius must be finite and positive
    #[error("audio zone '{id}' has invalid radius {radius}")]
    InvalidZoneRadius {
        /// Zone id
        id: String,
        /// Rejected radius
        radius: f32,
    },

    /// Binaural tones need a positive carrier and a beat below it
    #[error("invalid binaural frequencies: base {base_hz} Hz, beat {beat_hz} Hz")]
    InvalidBinaural {
        /// Carrier frequency
        base_hz: f32,
        /// Beat offset
        beat_hz: f32,
    },
}

/// Errors from wiring engines together in the frame pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}
