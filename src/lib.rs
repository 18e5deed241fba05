//! Astrosonic library - audio-reactive cosmic simulation core
//!
//! Per-frame audio features drive a particle population, an N-body
//! gravity simulation and a positional audio mixer.

pub mod audio;
pub mod cli;
pub mod error;
pub mod logging;
pub mod mood;
pub mod params;
pub mod particles;
pub mod physics;
pub mod pipeline;
pub mod spatial;

pub use error::{ConfigError, DeviceError, PhysicsError, PipelineError, SpatialError};
pub use pipeline::CosmicPipeline;
