//! 3D positional audio.
//!
//! Per-source gain (inverse distance), Doppler factor, stereo pan and
//! reverb-zone send, plus a binaural beat generator.

mod binaural;
mod source;
mod system;

// Re-export public types
pub use binaural::{BinauralBeat, BrainwaveBand};
pub use source::{
    distance_gain, doppler_factor, select_reverb_zone, stereo_pan, AudioSource, AudioZone,
    Listener, ReverbProfile, ReverbSend, SourceOutput, MIN_DISTANCE,
};
pub use system::SpatialAudioSystem;
pub use crate::params::DopplerConvention;
