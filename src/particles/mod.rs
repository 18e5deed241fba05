//! Audio-reactive particle population.

mod emotion;
mod system;

// Re-export public types
pub use emotion::{Emotion, UnknownEmotion};
pub use system::{Particle, ParticleSystem, ParticleVertex};
