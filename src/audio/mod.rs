//! Audio feature extraction.
//!
//! Raw analyser data (frequency magnitudes + time-domain samples) goes in,
//! one [`AnalysisSnapshot`] per frame comes out. Live capture from the
//! default input device sits behind the `device` feature.

mod analyzer;
mod beat;
#[cfg(feature = "device")]
mod device;
mod smoothing;
pub mod spectral;
mod snapshot;
mod spectrum;

// Re-export public types
pub use analyzer::FeatureExtractor;
pub use beat::{BeatDetector, BeatResult, BeatSettings};
#[cfg(feature = "device")]
pub use device::AudioCapture;
pub use smoothing::MovingAverage;
pub use snapshot::{AnalysisSnapshot, AudioFrame, DEFAULT_SAMPLE_RATE_HZ};
pub use spectrum::{hann_window, SpectrumAnalyzer, MAGNITUDE_SCALE};
