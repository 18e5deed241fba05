//! Per-frame audio input and analysis records.

/// Default sample rate assumed when the host reports none (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: f32 = 44100.0;

/// One frame of raw analyser data handed to the extractor.
///
/// `frequency` holds per-bin magnitudes on the extractor's magnitude scale
/// (byte scale, 0-255, by default); bins are evenly spaced from 0 Hz to
/// Nyquist. `time_domain` holds samples in [-1, 1].
#[derive(Debug, Clone, Default)]
pub struct AudioFrame {
    pub frequency: Vec<f32>,
    pub time_domain: Vec<f32>,
    pub sample_rate_hz: f32,
}

impl AudioFrame {
    pub fn new(frequency: Vec<f32>, time_domain: Vec<f32>, sample_rate_hz: f32) -> Self {
        Self {
            frequency,
            time_domain,
            sample_rate_hz,
        }
    }

    /// Nyquist frequency, falling back to the default rate for unset frames
    pub fn nyquist_hz(&self) -> f32 {
        let rate = if self.sample_rate_hz > 0.0 {
            self.sample_rate_hz
        } else {
            DEFAULT_SAMPLE_RATE_HZ
        };
        rate / 2.0
    }
}

/// Structured analysis of one audio frame.
///
/// Every scalar except `tempo` and `timestamp_ms` is normalized to [0, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisSnapshot {
    /// Smoothed bass band energy (0-250 Hz by default)
    pub bass: f32,
    /// Smoothed mid band energy (250-4000 Hz by default)
    pub mid: f32,
    /// Smoothed treble band energy (4000-20000 Hz by default)
    pub treble: f32,
    /// Beat detected this frame
    pub beat: bool,
    /// How far the bass spike exceeded its trailing average, capped at 1
    pub beat_strength: f32,
    /// Estimated tempo in BPM, 0 when unknown
    pub tempo: u32,
    /// Mean normalized magnitude over all bins
    pub volume: f32,
    /// Moving average of `volume`
    pub volume_smooth: f32,
    /// Normalized per-bin magnitudes
    pub spectrum: Vec<f32>,
    /// Magnitude-weighted mean bin index over bin count (brightness)
    pub spectral_centroid: f32,
    /// RMS of the per-bin change since the previous frame
    pub spectral_flux: f32,
    /// RMS of normalized magnitudes
    pub energy: f32,
    /// Sign changes per sample in the time-domain signal
    pub zero_crossing_rate: f32,
    /// RMS of the time-domain signal
    pub rms: f32,
    /// Caller clock at extraction (milliseconds)
    pub timestamp_ms: f64,
}

impl AnalysisSnapshot {
    /// The all-zero snapshot reported while no audio stream is available
    pub fn silent(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            ..Self::default()
        }
    }

    /// Mean of the mid and treble bands, used for high-frequency sparkle
    pub fn high_mid(&self) -> f32 {
        0.5 * (self.mid + self.treble)
    }
}
