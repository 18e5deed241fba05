//! Audio feature extraction parameters.

use serde::Deserialize;

use crate::error::ConfigError;

/// Feature extractor configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bass band range (Hz, half-open)
    pub bass_range_hz: (f32, f32),

    /// Mid band range (Hz, half-open)
    pub mid_range_hz: (f32, f32),

    /// Treble band range (Hz, half-open)
    pub treble_range_hz: (f32, f32),

    /// Moving-average window for bass/mid/treble (frames)
    pub band_smoothing_window: usize,

    /// Moving-average window for overall volume (frames)
    pub volume_smoothing_window: usize,

    /// Frames of bass history behind the beat detector's trailing average
    pub bass_history_len: usize,

    /// Beat fires when bass exceeds the trailing average by this ratio
    pub beat_threshold: f32,

    /// Minimum time between two beats (milliseconds)
    pub beat_cooldown_ms: f64,

    /// Volume below which no beat can fire (0-1)
    pub beat_noise_floor: f32,

    /// Inter-beat intervals kept for tempo estimation
    pub beat_interval_history: usize,

    /// Intervals required before a tempo is reported
    pub min_tempo_intervals: usize,

    /// Plausible tempo window (BPM, inclusive)
    pub tempo_range_bpm: (f32, f32),

    /// Magnitude value that maps to 1.0 after normalization
    /// (255 for byte-scale analyser data)
    pub magnitude_ceiling: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bass_range_hz: (0.0, 250.0),
            mid_range_hz: (250.0, 4000.0),
            treble_range_hz: (4000.0, 20000.0),
            band_smoothing_window: 5,
            volume_smoothing_window: 10,
            bass_history_len: 43, // ~0.7s at 60 fps
            beat_threshold: 1.3,
            beat_cooldown_ms: 200.0,
            beat_noise_floor: 0.1,
            beat_interval_history: 8,
            min_tempo_intervals: 4,
            tempo_range_bpm: (40.0, 240.0),
            magnitude_ceiling: 255.0,
        }
    }
}

impl AnalysisConfig {
    /// Validate ranges and window sizes
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, (lo, hi)) in [
            ("bass_range_hz", self.bass_range_hz),
            ("mid_range_hz", self.mid_range_hz),
            ("treble_range_hz", self.treble_range_hz),
        ] {
            if !(lo >= 0.0 && hi > lo) {
                return Err(ConfigError::out_of_range(
                    field,
                    format!("expected 0 <= lo < hi, got ({lo}, {hi})"),
                ));
            }
        }
        if self.band_smoothing_window == 0 || self.volume_smoothing_window == 0 {
            return Err(ConfigError::out_of_range(
                "smoothing_window",
                "windows must hold at least one frame",
            ));
        }
        if self.bass_history_len == 0 {
            return Err(ConfigError::out_of_range("bass_history_len", "must be > 0"));
        }
        if !(self.beat_threshold > 1.0) {
            return Err(ConfigError::out_of_range(
                "beat_threshold",
                format!("must be > 1.0, got {}", self.beat_threshold),
            ));
        }
        if !(self.beat_cooldown_ms >= 0.0) {
            return Err(ConfigError::out_of_range("beat_cooldown_ms", "must be >= 0"));
        }
        if self.min_tempo_intervals == 0 || self.beat_interval_history < self.min_tempo_intervals
        {
            return Err(ConfigError::out_of_range(
                "beat_interval_history",
                "must hold at least min_tempo_intervals (> 0) entries",
            ));
        }
        let (min_bpm, max_bpm) = self.tempo_range_bpm;
        if !(min_bpm > 0.0 && max_bpm >= min_bpm) {
            return Err(ConfigError::out_of_range(
                "tempo_range_bpm",
                format!("expected 0 < min <= max, got ({min_bpm}, {max_bpm})"),
            ));
        }
        if !(self.magnitude_ceiling > 0.0) {
            return Err(ConfigError::out_of_range("magnitude_ceiling", "must be > 0"));
        }
        Ok(())
    }
}
