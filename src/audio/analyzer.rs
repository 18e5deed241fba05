//! Audio feature extractor: raw analyser data in, [`AnalysisSnapshot`] out.

use tracing::{debug, trace};

use super::beat::{BeatDetector, BeatSettings};
use super::smoothing::MovingAverage;
use super::snapshot::{AnalysisSnapshot, AudioFrame};
use super::spectral;
use crate::error::ConfigError;
use crate::params::AnalysisConfig;

/// Stateful per-frame feature extractor.
///
/// Owns the smoothing windows, the beat detector and the previous spectrum
/// used for flux. The latest snapshot is kept inside the extractor and
/// rewritten in place on every call, so steady-state extraction does not
/// allocate.
pub struct FeatureExtractor {
    config: AnalysisConfig,
    bass: MovingAverage,
    mid: MovingAverage,
    treble: MovingAverage,
    volume: MovingAverage,
    beat: BeatDetector,
    previous_spectrum: Vec<f32>,
    has_previous: bool,
    snapshot: AnalysisSnapshot,
}

impl FeatureExtractor {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "FeatureExtractor created: beat threshold {}x, cooldown {}ms",
            config.beat_threshold, config.beat_cooldown_ms
        );

        Ok(Self {
            bass: MovingAverage::new(config.band_smoothing_window),
            mid: MovingAverage::new(config.band_smoothing_window),
            treble: MovingAverage::new(config.band_smoothing_window),
            volume: MovingAverage::new(config.volume_smoothing_window),
            beat: BeatDetector::new(BeatSettings::from(&config), config.bass_history_len),
            previous_spectrum: Vec::new(),
            has_previous: false,
            snapshot: AnalysisSnapshot::default(),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one frame taken at `now_ms`.
    ///
    /// `None` means the audio stream is unavailable; the result is then the
    /// all-zero snapshot and no internal state advances.
    pub fn extract(&mut self, frame: Option<&AudioFrame>, now_ms: f64) -> &AnalysisSnapshot {
        let Some(frame) = frame else {
            self.snapshot.clone_from(&AnalysisSnapshot::silent(now_ms));
            return &self.snapshot;
        };

        let snapshot = &mut self.snapshot;
        snapshot.timestamp_ms = now_ms;

        // Normalize magnitudes into the reused spectrum buffer
        let ceiling = self.config.magnitude_ceiling;
        snapshot.spectrum.clear();
        snapshot.spectrum.extend(
            frame
                .frequency
                .iter()
                .map(|m| if m.is_finite() { (m / ceiling).clamp(0.0, 1.0) } else { 0.0 }),
        );
        let spectrum = &snapshot.spectrum;

        // Bands
        let nyquist = frame.nyquist_hz();
        let raw_bass = spectral::band_energy(spectrum, self.config.bass_range_hz, nyquist);
        let raw_mid = spectral::band_energy(spectrum, self.config.mid_range_hz, nyquist);
        let raw_treble = spectral::band_energy(spectrum, self.config.treble_range_hz, nyquist);
        let raw_volume = spectral::mean(spectrum);

        snapshot.bass = self.bass.push(raw_bass);
        snapshot.mid = self.mid.push(raw_mid);
        snapshot.treble = self.treble.push(raw_treble);
        snapshot.volume = raw_volume;
        snapshot.volume_smooth = self.volume.push(raw_volume);

        // Beat and tempo on the unsmoothed bass so transients survive
        let beat = self.beat.process(raw_bass, raw_volume, now_ms);
        snapshot.beat = beat.beat;
        snapshot.beat_strength = beat.strength;
        snapshot.tempo = self.beat.tempo();

        // Spectral descriptors
        snapshot.spectral_centroid = spectral::spectral_centroid(spectrum);
        snapshot.spectral_flux = if self.has_previous {
            spectral::spectral_flux(spectrum, &self.previous_spectrum)
        } else {
            0.0
        };
        snapshot.energy = spectral::rms(spectrum);

        self.previous_spectrum.clear();
        self.previous_spectrum.extend_from_slice(spectrum);
        self.has_previous = true;

        // Time-domain descriptors
        let samples = &frame.time_domain;
        snapshot.zero_crossing_rate = spectral::zero_crossing_rate(samples);
        snapshot.rms = spectral::rms(samples);

        trace!(
            "extract t={:.1} bass={:.3} mid={:.3} treble={:.3} beat={} tempo={}",
            now_ms,
            snapshot.bass,
            snapshot.mid,
            snapshot.treble,
            snapshot.beat,
            snapshot.tempo
        );

        &self.snapshot
    }

    /// Snapshot produced by the last `extract` call
    pub fn latest(&self) -> &AnalysisSnapshot {
        &self.snapshot
    }

    /// Clear smoothing, beat history and the previous spectrum
    pub fn reset(&mut self) {
        self.bass.clear();
        self.mid.clear();
        self.treble.clear();
        self.volume.clear();
        self.beat.reset();
        self.previous_spectrum.clear();
        self.has_previous = false;
        self.snapshot = AnalysisSnapshot::default();
        debug!("FeatureExtractor reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BINS: usize = 1024;
    const RATE: f32 = 44100.0;

    /// Frame with `level` (0-255) in bins below `cutoff_hz` and silence above
    fn low_frame(level: f32, cutoff_hz: f32) -> AudioFrame {
        shaped_frame(level, cutoff_hz, 0.0)
    }

    /// Frame with `level` below `cutoff_hz` and `rest` everywhere else
    fn shaped_frame(level: f32, cutoff_hz: f32, rest: f32) -> AudioFrame {
        let cutoff_bin = (cutoff_hz / (RATE / 2.0) * BINS as f32) as usize;
        let frequency = (0..BINS)
            .map(|i| if i < cutoff_bin { level } else { rest })
            .collect();
        let time_domain = (0..2048).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        AudioFrame::new(frequency, time_domain, RATE)
    }

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_unavailable_stream_gives_silent_snapshot() {
        let mut extractor = extractor();
        let snapshot = extractor.extract(None, 1234.0);
        assert_eq!(*snapshot, AnalysisSnapshot::silent(1234.0));
        assert!(!snapshot.beat);
        assert_eq!(snapshot.tempo, 0);
    }

    #[test]
    fn test_bands_and_descriptors_in_range() {
        let mut extractor = extractor();
        let snapshot = extractor.extract(Some(&low_frame(255.0, 250.0)), 0.0);

        assert!((snapshot.bass - 1.0).abs() < 1e-6);
        assert_eq!(snapshot.mid, 0.0);
        assert_eq!(snapshot.treble, 0.0);
        assert_eq!(snapshot.spectrum.len(), BINS);
        for value in [
            snapshot.volume,
            snapshot.energy,
            snapshot.rms,
            snapshot.zero_crossing_rate,
            snapshot.spectral_centroid,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
        assert_eq!(snapshot.zero_crossing_rate, 1.0);
        assert!((snapshot.rms - 0.5).abs() < 1e-6);
        // First frame has no flux history
        assert_eq!(snapshot.spectral_flux, 0.0);
    }

    #[test]
    fn test_band_smoothing_suppresses_single_frame() {
        let mut extractor = extractor();
        for i in 0..5 {
            extractor.extract(Some(&low_frame(0.0, 250.0)), i as f64 * 16.0);
        }
        let snapshot = extractor.extract(Some(&low_frame(255.0, 250.0)), 80.0);
        // One loud frame in a five-frame window
        assert!((snapshot.bass - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_flux_after_change() {
        let mut extractor = extractor();
        extractor.extract(Some(&low_frame(0.0, 250.0)), 0.0);
        let snapshot = extractor.extract(Some(&low_frame(255.0, 22050.0)), 16.0);
        assert!((snapshot.spectral_flux - 1.0).abs() < 1e-6);

        // Bin count change resets flux to zero
        let mut smaller = low_frame(255.0, 22050.0);
        smaller.frequency.truncate(512);
        let snapshot = extractor.extract(Some(&smaller), 32.0);
        assert_eq!(snapshot.spectral_flux, 0.0);
    }

    #[test]
    fn test_kick_pattern_yields_tempo() {
        let mut extractor = extractor();
        // Broadband floor keeps volume above the noise gate
        let quiet = shaped_frame(60.0, 250.0, 40.0);
        let kick = shaped_frame(255.0, 250.0, 40.0);
        let frame_ms = 1000.0 / 60.0;

        // 120 BPM: a kick every 30 frames (500ms)
        let mut beats = 0;
        for i in 0..300 {
            let frame = if i % 30 == 0 { &kick } else { &quiet };
            if extractor.extract(Some(frame), i as f64 * frame_ms).beat {
                beats += 1;
            }
        }

        assert!(beats >= 5, "only {} beats detected", beats);
        assert_eq!(extractor.latest().tempo, 120);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut extractor = extractor();
        extractor.extract(Some(&low_frame(255.0, 250.0)), 0.0);
        extractor.reset();

        let snapshot = extractor.extract(Some(&low_frame(0.0, 250.0)), 16.0);
        assert_eq!(snapshot.bass, 0.0);
        assert_eq!(snapshot.spectral_flux, 0.0);
    }
}
