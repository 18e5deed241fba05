//! Energy-spike beat detection and tempo estimation.

use std::collections::VecDeque;

use tracing::trace;

use super::smoothing::MovingAverage;
use crate::params::AnalysisConfig;

/// Outcome of one beat detector step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BeatResult {
    pub beat: bool,
    pub strength: f32,
}

/// Beat detector tuning, lifted out of [`AnalysisConfig`]
#[derive(Debug, Clone)]
pub struct BeatSettings {
    pub threshold: f32,
    pub cooldown_ms: f64,
    pub noise_floor: f32,
    pub interval_history: usize,
    pub min_intervals: usize,
    pub tempo_range_bpm: (f32, f32),
}

impl From<&AnalysisConfig> for BeatSettings {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            threshold: config.beat_threshold,
            cooldown_ms: config.beat_cooldown_ms,
            noise_floor: config.beat_noise_floor,
            interval_history: config.beat_interval_history,
            min_intervals: config.min_tempo_intervals,
            tempo_range_bpm: config.tempo_range_bpm,
        }
    }
}

/// Detects bass spikes against a trailing average and tracks inter-beat
/// intervals for tempo.
#[derive(Debug, Clone)]
pub struct BeatDetector {
    settings: BeatSettings,
    bass_history: MovingAverage,
    intervals_ms: VecDeque<f64>,
    last_beat_ms: Option<f64>,
}

impl BeatDetector {
    pub fn new(settings: BeatSettings, bass_history_len: usize) -> Self {
        let capacity = settings.interval_history;
        Self {
            settings,
            bass_history: MovingAverage::new(bass_history_len),
            intervals_ms: VecDeque::with_capacity(capacity),
            last_beat_ms: None,
        }
    }

    /// Feed the current bass energy and volume at time `now_ms`.
    ///
    /// The trailing average is taken before the current value joins it.
    pub fn process(&mut self, bass: f32, volume: f32, now_ms: f64) -> BeatResult {
        let avg_bass = if self.bass_history.is_empty() {
            bass
        } else {
            self.bass_history.average()
        };
        self.bass_history.push(bass);

        let result = self.evaluate(bass, avg_bass, volume, now_ms);
        if result.beat {
            self.record_beat(now_ms);
        }
        result
    }

    /// Pure beat condition against an explicit average
    pub fn evaluate(&self, bass: f32, avg_bass: f32, volume: f32, now_ms: f64) -> BeatResult {
        let cooled_down = match self.last_beat_ms {
            Some(last) => now_ms - last >= self.settings.cooldown_ms,
            None => true,
        };

        let is_beat = avg_bass > 0.0
            && bass > avg_bass * self.settings.threshold
            && cooled_down
            && volume > self.settings.noise_floor;

        if !is_beat {
            return BeatResult::default();
        }

        BeatResult {
            beat: true,
            strength: (bass / avg_bass - 1.0).clamp(0.0, 1.0),
        }
    }

    fn record_beat(&mut self, now_ms: f64) {
        if let Some(last) = self.last_beat_ms {
            if self.intervals_ms.len() == self.settings.interval_history {
                self.intervals_ms.pop_front();
            }
            self.intervals_ms.push_back(now_ms - last);
        }
        self.last_beat_ms = Some(now_ms);
        trace!(
            "beat at {:.1}ms, {} intervals",
            now_ms,
            self.intervals_ms.len()
        );
    }

    /// Tempo from the mean inter-beat interval; 0 when unknown or implausible
    pub fn tempo(&self) -> u32 {
        if self.intervals_ms.len() < self.settings.min_intervals {
            return 0;
        }
        let mean = self.intervals_ms.iter().sum::<f64>() / self.intervals_ms.len() as f64;
        if mean <= 0.0 {
            return 0;
        }
        let bpm = (60_000.0 / mean) as f32;
        let (min_bpm, max_bpm) = self.settings.tempo_range_bpm;
        if bpm < min_bpm || bpm > max_bpm {
            return 0;
        }
        bpm.round() as u32
    }

    /// Recorded inter-beat intervals (ms, oldest first)
    pub fn intervals(&self) -> impl Iterator<Item = f64> + '_ {
        self.intervals_ms.iter().copied()
    }

    pub fn reset(&mut self) {
        self.bass_history.clear();
        self.intervals_ms.clear();
        self.last_beat_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> BeatDetector {
        let config = AnalysisConfig::default();
        BeatDetector::new(BeatSettings::from(&config), config.bass_history_len)
    }

    #[test]
    fn test_beat_condition_example() {
        let mut detector = detector();
        // Previous beat at 0ms, now 500ms later
        detector.record_beat(0.0);

        let result = detector.evaluate(0.3, 0.2, 0.4, 500.0);
        assert!(result.beat);
        assert!((result.strength - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_beat_requires_all_conditions() {
        let mut detector = detector();
        detector.record_beat(0.0);

        // Ratio 1.25 < 1.3
        assert!(!detector.evaluate(0.25, 0.2, 0.4, 500.0).beat);
        // Inside cooldown
        assert!(!detector.evaluate(0.3, 0.2, 0.4, 150.0).beat);
        // Below noise floor
        assert!(!detector.evaluate(0.3, 0.2, 0.05, 500.0).beat);
        // Silent history
        assert!(!detector.evaluate(0.3, 0.0, 0.4, 500.0).beat);
    }

    #[test]
    fn test_strength_capped_at_one() {
        let detector = detector();
        let result = detector.evaluate(0.9, 0.1, 0.5, 1000.0);
        assert!(result.beat);
        assert_eq!(result.strength, 1.0);
    }

    #[test]
    fn test_process_detects_spike() {
        let mut detector = detector();
        for i in 0..20 {
            let r = detector.process(0.2, 0.3, i as f64 * 16.0);
            assert!(!r.beat);
        }
        let r = detector.process(0.6, 0.3, 400.0);
        assert!(r.beat);
        assert_eq!(r.strength, 1.0);
    }

    #[test]
    fn test_tempo_needs_four_intervals() {
        let mut detector = detector();
        for i in 0..4 {
            detector.record_beat(i as f64 * 500.0);
        }
        // 4 beats = 3 intervals
        assert_eq!(detector.tempo(), 0);

        detector.record_beat(2000.0);
        assert_eq!(detector.tempo(), 120);
    }

    #[test]
    fn test_tempo_out_of_range_is_zero() {
        let mut fast = detector();
        // 250ms intervals = 240 BPM (inclusive edge)
        for i in 0..5 {
            fast.record_beat(i as f64 * 250.0);
        }
        assert_eq!(fast.tempo(), 240);

        let mut slow = detector();
        // 2000ms intervals = 30 BPM
        for i in 0..5 {
            slow.record_beat(i as f64 * 2000.0);
        }
        assert_eq!(slow.tempo(), 0);
    }

    #[test]
    fn test_interval_history_bounded() {
        let mut detector = detector();
        for i in 0..20 {
            detector.record_beat(i as f64 * 500.0);
        }
        assert_eq!(detector.intervals().count(), 8);
    }
}
