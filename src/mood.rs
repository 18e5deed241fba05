//! Mood prediction from audio features.
//!
//! A [`MoodPredictor`] turns one analysis snapshot into an [`Emotion`] the
//! pipeline hands to the particle engine. [`HeuristicMood`] is a plain
//! arousal/brightness mapping; learned models plug in behind the same trait.

use crate::audio::AnalysisSnapshot;
use crate::particles::Emotion;

/// Maps per-frame features to an emotion.
///
/// `None` means "no opinion": the current emotion is kept.
pub trait MoodPredictor: Send {
    fn predict(&mut self, features: &AnalysisSnapshot) -> Option<Emotion>;
}

/// Arousal/brightness quadrant mapping.
///
/// Arousal mixes smoothed volume, spectral energy and tempo; brightness is
/// the spectral centroid.
#[derive(Debug, Clone)]
pub struct HeuristicMood {
    /// Smoothed volume (0-1) below which no prediction is made
    pub silence_floor: f32,

    /// Arousal (0-1) at or above which the mood is energetic
    pub high_arousal: f32,

    /// Arousal (0-1) at or below which the mood is subdued
    pub low_arousal: f32,

    /// Spectral centroid (0-1) at or above which the sound counts as bright
    pub bright_centroid: f32,

    /// Spectral flux (0-1) that, on a beat, reads as a surprise
    pub surprise_flux: f32,

    /// Zero-crossing rate (0-1) above which a mid-arousal dark sound is tense
    pub tense_zero_crossing: f32,
}

impl Default for HeuristicMood {
    fn default() -> Self {
        Self {
            silence_floor: 0.02,
            high_arousal: 0.55,
            low_arousal: 0.25,
            bright_centroid: 0.2,
            surprise_flux: 0.35,
            tense_zero_crossing: 0.3,
        }
    }
}

impl HeuristicMood {
    /// Combined loudness and pace (0-1); an unknown tempo counts as moderate
    pub fn arousal(features: &AnalysisSnapshot) -> f32 {
        let pace = if features.tempo == 0 {
            0.5
        } else {
            ((features.tempo as f32 - 60.0) / 120.0).clamp(0.0, 1.0)
        };
        (0.5 * features.volume_smooth + 0.2 * features.energy + 0.3 * pace).clamp(0.0, 1.0)
    }
}

impl MoodPredictor for HeuristicMood {
    fn predict(&mut self, features: &AnalysisSnapshot) -> Option<Emotion> {
        if features.volume_smooth < self.silence_floor {
            return None;
        }
        if features.beat && features.spectral_flux >= self.surprise_flux {
            return Some(Emotion::Surprise);
        }

        let arousal = Self::arousal(features);
        let bright = features.spectral_centroid >= self.bright_centroid;

        let emotion = if arousal >= self.high_arousal {
            if bright {
                Emotion::Joy
            } else {
                Emotion::Anger
            }
        } else if arousal <= self.low_arousal {
            if bright {
                Emotion::Calm
            } else {
                Emotion::Sadness
            }
        } else if bright {
            Emotion::Love
        } else if features.zero_crossing_rate > self.tense_zero_crossing {
            Emotion::Fear
        } else {
            Emotion::Neutral
        };
        Some(emotion)
    }
}
