//! Emotion labels and their target particle colors.

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use thiserror::Error;

/// Emotional state steering the particle palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emotion {
    Joy,
    Sadness,
    Fear,
    Calm,
    Anger,
    Love,
    Surprise,
    #[default]
    Neutral,
}

/// Label that names no known emotion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown emotion '{0}'")]
pub struct UnknownEmotion(pub String);

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Fear,
        Emotion::Calm,
        Emotion::Anger,
        Emotion::Love,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    /// Target RGB color (0-1 per channel)
    pub fn color(self) -> Vec3 {
        match self {
            Emotion::Joy => Vec3::new(1.0, 0.84, 0.0),       // gold
            Emotion::Sadness => Vec3::new(0.25, 0.41, 0.88), // royal blue
            Emotion::Fear => Vec3::new(0.5, 0.0, 0.5),       // purple
            Emotion::Calm => Vec3::new(0.53, 0.81, 0.92),    // sky blue
            Emotion::Anger => Vec3::new(0.86, 0.08, 0.24),   // crimson
            Emotion::Love => Vec3::new(1.0, 0.41, 0.71),     // pink
            Emotion::Surprise => Vec3::new(1.0, 0.55, 0.0),  // orange
            Emotion::Neutral => Vec3::new(0.9, 0.9, 0.95),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Fear => "fear",
            Emotion::Calm => "calm",
            Emotion::Anger => "anger",
            Emotion::Love => "love",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "joy" | "happy" | "happiness" => Ok(Emotion::Joy),
            "sadness" | "sad" => Ok(Emotion::Sadness),
            "fear" | "anxious" | "anxiety" => Ok(Emotion::Fear),
            "calm" | "peaceful" | "relaxed" => Ok(Emotion::Calm),
            "anger" | "angry" => Ok(Emotion::Anger),
            "love" => Ok(Emotion::Love),
            "surprise" | "surprised" => Ok(Emotion::Surprise),
            "neutral" => Ok(Emotion::Neutral),
            other => Err(UnknownEmotion(other.to_string())),
        }
    }
}
