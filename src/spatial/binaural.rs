//! Binaural beat generator for meditation soundscapes.
//!
//! Two sine tones a few hertz apart, one per ear; the listener perceives a
//! beating at the difference frequency. Independent of 3D positioning.

use std::f32::consts::TAU;

use crate::error::SpatialError;

/// Brainwave bands commonly targeted by entrainment, with a typical beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrainwaveBand {
    /// Deep sleep
    Delta,
    /// Meditation, drowsiness
    Theta,
    /// Relaxed wakefulness
    Alpha,
    /// Active focus
    Beta,
    Gamma,
}

impl BrainwaveBand {
    /// Representative beat frequency (Hz)
    pub fn beat_hz(self) -> f32 {
        match self {
            BrainwaveBand::Delta => 2.0,
            BrainwaveBand::Theta => 6.0,
            BrainwaveBand::Alpha => 10.0,
            BrainwaveBand::Beta => 20.0,
            BrainwaveBand::Gamma => 40.0,
        }
    }
}

/// A running left/right tone pair
#[derive(Debug, Clone, PartialEq)]
pub struct BinauralBeat {
    base_hz: f32,
    beat_hz: f32,
    gain: f32,
    phase_left: f32,
    phase_right: f32,
}

impl BinauralBeat {
    /// Carrier `base_hz` in the left ear, `base_hz + beat_hz` in the right.
    ///
    /// Requires `0 < beat_hz < base_hz`.
    pub fn new(base_hz: f32, beat_hz: f32, gain: f32) -> Result<Self, SpatialError> {
        if !(base_hz.is_finite() && beat_hz.is_finite() && beat_hz > 0.0 && beat_hz < base_hz) {
            return Err(SpatialError::InvalidBinaural { base_hz, beat_hz });
        }
        Ok(Self {
            base_hz,
            beat_hz,
            gain: gain.clamp(0.0, 1.0),
            phase_left: 0.0,
            phase_right: 0.0,
        })
    }

    pub fn left_hz(&self) -> f32 {
        self.base_hz
    }

    pub fn right_hz(&self) -> f32 {
        self.base_hz + self.beat_hz
    }

    pub fn beat_hz(&self) -> f32 {
        self.beat_hz
    }

    /// Fill an interleaved stereo buffer (L, R, L, R, ...).
    ///
    /// Phase carries over between calls so consecutive buffers join
    /// without clicks. A trailing odd sample is left untouched.
    pub fn render(&mut self, out: &mut [f32], sample_rate_hz: f32) {
        if !(sample_rate_hz > 0.0) {
            out.fill(0.0);
            return;
        }
        let step_left = TAU * self.left_hz() / sample_rate_hz;
        let step_right = TAU * self.right_hz() / sample_rate_hz;

        for frame in out.chunks_exact_mut(2) {
            frame[0] = self.phase_left.sin() * self.gain;
            frame[1] = self.phase_right.sin() * self.gain;
            self.phase_left = (self.phase_left + step_left) % TAU;
            self.phase_right = (self.phase_right + step_right) % TAU;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequencies() {
        let beat = BinauralBeat::new(200.0, BrainwaveBand::Alpha.beat_hz(), 0.5).unwrap();
        assert_eq!(beat.left_hz(), 200.0);
        assert_eq!(beat.right_hz(), 210.0);
    }

    #[test]
    fn test_invalid_frequencies() {
        assert!(BinauralBeat::new(0.0, 4.0, 0.5).is_err());
        assert!(BinauralBeat::new(200.0, 0.0, 0.5).is_err());
        assert!(BinauralBeat::new(10.0, 20.0, 0.5).is_err());
        assert!(BinauralBeat::new(f32::NAN, 4.0, 0.5).is_err());
    }

    #[test]
    fn test_render_channels_differ_and_respect_gain() {
        let mut beat = BinauralBeat::new(220.0, 10.0, 0.25).unwrap();
        let mut buffer = vec![0.0; 2 * 4410];
        beat.render(&mut buffer, 44100.0);

        assert!(buffer.iter().all(|s| s.abs() <= 0.25 + 1e-6));
        let left: Vec<f32> = buffer.iter().step_by(2).copied().collect();
        let right: Vec<f32> = buffer.iter().skip(1).step_by(2).copied().collect();
        assert_ne!(left, right);
        assert!(left.iter().any(|s| *s > 0.2));
    }

    #[test]
    fn test_render_is_continuous_across_buffers() {
        let mut whole = BinauralBeat::new(300.0, 6.0, 1.0).unwrap();
        let mut split = whole.clone();

        let mut a = vec![0.0; 512];
        whole.render(&mut a, 48000.0);

        let mut b1 = vec![0.0; 256];
        let mut b2 = vec![0.0; 256];
        split.render(&mut b1, 48000.0);
        split.render(&mut b2, 48000.0);

        b1.extend_from_slice(&b2);
        for (x, y) in a.iter().zip(&b1) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}
