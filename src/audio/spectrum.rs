//! FFT spectrum analysis of captured samples.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::snapshot::AudioFrame;
use crate::error::ConfigError;
use crate::params::DeviceConfig;

/// Byte-scale magnitude ceiling produced by the analyzer
pub const MAGNITUDE_SCALE: f32 = 255.0;

/// Turns the latest `fft_size` samples into an [`AudioFrame`]:
/// Hann window, forward FFT, decibel magnitudes mapped onto 0-255.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    min_db: f32,
    max_db: f32,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    frame: AudioFrame,
}

impl SpectrumAnalyzer {
    pub fn new(config: &DeviceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fft_size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch_len = fft.get_inplace_scratch_len();

        // Pre-compute Hann window
        let window = (0..fft_size).map(|i| hann_window(i, fft_size)).collect();

        Ok(Self {
            fft,
            fft_size,
            min_db: config.min_db,
            max_db: config.max_db,
            window,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            frame: AudioFrame::new(vec![0.0; fft_size / 2], vec![0.0; fft_size], 0.0),
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Analyze the most recent `fft_size` samples (zero-padded at the front
    /// when fewer are given).
    pub fn analyze(&mut self, samples: &[f32], sample_rate_hz: f32) -> &AudioFrame {
        let n = self.fft_size;
        let take = samples.len().min(n);
        let pad = n - take;
        let recent = &samples[samples.len() - take..];

        let time_domain = &mut self.frame.time_domain;
        time_domain[..pad].fill(0.0);
        for (dst, &src) in time_domain[pad..].iter_mut().zip(recent) {
            *dst = src.clamp(-1.0, 1.0);
        }

        for ((slot, &sample), &w) in self.buffer.iter_mut().zip(time_domain.iter()).zip(&self.window)
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let db_span = self.max_db - self.min_db;
        for (bin, c) in self.frame.frequency.iter_mut().zip(&self.buffer) {
            let magnitude = c.norm() / n as f32;
            let db = 20.0 * magnitude.max(1e-12).log10();
            *bin = ((db - self.min_db) / db_span * MAGNITUDE_SCALE).clamp(0.0, MAGNITUDE_SCALE);
        }

        self.frame.sample_rate_hz = sample_rate_hz;
        &self.frame
    }

    /// Last analyzed frame
    pub fn frame(&self) -> &AudioFrame {
        &self.frame
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
