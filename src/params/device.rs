//! Capture device and spectrum parameters.

use serde::Deserialize;

use crate::error::ConfigError;

/// Capture and FFT configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// FFT window size (must be power of 2); yields `fft_size / 2` bins
    pub fft_size: usize,

    /// Decibel level mapped to magnitude 0
    pub min_db: f32,

    /// Decibel level mapped to magnitude 255
    pub max_db: f32,

    /// Captured samples kept before the oldest are dropped (in FFT windows)
    pub buffered_windows: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            min_db: -100.0,
            max_db: -30.0,
            buffered_windows: 4,
        }
    }
}

impl DeviceConfig {
    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 32 {
            return Err(ConfigError::out_of_range(
                "fft_size",
                format!("must be a power of 2 >= 32, got {}", self.fft_size),
            ));
        }
        if !(self.max_db > self.min_db) {
            return Err(ConfigError::out_of_range("max_db", "must be above min_db"));
        }
        if self.buffered_windows == 0 {
            return Err(ConfigError::out_of_range("buffered_windows", "must be > 0"));
        }
        Ok(())
    }

    /// Upper bound on buffered capture samples
    pub fn buffer_capacity(&self) -> usize {
        self.fft_size * self.buffered_windows
    }
}
