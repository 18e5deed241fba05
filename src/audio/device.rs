//! Microphone capture with an explicit acquire step.
//!
//! `AudioCapture::acquire` is the only fallible, blocking call; afterwards
//! `pull` is synchronous and never blocks on the audio thread for longer
//! than a buffer copy.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::snapshot::AudioFrame;
use super::spectrum::SpectrumAnalyzer;
use crate::error::DeviceError;
use crate::params::DeviceConfig;

/// Live input stream plus the spectrum analyzer fed from it
pub struct AudioCapture {
    /// Mono capture buffer shared with the audio callback
    samples: Arc<Mutex<Vec<f32>>>,

    /// Copy of the latest window, taken under the lock
    window: Vec<f32>,

    analyzer: SpectrumAnalyzer,
    sample_rate_hz: f32,
    device_name: String,

    /// Input stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioCapture {
    /// Open the default input device and start capturing
    pub fn acquire(config: &DeviceConfig) -> Result<Self, DeviceError> {
        config.validate()?;

        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(DeviceError::NoDevice)?;
        let supported = device
            .default_input_config()
            .map_err(|e| DeviceError::UnsupportedConfig(e.to_string()))?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        let sample_rate_hz = supported.sample_rate().0 as f32;
        let channels = supported.channels() as usize;
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();

        info!("Audio input: {} @ {}Hz, {} ch", device_name, sample_rate_hz, channels);

        let capacity = config.buffer_capacity();
        let samples = Arc::new(Mutex::new(Vec::with_capacity(capacity)));
        let shared = Arc::clone(&samples);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, shared, capacity)
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, shared, capacity)
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, shared, capacity)
            }
            other => {
                return Err(DeviceError::UnsupportedConfig(format!(
                    "sample format {:?}",
                    other
                )))
            }
        }?;

        stream
            .play()
            .map_err(|e| DeviceError::PlayStream(e.to_string()))?;

        Ok(Self {
            samples,
            window: Vec::with_capacity(config.fft_size),
            analyzer: SpectrumAnalyzer::new(config)?,
            sample_rate_hz,
            device_name,
            _stream: stream,
        })
    }

    /// Analyze the latest window of captured audio.
    ///
    /// Returns `None` until one full FFT window has been captured.
    pub fn pull(&mut self) -> Option<&AudioFrame> {
        let n = self.analyzer.fft_size();
        {
            let buffer = self.samples.lock();
            if buffer.len() < n {
                return None;
            }
            self.window.clear();
            self.window.extend_from_slice(&buffer[buffer.len() - n..]);
        }
        Some(self.analyzer.analyze(&self.window, self.sample_rate_hz))
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

/// Build an input stream that mixes every frame down to mono
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    samples: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
) -> Result<cpal::Stream, DeviceError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    debug!("Building input stream: {} channels, capacity {}", channels, capacity);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let mut buffer = samples.lock();
                for frame in data.chunks(channels) {
                    let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
                    buffer.push(sum / frame.len() as f32);
                }

                // Keep only the newest samples
                let excess = buffer.len().saturating_sub(capacity);
                if excess > 0 {
                    buffer.drain(..excess);
                }
            },
            |err| warn!("Audio input stream error: {}", err),
            None,
        )
        .map_err(|e| DeviceError::BuildStream(e.to_string()))
}
