//! Command-line argument parsing for the headless demo.

use std::path::PathBuf;

use clap::Parser;

use crate::params::SimulationConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "astrosonic")]
#[command(about = "Audio-reactive cosmic simulation (headless)", long_about = None)]
pub struct Args {
    /// TOML file with simulation parameters (missing fields use defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long, value_name = "N", default_value = "600")]
    pub frames: u64,

    /// Simulation rate (frames per second)
    #[arg(long, value_name = "HZ", default_value = "60")]
    pub fps: f32,

    /// Override the particle pool size
    #[arg(long, value_name = "N")]
    pub particles: Option<usize>,

    /// Fixed particle emotion (joy, sadness, fear, calm, anger, love,
    /// surprise, neutral); mood is predicted from audio when omitted
    #[arg(long, value_name = "EMOTION")]
    pub emotion: Option<String>,

    /// Skip the microphone and run on silence
    #[arg(long)]
    pub silent: bool,

    /// Write a binaural beat to this WAV file before simulating
    #[arg(long, value_name = "FILE")]
    pub binaural_wav: Option<PathBuf>,

    /// Binaural carrier frequency (Hz)
    #[arg(long, value_name = "HZ", default_value = "200")]
    pub binaural_base: f32,

    /// Binaural beat frequency (Hz)
    #[arg(long, value_name = "HZ", default_value = "10")]
    pub binaural_beat: f32,

    /// Length of the binaural export (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "10")]
    pub seconds: f32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Frame duration in seconds
    pub fn delta_time(&self) -> f32 {
        if self.fps > 0.0 {
            1.0 / self.fps
        } else {
            0.0
        }
    }

    /// Overlay command-line overrides onto a loaded config
    pub fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(count) = self.particles {
            config.particles.count = count;
        }
    }
}
