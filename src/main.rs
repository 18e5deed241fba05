//! Astrosonic - headless audio-reactive solar system
//!
//! Listens to the default microphone (or silence), and each frame lets the
//! music steer a particle nebula, an orbiting planet system and the
//! positional mix of the planets' voices.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use tracing::{info, warn};

#[cfg(feature = "device")]
use astrosonic::audio::AudioCapture;
use astrosonic::audio::DEFAULT_SAMPLE_RATE_HZ;
use astrosonic::cli::Args;
use astrosonic::logging;
use astrosonic::mood::HeuristicMood;
use astrosonic::params::SimulationConfig;
use astrosonic::physics::{BodyKind, PhysicsBody};
use astrosonic::spatial::{AudioZone, ReverbProfile};
use astrosonic::CosmicPipeline;

/// Interleaved stereo frames rendered per block during binaural export
const EXPORT_BLOCK_FRAMES: usize = 1024;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose).context("Failed to initialize logging")?;

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    args.apply_overrides(&mut config);

    let mut pipeline = CosmicPipeline::new(&config).context("Invalid simulation config")?;
    build_solar_system(&mut pipeline).context("Failed to build scene")?;

    match &args.emotion {
        Some(label) => pipeline.particles_mut().set_emotion_label(label),
        None => pipeline.set_mood(Some(Box::new(HeuristicMood::default()))),
    }

    if let Some(path) = &args.binaural_wav {
        export_binaural(&mut pipeline, &args, path)?;
    }

    run(&mut pipeline, &args, &config)
}

/// Fixed sun, three planets, a moon and a nebula reverb zone. Each planet
/// carries an audio source.
fn build_solar_system(pipeline: &mut CosmicPipeline) -> Result<()> {
    let physics = pipeline.physics_mut();
    physics.add_body(
        PhysicsBody::new("sun", Vec3::ZERO, 1000.0)
            .with_radius(3.0)
            .with_kind(BodyKind::Star)
            .fixed(),
    )?;

    let planets = [("terra", 20.0, 1.0), ("ares", 32.0, 0.5), ("jove", 55.0, 8.0)];
    for (id, distance, mass) in planets {
        physics.add_body(
            PhysicsBody::new(id, Vec3::new(distance, 0.0, 0.0), mass)
                .with_radius(0.5)
                .with_kind(BodyKind::Planet),
        )?;
        physics.set_orbital_velocity(id, "sun")?;
    }

    physics.add_body(
        PhysicsBody::new("io", Vec3::new(58.0, 0.0, 0.0), 0.01)
            .with_radius(0.1)
            .with_kind(BodyKind::Moon),
    )?;
    physics.set_orbital_velocity("io", "jove")?;

    let spatial = pipeline.spatial_mut();
    spatial.add_zone(
        AudioZone::new("nebula", Vec3::new(30.0, 0.0, 30.0), 25.0, ReverbProfile::Nebula)
            .with_mix(0.8),
    )?;
    spatial.warp_listener(Vec3::new(0.0, 15.0, 70.0));
    spatial.set_listener_orientation(Vec3::new(0.0, -15.0, -70.0), Vec3::Y);

    for (id, _, _) in planets {
        let source = format!("{}-voice", id);
        pipeline.spatial_mut().add_source(source.as_str(), Vec3::ZERO)?;
        pipeline.attach_source_to_body(&source, id)?;
    }
    Ok(())
}

/// Render the binaural pair to a 32-bit float stereo WAV file
fn export_binaural(pipeline: &mut CosmicPipeline, args: &Args, path: &Path) -> Result<()> {
    let spatial = pipeline.spatial_mut();
    spatial
        .start_binaural(args.binaural_base, args.binaural_beat)
        .context("Invalid binaural frequencies")?;

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: DEFAULT_SAMPLE_RATE_HZ as u32,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;

    let total_frames = (args.seconds.max(0.0) * DEFAULT_SAMPLE_RATE_HZ) as usize;
    let mut block = vec![0.0f32; EXPORT_BLOCK_FRAMES * 2];
    let mut written = 0;
    while written < total_frames {
        let frames = (total_frames - written).min(EXPORT_BLOCK_FRAMES);
        let out = &mut block[..frames * 2];
        spatial.render_binaural(out, DEFAULT_SAMPLE_RATE_HZ);
        for &sample in out.iter() {
            writer.write_sample(sample)?;
        }
        written += frames;
    }
    writer.finalize().context("Failed to finalize WAV file")?;
    spatial.stop_binaural();

    info!(
        "Binaural beat written to {} ({} s, {} Hz + {} Hz)",
        path.display(),
        args.seconds,
        args.binaural_base,
        args.binaural_beat
    );
    Ok(())
}

/// Main loop. Paced in real time while a microphone is live so the capture
/// buffer keeps up; otherwise runs as fast as possible.
#[cfg_attr(not(feature = "device"), allow(unused_variables))]
fn run(pipeline: &mut CosmicPipeline, args: &Args, config: &SimulationConfig) -> Result<()> {
    #[cfg(feature = "device")]
    let mut capture = if args.silent {
        None
    } else {
        match AudioCapture::acquire(&config.device) {
            Ok(capture) => {
                info!("Listening on '{}'", capture.device_name());
                Some(capture)
            }
            Err(e) => {
                warn!("{}, running on silence", e);
                None
            }
        }
    };
    #[cfg(feature = "device")]
    let live = capture.is_some();

    #[cfg(not(feature = "device"))]
    let live = {
        if !args.silent {
            warn!("Built without the `device` feature, running on silence");
        }
        false
    };

    let delta_time = args.delta_time();
    let frame_period = Duration::from_secs_f32(delta_time);
    let summary_every = (args.fps.round() as u64).max(1);
    let started = Instant::now();

    info!(
        "Simulating {} frames at {} fps with {} particles",
        args.frames,
        args.fps,
        pipeline.particles().len()
    );

    for frame in 0..args.frames {
        let frame_start = Instant::now();
        let now_ms = frame as f64 * delta_time as f64 * 1000.0;

        #[cfg(feature = "device")]
        let input = capture.as_mut().and_then(|c| c.pull());
        #[cfg(not(feature = "device"))]
        let input = None;

        pipeline.frame(input, now_ms, delta_time);

        if (frame + 1) % summary_every == 0 {
            log_summary(pipeline);
        }

        if live {
            if let Some(rest) = frame_period.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    info!(
        "Done: {} frames in {:.2} s",
        pipeline.frame_count(),
        started.elapsed().as_secs_f32()
    );
    Ok(())
}

/// Once-per-second state line
fn log_summary(pipeline: &CosmicPipeline) {
    let features = pipeline.features();
    let physics = pipeline.physics();
    let loudest = pipeline
        .spatial()
        .sources()
        .iter()
        .max_by(|a, b| a.output().gain.total_cmp(&b.output().gain));

    info!(
        "t={:.1}s emotion={} bass={:.2} mid={:.2} treble={:.2} tempo={} energy={:.3}",
        features.timestamp_ms / 1000.0,
        pipeline.particles().emotion(),
        features.bass,
        features.mid,
        features.treble,
        features.tempo,
        physics.kinetic_energy() + physics.potential_energy()
    );
    if let Some(source) = loudest {
        let output = source.output();
        info!(
            "  loudest '{}': gain={:.3} doppler={:.4} pan={:+.2} reverb={}",
            source.id,
            output.gain,
            output.doppler,
            output.pan,
            output
                .reverb
                .map(|r| format!("{:?} {:.2}", r.profile, r.mix))
                .unwrap_or_else(|| "dry".to_string())
        );
    }
    for collision in physics.collisions() {
        warn!(
            "Collision: '{}' and '{}' at {:.3}",
            collision.first, collision.second, collision.distance
        );
    }
}
