//! Fixed-pool particle simulation steered by audio features.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::emotion::Emotion;
use crate::audio::AnalysisSnapshot;
use crate::error::ConfigError;
use crate::params::ParticleConfig;

/// Simulation state of one particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub color: Vec3,
    /// Base size before audio scaling
    pub size: f32,
    /// Remaining life (seconds), within [0, max_life]
    pub life: f32,
    pub max_life: f32,
    /// Response strength to audio (0-1), fixed at spawn
    pub audio_reactivity: f32,
    /// Emotion active when this particle spawned
    pub emotion: Emotion,
    pub orbit_radius: f32,
    /// Radians per second
    pub orbit_speed: f32,
    pub orbit_phase: f32,
}

/// Per-particle render data (position + color + scaled size)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub size: f32,
}

/// Particle population with audio-reactive kinematics, color and size.
///
/// The pool is allocated once; dead particles are respawned in their slot.
pub struct ParticleSystem {
    config: ParticleConfig,
    particles: Vec<Particle>,
    vertices: Vec<ParticleVertex>,
    rng: StdRng,
    emotion: Emotion,
    elapsed_s: f32,
}

impl ParticleSystem {
    /// Create the pool and spawn every particle
    pub fn new(config: ParticleConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let emotion = Emotion::default();
        let particles: Vec<Particle> = (0..config.count)
            .map(|_| spawn(&mut rng, &config, emotion))
            .collect();
        let vertices = particles
            .iter()
            .map(|p| vertex(p, p.size))
            .collect();

        debug!(
            "ParticleSystem created: {} particles, shell radius {}",
            config.count, config.spawn_radius
        );

        Ok(Self {
            config,
            particles,
            vertices,
            rng,
            emotion,
            elapsed_s: 0.0,
        })
    }

    /// Change the color target. Particles keep their positions and drift
    /// toward the new palette over the following frames.
    pub fn set_emotion(&mut self, emotion: Emotion) {
        if emotion != self.emotion {
            debug!("Particle emotion: {} -> {}", self.emotion, emotion);
            self.emotion = emotion;
        }
    }

    /// Set the emotion from a label, falling back to neutral when unknown
    pub fn set_emotion_label(&mut self, label: &str) {
        let emotion = label.parse().unwrap_or_else(|e| {
            warn!("{}, using neutral", e);
            Emotion::Neutral
        });
        self.set_emotion(emotion);
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    /// Advance the population by `delta_time` seconds under `analysis`.
    ///
    /// A non-positive `delta_time` is a no-op.
    pub fn update(&mut self, delta_time: f32, analysis: &AnalysisSnapshot) {
        if !(delta_time > 0.0) || !delta_time.is_finite() {
            return;
        }
        self.elapsed_s += delta_time;

        let cfg = &self.config;
        let damping = cfg.damping.powf(delta_time * 60.0);
        let mid_push = if analysis.mid > cfg.mid_push_threshold {
            analysis.mid * cfg.mid_push_strength * delta_time
        } else {
            0.0
        };
        let keep = 1.0 - cfg.orbit_blend;
        let target_color = self.emotion.color();
        let color_t = (cfg.color_blend_rate * delta_time).min(1.0);
        let high_mid = analysis.high_mid();

        for (particle, vertex_out) in self.particles.iter_mut().zip(self.vertices.iter_mut()) {
            // 1. Age; respawn dead particles in place
            particle.life -= delta_time;
            if particle.life <= 0.0 {
                *particle = spawn(&mut self.rng, cfg, self.emotion);
                *vertex_out = vertex(particle, particle.size);
                continue;
            }

            // 2. Damping, acceleration, mid-band push
            particle.velocity = particle.velocity * damping + particle.acceleration * delta_time;
            if mid_push > 0.0 {
                particle.velocity += particle.position.normalize_or_zero() * mid_push;
            }

            // 3. Integrate
            particle.position += particle.velocity * delta_time;

            // 4. Blend toward the orbital ring, faster with bass
            particle.orbit_phase = (particle.orbit_phase
                + particle.orbit_speed
                    * delta_time
                    * (1.0 + analysis.bass * particle.audio_reactivity))
                .rem_euclid(TAU);
            let (sin, cos) = particle.orbit_phase.sin_cos();
            particle.position.x = particle.position.x * keep
                + cos * particle.orbit_radius * cfg.orbit_blend;
            particle.position.z = particle.position.z * keep
                + sin * particle.orbit_radius * cfg.orbit_blend;

            // 5. Treble shimmer
            particle.position.y += (self.elapsed_s * cfg.wobble_rate + particle.orbit_phase).sin()
                * analysis.treble
                * cfg.treble_wobble
                * delta_time;

            // 6. Drift toward the emotion palette
            particle.color = particle.color.lerp(target_color, color_t);

            // 7. Size sparkle
            let size = particle.size
                * (1.0 + high_mid * particle.audio_reactivity * cfg.size_reactivity);
            *vertex_out = vertex(particle, size);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Render buffer, one entry per particle
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    /// Render buffer as raw bytes for GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }
}

fn sample(rng: &mut StdRng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Place a fresh particle in the spawn shell with independent random traits
fn spawn(rng: &mut StdRng, config: &ParticleConfig, emotion: Emotion) -> Particle {
    let inner = config.spawn_radius * (1.0 - config.shell_thickness);
    let radius = sample(rng, (inner, config.spawn_radius));
    let theta = rng.gen_range(0.0..TAU);
    let cos_phi: f32 = rng.gen_range(-1.0..=1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).max(0.0).sqrt();
    let position = Vec3::new(
        radius * sin_phi * theta.cos(),
        radius * cos_phi,
        radius * sin_phi * theta.sin(),
    );

    let speed = config.initial_speed;
    let velocity = if speed > 0.0 {
        Vec3::new(
            rng.gen_range(-speed..speed),
            rng.gen_range(-speed..speed),
            rng.gen_range(-speed..speed),
        )
    } else {
        Vec3::ZERO
    };

    let max_life = sample(rng, config.life_range_s);
    let brightness: f32 = rng.gen_range(0.8..=1.0);

    Particle {
        position,
        velocity,
        acceleration: -position.normalize_or_zero() * config.inward_pull,
        color: emotion.color() * brightness,
        size: sample(rng, config.size_range),
        life: max_life,
        max_life,
        audio_reactivity: rng.gen_range(0.0..=1.0),
        emotion,
        orbit_radius: sample(rng, config.orbit_radius_range),
        orbit_speed: sample(rng, config.orbit_speed_range),
        orbit_phase: rng.gen_range(0.0..TAU),
    }
}

fn vertex(particle: &Particle, size: f32) -> ParticleVertex {
    ParticleVertex {
        position: particle.position.to_array(),
        color: particle.color.to_array(),
        size,
    }
}
