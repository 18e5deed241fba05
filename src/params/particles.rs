//! Particle population parameters.
//!
//! Rates are expressed per second; `damping` is per reference frame at 60 Hz
//! and rescaled to the actual frame time.

use serde::Deserialize;

use crate::error::ConfigError;

/// Particle engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Fixed pool size (particles)
    pub count: usize,

    /// Outer radius of the spawn shell (world units)
    pub spawn_radius: f32,

    /// Shell thickness as a fraction of `spawn_radius` (0 = thin shell, 1 = full ball)
    pub shell_thickness: f32,

    /// Per-axis bound of the initial velocity (units/s)
    pub initial_speed: f32,

    /// Inward acceleration assigned at spawn (units/s²)
    pub inward_pull: f32,

    /// Base size range (render units)
    pub size_range: (f32, f32),

    /// Lifetime range (seconds)
    pub life_range_s: (f32, f32),

    /// Orbit radius range (world units)
    pub orbit_radius_range: (f32, f32),

    /// Orbit angular speed range (radians/s)
    pub orbit_speed_range: (f32, f32),

    /// Velocity retained per 1/60 s (0-1, exclusive of 1)
    pub damping: f32,

    /// Mid energy above which particles are pushed outward (0-1)
    pub mid_push_threshold: f32,

    /// Outward push per unit mid energy (units/s²)
    pub mid_push_strength: f32,

    /// Weight of the orbital position in the position blend
    /// Formula: position = position * (1 - w) + orbital * w
    pub orbit_blend: f32,

    /// Vertical oscillation per unit treble energy (world units)
    pub treble_wobble: f32,

    /// Vertical oscillation frequency (radians/s)
    pub wobble_rate: f32,

    /// Color interpolation rate toward the emotion target (per second)
    pub color_blend_rate: f32,

    /// Size boost per unit high-mid energy and reactivity
    pub size_reactivity: f32,

    /// RNG seed for spawn placement
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            spawn_radius: 50.0,
            shell_thickness: 0.2,
            initial_speed: 0.5,
            inward_pull: 0.05,
            size_range: (0.5, 2.0),
            life_range_s: (4.0, 12.0),
            orbit_radius_range: (10.0, 50.0),
            orbit_speed_range: (0.1, 0.6),
            damping: 0.98,
            mid_push_threshold: 0.5,
            mid_push_strength: 2.0,
            orbit_blend: 0.3,
            treble_wobble: 0.5,
            wobble_rate: 2.0,
            color_blend_rate: 0.5,
            size_reactivity: 0.5,
            seed: 42,
        }
    }
}

impl ParticleConfig {
    /// Validate pool size and spawn ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::out_of_range("count", "pool must hold at least one particle"));
        }
        if !(self.spawn_radius.is_finite() && self.spawn_radius > 0.0) {
            return Err(ConfigError::out_of_range("spawn_radius", "must be finite and > 0"));
        }
        for (field, value) in [
            ("initial_speed", self.initial_speed),
            ("inward_pull", self.inward_pull),
            ("mid_push_threshold", self.mid_push_threshold),
            ("mid_push_strength", self.mid_push_strength),
            ("treble_wobble", self.treble_wobble),
            ("wobble_rate", self.wobble_rate),
            ("color_blend_rate", self.color_blend_rate),
            ("size_reactivity", self.size_reactivity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::out_of_range(
                    field,
                    format!("must be finite and >= 0, got {value}"),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.shell_thickness) {
            return Err(ConfigError::out_of_range("shell_thickness", "must be within [0, 1]"));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::out_of_range(
                "damping",
                format!("must be within (0, 1), got {}", self.damping),
            ));
        }
        if !(0.0..=1.0).contains(&self.orbit_blend) {
            return Err(ConfigError::out_of_range("orbit_blend", "must be within [0, 1]"));
        }
        if !(self.life_range_s.0 > 0.0) {
            return Err(ConfigError::out_of_range("life_range_s", "lifetimes must be > 0"));
        }
        for (field, (lo, hi)) in [
            ("size_range", self.size_range),
            ("life_range_s", self.life_range_s),
            ("orbit_radius_range", self.orbit_radius_range),
            ("orbit_speed_range", self.orbit_speed_range),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(ConfigError::out_of_range(
                    field,
                    format!("expected lo <= hi, got ({lo}, {hi})"),
                ));
            }
        }
        Ok(())
    }
}
