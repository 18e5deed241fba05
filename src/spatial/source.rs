//! Sources, zones and the listener, plus the per-source mixing math.

use glam::Vec3;

use crate::error::SpatialError;
use crate::params::DopplerConvention;

/// Distances at or below this are treated as coincident
pub const MIN_DISTANCE: f32 = 1e-6;

/// Reverb character of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReverbProfile {
    SmallRoom,
    #[default]
    Hall,
    Cathedral,
    Cave,
    Nebula,
}

impl ReverbProfile {
    /// Suggested RT60 decay for the host reverb (seconds)
    pub fn decay_seconds(self) -> f32 {
        match self {
            ReverbProfile::SmallRoom => 0.4,
            ReverbProfile::Hall => 1.8,
            ReverbProfile::Cathedral => 4.0,
            ReverbProfile::Cave => 2.5,
            ReverbProfile::Nebula => 8.0,
        }
    }
}

/// Spherical region applying a reverb profile to sources inside it
#[derive(Debug, Clone, PartialEq)]
pub struct AudioZone {
    pub id: String,
    pub position: Vec3,
    pub radius: f32,
    pub profile: ReverbProfile,
    /// Wet level at the zone center (0-1)
    pub mix: f32,
}

impl AudioZone {
    pub fn new(id: impl Into<String>, position: Vec3, radius: f32, profile: ReverbProfile) -> Self {
        Self {
            id: id.into(),
            position,
            radius,
            profile,
            mix: 1.0,
        }
    }

    pub fn with_mix(mut self, mix: f32) -> Self {
        self.mix = mix;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SpatialError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SpatialError::InvalidZoneRadius {
                id: self.id.clone(),
                radius: self.radius,
            });
        }
        Ok(())
    }
}

/// Reverb routing for one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSend {
    /// Index into the engine's zone list
    pub zone: usize,
    pub profile: ReverbProfile,
    /// Wet level (0-1)
    pub mix: f32,
}

/// Mixing parameters computed for one source by the last update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceOutput {
    /// Output gain (0-1)
    pub gain: f32,
    /// Pitch multiplier from relative motion
    pub doppler: f32,
    /// Stereo position, -1 (left) to 1 (right)
    pub pan: f32,
    pub distance: f32,
    pub reverb: Option<ReverbSend>,
}

impl Default for SourceOutput {
    fn default() -> Self {
        Self {
            gain: 0.0,
            doppler: 1.0,
            pan: 0.0,
            distance: 0.0,
            reverb: None,
        }
    }
}

/// A positioned sound emitter.
///
/// Velocity is derived from the position change across updates and cannot
/// be set directly.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub id: String,
    pub(crate) position: Vec3,
    pub(crate) previous_position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) volume: f32,
    pub(crate) playing: bool,
    pub(crate) output: SourceOutput,
}

impl AudioSource {
    pub(crate) fn new(id: String, position: Vec3) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            velocity: Vec3::ZERO,
            volume: 1.0,
            playing: true,
            output: SourceOutput::default(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Velocity observed over the last update
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn output(&self) -> &SourceOutput {
        &self.output
    }
}

/// The single point of audition
#[derive(Debug, Clone, PartialEq)]
pub struct Listener {
    pub(crate) position: Vec3,
    pub(crate) previous_position: Vec3,
    pub(crate) velocity: Vec3,
    pub(crate) forward: Vec3,
    pub(crate) up: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            previous_position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl Listener {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit vector toward the listener's right ear
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }
}

/// Inverse-distance gain `1 / (1 + rolloff·d)`, silent at `max_distance`
pub fn distance_gain(distance: f32, rolloff: f32, max_distance: f32) -> f32 {
    if distance >= max_distance {
        return 0.0;
    }
    (1.0 / (1.0 + rolloff * distance.max(0.0))).clamp(0.0, 1.0)
}

/// Doppler pitch factor for a source heard by a listener.
///
/// Velocities are projected on the unit axis `u` from source to listener
/// and scaled by `intensity`. Under [`DopplerConvention::AxisSigned`] the
/// factor is `(c + v_listener·u) / (c + v_source·u)`; under
/// [`DopplerConvention::Physical`] both projections change sign, so a
/// source closing in raises the pitch. Signed projections are floored at
/// `-c` and the denominator is kept positive. Coincident positions or a
/// zero intensity give 1.
pub fn doppler_factor(
    source_position: Vec3,
    source_velocity: Vec3,
    listener_position: Vec3,
    listener_velocity: Vec3,
    speed_of_sound: f32,
    intensity: f32,
    convention: DopplerConvention,
) -> f32 {
    let axis = listener_position - source_position;
    let distance = axis.length();
    if distance <= MIN_DISTANCE || intensity <= 0.0 {
        return 1.0;
    }
    let axis = axis / distance;
    let sign = convention.sign();

    let listener_along = (sign * listener_velocity.dot(axis) * intensity).max(-speed_of_sound);
    let source_along = (sign * source_velocity.dot(axis) * intensity).max(-speed_of_sound);

    let numerator = speed_of_sound + listener_along;
    let denominator = (speed_of_sound + source_along).max(speed_of_sound * 1e-3);
    numerator / denominator
}

/// Left/right placement of `source_position` for `listener`
pub fn stereo_pan(listener: &Listener, source_position: Vec3) -> f32 {
    let direction = (source_position - listener.position).normalize_or_zero();
    direction.dot(listener.right()).clamp(-1.0, 1.0)
}

/// Nearest zone whose radius contains `position`, with its wet level
/// `mix · (1 − d/r)`
pub fn select_reverb_zone(zones: &[AudioZone], position: Vec3) -> Option<ReverbSend> {
    zones
        .iter()
        .enumerate()
        .map(|(index, zone)| (index, zone, zone.position.distance(position)))
        .filter(|(_, zone, distance)| *distance <= zone.radius)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(index, zone, distance)| ReverbSend {
            zone: index,
            profile: zone.profile,
            mix: (zone.mix * (1.0 - distance / zone.radius)).clamp(0.0, 1.0),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_curve() {
        assert_eq!(distance_gain(0.0, 0.5, 100.0), 1.0);
        assert!((distance_gain(2.0, 0.5, 100.0) - 0.5).abs() < 1e-6);
        assert_eq!(distance_gain(100.0, 0.5, 100.0), 0.0);
        assert_eq!(distance_gain(150.0, 0.5, 100.0), 0.0);

        let mut last = 1.0;
        for d in 0..100 {
            let gain = distance_gain(d as f32, 0.5, 100.0);
            assert!(gain <= last);
            last = gain;
        }
    }

    const AXIS: DopplerConvention = DopplerConvention::AxisSigned;
    const PHYSICAL: DopplerConvention = DopplerConvention::Physical;

    #[test]
    fn test_doppler_unity_for_shared_velocity() {
        let v = Vec3::new(12.0, -3.0, 40.0);
        for convention in [AXIS, PHYSICAL] {
            let factor =
                doppler_factor(Vec3::ZERO, v, Vec3::new(10.0, 0.0, 0.0), v, 343.0, 1.0, convention);
            assert!((factor - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_doppler_axis_signed_formula() {
        // Source at the origin moving +X toward a listener at +X
        let listener = Vec3::new(100.0, 0.0, 0.0);
        let toward = Vec3::new(34.3, 0.0, 0.0);

        let factor = doppler_factor(Vec3::ZERO, toward, listener, Vec3::ZERO, 343.0, 1.0, AXIS);
        assert!((factor - 343.0 / 377.3).abs() < 1e-5);

        let away = doppler_factor(Vec3::ZERO, -toward, listener, Vec3::ZERO, 343.0, 1.0, AXIS);
        assert!((away - 343.0 / 308.7).abs() < 1e-4);

        // Listener moving along the axis scales the numerator
        let moving_listener =
            doppler_factor(Vec3::ZERO, Vec3::ZERO, listener, toward, 343.0, 1.0, AXIS);
        assert!((moving_listener - 377.3 / 343.0).abs() < 1e-5);

        // Perpendicular motion has no first-order shift
        let crossing = doppler_factor(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 50.0),
            listener,
            Vec3::ZERO,
            343.0,
            1.0,
            AXIS,
        );
        assert!((crossing - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_doppler_physical_convention_flips_shift() {
        let listener = Vec3::new(100.0, 0.0, 0.0);
        let toward = Vec3::new(34.3, 0.0, 0.0);

        let approaching =
            doppler_factor(Vec3::ZERO, toward, listener, Vec3::ZERO, 343.0, 1.0, PHYSICAL);
        assert!((approaching - 343.0 / 308.7).abs() < 1e-4);

        let receding =
            doppler_factor(Vec3::ZERO, -toward, listener, Vec3::ZERO, 343.0, 1.0, PHYSICAL);
        assert!(receding < 1.0);
    }

    #[test]
    fn test_doppler_intensity_scales_shift() {
        let listener = Vec3::new(100.0, 0.0, 0.0);
        let v = Vec3::new(-34.3, 0.0, 0.0);
        let full = doppler_factor(Vec3::ZERO, v, listener, Vec3::ZERO, 343.0, 1.0, AXIS);
        let half = doppler_factor(Vec3::ZERO, v, listener, Vec3::ZERO, 343.0, 0.5, AXIS);
        let off = doppler_factor(Vec3::ZERO, v, listener, Vec3::ZERO, 343.0, 0.0, AXIS);
        assert!(full > half && half > 1.0);
        assert_eq!(off, 1.0);
    }

    #[test]
    fn test_doppler_degenerate_inputs_stay_finite() {
        assert_eq!(
            doppler_factor(Vec3::ONE, Vec3::X * 50.0, Vec3::ONE, Vec3::ZERO, 343.0, 1.0, AXIS),
            1.0
        );
        // Source beyond the speed of sound, for each convention's singular direction
        let receding =
            doppler_factor(Vec3::ZERO, -Vec3::X * 1000.0, Vec3::X * 10.0, Vec3::ZERO, 343.0, 1.0, AXIS);
        assert!(receding.is_finite() && receding > 1.0);
        let closing =
            doppler_factor(Vec3::ZERO, Vec3::X * 1000.0, Vec3::X * 10.0, Vec3::ZERO, 343.0, 1.0, PHYSICAL);
        assert!(closing.is_finite() && closing > 1.0);
    }

    #[test]
    fn test_pan() {
        let listener = Listener::default();
        assert!((stereo_pan(&listener, Vec3::new(5.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        assert!((stereo_pan(&listener, Vec3::new(-5.0, 0.0, 0.0)) + 1.0).abs() < 1e-6);
        assert!(stereo_pan(&listener, Vec3::new(0.0, 0.0, -5.0)).abs() < 1e-6);
        assert_eq!(stereo_pan(&listener, Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_nearest_enclosing_zone_wins() {
        let zones = vec![
            AudioZone::new("big", Vec3::ZERO, 100.0, ReverbProfile::Cathedral),
            AudioZone::new("small", Vec3::new(10.0, 0.0, 0.0), 5.0, ReverbProfile::Cave)
                .with_mix(0.8),
        ];

        let send = select_reverb_zone(&zones, Vec3::new(11.0, 0.0, 0.0)).unwrap();
        assert_eq!(send.zone, 1);
        assert_eq!(send.profile, ReverbProfile::Cave);
        assert!((send.mix - 0.8 * (1.0 - 1.0 / 5.0)).abs() < 1e-6);

        // Outside the small zone, inside the big one
        let send = select_reverb_zone(&zones, Vec3::new(-50.0, 0.0, 0.0)).unwrap();
        assert_eq!(send.zone, 0);
        assert!((send.mix - 0.5).abs() < 1e-6);

        assert!(select_reverb_zone(&zones, Vec3::new(500.0, 0.0, 0.0)).is_none());
    }
}
