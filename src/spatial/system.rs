//! Positional audio engine: attenuation, Doppler, pan and reverb zones.

use glam::Vec3;
use tracing::{debug, trace};

use super::binaural::BinauralBeat;
use super::source::{
    distance_gain, doppler_factor, select_reverb_zone, stereo_pan, AudioSource, AudioZone,
    Listener, SourceOutput,
};
use crate::error::{ConfigError, SpatialError};
use crate::params::SpatialConfig;

/// Owns the sources, reverb zones, the listener and an optional binaural
/// tone pair. `update` recomputes every source's [`SourceOutput`].
pub struct SpatialAudioSystem {
    config: SpatialConfig,
    sources: Vec<AudioSource>,
    zones: Vec<AudioZone>,
    listener: Listener,
    binaural: Option<BinauralBeat>,
}

impl SpatialAudioSystem {
    pub fn new(config: SpatialConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "SpatialAudioSystem created: rolloff {}, max distance {}",
            config.rolloff, config.max_distance
        );
        Ok(Self {
            config,
            sources: Vec::new(),
            zones: Vec::new(),
            listener: Listener::default(),
            binaural: None,
        })
    }

    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    // === Sources ===

    /// Create a playing source at `position` with full volume
    pub fn add_source(&mut self, id: impl Into<String>, position: Vec3) -> Result<(), SpatialError> {
        let id = id.into();
        if self.source(&id).is_some() {
            return Err(SpatialError::DuplicateSource(id));
        }
        debug!("Audio source '{}' added at {:?}", id, position);
        self.sources.push(AudioSource::new(id, position));
        Ok(())
    }

    pub fn remove_source(&mut self, id: &str) -> Result<AudioSource, SpatialError> {
        let index = self
            .sources
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SpatialError::UnknownSource(id.to_string()))?;
        debug!("Audio source '{}' removed", id);
        Ok(self.sources.remove(index))
    }

    pub fn source(&self, id: &str) -> Option<&AudioSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn sources(&self) -> &[AudioSource] {
        &self.sources
    }

    fn source_mut(&mut self, id: &str) -> Result<&mut AudioSource, SpatialError> {
        self.sources
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SpatialError::UnknownSource(id.to_string()))
    }

    /// Move a source; its velocity is derived at the next update
    pub fn set_source_position(&mut self, id: &str, position: Vec3) -> Result<(), SpatialError> {
        self.source_mut(id)?.position = position;
        Ok(())
    }

    /// Move a source without implying motion: the next update derives zero
    /// velocity for it
    pub fn warp_source(&mut self, id: &str, position: Vec3) -> Result<(), SpatialError> {
        let source = self.source_mut(id)?;
        source.position = position;
        source.previous_position = position;
        Ok(())
    }

    /// Set the source volume, clamped to [0, 1]
    pub fn set_source_volume(&mut self, id: &str, volume: f32) -> Result<(), SpatialError> {
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.0 };
        self.source_mut(id)?.volume = volume;
        Ok(())
    }

    pub fn play(&mut self, id: &str) -> Result<(), SpatialError> {
        self.source_mut(id)?.playing = true;
        Ok(())
    }

    pub fn stop(&mut self, id: &str) -> Result<(), SpatialError> {
        self.source_mut(id)?.playing = false;
        Ok(())
    }

    // === Zones ===

    /// Register a reverb zone; zones are static once added
    pub fn add_zone(&mut self, zone: AudioZone) -> Result<(), SpatialError> {
        zone.validate()?;
        if self.zones.iter().any(|z| z.id == zone.id) {
            return Err(SpatialError::DuplicateZone(zone.id));
        }
        debug!(
            "Audio zone '{}' added: radius {}, {:?}",
            zone.id, zone.radius, zone.profile
        );
        self.zones.push(AudioZone {
            mix: zone.mix.clamp(0.0, 1.0),
            ..zone
        });
        Ok(())
    }

    pub fn zones(&self) -> &[AudioZone] {
        &self.zones
    }

    // === Listener ===

    pub fn listener(&self) -> &Listener {
        &self.listener
    }

    /// Move the listener; its velocity is derived at the next update
    pub fn set_listener_position(&mut self, position: Vec3) {
        self.listener.position = position;
    }

    /// Move the listener without implying motion
    pub fn warp_listener(&mut self, position: Vec3) {
        self.listener.position = position;
        self.listener.previous_position = position;
    }

    /// Orient the listener. Degenerate vectors keep the previous orientation.
    pub fn set_listener_orientation(&mut self, forward: Vec3, up: Vec3) {
        let forward = forward.normalize_or_zero();
        let up = up.normalize_or_zero();
        if forward == Vec3::ZERO || up == Vec3::ZERO || forward.cross(up) == Vec3::ZERO {
            return;
        }
        self.listener.forward = forward;
        self.listener.up = up;
    }

    // === Binaural ===

    /// Start a binaural pair, replacing any pair already running
    pub fn start_binaural(&mut self, base_hz: f32, beat_hz: f32) -> Result<(), SpatialError> {
        let beat = BinauralBeat::new(base_hz, beat_hz, self.config.binaural_gain)?;
        if let Some(previous) = self.binaural.replace(beat) {
            debug!(
                "Binaural pair {}/{} Hz replaced",
                previous.left_hz(),
                previous.right_hz()
            );
        }
        debug!("Binaural pair started: {} Hz + {} Hz beat", base_hz, beat_hz);
        Ok(())
    }

    pub fn stop_binaural(&mut self) {
        if self.binaural.take().is_some() {
            debug!("Binaural pair stopped");
        }
    }

    pub fn binaural(&self) -> Option<&BinauralBeat> {
        self.binaural.as_ref()
    }

    /// Render the running pair into an interleaved stereo buffer, or
    /// silence when none is running
    pub fn render_binaural(&mut self, out: &mut [f32], sample_rate_hz: f32) {
        match self.binaural.as_mut() {
            Some(beat) => beat.render(out, sample_rate_hz),
            None => out.fill(0.0),
        }
    }

    // === Frame update ===

    /// Derive velocities from position deltas over `delta_time` and
    /// recompute gain, Doppler, pan and reverb for every source.
    ///
    /// A non-positive `delta_time` is a no-op.
    pub fn update(&mut self, delta_time: f32) {
        if !(delta_time > 0.0) || !delta_time.is_finite() {
            return;
        }

        let listener = &mut self.listener;
        listener.velocity = (listener.position - listener.previous_position) / delta_time;
        listener.previous_position = listener.position;

        let config = &self.config;
        let listener = &self.listener;
        for source in &mut self.sources {
            source.velocity = (source.position - source.previous_position) / delta_time;
            source.previous_position = source.position;

            let distance = source.position.distance(listener.position);
            let attenuation = distance_gain(distance, config.rolloff, config.max_distance);

            source.output = SourceOutput {
                gain: if source.playing {
                    (attenuation * source.volume).clamp(0.0, 1.0)
                } else {
                    0.0
                },
                doppler: doppler_factor(
                    source.position,
                    source.velocity,
                    listener.position,
                    listener.velocity,
                    config.speed_of_sound,
                    config.doppler_intensity,
                    config.doppler_convention,
                ),
                pan: stereo_pan(listener, source.position),
                distance,
                reverb: select_reverb_zone(&self.zones, source.position),
            };

            trace!(
                "source '{}': d={:.2} gain={:.3} doppler={:.3}",
                source.id,
                distance,
                source.output.gain,
                source.output.doppler
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::ReverbProfile;

    fn system() -> SpatialAudioSystem {
        SpatialAudioSystem::new(SpatialConfig {
            rolloff: 0.5,
            max_distance: 100.0,
            ..SpatialConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_source_registry() {
        let mut spatial = system();
        spatial.add_source("drone", Vec3::ZERO).unwrap();
        assert_eq!(
            spatial.add_source("drone", Vec3::X),
            Err(SpatialError::DuplicateSource("drone".to_string()))
        );
        assert!(spatial.set_source_position("ghost", Vec3::X).is_err());

        let removed = spatial.remove_source("drone").unwrap();
        assert_eq!(removed.id, "drone");
        assert!(spatial.sources().is_empty());
    }

    #[test]
    fn test_velocity_derived_from_motion() {
        let mut spatial = system();
        spatial.add_source("comet", Vec3::new(10.0, 0.0, 0.0)).unwrap();

        spatial.update(0.5);
        assert_eq!(spatial.source("comet").unwrap().velocity(), Vec3::ZERO);

        spatial
            .set_source_position("comet", Vec3::new(12.0, 0.0, 0.0))
            .unwrap();
        spatial.update(0.5);
        let velocity = spatial.source("comet").unwrap().velocity();
        assert!((velocity - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-6);

        // Stationary again next frame
        spatial.update(0.5);
        assert_eq!(spatial.source("comet").unwrap().velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_warp_has_no_velocity() {
        let mut spatial = system();
        spatial.add_source("beacon", Vec3::ZERO).unwrap();
        spatial.update(0.1);

        spatial.warp_source("beacon", Vec3::new(40.0, 0.0, 0.0)).unwrap();
        spatial.update(0.1);
        let beacon = spatial.source("beacon").unwrap();
        assert_eq!(beacon.position(), Vec3::new(40.0, 0.0, 0.0));
        assert_eq!(beacon.velocity(), Vec3::ZERO);
        assert_eq!(beacon.output().doppler, 1.0);
    }

    #[test]
    fn test_listener_motion_and_warp() {
        let mut spatial = system();
        spatial.warp_listener(Vec3::new(0.0, 0.0, 30.0));
        spatial.update(0.5);
        assert_eq!(spatial.listener().velocity(), Vec3::ZERO);

        spatial.set_listener_position(Vec3::new(0.0, 0.0, 31.0));
        spatial.update(0.5);
        assert_eq!(spatial.listener().velocity(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_gain_volume_and_playing() {
        let mut spatial = system();
        spatial.add_source("a", Vec3::new(2.0, 0.0, 0.0)).unwrap();
        spatial.add_source("far", Vec3::new(150.0, 0.0, 0.0)).unwrap();
        spatial.update(1.0 / 60.0);

        assert!((spatial.source("a").unwrap().output().gain - 0.5).abs() < 1e-6);
        assert_eq!(spatial.source("far").unwrap().output().gain, 0.0);

        spatial.set_source_volume("a", 3.0).unwrap();
        assert_eq!(spatial.source("a").unwrap().volume(), 1.0);
        spatial.set_source_volume("a", 0.5).unwrap();
        spatial.update(1.0 / 60.0);
        assert!((spatial.source("a").unwrap().output().gain - 0.25).abs() < 1e-6);

        spatial.stop("a").unwrap();
        spatial.update(1.0 / 60.0);
        assert_eq!(spatial.source("a").unwrap().output().gain, 0.0);
        assert!(!spatial.source("a").unwrap().is_playing());
    }

    #[test]
    fn test_doppler_from_derived_motion() {
        let mut spatial = system();
        spatial.add_source("ship", Vec3::new(-50.0, 0.0, 0.0)).unwrap();
        spatial.update(0.1);

        // Moves 3.43 units toward the listener in 0.1s = 34.3 u/s
        spatial
            .set_source_position("ship", Vec3::new(-46.57, 0.0, 0.0))
            .unwrap();
        spatial.update(0.1);
        let doppler = spatial.source("ship").unwrap().output().doppler;
        assert!((doppler - 343.0 / 377.3).abs() < 1e-3);
    }

    #[test]
    fn test_physical_doppler_convention() {
        let mut spatial = SpatialAudioSystem::new(SpatialConfig {
            doppler_convention: crate::params::DopplerConvention::Physical,
            ..SpatialConfig::default()
        })
        .unwrap();
        spatial.add_source("ship", Vec3::new(-50.0, 0.0, 0.0)).unwrap();
        spatial.update(0.1);
        spatial
            .set_source_position("ship", Vec3::new(-46.57, 0.0, 0.0))
            .unwrap();
        spatial.update(0.1);
        let doppler = spatial.source("ship").unwrap().output().doppler;
        assert!((doppler - 343.0 / 308.7).abs() < 1e-3);
    }

    #[test]
    fn test_reverb_and_pan_outputs() {
        let mut spatial = system();
        spatial
            .add_zone(AudioZone::new("nebula", Vec3::new(20.0, 0.0, 0.0), 10.0, ReverbProfile::Nebula))
            .unwrap();
        assert!(matches!(
            spatial.add_zone(AudioZone::new("bad", Vec3::ZERO, 0.0, ReverbProfile::Hall)),
            Err(SpatialError::InvalidZoneRadius { .. })
        ));

        spatial.add_source("inside", Vec3::new(25.0, 0.0, 0.0)).unwrap();
        spatial.add_source("outside", Vec3::new(-25.0, 0.0, 0.0)).unwrap();
        spatial.update(1.0 / 60.0);

        let inside = spatial.source("inside").unwrap().output();
        let send = inside.reverb.unwrap();
        assert_eq!(spatial.zones()[send.zone].id, "nebula");
        assert!((send.mix - 0.5).abs() < 1e-6);
        assert!(inside.pan > 0.99);

        let outside = spatial.source("outside").unwrap().output();
        assert!(outside.reverb.is_none());
        assert!(outside.pan < -0.99);
    }

    #[test]
    fn test_listener_orientation_changes_pan() {
        let mut spatial = system();
        spatial.add_source("s", Vec3::new(5.0, 0.0, 0.0)).unwrap();

        // Face +X: source now straight ahead
        spatial.set_listener_orientation(Vec3::X, Vec3::Y);
        spatial.update(1.0 / 60.0);
        assert!(spatial.source("s").unwrap().output().pan.abs() < 1e-6);

        // Degenerate orientation ignored
        spatial.set_listener_orientation(Vec3::Y, Vec3::Y);
        assert_eq!(spatial.listener().forward(), Vec3::X);
    }

    #[test]
    fn test_binaural_replaces_previous_pair() {
        let mut spatial = system();
        spatial.start_binaural(200.0, 10.0).unwrap();
        spatial.start_binaural(150.0, 4.0).unwrap();

        let beat = spatial.binaural().unwrap();
        assert_eq!(beat.left_hz(), 150.0);
        assert_eq!(beat.right_hz(), 154.0);

        // A rejected start leaves the running pair alone
        assert!(spatial.start_binaural(100.0, 200.0).is_err());
        assert_eq!(spatial.binaural().unwrap().left_hz(), 150.0);

        spatial.stop_binaural();
        let mut out = vec![1.0; 64];
        spatial.render_binaural(&mut out, 44100.0);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut spatial = system();
        spatial.add_source("s", Vec3::new(3.0, 0.0, 0.0)).unwrap();
        spatial.update(1.0 / 60.0);
        spatial.set_source_position("s", Vec3::new(4.0, 0.0, 0.0)).unwrap();

        let before = spatial.sources().to_vec();
        let listener = spatial.listener().clone();
        spatial.update(0.0);
        assert_eq!(spatial.sources(), before.as_slice());
        assert_eq!(spatial.listener(), &listener);
    }
}
