//! One-frame orchestration of the four engines.

use tracing::{debug, trace, warn};

use crate::audio::{AnalysisSnapshot, AudioFrame, FeatureExtractor};
use crate::error::{ConfigError, PhysicsError, PipelineError};
use crate::mood::MoodPredictor;
use crate::params::SimulationConfig;
use crate::particles::ParticleSystem;
use crate::physics::PhysicsSystem;
use crate::spatial::SpatialAudioSystem;

/// An audio source that follows a physics body every frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub source: String,
    pub body: String,
}

/// Owns the extractor, particle, physics and spatial engines and runs them
/// in a fixed order once per display frame:
///
/// 1. extract features from the frame (silence when none is available)
/// 2. let the mood predictor, if any, pick the particle emotion
/// 3. step the N-body simulation
/// 4. copy attached bodies' positions into their audio sources
/// 5. step the particles with this frame's features
/// 6. recompute spatial audio outputs
pub struct CosmicPipeline {
    extractor: FeatureExtractor,
    particles: ParticleSystem,
    physics: PhysicsSystem,
    spatial: SpatialAudioSystem,
    attachments: Vec<Attachment>,
    mood: Option<Box<dyn MoodPredictor>>,
    frames: u64,
}

impl CosmicPipeline {
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pipeline = Self {
            extractor: FeatureExtractor::new(config.analysis.clone())?,
            particles: ParticleSystem::new(config.particles.clone())?,
            physics: PhysicsSystem::new(config.physics.clone())?,
            spatial: SpatialAudioSystem::new(config.spatial.clone())?,
            attachments: Vec::new(),
            mood: None,
            frames: 0,
        };
        debug!("CosmicPipeline created");
        Ok(pipeline)
    }

    /// Inject a mood predictor consulted every frame
    pub fn with_mood(mut self, predictor: Box<dyn MoodPredictor>) -> Self {
        self.mood = Some(predictor);
        self
    }

    pub fn set_mood(&mut self, predictor: Option<Box<dyn MoodPredictor>>) {
        self.mood = predictor;
    }

    /// Make `source_id` follow `body_id`. The source is moved onto the body
    /// immediately without picking up a velocity.
    pub fn attach_source_to_body(
        &mut self,
        source_id: &str,
        body_id: &str,
    ) -> Result<(), PipelineError> {
        let position = self
            .physics
            .body(body_id)
            .ok_or_else(|| PhysicsError::UnknownBody(body_id.to_string()))?
            .position;
        self.spatial.warp_source(source_id, position)?;

        self.attachments.retain(|a| a.source != source_id);
        self.attachments.push(Attachment {
            source: source_id.to_string(),
            body: body_id.to_string(),
        });
        debug!("Audio source '{}' attached to body '{}'", source_id, body_id);
        Ok(())
    }

    /// Stop `source_id` following its body. Returns whether it was attached.
    pub fn detach_source(&mut self, source_id: &str) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| a.source != source_id);
        before != self.attachments.len()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Run one frame and return its features.
    ///
    /// `input` is `None` while no audio is available. `now_ms` is the
    /// caller's clock, `delta_time` the frame duration in seconds; a
    /// non-positive `delta_time` leaves every engine untouched.
    pub fn frame(
        &mut self,
        input: Option<&AudioFrame>,
        now_ms: f64,
        delta_time: f32,
    ) -> &AnalysisSnapshot {
        let features = self.extractor.extract(input, now_ms);

        if let Some(emotion) = self.mood.as_mut().and_then(|m| m.predict(features)) {
            self.particles.set_emotion(emotion);
        }

        self.physics.update(delta_time);

        let physics = &self.physics;
        let spatial = &mut self.spatial;
        self.attachments.retain(|a| {
            let Some(body) = physics.body(&a.body) else {
                warn!("Body '{}' is gone, detaching source '{}'", a.body, a.source);
                return false;
            };
            if spatial.set_source_position(&a.source, body.position).is_err() {
                warn!("Source '{}' is gone, detaching from '{}'", a.source, a.body);
                return false;
            }
            true
        });

        self.particles.update(delta_time, features);
        self.spatial.update(delta_time);

        self.frames += 1;
        trace!(
            "frame {}: bass={:.2} mid={:.2} treble={:.2} beat={} tempo={}",
            self.frames,
            features.bass,
            features.mid,
            features.treble,
            features.beat,
            features.tempo
        );
        features
    }

    /// Features from the last frame
    pub fn features(&self) -> &AnalysisSnapshot {
        self.extractor.latest()
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn extractor_mut(&mut self) -> &mut FeatureExtractor {
        &mut self.extractor
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSystem {
        &mut self.particles
    }

    pub fn physics(&self) -> &PhysicsSystem {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsSystem {
        &mut self.physics
    }

    pub fn spatial(&self) -> &SpatialAudioSystem {
        &self.spatial
    }

    pub fn spatial_mut(&mut self) -> &mut SpatialAudioSystem {
        &mut self.spatial
    }
}
