//! N-body gravitational integrator.

use glam::Vec3;
use tracing::{debug, trace};

use super::body::{circular_orbit_speed, gravitational_force, Collision, PhysicsBody, MIN_SEPARATION};
use crate::error::{ConfigError, PhysicsError};
use crate::params::PhysicsConfig;

/// Body registry advanced with pairwise gravity and semi-implicit Euler.
///
/// O(n²) per step; meant for tens of bodies.
pub struct PhysicsSystem {
    config: PhysicsConfig,
    bodies: Vec<PhysicsBody>,
    /// Per-body acceleration scratch, reused every step
    accelerations: Vec<Vec3>,
    /// Overlapping pairs found by the last step
    collisions: Vec<Collision>,
}

impl PhysicsSystem {
    pub fn new(config: PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            "PhysicsSystem created: G = {}",
            config.gravitational_constant
        );
        Ok(Self {
            config,
            bodies: Vec::new(),
            accelerations: Vec::new(),
            collisions: Vec::new(),
        })
    }

    pub fn gravitational_constant(&self) -> f32 {
        self.config.gravitational_constant
    }

    /// Register a body; invalid mass/radius and duplicate ids are rejected
    pub fn add_body(&mut self, body: PhysicsBody) -> Result<(), PhysicsError> {
        body.validate()?;
        if self.index_of(&body.id).is_some() {
            return Err(PhysicsError::DuplicateBody(body.id));
        }
        debug!(
            "Body '{}' added: mass {}, radius {}, fixed {}",
            body.id, body.mass, body.radius, body.fixed
        );
        self.bodies.push(body);
        self.accelerations.push(Vec3::ZERO);
        Ok(())
    }

    pub fn remove_body(&mut self, id: &str) -> Result<PhysicsBody, PhysicsError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| PhysicsError::UnknownBody(id.to_string()))?;
        self.accelerations.pop();
        debug!("Body '{}' removed", id);
        Ok(self.bodies.remove(index))
    }

    pub fn body(&self, id: &str) -> Option<&PhysicsBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> &[PhysicsBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Collisions found by the most recent `update`
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    /// Advance every non-fixed body by `delta_time` seconds.
    ///
    /// Forces are summed from positions at the start of the step, then each
    /// body integrates `v += a·Δt` followed by `p += v·Δt`. Overlapping
    /// pairs are reported in [`collisions`](Self::collisions) and exert no
    /// force on each other. A non-positive `delta_time` is a no-op.
    pub fn update(&mut self, delta_time: f32) {
        if !(delta_time > 0.0) || !delta_time.is_finite() {
            return;
        }

        let g = self.config.gravitational_constant;
        self.collisions.clear();
        self.accelerations.fill(Vec3::ZERO);

        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                let offset = b.position - a.position;
                let distance = offset.length();

                if distance < a.radius + b.radius {
                    self.collisions.push(Collision {
                        first: a.id.clone(),
                        second: b.id.clone(),
                        distance,
                    });
                    continue;
                }
                if (a.fixed && b.fixed) || distance <= MIN_SEPARATION {
                    continue;
                }

                let force = gravitational_force(g, a.mass, b.mass, distance);
                let direction = offset / distance;
                if !a.fixed {
                    self.accelerations[i] += direction * (force / a.mass);
                }
                if !b.fixed {
                    self.accelerations[j] -= direction * (force / b.mass);
                }
            }
        }

        for (body, acceleration) in self.bodies.iter_mut().zip(&self.accelerations) {
            if body.fixed {
                continue;
            }
            body.velocity += *acceleration * delta_time;
            body.position += body.velocity * delta_time;
        }

        if !self.collisions.is_empty() {
            trace!("{} collisions this step", self.collisions.len());
        }
    }

    /// Force exerted on `body_id` by `other_id` (zero when overlapping or
    /// coincident)
    pub fn force_between(&self, body_id: &str, other_id: &str) -> Result<Vec3, PhysicsError> {
        let body = self
            .body(body_id)
            .ok_or_else(|| PhysicsError::UnknownBody(body_id.to_string()))?;
        let other = self
            .body(other_id)
            .ok_or_else(|| PhysicsError::UnknownBody(other_id.to_string()))?;

        let offset = other.position - body.position;
        let distance = offset.length();
        if distance < body.radius + other.radius || distance <= MIN_SEPARATION {
            return Ok(Vec3::ZERO);
        }
        let magnitude = gravitational_force(
            self.config.gravitational_constant,
            body.mass,
            other.mass,
            distance,
        );
        Ok(offset / distance * magnitude)
    }

    /// Give `body_id` the velocity of a circular orbit around `center_id`.
    ///
    /// Speed follows vis-viva, `sqrt(G·M/r)`; direction is perpendicular to
    /// the radius vector in the plane containing the world up axis (or the
    /// z axis when the radius is vertical). The center's own velocity is
    /// added so the orbit is relative to a moving center. Returns the
    /// assigned velocity.
    pub fn set_orbital_velocity(
        &mut self,
        body_id: &str,
        center_id: &str,
    ) -> Result<Vec3, PhysicsError> {
        let center = self
            .body(center_id)
            .ok_or_else(|| PhysicsError::UnknownBody(center_id.to_string()))?;
        let (center_position, center_velocity, center_mass) =
            (center.position, center.velocity, center.mass);

        let index = self
            .index_of(body_id)
            .ok_or_else(|| PhysicsError::UnknownBody(body_id.to_string()))?;

        let radius = self.bodies[index].position - center_position;
        let distance = radius.length();
        if distance <= MIN_SEPARATION {
            return Err(PhysicsError::DegenerateOrbit {
                body: body_id.to_string(),
                center: center_id.to_string(),
            });
        }

        let radial = radius / distance;
        let normal = if radial.cross(Vec3::Y).length_squared() > 1e-6 {
            Vec3::Y
        } else {
            Vec3::Z
        };
        let tangent = normal.cross(radial).normalize();
        let speed =
            circular_orbit_speed(self.config.gravitational_constant, center_mass, distance);
        let velocity = tangent * speed + center_velocity;

        self.bodies[index].velocity = velocity;
        debug!(
            "Body '{}' set to circular orbit around '{}': r = {:.3}, v = {:.3}",
            body_id, center_id, distance, speed
        );
        Ok(velocity)
    }

    /// Total kinetic energy of non-fixed bodies
    pub fn kinetic_energy(&self) -> f32 {
        self.bodies
            .iter()
            .filter(|b| !b.fixed)
            .map(PhysicsBody::kinetic_energy)
            .sum()
    }

    /// Total pairwise potential energy `-G·m1·m2/r`
    pub fn potential_energy(&self) -> f32 {
        let g = self.config.gravitational_constant;
        let mut total = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let distance = a.position.distance(b.position);
                if distance > MIN_SEPARATION {
                    total -= g * a.mass * b.mass / distance;
                }
            }
        }
        total
    }
}
