//! Massive bodies and the pairwise force law.

use glam::Vec3;

use crate::error::PhysicsError;

/// Separations at or below this are treated as coincident
pub const MIN_SEPARATION: f32 = 1e-6;

/// What a body represents in the scene (informational only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BodyKind {
    Star,
    Planet,
    Moon,
    Asteroid,
    Comet,
    #[default]
    Generic,
}

/// A gravitating body.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub id: String,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Strictly positive
    pub mass: f32,
    /// Non-negative collision radius
    pub radius: f32,
    /// Fixed bodies pull on others but never move
    pub fixed: bool,
    pub kind: BodyKind,
}

impl PhysicsBody {
    pub fn new(id: impl Into<String>, position: Vec3, mass: f32) -> Self {
        Self {
            id: id.into(),
            position,
            velocity: Vec3::ZERO,
            mass,
            radius: 0.0,
            fixed: false,
            kind: BodyKind::default(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Reject non-positive mass and negative radius
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(PhysicsError::InvalidMass {
                id: self.id.clone(),
                mass: self.mass,
            });
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(PhysicsError::InvalidRadius {
                id: self.id.clone(),
                radius: self.radius,
            });
        }
        Ok(())
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

/// Newtonian force magnitude `G·m1·m2/r²`; zero for coincident bodies
pub fn gravitational_force(g: f32, m1: f32, m2: f32, distance: f32) -> f32 {
    if distance <= MIN_SEPARATION {
        return 0.0;
    }
    g * m1 * m2 / (distance * distance)
}

/// Circular orbit speed from the vis-viva relation `sqrt(G·M/r)`
pub fn circular_orbit_speed(g: f32, center_mass: f32, distance: f32) -> f32 {
    if distance <= MIN_SEPARATION {
        return 0.0;
    }
    (g * center_mass / distance).sqrt()
}

/// Two bodies found overlapping during one step
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub first: String,
    pub second: String,
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_magnitude() {
        // 0.1 * 10 * 20 / 5² = 0.8
        assert!((gravitational_force(0.1, 10.0, 20.0, 5.0) - 0.8).abs() < 1e-6);
        assert_eq!(gravitational_force(0.1, 10.0, 20.0, 0.0), 0.0);
    }

    #[test]
    fn test_orbit_speed() {
        // sqrt(0.1 * 100 / 10) = 1.0
        assert!((circular_orbit_speed(0.1, 100.0, 10.0) - 1.0).abs() < 1e-6);
        assert_eq!(circular_orbit_speed(0.1, 100.0, 0.0), 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(PhysicsBody::new("a", Vec3::ZERO, 1.0).validate().is_ok());
        assert!(matches!(
            PhysicsBody::new("a", Vec3::ZERO, 0.0).validate(),
            Err(PhysicsError::InvalidMass { .. })
        ));
        assert!(matches!(
            PhysicsBody::new("a", Vec3::ZERO, -3.0).validate(),
            Err(PhysicsError::InvalidMass { .. })
        ));
        assert!(matches!(
            PhysicsBody::new("a", Vec3::ZERO, 1.0)
                .with_radius(-1.0)
                .validate(),
            Err(PhysicsError::InvalidRadius { .. })
        ));
        assert!(PhysicsBody::new("a", Vec3::ZERO, f32::NAN).validate().is_err());
    }
}
