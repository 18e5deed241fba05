//! Gravitational N-body simulation.

mod body;
mod system;

// Re-export public types
pub use body::{
    circular_orbit_speed, gravitational_force, BodyKind, Collision, PhysicsBody, MIN_SEPARATION,
};
pub use system::PhysicsSystem;
