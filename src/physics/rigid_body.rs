//! Body integration and per-side collision response.

use glam::Vec2;

use crate::ecs::components::physics::{inverse_mass, Body, Collider};
use crate::ecs::components::transform::Transform;

use super::PhysicsConfig;

/// Mass and velocity of the other side of a contact, captured before either
/// side is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Counterpart {
    /// Zero (or anything at or below the mass epsilon) means immovable.
    pub mass: f32,
    pub velocity: Vec2,
}

impl Counterpart {
    /// A shape without a body: no velocity, infinite mass.
    pub const IMMOVABLE: Counterpart = Counterpart {
        mass: 0.0,
        velocity: Vec2::ZERO,
    };
}

impl From<&Body> for Counterpart {
    fn from(body: &Body) -> Self {
        Self {
            mass: body.mass,
            velocity: body.velocity,
        }
    }
}

impl Body {
    /// Advance one fixed step with semi-implicit Euler and return the displacement.
    ///
    /// Gravity and the raw accumulated force are summed into the acceleration
    /// (the force is not divided by mass), drag decays the velocity, the
    /// speed is clamped, and the force accumulator is cleared.
    pub fn integrate(&mut self, config: &PhysicsConfig, dt: f32) -> Vec2 {
        let acceleration = config.gravity + self.force_accumulator;
        self.force_accumulator = Vec2::ZERO;

        self.velocity += acceleration * dt;
        self.velocity -= self.velocity * dt * config.drag;

        // Friction is not modelled.

        self.velocity = self.velocity.clamp_length_max(config.max_velocity);

        self.velocity * dt
    }

    /// Resolve this body's side of a contact and return its position correction.
    ///
    /// `normal` is the contact normal as seen by this body (pointing away from
    /// the other shape). Only this body's velocity changes; the caller resolves
    /// the other side separately with the same snapshot.
    pub fn resolve_collision(
        &mut self,
        normal: Vec2,
        penetration: f32,
        other: Counterpart,
        config: &PhysicsConfig,
    ) -> Vec2 {
        let relative_velocity = other.velocity - self.velocity;
        let velocity_along_normal = relative_velocity.dot(normal);

        // Already separating or resting
        if velocity_along_normal <= 0.0 {
            return Vec2::ZERO;
        }

        // The mass epsilon applies to the other side only
        let inv_mass = self.inverse_mass();
        let inv_mass_sum = inv_mass + inverse_mass(other.mass);
        if inv_mass_sum <= 0.0 {
            return Vec2::ZERO;
        }

        let impulse = -(1.0 + config.restitution) * velocity_along_normal / inv_mass_sum;
        self.velocity -= impulse * normal * inv_mass;
        self.velocity = self.velocity.clamp_length_max(config.max_velocity);

        normal * (penetration / inv_mass_sum) * config.position_correction * inv_mass
    }
}

/// Integrate every body and move its transform, refreshing the collider if present.
pub fn integrate_bodies(world: &mut hecs::World, config: &PhysicsConfig, dt: f32) {
    for (_, (body, transform, collider)) in
        world.query_mut::<(&mut Body, &mut Transform, Option<&mut Collider>)>()
    {
        transform.position += body.integrate(config, dt);
        if let Some(collider) = collider {
            collider.moved(transform);
        }
    }
}
