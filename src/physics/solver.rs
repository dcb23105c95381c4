//! Contact resolution: impulse and positional correction, one side at a time.

use crate::ecs::components::physics::{Body, Collider};
use crate::ecs::components::transform::Transform;

use super::contact::Contact;
use super::rigid_body::Counterpart;
use super::PhysicsConfig;

/// Snapshot of a participant's dynamics, or immovable if it has no body.
fn counterpart(world: &hecs::World, entity: hecs::Entity) -> Counterpart {
    world
        .get::<&Body>(entity)
        .map(|body| Counterpart::from(&*body))
        .unwrap_or(Counterpart::IMMOVABLE)
}

/// Resolve every contact in order.
///
/// Both participants of a contact see the other's state from before that
/// contact was resolved, so each side computes its half of the same impulse.
pub fn resolve_contacts(contacts: &[Contact], world: &mut hecs::World, config: &PhysicsConfig) {
    for contact in contacts {
        let snapshot_a = counterpart(world, contact.shape_a);
        let snapshot_b = counterpart(world, contact.shape_b);

        resolve_side(world, contact, contact.shape_a, snapshot_b, config);
        resolve_side(world, contact, contact.shape_b, snapshot_a, config);
    }
}

fn resolve_side(
    world: &mut hecs::World,
    contact: &Contact,
    entity: hecs::Entity,
    other: Counterpart,
    config: &PhysicsConfig,
) {
    let Ok((body, transform, collider)) =
        world.query_one_mut::<(&mut Body, &mut Transform, Option<&mut Collider>)>(entity)
    else {
        return;
    };

    let correction =
        body.resolve_collision(contact.normal_for(entity), contact.penetration, other, config);
    if correction != glam::Vec2::ZERO {
        transform.position += correction;
        if let Some(collider) = collider {
            collider.moved(transform);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::ColliderShape;
    use glam::Vec2;

    fn spawn_circle(world: &mut hecs::World, x: f32, velocity: Vec2, body: bool) -> hecs::Entity {
        let transform = Transform::from_xy(x, 0.0);
        let collider = Collider::at(ColliderShape::circle(1.0), &transform);
        if body {
            world.spawn((transform, collider, Body::new(1.0).with_velocity(velocity)))
        } else {
            world.spawn((transform, collider))
        }
    }

    fn contact(a: hecs::Entity, b: hecs::Entity) -> Contact {
        Contact {
            shape_a: a,
            shape_b: b,
            normal: Vec2::X,
            position: Vec2::new(0.75, 0.0),
            penetration: 0.5,
        }
    }

    #[test]
    fn test_equal_masses_bounce_apart() {
        let mut world = hecs::World::new();
        let config = PhysicsConfig::default();
        let a = spawn_circle(&mut world, 0.0, Vec2::new(1.0, 0.0), true);
        let b = spawn_circle(&mut world, 1.5, Vec2::new(-1.0, 0.0), true);

        resolve_contacts(&[contact(a, b)], &mut world, &config);

        let va = world.get::<&Body>(a).unwrap().velocity();
        let vb = world.get::<&Body>(b).unwrap().velocity();
        let separating = (vb - va).dot(Vec2::X);
        assert!((separating - 2.0 * config.restitution).abs() < 1e-5);

        // Pushed apart along the normal, symmetrically
        let xa = world.get::<&Transform>(a).unwrap().position.x;
        let xb = world.get::<&Transform>(b).unwrap().position.x;
        assert!(xa < 0.0);
        assert!(xb > 1.5);
        assert!((-xa - (xb - 1.5)).abs() < 1e-6);
    }

    #[test]
    fn test_collider_follows_correction() {
        let mut world = hecs::World::new();
        let config = PhysicsConfig::default();
        let a = spawn_circle(&mut world, 0.0, Vec2::new(1.0, 0.0), true);
        let b = spawn_circle(&mut world, 1.5, Vec2::ZERO, false);

        resolve_contacts(&[contact(a, b)], &mut world, &config);

        let position = world.get::<&Transform>(a).unwrap().position;
        assert_eq!(world.get::<&Collider>(a).unwrap().position(), position);
        // Scenery does not move
        assert_eq!(world.get::<&Transform>(b).unwrap().position.x, 1.5);
    }

    #[test]
    fn test_scenery_pair_is_noop() {
        let mut world = hecs::World::new();
        let a = spawn_circle(&mut world, 0.0, Vec2::ZERO, false);
        let b = spawn_circle(&mut world, 1.5, Vec2::ZERO, false);

        resolve_contacts(&[contact(a, b)], &mut world, &PhysicsConfig::default());

        assert_eq!(world.get::<&Transform>(a).unwrap().position.x, 0.0);
        assert_eq!(world.get::<&Transform>(b).unwrap().position.x, 1.5);
    }
}
