//! Scene builders shared by the physics benchmarks.

use glam::Vec2;
use naive_physics::{Body, Collider, ColliderShape, PhysicsConfig, PhysicsWorld, Transform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn spawn(
    world: &mut hecs::World,
    shape: ColliderShape,
    position: Vec2,
    body: bool,
) -> hecs::Entity {
    let transform = Transform::from_position(position);
    let collider = Collider::at(shape, &transform);
    if body {
        world.spawn((transform, collider, Body::new(1.0)))
    } else {
        world.spawn((transform, collider))
    }
}

/// `n` unit circles packed on a square grid with neighbours overlapping.
pub fn setup_circle_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    let side = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let position = Vec2::new((i % side) as f32 * 1.8, (i / side) as f32 * 1.8);
        spawn(&mut world, ColliderShape::circle(1.0), position, false);
    }
    world
}

/// `n` random circles, boxes and triangles in a square of side `extent`.
pub fn setup_mixed_world(n: usize, extent: f32) -> hecs::World {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut world = hecs::World::new();
    for _ in 0..n {
        let position = Vec2::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent));
        let shape = match rng.gen_range(0..3) {
            0 => ColliderShape::circle(rng.gen_range(0.2..1.0)),
            1 => ColliderShape::rect(rng.gen_range(0.4..2.0), rng.gen_range(0.4..2.0)),
            _ => ColliderShape::triangle(
                Vec2::new(-0.5, -0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(0.0, 0.6),
            ),
        };
        spawn(&mut world, shape, position, false);
    }
    world
}

/// `n` mixed shapes spread so that almost nothing overlaps.
pub fn setup_sparse_world(n: usize) -> hecs::World {
    setup_mixed_world(n, n as f32 * 4.0)
}

/// Falling circles above a wide static floor, ready to step.
pub fn setup_scene(n: usize) -> (hecs::World, PhysicsWorld) {
    let mut world = hecs::World::new();
    let side = (n as f32).sqrt().ceil() as usize;

    spawn(
        &mut world,
        ColliderShape::rect(side as f32 * 3.0 + 10.0, 1.0),
        Vec2::new(side as f32 * 1.5, -1.0),
        false,
    );
    for i in 0..n {
        let position = Vec2::new((i % side) as f32 * 1.5, 1.0 + (i / side) as f32 * 1.5);
        spawn(&mut world, ColliderShape::circle(0.5), position, true);
    }

    (world, PhysicsWorld::new(PhysicsConfig::default()))
}
