use anyhow::Context;
use glam::Vec2;
use naive_physics::{
    Body, Collider, ColliderShape, CollisionEvent, Constraint, DoubleSpring, PhysicsConfig,
    PhysicsWorld, Spring, Transform,
};

/// Host frame rate; the engine runs its own fixed tick underneath.
const FRAME_TIME: f32 = 1.0 / 60.0;
const SIMULATED_SECONDS: f32 = 10.0;
const JUMP_FORCE: f32 = 400.0;
/// A contact counts as ground if its normal points this far up.
const GROUND_NORMAL_Y: f32 = 0.5;
/// How long the player stays grounded after the last ground contact.
const GROUNDED_GRACE: f32 = 0.05;

struct Player {
    entity: hecs::Entity,
    last_grounded: f32,
    next_jump: f32,
}

impl Player {
    fn is_grounded(&self, now: f32) -> bool {
        now - self.last_grounded < GROUNDED_GRACE
    }
}

fn spawn_static(world: &mut hecs::World, shape: ColliderShape, position: Vec2) -> hecs::Entity {
    let transform = Transform::from_position(position);
    world.spawn((transform, Collider::at(shape, &transform)))
}

fn spawn_body(
    world: &mut hecs::World,
    shape: ColliderShape,
    position: Vec2,
    mass: f32,
) -> anyhow::Result<hecs::Entity> {
    let transform = Transform::from_position(position);
    let body = Body::try_new(mass).context("demo body")?;
    Ok(world.spawn((transform, Collider::at(shape, &transform).with_events(), body)))
}

fn build_scene(world: &mut hecs::World) -> anyhow::Result<Player> {
    // Ground and a raised platform
    spawn_static(world, ColliderShape::rect(40.0, 1.0), Vec2::new(0.0, -0.5));
    spawn_static(world, ColliderShape::rect(4.0, 0.5), Vec2::new(6.0, 3.0));
    spawn_static(
        world,
        ColliderShape::triangle(Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0), Vec2::new(2.0, 1.5)),
        Vec2::new(-6.0, 0.0),
    );

    let player = spawn_body(world, ColliderShape::rect(0.8, 1.6), Vec2::new(0.0, 2.0), 1.0)?;

    for i in 0..4 {
        let x = -3.0 + i as f32 * 1.2;
        spawn_body(world, ColliderShape::circle(0.4), Vec2::new(x, 5.0 + i as f32), 1.0)?;
    }

    // Pendulum hanging from a fixed pivot
    let bob = spawn_body(world, ColliderShape::circle(0.3), Vec2::new(10.0, 6.0), 1.0)?;
    world.spawn((
        Transform::from_xy(12.0, 8.0),
        Constraint::from(Spring::new(bob)),
    ));

    // Two boxes tied together
    let cart_a = spawn_body(world, ColliderShape::rect(1.0, 1.0), Vec2::new(-10.0, 1.0), 2.0)?;
    let cart_b = spawn_body(world, ColliderShape::rect(1.0, 1.0), Vec2::new(-12.0, 1.0), 2.0)?;
    world.spawn((Constraint::from(DoubleSpring::new(cart_a, cart_b).with_damping(0.5)),));

    Ok(Player {
        entity: player,
        last_grounded: f32::NEG_INFINITY,
        next_jump: 1.0,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = PhysicsConfig::default();
    config.validate().context("physics config")?;

    let mut world = hecs::World::new();
    let mut physics = PhysicsWorld::new(config);
    let mut player = build_scene(&mut world)?;

    log::info!(
        "scene: {} shapes, {} bodies, {} constraints",
        naive_physics::physics::shapes(&world).len(),
        naive_physics::physics::bodies(&world).len(),
        naive_physics::physics::constraints(&world).len(),
    );

    let mut time = 0.0f32;
    let mut frame = 0u32;
    while time < SIMULATED_SECONDS {
        if player.is_grounded(time) && time >= player.next_jump {
            physics.add_force(&mut world, player.entity, Vec2::new(20.0, JUMP_FORCE))?;
            player.next_jump = time + 2.0;
            log::info!("t={time:.2}: jump");
        }

        physics.step(&mut world, FRAME_TIME);
        time += FRAME_TIME;
        frame += 1;

        for contact in physics.contacts() {
            if contact.contains(player.entity)
                && contact.normal_for(player.entity).y > GROUND_NORMAL_Y
            {
                player.last_grounded = time;
            }
        }

        for event in physics.drain_events() {
            match event {
                CollisionEvent::Started { shape, other, contact } => {
                    log::debug!("t={time:.2}: {shape:?} hit {other:?} at {:?}", contact.position);
                }
                CollisionEvent::Stopped { shape, other } => {
                    log::debug!("t={time:.2}: {shape:?} left {other:?}");
                }
            }
        }

        if frame % 60 == 0 {
            let stats = physics.stats();
            let position = world
                .get::<&Transform>(player.entity)
                .map(|t| t.position)
                .context("player transform")?;
            log::info!(
                "t={time:.1}s player at ({:.2}, {:.2}), {} tests, {} contacts, {} springs",
                position.x,
                position.y,
                stats.pair_tests,
                stats.contacts,
                stats.active_springs,
            );
        }
    }

    for entity in naive_physics::physics::bodies(&world) {
        let velocity = physics.velocity(&world, entity)?;
        let position = world.get::<&Transform>(entity).map(|t| t.position)?;
        log::info!("{entity:?}: position {position:?}, velocity {velocity:?}");
    }

    Ok(())
}
