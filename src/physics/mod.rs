//! CPU 2-D physics: shapes, bodies, springs and contact resolution.
//!
//! # Architecture
//!
//! The pipeline runs in a fixed timestep loop. Each tick:
//!
//! 1. Refresh collider bounds for entities the host moved
//! 2. Tick spring constraints (forces into body accumulators)
//! 3. Integrate bodies (semi-implicit Euler, drag, velocity clamp)
//! 4. Broadphase (sweep and prune on x)
//! 5. Narrowphase (per shape-kind pair)
//! 6. Resolve contacts (impulse plus positional correction, per side)
//! 7. Record start/stop collision events
//!
//! Contacts are rebuilt from scratch every tick; nothing persists between
//! ticks except body state, spring state and the set of touching pairs.

pub mod broadphase;
pub mod collider;
pub mod constraint;
pub mod contact;
pub mod debug;
pub mod narrowphase;
pub mod rigid_body;
pub mod solver;

use std::collections::BTreeSet;

use glam::Vec2;
use tracing::trace;

use crate::ecs::components::physics::{Body, Collider, Constraint};
use crate::ecs::components::transform::Transform;
use crate::ecs::systems::collider_sync_system;
use crate::error::PhysicsError;

use self::broadphase::SweepAndPrune;
use self::contact::Contact;
use self::debug::DebugDraw;

/// Configuration for the physics simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Constant acceleration. Default: (0, -9.82).
    pub gravity: Vec2,
    /// Velocity decay per second. Default: 0.3.
    pub drag: f32,
    /// Bounce coefficient in [0, 1]. Default: 0.99.
    pub restitution: f32,
    /// Fraction of penetration corrected per contact, in [0, 1). Default: 0.3.
    pub position_correction: f32,
    /// Speed limit applied after integration. Default: 100.
    pub max_velocity: f32,
    /// Seconds per fixed tick. Default: 0.02.
    pub fixed_timestep: f32,
    /// Maximum number of fixed ticks per [`PhysicsWorld::step`]. Default: 4.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.82),
            drag: 0.3,
            restitution: 0.99,
            position_correction: 0.3,
            max_velocity: 100.0,
            fixed_timestep: 0.02,
            max_substeps: 4,
        }
    }
}

impl PhysicsConfig {
    /// Check every field is finite and within range.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let invalid = |field, reason| Err(PhysicsError::InvalidConfig { field, reason });

        if !self.gravity.is_finite() {
            return invalid("gravity", "must be finite");
        }
        if !self.drag.is_finite() || self.drag < 0.0 {
            return invalid("drag", "must be finite and >= 0");
        }
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return invalid("fixed_timestep", "must be finite and > 0");
        }
        // Past this the drag term flips the velocity every tick
        if self.drag * self.fixed_timestep > 1.0 {
            return invalid("drag", "times fixed_timestep must be <= 1");
        }
        if self.max_substeps == 0 {
            return invalid("max_substeps", "must be > 0");
        }
        if !self.max_velocity.is_finite() || self.max_velocity <= 0.0 {
            return invalid("max_velocity", "must be finite and > 0");
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return invalid("restitution", "must be in [0, 1]");
        }
        if !(0.0..1.0).contains(&self.position_correction) {
            return invalid("position_correction", "must be in [0, 1)");
        }
        Ok(())
    }
}

/// Counters from the most recent fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Entities with a collider.
    pub shapes: usize,
    /// Pairwise bounds tests made by the broadphase.
    pub pair_tests: usize,
    /// Pairs handed to the narrowphase.
    pub candidate_pairs: usize,
    /// Contacts found by the narrowphase.
    pub contacts: usize,
    /// Springs that are not broken.
    pub active_springs: usize,
    /// Springs that broke during this tick.
    pub broken_springs: usize,
}

/// Start/stop notification for colliders created with [`Collider::with_events`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEvent {
    /// `shape` began touching `other` this tick.
    Started {
        shape: hecs::Entity,
        other: hecs::Entity,
        contact: Contact,
    },
    /// `shape` stopped touching `other` this tick.
    Stopped {
        shape: hecs::Entity,
        other: hecs::Entity,
    },
}

impl CollisionEvent {
    /// The shape the event is addressed to.
    pub fn shape(&self) -> hecs::Entity {
        match self {
            CollisionEvent::Started { shape, .. } | CollisionEvent::Stopped { shape, .. } => *shape,
        }
    }
}

/// Order-independent key for a touching pair.
fn pair_key(a: hecs::Entity, b: hecs::Entity) -> (hecs::Entity, hecs::Entity) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn reports_events(world: &hecs::World, entity: hecs::Entity) -> bool {
    world
        .get::<&Collider>(entity)
        .map(|collider| collider.report_events)
        .unwrap_or(false)
}

/// The physics world: owns per-tick scratch state, not the entities.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f32,
    broadphase: SweepAndPrune,
    contacts: Vec<Contact>,
    stats: StepStats,
    touching: BTreeSet<(hecs::Entity, hecs::Entity)>,
    events: Vec<CollisionEvent>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            broadphase: SweepAndPrune::new(),
            contacts: Vec::new(),
            stats: StepStats::default(),
            touching: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Step the simulation forward by `delta_time` seconds.
    ///
    /// Runs as many fixed ticks as the accumulated time allows, up to
    /// `max_substeps`. Returns the number of ticks run.
    pub fn step(&mut self, world: &mut hecs::World, delta_time: f32) -> u32 {
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.fixed_step(world);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f32 {
            self.accumulator = 0.0;
        }

        substeps
    }

    /// Run exactly one fixed tick.
    pub fn fixed_step(&mut self, world: &mut hecs::World) {
        let dt = self.config.fixed_timestep;

        // 1. Pick up host moves
        collider_sync_system(world);

        // 2. Springs
        let springs = constraint::tick_constraints(world);

        // 3. Integrate bodies
        rigid_body::integrate_bodies(world, &self.config, dt);

        // 4. Broadphase
        let candidates = self.broadphase.find_pairs(world);

        // 5. Narrowphase
        self.contacts.clear();
        for &(entity_a, entity_b) in &candidates.pairs {
            let (Ok(a), Ok(b)) = (
                world.get::<&Collider>(entity_a),
                world.get::<&Collider>(entity_b),
            ) else {
                continue;
            };
            if let Some(contact) = narrowphase::overlaps(entity_a, &a, entity_b, &b) {
                self.contacts.push(contact);
            }
        }

        // 6. Resolve
        solver::resolve_contacts(&self.contacts, world, &self.config);

        // 7. Events
        self.record_events(world);

        self.stats = StepStats {
            shapes: world.query::<&Collider>().iter().count(),
            pair_tests: candidates.tests,
            candidate_pairs: candidates.pairs.len(),
            contacts: self.contacts.len(),
            active_springs: world
                .query::<&Constraint>()
                .iter()
                .filter(|(_, constraint)| !constraint.is_broken())
                .count(),
            broken_springs: springs.broke,
        };
        trace!(stats = ?self.stats, "physics tick");
    }

    fn record_events(&mut self, world: &hecs::World) {
        let mut touching = BTreeSet::new();

        for contact in &self.contacts {
            let key = pair_key(contact.shape_a, contact.shape_b);
            if !touching.insert(key) || self.touching.contains(&key) {
                continue;
            }
            for (shape, other) in [
                (contact.shape_a, contact.shape_b),
                (contact.shape_b, contact.shape_a),
            ] {
                if reports_events(world, shape) {
                    self.events.push(CollisionEvent::Started {
                        shape,
                        other,
                        contact: *contact,
                    });
                }
            }
        }

        for &(a, b) in self.touching.difference(&touching) {
            for (shape, other) in [(a, b), (b, a)] {
                if reports_events(world, shape) {
                    self.events.push(CollisionEvent::Stopped { shape, other });
                }
            }
        }

        self.touching = touching;
    }

    /// Contacts found during the last tick.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Counters from the last tick.
    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Take all collision events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Test two entities' colliders for overlap without stepping.
    pub fn overlaps_entities(
        &self,
        world: &hecs::World,
        a: hecs::Entity,
        b: hecs::Entity,
    ) -> Result<Option<Contact>, PhysicsError> {
        let collider_a = world
            .get::<&Collider>(a)
            .map_err(|e| PhysicsError::lookup(a, "Collider", e))?;
        let collider_b = world
            .get::<&Collider>(b)
            .map_err(|e| PhysicsError::lookup(b, "Collider", e))?;
        Ok(narrowphase::overlaps(a, &collider_a, b, &collider_b))
    }

    /// Add a force to an entity's body, consumed by the next tick.
    pub fn add_force(
        &self,
        world: &mut hecs::World,
        entity: hecs::Entity,
        force: Vec2,
    ) -> Result<(), PhysicsError> {
        let mut body = world
            .get::<&mut Body>(entity)
            .map_err(|e| PhysicsError::lookup(entity, "Body", e))?;
        body.add_force(force);
        Ok(())
    }

    /// Current velocity of an entity's body.
    pub fn velocity(
        &self,
        world: &hecs::World,
        entity: hecs::Entity,
    ) -> Result<Vec2, PhysicsError> {
        world
            .get::<&Body>(entity)
            .map(|body| body.velocity())
            .map_err(|e| PhysicsError::lookup(entity, "Body", e))
    }

    /// Teleport an entity and refresh its collider immediately.
    pub fn move_to(
        &self,
        world: &mut hecs::World,
        entity: hecs::Entity,
        position: Vec2,
    ) -> Result<(), PhysicsError> {
        let (transform, collider) = world
            .query_one_mut::<(&mut Transform, Option<&mut Collider>)>(entity)
            .map_err(|e| match e {
                hecs::QueryOneError::NoSuchEntity => PhysicsError::NoSuchEntity(entity),
                hecs::QueryOneError::Unsatisfied => PhysicsError::MissingComponent {
                    entity,
                    component: "Transform",
                },
            })?;
        transform.position = position;
        if let Some(collider) = collider {
            collider.moved(transform);
        }
        Ok(())
    }

    /// Draw the last tick's contacts together with all shapes and springs.
    pub fn debug_draw(&self, world: &hecs::World, draw: &mut impl DebugDraw) {
        debug::draw_debug(world, &self.contacts, draw);
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// All entities with a collider.
pub fn shapes(world: &hecs::World) -> Vec<hecs::Entity> {
    world.query::<&Collider>().iter().map(|(e, _)| e).collect()
}

/// All entities with a body.
pub fn bodies(world: &hecs::World) -> Vec<hecs::Entity> {
    world.query::<&Body>().iter().map(|(e, _)| e).collect()
}

/// All entities with a spring constraint.
pub fn constraints(world: &hecs::World) -> Vec<hecs::Entity> {
    world.query::<&Constraint>().iter().map(|(e, _)| e).collect()
}
