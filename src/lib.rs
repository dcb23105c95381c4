//! Naive 2-D Physics
//!
//! A small rigid-body engine for arcade-style 2-D games: axis-aligned boxes,
//! circles and triangles, translational bodies, and spring constraints.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **math** - Segment and triangle geometry helpers
//! 2. **error** - Errors returned by host-facing calls
//! 3. **ecs** - hecs components and systems (feature = "ecs")
//! 4. **physics** - Broadphase, narrowphase, integration, springs (feature = "physics")
//!
//! Scene entities live in a host-owned `hecs::World`; the engine reads and
//! writes their `Transform`, `Collider`, `Body` and `Constraint` components
//! once per fixed tick through [`PhysicsWorld`].

pub mod error;
pub mod math;

#[cfg(feature = "ecs")]
pub mod ecs;

#[cfg(feature = "physics")]
pub mod physics;

pub use error::PhysicsError;

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

#[cfg(feature = "physics")]
pub use physics::{
    contact::Contact, debug::DebugDraw, CollisionEvent, PhysicsConfig, PhysicsWorld, StepStats,
};

// Re-export glam for convenience
pub use glam;
