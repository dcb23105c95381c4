//! Physics components for ECS entities.

use glam::Vec2;

use crate::error::PhysicsError;
use crate::physics::collider::{Aabb, ColliderGeometry};

/// Masses at or below this are treated as immovable when they belong to the
/// other side of a contact.
pub const MASS_EPSILON: f32 = 0.0001;

/// Dynamics state attached to an entity that also carries a [`Collider`].
///
/// Entities with a collider but no body are immovable scenery.
#[derive(Debug, Clone)]
pub struct Body {
    pub mass: f32,
    pub(crate) velocity: Vec2,
    pub(crate) force_accumulator: Vec2,
}

impl Body {
    /// Create a body with the given mass. The mass is not validated.
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            velocity: Vec2::ZERO,
            force_accumulator: Vec2::ZERO,
        }
    }

    /// Create a body, rejecting non-finite or non-positive masses.
    pub fn try_new(mass: f32) -> Result<Self, PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }
        Ok(Self::new(mass))
    }

    /// Start with an initial velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Current velocity.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Force accumulated since the last integration.
    #[inline]
    pub fn force(&self) -> Vec2 {
        self.force_accumulator
    }

    /// Add a force, consumed by the next integration step.
    #[inline]
    pub fn add_force(&mut self, force: Vec2) {
        self.force_accumulator += force;
    }

    /// Inverse of this body's own mass.
    ///
    /// No epsilon here: a light body still reacts to contacts. Only a
    /// non-positive mass (possible through [`Body::new`]) yields zero.
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Inverse of `mass`, or zero when the mass is too small to push back.
#[inline]
pub fn inverse_mass(mass: f32) -> f32 {
    if mass <= MASS_EPSILON {
        0.0
    } else {
        1.0 / mass
    }
}

/// Collider shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box centred on the entity position.
    Box { half_extents: Vec2 },
    /// Circle centred on the entity position.
    Circle { radius: f32 },
    /// Triangle with corners in entity-local space.
    Triangle { corners: [Vec2; 3] },
}

impl ColliderShape {
    /// Box from its full width and height.
    pub fn rect(width: f32, height: f32) -> Self {
        ColliderShape::Box {
            half_extents: Vec2::new(width, height) * 0.5,
        }
    }

    pub fn circle(radius: f32) -> Self {
        ColliderShape::Circle { radius }
    }

    pub fn triangle(a: Vec2, b: Vec2, c: Vec2) -> Self {
        ColliderShape::Triangle { corners: [a, b, c] }
    }

    /// Short kind name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ColliderShape::Box { .. } => "box",
            ColliderShape::Circle { .. } => "circle",
            ColliderShape::Triangle { .. } => "triangle",
        }
    }
}

/// Collision shape component with cached world-space geometry.
///
/// The cache is refreshed through [`Collider::sync`] / [`Collider::moved`];
/// until the first refresh the shape sits at the origin. Change the shape
/// with [`Collider::set_shape`] so the cache follows.
#[derive(Debug, Clone)]
pub struct Collider {
    pub(crate) shape: ColliderShape,
    /// If true, start/stop collision events are recorded for this shape.
    pub report_events: bool,
    pub(crate) geometry: ColliderGeometry,
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        let geometry = ColliderGeometry::unsynced(&shape);
        Self {
            shape,
            report_events: false,
            geometry,
        }
    }

    /// Create a collider already placed at `transform`.
    pub fn at(shape: ColliderShape, transform: &super::Transform) -> Self {
        let mut collider = Self::new(shape);
        collider.moved(transform);
        collider
    }

    #[inline]
    pub fn shape(&self) -> &ColliderShape {
        &self.shape
    }

    /// Opt in to collision start/stop events.
    pub fn with_events(mut self) -> Self {
        self.report_events = true;
        self
    }

    /// Cached world-space bounds.
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.geometry.bounds
    }

    /// World-space position of the owning entity at the last refresh.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.geometry.position
    }
}

/// Lifecycle of a spring constraint. `Broken` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpringState {
    #[default]
    Active,
    Broken,
}

/// Spring between the constraint entity's position and one body.
#[derive(Debug, Clone)]
pub struct Spring {
    pub body: hecs::Entity,
    /// Hooke coefficient k.
    pub stiffness: f32,
    /// Velocity damping coefficient.
    pub damping: f32,
    /// Resultant force magnitude above which the spring snaps.
    pub break_force: Option<f32>,
    /// Debug-draw color while intact.
    pub color: [f32; 3],
    pub(crate) rest_length: Option<f32>,
    pub(crate) state: SpringState,
}

impl Spring {
    pub const DEFAULT_STIFFNESS: f32 = 50.0;
    pub const DEFAULT_DAMPING: f32 = 1.5;
    pub const DEFAULT_BREAK_FORCE: f32 = 200.0;

    pub fn new(body: hecs::Entity) -> Self {
        Self {
            body,
            stiffness: Self::DEFAULT_STIFFNESS,
            damping: Self::DEFAULT_DAMPING,
            break_force: Some(Self::DEFAULT_BREAK_FORCE),
            color: [1.0, 0.0, 0.0],
            rest_length: None,
            state: SpringState::Active,
        }
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_break_force(mut self, break_force: Option<f32>) -> Self {
        self.break_force = break_force;
        self
    }

    /// Fix the rest length instead of capturing it on activation.
    pub fn with_rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = Some(rest_length);
        self
    }

    pub fn rest_length(&self) -> Option<f32> {
        self.rest_length
    }

    pub fn state(&self) -> SpringState {
        self.state
    }
}

/// Spring connecting two bodies, applying equal and opposite forces.
#[derive(Debug, Clone)]
pub struct DoubleSpring {
    pub body_a: hecs::Entity,
    pub body_b: hecs::Entity,
    pub stiffness: f32,
    /// Damping on the relative velocity along the spring axis.
    pub damping: f32,
    pub break_force: Option<f32>,
    pub color: [f32; 3],
    pub(crate) rest_length: Option<f32>,
    pub(crate) state: SpringState,
}

impl DoubleSpring {
    pub fn new(body_a: hecs::Entity, body_b: hecs::Entity) -> Self {
        Self {
            body_a,
            body_b,
            stiffness: Spring::DEFAULT_STIFFNESS,
            damping: 0.0,
            break_force: None,
            color: [1.0, 1.0, 0.0],
            rest_length: None,
            state: SpringState::Active,
        }
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_break_force(mut self, break_force: Option<f32>) -> Self {
        self.break_force = break_force;
        self
    }

    pub fn with_rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = Some(rest_length);
        self
    }

    pub fn rest_length(&self) -> Option<f32> {
        self.rest_length
    }

    pub fn state(&self) -> SpringState {
        self.state
    }
}

/// Force generator ticked before body integration.
#[derive(Debug, Clone)]
pub enum Constraint {
    Spring(Spring),
    DoubleSpring(DoubleSpring),
}

impl Constraint {
    pub fn state(&self) -> SpringState {
        match self {
            Constraint::Spring(s) => s.state,
            Constraint::DoubleSpring(s) => s.state,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.state() == SpringState::Broken
    }
}

impl From<Spring> for Constraint {
    fn from(spring: Spring) -> Self {
        Constraint::Spring(spring)
    }
}

impl From<DoubleSpring> for Constraint {
    fn from(spring: DoubleSpring) -> Self {
        Constraint::DoubleSpring(spring)
    }
}
