//! Errors surfaced by the host-facing API.
//!
//! The simulation step itself never fails; these only come back from calls
//! that look up entities or validate user-provided parameters.

use thiserror::Error;

/// Errors returned by host-facing physics calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// A configuration field is out of its valid range.
    #[error("invalid physics config: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// Body mass must be finite and strictly positive.
    #[error("invalid body mass {0}: must be finite and > 0")]
    InvalidMass(f32),

    /// The entity exists but lacks a component the call needs.
    #[cfg(feature = "ecs")]
    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: hecs::Entity,
        component: &'static str,
    },

    /// The entity handle is stale or was never spawned.
    #[cfg(feature = "ecs")]
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(hecs::Entity),
}

#[cfg(feature = "ecs")]
impl PhysicsError {
    /// Map a hecs lookup failure for `component` on `entity`.
    pub(crate) fn lookup(
        entity: hecs::Entity,
        component: &'static str,
        err: hecs::ComponentError,
    ) -> Self {
        match err {
            hecs::ComponentError::NoSuchEntity => PhysicsError::NoSuchEntity(entity),
            _ => PhysicsError::MissingComponent { entity, component },
        }
    }
}
