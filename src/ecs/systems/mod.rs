//! ECS systems (collider bounds refresh).

#[cfg(feature = "physics")]
pub mod bounds;

#[cfg(feature = "physics")]
pub use bounds::collider_sync_system;
