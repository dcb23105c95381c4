//! Entity Component System integration with hecs.

pub mod components;
pub mod systems;

pub mod prelude {
    pub use super::components::*;
    #[cfg(feature = "physics")]
    pub use super::systems::collider_sync_system;
}
