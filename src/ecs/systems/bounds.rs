//! Collider bounds refresh system.

use crate::ecs::components::physics::Collider;
use crate::ecs::components::transform::Transform;

/// Refresh cached collider geometry for every entity whose transform changed.
///
/// Edge-triggered: colliders already synced to their current transform are
/// left alone. Returns how many colliders were refreshed.
pub fn collider_sync_system(world: &mut hecs::World) -> usize {
    let mut refreshed = 0;
    for (_, (transform, collider)) in world.query_mut::<(&Transform, &mut Collider)>() {
        if collider.sync(transform) {
            refreshed += 1;
        }
    }
    refreshed
}
