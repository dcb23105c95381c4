//! Broadphase collision culling: one-axis sweep and prune.

use crate::ecs::components::physics::Collider;

use super::collider::Aabb;

/// One end of a shape's x-interval.
#[derive(Debug, Clone, Copy)]
struct Endpoint {
    x: f32,
    /// Index into the entry list.
    index: usize,
    is_left: bool,
}

/// Candidate pairs from one broadphase pass.
#[derive(Debug, Clone, Default)]
pub struct BroadphaseResult {
    /// Pairs whose full bounds overlap.
    pub pairs: Vec<(hecs::Entity, hecs::Entity)>,
    /// Number of pairwise bounds tests performed.
    pub tests: usize,
}

/// Sweep-and-prune broadphase along the x axis.
///
/// Working buffers are kept between calls to avoid reallocating, but their
/// contents are rebuilt from scratch on every pass.
#[derive(Debug, Default)]
pub struct SweepAndPrune {
    entries: Vec<(hecs::Entity, Aabb)>,
    endpoints: Vec<Endpoint>,
    active: Vec<usize>,
}

impl SweepAndPrune {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find all pairs of entities whose collider bounds overlap.
    ///
    /// Each unordered pair is reported once, with the shape whose interval
    /// starts later in role A.
    pub fn find_pairs(&mut self, world: &hecs::World) -> BroadphaseResult {
        self.entries.clear();
        self.entries.extend(
            world
                .query::<&Collider>()
                .iter()
                .map(|(entity, collider)| (entity, collider.bounds())),
        );
        self.sweep()
    }

    /// Sweep-and-prune over explicit entries.
    pub fn find_pairs_in(&mut self, entries: &[(hecs::Entity, Aabb)]) -> BroadphaseResult {
        self.entries.clear();
        self.entries.extend_from_slice(entries);
        self.sweep()
    }

    fn sweep(&mut self) -> BroadphaseResult {
        self.endpoints.clear();
        self.active.clear();

        for (index, (_, aabb)) in self.entries.iter().enumerate() {
            self.endpoints.push(Endpoint {
                x: aabb.min.x,
                index,
                is_left: true,
            });
            self.endpoints.push(Endpoint {
                x: aabb.max.x,
                index,
                is_left: false,
            });
        }

        // Left endpoints sort before right ones at equal x so touching
        // intervals are still swept as overlapping.
        self.endpoints
            .sort_unstable_by(|a, b| a.x.total_cmp(&b.x).then(b.is_left.cmp(&a.is_left)));

        let mut result = BroadphaseResult::default();

        for endpoint in &self.endpoints {
            if endpoint.is_left {
                let (entity, aabb) = self.entries[endpoint.index];
                for &other in &self.active {
                    result.tests += 1;
                    let (other_entity, other_aabb) = self.entries[other];
                    if aabb.overlaps(&other_aabb) {
                        result.pairs.push((entity, other_entity));
                    }
                }
                self.active.push(endpoint.index);
            } else if let Some(pos) = self.active.iter().position(|&i| i == endpoint.index) {
                self.active.swap_remove(pos);
            }
        }

        result
    }
}

/// Reference all-pairs scan: tests every unordered pair once.
pub fn brute_force_pairs(world: &hecs::World) -> BroadphaseResult {
    let entries: Vec<(hecs::Entity, Aabb)> = world
        .query::<&Collider>()
        .iter()
        .map(|(entity, collider)| (entity, collider.bounds()))
        .collect();
    brute_force_pairs_in(&entries)
}

/// All-pairs scan over explicit entries.
pub fn brute_force_pairs_in(entries: &[(hecs::Entity, Aabb)]) -> BroadphaseResult {
    let mut result = BroadphaseResult::default();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            result.tests += 1;
            let (entity_a, aabb_a) = &entries[i];
            let (entity_b, aabb_b) = &entries[j];
            if aabb_a.overlaps(aabb_b) {
                result.pairs.push((*entity_a, *entity_b));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::ColliderShape;
    use crate::ecs::components::transform::Transform;
    use glam::Vec2;

    fn spawn_circle(world: &mut hecs::World, x: f32, y: f32, radius: f32) -> hecs::Entity {
        let transform = Transform::from_xy(x, y);
        world.spawn((
            transform,
            Collider::at(ColliderShape::circle(radius), &transform),
        ))
    }

    fn canonical(pairs: &[(hecs::Entity, hecs::Entity)]) -> Vec<(hecs::Entity, hecs::Entity)> {
        let mut out: Vec<_> = pairs
            .iter()
            .map(|&(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_broadphase_overlapping() {
        let mut world = hecs::World::new();
        spawn_circle(&mut world, 0.0, 0.0, 1.0);
        spawn_circle(&mut world, 1.0, 0.0, 1.0);

        let result = SweepAndPrune::new().find_pairs(&world);
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.tests, 1);
    }

    #[test]
    fn test_broadphase_no_overlap() {
        let mut world = hecs::World::new();
        spawn_circle(&mut world, 0.0, 0.0, 0.5);
        spawn_circle(&mut world, 10.0, 0.0, 0.5);

        let result = SweepAndPrune::new().find_pairs(&world);
        assert!(result.pairs.is_empty());
        assert_eq!(result.tests, 0);
    }

    #[test]
    fn test_broadphase_x_overlap_but_y_apart() {
        let mut world = hecs::World::new();
        spawn_circle(&mut world, 0.0, 0.0, 0.5);
        spawn_circle(&mut world, 0.0, 5.0, 0.5);

        let result = SweepAndPrune::new().find_pairs(&world);
        assert!(result.pairs.is_empty());
        assert_eq!(result.tests, 1);
    }

    #[test]
    fn test_broadphase_touching_intervals_reported() {
        let mut world = hecs::World::new();
        spawn_circle(&mut world, 0.0, 0.0, 1.0);
        spawn_circle(&mut world, 2.0, 0.0, 1.0);

        let result = SweepAndPrune::new().find_pairs(&world);
        assert_eq!(result.pairs.len(), 1);
    }

    #[test]
    fn test_later_starting_shape_is_role_a() {
        let mut world = hecs::World::new();
        let left = spawn_circle(&mut world, 0.0, 0.0, 1.0);
        let right = spawn_circle(&mut world, 1.0, 0.0, 1.0);

        let result = SweepAndPrune::new().find_pairs(&world);
        assert_eq!(result.pairs, vec![(right, left)]);
    }

    #[test]
    fn test_sweep_matches_brute_force_on_grid() {
        let mut world = hecs::World::new();
        for i in 0..10 {
            for j in 0..10 {
                spawn_circle(&mut world, i as f32 * 1.5, j as f32 * 1.5, 1.0);
            }
        }

        let mut sap = SweepAndPrune::new();
        let swept = sap.find_pairs(&world);
        let brute = brute_force_pairs(&world);

        assert!(!swept.pairs.is_empty());
        assert_eq!(canonical(&swept.pairs), canonical(&brute.pairs));
        assert!(swept.tests < brute.tests);

        // Buffers are rebuilt, not accumulated
        let again = sap.find_pairs(&world);
        assert_eq!(canonical(&again.pairs), canonical(&swept.pairs));
    }

    #[test]
    fn test_find_pairs_in_explicit_entries() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let entries = [
            (a, Aabb::new(Vec2::ZERO, Vec2::ONE)),
            (b, Aabb::new(Vec2::splat(0.5), Vec2::splat(1.5))),
        ];
        let result = SweepAndPrune::new().find_pairs_in(&entries);
        assert_eq!(result.pairs, vec![(b, a)]);
        assert_eq!(brute_force_pairs_in(&entries).pairs, vec![(a, b)]);
    }
}
