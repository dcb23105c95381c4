//! Spring constraints: force generators ticked before body integration.

use glam::Vec2;
use tracing::{debug, warn};

use crate::ecs::components::physics::{Body, Constraint, DoubleSpring, Spring, SpringState};
use crate::ecs::components::transform::Transform;

/// Separations shorter than this have no usable direction and are skipped.
const SEPARATION_EPSILON: f32 = 1e-6;

/// Counters from one constraint pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintTick {
    /// Springs that applied a force this tick.
    pub applied: usize,
    /// Springs that snapped this tick.
    pub broke: usize,
}

/// Snap the spring if `force` exceeds the threshold. Returns true when it broke.
fn check_break(state: &mut SpringState, break_force: Option<f32>, force: Vec2) -> bool {
    match break_force {
        Some(limit) if force.length() > limit => {
            *state = SpringState::Broken;
            true
        }
        _ => false,
    }
}

impl Spring {
    /// Force on the body for this tick, or `None` if nothing should be applied.
    ///
    /// Captures the rest length on first use, then applies Hooke's law plus
    /// velocity damping. Breaking is permanent.
    pub fn compute(
        &mut self,
        anchor: Vec2,
        body_position: Vec2,
        body_velocity: Vec2,
    ) -> Option<Vec2> {
        if self.state == SpringState::Broken {
            return None;
        }

        let separation = body_position - anchor;
        let length = separation.length();
        let rest_length = *self.rest_length.get_or_insert(length);

        if length <= SEPARATION_EPSILON {
            return None;
        }

        let direction = separation / length;
        let spring_force = -direction * self.stiffness * (length - rest_length);
        let damping_force = -body_velocity * self.damping;
        let force = spring_force + damping_force;

        if check_break(&mut self.state, self.break_force, force) {
            warn!(force = force.length(), "spring broke");
            return None;
        }

        Some(force)
    }
}

impl DoubleSpring {
    /// Force on body B for this tick; body A receives the negation.
    pub fn compute(
        &mut self,
        position_a: Vec2,
        velocity_a: Vec2,
        position_b: Vec2,
        velocity_b: Vec2,
    ) -> Option<Vec2> {
        if self.state == SpringState::Broken {
            return None;
        }

        let separation = position_b - position_a;
        let length = separation.length();
        let rest_length = *self.rest_length.get_or_insert(length);

        if length <= SEPARATION_EPSILON {
            return None;
        }

        let direction = separation / length;
        let spring_force = -direction * self.stiffness * (length - rest_length);
        let closing = (velocity_b - velocity_a).dot(direction);
        let damping_force = -direction * closing * self.damping;
        let force = spring_force + damping_force;

        if check_break(&mut self.state, self.break_force, force) {
            warn!(force = force.length(), "double spring broke");
            return None;
        }

        Some(force)
    }
}

/// Position and velocity of a constrained body, if it is fully wired.
fn body_state(world: &hecs::World, entity: hecs::Entity) -> Option<(Vec2, Vec2)> {
    let position = world.get::<&Transform>(entity).ok()?.position;
    let velocity = world.get::<&Body>(entity).ok()?.velocity();
    Some((position, velocity))
}

/// Compute every constraint and add the resulting forces to the bodies.
///
/// Constraints whose bodies are missing are skipped for this tick.
pub fn tick_constraints(world: &mut hecs::World) -> ConstraintTick {
    let mut tick = ConstraintTick::default();
    let mut forces: Vec<(hecs::Entity, Vec2)> = Vec::new();

    {
        let world_ref: &hecs::World = world;
        let mut query = world_ref.query::<(&mut Constraint, Option<&Transform>)>();
        for (entity, (constraint, transform)) in query.iter() {
            let was_broken = constraint.is_broken();

            match constraint {
                Constraint::Spring(spring) => {
                    let Some(anchor) = transform.map(|t| t.position) else {
                        debug!(?entity, "spring has no transform, skipping");
                        continue;
                    };
                    let Some((position, velocity)) = body_state(world_ref, spring.body) else {
                        debug!(?entity, body = ?spring.body, "spring body missing, skipping");
                        continue;
                    };
                    if let Some(force) = spring.compute(anchor, position, velocity) {
                        forces.push((spring.body, force));
                        tick.applied += 1;
                    }
                }
                Constraint::DoubleSpring(spring) => {
                    let (Some((pos_a, vel_a)), Some((pos_b, vel_b))) = (
                        body_state(world_ref, spring.body_a),
                        body_state(world_ref, spring.body_b),
                    ) else {
                        debug!(?entity, "double spring body missing, skipping");
                        continue;
                    };
                    if let Some(force) = spring.compute(pos_a, vel_a, pos_b, vel_b) {
                        forces.push((spring.body_a, -force));
                        forces.push((spring.body_b, force));
                        tick.applied += 1;
                    }
                }
            }

            if !was_broken && constraint.is_broken() {
                tick.broke += 1;
            }
        }
    }

    for (entity, force) in forces {
        if let Ok(mut body) = world.get::<&mut Body>(entity) {
            body.add_force(force);
        }
    }

    tick
}

/// Capture rest lengths for springs that have not been activated yet.
pub fn activate_constraints(world: &mut hecs::World) {
    let world_ref: &hecs::World = world;
    let mut query = world_ref.query::<(&mut Constraint, Option<&Transform>)>();
    for (_, (constraint, transform)) in query.iter() {
        match constraint {
            Constraint::Spring(spring) if spring.rest_length.is_none() => {
                let anchor = transform.map(|t| t.position);
                if let (Some(anchor), Some((position, _))) =
                    (anchor, body_state(world_ref, spring.body))
                {
                    spring.rest_length = Some(anchor.distance(position));
                }
            }
            Constraint::DoubleSpring(spring) if spring.rest_length.is_none() => {
                if let (Some((a, _)), Some((b, _))) = (
                    body_state(world_ref, spring.body_a),
                    body_state(world_ref, spring.body_b),
                ) {
                    spring.rest_length = Some(a.distance(b));
                }
            }
            _ => {}
        }
    }
}
