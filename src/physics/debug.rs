//! Debug visualization hook.
//!
//! The engine ships no renderer. A host implements [`DebugDraw`] on top of
//! whatever immediate-mode drawing it has, and [`draw_debug`] walks the scene.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ColliderShape, Constraint};
use crate::ecs::components::transform::Transform;

use super::contact::Contact;

/// RGB color in `[0, 1]`.
pub type Color = [f32; 3];

pub const RED: Color = [1.0, 0.0, 0.0];
pub const GREEN: Color = [0.0, 1.0, 0.0];
pub const BLUE: Color = [0.0, 0.0, 1.0];
pub const GRAY: Color = [0.5, 0.5, 0.5];

/// Radius of the marker drawn at each contact point.
const CONTACT_MARKER_RADIUS: f32 = 0.05;
/// Length of the per-shape normal lines.
const NORMAL_LENGTH: f32 = 0.5;

/// Immediate-mode drawing sink.
pub trait DebugDraw {
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn point(&mut self, position: Vec2, color: Color);
}

/// Draw contacts, shapes and springs.
///
/// Contact points are red, per-shape normals blue and penetration segments
/// green. Shapes are red while touching anything and green otherwise.
/// Springs use their own color, or gray once broken.
pub fn draw_debug(world: &hecs::World, contacts: &[Contact], draw: &mut impl DebugDraw) {
    for (entity, (collider, transform)) in world.query::<(&Collider, Option<&Transform>)>().iter() {
        let origin = transform.map_or_else(|| collider.position(), |t| t.position);
        let mut touching = false;

        for contact in contacts.iter().filter(|c| c.contains(entity)) {
            touching = true;
            draw.circle(contact.position, CONTACT_MARKER_RADIUS, RED);
            draw.line(
                origin,
                origin + contact.normal_for(entity) * NORMAL_LENGTH,
                BLUE,
            );
            let half_depth = contact.normal * contact.penetration * 0.5;
            draw.line(contact.position - half_depth, contact.position + half_depth, GREEN);
        }

        draw_shape(collider, if touching { RED } else { GREEN }, draw);
    }

    for (_, (constraint, transform)) in world.query::<(&Constraint, Option<&Transform>)>().iter() {
        let (from, to, color, broken) = match constraint {
            Constraint::Spring(spring) => {
                let (Some(anchor), Ok(body)) = (transform, world.get::<&Transform>(spring.body))
                else {
                    continue;
                };
                (anchor.position, body.position, spring.color, constraint.is_broken())
            }
            Constraint::DoubleSpring(spring) => {
                let (Ok(a), Ok(b)) = (
                    world.get::<&Transform>(spring.body_a),
                    world.get::<&Transform>(spring.body_b),
                ) else {
                    continue;
                };
                (a.position, b.position, spring.color, constraint.is_broken())
            }
        };

        draw.line(from, to, if broken { GRAY } else { color });
    }
}

fn draw_shape(collider: &Collider, color: Color, draw: &mut impl DebugDraw) {
    match collider.shape() {
        ColliderShape::Circle { radius } => draw.circle(collider.position(), *radius, color),
        ColliderShape::Box { .. } | ColliderShape::Triangle { .. } => {
            for (from, to) in collider.edges() {
                draw.line(from, to, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::{Body, Spring};

    #[derive(Default)]
    struct Recorder {
        lines: Vec<(Vec2, Vec2, Color)>,
        circles: Vec<(Vec2, f32, Color)>,
        points: Vec<(Vec2, Color)>,
    }

    impl DebugDraw for Recorder {
        fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
            self.lines.push((from, to, color));
        }

        fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.circles.push((center, radius, color));
        }

        fn point(&mut self, position: Vec2, color: Color) {
            self.points.push((position, color));
        }
    }

    #[test]
    fn test_idle_box_drawn_green() {
        let mut world = hecs::World::new();
        let transform = Transform::from_xy(0.0, 0.0);
        world.spawn((transform, Collider::at(ColliderShape::rect(2.0, 2.0), &transform)));

        let mut recorder = Recorder::default();
        draw_debug(&world, &[], &mut recorder);

        assert_eq!(recorder.lines.len(), 4);
        assert!(recorder.lines.iter().all(|&(_, _, c)| c == GREEN));
        assert!(recorder.circles.is_empty());
    }

    #[test]
    fn test_touching_circles_drawn_with_contact() {
        let mut world = hecs::World::new();
        let ta = Transform::from_xy(0.0, 0.0);
        let tb = Transform::from_xy(1.5, 0.0);
        let a = world.spawn((ta, Collider::at(ColliderShape::circle(1.0), &ta)));
        let b = world.spawn((tb, Collider::at(ColliderShape::circle(1.0), &tb)));
        let contact = Contact {
            shape_a: a,
            shape_b: b,
            normal: Vec2::X,
            position: Vec2::new(0.75, 0.0),
            penetration: 0.5,
        };

        let mut recorder = Recorder::default();
        draw_debug(&world, &[contact], &mut recorder);

        // Two markers plus two red shapes
        let markers = recorder.circles.iter().filter(|c| c.1 == CONTACT_MARKER_RADIUS).count();
        assert_eq!(markers, 2);
        let red_shapes = recorder.circles.iter().filter(|c| c.1 == 1.0 && c.2 == RED).count();
        assert_eq!(red_shapes, 2);

        // Normal for A points back toward -x
        assert!(recorder
            .lines
            .iter()
            .any(|&(from, to, c)| c == BLUE && from == Vec2::ZERO && to == Vec2::new(-0.5, 0.0)));
    }

    #[test]
    fn test_broken_spring_drawn_gray() {
        let mut world = hecs::World::new();
        let body = world.spawn((Transform::from_xy(0.0, -1.0), Body::new(1.0)));
        let mut spring = Spring::new(body).with_rest_length(0.0).with_break_force(Some(0.0));
        spring.compute(Vec2::ZERO, Vec2::new(0.0, -1.0), Vec2::ZERO);
        world.spawn((Transform::identity(), Constraint::from(spring)));

        let mut recorder = Recorder::default();
        draw_debug(&world, &[], &mut recorder);

        assert_eq!(recorder.lines, vec![(Vec2::ZERO, Vec2::new(0.0, -1.0), GRAY)]);
        assert!(recorder.points.is_empty());
    }

    #[test]
    fn test_active_spring_uses_its_color() {
        let mut world = hecs::World::new();
        let body = world.spawn((Transform::from_xy(0.0, -1.0), Body::new(1.0)));
        world.spawn((Transform::identity(), Constraint::from(Spring::new(body))));

        let mut recorder = Recorder::default();
        draw_debug(&world, &[], &mut recorder);

        assert_eq!(recorder.lines, vec![(Vec2::ZERO, Vec2::new(0.0, -1.0), RED)]);
    }
}
