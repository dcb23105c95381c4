//! Narrowphase collision detection: per shape-pair overlap tests.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ColliderShape};
use crate::math::{closest_point_on_segment, point_in_triangle, segments_intersect};

use super::contact::{Contact, ContactInfo};

/// Test two shapes for overlap, dispatching on the shape-kind pair.
///
/// Pure query: reads the colliders' cached world geometry and nothing else.
/// Returns `None` when the bounds are disjoint. The returned contact keeps
/// `entity_a` as role A, whichever order the pairwise test used internally.
pub fn overlaps(
    entity_a: hecs::Entity,
    a: &Collider,
    entity_b: hecs::Entity,
    b: &Collider,
) -> Option<Contact> {
    detect_collision(a, b).map(|info| info.between(entity_a, entity_b))
}

/// Shape-pair dispatch without entity handles. Normal points from `a` to `b`.
pub fn detect_collision(a: &Collider, b: &Collider) -> Option<ContactInfo> {
    if !a.bounds().overlaps(&b.bounds()) {
        return None;
    }

    match (&a.shape, &b.shape) {
        (ColliderShape::Circle { radius: ra }, ColliderShape::Circle { radius: rb }) => {
            circle_circle(a.position(), *ra, b.position(), *rb)
        }
        (
            ColliderShape::Box {
                half_extents: half_a,
            },
            ColliderShape::Box {
                half_extents: half_b,
            },
        ) => box_box(a.position(), *half_a, b.position(), *half_b),
        (ColliderShape::Circle { radius }, ColliderShape::Box { .. }) => {
            circle_box(a.position(), *radius, b)
        }
        (ColliderShape::Box { .. }, ColliderShape::Circle { radius }) => {
            circle_box(b.position(), *radius, a).map(ContactInfo::flipped)
        }
        (ColliderShape::Triangle { .. }, ColliderShape::Triangle { .. }) => {
            triangle_triangle(a, b)
        }
        (ColliderShape::Triangle { .. }, ColliderShape::Circle { radius }) => {
            triangle_circle(a, b.position(), *radius)
        }
        (ColliderShape::Circle { radius }, ColliderShape::Triangle { .. }) => {
            triangle_circle(b, a.position(), *radius).map(ContactInfo::flipped)
        }
        (ColliderShape::Triangle { .. }, ColliderShape::Box { .. }) => triangle_box(a, b),
        (ColliderShape::Box { .. }, ColliderShape::Triangle { .. }) => {
            triangle_box(b, a).map(ContactInfo::flipped)
        }
    }
}

/// Circle-circle: overlapping iff the centre distance is below the radius sum.
pub fn circle_circle(
    center_a: Vec2,
    radius_a: f32,
    center_b: Vec2,
    radius_b: f32,
) -> Option<ContactInfo> {
    let diff = center_b - center_a;
    let distance = diff.length();
    let radius_sum = radius_a + radius_b;

    if distance >= radius_sum {
        return None;
    }

    // Coincident centres have no direction; pick one so the normal stays unit length
    let normal = if distance > 1e-6 { diff / distance } else { Vec2::Y };

    let surface_a = center_a + normal * radius_a;
    let surface_b = center_b - normal * radius_b;

    Some(ContactInfo {
        normal,
        penetration: radius_sum - distance,
        point: (surface_a + surface_b) * 0.5,
    })
}

/// Box-box: separate along the axis of least overlap.
///
/// The contact point is the midpoint of the two centres, not the centroid
/// of the overlap region.
pub fn box_box(center_a: Vec2, half_a: Vec2, center_b: Vec2, half_b: Vec2) -> Option<ContactInfo> {
    let delta = center_b - center_a;
    let overlap_x = half_a.x + half_b.x - delta.x.abs();
    let overlap_y = half_a.y + half_b.y - delta.y.abs();

    if overlap_x < 0.0 || overlap_y < 0.0 {
        return None;
    }

    let (normal, penetration) = if overlap_x < overlap_y {
        (Vec2::new(sign(delta.x), 0.0), overlap_x)
    } else {
        (Vec2::new(0.0, sign(delta.y)), overlap_y)
    };

    Some(ContactInfo {
        normal,
        penetration,
        point: (center_a + center_b) * 0.5,
    })
}

/// Circle against the edges of `polygon` (box): the nearest edge within the radius wins.
///
/// A circle whose centre is deeper than its radius inside the box touches no
/// edge and reports no contact. Normal points from the circle to the box.
pub fn circle_box(center: Vec2, radius: f32, polygon: &Collider) -> Option<ContactInfo> {
    let (closest, distance) = nearest_edge_point(center, polygon)?;

    if distance >= radius {
        return None;
    }

    let normal = (closest - center)
        .try_normalize()
        .or_else(|| (polygon.center() - center).try_normalize())
        .unwrap_or(Vec2::NEG_Y);
    let penetration = radius - distance;

    Some(ContactInfo {
        normal,
        penetration,
        point: center + normal * (radius - penetration * 0.5),
    })
}

/// Separating-axis test over the outward half-planes of both triangles.
pub fn triangle_triangle(a: &Collider, b: &Collider) -> Option<ContactInfo> {
    sat_polygons(a, b)
}

/// Triangle against circle. Normal points from the triangle to the circle.
///
/// A centre inside the triangle is pushed out through the nearest edge;
/// otherwise the nearest edge point must lie within the radius.
pub fn triangle_circle(triangle: &Collider, center: Vec2, radius: f32) -> Option<ContactInfo> {
    let corners = triangle.corners();
    if corners.len() != 3 {
        return None;
    }

    if point_in_triangle(center, corners[0], corners[1], corners[2]) {
        let (plane, depth) = triangle
            .half_planes()
            .map(|plane| (plane, -plane.signed_distance(center)))
            .min_by(|x, y| x.1.total_cmp(&y.1))?;
        let depth = depth.max(0.0);
        return Some(ContactInfo {
            normal: plane.normal,
            penetration: radius + depth,
            point: center + plane.normal * depth,
        });
    }

    let (closest, distance) = nearest_edge_point(center, triangle)?;
    if distance >= radius {
        return None;
    }

    let normal = (center - closest)
        .try_normalize()
        .or_else(|| (center - triangle.center()).try_normalize())
        .unwrap_or(Vec2::Y);

    Some(ContactInfo {
        normal,
        penetration: radius - distance,
        point: closest,
    })
}

/// Triangle against box: overlap by corner containment or crossing edges,
/// then the separating-axis pass supplies the normal and depth.
pub fn triangle_box(triangle: &Collider, aabb_box: &Collider) -> Option<ContactInfo> {
    let tri = triangle.corners();
    let quad = aabb_box.corners();
    if tri.len() != 3 || quad.len() != 4 {
        return None;
    }

    let bounds = aabb_box.bounds();
    let touching = tri.iter().any(|p| bounds.contains_point(*p))
        || quad
            .iter()
            .any(|p| point_in_triangle(*p, tri[0], tri[1], tri[2]))
        || triangle.edges().any(|(t0, t1)| {
            aabb_box
                .edges()
                .any(|(q0, q1)| segments_intersect(t0, t1, q0, q1))
        });

    if !touching {
        return None;
    }

    sat_polygons(triangle, aabb_box)
}

/// Separating-axis test between two convex polygons using each side's
/// outward edge normals. Picks the axis of least overlap, oriented A to B.
///
/// The contact point is the midpoint of the two centres.
fn sat_polygons(a: &Collider, b: &Collider) -> Option<ContactInfo> {
    let corners_a = a.corners();
    let corners_b = b.corners();
    if corners_a.is_empty() || corners_b.is_empty() {
        return None;
    }

    let mut best: Option<(Vec2, f32)> = None;

    for plane in a.half_planes().chain(b.half_planes()) {
        let (min_a, max_a) = project(corners_a, plane.normal);
        let (min_b, max_b) = project(corners_b, plane.normal);
        let overlap = max_a.min(max_b) - min_a.max(min_b);

        if overlap < 0.0 {
            return None;
        }

        if best.map_or(true, |(_, depth)| overlap < depth) {
            best = Some((plane.normal, overlap));
        }
    }

    let (axis, penetration) = best?;
    let center_a = a.center();
    let center_b = b.center();
    let normal = if axis.dot(center_b - center_a) < 0.0 {
        -axis
    } else {
        axis
    };

    Some(ContactInfo {
        normal,
        penetration,
        point: (center_a + center_b) * 0.5,
    })
}

/// Projection interval of `points` onto `axis`.
fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    points.iter().fold((f32::MAX, f32::MIN), |(lo, hi), p| {
        let d = p.dot(axis);
        (lo.min(d), hi.max(d))
    })
}

/// Closest point on any edge of `polygon` to `p`, with its distance.
fn nearest_edge_point(p: Vec2, polygon: &Collider) -> Option<(Vec2, f32)> {
    polygon
        .edges()
        .map(|(e0, e1)| {
            let cp = closest_point_on_segment(p, e0, e1);
            (cp, p.distance(cp))
        })
        .min_by(|x, y| x.1.total_cmp(&y.1))
}

/// Sign with zero counted as positive.
#[inline]
fn sign(v: f32) -> f32 {
    if v >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::transform::Transform;

    fn placed(shape: ColliderShape, x: f32, y: f32) -> Collider {
        Collider::at(shape, &Transform::from_xy(x, y))
    }

    fn handles() -> (hecs::World, hecs::Entity, hecs::Entity) {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        (world, a, b)
    }

    #[test]
    fn test_circle_circle_intersection() {
        let info = circle_circle(Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0), 1.0).unwrap();
        let eps = 1e-5;
        assert!((info.normal - Vec2::X).length() < eps);
        assert!((info.penetration - 0.5).abs() < eps);
        assert!((info.point - Vec2::new(0.75, 0.0)).length() < eps);
    }

    #[test]
    fn test_circle_circle_no_intersection() {
        assert!(circle_circle(Vec2::ZERO, 1.0, Vec2::new(3.0, 0.0), 1.0).is_none());
        // Exactly touching is not a contact
        assert!(circle_circle(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_circle_circle_coincident_centres() {
        let info = circle_circle(Vec2::ONE, 1.0, Vec2::ONE, 0.5).unwrap();
        assert!((info.normal.length() - 1.0).abs() < 1e-6);
        assert!((info.penetration - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_box_box_picks_least_overlap_axis() {
        // Overlap x = 0.5, y = 1.8
        let info = box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(1.5, 0.2), Vec2::ONE).unwrap();
        assert_eq!(info.normal, Vec2::X);
        assert!((info.penetration - 0.5).abs() < 1e-6);
        assert!((info.point - Vec2::new(0.75, 0.1)).length() < 1e-6);

        let info = box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(0.2, -1.5), Vec2::ONE).unwrap();
        assert_eq!(info.normal, Vec2::NEG_Y);
        assert!((info.penetration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_box_box_no_intersection() {
        assert!(box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(3.0, 0.0), Vec2::ONE).is_none());
    }

    #[test]
    fn test_box_box_equal_overlap_resolves_on_y() {
        // Overlap x = y = 1.5
        let info = box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(0.5, 0.5), Vec2::ONE).unwrap();
        assert_eq!(info.normal, Vec2::Y);
        assert_eq!(info.penetration, 1.5);

        let info = box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(0.5, -0.5), Vec2::ONE).unwrap();
        assert_eq!(info.normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_box_box_coincident_centres_push_up() {
        let info = box_box(Vec2::ZERO, Vec2::ONE, Vec2::ZERO, Vec2::ONE).unwrap();
        assert_eq!(info.normal, Vec2::Y);
        assert_eq!(info.penetration, 2.0);
        assert_eq!(info.point, Vec2::ZERO);

        // Centres share x only: the x overlap is larger, so the zero sign never shows
        let info = box_box(Vec2::ZERO, Vec2::ONE, Vec2::new(0.0, 1.0), Vec2::ONE).unwrap();
        assert_eq!(info.normal, Vec2::Y);
        assert_eq!(info.penetration, 1.0);
    }

    #[test]
    fn test_circle_box_edge_contact() {
        let boxed = placed(ColliderShape::rect(2.0, 2.0), 0.0, 0.0);
        // Circle above the top edge (y = 1), centre at 1.3
        let info = circle_box(Vec2::new(0.0, 1.3), 0.5, &boxed).unwrap();
        assert!((info.normal - Vec2::NEG_Y).length() < 1e-5);
        assert!((info.penetration - 0.2).abs() < 1e-5);
        assert!((info.point - Vec2::new(0.0, 0.9)).length() < 1e-5);
    }

    #[test]
    fn test_circle_box_keeps_nearest_edge() {
        let boxed = placed(ColliderShape::rect(2.0, 2.0), 0.0, 0.0);
        // Near the corner: right edge at distance 0.1, top edge at 0.3
        let info = circle_box(Vec2::new(0.9, 0.7), 0.5, &boxed).unwrap();
        assert!((info.normal - Vec2::X).length() < 1e-5);
        assert!((info.penetration - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_circle_deep_inside_box_reports_nothing() {
        let boxed = placed(ColliderShape::rect(10.0, 10.0), 0.0, 0.0);
        assert!(circle_box(Vec2::ZERO, 1.0, &boxed).is_none());
    }

    #[test]
    fn test_overlaps_rejects_disjoint_bounds() {
        let (_world, ea, eb) = handles();
        let a = placed(ColliderShape::circle(1.0), 0.0, 0.0);
        let b = placed(ColliderShape::rect(1.0, 1.0), 0.0, 10.0);
        assert!(overlaps(ea, &a, eb, &b).is_none());
        assert!(overlaps(eb, &b, ea, &a).is_none());
    }

    #[test]
    fn test_overlaps_swapped_order_inverts_normal() {
        let (_world, ea, eb) = handles();
        let circle = placed(ColliderShape::circle(0.5), 0.0, 1.3);
        let boxed = placed(ColliderShape::rect(2.0, 2.0), 0.0, 0.0);

        let ab = overlaps(ea, &circle, eb, &boxed).unwrap();
        let ba = overlaps(eb, &boxed, ea, &circle).unwrap();

        assert_eq!(ab.shape_a, ea);
        assert_eq!(ba.shape_a, eb);
        assert!((ab.normal + ba.normal).length() < 1e-6);
        assert!((ab.normal_for(ea) - ba.normal_for(ea)).length() < 1e-6);
        assert!((ab.penetration - ba.penetration).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_triangle() {
        let shape = ColliderShape::triangle(Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0));
        let a = placed(shape.clone(), 0.0, 0.0);
        let b = placed(shape.clone(), 0.5, 0.5);
        let info = triangle_triangle(&a, &b).unwrap();
        assert!(info.penetration > 0.0);
        assert!(info.normal.dot(b.center() - a.center()) >= 0.0);

        // Bounds overlap but the hypotenuse separates them
        let c = placed(
            ColliderShape::triangle(Vec2::new(2.0, 2.0), Vec2::new(1.2, 2.0), Vec2::new(2.0, 1.2)),
            0.0,
            0.0,
        );
        assert!(a.bounds().overlaps(&c.bounds()));
        assert!(triangle_triangle(&a, &c).is_none());
    }

    #[test]
    fn test_triangle_circle_outside_and_inside() {
        let tri = placed(
            ColliderShape::triangle(Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)),
            0.0,
            0.0,
        );

        // Below the bottom edge
        let info = triangle_circle(&tri, Vec2::new(1.0, -0.3), 0.5).unwrap();
        assert!((info.normal - Vec2::NEG_Y).length() < 1e-5);
        assert!((info.penetration - 0.2).abs() < 1e-5);

        // Centre inside, nearest edge is the bottom one (distance 0.2)
        let info = triangle_circle(&tri, Vec2::new(1.0, 0.2), 0.5).unwrap();
        assert!((info.normal - Vec2::NEG_Y).length() < 1e-5);
        assert!((info.penetration - 0.7).abs() < 1e-5);

        assert!(triangle_circle(&tri, Vec2::new(5.0, 5.0), 0.5).is_none());
    }

    #[test]
    fn test_triangle_box() {
        let tri = placed(
            ColliderShape::triangle(Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)),
            0.0,
            0.0,
        );
        let hit = placed(ColliderShape::rect(1.0, 1.0), 0.5, 0.5);
        assert!(triangle_box(&tri, &hit).is_some());

        // Inside the triangle's bounds but beyond the hypotenuse
        let miss = placed(ColliderShape::rect(0.4, 0.4), 1.7, 1.7);
        assert!(tri.bounds().overlaps(&miss.bounds()));
        assert!(triangle_box(&tri, &miss).is_none());
    }

    #[test]
    fn test_detect_collision_dispatch_all_pairs() {
        let circle = placed(ColliderShape::circle(1.0), 0.0, 0.0);
        let boxed = placed(ColliderShape::rect(2.0, 2.0), 0.5, 1.5);
        let tri = placed(
            ColliderShape::triangle(
                Vec2::new(-1.0, -1.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(0.0, 1.0),
            ),
            0.0,
            0.5,
        );

        for (a, b) in [
            (&circle, &circle),
            (&circle, &boxed),
            (&boxed, &circle),
            (&boxed, &boxed),
            (&tri, &tri),
            (&tri, &circle),
            (&circle, &tri),
            (&tri, &boxed),
            (&boxed, &tri),
        ] {
            let info = detect_collision(a, b)
                .unwrap_or_else(|| panic!("{} vs {}", a.shape.kind(), b.shape.kind()));
            assert!((info.normal.length() - 1.0).abs() < 1e-5);
            assert!(info.penetration >= 0.0);
        }
    }
}
