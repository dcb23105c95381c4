//! Scalar and vector helpers shared by the narrowphase tests.

use glam::Vec2;

/// Tolerance used by [`point_in_triangle`] so points on an edge count as inside.
const TRIANGLE_MARGIN: f32 = 0.001;

/// Closest point to `p` on the segment `a`-`b`.
///
/// Degenerate segments (`a == b`) return `a`.
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let v = b - a;
    let w = p - a;

    let c1 = w.dot(v);
    if c1 <= 0.0 {
        return a;
    }

    let c2 = v.dot(v);
    if c2 <= c1 {
        return b;
    }

    a + v * (c1 / c2)
}

/// Distance from `p` to the segment `a`-`b`.
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    p.distance(closest_point_on_segment(p, a, b))
}

/// Barycentric-sign test for `p` inside the triangle `p0 p1 p2`.
///
/// Works for either winding. Points within a small margin of an edge are
/// reported as inside.
pub fn point_in_triangle(p: Vec2, p0: Vec2, p1: Vec2, p2: Vec2) -> bool {
    let mut s = p0.y * p2.x - p0.x * p2.y + (p2.y - p0.y) * p.x + (p0.x - p2.x) * p.y;
    let mut t = p0.x * p1.y - p0.y * p1.x + (p0.y - p1.y) * p.x + (p1.x - p0.x) * p.y;

    if (s < 0.0) != (t < 0.0) {
        return false;
    }

    let mut area = -p1.y * p2.x + p0.y * (p2.x - p1.x) + p0.x * (p1.y - p2.y) + p1.x * p2.y;
    if area < 0.0 {
        s = -s;
        t = -t;
        area = -area;
    }

    s > -TRIANGLE_MARGIN && t > -TRIANGLE_MARGIN && (s + t) < (area + TRIANGLE_MARGIN)
}

/// Whether segments `a0`-`a1` and `b0`-`b1` intersect (touching counts).
pub fn segments_intersect(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let d1 = (a1 - a0).perp_dot(b0 - a0);
    let d2 = (a1 - a0).perp_dot(b1 - a0);
    let d3 = (b1 - b0).perp_dot(a0 - b0);
    let d4 = (b1 - b0).perp_dot(a1 - b0);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    // Collinear or endpoint-touching cases
    (d1 == 0.0 && on_segment(b0, a0, a1))
        || (d2 == 0.0 && on_segment(b1, a0, a1))
        || (d3 == 0.0 && on_segment(a0, b0, b1))
        || (d4 == 0.0 && on_segment(a1, b0, b1))
}

/// `p` is known to be collinear with `a`-`b`; check it lies within the segment's box.
#[inline]
fn on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
