//! World-space collider geometry: bounds, box corners and triangle half-planes.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ColliderShape};
use crate::ecs::components::transform::Transform;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centred on `center` with the given half extents.
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Tight bounds of a point set. An empty set yields a degenerate box at the origin.
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vec2::ZERO, Vec2::ZERO);
        };
        points[1..].iter().fold(Self::new(*first, *first), |aabb, p| {
            Self::new(aabb.min.min(*p), aabb.max.max(*p))
        })
    }

    /// Test whether two AABBs overlap. Touching edges count as overlapping.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Line through `point` with an outward unit `normal`; the positive side is outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    pub normal: Vec2,
    pub point: Vec2,
}

impl HalfPlane {
    /// Signed distance of `p` from the boundary, positive outside.
    #[inline]
    pub fn signed_distance(&self, p: Vec2) -> f32 {
        self.normal.dot(p - self.point)
    }

    #[inline]
    pub fn is_outside(&self, p: Vec2) -> bool {
        self.signed_distance(p) > 0.0
    }
}

/// Cached world-space data for a collider.
#[derive(Debug, Clone)]
pub(crate) struct ColliderGeometry {
    /// Transform the cache was computed for; `None` until first synced.
    synced: Option<Transform>,
    pub(crate) position: Vec2,
    pub(crate) bounds: Aabb,
    /// Box corners (4) or triangle corners (first 3); unused for circles.
    corners: [Vec2; 4],
}

impl ColliderGeometry {
    pub(crate) fn compute(shape: &ColliderShape, transform: &Transform) -> Self {
        let position = transform.position;
        let mut corners = [position; 4];

        let bounds = match shape {
            ColliderShape::Box { half_extents } => {
                let bounds = Aabb::from_center(position, *half_extents);
                corners = [
                    Vec2::new(bounds.min.x, bounds.min.y),
                    Vec2::new(bounds.max.x, bounds.min.y),
                    Vec2::new(bounds.max.x, bounds.max.y),
                    Vec2::new(bounds.min.x, bounds.max.y),
                ];
                bounds
            }
            ColliderShape::Circle { radius } => Aabb::from_center(position, Vec2::splat(*radius)),
            ColliderShape::Triangle { corners: local } => {
                let affine = transform.to_affine();
                for (world, local) in corners.iter_mut().zip(local) {
                    *world = affine.transform_point2(*local);
                }
                Aabb::from_points(&corners[..3])
            }
        };

        Self {
            synced: Some(*transform),
            position,
            bounds,
            corners,
        }
    }

    pub(crate) fn unsynced(shape: &ColliderShape) -> Self {
        Self {
            synced: None,
            ..Self::compute(shape, &Transform::identity())
        }
    }
}

impl Collider {
    /// Recompute cached geometry if `transform` changed since the last refresh.
    ///
    /// Returns whether a refresh happened.
    pub fn sync(&mut self, transform: &Transform) -> bool {
        if self.geometry.synced.as_ref() == Some(transform) {
            return false;
        }
        self.moved(transform);
        true
    }

    /// Unconditionally recompute cached geometry for `transform`.
    pub fn moved(&mut self, transform: &Transform) {
        self.geometry = ColliderGeometry::compute(&self.shape, transform);
    }

    /// Replace the shape and rebuild the cache at the last synced transform.
    pub fn set_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
        self.geometry = match self.geometry.synced {
            Some(transform) => ColliderGeometry::compute(&self.shape, &transform),
            None => ColliderGeometry::unsynced(&self.shape),
        };
    }

    /// Whether the cache has seen a transform yet.
    pub fn is_synced(&self) -> bool {
        self.geometry.synced.is_some()
    }

    /// World-space corners: 4 for boxes (counter-clockwise from min), 3 for triangles.
    pub fn corners(&self) -> &[Vec2] {
        match self.shape {
            ColliderShape::Box { .. } => &self.geometry.corners[..],
            ColliderShape::Triangle { .. } => &self.geometry.corners[..3],
            ColliderShape::Circle { .. } => &[],
        }
    }

    /// Boundary segments connecting consecutive corners.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let corners = self.corners();
        (0..corners.len()).map(move |i| (corners[i], corners[(i + 1) % corners.len()]))
    }

    /// Outward half-plane per edge. Empty for circles.
    pub fn half_planes(&self) -> impl Iterator<Item = HalfPlane> + '_ {
        let corners = self.corners();
        let n = corners.len();
        (0..n).filter_map(move |i| {
            let a = corners[i];
            let b = corners[(i + 1) % n];
            let other = corners[(i + 2) % n];
            let normal = (b - a).perp().try_normalize()?;
            let normal = if normal.dot(other - a) > 0.0 {
                -normal
            } else {
                normal
            };
            Some(HalfPlane { normal, point: a })
        })
    }

    /// Centre of the shape: entity position for boxes and circles, centroid for triangles.
    pub fn center(&self) -> Vec2 {
        match self.shape {
            ColliderShape::Triangle { .. } => {
                let c = self.corners();
                (c[0] + c[1] + c[2]) / 3.0
            }
            _ => self.geometry.position,
        }
    }
}
