//! Transform component for ECS entities.

use glam::{Affine2, Vec2};

/// 2D placement of an entity: position, rotation (radians) and scale.
///
/// Boxes and circles only read `position`; triangles use the full affine
/// transform to place their local corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform from position components.
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }

    /// Convert to an affine matrix (translation * rotation * scale).
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }

    /// Map a local-space point to world space.
    #[inline]
    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.to_affine().transform_point2(point)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
