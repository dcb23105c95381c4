//! Contact data produced by the narrowphase.

use glam::Vec2;

/// Geometry of a single overlap, before it is tied to entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    /// Contact normal (from shape A to shape B).
    pub normal: Vec2,
    /// Penetration depth.
    pub penetration: f32,
    /// Contact point in world space.
    pub point: Vec2,
}

impl ContactInfo {
    /// Swap the roles of A and B.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }

    /// Attach entity handles.
    pub fn between(self, shape_a: hecs::Entity, shape_b: hecs::Entity) -> Contact {
        Contact {
            shape_a,
            shape_b,
            normal: self.normal,
            position: self.point,
            penetration: self.penetration,
        }
    }
}

/// A detected overlap between two shapes.
///
/// Built fresh every tick and consumed by collision resolution; nothing is
/// cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub shape_a: hecs::Entity,
    pub shape_b: hecs::Entity,
    /// Unit normal pointing from A toward B.
    pub normal: Vec2,
    /// Contact point in world space.
    pub position: Vec2,
    /// Penetration depth (>= 0).
    pub penetration: f32,
}

impl Contact {
    /// Whether `shape` is one of the two participants.
    #[inline]
    pub fn contains(&self, shape: hecs::Entity) -> bool {
        self.shape_a == shape || self.shape_b == shape
    }

    /// Contact normal as seen by `shape`: pointing away from the other shape.
    ///
    /// Role A gets the negated A-to-B normal; any other handle gets it unchanged.
    #[inline]
    pub fn normal_for(&self, shape: hecs::Entity) -> Vec2 {
        if shape == self.shape_a {
            -self.normal
        } else {
            self.normal
        }
    }

    /// The participant that is not `shape`.
    pub fn other(&self, shape: hecs::Entity) -> Option<hecs::Entity> {
        if shape == self.shape_a {
            Some(self.shape_b)
        } else if shape == self.shape_b {
            Some(self.shape_a)
        } else {
            None
        }
    }

    /// Same contact with the roles of A and B swapped.
    pub fn flipped(self) -> Self {
        Self {
            shape_a: self.shape_b,
            shape_b: self.shape_a,
            normal: -self.normal,
            ..self
        }
    }
}
