//! Collision value types and bounding volumes

pub mod shapes;

use glam::Vec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from a center point and half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Check if this AABB overlaps with another
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents of the AABB
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The closest point on or inside the AABB to the given point
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// Immutable snapshot of a detected collision
///
/// Created per detected contact and consumed synchronously by the notified
/// collider's handler within the same tick.
#[derive(Debug, Clone)]
pub struct Collision {
    /// The collider we hit
    pub collider: Entity,
    /// Total impulse applied to this contact pair: the sum of
    /// `velocity × mass` over both sides
    pub impulse: Vec3,
    /// Relative linear velocity of the two colliding objects
    /// (first minus second)
    pub relative_velocity: Vec3,
    /// The rigid body we hit, if the other collider has one attached
    pub other_rigidbody: Option<Entity>,
    /// The entity whose transform we hit
    pub other_transform: Entity,
}

/// A single contact point of a collision
#[derive(Debug, Clone, Copy)]
pub struct ContactPoint {
    /// The point of contact in world space
    pub point: Vec3,
    /// The normal of the contact point
    pub normal: Vec3,
    /// Separation distance between the colliders at the contact point
    pub separation: f32,
    /// The first collider in contact
    pub this_collider: Entity,
    /// The other collider in contact
    pub other_collider: Entity,
}
