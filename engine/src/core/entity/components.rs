//! Core components for the entity system

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform component representing position, rotation, and scale
///
/// The physics core reads position and scale when refreshing collider
/// bounds, and translates position when integrating rigid bodies. World
/// composition of nested transforms is the host's concern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the scale of the transform
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Move the transform by the given offset in world space
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

/// Name component for identifying entities in logs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    /// Create a new name component
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
