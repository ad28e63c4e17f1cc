//! Physics components attached to entities

use crate::core::entity::Transform;
use crate::physics::collision::Aabb;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// How a force passed to [`Rigidbody::add_force`] is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForceMode {
    /// Continuous force, using the body's mass (N)
    #[default]
    Force,
    /// Continuous acceleration, ignoring the body's mass (m/s²)
    Acceleration,
    /// Instant force impulse, using the body's mass (N·s)
    Impulse,
    /// Instant velocity change, ignoring the body's mass (m/s)
    VelocityChange,
}

/// How material properties of two colliding surfaces are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombineMode {
    /// Average of the two values
    #[default]
    Average,
    /// Smaller of the two values
    Minimum,
    /// Product of the two values
    Multiply,
    /// Larger of the two values
    Maximum,
}

/// Physical material properties (friction, bounciness)
///
/// Combine modes are declared configuration: collision resolution currently
/// consults only the initiating collider's own material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction used when already moving, expected in [0, 1]
    pub dynamic_friction: f32,
    /// Friction used when lying on a surface, expected in [0, 1]
    pub static_friction: f32,
    /// 0 does not bounce, 1 bounces without energy loss
    pub bounciness: f32,
    /// How friction of two colliding materials is combined
    pub friction_combine: CombineMode,
    /// How bounciness of two colliding materials is combined
    pub bounce_combine: CombineMode,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            dynamic_friction: 0.6,
            static_friction: 0.6,
            bounciness: 0.0,
            friction_combine: CombineMode::Average,
            bounce_combine: CombineMode::Average,
        }
    }
}

impl PhysicsMaterial {
    /// Create a material with the given bounciness
    pub fn bouncy(bounciness: f32) -> Self {
        Self {
            bounciness,
            ..Default::default()
        }
    }
}

/// Rigidbody component for physics simulation
///
/// Bound 1:1 to an entity alongside its `Transform`; destroyed with the
/// entity. Velocity is integrated into position once per tick unless the
/// body is sleeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rigidbody {
    /// Mass in kilograms, must be positive
    pub mass: f32,
    /// Linear velocity in world space
    pub velocity: Vec3,
    /// Whether gravity is applied to this body
    pub use_gravity: bool,
    /// Velocity magnitude at or below which the body sleeps
    pub sleep_threshold: f32,
    /// Drag coefficient. Declared for configuration compatibility;
    /// integration does not apply drag yet.
    pub drag: f32,
    /// Density of the surrounding fluid (kg/m³), used by drag when it lands
    pub density_of_fluid: f32,
    /// Sleeping bodies do not translate
    #[serde(skip)]
    pub(crate) sleeping: bool,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            velocity: Vec3::ZERO,
            use_gravity: true,
            sleep_threshold: 0.0,
            drag: 0.0,
            density_of_fluid: 1.225,
            sleeping: false,
        }
    }
}

impl Rigidbody {
    /// Create a dynamic rigidbody with the given mass
    pub fn dynamic(mass: f32) -> Self {
        Self {
            mass,
            ..Default::default()
        }
    }

    /// Disable gravity on this body
    pub fn without_gravity(mut self) -> Self {
        self.use_gravity = false;
        self
    }

    /// Apply a force to the body, updating its velocity
    ///
    /// `dt` is the fixed timestep of the current tick; it only affects the
    /// continuous modes (`Force`, `Acceleration`). Any external actor may
    /// call this between ticks — it is the sole externally-triggerable
    /// mutation of physics state outside the tick loop.
    pub fn add_force(&mut self, force: Vec3, mode: ForceMode, dt: f32) {
        match mode {
            ForceMode::Force => self.velocity += force / self.mass * dt,
            ForceMode::Acceleration => self.velocity += force * dt,
            ForceMode::Impulse => self.velocity += force / self.mass,
            ForceMode::VelocityChange => self.velocity += force,
        }
    }

    /// Apply a force at a world-space position
    ///
    /// Without rotational dynamics the application point contributes no
    /// torque, so this delegates to [`Rigidbody::add_force`].
    pub fn add_force_at_position(&mut self, force: Vec3, _position: Vec3, mode: ForceMode, dt: f32) {
        self.add_force(force, mode, dt);
    }

    /// Integrate gravity and translation for one tick
    pub fn integrate(&mut self, transform: &mut Transform, gravity: f32, dt: f32) {
        if self.use_gravity {
            self.velocity.y += gravity * dt;
        }

        self.sleeping = self.velocity.length() <= self.sleep_threshold;

        if !self.sleeping {
            transform.translate(self.velocity * dt);
        }
    }

    /// True if the body is not moving
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Clear the sleeping flag without altering velocity
    pub fn wake_up(&mut self) {
        self.sleeping = false;
    }
}

/// Shape of a collider, with state mirrored from the owning transform
///
/// `center`/`size`/`radius` are recomputed from the entity's position and
/// scale every tick, before any query is answered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum CollisionShape {
    /// Axis-aligned box
    Box {
        /// Center of the box in world space
        center: Vec3,
        /// Size of the box (full extents)
        size: Vec3,
    },
    /// Sphere
    Sphere {
        /// Center of the sphere in world space
        center: Vec3,
        /// Radius, derived from the largest scale component
        radius: f32,
    },
}

impl Default for CollisionShape {
    fn default() -> Self {
        CollisionShape::Box {
            center: Vec3::ZERO,
            size: Vec3::ONE,
        }
    }
}

/// Collider component for overlap queries and collision response
///
/// Bounds are recomputed from the owning entity's transform every tick. A
/// trigger collider never generates physical response, only notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    /// Collision shape, mirrored from the transform each tick
    pub shape: CollisionShape,
    /// Trigger colliders detect overlap without force response
    pub is_trigger: bool,
    /// This collider's private material, cloned from the shared template
    pub material: PhysicsMaterial,
    /// The shared template the private material was cloned from
    pub shared_material: PhysicsMaterial,
    /// World-space bounds, recomputed each tick
    #[serde(skip)]
    pub bounds: Aabb,
    /// True if this collider resolved a contact last tick
    #[serde(skip)]
    pub(crate) colliding_already: bool,
    /// Set when a contact is resolved during the current tick
    #[serde(skip)]
    pub(crate) collided_this_tick: bool,
}

impl Default for Collider {
    fn default() -> Self {
        Self::new(CollisionShape::default(), PhysicsMaterial::default())
    }
}

impl Collider {
    /// Create a collider with the given shape and shared material template
    ///
    /// The template is cloned into the collider's private material;
    /// mutations of the private copy are never shared.
    pub fn new(shape: CollisionShape, shared_material: PhysicsMaterial) -> Self {
        Self {
            shape,
            is_trigger: false,
            material: shared_material.clone(),
            shared_material,
            bounds: Aabb::default(),
            colliding_already: false,
            collided_this_tick: false,
        }
    }

    /// Create a box collider with the default material
    pub fn box_collider() -> Self {
        Self::new(CollisionShape::default(), PhysicsMaterial::default())
    }

    /// Create a sphere collider with the default material
    pub fn sphere() -> Self {
        Self::new(
            CollisionShape::Sphere {
                center: Vec3::ZERO,
                radius: 0.5,
            },
            PhysicsMaterial::default(),
        )
    }

    /// Set this collider as a trigger
    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// Set the shared material template (and reclone the private material)
    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material.clone();
        self.shared_material = material;
        self
    }

    /// Recompute shape state and world-space bounds from the transform
    pub fn refresh_bounds(&mut self, transform: &Transform) {
        match &mut self.shape {
            CollisionShape::Box { center, size } => {
                *center = transform.position;
                *size = transform.scale;
                self.bounds = Aabb::from_center_half_extents(*center, *size * 0.5);
            }
            CollisionShape::Sphere { center, radius } => {
                *center = transform.position;
                *radius = transform.scale.max_element() / 2.0;
                self.bounds = Aabb::from_center_half_extents(*center, Vec3::splat(*radius));
            }
        }
    }

    /// World-space radius of a sphere collider, `None` for other shapes
    pub fn sphere_radius(&self) -> Option<f32> {
        match self.shape {
            CollisionShape::Sphere { radius, .. } => Some(radius),
            CollisionShape::Box { .. } => None,
        }
    }

    /// World-space center of the shape
    pub fn center(&self) -> Vec3 {
        match self.shape {
            CollisionShape::Box { center, .. } => center,
            CollisionShape::Sphere { center, .. } => center,
        }
    }

    /// The closest point on this collider's bounds to the given position
    pub fn closest_point_on_bounds(&self, position: Vec3) -> Vec3 {
        self.bounds.closest_point(position)
    }
}
