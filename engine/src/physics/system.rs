//! Per-tick physics stepping
//!
//! [`physics_step`] runs one fixed timestep in a fixed order: contact
//! latches and collider bounds are refreshed first, then every collider
//! probes the world for intersections and resolves impulses, then rigid
//! bodies integrate velocity into position. The host calls this once per
//! tick; not calling it (a paused host) is a no-op.

use crate::core::entity::{Transform, World};
use crate::physics::collision::Collision;
use crate::physics::components::{Collider, CollisionShape, ForceMode, Rigidbody};
use crate::physics::world::PhysicsWorld;
use crate::physics::{ContactTracking, PhysicsConfig, QueryTriggerInteraction};
use glam::Vec3;
use hecs::Entity;
use std::collections::HashSet;
use tracing::{debug, trace};

/// A collision delivered to a collider during the tick
///
/// Every resolved contact produces two events: one carrying the resolved
/// impulse that was applied, and a second zero-impulse "contact detected"
/// notification independent of force application.
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    /// The collider that was notified
    pub collider: Entity,
    /// Snapshot of the detected collision
    pub collision: Collision,
    /// The impulse resolved for this collider (zero for the detection event)
    pub impulse: Vec3,
}

/// A trigger overlap delivered during the tick
#[derive(Debug, Clone, Copy)]
pub struct TriggerEvent {
    /// The trigger collider
    pub trigger: Entity,
    /// The other collider involved in the overlap
    pub other: Entity,
}

/// Events produced by one physics tick
#[derive(Debug, Default)]
pub struct TickEvents {
    pub collisions: Vec<CollisionEvent>,
    pub triggers: Vec<TriggerEvent>,
}

/// Contact suppression state carried across ticks
#[derive(Debug, Default)]
pub struct ContactMemory {
    last_tick: HashSet<(Entity, Entity)>,
    this_tick: HashSet<(Entity, Entity)>,
}

impl ContactMemory {
    fn pair(a: Entity, b: Entity) -> (Entity, Entity) {
        if a.to_bits() <= b.to_bits() {
            (a, b)
        } else {
            (b, a)
        }
    }

    fn was_in_contact(&self, a: Entity, b: Entity) -> bool {
        self.last_tick.contains(&Self::pair(a, b))
    }

    fn record(&mut self, a: Entity, b: Entity) {
        self.this_tick.insert(Self::pair(a, b));
    }

    fn roll_over(&mut self) {
        std::mem::swap(&mut self.last_tick, &mut self.this_tick);
        self.this_tick.clear();
    }
}

/// Advance the physics simulation by one fixed timestep
pub fn physics_step(
    world: &mut World,
    physics_world: &mut PhysicsWorld,
    contacts: &mut ContactMemory,
    config: &PhysicsConfig,
    dt: f32,
) -> TickEvents {
    trace!(dt, "Physics step");

    physics_world.advance_time(dt);

    // 1. Latch contact flags and refresh bounds before any query
    for (_entity, (collider, transform)) in world.query_mut::<(&mut Collider, &Transform)>() {
        collider.colliding_already = collider.collided_this_tick;
        collider.collided_this_tick = false;
        collider.refresh_bounds(transform);
    }

    // 2. Collision pass, one collider at a time so that impulses applied by
    //    earlier colliders are visible to later ones within the same tick
    let collider_entities: Vec<Entity> = world
        .query::<&Collider>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    let mut events = TickEvents::default();

    for entity in collider_entities {
        collide_one(world, physics_world, contacts, config, dt, entity, &mut events);
    }

    contacts.roll_over();

    if !events.collisions.is_empty() || !events.triggers.is_empty() {
        debug!(
            collisions = events.collisions.len(),
            triggers = events.triggers.len(),
            "Collision pass complete"
        );
    }

    // 3. Rigidbody integration
    for (_entity, (rigidbody, transform)) in world.query_mut::<(&mut Rigidbody, &mut Transform)>() {
        rigidbody.integrate(transform, config.gravity, dt);
    }

    events
}

/// Run the collision pass for a single collider
fn collide_one(
    world: &mut World,
    physics_world: &mut PhysicsWorld,
    contacts: &mut ContactMemory,
    config: &PhysicsConfig,
    dt: f32,
    entity: Entity,
    events: &mut TickEvents,
) {
    // Snapshot this collider's state
    let (shape, bounds, is_trigger, bounciness) = {
        let Ok(collider) = world.get::<Collider>(entity) else {
            return;
        };
        (
            collider.shape,
            collider.bounds,
            collider.is_trigger,
            collider.material.bounciness,
        )
    };

    // Self-query: cheap check first, then the full overlap list
    let intersecting = match shape {
        CollisionShape::Box { .. } => {
            if !physics_world.check_box(
                world,
                bounds.center(),
                bounds.half_extents(),
                QueryTriggerInteraction::UseGlobal,
            ) {
                return;
            }
            physics_world.overlap_box(
                world,
                bounds.center(),
                bounds.half_extents(),
                QueryTriggerInteraction::UseGlobal,
            )
        }
        CollisionShape::Sphere { center, radius } => {
            if !physics_world.check_sphere(world, center, radius, QueryTriggerInteraction::UseGlobal)
            {
                return;
            }
            physics_world.overlap_sphere(world, center, radius, QueryTriggerInteraction::UseGlobal)
        }
    };

    let this_body = body_state(world, entity);

    for other in intersecting {
        if other == entity {
            continue;
        }

        if is_trigger {
            events.triggers.push(TriggerEvent {
                trigger: entity,
                other,
            });
            continue;
        }

        let other_body = body_state(world, other);

        // No physical response between two immovable objects
        if this_body.is_none() && other_body.is_none() {
            continue;
        }

        // Combined impulse and relative velocity over both sides
        let mut collision_impulse = Vec3::ZERO;
        let mut collision_velocity = Vec3::ZERO;
        if let Some((velocity, mass, _)) = this_body {
            collision_impulse += velocity * mass;
            collision_velocity = velocity;
        }
        if let Some((velocity, mass, _)) = other_body {
            collision_impulse += velocity * mass;
            collision_velocity -= velocity;
        }

        let collision = Collision {
            collider: other,
            impulse: collision_impulse,
            relative_velocity: collision_velocity,
            other_rigidbody: other_body.map(|_| other),
            other_transform: other,
        };

        if let Some((velocity, mass, use_gravity)) = this_body {
            let momentum = velocity * mass;

            // Box colliders reverse the full momentum; sphere colliders
            // project it onto the inter-center normal first, approximating
            // a normal-impulse response. The asymmetry is intentional.
            let mut resolved_impulse = match shape {
                CollisionShape::Box { .. } => -momentum - momentum * bounciness,
                CollisionShape::Sphere { center, .. } => {
                    let normal = other_center(world, other) - center;
                    let projected = if normal.length_squared() > f32::EPSILON {
                        momentum.dot(normal) / normal.length_squared() * normal
                    } else {
                        Vec3::ZERO
                    };
                    -projected - projected * bounciness
                }
            };

            if use_gravity {
                resolved_impulse -= Vec3::new(0.0, config.gravity, 0.0) * dt * mass;
            }

            deliver(
                world,
                contacts,
                config,
                dt,
                entity,
                &collision,
                resolved_impulse,
                events,
            );
        }

        // Unconditional zero-impulse "contact detected" notification
        deliver(world, contacts, config, dt, entity, &collision, Vec3::ZERO, events);
    }
}

/// Velocity, mass and gravity flag of the entity's rigid body, if it has one
fn body_state(world: &World, entity: Entity) -> Option<(Vec3, f32, bool)> {
    world
        .get::<Rigidbody>(entity)
        .ok()
        .map(|rb| (rb.velocity, rb.mass, rb.use_gravity))
}

/// World-space shape center of another collider
fn other_center(world: &World, entity: Entity) -> Vec3 {
    world
        .get::<Collider>(entity)
        .map(|c| c.center())
        .unwrap_or(Vec3::ZERO)
}

/// Collide handler: record the contact and apply the resolved impulse
///
/// The impulse is applied only if this collider was not already in contact
/// on the previous tick. Under `Coarse` tracking the check is a single
/// sticky flag per collider, so a body touching two different colliders in
/// consecutive ticks may incorrectly suppress the second; `PerPair` keys
/// suppression on the specific pair instead.
#[allow(clippy::too_many_arguments)]
fn deliver(
    world: &mut World,
    contacts: &mut ContactMemory,
    config: &PhysicsConfig,
    dt: f32,
    entity: Entity,
    collision: &Collision,
    impulse: Vec3,
    events: &mut TickEvents,
) {
    let suppressed = {
        let Ok(collider) = world.get::<Collider>(entity) else {
            return;
        };
        match config.contact_tracking {
            ContactTracking::Coarse => collider.colliding_already,
            ContactTracking::PerPair => contacts.was_in_contact(entity, collision.collider),
        }
    };

    if let Ok(collider) = world.query_one_mut::<&mut Collider>(entity) {
        collider.collided_this_tick = true;
    }
    contacts.record(entity, collision.collider);

    if !suppressed && impulse != Vec3::ZERO {
        if let Ok(rigidbody) = world.query_one_mut::<&mut Rigidbody>(entity) {
            rigidbody.add_force(impulse, ForceMode::Impulse, dt);
        }
    }

    events.collisions.push(CollisionEvent {
        collider: entity,
        collision: collision.clone(),
        impulse,
    });
}
