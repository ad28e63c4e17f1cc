//! Physics world query service
//!
//! Owns the cached collider registry and answers overlap and ray queries
//! against it. All queries are linear scans over the registry; the registry
//! is rebuilt at most once per distinct fixed-time value, so repeated
//! queries within the same tick reuse the cached list instead of re-walking
//! the entity world.

use crate::core::entity::World;
use crate::physics::collision::shapes::Ray;
use crate::physics::collision::Aabb;
use crate::physics::components::{Collider, Rigidbody};
use crate::physics::{PhysicsConfig, QueryTriggerInteraction};
use glam::Vec3;
use hecs::Entity;
use tracing::debug;

/// Information returned from a ray or line query
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: Entity,
    /// The rigid body attached to the hit collider, if any
    pub rigidbody: Option<Entity>,
    /// The impact point in world space
    pub point: Vec3,
    /// The normal of the surface the ray hit
    pub normal: Vec3,
    /// Distance from the ray origin to the impact point
    pub distance: f32,
}

/// Query service over all colliders in the world
pub struct PhysicsWorld {
    /// Whether queries hit trigger colliders when the policy is `UseGlobal`
    pub queries_hit_triggers: bool,
    /// Cached registry of all collider entities
    registry: Vec<Entity>,
    /// Fixed-time value the registry was last rebuilt at
    registry_time: f64,
    /// Current simulation time, advanced once per tick
    fixed_time: f64,
}

impl PhysicsWorld {
    /// Create a new query service from the physics configuration
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            queries_hit_triggers: config.queries_hit_triggers,
            registry: Vec::new(),
            registry_time: -1.0,
            fixed_time: 0.0,
        }
    }

    /// Advance the simulation clock by one tick
    ///
    /// Invalidates the registry cache: the next query rebuilds it. Must be
    /// called before any query is issued in the tick.
    pub fn advance_time(&mut self, dt: f32) {
        self.fixed_time += dt as f64;
    }

    /// The current fixed simulation time
    pub fn fixed_time(&self) -> f64 {
        self.fixed_time
    }

    /// Rebuild the collider registry if time has advanced since the last build
    fn update_registry(&mut self, world: &World) {
        if self.fixed_time > self.registry_time {
            self.registry_time = self.fixed_time;
            self.registry.clear();
            for (entity, _collider) in world.query::<&Collider>().iter() {
                self.registry.push(entity);
            }
            debug!(
                colliders = self.registry.len(),
                fixed_time = self.fixed_time,
                "Rebuilt collider registry"
            );
        }
    }

    /// Resolve a trigger-interaction policy against the global setting
    fn hit_triggers(&self, policy: QueryTriggerInteraction) -> bool {
        match policy {
            QueryTriggerInteraction::UseGlobal => self.queries_hit_triggers,
            QueryTriggerInteraction::Collide => true,
            QueryTriggerInteraction::Ignore => false,
        }
    }

    /// Returns true if the given box overlaps any collider's bounds
    ///
    /// A collider whose bounds exactly equal the query box is excluded, so
    /// a collider probing with its own bounds does not report itself.
    pub fn check_box(
        &mut self,
        world: &World,
        center: Vec3,
        half_extents: Vec3,
        policy: QueryTriggerInteraction,
    ) -> bool {
        self.update_registry(world);

        let bounds = Aabb::from_center_half_extents(center, half_extents);
        let hit_triggers = self.hit_triggers(policy);

        for &entity in &self.registry {
            let Ok(collider) = world.get::<Collider>(entity) else {
                continue;
            };
            if collider.bounds != bounds
                && bounds.overlaps(&collider.bounds)
                && !(collider.is_trigger && !hit_triggers)
            {
                return true;
            }
        }

        false
    }

    /// Returns every collider whose bounds intersect the given box
    pub fn overlap_box(
        &mut self,
        world: &World,
        center: Vec3,
        half_extents: Vec3,
        policy: QueryTriggerInteraction,
    ) -> Vec<Entity> {
        self.update_registry(world);

        let bounds = Aabb::from_center_half_extents(center, half_extents);
        let hit_triggers = self.hit_triggers(policy);
        let mut overlapping = Vec::new();

        for &entity in &self.registry {
            let Ok(collider) = world.get::<Collider>(entity) else {
                continue;
            };
            if collider.bounds.overlaps(&bounds) && !(collider.is_trigger && !hit_triggers) {
                overlapping.push(entity);
            }
        }

        overlapping
    }

    /// Returns true if any sphere collider overlaps the given sphere
    ///
    /// The test is center-to-center distance against `radius` plus the
    /// collider's vertical half-extent, and only sphere-shaped colliders
    /// participate. The trigger conjunction here requires the policy to hit
    /// triggers for any collider to match; this mirrors the historical
    /// predicate and differs from [`PhysicsWorld::overlap_sphere`].
    pub fn check_sphere(
        &mut self,
        world: &World,
        position: Vec3,
        radius: f32,
        policy: QueryTriggerInteraction,
    ) -> bool {
        self.update_registry(world);

        let hit_triggers = self.hit_triggers(policy);

        for &entity in &self.registry {
            let Ok(collider) = world.get::<Collider>(entity) else {
                continue;
            };
            if !collider.is_trigger && hit_triggers && collider.sphere_radius().is_some() {
                let distance = position.distance(collider.bounds.center());
                if distance < radius + collider.bounds.half_extents().y {
                    return true;
                }
            }
        }

        false
    }

    /// Returns every sphere collider touching or inside the given sphere
    pub fn overlap_sphere(
        &mut self,
        world: &World,
        position: Vec3,
        radius: f32,
        policy: QueryTriggerInteraction,
    ) -> Vec<Entity> {
        self.update_registry(world);

        let hit_triggers = self.hit_triggers(policy);
        let mut overlapping = Vec::new();

        for &entity in &self.registry {
            let Ok(collider) = world.get::<Collider>(entity) else {
                continue;
            };
            if !(collider.is_trigger && !hit_triggers) && collider.sphere_radius().is_some() {
                let distance = position.distance(collider.bounds.center());
                if distance < radius + collider.bounds.half_extents().y {
                    overlapping.push(entity);
                }
            }
        }

        overlapping
    }

    /// Cast a ray and return the nearest hit, if any
    pub fn raycast(
        &mut self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        policy: QueryTriggerInteraction,
    ) -> Option<RaycastHit> {
        self.update_registry(world);

        let ray = Ray::new(origin, direction);
        let hit_triggers = self.hit_triggers(policy);
        let mut nearest: Option<RaycastHit> = None;

        for &entity in &self.registry {
            let Ok(collider) = world.get::<Collider>(entity) else {
                continue;
            };
            if collider.is_trigger && !hit_triggers {
                continue;
            }
            if let Some(hit) = collider.shape.raycast(&ray, max_distance) {
                if nearest.map_or(true, |best| hit.distance < best.distance) {
                    nearest = Some(RaycastHit {
                        collider: entity,
                        rigidbody: world.get::<Rigidbody>(entity).ok().map(|_| entity),
                        point: hit.point,
                        normal: hit.normal,
                        distance: hit.distance,
                    });
                }
            }
        }

        nearest
    }

    /// Cast a ray and return every hit, nearest first
    pub fn raycast_all(
        &mut self,
        world: &World,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        policy: QueryTriggerInteraction,
    ) -> Vec<RaycastHit> {
        self.update_registry(world);

        let ray = Ray::new(origin, direction);
        let hit_triggers = self.hit_triggers(policy);
        let mut hits = Vec::new();

        for &entity in &self.registry {
            let Ok(collider) = world.get::<Collider>(entity) else {
                continue;
            };
            if collider.is_trigger && !hit_triggers {
                continue;
            }
            if let Some(hit) = collider.shape.raycast(&ray, max_distance) {
                hits.push(RaycastHit {
                    collider: entity,
                    rigidbody: world.get::<Rigidbody>(entity).ok().map(|_| entity),
                    point: hit.point,
                    normal: hit.normal,
                    distance: hit.distance,
                });
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Cast along the line segment from `start` to `end`
    pub fn linecast(
        &mut self,
        world: &World,
        start: Vec3,
        end: Vec3,
        policy: QueryTriggerInteraction,
    ) -> Option<RaycastHit> {
        let delta = end - start;
        let length = delta.length();
        if length <= f32::EPSILON {
            return None;
        }
        self.raycast(world, start, delta / length, length, policy)
    }
}
