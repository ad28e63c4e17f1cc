//! Ray intersection against collider shapes

use crate::physics::components::CollisionShape;
use glam::Vec3;

/// Ray for raycasting
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Geometric result of a ray-shape intersection
#[derive(Debug, Clone, Copy)]
pub struct ShapeHit {
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World space hit point
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

impl CollisionShape {
    /// Perform a raycast against this shape in world space
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<ShapeHit> {
        match self {
            CollisionShape::Sphere { center, radius } => {
                // Ray-sphere intersection
                let oc = ray.origin - *center;
                let a = ray.direction.dot(ray.direction);
                let b = 2.0 * oc.dot(ray.direction);
                let c = oc.dot(oc) - radius * radius;
                let discriminant = b * b - 4.0 * a * c;

                if discriminant < 0.0 {
                    return None;
                }

                let sqrt_discriminant = discriminant.sqrt();
                let t1 = (-b - sqrt_discriminant) / (2.0 * a);
                let t2 = (-b + sqrt_discriminant) / (2.0 * a);

                let t = if t1 > 0.0 && t1 <= max_distance {
                    t1
                } else if t2 > 0.0 && t2 <= max_distance {
                    t2
                } else {
                    return None;
                };

                let point = ray.at(t);
                let normal = (point - *center).normalize();

                Some(ShapeHit {
                    distance: t,
                    point,
                    normal,
                })
            }
            CollisionShape::Box { center, size } => {
                // Slab method against the box's world-space extents
                let half_extents = *size * 0.5;
                let origin = ray.origin - *center;
                let inv_dir = Vec3::new(
                    1.0 / ray.direction.x,
                    1.0 / ray.direction.y,
                    1.0 / ray.direction.z,
                );

                let t1 = (-half_extents - origin) * inv_dir;
                let t2 = (half_extents - origin) * inv_dir;

                let t_min = t1.min(t2);
                let t_max = t1.max(t2);

                let t_enter = t_min.x.max(t_min.y).max(t_min.z).max(0.0);
                let t_exit = t_max.x.min(t_max.y).min(t_max.z);

                if t_enter > t_exit || t_enter > max_distance || t_exit <= 0.0 {
                    return None;
                }

                let point = ray.at(t_enter);
                let local = point - *center;

                // Determine which face was hit
                let eps = 1e-4;
                let normal = if (local.x - half_extents.x).abs() < eps {
                    Vec3::X
                } else if (local.x + half_extents.x).abs() < eps {
                    -Vec3::X
                } else if (local.y - half_extents.y).abs() < eps {
                    Vec3::Y
                } else if (local.y + half_extents.y).abs() < eps {
                    -Vec3::Y
                } else if (local.z - half_extents.z).abs() < eps {
                    Vec3::Z
                } else {
                    -Vec3::Z
                };

                Some(ShapeHit {
                    distance: t_enter,
                    point,
                    normal,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_raycast() {
        let sphere = CollisionShape::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
        };
        let ray = Ray::new(Vec3::new(-2.0, 0.0, 0.0), Vec3::X);

        let hit = sphere.raycast(&ray, 10.0).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-6);
        assert!((hit.point - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
        assert!((hit.normal - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sphere_raycast_respects_max_distance() {
        let sphere = CollisionShape::Sphere {
            center: Vec3::new(10.0, 0.0, 0.0),
            radius: 1.0,
        };
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert!(sphere.raycast(&ray, 5.0).is_none());
        assert!(sphere.raycast(&ray, 20.0).is_some());
    }

    #[test]
    fn test_box_raycast_face_normal() {
        let box_shape = CollisionShape::Box {
            center: Vec3::new(0.0, -1.0, 0.0),
            size: Vec3::new(10.0, 2.0, 10.0),
        };
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);

        let hit = box_shape.raycast(&ray, 100.0).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!((hit.normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_box_raycast_miss() {
        let box_shape = CollisionShape::Box {
            center: Vec3::ZERO,
            size: Vec3::ONE,
        };
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::X);
        assert!(box_shape.raycast(&ray, 100.0).is_none());
    }
}
