use glam::{Mat4, Vec3};

use crate::entities::mesh::MeshBinding;
use crate::entities::ray::{self, Hit, Ray, SLAB_INTERVAL};

/// The closed set of things a node can be. Intersection is done per variant in object space.
#[derive(Debug, Clone)]
pub enum Shape {
    Generic,
    Sphere { radius: f32 },
    Joint { radius: f32 },
    Cube { width: f32, height: f32, depth: f32 },
    //Picked through its bounding box, not the cone surface.
    Cone { radius: f32, height: f32 },
    Plane { normal: Vec3, width: f32, height: f32 },
    Mesh(MeshBinding),
}

impl Shape {
    pub fn cube() -> Self {
        Shape::Cube { width: 2.0, height: 2.0, depth: 2.0 }
    }

    pub fn cone() -> Self {
        Shape::Cone { radius: 1.0, height: 2.0 }
    }

    pub fn is_joint(&self) -> bool {
        matches!(self, Shape::Joint { .. })
    }

    pub fn radius(&self) -> Option<f32> {
        match self {
            Shape::Sphere { radius } | Shape::Joint { radius } | Shape::Cone { radius, .. } => {
                Some(*radius)
            }
            _ => None,
        }
    }

    /// Object-space bounds, `None` for shapes without geometry.
    pub fn extents(&self) -> Option<(Vec3, Vec3)> {
        match self {
            Shape::Generic => None,
            Shape::Sphere { radius } | Shape::Joint { radius } => {
                Some((Vec3::splat(-radius), Vec3::splat(*radius)))
            }
            Shape::Cube { width, height, depth } => {
                let half = Vec3::new(*width, *height, *depth) / 2.0;
                Some((-half, half))
            }
            Shape::Cone { radius, height } => {
                Some((Vec3::new(-radius, -radius, 0.0), Vec3::new(*radius, *radius, *height)))
            }
            Shape::Plane { width, height, .. } => Some((
                Vec3::new(-width / 2.0, 0.0, -height / 2.0),
                Vec3::new(width / 2.0, 0.0, height / 2.0),
            )),
            Shape::Mesh(binding) => Some((binding.model.aabb_min, binding.model.aabb_max)),
        }
    }

    /// Intersection with a ray that is already in object space.
    pub fn intersect_local(&self, ray: &Ray) -> Option<Hit> {
        match self {
            Shape::Generic => None,
            Shape::Sphere { radius } | Shape::Joint { radius } => ray::intersect_sphere(ray, *radius),
            Shape::Cube { .. } | Shape::Cone { .. } | Shape::Mesh(_) => {
                let (min, max) = self.extents()?;
                ray::intersect_box(ray, min, max, SLAB_INTERVAL)
            }
            Shape::Plane { normal, width, height } => {
                let t = ray::intersect_plane(ray, *normal)?;
                let point = ray.eval_point(t);

                let inside = point.x > -width / 2.0
                    && point.x < width / 2.0
                    && point.z > -height / 2.0
                    && point.z < height / 2.0;

                inside.then_some(Hit { point, normal: Some(*normal), distance: t })
            }
        }
    }

    /// Intersection with a world-space ray for a shape placed by `world`.
    ///
    /// The hit point and normal are returned in world space. A degenerate world matrix never hits.
    pub fn intersect(&self, world: &Mat4, ray: &Ray) -> Option<Hit> {
        let inverse = ray::invert(world)?;
        let local = ray.to_object_space(&inverse)?;
        let hit = self.intersect_local(&local)?;

        let point = world.transform_point3(hit.point);
        let normal = hit
            .normal
            .and_then(|n| inverse.transpose().transform_vector3(n).try_normalize());

        Some(Hit { point, normal, distance: (point - ray.origin).length() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn ground() -> Shape {
        Shape::Plane { normal: Vec3::Y, width: 20.0, height: 20.0 }
    }

    #[test]
    fn plane_accepts_points_inside_rectangle() {
        let world = Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0));
        let ray = Ray::new(Vec3::new(3.0, 10.0, -4.0), Vec3::NEG_Y);

        let hit = ground().intersect(&world, &ray).unwrap();
        assert!((hit.point - Vec3::new(3.0, -2.0, -4.0)).length() < EPSILON);
        assert!((hit.normal.unwrap() - Vec3::Y).length() < EPSILON);
    }

    #[test]
    fn plane_rejects_points_outside_rectangle() {
        let world = Mat4::from_translation(Vec3::new(0.0, -2.0, 0.0));
        //On the infinite plane, but 1 unit past the edge.
        let ray = Ray::new(Vec3::new(11.0, 10.0, 0.0), Vec3::NEG_Y);
        assert!(ground().intersect(&world, &ray).is_none());

        let edge = Ray::new(Vec3::new(10.0, 10.0, 0.0), Vec3::NEG_Y);
        assert!(ground().intersect(&world, &edge).is_none());
    }

    #[test]
    fn plane_rectangle_follows_position() {
        let world = Mat4::from_translation(Vec3::new(15.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(20.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!(ground().intersect(&world, &ray).is_some());
    }

    #[test]
    fn cone_is_picked_by_its_bounding_box() {
        //A ray grazing the box corner misses the real cone but still hits.
        let ray = Ray::new(Vec3::new(0.95, 0.95, 10.0), Vec3::NEG_Z);
        let hit = Shape::cone().intersect(&Mat4::IDENTITY, &ray).unwrap();
        assert!(hit.normal.is_none());
        assert!((hit.point.z - 2.0).abs() < EPSILON);
    }

    #[test]
    fn cube_hit_has_no_normal() {
        let world = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = Shape::cube().intersect(&world, &ray).unwrap();
        assert!(hit.normal.is_none());
        assert!((hit.point - Vec3::new(0.0, 0.0, -4.0)).length() < EPSILON);
        assert!((hit.distance - 4.0).abs() < EPSILON);
    }

    #[test]
    fn scaled_sphere_is_hit_at_scaled_surface() {
        let world = Mat4::from_scale(Vec3::splat(3.0));
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        let hit = Shape::Sphere { radius: 1.0 }.intersect(&world, &ray).unwrap();
        assert!((hit.point - Vec3::new(0.0, 3.0, 0.0)).length() < EPSILON);
        assert!((hit.normal.unwrap() - Vec3::Y).length() < EPSILON);
    }

    #[test]
    fn degenerate_world_matrix_never_hits() {
        let world = Mat4::from_scale(Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(Shape::Joint { radius: 1.0 }.intersect(&world, &ray).is_none());
        assert!(Shape::cube().intersect(&world, &ray).is_none());
    }

    #[test]
    fn generic_nodes_are_never_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(Shape::Generic.intersect(&Mat4::IDENTITY, &ray).is_none());
        assert!(Shape::Generic.extents().is_none());
    }
}
