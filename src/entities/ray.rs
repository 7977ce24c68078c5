use glam::{Mat4, Vec3};

//World matrices with a smaller determinant are treated as degenerate.
const DETERMINANT_EPSILON: f32 = 1e-12;
const PLANE_EPSILON: f32 = 1e-6;

/// Parameter interval a box intersection has to overlap to count as a hit.
pub const SLAB_INTERVAL: (f32, f32) = (-1000.0, 1000.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub point: Vec3,
    //Cube, cone and mesh hits do not compute a normal.
    pub normal: Option<Vec3>,
    pub distance: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Ray { origin, direction }
    }

    pub fn eval_point(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Moves the ray through `inverse` (a world-to-object matrix). The direction comes out normalized.
    pub fn to_object_space(&self, inverse: &Mat4) -> Option<Ray> {
        let p = inverse.transform_point3(self.origin);
        let p1 = inverse.transform_point3(self.origin + self.direction);
        let d = (p1 - p).try_normalize()?;

        p.is_finite().then_some(Ray { origin: p, direction: d })
    }
}

/// Inverse of `m`, or `None` when it is singular or produces non-finite values.
pub fn invert(m: &Mat4) -> Option<Mat4> {
    if m.determinant().abs() < DETERMINANT_EPSILON {
        return None;
    }

    let inverse = m.inverse();
    inverse.is_finite().then_some(inverse)
}

/// Both roots of a ray against a sphere of `radius` centred at the origin, near one first.
pub fn ray_sphere(ray: &Ray, radius: f32) -> Option<(f32, f32)> {
    let a = ray.direction.length_squared();
    if a == 0.0 {
        return None;
    }

    let b = ray.origin.dot(ray.direction);
    let c = ray.origin.length_squared() - radius * radius;
    let discriminant = b * b - a * c;

    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    Some(((-b - root) / a, (-b + root) / a))
}

/// Nearest intersection in front of the ray origin.
pub fn intersect_sphere(ray: &Ray, radius: f32) -> Option<Hit> {
    let (near, far) = ray_sphere(ray, radius)?;
    let t = if near >= 0.0 {
        near
    } else if far >= 0.0 {
        far
    } else {
        return None;
    };

    let point = ray.eval_point(t);
    Some(Hit { point, normal: Some(point / radius), distance: t })
}

/// Slab test (Williams et al.) against the box `min..max`.
///
/// The hit is reported at the entry parameter, which is negative when the origin is inside
/// the box. The interval is the range of parameters that may count as a hit.
pub fn intersect_box(ray: &Ray, min: Vec3, max: Vec3, interval: (f32, f32)) -> Option<Hit> {
    let inv = ray.direction.recip();

    let (mut tmin, mut tmax) = slab(ray.origin.x, inv.x, min.x, max.x);
    let (tymin, tymax) = slab(ray.origin.y, inv.y, min.y, max.y);

    if tmin > tymax || tymin > tmax {
        return None;
    }
    tmin = tmin.max(tymin);
    tmax = tmax.min(tymax);

    let (tzmin, tzmax) = slab(ray.origin.z, inv.z, min.z, max.z);

    if tmin > tzmax || tzmin > tmax {
        return None;
    }
    tmin = tmin.max(tzmin);
    tmax = tmax.min(tzmax);

    if tmin < interval.1 && tmax > interval.0 {
        Some(Hit { point: ray.eval_point(tmin), normal: None, distance: tmin })
    } else {
        None
    }
}

fn slab(origin: f32, inv: f32, min: f32, max: f32) -> (f32, f32) {
    if inv.is_sign_negative() {
        ((max - origin) * inv, (min - origin) * inv)
    } else {
        ((min - origin) * inv, (max - origin) * inv)
    }
}

/// Parameter at which the ray meets the plane through the origin with `normal`.
/// Only hits strictly in front of the ray count.
pub fn intersect_plane(ray: &Ray, normal: Vec3) -> Option<f32> {
    let denominator = ray.direction.dot(normal);
    if denominator.abs() <= PLANE_EPSILON {
        return None;
    }

    let t = (-ray.origin).dot(normal) / denominator;
    (t > 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn eval_point_walks_along_direction() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.eval_point(1.5), Vec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn ray_through_centre_straddles_it() {
        let ray = Ray::new(Vec3::new(-3.0, 0.5, 2.0), Vec3::new(3.0, -0.5, -2.0));
        let (t0, t1) = ray_sphere(&ray, 1.0).unwrap();

        //The centre sits at t = 1 along this ray.
        assert!(t0 < 1.0 && 1.0 < t1);
        assert!((ray.eval_point(t0).length() - 1.0).abs() < EPSILON);
        assert!((ray.eval_point(t1).length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn ray_outside_radius_misses() {
        let ray = Ray::new(Vec3::new(-5.0, 1.01, 0.0), Vec3::X);
        assert!(ray_sphere(&ray, 1.0).is_none());
        assert!(intersect_sphere(&ray, 1.0).is_none());
    }

    #[test]
    fn sphere_hit_reports_nearest_point_and_normal() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = intersect_sphere(&ray, 2.0).unwrap();
        assert!((hit.point - Vec3::new(0.0, 0.0, 2.0)).length() < EPSILON);
        assert!((hit.normal.unwrap() - Vec3::Z).length() < EPSILON);
        assert!((hit.distance - 3.0).abs() < EPSILON);
    }

    #[test]
    fn sphere_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(intersect_sphere(&ray, 1.0).is_none());
    }

    #[test]
    fn ray_from_inside_sphere_hits_far_side() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let hit = intersect_sphere(&ray, 1.0).unwrap();
        assert!((hit.point - Vec3::X).length() < EPSILON);
    }

    #[test]
    fn box_slab_hits_and_misses() {
        let min = Vec3::splat(-1.0);
        let max = Vec3::splat(1.0);

        let hit = Ray::new(Vec3::new(0.5, 0.5, 10.0), Vec3::NEG_Z);
        let h = intersect_box(&hit, min, max, SLAB_INTERVAL).unwrap();
        assert!((h.point - Vec3::new(0.5, 0.5, 1.0)).length() < EPSILON);
        assert!(h.normal.is_none());

        let miss = Ray::new(Vec3::new(1.5, 0.0, 10.0), Vec3::NEG_Z);
        assert!(intersect_box(&miss, min, max, SLAB_INTERVAL).is_none());
    }

    #[test]
    fn box_outside_interval_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(intersect_box(&ray, Vec3::splat(-1.0), Vec3::splat(1.0), (0.0, 5.0)).is_none());
    }

    #[test]
    fn plane_parallel_or_behind_misses() {
        let parallel = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(intersect_plane(&parallel, Vec3::Y).is_none());

        let away = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        assert!(intersect_plane(&away, Vec3::Y).is_none());

        let down = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::NEG_Y);
        assert_eq!(intersect_plane(&down, Vec3::Y), Some(4.0));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(invert(&Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0))).is_none());
        assert!(invert(&Mat4::from_translation(Vec3::ONE)).is_some());
    }

    #[test]
    fn object_space_direction_is_normalized() {
        let world = Mat4::from_scale(Vec3::splat(4.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 8.0), Vec3::new(0.0, 0.0, -3.0));
        let local = ray.to_object_space(&invert(&world).unwrap()).unwrap();
        assert!((local.origin - Vec3::new(0.0, 0.0, 2.0)).length() < EPSILON);
        assert!((local.direction - Vec3::NEG_Z).length() < EPSILON);
    }
}
