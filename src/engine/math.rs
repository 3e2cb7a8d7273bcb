use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    /// Always unit length.
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Distance along the ray to the first point where it enters the sphere.
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: &Point3<f32>, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(&self.direction);
        let c = oc.norm_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.norm() - 1.0).abs() < 1e-6);
        assert!((ray.direction.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn hits_sphere_in_front() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 50.0), -Vector3::z());
        let t = ray.intersect_sphere(&Point3::new(0.0, 0.0, 0.0), 2.0).unwrap();
        assert!((t - 48.0).abs() < 1e-4);
    }

    #[test]
    fn misses_sphere_off_axis() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 50.0), -Vector3::z());
        assert!(ray.intersect_sphere(&Point3::new(10.0, 0.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn ignores_sphere_behind_origin() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 50.0), -Vector3::z());
        assert!(ray.intersect_sphere(&Point3::new(0.0, 0.0, 60.0), 2.0).is_none());
    }

    #[test]
    fn origin_inside_sphere_reports_exit() {
        let ray = Ray::new(Point3::origin(), Vector3::x());
        let t = ray.intersect_sphere(&Point3::origin(), 5.0).unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }
}
