use nalgebra::{Point3, Vector3};

use crate::misc::{FloatingPoint, Plane};

/// Represents a ray in 3D space.
#[derive(Clone, Debug)]
pub struct Ray<T: FloatingPoint> {
    pub(crate) origin: Point3<T>,
    pub(crate) direction: Vector3<T>,
}

impl<T: FloatingPoint> Ray<T> {
    pub fn new(origin: Point3<T>, direction: Vector3<T>) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> &Point3<T> {
        &self.origin
    }

    pub fn direction(&self) -> &Vector3<T> {
        &self.direction
    }

    pub fn point_at(&self, t: T) -> Point3<T> {
        self.origin + self.direction * t
    }

    /// Finds the intersection between the ray (as an infinite line) and a plane.
    /// Returns the point and the ray parameter, or `None` if they are parallel.
    pub fn intersect_plane(&self, plane: &Plane<T>) -> Option<(Point3<T>, T)> {
        let denom = plane.normal().dot(&self.direction);
        if denom.abs() < T::default_epsilon() {
            return None;
        }
        let t = -plane.signed_distance(&self.origin) / denom;
        Some((self.point_at(t), t))
    }
}
