use nalgebra::{Point3, Vector3};

use crate::misc::FloatingPoint;

/// A plane in 3D space: the set of points `p` with `normal · p == constant`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane<T: FloatingPoint> {
    normal: Vector3<T>,
    constant: T,
}

impl<T: FloatingPoint> Plane<T> {
    pub fn new(normal: Vector3<T>, constant: T) -> Self {
        Self { normal, constant }
    }

    /// Create a plane passing through `point` with the given (unit) normal.
    pub fn from_point_normal(point: &Point3<T>, normal: &Vector3<T>) -> Self {
        let normal = normal.normalize();
        Self {
            constant: normal.dot(&point.coords),
            normal,
        }
    }

    pub fn normal(&self) -> Vector3<T> {
        self.normal
    }

    pub fn constant(&self) -> T {
        self.constant
    }

    /// Any point lying on the plane.
    pub fn origin(&self) -> Point3<T> {
        Point3::from(self.normal * self.constant)
    }

    /// Calculate the signed distance from a point to the plane.
    pub fn signed_distance(&self, point: &Point3<T>) -> T {
        self.normal.dot(&point.coords) - self.constant
    }

    pub fn distance(&self, point: &Point3<T>) -> T {
        self.signed_distance(point).abs()
    }

    /// Orthogonal projection of a point onto the plane.
    pub fn project(&self, point: &Point3<T>) -> Point3<T> {
        point - self.normal * self.signed_distance(point)
    }

    /// The same plane with the opposite orientation.
    pub fn negated(&self) -> Self {
        Self::new(-self.normal, -self.constant)
    }
}
