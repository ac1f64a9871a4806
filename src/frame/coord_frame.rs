use log::warn;
use nalgebra::{IsometryMatrix3, Matrix3, Point3, Rotation3, Translation3, Vector3};

use crate::misc::FloatingPoint;

/// An orthonormal coordinate frame.
/// Local x runs along the tangent `t` (the length axis of a tube),
/// local y along `b`, local z along `n`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordFrame<T: FloatingPoint> {
    origin: Point3<T>,
    tangent: Vector3<T>,
    binormal: Vector3<T>,
    normal: Vector3<T>,
}

impl<T: FloatingPoint> Default for CoordFrame<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: FloatingPoint> CoordFrame<T> {
    /// World frame at the origin
    pub fn identity() -> Self {
        Self {
            origin: Point3::origin(),
            tangent: Vector3::x(),
            binormal: Vector3::y(),
            normal: Vector3::z(),
        }
    }

    /// Build a frame from an origin, a tangent and a normal hint.
    /// `b = normalize(n × t)` and `n' = t × b`, so the hint only needs to be
    /// non-parallel to the tangent.
    pub fn new(origin: Point3<T>, tangent: &Vector3<T>, normal: &Vector3<T>) -> Self {
        let eps = T::default_epsilon();
        let t = match tangent.try_normalize(eps) {
            Some(t) => t,
            None => {
                warn!("undefined frame tangent, falling back to the x axis");
                Vector3::x()
            }
        };
        let b = normal
            .cross(&t)
            .try_normalize(eps)
            .unwrap_or_else(|| any_perpendicular(&t));
        let n = t.cross(&b);
        Self {
            origin,
            tangent: t,
            binormal: b,
            normal: n,
        }
    }

    pub fn origin(&self) -> &Point3<T> {
        &self.origin
    }

    pub fn tangent(&self) -> &Vector3<T> {
        &self.tangent
    }

    pub fn binormal(&self) -> &Vector3<T> {
        &self.binormal
    }

    pub fn normal(&self) -> &Vector3<T> {
        &self.normal
    }

    /// Transformation from frame-local coordinates to world coordinates
    pub fn transform(&self) -> IsometryMatrix3<T> {
        let rot = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[
            self.tangent,
            self.binormal,
            self.normal,
        ]));
        let trans = Translation3::from(self.origin.coords);
        IsometryMatrix3::from_parts(trans, rot)
    }

    /// Transformation from world coordinates to frame-local coordinates
    pub fn inverse(&self) -> IsometryMatrix3<T> {
        self.transform().inverse()
    }

    pub fn to_world(&self, local: &Point3<T>) -> Point3<T> {
        self.transform() * local
    }

    pub fn to_local(&self, world: &Point3<T>) -> Point3<T> {
        self.transform().inverse_transform_point(world)
    }

    /// The frame with its origin moved by `distance` along the tangent
    pub fn advanced(&self, distance: T) -> Self {
        Self {
            origin: self.origin + self.tangent * distance,
            ..self.clone()
        }
    }

    /// The frame composed with a local isometry
    pub fn compose(&self, local: &IsometryMatrix3<T>) -> Self {
        let m = self.transform() * local;
        let r = m.rotation.matrix();
        Self {
            origin: Point3::from(m.translation.vector),
            tangent: r.column(0).into_owned(),
            binormal: r.column(1).into_owned(),
            normal: r.column(2).into_owned(),
        }
    }

    /// The local isometry taking this frame onto `other`
    pub fn relative(&self, other: &CoordFrame<T>) -> IsometryMatrix3<T> {
        self.inverse() * other.transform()
    }
}

fn any_perpendicular<T: FloatingPoint>(v: &Vector3<T>) -> Vector3<T> {
    let axis = if v.x.abs() < T::from_f64(0.9).unwrap() {
        Vector3::x()
    } else {
        Vector3::y()
    };
    v.cross(&axis).normalize()
}
