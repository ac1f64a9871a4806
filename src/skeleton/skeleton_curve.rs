use anyhow::ensure;
use nalgebra::{Point3, Vector3};

use crate::misc::FloatingPoint;
use crate::primitive::PrimitiveId;

use super::PointId;

/// Piecewise-linear skeleton curve over `[0, 1]`, its ends pinned to two skeleton points.
#[derive(Debug, Clone)]
pub struct SkeletonCurve<T: FloatingPoint> {
    control_points: Vec<Point3<T>>,
    /// parameter of each control point, increasing from 0 to 1
    parameters: Vec<T>,
    start: PointId,
    end: PointId,
    normal: Vector3<T>,
    pub(crate) outputs: Vec<PrimitiveId>,
    pub(crate) visible: bool,
}

impl<T: FloatingPoint> SkeletonCurve<T> {
    /// Create a curve through the control points
    /// # Failures
    /// - fewer than 2 control points
    /// - parameter count differs from control point count
    /// - parameters do not run from 0 to 1 in non-decreasing order
    pub fn try_new(
        control_points: Vec<Point3<T>>,
        parameters: Vec<T>,
        start: PointId,
        end: PointId,
        normal: Vector3<T>,
    ) -> anyhow::Result<Self> {
        Self::check(&control_points, &parameters)?;
        Ok(Self {
            control_points,
            parameters,
            start,
            end,
            normal,
            outputs: vec![],
            visible: false,
        })
    }

    /// Check control points and parameters can make a curve
    pub fn check(control_points: &[Point3<T>], parameters: &[T]) -> anyhow::Result<()> {
        ensure!(
            control_points.len() >= 2,
            "a skeleton curve needs at least 2 control points"
        );
        ensure!(
            control_points.len() == parameters.len(),
            "{} control points but {} parameters",
            control_points.len(),
            parameters.len()
        );
        ensure!(
            parameters.windows(2).all(|w| w[0] <= w[1]),
            "parameters must be non-decreasing"
        );
        ensure!(
            parameters[0] == T::zero() && parameters[parameters.len() - 1] == T::one(),
            "parameters must start at 0 and end at 1"
        );
        Ok(())
    }

    pub fn control_points(&self) -> &[Point3<T>] {
        &self.control_points
    }

    pub fn parameters(&self) -> &[T] {
        &self.parameters
    }

    pub fn start(&self) -> PointId {
        self.start
    }

    pub fn end(&self) -> PointId {
        self.end
    }

    pub fn normal(&self) -> &Vector3<T> {
        &self.normal
    }

    /// Number of segments between control points
    pub fn edge_count(&self) -> usize {
        self.control_points.len() - 1
    }

    pub fn outputs(&self) -> &[PrimitiveId] {
        &self.outputs
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn length(&self) -> T {
        self.control_points
            .windows(2)
            .fold(T::zero(), |acc, w| acc + (w[1] - w[0]).norm())
    }

    /// Point on the curve at parameter `t`, clamped to `[0, 1]`
    pub fn map(&self, t: T) -> Point3<T> {
        let t = t.clamp(T::zero(), T::one());
        let last = self.parameters.len() - 1;
        let seg = self
            .parameters
            .iter()
            .rposition(|p| *p <= t)
            .unwrap_or(0)
            .min(last - 1);
        let (t0, t1) = (self.parameters[seg], self.parameters[seg + 1]);
        let (p0, p1) = (self.control_points[seg], self.control_points[seg + 1]);
        if t1 <= t0 {
            return p0;
        }
        p0 + (p1 - p0) * ((t - t0) / (t1 - t0))
    }

    /// Move the endpoints onto `start` and `end`, shifting every control point
    /// by the parameter-weighted blend of the two endpoint displacements.
    pub fn pin_endpoints(&mut self, start: &Point3<T>, end: &Point3<T>) {
        let last = self.control_points.len() - 1;
        let d1 = start - self.control_points[0];
        let d2 = end - self.control_points[last];
        for (p, t) in self.control_points.iter_mut().zip(self.parameters.iter()) {
            *p += d1 * (T::one() - *t) + d2 * *t;
        }
        self.control_points[0] = *start;
        self.control_points[last] = *end;
    }
}
