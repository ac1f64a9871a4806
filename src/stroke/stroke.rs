use nalgebra::Point2;

use crate::misc::{FloatingPoint, Invertible, Plane, Polyline};

use super::Camera;

/// A screen-space stroke, in pixels, with optional per-sample pressure
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke<T: FloatingPoint> {
    points: Vec<Point2<T>>,
    pressures: Option<Vec<T>>,
}

impl<T: FloatingPoint> Stroke<T> {
    pub fn new(points: Vec<Point2<T>>) -> Self {
        Self {
            points,
            pressures: None,
        }
    }

    /// Stroke with pressures, one per sample
    pub fn try_with_pressures(points: Vec<Point2<T>>, pressures: Vec<T>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            points.len() == pressures.len(),
            "{} samples but {} pressures",
            points.len(),
            pressures.len()
        );
        Ok(Self {
            points,
            pressures: Some(pressures),
        })
    }

    pub fn points(&self) -> &[Point2<T>] {
        &self.points
    }

    pub fn pressures(&self) -> Option<&[T]> {
        self.pressures.as_deref()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2<T>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2<T>> {
        self.points.last()
    }

    /// Screen length in pixels
    pub fn length(&self) -> T {
        self.points
            .windows(2)
            .fold(T::zero(), |acc, w| acc + (w[1] - w[0]).norm())
    }

    /// Cast each sample through the camera onto the plane.
    /// Samples whose ray misses the plane are skipped.
    pub fn project_to_plane(&self, camera: &Camera<T>, plane: &Plane<T>) -> Polyline<T> {
        Polyline::new(
            self.points
                .iter()
                .filter_map(|p| camera.pixel_ray(p).intersect_plane(plane))
                .map(|(p, _)| p)
                .collect(),
        )
    }
}

impl<T: FloatingPoint> Invertible for Stroke<T> {
    fn invert(&mut self) {
        self.points.reverse();
        if let Some(pressures) = self.pressures.as_mut() {
            pressures.reverse();
        }
    }
}

impl<T: FloatingPoint> From<Vec<Point2<T>>> for Stroke<T> {
    fn from(points: Vec<Point2<T>>) -> Self {
        Self::new(points)
    }
}
