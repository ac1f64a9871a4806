use itertools::Itertools;
use nalgebra::{Point3, Vector3};

use super::{FloatingPoint, Invertible, Plane};

/// An ordered list of 3D points with cached partial arc lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline<T: FloatingPoint> {
    points: Vec<Point3<T>>,
    /// `partial_lengths[i]` is the arc length from the first point to `points[i]`
    partial_lengths: Vec<T>,
}

impl<T: FloatingPoint> Default for Polyline<T> {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl<T: FloatingPoint> Polyline<T> {
    pub fn new(points: Vec<Point3<T>>) -> Self {
        let mut polyline = Self {
            points,
            partial_lengths: vec![],
        };
        polyline.update_length();
        polyline
    }

    fn update_length(&mut self) {
        self.partial_lengths.clear();
        let mut acc = T::zero();
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                acc += (p - self.points[i - 1]).norm();
            }
            self.partial_lengths.push(acc);
        }
    }

    pub fn points(&self) -> &[Point3<T>] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3<T>> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point3<T>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point3<T>> {
        self.points.last()
    }

    /// Total arc length
    pub fn length(&self) -> T {
        self.partial_lengths.last().copied().unwrap_or(T::zero())
    }

    /// Arc length from the first point up to the point at `index`
    pub fn partial_length(&self, index: usize) -> T {
        self.partial_lengths[index]
    }

    /// Average length of the segments
    pub fn avg_segment_length(&self) -> T {
        if self.points.len() < 2 {
            return T::zero();
        }
        self.length() / T::from_usize(self.points.len() - 1).unwrap()
    }

    pub fn push_front(&mut self, point: Point3<T>) {
        self.points.insert(0, point);
        self.update_length();
    }

    pub fn push_back(&mut self, point: Point3<T>) {
        self.points.push(point);
        self.update_length();
    }

    pub fn remove(&mut self, index: usize) -> Point3<T> {
        let removed = self.points.remove(index);
        self.update_length();
        removed
    }

    /// Centroid of the points
    pub fn average(&self) -> Point3<T> {
        average(&self.points)
    }

    /// Evaluate the polyline at a normalized arc-length parameter `s` in `[0, 1]`.
    /// Returns the point and the index of the segment containing it.
    pub fn interpolate(&self, s: T) -> (Point3<T>, usize) {
        assert!(!self.points.is_empty(), "cannot interpolate an empty polyline");
        let n = self.points.len();
        if n == 1 {
            return (self.points[0], 0);
        }

        let total = self.length();
        if total <= T::zero() {
            return (self.points[0], 0);
        }

        let target = s.clamp(T::zero(), T::one()) * total;
        let seg = self
            .partial_lengths
            .iter()
            .rposition(|l| *l <= target)
            .unwrap_or(0)
            .min(n - 2);

        let seg_length = self.partial_lengths[seg + 1] - self.partial_lengths[seg];
        if seg_length <= T::zero() {
            return (self.points[seg], seg);
        }
        let t = ((target - self.partial_lengths[seg]) / seg_length).clamp(T::zero(), T::one());
        let p = self.points[seg] + (self.points[seg + 1] - self.points[seg]) * t;
        (p, seg)
    }

    /// Evaluate the polyline at each of the given normalized parameters
    pub fn resample(&self, parameters: &[T]) -> Vec<Point3<T>> {
        parameters.iter().map(|s| self.interpolate(*s).0).collect()
    }

    /// Unit tangent at the point with the given index.
    /// Interior points average the directions of their two segments.
    pub fn tangent(&self, index: usize) -> Vector3<T> {
        let n = self.points.len();
        let dir = |i: usize, j: usize| {
            (self.points[j] - self.points[i])
                .try_normalize(T::default_epsilon())
                .unwrap_or_else(Vector3::zeros)
        };
        if n < 2 {
            return Vector3::zeros();
        }
        let v = if index == 0 {
            dir(0, 1)
        } else if index >= n - 1 {
            dir(n - 2, n - 1)
        } else {
            dir(index - 1, index) + dir(index, index + 1)
        };
        v.try_normalize(T::default_epsilon())
            .unwrap_or_else(Vector3::zeros)
    }

    /// Chop off the first part of the polyline, up to arc length `d`.
    /// Returns false (leaving the polyline untouched) if it is shorter than `d`.
    pub fn chop(&mut self, d: T) -> bool {
        let length = self.length();
        if length < d || self.points.len() < 2 {
            return false;
        }
        if d <= T::zero() {
            return true;
        }

        let (start, seg) = self.interpolate(d / length);
        let mut points = vec![start];
        points.extend(
            self.points[seg + 1..]
                .iter()
                .skip_while(|p| (*p - start).norm() < T::default_epsilon())
                .copied(),
        );
        if points.len() < 2 {
            points.push(start);
        }
        self.points = points;
        self.update_length();
        true
    }

    /// Trim away the last part of the polyline of arc length `d`.
    /// Returns false (leaving the polyline untouched) if it is shorter than `d`.
    pub fn trim(&mut self, d: T) -> bool {
        let length = self.length();
        if length < d || self.points.len() < 2 {
            return false;
        }
        if d <= T::zero() {
            return true;
        }

        let (end, seg) = self.interpolate(T::one() - d / length);
        self.points.truncate(seg + 1);
        let duplicate = self
            .points
            .last()
            .map(|p| (p - end).norm() < T::default_epsilon())
            .unwrap_or(false);
        if duplicate && self.points.len() > 1 {
            self.points.pop();
        }
        self.points.push(end);
        self.update_length();
        true
    }

    /// Best-fit plane through the points treated as a closed loop,
    /// using Newell's method. The plane passes through the centroid.
    pub fn best_fit_plane(&self) -> Option<Plane<T>> {
        best_fit_plane(&self.points)
    }

    /// Returns the best-fit plane if every point lies within
    /// `len_scale * length()` of it.
    pub fn planar_fit(&self, len_scale: T) -> Option<Plane<T>> {
        let plane = self.best_fit_plane()?;
        let threshold = self.length() * len_scale;
        self.points
            .iter()
            .all(|p| plane.distance(p) <= threshold)
            .then_some(plane)
    }
}

impl<T: FloatingPoint> From<Vec<Point3<T>>> for Polyline<T> {
    fn from(points: Vec<Point3<T>>) -> Self {
        Self::new(points)
    }
}

impl<T: FloatingPoint> Invertible for Polyline<T> {
    fn invert(&mut self) {
        self.points.reverse();
        self.update_length();
    }
}

/// Centroid of a set of points (origin if empty)
pub fn average<T: FloatingPoint>(points: &[Point3<T>]) -> Point3<T> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc: Vector3<T>, p| acc + p.coords);
    Point3::from(sum / T::from_usize(points.len()).unwrap())
}

/// Newell's normal of a closed loop of points (not normalized)
pub fn newell_normal<T: FloatingPoint>(points: &[Point3<T>]) -> Vector3<T> {
    points
        .iter()
        .circular_tuple_windows()
        .fold(Vector3::zeros(), |acc, (i, j)| {
            acc + Vector3::new(
                (i.y - j.y) * (i.z + j.z),
                (i.z - j.z) * (i.x + j.x),
                (i.x - j.x) * (i.y + j.y),
            )
        })
}

/// Best-fit plane of a closed loop (Newell's method), or `None` for
/// fewer than three points or a degenerate loop.
pub fn best_fit_plane<T: FloatingPoint>(points: &[Point3<T>]) -> Option<Plane<T>> {
    if points.len() < 3 {
        return None;
    }
    let normal = newell_normal(points).try_normalize(T::default_epsilon())?;
    Some(Plane::from_point_normal(&average(points), &normal))
}
