use nalgebra::{Point2, Vector2};

use super::{orientation, FloatingPoint, Orientation};

/// A struct representing a line segment in 2D space.
pub struct Line<T: FloatingPoint> {
    start: Point2<T>,
    end: Point2<T>,
}

impl<T: FloatingPoint> Line<T> {
    pub fn new(start: Point2<T>, end: Point2<T>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> &Point2<T> {
        &self.start
    }

    pub fn end(&self) -> &Point2<T> {
        &self.end
    }

    pub fn tangent(&self) -> Vector2<T> {
        self.end - self.start
    }

    /// Robust proper-crossing test between two segments.
    /// Touching endpoints and collinear overlaps are not reported.
    pub fn crosses(&self, other: &Line<T>) -> bool {
        let p_q1 = orientation(self.start(), self.end(), other.start());
        let p_q2 = orientation(self.start(), self.end(), other.end());
        let q_p1 = orientation(other.start(), other.end(), self.start());
        let q_p2 = orientation(other.start(), other.end(), self.end());

        if [p_q1, p_q2, q_p1, q_p2].contains(&Orientation::Collinear) {
            return false;
        }

        p_q1 != p_q2 && q_p1 != q_p2
    }
}
