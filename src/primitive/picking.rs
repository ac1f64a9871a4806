use log::debug;
use nalgebra::Point2;

use crate::misc::{polyline_closest_point, FloatingPoint};
use crate::scene::Scene;
use crate::skeleton::{CurveId, PointId};
use crate::stroke::{Camera, Stroke};

use super::Primitive;

/// Pixel spacing of the samples taken along a stroke when measuring its distance to a curve
const STEP_SIZE: f64 = 2.0;

/// Average distance from samples of `b`, taken every `STEP_SIZE` pixels,
/// to their closest points on `a`.
/// `None` if either trail has fewer than 2 points or is shorter than a step.
pub fn projected_error<T: FloatingPoint>(a: &[Point2<T>], b: &[Point2<T>]) -> Option<T> {
    let step = T::from_f64(STEP_SIZE).unwrap();
    if a.len() < 2 || b.len() < 2 || trail_length(a) < step || trail_length(b) < step {
        return None;
    }
    let length = trail_length(b);
    let steps = (length / step).round().to_usize().unwrap_or(1).max(1);
    let ds = length / T::from_usize(steps).unwrap();
    let total = (0..=steps).try_fold(T::zero(), |acc, i| {
        let s = sample(b, ds * T::from_usize(i).unwrap());
        let (_, closest) = polyline_closest_point(&s, a)?;
        Some(acc + (closest - s).norm())
    })?;
    Some(total / T::from_usize(steps + 1).unwrap())
}

fn trail_length<T: FloatingPoint>(pts: &[Point2<T>]) -> T {
    pts.windows(2)
        .fold(T::zero(), |acc, w| acc + (w[1] - w[0]).norm())
}

/// Point at arc length `d` along the trail
fn sample<T: FloatingPoint>(pts: &[Point2<T>], d: T) -> Point2<T> {
    let mut remaining = d;
    for w in pts.windows(2) {
        let len = (w[1] - w[0]).norm();
        if remaining <= len {
            if len <= T::zero() {
                return w[0];
            }
            return w[0] + (w[1] - w[0]) * (remaining / len);
        }
        remaining -= len;
    }
    pts[pts.len() - 1]
}

impl Primitive {
    /// The skeleton point of the primitive nearest to `pixel` on screen,
    /// among those in view and closer than `radius` pixels
    pub fn find_skeleton_point<T: FloatingPoint>(
        &self,
        scene: &Scene<T>,
        camera: &Camera<T>,
        pixel: &Point2<T>,
        radius: T,
    ) -> Option<PointId> {
        self.skel_points
            .iter()
            .filter_map(|id| {
                let p = scene.skeleton().point(*id)?.position();
                if !camera.in_frustum(p) {
                    return None;
                }
                let d = (camera.world_to_pixel(p) - pixel).norm();
                (d < radius).then_some((*id, d))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)
    }

    /// The skeleton curve of the primitive that `stroke` follows most closely on screen,
    /// if its average distance to the curve is below `threshold` pixels
    pub fn find_skeleton_curve<T: FloatingPoint>(
        &self,
        scene: &Scene<T>,
        camera: &Camera<T>,
        stroke: &Stroke<T>,
        threshold: T,
    ) -> Option<CurveId> {
        let found = self
            .skel_curves
            .iter()
            .filter_map(|id| {
                let curve = scene.skeleton().curve(*id)?;
                let trail: Vec<_> = curve
                    .control_points()
                    .iter()
                    .map(|p| camera.world_to_pixel(p))
                    .collect();
                let d = projected_error(&trail, stroke.points());
                if d.is_none() {
                    debug!("find_skeleton_curve: can't measure distance to curve");
                }
                d.filter(|d| *d < threshold).map(|d| (*id, d))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        if let Some((_, d)) = found {
            debug!("find_skeleton_curve: average error {:?}", d);
        }
        found.map(|(id, _)| id)
    }
}
