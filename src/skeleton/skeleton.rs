use nalgebra::IsometryMatrix3;
use slotmap::{new_key_type, SlotMap};

use crate::frame::{CoordFrame, FrameId};
use crate::misc::FloatingPoint;
use crate::primitive::PrimitiveId;

use super::{SkeletonCurve, SkeletonPoint};

new_key_type! {
    /// Handle of a skeleton point
    pub struct PointId;
    /// Handle of a skeleton curve
    pub struct CurveId;
}

/// Arena owning skeleton points and curves.
/// Primitives refer to them by handle and record themselves as outputs.
#[derive(Debug, Clone)]
pub struct Skeleton<T: FloatingPoint> {
    points: SlotMap<PointId, SkeletonPoint<T>>,
    curves: SlotMap<CurveId, SkeletonCurve<T>>,
}

impl<T: FloatingPoint> Default for Skeleton<T> {
    fn default() -> Self {
        Self {
            points: SlotMap::with_key(),
            curves: SlotMap::with_key(),
        }
    }
}

impl<T: FloatingPoint> Skeleton<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&mut self, frame: CoordFrame<T>) -> PointId {
        self.points.insert(SkeletonPoint::new(frame))
    }

    /// Add a point following the given live frame.
    /// The point's current pose relative to `anchor_frame` is kept from now on.
    pub fn add_anchored_point(
        &mut self,
        frame: CoordFrame<T>,
        anchor: FrameId,
        anchor_frame: &CoordFrame<T>,
    ) -> PointId {
        let local = anchor_frame.relative(&frame);
        let mut point = SkeletonPoint::new(frame);
        point.anchor = Some((anchor, local));
        self.points.insert(point)
    }

    pub fn add_curve(&mut self, curve: SkeletonCurve<T>) -> CurveId {
        self.curves.insert(curve)
    }

    pub fn remove_point(&mut self, id: PointId) -> Option<SkeletonPoint<T>> {
        self.points.remove(id)
    }

    pub fn remove_curve(&mut self, id: CurveId) -> Option<SkeletonCurve<T>> {
        self.curves.remove(id)
    }

    pub fn point(&self, id: PointId) -> Option<&SkeletonPoint<T>> {
        self.points.get(id)
    }

    pub fn curve(&self, id: CurveId) -> Option<&SkeletonCurve<T>> {
        self.curves.get(id)
    }

    pub fn points(&self) -> impl Iterator<Item = (PointId, &SkeletonPoint<T>)> {
        self.points.iter()
    }

    pub fn curves(&self) -> impl Iterator<Item = (CurveId, &SkeletonCurve<T>)> {
        self.curves.iter()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Curves having the point as one of their ends
    pub fn curves_of_point(&self, id: PointId) -> Vec<CurveId> {
        self.curves
            .iter()
            .filter(|(_, c)| c.start() == id || c.end() == id)
            .map(|(cid, _)| cid)
            .collect()
    }

    /// A point no curve ends at
    pub fn is_isolated(&self, id: PointId) -> bool {
        self.points.contains_key(id) && self.curves_of_point(id).is_empty()
    }

    /// Points following the given frame
    pub fn points_anchored_to(&self, frame: FrameId) -> Vec<PointId> {
        self.points
            .iter()
            .filter(|(_, p)| matches!(p.anchor, Some((f, _)) if f == frame))
            .map(|(id, _)| id)
            .collect()
    }

    /// Detach every point following the given frame, leaving them where they are
    pub fn release_anchor(&mut self, frame: FrameId) {
        for p in self.points.values_mut() {
            if matches!(p.anchor, Some((f, _)) if f == frame) {
                p.anchor = None;
            }
        }
    }

    /// Re-place an anchored point after its anchor frame moved
    pub fn follow_anchor(&mut self, id: PointId, anchor_frame: &CoordFrame<T>) {
        let frame = match self.points.get(id).and_then(|p| p.anchor.as_ref()) {
            Some((_, local)) => anchor_frame.compose(local),
            None => return,
        };
        self.move_point(id, frame);
    }

    /// Move a point and drag the ends of its curves along
    pub fn move_point(&mut self, id: PointId, frame: CoordFrame<T>) {
        match self.points.get_mut(id) {
            Some(p) => p.frame = frame,
            None => return,
        }
        for cid in self.curves_of_point(id) {
            self.pin_curve(cid);
        }
    }

    /// Re-pin a curve onto its current end points
    pub fn pin_curve(&mut self, id: CurveId) {
        let Some(curve) = self.curves.get(id) else {
            return;
        };
        let start = self.points.get(curve.start()).map(|p| *p.position());
        let end = self.points.get(curve.end()).map(|p| *p.position());
        if let (Some(start), Some(end), Some(curve)) = (start, end, self.curves.get_mut(id)) {
            curve.pin_endpoints(&start, &end);
        }
    }

    /// Set the local pose of an anchored point relative to its frame
    pub fn set_anchor(&mut self, id: PointId, anchor: FrameId, local: IsometryMatrix3<T>) {
        if let Some(p) = self.points.get_mut(id) {
            p.anchor = Some((anchor, local));
        }
    }

    pub fn set_point_visible(&mut self, id: PointId, visible: bool) {
        if let Some(p) = self.points.get_mut(id) {
            p.visible = visible;
        }
    }

    pub fn set_curve_visible(&mut self, id: CurveId, visible: bool) {
        if let Some(c) = self.curves.get_mut(id) {
            c.visible = visible;
        }
    }

    /// Record a primitive as depending on the point
    pub fn absorb_point(&mut self, id: PointId, primitive: PrimitiveId) {
        if let Some(p) = self.points.get_mut(id) {
            if !p.outputs.contains(&primitive) {
                p.outputs.push(primitive);
            }
        }
    }

    pub fn absorb_curve(&mut self, id: CurveId, primitive: PrimitiveId) {
        if let Some(c) = self.curves.get_mut(id) {
            if !c.outputs.contains(&primitive) {
                c.outputs.push(primitive);
            }
        }
    }

    pub fn unabsorb_point(&mut self, id: PointId, primitive: PrimitiveId) {
        if let Some(p) = self.points.get_mut(id) {
            p.outputs.retain(|o| *o != primitive);
        }
    }

    pub fn unabsorb_curve(&mut self, id: CurveId, primitive: PrimitiveId) {
        if let Some(c) = self.curves.get_mut(id) {
            c.outputs.retain(|o| *o != primitive);
        }
    }
}
