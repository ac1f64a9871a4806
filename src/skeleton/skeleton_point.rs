use nalgebra::{IsometryMatrix3, Point3};

use crate::frame::{CoordFrame, FrameId};
use crate::misc::FloatingPoint;
use crate::primitive::PrimitiveId;

/// A skeleton point: one end of a tube, or the core of a ball.
/// Carries its own frame, optionally following another live frame.
#[derive(Debug, Clone)]
pub struct SkeletonPoint<T: FloatingPoint> {
    pub(crate) frame: CoordFrame<T>,
    /// frame this point follows, with the point's pose relative to it
    pub(crate) anchor: Option<(FrameId, IsometryMatrix3<T>)>,
    /// primitives that absorbed this point
    pub(crate) outputs: Vec<PrimitiveId>,
    pub(crate) visible: bool,
}

impl<T: FloatingPoint> SkeletonPoint<T> {
    pub fn new(frame: CoordFrame<T>) -> Self {
        Self {
            frame,
            anchor: None,
            outputs: vec![],
            visible: false,
        }
    }

    pub fn frame(&self) -> &CoordFrame<T> {
        &self.frame
    }

    pub fn position(&self) -> &Point3<T> {
        self.frame.origin()
    }

    pub fn anchor(&self) -> Option<&(FrameId, IsometryMatrix3<T>)> {
        self.anchor.as_ref()
    }

    pub fn outputs(&self) -> &[PrimitiveId] {
        &self.outputs
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
