use nalgebra::Point3;

use crate::misc::FloatingPoint;

use super::{CoordFrame, FrameId};

/// A mesh vertex position derived from a coordinate frame plus a frame-local offset.
///
/// The cached world position equals `frame.transform() * local`
/// for as long as the frame exists. Once the frame is destroyed
/// the vertex keeps its last known position.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBoundVertex<T: FloatingPoint> {
    frame: Option<FrameId>,
    local: Point3<T>,
    cached: Point3<T>,
    dirty: bool,
}

impl<T: FloatingPoint> FrameBoundVertex<T> {
    /// Bind a world position to a frame, deriving the local offset from it
    pub fn new(id: FrameId, frame: &CoordFrame<T>, world: Point3<T>) -> Self {
        let local = frame.to_local(&world);
        Self {
            frame: Some(id),
            local,
            cached: frame.to_world(&local),
            dirty: false,
        }
    }

    /// Bind a frame-local offset to a frame
    pub fn from_local(id: FrameId, frame: &CoordFrame<T>, local: Point3<T>) -> Self {
        Self {
            frame: Some(id),
            local,
            cached: frame.to_world(&local),
            dirty: false,
        }
    }

    pub fn frame(&self) -> Option<FrameId> {
        self.frame
    }

    pub fn local(&self) -> &Point3<T> {
        &self.local
    }

    pub fn position(&self) -> &Point3<T> {
        &self.cached
    }

    /// Whether the local offset was retargeted since the flag was last cleared
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Recompute the cached position after the frame changed.
    /// The local offset is left untouched.
    pub fn recompute(&mut self, frame: &CoordFrame<T>) -> &Point3<T> {
        if self.frame.is_some() {
            self.cached = frame.to_world(&self.local);
        }
        &self.cached
    }

    /// Retarget the vertex to the world position `p` by re-deriving its local offset.
    /// Returns false without doing anything if the vertex has no frame.
    pub fn move_to(&mut self, p: Point3<T>, frame: Option<&CoordFrame<T>>) -> bool {
        match (self.frame, frame) {
            (Some(_), Some(frame)) => {
                self.local = frame.to_local(&p);
                self.cached = frame.to_world(&self.local);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Drop the frame reference and freeze the cached position
    pub fn on_frame_destroyed(&mut self) {
        self.frame = None;
    }
}
