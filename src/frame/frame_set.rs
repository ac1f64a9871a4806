use slotmap::{new_key_type, SlotMap};

use crate::mesh::VertexId;
use crate::misc::FloatingPoint;

use super::{CoordFrame, FrameSource};

new_key_type! {
    /// Handle of a live coordinate frame
    pub struct FrameId;
}

/// A live frame: where it comes from, its last evaluated value and the vertices bound to it.
#[derive(Debug, Clone)]
pub struct FrameEntry<T: FloatingPoint> {
    source: FrameSource<T>,
    frame: CoordFrame<T>,
    dependents: Vec<VertexId>,
}

impl<T: FloatingPoint> FrameEntry<T> {
    pub fn source(&self) -> &FrameSource<T> {
        &self.source
    }

    pub fn frame(&self) -> &CoordFrame<T> {
        &self.frame
    }

    pub fn dependents(&self) -> &[VertexId] {
        &self.dependents
    }
}

/// Arena of live frames.
/// Frames are updated in creation order, so a frame may only read
/// geometry produced by frames created before it.
#[derive(Debug, Clone)]
pub struct FrameSet<T: FloatingPoint> {
    entries: SlotMap<FrameId, FrameEntry<T>>,
    order: Vec<FrameId>,
}

impl<T: FloatingPoint> Default for FrameSet<T> {
    fn default() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: vec![],
        }
    }
}

impl<T: FloatingPoint> FrameSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: FrameSource<T>, frame: CoordFrame<T>) -> FrameId {
        let id = self.entries.insert(FrameEntry {
            source,
            frame,
            dependents: vec![],
        });
        self.order.push(id);
        id
    }

    /// Remove a frame, returning the vertices that were bound to it
    pub fn remove(&mut self, id: FrameId) -> Vec<VertexId> {
        self.order.retain(|f| *f != id);
        self.entries
            .remove(id)
            .map(|e| e.dependents)
            .unwrap_or_default()
    }

    pub fn contains(&self, id: FrameId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: FrameId) -> Option<&FrameEntry<T>> {
        self.entries.get(id)
    }

    pub fn get(&self, id: FrameId) -> Option<&CoordFrame<T>> {
        self.entries.get(id).map(|e| &e.frame)
    }

    pub fn source(&self, id: FrameId) -> Option<&FrameSource<T>> {
        self.entries.get(id).map(|e| &e.source)
    }

    pub fn set_frame(&mut self, id: FrameId, frame: CoordFrame<T>) {
        if let Some(e) = self.entries.get_mut(id) {
            e.frame = frame;
        }
    }

    pub fn add_dependent(&mut self, id: FrameId, vertex: VertexId) {
        if let Some(e) = self.entries.get_mut(id) {
            if !e.dependents.contains(&vertex) {
                e.dependents.push(vertex);
            }
        }
    }

    pub fn remove_dependent(&mut self, id: FrameId, vertex: VertexId) {
        if let Some(e) = self.entries.get_mut(id) {
            e.dependents.retain(|v| *v != vertex);
        }
    }

    pub fn dependents(&self, id: FrameId) -> &[VertexId] {
        self.entries
            .get(id)
            .map(|e| e.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// Frame ids in creation order
    pub fn ids(&self) -> &[FrameId] {
        &self.order
    }
}
