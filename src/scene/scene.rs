use log::{debug, warn};
use nalgebra::Point3;
use slotmap::{SecondaryMap, SlotMap};

use crate::frame::{CoordFrame, FrameBoundVertex, FrameId, FrameSet, FrameSource};
use crate::mesh::{Mesh, MeshChange, VertexId};
use crate::misc::FloatingPoint;
use crate::primitive::{BuildOptions, Primitive, PrimitiveId};
use crate::skeleton::{PointId, Skeleton};

/// Everything primitives are built into: the control mesh, live frames,
/// the skeleton, frame bindings of mesh vertices and the primitives themselves.
#[derive(Debug, Clone)]
pub struct Scene<T: FloatingPoint> {
    mesh: Mesh<T>,
    frames: FrameSet<T>,
    skeleton: Skeleton<T>,
    bindings: SecondaryMap<VertexId, FrameBoundVertex<T>>,
    primitives: SlotMap<PrimitiveId, Primitive>,
    options: BuildOptions<T>,
}

impl<T: FloatingPoint> Default for Scene<T> {
    fn default() -> Self {
        Self::with_options(BuildOptions::default())
    }
}

impl<T: FloatingPoint> Scene<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions<T>) -> Self {
        Self {
            mesh: Mesh::new(),
            frames: FrameSet::new(),
            skeleton: Skeleton::new(),
            bindings: SecondaryMap::new(),
            primitives: SlotMap::with_key(),
            options,
        }
    }

    pub fn options(&self) -> &BuildOptions<T> {
        &self.options
    }

    pub fn set_options(&mut self, options: BuildOptions<T>) {
        self.options = options;
    }

    pub fn mesh(&self) -> &Mesh<T> {
        &self.mesh
    }

    pub fn mesh_mut(&mut self) -> &mut Mesh<T> {
        &mut self.mesh
    }

    pub fn frames(&self) -> &FrameSet<T> {
        &self.frames
    }

    pub fn skeleton(&self) -> &Skeleton<T> {
        &self.skeleton
    }

    pub fn skeleton_mut(&mut self) -> &mut Skeleton<T> {
        &mut self.skeleton
    }

    pub fn frame(&self, id: FrameId) -> Option<&CoordFrame<T>> {
        self.frames.get(id)
    }

    /// Add a live frame, evaluated right away.
    /// Returns `None` if the source cannot be evaluated against the current scene.
    pub fn add_frame(&mut self, source: FrameSource<T>) -> Option<FrameId> {
        let frame = source.evaluate(&self.mesh, &self.skeleton)?;
        Some(self.frames.insert(source, frame))
    }

    /// Destroy a frame. Vertices bound to it keep their last position,
    /// skeleton points following it stay where they are.
    pub fn remove_frame(&mut self, id: FrameId) {
        for v in self.frames.remove(id) {
            if let Some(binding) = self.bindings.get_mut(v) {
                if binding.frame() == Some(id) {
                    binding.on_frame_destroyed();
                }
            }
        }
        self.skeleton.release_anchor(id);
    }

    /// Add a mesh vertex at the given frame-local coordinates, bound to the frame
    pub fn add_bound_vertex(&mut self, frame: FrameId, local: Point3<T>) -> Option<VertexId> {
        let f = self.frames.get(frame)?;
        let binding = FrameBoundVertex::from_local(frame, f, local);
        let v = self.mesh.add_vertex(*binding.position());
        self.bindings.insert(v, binding);
        self.frames.add_dependent(frame, v);
        Some(v)
    }

    /// Bind an existing vertex to a frame, keeping its current position
    pub fn bind_vertex(&mut self, vertex: VertexId, frame: FrameId) -> bool {
        let (Some(p), Some(f)) = (self.mesh.position(vertex), self.frames.get(frame)) else {
            return false;
        };
        let binding = FrameBoundVertex::new(frame, f, p);
        self.unbind_vertex(vertex);
        self.bindings.insert(vertex, binding);
        self.frames.add_dependent(frame, vertex);
        true
    }

    /// Drop the frame binding of a vertex; its position stays as it is
    pub fn unbind_vertex(&mut self, vertex: VertexId) {
        if let Some(frame) = self.bindings.remove(vertex).and_then(|b| b.frame()) {
            self.frames.remove_dependent(frame, vertex);
        }
    }

    pub fn binding(&self, vertex: VertexId) -> Option<&FrameBoundVertex<T>> {
        self.bindings.get(vertex)
    }

    /// Move a vertex to a world position.
    /// A bound vertex keeps following its frame from the new offset.
    pub fn move_vertex(&mut self, vertex: VertexId, p: Point3<T>) -> bool {
        if !self.mesh.contains_vertex(vertex) {
            return false;
        }
        if let Some(binding) = self.bindings.get_mut(vertex) {
            let frame = binding.frame().and_then(|f| self.frames.get(f));
            binding.move_to(p, frame);
        }
        self.mesh.set_position(vertex, p);
        self.update_frames();
        true
    }

    /// Move a skeleton point.
    /// A point following a frame keeps following it from its new pose.
    pub fn move_skeleton_point(&mut self, id: PointId, frame: CoordFrame<T>) -> bool {
        let Some(point) = self.skeleton.point(id) else {
            return false;
        };
        if let Some((anchor, _)) = point.anchor() {
            let anchor = *anchor;
            match self.frames.get(anchor) {
                Some(anchor_frame) => {
                    let local = anchor_frame.relative(&frame);
                    self.skeleton.set_anchor(id, anchor, local);
                }
                None => warn!("skeleton point follows a missing frame"),
            }
        }
        self.skeleton.move_point(id, frame);
        self.update_frames();
        true
    }

    /// Re-evaluate every frame in creation order, moving the vertices
    /// bound to it and the skeleton points following it.
    /// A frame that cannot be evaluated keeps its last value.
    pub fn update_frames(&mut self) {
        let mut moved = false;
        for id in self.frames.ids().to_vec() {
            let Some(source) = self.frames.source(id) else {
                continue;
            };
            let Some(frame) = source.evaluate(&self.mesh, &self.skeleton) else {
                debug!("update_frames: frame source no longer evaluates");
                continue;
            };

            for v in self.frames.dependents(id).to_vec() {
                if let Some(binding) = self.bindings.get_mut(v) {
                    if binding.frame() == Some(id) {
                        let p = *binding.recompute(&frame);
                        self.mesh.set_position(v, p);
                        moved = true;
                    }
                }
            }
            for p in self.skeleton.points_anchored_to(id) {
                self.skeleton.follow_anchor(p, &frame);
            }
            self.frames.set_frame(id, frame);
        }
        if moved {
            self.mesh.changed(MeshChange::Geometry);
        }
    }

    /// Register a built primitive and record it as an output of its skeleton entities
    pub fn insert_primitive(&mut self, primitive: Primitive) -> PrimitiveId {
        let points = primitive.skel_points.clone();
        let curves = primitive.skel_curves.clone();
        let id = self.primitives.insert(primitive);
        points
            .into_iter()
            .for_each(|p| self.skeleton.absorb_point(p, id));
        curves
            .into_iter()
            .for_each(|c| self.skeleton.absorb_curve(c, id));
        id
    }

    /// Undo a partially built primitive
    pub(crate) fn discard(&mut self, primitive: Primitive) {
        let id = self.insert_primitive(primitive);
        self.delete_primitive(id);
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id)
    }

    pub fn primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.primitives.iter()
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Show or hide a primitive's faces
    pub fn set_primitive_visible(&mut self, id: PrimitiveId, visible: bool) {
        let Some(primitive) = self.primitives.get_mut(id) else {
            return;
        };
        primitive.visible = visible;
        for f in primitive.faces.iter() {
            self.mesh.set_face_visible(*f, visible);
        }
        self.mesh.changed(MeshChange::Triangulation);
    }

    /// Remove a primitive with its generated faces, vertices and frames.
    /// Skeleton entities it created are removed once nothing else uses them,
    /// and the attachment faces it covered are shown again.
    pub fn delete_primitive(&mut self, id: PrimitiveId) -> bool {
        let Some(primitive) = self.primitives.remove(id) else {
            return false;
        };

        for f in primitive.faces.iter() {
            self.mesh.remove_face(*f);
        }
        for v in primitive.vertices.iter() {
            self.unbind_vertex(*v);
            if self.mesh.remove_vertex(*v).is_none() && self.mesh.contains_vertex(*v) {
                warn!("delete_primitive: generated vertex still in use");
            }
        }
        for f in primitive.frames.iter().rev() {
            self.remove_frame(*f);
        }

        for p in primitive.skel_points.iter() {
            self.skeleton.unabsorb_point(*p, id);
        }
        for c in primitive.skel_curves.iter() {
            self.skeleton.unabsorb_curve(*c, id);
        }
        for c in primitive.created_curves.iter() {
            if self
                .skeleton
                .curve(*c)
                .is_some_and(|curve| curve.outputs().is_empty())
            {
                self.skeleton.remove_curve(*c);
            }
        }
        for p in primitive.created_points.iter() {
            let unused = self
                .skeleton
                .point(*p)
                .is_some_and(|point| point.outputs().is_empty());
            if unused && self.skeleton.is_isolated(*p) {
                self.skeleton.remove_point(*p);
            }
        }

        for f in primitive.pushed.iter() {
            self.mesh.set_face_visible(*f, true);
        }
        self.mesh.changed(MeshChange::Triangulation);
        debug!("deleted primitive {}", primitive.name());
        true
    }
}
