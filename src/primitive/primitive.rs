use log::debug;
use slotmap::new_key_type;

use crate::command::{MultiCommand, PushFaces, ShowPrimitive, ShowSkeleton, SkeletonItem};
use crate::frame::{FrameId, FrameSource};
use crate::mesh::{FaceId, MeshChange, VertexId};
use crate::misc::FloatingPoint;
use crate::scene::Scene;
use crate::skeleton::{CurveId, PointId};

use super::{BuildError, BuildResult};

new_key_type! {
    /// Handle of a primitive in a scene
    pub struct PrimitiveId;
}

/// What built a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Tube grown from one attachment region, optionally ending at a second one
    Branch,
    /// Square tube around a skeleton curve drawn from a skeleton point
    SimpleTube,
    Ball,
    Roof,
    Wafer,
}

/// One cross-section of a primitive and the frame its generated vertices follow.
/// `frame` is `None` when the ring reuses existing mesh vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    pub frame: Option<FrameId>,
    pub vertices: Vec<VertexId>,
}

/// Bookkeeping of a built primitive: everything it generated,
/// the skeleton entities it absorbed and the faces it attaches to.
#[derive(Debug, Clone)]
pub struct Primitive {
    name: String,
    kind: PrimitiveKind,
    pub(crate) vertices: Vec<VertexId>,
    pub(crate) faces: Vec<FaceId>,
    pub(crate) frames: Vec<FrameId>,
    pub(crate) skel_points: Vec<PointId>,
    pub(crate) skel_curves: Vec<CurveId>,
    /// skeleton entities created for this primitive, removed with it
    pub(crate) created_points: Vec<PointId>,
    pub(crate) created_curves: Vec<CurveId>,
    pub(crate) base1: Vec<FaceId>,
    pub(crate) base2: Vec<FaceId>,
    /// attachment faces hidden under the primitive
    pub(crate) pushed: Vec<FaceId>,
    pub(crate) rings: Vec<Ring>,
    pub(crate) visible: bool,
}

impl Primitive {
    pub fn new(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            kind,
            vertices: vec![],
            faces: vec![],
            frames: vec![],
            skel_points: vec![],
            skel_curves: vec![],
            created_points: vec![],
            created_curves: vec![],
            base1: vec![],
            base2: vec![],
            pushed: vec![],
            rings: vec![],
            visible: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// Vertices generated by the primitive
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Faces generated by the primitive
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Frames owned by the primitive, in creation order
    pub fn frames(&self) -> &[FrameId] {
        &self.frames
    }

    pub fn skel_points(&self) -> &[PointId] {
        &self.skel_points
    }

    pub fn skel_curves(&self) -> &[CurveId] {
        &self.skel_curves
    }

    pub fn created_points(&self) -> &[PointId] {
        &self.created_points
    }

    pub fn created_curves(&self) -> &[CurveId] {
        &self.created_curves
    }

    pub fn base1(&self) -> &[FaceId] {
        &self.base1
    }

    pub fn base2(&self) -> &[FaceId] {
        &self.base2
    }

    pub fn pushed(&self) -> &[FaceId] {
        &self.pushed
    }

    /// Cross-sections from the first end to the last
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// One skeleton point and no curve
    pub fn is_ball(&self) -> bool {
        self.skel_curves.is_empty() && self.skel_points.len() == 1
    }

    /// One curve between two skeleton points
    pub fn is_tube(&self) -> bool {
        self.skel_curves.len() == 1 && self.skel_points.len() == 2
    }

    pub fn is_roof(&self) -> bool {
        !self.is_ball() && !self.is_tube()
    }

    pub(crate) fn absorb_point(&mut self, id: PointId, created: bool) {
        if !self.skel_points.contains(&id) {
            self.skel_points.push(id);
        }
        if created && !self.created_points.contains(&id) {
            self.created_points.push(id);
        }
    }

    pub(crate) fn absorb_curve(&mut self, id: CurveId, created: bool) {
        if !self.skel_curves.contains(&id) {
            self.skel_curves.push(id);
        }
        if created && !self.created_curves.contains(&id) {
            self.created_curves.push(id);
        }
    }

    /// Add a frame owned by the primitive
    pub(crate) fn own_frame<T: FloatingPoint>(
        &mut self,
        scene: &mut Scene<T>,
        source: FrameSource<T>,
    ) -> BuildResult<FrameId> {
        let id = scene.add_frame(source).ok_or(BuildError::UndefinedFrame)?;
        self.frames.push(id);
        Ok(id)
    }

    /// Hide attachment faces covered by the primitive
    pub(crate) fn push<T: FloatingPoint>(
        &mut self,
        scene: &mut Scene<T>,
        faces: &[FaceId],
        cmd: &mut MultiCommand<T>,
    ) {
        cmd.run(scene, Box::new(PushFaces::new(faces.to_vec())));
        self.pushed.extend_from_slice(faces);
    }

    /// Register the primitive in the scene and show it with the skeleton entities it created
    pub(crate) fn finish_build<T: FloatingPoint>(
        self,
        scene: &mut Scene<T>,
        cmd: &mut MultiCommand<T>,
    ) -> PrimitiveId {
        let points = self.created_points.clone();
        let curves = self.created_curves.clone();
        let name = self.name.clone();
        scene.mesh_mut().changed(MeshChange::Triangulation);
        let id = scene.insert_primitive(self);
        for c in curves {
            cmd.run(scene, Box::new(ShowSkeleton::new(SkeletonItem::Curve(c))));
        }
        for p in points {
            cmd.run(scene, Box::new(ShowSkeleton::new(SkeletonItem::Point(p))));
        }
        cmd.run(scene, Box::new(ShowPrimitive::new(id)));
        debug!("built {}", name);
        id
    }
}
