use crate::mesh::{FaceId, MeshChange};
use crate::misc::FloatingPoint;
use crate::primitive::PrimitiveId;
use crate::scene::Scene;
use crate::skeleton::{CurveId, PointId};

use super::Command;

/// Show a primitive and its faces
#[derive(Debug, Clone)]
pub struct ShowPrimitive {
    primitive: PrimitiveId,
    done: bool,
}

impl ShowPrimitive {
    pub fn new(primitive: PrimitiveId) -> Self {
        Self {
            primitive,
            done: false,
        }
    }
}

impl<T: FloatingPoint> Command<T> for ShowPrimitive {
    fn doit(&mut self, scene: &mut Scene<T>) -> bool {
        if !self.done {
            scene.set_primitive_visible(self.primitive, true);
            self.done = true;
        }
        true
    }

    fn undoit(&mut self, scene: &mut Scene<T>) -> bool {
        if self.done {
            scene.set_primitive_visible(self.primitive, false);
            self.done = false;
        }
        true
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

/// Hide faces covered by a new primitive
#[derive(Debug, Clone)]
pub struct PushFaces {
    faces: Vec<FaceId>,
    done: bool,
}

impl PushFaces {
    pub fn new(faces: Vec<FaceId>) -> Self {
        Self { faces, done: false }
    }

    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    fn set_visible<T: FloatingPoint>(&self, scene: &mut Scene<T>, visible: bool) {
        let mesh = scene.mesh_mut();
        for f in self.faces.iter() {
            mesh.set_face_visible(*f, visible);
        }
        mesh.changed(MeshChange::Triangulation);
    }
}

impl<T: FloatingPoint> Command<T> for PushFaces {
    fn doit(&mut self, scene: &mut Scene<T>) -> bool {
        if !self.done {
            self.set_visible(scene, false);
            self.done = true;
        }
        true
    }

    fn undoit(&mut self, scene: &mut Scene<T>) -> bool {
        if self.done {
            self.set_visible(scene, true);
            self.done = false;
        }
        true
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

/// A skeleton entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonItem {
    Point(PointId),
    Curve(CurveId),
}

/// Show a skeleton point or curve
#[derive(Debug, Clone)]
pub struct ShowSkeleton {
    item: SkeletonItem,
    done: bool,
}

impl ShowSkeleton {
    pub fn new(item: SkeletonItem) -> Self {
        Self { item, done: false }
    }

    fn set_visible<T: FloatingPoint>(&self, scene: &mut Scene<T>, visible: bool) {
        let skeleton = scene.skeleton_mut();
        match self.item {
            SkeletonItem::Point(p) => skeleton.set_point_visible(p, visible),
            SkeletonItem::Curve(c) => skeleton.set_curve_visible(c, visible),
        }
    }
}

impl<T: FloatingPoint> Command<T> for ShowSkeleton {
    fn doit(&mut self, scene: &mut Scene<T>) -> bool {
        if !self.done {
            self.set_visible(scene, true);
            self.done = true;
        }
        true
    }

    fn undoit(&mut self, scene: &mut Scene<T>) -> bool {
        if self.done {
            self.set_visible(scene, false);
            self.done = false;
        }
        true
    }

    fn is_done(&self) -> bool {
        self.done
    }
}
