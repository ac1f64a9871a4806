use std::collections::HashSet;

use anyhow::ensure;
use itertools::Itertools;
use nalgebra::{Point2, Point3, Vector3};
use slotmap::{new_key_type, SlotMap};

use crate::misc::{average, newell_normal, FloatingPoint, Line};

new_key_type! {
    /// Handle of a mesh vertex
    pub struct VertexId;
    /// Handle of a mesh face
    pub struct FaceId;
}

/// Kind of change reported to the mesh observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshChange {
    /// vertex positions moved
    Geometry,
    /// faces were added, removed, hidden or shown
    Triangulation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex<T: FloatingPoint> {
    position: Point3<T>,
}

impl<T: FloatingPoint> Vertex<T> {
    pub fn position(&self) -> &Point3<T> {
        &self.position
    }
}

/// A polygon with 3 or more corners, counter-clockwise around its normal
#[derive(Debug, Clone, PartialEq)]
pub struct Face<T: FloatingPoint> {
    vertices: Vec<VertexId>,
    uvs: Option<Vec<Point2<T>>>,
    visible: bool,
}

impl<T: FloatingPoint> Face<T> {
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Per-corner texture coordinates
    pub fn uvs(&self) -> Option<&[Point2<T>]> {
        self.uvs.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Directed edges in corner order, closing back to the first corner
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.vertices
            .iter()
            .copied()
            .circular_tuple_windows::<(_, _)>()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices.contains(&v)
    }
}

/// Polygonal control mesh the primitives are built into
#[derive(Debug, Clone)]
pub struct Mesh<T: FloatingPoint> {
    vertices: SlotMap<VertexId, Vertex<T>>,
    faces: SlotMap<FaceId, Face<T>>,
    creases: HashSet<(VertexId, VertexId)>,
    geometry_changes: usize,
    triangulation_changes: usize,
}

impl<T: FloatingPoint> Default for Mesh<T> {
    fn default() -> Self {
        Self {
            vertices: SlotMap::with_key(),
            faces: SlotMap::with_key(),
            creases: HashSet::new(),
            geometry_changes: 0,
            triangulation_changes: 0,
        }
    }
}

fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

impl<T: FloatingPoint> Mesh<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, position: Point3<T>) -> VertexId {
        self.vertices.insert(Vertex { position })
    }

    /// Remove a vertex that no face references any more
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<Point3<T>> {
        if self.faces.values().any(|f| f.contains(id)) {
            return None;
        }
        self.creases.retain(|(a, b)| *a != id && *b != id);
        self.vertices.remove(id).map(|v| v.position)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<T>> {
        self.vertices.get(id)
    }

    pub fn position(&self, id: VertexId) -> Option<Point3<T>> {
        self.vertices.get(id).map(|v| v.position)
    }

    /// Positions of all the given vertices, or `None` if any of them is gone
    pub fn positions(&self, ids: &[VertexId]) -> Option<Vec<Point3<T>>> {
        ids.iter().map(|id| self.position(*id)).collect()
    }

    pub fn set_position(&mut self, id: VertexId, position: Point3<T>) {
        if let Some(v) = self.vertices.get_mut(id) {
            v.position = position;
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys()
    }

    /// Add a polygon.
    /// # Failures
    /// - fewer than 3 corners
    /// - a corner repeats or does not exist
    /// - the number of texture coordinates differs from the number of corners
    pub fn add_face(
        &mut self,
        vertices: Vec<VertexId>,
        uvs: Option<Vec<Point2<T>>>,
    ) -> anyhow::Result<FaceId> {
        ensure!(vertices.len() >= 3, "a face needs at least 3 vertices");
        ensure!(
            vertices.iter().all_unique(),
            "a face cannot repeat a vertex"
        );
        ensure!(
            vertices.iter().all(|v| self.vertices.contains_key(*v)),
            "a face references a missing vertex"
        );
        if let Some(uvs) = uvs.as_ref() {
            ensure!(
                uvs.len() == vertices.len(),
                "expected {} texture coordinates, got {}",
                vertices.len(),
                uvs.len()
            );
        }
        Ok(self.faces.insert(Face {
            vertices,
            uvs,
            visible: true,
        }))
    }

    /// Add a quad with per-corner texture coordinates
    pub fn add_quad(
        &mut self,
        vertices: [VertexId; 4],
        uvs: [Point2<T>; 4],
    ) -> anyhow::Result<FaceId> {
        self.add_face(vertices.to_vec(), Some(uvs.to_vec()))
    }

    pub fn remove_face(&mut self, id: FaceId) -> Option<Face<T>> {
        self.faces.remove(id)
    }

    pub fn contains_face(&self, id: FaceId) -> bool {
        self.faces.contains_key(id)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face<T>> {
        self.faces.get(id)
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face<T>)> {
        self.faces.iter()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn visible_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .filter(|(_, f)| f.visible)
            .map(|(id, _)| id)
    }

    pub fn set_face_visible(&mut self, id: FaceId, visible: bool) {
        if let Some(f) = self.faces.get_mut(id) {
            f.visible = visible;
        }
    }

    /// Faces having `v` as a corner
    pub fn faces_of_vertex(&self, v: VertexId) -> Vec<FaceId> {
        self.faces
            .iter()
            .filter(|(_, f)| f.contains(v))
            .map(|(id, _)| id)
            .collect()
    }

    /// Vertices sharing an edge with `v`
    pub fn adjacent_vertices(&self, v: VertexId) -> Vec<VertexId> {
        self.faces
            .values()
            .flat_map(|f| f.edges())
            .filter_map(|(a, b)| {
                if a == v {
                    Some(b)
                } else if b == v {
                    Some(a)
                } else {
                    None
                }
            })
            .unique()
            .collect()
    }

    pub fn face_positions(&self, id: FaceId) -> Option<Vec<Point3<T>>> {
        self.positions(self.faces.get(id)?.vertices())
    }

    /// Unit normal of a face (Newell's method)
    pub fn face_normal(&self, id: FaceId) -> Option<Vector3<T>> {
        newell_normal(&self.face_positions(id)?).try_normalize(T::default_epsilon())
    }

    pub fn face_centroid(&self, id: FaceId) -> Option<Point3<T>> {
        Some(average(&self.face_positions(id)?))
    }

    /// Whether a quad projected onto its own best-fit plane has no crossing edges
    pub fn is_simple_quad(&self, id: FaceId) -> bool {
        let (pts, n) = match (self.face_positions(id), self.face_normal(id)) {
            (Some(pts), Some(n)) if pts.len() == 4 => (pts, n),
            _ => return false,
        };
        let u = if n.x.abs() < T::from_f64(0.9).unwrap() {
            n.cross(&Vector3::x()).normalize()
        } else {
            n.cross(&Vector3::y()).normalize()
        };
        let v = n.cross(&u);
        let flat: Vec<Point2<T>> = pts
            .iter()
            .map(|p| Point2::new(p.coords.dot(&u), p.coords.dot(&v)))
            .collect();
        let edge = |i: usize| Line::new(flat[i], flat[(i + 1) % 4]);
        !edge(0).crosses(&edge(2)) && !edge(1).crosses(&edge(3))
    }

    pub fn set_crease(&mut self, a: VertexId, b: VertexId, crease: bool) {
        if crease {
            self.creases.insert(edge_key(a, b));
        } else {
            self.creases.remove(&edge_key(a, b));
        }
    }

    pub fn is_crease(&self, a: VertexId, b: VertexId) -> bool {
        self.creases.contains(&edge_key(a, b))
    }

    pub fn crease_count(&self) -> usize {
        self.creases.len()
    }

    /// Record a change notification
    pub fn changed(&mut self, change: MeshChange) {
        match change {
            MeshChange::Geometry => self.geometry_changes += 1,
            MeshChange::Triangulation => self.triangulation_changes += 1,
        }
    }

    /// Number of notifications received for the given kind of change
    pub fn change_count(&self, change: MeshChange) -> usize {
        match change {
            MeshChange::Geometry => self.geometry_changes,
            MeshChange::Triangulation => self.triangulation_changes,
        }
    }
}
