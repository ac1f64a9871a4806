use std::collections::HashSet;

use itertools::Itertools;
use log::debug;
use nalgebra::Vector3;

use crate::misc::{newell_normal, FloatingPoint};

use super::{FaceId, Mesh, VertexId};

/// Queries over a set of faces of a mesh, such as an attachment region
pub trait FaceSetQuery<T: FloatingPoint> {
    /// Distinct corner vertices of the faces, in first-seen order
    fn face_set_vertices(&self, faces: &[FaceId]) -> Vec<VertexId>;

    /// Directed edges used by exactly one face of the set, with no reversed twin in the set
    fn boundary_edges(&self, faces: &[FaceId]) -> Vec<(VertexId, VertexId)>;

    /// The boundary as a single loop, counter-clockwise around the faces' normals.
    /// `None` if the boundary is empty or not a single simple loop.
    fn boundary_loop(&self, faces: &[FaceId]) -> Option<Vec<VertexId>>;

    /// Vertices of the set not on its boundary
    fn interior_vertices(&self, faces: &[FaceId]) -> Vec<VertexId>;

    /// Visible faces outside the set sharing a boundary edge with it
    fn exterior_faces(&self, faces: &[FaceId]) -> Vec<FaceId>;

    /// Average length of the boundary edges
    fn avg_boundary_edge_len(&self, faces: &[FaceId]) -> T;

    /// Smallest nonzero u-step of the texture coordinates along the boundary edges, 1 if there is none
    fn min_uv_delta(&self, faces: &[FaceId]) -> T;

    /// Newell normal of the boundary loop
    fn face_set_normal(&self, faces: &[FaceId]) -> Option<Vector3<T>>;

    /// Whether two face sets share no vertex
    fn disjoint(&self, a: &[FaceId], b: &[FaceId]) -> bool;
}

impl<T: FloatingPoint> FaceSetQuery<T> for Mesh<T> {
    fn face_set_vertices(&self, faces: &[FaceId]) -> Vec<VertexId> {
        faces
            .iter()
            .filter_map(|f| self.face(*f))
            .flat_map(|f| f.vertices().iter().copied())
            .unique()
            .collect()
    }

    fn boundary_edges(&self, faces: &[FaceId]) -> Vec<(VertexId, VertexId)> {
        let edges: Vec<_> = faces
            .iter()
            .filter_map(|f| self.face(*f))
            .flat_map(|f| f.edges())
            .collect();
        let set: HashSet<_> = edges.iter().copied().collect();
        edges
            .iter()
            .copied()
            .filter(|(a, b)| !set.contains(&(*b, *a)))
            .collect()
    }

    fn boundary_loop(&self, faces: &[FaceId]) -> Option<Vec<VertexId>> {
        let edges = self.boundary_edges(faces);
        let (start, mut next) = *edges.first()?;
        let mut ring = vec![start];
        while next != start {
            if ring.len() > edges.len() || ring.contains(&next) {
                debug!("boundary of the face set is not a simple loop");
                return None;
            }
            ring.push(next);
            let current = next;
            let candidates = edges.iter().filter(|(a, _)| *a == current).collect_vec();
            if candidates.len() != 1 {
                debug!("boundary of the face set is not a simple loop");
                return None;
            }
            next = candidates[0].1;
        }
        (ring.len() == edges.len()).then_some(ring)
    }

    fn interior_vertices(&self, faces: &[FaceId]) -> Vec<VertexId> {
        let boundary: HashSet<_> = self
            .boundary_edges(faces)
            .into_iter()
            .flat_map(|(a, b)| [a, b])
            .collect();
        self.face_set_vertices(faces)
            .into_iter()
            .filter(|v| !boundary.contains(v))
            .collect()
    }

    fn exterior_faces(&self, faces: &[FaceId]) -> Vec<FaceId> {
        let boundary: HashSet<_> = self.boundary_edges(faces).into_iter().collect();
        self.faces()
            .filter(|(id, f)| f.is_visible() && !faces.contains(id))
            .filter(|(_, f)| f.edges().any(|(a, b)| boundary.contains(&(b, a))))
            .map(|(id, _)| id)
            .collect()
    }

    fn avg_boundary_edge_len(&self, faces: &[FaceId]) -> T {
        let lengths: Vec<T> = self
            .boundary_edges(faces)
            .into_iter()
            .filter_map(|(a, b)| Some((self.position(b)? - self.position(a)?).norm()))
            .collect();
        if lengths.is_empty() {
            return T::zero();
        }
        let total = lengths.iter().fold(T::zero(), |acc, l| acc + *l);
        total / T::from_usize(lengths.len()).unwrap()
    }

    fn min_uv_delta(&self, faces: &[FaceId]) -> T {
        let boundary: HashSet<_> = self.boundary_edges(faces).into_iter().collect();
        let eps = T::default_epsilon();
        faces
            .iter()
            .filter_map(|f| self.face(*f))
            .filter_map(|f| {
                let uvs = f.uvs()?;
                let n = uvs.len();
                let deltas = f
                    .edges()
                    .enumerate()
                    .filter(|(_, e)| boundary.contains(e))
                    .map(|(i, _)| (uvs[(i + 1) % n].x - uvs[i].x).abs())
                    .filter(|d| *d > eps)
                    .collect_vec();
                Some(deltas)
            })
            .flatten()
            .reduce(|a, b| a.min(b))
            .unwrap_or(T::one())
    }

    fn face_set_normal(&self, faces: &[FaceId]) -> Option<Vector3<T>> {
        let ring = self.boundary_loop(faces)?;
        newell_normal(&self.positions(&ring)?).try_normalize(T::default_epsilon())
    }

    fn disjoint(&self, a: &[FaceId], b: &[FaceId]) -> bool {
        let va: HashSet<_> = self.face_set_vertices(a).into_iter().collect();
        self.face_set_vertices(b)
            .iter()
            .all(|v| !va.contains(v))
    }
}
