use std::collections::HashMap;

use anyhow::Context;

use crate::misc::FloatingPoint;

use super::{FaceId, Mesh, VertexId};

/// Vertex-to-vertex correspondence used to copy faces onto new vertices
#[derive(Debug, Clone, Default)]
pub struct VertMapper {
    map: HashMap<VertexId, VertexId>,
}

impl VertMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map each vertex of `from` onto the vertex at the same index of `to`
    pub fn from_pairs(from: &[VertexId], to: &[VertexId]) -> Self {
        assert_eq!(from.len(), to.len(), "vertex lists must correspond");
        let mut mapper = Self::new();
        from.iter().zip(to).for_each(|(a, b)| mapper.add(*a, *b));
        mapper
    }

    pub fn add(&mut self, from: VertexId, to: VertexId) {
        self.map.insert(from, to);
    }

    pub fn get(&self, from: VertexId) -> Option<VertexId> {
        self.map.get(&from).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn map(&self, vertices: &[VertexId]) -> Option<Vec<VertexId>> {
        vertices.iter().map(|v| self.get(*v)).collect()
    }

    /// Copy the faces through the mapping, reversing their winding if `flip`.
    /// Texture coordinates travel with their corners.
    pub fn copy_faces<T: FloatingPoint>(
        &self,
        mesh: &mut Mesh<T>,
        faces: &[FaceId],
        flip: bool,
    ) -> anyhow::Result<Vec<FaceId>> {
        faces
            .iter()
            .map(|id| {
                let face = mesh.face(*id).context("copying a missing face")?;
                let mut vertices = self
                    .map(face.vertices())
                    .context("face corner missing from the vertex map")?;
                let mut uvs = face.uvs().map(|uvs| uvs.to_vec());
                if flip {
                    vertices.reverse();
                    if let Some(uvs) = uvs.as_mut() {
                        uvs.reverse();
                    }
                }
                mesh.add_face(vertices, uvs)
            })
            .collect()
    }
}
