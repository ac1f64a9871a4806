use nalgebra::Vector3;

use crate::mesh::{Mesh, VertexId};
use crate::misc::{average, newell_normal, FloatingPoint};
use crate::skeleton::{CurveId, PointId, Skeleton};

use super::CoordFrame;

/// Which end of a skeleton curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveEnd {
    Start,
    End,
}

/// What a live frame follows.
/// Evaluated against the current mesh and skeleton during the frame update pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSource<T: FloatingPoint> {
    /// Never changes
    Fixed(CoordFrame<T>),
    /// Attachment region: origin at the average of its vertices,
    /// tangent along the best-fit normal of its boundary loop (negated if `flip`)
    Disk {
        vertices: Vec<VertexId>,
        boundary: Vec<VertexId>,
        normal: Vector3<T>,
        flip: bool,
    },
    /// The frame carried by a skeleton point
    SkeletonPoint(PointId),
    /// Midpoint of a skeleton curve segment, tangent along the segment
    SkeletonEdge {
        curve: CurveId,
        edge: usize,
        normal: Vector3<T>,
    },
    /// Endpoint of a skeleton curve, tangent along the adjacent segment
    CurveEnd {
        curve: CurveId,
        end: CurveEnd,
        normal: Vector3<T>,
    },
    /// A mesh vertex, tangent from `from` toward `toward`
    MeshVertex {
        vertex: VertexId,
        from: VertexId,
        toward: VertexId,
        normal: Vector3<T>,
    },
    /// Midpoint of a mesh edge, tangent along the edge
    MeshEdge {
        from: VertexId,
        to: VertexId,
        normal: Vector3<T>,
    },
}

impl<T: FloatingPoint> FrameSource<T> {
    /// Evaluate the frame, or `None` if what it follows no longer exists
    pub fn evaluate(&self, mesh: &Mesh<T>, skeleton: &Skeleton<T>) -> Option<CoordFrame<T>> {
        match self {
            FrameSource::Fixed(frame) => Some(frame.clone()),
            FrameSource::Disk {
                vertices,
                boundary,
                normal,
                flip,
            } => {
                let pts = mesh.positions(vertices)?;
                let loop_pts = mesh.positions(boundary)?;
                let mut t = newell_normal(&loop_pts);
                if *flip {
                    t = -t;
                }
                Some(CoordFrame::new(average(&pts), &t, normal))
            }
            FrameSource::SkeletonPoint(id) => skeleton.point(*id).map(|p| p.frame().clone()),
            FrameSource::SkeletonEdge {
                curve,
                edge,
                normal,
            } => {
                let curve = skeleton.curve(*curve)?;
                let cps = curve.control_points();
                let (p0, p1) = (cps.get(*edge)?, cps.get(*edge + 1)?);
                Some(CoordFrame::new(nalgebra::center(p0, p1), &(p1 - p0), normal))
            }
            FrameSource::CurveEnd { curve, end, normal } => {
                let curve = skeleton.curve(*curve)?;
                let cps = curve.control_points();
                let n = cps.len();
                if n < 2 {
                    return None;
                }
                let (origin, tangent) = match end {
                    CurveEnd::Start => (cps[0], cps[1] - cps[0]),
                    CurveEnd::End => (cps[n - 1], cps[n - 1] - cps[n - 2]),
                };
                Some(CoordFrame::new(origin, &tangent, normal))
            }
            FrameSource::MeshVertex {
                vertex,
                from,
                toward,
                normal,
            } => {
                let origin = mesh.position(*vertex)?;
                let tangent = mesh.position(*toward)? - mesh.position(*from)?;
                Some(CoordFrame::new(origin, &tangent, normal))
            }
            FrameSource::MeshEdge { from, to, normal } => {
                let (p0, p1) = (mesh.position(*from)?, mesh.position(*to)?);
                Some(CoordFrame::new(nalgebra::center(&p0, &p1), &(p1 - p0), normal))
            }
        }
    }

    /// Mesh vertices the frame reads
    pub fn mesh_inputs(&self) -> Vec<VertexId> {
        match self {
            FrameSource::Disk { vertices, .. } => vertices.clone(),
            FrameSource::MeshVertex {
                vertex,
                from,
                toward,
                ..
            } => vec![*vertex, *from, *toward],
            FrameSource::MeshEdge { from, to, .. } => vec![*from, *to],
            _ => vec![],
        }
    }
}
