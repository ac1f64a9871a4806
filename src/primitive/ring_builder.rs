use nalgebra::{Point2, Point3};

use crate::frame::FrameId;
use crate::mesh::{FaceId, VertexId};
use crate::misc::FloatingPoint;
use crate::scene::Scene;

use super::{BuildError, BuildResult, Primitive, Ring};

/// Add one vertex per local coordinate, bound to the frame, in input order
pub fn build_ring<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    frame: FrameId,
    locals: &[Point3<T>],
) -> BuildResult<Vec<VertexId>> {
    let ring = locals
        .iter()
        .map(|u| {
            scene
                .add_bound_vertex(frame, *u)
                .ok_or(BuildError::UndefinedFrame)
        })
        .collect::<BuildResult<Vec<_>>>()?;
    primitive.vertices.extend(ring.iter().copied());
    Ok(ring)
}

/// Join two closed rings of equal size with one quad per ring edge,
/// `(prev[i], prev[j], cur[j], cur[i])` with `j = i + 1` wrapping to 0.
/// Texture u advances by `du` per quad, v runs from `v_prev` to `v_cur`.
pub fn build_band<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    prev: &[VertexId],
    cur: &[VertexId],
    du: T,
    v_prev: T,
    v_cur: T,
) -> BuildResult<Vec<FaceId>> {
    assert_eq!(prev.len(), cur.len(), "rings of a band must match");
    let n = prev.len();
    let mut u = T::zero();
    let mut faces = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        let uj = u + du;
        let face = scene.mesh_mut().add_quad(
            [prev[i], prev[j], cur[j], cur[i]],
            [
                Point2::new(u, v_prev),
                Point2::new(uj, v_prev),
                Point2::new(uj, v_cur),
                Point2::new(u, v_cur),
            ],
        )?;
        faces.push(face);
        u = uj;
    }
    primitive.faces.extend(faces.iter().copied());
    Ok(faces)
}

/// Join two open rows of equal size with `n - 1` quads,
/// `(cur[i], cur[i+1], prev[i+1], prev[i])`, with texture u equal to the column index.
/// The edge `(cur[i], prev[i])` is creased for every `i` in `creases`.
pub fn build_open_band<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    prev: &[VertexId],
    cur: &[VertexId],
    v_prev: T,
    v_cur: T,
    creases: &[usize],
) -> BuildResult<Vec<FaceId>> {
    assert_eq!(prev.len(), cur.len(), "rows of a band must match");
    let mut faces = Vec::with_capacity(cur.len().saturating_sub(1));
    for i in 0..cur.len().saturating_sub(1) {
        let ui = T::from_usize(i).unwrap();
        let uj = ui + T::one();
        let face = scene.mesh_mut().add_quad(
            [cur[i], cur[i + 1], prev[i + 1], prev[i]],
            [
                Point2::new(ui, v_cur),
                Point2::new(uj, v_cur),
                Point2::new(uj, v_prev),
                Point2::new(ui, v_prev),
            ],
        )?;
        faces.push(face);
        if creases.contains(&i) {
            scene.mesh_mut().set_crease(cur[i], prev[i], true);
        }
    }
    primitive.faces.extend(faces.iter().copied());
    Ok(faces)
}

/// A single quad closing the end of a 4-sided tube
pub fn build_cap<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    corners: [VertexId; 4],
    du: T,
) -> BuildResult<FaceId> {
    let face = scene.mesh_mut().add_quad(
        corners,
        [
            Point2::new(T::zero(), T::zero()),
            Point2::new(du, T::zero()),
            Point2::new(du, du),
            Point2::new(T::zero(), du),
        ],
    )?;
    primitive.faces.push(face);
    Ok(face)
}

/// Close the gap between a loop and its copy with quads `(b[i], b[j], a[j], a[i])`,
/// texture u advancing by `du` per quad
pub fn gen_ribbon<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    a: &[VertexId],
    b: &[VertexId],
    du: T,
) -> BuildResult<Vec<FaceId>> {
    assert_eq!(a.len(), b.len(), "ribbon loops must match");
    let n = a.len();
    let mut u = T::zero();
    let mut faces = Vec::with_capacity(n);
    for i in 0..n {
        let j = (i + 1) % n;
        let face = scene.mesh_mut().add_quad(
            [b[i], b[j], a[j], a[i]],
            [
                Point2::new(u, T::zero()),
                Point2::new(u + du, T::zero()),
                Point2::new(u + du, du),
                Point2::new(u, du),
            ],
        )?;
        faces.push(face);
        u += du;
    }
    primitive.faces.extend(faces.iter().copied());
    Ok(faces)
}

/// Where the vertices of a cross-section come from
#[derive(Debug, Clone)]
pub enum SectionRing<T: FloatingPoint> {
    /// New vertices bound to the frame
    Build {
        frame: FrameId,
        locals: Vec<Point3<T>>,
    },
    /// Vertices already in the mesh
    Existing(Vec<VertexId>),
    /// New vertices bound to the frame, between two existing end vertices
    Bounded {
        frame: FrameId,
        locals: Vec<Point3<T>>,
        first: VertexId,
        last: VertexId,
    },
}

/// A cross-section of an extrusion and its texture v
#[derive(Debug, Clone)]
pub struct Section<T: FloatingPoint> {
    pub ring: SectionRing<T>,
    pub v: T,
}

impl<T: FloatingPoint> Section<T> {
    pub fn new(ring: SectionRing<T>, v: T) -> Self {
        Self { ring, v }
    }
}

/// How consecutive sections are joined
#[derive(Debug, Clone, PartialEq)]
pub enum BandStyle<T> {
    /// Closed cross-sections, texture u advancing by `du` per quad
    Closed { du: T },
    /// Open cross-sections creased at the given columns
    Open { creases: Vec<usize> },
}

/// Sweep a cross-section through a sequence of sections,
/// joining each to the previous one with a band.
/// Returns the rings of the sections, the starting ring excluded.
pub fn extrude<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    start: &[VertexId],
    v_start: T,
    sections: Vec<Section<T>>,
    style: &BandStyle<T>,
) -> BuildResult<Vec<Vec<VertexId>>> {
    let mut prev = start.to_vec();
    let mut v_prev = v_start;
    let mut rings = Vec::with_capacity(sections.len());
    for section in sections {
        let (frame, cur) = match section.ring {
            SectionRing::Build { frame, locals } => {
                (Some(frame), build_ring(scene, primitive, frame, &locals)?)
            }
            SectionRing::Existing(vertices) => (None, vertices),
            SectionRing::Bounded {
                frame,
                locals,
                first,
                last,
            } => {
                let mut cur = vec![first];
                cur.extend(build_ring(scene, primitive, frame, &locals)?);
                cur.push(last);
                (Some(frame), cur)
            }
        };
        match style {
            BandStyle::Closed { du } => {
                build_band(scene, primitive, &prev, &cur, *du, v_prev, section.v)?;
            }
            BandStyle::Open { creases } => {
                build_open_band(scene, primitive, &prev, &cur, v_prev, section.v, creases)?;
            }
        }
        primitive.rings.push(Ring {
            frame,
            vertices: cur.clone(),
        });
        v_prev = section.v;
        prev = cur.clone();
        rings.push(cur);
    }
    Ok(rings)
}
