use log::debug;
use nalgebra::{Point2, Point3, Vector3};

use crate::command::MultiCommand;
use crate::frame::{CoordFrame, FrameSource};
use crate::mesh::{FaceSetQuery, VertexId};
use crate::misc::{average, newell_normal, FloatingPoint, Polyline};
use crate::scene::Scene;
use crate::skeleton::PointId;

use super::{gen_ribbon, BuildError, BuildResult, Primitive, PrimitiveId, PrimitiveKind, Ring};

impl Primitive {
    /// Build a thin slab from a planar triangle or quad.
    ///
    /// A new skeleton point sits at the polygon's center. The top face is the polygon
    /// pushed along `n`, the bottom its flipped copy pushed the other way, and a ribbon
    /// closes the side. Each corner moves by half the average length of its two edges.
    pub fn build_wafer<T: FloatingPoint>(
        scene: &mut Scene<T>,
        pts: &[Point3<T>],
        n: &Vector3<T>,
        cmd: &mut MultiCommand<T>,
    ) -> BuildResult<PrimitiveId> {
        let mut pts = pts.to_vec();
        if pts.len() > 3 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() != 3 && pts.len() != 4 {
            debug!("build_wafer: expected 3 or 4 points, got {}", pts.len());
            return Err(BuildError::BadPolygon);
        }
        let Some(n) = n.try_normalize(T::default_epsilon()) else {
            debug!("build_wafer: null normal");
            return Err(BuildError::BadInput("null wafer normal"));
        };
        let outline = Polyline::new(pts.clone());
        if outline
            .planar_fit(scene.options().wafer_planarity_tolerance)
            .is_none()
        {
            debug!("build_wafer: polygon is not planar");
            return Err(BuildError::NotPlanar);
        }
        if newell_normal(&pts).dot(&n) < T::zero() {
            pts.reverse();
        }
        let t = pts[2] - pts[1];
        if t.cross(&n).norm() <= T::default_epsilon() {
            debug!("build_wafer: polygon edge is parallel to the normal");
            return Err(BuildError::BadPolygon);
        }

        let point = scene
            .skeleton_mut()
            .add_point(CoordFrame::new(average(&pts), &t, &n));
        let name = format!("wafer_{}", scene.primitive_count() + 1);
        let mut primitive = Primitive::new(name, PrimitiveKind::Wafer);
        primitive.absorb_point(point, true);

        match build_slab(scene, &mut primitive, point, &pts) {
            Ok(()) => Ok(primitive.finish_build(scene, cmd)),
            Err(e) => {
                debug!("build_wafer: {}", e);
                scene.discard(primitive);
                Err(e)
            }
        }
    }
}

/// Half the average length of the two polygon edges at each corner
fn corner_offsets<T: FloatingPoint>(pts: &[Point3<T>]) -> Vec<T> {
    let n = pts.len();
    let quarter = T::from_f64(0.25).unwrap();
    (0..n)
        .map(|i| {
            let prev = (pts[i] - pts[(i + n - 1) % n]).norm();
            let next = (pts[(i + 1) % n] - pts[i]).norm();
            (prev + next) * quarter
        })
        .collect()
}

fn build_slab<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    point: PointId,
    pts: &[Point3<T>],
) -> BuildResult<()> {
    let frame_id = primitive.own_frame(scene, FrameSource::SkeletonPoint(point))?;
    let frame = scene
        .frame(frame_id)
        .cloned()
        .ok_or(BuildError::UndefinedFrame)?;
    let n = *frame.normal();
    let offsets = corner_offsets(pts);

    let mut bound = |world: Point3<T>| -> BuildResult<VertexId> {
        let v = scene
            .add_bound_vertex(frame_id, frame.to_local(&world))
            .ok_or(BuildError::UndefinedFrame)?;
        primitive.vertices.push(v);
        Ok(v)
    };
    let top = pts
        .iter()
        .zip(offsets.iter())
        .map(|(p, d)| bound(p + n * *d))
        .collect::<BuildResult<Vec<_>>>()?;
    let bottom = pts
        .iter()
        .zip(offsets.iter())
        .map(|(p, d)| bound(p - n * *d))
        .collect::<BuildResult<Vec<_>>>()?;

    let uvs = (pts.len() == 4).then(|| {
        vec![
            Point2::new(T::zero(), T::zero()),
            Point2::new(T::one(), T::zero()),
            Point2::new(T::one(), T::one()),
            Point2::new(T::zero(), T::one()),
        ]
    });
    let top_face = scene.mesh_mut().add_face(top.clone(), uvs.clone())?;
    let flipped: Vec<_> = bottom.iter().rev().copied().collect();
    let flipped_uvs = uvs.map(|mut uvs| {
        uvs.reverse();
        uvs
    });
    let bottom_face = scene.mesh_mut().add_face(flipped, flipped_uvs)?;
    primitive.faces.push(top_face);
    primitive.faces.push(bottom_face);

    let du = scene.mesh().min_uv_delta(&[top_face]);
    gen_ribbon(scene, primitive, &top, &bottom, du)?;

    primitive.rings.push(Ring {
        frame: Some(frame_id),
        vertices: top,
    });
    primitive.rings.push(Ring {
        frame: Some(frame_id),
        vertices: bottom,
    });
    Ok(())
}
