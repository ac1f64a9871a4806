use itertools::Itertools;
use log::debug;
use nalgebra::{Point2, Point3, Vector3};

use crate::command::{Command, MultiCommand};
use crate::frame::{CoordFrame, CurveEnd, FrameId, FrameSource};
use crate::mesh::{FaceId, FaceSetQuery, Mesh, VertMapper, VertexId};
use crate::misc::{average, FloatingPoint, Invertible, Plane, Polyline};
use crate::scene::Scene;
use crate::skeleton::{build_curve, process_stroke, remove_end_kinks, CurveId, PointId};
use crate::stroke::{Camera, Stroke};
use crate::taper::TaperResampler;

use super::{
    build_ring, extrude, min_dist_permutation, AttachMode, BandStyle, BuildError, BuildResult,
    Primitive, PrimitiveId, PrimitiveKind, Ring, Section, SectionRing, SkinFactory,
};

/// Whether the pixel is within half the shortest boundary edge of the base's center
fn near_base_center<T: FloatingPoint>(
    mesh: &Mesh<T>,
    camera: &Camera<T>,
    base: &[FaceId],
    pixel: &Point2<T>,
) -> bool {
    let Some(verts) = mesh.positions(&mesh.face_set_vertices(base)) else {
        return false;
    };
    if verts.is_empty() {
        return false;
    }
    let c = average(&verts);
    if !camera.in_frustum(&c) {
        return false;
    }
    let min_edge = mesh
        .boundary_edges(base)
        .into_iter()
        .filter_map(|(a, b)| Some((mesh.position(b)? - mesh.position(a)?).norm()))
        .reduce(|a, b| a.min(b))
        .unwrap_or(T::zero());
    let two = T::from_f64(2.0).unwrap();
    (pixel - camera.world_to_pixel(&c)).norm() <= camera.pixel_length(&c, min_edge / two)
}

/// Best-fit plane of the base boundary, its normal agreeing with the base faces
fn base_plane<T: FloatingPoint>(
    mesh: &Mesh<T>,
    base: &[FaceId],
    boundary: &[VertexId],
    tolerance: T,
) -> Option<Plane<T>> {
    let plane = Polyline::new(mesh.positions(boundary)?).planar_fit(tolerance)?;
    let facing = base
        .first()
        .and_then(|f| mesh.face_normal(*f))
        .map(|n| n.dot(&plane.normal()))
        .unwrap_or(T::one());
    Some(if facing < T::zero() {
        plane.negated()
    } else {
        plane
    })
}

/// A validated attachment region
#[derive(Debug, Clone)]
struct Base<T: FloatingPoint> {
    faces: Vec<FaceId>,
    boundary: Vec<VertexId>,
    center: Point3<T>,
    normal: Vector3<T>,
    /// ring size at this end
    size: T,
}

impl<T: FloatingPoint> Base<T> {
    fn new(scene: &Scene<T>, faces: &[FaceId], fn_name: &str) -> BuildResult<Self> {
        let mesh = scene.mesh();
        let options = scene.options();
        if faces.iter().any(|f| !mesh.contains_face(*f)) {
            debug!("{}: base refers to a missing face", fn_name);
            return Err(BuildError::BadBase);
        }
        let boundary = mesh.boundary_loop(faces).ok_or_else(|| {
            debug!("{}: base boundary is not a simple loop", fn_name);
            BuildError::BadBase
        })?;
        let plane = base_plane(mesh, faces, &boundary, options.planarity_tolerance)
            .ok_or_else(|| {
                debug!("{}: base not planar enough", fn_name);
                BuildError::NotPlanar
            })?;
        let verts = mesh
            .positions(&mesh.face_set_vertices(faces))
            .ok_or(BuildError::BadBase)?;
        Ok(Self {
            faces: faces.to_vec(),
            boundary,
            center: average(&verts),
            normal: plane.normal(),
            size: options.sampling_factor * mesh.avg_boundary_edge_len(faces),
        })
    }

    fn disk(&self, mesh: &Mesh<T>, n: &Vector3<T>, flip: bool) -> FrameSource<T> {
        FrameSource::Disk {
            vertices: mesh.face_set_vertices(&self.faces),
            boundary: self.boundary.clone(),
            normal: *n,
            flip,
        }
    }
}

/// What the tube is built around
#[derive(Debug, Clone)]
enum Spine<T: FloatingPoint> {
    /// A single point, the stroke being too short for a curve
    Point {
        at: Point3<T>,
        offset: T,
        start_tangent: Vector3<T>,
        end_tangent: Vector3<T>,
    },
    Curve {
        points: Polyline<T>,
        taper: TaperResampler<T>,
        length: T,
        start_tangent: Vector3<T>,
        end_tangent: Vector3<T>,
    },
}

impl<T: FloatingPoint> Spine<T> {
    fn tangents(&self) -> (Vector3<T>, Vector3<T>) {
        match self {
            Spine::Point {
                start_tangent,
                end_tangent,
                ..
            }
            | Spine::Curve {
                start_tangent,
                end_tangent,
                ..
            } => (*start_tangent, *end_tangent),
        }
    }

    /// Distance from the end of the spine to the last ring
    fn end_offset(&self) -> T {
        match self {
            Spine::Point { offset, .. } => *offset,
            Spine::Curve { taper, length, .. } => *length * taper.c(0),
        }
    }
}

/// Skeleton built for a tube
#[derive(Debug, Clone, Copy)]
enum SkeletonPath {
    Point(PointId),
    Curve(CurveId),
}

fn lerp_locals<T: FloatingPoint>(u1: &[Point3<T>], u2: &[Point3<T>], t: T) -> Vec<Point3<T>> {
    u1.iter()
        .zip(u2.iter())
        .map(|(a, b)| Point3::from(a.coords.lerp(&b.coords, t)))
        .collect()
}

fn advance_locals<T: FloatingPoint>(locals: &[Point3<T>], offset: T) -> Vec<Point3<T>> {
    locals
        .iter()
        .map(|u| Point3::new(u.x + offset, u.y, u.z))
        .collect()
}

fn to_locals<T: FloatingPoint>(
    scene: &Scene<T>,
    frame: FrameId,
    verts: &[VertexId],
) -> BuildResult<Vec<Point3<T>>> {
    let f = scene.frame(frame).ok_or(BuildError::UndefinedFrame)?;
    let pts = scene
        .mesh()
        .positions(verts)
        .ok_or(BuildError::BadBase)?;
    Ok(pts.iter().map(|p| f.to_local(p)).collect())
}

/// Copy faces onto the vertices `ring` takes `boundary` to, plus new vertices
/// for the interior of the faces placed at `locals_frame` local coordinates
/// shifted by `offset` in `frame`.
#[allow(clippy::too_many_arguments)]
fn copy_cap<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    faces: &[FaceId],
    boundary: &[VertexId],
    ring: &[VertexId],
    locals_frame: FrameId,
    frame: FrameId,
    offset: T,
    flip: bool,
) -> BuildResult<Vec<FaceId>> {
    let interior = scene.mesh().interior_vertices(faces);
    let locals = advance_locals(&to_locals(scene, locals_frame, &interior)?, offset);
    let copies = build_ring(scene, primitive, frame, &locals)?;

    let mut mapper = VertMapper::from_pairs(&interior, &copies);
    boundary
        .iter()
        .zip(ring.iter())
        .for_each(|(a, b)| mapper.add(*a, *b));
    let cap = mapper.copy_faces(scene.mesh_mut(), faces, flip)?;
    primitive.faces.extend(cap.iter().copied());
    Ok(cap)
}

impl Primitive {
    /// Grow a tube from the attachment region `base1` along a stroke projected
    /// onto the plane through the region's center with normal `n`,
    /// ending in the air or at a second region `base2` (empty for none).
    ///
    /// The stroke may be drawn in either direction but must start (or end) near the
    /// center of `base1`, and end near the center of `base2` when there is one.
    /// A stroke too short for a skeleton curve makes a single skeleton point.
    ///
    /// # Failures
    /// Every input rejection leaves the scene untouched.
    /// A failing skin in sleeve mode undoes `cmd` and removes the primitive.
    #[allow(clippy::too_many_arguments)]
    pub fn extend_branch<T: FloatingPoint>(
        scene: &mut Scene<T>,
        camera: &Camera<T>,
        stroke: &Stroke<T>,
        n: &Vector3<T>,
        base1: &[FaceId],
        base2: &[FaceId],
        cmd: &mut MultiCommand<T>,
        skin: &mut dyn SkinFactory<T>,
    ) -> BuildResult<PrimitiveId> {
        if stroke.len() < 2 {
            debug!("extend_branch: too few pixels");
            return Err(BuildError::TooFewPixels);
        }
        if base1.is_empty() {
            debug!("extend_branch: no base");
            return Err(BuildError::EmptyBase);
        }
        let n = n.try_normalize(T::default_epsilon()).ok_or_else(|| {
            debug!("extend_branch: null projection normal");
            BuildError::BadInput("null projection normal")
        })?;

        let mesh = scene.mesh();
        if !base2.is_empty()
            && (base2.iter().any(|f| base1.contains(f))
                || mesh.boundary_edges(base2).len() != mesh.boundary_edges(base1).len())
        {
            debug!("extend_branch: bad base 2");
            return Err(BuildError::BadSecondBase);
        }

        // the stroke starts at the first base, ending at the second if there is one
        let first = stroke.first().copied().ok_or(BuildError::TooFewPixels)?;
        let stroke = if near_base_center(mesh, camera, base1, &first) {
            stroke.clone()
        } else {
            stroke.inverse()
        };
        let (first, last) = match (stroke.first(), stroke.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(BuildError::TooFewPixels),
        };
        if !near_base_center(mesh, camera, base1, &first)
            || (!base2.is_empty() && !near_base_center(mesh, camera, base2, &last))
        {
            debug!("extend_branch: stroke too far from base");
            return Err(BuildError::StrokeTooFar);
        }

        let b1 = Base::new(scene, base1, "extend_branch")?;
        let b2 = if base2.is_empty() {
            None
        } else {
            Some(Base::new(scene, base2, "extend_branch")?)
        };

        let options = scene.options();
        let max_dot = options.max_normal_dot;
        if b1.normal.dot(&n).abs() > max_dot
            || b2.as_ref().is_some_and(|b| b.normal.dot(&n).abs() > max_dot)
        {
            debug!("extend_branch: surface normals too incompatible");
            return Err(BuildError::IncompatibleNormals);
        }

        let w1 = b1.size;
        let w2 = b2.as_ref().map(|b| b.size).unwrap_or(w1);
        let two = T::from_f64(2.0).unwrap();
        let pts = stroke.project_to_plane(camera, &Plane::from_point_normal(&b1.center, &n));
        if pts.len() < 2 || pts.length() < options.min_stroke_factor * (w1 + w2) / two {
            debug!("extend_branch: input stroke too short");
            return Err(BuildError::StrokeTooShort);
        }

        Self::extend(scene, pts, b1, b2, &n, cmd, skin)
    }

    /// Build the tube for validated inputs
    fn extend<T: FloatingPoint>(
        scene: &mut Scene<T>,
        mut pts: Polyline<T>,
        b1: Base<T>,
        b2: Option<Base<T>>,
        n: &Vector3<T>,
        cmd: &mut MultiCommand<T>,
        skin: &mut dyn SkinFactory<T>,
    ) -> BuildResult<PrimitiveId> {
        // run the stroke from base center to base center
        pts.push_front(b1.center);
        if let Some(b2) = b2.as_ref() {
            pts.push_back(b2.center);
        }

        let options = scene.options().clone();
        let w1 = b1.size;
        let w2 = b2.as_ref().map(|b| b.size).unwrap_or(w1);
        let two = T::from_f64(2.0).unwrap();
        let threshold = options.point_threshold_factor * (w1 + w2) / two;

        let spine = match process_stroke(pts.clone(), w1, w2) {
            Ok(p) if p.length >= threshold && p.taper.segments() >= 2 => Spine::Curve {
                points: p.points,
                taper: p.taper,
                length: p.length,
                start_tangent: p.start_tangent,
                end_tangent: p.end_tangent,
            },
            Ok(p) => Spine::Point {
                at: p.points.first().copied().unwrap_or(b1.center),
                offset: p.length * p.taper.c(0),
                start_tangent: p.start_tangent,
                end_tangent: p.end_tangent,
            },
            Err(BuildError::StrokeTooShort) => {
                remove_end_kinks(&mut pts, w1, w2);
                let length = pts.length();
                Spine::Point {
                    at: pts.interpolate(T::from_f64(0.5).unwrap()).0,
                    offset: length / two,
                    start_tangent: pts.tangent(0),
                    end_tangent: pts.tangent(pts.len() - 1),
                }
            }
            Err(e) => return Err(e),
        };

        let name = format!("branch_{}", scene.primitive_count() + 1);
        let mut primitive = Primitive::new(name, PrimitiveKind::Branch);
        primitive.base1 = b1.faces.clone();
        primitive.base2 = b2.as_ref().map(|b| b.faces.clone()).unwrap_or_default();

        let built = build_tube(
            scene,
            &mut primitive,
            &spine,
            &b1,
            b2.as_ref(),
            n,
            options.attach_mode,
            cmd,
        );
        match built {
            Ok(sleeve) => {
                let id = primitive.finish_build(scene, cmd);
                if let Some((faces, map)) = sleeve {
                    if !skin.create_sleeve(scene, id, &faces, &map, cmd) {
                        debug!("extend_branch: skin creation failed");
                        cmd.undoit(scene);
                        scene.delete_primitive(id);
                        return Err(BuildError::SkinFailed);
                    }
                }
                Ok(id)
            }
            Err(e) => {
                debug!("extend_branch: {}", e);
                scene.discard(primitive);
                Err(e)
            }
        }
    }
}

/// Build skeleton, rings, bands and caps of a tube.
/// In sleeve mode, returns the faces to skin and the map from end rings to base boundaries.
#[allow(clippy::too_many_arguments)]
fn build_tube<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    spine: &Spine<T>,
    b1: &Base<T>,
    b2: Option<&Base<T>>,
    n: &Vector3<T>,
    mode: AttachMode,
    cmd: &mut MultiCommand<T>,
) -> BuildResult<Option<(Vec<FaceId>, VertMapper)>> {
    let sleeve = mode == AttachMode::Sleeve;
    let faces_1_2 = b1
        .faces
        .iter()
        .chain(b2.iter().flat_map(|b| b.faces.iter()))
        .copied()
        .collect_vec();
    let du = scene.mesh().min_uv_delta(&faces_1_2);
    let (tan1, tan2) = spine.tangents();

    // base 1: ring in counter-clockwise order, handling strokes drawn into the surface
    let v1 = b1.boundary.clone();
    let b1back = b1.normal.dot(&tan1) < T::zero();
    let source = b1.disk(scene.mesh(), n, b1back);
    let f1 = primitive.own_frame(scene, source)?;
    let u1 = to_locals(scene, f1, &v1)?;

    // base 2: ring matched to base 1 in direction and rotation
    let end2 = match b2 {
        Some(b2) => {
            let mut v2 = b2.boundary.clone();
            let b2back = b2.normal.dot(&tan2) > T::zero();
            if b2back == b1back {
                v2.reverse();
            }
            let source = b2.disk(scene.mesh(), n, !b2back);
            let f2 = primitive.own_frame(scene, source)?;
            let mut u2 = to_locals(scene, f2, &v2)?;
            let p = min_dist_permutation(&u1, &u2);
            v2.rotate_right(p);
            u2.rotate_right(p);
            Some((f2, v2, u2))
        }
        None => None,
    };

    // skeleton, following the base frames
    let path = match spine {
        Spine::Point { at, .. } => {
            let anchor = scene.frame(f1).cloned().ok_or(BuildError::UndefinedFrame)?;
            let frame = CoordFrame::new(*at, anchor.tangent(), n);
            let p = scene.skeleton_mut().add_anchored_point(frame, f1, &anchor);
            primitive.absorb_point(p, true);
            SkeletonPath::Point(p)
        }
        Spine::Curve { points, taper, .. } => {
            let last_anchor = end2.as_ref().map(|(f2, _, _)| *f2).unwrap_or(f1);
            let ends = [
                (points.first().copied(), tan1, f1),
                (points.last().copied(), tan2, last_anchor),
            ];
            let mut ids = vec![];
            for (at, tangent, anchor_id) in ends {
                let at = at.ok_or(BuildError::TooFewSamples)?;
                let anchor = scene
                    .frame(anchor_id)
                    .cloned()
                    .ok_or(BuildError::UndefinedFrame)?;
                let frame = CoordFrame::new(at, &tangent, n);
                let p = scene
                    .skeleton_mut()
                    .add_anchored_point(frame, anchor_id, &anchor);
                primitive.absorb_point(p, true);
                ids.push(p);
            }
            let built = build_curve(
                scene.skeleton_mut(),
                points,
                taper.control_parameters(),
                Some(ids[0]),
                Some(ids[1]),
                n,
            )?;
            primitive.absorb_curve(built.curve, true);
            SkeletonPath::Curve(built.curve)
        }
    };

    // first ring and cap
    let (p1, cap1) = if sleeve {
        let p1 = build_ring(scene, primitive, f1, &u1)?;
        let cap1 = copy_cap(scene, primitive, &b1.faces, &v1, &p1, f1, f1, T::zero(), true)?;
        (p1, cap1)
    } else {
        (v1.clone(), vec![])
    };
    primitive.rings.push(Ring {
        frame: sleeve.then_some(f1),
        vertices: p1.clone(),
    });

    // internal rings along the curve, then the last ring
    let mut sections = vec![];
    let mut end_frame = None;
    if let (SkeletonPath::Curve(curve), Spine::Curve { taper, .. }) = (path, spine) {
        let edges = scene
            .skeleton()
            .curve(curve)
            .map(|c| c.edge_count())
            .ok_or(BuildError::MissingSkeleton)?;
        for k in 0..edges {
            let frame = primitive.own_frame(
                scene,
                FrameSource::SkeletonEdge {
                    curve,
                    edge: k,
                    normal: *n,
                },
            )?;
            let t = taper.u(k + 1);
            let locals = match end2.as_ref() {
                Some((_, _, u2)) => lerp_locals(&u1, u2, t),
                None => u1.clone(),
            };
            sections.push(Section::new(SectionRing::Build { frame, locals }, t));
        }
    }
    match end2.as_ref() {
        Some((f2, v2, u2)) => {
            let ring = if sleeve {
                SectionRing::Build {
                    frame: *f2,
                    locals: u2.clone(),
                }
            } else {
                SectionRing::Existing(v2.clone())
            };
            sections.push(Section::new(ring, T::one()));
        }
        None => {
            let source = match path {
                SkeletonPath::Point(p) => FrameSource::SkeletonPoint(p),
                SkeletonPath::Curve(curve) => FrameSource::CurveEnd {
                    curve,
                    end: CurveEnd::End,
                    normal: *n,
                },
            };
            let frame = primitive.own_frame(scene, source)?;
            end_frame = Some(frame);
            let locals = advance_locals(&u1, spine.end_offset());
            sections.push(Section::new(SectionRing::Build { frame, locals }, T::one()));
        }
    }

    let rings = extrude(
        scene,
        primitive,
        &p1,
        T::zero(),
        sections,
        &BandStyle::Closed { du },
    )?;
    let p2 = rings.last().cloned().unwrap_or_default();

    // last cap
    let mut cap2 = vec![];
    match (end2.as_ref(), end_frame) {
        (Some((f2, v2, _)), _) => {
            let b2 = b2.ok_or(BuildError::BadSecondBase)?;
            if sleeve {
                cap2 = copy_cap(scene, primitive, &b2.faces, v2, &p2, *f2, *f2, T::zero(), true)?;
            }
        }
        (None, Some(frame)) => {
            // close the free end with a copy of the first cap pushed along the tube
            let (faces, flip) = if sleeve {
                (cap1.clone(), true)
            } else {
                (b1.faces.clone(), false)
            };
            copy_cap(
                scene,
                primitive,
                &faces,
                &p1,
                &p2,
                f1,
                frame,
                spine.end_offset(),
                flip,
            )?;
        }
        (None, None) => {}
    }

    if !sleeve {
        // the tube now covers the shared bases
        primitive.push(scene, &faces_1_2, cmd);
        return Ok(None);
    }

    let mut faces = faces_1_2;
    faces.extend(cap1);
    faces.extend(cap2);
    let mut map = VertMapper::from_pairs(&p1, &v1);
    if let Some((_, v2, _)) = end2.as_ref() {
        p2.iter().zip(v2.iter()).for_each(|(a, b)| map.add(*a, *b));
    }
    Ok(Some((faces, map)))
}
