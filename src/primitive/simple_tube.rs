use log::debug;
use nalgebra::{Point3, Vector3};

use crate::command::MultiCommand;
use crate::frame::{CurveEnd, FrameSource};
use crate::misc::{FloatingPoint, Plane};
use crate::scene::Scene;
use crate::skeleton::{build_curve, remove_end_kinks, uniform_parameters, CurveId, PointId};
use crate::stroke::{Camera, Stroke};

use super::{
    build_cap, build_ring, extrude, BandStyle, BuildError, BuildResult, Primitive, PrimitiveId,
    PrimitiveKind, Ring, Section, SectionRing,
};

/// Corners of a square of half-size `d` in the frame's normal plane,
/// counter-clockwise around the tangent starting at the top right
fn gen_4_ring<T: FloatingPoint>(d: T) -> Vec<Point3<T>> {
    vec![
        Point3::new(T::zero(), d, d),
        Point3::new(T::zero(), -d, d),
        Point3::new(T::zero(), -d, -d),
        Point3::new(T::zero(), d, -d),
    ]
}

fn shifted<T: FloatingPoint>(locals: &[Point3<T>], dx: T) -> Vec<Point3<T>> {
    locals
        .iter()
        .map(|u| Point3::new(u.x + dx, u.y, u.z))
        .collect()
}

impl Primitive {
    /// Grow a square tube of radius `radius` from the skeleton point `point`
    /// along a stroke projected onto the plane through the point with normal `n`.
    /// Both ends are closed with a single quad.
    #[allow(clippy::too_many_arguments)]
    pub fn build_simple_tube<T: FloatingPoint>(
        scene: &mut Scene<T>,
        camera: &Camera<T>,
        point: PointId,
        radius: T,
        n: &Vector3<T>,
        stroke: &Stroke<T>,
        cmd: &mut MultiCommand<T>,
    ) -> BuildResult<PrimitiveId> {
        let Some(origin) = scene.skeleton().point(point).map(|p| *p.position()) else {
            debug!("build_simple_tube: missing skeleton point");
            return Err(BuildError::MissingSkeleton);
        };
        if radius <= T::zero() {
            debug!("build_simple_tube: bad radius");
            return Err(BuildError::BadInput("radius must be positive"));
        }
        let n = n.try_normalize(T::default_epsilon()).ok_or_else(|| {
            debug!("build_simple_tube: null projection normal");
            BuildError::BadInput("null projection normal")
        })?;
        if stroke.len() < 2 {
            debug!("build_simple_tube: too few pixels");
            return Err(BuildError::TooFewPixels);
        }

        let mut pts = stroke.project_to_plane(camera, &Plane::from_point_normal(&origin, &n));

        // edge length of the tube
        let three = T::from_f64(3.0).unwrap();
        let two = T::from_f64(2.0).unwrap();
        let w = scene.options().sampling_factor * (two / three.sqrt()) * radius;
        if pts.len() < 2 || pts.length() < w {
            debug!("build_simple_tube: stroke too short compared to ball size");
            return Err(BuildError::StrokeTooShort);
        }

        // start the curve at the point
        pts.push_front(origin);
        remove_end_kinks(&mut pts, w, w);

        let segments = (pts.length() / w).round().to_usize().unwrap_or(1).max(1);
        let name = format!("simple_tube_{}", scene.primitive_count() + 1);
        let mut primitive = Primitive::new(name, PrimitiveKind::SimpleTube);

        let built = build_curve(
            scene.skeleton_mut(),
            &pts,
            uniform_parameters(segments),
            Some(point),
            None,
            &n,
        )?;
        primitive.absorb_point(point, false);
        primitive.absorb_point(built.end, built.created_end);
        primitive.absorb_curve(built.curve, true);

        match build_square_tube(scene, &mut primitive, built.curve, w, &n) {
            Ok(()) => Ok(primitive.finish_build(scene, cmd)),
            Err(e) => {
                debug!("build_simple_tube: {}", e);
                scene.discard(primitive);
                Err(e)
            }
        }
    }
}

fn build_square_tube<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    curve: CurveId,
    w: T,
    n: &Vector3<T>,
) -> BuildResult<()> {
    let two = T::from_f64(2.0).unwrap();
    let u = gen_4_ring(w / two);
    let du = T::one() / T::from_usize(u.len()).unwrap();
    let edges = scene
        .skeleton()
        .curve(curve)
        .map(|c| c.edge_count())
        .ok_or(BuildError::MissingSkeleton)?;

    // first ring, pulled back half an edge, and its cap
    let f1 = primitive.own_frame(
        scene,
        FrameSource::CurveEnd {
            curve,
            end: CurveEnd::Start,
            normal: *n,
        },
    )?;
    let first = build_ring(scene, primitive, f1, &shifted(&u, -w / two))?;
    build_cap(scene, primitive, [first[1], first[0], first[3], first[2]], du)?;
    primitive.rings.push(Ring {
        frame: Some(f1),
        vertices: first.clone(),
    });

    // internal rings, then the last ring pushed forward half an edge
    let dv = T::one() / T::from_usize(edges + 1).unwrap();
    let mut sections = Vec::with_capacity(edges + 1);
    for k in 0..edges {
        let frame = primitive.own_frame(
            scene,
            FrameSource::SkeletonEdge {
                curve,
                edge: k,
                normal: *n,
            },
        )?;
        let v = T::from_usize(k + 1).unwrap() * dv;
        sections.push(Section::new(
            SectionRing::Build {
                frame,
                locals: u.clone(),
            },
            v,
        ));
    }
    let f2 = primitive.own_frame(
        scene,
        FrameSource::CurveEnd {
            curve,
            end: CurveEnd::End,
            normal: *n,
        },
    )?;
    sections.push(Section::new(
        SectionRing::Build {
            frame: f2,
            locals: shifted(&u, w / two),
        },
        T::one(),
    ));

    let rings = extrude(scene, primitive, &first, T::zero(), sections, &BandStyle::Closed { du })?;
    if let Some(last) = rings.last() {
        build_cap(scene, primitive, [last[0], last[1], last[2], last[3]], du)?;
    }
    Ok(())
}
