use log::debug;
use nalgebra::{Point2, Point3};

use crate::command::MultiCommand;
use crate::frame::FrameSource;
use crate::misc::FloatingPoint;
use crate::scene::Scene;
use crate::skeleton::PointId;
use crate::stroke::Camera;

use super::{build_ring, BuildError, BuildResult, Primitive, PrimitiveId, PrimitiveKind, Ring};

/// Corner index of the cube vertex at `(x, y, z)` with each coordinate 0 or 1
const fn corner(x: usize, y: usize, z: usize) -> usize {
    x + 2 * y + 4 * z
}

/// Outward facing quads of the cube, counter-clockwise seen from outside
const CUBE_FACES: [[usize; 4]; 6] = [
    [corner(0, 0, 0), corner(0, 0, 1), corner(0, 1, 1), corner(0, 1, 0)],
    [corner(1, 0, 0), corner(1, 1, 0), corner(1, 1, 1), corner(1, 0, 1)],
    [corner(0, 0, 0), corner(1, 0, 0), corner(1, 0, 1), corner(0, 0, 1)],
    [corner(0, 1, 0), corner(0, 1, 1), corner(1, 1, 1), corner(1, 1, 0)],
    [corner(0, 0, 0), corner(0, 1, 0), corner(1, 1, 0), corner(1, 0, 0)],
    [corner(0, 0, 1), corner(1, 0, 1), corner(1, 1, 1), corner(0, 1, 1)],
];

/// Corners of an axis-aligned cube of half-size `r` centered at the origin
fn cube_corners<T: FloatingPoint>(r: T) -> Vec<Point3<T>> {
    (0..8)
        .map(|i| {
            let c = |bit: usize| if i & bit == 0 { -r } else { r };
            Point3::new(c(1), c(2), c(4))
        })
        .collect()
}

impl Primitive {
    /// Build a cube around an isolated skeleton point.
    /// `pixel_radius` is the on-screen radius of the ball; the cube's half-size
    /// is its world length at the point scaled by the ball radius scale.
    pub fn create_ball<T: FloatingPoint>(
        scene: &mut Scene<T>,
        camera: &Camera<T>,
        point: PointId,
        pixel_radius: T,
        cmd: &mut MultiCommand<T>,
    ) -> BuildResult<PrimitiveId> {
        let Some(origin) = scene.skeleton().point(point).map(|p| *p.position()) else {
            debug!("create_ball: missing skeleton point");
            return Err(BuildError::MissingSkeleton);
        };
        if !scene.skeleton().is_isolated(point) {
            debug!("create_ball: skeleton point is not isolated");
            return Err(BuildError::NonIsolatedSkeleton);
        }
        if !camera.in_frustum(&origin) {
            debug!("create_ball: skeleton point is outside the view");
            return Err(BuildError::OutsideFrustum);
        }
        if pixel_radius <= T::zero() {
            debug!("create_ball: bad radius");
            return Err(BuildError::BadInput("radius must be positive"));
        }

        let r = camera.world_length(&origin, pixel_radius) * scene.options().ball_radius_scale;
        let name = format!("ball_{}", scene.primitive_count() + 1);
        let mut primitive = Primitive::new(name, PrimitiveKind::Ball);
        primitive.absorb_point(point, false);

        match build_cube(scene, &mut primitive, point, r) {
            Ok(()) => Ok(primitive.finish_build(scene, cmd)),
            Err(e) => {
                debug!("create_ball: {}", e);
                scene.discard(primitive);
                Err(e)
            }
        }
    }
}

fn build_cube<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    point: PointId,
    r: T,
) -> BuildResult<()> {
    let frame = primitive.own_frame(scene, FrameSource::SkeletonPoint(point))?;
    let verts = build_ring(scene, primitive, frame, &cube_corners(r))?;
    let uvs = [
        Point2::new(T::zero(), T::zero()),
        Point2::new(T::one(), T::zero()),
        Point2::new(T::one(), T::one()),
        Point2::new(T::zero(), T::one()),
    ];
    for quad in CUBE_FACES.iter() {
        let face = scene
            .mesh_mut()
            .add_quad(quad.map(|i| verts[i]), uvs)?;
        primitive.faces.push(face);
    }
    primitive.rings.push(Ring {
        frame: Some(frame),
        vertices: verts,
    });
    Ok(())
}
