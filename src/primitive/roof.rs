use log::debug;
use nalgebra::{Point3, Vector3};

use crate::command::MultiCommand;
use crate::frame::{FrameId, FrameSource};
use crate::mesh::{FaceId, FaceSetQuery, Mesh, VertexId};
use crate::misc::{newell_normal, FloatingPoint, Invertible, Plane, Polyline};
use crate::scene::Scene;
use crate::stroke::{Camera, Stroke};

use super::{
    build_ring, extrude, BandStyle, BuildError, BuildResult, Primitive, PrimitiveId,
    PrimitiveKind, Ring, Section, SectionRing,
};

/// The two sides of a rectangular quad grid adjacent to a given side.
///
/// ```text
///          3
///     ----------
///     |        |
///   4 |        | 2
///     |        |
///     ----------
///       1 (side)
/// ```
///
/// Both lists run from side 3 toward side 1, so `side2` ends at the last vertex
/// of `side` and `side4` ends at its first vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSides {
    pub side2: Vec<VertexId>,
    pub side4: Vec<VertexId>,
}

/// Find the sides of the grid `bases` adjacent to the boundary path `side`.
/// `None` if the boundary is not a single loop or `side` is not a contiguous
/// part of it shorter than half of it.
pub fn extract_sides<T: FloatingPoint>(
    mesh: &Mesh<T>,
    bases: &[FaceId],
    side: &[VertexId],
) -> Option<GridSides> {
    let mut bound = mesh.boundary_loop(bases)?;
    let first = *side.first()?;
    let start = bound.iter().position(|v| *v == first)?;
    bound.rotate_left(start);

    let total = bound.len();
    let a = side.len() - 1;
    if total % 2 != 0 || a == 0 || 2 * a >= total {
        return None;
    }
    let b = total / 2 - a;

    let forward = (0..=a).all(|i| bound[i] == side[i]);
    let backward = (0..=a).all(|i| bound[(total - i) % total] == side[i]);
    if forward {
        Some(GridSides {
            side2: (a..=a + b).rev().map(|i| bound[i]).collect(),
            side4: (2 * a + b..=total).map(|i| bound[i % total]).collect(),
        })
    } else if backward {
        Some(GridSides {
            side2: (a + b..=a + 2 * b).map(|i| bound[i]).collect(),
            side4: (0..=b).rev().map(|i| bound[i]).collect(),
        })
    } else {
        None
    }
}

/// Vertices of one row of a quad grid, walking from `start` across the quads
/// until `end`. `partner` is the neighbor of `start` in the next row, which
/// fixes the first quad.
pub fn walk_row<T: FloatingPoint>(
    mesh: &Mesh<T>,
    bases: &[FaceId],
    start: VertexId,
    partner: VertexId,
    end: VertexId,
) -> Option<Vec<VertexId>> {
    let mut row = vec![start];
    let (mut cur, mut par) = (start, partner);
    let mut last_face = None;
    for _ in 0..=bases.len() {
        if cur == end {
            return Some(row);
        }
        let (face, verts) = bases.iter().find_map(|f| {
            let verts = mesh.face(*f)?.vertices();
            (Some(*f) != last_face && verts.contains(&cur) && verts.contains(&par))
                .then_some((*f, verts))
        })?;
        if verts.len() != 4 {
            return None;
        }
        let i = verts.iter().position(|v| *v == cur)?;
        let j = verts.iter().position(|v| *v == par)?;
        let other = |k: usize, not: VertexId| {
            if verts[(k + 1) % 4] == not {
                verts[(k + 3) % 4]
            } else {
                verts[(k + 1) % 4]
            }
        };
        let (next, next_par) = (other(i, par), other(j, cur));
        row.push(next);
        cur = next;
        par = next_par;
        last_face = Some(face);
    }
    None
}

/// Frame at the middle of a row: at its middle vertex if it has one,
/// otherwise at its middle edge. The tangent runs along the row.
fn row_frame<T: FloatingPoint>(row: &[VertexId], n: &Vector3<T>) -> FrameSource<T> {
    let m = row.len() / 2;
    if row.len() % 2 == 1 {
        FrameSource::MeshVertex {
            vertex: row[m],
            from: row[m - 1],
            toward: row[m + 1],
            normal: *n,
        }
    } else {
        FrameSource::MeshEdge {
            from: row[m - 1],
            to: row[m],
            normal: *n,
        }
    }
}

/// Cross-section of a roof: points strictly between the ends of the side,
/// ordered from the last vertex of the side to the first, plus the columns
/// that carry a crease
#[derive(Debug, Clone)]
pub(crate) struct Profile<T: FloatingPoint> {
    pub(crate) points: Vec<Point3<T>>,
    pub(crate) creases: Vec<usize>,
}

/// Resample the roof stroke between its corners with spacing about `w`.
/// Each corner that survives becomes a creased column.
pub(crate) fn roof_profile<T: FloatingPoint>(
    pts: &Polyline<T>,
    corners: &[usize],
    w: T,
) -> Profile<T> {
    let length = pts.length();
    // vertex count of the profile including both side ends, before reversal
    let mut count = 1;
    let mut points = vec![];
    let mut locs = vec![];
    let segments = corners.len() - 1;
    for i in 1..corners.len() {
        let p_start = pts.partial_length(corners[i - 1]);
        let p_end = pts.partial_length(corners[i]);
        let num_edges = ((p_end - p_start) / w).floor().to_usize().unwrap_or(0) + 1;
        if num_edges == 1 {
            continue;
        }
        let t_start = p_start / length;
        let dt = (p_end - p_start) / length / T::from_usize(num_edges).unwrap();
        let end = if i == segments { num_edges - 1 } else { num_edges };
        for j in 1..=end {
            points.push(pts.interpolate(t_start + dt * T::from_usize(j).unwrap()).0);
            count += 1;
        }
        if i != segments {
            locs.push(count - 1);
        }
    }
    count += 1;
    points.reverse();
    Profile {
        points,
        creases: locs.into_iter().map(|c| count - 1 - c).collect(),
    }
}

/// Everything the roof needs from its inputs, gathered before the scene changes
struct RoofPlan<T: FloatingPoint> {
    side: Vec<VertexId>,
    sides: GridSides,
    rows: Vec<Vec<VertexId>>,
    profile: Profile<T>,
}

impl Primitive {
    /// Raise a roof over the rectangular quad grid `bases`.
    ///
    /// The stroke runs from the first vertex of `side`, a boundary path of the grid,
    /// to its last vertex. It is projected onto the plane through the middle of the
    /// side with normal `n`, and its profile is swept across the grid, one row of
    /// vertices per grid row. `corners` are stroke sample indices (first and last
    /// included) where the profile bends; the bands are creased there.
    /// Gable panels close both ends.
    #[allow(clippy::too_many_arguments)]
    pub fn build_roof<T: FloatingPoint>(
        scene: &mut Scene<T>,
        camera: &Camera<T>,
        stroke: &Stroke<T>,
        corners: &[usize],
        n: &Vector3<T>,
        bases: &[FaceId],
        side: &[VertexId],
        cmd: &mut MultiCommand<T>,
    ) -> BuildResult<PrimitiveId> {
        if stroke.len() < 2 {
            debug!("build_roof: too few pixels");
            return Err(BuildError::TooFewPixels);
        }
        if bases.is_empty() || side.len() < 2 {
            debug!("build_roof: no base or side");
            return Err(BuildError::EmptyBase);
        }
        let len = stroke.len();
        let valid_corners = corners.len() >= 2
            && corners.first() == Some(&0)
            && corners.last() == Some(&(len - 1))
            && corners.windows(2).all(|w| w[0] < w[1]);
        if !valid_corners {
            debug!("build_roof: corners must rise from the first to the last sample");
            return Err(BuildError::BadCorners);
        }
        let n = n.try_normalize(T::default_epsilon()).ok_or_else(|| {
            debug!("build_roof: null projection normal");
            BuildError::BadInput("null projection normal")
        })?;
        let Some(side_pts) = scene.mesh().positions(side) else {
            debug!("build_roof: side references a missing vertex");
            return Err(BuildError::BadBase);
        };
        let (first, last) = (side_pts[0], side_pts[side_pts.len() - 1]);

        // the stroke must start at the first vertex of the side and end at the last
        let snap = scene.options().side_snap_distance;
        let near = |pixel: Option<&nalgebra::Point2<T>>, p: &Point3<T>| {
            pixel.is_some_and(|px| (camera.world_to_pixel(p) - px).norm() < snap)
        };
        let mut stroke = stroke.clone();
        let mut corners = corners.to_vec();
        if !near(stroke.first(), &first) {
            stroke = stroke.inverse();
            corners = corners.iter().rev().map(|c| len - 1 - c).collect();
        }
        if !near(stroke.first(), &first) || !near(stroke.last(), &last) {
            debug!("build_roof: stroke too far from the side");
            return Err(BuildError::StrokeTooFar);
        }

        let plan = plan_roof(scene, camera, &stroke, corners, &n, bases, side, &side_pts)?;

        let name = format!("roof_{}", scene.primitive_count() + 1);
        let mut primitive = Primitive::new(name, PrimitiveKind::Roof);
        primitive.base1 = bases.to_vec();
        match build_panels(scene, &mut primitive, plan, &n, bases, cmd) {
            Ok(()) => Ok(primitive.finish_build(scene, cmd)),
            Err(e) => {
                debug!("build_roof: {}", e);
                scene.discard(primitive);
                Err(e)
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn plan_roof<T: FloatingPoint>(
    scene: &Scene<T>,
    camera: &Camera<T>,
    stroke: &Stroke<T>,
    mut corners: Vec<usize>,
    n: &Vector3<T>,
    bases: &[FaceId],
    side: &[VertexId],
    side_pts: &[Point3<T>],
) -> BuildResult<RoofPlan<T>> {
    let mesh = scene.mesh();
    if bases
        .iter()
        .any(|f| mesh.face(*f).map_or(true, |f| f.vertices().len() != 4))
    {
        debug!("build_roof: base is not made of quads");
        return Err(BuildError::BadBase);
    }
    let sides = extract_sides(mesh, bases, side).ok_or_else(|| {
        debug!("build_roof: side is not part of a rectangular base");
        BuildError::BadBase
    })?;
    if sides.side2.len() != sides.side4.len() || sides.side2.len() < 2 {
        debug!("build_roof: base sides don't match");
        return Err(BuildError::BadBase);
    }

    let (first, last) = (side_pts[0], side_pts[side_pts.len() - 1]);
    let plane = Plane::from_point_normal(&nalgebra::center(&first, &last), n);
    let mut pts = stroke.project_to_plane(camera, &plane);
    if pts.len() != stroke.len() {
        debug!("build_roof: stroke misses the projection plane");
        return Err(BuildError::BadInput("stroke misses the projection plane"));
    }

    // pin the ends to the side
    pts.push_front(first);
    pts.push_back(last);
    for c in corners.iter_mut().skip(1) {
        *c += 1;
    }
    if let Some(c) = corners.last_mut() {
        *c += 1;
    }

    let w = scene.options().roof_sampling_factor
        * Polyline::new(side_pts.to_vec()).avg_segment_length();
    if w <= T::zero() || pts.length() <= T::zero() {
        debug!("build_roof: degenerate side");
        return Err(BuildError::BadBase);
    }
    let profile = roof_profile(&pts, &corners, w);
    if profile.points.is_empty() {
        debug!("build_roof: stroke too short");
        return Err(BuildError::StrokeTooShort);
    }

    // rows of grid vertices from side 1 (exclusive) to side 3
    let k_max = sides.side2.len() - 2;
    let rows = (0..=k_max)
        .rev()
        .map(|k| {
            walk_row(
                mesh,
                bases,
                sides.side2[k],
                sides.side2[k + 1],
                sides.side4[k],
            )
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            debug!("build_roof: base is not a quad grid");
            BuildError::BadBase
        })?;

    Ok(RoofPlan {
        side: side.to_vec(),
        sides,
        rows,
        profile,
    })
}

fn frame_locals<T: FloatingPoint>(
    scene: &Scene<T>,
    frame: FrameId,
    points: &[Point3<T>],
) -> BuildResult<Vec<Point3<T>>> {
    let f = scene.frame(frame).ok_or(BuildError::UndefinedFrame)?;
    Ok(points.iter().map(|p| f.to_local(p)).collect())
}

/// Add a gable panel over the loop, facing along `outward`
fn add_panel<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    mut verts: Vec<VertexId>,
    outward: &Vector3<T>,
) -> BuildResult<FaceId> {
    let pts = scene.mesh().positions(&verts).ok_or(BuildError::BadBase)?;
    if newell_normal(&pts).dot(outward) < T::zero() {
        verts.reverse();
    }
    let face = scene.mesh_mut().add_face(verts, None)?;
    primitive.faces.push(face);
    Ok(face)
}

fn crease_row<T: FloatingPoint>(mesh: &mut Mesh<T>, row: &[VertexId]) {
    for w in row.windows(2) {
        mesh.set_crease(w[0], w[1], true);
    }
}

fn build_panels<T: FloatingPoint>(
    scene: &mut Scene<T>,
    primitive: &mut Primitive,
    plan: RoofPlan<T>,
    n: &Vector3<T>,
    bases: &[FaceId],
    cmd: &mut MultiCommand<T>,
) -> BuildResult<()> {
    let RoofPlan {
        side,
        sides,
        rows,
        profile,
    } = plan;
    let (side_first, side_last) = (side[0], side[side.len() - 1]);

    // first cross-section over the side, running the same way as the rows
    let reversed: Vec<_> = side.iter().rev().copied().collect();
    let f1 = primitive.own_frame(scene, row_frame(&reversed, n))?;
    let u1 = frame_locals(scene, f1, &profile.points)?;
    let mut v1 = vec![side_last];
    v1.extend(build_ring(scene, primitive, f1, &u1)?);
    v1.push(side_first);
    primitive.rings.push(Ring {
        frame: Some(f1),
        vertices: v1.clone(),
    });

    let advance = {
        let mesh = scene.mesh();
        let far = mesh.position(sides.side2[0]).ok_or(BuildError::BadBase)?;
        let near = mesh.position(side_last).ok_or(BuildError::BadBase)?;
        far - near
    };

    let mut gable: Vec<_> = v1[..v1.len() - 1].to_vec();
    gable.extend(side[..side.len() - 1].iter().copied());
    add_panel(scene, primitive, gable, &-advance)?;
    crease_row(scene.mesh_mut(), &v1);

    let rows_len = sides.side2.len();
    let mut sections = Vec::with_capacity(rows.len());
    for (r, row) in rows.iter().enumerate() {
        let k = rows_len - 2 - r;
        let frame = primitive.own_frame(scene, row_frame(row, n))?;
        sections.push(Section::new(
            SectionRing::Bounded {
                frame,
                locals: u1.clone(),
                first: sides.side2[k],
                last: sides.side4[k],
            },
            T::from_usize(rows_len - 1 - k).unwrap(),
        ));
    }
    let style = BandStyle::Open {
        creases: profile.creases.clone(),
    };
    let built = extrude(scene, primitive, &v1, T::zero(), sections, &style)?;

    let (Some(cur), Some(cross)) = (built.last(), rows.last()) else {
        return Err(BuildError::BadBase);
    };
    let mut gable: Vec<_> = cur[..cur.len() - 1].to_vec();
    gable.extend(cross.iter().rev().take(cross.len() - 1).copied());
    add_panel(scene, primitive, gable, &advance)?;
    crease_row(scene.mesh_mut(), cur);

    primitive.push(scene, bases, cmd);
    Ok(())
}
