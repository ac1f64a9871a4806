#![allow(dead_code)]

use nalgebra::{Point2, Point3, Vector3};
use skelform::prelude::*;

/// Looking along +y at the y = 0 plane, 20 pixels per world unit,
/// the world origin at pixel (300, 300) and +z pointing up the screen
pub fn front_camera() -> Camera<f64> {
    Camera::look_at(
        &Point3::new(0., -10., 0.),
        &Point3::origin(),
        &Vector3::z(),
        Projection::Orthographic { height: 30. },
        600.,
        600.,
    )
}

pub fn pixel(x: f64, z: f64) -> Point2<f64> {
    Point2::new(300. + 20. * x, 300. - 20. * z)
}

/// Stroke straight up the screen from height `z0` to `z1`, one sample per world unit
pub fn vertical_stroke(z0: f64, z1: f64) -> Stroke<f64> {
    let n = ((z1 - z0).abs().ceil() as usize).max(1);
    Stroke::new(
        (0..=n)
            .map(|i| pixel(0., z0 + (z1 - z0) * i as f64 / n as f64))
            .collect(),
    )
}

/// Corners of a square of half-size `half` at height `z`, counter-clockwise around +z
pub fn square_corners(half: f64, z: f64) -> [Point3<f64>; 4] {
    [
        Point3::new(-half, -half, z),
        Point3::new(half, -half, z),
        Point3::new(half, half, z),
        Point3::new(-half, half, z),
    ]
}

/// A single horizontal quad facing up (or down) at height `z`,
/// its corner list starting `shift` corners further around
pub fn quad_base(
    scene: &mut Scene<f64>,
    half: f64,
    z: f64,
    up: bool,
    shift: usize,
) -> (Vec<VertexId>, FaceId) {
    let verts: Vec<_> = square_corners(half, z)
        .iter()
        .map(|p| scene.mesh_mut().add_vertex(*p))
        .collect();
    let mut corners = verts.clone();
    if !up {
        corners.reverse();
    }
    corners.rotate_left(shift % 4);
    let face = scene.mesh_mut().add_face(corners, None).unwrap();
    (verts, face)
}

/// `(cols + 1) x (rows + 1)` vertices of the z = 0 plane spaced `step` apart from `(x0, y0)`,
/// quads counter-clockwise around +z. `verts[i][j]` is at column `i`, row `j`.
pub fn grid_base(
    scene: &mut Scene<f64>,
    x0: f64,
    y0: f64,
    step: f64,
    cols: usize,
    rows: usize,
) -> (Vec<Vec<VertexId>>, Vec<FaceId>) {
    let verts: Vec<Vec<_>> = (0..=cols)
        .map(|i| {
            (0..=rows)
                .map(|j| {
                    scene.mesh_mut().add_vertex(Point3::new(
                        x0 + step * i as f64,
                        y0 + step * j as f64,
                        0.,
                    ))
                })
                .collect()
        })
        .collect();
    let mut faces = vec![];
    for i in 0..cols {
        for j in 0..rows {
            let quad = vec![
                verts[i][j],
                verts[i + 1][j],
                verts[i + 1][j + 1],
                verts[i][j + 1],
            ];
            faces.push(scene.mesh_mut().add_face(quad, None).unwrap());
        }
    }
    (verts, faces)
}

pub fn ring_center(scene: &Scene<f64>, ring: &Ring) -> Point3<f64> {
    average(&scene.mesh().positions(&ring.vertices).unwrap())
}

pub fn visible_faces(scene: &Scene<f64>) -> Vec<FaceId> {
    let mut faces: Vec<_> = scene.mesh().visible_faces().collect();
    faces.sort();
    faces
}
