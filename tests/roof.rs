mod common;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use skelform::prelude::*;

use common::*;

/// 2 x 3 grid of unit quads centered on the origin; the side runs along its front edge, y = -1.5
fn roof_scene() -> (Scene<f64>, Vec<Vec<VertexId>>, Vec<FaceId>, Vec<VertexId>) {
    let mut scene = Scene::new();
    let (verts, faces) = grid_base(&mut scene, -1., -1.5, 1., 2, 3);
    let side = vec![verts[0][0], verts[1][0], verts[2][0]];
    (scene, verts, faces, side)
}

/// Gable stroke from the left end of the side over an apex one unit high to its right end
fn gable_stroke() -> Stroke<f64> {
    Stroke::new(vec![pixel(-1., 0.), pixel(0., 1.), pixel(1., 0.)])
}

#[test]
fn roof_sweeps_the_profile_across_the_grid() {
    let (mut scene, verts, faces, side) = roof_scene();
    let mut cmd = MultiCommand::new();
    let id = Primitive::build_roof(
        &mut scene,
        &front_camera(),
        &gable_stroke(),
        &[0, 1, 2],
        &Vector3::y(),
        &faces,
        &side,
        &mut cmd,
    )
    .unwrap();

    let roof = scene.primitive(id).unwrap();
    assert!(roof.is_roof());
    assert_eq!(roof.kind(), PrimitiveKind::Roof);
    assert_eq!(roof.base1(), faces.as_slice());
    assert!(faces
        .iter()
        .all(|f| !scene.mesh().face(*f).unwrap().is_visible()));
    assert_eq!(scene.skeleton().point_count(), 0);

    // one cross-section over the side and one per grid row, five new vertices each
    let rings = roof.rings();
    assert_eq!(rings.len(), 4);
    assert!(rings.iter().all(|r| r.vertices.len() == 7));
    assert_eq!(roof.vertices().len(), 20);
    assert_eq!(rings[0].vertices[0], verts[2][0]);
    assert_eq!(rings[0].vertices[6], verts[0][0]);
    assert_eq!(rings[3].vertices[0], verts[2][3]);
    assert_eq!(rings[3].vertices[6], verts[0][3]);

    // six quads per row and a gable at each end
    assert_eq!(roof.faces().len(), 3 * 6 + 2);
    let mesh = scene.mesh();
    let front = roof.faces()[0];
    let back = roof.faces()[roof.faces().len() - 1];
    assert_eq!(mesh.face(front).unwrap().vertices().len(), 8);
    assert!(mesh.face_normal(front).unwrap().y < 0.);
    assert!(mesh.face_normal(back).unwrap().y > 0.);

    // the apex column runs straight back
    for (r, ring) in rings.iter().enumerate() {
        assert_relative_eq!(
            mesh.position(ring.vertices[3]).unwrap(),
            Point3::new(0., -1.5 + r as f64, 1.),
            epsilon = 1e-9
        );
    }

    // both gable outlines and the apex column are creased
    assert_eq!(mesh.crease_count(), 6 + 6 + 3);
    for w in rings[1..].windows(2) {
        assert!(mesh.is_crease(w[0].vertices[3], w[1].vertices[3]));
        assert!(!mesh.is_crease(w[0].vertices[2], w[1].vertices[2]));
    }
}

#[test]
fn stroke_may_run_either_way_along_the_side() {
    let (mut scene, _, faces, side) = roof_scene();
    let mut cmd = MultiCommand::new();
    let stroke = Stroke::new(vec![pixel(1., 0.), pixel(0.5, 0.5), pixel(0., 1.), pixel(-1., 0.)]);
    let id = Primitive::build_roof(
        &mut scene,
        &front_camera(),
        &stroke,
        &[0, 2, 3],
        &Vector3::y(),
        &faces,
        &side,
        &mut cmd,
    )
    .unwrap();
    let roof = scene.primitive(id).unwrap();
    assert_eq!(roof.rings().len(), 4);
    assert_eq!(roof.faces().len(), 3 * 6 + 2);
}

#[test]
fn roof_follows_the_grid() {
    let (mut scene, verts, faces, side) = roof_scene();
    let mut cmd = MultiCommand::new();
    let id = Primitive::build_roof(
        &mut scene,
        &front_camera(),
        &gable_stroke(),
        &[0, 1, 2],
        &Vector3::y(),
        &faces,
        &side,
        &mut cmd,
    )
    .unwrap();

    // lifting the middle of the back row lifts the back cross-section with it
    assert!(scene.move_vertex(verts[1][3], Point3::new(0., 1.5, 1.)));
    let roof = scene.primitive(id).unwrap();
    let apex = roof.rings()[3].vertices[3];
    assert_relative_eq!(
        scene.mesh().position(apex).unwrap(),
        Point3::new(0., 1.5, 2.),
        epsilon = 1e-9
    );
    let front_apex = roof.rings()[0].vertices[3];
    assert_relative_eq!(
        scene.mesh().position(front_apex).unwrap(),
        Point3::new(0., -1.5, 1.),
        epsilon = 1e-9
    );

    assert!(scene.delete_primitive(id));
    assert_eq!(scene.mesh().vertex_count(), 12);
    assert_eq!(scene.mesh().face_count(), 6);
    assert_eq!(scene.mesh().crease_count(), 0);
    assert!(faces.iter().all(|f| scene.mesh().face(*f).unwrap().is_visible()));
}

#[test]
fn rejected_roofs_leave_no_trace() {
    let (mut scene, verts, faces, side) = roof_scene();
    let camera = front_camera();
    let mut cmd = MultiCommand::new();
    let mut roof = |stroke: &Stroke<f64>, corners: &[usize], faces: &[FaceId], side: &[VertexId]| {
        Primitive::build_roof(
            &mut scene,
            &camera,
            stroke,
            corners,
            &Vector3::y(),
            faces,
            side,
            &mut cmd,
        )
    };

    let above = Stroke::new(vec![pixel(-1., 2.5), pixel(0., 3.5), pixel(1., 2.5)]);
    assert_eq!(
        roof(&above, &[0, 1, 2], &faces, &side),
        Err(BuildError::StrokeTooFar)
    );
    assert_eq!(
        roof(&gable_stroke(), &[0, 1], &faces, &side),
        Err(BuildError::BadCorners)
    );
    assert_eq!(
        roof(&gable_stroke(), &[0, 2, 1, 2], &faces, &side),
        Err(BuildError::BadCorners)
    );
    assert_eq!(
        roof(&gable_stroke(), &[0, 1, 2], &[], &side),
        Err(BuildError::EmptyBase)
    );
    // a path crossing the grid is not a side
    assert_eq!(
        roof(&gable_stroke(), &[0, 1, 2], &faces, &[verts[0][0], verts[1][1], verts[2][0]]),
        Err(BuildError::BadBase)
    );

    assert!(cmd.is_empty());
    assert_eq!(scene.primitive_count(), 0);
    assert_eq!(scene.mesh().vertex_count(), 12);
    assert_eq!(scene.mesh().face_count(), 6);
    assert!(scene.frames().is_empty());
}
