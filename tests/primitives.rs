mod common;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use skelform::prelude::*;

use common::*;

fn origin_point(scene: &mut Scene<f64>) -> PointId {
    scene.skeleton_mut().add_point(CoordFrame::new(
        Point3::origin(),
        &Vector3::x(),
        &Vector3::y(),
    ))
}

#[test]
fn simple_tube_is_closed_at_both_ends() {
    let mut scene = Scene::<f64>::new();
    let point = origin_point(&mut scene);
    let mut cmd = MultiCommand::new();
    let id = Primitive::build_simple_tube(
        &mut scene,
        &front_camera(),
        point,
        0.5,
        &Vector3::y(),
        &vertical_stroke(0., 5.),
        &mut cmd,
    )
    .unwrap();

    let tube = scene.primitive(id).unwrap();
    assert!(tube.is_tube());
    assert_eq!(tube.kind(), PrimitiveKind::SimpleTube);
    assert_eq!(tube.name(), "simple_tube_1");
    assert!(tube.skel_points().contains(&point));
    assert!(!tube.created_points().contains(&point));
    assert_eq!(scene.skeleton().curve_count(), 1);

    let rings = tube.rings();
    assert!(rings.iter().all(|r| r.vertices.len() == 4));
    assert_eq!(tube.faces().len(), 4 * (rings.len() - 1) + 2);
    assert!(tube.faces().iter().all(|f| scene.mesh().is_simple_quad(*f)));

    // the caps stick out past the skeleton ends
    let first = ring_center(&scene, &rings[0]);
    let last = ring_center(&scene, rings.last().unwrap());
    assert!(first.z < 0.);
    assert!(last.z > 4.);

    // deleting the tube keeps the point it was drawn from
    assert!(scene.delete_primitive(id));
    assert_eq!(scene.skeleton().point_count(), 1);
    assert!(scene.skeleton().point(point).is_some());
    assert_eq!(scene.skeleton().curve_count(), 0);
    assert_eq!(scene.mesh().vertex_count(), 0);
}

#[test]
fn simple_tube_rejects_bad_input() {
    let mut scene = Scene::<f64>::new();
    let point = origin_point(&mut scene);
    let camera = front_camera();
    let mut cmd = MultiCommand::new();
    assert_eq!(
        Primitive::build_simple_tube(
            &mut scene,
            &camera,
            point,
            0.,
            &Vector3::y(),
            &vertical_stroke(0., 5.),
            &mut cmd,
        ),
        Err(BuildError::BadInput("radius must be positive"))
    );
    assert_eq!(
        Primitive::build_simple_tube(
            &mut scene,
            &camera,
            point,
            0.5,
            &Vector3::y(),
            &Stroke::new(vec![pixel(0., 0.), pixel(0., 0.1)]),
            &mut cmd,
        ),
        Err(BuildError::StrokeTooShort)
    );
    assert!(cmd.is_empty());
    assert_eq!(scene.skeleton().point_count(), 1);
    assert_eq!(scene.mesh().vertex_count(), 0);
}

#[test]
fn ball_grows_around_a_lone_point() {
    let mut scene = Scene::<f64>::new();
    let point = origin_point(&mut scene);
    let camera = front_camera();
    let mut cmd = MultiCommand::new();
    let id = Primitive::create_ball(&mut scene, &camera, point, 50., &mut cmd).unwrap();
    let ball = scene.primitive(id).unwrap();
    assert_eq!(ball.kind(), PrimitiveKind::Ball);
    assert!(ball.is_ball());
    assert_eq!(ball.rings().len(), 1);

    // 50 pixels are 2.5 units, scaled by 0.8
    for v in ball.vertices() {
        let p = scene.mesh().position(*v).unwrap();
        assert_relative_eq!(p.x.abs(), 2., epsilon = 1e-9);
        assert_relative_eq!(p.y.abs(), 2., epsilon = 1e-9);
        assert_relative_eq!(p.z.abs(), 2., epsilon = 1e-9);
    }
}

#[test]
fn ball_rejects_points_on_curves() {
    let mut scene = Scene::<f64>::new();
    let point = origin_point(&mut scene);
    let camera = front_camera();
    let mut cmd = MultiCommand::new();
    Primitive::build_simple_tube(
        &mut scene,
        &camera,
        point,
        0.5,
        &Vector3::y(),
        &vertical_stroke(0., 5.),
        &mut cmd,
    )
    .unwrap();
    let faces = scene.mesh().face_count();
    assert_eq!(
        Primitive::create_ball(&mut scene, &camera, point, 20., &mut cmd),
        Err(BuildError::NonIsolatedSkeleton)
    );
    assert_eq!(
        Primitive::create_ball(&mut scene, &camera, PointId::default(), 20., &mut cmd),
        Err(BuildError::MissingSkeleton)
    );
    assert_eq!(scene.mesh().face_count(), faces);
    assert_eq!(scene.primitive_count(), 1);
}

#[test]
fn wafer_owns_its_skeleton_point() {
    let mut scene = Scene::<f64>::new();
    let mut cmd = MultiCommand::new();
    let quad = [
        Point3::new(0., 0., 0.),
        Point3::new(4., 0., 0.),
        Point3::new(4., 2., 0.),
        Point3::new(0., 2., 0.),
    ];
    let id = Primitive::build_wafer(&mut scene, &quad, &Vector3::z(), &mut cmd).unwrap();
    let wafer = scene.primitive(id).unwrap();
    assert_eq!(wafer.name(), "wafer_1");
    assert!(wafer.is_ball());
    assert_eq!(wafer.created_points().len(), 1);
    assert_eq!(wafer.rings().len(), 2);

    let p = wafer.created_points()[0];
    assert_relative_eq!(
        *scene.skeleton().point(p).unwrap().position(),
        Point3::new(2., 1., 0.),
        epsilon = 1e-9
    );

    // corners move by half the average of their two edges
    let top = scene.mesh().face_centroid(wafer.faces()[0]).unwrap();
    assert_relative_eq!(top, Point3::new(2., 1., 1.5), epsilon = 1e-9);

    assert!(scene.delete_primitive(id));
    assert_eq!(scene.skeleton().point_count(), 0);
    assert_eq!(scene.mesh().vertex_count(), 0);
    assert_eq!(scene.mesh().face_count(), 0);
}

#[test]
fn picking_finds_the_skeleton_under_the_cursor() {
    let mut scene = Scene::<f64>::new();
    let point = origin_point(&mut scene);
    let camera = front_camera();
    let mut cmd = MultiCommand::new();
    let id = Primitive::build_simple_tube(
        &mut scene,
        &camera,
        point,
        0.5,
        &Vector3::y(),
        &vertical_stroke(0., 5.),
        &mut cmd,
    )
    .unwrap();
    let tube = scene.primitive(id).unwrap();
    let curve = tube.skel_curves()[0];
    let end = scene.skeleton().curve(curve).unwrap().end();
    let end_pixel = camera.world_to_pixel(scene.skeleton().point(end).unwrap().position());

    assert_eq!(
        tube.find_skeleton_point(&scene, &camera, &pixel(0.1, 0.), 5.),
        Some(point)
    );
    assert_eq!(
        tube.find_skeleton_point(&scene, &camera, &end_pixel, 5.),
        Some(end)
    );
    assert_eq!(
        tube.find_skeleton_point(&scene, &camera, &pixel(0., 2.5), 5.),
        None
    );

    let along = Stroke::new(vec![pixel(0.1, 0.5), pixel(0.1, 2.5), pixel(0.1, 4.5)]);
    assert_eq!(
        tube.find_skeleton_curve(&scene, &camera, &along, 5.),
        Some(curve)
    );
    let beside = Stroke::new(vec![pixel(3., 0.5), pixel(3., 4.5)]);
    assert_eq!(tube.find_skeleton_curve(&scene, &camera, &beside, 5.), None);
}
