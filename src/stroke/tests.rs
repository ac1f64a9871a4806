use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, Vector3};

use crate::misc::{Invertible, Plane};

use super::{Camera, Projection, Stroke};

/// Looking along +y at the y = 0 plane, 20 pixels per world unit
fn front_camera() -> Camera<f64> {
    Camera::look_at(
        &Point3::new(0., -10., 0.),
        &Point3::origin(),
        &Vector3::z(),
        Projection::Orthographic { height: 30. },
        600.,
        600.,
    )
}

#[test]
fn orthographic_pixels() {
    let camera = front_camera();
    assert_relative_eq!(camera.forward(), Vector3::y(), epsilon = 1e-12);
    assert_relative_eq!(camera.eye(), Point3::new(0., -10., 0.), epsilon = 1e-12);

    let px = camera.world_to_pixel(&Point3::new(1., 0., 2.));
    assert_relative_eq!(px, Point2::new(320., 260.), epsilon = 1e-9);
    assert!(camera.in_frustum(&Point3::new(1., 0., 2.)));
    assert!(!camera.in_frustum(&Point3::new(20., 0., 0.)));
    assert!(!camera.in_frustum(&Point3::new(0., -20., 0.)));

    assert_relative_eq!(camera.world_length(&Point3::origin(), 20.), 1., epsilon = 1e-12);
    assert_relative_eq!(camera.pixel_length(&Point3::origin(), 0.5), 10., epsilon = 1e-12);
}

#[test]
fn pixel_ray_hits_the_drawn_point() {
    let camera = front_camera();
    let plane = Plane::from_point_normal(&Point3::origin(), &Vector3::y());
    let target = Point3::new(-2.5, 0., 4.);
    let ray = camera.pixel_ray(&camera.world_to_pixel(&target));
    let (hit, _) = ray.intersect_plane(&plane).unwrap();
    assert_relative_eq!(hit, target, epsilon = 1e-9);
}

#[test]
fn perspective_world_length_grows_with_depth() {
    let camera = Camera::look_at(
        &Point3::new(0., -10., 0.),
        &Point3::origin(),
        &Vector3::z(),
        Projection::Perspective { fovy: FRAC_PI_2 },
        600.,
        600.,
    );
    assert_relative_eq!(camera.world_length(&Point3::origin(), 300.), 10., epsilon = 1e-9);
    assert_relative_eq!(
        camera.world_length(&Point3::new(0., 10., 0.), 300.),
        20.,
        epsilon = 1e-9
    );

    let target = Point3::new(3., 5., -2.);
    let ray = camera.pixel_ray(&camera.world_to_pixel(&target));
    let plane = Plane::from_point_normal(&target, &Vector3::y());
    let (hit, t) = ray.intersect_plane(&plane).unwrap();
    assert!(t > 0.);
    assert_relative_eq!(hit, target, epsilon = 1e-9);
}

#[test]
fn stroke_projects_onto_plane() {
    let camera = front_camera();
    let stroke = Stroke::new(vec![Point2::new(300., 300.), Point2::new(300., 100.)]);
    assert_relative_eq!(stroke.length(), 200.);

    let plane = Plane::from_point_normal(&Point3::new(0., 3., 0.), &Vector3::y());
    let pts = stroke.project_to_plane(&camera, &plane);
    assert_eq!(pts.len(), 2);
    assert_relative_eq!(pts.points()[0], Point3::new(0., 3., 0.), epsilon = 1e-9);
    assert_relative_eq!(pts.points()[1], Point3::new(0., 3., 10.), epsilon = 1e-9);

    // a plane seen edge-on catches nothing
    let edge_on = Plane::from_point_normal(&Point3::origin(), &Vector3::x());
    assert!(stroke.project_to_plane(&camera, &edge_on).is_empty());
}

#[test]
fn reversed_stroke_keeps_pressures_aligned() {
    let stroke = Stroke::try_with_pressures(
        vec![Point2::new(0., 0.), Point2::new(1., 0.), Point2::new(2., 0.)],
        vec![0.1, 0.5, 0.9],
    )
    .unwrap();
    let rev = stroke.inverse();
    assert_relative_eq!(*rev.first().unwrap(), Point2::new(2., 0.));
    assert_eq!(rev.pressures().unwrap(), &[0.9, 0.5, 0.1]);

    assert!(Stroke::try_with_pressures(vec![Point2::new(0., 0.)], vec![]).is_err());
}
