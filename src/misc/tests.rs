use approx::assert_relative_eq;
use nalgebra::{Point2, Point3, Vector3};

use super::{Invertible, Line, Plane, Polyline, Ray};

fn straight(n: usize, step: f64) -> Polyline<f64> {
    Polyline::new(
        (0..n)
            .map(|i| Point3::new(0., 0., i as f64 * step))
            .collect(),
    )
}

#[test]
fn polyline_length_and_interpolation() {
    let pl = straight(11, 1.);
    assert_relative_eq!(pl.length(), 10.);
    assert_relative_eq!(pl.avg_segment_length(), 1.);

    let (p, seg) = pl.interpolate(0.25);
    assert_relative_eq!(p, Point3::new(0., 0., 2.5), epsilon = 1e-12);
    assert_eq!(seg, 2);

    let (end, seg) = pl.interpolate(1.);
    assert_relative_eq!(end, Point3::new(0., 0., 10.), epsilon = 1e-12);
    assert_eq!(seg, 9);
}

#[test]
fn chop_and_trim() {
    let mut pl = straight(11, 1.);
    assert!(pl.chop(0.5));
    assert_relative_eq!(pl.length(), 9.5, epsilon = 1e-12);
    assert_relative_eq!(*pl.first().unwrap(), Point3::new(0., 0., 0.5), epsilon = 1e-12);

    assert!(pl.trim(1.25));
    assert_relative_eq!(pl.length(), 8.25, epsilon = 1e-12);
    assert_relative_eq!(*pl.last().unwrap(), Point3::new(0., 0., 8.75), epsilon = 1e-12);

    // too short: untouched
    let mut short = straight(2, 1.);
    assert!(!short.chop(2.));
    assert_relative_eq!(short.length(), 1.);
}

#[test]
fn chop_at_a_vertex_does_not_duplicate() {
    let mut pl = straight(5, 1.);
    assert!(pl.chop(2.));
    assert_eq!(pl.len(), 3);
    assert_relative_eq!(pl.length(), 2., epsilon = 1e-12);
}

#[test]
fn tangent_at_ends_and_interior() {
    let pl = Polyline::new(vec![
        Point3::new(0., 0., 0.),
        Point3::new(1., 0., 0.),
        Point3::new(1., 1., 0.),
    ]);
    assert_relative_eq!(pl.tangent(0), Vector3::x(), epsilon = 1e-12);
    assert_relative_eq!(pl.tangent(2), Vector3::y(), epsilon = 1e-12);
    let mid = pl.tangent(1);
    assert_relative_eq!(mid, Vector3::new(1., 1., 0.).normalize(), epsilon = 1e-12);
}

#[test]
fn reversal() {
    let pl = straight(3, 2.);
    let rev = pl.inverse();
    assert_relative_eq!(*rev.first().unwrap(), Point3::new(0., 0., 4.));
    assert_relative_eq!(rev.length(), pl.length());
}

#[test]
fn planar_fit_accepts_flat_square() {
    let square = Polyline::new(vec![
        Point3::new(-0.5, -0.5, 0.),
        Point3::new(0.5, -0.5, 0.),
        Point3::new(0.5, 0.5, 0.),
        Point3::new(-0.5, 0.5, 0.),
    ]);
    let plane = square.planar_fit(0.1).unwrap();
    assert_relative_eq!(plane.normal(), Vector3::z(), epsilon = 1e-12);
    assert_relative_eq!(plane.constant(), 0., epsilon = 1e-12);
}

#[test]
fn planar_fit_rejects_twisted_loop() {
    let twisted = Polyline::new(vec![
        Point3::new(-0.5, -0.5, 0.),
        Point3::new(0.5, -0.5, 1.),
        Point3::new(0.5, 0.5, 0.),
        Point3::new(-0.5, 0.5, 1.),
    ]);
    assert!(twisted.planar_fit(0.1).is_none());
}

#[test]
fn ray_plane_intersection() {
    let plane = Plane::from_point_normal(&Point3::new(0., 2., 0.), &Vector3::y());
    let ray = Ray::new(Point3::new(1., -3., 4.), Vector3::y());
    let (p, t) = ray.intersect_plane(&plane).unwrap();
    assert_relative_eq!(p, Point3::new(1., 2., 4.));
    assert_relative_eq!(t, 5.);

    let parallel = Ray::new(Point3::origin(), Vector3::x());
    assert!(parallel.intersect_plane(&plane).is_none());
}

#[test]
fn segment_crossing() {
    let a = Line::new(Point2::new(0., 0.), Point2::new(1., 1.));
    let b = Line::new(Point2::new(0., 1.), Point2::new(1., 0.));
    let c = Line::new(Point2::new(1., 1.), Point2::new(2., 0.));
    assert!(a.crosses(&b));
    assert!(!a.crosses(&c));
}
