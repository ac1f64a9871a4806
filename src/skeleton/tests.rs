use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};

use crate::frame::CoordFrame;
use crate::misc::Polyline;
use crate::primitive::BuildError;

use super::{
    build_curve, process_stroke, remove_end_kinks, uniform_parameters, Skeleton, SkeletonCurve,
};

fn line_x(n: usize, step: f64) -> Polyline<f64> {
    Polyline::new(
        (0..n)
            .map(|i| Point3::new(i as f64 * step, 0., 0.))
            .collect(),
    )
}

#[test]
fn end_kinks_are_removed_to_a_fixed_point() {
    let mut pts = Polyline::new(vec![
        Point3::new(0., 0., 0.),
        Point3::new(0.1, 0.05, 0.),
        Point3::new(0.2, -0.05, 0.),
        Point3::new(2., 0., 0.),
        Point3::new(3.9, 0.05, 0.),
        Point3::new(4., 0., 0.),
    ]);
    remove_end_kinks(&mut pts, 0.5, 0.5);
    assert_eq!(pts.len(), 3);
    assert_relative_eq!(*pts.first().unwrap(), Point3::origin());
    assert_relative_eq!(*pts.last().unwrap(), Point3::new(4., 0., 0.));

    // never drops below the two end samples
    let mut short = Polyline::new(vec![
        Point3::new(0., 0., 0.),
        Point3::new(0.1, 0., 0.),
        Point3::new(0.2, 0., 0.),
    ]);
    remove_end_kinks(&mut short, 1., 1.);
    assert_eq!(short.len(), 2);
}

#[test]
fn stroke_is_chopped_to_control_points() {
    let processed = process_stroke(line_x(11, 1.), 1., 1.).unwrap();
    assert_eq!(processed.taper.segments(), 10);
    assert_relative_eq!(processed.length, 10.);
    assert_relative_eq!(processed.points.length(), 9., epsilon = 1e-9);
    assert_relative_eq!(
        *processed.points.first().unwrap(),
        Point3::new(0.5, 0., 0.),
        epsilon = 1e-9
    );
    assert_relative_eq!(processed.start_tangent, Vector3::x(), epsilon = 1e-9);
    assert_relative_eq!(processed.end_tangent, Vector3::x(), epsilon = 1e-9);
}

#[test]
fn short_stroke_is_rejected() {
    let err = process_stroke(line_x(2, 0.5), 1., 1.).unwrap_err();
    assert_eq!(err, BuildError::StrokeTooShort);
    let err = process_stroke(line_x(5, 1.), 0.5, 5.).unwrap_err();
    assert_eq!(err, BuildError::StrokeTooShort);
}

#[test]
fn curve_is_pinned_to_new_points() {
    let mut skeleton = Skeleton::new();
    let processed = process_stroke(line_x(11, 1.), 1., 1.).unwrap();
    let built = build_curve(
        &mut skeleton,
        &processed.points,
        processed.parameters(),
        None,
        None,
        &Vector3::z(),
    )
    .unwrap();
    assert!(built.created_start && built.created_end);
    assert_eq!(skeleton.point_count(), 2);

    let curve = skeleton.curve(built.curve).unwrap();
    assert_eq!(curve.control_points().len(), 10);
    assert_eq!(curve.edge_count(), 9);
    let start = skeleton.point(built.start).unwrap();
    assert_relative_eq!(curve.control_points()[0], *start.position());
    assert_relative_eq!(curve.map(0.), Point3::new(0.5, 0., 0.), epsilon = 1e-9);
    assert_relative_eq!(curve.map(1.), Point3::new(9.5, 0., 0.), epsilon = 1e-9);
    assert_eq!(skeleton.curves_of_point(built.start), vec![built.curve]);
    assert!(!skeleton.is_isolated(built.end));
}

#[test]
fn too_few_samples_leave_no_state() {
    let mut skeleton = Skeleton::<f64>::new();
    let err = build_curve(
        &mut skeleton,
        &line_x(3, 1.),
        vec![0.],
        None,
        None,
        &Vector3::z(),
    )
    .unwrap_err();
    assert_eq!(err, BuildError::TooFewSamples);
    assert_eq!(skeleton.point_count(), 0);
    assert_eq!(skeleton.curve_count(), 0);
}

#[test]
fn moving_a_point_drags_the_curve() {
    let mut skeleton = Skeleton::new();
    let built = build_curve(
        &mut skeleton,
        &line_x(5, 1.),
        uniform_parameters(4),
        None,
        None,
        &Vector3::z(),
    )
    .unwrap();

    let moved = CoordFrame::new(Point3::new(0., 2., 0.), &Vector3::x(), &Vector3::z());
    skeleton.move_point(built.start, moved);

    let curve = skeleton.curve(built.curve).unwrap();
    assert_relative_eq!(curve.control_points()[0], Point3::new(0., 2., 0.), epsilon = 1e-12);
    // halfway along, half the displacement
    assert_relative_eq!(curve.control_points()[2], Point3::new(2., 1., 0.), epsilon = 1e-12);
    assert_relative_eq!(curve.control_points()[4], Point3::new(4., 0., 0.), epsilon = 1e-12);
}

#[test]
fn anchored_point_follows_its_frame() {
    let mut skeleton = Skeleton::new();
    let anchor = CoordFrame::new(Point3::origin(), &Vector3::x(), &Vector3::z());
    let mut frames = crate::frame::FrameSet::new();
    let fid = frames.insert(
        crate::frame::FrameSource::Fixed(anchor.clone()),
        anchor.clone(),
    );
    let p = skeleton.add_anchored_point(
        CoordFrame::new(Point3::new(1., 0., 0.), &Vector3::x(), &Vector3::z()),
        fid,
        &anchor,
    );
    assert_eq!(skeleton.points_anchored_to(fid), vec![p]);

    let rotated = CoordFrame::new(Point3::new(0., 0., 3.), &Vector3::y(), &Vector3::z());
    skeleton.follow_anchor(p, &rotated);
    let point = skeleton.point(p).unwrap();
    assert_relative_eq!(*point.position(), Point3::new(0., 1., 3.), epsilon = 1e-12);
    assert_relative_eq!(*point.frame().tangent(), Vector3::y(), epsilon = 1e-12);

    skeleton.release_anchor(fid);
    assert!(skeleton.points_anchored_to(fid).is_empty());
}

#[test]
fn curve_map_is_piecewise_linear() {
    let mut skeleton = Skeleton::<f64>::new();
    let a = skeleton.add_point(CoordFrame::identity());
    let b = skeleton.add_point(CoordFrame::identity());
    let curve = SkeletonCurve::try_new(
        vec![
            Point3::new(0., 0., 0.),
            Point3::new(1., 0., 0.),
            Point3::new(1., 3., 0.),
        ],
        vec![0., 0.25, 1.],
        a,
        b,
        Vector3::z(),
    )
    .unwrap();
    assert_relative_eq!(curve.map(0.125), Point3::new(0.5, 0., 0.));
    assert_relative_eq!(curve.map(0.5), Point3::new(1., 1., 0.));
    assert_relative_eq!(curve.map(2.), Point3::new(1., 3., 0.));
    assert_relative_eq!(curve.length(), 4.);

    assert!(SkeletonCurve::try_new(
        vec![Point3::origin(), Point3::new(1., 0., 0.)],
        vec![0., 0.5],
        a,
        b,
        Vector3::z(),
    )
    .is_err());
}
