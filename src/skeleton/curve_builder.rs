use log::debug;
use nalgebra::Vector3;

use crate::frame::CoordFrame;
use crate::misc::{FloatingPoint, Polyline};
use crate::primitive::BuildError;
use crate::taper::TaperResampler;

use super::{CurveId, PointId, Skeleton, SkeletonCurve};

/// Drop samples next to either end that lie closer to the end than the ring size there.
/// The end samples themselves are kept.
pub fn remove_end_kinks<T: FloatingPoint>(pts: &mut Polyline<T>, w1: T, w2: T) {
    while pts.len() > 2 && (pts.points()[1] - pts.points()[0]).norm() < w1 {
        pts.remove(1);
    }
    while pts.len() > 2 {
        let n = pts.len();
        if (pts.points()[n - 1] - pts.points()[n - 2]).norm() < w2 {
            pts.remove(n - 2);
        } else {
            break;
        }
    }
}

/// A world-space stroke ready to carry a skeleton curve
#[derive(Debug, Clone)]
pub struct ProcessedStroke<T: FloatingPoint> {
    /// stroke with its ends chopped to the first and last control points
    pub points: Polyline<T>,
    /// length before chopping
    pub length: T,
    pub taper: TaperResampler<T>,
    pub start_tangent: Vector3<T>,
    pub end_tangent: Vector3<T>,
}

impl<T: FloatingPoint> ProcessedStroke<T> {
    /// Control point parameters along the chopped stroke
    pub fn parameters(&self) -> Vec<T> {
        self.taper.control_parameters()
    }
}

/// Clean up the ends of a stroke, solve its taper for ring sizes `w1` and `w2`,
/// and chop it to run from the first to the last control point.
pub fn process_stroke<T: FloatingPoint>(
    mut pts: Polyline<T>,
    w1: T,
    w2: T,
) -> Result<ProcessedStroke<T>, BuildError> {
    remove_end_kinks(&mut pts, w1, w2);

    let length = pts.length();
    if pts.len() < 2 || length < w1 || length < w2 {
        debug!("process_stroke: stroke too short for its ring sizes");
        return Err(BuildError::StrokeTooShort);
    }

    let taper = TaperResampler::try_from_sizes(w1, w2, length).map_err(|e| {
        debug!("process_stroke: {}", e);
        BuildError::DegenerateTaper
    })?;

    let n = taper.segments();
    let front = length * taper.c(0);
    let back = length * (T::one() - taper.c(n - 1));
    pts.chop(front);
    pts.trim(back);

    let start_tangent = pts.tangent(0);
    let end_tangent = pts.tangent(pts.len() - 1);

    Ok(ProcessedStroke {
        points: pts,
        length,
        taper,
        start_tangent,
        end_tangent,
    })
}

/// Uniform parameters `0, 1/n, ..., 1`
pub fn uniform_parameters<T: FloatingPoint>(segments: usize) -> Vec<T> {
    let n = T::from_usize(segments.max(1)).unwrap();
    (0..=segments.max(1))
        .map(|i| T::from_usize(i).unwrap() / n)
        .collect()
}

/// A skeleton curve just added to the skeleton, with the points it is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltCurve {
    pub curve: CurveId,
    pub start: PointId,
    pub end: PointId,
    pub created_start: bool,
    pub created_end: bool,
}

/// Sample the polyline at the parameters and add a skeleton curve through the samples,
/// pinned to the given end points or to new points created at its ends.
/// Nothing is added to the skeleton if the curve would have fewer than 2 samples.
pub fn build_curve<T: FloatingPoint>(
    skeleton: &mut Skeleton<T>,
    points: &Polyline<T>,
    parameters: Vec<T>,
    start: Option<PointId>,
    end: Option<PointId>,
    normal: &Vector3<T>,
) -> Result<BuiltCurve, BuildError> {
    if parameters.len() < 2 || points.len() < 2 {
        debug!("build_curve: too few samples");
        return Err(BuildError::TooFewSamples);
    }
    if start.is_some_and(|p| skeleton.point(p).is_none())
        || end.is_some_and(|p| skeleton.point(p).is_none())
    {
        return Err(BuildError::MissingSkeleton);
    }

    let control_points = points.resample(&parameters);
    let last = control_points.len() - 1;
    let start_frame = CoordFrame::new(
        control_points[0],
        &(control_points[1] - control_points[0]),
        normal,
    );
    let end_frame = CoordFrame::new(
        control_points[last],
        &(control_points[last] - control_points[last - 1]),
        normal,
    );

    SkeletonCurve::check(&control_points, &parameters).map_err(|e| {
        debug!("build_curve: {}", e);
        BuildError::TooFewSamples
    })?;

    let (start, created_start) = match start {
        Some(p) => (p, false),
        None => (skeleton.add_point(start_frame), true),
    };
    let (end, created_end) = match end {
        Some(p) => (p, false),
        None => (skeleton.add_point(end_frame), true),
    };

    let curve = SkeletonCurve::try_new(control_points, parameters, start, end, *normal)
        .map_err(|_| BuildError::TooFewSamples)?;
    let curve = skeleton.add_curve(curve);
    skeleton.pin_curve(curve);

    Ok(BuiltCurve {
        curve,
        start,
        end,
        created_start,
        created_end,
    })
}
