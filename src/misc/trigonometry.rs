use nalgebra::{allocator::Allocator, DefaultAllocator, DimName, OPoint, RealField};

/// Find the closest point on a segment
/// * `pt` - point to project
/// * `start` - start point of segment
/// * `end` - end point of segment
/// * `u0` - first param of segment
/// * `u1` - second param of segment
pub fn segment_closest_point<T: RealField + Copy, D: DimName>(
    pt: &OPoint<T, D>,
    start: &OPoint<T, D>,
    end: &OPoint<T, D>,
    u0: T,
    u1: T,
) -> (T, OPoint<T, D>)
where
    DefaultAllocator: Allocator<D>,
{
    let dif = end - start;
    let l = dif.norm();

    if l < T::default_epsilon() {
        return (u0, start.clone());
    }

    let o = start.clone();
    let r = dif / l;
    let o2pt = pt - &o;
    let do2ptr = o2pt.dot(&r);

    if do2ptr < T::zero() {
        (u0, start.clone())
    } else if do2ptr > l {
        (u1, end.clone())
    } else {
        (u0 + (u1 - u0) * do2ptr / l, (r * do2ptr + o.coords).into())
    }
}

/// Find the closest point on a polyline, parameterized by arc length in `[0, 1]`.
/// Returns `None` for an empty polyline.
pub fn polyline_closest_point<T: RealField + Copy, D: DimName>(
    pt: &OPoint<T, D>,
    polyline: &[OPoint<T, D>],
) -> Option<(T, OPoint<T, D>)>
where
    DefaultAllocator: Allocator<D>,
{
    match polyline.len() {
        0 => None,
        1 => Some((T::zero(), polyline[0].clone())),
        _ => {
            let mut partial = vec![T::zero()];
            let mut total = T::zero();
            for w in polyline.windows(2) {
                total += (&w[1] - &w[0]).norm();
                partial.push(total);
            }
            let total = if total > T::zero() { total } else { T::one() };

            polyline
                .windows(2)
                .enumerate()
                .map(|(i, w)| {
                    segment_closest_point(
                        pt,
                        &w[0],
                        &w[1],
                        partial[i] / total,
                        partial[i + 1] / total,
                    )
                })
                .min_by(|a, b| {
                    let da = (&a.1 - pt).norm();
                    let db = (&b.1 - pt).norm();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                })
        }
    }
}
