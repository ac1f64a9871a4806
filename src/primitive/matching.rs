use nalgebra::Point3;

use crate::misc::FloatingPoint;

/// Summed distance between `pts1[i]` and `pts2` cycled right by `p`
pub fn sum_dist<T: FloatingPoint>(pts1: &[Point3<T>], pts2: &[Point3<T>], p: usize) -> T {
    assert_eq!(pts1.len(), pts2.len(), "point lists must match");
    let n = pts1.len();
    assert!(p < n.max(1));
    (0..n).fold(T::zero(), |acc, i| {
        acc + (pts2[(i + n - p) % n] - pts1[i]).norm()
    })
}

/// Number of slots to cycle `pts2` right so it lies closest to `pts1`.
/// Ties keep the smallest shift.
pub fn min_dist_permutation<T: FloatingPoint>(pts1: &[Point3<T>], pts2: &[Point3<T>]) -> usize {
    assert_eq!(pts1.len(), pts2.len(), "point lists must match");
    let n = pts1.len();
    if n == 0 {
        return 0;
    }
    let mut best = 0;
    let mut min_dist = sum_dist(pts1, pts2, 0);
    for p in 1..n {
        let d = sum_dist(pts1, pts2, p);
        if d < min_dist {
            min_dist = d;
            best = p;
        }
    }
    best
}
