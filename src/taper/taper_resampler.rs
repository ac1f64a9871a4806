use anyhow::ensure;

use crate::misc::{math_epsilon, snap, FloatingPoint};

/// Solves the affine sequence `t(i+1) = a * t(i) + b` for the number of
/// rings that fit along a curve whose ring size varies linearly from one
/// end to the other.
///
/// With `c = b / (a - 1)` the closed form is `t(i) = a^i * (t0 + c) - c`,
/// or `t(i) = t0 + i * b` when `a == 1`.
/// The segment count `N` is the nearest integer (at least 1) solving `t(N) == L`.
///
/// # Example
/// ```
/// use skelform::prelude::*;
///
/// // constant ring size of 1 along a curve of length 10
/// let taper = TaperResampler::try_from_sizes(1., 1., 10.).unwrap();
/// assert_eq!(taper.segments(), 10);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TaperResampler<T: FloatingPoint> {
    t0: T,
    a: T,
    b: T,
    c: T,
    /// number of segments
    n: usize,
    /// sequence value at `n`
    tn: T,
}

impl<T: FloatingPoint> TaperResampler<T> {
    /// Solve the sequence with ratio `a`, addend `b` and start value `t0` for the target `length`.
    /// Values within `math_epsilon()` of 1 (ratio) or 0 (addend, start) are snapped onto them.
    pub fn new(a: T, b: T, t0: T, length: T) -> Self {
        let a = snap(a.max(T::zero()), T::one());
        let b = snap(b, T::zero());
        let t0 = snap(t0, T::zero());
        let c = if a != T::one() {
            b / (a - T::one())
        } else {
            T::zero()
        };

        let mut resampler = Self {
            t0,
            a,
            b,
            c,
            n: 1,
            tn: t0,
        };

        let i = resampler.solve(length);
        resampler.n = i
            .round()
            .to_usize()
            .filter(|_| i.is_finite())
            .unwrap_or(1)
            .max(1);
        resampler.tn = resampler.t(resampler.n);
        resampler
    }

    /// Set up the sequence for ring sizes `w1` at the start and `w2` at the end of a curve of the given `length`.
    /// Edge length is taken to vary linearly with position along the curve.
    pub fn from_sizes(w1: T, w2: T, length: T) -> Self {
        let two = T::from_f64(2.0).unwrap();
        let r = (w2 - w1) / length;
        let denom = T::one() - r / two;
        Self::new(T::one() + r / denom, w1 / denom, T::zero(), length)
    }

    /// Same as `from_sizes`, failing when the sequence cannot grow
    pub fn try_from_sizes(w1: T, w2: T, length: T) -> anyhow::Result<Self> {
        ensure!(
            length > T::zero(),
            "length must be positive to resample a taper"
        );
        let resampler = Self::from_sizes(w1, w2, length);
        ensure!(!resampler.is_bad(), "degenerate taper: {:?}", resampler);
        Ok(resampler)
    }

    fn solve(&self, length: T) -> T {
        if self.b == T::zero() {
            (length / self.t0).ln() / self.a.ln()
        } else if self.a == T::zero() {
            length / self.b
        } else if self.a == T::one() {
            (length - self.t0) / self.b
        } else {
            ((length + self.c) / (self.t0 + self.c)).ln() / self.a.ln()
        }
    }

    /// Whether the sequence cannot grow toward its target
    pub fn is_bad(&self) -> bool {
        self.a < math_epsilon()
            || (self.b == T::zero() && (self.a == T::one() || self.t0 == T::zero()))
    }

    pub fn ratio(&self) -> T {
        self.a
    }

    pub fn addend(&self) -> T {
        self.b
    }

    pub fn start(&self) -> T {
        self.t0
    }

    /// Number of segments `N` (always at least 1)
    pub fn segments(&self) -> usize {
        self.n
    }

    /// Sequence value at `N`, generally not exactly the target length
    pub fn end(&self) -> T {
        self.tn
    }

    /// Sequence value at `i`
    pub fn t(&self, i: usize) -> T {
        let fi = T::from_usize(i).unwrap();
        if self.a == T::one() {
            self.t0 + fi * self.b
        } else {
            self.a.powi(i as i32) * (self.t0 + self.c) - self.c
        }
    }

    /// Normalized sequence value at `i` (0 at the start, 1 at `N`)
    pub fn u(&self, i: usize) -> T {
        let span = self.tn - self.t0;
        if span == T::zero() {
            return T::zero();
        }
        (self.t(i) - self.t0) / span
    }

    /// Midpoint parameter of the `i`-th segment
    pub fn c(&self, i: usize) -> T {
        (self.u(i) + self.u(i + 1)) / T::from_f64(2.0).unwrap()
    }

    /// `c(i)` renormalized onto `[0, 1]` between the first and last segment midpoints
    pub fn d(&self, i: usize) -> T {
        let c0 = self.c(0);
        let span = self.c(self.n - 1) - c0;
        if span == T::zero() {
            return T::zero();
        }
        (self.c(i) - c0) / span
    }

    /// Control point parameters `d(0..N)`, starting exactly at 0 and ending exactly at 1
    pub fn control_parameters(&self) -> Vec<T> {
        let mut params: Vec<T> = (0..self.n).map(|i| self.d(i)).collect();
        if let Some(first) = params.first_mut() {
            *first = T::zero();
        }
        if params.len() > 1 {
            if let Some(last) = params.last_mut() {
                *last = T::one();
            }
        }
        params
    }
}
