use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
pub trait FloatingPoint: RealField + ToPrimitive + Copy {}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}

/// Absolute tolerance used to snap nearly-special values (0, 1) onto them.
pub fn math_epsilon<T: FloatingPoint>() -> T {
    T::from_f64(1e-8).unwrap()
}

/// Return `x`, unless it lies within `math_epsilon()` of `target`, then return `target`.
pub fn snap<T: FloatingPoint>(x: T, target: T) -> T {
    if (x - target).abs() < math_epsilon() {
        target
    } else {
        x
    }
}
