pub mod curve_builder;
#[allow(clippy::module_inception)]
pub mod skeleton;
pub mod skeleton_curve;
pub mod skeleton_point;
pub use curve_builder::*;
pub use skeleton::*;
pub use skeleton_curve::*;
pub use skeleton_point::*;

#[cfg(test)]
mod tests;
