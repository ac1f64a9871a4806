pub mod camera;
#[allow(clippy::module_inception)]
pub mod stroke;
pub use camera::*;
pub use stroke::*;

#[cfg(test)]
mod tests;
