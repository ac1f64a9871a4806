pub mod floating_point;
pub mod invertible;
pub mod line;
pub mod orientation;
pub mod plane;
pub mod polyline;
pub mod ray;
pub mod trigonometry;

pub use floating_point::*;
pub use invertible::*;
pub use line::*;
pub use orientation::*;
pub use plane::*;
pub use polyline::*;
pub use ray::*;
pub use trigonometry::*;

#[cfg(test)]
mod tests;
