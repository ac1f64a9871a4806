pub mod face_set;
#[allow(clippy::module_inception)]
pub mod mesh;
pub mod vert_mapper;
pub use face_set::*;
pub use mesh::*;
pub use vert_mapper::*;

#[cfg(test)]
mod tests;
