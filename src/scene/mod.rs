#[allow(clippy::module_inception)]
pub mod scene;
pub use scene::*;
