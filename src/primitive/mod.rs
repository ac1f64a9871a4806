pub mod ball;
pub mod build_error;
pub mod build_options;
pub mod matching;
pub mod picking;
#[allow(clippy::module_inception)]
pub mod primitive;
pub mod ring_builder;
pub mod roof;
pub mod simple_tube;
pub mod skin;
pub mod tube;
pub mod wafer;

pub use build_error::*;
pub use build_options::*;
pub use matching::*;
pub use picking::*;
pub use primitive::*;
pub use ring_builder::*;
pub use roof::*;
pub use skin::*;
