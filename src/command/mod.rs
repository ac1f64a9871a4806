#[allow(clippy::module_inception)]
pub mod command;
pub mod scene_commands;
pub use command::*;
pub use scene_commands::*;
