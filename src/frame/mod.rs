pub mod coord_frame;
pub mod frame_bound_vertex;
pub mod frame_set;
pub mod frame_source;
pub use coord_frame::*;
pub use frame_bound_vertex::*;
pub use frame_set::*;
pub use frame_source::*;
