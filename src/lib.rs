#![allow(clippy::needless_range_loop)]
//! Skeleton-driven primitive construction for sketch-based modeling.
//!
//! Strokes drawn over a camera view become skeleton curves and points, and
//! quad meshes (tubes, caps, roofs, balls and wafers) are built around them.
//! Generated vertices are bound to live coordinate frames so that editing the
//! skeleton moves the surface without rebuilding it.
//!
//! ```
//! use nalgebra::{Point2, Point3, Vector3};
//! use skelform::prelude::*;
//!
//! let mut scene = Scene::<f64>::new();
//! let camera = Camera::look_at(
//!     &Point3::new(0., -10., 0.),
//!     &Point3::origin(),
//!     &Vector3::z(),
//!     Projection::Orthographic { height: 30. },
//!     600.,
//!     600.,
//! );
//! let point = scene.skeleton_mut().add_point(CoordFrame::new(
//!     Point3::origin(),
//!     &Vector3::x(),
//!     &Vector3::y(),
//! ));
//!
//! // a square tube drawn upward from the point
//! let stroke = Stroke::new(vec![Point2::new(300., 300.), Point2::new(300., 200.)]);
//! let mut cmd = MultiCommand::new();
//! let tube = Primitive::build_simple_tube(
//!     &mut scene,
//!     &camera,
//!     point,
//!     0.5,
//!     &Vector3::y(),
//!     &stroke,
//!     &mut cmd,
//! )
//! .unwrap();
//! assert!(scene.primitive(tube).unwrap().is_tube());
//! ```

mod command;
mod frame;
mod mesh;
mod misc;
mod primitive;
mod scene;
mod skeleton;
mod stroke;
mod taper;

pub mod prelude {
    pub use crate::command::*;
    pub use crate::frame::*;
    pub use crate::mesh::*;
    pub use crate::misc::*;
    pub use crate::primitive::*;
    pub use crate::scene::*;
    pub use crate::skeleton::*;
    pub use crate::stroke::*;
    pub use crate::taper::*;
}
