use crate::command::MultiCommand;
use crate::mesh::{FaceId, VertMapper};
use crate::misc::FloatingPoint;
use crate::scene::Scene;

use super::PrimitiveId;

/// Builds the blending surface between a sleeved primitive and the surface it grows from.
///
/// `faces` are the faces the skin wraps: the attachment regions and the caps built over them.
/// `map` takes each end ring vertex of the primitive to the attachment boundary vertex it covers.
/// Reversible edits go through `cmd`. Returning false makes the caller undo the whole build.
pub trait SkinFactory<T: FloatingPoint> {
    fn create_sleeve(
        &mut self,
        scene: &mut Scene<T>,
        primitive: PrimitiveId,
        faces: &[FaceId],
        map: &VertMapper,
        cmd: &mut MultiCommand<T>,
    ) -> bool;
}

/// Leaves sleeves unskinned
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSkin;

impl<T: FloatingPoint> SkinFactory<T> for NoSkin {
    fn create_sleeve(
        &mut self,
        _scene: &mut Scene<T>,
        _primitive: PrimitiveId,
        _faces: &[FaceId],
        _map: &VertMapper,
        _cmd: &mut MultiCommand<T>,
    ) -> bool {
        true
    }
}
