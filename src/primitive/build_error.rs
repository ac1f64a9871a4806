use thiserror::Error;

/// Result type for primitive construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Reasons a primitive could not be built.
/// Every rejection leaves the scene as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The stroke has fewer than two samples.
    #[error("too few pixels in the stroke")]
    TooFewPixels,

    /// No attachment region was given.
    #[error("no base to attach to")]
    EmptyBase,

    /// The second attachment region overlaps the first or has a different boundary size.
    #[error("bad second base")]
    BadSecondBase,

    /// The attachment region has no single boundary loop.
    #[error("base boundary is not a simple loop")]
    BadBase,

    /// The stroke does not start (or end) near its attachment.
    #[error("stroke too far from the base")]
    StrokeTooFar,

    /// An attachment boundary is not planar enough.
    #[error("base is not planar enough")]
    NotPlanar,

    /// An attachment normal is too close to the projection plane normal.
    #[error("surface normals too incompatible")]
    IncompatibleNormals,

    /// The projected stroke is too short for the ring sizes.
    #[error("stroke too short")]
    StrokeTooShort,

    /// The taper sequence cannot grow toward the stroke length.
    #[error("degenerate taper")]
    DegenerateTaper,

    /// The skeleton curve would have fewer than 2 samples.
    #[error("too few samples for a skeleton curve")]
    TooFewSamples,

    /// A skeleton entity the build refers to does not exist.
    #[error("missing skeleton entity")]
    MissingSkeleton,

    /// The skeleton point is attached to a curve.
    #[error("non-isolated skeleton point")]
    NonIsolatedSkeleton,

    /// The skeleton point is outside the view volume.
    #[error("skeleton outside the view frustum")]
    OutsideFrustum,

    /// A size, radius or direction is not usable.
    #[error("bad input: {0}")]
    BadInput(&'static str),

    /// The polygon is not a planar triangle or quad.
    #[error("bad polygon")]
    BadPolygon,

    /// Roof corners do not run from the first to the last sample.
    #[error("bad corner indices")]
    BadCorners,

    /// A frame could not be evaluated from the current scene.
    #[error("undefined frame")]
    UndefinedFrame,

    /// The mesh refused an edit.
    #[error("mesh edit failed: {0}")]
    Mesh(String),

    /// The blending skin could not be created; the build was undone.
    #[error("skin creation failed")]
    SkinFailed,
}

impl From<anyhow::Error> for BuildError {
    fn from(e: anyhow::Error) -> Self {
        BuildError::Mesh(e.to_string())
    }
}
