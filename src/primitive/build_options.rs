use crate::misc::FloatingPoint;

/// How a tube meets the region it grows from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttachMode {
    /// The region's boundary vertices become the tube's end ring and the region is hidden
    #[default]
    Shared,
    /// The tube gets its own end rings and caps over the region, joined by a blending skin
    Sleeve,
}

/// Options for primitive construction
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildOptions<T> {
    /// Ring spacing relative to the attachment's average boundary edge length (< 1 packs rings closer)
    pub sampling_factor: T,
    /// Profile vertex spacing of a roof relative to its side's average edge length
    pub roof_sampling_factor: T,
    /// Largest allowed distance from an attachment boundary to its best-fit plane, relative to the boundary length
    pub planarity_tolerance: T,
    /// Largest allowed distance from a wafer outline to its best-fit plane, relative to the outline length
    pub wafer_planarity_tolerance: T,
    /// Largest allowed `|attachment normal · projection normal|`
    pub max_normal_dot: T,
    /// Shortest accepted stroke, relative to the average ring size
    pub min_stroke_factor: T,
    /// Strokes shorter than this factor of the average ring size make a single skeleton point
    pub point_threshold_factor: T,
    /// Ball radius relative to the requested radius
    pub ball_radius_scale: T,
    /// Largest pixel distance between a roof stroke end and the side end it starts or stops at
    pub side_snap_distance: T,
    pub attach_mode: AttachMode,
}

impl<T: FloatingPoint> Default for BuildOptions<T> {
    fn default() -> Self {
        Self {
            sampling_factor: T::from_f64(0.8).unwrap(),
            roof_sampling_factor: T::from_f64(0.5).unwrap(),
            planarity_tolerance: T::from_f64(0.1).unwrap(),
            wafer_planarity_tolerance: T::from_f64(1e-3).unwrap(),
            max_normal_dot: T::from_f64(0.71).unwrap(),
            min_stroke_factor: T::from_f64(0.7).unwrap(),
            point_threshold_factor: T::from_f64(1.4).unwrap(),
            ball_radius_scale: T::from_f64(0.8).unwrap(),
            side_snap_distance: T::from_f64(10.0).unwrap(),
            attach_mode: AttachMode::Shared,
        }
    }
}

impl<T: FloatingPoint> BuildOptions<T> {
    pub fn with_sampling_factor(mut self, factor: T) -> Self {
        self.sampling_factor = factor;
        self
    }

    pub fn with_roof_sampling_factor(mut self, factor: T) -> Self {
        self.roof_sampling_factor = factor;
        self
    }

    pub fn with_planarity_tolerance(mut self, tolerance: T) -> Self {
        self.planarity_tolerance = tolerance;
        self
    }

    pub fn with_wafer_planarity_tolerance(mut self, tolerance: T) -> Self {
        self.wafer_planarity_tolerance = tolerance;
        self
    }

    pub fn with_max_normal_dot(mut self, dot: T) -> Self {
        self.max_normal_dot = dot;
        self
    }

    pub fn with_min_stroke_factor(mut self, factor: T) -> Self {
        self.min_stroke_factor = factor;
        self
    }

    pub fn with_point_threshold_factor(mut self, factor: T) -> Self {
        self.point_threshold_factor = factor;
        self
    }

    pub fn with_ball_radius_scale(mut self, scale: T) -> Self {
        self.ball_radius_scale = scale;
        self
    }

    pub fn with_side_snap_distance(mut self, pixels: T) -> Self {
        self.side_snap_distance = pixels;
        self
    }

    pub fn with_attach_mode(mut self, mode: AttachMode) -> Self {
        self.attach_mode = mode;
        self
    }
}
