use nalgebra::{Isometry3, Point2, Point3, Vector3};

use crate::misc::{FloatingPoint, Ray};

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Projection<T> {
    /// Orthographic projection showing `height` world units vertically
    Orthographic { height: T },
    /// Perspective projection with vertical field of view `fovy` in radians
    Perspective { fovy: T },
}

/// Maps pixels to world rays and world points to pixels.
/// Pixel coordinates start at the top left corner of the viewport, with y pointing down.
#[derive(Debug, Clone)]
pub struct Camera<T: FloatingPoint> {
    view: Isometry3<T>,
    projection: Projection<T>,
    width: T,
    height: T,
    near: T,
    far: T,
}

impl<T: FloatingPoint> Camera<T> {
    /// Camera at `eye` looking at `target`, with a viewport of `width` x `height` pixels
    pub fn look_at(
        eye: &Point3<T>,
        target: &Point3<T>,
        up: &Vector3<T>,
        projection: Projection<T>,
        width: T,
        height: T,
    ) -> Self {
        Self {
            view: Isometry3::look_at_rh(eye, target, up),
            projection,
            width,
            height,
            near: T::from_f64(1e-2).unwrap(),
            far: T::from_f64(1e4).unwrap(),
        }
    }

    pub fn with_clip_planes(mut self, near: T, far: T) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn eye(&self) -> Point3<T> {
        self.view.inverse_transform_point(&Point3::origin())
    }

    /// Unit viewing direction
    pub fn forward(&self) -> Vector3<T> {
        self.view.inverse_transform_vector(&-Vector3::z())
    }

    pub fn viewport(&self) -> (T, T) {
        (self.width, self.height)
    }

    fn aspect(&self) -> T {
        self.width / self.height
    }

    fn half_extent(&self) -> T {
        match self.projection {
            Projection::Orthographic { height } => height / T::from_f64(2.0).unwrap(),
            Projection::Perspective { fovy } => (fovy / T::from_f64(2.0).unwrap()).tan(),
        }
    }

    fn pixel_to_ndc(&self, pixel: &Point2<T>) -> Point2<T> {
        let two = T::from_f64(2.0).unwrap();
        Point2::new(
            two * pixel.x / self.width - T::one(),
            T::one() - two * pixel.y / self.height,
        )
    }

    fn ndc_to_pixel(&self, ndc: &Point2<T>) -> Point2<T> {
        let half = T::from_f64(0.5).unwrap();
        Point2::new(
            (ndc.x + T::one()) * half * self.width,
            (T::one() - ndc.y) * half * self.height,
        )
    }

    /// Normalized device coordinates and depth of a world point
    fn world_to_ndc(&self, p: &Point3<T>) -> (Point2<T>, T) {
        let v = self.view * p;
        let depth = -v.z;
        let scale = match self.projection {
            Projection::Orthographic { .. } => self.half_extent(),
            Projection::Perspective { .. } => self.half_extent() * depth,
        };
        (
            Point2::new(v.x / (scale * self.aspect()), v.y / scale),
            depth,
        )
    }

    pub fn world_to_pixel(&self, p: &Point3<T>) -> Point2<T> {
        self.ndc_to_pixel(&self.world_to_ndc(p).0)
    }

    /// Whether the point lies inside the view volume
    pub fn in_frustum(&self, p: &Point3<T>) -> bool {
        let (ndc, depth) = self.world_to_ndc(p);
        depth >= self.near
            && depth <= self.far
            && ndc.x.abs() <= T::one()
            && ndc.y.abs() <= T::one()
    }

    /// World-space ray through a pixel
    pub fn pixel_ray(&self, pixel: &Point2<T>) -> Ray<T> {
        let ndc = self.pixel_to_ndc(pixel);
        let e = self.half_extent();
        let (origin, direction) = match self.projection {
            Projection::Orthographic { .. } => (
                Point3::new(ndc.x * e * self.aspect(), ndc.y * e, T::zero()),
                -Vector3::z(),
            ),
            Projection::Perspective { .. } => (
                Point3::origin(),
                Vector3::new(ndc.x * e * self.aspect(), ndc.y * e, -T::one()).normalize(),
            ),
        };
        Ray::new(
            self.view.inverse_transform_point(&origin),
            self.view.inverse_transform_vector(&direction),
        )
    }

    /// World length, at the depth of `p` and parallel to the film plane,
    /// of a segment spanning `pixels` pixels on screen
    pub fn world_length(&self, p: &Point3<T>, pixels: T) -> T {
        let two = T::from_f64(2.0).unwrap();
        let span = match self.projection {
            Projection::Orthographic { .. } => two * self.half_extent(),
            Projection::Perspective { .. } => {
                let depth = -(self.view * p).z;
                two * self.half_extent() * depth
            }
        };
        pixels * span / self.height
    }

    /// Screen length in pixels of a world segment of length `len` at the depth of `p`
    pub fn pixel_length(&self, p: &Point3<T>, len: T) -> T {
        let unit = self.world_length(p, T::one());
        if unit <= T::zero() {
            return T::zero();
        }
        len / unit
    }
}
