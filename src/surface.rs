//! Drawing-surface dimensions.

/// Size of a drawing surface in physical pixels plus its device pixel ratio.
///
/// The simulator works in logical pixels (`physical / scale_factor`); canvases
/// rasterise at physical resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f64,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Size at a device pixel ratio of 1.
    pub fn physical(width: u32, height: u32) -> Self {
        Self::new(width, height, 1.0)
    }

    #[inline]
    pub fn logical_width(&self) -> f32 {
        (self.width as f64 / self.scale_factor) as f32
    }

    #[inline]
    pub fn logical_height(&self) -> f32 {
        (self.height as f64 / self.scale_factor) as f32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::physical(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_size() {
        let size = SurfaceSize::new(2560, 1440, 2.0);
        assert_eq!(size.logical_width(), 1280.0);
        assert_eq!(size.logical_height(), 720.0);
    }

    #[test]
    fn test_bad_scale_factor_falls_back() {
        assert_eq!(SurfaceSize::new(10, 10, 0.0).scale_factor, 1.0);
        assert_eq!(SurfaceSize::new(10, 10, f64::NAN).scale_factor, 1.0);
        assert!(SurfaceSize::physical(0, 10).is_empty());
    }
}
