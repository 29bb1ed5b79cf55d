/// Surface size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceExtent {
    pub width: u32,
    pub height: u32,
}

impl SurfaceExtent {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Clamps both dimensions to `[1, max_dimension]`.
    #[inline]
    pub fn clamped(self, max_dimension: u32) -> Self {
        let max = max_dimension.max(1);
        Self {
            width: self.width.clamp(1, max),
            height: self.height.clamp(1, max),
        }
    }

    /// Width over height; 1 for a degenerate height.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceExtent {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

impl From<SurfaceExtent> for winit::dpi::PhysicalSize<u32> {
    fn from(extent: SurfaceExtent) -> Self {
        Self::new(extent.width, extent.height)
    }
}
