/// Knobs for `Gpu::new`.
///
/// The defaults ask for nothing beyond baseline wgpu: storage buffers read from the
/// vertex stage need no extra feature, and FIFO presentation exists on every backend.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub prefer_srgb: bool,
    pub present_mode: wgpu::PresentMode,
    /// Used only if the surface supports it.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub required_features: wgpu::Features,
    /// The device's `max_texture_dimension_2d` caps every surface resize.
    pub required_limits: wgpu::Limits,
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
