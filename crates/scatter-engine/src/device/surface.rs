//! Swapchain policy: format and alpha choice, resize, and error recovery.

use winit::dpi::PhysicalSize;

/// What the frame loop does after `get_current_texture` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface must be configured again before the next acquire.
    Reconfigure,
    /// Transient; drop this frame and wait for the next resize.
    SkipFrame,
    /// Out of memory. The runtime stops.
    Fatal,
}

impl SurfaceErrorAction {
    pub fn classify(err: &wgpu::SurfaceError) -> Self {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Self::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => Self::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => Self::SkipFrame,
        }
    }
}

/// First sRGB format the surface offers when `prefer_srgb`, else its first format.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let srgb = caps.formats.iter().copied().find(|f| f.is_srgb());
    match srgb {
        Some(f) if prefer_srgb => Some(f),
        _ => caps.formats.first().copied(),
    }
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Copies `new_size` into `config` if it is drawable and differs from the current one.
///
/// Returns whether the surface needs `configure`. Sizes reaching here are already
/// clamped by the viewport reactor; zero extents are still refused since wgpu rejects
/// them.
pub(crate) fn resize_config(
    config: &mut wgpu::SurfaceConfiguration,
    new_size: PhysicalSize<u32>,
) -> bool {
    let drawable = new_size.width > 0 && new_size.height > 0;
    let changed = config.width != new_size.width || config.height != new_size.height;
    if !(drawable && changed) {
        return false;
    }
    config.width = new_size.width;
    config.height = new_size.height;
    true
}
