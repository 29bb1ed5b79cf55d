use anyhow::{Context, Result};
use rand::Rng;

use crate::config::SceneConfig;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::viewport::{FrameStatus, ResizeTarget, SurfaceExtent};

use super::pipeline::PipelineConfig;
use super::{FrameRenderer, InstanceStore, RenderCtx, RenderTarget};

/// Everything the scene needs between frames.
///
/// Built once per device. Owned by the runtime and handed by `&mut` to each render.
pub struct RenderContext {
    store: InstanceStore,
    renderer: FrameRenderer,
}

impl RenderContext {
    /// One-time setup: validates the scene, generates the mesh and instances, creates
    /// GPU objects and uploads the static data.
    pub fn new(gpu: &Gpu<'_>, scene: &SceneConfig) -> Result<Self> {
        Self::with_rng(gpu, scene, &mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        gpu: &Gpu<'_>,
        scene: &SceneConfig,
        rng: &mut R,
    ) -> Result<Self> {
        scene.validate().context("invalid scene configuration")?;

        let mesh = scene.shape.mesh();
        let store = InstanceStore::new(scene.instance_count, &scene.ranges, rng);

        let ctx = RenderCtx::new(gpu.device(), gpu.queue());
        let pipeline = PipelineConfig::new(gpu.surface_format(), scene.shape);
        let renderer = FrameRenderer::new(
            &ctx,
            &pipeline,
            store.layout(),
            store.static_bytes(),
            &mesh,
            scene.clear_color,
        );

        log::info!(
            "scene ready: {} instances, {} vertices each",
            renderer.instance_count(),
            renderer.vertex_count(),
        );

        Ok(Self { store, renderer })
    }

    pub fn store(&self) -> &InstanceStore {
        &self.store
    }

    /// Recomputes scales for the surface's aspect ratio and draws one frame.
    pub fn render_frame(&mut self, gpu: &mut Gpu<'_>) -> Result<FrameStatus> {
        let mut frame = match gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::warn!("surface unavailable: {err}");
                return match gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        Err(anyhow::anyhow!("surface reported a fatal error"))
                    }
                    SurfaceErrorAction::Reconfigure | SurfaceErrorAction::SkipFrame => {
                        Ok(FrameStatus::Skipped)
                    }
                };
            }
        };

        let aspect = SurfaceExtent::from(gpu.size()).aspect();
        let dynamic_bytes = self.store.update_scales(aspect);

        {
            let ctx = RenderCtx::new(gpu.device(), gpu.queue());
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.renderer.render_frame(&ctx, &mut target, dynamic_bytes);
        }

        gpu.submit(frame);
        Ok(FrameStatus::Presented)
    }
}

/// Binds a window's `Gpu` and its `RenderContext` for the viewport reactor.
pub struct Presenter<'a, 'w> {
    pub gpu: &'a mut Gpu<'w>,
    pub scene: &'a mut RenderContext,
    pub window: &'a winit::window::Window,
}

impl ResizeTarget for Presenter<'_, '_> {
    fn max_dimension(&self) -> u32 {
        self.gpu.max_texture_dimension_2d()
    }

    fn apply_size(&mut self, extent: SurfaceExtent) {
        self.gpu.resize(extent.into());
    }

    fn render_frame(&mut self) -> Result<FrameStatus> {
        self.window.pre_present_notify();
        self.scene.render_frame(self.gpu)
    }
}
