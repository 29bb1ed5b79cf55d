use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::config::SceneConfig;
use crate::device::{DeviceState, Gpu, GpuInit};
use crate::render::{Presenter, RenderContext};
use crate::viewport::{ResizeMailbox, SurfaceExtent, ViewportReactor};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "scatter".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, bootstraps the GPU and scene, and serves resize events until
    /// the window closes.
    ///
    /// Setup failures and fatal surface errors end the loop and are returned once.
    pub fn run(initial: RuntimeConfig, gpu_init: GpuInit, scene: SceneConfig) -> Result<()> {
        scene.validate().context("invalid scene configuration")?;

        let event_loop = EventLoop::<DeviceLost>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;
        let proxy = event_loop.create_proxy();
        let mut state = AppState::new(initial, gpu_init, scene, proxy);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Sent from the device-lost callback to wake an idle event loop.
#[derive(Debug, Copy, Clone)]
struct DeviceLost;

#[self_referencing]
struct WindowEntry {
    mailbox: ResizeMailbox,
    reactor: ViewportReactor,
    scene: Option<RenderContext>,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    /// Bootstraps GPU + scene on `window` and queues the first frame.
    fn bootstrap(
        window: Window,
        gpu_init: GpuInit,
        scene: &SceneConfig,
        proxy: EventLoopProxy<DeviceLost>,
    ) -> Result<Self> {
        let mut entry = WindowEntryTryBuilder {
            mailbox: ResizeMailbox::new(),
            reactor: ViewportReactor::new(),
            scene: None,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()?;

        entry.with_mut(|fields| -> Result<()> {
            fields.gpu.on_device_lost(move || {
                // Fails only once the loop has exited, when there is nothing left to wake.
                let _ = proxy.send_event(DeviceLost);
            });
            *fields.scene = Some(RenderContext::new(fields.gpu, scene)?);
            // The first observation of the surface renders the first frame.
            fields.mailbox.post(fields.window.inner_size().into());
            Ok(())
        })?;

        Ok(entry)
    }

    fn device_state(&self) -> DeviceState {
        self.borrow_gpu().device_state()
    }

    fn post_resize(&mut self, extent: SurfaceExtent) {
        self.with_mailbox_mut(|m| m.post(extent));
    }

    /// Runs the reactor on the pending size, if any.
    fn pump(&mut self) -> Result<()> {
        self.with_mut(|fields| {
            let Some(scene) = fields.scene.as_mut() else {
                return Ok(());
            };
            let mut presenter = Presenter {
                gpu: fields.gpu,
                scene,
                window: fields.window,
            };
            if let Some(status) = fields.reactor.drain(fields.mailbox, &mut presenter)? {
                log::trace!("frame {}: {status:?}", fields.reactor.frames());
            }
            Ok(())
        })
    }
}

struct AppState {
    initial: RuntimeConfig,
    gpu_init: GpuInit,
    scene: SceneConfig,
    proxy: EventLoopProxy<DeviceLost>,

    window: Option<(WindowId, WindowEntry)>,
    fatal: Option<anyhow::Error>,
}

impl AppState {
    fn new(
        initial: RuntimeConfig,
        gpu_init: GpuInit,
        scene: SceneConfig,
        proxy: EventLoopProxy<DeviceLost>,
    ) -> Self {
        Self {
            initial,
            gpu_init,
            scene,
            proxy,
            window: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.window = None;
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.initial.title.clone())
            .with_inner_size(self.initial.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let entry = WindowEntry::bootstrap(
            window,
            self.gpu_init.clone(),
            &self.scene,
            self.proxy.clone(),
        )?;
        self.window = Some((id, entry));
        Ok(())
    }

    /// Reacts to device loss: rebuild everything after an unexpected loss, stop after
    /// an intentional one.
    fn check_device(&mut self, event_loop: &ActiveEventLoop) {
        let Some((id, entry)) = self.window.take() else { return };

        match entry.device_state() {
            DeviceState::Active => self.window = Some((id, entry)),
            DeviceState::LostIntentional { .. } => event_loop.exit(),
            DeviceState::LostUnintentional { .. } => {
                log::warn!("re-initializing GPU after device loss");
                let window = entry.into_heads().window;
                let gpu_init = self.gpu_init.clone();
                match WindowEntry::bootstrap(window, gpu_init, &self.scene, self.proxy.clone()) {
                    Ok(fresh) => self.window = Some((id, fresh)),
                    Err(err) => self.fail(event_loop, err.context("GPU re-initialization failed")),
                }
            }
        }
    }
}

impl ApplicationHandler<DeviceLost> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err.context("failed to start"));
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, _: DeviceLost) {
        // The re-bootstrap queues a frame; `about_to_wait` presents it.
        self.check_device(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.check_device(event_loop);

        // Frames are produced only in response to size changes.
        event_loop.set_control_flow(ControlFlow::Wait);

        let result = match self.window.as_mut() {
            Some((_, entry)) => entry.pump(),
            None => return,
        };
        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some((id, entry)) = self.window.as_mut() else {
            return;
        };
        if *id != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => entry.post_resize(new_size.into()),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.post_resize(new_size.into());
            }

            _ => {}
        }
    }
}
