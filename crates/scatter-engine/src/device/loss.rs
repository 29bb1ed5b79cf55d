use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Lifecycle of a logical device as seen by the runtime.
///
/// `Active` moves to one of the lost states on the first loss notification and never
/// leaves it. `LostUnintentional` asks the runtime for a full re-bootstrap on a fresh
/// device; `LostIntentional` (our own teardown) is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceState {
    Active,
    LostIntentional { message: String },
    LostUnintentional { message: String },
}

impl DeviceState {
    /// Applies a loss notification.
    pub fn on_lost(&self, reason: wgpu::DeviceLostReason, message: String) -> Self {
        match self {
            DeviceState::Active => match reason {
                wgpu::DeviceLostReason::Destroyed => DeviceState::LostIntentional { message },
                _ => DeviceState::LostUnintentional { message },
            },
            lost => lost.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DeviceState::Active)
    }

    /// True when the whole GPU stack must be rebuilt from scratch.
    pub fn needs_rebootstrap(&self) -> bool {
        matches!(self, DeviceState::LostUnintentional { .. })
    }
}

type Waker = Box<dyn Fn() + Send>;

/// Shared slot written by wgpu's device-lost callback and polled by the runtime.
///
/// The callback must be `Send + 'static`, hence the `Arc<Mutex<_>>`. An optional waker
/// runs after every transition so an idle event loop notices the loss immediately.
#[derive(Clone)]
pub struct DeviceLossMonitor {
    state: Arc<Mutex<DeviceState>>,
    waker: Arc<Mutex<Option<Waker>>>,
}

impl DeviceLossMonitor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DeviceState::Active)),
            waker: Arc::new(Mutex::new(None)),
        }
    }

    /// Installs the callback run when the state leaves `Active`.
    pub fn set_waker(&self, waker: impl Fn() + Send + 'static) {
        *self.waker.lock().unwrap_or_else(PoisonError::into_inner) = Some(Box::new(waker));
    }

    /// Records a loss notification.
    pub fn notify(&self, reason: wgpu::DeviceLostReason, message: String) {
        let changed = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let next = state.on_lost(reason, message);
            let changed = next != *state;
            if changed {
                match &next {
                    DeviceState::LostIntentional { message } => {
                        log::info!("GPU device destroyed: {message}");
                    }
                    DeviceState::LostUnintentional { message } => {
                        log::error!("GPU device was lost: {message}");
                    }
                    DeviceState::Active => {}
                }
            }
            *state = next;
            changed
        };

        if !changed {
            return;
        }
        let waker = self.waker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(wake) = waker.as_ref() {
            wake();
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> DeviceState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hooks this monitor into `device`'s loss notification.
    pub fn attach(&self, device: &wgpu::Device) {
        let monitor = self.clone();
        device.set_device_lost_callback(move |reason, message| {
            monitor.notify(reason, message);
        });
    }
}

impl fmt::Debug for DeviceLossMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceLossMonitor")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Default for DeviceLossMonitor {
    fn default() -> Self {
        Self::new()
    }
}
