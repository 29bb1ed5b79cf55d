//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - tracking device loss
//! - acquiring frames and providing encoders/views for rendering

mod gpu;
mod init;
mod loss;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use loss::{DeviceLossMonitor, DeviceState};
pub use surface::SurfaceErrorAction;
