//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, and wires window events to the GPU layer
//! and the viewport reactor.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
