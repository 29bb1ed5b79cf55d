//! Scatter engine crate.
//!
//! Draws many independently colored, scaled and positioned 2D shapes with a single
//! instanced draw. Per-instance data lives in two storage buffers: one written once
//! (color, offset) and one rewritten every frame (aspect-corrected scale).

pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod render;
pub mod viewport;
pub mod window;

pub use config::{SceneConfig, Shape};
pub use error::ConfigError;
