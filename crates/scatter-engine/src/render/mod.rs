//! Instanced rendering core.
//!
//! - `mesh`: procedural vertex lists shared by all instances
//! - `layout`: packed record formats and buffer sizing
//! - `store`: per-instance attributes and the bytes of both storage buffers
//! - `pipeline`: typed pipeline and bind-group descriptions
//! - `renderer`: one pipeline, one bind group, one instanced draw per frame
//!
//! Coordinates are clip space: shapes are scaled around their own origin, then
//! translated by the per-instance offset.

mod context;
mod ctx;
pub mod layout;
pub mod mesh;
pub mod pipeline;
mod renderer;
pub mod store;

pub use context::{Presenter, RenderContext};
pub use ctx::{RenderCtx, RenderTarget};
pub use layout::{DynamicInstance, InstanceLayout, StaticInstance};
pub use mesh::{CircleMesh, Mesh};
pub use pipeline::{BindingKind, BindingSlot, PipelineConfig};
pub use renderer::FrameRenderer;
pub use store::{InstanceRanges, InstanceStore, RandRange};
