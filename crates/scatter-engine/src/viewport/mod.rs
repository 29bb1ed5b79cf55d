//! Resize-driven frame scheduling.
//!
//! Size notifications land in a `ResizeMailbox`; the `ViewportReactor` drains it,
//! clamps the size to device limits, applies it and renders exactly one frame.
//! There is no other frame trigger.

mod extent;
mod mailbox;
mod reactor;

pub use extent::SurfaceExtent;
pub use mailbox::ResizeMailbox;
pub use reactor::{FrameStatus, ResizeTarget, ViewportReactor};
