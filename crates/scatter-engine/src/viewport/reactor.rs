use anyhow::Result;

use super::{ResizeMailbox, SurfaceExtent};

/// Result of one frame attempt.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// Commands were submitted and the frame presented.
    Presented,
    /// The surface could not provide a texture this time; nothing was drawn.
    Skipped,
}

/// Surface + renderer pair the reactor drives.
pub trait ResizeTarget {
    /// Upper bound for either surface dimension (`max_texture_dimension_2d`).
    fn max_dimension(&self) -> u32;

    /// Resizes the presentation surface's pixel buffer.
    fn apply_size(&mut self, extent: SurfaceExtent);

    /// Renders one frame at the current size.
    fn render_frame(&mut self) -> Result<FrameStatus>;
}

/// Turns size notifications into exactly one render each.
#[derive(Debug, Default)]
pub struct ViewportReactor {
    current: Option<SurfaceExtent>,
    frames: u64,
}

impl ViewportReactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size applied by the last handled notification.
    #[inline]
    pub fn current(&self) -> Option<SurfaceExtent> {
        self.current
    }

    /// Frames triggered so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Clamps `observed`, applies it and renders once.
    pub fn on_resize<T: ResizeTarget + ?Sized>(
        &mut self,
        observed: SurfaceExtent,
        target: &mut T,
    ) -> Result<FrameStatus> {
        let extent = observed.clamped(target.max_dimension());
        if extent != observed {
            log::debug!("surface size {observed:?} clamped to {extent:?}");
        }

        target.apply_size(extent);
        self.current = Some(extent);
        self.frames += 1;
        target.render_frame()
    }

    /// Handles the pending notification, if any.
    pub fn drain<T: ResizeTarget + ?Sized>(
        &mut self,
        mailbox: &mut ResizeMailbox,
        target: &mut T,
    ) -> Result<Option<FrameStatus>> {
        match mailbox.take() {
            Some(observed) => self.on_resize(observed, target).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        max: u32,
        applied: Vec<SurfaceExtent>,
        renders: usize,
    }

    impl ResizeTarget for Recorder {
        fn max_dimension(&self) -> u32 {
            self.max
        }

        fn apply_size(&mut self, extent: SurfaceExtent) {
            self.applied.push(extent);
        }

        fn render_frame(&mut self) -> Result<FrameStatus> {
            self.renders += 1;
            Ok(FrameStatus::Presented)
        }
    }

    fn recorder(max: u32) -> Recorder {
        Recorder {
            max,
            ..Recorder::default()
        }
    }

    #[test]
    fn zero_width_clamps_to_one_and_renders_once() {
        let mut target = recorder(8192);
        let mut reactor = ViewportReactor::new();

        let status = reactor.on_resize(SurfaceExtent::new(0, 500), &mut target).unwrap();

        assert_eq!(status, FrameStatus::Presented);
        assert_eq!(target.applied, [SurfaceExtent::new(1, 500)]);
        assert_eq!(target.renders, 1);
        assert_eq!(reactor.current(), Some(SurfaceExtent::new(1, 500)));
    }

    #[test]
    fn oversize_clamps_to_device_limit() {
        let mut target = recorder(2048);
        ViewportReactor::new()
            .on_resize(SurfaceExtent::new(4000, 3000), &mut target)
            .unwrap();
        assert_eq!(target.applied, [SurfaceExtent::new(2048, 2048)]);
    }

    #[test]
    fn drain_collapses_bursts_into_one_frame() {
        let mut target = recorder(8192);
        let mut reactor = ViewportReactor::new();
        let mut mailbox = ResizeMailbox::new();

        mailbox.post(SurfaceExtent::new(300, 200));
        mailbox.post(SurfaceExtent::new(800, 600));

        assert_eq!(
            reactor.drain(&mut mailbox, &mut target).unwrap(),
            Some(FrameStatus::Presented)
        );
        assert_eq!(reactor.drain(&mut mailbox, &mut target).unwrap(), None);

        assert_eq!(target.applied, [SurfaceExtent::new(800, 600)]);
        assert_eq!(target.renders, 1);
        assert_eq!(reactor.frames(), 1);
    }

    #[test]
    fn render_errors_propagate() {
        struct Failing;
        impl ResizeTarget for Failing {
            fn max_dimension(&self) -> u32 {
                16
            }
            fn apply_size(&mut self, _: SurfaceExtent) {}
            fn render_frame(&mut self) -> Result<FrameStatus> {
                anyhow::bail!("out of memory")
            }
        }

        let err = ViewportReactor::new()
            .on_resize(SurfaceExtent::new(8, 8), &mut Failing)
            .unwrap_err();
        assert!(err.to_string().contains("out of memory"));
    }
}
