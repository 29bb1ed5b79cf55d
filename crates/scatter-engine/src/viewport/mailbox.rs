use super::SurfaceExtent;

/// Single-slot, latest-wins queue of pending surface sizes.
///
/// The window system may report several sizes between two turns of the event loop;
/// only the newest one matters, so posting replaces whatever is still pending.
#[derive(Debug, Default)]
pub struct ResizeMailbox {
    pending: Option<SurfaceExtent>,
    superseded: u64,
}

impl ResizeMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, extent: SurfaceExtent) {
        if self.pending.replace(extent).is_some() {
            self.superseded += 1;
        }
    }

    pub fn take(&mut self) -> Option<SurfaceExtent> {
        self.pending.take()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Sizes dropped because a newer one arrived before the consumer ran.
    #[inline]
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let mut m = ResizeMailbox::new();
        assert!(!m.is_pending());
        assert_eq!(m.take(), None);
    }

    #[test]
    fn latest_wins() {
        let mut m = ResizeMailbox::new();
        m.post(SurfaceExtent::new(100, 100));
        m.post(SurfaceExtent::new(200, 150));
        m.post(SurfaceExtent::new(640, 480));
        assert_eq!(m.superseded(), 2);
        assert_eq!(m.take(), Some(SurfaceExtent::new(640, 480)));
        assert_eq!(m.take(), None);
    }
}
