//! Frame coalescing.

/// Collapses bursts of scroll/resize notifications into one unit of work
/// per rendered frame.
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer {
    pending: bool,
    frames: u64,
}

impl FrameCoalescer {
    pub const fn new() -> Self {
        Self {
            pending: false,
            frames: 0,
        }
    }

    /// Mark work as pending. Repeated calls before the next frame are free.
    pub const fn request(&mut self) {
        self.pending = true;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of frames on which work actually ran.
    pub const fn frames_run(&self) -> u64 {
        self.frames
    }

    /// Run `work` if a request is pending, clearing the request first.
    pub fn on_frame<T>(&mut self, work: impl FnOnce() -> T) -> Option<T> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.frames += 1;
        tracing::trace!(frame = self.frames, "coalesced frame work");
        Some(work())
    }
}
