//! Engine configuration and run statistics.

mod stats;

pub use stats::{
    Statistics, BINDINGS, BINDINGS_UNDONE, CALLS, COMMITS, FRAMES_POPPED,
    FRAMES_PUSHED, FRAMES_RETIRED, MAX_DEPTH, RETRIES,
};

/// Settings for an [`crate::Engine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maintain the counters in [`Statistics`].
    pub collect_statistics: bool,
    /// Emit a `trace!` record for every frame pushed, retried or removed.
    pub trace_frames: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { collect_statistics: true, trace_frames: false }
    }
}

impl EngineConfig {
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.collect_statistics = enabled;
        self
    }

    pub fn with_frame_tracing(mut self, enabled: bool) -> Self {
        self.trace_frames = enabled;
        self
    }
}
