//! Progress reporting for the permutation sweep

use std::io::Write;

/// One completed-permutation event from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Permutations completed so far (monotonic)
    pub completed: u64,
    /// Total permutations in the sweep
    pub total: u64,
    /// Radius of the best valid layout found so far, if any
    pub best_radius: Option<f64>,
}

/// Receiver for sweep progress events.
///
/// Invoked on the aggregation path only, once per completed
/// permutation. Implementations must not block meaningfully; anything
/// expensive belongs on the sink's own thread.
pub trait ProgressSink: Send + Sync {
    /// Handle one completion event.
    fn on_progress(&self, event: ProgressEvent);
}

/// Sink that ignores every event.
#[derive(Debug, Default)]
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn on_progress(&self, _event: ProgressEvent) {}
}

/// Carriage-return progress line on stderr, one rewrite per event.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn on_progress(&self, event: ProgressEvent) {
        let mut err = std::io::stderr().lock();
        match event.best_radius {
            Some(r) => {
                let _ = write!(
                    err,
                    "\rPermutation {}/{}  best R = {:.4}",
                    event.completed, event.total, r
                );
            }
            None => {
                let _ = write!(err, "\rPermutation {}/{}", event.completed, event.total);
            }
        }
        let _ = err.flush();
    }
}
