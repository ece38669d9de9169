//! Progress reporting for a single generation request.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Icons delivered so far out of the requested total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

impl ProgressState {
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Receiver of progress updates.
///
/// Any `Fn(ProgressState)` closure is a sink.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, state: ProgressState);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressState) + Send + Sync,
{
    fn on_progress(&self, state: ProgressState) {
        self(state)
    }
}

/// Monotonic progress counter for one request.
///
/// `completed` only grows and is clamped to `total`, so a service that returns
/// more icons than asked for can never push progress past 100%.
pub struct ProgressTracker<'a> {
    state: ProgressState,
    sink: Option<&'a dyn ProgressSink>,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(total: usize, sink: Option<&'a dyn ProgressSink>) -> Self {
        Self {
            state: ProgressState {
                completed: 0,
                total,
            },
            sink,
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Add delivered icons and notify the sink.
    pub fn advance(&mut self, delivered: usize) -> ProgressState {
        self.state.completed = self
            .state
            .completed
            .saturating_add(delivered)
            .min(self.state.total);
        debug!(
            completed = self.state.completed,
            total = self.state.total,
            "Progress updated"
        );
        if let Some(sink) = self.sink {
            sink.on_progress(self.state);
        }
        self.state
    }
}
