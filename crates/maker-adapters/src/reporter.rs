//! Non-terminal [`ProgressReporter`]s.

use std::sync::{Arc, Mutex};

use maker_core::application::ports::{ProgressEvent, ProgressReporter};

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Keeps every event for later assertions. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Whether any recorded event satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&ProgressEvent) -> bool) -> bool {
        self.events
            .lock()
            .map(|events| events.iter().any(pred))
            .unwrap_or(false)
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, event: &ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
