// ============================================================
// Layer 5 — Recognition Budget
// ============================================================
// A Deadline is started at the top of every recognize() call and
// checked from inside the recognizer's main loop. With no limit
// set, check() never fails.

use std::time::{Duration, Instant};

use crate::domain::error::RecognitionError;

/// Wall-clock budget for a single recognition call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub(crate) fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// A zero limit always fails.
    pub(crate) fn check(&self) -> Result<(), RecognitionError> {
        match self.limit {
            Some(limit) if self.started.elapsed() >= limit => Err(RecognitionError::Timeout(limit)),
            _ => Ok(()),
        }
    }
}
