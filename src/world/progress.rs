//! Thread-safe progress reporting for long-running generation.

use std::sync::Mutex;

/// Receives progress updates from the generator.
pub trait ProgressSink {
    fn update(&self, status: &str, percent: u8, complete: bool);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, u8, bool),
{
    fn update(&self, status: &str, percent: u8, complete: bool) {
        self(status, percent, complete)
    }
}

/// Point-in-time copy of a [`Progress`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub status: String,
    pub percent: u8,
    pub complete: bool,
}

/// Shared progress state, written by the generator and polled by observers.
#[derive(Debug, Default)]
pub struct Progress {
    state: Mutex<ProgressSnapshot>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ProgressSnapshot {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ProgressSink for Progress {
    fn update(&self, status: &str, percent: u8, complete: bool) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.status.clear();
        state.status.push_str(status);
        state.percent = percent;
        state.complete = complete;
    }
}
