//! Session types and concurrency guards.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::AiError;

/// Result of the startup capability probe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointStatus {
    pub reachable: bool,
    pub models: Vec<String>,
    pub error: Option<String>,
}

impl EndpointStatus {
    /// Whether `model` is among the advertised models.
    pub fn serves(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }
}

/// Exclusive hold on the transcript for `send`, `clear` and `load_from_file`.
/// Clears the `busy` flag on drop, so cancellation and early returns release it.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy lock. Returns `Err` if already busy.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, AiError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(AiError::Busy);
        }
        Ok(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
