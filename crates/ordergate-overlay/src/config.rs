//! Toast configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a toast stays fully visible when the caller doesn't say.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3200);

/// Configuration for the page's toast.
///
/// Only the visible duration is configurable. The exit-animation grace
/// period is fixed (see [`EXIT_GRACE`](crate::EXIT_GRACE)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// Milliseconds between `show` and the automatic retraction.
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_TOAST_DURATION.as_millis() as u64,
        }
    }
}

impl ToastConfig {
    /// Fixes out-of-range values so the config is safe to use.
    ///
    /// A zero duration would retract the toast before it was ever
    /// painted, so it falls back to the default.
    pub fn validated(mut self) -> Self {
        if self.duration_ms == 0 {
            tracing::warn!(
                default_ms = DEFAULT_TOAST_DURATION.as_millis() as u64,
                "toast duration_ms is 0, using default"
            );
            self.duration_ms = DEFAULT_TOAST_DURATION.as_millis() as u64;
        }
        self
    }

    /// The visible duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
