use std::time::Duration;

use serde::Serialize;

/// File watcher settings shared by watch and serve mode.
#[derive(Debug, Clone, Serialize)]
pub struct WatchConfig {
    /// Quiet period after the last event before a change is acted upon.
    pub debounce: Duration,
}

impl WatchConfig {
    pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce: Self::DEFAULT_DEBOUNCE,
        }
    }
}
