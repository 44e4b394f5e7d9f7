use std::time::{Duration, Instant};

/// How long to sleep when nothing is pending.
const IDLE: Duration = Duration::from_secs(86400);

/// Pure debouncer: only handles timing.
/// No filesystem access, no global state.
pub(super) struct Debouncer {
    window: Duration,
    pub(super) last_event: Option<Instant>,
    pub(super) retry_at: Option<Instant>,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            last_event: None,
            retry_at: None,
        }
    }

    /// Record a relevant event; restarts the quiet window.
    pub(super) fn add_event(&mut self) {
        self.last_event = Some(Instant::now());
    }

    /// Schedule a re-check without any new event (document unavailable).
    pub(super) fn retry_after(&mut self, delay: Duration) {
        self.retry_at = Some(Instant::now() + delay);
    }

    /// Consume the pending work if the window elapsed or a retry is due.
    pub(super) fn take_if_ready(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.last_event = None;
        self.retry_at = None;
        true
    }

    pub(super) fn is_ready(&self) -> bool {
        let settled = self
            .last_event
            .is_some_and(|t| t.elapsed() >= self.window);
        let retry_due = self.retry_at.is_some_and(|t| Instant::now() >= t);
        settled || retry_due
    }

    /// Precise sleep duration until next possible ready time.
    pub(super) fn sleep_duration(&self) -> Duration {
        let debounce_remaining = self
            .last_event
            .map(|t| self.window.saturating_sub(t.elapsed()));
        let retry_remaining = self
            .retry_at
            .map(|t| t.saturating_duration_since(Instant::now()));

        let remaining = match (debounce_remaining, retry_remaining) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => return IDLE,
        };

        remaining.max(Duration::from_millis(1))
    }
}
