//! Coalesces bursts of selection changes into a single notification.

use std::time::Duration;

use tokio::time::Instant;

/// Trailing-edge debouncer, constructed per grid and injected into it.
///
/// Each [`notify`](Self::notify) pushes the deadline out by `delay`;
/// [`poll`](Self::poll) fires once the deadline has passed. Time is passed in
/// explicitly so the owner decides which clock drives it.
#[derive(Debug, Clone)]
pub struct SelectionDebouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl SelectionDebouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// The configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a change at `now`, restarting the quiet period.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Whether a notification is waiting for its quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The instant the pending notification becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` exactly once per burst, when `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop a pending notification.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for SelectionDebouncer {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_never_fires() {
        let mut d = SelectionDebouncer::default();
        assert!(!d.is_pending());
        assert!(!d.poll(Instant::now()));
    }

    #[test]
    fn fires_after_delay_once() {
        let start = Instant::now();
        let mut d = SelectionDebouncer::new(Duration::from_millis(100));
        d.notify(start);
        assert!(!d.poll(start + Duration::from_millis(99)));
        assert!(d.poll(start + Duration::from_millis(100)));
        assert!(!d.poll(start + Duration::from_millis(200)));
    }

    #[test]
    fn burst_extends_deadline() {
        let start = Instant::now();
        let mut d = SelectionDebouncer::new(Duration::from_millis(100));
        d.notify(start);
        d.notify(start + Duration::from_millis(80));
        assert!(!d.poll(start + Duration::from_millis(150)));
        assert!(d.poll(start + Duration::from_millis(180)));
    }

    #[test]
    fn zero_delay_fires_immediately() {
        let now = Instant::now();
        let mut d = SelectionDebouncer::new(Duration::ZERO);
        d.notify(now);
        assert!(d.poll(now));
    }

    #[test]
    fn cancel_drops_pending() {
        let now = Instant::now();
        let mut d = SelectionDebouncer::new(Duration::ZERO);
        d.notify(now);
        d.cancel();
        assert!(!d.poll(now));
    }
}
