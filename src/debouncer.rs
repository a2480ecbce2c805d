use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Pending { deadline: Instant },
}

/// A debouncer that fires once after a period of inactivity
///
/// Holds at most one deadline. Every trigger replaces it, so a burst of
/// events collapses into a single execution once the burst goes quiet.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// The quiescence window after the last event
    delay: Duration,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    /// Create a new debouncer with the specified delay in milliseconds
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// Register that an event occurred
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    pub fn trigger_at(&mut self, now: Instant) {
        self.state = DebounceState::Pending {
            deadline: now + self.delay,
        };
    }

    /// Returns true exactly once per quiet period, then goes idle
    pub fn should_execute(&mut self) -> bool {
        self.should_execute_at(Instant::now())
    }

    pub fn should_execute_at(&mut self, now: Instant) -> bool {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Time left before the pending action fires, None when idle
    pub fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining_at(Instant::now())
    }

    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline } => Some(deadline.saturating_duration_since(now)),
        }
    }

    /// Cancel any pending action
    pub fn reset(&mut self) {
        self.state = DebounceState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_never_fires() {
        let mut debouncer = Debouncer::from_millis(300);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.should_execute());
        assert_eq!(debouncer.time_remaining(), None);
    }

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::from_millis(300);
        debouncer.trigger_at(start);

        assert!(!debouncer.should_execute_at(start + Duration::from_millis(299)));
        assert!(debouncer.should_execute_at(start + Duration::from_millis(300)));
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(900)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_trigger_pushes_deadline_back() {
        let start = Instant::now();
        let mut debouncer = Debouncer::from_millis(300);
        debouncer.trigger_at(start);
        debouncer.trigger_at(start + Duration::from_millis(200));

        assert!(!debouncer.should_execute_at(start + Duration::from_millis(400)));
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_millis(400)),
            Some(Duration::from_millis(100))
        );
        assert!(debouncer.should_execute_at(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_reset_cancels() {
        let start = Instant::now();
        let mut debouncer = Debouncer::from_millis(50);
        debouncer.trigger_at(start);
        debouncer.reset();
        assert!(!debouncer.should_execute_at(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_time_remaining_saturates() {
        let start = Instant::now();
        let mut debouncer = Debouncer::from_millis(10);
        debouncer.trigger_at(start);
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_secs(5)),
            Some(Duration::ZERO)
        );
    }
}
