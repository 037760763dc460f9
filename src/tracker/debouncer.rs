//! Optional settling window for entering events.
//!
//! Fast scrolling can push several sections through the band within a few
//! milliseconds. With a non-zero window only the latest candidate is kept
//! and it is committed once no newer candidate has arrived for the window.

use std::time::{Duration, Instant};

use crate::types::TopicId;

/// Holds the most recent entering section until it has been stable.
#[derive(Debug)]
pub struct Debouncer {
    /// Latest candidate and the time it was recorded.
    pending: Option<(TopicId, Instant)>,
    /// How long a candidate must be stable before it is committed.
    duration: Duration,
}

impl Debouncer {
    /// Create a debouncer with the given window in milliseconds.
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            pending: None,
            duration: Duration::from_millis(debounce_ms),
        }
    }

    /// A zero window commits every event immediately.
    pub fn is_passthrough(&self) -> bool {
        self.duration.is_zero()
    }

    pub fn window(&self) -> Duration {
        self.duration
    }

    /// Record a candidate, replacing any older one and restarting the window.
    pub fn record(&mut self, id: TopicId) {
        self.record_at(id, Instant::now());
    }

    pub fn record_at(&mut self, id: TopicId, at: Instant) {
        self.pending = Some((id, at));
    }

    /// Take the candidate if it has been stable for the window.
    pub fn take_ready(&mut self) -> Option<TopicId> {
        self.take_ready_at(Instant::now())
    }

    pub fn take_ready_at(&mut self, now: Instant) -> Option<TopicId> {
        match &self.pending {
            Some((_, recorded)) if now.saturating_duration_since(*recorded) >= self.duration => {
                self.pending.take().map(|(id, _)| id)
            }
            _ => None,
        }
    }

    /// Drop the candidate without committing it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&TopicId> {
        self.pending.as_ref().map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debouncer_basic() {
        let mut debouncer = Debouncer::new(50);
        let start = Instant::now();

        debouncer.record_at(TopicId::from("a"), start);

        // Immediately after, nothing should be ready
        assert!(debouncer.take_ready_at(start).is_none());
        assert!(debouncer.has_pending());

        let ready = debouncer.take_ready_at(start + Duration::from_millis(60));
        assert_eq!(ready, Some(TopicId::from("a")));
        assert!(!debouncer.has_pending());
    }

    #[test]
    fn test_debouncer_latest_candidate_wins() {
        let mut debouncer = Debouncer::new(50);
        let start = Instant::now();

        debouncer.record_at(TopicId::from("a"), start);
        debouncer.record_at(TopicId::from("b"), start + Duration::from_millis(30));

        // 60ms after the first, only 30ms after the second
        assert!(
            debouncer
                .take_ready_at(start + Duration::from_millis(60))
                .is_none()
        );
        assert_eq!(debouncer.pending(), Some(&TopicId::from("b")));

        let ready = debouncer.take_ready_at(start + Duration::from_millis(80));
        assert_eq!(ready, Some(TopicId::from("b")));
    }

    #[test]
    fn test_debouncer_zero_window_is_passthrough() {
        let mut debouncer = Debouncer::new(0);
        assert!(debouncer.is_passthrough());
        let now = Instant::now();
        debouncer.record_at(TopicId::from("a"), now);
        assert_eq!(debouncer.take_ready_at(now), Some(TopicId::from("a")));
    }

    #[test]
    fn test_debouncer_clear() {
        let mut debouncer = Debouncer::new(50);
        debouncer.record(TopicId::from("a"));
        assert!(debouncer.has_pending());

        debouncer.clear();
        assert!(!debouncer.has_pending());
        assert!(debouncer.take_ready().is_none());
    }
}
