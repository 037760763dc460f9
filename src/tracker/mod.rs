//! Scroll-sync tracking of the section currently being read.
//!
//! The tracker keeps one watch per rendered section of the current filtered
//! view. Each scroll step is turned into intersection events by comparing
//! section boxes with the detection [`Band`]; entering events publish the
//! active topic id, last event wins.
//!
//! Watches belong to a subscription generation. Re-subscribing drops every
//! watch of the previous generation, so events produced before the switch
//! are ignored when applied later. After [`ScrollSyncTracker::unmount`]
//! nothing changes the active id any more.

mod band;
mod debouncer;

pub use band::{
    Band, DEFAULT_BOTTOM_INSET_RATIO, DEFAULT_TOP_INSET_PX, SectionBox, SectionLocator, Viewport,
};
pub use debouncer::Debouncer;

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::types::TopicId;

/// A watched section crossed into or out of the band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionEvent {
    pub generation: u64,
    pub id: TopicId,
    pub is_intersecting: bool,
}

#[derive(Debug)]
struct Watch {
    id: TopicId,
    intersecting: bool,
}

#[derive(Debug)]
pub struct ScrollSyncTracker {
    band: Band,
    watches: Vec<Watch>,
    generation: u64,
    mounted: bool,
    active: Option<TopicId>,
    debouncer: Debouncer,
}

impl Default for ScrollSyncTracker {
    fn default() -> Self {
        Self::new(Band::default(), 0)
    }
}

impl ScrollSyncTracker {
    pub fn new(band: Band, debounce_ms: u64) -> Self {
        Self {
            band,
            watches: Vec::new(),
            generation: 0,
            mounted: true,
            active: None,
            debouncer: Debouncer::new(debounce_ms),
        }
    }

    pub fn band(&self) -> Band {
        self.band
    }

    /// How long an entering section must stay put before it is committed.
    pub fn debounce_window(&self) -> Duration {
        self.debouncer.window()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Ids with a live watch, in registration order.
    pub fn watched(&self) -> impl Iterator<Item = &TopicId> {
        self.watches.iter().map(|w| &w.id)
    }

    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// Last published id. May name a section that is no longer rendered;
    /// callers showing highlights must check it against their view.
    pub fn active(&self) -> Option<&TopicId> {
        self.active.as_ref()
    }

    /// Candidate waiting for the debounce window, if any.
    pub fn pending(&self) -> Option<&TopicId> {
        self.debouncer.pending()
    }

    /// Replace all watches with watches on `ids`.
    ///
    /// Ids the locator cannot resolve are skipped; they get another chance
    /// on the next subscribe. Returns the initial entries for sections that
    /// already sit in the band, in registration order.
    pub fn subscribe<'a, L>(
        &mut self,
        ids: impl IntoIterator<Item = &'a TopicId>,
        locator: &L,
        viewport: Viewport,
    ) -> Vec<IntersectionEvent>
    where
        L: SectionLocator + ?Sized,
    {
        self.watches.clear();
        self.debouncer.clear();
        if !self.mounted {
            crate::debug_event!("tracker", "subscribe ignored", "unmounted");
            return Vec::new();
        }
        self.generation += 1;

        let mut skipped = 0usize;
        let mut initial = Vec::new();
        for id in ids {
            let Some(section) = locator.locate(id) else {
                skipped += 1;
                crate::debug_event!("tracker", "section missing", "{id}");
                continue;
            };
            let intersecting = self.band.intersects(section, viewport);
            if intersecting {
                initial.push(IntersectionEvent {
                    generation: self.generation,
                    id: id.clone(),
                    is_intersecting: true,
                });
            }
            self.watches.push(Watch {
                id: id.clone(),
                intersecting,
            });
        }

        crate::debug_event!(
            "tracker",
            "subscribed",
            "generation={} watches={} skipped={skipped}",
            self.generation,
            self.watches.len()
        );
        initial
    }

    /// Recompute every watch against the viewport and report state changes.
    pub fn observe<L>(&mut self, locator: &L, viewport: Viewport) -> Vec<IntersectionEvent>
    where
        L: SectionLocator + ?Sized,
    {
        if !self.mounted {
            return Vec::new();
        }
        let mut events = Vec::new();
        for watch in &mut self.watches {
            let now_intersecting = locator
                .locate(&watch.id)
                .is_some_and(|section| self.band.intersects(section, viewport));
            if now_intersecting != watch.intersecting {
                watch.intersecting = now_intersecting;
                events.push(IntersectionEvent {
                    generation: self.generation,
                    id: watch.id.clone(),
                    is_intersecting: now_intersecting,
                });
            }
        }
        events
    }

    /// Apply one event. Returns true when the active id changed.
    pub fn apply(&mut self, event: &IntersectionEvent) -> bool {
        self.apply_at(event, Instant::now())
    }

    pub fn apply_at(&mut self, event: &IntersectionEvent, now: Instant) -> bool {
        if !self.mounted || event.generation != self.generation {
            crate::debug_event!(
                "tracker",
                "stale event",
                "{} generation={}",
                event.id,
                event.generation
            );
            return false;
        }
        if !event.is_intersecting {
            return false;
        }
        if self.debouncer.is_passthrough() {
            return self.publish(event.id.clone());
        }
        self.debouncer.record_at(event.id.clone(), now);
        false
    }

    /// Apply events in delivery order. Returns true when the active id changed.
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a IntersectionEvent>) -> bool {
        let now = Instant::now();
        let before = self.active.clone();
        for event in events {
            self.apply_at(event, now);
        }
        before != self.active
    }

    /// Commit a debounced candidate once its window has passed.
    pub fn flush(&mut self) -> bool {
        self.flush_at(Instant::now())
    }

    pub fn flush_at(&mut self, now: Instant) -> bool {
        if !self.mounted {
            return false;
        }
        match self.debouncer.take_ready_at(now) {
            Some(id) => self.publish(id),
            None => false,
        }
    }

    /// Optimistic update from chip navigation.
    ///
    /// Supersedes any candidate still waiting in the debounce window.
    pub fn mark_active(&mut self, id: TopicId) -> bool {
        if !self.mounted {
            return false;
        }
        self.debouncer.clear();
        self.publish(id)
    }

    /// Release all watches. Later events and calls leave the active id alone.
    pub fn unmount(&mut self) {
        self.watches.clear();
        self.debouncer.clear();
        self.mounted = false;
        crate::debug_event!("tracker", "unmounted", "generation={}", self.generation);
    }

    fn publish(&mut self, id: TopicId) -> bool {
        if self.active.as_ref() == Some(&id) {
            return false;
        }
        crate::debug_event!("tracker", "active", "{id}");
        self.active = Some(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    struct Layout(HashMap<TopicId, SectionBox>);

    impl Layout {
        fn stacked(ids: &[&str], height: f64) -> Self {
            Self(
                ids.iter()
                    .enumerate()
                    .map(|(i, id)| (TopicId::from(*id), SectionBox::new(i as f64 * height, height)))
                    .collect(),
            )
        }
    }

    impl SectionLocator for Layout {
        fn locate(&self, id: &TopicId) -> Option<SectionBox> {
            self.0.get(id).copied()
        }
    }

    fn ids(raw: &[&str]) -> Vec<TopicId> {
        raw.iter().map(|s| TopicId::from(*s)).collect()
    }

    fn entering(tracker: &ScrollSyncTracker, id: &str) -> IntersectionEvent {
        IntersectionEvent {
            generation: tracker.generation(),
            id: TopicId::from(id),
            is_intersecting: true,
        }
    }

    #[test]
    fn test_last_event_wins_on_fast_scroll() {
        let layout = Layout::stacked(&["a", "b"], 500.0);
        let mut tracker = ScrollSyncTracker::default();
        tracker.subscribe(&ids(&["a", "b"]), &layout, Viewport::new(2000.0, 800.0));

        let a = entering(&tracker, "a");
        let b = entering(&tracker, "b");
        tracker.apply(&a);
        tracker.apply(&b);
        assert_eq!(tracker.active(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_initial_entries_on_subscribe() {
        let layout = Layout::stacked(&["a", "b", "c"], 300.0);
        let mut tracker = ScrollSyncTracker::default();
        // Band [100, 400] over document [0, 400]: a and b overlap it.
        let initial = tracker.subscribe(&ids(&["a", "b", "c"]), &layout, Viewport::new(0.0, 800.0));
        let entered: Vec<&str> = initial.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(entered, vec!["a", "b"]);

        tracker.apply_all(&initial);
        assert_eq!(tracker.active(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_observe_reports_transitions_only() {
        let layout = Layout::stacked(&["a", "b", "c"], 600.0);
        let mut tracker = ScrollSyncTracker::default();
        let viewport = Viewport::new(0.0, 800.0);
        let initial = tracker.subscribe(&ids(&["a", "b", "c"]), &layout, viewport);
        tracker.apply_all(&initial);
        assert_eq!(tracker.active(), Some(&TopicId::from("a")));

        // Same position: nothing changed.
        assert!(tracker.observe(&layout, viewport).is_empty());

        // Band at document [700, 1000]: a left, b entered.
        let events = tracker.observe(&layout, viewport.scrolled_to(600.0));
        assert_eq!(events.len(), 2);
        assert!(tracker.apply_all(&events));
        assert_eq!(tracker.active(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_leaving_event_keeps_active() {
        let layout = Layout::stacked(&["a"], 200.0);
        let mut tracker = ScrollSyncTracker::default();
        let initial = tracker.subscribe(&ids(&["a"]), &layout, Viewport::new(0.0, 800.0));
        tracker.apply_all(&initial);

        let events = tracker.observe(&layout, Viewport::new(5000.0, 800.0));
        assert_eq!(events.len(), 1);
        assert!(!events[0].is_intersecting);
        assert!(!tracker.apply_all(&events));
        assert_eq!(tracker.active(), Some(&TopicId::from("a")));
    }

    #[test]
    fn test_missing_sections_are_skipped_then_retried() {
        let mut layout = Layout::stacked(&["a"], 300.0);
        let mut tracker = ScrollSyncTracker::default();
        tracker.subscribe(&ids(&["a", "b"]), &layout, Viewport::new(0.0, 800.0));
        assert_eq!(tracker.watched().map(|id| id.as_str()).collect::<Vec<_>>(), vec!["a"]);

        layout
            .0
            .insert(TopicId::from("b"), SectionBox::new(300.0, 300.0));
        tracker.subscribe(&ids(&["a", "b"]), &layout, Viewport::new(0.0, 800.0));
        assert_eq!(tracker.watch_count(), 2);
    }

    #[test]
    fn test_resubscribe_discards_previous_generation() {
        let layout = Layout::stacked(&["a", "b"], 300.0);
        let mut tracker = ScrollSyncTracker::default();
        tracker.subscribe(&ids(&["a", "b"]), &layout, Viewport::new(3000.0, 800.0));
        let stale = entering(&tracker, "a");

        tracker.subscribe(&ids(&["b"]), &layout, Viewport::new(3000.0, 800.0));
        assert_eq!(tracker.generation(), 2);
        assert!(!tracker.apply(&stale));
        assert_eq!(tracker.active(), None);
        assert_eq!(tracker.watched().collect::<Vec<_>>(), vec![&TopicId::from("b")]);
    }

    #[test]
    fn test_unmount_stops_updates() {
        let layout = Layout::stacked(&["a"], 300.0);
        let mut tracker = ScrollSyncTracker::default();
        tracker.subscribe(&ids(&["a"]), &layout, Viewport::new(3000.0, 800.0));
        let event = entering(&tracker, "a");

        tracker.unmount();
        assert!(!tracker.is_mounted());
        assert_eq!(tracker.watch_count(), 0);
        assert!(!tracker.apply(&event));
        assert!(!tracker.mark_active(TopicId::from("a")));
        assert!(tracker.observe(&layout, Viewport::new(0.0, 800.0)).is_empty());
        assert!(
            tracker
                .subscribe(&ids(&["a"]), &layout, Viewport::new(0.0, 800.0))
                .is_empty()
        );
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_mark_active_is_immediate() {
        let mut tracker = ScrollSyncTracker::default();
        assert!(tracker.mark_active(TopicId::from("b")));
        assert_eq!(tracker.active(), Some(&TopicId::from("b")));
        assert!(!tracker.mark_active(TopicId::from("b")));
    }

    #[test]
    fn test_debounced_events_converge_to_latest() {
        let layout = Layout::stacked(&["a", "b", "c"], 300.0);
        let mut tracker = ScrollSyncTracker::new(Band::default(), 40);
        tracker.subscribe(&ids(&["a", "b", "c"]), &layout, Viewport::new(5000.0, 800.0));

        let start = Instant::now();
        tracker.apply_at(&entering(&tracker, "a"), start);
        tracker.apply_at(&entering(&tracker, "b"), start + Duration::from_millis(10));
        tracker.apply_at(&entering(&tracker, "c"), start + Duration::from_millis(20));
        assert_eq!(tracker.active(), None);
        assert_eq!(tracker.pending(), Some(&TopicId::from("c")));

        assert!(!tracker.flush_at(start + Duration::from_millis(40)));
        assert!(tracker.flush_at(start + Duration::from_millis(60)));
        assert_eq!(tracker.active(), Some(&TopicId::from("c")));
    }

    #[test]
    fn test_click_supersedes_pending_candidate() {
        let layout = Layout::stacked(&["a", "b"], 300.0);
        let mut tracker = ScrollSyncTracker::new(Band::default(), 40);
        tracker.subscribe(&ids(&["a", "b"]), &layout, Viewport::new(5000.0, 800.0));

        let start = Instant::now();
        tracker.apply_at(&entering(&tracker, "a"), start);
        tracker.mark_active(TopicId::from("b"));
        assert!(!tracker.flush_at(start + Duration::from_secs(1)));
        assert_eq!(tracker.active(), Some(&TopicId::from("b")));
    }
}
