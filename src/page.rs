//! One topic page view.
//!
//! `TopicPage` owns everything that changes while a reader is on the page:
//! the query, the filtered view, the viewport and the scroll tracker. The
//! catalog itself is shared and never written.
//!
//! The host drives it the way a browser drives a component:
//! 1. `set_query` whenever the search box changes,
//! 2. `after_render` once the sections of the new view are laid out,
//! 3. `scroll_to` / `resize` on viewport changes,
//! 4. `click_chip` on chip activation, then scroll to the returned target,
//! 5. `unmount` when the page goes away.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::catalog::CatalogEntry;
use crate::config::ScrollConfig;
use crate::filter;
use crate::navigator::{self, Activation, Chip, ScrollBehavior};
use crate::tracker::{ScrollSyncTracker, SectionLocator, Viewport};
use crate::types::{Difficulty, DifficultyCounts, Topic, TopicId};

/// Where the viewport should move after a chip activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollCommand {
    pub target: TopicId,
    pub to_y: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A rendered question section.
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    /// 1-based position in the filtered view (`Q1`, `Q2`, ...).
    pub number: usize,
    pub topic: &'a Topic,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct TopicPage {
    entry: Arc<CatalogEntry>,
    query: String,
    filtered: Vec<usize>,
    viewport: Viewport,
    tracker: ScrollSyncTracker,
    watches_stale: bool,
}

impl TopicPage {
    pub fn open(entry: Arc<CatalogEntry>, scroll: &ScrollConfig) -> Self {
        let tracker = ScrollSyncTracker::new(scroll.band(), scroll.debounce_ms);
        Self::with_tracker(entry, Viewport::new(0.0, scroll.viewport_height), tracker)
    }

    pub fn with_tracker(
        entry: Arc<CatalogEntry>,
        viewport: Viewport,
        tracker: ScrollSyncTracker,
    ) -> Self {
        let filtered = filter::filter_indices(&entry.topics, "");
        crate::debug_event!("page", "open", "{} ({} topics)", entry.key, entry.len());
        Self {
            entry,
            query: String::new(),
            filtered,
            viewport,
            tracker,
            watches_stale: true,
        }
    }

    pub fn entry(&self) -> &Arc<CatalogEntry> {
        &self.entry
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tracker(&self) -> &ScrollSyncTracker {
        &self.tracker
    }

    /// Topics of the filtered view, in catalog order.
    pub fn filtered(&self) -> impl Iterator<Item = &Topic> + '_ {
        self.filtered.iter().map(|&idx| &self.entry.topics[idx])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn contains(&self, id: &TopicId) -> bool {
        self.filtered().any(|t| &t.id == id)
    }

    /// Replace the query and recompute the filtered view.
    ///
    /// Watches are renewed on the next `after_render`. The active id is left
    /// as is; readers go through [`TopicPage::active_id`], which hides ids
    /// that fell out of the view.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.filtered = filter::filter_indices(&self.entry.topics, &self.query);
        self.watches_stale = true;
        crate::debug_event!(
            "page",
            "query",
            "{:?} -> {} of {}",
            self.query,
            self.filtered.len(),
            self.entry.len()
        );
    }

    /// Subscribe the tracker to the sections of the current view if the view
    /// changed since the last subscription.
    pub fn after_render<L>(&mut self, locator: &L) -> Option<&TopicId>
    where
        L: SectionLocator + ?Sized,
    {
        if self.watches_stale {
            self.resubscribe(locator);
        }
        self.active_id()
    }

    /// Move the viewport and feed the resulting intersection changes to the
    /// tracker.
    pub fn scroll_to<L>(&mut self, scroll_y: f64, locator: &L) -> Option<&TopicId>
    where
        L: SectionLocator + ?Sized,
    {
        self.viewport = self.viewport.scrolled_to(scroll_y);
        self.observe(locator);
        self.active_id()
    }

    pub fn resize<L>(&mut self, height: f64, locator: &L) -> Option<&TopicId>
    where
        L: SectionLocator + ?Sized,
    {
        self.viewport = Viewport::new(self.viewport.scroll_y, height);
        self.observe(locator);
        self.active_id()
    }

    /// Activate chip `id`.
    ///
    /// The topic is highlighted immediately. The returned command aligns its
    /// section with the top of the viewport; it is `None` when the chip is
    /// not rendered or its section cannot be located yet.
    pub fn click_chip<L>(
        &mut self,
        id: &TopicId,
        activation: Activation,
        locator: &L,
    ) -> Option<ScrollCommand>
    where
        L: SectionLocator + ?Sized,
    {
        let Some(request) = navigator::activate(self.filtered(), id, activation) else {
            crate::debug_event!("page", "chip ignored", "{id} not in view");
            return None;
        };
        crate::log_event!("page", "chip", "{} via {}", request.target, request.activation);

        self.tracker.mark_active(request.target.clone());
        let section = locator.locate(&request.target)?;
        Some(ScrollCommand {
            target: request.target,
            to_y: section.top.max(0.0),
            behavior: request.behavior,
        })
    }

    /// Commit a debounced candidate whose window has passed.
    pub fn flush(&mut self) -> Option<&TopicId> {
        self.flush_at(Instant::now())
    }

    pub fn flush_at(&mut self, now: Instant) -> Option<&TopicId> {
        self.tracker.flush_at(now);
        self.active_id()
    }

    /// Active topic, if it is part of the current view.
    pub fn active_id(&self) -> Option<&TopicId> {
        self.tracker.active().filter(|id| self.contains(id))
    }

    pub fn chips(&self) -> Vec<Chip> {
        navigator::chips(self.filtered(), self.active_id())
    }

    pub fn sections(&self) -> Vec<SectionView<'_>> {
        let active = self.active_id();
        self.filtered()
            .enumerate()
            .map(|(idx, topic)| SectionView {
                number: idx + 1,
                topic,
                is_active: active == Some(&topic.id),
            })
            .collect()
    }

    pub fn counts(&self) -> DifficultyCounts {
        DifficultyCounts::tally(self.filtered())
    }

    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb {
            label: "Topics".to_string(),
            path: Some("/".to_string()),
        }];
        if let Some(parent) = &self.entry.parent {
            crumbs.push(Breadcrumb {
                label: parent.title.clone(),
                path: Some(format!("/topics/{}", parent.key)),
            });
        }
        crumbs.push(Breadcrumb {
            label: self.entry.title.clone(),
            path: None,
        });
        crumbs
    }

    pub fn search_placeholder(&self) -> String {
        format!("Search {} topics...", self.entry.title)
    }

    /// Message for an empty view, `None` while something matches.
    pub fn empty_message(&self) -> Option<String> {
        self.is_empty().then(|| {
            format!(
                "No results for \"{}\". Try a different search term.",
                self.query
            )
        })
    }

    /// Release the tracker's watches. The page stays readable.
    pub fn unmount(&mut self) {
        self.tracker.unmount();
        crate::debug_event!("page", "unmount", "{}", self.entry.key);
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            catalog: self.entry.key.clone(),
            title: self.entry.title.clone(),
            description: self.entry.description.clone(),
            route: self.entry.route().to_string(),
            breadcrumbs: self.breadcrumbs(),
            query: self.query.clone(),
            counts: self.counts(),
            active: self.active_id().cloned(),
            chips: self.chips(),
            sections: self
                .sections()
                .into_iter()
                .map(|s| SectionSnapshot {
                    number: s.number,
                    id: s.topic.id.clone(),
                    name: s.topic.name.clone(),
                    difficulty: s.topic.difficulty,
                    active: s.is_active,
                })
                .collect(),
            empty_message: self.empty_message(),
        }
    }

    fn resubscribe<L>(&mut self, locator: &L)
    where
        L: SectionLocator + ?Sized,
    {
        let ids: Vec<TopicId> = self.filtered().map(|t| t.id.clone()).collect();
        let initial = self.tracker.subscribe(&ids, locator, self.viewport);
        self.tracker.apply_all(&initial);
        self.watches_stale = false;
    }

    fn observe<L>(&mut self, locator: &L)
    where
        L: SectionLocator + ?Sized,
    {
        if self.watches_stale {
            self.resubscribe(locator);
            return;
        }
        let events = self.tracker.observe(locator, self.viewport);
        self.tracker.apply_all(&events);
    }
}

/// Serializable state of a page, as shown to the reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub catalog: String,
    pub title: String,
    pub description: String,
    pub route: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub query: String,
    pub counts: DifficultyCounts,
    pub active: Option<TopicId>,
    pub chips: Vec<Chip>,
    pub sections: Vec<SectionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSnapshot {
    pub number: usize,
    pub id: TopicId,
    pub name: String,
    pub difficulty: Difficulty,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Band, IntersectionEvent, SectionBox};
    use std::collections::HashMap;

    /// Sections stacked in view order, 400px each.
    struct Rendered(HashMap<TopicId, SectionBox>);

    impl Rendered {
        fn of(page: &TopicPage) -> Self {
            Self(
                page.filtered()
                    .enumerate()
                    .map(|(i, t)| (t.id.clone(), SectionBox::new(i as f64 * 400.0, 400.0)))
                    .collect(),
            )
        }
    }

    impl SectionLocator for Rendered {
        fn locate(&self, id: &TopicId) -> Option<SectionBox> {
            self.0.get(id).copied()
        }
    }

    fn scenario_entry() -> Arc<CatalogEntry> {
        Arc::new(CatalogEntry {
            key: "javascript".to_string(),
            title: "JavaScript".to_string(),
            description: "Core concepts".to_string(),
            parent: None,
            topics: vec![
                Topic::new("a", "Closures", "JavaScript", Difficulty::Medium, "scope"),
                Topic::new(
                    "b",
                    "Hoisting",
                    "JavaScript",
                    Difficulty::Easy,
                    "var declarations",
                ),
            ],
        })
    }

    fn page() -> TopicPage {
        TopicPage::with_tracker(
            scenario_entry(),
            Viewport::new(0.0, 800.0),
            ScrollSyncTracker::new(Band::default(), 0),
        )
    }

    fn filtered_ids(page: &TopicPage) -> Vec<&str> {
        page.filtered().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_query_scenario() {
        let mut page = page();
        page.set_query("clo");
        assert_eq!(filtered_ids(&page), vec!["a"]);
        page.set_query("var");
        assert_eq!(filtered_ids(&page), vec!["b"]);
        page.set_query("");
        assert_eq!(filtered_ids(&page), vec!["a", "b"]);
        page.set_query("xyz");
        assert!(filtered_ids(&page).is_empty());
        assert_eq!(
            page.empty_message().as_deref(),
            Some("No results for \"xyz\". Try a different search term.")
        );
    }

    #[test]
    fn test_lowest_section_in_band_wins_on_first_render() {
        let mut page = page();
        // Band [100, 400]: both sections overlap it at scroll 0.
        let both_visible = |id: &TopicId| match id.as_str() {
            "a" => Some(SectionBox::new(50.0, 200.0)),
            "b" => Some(SectionBox::new(260.0, 200.0)),
            _ => None,
        };
        assert_eq!(page.after_render(&both_visible).map(TopicId::as_str), Some("b"));
    }

    #[test]
    fn test_click_marks_active_before_any_event() {
        let mut page = page();
        let rendered = Rendered::of(&page);
        page.after_render(&rendered);
        assert_eq!(page.active_id(), Some(&TopicId::from("a")));

        let command = page
            .click_chip(&TopicId::from("b"), Activation::Click, &rendered)
            .unwrap();
        assert_eq!(page.active_id(), Some(&TopicId::from("b")));
        assert_eq!(command.target, "b");
        assert_eq!(command.to_y, 400.0);
        assert_eq!(command.behavior, ScrollBehavior::Smooth);

        let chips = page.chips();
        assert!(chips.iter().find(|c| c.id == "b").unwrap().active);
        assert!(!chips.iter().find(|c| c.id == "a").unwrap().active);
    }

    #[test]
    fn test_click_without_rendered_section_still_highlights() {
        let mut page = page();
        let nothing = |_: &TopicId| -> Option<SectionBox> { None };
        assert!(
            page.click_chip(&TopicId::from("b"), Activation::Tap, &nothing)
                .is_none()
        );
        assert_eq!(page.active_id(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_click_on_filtered_out_chip_is_ignored() {
        let mut page = page();
        page.set_query("clo");
        let rendered = Rendered::of(&page);
        page.after_render(&rendered);
        assert!(
            page.click_chip(&TopicId::from("b"), Activation::Click, &rendered)
                .is_none()
        );
        assert_ne!(page.active_id(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_filtering_out_active_topic_clears_highlight() {
        let mut page = page();
        let rendered = Rendered::of(&page);
        page.after_render(&rendered);
        page.click_chip(&TopicId::from("b"), Activation::Click, &rendered);

        page.set_query("clo");
        assert_eq!(page.active_id(), None);
        assert!(page.chips().iter().all(|c| !c.active));
        assert!(page.sections().iter().all(|s| !s.is_active));
        // The stored id is untouched; it shows again once back in view.
        assert_eq!(page.tracker().active(), Some(&TopicId::from("b")));
        page.set_query("");
        assert_eq!(page.active_id(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_fast_scroll_last_event_wins() {
        let mut page = page();
        let rendered = Rendered::of(&page);
        page.scroll_to(5000.0, &rendered);
        let generation = page.tracker().generation();

        let a = IntersectionEvent {
            generation,
            id: TopicId::from("a"),
            is_intersecting: true,
        };
        let b = IntersectionEvent {
            id: TopicId::from("b"),
            ..a.clone()
        };
        page.tracker.apply_all([&a, &b]);
        assert_eq!(page.active_id(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_scroll_moves_active_section() {
        let mut page = page();
        let rendered = Rendered::of(&page);
        page.after_render(&rendered);
        assert_eq!(page.active_id(), Some(&TopicId::from("a")));

        // Band [100, 400] at scroll 350 covers document [450, 750]: section b only.
        assert_eq!(page.scroll_to(350.0, &rendered), Some(&TopicId::from("b")));
        // Scrolling back up brings a into the band again.
        assert_eq!(page.scroll_to(0.0, &rendered), Some(&TopicId::from("a")));
    }

    #[test]
    fn test_requery_resubscribes_on_render() {
        let mut page = page();
        let rendered = Rendered::of(&page);
        page.after_render(&rendered);
        let first = page.tracker().generation();

        page.set_query("var");
        let rendered = Rendered::of(&page);
        page.after_render(&rendered);
        assert_eq!(page.tracker().generation(), first + 1);
        assert_eq!(
            page.tracker().watched().map(|id| id.as_str()).collect::<Vec<_>>(),
            vec!["b"]
        );
        // b is now first and sits in the band.
        assert_eq!(page.active_id(), Some(&TopicId::from("b")));
    }

    #[test]
    fn test_unmount_freezes_active() {
        let mut page = page();
        let rendered = Rendered::of(&page);
        page.after_render(&rendered);
        page.unmount();

        assert_eq!(page.scroll_to(350.0, &rendered), Some(&TopicId::from("a")));
        page.click_chip(&TopicId::from("b"), Activation::Click, &rendered);
        assert_eq!(page.active_id(), Some(&TopicId::from("a")));
    }

    #[test]
    fn test_breadcrumbs_and_counts() {
        let page = page();
        let crumbs = page.breadcrumbs();
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0].path.as_deref(), Some("/"));
        assert_eq!(crumbs[1].label, "JavaScript");
        assert!(crumbs[1].path.is_none());

        let counts = page.counts();
        assert_eq!((counts.total, counts.easy, counts.medium, counts.hard), (2, 1, 1, 0));
        assert_eq!(page.search_placeholder(), "Search JavaScript topics...");
    }
}
