//! Topic page behaviour through the public API, with layouts built by the
//! text renderer.

use std::sync::Arc;
use tempfile::TempDir;

use topicdeck::config::{CatalogsConfig, ScrollConfig};
use topicdeck::{
    Activation, CatalogEntry, CatalogRegistry, Difficulty, SectionBox, SectionLocator,
    StackedLayout, Topic, TopicId, TopicPage, TopicRoute,
};

fn registry() -> CatalogRegistry {
    CatalogRegistry::builtin().unwrap()
}

fn open(key: &str) -> (TopicPage, ScrollConfig) {
    let scroll = ScrollConfig::default();
    let page = TopicPage::open(registry().resolve(Some(key)).clone(), &scroll);
    (page, scroll)
}

#[test]
fn test_closures_hoisting_scenario() {
    let entry = Arc::new(CatalogEntry {
        key: "javascript".to_string(),
        title: "JavaScript".to_string(),
        description: String::new(),
        parent: None,
        topics: vec![
            Topic::new("a", "Closures", "JavaScript", Difficulty::Medium, "scope"),
            Topic::new("b", "Hoisting", "JavaScript", Difficulty::Easy, "var declarations"),
        ],
    });
    let mut page = TopicPage::open(entry, &ScrollConfig::default());
    let ids = |page: &TopicPage| page.filtered().map(|t| t.id.to_string()).collect::<Vec<_>>();

    page.set_query("clo");
    assert_eq!(ids(&page), ["a"]);
    page.set_query("var");
    assert_eq!(ids(&page), ["b"]);
    page.set_query("");
    assert_eq!(ids(&page), ["a", "b"]);
    page.set_query("xyz");
    assert!(ids(&page).is_empty());
    assert!(page.chips().is_empty());
    assert!(page.empty_message().is_some());
}

#[test]
fn test_click_highlights_before_scroll_events() {
    let (mut page, scroll) = open("javascript");
    let layout = StackedLayout::for_page(&page, &scroll);
    page.after_render(&layout);
    assert_eq!(page.active_id().map(TopicId::as_str), Some("js-closures"));

    let target = TopicId::from("js-prototypes");
    let command = page
        .click_chip(&target, Activation::Enter, &layout)
        .expect("section is laid out");
    assert_eq!(page.active_id(), Some(&target));
    assert_eq!(command.to_y, layout.locate(&target).unwrap().top);

    let active_chips: Vec<_> = page.chips().into_iter().filter(|c| c.active).collect();
    assert_eq!(active_chips.len(), 1);
    assert_eq!(active_chips[0].id, target);
}

#[test]
fn test_filtering_out_active_topic_clears_all_highlights() {
    let (mut page, scroll) = open("java");
    let layout = StackedLayout::for_page(&page, &scroll);
    page.after_render(&layout);
    page.click_chip(&TopicId::from("java-completablefuture"), Activation::Click, &layout);
    assert_eq!(page.active_id().map(TopicId::as_str), Some("java-completablefuture"));

    page.set_query("stringbuffer");
    assert!(page.active_id().is_none());
    assert!(page.chips().iter().all(|c| !c.active));
    assert!(page.sections().iter().all(|s| !s.is_active));

    // The next render tracks the narrowed view only.
    let layout = StackedLayout::for_page(&page, &scroll);
    page.after_render(&layout);
    assert!(page.active_id().is_some_and(|id| page.contains(id)));
    assert_ne!(page.active_id().map(TopicId::as_str), Some("java-completablefuture"));
}

#[test]
fn test_scrolling_down_walks_sections_in_order() {
    let (mut page, scroll) = open("springboot");
    let layout = StackedLayout::for_page(&page, &scroll);
    page.after_render(&layout);

    let mut seen: Vec<TopicId> = page.active_id().cloned().into_iter().collect();
    let max_scroll = layout.max_scroll(scroll.viewport_height);
    let mut y = 0.0;
    while y < max_scroll {
        y = (y + 16.0).min(max_scroll);
        if let Some(id) = page.scroll_to(y, &layout) {
            if seen.last() != Some(id) {
                seen.push(id.clone());
            }
        }
    }

    let order: Vec<&TopicId> = layout.iter().map(|(id, _)| id).collect();
    let positions: Vec<usize> = seen
        .iter()
        .map(|id| order.iter().position(|o| *o == id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{seen:?}");
    assert!(seen.len() >= 3);
}

#[test]
fn test_stale_layout_after_requery_does_not_resurrect_topics() {
    let (mut page, scroll) = open("react");
    let full_layout = StackedLayout::for_page(&page, &scroll);
    page.after_render(&full_layout);

    page.set_query("hook");
    // Scrolling before the new render resubscribes against what the locator
    // knows; only sections of the filtered view are watched.
    page.scroll_to(400.0, &full_layout);
    let watched: Vec<&str> = page.tracker().watched().map(TopicId::as_str).collect();
    assert_eq!(watched, ["react-hooks"]);
}

#[test]
fn test_unmounted_page_ignores_everything() {
    let (mut page, scroll) = open("angular");
    let layout = StackedLayout::for_page(&page, &scroll);
    page.after_render(&layout);
    let before = page.active_id().cloned();
    page.unmount();

    page.scroll_to(layout.max_scroll(scroll.viewport_height), &layout);
    page.click_chip(&TopicId::from("ng-routing"), Activation::Tap, &layout);
    assert_eq!(page.active_id().cloned(), before);
    assert_eq!(page.tracker().watch_count(), 0);
}

#[test]
fn test_missing_sections_are_picked_up_on_next_render() {
    let (mut page, scroll) = open("javascript");
    let layout = StackedLayout::for_page(&page, &scroll);

    let partial = |id: &TopicId| -> Option<SectionBox> {
        if id == "js-closures" { layout.locate(id) } else { None }
    };
    page.after_render(&partial);
    assert_eq!(page.tracker().watch_count(), 1);

    page.set_query("");
    page.after_render(&layout);
    assert_eq!(page.tracker().watch_count(), page.filtered_len());
}

#[test]
fn test_routes_resolve_with_fallback() {
    let registry = registry();
    let route = TopicRoute::parse("/topics/databases/mongodb").unwrap();
    let entry = registry.resolve_route(&route);
    assert_eq!(entry.key, "mongodb");
    assert!(entry.topics.iter().all(|t| t.category == "MongoDB"));

    let route = TopicRoute::parse("/topics/haskell").unwrap();
    assert_eq!(registry.resolve_route(&route).key, "javascript");

    let route = TopicRoute::parse("/topics").unwrap();
    assert_eq!(registry.resolve_route(&route).key, "javascript");

    assert!(TopicRoute::parse("/blog/post").is_err());
}

#[test]
fn test_catalog_dir_overrides_builtin_and_derives() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("react.toml"),
        r#"
key = "react"
title = "React (team notes)"

[[topics]]
id = "react-suspense"
name = "Suspense"
category = "React"
difficulty = "hard"
description = "Components can wait for data before rendering."
"#,
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("react-hard.toml"),
        r#"
key = "react-hard"
title = "Hard React"
parent = "react"

[derive]
from = "react"
category = "React"
"#,
    )
    .unwrap();

    let config = CatalogsConfig {
        dir: Some(temp_dir.path().to_path_buf()),
        default_key: "react".to_string(),
        include_builtin: true,
    };
    let registry = CatalogRegistry::from_config(&config).unwrap();

    let react = registry.get("react").unwrap();
    assert_eq!(react.title, "React (team notes)");
    assert_eq!(react.len(), 1);
    let keys: Vec<&str> = registry.keys().collect();
    let react_position = keys.iter().position(|k| *k == "react").unwrap();
    assert!(react_position < keys.len() - 1, "override keeps built-in position");

    let derived = registry.get("react-hard").unwrap();
    assert_eq!(derived.topics[0].id, "react-suspense");
    assert_eq!(derived.route().to_string(), "/topics/react/react-hard");
}
