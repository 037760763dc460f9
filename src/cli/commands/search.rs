//! Search command - filter one catalog by a search term.

use console::style;

use crate::config::Settings;
use crate::error::DeckResult;
use crate::filter;
use crate::io::{self, EntityType, Envelope, ExitCode, OutputFormat};
use crate::render::Theme;

pub fn run(query: &str, catalog: Option<&str>, json: bool, settings: &Settings) -> ExitCode {
    let format = OutputFormat::from_json_flag(json);
    super::finish(execute(query, catalog, format, settings), format)
}

fn execute(
    query: &str,
    catalog: Option<&str>,
    format: OutputFormat,
    settings: &Settings,
) -> DeckResult<ExitCode> {
    let registry = super::load_registry(settings)?;
    let entry = registry.resolve(catalog);
    let hits = filter::filter(&entry.topics, query);
    crate::log_event!("search", "query", "{query:?} in {}: {} hits", entry.key, hits.len());

    if format.is_json() {
        let count = hits.len();
        let envelope = if hits.is_empty() {
            Envelope::not_found(hits, format!("No {} topics match '{query}'", entry.title))
                .with_hint("Try a different search term")
        } else {
            Envelope::success(hits).with_message(format!("Found {count} topics"))
        };
        let envelope = envelope
            .with_entity_type(EntityType::Topic)
            .with_count(count)
            .with_catalog(entry.key.clone())
            .with_query(query);
        return Ok(io::emit(&envelope));
    }

    if hits.is_empty() {
        eprintln!("No results for \"{query}\". Try a different search term.");
        return Ok(ExitCode::NotFound);
    }

    let colors = !Theme::should_disable_colors();
    println!(
        "{} of {} {} topics match {query:?}",
        hits.len(),
        entry.len(),
        entry.title
    );
    for topic in hits {
        let badge = format!("[{}]", topic.difficulty);
        if colors {
            println!(
                "  {:<24} {}  {}",
                style(topic.id.as_str()).dim(),
                style(&topic.name).bold(),
                Theme::difficulty_style(topic.difficulty).apply_to(badge)
            );
        } else {
            println!("  {:<24} {}  {badge}", topic.id.as_str(), topic.name);
        }
    }
    Ok(ExitCode::Success)
}
