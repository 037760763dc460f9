//! Catalogs command - list the loaded catalogs.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use crate::catalog::CatalogRegistry;
use crate::config::Settings;
use crate::error::DeckResult;
use crate::io::{self, EntityType, Envelope, ExitCode, OutputFormat};

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub topics: usize,
    pub route: String,
    pub is_default: bool,
}

pub fn summarize(registry: &CatalogRegistry) -> Vec<CatalogSummary> {
    registry
        .iter()
        .map(|entry| CatalogSummary {
            key: entry.key.clone(),
            title: entry.title.clone(),
            parent: entry.parent.as_ref().map(|p| p.key.clone()),
            topics: entry.len(),
            route: entry.route().to_string(),
            is_default: entry.key == registry.default_key(),
        })
        .collect()
}

pub fn run(json: bool, settings: &Settings) -> ExitCode {
    let format = OutputFormat::from_json_flag(json);
    super::finish(execute(format, settings), format)
}

fn execute(format: OutputFormat, settings: &Settings) -> DeckResult<ExitCode> {
    let registry = super::load_registry(settings)?;
    let summaries = summarize(&registry);

    if format.is_json() {
        let count = summaries.len();
        let envelope = Envelope::success(summaries)
            .with_entity_type(EntityType::Catalog)
            .with_count(count)
            .with_message(format!("{count} catalogs"));
        return Ok(io::emit(&envelope));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Key", "Title", "Parent", "Topics", "Route"]);
    if let Some(column) = table.column_mut(3) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for summary in &summaries {
        let key = if summary.is_default {
            format!("{} (default)", summary.key)
        } else {
            summary.key.clone()
        };
        table.add_row(vec![
            key,
            summary.title.clone(),
            summary.parent.clone().unwrap_or_default(),
            summary.topics.to_string(),
            summary.route.clone(),
        ]);
    }
    println!("{table}");
    Ok(ExitCode::Success)
}
