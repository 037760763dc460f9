//! Check command - validate catalog files.

use std::path::Path;

use crate::catalog::CatalogRegistry;
use crate::config::Settings;
use crate::error::DeckResult;
use crate::io::{ExitCode, OutputFormat};

pub fn run(dir: Option<&Path>, settings: &Settings) -> ExitCode {
    super::finish(execute(dir, settings), OutputFormat::Text)
}

fn execute(dir: Option<&Path>, settings: &Settings) -> DeckResult<ExitCode> {
    let mut catalogs = settings.catalogs.clone();
    if let Some(dir) = dir {
        catalogs.dir = Some(dir.to_path_buf());
    }

    match &catalogs.dir {
        Some(dir) => println!("Checking catalogs in {}", dir.display()),
        None => println!("Checking built-in catalogs"),
    }

    let registry = CatalogRegistry::from_config(&catalogs)?;
    for entry in registry.iter() {
        let derived = entry
            .parent
            .as_ref()
            .map(|p| format!(" (under {})", p.key))
            .unwrap_or_default();
        println!("  ok  {:<14} {:>3} topics{derived}", entry.key, entry.len());
    }
    println!(
        "{} catalogs valid, default '{}'",
        registry.len(),
        registry.default_key()
    );
    Ok(ExitCode::Success)
}
