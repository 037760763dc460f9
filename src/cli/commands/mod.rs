//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module and returns an
//! [`ExitCode`]. Errors are reported here, in the command's output format.

pub mod catalogs;
pub mod check;
pub mod init;
pub mod search;
pub mod show;
pub mod spy;

use crate::catalog::CatalogRegistry;
use crate::config::Settings;
use crate::error::DeckResult;
use crate::io::{self, ExitCode, OutputFormat};

/// Registry as configured in `settings`.
pub fn load_registry(settings: &Settings) -> DeckResult<CatalogRegistry> {
    let registry = CatalogRegistry::from_config(&settings.catalogs)?;
    crate::log_event!(
        "cli",
        "catalogs",
        "{} loaded, default={}",
        registry.len(),
        registry.default_key()
    );
    Ok(registry)
}

/// Turn a command result into an exit code, reporting errors in `format`.
pub fn finish(result: DeckResult<ExitCode>, format: OutputFormat) -> ExitCode {
    result.unwrap_or_else(|e| io::report_error(&e, format))
}
