//! Output handling for the CLI.
//!
//! Commands print either styled text or a JSON [`Envelope`], and report an
//! [`ExitCode`] either way.

pub mod envelope;
pub mod exit_code;

pub use envelope::{EntityType, Envelope, Meta, MessageType, ResultCode, SCHEMA_VERSION, Status};
pub use exit_code::ExitCode;

use serde::Serialize;

use crate::error::DeckError;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Print an envelope to stdout and return its exit code.
pub fn emit<T: Serialize>(envelope: &Envelope<T>) -> ExitCode {
    match envelope.to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::from_code(envelope.exit_code)
        }
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            ExitCode::Error
        }
    }
}

/// Report a failed command in the requested format.
pub fn report_error(error: &DeckError, format: OutputFormat) -> ExitCode {
    if format.is_json() {
        let mut envelope: Envelope<()> = Envelope::error(error.result_code(), error.to_string());
        if let Some(hint) = error.hint() {
            envelope = envelope.with_hint(hint);
        }
        emit(&envelope)
    } else {
        eprintln!("Error: {error}");
        if let Some(hint) = error.hint() {
            eprintln!("Hint: {hint}");
        }
        ExitCode::Error
    }
}
