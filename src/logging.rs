//! Diagnostic logging on stderr.
//!
//! Stdout carries pages, tables and JSON envelopes, so every log line goes to
//! stderr with a wall-clock stamp and the emitting component in brackets:
//!
//! ```text
//! 14:02:11.532 DEBUG topicdeck::tracker: [tracker] section missing: js-hoisting
//! ```
//!
//! Levels come from the `[logging]` table. Bare module names are scoped to
//! this crate, so `tracker = "debug"` turns on `topicdeck::tracker`:
//!
//! ```toml
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! tracker = "debug"
//! page = "info"
//! ```
//!
//! A set `RUST_LOG` replaces the table entirely:
//! `RUST_LOG=topicdeck::tracker=trace topicdeck spy react`.

use std::sync::Once;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// `HH:MM:SS.mmm` in local time.
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Install the stderr subscriber. Later calls are no-ops.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(ClockTime)
            .with_target(true)
            .with_level(true)
            .with_filter(build_filter(config, rust_log.as_deref()));

        tracing_subscriber::registry().with(layer).init();
    });
}

/// Filter from `RUST_LOG` when it is set, otherwise from the config table.
fn build_filter(config: &LoggingConfig, rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(filter_directives(config)),
    }
}

/// `EnvFilter` directives for a `[logging]` table, modules in sorted order.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut modules: Vec<_> = config.modules.iter().collect();
    modules.sort();

    let crate_name = env!("CARGO_CRATE_NAME");
    modules
        .into_iter()
        .fold(config.default.clone(), |mut directives, (module, level)| {
            if module.contains("::") {
                directives.push_str(&format!(",{module}={level}"));
            } else {
                directives.push_str(&format!(",{crate_name}::{module}={level}"));
            }
            directives
        })
}

/// Info-level event tagged with the emitting component.
///
/// ```ignore
/// log_event!("catalog", "loaded", "{} catalogs", registry.len());
/// log_event!("page", "unmount");
/// ```
#[macro_export]
macro_rules! log_event {
    ($component:expr, $event:expr) => {
        tracing::info!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Debug-level counterpart of [`log_event!`].
#[macro_export]
macro_rules! debug_event {
    ($component:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}
