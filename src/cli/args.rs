//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

fn section_title(title: &str) -> String {
    use crate::render::Theme;

    if Theme::should_disable_colors() {
        title.to_string()
    } else {
        Theme::heading(title).to_string()
    }
}

/// Create custom help text with consistent styling
fn create_custom_help() -> String {
    let mut help = String::new();

    help.push_str(&format!("{}\n", section_title("Quick Start:")));
    help.push_str("  $ topicdeck catalogs                     # List available topic catalogs\n");
    help.push_str("  $ topicdeck show react                   # Render the React topic page\n");
    help.push_str("  $ topicdeck show /topics/databases/sql   # Resolve a page by route\n");
    help.push_str("  $ topicdeck search closure               # Search the default catalog\n");
    help.push_str("  $ topicdeck spy java --query hash        # Replay a scroll session\n\n");

    help.push_str("Browse interview topics, search them, and trace scroll-synced highlighting.\n\n");

    help.push_str(&section_title("Usage:"));
    help.push_str(" topicdeck [OPTIONS] <COMMAND>\n\n");

    help.push_str(&format!("{}\n", section_title("Commands:")));
    help.push_str("  init          Set up .topicdeck directory\n");
    help.push_str("  config        Display active settings\n");
    help.push_str("  catalogs      List topic catalogs\n");
    help.push_str("  search        Filter a catalog by a search term\n");
    help.push_str("  show          Render a topic page\n");
    help.push_str("  spy           Replay a scroll session and trace the active topic\n");
    help.push_str("  check         Validate catalog files\n");
    help.push_str("  help          Print this message or the help of the given subcommand(s)\n\n");

    help.push_str("See 'topicdeck help <command>' for more information on a specific command.\n\n");

    help.push_str(&format!("{}\n", section_title("Options:")));
    help.push_str("  -c, --config <CONFIG>  Path to custom settings.toml file\n");
    help.push_str("  -h, --help             Print help\n");
    help.push_str("  -V, --version          Print version\n");

    help
}

/// Interview topic pages in the terminal
#[derive(Parser)]
#[command(
    name = "topicdeck",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interview topic pages in the terminal",
    long_about = "Browse interview topics, search them, and trace scroll-synced highlighting.",
    next_line_help = true,
    styles = clap_cargo_style(),
    override_help = create_custom_help()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .topicdeck directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .topicdeck/settings.toml")]
    Config,

    /// List catalogs
    #[command(
        about = "List topic catalogs",
        after_help = "Examples:\n  topicdeck catalogs\n  topicdeck catalogs --json | jq '.data[].key'"
    )]
    Catalogs {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Filter a catalog by a search term
    #[command(
        about = "Filter a catalog by a search term",
        long_about = "Case-insensitive substring search over topic names and descriptions.",
        after_help = "Examples:\n  topicdeck search closure\n  topicdeck search join --catalog sql\n  topicdeck search hook --catalog react --json\n\nExit status is 1 when nothing matches."
    )]
    Search {
        /// Search term (matched literally, whitespace included)
        query: String,

        /// Catalog key; unknown keys fall back to the default catalog
        #[arg(long, value_name = "KEY")]
        catalog: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Render a topic page
    #[command(
        about = "Render a topic page",
        after_help = "Examples:\n  topicdeck show\n  topicdeck show react --query hook\n  topicdeck show /topics/databases/mongodb --active mongo-aggregation\n  topicdeck show java --json | jq '.data.chips[].label'"
    )]
    Show {
        /// Catalog key or route such as /topics/databases/sql
        target: Option<String>,

        /// Search term applied before rendering
        #[arg(short, long)]
        query: Option<String>,

        /// Activate this topic's chip before rendering
        #[arg(long, value_name = "TOPIC_ID")]
        active: Option<String>,

        /// Text width in columns (overrides scroll.text_width)
        #[arg(long)]
        width: Option<usize>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Replay a scroll session and trace the active topic
    #[command(
        about = "Replay a scroll session and trace the active topic",
        long_about = "Lay out a topic page, scroll it from top to bottom in fixed steps, and report every change of the highlighted topic.\n\nChip clicks given with --click are replayed first, each followed by its scroll.",
        after_help = "Examples:\n  topicdeck spy javascript\n  topicdeck spy java --query thread --step 40\n  topicdeck spy react --click react-context --click react-patterns\n  topicdeck spy sql --json | jq '.data.steps[].active'"
    )]
    Spy {
        /// Catalog key or route such as /topics/databases/sql
        target: Option<String>,

        /// Search term applied before the replay
        #[arg(short, long)]
        query: Option<String>,

        /// Scroll distance per step, in pixels
        #[arg(long, default_value = "120")]
        step: f64,

        /// Chip to click before scrolling (repeatable)
        #[arg(long = "click", value_name = "TOPIC_ID")]
        clicks: Vec<String>,

        /// Viewport height in pixels (overrides scroll.viewport_height)
        #[arg(long)]
        height: Option<f64>,

        /// Debounce window in milliseconds (overrides scroll.debounce_ms)
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Validate catalog files
    #[command(
        about = "Validate catalog files",
        after_help = "Examples:\n  topicdeck check\n  topicdeck check ./catalogs"
    )]
    Check {
        /// Directory of *.toml catalogs (defaults to catalogs.dir)
        dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Whether errors should be reported as a JSON envelope.
    pub fn wants_json(&self) -> bool {
        match self {
            Self::Catalogs { json }
            | Self::Search { json, .. }
            | Self::Show { json, .. }
            | Self::Spy { json, .. } => *json,
            Self::Init { .. } | Self::Config | Self::Check { .. } => false,
        }
    }
}
