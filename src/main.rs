use anyhow::anyhow;
use clap::Parser;

use topicdeck::Settings;
use topicdeck::cli::commands::{self, show::ShowArgs, spy::SpyArgs};
use topicdeck::cli::{Cli, Commands};
use topicdeck::io;

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    if let Some(path) = &cli.config {
        return Settings::load_from(path)
            .map_err(|e| anyhow!("Cannot load {}: {e}", path.display()));
    }

    Ok(Settings::load().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Using default configuration.");
        Settings::default()
    }))
}

fn main() -> anyhow::Result<std::process::ExitCode> {
    let cli = Cli::parse();
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) if cli.command.wants_json() => {
            let envelope: io::Envelope<()> =
                io::Envelope::error(io::ResultCode::ConfigError, e.to_string());
            return Ok(io::emit(&envelope).into());
        }
        Err(e) => return Err(e),
    };

    topicdeck::logging::init_with_config(&settings.logging);
    if cli.config.is_none() && !matches!(cli.command, Commands::Init { .. }) {
        if let Err(reason) = Settings::check_init() {
            topicdeck::debug_event!("config", "using defaults", "{reason}");
        }
    }

    let code = match &cli.command {
        Commands::Init { force } => commands::init::run_init(*force),
        Commands::Config => commands::init::run_config(&settings),
        Commands::Catalogs { json } => commands::catalogs::run(*json, &settings),
        Commands::Search {
            query,
            catalog,
            json,
        } => commands::search::run(query, catalog.as_deref(), *json, &settings),
        Commands::Show {
            target,
            query,
            active,
            width,
            json,
        } => commands::show::run(
            ShowArgs {
                target: target.as_deref(),
                query: query.as_deref(),
                active: active.as_deref(),
                width: *width,
                json: *json,
            },
            &settings,
        ),
        Commands::Spy {
            target,
            query,
            step,
            clicks,
            height,
            debounce_ms,
            json,
        } => commands::spy::run(
            SpyArgs {
                target: target.as_deref(),
                query: query.as_deref(),
                step: *step,
                clicks,
                height: *height,
                debounce_ms: *debounce_ms,
                json: *json,
            },
            &settings,
        ),
        Commands::Check { dir } => commands::check::run(dir.as_deref(), &settings),
    };

    topicdeck::debug_event!("cli", "exit", "{code:?}");
    Ok(code.into())
}
