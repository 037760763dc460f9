//! Init and Config commands.

use std::path::PathBuf;

use crate::config::{SETTINGS_FILE, Settings, WORKSPACE_DIR};
use crate::io::ExitCode;

/// Run init command - create configuration file.
pub fn run_init(force: bool) -> ExitCode {
    let config_path = PathBuf::from(WORKSPACE_DIR).join(SETTINGS_FILE);

    if config_path.exists() && !force {
        eprintln!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        eprintln!("Use --force to overwrite");
        return ExitCode::NotFound;
    }

    match Settings::init_config_file(force) {
        Ok(path) => {
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to customize your settings.");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::Error
        }
    }
}

/// Run config command - display current configuration.
pub fn run_config(config: &Settings) -> ExitCode {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    match toml::to_string_pretty(config) {
        Ok(toml_str) => {
            println!("{toml_str}");
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("Error displaying config: {e}");
            ExitCode::Error
        }
    }
}
