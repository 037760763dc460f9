//! Configuration for topicdeck.
//!
//! Settings are layered, later sources winning:
//! - Default values
//! - `.topicdeck/settings.toml`, searched upward from the current directory
//! - Environment variables
//! - CLI argument overrides (applied by the commands)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `TOPICDECK_` and use double
//! underscores to separate nested levels:
//! - `TOPICDECK_CATALOGS__DEFAULT_KEY=react` sets `catalogs.default_key`
//! - `TOPICDECK_SCROLL__DEBOUNCE_MS=40` sets `scroll.debounce_ms`
//! - `TOPICDECK_SCROLL__VIEWPORT_HEIGHT=1080` sets `scroll.viewport_height`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::catalog::DEFAULT_CATALOG_KEY;
use crate::tracker::{Band, DEFAULT_BOTTOM_INSET_RATIO, DEFAULT_TOP_INSET_PX};

/// Directory holding the workspace settings file.
pub const WORKSPACE_DIR: &str = ".topicdeck";

/// Settings file name inside [`WORKSPACE_DIR`].
pub const SETTINGS_FILE: &str = "settings.toml";

const ENV_PREFIX: &str = "TOPICDECK_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Workspace root directory (where .topicdeck is located)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,

    /// Catalog sources
    #[serde(default)]
    pub catalogs: CatalogsConfig,

    /// Scroll tracking and page layout
    #[serde(default)]
    pub scroll: ScrollConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogsConfig {
    /// Directory with additional `*.toml` catalogs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Catalog shown for unknown or missing keys
    #[serde(default = "default_catalog_key")]
    pub default_key: String,

    /// Load the catalogs embedded in the binary
    #[serde(default = "default_true")]
    pub include_builtin: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScrollConfig {
    /// Band inset from the top of the viewport, in pixels
    #[serde(default = "default_top_inset_px")]
    pub top_inset_px: f64,

    /// Share of the viewport height cut from the bottom of the band
    #[serde(default = "default_bottom_inset_ratio")]
    pub bottom_inset_ratio: f64,

    /// Settling window for entering events; 0 applies them immediately
    #[serde(default)]
    pub debounce_ms: u64,

    /// Viewport height used by the terminal layout, in pixels
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,

    /// Height of one rendered text line, in pixels
    #[serde(default = "default_line_height_px")]
    pub line_height_px: f64,

    /// Vertical gap between sections, in pixels
    #[serde(default = "default_section_gap_px")]
    pub section_gap_px: f64,

    /// Height of the site chrome above the page header, in pixels
    #[serde(default = "default_chrome_height_px")]
    pub chrome_height_px: f64,

    /// Text width used when laying out sections, in columns
    #[serde(default = "default_text_width")]
    pub text_width: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all modules
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides, e.g. `tracker = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_catalog_key() -> String {
    DEFAULT_CATALOG_KEY.to_string()
}
fn default_top_inset_px() -> f64 {
    DEFAULT_TOP_INSET_PX
}
fn default_bottom_inset_ratio() -> f64 {
    DEFAULT_BOTTOM_INSET_RATIO
}
fn default_viewport_height() -> f64 {
    900.0
}
fn default_line_height_px() -> f64 {
    24.0
}
fn default_section_gap_px() -> f64 {
    8.0
}
fn default_chrome_height_px() -> f64 {
    64.0
}
fn default_text_width() -> usize {
    80
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            workspace_root: None,
            catalogs: CatalogsConfig::default(),
            scroll: ScrollConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            default_key: default_catalog_key(),
            include_builtin: true,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            top_inset_px: default_top_inset_px(),
            bottom_inset_ratio: default_bottom_inset_ratio(),
            debounce_ms: 0,
            viewport_height: default_viewport_height(),
            line_height_px: default_line_height_px(),
            section_gap_px: default_section_gap_px(),
            chrome_height_px: default_chrome_height_px(),
            text_width: default_text_width(),
        }
    }
}

impl ScrollConfig {
    pub fn band(&self) -> Band {
        Band::new(self.top_inset_px, self.bottom_inset_ratio)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(WORKSPACE_DIR).join(SETTINGS_FILE));

        Self::figment(&config_path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                if settings.workspace_root.is_none() {
                    settings.workspace_root = Self::workspace_root();
                }
                settings.resolve_relative_paths(&config_path);
                settings
            })
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        let path = path.as_ref();
        Self::figment(path)
            .extract()
            .map_err(Box::new)
            .map(|mut settings: Settings| {
                settings.resolve_relative_paths(path);
                settings
            })
    }

    fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_path))
            // Double underscore separates nested levels; single underscores
            // stay part of the field name.
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
    }

    /// A relative `catalogs.dir` is taken relative to the workspace root
    /// (the parent of `.topicdeck/`).
    fn resolve_relative_paths(&mut self, config_path: &Path) {
        let Some(dir) = &self.catalogs.dir else {
            return;
        };
        if dir.is_absolute() {
            return;
        }
        let base = config_path
            .parent()
            .filter(|p| p.file_name().is_some_and(|name| name == WORKSPACE_DIR))
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty());
        if let Some(base) = base {
            self.catalogs.dir = Some(base.join(dir));
        }
    }

    /// Find the settings file by looking for a .topicdeck directory
    /// from the current directory up to the root
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(WORKSPACE_DIR).join(SETTINGS_FILE))
    }

    /// Get the workspace root directory (where .topicdeck is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(WORKSPACE_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Check if configuration is properly initialized
    pub fn check_init() -> Result<(), String> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(WORKSPACE_DIR).join(SETTINGS_FILE));

        if !config_path.exists() {
            return Err("No configuration file found".to_string());
        }

        match std::fs::read_to_string(&config_path) {
            Ok(content) => {
                if let Err(e) = toml::from_str::<Settings>(&content) {
                    return Err(format!(
                        "Configuration file is corrupted: {e}\nRun 'topicdeck init --force' to regenerate."
                    ));
                }
            }
            Err(e) => {
                return Err(format!("Cannot read configuration file: {e}"));
            }
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(WORKSPACE_DIR).join(SETTINGS_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        let mut settings = Settings::default();
        if let Ok(current_dir) = std::env::current_dir() {
            settings.workspace_root = Some(current_dir);
        }

        settings.save(&config_path)?;
        Ok(config_path)
    }
}
