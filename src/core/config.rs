//! # Configuration
//!
//! Console settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.conmenu/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Console width and page length are fixed and not configurable.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::console::LoggingLevel;

// Built-in splash screen, generated from assets/splash.txt by build.rs.
include!(concat!(env!("OUT_DIR"), "/splash.rs"));

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConmenuConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConsoleConfig {
    pub logging_level: Option<LoggingLevel>,
    pub small_headers: Option<bool>,
    pub splash_file: Option<String>,
    pub quit_from_any_menu: Option<bool>,
}

/// Values given on the command line. `None`/`false` means not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub logging_level: Option<LoggingLevel>,
    pub small_headers: bool,
    pub no_splash: bool,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub logging_level: LoggingLevel,
    pub small_headers: bool,
    pub splash_lines: Vec<String>,
    pub quit_from_any_menu: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.conmenu/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".conmenu"))
}

/// Returns the path to `~/.conmenu/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.conmenu/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ConmenuConfig::default()`.
pub fn load_config() -> Result<ConmenuConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ConmenuConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ConmenuConfig::default());
    }

    load_config_from(&path)
}

/// Load and parse a specific config file. Missing or malformed files are errors.
pub fn load_config_from(path: &Path) -> Result<ConmenuConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ConmenuConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Conmenu Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [console]
# logging_level = 0            # -1 (disabled), 0, 1, 2 or 3
# small_headers = false        # single-line headers
# splash_file = "splash.txt"   # Path relative to ~/.conmenu/
# quit_from_any_menu = false   # offer quit on every menu, not just the top
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ConmenuConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Logging level: CLI → env → config → default
    let logging_level = cli
        .logging_level
        .or_else(|| env_logging_level("CONMENU_LOGGING_LEVEL"))
        .or(config.console.logging_level)
        .unwrap_or_default();

    // Small headers: CLI flag can only turn them on
    let small_headers = cli.small_headers
        || std::env::var("CONMENU_SMALL_HEADERS")
            .ok()
            .and_then(|v| parse_bool(&v))
            .or(config.console.small_headers)
            .unwrap_or(false);

    let splash_lines = if cli.no_splash {
        Vec::new()
    } else {
        resolve_splash(config)
    };

    ResolvedConfig {
        logging_level,
        small_headers,
        splash_lines,
        quit_from_any_menu: config.console.quit_from_any_menu.unwrap_or(false),
    }
}

fn env_logging_level(var: &str) -> Option<LoggingLevel> {
    let raw = std::env::var(var).ok()?;
    match raw.parse() {
        Ok(level) => Some(level),
        Err(e) => {
            warn!("Ignoring {}: {}", var, e);
            None
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Resolves the splash screen: a configured file wins over the built-in one.
fn resolve_splash(config: &ConmenuConfig) -> Vec<String> {
    if let Some(ref file) = config.console.splash_file {
        if let Some(dir) = config_dir() {
            let splash_path = dir.join(file);
            match fs::read_to_string(&splash_path) {
                Ok(contents) => {
                    if !contents.trim().is_empty() {
                        info!("Loaded splash screen from {}", splash_path.display());
                        return contents.lines().map(str::to_string).collect();
                    }
                    warn!("Splash file is empty: {}", splash_path.display());
                }
                Err(e) => {
                    warn!("Failed to read splash file {}: {}", splash_path.display(), e);
                }
            }
        }
    }

    DEFAULT_SPLASH.iter().map(|line| line.to_string()).collect()
}
