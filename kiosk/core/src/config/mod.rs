//! TOML Configuration File Support
//!
//! Typed kiosk settings loaded from an optional TOML file at
//! `~/.config/cocktail-kiosk/kiosk.toml` and the environment.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [display]
//! full_screen = false
//! width = 720
//! height = 720
//! frame_rate = 60
//!
//! [carousel]
//! image_scale = 0.9
//! show_reload_button = true
//! reload_timeout_ms = 600000
//! allow_favorites = true
//!
//! [assets]
//! dir = "/opt/kiosk/art"
//! ```
//!
//! # Environment Variables
//!
//! `FULL_SCREEN`, `FRAME_RATE`, `SHOW_RELOAD_COCKTAILS_BUTTON`,
//! `RELOAD_COCKTAILS_TIMEOUT` (milliseconds, `0` disables),
//! `COCKTAIL_IMAGE_SCALE`, `ALLOW_FAVORITES`, `KIOSK_ASSET_DIR` and `DEBUG`.
//! Boolean variables are only on when set to `true`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Size;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Display section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Use the whole display instead of a fixed window
    pub full_screen: Option<bool>,

    /// Window width in logical pixels when not full screen
    pub width: Option<u32>,

    /// Window height in logical pixels when not full screen
    pub height: Option<u32>,

    /// Frames per second
    pub frame_rate: Option<u32>,
}

/// Carousel section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselToml {
    /// Drink image size as a fraction of the screen
    pub image_scale: Option<f32>,

    /// Show the reload drinks button
    pub show_reload_button: Option<bool>,

    /// Reload the drink list this often, in milliseconds (0 = never)
    pub reload_timeout_ms: Option<u64>,

    /// Show the favorite toggle
    pub allow_favorites: Option<bool>,
}

/// Assets section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsToml {
    /// Directory holding the kiosk artwork
    pub dir: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskToml {
    /// Display configuration section
    pub display: DisplayToml,

    /// Carousel configuration section
    pub carousel: CarouselToml,

    /// Asset configuration section
    pub assets: AssetsToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Kiosk settings
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug, PartialEq)]
pub struct KioskConfig {
    /// Use the whole display
    pub full_screen: bool,

    /// Screen size when not full screen
    pub window_size: Size,

    /// Frames per second of the main loop and animations
    pub frame_rate: u32,

    /// Show the reload drinks button
    pub show_reload_button: bool,

    /// Automatic drink list reload interval
    pub reload_timeout: Option<Duration>,

    /// Drink image size as a fraction of the screen
    pub image_scale: f32,

    /// Show the favorite toggle
    pub allow_favorites: bool,

    /// Directory holding the kiosk artwork
    pub asset_dir: PathBuf,

    /// Verbose logging
    pub debug: bool,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    pub source: ConfigSource,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            full_screen: true,
            window_size: Size::new(720, 720),
            frame_rate: 60,
            show_reload_button: false,
            reload_timeout: None,
            image_scale: 1.0,
            allow_favorites: false,
            asset_dir: PathBuf::from("."),
            debug: false,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl KioskConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error if the frame rate is zero or the image scale is not
    /// in `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_rate == 0 {
            return Err(ConfigError::ValidationError(
                "frame_rate must be at least 1".to_string(),
            ));
        }
        if !(self.image_scale > 0.0 && self.image_scale <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "image_scale must be in (0, 1], got {}",
                self.image_scale
            )));
        }
        if self.window_size.width == 0 || self.window_size.height == 0 {
            return Err(ConfigError::ValidationError(
                "window size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/cocktail-kiosk/kiosk.toml` or
/// `~/.config/cocktail-kiosk/kiosk.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cocktail-kiosk").join("kiosk.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or the
/// resulting values are out of range. A missing config file is not an error.
pub fn load_config() -> Result<KioskConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or the resulting values are out of range.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<KioskConfig, ConfigError> {
    load_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with a custom environment lookup
fn load_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<KioskConfig, ConfigError> {
    let mut config = KioskConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: KioskToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);
    config.validate()?;

    tracing::info!(source = %config.source, frame_rate = config.frame_rate, "Kiosk configured");
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut KioskConfig, toml: &KioskToml) {
    // Display settings
    if let Some(full_screen) = toml.display.full_screen {
        config.full_screen = full_screen;
    }
    if let Some(width) = toml.display.width {
        config.window_size.width = width;
    }
    if let Some(height) = toml.display.height {
        config.window_size.height = height;
    }
    if let Some(rate) = toml.display.frame_rate {
        config.frame_rate = rate;
    }

    // Carousel settings
    if let Some(scale) = toml.carousel.image_scale {
        config.image_scale = scale;
    }
    if let Some(show) = toml.carousel.show_reload_button {
        config.show_reload_button = show;
    }
    if let Some(ms) = toml.carousel.reload_timeout_ms {
        config.reload_timeout = reload_timeout(ms);
    }
    if let Some(allow) = toml.carousel.allow_favorites {
        config.allow_favorites = allow;
    }

    // Asset settings
    if let Some(ref dir) = toml.assets.dir {
        config.asset_dir = dir.clone();
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut KioskConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(value) = env("FULL_SCREEN") {
        config.full_screen = parse_flag(&value);
        config.source = ConfigSource::Env;
    }
    if let Some(rate) = parse_env(&env, "FRAME_RATE") {
        config.frame_rate = rate;
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env("SHOW_RELOAD_COCKTAILS_BUTTON") {
        config.show_reload_button = parse_flag(&value);
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = parse_env::<u64>(&env, "RELOAD_COCKTAILS_TIMEOUT") {
        config.reload_timeout = reload_timeout(ms);
        config.source = ConfigSource::Env;
    }
    if let Some(scale) = parse_env(&env, "COCKTAIL_IMAGE_SCALE") {
        config.image_scale = scale;
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env("ALLOW_FAVORITES") {
        config.allow_favorites = parse_flag(&value);
        config.source = ConfigSource::Env;
    }
    if let Some(dir) = env("KIOSK_ASSET_DIR") {
        config.asset_dir = PathBuf::from(dir);
        config.source = ConfigSource::Env;
    }
    if let Some(value) = env("DEBUG") {
        config.debug = parse_flag(&value);
        config.source = ConfigSource::Env;
    }
}

/// Only the literal `true` (any case) turns a flag on
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Parse a numeric variable, warning and ignoring it when malformed
fn parse_env<T: std::str::FromStr>(env: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = env(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring unparseable environment variable");
            None
        }
    }
}

fn reload_timeout(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

// =============================================================================
// Tests
// =============================================================================
