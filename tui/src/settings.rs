//! Demo Data Layer Settings
//!
//! Where the drink catalog and logos live, how the simulated pumps behave
//! and where the binary logs. Read from the environment (after `.env` has
//! been loaded); malformed numbers fall back to the default with a warning.

use std::path::PathBuf;

/// Slowest simulated pump accepted from the environment
pub const MAX_SECONDS_PER_OZ: f32 = 60.0;

/// Settings for the catalog, pumps and log file
#[derive(Clone, Debug, PartialEq)]
pub struct DemoSettings {
    /// Drink records (`COCKTAILS_FILE`)
    pub cocktails_file: PathBuf,
    /// Directory of drink images (`LOGO_FOLDER`)
    pub logo_folder: PathBuf,
    /// Pumps allowed to run at once (`PUMP_CONCURRENCY`)
    pub pump_concurrency: usize,
    /// Simulated pour time per ounce (`SECONDS_PER_OZ`)
    pub seconds_per_oz: f32,
    /// Log destination (`KIOSK_LOG_FILE`)
    pub log_file: PathBuf,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            cocktails_file: PathBuf::from("cocktails.json"),
            logo_folder: PathBuf::from("drink_logos"),
            pump_concurrency: 3,
            seconds_per_oz: 2.0,
            log_file: PathBuf::from("kiosk.log"),
        }
    }
}

impl DemoSettings {
    /// Read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through an arbitrary variable lookup
    pub fn from_lookup(env: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        if let Some(path) = env("COCKTAILS_FILE") {
            settings.cocktails_file = PathBuf::from(path);
        }
        if let Some(path) = env("LOGO_FOLDER") {
            settings.logo_folder = PathBuf::from(path);
        }
        if let Some(pumps) = parse(&env, "PUMP_CONCURRENCY").filter(|n: &usize| *n > 0) {
            settings.pump_concurrency = pumps;
        }
        if let Some(secs) =
            parse(&env, "SECONDS_PER_OZ").filter(|s: &f32| (0.0..=MAX_SECONDS_PER_OZ).contains(s))
        {
            settings.seconds_per_oz = secs;
        }
        if let Some(path) = env("KIOSK_LOG_FILE") {
            settings.log_file = PathBuf::from(path);
        }
        settings
    }
}

fn parse<T: std::str::FromStr>(env: impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let value = env(key)?;
    let parsed = value.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = %value, "Ignoring unparseable environment variable");
    }
    parsed
}
