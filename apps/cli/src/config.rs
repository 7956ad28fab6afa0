use std::path::PathBuf;

use anyhow::Result;

/// Ambient configuration loaded from environment variables. Everything here
/// is optional: user-visible state lives in the settings store, not the
/// environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    /// Overrides the settings file location (used by tests and portable
    /// installs).
    pub settings_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            settings_path: std::env::var("MATCHSKILL_SETTINGS_PATH")
                .ok()
                .map(PathBuf::from),
        })
    }
}
