//! User settings — identity, API credential, and theme preference.
//! Loaded once at startup, overwritten wholesale on every settings save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::theme::ThemeColor;

/// The file name carries the schema version; bumping it orphans old data
/// instead of migrating it.
pub const SETTINGS_FILE: &str = "settings_v2.json";

/// The persisted record. Field names stay camelCase on disk, matching the
/// record format of earlier versions of the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub name: String,
    pub api_key: String,
    pub theme_color: ThemeColor,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            name: "Candidato".to_string(),
            api_key: String::new(),
            theme_color: ThemeColor::Emerald,
        }
    }
}

/// Outcome of a load. `recovered` is set when a persisted record existed
/// but could not be parsed and defaults were substituted — the caller is
/// expected to tell the user instead of failing silently.
#[derive(Debug)]
pub struct LoadedSettings {
    pub settings: UserSettings,
    pub recovered: bool,
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location: `<config_dir>/matchskill/settings_v2.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("matchskill")
            .join(SETTINGS_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> LoadedSettings {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => {
                return LoadedSettings {
                    settings: UserSettings::default(),
                    recovered: false,
                }
            }
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => LoadedSettings {
                settings,
                recovered: false,
            },
            Err(e) => {
                warn!(
                    "settings file {} is unreadable ({e}), substituting defaults",
                    self.path.display()
                );
                LoadedSettings {
                    settings: UserSettings::default(),
                    recovered: true,
                }
            }
        }
    }

    /// Overwrites the persisted record entirely. No partial updates.
    pub fn save(&self, settings: &UserSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating settings directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing settings to {}", self.path.display()))?;
        Ok(())
    }
}
