//! Persisted user preferences.
//!
//! Only one value is persisted across runs: the light/dark display
//! preference. It lives in `<state_dir>/prefs.json`. The state directory
//! defaults to `.imgshift` in the working directory.
//!
//! A missing or unreadable file loads as "no preference"; the effective mode
//! then falls back to light.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".imgshift";

const PREFS_FILENAME: &str = "prefs.json";

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Requested change to the theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeChange {
    Toggle,
    Dark,
    Light,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// `None` until the user picks a mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
}

impl Preferences {
    pub fn path(state_dir: &Path) -> PathBuf {
        state_dir.join(PREFS_FILENAME)
    }

    /// Load from the state directory. Returns defaults if the file doesn't
    /// exist or can't be parsed.
    pub fn load(state_dir: &Path) -> Self {
        let path = Self::path(state_dir);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                Self::default()
            }
        }
    }

    /// Save to the state directory, creating it if needed.
    pub fn save(&self, state_dir: &Path) -> Result<(), PreferencesError> {
        std::fs::create_dir_all(state_dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::path(state_dir), json)?;
        Ok(())
    }

    pub fn effective_dark_mode(&self) -> bool {
        self.dark_mode.unwrap_or(false)
    }

    pub fn apply(&mut self, change: ThemeChange) {
        let dark = match change {
            ThemeChange::Toggle => !self.effective_dark_mode(),
            ThemeChange::Dark => true,
            ThemeChange::Light => false,
        };
        self.dark_mode = Some(dark);
    }
}
