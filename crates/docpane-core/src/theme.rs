//! Persisted light/dark preference.
//!
//! The one piece of state that survives the session. Stored as a small TOML
//! file in the platform config directory; a missing or unreadable file
//! defaults to light, and the file is only written on toggle.

use crate::{Error, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// The viewer theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (the default when no preference is stored).
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

/// Reads and writes the persisted theme preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    /// Creates a store at the platform-default preference location.
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "docpane")
            .ok_or_else(|| Error::Config("Failed to determine config directory".into()))?;
        Ok(Self {
            path: dirs.config_dir().join("theme.toml"),
        })
    }

    /// Creates a store at an explicit path (tests and embedded hosts).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the preference. Absent or corrupt files default to light.
    pub fn load(&self) -> Theme {
        match fs::read_to_string(&self.path) {
            Ok(raw) => match toml::from_str::<ThemeFile>(&raw) {
                Ok(file) => file.theme,
                Err(e) => {
                    warn!("Ignoring corrupt theme preference: {e}");
                    Theme::Light
                },
            },
            Err(_) => Theme::Light,
        }
    }

    /// Writes the preference.
    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string(&ThemeFile { theme })?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
