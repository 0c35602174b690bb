//! Durable user preferences: theme and last selected topic.
//!
//! Stored as a small TOML file under the platform config directory
//! (XDG on Linux, AppData on Windows, Library on macOS). Preferences are
//! best-effort: a missing or unreadable file falls back to defaults with a
//! log line, and save failures are logged but never surface in the UI.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_ID: &str = "hookwatch";
const PREFS_FILE_NAME: &str = "prefs.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Everything the dashboard remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub theme: Theme,
    pub selected_topic: Option<String>,
}

/// Storage seam for preferences. The dashboard only talks to this trait;
/// tests substitute an in-memory store.
pub trait PrefsStore {
    fn load(&self) -> Prefs;
    fn save(&self, prefs: &Prefs);
}

pub struct FilePrefsStore {
    path: PathBuf,
}

impl FilePrefsStore {
    /// Store at the platform-appropriate config location, falling back to
    /// the current directory when platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let path = match ProjectDirs::from("", "", APP_ID) {
            Some(proj_dirs) => proj_dirs.config_dir().join(PREFS_FILE_NAME),
            None => {
                tracing::warn!("Could not determine platform directories, using current directory");
                PathBuf::from(PREFS_FILE_NAME)
            }
        };
        tracing::debug!(path = %path.display(), "Preferences path resolved");
        Self { path }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PrefsStore for FilePrefsStore {
    fn load(&self) -> Prefs {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No prefs file found; using defaults");
            return Prefs::default();
        }

        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not read prefs file; using defaults"
                );
                return Prefs::default();
            }
        };

        match toml::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to parse prefs file; using defaults"
                );
                Prefs::default()
            }
        }
    }

    fn save(&self, prefs: &Prefs) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(
                    path = %parent.display(),
                    error = %e,
                    "Failed to create prefs directory"
                );
                return;
            }
        }

        let content = match toml::to_string_pretty(prefs) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize prefs");
                return;
            }
        };

        if let Err(e) = std::fs::write(&self.path, content) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to write prefs file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePrefsStore::at(dir.path().join("nested").join("prefs.toml"));

        let prefs = Prefs {
            theme: Theme::Light,
            selected_topic: Some("orders_v2".to_string()),
        };
        store.save(&prefs);

        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePrefsStore::at(dir.path().join("prefs.toml"));
        assert_eq!(store.load(), Prefs::default());
    }

    #[test]
    fn garbage_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "not even = [ toml").unwrap();

        let store = FilePrefsStore::at(path);
        assert_eq!(store.load(), Prefs::default());
    }

    #[test]
    fn theme_toggle_is_binary() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }
}
