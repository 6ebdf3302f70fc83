//! Durable user preferences (theme, language).
//!
//! Preferences are plain string key/value pairs. A missing value is a valid
//! answer and callers fall back to a default. Values that fail to parse are
//! treated exactly like missing ones.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::PrefsError;

/// Store key for the colour theme.
pub const THEME_KEY: &str = "theme";
/// Store key for the display language.
pub const LANGUAGE_KEY: &str = "language";

/// A key/value store that survives restarts.
pub trait PreferenceStore: fmt::Debug {
    /// Read a value. `None` means the key was never written.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite a value.
    ///
    /// # Errors
    ///
    /// Implementations return [`PrefsError`] when the value cannot be made
    /// durable. The in-memory view must still reflect the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// Read a preference; absence is not an error.
pub fn load_preference(store: &dyn PreferenceStore, key: &str) -> Option<String> {
    if key.is_empty() {
        return None;
    }
    store.get(key)
}

/// Write a preference unconditionally (last write wins).
///
/// # Errors
///
/// Returns [`PrefsError::EmptyKey`] for an empty key, or whatever the store
/// reports when it fails to persist.
pub fn save_preference(
    store: &mut dyn PreferenceStore,
    key: &str,
    value: &str,
) -> Result<(), PrefsError> {
    if key.is_empty() {
        return Err(PrefsError::EmptyKey);
    }
    store.set(key, value)
}

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// Stored theme, or `None` when absent or malformed.
pub fn load_theme(store: &dyn PreferenceStore) -> Option<Theme> {
    let raw = load_preference(store, THEME_KEY)?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::debug!(value = %raw, "ignoring malformed stored theme");
    }
    parsed
}

/// Volatile store, used in tests and when no durable store is configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-object file store. Every write rewrites the whole file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. An unreadable or malformed file is
    /// logged and also treated as empty; it will be replaced on the next
    /// write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %path.display(),
                    %err,
                    "preference store is malformed; starting empty"
                );
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    %err,
                    "preference store unreadable; starting empty"
                );
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), PrefsError> {
        let io_err = |source| PrefsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, format!("{text}\n")).map_err(io_err)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
