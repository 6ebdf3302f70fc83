//! Saved command-line defaults.
//!
//! Defaults live in a flag file: the same tokens as the command line, one
//! or more per line, `#` comments allowed. The global file is merged with a
//! local `.dspreviewrc`, and real command-line flags win over both.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::prefs::Theme;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    /// Use the stored preference, falling back to dark.
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    /// Forced theme, if any.
    pub const fn forced(self) -> Option<Theme> {
        match self {
            Self::Auto => None,
            Self::Light => Some(Theme::Light),
            Self::Dark => Some(Theme::Dark),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub no_sidebar: bool,
    pub theme: Option<ThemeMode>,
    pub lookahead: Option<usize>,
    pub store: Option<PathBuf>,
    pub debug_log: Option<PathBuf>,
    /// Comma-separated selectors for the cards the page search filters.
    pub search_cards: Option<String>,
}

impl ConfigFlags {
    /// Merge with `other` taking precedence for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            no_sidebar: self.no_sidebar || other.no_sidebar,
            theme: other.theme.or(self.theme),
            lookahead: other.lookahead.or(self.lookahead),
            store: other.store.clone().or_else(|| self.store.clone()),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
            search_cards: other
                .search_cards
                .clone()
                .or_else(|| self.search_cards.clone()),
        }
    }
}

/// Per-user configuration directory for dspreview.
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("dspreview"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("dspreview"),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("dspreview"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join("dspreview"));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".dspreviewrc")
}

/// Where preferences are stored unless `--store` says otherwise.
pub fn default_store_path() -> PathBuf {
    config_dir().map_or_else(
        || PathBuf::from(".dspreview-preferences.json"),
        |dir| dir.join("preferences.json"),
    )
}

/// Read a flag file. A missing file yields empty flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write `flags` as a flag file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# dspreview defaults (saved with --save)".to_string()];
    if flags.no_sidebar {
        lines.push("--no-sidebar".to_string());
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if let Some(lookahead) = flags.lookahead {
        lines.push(format!("--lookahead {lookahead}"));
    }
    if let Some(store) = &flags.store {
        lines.push(format!("--store {}", store.display()));
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(cards) = &flags.search_cards {
        // Flag files split on whitespace, so the list is saved without any.
        let compact: String = cards.split_whitespace().collect();
        lines.push(format!("--search-cards {compact}"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove a flag file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of a token list; everything else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--theme" | "--lookahead" | "--store" | "--debug-log" | "--search-cards"
        );
        let value = if takes_value && inline.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline
        };
        match (name, value) {
            ("--no-sidebar", _) => flags.no_sidebar = true,
            ("--theme", Some(v)) => flags.theme = parse_theme(v),
            ("--lookahead", Some(v)) => flags.lookahead = v.parse().ok(),
            ("--store", Some(v)) => flags.store = Some(PathBuf::from(v)),
            ("--debug-log", Some(v)) => flags.debug_log = Some(PathBuf::from(v)),
            ("--search-cards", Some(v)) => flags.search_cards = Some(v.to_string()),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
