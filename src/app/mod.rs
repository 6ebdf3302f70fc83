//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use crate::widgets::NoticeLevel;
pub use model::{DEFAULT_ROW_LOOKAHEAD, FilterInput, Model};
pub use update::{Message, update};

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::page::{Page, Selector};
use crate::prefs::{FileStore, MemoryStore, PreferenceStore, Theme};
use crate::widgets::{Controller, KindSelectors, WidgetRegistry};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    page_path: PathBuf,
    store_path: Option<PathBuf>,
    theme: Option<Theme>,
    lookahead: Option<usize>,
    sidebar_visible: bool,
    search_cards: Option<Vec<Selector>>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application for the given page file.
    pub fn new(page_path: PathBuf) -> Self {
        Self {
            page_path,
            store_path: None,
            theme: None,
            lookahead: None,
            sidebar_visible: true,
            search_cards: None,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Persist preferences to this file. Without one they only last
    /// for the session.
    pub fn with_store(mut self, path: Option<PathBuf>) -> Self {
        self.store_path = path;
        self
    }

    /// Start in this theme instead of the stored one, without saving it.
    pub const fn with_theme(mut self, theme: Option<Theme>) -> Self {
        self.theme = theme;
        self
    }

    pub const fn with_lookahead(mut self, rows: Option<usize>) -> Self {
        self.lookahead = rows;
        self
    }

    pub const fn with_sidebar_visible(mut self, visible: bool) -> Self {
        self.sidebar_visible = visible;
        self
    }

    /// Filter these elements from the page search instead of the
    /// component, token and quick-link cards.
    pub fn with_search_cards(mut self, cards: Option<Vec<Selector>>) -> Self {
        self.search_cards = cards;
        self
    }

    /// Set config paths to show in help.
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// Load the page, bind its widgets and restore stored preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the page file cannot be read or parsed.
    pub fn build_model(&self, size: (u16, u16)) -> Result<Model> {
        let page = Page::load(&self.page_path)
            .with_context(|| format!("Failed to load page {}", self.page_path.display()))?;
        let store: Box<dyn PreferenceStore> = match &self.store_path {
            Some(path) => Box::new(FileStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };

        let kinds = self.search_cards.as_deref().map_or_else(
            KindSelectors::defaults,
            KindSelectors::defaults_with_cards,
        );
        let registry = WidgetRegistry::scan_with(&page, &kinds);
        let mut controller = Controller::with_registry(page, registry, store);
        let bound = controller.bind_all();
        controller.hydrate();
        if let Some(theme) = self.theme {
            controller.force_theme(theme);
        }
        tracing::info!(
            page = %self.page_path.display(),
            widgets = controller.registry().len(),
            bound,
            "page loaded"
        );

        let mut model = Model::new(self.page_path.clone(), controller, size)
            .with_sidebar(self.sidebar_visible);
        if let Some(rows) = self.lookahead {
            model = model.with_lookahead(rows);
        }
        model.config_global_path.clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        Ok(model)
    }
}

#[cfg(test)]
mod tests;
