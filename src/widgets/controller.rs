//! The widget controller.
//!
//! Owns the page, the widget records and the preference store. Every public
//! operation mutates widget state, records [`Effect`]s for the host to carry
//! out, and re-projects state onto the page. Failures are soft: they are
//! logged and the operation becomes a no-op.

use std::mem;

use crate::error::WidgetError;
use crate::page::{NodeId, Page};
use crate::prefs::{
    LANGUAGE_KEY, PreferenceStore, THEME_KEY, Theme, load_preference, load_theme, save_preference,
};
use crate::widgets::keyboard::{Axis, Key, move_focus};
use crate::widgets::projection;
use crate::widgets::registry::WidgetRegistry;
use crate::widgets::table::{SortDirection, contains_folded};
use crate::widgets::{ChildItem, Family, Widget, WidgetId, WidgetKind, WidgetState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Side effects the host environment must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A preference was written to the store.
    Persisted { key: String, value: String },
    /// Put text on the clipboard.
    Copy(String),
    /// Bring the section with this id into view.
    ScrollTo(String),
    /// Show a transient message.
    Notice { level: NoticeLevel, message: String },
}

/// Keyboard focus position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// A widget's toggle button.
    Widget(WidgetId),
    /// An item inside a widget: menu option, tab, accordion header, column.
    Child { widget: WidgetId, index: usize },
    /// A search box: a table filter or the page-wide search.
    Search(WidgetId),
}

impl Focus {
    pub const fn widget(self) -> WidgetId {
        match self {
            Self::Widget(id) | Self::Child { widget: id, .. } | Self::Search(id) => id,
        }
    }

    fn same_stop(self, other: Self) -> bool {
        self.widget() == other.widget() && mem::discriminant(&self) == mem::discriminant(&other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Toggle(WidgetId),
    SelectOption(WidgetId, String),
    SelectTab(WidgetId, String),
    SelectAccordion(WidgetId, String),
    SortColumn(WidgetId, String),
    FocusSearch(WidgetId),
    Copy(String),
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Listener {
    node: NodeId,
    action: Action,
}

#[derive(Debug)]
pub struct Controller {
    page: Page,
    registry: WidgetRegistry,
    listeners: Vec<Listener>,
    extras_bound: bool,
    store: Box<dyn PreferenceStore>,
    theme: Theme,
    language: Option<String>,
    focus: Option<Focus>,
    effects: Vec<Effect>,
}

impl Controller {
    /// Scan `page` for widgets and take ownership of both.
    pub fn new(page: Page, store: Box<dyn PreferenceStore>) -> Self {
        let registry = WidgetRegistry::scan(&page);
        Self::with_registry(page, registry, store)
    }

    pub fn with_registry(
        page: Page,
        registry: WidgetRegistry,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let mut controller = Self {
            page,
            registry,
            listeners: Vec::new(),
            extras_bound: false,
            store,
            theme: Theme::default(),
            language: None,
            focus: None,
            effects: Vec::new(),
        };
        controller.project();
        controller
    }

    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// Mutable page access for markers no widget owns, such as the nav
    /// highlight.
    pub const fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub const fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.registry.get(id)
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub const fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Option<Focus>) {
        self.focus = focus;
    }

    /// The page node that currently has keyboard focus.
    pub fn focused_node(&self) -> Option<NodeId> {
        let focus = self.focus?;
        let widget = self.registry.get(focus.widget())?;
        match focus {
            Focus::Widget(_) => widget.nodes.toggle.or(widget.nodes.container),
            Focus::Search(_) => widget.nodes.search,
            Focus::Child { index, .. } => match widget.table() {
                Some(table) => table.columns.get(index)?.node,
                None => widget.children.get(index)?.node,
            },
        }
    }

    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }

    /// Drain effects recorded since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        mem::take(&mut self.effects)
    }

    /// The open member of `family`, if any.
    pub fn open_in(&self, family: Family) -> Option<WidgetId> {
        self.registry
            .widgets()
            .iter()
            .find(|w| w.family() == Some(family) && w.is_open())
            .map(|w| w.id)
    }

    /// Attach listeners to every widget, copy target and nav link that has
    /// none yet. Returns the number of listeners added.
    pub fn bind_all(&mut self) -> usize {
        let before = self.listeners.len();
        let mut added = Vec::new();
        for widget in self.registry.widgets_mut() {
            if widget.bound {
                continue;
            }
            widget.bound = true;
            added.extend(listeners_for(widget));
        }
        if !self.extras_bound {
            self.extras_bound = true;
            added.extend(self.registry.copy_targets().iter().map(|t| Listener {
                node: t.node,
                action: Action::Copy(t.text.clone()),
            }));
            added.extend(self.registry.nav_links().iter().map(|l| Listener {
                node: l.node,
                action: Action::Navigate(l.target.clone()),
            }));
        }
        self.listeners.extend(added);
        let count = self.listeners.len() - before;
        tracing::debug!(added = count, total = self.listeners.len(), "bound listeners");
        count
    }

    /// Read the stored theme and language.
    ///
    /// A missing or malformed theme falls back to dark. A stored language is
    /// only accepted when it names one of the language options on the page.
    pub fn hydrate(&mut self) {
        let theme = load_theme(self.store.as_ref()).unwrap_or_default();
        self.apply_theme(theme);

        if let Some(stored) = load_preference(self.store.as_ref(), LANGUAGE_KEY) {
            let known = self
                .registry
                .of_kind(WidgetKind::LanguageSelector)
                .flat_map(|w| &w.children)
                .any(|c| option_value(c) == stored);
            if known {
                self.apply_language(&stored);
            } else {
                tracing::debug!(value = %stored, "ignoring unknown stored language");
            }
        }
        self.project();
    }

    /// Open or close a single-open widget, or flip the theme for a theme
    /// toggle. Opening closes the rest of the family first.
    pub fn toggle(&mut self, id: WidgetId) -> bool {
        let result = self.try_toggle(id);
        self.finish("toggle", result)
    }

    /// Show `theme` without writing it to the store. Used for a theme forced
    /// from the command line.
    pub fn force_theme(&mut self, theme: Theme) {
        self.apply_theme(theme);
        self.project();
    }

    /// Flip the theme whether or not the page has a theme toggle.
    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.project();
        self.theme
    }

    pub fn select_option(&mut self, id: WidgetId, key: &str) -> bool {
        let result = self.try_select_option(id, key);
        self.finish("select_option", result)
    }

    pub fn select_tab(&mut self, id: WidgetId, key: &str) -> bool {
        let result = self.try_select_tab(id, key);
        self.finish("select_tab", result)
    }

    pub fn select_accordion_item(&mut self, id: WidgetId, key: &str) -> bool {
        let result = self.try_select_accordion_item(id, key);
        self.finish("select_accordion_item", result)
    }

    pub fn sort_table(&mut self, id: WidgetId, column: &str, direction: SortDirection) -> bool {
        let result = self.try_sort_table(id, column, Some(direction)).map(drop);
        self.finish("sort_table", result)
    }

    /// Header activation: same column flips, a new column starts ascending.
    pub fn activate_column(&mut self, id: WidgetId, column: &str) -> Option<SortDirection> {
        let result = self.try_sort_table(id, column, None);
        self.finish_with("activate_column", result)
    }

    /// Returns the number of visible rows after filtering.
    pub fn filter_table(&mut self, id: WidgetId, query: &str) -> Option<usize> {
        let result = self.try_filter_table(id, query);
        self.finish_with("filter_table", result)
    }

    /// Hide cards whose text does not contain `query`, ignoring case.
    /// Returns the number of cards left visible.
    pub fn search_page(&mut self, id: WidgetId, query: &str) -> Option<usize> {
        let result = self.try_search_page(id, query);
        self.finish_with("search_page", result)
    }

    /// Filter whichever searchable widget `id` is: a table or the page search.
    pub fn search(&mut self, id: WidgetId, query: &str) -> Option<usize> {
        match self.registry.get(id)?.kind {
            WidgetKind::PageSearch => self.search_page(id, query),
            _ => self.filter_table(id, query),
        }
    }

    /// Move focus to the first page search box, if the page has one.
    pub fn focus_page_search(&mut self) -> Option<WidgetId> {
        let id = self
            .registry
            .of_kind(WidgetKind::PageSearch)
            .find(|w| w.nodes.search.is_some())?
            .id;
        self.focus = Some(Focus::Search(id));
        Some(id)
    }

    /// Close every dropdown, language selector and drawer. Returns how many
    /// were open.
    pub fn close_all_families(&mut self) -> usize {
        let closed = self.close_families();
        self.project();
        closed
    }

    /// Dispatch a click on `target`.
    ///
    /// A click outside every open popup or drawer closes them all. Then
    /// listeners fire from the target up through its ancestors. Returns
    /// true when any listener fired.
    pub fn click(&mut self, target: NodeId) -> bool {
        if self.page.node(target).is_none() {
            tracing::debug!(node = %target, "click on unknown node");
            return false;
        }
        let inside_open = self
            .registry
            .widgets()
            .iter()
            .filter(|w| w.is_open())
            .any(|w| widget_contains(&self.page, w, target));
        if !inside_open {
            self.close_families();
        }

        let actions: Vec<Action> = self
            .page
            .ancestors_inclusive(target)
            .flat_map(|node| {
                self.listeners
                    .iter()
                    .filter(move |l| l.node == node)
                    .map(|l| l.action.clone())
            })
            .collect();
        let fired = !actions.is_empty();
        for action in actions {
            self.dispatch(action);
        }
        self.project();
        fired
    }

    /// Keyboard handling. Returns true when the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        let handled = match key {
            Key::Escape => {
                let closed = self.close_families();
                closed > 0
            }
            Key::Tab => self.cycle_focus(true),
            Key::BackTab => self.cycle_focus(false),
            key if key.is_activation() => self.activate_focused(),
            key => self.move_focus_within(key),
        };
        if handled {
            self.project();
        }
        handled
    }

    /// Focus stops in Tab order.
    pub fn focus_ring(&self) -> Vec<Focus> {
        let mut ring = Vec::new();
        for widget in self.registry.widgets() {
            let id = widget.id;
            match widget.kind {
                WidgetKind::Dropdown
                | WidgetKind::LanguageSelector
                | WidgetKind::CodeExample
                | WidgetKind::MobileDrawer
                | WidgetKind::ThemeToggle => ring.push(Focus::Widget(id)),
                WidgetKind::PageSearch => {
                    if widget.nodes.search.is_some() {
                        ring.push(Focus::Search(id));
                    }
                }
                WidgetKind::Tabs if !widget.children.is_empty() => ring.push(Focus::Child {
                    widget: id,
                    index: widget
                        .active_key()
                        .and_then(|k| widget.child_index(k))
                        .unwrap_or(0),
                }),
                WidgetKind::Accordion if !widget.children.is_empty() => {
                    ring.push(Focus::Child { widget: id, index: 0 });
                }
                WidgetKind::Table => {
                    if widget.nodes.search.is_some() {
                        ring.push(Focus::Search(id));
                    }
                    if let Some(index) = widget
                        .table()
                        .and_then(|t| t.columns.iter().position(|c| c.sortable))
                    {
                        ring.push(Focus::Child { widget: id, index });
                    }
                }
                WidgetKind::Tabs | WidgetKind::Accordion => {}
            }
        }
        ring
    }

    fn finish(&mut self, op: &'static str, result: Result<(), WidgetError>) -> bool {
        self.finish_with(op, result).is_some()
    }

    fn finish_with<T>(&mut self, op: &'static str, result: Result<T, WidgetError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.project();
                Some(value)
            }
            Err(err) => {
                tracing::debug!(op, %err, "widget operation ignored");
                None
            }
        }
    }

    fn project(&mut self) {
        projection::apply(&mut self.page, &self.registry, self.theme);
    }

    fn widget_of(&self, id: WidgetId) -> Result<&Widget, WidgetError> {
        self.registry.get(id).ok_or(WidgetError::UnknownWidget(id))
    }

    fn widget_mut(&mut self, id: WidgetId) -> Result<&mut Widget, WidgetError> {
        self.registry
            .get_mut(id)
            .ok_or(WidgetError::UnknownWidget(id))
    }

    fn expect_kind(widget: &Widget, expected: WidgetKind) -> Result<(), WidgetError> {
        if widget.kind == expected {
            Ok(())
        } else {
            Err(WidgetError::WrongKind {
                widget: widget.id,
                expected,
                actual: widget.kind,
            })
        }
    }

    fn try_toggle(&mut self, id: WidgetId) -> Result<(), WidgetError> {
        let widget = self.widget_of(id)?;
        match widget.kind {
            WidgetKind::ThemeToggle => {
                self.set_theme(self.theme.toggled());
                return Ok(());
            }
            WidgetKind::CodeExample => {
                if let WidgetState::Code { collapsed } = &mut self.widget_mut(id)?.state {
                    *collapsed = !*collapsed;
                }
                return Ok(());
            }
            _ => {}
        }
        let Some(family) = widget.family() else {
            return Err(WidgetError::Unsupported {
                widget: id,
                operation: "toggle",
            });
        };
        let opening = !widget.is_open();
        if opening {
            for other in self.registry.widgets_mut() {
                if other.id != id && other.family() == Some(family) {
                    other.close();
                }
            }
        }
        self.widget_mut(id)?.set_open(opening);
        if !opening {
            self.unfocus_children_of(id);
        }
        Ok(())
    }

    fn try_select_option(&mut self, id: WidgetId, key: &str) -> Result<(), WidgetError> {
        let widget = self.widget_of(id)?;
        let child = widget.child(key).ok_or_else(|| WidgetError::UnknownChild {
            widget: id,
            key: key.to_string(),
        })?;
        match widget.kind {
            WidgetKind::LanguageSelector => {
                let value = option_value(child).to_string();
                self.apply_language(&value);
                self.persist(LANGUAGE_KEY, &value);
            }
            WidgetKind::Dropdown => {
                if let Some(target) = key.strip_prefix('#') {
                    self.effects.push(Effect::ScrollTo(target.to_string()));
                }
                if let WidgetState::Menu { selected, .. } = &mut self.widget_mut(id)?.state {
                    *selected = Some(key.to_string());
                }
            }
            WidgetKind::MobileDrawer => self.effects.push(Effect::ScrollTo(key.to_string())),
            _ => {
                return Err(WidgetError::Unsupported {
                    widget: id,
                    operation: "select_option",
                });
            }
        }
        self.close_families();
        Ok(())
    }

    fn try_select_tab(&mut self, id: WidgetId, key: &str) -> Result<(), WidgetError> {
        let widget = self.widget_mut(id)?;
        Self::expect_kind(widget, WidgetKind::Tabs)?;
        if widget.child(key).is_none() {
            return Err(WidgetError::UnknownChild {
                widget: id,
                key: key.to_string(),
            });
        }
        if let WidgetState::Tabs { active } = &mut widget.state {
            *active = Some(key.to_string());
        }
        Ok(())
    }

    fn try_select_accordion_item(&mut self, id: WidgetId, key: &str) -> Result<(), WidgetError> {
        let widget = self.widget_mut(id)?;
        Self::expect_kind(widget, WidgetKind::Accordion)?;
        if widget.child(key).is_none() {
            return Err(WidgetError::UnknownChild {
                widget: id,
                key: key.to_string(),
            });
        }
        if let WidgetState::Accordion { expanded, multiple } = &mut widget.state {
            let was_expanded = expanded.remove(key);
            if !*multiple {
                expanded.clear();
            }
            if !was_expanded {
                expanded.insert(key.to_string());
            }
        }
        Ok(())
    }

    /// Sort by `column`; `None` means header activation semantics.
    fn try_sort_table(
        &mut self,
        id: WidgetId,
        column: &str,
        direction: Option<SortDirection>,
    ) -> Result<SortDirection, WidgetError> {
        let widget = self.widget_mut(id)?;
        Self::expect_kind(widget, WidgetKind::Table)?;
        let WidgetState::Table(table) = &mut widget.state else {
            return Err(WidgetError::Unsupported {
                widget: id,
                operation: "sort",
            });
        };
        let missing = || WidgetError::UnknownChild {
            widget: id,
            key: column.to_string(),
        };
        let index = table.column_index(column).ok_or_else(missing)?;
        Ok(match direction {
            Some(direction) => {
                table.sort_by(index, direction);
                direction
            }
            None if table.columns[index].sortable => table.activate_column(index),
            None => return Err(missing()),
        })
    }

    fn try_filter_table(&mut self, id: WidgetId, query: &str) -> Result<usize, WidgetError> {
        let widget = self.widget_mut(id)?;
        Self::expect_kind(widget, WidgetKind::Table)?;
        match &mut widget.state {
            WidgetState::Table(table) => Ok(table.filter(query)),
            _ => Err(WidgetError::Unsupported {
                widget: id,
                operation: "filter",
            }),
        }
    }

    fn try_search_page(&mut self, id: WidgetId, query: &str) -> Result<usize, WidgetError> {
        let widget = self.widget_mut(id)?;
        Self::expect_kind(widget, WidgetKind::PageSearch)?;
        let needle = query.to_lowercase();
        let misses: Vec<String> = widget
            .children
            .iter()
            .filter(|c| !contains_folded(&c.label, &needle))
            .map(|c| c.key.clone())
            .collect();
        let total = widget.children.len();
        let WidgetState::Search { query: current, hidden } = &mut widget.state else {
            return Err(WidgetError::Unsupported {
                widget: id,
                operation: "search",
            });
        };
        query.clone_into(current);
        *hidden = misses.into_iter().collect();
        Ok(total - hidden.len())
    }

    fn close_families(&mut self) -> usize {
        let mut closed = Vec::new();
        for widget in self.registry.widgets_mut() {
            if widget.close() {
                closed.push(widget.id);
            }
        }
        for id in &closed {
            self.unfocus_children_of(*id);
        }
        closed.len()
    }

    /// Focus inside a menu that is closing moves back to its toggle.
    fn unfocus_children_of(&mut self, id: WidgetId) {
        if let Some(Focus::Child { widget, .. }) = self.focus
            && widget == id
        {
            self.focus = Some(Focus::Widget(id));
        }
    }

    fn dispatch(&mut self, action: Action) {
        let result = match &action {
            Action::Toggle(id) => self.try_toggle(*id),
            Action::SelectOption(id, key) => self.try_select_option(*id, key),
            Action::SelectTab(id, key) => self.try_select_tab(*id, key),
            Action::SelectAccordion(id, key) => self.try_select_accordion_item(*id, key),
            Action::SortColumn(id, key) => self.try_sort_table(*id, key, None).map(drop),
            Action::FocusSearch(id) => {
                self.focus = Some(Focus::Search(*id));
                Ok(())
            }
            Action::Copy(text) => {
                self.effects.push(Effect::Copy(text.clone()));
                Ok(())
            }
            Action::Navigate(target) => {
                self.effects.push(Effect::ScrollTo(target.clone()));
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::debug!(?action, %err, "listener ignored");
        }
    }

    fn set_theme(&mut self, theme: Theme) {
        self.apply_theme(theme);
        self.persist(THEME_KEY, theme.as_str());
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        for widget in self.registry.widgets_mut() {
            if let WidgetState::Theme(current) = &mut widget.state {
                *current = theme;
            }
        }
    }

    /// Mirror a language choice onto every language selector.
    fn apply_language(&mut self, value: &str) {
        self.language = Some(value.to_string());
        for widget in self.registry.widgets_mut() {
            if widget.kind != WidgetKind::LanguageSelector {
                continue;
            }
            let key = widget
                .children
                .iter()
                .find(|c| option_value(c) == value)
                .map(|c| c.key.clone());
            widget.label = value.to_string();
            if let WidgetState::Menu { selected, .. } = &mut widget.state {
                *selected = key;
            }
        }
    }

    fn persist(&mut self, key: &str, value: &str) {
        match save_preference(self.store.as_mut(), key, value) {
            Ok(()) => self.effects.push(Effect::Persisted {
                key: key.to_string(),
                value: value.to_string(),
            }),
            Err(err) => {
                tracing::warn!(key, %err, "failed to persist preference");
                self.effects.push(Effect::Notice {
                    level: NoticeLevel::Error,
                    message: format!("Could not save {key}"),
                });
            }
        }
    }

    fn cycle_focus(&mut self, forward: bool) -> bool {
        let ring = self.focus_ring();
        if ring.is_empty() {
            return false;
        }
        let position = self
            .focus
            .and_then(|f| ring.iter().position(|stop| stop.same_stop(f)));
        let next = match (position, forward) {
            (Some(i), true) => (i + 1) % ring.len(),
            (Some(i), false) => (i + ring.len() - 1) % ring.len(),
            (None, true) => 0,
            (None, false) => ring.len() - 1,
        };
        self.focus = Some(ring[next]);
        true
    }

    fn move_focus_within(&mut self, key: Key) -> bool {
        if let Some(open) = self.registry.widgets().iter().find(|w| w.is_open()) {
            let current = match self.focus {
                Some(Focus::Child { widget, index }) if widget == open.id => Some(index),
                _ => None,
            };
            let Some(index) = move_focus(current, open.children.len(), key, Axis::Vertical) else {
                return false;
            };
            self.focus = Some(Focus::Child {
                widget: open.id,
                index,
            });
            return true;
        }

        let Some(Focus::Child { widget, index }) = self.focus else {
            return false;
        };
        let Some(w) = self.registry.get(widget) else {
            return false;
        };
        let (len, axis) = match w.kind {
            WidgetKind::Tabs => (w.children.len(), Axis::Horizontal),
            WidgetKind::Accordion => (w.children.len(), Axis::Vertical),
            WidgetKind::Table => (w.table().map_or(0, |t| t.columns.len()), Axis::Horizontal),
            _ => return false,
        };
        let Some(index) = move_focus(Some(index), len, key, axis) else {
            return false;
        };
        self.focus = Some(Focus::Child { widget, index });
        true
    }

    fn activate_focused(&mut self) -> bool {
        match self.focus {
            Some(Focus::Widget(id)) => {
                if let Err(err) = self.try_toggle(id) {
                    tracing::debug!(%err, "activation ignored");
                    return false;
                }
                if let Some(widget) = self.registry.get(id)
                    && widget.is_open()
                    && !widget.children.is_empty()
                {
                    let index = widget
                        .active_key()
                        .and_then(|k| widget.child_index(k))
                        .unwrap_or(0);
                    self.focus = Some(Focus::Child { widget: id, index });
                }
                true
            }
            Some(Focus::Child { widget, index }) => {
                let Some(w) = self.registry.get(widget) else {
                    return false;
                };
                let key = match w.kind {
                    WidgetKind::Table => w
                        .table()
                        .and_then(|t| t.columns.get(index))
                        .map(|c| c.key.clone()),
                    _ => w.children.get(index).map(|c| c.key.clone()),
                };
                let Some(key) = key else {
                    return false;
                };
                let result = match w.kind {
                    WidgetKind::Dropdown
                    | WidgetKind::LanguageSelector
                    | WidgetKind::MobileDrawer => self.try_select_option(widget, &key),
                    WidgetKind::Tabs => self.try_select_tab(widget, &key),
                    WidgetKind::Accordion => self.try_select_accordion_item(widget, &key),
                    WidgetKind::Table => self.try_sort_table(widget, &key, None).map(drop),
                    WidgetKind::ThemeToggle | WidgetKind::CodeExample => self.try_toggle(widget),
                    WidgetKind::PageSearch => Err(WidgetError::Unsupported {
                        widget,
                        operation: "activate",
                    }),
                };
                if let Err(err) = result {
                    tracing::debug!(%err, "activation ignored");
                    return false;
                }
                true
            }
            Some(Focus::Search(_)) | None => false,
        }
    }
}

/// The value a language option stands for.
fn option_value(child: &ChildItem) -> &str {
    child.value.as_deref().unwrap_or(&child.label)
}

fn widget_contains(page: &Page, widget: &Widget, target: NodeId) -> bool {
    [widget.nodes.container, widget.nodes.toggle, widget.nodes.panel]
        .into_iter()
        .flatten()
        .any(|node| page.contains(node, target))
}

fn listeners_for(widget: &Widget) -> Vec<Listener> {
    let id = widget.id;
    let mut listeners = Vec::new();
    let mut on = |node: Option<NodeId>, action: Action| {
        if let Some(node) = node {
            listeners.push(Listener { node, action });
        }
    };
    match widget.kind {
        WidgetKind::Dropdown | WidgetKind::LanguageSelector | WidgetKind::MobileDrawer => {
            on(widget.nodes.toggle, Action::Toggle(id));
            for child in &widget.children {
                on(child.node, Action::SelectOption(id, child.key.clone()));
            }
        }
        WidgetKind::ThemeToggle | WidgetKind::CodeExample => {
            on(widget.nodes.toggle, Action::Toggle(id));
        }
        WidgetKind::PageSearch => on(widget.nodes.search, Action::FocusSearch(id)),
        WidgetKind::Tabs => {
            for child in &widget.children {
                on(child.node, Action::SelectTab(id, child.key.clone()));
            }
        }
        WidgetKind::Accordion => {
            for child in &widget.children {
                on(child.node, Action::SelectAccordion(id, child.key.clone()));
            }
        }
        WidgetKind::Table => {
            on(widget.nodes.search, Action::FocusSearch(id));
            if let Some(table) = widget.table() {
                for column in table.columns.iter().filter(|c| c.sortable) {
                    on(column.node, Action::SortColumn(id, column.key.clone()));
                }
            }
        }
    }
    listeners
}
