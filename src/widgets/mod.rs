//! Interactive widgets and the controller that drives them.
//!
//! Every widget instance is an explicit state record ([`Widget`]) owned by
//! the [`Controller`]. Page markers (`open`, `active`, `expanded`, hidden
//! rows) are written by [`projection`] from that state and never read back.
//!
//! - [`registry`]: which page structures count as which widget kind
//! - [`controller`]: open/close/select semantics and event dispatch
//! - [`table`]: sorting and filtering of table rows
//! - [`keyboard`]: key vocabulary and focus movement

pub mod controller;
pub mod keyboard;
pub mod projection;
pub mod registry;
pub mod table;

pub use controller::{Controller, Effect, Focus, NoticeLevel};
pub use keyboard::Key;
pub use registry::{CopyTarget, KindSelectors, NavLink, WidgetRegistry};
pub use table::{Column, Row, SortDirection, TableModel};

use std::collections::BTreeSet;
use std::fmt;

use crate::page::NodeId;
use crate::prefs::Theme;

/// Stable identity of a widget inside one registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub usize);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Dropdown,
    LanguageSelector,
    /// The page-wide `#search` box over component and token cards.
    PageSearch,
    Tabs,
    Accordion,
    Table,
    CodeExample,
    MobileDrawer,
    ThemeToggle,
}

impl WidgetKind {
    pub const ALL: [Self; 9] = [
        Self::Dropdown,
        Self::LanguageSelector,
        Self::PageSearch,
        Self::Tabs,
        Self::Accordion,
        Self::Table,
        Self::CodeExample,
        Self::MobileDrawer,
        Self::ThemeToggle,
    ];

    /// Mutual-exclusion family, for kinds that are single-open.
    pub const fn family(self) -> Option<Family> {
        match self {
            Self::Dropdown | Self::LanguageSelector => Some(Family::Popup),
            Self::MobileDrawer => Some(Family::Drawer),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Dropdown => "dropdown",
            Self::LanguageSelector => "language-selector",
            Self::PageSearch => "page-search",
            Self::Tabs => "tabs",
            Self::Accordion => "accordion",
            Self::Table => "table",
            Self::CodeExample => "code-example",
            Self::MobileDrawer => "mobile-drawer",
            Self::ThemeToggle => "theme-toggle",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A group of widgets of which at most one may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Header dropdowns and language selectors share one popup slot.
    Popup,
    Drawer,
}

/// A selectable sub-item: menu option, tab, accordion item, drawer link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildItem {
    pub key: String,
    pub label: String,
    /// Value written to the preference store when this item is chosen.
    pub value: Option<String>,
    /// The clickable element for this item.
    pub node: Option<NodeId>,
    /// Panel revealed by this item (tab panel, accordion content).
    pub panel: Option<NodeId>,
}

impl ChildItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value: None,
            node: None,
            panel: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub const fn with_node(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    #[must_use]
    pub const fn with_panel(mut self, panel: NodeId) -> Self {
        self.panel = Some(panel);
        self
    }
}

/// Per-kind mutable state.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetState {
    Menu {
        open: bool,
        selected: Option<String>,
    },
    Drawer {
        open: bool,
    },
    Tabs {
        active: Option<String>,
    },
    Accordion {
        expanded: BTreeSet<String>,
        multiple: bool,
    },
    Table(TableModel),
    /// Page search: the raw query and the keys of cards it hides.
    Search {
        query: String,
        hidden: BTreeSet<String>,
    },
    Code {
        collapsed: bool,
    },
    Theme(Theme),
}

/// Structural nodes a widget is wired to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetNodes {
    pub container: Option<NodeId>,
    /// Toggle button (menus, drawer, theme switch).
    pub toggle: Option<NodeId>,
    /// Popup menu, drawer panel or table body.
    pub panel: Option<NodeId>,
    /// Search input (tables, page search).
    pub search: Option<NodeId>,
}

/// One interactive widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub label: String,
    pub nodes: WidgetNodes,
    pub children: Vec<ChildItem>,
    pub state: WidgetState,
    pub(crate) bound: bool,
}

impl Widget {
    /// Create a widget in its initial state for `kind`.
    pub fn new(id: WidgetId, kind: WidgetKind, label: impl Into<String>) -> Self {
        let state = match kind {
            WidgetKind::Dropdown | WidgetKind::LanguageSelector => WidgetState::Menu {
                open: false,
                selected: None,
            },
            WidgetKind::MobileDrawer => WidgetState::Drawer { open: false },
            WidgetKind::Tabs => WidgetState::Tabs { active: None },
            WidgetKind::Accordion => WidgetState::Accordion {
                expanded: BTreeSet::new(),
                multiple: false,
            },
            WidgetKind::Table => WidgetState::Table(TableModel::default()),
            WidgetKind::PageSearch => WidgetState::Search {
                query: String::new(),
                hidden: BTreeSet::new(),
            },
            WidgetKind::CodeExample => WidgetState::Code { collapsed: true },
            WidgetKind::ThemeToggle => WidgetState::Theme(Theme::default()),
        };
        Self {
            id,
            kind,
            label: label.into(),
            nodes: WidgetNodes::default(),
            children: Vec::new(),
            state,
            bound: false,
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = ChildItem>) -> Self {
        self.children.extend(children);
        if let WidgetState::Tabs { active } = &mut self.state
            && active.is_none()
        {
            *active = self.children.first().map(|c| c.key.clone());
        }
        self
    }

    #[must_use]
    pub const fn with_nodes(mut self, nodes: WidgetNodes) -> Self {
        self.nodes = nodes;
        self
    }

    #[must_use]
    pub fn with_state(mut self, state: WidgetState) -> Self {
        self.state = state;
        self
    }

    pub const fn family(&self) -> Option<Family> {
        self.kind.family()
    }

    pub const fn is_bound(&self) -> bool {
        self.bound
    }

    /// Open flag for single-open widgets; false for everything else.
    pub const fn is_open(&self) -> bool {
        matches!(
            self.state,
            WidgetState::Menu { open: true, .. } | WidgetState::Drawer { open: true }
        )
    }

    /// Active child for tabs, selected option for menus.
    pub fn active_key(&self) -> Option<&str> {
        match &self.state {
            WidgetState::Tabs { active } => active.as_deref(),
            WidgetState::Menu { selected, .. } => selected.as_deref(),
            _ => None,
        }
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        matches!(&self.state, WidgetState::Accordion { expanded, .. } if expanded.contains(key))
    }

    pub fn child(&self, key: &str) -> Option<&ChildItem> {
        self.children.iter().find(|c| c.key == key)
    }

    pub fn child_index(&self, key: &str) -> Option<usize> {
        self.children.iter().position(|c| c.key == key)
    }

    pub const fn table(&self) -> Option<&TableModel> {
        match &self.state {
            WidgetState::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Current search text of a table or the page search.
    pub fn query(&self) -> Option<&str> {
        match &self.state {
            WidgetState::Table(table) => Some(table.query()),
            WidgetState::Search { query, .. } => Some(query),
            _ => None,
        }
    }

    /// Rows or cards left visible by the current query.
    pub fn match_count(&self) -> Option<usize> {
        match &self.state {
            WidgetState::Table(table) => Some(table.visible_count()),
            WidgetState::Search { hidden, .. } => Some(self.children.len() - hidden.len()),
            _ => None,
        }
    }

    pub const fn is_collapsed(&self) -> bool {
        matches!(self.state, WidgetState::Code { collapsed: true })
    }

    pub const fn theme(&self) -> Option<Theme> {
        match self.state {
            WidgetState::Theme(theme) => Some(theme),
            _ => None,
        }
    }

    /// Force a single-open widget closed. Returns true if it was open.
    pub(crate) const fn close(&mut self) -> bool {
        match &mut self.state {
            WidgetState::Menu { open, .. } | WidgetState::Drawer { open } => {
                let was_open = *open;
                *open = false;
                was_open
            }
            _ => false,
        }
    }

    pub(crate) const fn set_open(&mut self, value: bool) {
        if let WidgetState::Menu { open, .. } | WidgetState::Drawer { open } = &mut self.state {
            *open = value;
        }
    }
}
