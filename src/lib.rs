// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. widgets::WidgetKind)
    clippy::module_name_repetitions
)]

//! # dspreview
//!
//! Interactive terminal preview of a design-system page.
//!
//! A page is a tree of marked-up elements (dropdowns, tabs, accordions,
//! sortable tables, foldable code examples, a component search box, a
//! navigation drawer, a theme toggle). dspreview keeps
//! the state of every widget on the page in a headless controller and
//! projects it back onto the tree as marker classes, which the terminal
//! UI then draws:
//! - Popup and drawer families where opening one closes its siblings
//! - Table sort and filter with stable row order
//! - Page-wide component search with an empty-result note
//! - Persisted theme and language preferences
//! - Scroll-driven active section and hide-on-scroll header
//!
//! ## Architecture
//!
//! The UI uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`page`]: The element tree and selectors
//! - [`widgets`]: Widget registry, controller and projection
//! - [`observer`]: Active section and header tracking
//! - [`prefs`]: Preference stores
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod error;
pub mod observer;
pub mod page;
pub mod prefs;
pub mod ui;
pub mod widgets;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::page::{Element, Page, Selector};
    pub use crate::prefs::{MemoryStore, PreferenceStore, Theme};
    pub use crate::ui::viewport::Viewport;
    pub use crate::widgets::{Controller, Effect, Focus, Key, WidgetKind};
}
