use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::WidgetError;
use crate::observer::{FrameReport, Measurement, ScrollObserver};
use crate::page::Page;
use crate::prefs::MemoryStore;
use crate::ui::layout::PageLayout;
use crate::ui::viewport::Viewport;
use crate::ui::{HEADER_ROWS, STATUS_ROWS, document_width};
use crate::widgets::{Controller, Effect, Focus, NoticeLevel, WidgetId, WidgetKind};

/// Rows below the scroll position used to pick the active section.
pub const DEFAULT_ROW_LOOKAHEAD: usize = 3;

const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct Notice {
    level: NoticeLevel,
    message: String,
    expires_at: Instant,
}

/// Text being typed into a table's search box or the page search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInput {
    pub widget: WidgetId,
    pub query: String,
}

/// The complete application state.
///
/// Widget state lives in the [`Controller`]; everything here is about
/// presenting it in a terminal.
#[derive(Debug)]
pub struct Model {
    pub controller: Controller,
    pub observer: ScrollObserver,
    pub viewport: Viewport,
    /// Page rows as last laid out
    pub layout: PageLayout,
    pub page_path: PathBuf,
    pub sidebar_visible: bool,
    pub help_visible: bool,
    /// Active search, if typing
    pub filter: Option<FilterInput>,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub should_quit: bool,
    clipboard: Vec<String>,
    notice: Option<Notice>,
    terminal_size: (u16, u16),
}

impl Default for Model {
    fn default() -> Self {
        let controller = Controller::new(Page::empty(), Box::new(MemoryStore::new()));
        Self::new(PathBuf::new(), controller, (80, 24))
    }
}

impl Model {
    /// Wrap a bound, hydrated controller for a terminal of `size`.
    pub fn new(page_path: PathBuf, controller: Controller, size: (u16, u16)) -> Self {
        let layout = PageLayout::build(&controller);
        let observer = ScrollObserver::new(
            controller.registry().nav_links(),
            DEFAULT_ROW_LOOKAHEAD,
            usize::from(HEADER_ROWS),
        );
        let mut model = Self {
            viewport: Viewport::new(0, 0, layout.len()),
            controller,
            observer,
            layout,
            page_path,
            sidebar_visible: true,
            help_visible: false,
            filter: None,
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
            clipboard: Vec::new(),
            notice: None,
            terminal_size: size,
        };
        model.resize(size.0, size.1);
        model
    }

    #[must_use]
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.observer = ScrollObserver::new(
            self.controller.registry().nav_links(),
            lookahead,
            usize::from(HEADER_ROWS),
        );
        self.observer.notify();
        self
    }

    #[must_use]
    pub fn with_sidebar(mut self, visible: bool) -> Self {
        self.sidebar_visible = visible;
        let (width, height) = self.terminal_size;
        self.resize(width, height);
        self
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let doc_height = height.saturating_sub(HEADER_ROWS + STATUS_ROWS);
        let sidebar =
            self.sidebar_visible && !self.controller.registry().nav_links().is_empty();
        self.viewport
            .resize(document_width(width, sidebar), doc_height);
        self.observer.notify();
    }

    /// Rebuild the page rows after widget state changed.
    pub fn relayout(&mut self) {
        self.layout = PageLayout::build(&self.controller);
        self.viewport.set_total_rows(self.layout.len());
        self.observer.notify();
    }

    /// Current scroll position and section extents, in rows.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::Measurement`] while the document pane has no
    /// rows to measure.
    pub fn measure(&self) -> Result<Measurement, WidgetError> {
        if self.viewport.height() == 0 {
            return Err(WidgetError::Measurement("document pane has no rows".into()));
        }
        Ok(Measurement {
            scroll: self.viewport.offset(),
            sections: self.layout.sections().to_vec(),
        })
    }

    /// Per-frame observer tick; does nothing unless a scroll, resize or
    /// relayout was noted since the last frame.
    pub fn on_frame(&mut self) -> Option<FrameReport> {
        let measurement = self.measure();
        self.observer
            .on_frame(self.controller.page_mut(), || measurement)
    }

    pub fn header_visible(&self) -> bool {
        !self.observer.header().is_hidden()
    }

    /// Carry out what the controller asked for.
    pub fn apply_effects(&mut self) {
        for effect in self.controller.take_effects() {
            match effect {
                Effect::Persisted { key, value } => {
                    tracing::debug!(%key, %value, "preference saved");
                }
                Effect::Copy(text) => self.clipboard.push(text),
                Effect::ScrollTo(id) => {
                    if let Err(err) = self.scroll_to_section(&id) {
                        tracing::debug!(%err, "scroll target not laid out");
                    }
                }
                Effect::Notice { level, message } => self.show_notice(level, message),
            }
        }
    }

    /// Scroll so section `id` starts at the top of the pane.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::MissingElement`] when no laid-out section has
    /// that id (hidden or absent).
    pub fn scroll_to_section(&mut self, id: &str) -> Result<(), WidgetError> {
        let top = self
            .layout
            .section_top(id)
            .ok_or_else(|| WidgetError::MissingElement(format!("#{id}")))?;
        self.viewport.go_to_row(top);
        self.observer.notify();
        Ok(())
    }

    /// Scroll so the focused element is on screen.
    pub fn reveal_focus(&mut self) {
        if let Some((row, _)) = self
            .controller
            .focused_node()
            .and_then(|node| self.layout.position_of(node))
        {
            let before = self.viewport.offset();
            self.viewport.reveal(row);
            if self.viewport.offset() != before {
                self.observer.notify();
            }
        }
    }

    /// The widget `/` should search: the focused table or page search,
    /// else the first table, else the page search.
    pub fn filter_target(&self) -> Option<WidgetId> {
        let registry = self.controller.registry();
        self.controller
            .focus()
            .map(Focus::widget)
            .filter(|&id| self.controller.widget(id).is_some_and(|w| w.query().is_some()))
            .or_else(|| registry.first_of_kind(WidgetKind::Table))
            .or_else(|| registry.first_of_kind(WidgetKind::PageSearch))
    }

    /// Texts waiting to be copied by the event loop.
    pub fn take_clipboard(&mut self) -> Vec<String> {
        std::mem::take(&mut self.clipboard)
    }

    pub fn pending_clipboard(&self) -> &[String] {
        &self.clipboard
    }

    pub fn show_notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            message: message.into(),
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    pub fn active_notice(&self) -> Option<(&str, NoticeLevel)> {
        self.notice.as_ref().map(|n| (n.message.as_str(), n.level))
    }

    /// Drop an expired notice. Returns true when one was removed.
    pub fn expire_notice(&mut self, now: Instant) -> bool {
        if self.notice.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.notice = None;
            return true;
        }
        false
    }
}
