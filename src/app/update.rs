use crate::app::Model;
use crate::app::model::FilterInput;
use crate::page::NodeId;
use crate::widgets::{Focus, Key, NoticeLevel, WidgetId, WidgetKind};

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    ScrollUp(usize),
    ScrollDown(usize),
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    /// Terminal resized (debounced)
    Resize(u16, u16),

    // Widgets
    /// A key for the widget controller. Unconsumed arrows scroll instead.
    Widget(Key),
    /// Click on a page element
    Click(NodeId),
    /// Click on nothing in particular (status bar, empty pane)
    ClickOutside,
    ToggleTheme,
    ToggleDrawer,

    // Search
    StartFilter,
    /// Jump into the page-wide component search
    FocusPageSearch,
    FilterInput(String),
    /// Keep the typed filter and leave the search box
    FinishFilter,
    /// Drop the filter and leave the search box
    ClearFilter,

    // Chrome
    ToggleSidebar,
    ToggleHelp,
    HideHelp,
    Quit,
}

/// Apply a message. Widget effects are drained and the page re-laid out
/// before returning, so the model is always consistent with the controller.
pub fn update(mut model: Model, msg: Message) -> Model {
    let focus_before = model.controller.focus();
    let widget_change = match msg {
        Message::ScrollUp(n) => {
            model.viewport.scroll_up(n);
            model.observer.notify();
            false
        }
        Message::ScrollDown(n) => {
            model.viewport.scroll_down(n);
            model.observer.notify();
            false
        }
        Message::PageUp => {
            model.viewport.page_up();
            model.observer.notify();
            false
        }
        Message::PageDown => {
            model.viewport.page_down();
            model.observer.notify();
            false
        }
        Message::GoToTop => {
            model.viewport.go_to_top();
            model.observer.notify();
            false
        }
        Message::GoToBottom => {
            model.viewport.go_to_bottom();
            model.observer.notify();
            false
        }
        Message::Resize(width, height) => {
            model.resize(width, height);
            false
        }

        Message::Widget(key) => {
            handle_widget_key(&mut model, key);
            true
        }
        Message::Click(node) => {
            model.controller.click(node);
            if let Some(Focus::Search(widget)) = model.controller.focus()
                && model.filter.is_none()
            {
                start_filter(&mut model, widget);
            }
            true
        }
        Message::ClickOutside => {
            model.controller.close_all_families();
            true
        }
        Message::ToggleTheme => {
            let theme = model.controller.toggle_theme();
            tracing::debug!(%theme, "theme toggled from keyboard");
            true
        }
        Message::ToggleDrawer => {
            match model.controller.registry().first_of_kind(WidgetKind::MobileDrawer) {
                Some(id) => {
                    model.controller.toggle(id);
                }
                None => model.show_notice(NoticeLevel::Info, "This page has no navigation drawer"),
            }
            true
        }

        Message::StartFilter => {
            match model.filter_target() {
                Some(widget) => start_filter(&mut model, widget),
                None => model.show_notice(NoticeLevel::Info, "This page has nothing to search"),
            }
            false
        }
        Message::FocusPageSearch => {
            match model.controller.focus_page_search() {
                Some(search) => start_filter(&mut model, search),
                None => model.show_notice(NoticeLevel::Info, "This page has no search box"),
            }
            true
        }
        Message::FilterInput(query) => {
            if let Some(filter) = model.filter.as_mut() {
                filter.query = query;
                let (widget, query) = (filter.widget, filter.query.clone());
                model.controller.search(widget, &query);
            }
            true
        }
        Message::FinishFilter => {
            model.filter = None;
            false
        }
        Message::ClearFilter => {
            if let Some(filter) = model.filter.take() {
                model.controller.search(filter.widget, "");
            }
            true
        }

        Message::ToggleSidebar => {
            model.sidebar_visible = !model.sidebar_visible;
            let (width, height) = model.terminal_size();
            model.resize(width, height);
            false
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
            false
        }
        Message::HideHelp => {
            model.help_visible = false;
            false
        }
        Message::Quit => {
            model.should_quit = true;
            false
        }
    };

    if widget_change {
        model.relayout();
        model.apply_effects();
        if model.controller.focus() != focus_before {
            model.reveal_focus();
        }
    }
    model
}

fn handle_widget_key(model: &mut Model, key: Key) {
    if model.controller.handle_key(key) {
        return;
    }
    match key {
        Key::Up => model.viewport.scroll_up(1),
        Key::Down => model.viewport.scroll_down(1),
        Key::Home => model.viewport.go_to_top(),
        Key::End => model.viewport.go_to_bottom(),
        key if key.is_activation() => {
            if let Some(Focus::Search(widget)) = model.controller.focus() {
                start_filter(model, widget);
            }
            return;
        }
        _ => return,
    }
    model.observer.notify();
}

fn start_filter(model: &mut Model, widget: WidgetId) {
    let query = model
        .controller
        .widget(widget)
        .and_then(|w| w.query())
        .map(str::to_string)
        .unwrap_or_default();
    model.controller.set_focus(Some(Focus::Search(widget)));
    model.filter = Some(FilterInput { widget, query });
}
