use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, Message, Model};
use crate::ui::{OverlayHit, overlay_hit, screen_areas};
use crate::widgets::Key;

use super::event_loop::ResizeDebouncer;

const WHEEL_ROWS: usize = 3;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(key, model),
            Event::Mouse(mouse) => handle_mouse(mouse, model),
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize_debouncer.queue(w, h, now_ms);
                None
            }
            _ => None,
        }
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?' | 'q') | KeyCode::F(1) => Some(Message::HideHelp),
            _ => None,
        };
    }

    if let Some(filter) = model.filter.as_ref() {
        return match key.code {
            KeyCode::Esc => Some(Message::ClearFilter),
            KeyCode::Enter => Some(Message::FinishFilter),
            KeyCode::Backspace => {
                let mut next = filter.query.clone();
                next.pop();
                Some(Message::FilterInput(next))
            }
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                let mut next = filter.query.clone();
                next.push(c);
                Some(Message::FilterInput(next))
            }
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Message::Quit)
        }
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),

        // Page scrolling
        KeyCode::Char('j') => Some(Message::ScrollDown(1)),
        KeyCode::Char('k') => Some(Message::ScrollUp(1)),
        KeyCode::PageDown => Some(Message::PageDown),
        KeyCode::PageUp => Some(Message::PageUp),
        KeyCode::Char('g') => Some(Message::GoToTop),
        KeyCode::Char('G') => Some(Message::GoToBottom),

        // Shortcuts
        KeyCode::Char('s' | 'S') if key.modifiers.contains(KeyModifiers::ALT) => {
            Some(Message::FocusPageSearch)
        }
        KeyCode::Char('/') => Some(Message::StartFilter),
        KeyCode::Char('t') => Some(Message::ToggleTheme),
        KeyCode::Char('m') => Some(Message::ToggleDrawer),
        KeyCode::Char('s') => Some(Message::ToggleSidebar),

        // Widget keys; the controller decides, unconsumed arrows scroll
        code => widget_key(code).map(Message::Widget),
    }
}

const fn widget_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Esc => Key::Escape,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        _ => return None,
    })
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
            .then_some(Message::HideHelp);
    }
    let (width, height) = model.terminal_size();
    let area = Rect::new(0, 0, width, height);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            click_message(model, area, mouse.column, mouse.row)
        }
        MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_ROWS)),
        MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_ROWS)),
        _ => None,
    }
}

/// Resolve a left click against overlays, then the sidebar, then the page.
/// Clicks on an overlay's frame do nothing.
fn click_message(model: &Model, area: Rect, column: u16, row: u16) -> Option<Message> {
    match overlay_hit(model, area, column, row) {
        Some(OverlayHit::Item(node)) => return Some(Message::Click(node)),
        Some(OverlayHit::Inside) => return None,
        None => {}
    }

    let areas = screen_areas(model, area);
    if let Some(sidebar) = areas.sidebar
        && point_in_rect(column, row, sidebar)
    {
        // The title occupies the first row
        let index = usize::from(row.saturating_sub(sidebar.y + 1));
        return Some(match model.controller.registry().nav_links().get(index) {
            Some(link) if row > sidebar.y => Message::Click(link.node),
            _ => Message::ClickOutside,
        });
    }

    Some(
        areas
            .document_row(model, column, row)
            .and_then(|(line, col)| model.layout.hit(line, col))
            .map_or(Message::ClickOutside, Message::Click),
    )
}

const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
