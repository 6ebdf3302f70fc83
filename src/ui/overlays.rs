use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::page::NodeId;
use crate::ui::style::Palette;
use crate::widgets::projection::ACTIVE;
use crate::widgets::{Family, Widget};

use super::render::contains;
use super::{STATUS_ROWS, screen_areas};

const DRAWER_WIDTH: u16 = 32;

/// What a click landed on inside a floating menu or drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    /// One of the menu's options.
    Item(NodeId),
    /// The frame or an empty line; the click does nothing.
    Inside,
}

fn open_widget(model: &Model, family: Family) -> Option<&Widget> {
    model
        .controller
        .open_in(family)
        .and_then(|id| model.controller.widget(id))
}

/// Popup menus open just below their toggle, or at the top of the
/// document pane when the toggle is scrolled out of view.
fn menu_rect(model: &Model, widget: &Widget, area: Rect) -> Rect {
    let areas = screen_areas(model, area);
    let label_width = widget
        .children
        .iter()
        .map(|c| c.label.width())
        .chain(std::iter::once(widget.label.width()))
        .max()
        .unwrap_or(0);
    let width = u16::try_from(label_width + 4).unwrap_or(u16::MAX).min(area.width);
    let height = u16::try_from(widget.children.len() + 2)
        .unwrap_or(u16::MAX)
        .min(areas.document.height);

    let anchor = widget
        .nodes
        .toggle
        .and_then(|toggle| model.layout.position_of(toggle))
        .and_then(|(row, column)| areas.screen_position(model, row, column));
    let (x, y) = match anchor {
        Some((x, y)) => (x, y + 1),
        None => (areas.document.x, areas.document.y),
    };
    let doc_bottom = areas.document.y + areas.document.height;
    let y = if y + height > doc_bottom {
        // no room below; open upwards
        y.saturating_sub(height + 1).max(areas.document.y)
    } else {
        y
    };
    let x = x.min((area.x + area.width).saturating_sub(width));
    Rect::new(x, y, width, height)
}

fn drawer_rect(area: Rect) -> Rect {
    Rect::new(
        area.x,
        area.y,
        DRAWER_WIDTH.min(area.width),
        area.height.saturating_sub(STATUS_ROWS),
    )
}

/// Resolve a click against whatever floats above the page. `None` means
/// the click fell through to the page.
pub fn overlay_hit(model: &Model, area: Rect, column: u16, row: u16) -> Option<OverlayHit> {
    let floating = [
        open_widget(model, Family::Popup).map(|w| (w, menu_rect(model, w, area))),
        open_widget(model, Family::Drawer).map(|w| (w, drawer_rect(area))),
    ];
    floating
        .into_iter()
        .flatten()
        .find(|(_, rect)| contains(*rect, column, row))
        .map(|(widget, rect)| {
            let index = usize::from(row.saturating_sub(rect.y + 1));
            let inner = row > rect.y && row + 1 < rect.y + rect.height;
            match widget.children.get(index).and_then(|c| c.node) {
                Some(node) if inner => OverlayHit::Item(node),
                _ => OverlayHit::Inside,
            }
        })
}

fn item_lines<'a>(model: &Model, widget: &'a Widget, palette: &Palette) -> Vec<Line<'a>> {
    let page = model.controller.page();
    let focused = model.controller.focused_node();
    widget
        .children
        .iter()
        .map(|child| {
            let mut style = palette.popup();
            if child.node.is_some_and(|n| page.has_class(n, ACTIVE)) {
                style = style.fg(palette.accent).add_modifier(Modifier::BOLD);
            }
            if child.node.is_some() && child.node == focused {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::styled(child.label.as_str(), style)
        })
        .collect()
}

pub fn render_menu(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let Some(widget) = open_widget(model, Family::Popup) else {
        return;
    };
    let popup = menu_rect(model, widget, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.popup().fg(palette.accent))
        .style(palette.popup());
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(item_lines(model, widget, palette)).block(block),
        popup,
    );
}

pub fn render_drawer(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let Some(widget) = open_widget(model, Family::Drawer) else {
        return;
    };
    let rect = drawer_rect(area);
    let title = if widget.label.is_empty() {
        "Navigation"
    } else {
        widget.label.as_str()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(palette.popup().fg(palette.accent))
        .style(palette.popup());
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(item_lines(model, widget, palette)).block(block),
        rect,
    );
}

pub fn render_help_overlay(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = palette.popup().fg(palette.accent).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::styled("Page", section_style),
        Line::raw("  j/k or Up/Down      Scroll"),
        Line::raw("  PageUp/PageDown     Page up / down"),
        Line::raw("  g / G               Top / bottom"),
        Line::raw("  s                   Toggle sidebar"),
        Line::raw(""),
        Line::styled("Widgets", section_style),
        Line::raw("  Tab / Shift-Tab     Move focus"),
        Line::raw("  Enter / Space       Activate"),
        Line::raw("  Arrows, Home/End    Move inside menus, tabs, headers"),
        Line::raw("  Esc                 Close menus and drawer"),
        Line::raw("  Mouse click         Click the element"),
        Line::raw(""),
        Line::styled("Shortcuts", section_style),
        Line::raw("  /                   Search the focused table or page"),
        Line::raw("  Alt-s               Search components"),
        Line::raw("  t                   Toggle theme"),
        Line::raw("  m                   Toggle navigation drawer"),
        Line::raw("  ?                   Toggle help"),
        Line::raw("  q / Ctrl-c          Quit"),
        Line::raw(""),
        Line::styled("Config", section_style),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ];

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(palette.popup());
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
