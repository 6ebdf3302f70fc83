use std::rc::Rc;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::Model;
use crate::page::NodeId;
use crate::ui::layout::{LayoutRow, RowKind};
use crate::ui::style::Palette;
use crate::widgets::projection::ACTIVE;

use super::{
    DOC_WIDTH_PERCENT, DOCUMENT_LEFT_PADDING, HEADER_ROWS, SIDEBAR_WIDTH_PERCENT, STATUS_ROWS,
    overlays, status,
};

pub fn split_main_columns(area: Rect) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(SIDEBAR_WIDTH_PERCENT),
            Constraint::Percentage(DOC_WIDTH_PERCENT),
        ])
        .split(area)
}

/// Where each part of the screen goes for the current model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub header: Option<Rect>,
    pub sidebar: Option<Rect>,
    pub document: Rect,
    pub filter: Option<Rect>,
    pub notice: Option<Rect>,
    pub status: Rect,
}

impl Areas {
    /// Document row under a screen row, if the row is in the pane.
    pub fn document_row(&self, model: &Model, column: u16, row: u16) -> Option<(usize, u16)> {
        let doc = self.document;
        if !contains(doc, column, row) {
            return None;
        }
        let line = model.viewport.offset() + usize::from(row - doc.y);
        let col = column.saturating_sub(doc.x + DOCUMENT_LEFT_PADDING);
        Some((line, col))
    }

    /// Screen position of a document row and column, if on screen.
    pub fn screen_position(&self, model: &Model, row: usize, column: u16) -> Option<(u16, u16)> {
        let doc = self.document;
        let offset = model.viewport.offset();
        let rel = u16::try_from(row.checked_sub(offset)?).ok()?;
        (rel < doc.height).then(|| {
            (
                doc.x.saturating_add(DOCUMENT_LEFT_PADDING).saturating_add(column),
                doc.y + rel,
            )
        })
    }
}

pub(super) const fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

pub fn screen_areas(model: &Model, area: Rect) -> Areas {
    let header_rows = if model.header_visible() {
        HEADER_ROWS.min(area.height)
    } else {
        0
    };
    let filter_rows = u16::from(model.filter.is_some());
    let notice_rows = u16::from(model.active_notice().is_some());
    let bottom = area.y + area.height;

    let status = Rect {
        y: bottom.saturating_sub(STATUS_ROWS),
        height: STATUS_ROWS.min(area.height),
        ..area
    };
    let filter = (filter_rows > 0).then(|| Rect {
        y: status.y.saturating_sub(1),
        height: 1,
        ..area
    });
    let notice = (notice_rows > 0).then(|| Rect {
        y: status.y.saturating_sub(1 + filter_rows),
        height: 1,
        ..area
    });
    let header = (header_rows > 0).then(|| Rect {
        height: header_rows,
        ..area
    });
    let body = Rect {
        y: area.y + header_rows,
        height: area
            .height
            .saturating_sub(header_rows + STATUS_ROWS + filter_rows + notice_rows),
        ..area
    };
    let has_links = !model.controller.registry().nav_links().is_empty();
    let (sidebar, document) = if model.sidebar_visible && has_links {
        let chunks = split_main_columns(body);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, body)
    };
    Areas {
        header,
        sidebar,
        document,
        filter,
        notice,
        status,
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let palette = Palette::for_theme(model.controller.theme());
    let areas = screen_areas(model, area);

    frame.render_widget(Block::default().style(palette.base()), area);
    if let Some(header) = areas.header {
        render_header(model, &palette, frame, header);
    }
    if let Some(sidebar) = areas.sidebar {
        render_sidebar(model, &palette, frame, sidebar);
    }
    render_document(model, &palette, frame, areas.document);
    if let Some(filter) = areas.filter {
        status::render_filter_bar(model, &palette, frame, filter);
    }
    if let Some(notice) = areas.notice {
        status::render_notice_bar(model, frame, notice);
    }
    status::render_status_bar(model, &palette, frame, areas.status);

    overlays::render_drawer(model, &palette, frame, area);
    overlays::render_menu(model, &palette, frame, area);
    if model.help_visible {
        overlays::render_help_overlay(model, &palette, frame, area);
    }
}

fn render_header(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let page = model.controller.page();
    let title = if page.title().is_empty() {
        "dspreview"
    } else {
        page.title()
    };
    let mut style = palette.bar().add_modifier(Modifier::BOLD);
    if model.observer.header().is_scrolled() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    let language = model.controller.language().unwrap_or("-");
    let right = format!("{}  {language} ", model.controller.theme());
    let pad = usize::from(area.width)
        .saturating_sub(title.chars().count() + right.chars().count() + 1);
    let text = format!(" {title}{}{right}", " ".repeat(pad));
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_sidebar(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let page = model.controller.page();
    let items: Vec<Line> = model
        .controller
        .registry()
        .nav_links()
        .iter()
        .map(|link| {
            if page.has_class(link.node, ACTIVE) {
                Line::styled(
                    format!("> {}", link.label),
                    palette.base().fg(palette.accent).add_modifier(Modifier::BOLD),
                )
            } else {
                Line::styled(format!("  {}", link.label), palette.base())
            }
        })
        .collect();
    let block = Block::default()
        .title("Contents")
        .borders(Borders::RIGHT)
        .border_style(palette.muted());
    frame.render_widget(Paragraph::new(items).block(block).style(palette.base()), area);
}

fn render_document(model: &Model, palette: &Palette, frame: &mut Frame, area: Rect) {
    let focused = model.controller.focused_node();
    let page = model.controller.page();
    let start = model.viewport.offset();
    let lines: Vec<Line> = model
        .layout
        .rows()
        .iter()
        .skip(start)
        .take(usize::from(area.height))
        .map(|row| {
            row_line(row, |node, kind| {
                palette.segment(page, node, kind, focused == Some(node))
            })
        })
        .collect();
    let content = Rect {
        x: area.x.saturating_add(DOCUMENT_LEFT_PADDING),
        width: area.width.saturating_sub(DOCUMENT_LEFT_PADDING),
        ..area
    };
    frame.render_widget(Paragraph::new(lines).style(palette.base()), content);
}

fn row_line<'a>(
    row: &'a LayoutRow,
    style: impl Fn(NodeId, RowKind) -> Style,
) -> Line<'a> {
    let mut spans = Vec::with_capacity(row.segments.len() * 2);
    let mut column = 0u16;
    for segment in &row.segments {
        if segment.column > column {
            spans.push(Span::raw(" ".repeat(usize::from(segment.column - column))));
        }
        spans.push(Span::styled(segment.text.as_str(), style(segment.node, row.kind)));
        column = segment.column.saturating_add(segment.width());
    }
    Line::from(spans)
}
