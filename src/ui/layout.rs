//! Flattens the page into terminal rows.
//!
//! Only what a reader would see is laid out: hidden table rows and cards,
//! inactive tab panels, collapsed accordion content, folded code examples
//! and the sidebar are skipped. Popup
//! menus and the drawer float above the page and are drawn as overlays.
//!
//! The layout is also the measurement source for the scroll observer: every
//! `section[id]` records the rows it spans.

use std::collections::{HashMap, HashSet};

use unicode_width::UnicodeWidthStr;

use crate::observer::ViewportSection;
use crate::page::{NodeId, Page, Selector};
use crate::widgets::projection::{ACTIVE, EXPANDED, HIDDEN};
use crate::widgets::{Controller, SortDirection};

/// Columns between table cells.
const CELL_GAP: u16 = 2;
/// Extra indent for nested content (panels, lists).
const NEST_INDENT: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Heading(u8),
    Text,
    Control,
    Code,
    TableHead,
    TableRow,
    Swatch,
    Blank,
}

/// A clickable run of text inside a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub node: NodeId,
    pub text: String,
    /// First column, counted from the left edge of the document pane.
    pub column: u16,
}

impl Segment {
    pub fn width(&self) -> u16 {
        u16::try_from(self.text.width()).unwrap_or(u16::MAX)
    }

    fn covers(&self, column: u16) -> bool {
        self.column <= column && column < self.column.saturating_add(self.width())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRow {
    pub kind: RowKind,
    /// The element the row was produced for.
    pub node: NodeId,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    rows: Vec<LayoutRow>,
    sections: Vec<ViewportSection>,
    positions: HashMap<NodeId, (usize, u16)>,
}

impl PageLayout {
    /// Lay out the controller's page as it currently looks.
    pub fn build(controller: &Controller) -> Self {
        let page = controller.page();
        let mut floating = HashSet::new();
        let mut folded = HashSet::new();
        let mut queries = HashMap::new();
        for widget in controller.registry().widgets() {
            if let Some(panel) = widget.nodes.panel {
                if widget.family().is_some() {
                    floating.insert(panel);
                } else if widget.is_collapsed() {
                    folded.insert(panel);
                }
            }
            if let (Some(search), Some(query)) = (widget.nodes.search, widget.query()) {
                queries.insert(search, query.to_string());
            }
        }
        let mut builder = Builder {
            page,
            floating,
            folded,
            queries,
            layout: Self::default(),
        };
        builder.walk(page.root(), 0);
        tracing::trace!(
            rows = builder.layout.rows.len(),
            sections = builder.layout.sections.len(),
            "laid out page"
        );
        builder.layout
    }

    pub fn rows(&self) -> &[LayoutRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sections(&self) -> &[ViewportSection] {
        &self.sections
    }

    /// First row of the section with this id.
    pub fn section_top(&self, id: &str) -> Option<usize> {
        self.sections.iter().find(|s| s.id == id).map(|s| s.top)
    }

    /// Row and column where `node` was first drawn.
    pub fn position_of(&self, node: NodeId) -> Option<(usize, u16)> {
        self.positions.get(&node).copied()
    }

    /// The element under a document position. Past the last segment of a
    /// row, the row's own element is hit.
    pub fn hit(&self, row: usize, column: u16) -> Option<NodeId> {
        let row = self.rows.get(row)?;
        Some(
            row.segments
                .iter()
                .find(|s| s.covers(column))
                .map_or(row.node, |s| s.node),
        )
    }
}

struct RowBuilder {
    kind: RowKind,
    node: NodeId,
    column: u16,
    segments: Vec<Segment>,
}

impl RowBuilder {
    const fn new(kind: RowKind, node: NodeId, indent: u16) -> Self {
        Self {
            kind,
            node,
            column: indent,
            segments: Vec::new(),
        }
    }

    fn push(&mut self, node: NodeId, text: String) {
        let segment = Segment {
            node,
            text,
            column: self.column,
        };
        self.column = self.column.saturating_add(segment.width());
        self.segments.push(segment);
    }

    const fn gap(&mut self, columns: u16) {
        self.column = self.column.saturating_add(columns);
    }
}

struct Builder<'a> {
    page: &'a Page,
    floating: HashSet<NodeId>,
    folded: HashSet<NodeId>,
    queries: HashMap<NodeId, String>,
    layout: PageLayout,
}

impl Builder<'_> {
    fn push(&mut self, row: RowBuilder) {
        let index = self.layout.rows.len();
        self.layout.positions.entry(row.node).or_insert((index, 0));
        for segment in &row.segments {
            self.layout
                .positions
                .entry(segment.node)
                .or_insert((index, segment.column));
        }
        self.layout.rows.push(LayoutRow {
            kind: row.kind,
            node: row.node,
            segments: row.segments,
        });
    }

    fn blank(&mut self, node: NodeId) {
        self.push(RowBuilder::new(RowKind::Blank, node, 0));
    }

    fn skipped(&self, id: NodeId) -> bool {
        let page = self.page;
        let Some(node) = page.node(id) else {
            return true;
        };
        self.floating.contains(&id)
            || self.folded.contains(&id)
            || node.has_class(HIDDEN)
            || node.has_class("sidebar")
            || node.has_class("tab")
            || (node.has_class("tab-panel") && !node.has_class(ACTIVE))
            || (node.has_class("accordion-content") && !node.has_class(EXPANDED))
            || matches!(node.tag.as_str(), "script" | "style" | "head")
    }

    fn walk(&mut self, id: NodeId, indent: u16) {
        if self.skipped(id) {
            return;
        }
        let page = self.page;
        let Some(node) = page.node(id) else { return };
        match node.tag.as_str() {
            "section" if node.dom_id.is_some() => self.section(id, indent),
            "table" => self.table(id, indent),
            "pre" => self.code(id, indent),
            "input" => self.input(id, indent),
            tag => {
                if node.has_class("tabs") {
                    self.tab_strip(id, indent);
                }
                let text = own_text(&node.text);
                if !text.is_empty() {
                    let mut row = RowBuilder::new(row_kind(page, id, tag), id, indent);
                    row.push(id, decorate(page, id, text));
                    self.push(row);
                }
                let nested = matches!(tag, "ul" | "ol")
                    || node.has_class("tab-panel")
                    || node.has_class("accordion-content");
                let indent = if nested { indent + NEST_INDENT } else { indent };
                for &child in &node.children {
                    self.walk(child, indent);
                }
            }
        }
    }

    fn section(&mut self, id: NodeId, indent: u16) {
        let page = self.page;
        let Some(dom_id) = page.attr(id, "id").map(str::to_string) else {
            return;
        };
        let top = self.layout.rows.len();
        let slot = self.layout.sections.len();
        self.layout.sections.push(ViewportSection::new(dom_id, top, 0));
        for &child in page.children(id) {
            self.walk(child, indent);
        }
        self.blank(id);
        self.layout.sections[slot].height = self.layout.rows.len() - top;
    }

    fn tab_strip(&mut self, id: NodeId, indent: u16) {
        let tabs = self.page.select(id, &Selector::class("tab"));
        if tabs.is_empty() {
            return;
        }
        let mut row = RowBuilder::new(RowKind::Control, id, indent);
        for (i, tab) in tabs.into_iter().enumerate() {
            if i > 0 {
                row.gap(CELL_GAP);
            }
            row.push(tab, format!(" {} ", self.page.text_content(tab)));
        }
        self.push(row);
    }

    fn table(&mut self, id: NodeId, indent: u16) {
        let page = self.page;
        if let Some(caption) = page.select_first(id, &Selector::tag("caption")) {
            let mut row = RowBuilder::new(RowKind::Text, caption, indent);
            row.push(caption, page.text_content(caption));
            self.push(row);
        }
        let rows: Vec<(NodeId, Vec<Cell>)> = page
            .select(id, &Selector::tag("tr"))
            .into_iter()
            .filter(|&tr| !page.has_class(tr, HIDDEN))
            .map(|tr| (tr, cells(page, tr)))
            .filter(|(_, cells)| !cells.is_empty())
            .collect();

        let mut widths: Vec<usize> = Vec::new();
        for (_, cells) in &rows {
            for (i, cell) in cells.iter().enumerate() {
                let width = cell.text.width();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(width),
                    None => widths.push(width),
                }
            }
        }

        for (tr, cells) in rows {
            let kind = if cells.iter().all(|c| c.header) {
                RowKind::TableHead
            } else {
                RowKind::TableRow
            };
            let mut row = RowBuilder::new(kind, tr, indent);
            for (i, cell) in cells.into_iter().enumerate() {
                if i > 0 {
                    row.gap(CELL_GAP);
                }
                let pad = widths[i].saturating_sub(cell.text.width());
                row.push(cell.node, format!("{}{}", cell.text, " ".repeat(pad)));
            }
            self.push(row);
        }
        self.blank(id);
    }

    fn code(&mut self, id: NodeId, indent: u16) {
        let mut raw = String::new();
        raw_text(self.page, id, &mut raw);
        for line in raw.trim_matches('\n').lines() {
            let mut row = RowBuilder::new(RowKind::Code, id, indent + NEST_INDENT);
            row.push(id, line.to_string());
            self.push(row);
        }
    }

    fn input(&mut self, id: NodeId, indent: u16) {
        let query = self.queries.get(&id).filter(|q| !q.is_empty());
        let shown = query.map_or_else(
            || self.page.attr(id, "placeholder").unwrap_or("Search").to_string(),
            Clone::clone,
        );
        let mut row = RowBuilder::new(RowKind::Control, id, indent);
        row.push(id, format!("[/ {shown} ]"));
        self.push(row);
    }
}

struct Cell {
    node: NodeId,
    text: String,
    header: bool,
}

fn cells(page: &Page, tr: NodeId) -> Vec<Cell> {
    page.children(tr)
        .iter()
        .filter_map(|&c| {
            let node = page.node(c)?;
            let header = match node.tag.as_str() {
                "th" => true,
                "td" => false,
                _ => return None,
            };
            let mut text = page.text_content(c);
            if header {
                for direction in [SortDirection::Ascending, SortDirection::Descending] {
                    if node.has_class(direction.class()) {
                        text = format!("{text} {}", direction.arrow());
                    }
                }
            }
            Some(Cell {
                node: c,
                text,
                header,
            })
        })
        .collect()
}

fn own_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn raw_text(page: &Page, id: NodeId, out: &mut String) {
    let Some(node) = page.node(id) else { return };
    out.push_str(&node.text);
    for &child in &node.children {
        raw_text(page, child, out);
    }
}

fn row_kind(page: &Page, id: NodeId, tag: &str) -> RowKind {
    if page.has_class(id, "color-preview") {
        return RowKind::Swatch;
    }
    match tag.as_bytes() {
        [b'h', level @ b'1'..=b'6'] => RowKind::Heading(level - b'0'),
        b"button" | b"a" | b"select" => RowKind::Control,
        b"code" => RowKind::Code,
        _ => RowKind::Text,
    }
}

/// Visible affordances derived from the element's markers.
fn decorate(page: &Page, id: NodeId, text: String) -> String {
    let expanded = page.attr(id, "aria-expanded").map(|v| v == "true");
    if page.has_class(id, "accordion-header") {
        let marker = if expanded == Some(true) { "▾" } else { "▸" };
        return format!("{marker} {text}");
    }
    if page.has_class(id, "color-preview") {
        return match page.attr(id, "data-color") {
            Some(color) => format!("■ {text} {color}"),
            None => format!("■ {text}"),
        };
    }
    if let Some(theme) = page.attr(id, "data-theme") {
        return format!("[ {text}: {theme} ]");
    }
    if page.node(id).is_some_and(|n| n.tag == "li") {
        return format!("• {text}");
    }
    match (page.node(id).map(|n| n.tag.as_str()), expanded) {
        (_, Some(open)) => format!("[ {text} {} ]", if open { "▴" } else { "▾" }),
        (Some("button"), None) => format!("[ {text} ]"),
        _ => text,
    }
}
