//! Colours for the light and dark themes.
//!
//! Element styling is read from the page markers the controller projects,
//! the way a stylesheet would. Markers such as `active`, `open` or
//! `search-match` change how a segment looks, never what it does.

use ratatui::style::{Color, Modifier, Style};

use crate::page::{NodeId, Page};
use crate::prefs::Theme;
use crate::ui::layout::RowKind;
use crate::widgets::projection::{ACTIVE, MATCH, OPEN};
use crate::widgets::SortDirection;

/// Fixed colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub heading: Color,
    pub code: Color,
    pub bar_fg: Color,
    pub bar_bg: Color,
    pub popup_bg: Color,
}

impl Palette {
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                fg: Color::Indexed(252),
                bg: Color::Indexed(234),
                muted: Color::Indexed(245),
                accent: Color::Cyan,
                heading: Color::Indexed(117),
                code: Color::Indexed(180),
                bar_fg: Color::White,
                bar_bg: Color::DarkGray,
                popup_bg: Color::Indexed(236),
            },
            Theme::Light => Self {
                fg: Color::Indexed(235),
                bg: Color::Indexed(255),
                muted: Color::Indexed(243),
                accent: Color::Indexed(25),
                heading: Color::Indexed(24),
                code: Color::Indexed(94),
                bar_fg: Color::Black,
                bar_bg: Color::Indexed(250),
                popup_bg: Color::Indexed(254),
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn bar(&self) -> Style {
        Style::default().fg(self.bar_fg).bg(self.bar_bg)
    }

    pub fn popup(&self) -> Style {
        Style::default().fg(self.fg).bg(self.popup_bg)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn row(&self, kind: RowKind) -> Style {
        let base = self.base();
        match kind {
            RowKind::Heading(1) => base
                .fg(self.heading)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            RowKind::Heading(_) | RowKind::TableHead => {
                base.fg(self.heading).add_modifier(Modifier::BOLD)
            }
            RowKind::Code => base.fg(self.code),
            RowKind::Control => base.fg(self.accent),
            RowKind::Text | RowKind::TableRow | RowKind::Swatch | RowKind::Blank => base,
        }
    }

    /// Style for one segment: the row style adjusted by the element's
    /// markers and focus.
    pub fn segment(&self, page: &Page, node: NodeId, kind: RowKind, focused: bool) -> Style {
        let mut style = self.row(kind);
        if kind == RowKind::Swatch
            && let Some(color) = page.attr(node, "data-color").and_then(parse_hex)
        {
            style = style.fg(color);
        }
        if page.has_class(node, ACTIVE) {
            style = style.fg(self.accent).add_modifier(Modifier::BOLD);
        }
        if page.has_class(node, OPEN) || page.attr(node, "aria-expanded") == Some("true") {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if page.has_class(node, MATCH) {
            style = style.fg(self.accent);
        }
        if [SortDirection::Ascending, SortDirection::Descending]
            .iter()
            .any(|d| page.has_class(node, d.class()))
        {
            style = style.fg(self.accent);
        }
        if focused {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

/// `#rrggbb` to a terminal colour.
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}
