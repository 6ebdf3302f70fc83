//! Terminal UI components.
//!
//! - [`layout`]: the page flattened into clickable rows
//! - [`viewport`]: scroll position over those rows
//! - [`style`]: light and dark palettes

pub mod layout;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{OverlayHit, overlay_hit};
pub use render::{Areas, render, screen_areas, split_main_columns};

pub const HEADER_ROWS: u16 = 1;
pub const STATUS_ROWS: u16 = 1;
pub const DOCUMENT_LEFT_PADDING: u16 = 1;
pub const SIDEBAR_WIDTH_PERCENT: u16 = 25;
pub const DOC_WIDTH_PERCENT: u16 = 75;

/// Width of the document pane's content for a terminal `total_width`
/// columns wide.
pub fn document_width(total_width: u16, sidebar_visible: bool) -> u16 {
    let area = ratatui::layout::Rect::new(0, 0, total_width, 1);
    let pane = if sidebar_visible {
        split_main_columns(area)[1].width
    } else {
        total_width
    };
    pane.saturating_sub(DOCUMENT_LEFT_PADDING)
}

#[cfg(test)]
mod tests;
