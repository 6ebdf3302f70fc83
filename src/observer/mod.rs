//! Scroll and viewport observation.
//!
//! The host calls [`ScrollObserver::notify`] on every scroll or resize and
//! [`ScrollObserver::on_frame`] once per rendered frame. Work runs at most
//! once per frame, and only when something was notified.

mod frame;

pub use frame::FrameCoalescer;

use crate::error::WidgetError;
use crate::page::{NodeId, Page};
use crate::widgets::projection::ACTIVE;
use crate::widgets::registry::NavLink;

/// Default distance below the scroll position used to pick the active
/// section.
pub const DEFAULT_LOOKAHEAD: usize = 100;

/// Scrolling down by more than this hides the header.
const HEADER_HIDE_DELTA: usize = 5;
/// Scroll position past which the header is drawn as "scrolled".
const SCROLLED_THRESHOLD: usize = 10;

/// A navigable section's measured extent, in page units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportSection {
    pub id: String,
    pub top: usize,
    pub height: usize,
}

impl ViewportSection {
    pub fn new(id: impl Into<String>, top: usize, height: usize) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    const fn contains(&self, position: usize) -> bool {
        self.top <= position && position < self.top + self.height
    }
}

/// One layout measurement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measurement {
    pub scroll: usize,
    pub sections: Vec<ViewportSection>,
}

/// The first section, in document order, whose extent contains
/// `scroll + lookahead`.
pub fn active_section(
    sections: &[ViewportSection],
    scroll: usize,
    lookahead: usize,
) -> Option<&str> {
    let row = scroll.saturating_add(lookahead);
    sections
        .iter()
        .find(|s| s.contains(row))
        .map(|s| s.id.as_str())
}

/// Keeps exactly one nav link marked active.
#[derive(Debug, Clone, Default)]
pub struct NavHighlight {
    links: Vec<(NodeId, String)>,
    active: Option<String>,
}

impl NavHighlight {
    pub fn new(links: &[NavLink]) -> Self {
        Self {
            links: links.iter().map(|l| (l.node, l.target.clone())).collect(),
            active: None,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Clear every nav marker, then mark the link for `section`.
    pub fn set_active(&mut self, page: &mut Page, section: Option<&str>) {
        for (node, target) in &self.links {
            page.set_class(*node, ACTIVE, Some(target.as_str()) == section);
        }
        self.active = section.map(str::to_string);
    }
}

/// Hides the header while scrolling down and shows it again on the way up.
#[derive(Debug, Clone, Default)]
pub struct HeaderTracker {
    header_height: usize,
    last_scroll: usize,
    hidden: bool,
    scrolled: bool,
}

impl HeaderTracker {
    pub const fn new(header_height: usize) -> Self {
        Self {
            header_height,
            last_scroll: 0,
            hidden: false,
            scrolled: false,
        }
    }

    pub fn update(&mut self, scroll: usize) {
        if scroll > self.last_scroll {
            if scroll - self.last_scroll > HEADER_HIDE_DELTA && scroll > self.header_height {
                self.hidden = true;
            }
        } else if scroll < self.last_scroll {
            self.hidden = false;
        }
        self.scrolled = scroll > SCROLLED_THRESHOLD;
        self.last_scroll = scroll;
    }

    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub const fn is_scrolled(&self) -> bool {
        self.scrolled
    }
}

/// What changed on a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub active: Option<String>,
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollObserver {
    lookahead: usize,
    frames: FrameCoalescer,
    nav: NavHighlight,
    header: HeaderTracker,
}

impl ScrollObserver {
    pub fn new(nav_links: &[NavLink], lookahead: usize, header_height: usize) -> Self {
        Self {
            lookahead,
            frames: FrameCoalescer::new(),
            nav: NavHighlight::new(nav_links),
            header: HeaderTracker::new(header_height),
        }
    }

    pub const fn lookahead(&self) -> usize {
        self.lookahead
    }

    pub fn active(&self) -> Option<&str> {
        self.nav.active()
    }

    pub const fn header(&self) -> &HeaderTracker {
        &self.header
    }

    pub const fn is_pending(&self) -> bool {
        self.frames.is_pending()
    }

    /// Record a scroll or resize. Cheap; the work happens on the next frame.
    pub const fn notify(&mut self) {
        self.frames.request();
    }

    /// Per-frame hook. Runs `measure` and recomputes state only when a
    /// notification is pending. A failed measurement skips this frame.
    pub fn on_frame(
        &mut self,
        page: &mut Page,
        measure: impl FnOnce() -> Result<Measurement, WidgetError>,
    ) -> Option<FrameReport> {
        match self.frames.on_frame(measure)? {
            Ok(measurement) => Some(self.on_scroll_or_resize(page, &measurement)),
            Err(err) => {
                tracing::debug!(%err, "skipping frame");
                None
            }
        }
    }

    /// Recompute the active section and header state from a measurement.
    pub fn on_scroll_or_resize(
        &mut self,
        page: &mut Page,
        measurement: &Measurement,
    ) -> FrameReport {
        self.header.update(measurement.scroll);
        let active = active_section(&measurement.sections, measurement.scroll, self.lookahead)
            .map(str::to_string);
        let changed = active.as_deref() != self.nav.active();
        self.nav.set_active(page, active.as_deref());
        if changed {
            tracing::trace!(active = ?active, "active section changed");
        }
        FrameReport { active, changed }
    }
}
