use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::*;
use crate::app::{Message, Model, NoticeLevel, update};
use crate::page::{Element, NodeId, Page, Selector};
use crate::prefs::MemoryStore;
use crate::widgets::Controller;

fn create_test_terminal() -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(80, 24)).unwrap()
}

fn model_for(root: Element) -> Model {
    let mut controller = Controller::new(Page::new("Tokens", root), Box::new(MemoryStore::new()));
    controller.bind_all();
    controller.hydrate();
    Model::new(PathBuf::from("tokens.json"), controller, (80, 24))
}

fn page_with_menu() -> Element {
    Element::new("body").children([
        Element::new("nav").class("sidebar").child(
            Element::new("a")
                .class("sidebar-link")
                .attr("href", "#colors")
                .text("Colors"),
        ),
        Element::new("div").class("language-selector").children([
            Element::new("button").class("language-toggle").text("English"),
            Element::new("div").class("language-dropdown").children([
                Element::new("a").class("language-option").text("English"),
                Element::new("a").class("language-option").text("Deutsch"),
            ]),
        ]),
        Element::new("section").id("colors").children([
            Element::new("h2").text("Colors"),
            Element::new("div")
                .class("color-preview")
                .attr("data-color", "#C5F955")
                .text("Lime"),
        ]),
    ])
}

fn render(model: &Model) -> Buffer {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| super::render(model, frame)).unwrap();
    terminal.backend().buffer().clone()
}

fn row_text(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol())
        .collect()
}

fn screen_text(buffer: &Buffer) -> String {
    (0..buffer.area.height)
        .map(|y| row_text(buffer, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn node(model: &Model, class: &str) -> NodeId {
    let page = model.controller.page();
    page.select_first(page.root(), &Selector::class(class))
        .unwrap()
}

#[test]
fn test_header_shows_title_and_theme() {
    let model = model_for(page_with_menu());
    let buffer = render(&model);
    let header = row_text(&buffer, 0);
    assert!(header.contains("Tokens"));
    assert!(header.contains("dark"));
}

#[test]
fn test_status_bar_shows_file_and_position() {
    let model = model_for(page_with_menu());
    let buffer = render(&model);
    let status = row_text(&buffer, 23);
    assert!(status.contains("tokens.json"));
    assert!(status.contains("Row 1/"));
    assert!(status.contains("?:help"));
}

#[test]
fn test_sidebar_marks_active_link() {
    let mut model = model_for(page_with_menu());
    model.on_frame();
    let buffer = render(&model);
    assert!(screen_text(&buffer).contains("> Colors"));
}

#[test]
fn test_document_renders_swatch() {
    let model = model_for(page_with_menu());
    let text = screen_text(&render(&model));
    assert!(text.contains("■"));
    assert!(text.contains("Lime"));
}

#[test]
fn test_open_menu_floats_over_document() {
    let model = model_for(page_with_menu());
    let toggle = node(&model, "language-toggle");
    let model = update(model, Message::Click(toggle));
    let text = screen_text(&render(&model));
    assert!(text.contains("Deutsch"));

    let model = update(model, Message::ClickOutside);
    let text = screen_text(&render(&model));
    assert!(!text.contains("Deutsch"));
}

#[test]
fn test_overlay_hit_finds_menu_item() {
    let model = model_for(page_with_menu());
    let toggle = node(&model, "language-toggle");
    let model = update(model, Message::Click(toggle));
    let area = Rect::new(0, 0, 80, 24);

    let (row, column) = model.layout.position_of(toggle).unwrap();
    let (x, y) = screen_areas(&model, area)
        .screen_position(&model, row, column)
        .unwrap();
    // frame row below the toggle, then the first option
    assert_eq!(overlay_hit(&model, area, x + 1, y + 1), Some(OverlayHit::Inside));
    let english = model.controller.registry().widgets()[0].children[0].node.unwrap();
    assert_eq!(overlay_hit(&model, area, x + 1, y + 2), Some(OverlayHit::Item(english)));
    assert_eq!(overlay_hit(&model, area, 79, 22), None);
}

#[test]
fn test_no_overlay_hit_when_closed() {
    let model = model_for(page_with_menu());
    assert_eq!(overlay_hit(&model, Rect::new(0, 0, 80, 24), 30, 5), None);
}

#[test]
fn test_help_overlay_lists_keys() {
    let model = update(model_for(page_with_menu()), Message::ToggleHelp);
    let text = screen_text(&render(&model));
    assert!(text.contains("Help"));
    assert!(text.contains("Toggle theme"));
    assert!(text.contains("Search components"));
}

#[test]
fn test_notice_bar_above_status() {
    let mut model = model_for(page_with_menu());
    model.show_notice(NoticeLevel::Error, "Could not save theme");
    let buffer = render(&model);
    assert!(row_text(&buffer, 22).contains("[error] Could not save theme"));
}

#[test]
fn test_light_theme_changes_background() {
    let dark = model_for(page_with_menu());
    let dark_bg = render(&dark)[(40, 10)].bg;
    let light = update(dark, Message::ToggleTheme);
    let light_bg = render(&light)[(40, 10)].bg;
    assert_ne!(dark_bg, light_bg);
}

#[test]
fn test_areas_without_nav_links_have_no_sidebar() {
    let model = model_for(Element::new("body").child(Element::new("p").text("plain")));
    let areas = screen_areas(&model, Rect::new(0, 0, 80, 24));
    assert!(areas.sidebar.is_none());
    assert_eq!(areas.document.width, 80);
    assert_eq!(areas.status.y, 23);
}

#[test]
fn test_document_width_accounts_for_sidebar() {
    assert_eq!(document_width(80, false), 80 - DOCUMENT_LEFT_PADDING);
    assert!(document_width(80, true) < document_width(80, false));
}

#[test]
fn test_tiny_terminal_does_not_panic() {
    let model = model_for(page_with_menu());
    let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
    terminal.draw(|frame| super::render(&model, frame)).unwrap();
}
