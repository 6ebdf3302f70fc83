use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tempfile::tempdir;

use crate::page::{Element, NodeId, Page, Selector};
use crate::prefs::{MemoryStore, THEME_KEY, Theme, load_preference};
use crate::widgets::projection::{ACTIVE, OPEN};
use crate::widgets::{Controller, Focus, Key, WidgetKind};

use super::input::{handle_key, handle_mouse};
use super::{App, Message, Model, NoticeLevel, update};

fn lines(prefix: &str, count: usize) -> Vec<Element> {
    (1..=count)
        .map(|i| Element::new("p").text(format!("{prefix} {i}")))
        .collect()
}

fn preview_root() -> Element {
    let mut colors = vec![Element::new("h2").text("Colors")];
    colors.extend(lines("Swatch", 30));
    let mut after = vec![Element::new("h2").text("Changelog")];
    after.extend(lines("Entry", 30));

    Element::new("body").children([
        Element::new("nav").class("sidebar").children([
            Element::new("a")
                .class("sidebar-link")
                .attr("href", "#colors")
                .text("Colors"),
            Element::new("a")
                .class("sidebar-link")
                .attr("href", "#tables")
                .text("Tables"),
        ]),
        Element::new("div").class("nav-dropdown").children([
            Element::new("button")
                .class("nav-dropdown-toggle")
                .text("Foundations"),
            Element::new("div").class("nav-dropdown-menu").child(
                Element::new("a")
                    .class("nav-dropdown-item")
                    .attr("href", "#tables")
                    .text("Tables"),
            ),
        ]),
        Element::new("button").class("theme-toggle").text("Theme"),
        Element::new("section").id("colors").children(colors),
        Element::new("section").id("tables").children([
            Element::new("h2").text("Tables"),
            Element::new("div").class("table-container").children([
                Element::new("input")
                    .class("table-search")
                    .attr("placeholder", "Filter tokens"),
                Element::new("table").children([
                    Element::new("thead").child(Element::new("tr").children([
                        Element::new("th").attr("data-sortable", "name").text("Name"),
                        Element::new("th").text("Value"),
                    ])),
                    Element::new("tbody").children([
                        Element::new("tr").children([
                            Element::new("td").text("Lime"),
                            Element::new("td").text("#C5F955"),
                        ]),
                        Element::new("tr").children([
                            Element::new("td").text("Ink"),
                            Element::new("td").text("#111111"),
                        ]),
                    ]),
                ]),
            ]),
            Element::new("div").class("code-example").children([
                Element::new("button").class("copy-btn").text("Copy"),
                Element::new("pre").child(Element::new("code").text("--ds-primary: #0055ff;")),
            ]),
        ]),
        Element::new("section").id("changelog").children(after),
    ])
}

fn create_test_model() -> Model {
    let mut controller = Controller::new(
        Page::new("Preview", preview_root()),
        Box::new(MemoryStore::new()),
    );
    controller.bind_all();
    controller.hydrate();
    Model::new(PathBuf::from("preview.json"), controller, (80, 24))
}

fn node(model: &Model, class: &str) -> NodeId {
    let page = model.controller.page();
    page.select_first(page.root(), &Selector::class(class))
        .unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_scroll_down_updates_viewport() {
    let model = update(create_test_model(), Message::ScrollDown(5));
    assert_eq!(model.viewport.offset(), 5);
    assert!(model.observer.is_pending());
}

#[test]
fn test_scroll_up_saturates_at_top() {
    let model = update(create_test_model(), Message::ScrollDown(2));
    let model = update(model, Message::ScrollUp(10));
    assert_eq!(model.viewport.offset(), 0);
}

#[test]
fn test_go_to_bottom_shows_last_row() {
    let model = update(create_test_model(), Message::GoToBottom);
    let range = model.viewport.visible_range();
    assert_eq!(range.end, model.layout.len());
}

#[test]
fn test_first_frame_marks_first_section_active() {
    let mut model = create_test_model();
    let report = model.on_frame().unwrap();
    assert_eq!(report.active.as_deref(), Some("colors"));
    assert!(report.changed);

    let colors_link = model.controller.registry().nav_links()[0].node;
    assert!(model.controller.page().has_class(colors_link, ACTIVE));
    // nothing happened since, so the next frame does no work
    assert!(model.on_frame().is_none());
}

#[test]
fn test_nav_link_click_scrolls_and_activates_section() {
    let model = create_test_model();
    let tables_link = model.controller.registry().nav_links()[1].node;
    let mut model = update(model, Message::Click(tables_link));

    let top = model.layout.section_top("tables").unwrap();
    assert_eq!(model.viewport.offset(), top);

    let report = model.on_frame().unwrap();
    assert_eq!(report.active.as_deref(), Some("tables"));
    let page = model.controller.page();
    assert!(page.has_class(tables_link, ACTIVE));
    assert!(!page.has_class(model.controller.registry().nav_links()[0].node, ACTIVE));
}

#[test]
fn test_header_hides_on_large_scroll_and_returns_on_scroll_up() {
    let mut model = create_test_model();
    model.on_frame();
    assert!(model.header_visible());

    model = update(model, Message::ScrollDown(12));
    model.on_frame();
    assert!(!model.header_visible());
    assert!(model.observer.header().is_scrolled());

    model = update(model, Message::ScrollUp(1));
    model.on_frame();
    assert!(model.header_visible());
}

#[test]
fn test_tab_then_enter_opens_dropdown() {
    let model = update(create_test_model(), Message::Widget(Key::Tab));
    let toggle = node(&model, "nav-dropdown-toggle");
    assert_eq!(model.controller.focused_node(), Some(toggle));

    let model = update(model, Message::Widget(Key::Enter));
    let menu = node(&model, "nav-dropdown-menu");
    assert!(model.controller.page().has_class(menu, OPEN));

    let model = update(model, Message::ClickOutside);
    assert!(!model.controller.page().has_class(menu, OPEN));
}

#[test]
fn test_unconsumed_arrow_scrolls_page() {
    let model = update(create_test_model(), Message::Widget(Key::Down));
    assert_eq!(model.viewport.offset(), 1);
    let model = update(model, Message::Widget(Key::End));
    assert!(model.viewport.offset() > 1);
}

#[test]
fn test_toggle_theme_flips_and_persists() {
    let model = create_test_model();
    assert_eq!(model.controller.theme(), Theme::Dark);
    let model = update(model, Message::ToggleTheme);
    assert_eq!(model.controller.theme(), Theme::Light);
    assert_eq!(
        load_preference(model.controller.store(), THEME_KEY).as_deref(),
        Some("light")
    );
}

#[test]
fn test_filter_narrows_table_and_clear_restores() {
    let model = update(create_test_model(), Message::StartFilter);
    let filter = model.filter.clone().unwrap();
    assert!(matches!(model.controller.focus(), Some(Focus::Search(id)) if id == filter.widget));

    let model = update(model, Message::FilterInput("lime".into()));
    let table = model.controller.widget(filter.widget).unwrap().table().unwrap();
    assert_eq!(table.visible_count(), 1);

    let model = update(model, Message::ClearFilter);
    assert!(model.filter.is_none());
    let table = model.controller.widget(filter.widget).unwrap().table().unwrap();
    assert_eq!(table.visible_count(), 2);
}

#[test]
fn test_finish_filter_keeps_query() {
    let model = update(create_test_model(), Message::StartFilter);
    let model = update(model, Message::FilterInput("ink".into()));
    let model = update(model, Message::FinishFilter);
    assert!(model.filter.is_none());
    let table_id = model.controller.registry().first_of_kind(WidgetKind::Table).unwrap();
    let table = model.controller.widget(table_id).unwrap().table().unwrap();
    assert_eq!(table.query(), "ink");
    assert_eq!(table.visible_count(), 1);
}

fn search_model() -> Model {
    let root = Element::new("body").children([
        Element::new("input").id("search").attr("placeholder", "Search components"),
        Element::new("div").class("component-card").text("Buttons"),
        Element::new("div").class("component-card").text("Tables"),
        Element::new("div").class("token-card").text("Spacing tokens"),
        Element::new("p").id("no-results").text("No components found"),
        Element::new("div").class("code-example").children([
            Element::new("div").class("code-header").children([
                Element::new("button").class("copy-btn").text("Copy"),
                Element::new("button").class("toggle-code-btn"),
            ]),
            Element::new("pre").child(Element::new("code").text(".card { gap: 8px; }")),
        ]),
    ]);
    let mut controller = Controller::new(Page::new("Search", root), Box::new(MemoryStore::new()));
    controller.bind_all();
    Model::new(PathBuf::from("search.json"), controller, (80, 24))
}

fn layout_texts(model: &Model) -> Vec<String> {
    let page = model.controller.page();
    model
        .layout
        .rows()
        .iter()
        .map(|r| page.text_content(r.node))
        .collect()
}

#[test]
fn test_alt_s_searches_components() {
    let model = search_model();
    let alt_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::ALT);
    assert_eq!(handle_key(alt_s, &model), Some(Message::FocusPageSearch));
    assert_eq!(handle_key(key(KeyCode::Char('s')), &model), Some(Message::ToggleSidebar));

    let model = update(model, Message::FocusPageSearch);
    let filter = model.filter.clone().unwrap();
    let search = model.controller.registry().first_of_kind(WidgetKind::PageSearch);
    assert_eq!(Some(filter.widget), search);
    assert!(matches!(model.controller.focus(), Some(Focus::Search(id)) if id == filter.widget));

    let model = update(model, Message::FilterInput("TAB".into()));
    let texts = layout_texts(&model);
    assert!(texts.contains(&"Tables".to_string()));
    assert!(!texts.contains(&"Buttons".to_string()));
    assert_eq!(model.controller.widget(filter.widget).unwrap().match_count(), Some(1));

    let model = update(model, Message::FilterInput("TABx".into()));
    assert!(layout_texts(&model).contains(&"No components found".to_string()));

    let model = update(model, Message::ClearFilter);
    assert_eq!(model.controller.widget(filter.widget).unwrap().match_count(), Some(3));
    assert!(!layout_texts(&model).contains(&"No components found".to_string()));
}

#[test]
fn test_slash_falls_back_to_page_search() {
    let model = update(search_model(), Message::StartFilter);
    let search = model.controller.registry().first_of_kind(WidgetKind::PageSearch);
    assert_eq!(model.filter.map(|f| f.widget), search);
}

#[test]
fn test_alt_s_without_search_box_shows_notice() {
    let model = update(create_test_model(), Message::FocusPageSearch);
    assert!(model.filter.is_none());
    let (message, _) = model.active_notice().unwrap();
    assert!(message.contains("search box"));
}

#[test]
fn test_code_toggle_reveals_code_rows() {
    let model = search_model();
    let code = ".card { gap: 8px; }".to_string();
    assert!(!layout_texts(&model).contains(&code));

    let toggle = node(&model, "toggle-code-btn");
    let model = update(model, Message::Click(toggle));
    assert!(layout_texts(&model).contains(&code));
    assert_eq!(model.controller.page().text_content(toggle), "Hide code");

    let copy = node(&model, "copy-btn");
    let mut model = update(model, Message::Click(copy));
    assert_eq!(model.take_clipboard(), vec![code]);
}

#[test]
fn test_copy_button_queues_clipboard_text() {
    let model = create_test_model();
    let button = node(&model, "copy-btn");
    let mut model = update(model, Message::Click(button));
    assert_eq!(model.pending_clipboard(), ["--ds-primary: #0055ff;"]);
    assert_eq!(model.take_clipboard().len(), 1);
    assert!(model.pending_clipboard().is_empty());
}

#[test]
fn test_missing_drawer_shows_notice() {
    let model = update(create_test_model(), Message::ToggleDrawer);
    let (message, level) = model.active_notice().unwrap();
    assert_eq!(level, NoticeLevel::Info);
    assert!(message.contains("drawer"));
}

#[test]
fn test_notice_expires() {
    let mut model = create_test_model();
    model.show_notice(NoticeLevel::Error, "boom");
    assert!(!model.expire_notice(Instant::now()));
    assert!(model.expire_notice(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_notice().is_none());
}

#[test]
fn test_toggle_sidebar_widens_document() {
    let model = create_test_model();
    let narrow = model.viewport.width();
    let model = update(model, Message::ToggleSidebar);
    assert!(!model.sidebar_visible);
    assert!(model.viewport.width() > narrow);
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_measure_fails_without_rows() {
    let model = update(create_test_model(), Message::Resize(80, 2));
    assert!(model.measure().is_err());
}

#[test]
fn test_keys_in_filter_mode_edit_query() {
    let model = update(create_test_model(), Message::StartFilter);
    assert_eq!(
        handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::FilterInput("q".into()))
    );
    assert_eq!(handle_key(key(KeyCode::Esc), &model), Some(Message::ClearFilter));
    assert_eq!(handle_key(key(KeyCode::Enter), &model), Some(Message::FinishFilter));
}

#[test]
fn test_keys_in_normal_mode() {
    let model = create_test_model();
    assert_eq!(handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
    assert_eq!(handle_key(key(KeyCode::Char('j')), &model), Some(Message::ScrollDown(1)));
    assert_eq!(handle_key(key(KeyCode::Char('t')), &model), Some(Message::ToggleTheme));
    assert_eq!(
        handle_key(key(KeyCode::Tab), &model),
        Some(Message::Widget(Key::Tab))
    );
    assert_eq!(
        handle_key(key(KeyCode::Esc), &model),
        Some(Message::Widget(Key::Escape))
    );
    assert_eq!(
        handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &model),
        Some(Message::Quit)
    );
}

#[test]
fn test_help_swallows_keys_until_closed() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert_eq!(handle_key(key(KeyCode::Char('j')), &model), None);
    assert_eq!(handle_key(key(KeyCode::Esc), &model), Some(Message::HideHelp));
}

#[test]
fn test_sidebar_click_targets_nav_link() {
    let model = create_test_model();
    // header on row 0, sidebar title on row 1, links from row 2
    let first = model.controller.registry().nav_links()[0].node;
    let second = model.controller.registry().nav_links()[1].node;
    assert_eq!(handle_mouse(click(2, 2), &model), Some(Message::Click(first)));
    assert_eq!(handle_mouse(click(2, 3), &model), Some(Message::Click(second)));
}

#[test]
fn test_document_click_hits_dropdown_toggle() {
    let model = create_test_model();
    let toggle = node(&model, "nav-dropdown-toggle");
    let (row, column) = model.layout.position_of(toggle).unwrap();
    let (x, y) = crate::ui::screen_areas(&model, ratatui::layout::Rect::new(0, 0, 80, 24))
        .screen_position(&model, row, column)
        .unwrap();
    assert_eq!(handle_mouse(click(x, y), &model), Some(Message::Click(toggle)));

    let model = update(model, Message::Click(toggle));
    assert!(model.controller.page().has_class(node(&model, "nav-dropdown-menu"), OPEN));
}

#[test]
fn test_status_bar_click_is_outside() {
    let model = create_test_model();
    assert_eq!(handle_mouse(click(50, 23), &model), Some(Message::ClickOutside));
}

#[test]
fn test_render_smoke() {
    let mut model = create_test_model();
    model.on_frame();
    let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
    terminal.draw(|frame| crate::ui::render(&model, frame)).unwrap();
}

#[test]
fn test_build_model_restores_stored_theme() {
    let dir = tempdir().unwrap();
    let page_path = dir.path().join("preview.json");
    let store_path = dir.path().join("prefs.json");
    let page = serde_json::json!({ "title": "Preview", "root": preview_root() });
    std::fs::write(&page_path, page.to_string()).unwrap();

    let app = App::new(page_path.clone()).with_store(Some(store_path.clone()));
    let model = app.build_model((80, 24)).unwrap();
    assert_eq!(model.controller.theme(), Theme::Dark);
    let model = update(model, Message::ToggleTheme);
    assert_eq!(model.controller.theme(), Theme::Light);

    let reloaded = App::new(page_path)
        .with_store(Some(store_path))
        .build_model((80, 24))
        .unwrap();
    assert_eq!(reloaded.controller.theme(), Theme::Light);
}

#[test]
fn test_forced_theme_does_not_overwrite_store() {
    let dir = tempdir().unwrap();
    let page_path = dir.path().join("preview.json");
    let store_path = dir.path().join("prefs.json");
    let page = serde_json::json!({ "title": "Preview", "root": preview_root() });
    std::fs::write(&page_path, page.to_string()).unwrap();

    let forced = App::new(page_path.clone())
        .with_store(Some(store_path.clone()))
        .with_theme(Some(Theme::Light))
        .build_model((80, 24))
        .unwrap();
    assert_eq!(forced.controller.theme(), Theme::Light);

    let plain = App::new(page_path)
        .with_store(Some(store_path))
        .build_model((80, 24))
        .unwrap();
    assert_eq!(plain.controller.theme(), Theme::Dark);
}

#[test]
fn test_build_model_uses_custom_search_cards() {
    let dir = tempdir().unwrap();
    let page_path = dir.path().join("search.json");
    let root = Element::new("body").children([
        Element::new("input").id("search"),
        Element::new("div").class("component-card").text("Buttons"),
        Element::new("div").class("icon-card").text("Arrow"),
        Element::new("div").class("icon-card").text("Check"),
    ]);
    let page = serde_json::json!({ "title": "Search", "root": root });
    std::fs::write(&page_path, page.to_string()).unwrap();

    let cards = Selector::parse_list(".icon-card").unwrap();
    let model = App::new(page_path.clone())
        .with_search_cards(Some(cards))
        .build_model((80, 24))
        .unwrap();
    let model = update(model, Message::FocusPageSearch);
    let model = update(model, Message::FilterInput("arrow".into()));
    let search = model.filter.as_ref().unwrap().widget;
    let widget = model.controller.widget(search).unwrap();
    assert_eq!(widget.children.len(), 2);
    assert_eq!(widget.match_count(), Some(1));

    let defaults = App::new(page_path).build_model((80, 24)).unwrap();
    let search = defaults.controller.registry().first_of_kind(WidgetKind::PageSearch);
    let widget = defaults.controller.widget(search.unwrap()).unwrap();
    assert_eq!(widget.children.len(), 1);
}

#[test]
fn test_build_model_reports_missing_page() {
    let dir = tempdir().unwrap();
    let err = App::new(dir.path().join("missing.json"))
        .build_model((80, 24))
        .unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_scroll_to_unknown_section_is_soft_miss() {
    let mut model = update(create_test_model(), Message::ScrollDown(4));
    assert!(model.scroll_to_section("nowhere").is_err());
    assert_eq!(model.viewport.offset(), 4);
}
