//! Writes widget state onto the page as class and attribute markers.
//!
//! This is one-way: markers are derived from state after every change and
//! are never consulted to decide behaviour.

use crate::page::{NodeId, Page, Selector};
use crate::prefs::Theme;
use crate::widgets::registry::WidgetRegistry;
use crate::widgets::table::{SortDirection, TableModel};
use crate::widgets::{Widget, WidgetKind, WidgetState};

pub const OPEN: &str = "open";
pub const ACTIVE: &str = "active";
pub const EXPANDED: &str = "expanded";
pub const HIDDEN: &str = "search-hidden";
pub const LIGHT_THEME: &str = "light-theme";
pub const MATCH: &str = "search-match";
pub const COLLAPSED: &str = "collapsed";
const RESULTS: &str = "table-results";

/// Project every widget and the page theme.
pub fn apply(page: &mut Page, registry: &WidgetRegistry, theme: Theme) {
    let root = page.root();
    page.set_class(root, LIGHT_THEME, theme == Theme::Light);
    for widget in registry.widgets() {
        apply_widget(page, widget);
    }
}

fn apply_widget(page: &mut Page, widget: &Widget) {
    let nodes = widget.nodes;
    match &widget.state {
        WidgetState::Menu { open, selected } => {
            set_open(page, widget, *open);
            for child in &widget.children {
                if let Some(node) = child.node {
                    page.set_class(node, ACTIVE, selected.as_deref() == Some(child.key.as_str()));
                }
            }
            if let Some(toggle) = nodes.toggle
                && widget.kind == WidgetKind::LanguageSelector
                && selected.is_some()
            {
                page.set_text(toggle, widget.label.clone());
            }
        }
        WidgetState::Drawer { open } => {
            set_open(page, widget, *open);
            if let Some(toggle) = nodes.toggle {
                page.set_class(toggle, ACTIVE, *open);
            }
        }
        WidgetState::Tabs { active } => {
            for child in &widget.children {
                let on = active.as_deref() == Some(child.key.as_str());
                for node in [child.node, child.panel].into_iter().flatten() {
                    page.set_class(node, ACTIVE, on);
                }
                if let Some(node) = child.node {
                    page.set_attr(node, "aria-selected", on.to_string());
                }
            }
        }
        WidgetState::Accordion { expanded, .. } => {
            let item = Selector::class("accordion-item");
            for child in &widget.children {
                let on = expanded.contains(&child.key);
                if let Some(header) = child.node {
                    page.set_attr(header, "aria-expanded", on.to_string());
                    if let Some(item_node) = page.closest(header, &item) {
                        page.set_class(item_node, ACTIVE, on);
                    }
                }
                if let Some(content) = child.panel {
                    page.set_class(content, EXPANDED, on);
                }
            }
        }
        WidgetState::Table(table) => apply_table(page, widget, table),
        WidgetState::Search { query, hidden } => {
            for child in &widget.children {
                let Some(node) = child.node else { continue };
                let miss = hidden.contains(&child.key);
                page.set_class(node, HIDDEN, miss);
                page.set_class(node, MATCH, !miss && !query.is_empty());
            }
            // The empty-state note only shows for a query that matched nothing.
            if let Some(note) = nodes.panel {
                let empty = hidden.len() == widget.children.len() && !query.is_empty();
                page.set_class(note, HIDDEN, !empty);
            }
        }
        WidgetState::Code { collapsed } => {
            if let Some(container) = nodes.container {
                page.set_class(container, COLLAPSED, *collapsed);
            }
            if let Some(toggle) = nodes.toggle {
                page.set_attr(toggle, "aria-expanded", (!collapsed).to_string());
                page.set_text(toggle, if *collapsed { "Show code" } else { "Hide code" });
            }
        }
        WidgetState::Theme(theme) => {
            if let Some(toggle) = nodes.toggle {
                page.set_attr(toggle, "data-theme", theme.as_str());
            }
        }
    }
}

fn set_open(page: &mut Page, widget: &Widget, open: bool) {
    let nodes = widget.nodes;
    for node in [nodes.container, nodes.panel].into_iter().flatten() {
        page.set_class(node, OPEN, open);
    }
    if let Some(toggle) = nodes.toggle {
        page.set_attr(toggle, "aria-expanded", open.to_string());
    }
}

fn apply_table(page: &mut Page, widget: &Widget, table: &TableModel) {
    let sort = table.sort_key();
    for (index, column) in table.columns.iter().enumerate() {
        let Some(node) = column.node else { continue };
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let on = sort.is_some_and(|s| s.column == index && s.direction == direction);
            page.set_class(node, direction.class(), on);
        }
    }

    for row in &table.rows {
        if let Some(node) = row.node {
            page.set_class(node, HIDDEN, row.hidden);
        }
    }
    if let Some(body) = widget.nodes.panel {
        reorder_rows(page, body, table);
    }

    if let Some(container) = widget.nodes.container
        && let Some(label) = page.select_first(container, &Selector::class(RESULTS))
    {
        page.set_text(label, table.result_label());
    }
}

/// Put row elements in model order; other children of the body keep their
/// place in front.
fn reorder_rows(page: &mut Page, body: NodeId, table: &TableModel) {
    let rows: Vec<NodeId> = table.rows.iter().filter_map(|r| r.node).collect();
    let mut order: Vec<NodeId> = page
        .children(body)
        .iter()
        .copied()
        .filter(|c| !rows.contains(c))
        .collect();
    order.extend(rows.iter().copied().filter(|r| page.parent(*r) == Some(body)));
    if order.as_slice() != page.children(body) && !page.reorder_children(body, &order) {
        tracing::debug!(body = %body, "table rows do not share one body; order not projected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Element;
    use crate::prefs::MemoryStore;
    use crate::widgets::Controller;

    fn table_page() -> Page {
        Page::new(
            "t",
            Element::new("body").child(
                Element::new("div").class("table-container").children([
                    Element::new("input").class("table-search"),
                    Element::new("span").class("table-results"),
                    Element::new("table").children([
                        Element::new("thead").child(Element::new("tr").child(
                            Element::new("th").attr("data-sortable", "name").text("Name"),
                        )),
                        Element::new("tbody").children([
                            Element::new("tr").child(Element::new("td").text("pear")),
                            Element::new("tr").child(Element::new("td").text("apple")),
                            Element::new("tr").child(Element::new("td").text("Pineapple")),
                        ]),
                    ]),
                ]),
            ),
        )
    }

    #[test]
    fn test_table_markers_follow_state() {
        let mut c = Controller::new(table_page(), Box::new(MemoryStore::new()));
        let id = c.registry().first_of_kind(WidgetKind::Table).unwrap();
        c.sort_table(id, "name", SortDirection::Ascending);
        c.filter_table(id, "apple");

        let page = c.page();
        let body = page.select_first(page.root(), &Selector::tag("tbody")).unwrap();
        let texts: Vec<_> = page.children(body).iter().map(|&r| page.text_content(r)).collect();
        assert_eq!(texts, vec!["apple", "pear", "Pineapple"]);
        let hidden: Vec<_> = page
            .children(body)
            .iter()
            .map(|&r| page.has_class(r, HIDDEN))
            .collect();
        assert_eq!(hidden, vec![false, true, false]);

        let th = page.select_first(page.root(), &Selector::tag("th")).unwrap();
        assert!(page.has_class(th, "sort-asc"));
        let results = page.select_first(page.root(), &Selector::class(RESULTS)).unwrap();
        assert_eq!(page.text_content(results), "2 results");
    }

    #[test]
    fn test_tabs_mark_active_tab_and_panel() {
        let page = Page::new(
            "t",
            Element::new("body").child(Element::new("div").class("tabs").children([
                Element::new("button").class("tab").attr("data-tab", "one").text("One"),
                Element::new("button").class("tab").attr("data-tab", "two").text("Two"),
                Element::new("div").class("tab-panel").id("one"),
                Element::new("div").class("tab-panel").id("two"),
            ])),
        );
        let mut c = Controller::new(page, Box::new(MemoryStore::new()));
        let id = c.registry().first_of_kind(WidgetKind::Tabs).unwrap();
        c.select_tab(id, "two");
        let page = c.page();
        let one = page.get_by_id("one").unwrap();
        let two = page.get_by_id("two").unwrap();
        assert!(!page.has_class(one, ACTIVE));
        assert!(page.has_class(two, ACTIVE));
    }

    #[test]
    fn test_code_example_markers_follow_collapse() {
        let page = Page::new(
            "t",
            Element::new("body").child(Element::new("div").class("code-example").children([
                Element::new("button").class("toggle-code-btn"),
                Element::new("pre").text("a { }"),
            ])),
        );
        let mut c = Controller::new(page, Box::new(MemoryStore::new()));
        let id = c.registry().first_of_kind(WidgetKind::CodeExample).unwrap();
        let nodes = c.widget(id).unwrap().nodes;
        let (example, toggle) = (nodes.container.unwrap(), nodes.toggle.unwrap());
        assert!(c.page().has_class(example, COLLAPSED));
        assert_eq!(c.page().text_content(toggle), "Show code");
        assert_eq!(c.page().attr(toggle, "aria-expanded"), Some("false"));

        c.toggle(id);
        assert!(!c.page().has_class(example, COLLAPSED));
        assert_eq!(c.page().text_content(toggle), "Hide code");
        assert_eq!(c.page().attr(toggle, "aria-expanded"), Some("true"));
    }

    #[test]
    fn test_search_marks_matches_only_for_non_empty_query() {
        let page = Page::new(
            "t",
            Element::new("body").children([
                Element::new("input").id("search"),
                Element::new("div").class("token-card").text("Lime"),
                Element::new("div").class("token-card").text("Ink"),
            ]),
        );
        let mut c = Controller::new(page, Box::new(MemoryStore::new()));
        let id = c.registry().first_of_kind(WidgetKind::PageSearch).unwrap();
        let cards = c.page().select(c.page().root(), &Selector::class("token-card"));
        assert!(cards.iter().all(|&n| !c.page().has_class(n, MATCH)));

        c.search_page(id, "lim");
        assert!(c.page().has_class(cards[0], MATCH));
        assert!(c.page().has_class(cards[1], HIDDEN));
        assert!(!c.page().has_class(cards[1], MATCH));

        c.search_page(id, "");
        let page = c.page();
        assert!(cards.iter().all(|&n| !page.has_class(n, MATCH) && !page.has_class(n, HIDDEN)));
    }
}
