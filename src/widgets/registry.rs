//! Declarative widget discovery.
//!
//! Each widget kind is described by a [`KindSelectors`] record: which
//! element is the container and which sub-elements make up its toggle,
//! panel and items. [`WidgetRegistry::scan`] applies those records to a
//! page once and produces plain [`Widget`] values; nothing afterwards looks
//! at selectors again.

use std::collections::BTreeSet;

use crate::page::{NodeId, Page, Selector};
use crate::widgets::table::{Column, Row, TableModel};
use crate::widgets::{ChildItem, Widget, WidgetId, WidgetKind, WidgetNodes, WidgetState};

/// Where a toggle element is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleScope {
    /// Inside the container.
    Within,
    /// Anywhere in the page (the drawer's hamburger lives in the header).
    Document,
    /// The container is its own toggle.
    SelfToggle,
}

/// Selector set for one widget kind.
#[derive(Debug, Clone)]
pub struct KindSelectors {
    pub kind: WidgetKind,
    pub container: Selector,
    pub toggle: Option<(Selector, ToggleScope)>,
    pub panel: Option<Selector>,
    /// Item elements; an element matching any of these is an item.
    pub items: Vec<Selector>,
    /// Content element inside or paired with each item.
    pub item_panel: Option<Selector>,
}

impl KindSelectors {
    fn new(kind: WidgetKind, container: Selector) -> Self {
        Self {
            kind,
            container,
            toggle: None,
            panel: None,
            items: Vec::new(),
            item_panel: None,
        }
    }

    fn toggle(mut self, class: &str, scope: ToggleScope) -> Self {
        self.toggle = Some((Selector::class(class), scope));
        self
    }

    fn panel(mut self, selector: Selector) -> Self {
        self.panel = Some(selector);
        self
    }

    fn item(mut self, selector: Selector) -> Self {
        self.items.push(selector);
        self
    }

    fn items(mut self, selectors: impl IntoIterator<Item = Selector>) -> Self {
        self.items.extend(selectors);
        self
    }

    fn item_panel(mut self, class: &str) -> Self {
        self.item_panel = Some(Selector::class(class));
        self
    }

    /// Elements the page-wide search filters when no override is given.
    pub fn default_search_cards() -> Vec<Selector> {
        ["component-card", "token-card", "quick-link-card"]
            .into_iter()
            .map(Selector::class)
            .collect()
    }

    /// The marker contract of the preview page.
    pub fn defaults() -> Vec<Self> {
        Self::defaults_with_cards(&Self::default_search_cards())
    }

    /// The default contract with a different set of searchable cards.
    pub fn defaults_with_cards(cards: &[Selector]) -> Vec<Self> {
        vec![
            Self::new(WidgetKind::Dropdown, Selector::class("nav-dropdown"))
                .toggle("nav-dropdown-toggle", ToggleScope::Within)
                .panel(Selector::class("nav-dropdown-menu"))
                .item(Selector::class("nav-dropdown-item")),
            Self::new(WidgetKind::LanguageSelector, Selector::class("language-selector"))
                .toggle("language-toggle", ToggleScope::Within)
                .panel(Selector::class("language-dropdown"))
                .item(Selector::class("language-option")),
            Self::new(WidgetKind::PageSearch, Selector::id("search"))
                .panel(Selector::id("no-results"))
                .items(cards.iter().cloned()),
            Self::new(WidgetKind::Tabs, Selector::class("tabs"))
                .item(Selector::class("tab"))
                .item_panel("tab-panel"),
            Self::new(WidgetKind::Accordion, Selector::class("accordion"))
                .item(Selector::class("accordion-item"))
                .item_panel("accordion-content"),
            Self::new(WidgetKind::Table, Selector::class("table-container"))
                .panel(Selector::class("table-search"))
                .item(Selector::tag("tr")),
            Self::new(WidgetKind::CodeExample, Selector::class("code-example"))
                .toggle("toggle-code-btn", ToggleScope::Within)
                .items([Selector::tag("pre"), Selector::tag("code")]),
            Self::new(WidgetKind::MobileDrawer, Selector::class("mobile-nav-drawer"))
                .toggle("mobile-nav-toggle", ToggleScope::Document)
                .item(Selector::tag("a")),
            Self::new(WidgetKind::ThemeToggle, Selector::class("theme-toggle"))
                .toggle("theme-toggle", ToggleScope::SelfToggle),
        ]
    }
}

/// Something that copies text to the clipboard when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTarget {
    pub node: NodeId,
    pub text: String,
}

/// A sidebar link pointing at a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub node: NodeId,
    pub label: String,
    pub target: String,
}

/// Everything interactive found on a page.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: Vec<Widget>,
    copy_targets: Vec<CopyTarget>,
    nav_links: Vec<NavLink>,
}

impl WidgetRegistry {
    /// Scan `page` with the default marker contract.
    pub fn scan(page: &Page) -> Self {
        Self::scan_with(page, &KindSelectors::defaults())
    }

    pub fn scan_with(page: &Page, kinds: &[KindSelectors]) -> Self {
        let mut registry = Self::default();
        for selectors in kinds {
            for container in page.select(page.root(), &selectors.container) {
                let id = WidgetId(registry.widgets.len());
                match build_widget(page, selectors, container, id) {
                    Some(widget) => registry.widgets.push(widget),
                    None => tracing::debug!(
                        kind = %selectors.kind,
                        node = %container,
                        "skipping widget with missing parts"
                    ),
                }
            }
        }
        registry.copy_targets = scan_copy_targets(page);
        registry.nav_links = scan_nav_links(page);
        tracing::debug!(
            widgets = registry.widgets.len(),
            copy_targets = registry.copy_targets.len(),
            nav_links = registry.nav_links.len(),
            "scanned page"
        );
        registry
    }

    /// Registry built from ready-made widgets, with no page behind it.
    pub fn from_widgets(widgets: Vec<Widget>) -> Self {
        let widgets = widgets
            .into_iter()
            .enumerate()
            .map(|(i, mut w)| {
                w.id = WidgetId(i);
                w
            })
            .collect();
        Self {
            widgets,
            ..Self::default()
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut [Widget] {
        &mut self.widgets
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.widgets.get_mut(id.0)
    }

    pub fn of_kind(&self, kind: WidgetKind) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(move |w| w.kind == kind)
    }

    pub fn first_of_kind(&self, kind: WidgetKind) -> Option<WidgetId> {
        self.of_kind(kind).next().map(|w| w.id)
    }

    pub fn copy_targets(&self) -> &[CopyTarget] {
        &self.copy_targets
    }

    pub fn nav_links(&self) -> &[NavLink] {
        &self.nav_links
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

fn build_widget(
    page: &Page,
    selectors: &KindSelectors,
    container: NodeId,
    id: WidgetId,
) -> Option<Widget> {
    let toggle = match &selectors.toggle {
        Some((_, ToggleScope::SelfToggle)) => Some(container),
        Some((selector, ToggleScope::Within)) => Some(page.select_first(container, selector)?),
        Some((selector, ToggleScope::Document)) => Some(page.select_first(page.root(), selector)?),
        None => None,
    };
    let label = toggle.map_or_else(String::new, |t| page.text_content(t));
    let mut nodes = WidgetNodes {
        container: Some(container),
        toggle,
        ..WidgetNodes::default()
    };

    let widget = match selectors.kind {
        WidgetKind::Dropdown | WidgetKind::LanguageSelector => {
            nodes.panel = Some(page.select_first(container, selectors.panel.as_ref()?)?);
            let items = scan_items(page, container, &selectors.items)?;
            let language = selectors.kind == WidgetKind::LanguageSelector;
            let children = items.into_iter().map(|node| {
                let text = page.text_content(node);
                let key = page.attr(node, "href").map_or_else(|| text.clone(), str::to_string);
                let item = ChildItem::new(key, text.clone()).with_node(node);
                if language { item.with_value(text) } else { item }
            });
            Widget::new(id, selectors.kind, label).with_children(children)
        }
        WidgetKind::Tabs => {
            let tabs = scan_items(page, container, &selectors.items)?;
            if tabs.is_empty() {
                return None;
            }
            let panels = selectors
                .item_panel
                .as_ref()
                .map(|s| page.select(container, s))
                .unwrap_or_default();
            let pairing = pair_tab_panels(page, &tabs, &panels);
            let children = tabs.iter().zip(pairing).map(|(&node, panel)| {
                let text = page.text_content(node);
                let key = page.attr(node, "data-tab").map_or_else(|| text.clone(), str::to_string);
                let item = ChildItem::new(key, text).with_node(node);
                match panel {
                    Some(panel) => item.with_panel(panel),
                    None => item,
                }
            });
            let mut widget = Widget::new(id, WidgetKind::Tabs, label).with_children(children);
            let preset = tabs
                .iter()
                .position(|&t| page.has_class(t, "active"))
                .and_then(|i| widget.children.get(i))
                .map(|c| c.key.clone());
            if let Some(key) = preset {
                widget.state = WidgetState::Tabs { active: Some(key) };
            }
            widget
        }
        WidgetKind::Accordion => {
            let items = scan_items(page, container, &selectors.items)?;
            let header = Selector::class("accordion-header");
            let mut expanded = BTreeSet::new();
            let mut children = Vec::new();
            for (i, node) in items.into_iter().enumerate() {
                let Some(head) = page.select_first(node, &header) else {
                    tracing::debug!(item = %node, "accordion item without header");
                    continue;
                };
                let key = page
                    .attr(node, "id")
                    .map_or_else(|| format!("item-{i}"), str::to_string);
                if page.has_class(node, "active") {
                    expanded.insert(key.clone());
                }
                let mut item = ChildItem::new(key, page.text_content(head)).with_node(head);
                if let Some(content) = selectors
                    .item_panel
                    .as_ref()
                    .and_then(|s| page.select_first(node, s))
                {
                    item = item.with_panel(content);
                }
                children.push(item);
            }
            let multiple = page.has_class(container, "accordion-multiple");
            if !multiple && expanded.len() > 1 {
                // First preset item in document order wins.
                let keep = children.iter().find(|c| expanded.contains(&c.key));
                expanded = keep.map(|c| c.key.clone()).into_iter().collect();
            }
            Widget::new(id, WidgetKind::Accordion, label)
                .with_children(children)
                .with_state(WidgetState::Accordion { expanded, multiple })
        }
        WidgetKind::Table => {
            nodes.search = selectors
                .panel
                .as_ref()
                .and_then(|s| page.select_first(container, s));
            let table = scan_table(page, container, &selectors.items)?;
            nodes.panel = table.rows.first().and_then(|r| r.node).and_then(|n| page.parent(n));
            let caption = page
                .select_first(container, &Selector::tag("caption"))
                .map(|c| page.text_content(c))
                .unwrap_or_default();
            Widget::new(id, WidgetKind::Table, caption).with_state(WidgetState::Table(table))
        }
        WidgetKind::MobileDrawer => {
            let links = scan_items(page, container, &selectors.items)?;
            let children = links.into_iter().filter_map(|node| {
                let target = page.attr(node, "href")?.strip_prefix('#')?.to_string();
                Some(ChildItem::new(target, page.text_content(node)).with_node(node))
            });
            nodes.panel = Some(container);
            Widget::new(id, WidgetKind::MobileDrawer, label).with_children(children)
        }
        WidgetKind::PageSearch => {
            nodes.search = Some(container);
            nodes.panel = selectors
                .panel
                .as_ref()
                .and_then(|s| page.select_first(page.root(), s));
            let cards = page.select_any(page.root(), &selectors.items);
            let children = cards.into_iter().enumerate().map(|(i, node)| {
                ChildItem::new(format!("card-{i}"), page.text_content(node)).with_node(node)
            });
            let placeholder = page.attr(container, "placeholder").unwrap_or("Search");
            Widget::new(id, WidgetKind::PageSearch, placeholder).with_children(children)
        }
        WidgetKind::CodeExample => {
            nodes.panel = page.select_any(container, &selectors.items).into_iter().next();
            let title = page
                .select_first(container, &Selector::class("code-title"))
                .map_or_else(|| "Code".to_string(), |t| page.text_content(t));
            Widget::new(id, WidgetKind::CodeExample, title)
        }
        WidgetKind::ThemeToggle => Widget::new(id, WidgetKind::ThemeToggle, label),
    };
    Some(widget.with_nodes(nodes))
}

/// Item elements inside `container`; `None` when the kind declares no items.
fn scan_items(page: &Page, container: NodeId, selectors: &[Selector]) -> Option<Vec<NodeId>> {
    (!selectors.is_empty()).then(|| page.select_any(container, selectors))
}

/// Panel for each tab: the `data-tab` target, else `tab-content-N`, else
/// the next panel no other tab has claimed.
fn pair_tab_panels(page: &Page, tabs: &[NodeId], panels: &[NodeId]) -> Vec<Option<NodeId>> {
    let by_id = |id: &str| panels.iter().copied().find(|&p| page.attr(p, "id") == Some(id));
    let mut pairing: Vec<Option<NodeId>> = tabs
        .iter()
        .enumerate()
        .map(|(i, &tab)| match page.attr(tab, "data-tab") {
            Some(target) => by_id(target),
            None => by_id(&format!("tab-content-{}", i + 1)),
        })
        .collect();
    let mut spare = panels
        .iter()
        .copied()
        .filter(|p| !pairing.contains(&Some(*p)))
        .collect::<Vec<_>>()
        .into_iter();
    for slot in pairing.iter_mut().filter(|slot| slot.is_none()) {
        *slot = spare.next();
    }
    pairing
}

fn scan_table(page: &Page, container: NodeId, rows: &[Selector]) -> Option<TableModel> {
    let th = Selector::tag("th");
    let td = Selector::tag("td");
    let columns: Vec<Column> = page
        .select(container, &th)
        .into_iter()
        .enumerate()
        .map(|(i, node)| {
            let label = page.text_content(node);
            let key = page
                .attr(node, "data-sortable")
                .filter(|v| !v.is_empty())
                .map_or_else(|| format!("col-{i}"), str::to_string);
            Column {
                key,
                label,
                sortable: page.attr(node, "data-sortable").is_some(),
                node: Some(node),
            }
        })
        .collect();
    if columns.is_empty() {
        return None;
    }
    if rows.is_empty() {
        return None;
    }
    let rows = page
        .select_any(container, rows)
        .into_iter()
        .filter_map(|tr| {
            let cells: Vec<String> = page
                .children(tr)
                .iter()
                .filter(|&&c| page.node(c).is_some_and(|n| td.matches(n)))
                .map(|&c| page.text_content(c))
                .collect();
            (!cells.is_empty()).then(|| Row {
                cells,
                hidden: false,
                node: Some(tr),
            })
        })
        .collect();
    Some(TableModel::new(columns, rows))
}

fn scan_copy_targets(page: &Page) -> Vec<CopyTarget> {
    let mut targets = Vec::new();
    let copy_btn = Selector::class("copy-btn");
    let code = Selector::tag("code");
    let pre = Selector::tag("pre");
    for example in page.select(page.root(), &Selector::class("code-example")) {
        let Some(button) = page.select_first(example, &copy_btn) else {
            continue;
        };
        let body = page
            .select_first(example, &code)
            .or_else(|| page.select_first(example, &pre));
        match body {
            Some(body) => targets.push(CopyTarget {
                node: button,
                text: page.text_content(body),
            }),
            None => tracing::debug!(example = %example, "code example without code body"),
        }
    }
    for swatch in page.select(page.root(), &Selector::class("color-preview")) {
        if let Some(color) = page.attr(swatch, "data-color") {
            targets.push(CopyTarget {
                node: swatch,
                text: color.to_string(),
            });
        }
    }
    targets
}

fn scan_nav_links(page: &Page) -> Vec<NavLink> {
    page.select(page.root(), &Selector::class("sidebar-link"))
        .into_iter()
        .filter_map(|node| {
            let target = page.attr(node, "href")?.strip_prefix('#')?;
            Some(NavLink {
                node,
                label: page.text_content(node),
                target: target.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Element;

    fn dropdown(label: &str) -> Element {
        Element::new("div").class("nav-dropdown").children([
            Element::new("button").class("nav-dropdown-toggle").text(label),
            Element::new("div").class("nav-dropdown-menu").children([
                Element::new("a")
                    .class("nav-dropdown-item")
                    .attr("href", "#colors")
                    .text("Colors"),
                Element::new("a")
                    .class("nav-dropdown-item")
                    .attr("href", "#type")
                    .text("Type"),
            ]),
        ])
    }

    fn page(children: Vec<Element>) -> Page {
        Page::new("t", Element::new("body").children(children))
    }

    #[test]
    fn test_scan_finds_dropdown_parts() {
        let page = page(vec![dropdown("Foundations")]);
        let registry = WidgetRegistry::scan(&page);
        assert_eq!(registry.len(), 1);
        let widget = &registry.widgets()[0];
        assert_eq!(widget.kind, WidgetKind::Dropdown);
        assert_eq!(widget.label, "Foundations");
        assert_eq!(widget.children.len(), 2);
        assert_eq!(widget.children[0].key, "#colors");
        assert!(widget.nodes.toggle.is_some());
        assert!(widget.nodes.panel.is_some());
    }

    #[test]
    fn test_missing_menu_skips_instance() {
        let broken = Element::new("div")
            .class("nav-dropdown")
            .child(Element::new("button").class("nav-dropdown-toggle").text("X"));
        let page = page(vec![broken, dropdown("Ok")]);
        let registry = WidgetRegistry::scan(&page);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.widgets()[0].label, "Ok");
        assert_eq!(registry.widgets()[0].id, WidgetId(0));
    }

    #[test]
    fn test_tabs_pair_panels_by_target_then_index() {
        let tabs = Element::new("div").class("tabs").children([
            Element::new("button").class("tab").attr("data-tab", "css").text("CSS"),
            Element::new("button").class("tab active").text("HTML"),
            Element::new("div").class("tab-panel").text("first"),
            Element::new("div").class("tab-panel").id("css").text("css body"),
        ]);
        let page = page(vec![tabs]);
        let registry = WidgetRegistry::scan(&page);
        let widget = &registry.widgets()[0];
        let css_panel = widget.children[0].panel.unwrap();
        assert_eq!(page.text_content(css_panel), "css body");
        let html_panel = widget.children[1].panel.unwrap();
        assert_eq!(page.text_content(html_panel), "first");
        assert_ne!(css_panel, html_panel);
        assert_eq!(widget.active_key(), Some("HTML"));
    }

    #[test]
    fn test_bare_tabs_fall_back_to_numbered_panels() {
        let tabs = Element::new("div").class("tabs").children([
            Element::new("button").class("tab").text("One"),
            Element::new("button").class("tab").text("Two"),
            Element::new("div").class("tab-panel").id("tab-content-2").text("second"),
            Element::new("div").class("tab-panel").id("tab-content-1").text("first"),
        ]);
        let page = page(vec![tabs]);
        let registry = WidgetRegistry::scan(&page);
        let widget = &registry.widgets()[0];
        let texts: Vec<_> = widget
            .children
            .iter()
            .map(|c| page.text_content(c.panel.unwrap()))
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_single_accordion_keeps_first_preset_in_document_order() {
        let item = |id: &str| {
            Element::new("div").class("accordion-item active").id(id).children([
                Element::new("button").class("accordion-header").text(id),
                Element::new("div").class("accordion-content"),
            ])
        };
        let accordion = Element::new("div")
            .class("accordion")
            .children([item("zeta"), item("alpha")]);
        let page = page(vec![accordion]);
        let registry = WidgetRegistry::scan(&page);
        let widget = &registry.widgets()[0];
        assert!(widget.is_expanded("zeta"));
        assert!(!widget.is_expanded("alpha"));
    }

    #[test]
    fn test_page_search_collects_cards_across_the_page() {
        let page = page(vec![
            Element::new("input").id("search").attr("placeholder", "Find components"),
            Element::new("div").class("component-card").text("Button"),
            Element::new("section").child(Element::new("div").class("token-card").text("Lime")),
            Element::new("a").class("quick-link-card").text("Tables"),
            Element::new("p").id("no-results").text("Nothing found"),
        ]);
        let registry = WidgetRegistry::scan(&page);
        let id = registry.first_of_kind(WidgetKind::PageSearch).unwrap();
        let search = registry.get(id).unwrap();
        assert_eq!(search.label, "Find components");
        let labels: Vec<_> = search.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Button", "Lime", "Tables"]);
        assert_eq!(search.nodes.search, page.get_by_id("search"));
        assert_eq!(search.nodes.panel, page.get_by_id("no-results"));

        let only_tokens = KindSelectors::defaults_with_cards(&[Selector::class("token-card")]);
        let registry = WidgetRegistry::scan_with(&page, &only_tokens);
        let id = registry.first_of_kind(WidgetKind::PageSearch).unwrap();
        assert_eq!(registry.get(id).unwrap().children.len(), 1);
    }

    #[test]
    fn test_code_example_needs_toggle_button() {
        let example = |toggle: bool| {
            let mut header = Element::new("div").class("code-header").children([
                Element::new("span").class("code-title").text("Button"),
                Element::new("button").class("copy-btn").text("Copy"),
            ]);
            if toggle {
                header = header.child(Element::new("button").class("toggle-code-btn"));
            }
            Element::new("div").class("code-example").children([
                header,
                Element::new("pre").child(Element::new("code").text("<button>")),
            ])
        };
        let page = page(vec![example(true), example(false)]);
        let registry = WidgetRegistry::scan(&page);
        let code: Vec<_> = registry.of_kind(WidgetKind::CodeExample).collect();
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].label, "Button");
        assert!(code[0].is_collapsed());
        let pre = code[0].nodes.panel.unwrap();
        assert_eq!(page.node(pre).unwrap().tag, "pre");
        assert_eq!(registry.copy_targets().len(), 2);
    }

    #[test]
    fn test_table_scan_reads_columns_and_rows() {
        let table = Element::new("div").class("table-container").children([
            Element::new("input").class("table-search"),
            Element::new("table").children([
                Element::new("thead").child(Element::new("tr").children([
                    Element::new("th").attr("data-sortable", "name").text("Name"),
                    Element::new("th").text("Notes"),
                ])),
                Element::new("tbody").children([
                    Element::new("tr").children([
                        Element::new("td").text("Lime"),
                        Element::new("td").text("accent"),
                    ]),
                    Element::new("tr").children([
                        Element::new("td").text("Ink"),
                        Element::new("td").text("text"),
                    ]),
                ]),
            ]),
        ]);
        let page = page(vec![table]);
        let registry = WidgetRegistry::scan(&page);
        let widget = &registry.widgets()[0];
        let model = widget.table().unwrap();
        assert_eq!(model.columns.len(), 2);
        assert!(model.columns[0].sortable);
        assert!(!model.columns[1].sortable);
        assert_eq!(model.column_index("name"), Some(0));
        assert_eq!(model.rows.len(), 2);
        assert!(widget.nodes.search.is_some());
        assert_eq!(page.node(widget.nodes.panel.unwrap()).unwrap().tag, "tbody");
    }

    #[test]
    fn test_drawer_toggle_is_found_in_document() {
        let page = page(vec![
            Element::new("button").class("mobile-nav-toggle").text("Menu"),
            Element::new("nav").class("mobile-nav-drawer").children([
                Element::new("a").attr("href", "#colors").text("Colors"),
                Element::new("a").attr("href", "https://example.com").text("Elsewhere"),
            ]),
        ]);
        let registry = WidgetRegistry::scan(&page);
        let drawer = registry.first_of_kind(WidgetKind::MobileDrawer).unwrap();
        let drawer = registry.get(drawer).unwrap();
        assert!(drawer.nodes.toggle.is_some());
        assert_eq!(drawer.children.len(), 1);
        assert_eq!(drawer.children[0].key, "colors");
    }

    #[test]
    fn test_copy_targets_and_nav_links() {
        let page = page(vec![
            Element::new("a")
                .class("sidebar-link")
                .attr("href", "#colors")
                .text("Colors"),
            Element::new("a")
                .class("sidebar-link")
                .attr("href", "/elsewhere")
                .text("Away"),
            Element::new("div").class("code-example").children([
                Element::new("button").class("copy-btn").text("Copy"),
                Element::new("pre").child(Element::new("code").text(".btn { color: red; }")),
            ]),
            Element::new("div")
                .class("color-preview")
                .attr("data-color", "#C5F955"),
        ]);
        let registry = WidgetRegistry::scan(&page);
        let texts: Vec<_> = registry.copy_targets().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec![".btn { color: red; }", "#C5F955"]);
        assert_eq!(registry.nav_links().len(), 1);
        assert_eq!(registry.nav_links()[0].target, "colors");
    }

    #[test]
    fn test_from_widgets_renumbers() {
        let registry = WidgetRegistry::from_widgets(vec![
            Widget::new(WidgetId(7), WidgetKind::Dropdown, "a"),
            Widget::new(WidgetId(7), WidgetKind::Dropdown, "b"),
        ]);
        let ids: Vec<_> = registry.widgets().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![WidgetId(0), WidgetId(1)]);
    }
}
