//! Core page types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PageError;

/// Index of a node inside a [`Page`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Serialized element description, as found in page files.
///
/// `class` is a whitespace-separated list, matching how markup writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// Start an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A node in the page arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.dom_id.as_deref(),
            _ => self.attrs.get(name).map(String::as_str),
        }
    }
}

/// How an attribute condition in a [`Selector`] matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrMatch {
    Present,
    Equals(String),
    Prefix(String),
}

/// A compound selector: optional tag, any number of classes, any number of
/// attribute conditions. No combinators.
///
/// Supported syntax: `tag`, `.class`, `#id`, `[attr]`, `[attr=value]`,
/// `[attr^=value]` and any concatenation of those (`th[data-sortable]`,
/// `.tab.active`, `input#search`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, AttrMatch)>,
}

impl Selector {
    /// Parse a compound selector.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidSelector`] for empty input, unterminated
    /// attribute brackets or unsupported characters.
    pub fn parse(input: &str) -> Result<Self, PageError> {
        let invalid = |reason| PageError::InvalidSelector {
            selector: input.to_string(),
            reason,
        };
        let input_trimmed = input.trim();
        if input_trimmed.is_empty() {
            return Err(invalid("empty selector"));
        }

        let mut selector = Self::default();
        let mut rest = input_trimmed;
        let tag_len = rest
            .find(|c: char| matches!(c, '.' | '#' | '['))
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if !tag.chars().all(is_ident_char) {
                return Err(invalid("unsupported character in tag"));
            }
            selector.tag = Some(tag.to_ascii_lowercase());
            rest = &rest[tag_len..];
        }

        while !rest.is_empty() {
            if let Some(after_dot) = rest.strip_prefix('.') {
                let len = after_dot
                    .find(|c: char| !is_ident_char(c))
                    .unwrap_or(after_dot.len());
                if len == 0 {
                    return Err(invalid("empty class name"));
                }
                selector.classes.push(after_dot[..len].to_string());
                rest = &after_dot[len..];
            } else if let Some(after_hash) = rest.strip_prefix('#') {
                let len = after_hash
                    .find(|c: char| !is_ident_char(c))
                    .unwrap_or(after_hash.len());
                if len == 0 {
                    return Err(invalid("empty id"));
                }
                let id = AttrMatch::Equals(after_hash[..len].to_string());
                selector.attrs.push(("id".to_string(), id));
                rest = &after_hash[len..];
            } else if let Some(after_bracket) = rest.strip_prefix('[') {
                let Some(close) = after_bracket.find(']') else {
                    return Err(invalid("unterminated attribute"));
                };
                let body = &after_bracket[..close];
                let condition = if let Some((name, value)) = body.split_once("^=") {
                    (name.trim().to_string(), AttrMatch::Prefix(unquote(value)))
                } else if let Some((name, value)) = body.split_once('=') {
                    (name.trim().to_string(), AttrMatch::Equals(unquote(value)))
                } else {
                    (body.trim().to_string(), AttrMatch::Present)
                };
                if condition.0.is_empty() || !condition.0.chars().all(is_ident_char) {
                    return Err(invalid("bad attribute name"));
                }
                selector.attrs.push(condition);
                rest = &after_bracket[close + 1..];
            } else {
                return Err(invalid("unsupported character"));
            }
        }
        Ok(selector)
    }

    /// Parse a comma-separated selector list (`.token-card, .component-card`).
    ///
    /// # Errors
    ///
    /// Returns the first [`PageError::InvalidSelector`] in the list.
    pub fn parse_list(input: &str) -> Result<Vec<Self>, PageError> {
        input.split(',').map(Self::parse).collect()
    }

    /// Selector matching one element id.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            attrs: vec![("id".to_string(), AttrMatch::Equals(id.into()))],
            ..Self::default()
        }
    }

    /// Selector matching a single class.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            classes: vec![name.into()],
            ..Self::default()
        }
    }

    /// Selector matching a tag name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            tag: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, node: &Node) -> bool {
        if self
            .tag
            .as_deref()
            .is_some_and(|tag| !node.tag.eq_ignore_ascii_case(tag))
        {
            return false;
        }
        if !self.classes.iter().all(|class| node.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|(name, cond)| match (node.attr(name), cond) {
            (Some(_), AttrMatch::Present) => true,
            (Some(value), AttrMatch::Equals(expected)) => value == expected,
            (Some(value), AttrMatch::Prefix(prefix)) => value.starts_with(prefix.as_str()),
            (None, _) => false,
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn unquote(value: &str) -> String {
    value.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// An element tree stored as an arena.
///
/// The root is always `NodeId(0)`. Nodes are never removed; hiding and
/// reordering happen through classes and child order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    title: String,
    nodes: Vec<Node>,
}

impl Page {
    /// Build a page from an element description.
    pub fn new(title: impl Into<String>, root: Element) -> Self {
        let mut page = Self {
            title: title.into(),
            nodes: Vec::new(),
        };
        page.push_element(root, None);
        page
    }

    /// An empty page with a bare `body` root.
    pub fn empty() -> Self {
        Self::new(String::new(), Element::new("body"))
    }

    fn push_element(&mut self, element: Element, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: element.tag.to_ascii_lowercase(),
            dom_id: element.id,
            classes: element
                .class
                .split_whitespace()
                .map(ToOwned::to_owned)
                .collect(),
            attrs: element.attrs,
            text: element.text,
            parent,
            children: Vec::new(),
        });
        for child in element.children {
            let child_id = self.push_element(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Look up a node by its `id` attribute.
    pub fn get_by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.dom_id.as_deref() == Some(dom_id))
            .map(NodeId)
    }

    /// All descendants of `scope` (excluding `scope`) matching `selector`, in
    /// document order.
    pub fn select(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.select_any(scope, std::slice::from_ref(selector))
    }

    /// Descendants of `scope` matching any of `selectors`, in document order.
    pub fn select_any(&self, scope: NodeId, selectors: &[Selector]) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if selectors.iter().any(|s| s.matches(node)) {
                out.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.select(scope, selector).into_iter().next()
    }

    /// Nearest ancestor-or-self of `id` matching `selector`.
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        self.ancestors_inclusive(id)
            .find(|&candidate| self.node(candidate).is_some_and(|n| selector.matches(n)))
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).map(|_| id), move |&current| self.parent(current))
    }

    /// True if `node` is `ancestor` or lies inside it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors_inclusive(node).any(|id| id == ancestor)
    }

    /// Concatenated text of a node and its descendants, whitespace-normalized.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(id, &mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, id: NodeId, out: &mut Vec<&'a str>) {
        let Some(node) = self.node(id) else { return };
        out.extend(node.text.split_whitespace());
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.has_class(class))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attr(name))
    }

    /// Add `class` to a node. Returns false when the node does not exist.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return false;
        };
        if !node.has_class(class) {
            node.classes.push(class.to_string());
        }
        true
    }

    /// Remove `class` from a node. Returns false when the node does not exist.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return false;
        };
        node.classes.retain(|c| c != class);
        true
    }

    /// Add or remove `class` depending on `on`.
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) -> bool {
        if on {
            self.add_class(id, class)
        } else {
            self.remove_class(id, class)
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return false;
        };
        node.attrs.insert(name.to_string(), value.into());
        true
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let Some(node) = self.nodes.get_mut(id.0) else {
            return false;
        };
        node.text = text.into();
        true
    }

    /// Reorder the children of `parent` to follow `order`.
    ///
    /// `order` must be a permutation of the current children; anything else
    /// leaves the page untouched and returns false.
    pub fn reorder_children(&mut self, parent: NodeId, order: &[NodeId]) -> bool {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return false;
        };
        let mut current = node.children.clone();
        let mut proposed = order.to_vec();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return false;
        }
        node.children = order.to_vec();
        true
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::empty()
    }
}
