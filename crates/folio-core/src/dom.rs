#![forbid(unsafe_code)]

//! Document capability surface.
//!
//! The page logic only ever needs a handful of document operations: look
//! elements up by selector, set their text, flip CSS classes, read an
//! attribute, set an inline style and measure rendered width. [`Document`]
//! captures exactly that, so the same [`Page`](crate::page::Page) runs against
//! the browser DOM (`folio-web`) or the headless [`MemoryDocument`].

use std::collections::BTreeMap;

/// CSS class names toggled by the page.
pub mod class {
    pub const ACTIVE: &str = "active";
    pub const SECTION_SHOW: &str = "section-show";
    pub const HEADER_TOP: &str = "header-top";
    pub const NAVBAR_MOBILE: &str = "navbar-mobile";
    pub const ICON_LIST: &str = "bi-list";
    pub const ICON_CLOSE: &str = "bi-x";
    pub const FILTER_ACTIVE: &str = "filter-active";
}

/// Operations the page needs from its hosting document.
///
/// Lookups that find nothing return `None` / an empty list; the caller treats
/// that as "feature absent", never as an error.
pub trait Document {
    /// Element handle.
    type Node: Clone;

    /// First element matching `selector`, in document order.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// Every element matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    /// Replace the visible text of `node`.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Add (`on = true`) or remove `class` on `node`.
    fn set_class(&mut self, node: &Self::Node, class: &str, on: bool);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Set an inline style property.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Rendered width of `node`'s content in CSS pixels.
    fn content_width(&self, node: &Self::Node) -> f64;

    /// Bring the viewport back to the top of the page.
    fn scroll_to_top(&mut self);

    /// Set `class` on exactly one of `nodes` (or none), clearing it elsewhere.
    fn set_class_exclusive(&mut self, nodes: &[Self::Node], class: &str, chosen: Option<usize>) {
        for (i, node) in nodes.iter().enumerate() {
            self.set_class(node, class, Some(i) == chosen);
        }
    }
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// One compound selector: `tag#id.class.class`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(src: &str) -> Option<Self> {
        let mut out = Compound::default();
        let mut rest = src;
        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_end > 0 {
            out.tag = Some(rest[..tag_end].to_ascii_lowercase());
        }
        rest = &rest[tag_end..];
        while let Some(sigil) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return None;
            }
            match sigil {
                '#' => out.id = Some(name.to_owned()),
                _ => out.classes.push(name.to_owned()),
            }
            rest = &body[end..];
        }
        Some(out)
    }

    fn matches(&self, el: &Element) -> bool {
        self.tag.as_deref().is_none_or(|tag| el.tag == tag)
            && self
                .id
                .as_deref()
                .is_none_or(|id| el.id.as_deref() == Some(id))
            && self.classes.iter().all(|c| el.classes.contains(c))
    }
}

/// Descendant-combinator selector: `A B C`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    fn parse(src: &str) -> Option<Self> {
        let parts = src
            .split_whitespace()
            .map(Compound::parse)
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            None
        } else {
            Some(Self { parts })
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryDocument
// ---------------------------------------------------------------------------

/// Handle to an element inside a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    parent: Option<NodeId>,
}

/// Headless element tree implementing [`Document`].
///
/// Elements are kept in creation order, which doubles as document order.
/// Widths are measured as `graphemes × glyph_width`.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    glyph_width: f64,
    scroll_requests: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            glyph_width: 8.0,
            scroll_requests: 0,
        }
    }

    /// Set the synthetic per-grapheme width used by `content_width`.
    #[must_use]
    pub fn with_glyph_width(mut self, width: f64) -> Self {
        self.glyph_width = width;
        self
    }

    /// Append an element described by a compound selector such as
    /// `a#home.nav-link.active` under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `spec` is not a single compound selector with a tag.
    pub fn append(&mut self, parent: Option<NodeId>, spec: &str) -> NodeId {
        let compound = Compound::parse(spec.trim())
            .filter(|c| c.tag.is_some())
            .unwrap_or_else(|| panic!("invalid element spec: {spec:?}"));
        let id = NodeId(self.elements.len());
        self.elements.push(Element {
            tag: compound.tag.unwrap_or_default(),
            id: compound.id,
            classes: compound.classes,
            parent,
            ..Element::default()
        });
        id
    }

    /// Set an attribute on `node`.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.elements[node.0]
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> &str {
        &self.elements[node.0].text
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.elements[node.0].style.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        &self.elements[node.0].classes
    }

    /// Number of `scroll_to_top` calls so far.
    #[must_use]
    pub fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        let Some((last, ancestors)) = selector.parts.split_last() else {
            return false;
        };
        if !last.matches(&self.elements[node.0]) {
            return false;
        }
        // Greedy right-to-left walk is exact for descendant-only selectors.
        let mut pending = ancestors.iter().rev().peekable();
        let mut cursor = self.elements[node.0].parent;
        while let (Some(part), Some(at)) = (pending.peek(), cursor) {
            if part.matches(&self.elements[at.0]) {
                pending.next();
            }
            cursor = self.elements[at.0].parent;
        }
        pending.peek().is_none()
    }

    fn select(&self, selector: &str) -> impl Iterator<Item = NodeId> + '_ {
        let parsed = Selector::parse(selector);
        (0..self.elements.len())
            .map(NodeId)
            .filter(move |&n| parsed.as_ref().is_some_and(|s| self.matches(n, s)))
    }
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.select(selector).next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(selector).collect()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        text.clone_into(&mut self.elements[node.0].text);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.elements[node.0].classes.iter().any(|c| c == class)
    }

    fn set_class(&mut self, node: &NodeId, class: &str, on: bool) {
        let classes = &mut self.elements[node.0].classes;
        let present = classes.iter().position(|c| c == class);
        match (on, present) {
            (true, None) => classes.push(class.to_owned()),
            (false, Some(i)) => {
                classes.remove(i);
            }
            _ => {}
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let el = &self.elements[node.0];
        match name {
            "id" => el.id.clone(),
            _ => el.attributes.get(name).cloned(),
        }
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        self.elements[node.0]
            .style
            .insert(property.to_owned(), value.to_owned());
    }

    fn content_width(&self, node: &NodeId) -> f64 {
        use unicode_segmentation::UnicodeSegmentation;
        let graphemes = self.elements[node.0].text.graphemes(true).count();
        graphemes as f64 * self.glyph_width
    }

    fn scroll_to_top(&mut self) {
        self.scroll_requests += 1;
    }
}
