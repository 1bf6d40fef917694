//! Markup parser – converts an SVG template string into a simple owned tree.
//!
//! Templates are XML, so parsing is delegated to `roxmltree`. Before parsing
//! the markup is purged of comments and `<style>` blocks and `&nbsp;` is
//! replaced by a plain space (it is not an XML entity).
//!
//! Element and attribute names are kept by their local name, so
//! `xlink:href` is reachable as `href`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::Result;

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

/// The tag name of an element, as used for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Svg,
    Text,
    Rect,
    Polygon,
    Image,
    Switch,
    /// Anything else; the lower-cased name is kept for error reporting.
    Unknown(String),
}

impl Tag {
    pub fn from_name(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Tag::Svg,
            "text" => Tag::Text,
            "rect" => Tag::Rect,
            "polygon" => Tag::Polygon,
            "image" => Tag::Image,
            "switch" => Tag::Switch,
            other => Tag::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tag::Svg => "svg",
            Tag::Text => "text",
            Tag::Rect => "rect",
            Tag::Polygon => "polygon",
            Tag::Image => "image",
            Tag::Switch => "switch",
            Tag::Unknown(name) => name,
        }
    }
}

/// A node in our DOM tree.
#[derive(Debug, Clone)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
}

/// An element node carrying tag, attributes, and children.
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.tag.name()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Child elements in document order, text nodes skipped.
    pub fn element_children(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(|c| match c {
            DomNode::Element(e) => Some(e),
            DomNode::Text(_) => None,
        })
    }

    /// Concatenation of the direct text children (nested elements excluded).
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                DomNode::Text(t) => Some(t.as_str()),
                DomNode::Element(_) => None,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Strip comments and `<style>` blocks, turn `&nbsp;` into a space.
pub fn purge_markup(content: &str) -> String {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static STYLE: OnceLock<Regex> = OnceLock::new();

    let comment = COMMENT.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
    let style = STYLE.get_or_init(|| Regex::new(r"(?s)<style>.*?</style>").unwrap());

    let content = comment.replace_all(content, "");
    let content = style.replace_all(&content, "");
    content.replace("&nbsp;", " ")
}

/// Parse template markup and return its root element.
pub fn parse_markup(content: &str) -> Result<ElementNode> {
    let purged = purge_markup(content);
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;
    let doc = roxmltree::Document::parse_with_options(&purged, options)?;
    Ok(convert_element(doc.root_element()))
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> ElementNode {
    let mut elem = ElementNode::new(Tag::from_name(node.tag_name().name()));

    // Un-namespaced attributes win over prefixed ones with the same local name.
    for attr in node.attributes() {
        let name = attr.name().to_string();
        if attr.namespace().is_none() {
            elem.attributes.insert(name, attr.value().to_string());
        } else {
            elem.attributes
                .entry(name)
                .or_insert_with(|| attr.value().to_string());
        }
    }

    for child in node.children() {
        if child.is_element() {
            elem.children.push(DomNode::Element(convert_element(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                elem.children.push(DomNode::Text(text.to_string()));
            }
        }
    }

    elem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_document() {
        let svg = r#"<svg width="100"><rect x="1" y="2" width="3" height="4"/></svg>"#;
        let root = parse_markup(svg).unwrap();
        assert_eq!(root.tag, Tag::Svg);
        assert_eq!(root.attribute("width"), Some("100"));
        let children: Vec<_> = root.element_children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag, Tag::Rect);
    }

    #[test]
    fn tag_names_are_case_insensitive() {
        assert_eq!(Tag::from_name("TEXT"), Tag::Text);
        assert_eq!(Tag::from_name("Circle"), Tag::Unknown("circle".to_string()));
        assert_eq!(Tag::from_name("Circle").name(), "circle");
    }

    #[test]
    fn purge_removes_comments_styles_and_nbsp() {
        let purged = purge_markup("<a><!-- x\ny --><style>.c{}</style>1&nbsp;2</a>");
        assert_eq!(purged, "<a>1 2</a>");
    }

    #[test]
    fn nbsp_entity_parses_after_purge() {
        let root = parse_markup("<svg width=\"1\"><text>a&nbsp;b</text></svg>").unwrap();
        let text = root.element_children().next().unwrap();
        assert_eq!(text.text(), "a b");
    }

    #[test]
    fn namespaced_href_is_reachable_by_local_name() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="5"><image xlink:href="logo.png"/></svg>"#;
        let root = parse_markup(svg).unwrap();
        let image = root.element_children().next().unwrap();
        assert_eq!(image.tag, Tag::Image);
        assert_eq!(image.attribute("href"), Some("logo.png"));
    }

    #[test]
    fn text_only_collects_direct_children() {
        let root = parse_markup("<svg><text>Hello <tspan>inner</tspan>world</text></svg>").unwrap();
        let text = root.element_children().next().unwrap();
        assert_eq!(text.text(), "Hello world");
    }

    #[test]
    fn malformed_markup_is_an_error() {
        assert!(parse_markup("<svg><rect></svg>").is_err());
    }
}
