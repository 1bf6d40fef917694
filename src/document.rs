//! Document builder – turns a parsed markup tree into a [`Document`].
//!
//! Direct children of the root must be supported primitives. Children of a
//! `<switch>` are flattened into the surrounding sequence, and tags that
//! have no element there are skipped instead of failing the build.

use std::path::{Path, PathBuf};

use crate::attributes::required_int;
use crate::dom::{ElementNode, Tag};
use crate::elements::{Element, ImageElement, PolygonElement, RectElement, TextElement};
use crate::error::{Error, Result};

/// A built template: its declared logical width and the elements to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: i32,
    pub elements: Vec<Element>,
}

impl Document {
    pub fn text_elements(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter().filter_map(Element::as_text)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    image_path: Option<PathBuf>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base directory `<image href>` values are resolved against.
    pub fn with_image_path(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.image_path = path.map(Into::into);
        self
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    /// Build a document; the root must declare its logical `width`.
    pub fn build(&self, root: &ElementNode) -> Result<Document> {
        let width = required_int(root, "width")?;
        let elements = self.elements(root)?;
        log::debug!(
            "built <{}> document: width={width}, {} elements",
            root.name(),
            elements.len()
        );
        Ok(Document { width, elements })
    }

    /// Build the children of `root` without requiring a declared width.
    pub fn elements(&self, root: &ElementNode) -> Result<Vec<Element>> {
        let mut elements = Vec::new();
        for child in root.element_children() {
            match self.build_element(child)? {
                Some(element) => push_flattened(&mut elements, element),
                None => return Err(Error::UnsupportedElement { tag: child.name().to_string() }),
            }
        }
        Ok(elements)
    }

    /// `Ok(None)` when the tag has no element counterpart.
    fn build_element(&self, node: &ElementNode) -> Result<Option<Element>> {
        log::trace!("building <{}>", node.name());
        let element = match node.tag {
            Tag::Rect => Element::Rect(RectElement::from_node(node)?),
            Tag::Polygon => Element::Polygon(PolygonElement::from_node(node)?),
            Tag::Text => Element::Text(TextElement::from_node(node)?),
            Tag::Image => Element::Image(ImageElement::from_node(node, self.image_path())?),
            Tag::Switch => Element::Group(self.build_group(node)?),
            Tag::Svg | Tag::Unknown(_) => return Ok(None),
        };
        Ok(Some(element))
    }

    fn build_group(&self, node: &ElementNode) -> Result<Vec<Element>> {
        let mut children = Vec::new();
        for child in node.element_children() {
            match self.build_element(child)? {
                Some(element) => push_flattened(&mut children, element),
                None => log::trace!("skipping <{}> inside <switch>", child.name()),
            }
        }
        Ok(children)
    }
}

fn push_flattened(out: &mut Vec<Element>, element: Element) {
    match element {
        Element::Group(children) => out.extend(children),
        other => out.push(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_markup;

    fn build(markup: &str) -> Result<Document> {
        DocumentBuilder::new().build(&parse_markup(markup)?)
    }

    #[test]
    fn builds_primitives_in_order() {
        let doc = build(
            r#"<svg width="800">
                <rect x="0" y="0" width="10" height="10"/>
                <polygon points="0,0 10,0 5,5"/>
                <text x="1" y="2" font-size="12">Hello</text>
            </svg>"#,
        )
        .unwrap();
        assert_eq!(doc.width, 800);
        assert_eq!(doc.elements.len(), 3);
        assert!(matches!(doc.elements[0], Element::Rect(_)));
        assert!(matches!(doc.elements[1], Element::Polygon(_)));
        assert_eq!(doc.text_elements().count(), 1);
    }

    #[test]
    fn width_is_required() {
        match build(r#"<svg><rect x="0" y="0" width="1" height="1"/></svg>"#) {
            Err(Error::MissingAttribute { element, attribute }) => {
                assert_eq!(element, "svg");
                assert_eq!(attribute, "width");
            }
            other => panic!("expected missing width, got {other:?}"),
        }
    }

    #[test]
    fn elements_do_not_need_width() {
        let root = parse_markup(r#"<svg><text x="0" y="0" font-size="9">a</text></svg>"#).unwrap();
        assert_eq!(DocumentBuilder::new().elements(&root).unwrap().len(), 1);
    }

    #[test]
    fn unknown_top_level_tag_fails() {
        assert!(matches!(
            build(r#"<svg width="100"><unknown/></svg>"#),
            Err(Error::UnsupportedElement { tag }) if tag == "unknown"
        ));
    }

    #[test]
    fn switch_is_flattened_and_lenient() {
        let doc = build(
            r#"<svg width="100">
                <rect x="0" y="0" width="1" height="1"/>
                <switch>
                    <unknown/>
                    <text x="0" y="0" font-size="8">a</text>
                    <switch><circle r="2"/><rect x="1" y="1" width="1" height="1"/></switch>
                </switch>
                <polygon points="0 0 1 1"/>
            </svg>"#,
        )
        .unwrap();
        let kinds: Vec<_> = doc
            .elements
            .iter()
            .map(|e| match e {
                Element::Rect(_) => "rect",
                Element::Polygon(_) => "polygon",
                Element::Text(_) => "text",
                Element::Image(_) => "image",
                Element::Group(_) => "group",
            })
            .collect();
        assert_eq!(kinds, ["rect", "text", "rect", "polygon"]);
    }

    #[test]
    fn errors_inside_switch_still_fail() {
        assert!(matches!(
            build(r#"<svg width="100"><switch><rect y="0" width="1" height="1"/></switch></svg>"#),
            Err(Error::MissingAttribute { .. })
        ));
    }

    #[test]
    fn image_needs_configured_path_before_file_check() {
        let root = parse_markup(r#"<svg width="100"><image href="missing.png"/></svg>"#).unwrap();
        assert!(matches!(
            DocumentBuilder::new().build(&root),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            DocumentBuilder::new()
                .with_image_path(Some("/nonexistent-svg-forge"))
                .build(&root),
            Err(Error::AssetNotFound { .. })
        ));
    }
}
