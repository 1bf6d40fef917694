//! The element model: drawable primitives built from markup nodes.
//!
//! Values are kept in logical units; the renderer scales them at draw time,
//! so one element tree can be rendered at any document width.

use std::path::{Path, PathBuf};

use crate::attributes::{
    attr_color, attr_int, attr_string, optional_int, parse_points, required_int, required_string,
};
use crate::backend::PdfBackend;
use crate::color::Color;
use crate::dom::ElementNode;
use crate::error::{Error, Result};
use crate::fonts::FontStyle;
use crate::pdf::{Pdf, TextAnchor, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect(RectElement),
    Polygon(PolygonElement),
    Text(TextElement),
    Image(ImageElement),
    /// Transparent container (`<switch>`).
    Group(Vec<Element>),
}

impl Element {
    pub fn render<B: PdfBackend>(&self, pdf: &mut Pdf<B>) -> Result<()> {
        match self {
            Element::Rect(rect) => rect.render(pdf),
            Element::Polygon(polygon) => polygon.render(pdf),
            Element::Text(text) => text.render(pdf),
            Element::Image(image) => image.render(pdf),
            Element::Group(children) => {
                for child in children {
                    child.render(pdf)?;
                }
                Ok(())
            }
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

impl RectElement {
    pub fn from_node(node: &ElementNode) -> Result<Self> {
        Ok(Self {
            x: required_int(node, "x")?,
            y: required_int(node, "y")?,
            width: required_int(node, "width")?,
            height: required_int(node, "height")?,
            fill: attr_color(node, "fill")?,
            stroke: attr_color(node, "stroke")?,
        })
    }

    pub fn render<B: PdfBackend>(&self, pdf: &mut Pdf<B>) -> Result<()> {
        pdf.rect(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
            self.stroke,
            self.fill,
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonElement {
    pub points: Vec<(f32, f32)>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
}

impl PolygonElement {
    pub fn from_node(node: &ElementNode) -> Result<Self> {
        Ok(Self {
            points: parse_points(&required_string(node, "points")?),
            fill: attr_color(node, "fill")?,
            stroke: attr_color(node, "stroke")?,
        })
    }

    pub fn render<B: PdfBackend>(&self, pdf: &mut Pdf<B>) -> Result<()> {
        pdf.polygon(&self.points, self.stroke, self.fill);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub x: i32,
    pub y: i32,
    pub font_size: i32,
    pub text: String,
    /// Box width (`data-pdf-width`); enables multi-line layout.
    pub width: Option<i32>,
    pub line_height: Option<i32>,
    pub border: u32,
    pub anchor: TextAnchor,
    pub font_family: Option<String>,
    pub font_style: FontStyle,
    pub fill: Option<Color>,
}

impl TextElement {
    pub fn from_node(node: &ElementNode) -> Result<Self> {
        let weight = attr_string(node, "font-weight", Some("normal"), false)?.unwrap_or_default();
        let anchor = attr_string(node, "text-anchor", Some("start"), false)?.unwrap_or_default();
        let border = attr_int(node, "data-pdf-border", Some(0), false)?.unwrap_or(0);

        Ok(Self {
            x: required_int(node, "x")?,
            y: required_int(node, "y")?,
            font_size: required_int(node, "font-size")?,
            text: node.text(),
            width: optional_int(node, "data-pdf-width")?,
            line_height: optional_int(node, "data-pdf-lineHeight")?,
            border: border.max(0) as u32,
            anchor: TextAnchor::parse(&anchor),
            font_family: attr_string(node, "font-family", None, false)?
                .filter(|f| !f.trim().is_empty()),
            font_style: style_for_weight(&weight),
            fill: attr_color(node, "fill")?,
        })
    }

    fn style(&self) -> TextStyle {
        TextStyle {
            color: self.fill,
            anchor: self.anchor,
            font_family: self.font_family.clone(),
            font_style: self.font_style,
            font_size: self.font_size as f32,
            width: self.width.map(|w| w as f32),
            line_height: self.line_height.map(|lh| lh as f32),
            border: self.border,
        }
    }

    pub fn render<B: PdfBackend>(&self, pdf: &mut Pdf<B>) -> Result<()> {
        pdf.text(self.x as f32, self.y as f32, &self.text, &self.style())
    }

    /// Rendered width of the text run in physical units.
    pub fn width<B: PdfBackend>(&self, pdf: &mut Pdf<B>) -> Result<f32> {
        pdf.text_width(
            &self.text,
            self.font_size as f32,
            self.font_family.as_deref(),
            self.font_style,
        )
    }
}

/// `bold`, `bolder` and numeric weights of 600 and above select bold.
fn style_for_weight(weight: &str) -> FontStyle {
    let weight = weight.trim().to_ascii_lowercase();
    let bold = match weight.as_str() {
        "bold" | "bolder" => true,
        other => other.parse::<u32>().map(|w| w >= 600).unwrap_or(false),
    };
    FontStyle {
        bold,
        italic: false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub path: PathBuf,
    pub x: i32,
    pub y: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl ImageElement {
    /// Resolve `href` against `image_path`. The file must exist now.
    pub fn from_node(node: &ElementNode, image_path: Option<&Path>) -> Result<Self> {
        let base = image_path.ok_or_else(|| {
            Error::Configuration("an image path must be configured to use <image>".to_string())
        })?;
        let href = required_string(node, "href")?;
        let path = base.join(href.trim_start_matches(['.', '/']));
        if !path.exists() {
            return Err(Error::AssetNotFound { path });
        }

        Ok(Self {
            path,
            x: attr_int(node, "x", Some(0), false)?.unwrap_or(0),
            y: attr_int(node, "y", Some(0), false)?.unwrap_or(0),
            width: optional_int(node, "width")?,
            height: optional_int(node, "height")?,
        })
    }

    pub fn render<B: PdfBackend>(&self, pdf: &mut Pdf<B>) -> Result<()> {
        pdf.image(
            &self.path,
            self.x as f32,
            self.y as f32,
            self.width.map(|w| w as f32),
            self.height.map(|h| h as f32),
        )
    }
}
