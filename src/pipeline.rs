//! Pipeline – ties together parsing, document building, renderer setup and
//! rendering into a single call.

use crate::config::PipelineConfig;
use crate::document::{Document, DocumentBuilder};
use crate::dom::parse_markup;
use crate::elements::Element;
use crate::error::Result;
use crate::pdf::Pdf;
use crate::render::PrintPdfBackend;

/// Entry point for converting SVG templates with one configuration.
#[derive(Debug, Clone, Default)]
pub struct SvgPdf {
    config: PipelineConfig,
}

impl SvgPdf {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn builder(&self) -> DocumentBuilder {
        DocumentBuilder::new().with_image_path(self.config.image_path.clone())
    }

    /// Parse markup into a document; the root must declare `width`.
    pub fn parse_document(&self, markup: &str) -> Result<Document> {
        self.builder().build(&parse_markup(markup)?)
    }

    /// Parse markup into elements without requiring a declared width.
    pub fn parse_elements(&self, markup: &str) -> Result<Vec<Element>> {
        self.builder().elements(&parse_markup(markup)?)
    }

    /// A fresh renderer for a document declared `document_width` units wide.
    ///
    /// Registers the configured fonts, applies greyscale and text encoding,
    /// and sets `scale = document_width / page_width`.
    pub fn create_renderer(&self, document_width: i32) -> Result<Pdf<PrintPdfBackend>> {
        let backend = PrintPdfBackend::new(&self.config.title, self.config.page);
        let mut pdf = Pdf::new(
            backend,
            self.config.default_font_family(),
            self.config.default_text_color()?,
        );
        for font in &self.config.fonts {
            pdf.add_font(&font.family, &font.path, &font.style)?;
        }
        pdf.set_greyscale(self.config.greyscale)
            .set_text_encoding(self.config.text_encoding);

        let scale = document_width as f32 / self.config.page.width;
        log::debug!(
            "renderer created: document width {document_width}, scale {scale:.4}"
        );
        pdf.set_scale(Some(scale));
        Ok(pdf)
    }

    pub fn render_document(&self, document: &Document) -> Result<Pdf<PrintPdfBackend>> {
        let mut pdf = self.create_renderer(document.width)?;
        for element in &document.elements {
            element.render(&mut pdf)?;
        }
        Ok(pdf)
    }

    pub fn render_str(&self, markup: &str) -> Result<Pdf<PrintPdfBackend>> {
        let document = self.parse_document(markup)?;
        self.render_document(&document)
    }

    /// Full pipeline: markup → PDF bytes.
    pub fn to_pdf_bytes(&self, markup: &str) -> Result<Vec<u8>> {
        self.render_str(markup)?.to_bytes()
    }
}

/// Convert `markup` with `config` in one call.
pub fn generate_pdf(markup: &str, config: &PipelineConfig) -> Result<Vec<u8>> {
    SvgPdf::new(config.clone()).to_pdf_bytes(markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn pipeline_basic() {
        let svg = r##"<svg width="595"><text x="10" y="20" font-size="12">Hello</text>
            <rect x="10" y="30" width="100" height="20" fill="#eeeeee"/></svg>"##;
        let bytes = generate_pdf(svg, &PipelineConfig::default()).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn renderer_scale_follows_document_width() {
        let svg = SvgPdf::default();
        let pdf = svg.create_renderer(1200).unwrap();
        let expected = 1200.0 / 595.28;
        assert!((pdf.scale().unwrap() - expected).abs() < 1e-4);
    }

    #[test]
    fn configured_font_must_exist() {
        let config = PipelineConfig::default().with_font("Missing", "/nonexistent/font.ttf", "");
        assert!(matches!(
            SvgPdf::new(config).create_renderer(595),
            Err(Error::Font { .. }) | Err(Error::Io(_))
        ));
    }

    #[test]
    fn parse_elements_skips_width_check() {
        let elements = SvgPdf::default()
            .parse_elements(r#"<svg><text x="0" y="0" font-size="9">a</text></svg>"#)
            .unwrap();
        assert_eq!(elements.len(), 1);
    }
}
