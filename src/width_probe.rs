//! Width probe – measures text before the final document width is chosen.
//!
//! Template output is captured into a buffer, built into elements the same
//! way a real render would, and every text element is measured against a
//! throwaway renderer created at the candidate document width.

use std::fmt;

use crate::error::Result;
use crate::pipeline::SvgPdf;

pub struct WidthProbe<'a> {
    svg: &'a SvgPdf,
    document_width: i32,
    buffer: String,
}

impl<'a> WidthProbe<'a> {
    pub fn new(svg: &'a SvgPdf, document_width: i32) -> Self {
        Self {
            svg,
            document_width,
            buffer: String::new(),
        }
    }

    /// Start capturing; discards anything captured before.
    pub fn start(&mut self) -> &mut Self {
        self.buffer.clear();
        self
    }

    pub fn end_and_get_content(&self) -> &str {
        &self.buffer
    }

    /// Widest text element in the captured markup, in physical units.
    ///
    /// With `wrap_document` the capture is a fragment and gets wrapped in
    /// an `<svg>` root declaring the candidate width. Zero when the markup
    /// has no text.
    pub fn width(&self, wrap_document: bool) -> Result<f32> {
        let markup = if wrap_document {
            format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}">{}</svg>"#,
                self.document_width, self.buffer
            )
        } else {
            self.buffer.clone()
        };

        let elements = self.svg.parse_elements(&markup)?;
        let mut widest = 0.0f32;
        for text in elements.iter().filter_map(|e| e.as_text()) {
            let mut pdf = self.svg.create_renderer(self.document_width)?;
            widest = widest.max(text.width(&mut pdf)?);
        }
        Ok(widest)
    }
}

impl fmt::Write for WidthProbe<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}
