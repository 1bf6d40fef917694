//! The renderer: converts logical template coordinates into physical page
//! coordinates, paginates the virtual canvas and forwards drawing to a
//! [`PdfBackend`].
//!
//! Every draw call runs the same pipeline:
//!
//! 1. **Scale** – `round(value / scale)` for each coordinate and dimension
//!    (identity when no scale is set or the scale is 1).
//! 2. **Paginate** – y-coordinates go through [`Paginator::adjust_y`].
//! 3. **Greyscale** – stroke, fill and text colors are projected when
//!    greyscale output is enabled.
//!
//! A renderer holds mutable pagination and font state, so it serves exactly
//! one document and is consumed by [`Pdf::to_bytes`].

use std::path::Path;

use crate::backend::{Align, PaintStyle, PdfBackend};
use crate::color::Color;
use crate::config::TextEncoding;
use crate::error::{Error, Result};
use crate::fonts::FontStyle;
use crate::pagination::Paginator;
use crate::render::PrintPdfBackend;

/// `text-anchor` of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Unknown values anchor at the start.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "middle" => TextAnchor::Middle,
            "end" => TextAnchor::End,
            _ => TextAnchor::Start,
        }
    }

    fn align(self) -> Align {
        match self {
            TextAnchor::Start => Align::Left,
            TextAnchor::Middle => Align::Center,
            TextAnchor::End => Align::Right,
        }
    }
}

/// Presentation of a text run, in logical units.
#[derive(Debug, Clone, Default)]
pub struct TextStyle {
    /// Falls back to the renderer's default text color.
    pub color: Option<Color>,
    pub anchor: TextAnchor,
    /// Falls back to the renderer's default font family.
    pub font_family: Option<String>,
    pub font_style: FontStyle,
    pub font_size: f32,
    /// Box width; enables multi-line layout.
    pub width: Option<f32>,
    /// Line height of the multi-line box (default `font_size + 2`).
    pub line_height: Option<f32>,
    /// Frame around the multi-line box when non-zero. Not scaled.
    pub border: u32,
}

pub struct Pdf<B: PdfBackend = PrintPdfBackend> {
    backend: B,
    default_font_family: String,
    default_text_color: Color,
    greyscale: bool,
    scale: Option<f32>,
    encoding: TextEncoding,
    paginator: Paginator,
}

impl<B: PdfBackend> Pdf<B> {
    /// Wrap a backend. A first page is opened if the backend has none.
    pub fn new(mut backend: B, default_font_family: &str, default_text_color: Color) -> Self {
        if backend.page_count() == 0 {
            backend.add_page();
        }
        let paginator = Paginator::new(&backend);
        Self {
            backend,
            default_font_family: default_font_family.to_string(),
            default_text_color,
            greyscale: false,
            scale: None,
            encoding: TextEncoding::default(),
            paginator,
        }
    }

    /// Set the logical → physical factor; `None` disables scaling.
    pub fn set_scale(&mut self, scale: Option<f32>) {
        self.scale = scale;
    }

    pub fn scale(&self) -> Option<f32> {
        self.scale
    }

    pub fn set_greyscale(&mut self, greyscale: bool) -> &mut Self {
        self.greyscale = greyscale;
        self
    }

    pub fn set_text_encoding(&mut self, encoding: TextEncoding) -> &mut Self {
        self.encoding = encoding;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Convert one logical value to physical units.
    pub fn scale_value(&self, value: f32) -> f32 {
        match self.scale {
            Some(scale) if scale != 1.0 && scale != 0.0 => (value / scale).round(),
            _ => value,
        }
    }

    fn scale_opt(&self, value: Option<f32>) -> Option<f32> {
        value.map(|v| self.scale_value(v))
    }

    fn project(&self, color: Option<Color>) -> Option<Color> {
        if self.greyscale {
            color.map(|c| c.greyscale())
        } else {
            color
        }
    }

    fn apply_colors(&mut self, stroke: Option<Color>, fill: Option<Color>) -> PaintStyle {
        let stroke = self.project(stroke);
        let fill = self.project(fill);
        if let Some(stroke) = stroke {
            self.backend.set_draw_color(stroke);
        }
        if let Some(fill) = fill {
            self.backend.set_fill_color(fill);
        }
        PaintStyle::for_colors(stroke, fill)
    }

    /// Register a font file. The path must carry a directory component.
    pub fn add_font(&mut self, family: &str, file: &Path, style: &str) -> Result<&mut Self> {
        let dir = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "font file `{}` must be an absolute path",
                    file.display()
                ))
            })?;
        let name = file.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            Error::InvalidArgument(format!("font file `{}` has no file name", file.display()))
        })?;
        self.backend
            .add_font(family, FontStyle::parse(style), dir, name)?;
        Ok(self)
    }

    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        stroke: Option<Color>,
        fill: Option<Color>,
    ) {
        let x = self.scale_value(x);
        let y = self.scale_value(y);
        let width = self.scale_value(width);
        let height = self.scale_value(height);

        let y = self.paginator.adjust_y(&mut self.backend, y, height);
        let style = self.apply_colors(stroke, fill);
        log::trace!("rect ({x}, {y}) {width}x{height} {style:?}");
        self.backend.rect(x, y, width, height, style);
    }

    /// Closed polygon through logical `points`.
    ///
    /// The polygon is paginated by its bounding box, so it moves to the
    /// next page as a whole instead of being torn across the break.
    pub fn polygon(&mut self, points: &[(f32, f32)], stroke: Option<Color>, fill: Option<Color>) {
        let mut physical: Vec<(f32, f32)> = points
            .iter()
            .map(|&(x, y)| (self.scale_value(x), self.scale_value(y)))
            .collect();

        let top = physical.iter().map(|p| p.1).reduce(f32::min);
        let bottom = physical.iter().map(|p| p.1).reduce(f32::max);
        if let (Some(top), Some(bottom)) = (top, bottom) {
            let placed = self
                .paginator
                .adjust_y(&mut self.backend, top, bottom - top);
            let offset = placed - top;
            for point in &mut physical {
                point.1 += offset;
            }
        }

        let style = self.apply_colors(stroke, fill);
        log::trace!("polygon of {} points {style:?}", physical.len());
        self.backend.polygon(&physical, style);
    }

    pub fn image(
        &mut self,
        path: &Path,
        x: f32,
        y: f32,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<()> {
        let x = self.scale_value(x);
        let y = self.scale_value(y);
        let width = self.scale_opt(width);
        let height = self.scale_opt(height);

        let y = self
            .paginator
            .adjust_y(&mut self.backend, y, height.unwrap_or(0.0));
        log::trace!("image {} at ({x}, {y})", path.display());
        self.backend.image(path, x, y, width, height)
    }

    /// Select the font for `style` (family, weight, scaled size).
    fn select_font(&mut self, family: Option<&str>, style: FontStyle, font_size: f32) -> Result<()> {
        let family = family.unwrap_or(&self.default_font_family).to_string();
        self.backend.set_font(&family, style, font_size)
    }

    /// Width of `text` in physical units; no drawing and no pagination.
    pub fn text_width(
        &mut self,
        text: &str,
        font_size: f32,
        font_family: Option<&str>,
        font_style: FontStyle,
    ) -> Result<f32> {
        let font_size = self.scale_value(font_size);
        let text = self.encoding.apply(text);
        self.select_font(font_family, font_style, font_size)?;
        Ok(self.backend.string_width(&text))
    }

    /// Draw `text` at logical `(x, y)`.
    ///
    /// Without a box width the text is a single run whose x is shifted by
    /// the measured width according to the anchor. With a width the backend
    /// lays the text out as a wrapped box aligned by the anchor.
    pub fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) -> Result<()> {
        let x = self.scale_value(x);
        let y = self.scale_value(y);
        let font_size = self.scale_value(style.font_size);
        let width = self.scale_opt(style.width);
        let line_height = self.scale_opt(style.line_height);

        let text = self.encoding.apply(text);
        let color = style.color.unwrap_or(self.default_text_color);

        let y = self.paginator.adjust_y(&mut self.backend, y, 0.0);

        let color = if self.greyscale { color.greyscale() } else { color };

        self.select_font(style.font_family.as_deref(), style.font_style, font_size)?;
        self.backend.set_text_color(color);

        match width {
            None => {
                let adjust = match style.anchor {
                    TextAnchor::Start => 0.0,
                    TextAnchor::Middle => -self.backend.string_width(&text) / 2.0,
                    TextAnchor::End => -self.backend.string_width(&text),
                };
                log::trace!("text {text:?} at ({}, {y})", x + adjust);
                self.backend.text(x + adjust, y, &text);
            }
            Some(width) => {
                let line_height = line_height
                    .filter(|lh| *lh != 0.0)
                    .unwrap_or(font_size + 2.0);
                log::trace!("text box {text:?} at ({x}, {y}) width {width}");
                self.backend.multi_cell(
                    x,
                    y,
                    width,
                    line_height,
                    &text,
                    style.border,
                    style.anchor.align(),
                );
            }
        }
        Ok(())
    }

    /// Finish the document and return the PDF bytes.
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        self.backend.output()
    }
}
