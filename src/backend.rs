//! The PDF-backend capability consumed by the renderer.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! current page and y growing downwards. Implementations own all PDF
//! primitive emission, font handling and serialisation; the renderer only
//! talks to this trait.

use std::path::Path;

use crate::color::Color;
use crate::error::Result;
use crate::fonts::FontStyle;

/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintStyle {
    Stroke,
    Fill,
    FillStroke,
}

impl PaintStyle {
    /// Fill and stroke when both are given, fill when only a fill is given,
    /// otherwise stroke with the current draw color.
    pub fn for_colors(stroke: Option<Color>, fill: Option<Color>) -> Self {
        match (stroke, fill) {
            (Some(_), Some(_)) => PaintStyle::FillStroke,
            (None, Some(_)) => PaintStyle::Fill,
            _ => PaintStyle::Stroke,
        }
    }
}

/// Horizontal alignment inside a multi-line text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

pub trait PdfBackend {
    /// Start a new page; subsequent drawing goes to it.
    fn add_page(&mut self);

    /// Number of pages created so far (the current page number).
    fn page_count(&self) -> usize;

    fn page_width(&self) -> f32;

    fn page_height(&self) -> f32;

    fn top_margin(&self) -> f32;

    fn set_draw_color(&mut self, color: Color);

    fn set_fill_color(&mut self, color: Color);

    fn set_text_color(&mut self, color: Color);

    /// Register `dir/file` as `family` in `style`.
    fn add_font(&mut self, family: &str, style: FontStyle, dir: &Path, file: &str) -> Result<()>;

    /// Select the font used by subsequent text and width queries.
    fn set_font(&mut self, family: &str, style: FontStyle, size: f32) -> Result<()>;

    /// Width of `text` in the selected font.
    fn string_width(&self, text: &str) -> f32;

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, style: PaintStyle);

    /// Closed polygon through `points`.
    fn polygon(&mut self, points: &[(f32, f32)], style: PaintStyle);

    /// Place an image file. Missing dimensions come from the intrinsic size.
    fn image(
        &mut self,
        path: &Path,
        x: f32,
        y: f32,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<()>;

    /// Single run of text with its baseline at `y`.
    fn text(&mut self, x: f32, y: f32, text: &str);

    /// Word-wrapped text box of `width` starting at `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    fn multi_cell(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        line_height: f32,
        text: &str,
        border: u32,
        align: Align,
    );

    /// Finish the document and return the PDF bytes.
    fn output(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}
