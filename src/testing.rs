//! Recording `PdfBackend` used by unit tests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::backend::{Align, PaintStyle, PdfBackend};
use crate::color::Color;
use crate::config::PageFormat;
use crate::error::{Error, Result};
use crate::fonts::{BuiltinFamily, FontKey, FontStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AddPage,
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        style: PaintStyle,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        style: PaintStyle,
    },
    Image {
        path: PathBuf,
        x: f32,
        y: f32,
        width: Option<f32>,
        height: Option<f32>,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
    },
    MultiCell {
        x: f32,
        y: f32,
        width: f32,
        line_height: f32,
        text: String,
        border: u32,
        align: Align,
    },
}

/// Backend that records draw calls instead of producing PDF bytes.
/// Every font is measured at 0.5 em per character.
#[derive(Debug)]
pub struct RecordingBackend {
    pub format: PageFormat,
    pub pages: usize,
    pub calls: Vec<Call>,
    pub draw_color: Color,
    pub fill_color: Color,
    pub text_color: Color,
    pub fonts: HashSet<FontKey>,
    pub font_size: f32,
}

impl RecordingBackend {
    pub fn a4() -> Self {
        Self {
            format: PageFormat::A4,
            pages: 1,
            calls: Vec::new(),
            draw_color: Color::BLACK,
            fill_color: Color::BLACK,
            text_color: Color::BLACK,
            fonts: HashSet::new(),
            font_size: 0.0,
        }
    }

    pub fn shapes(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Rect { .. } | Call::Polygon { .. } | Call::Image { .. }))
            .cloned()
            .collect()
    }

    pub fn texts(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Text { .. } | Call::MultiCell { .. }))
            .cloned()
            .collect()
    }
}

impl PdfBackend for RecordingBackend {
    fn add_page(&mut self) {
        self.pages += 1;
        self.calls.push(Call::AddPage);
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn page_width(&self) -> f32 {
        self.format.width
    }

    fn page_height(&self) -> f32 {
        self.format.height
    }

    fn top_margin(&self) -> f32 {
        self.format.top_margin
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn add_font(&mut self, family: &str, style: FontStyle, _dir: &Path, _file: &str) -> Result<()> {
        self.fonts.insert(FontKey::new(family, style));
        Ok(())
    }

    fn set_font(&mut self, family: &str, style: FontStyle, size: f32) -> Result<()> {
        if !self.fonts.contains(&FontKey::new(family, style))
            && BuiltinFamily::from_family(family).is_none()
        {
            return Err(Error::UndefinedFont {
                family: family.to_string(),
                style,
            });
        }
        self.font_size = size;
        Ok(())
    }

    fn string_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * 0.5
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, style: PaintStyle) {
        self.calls.push(Call::Rect {
            x,
            y,
            width,
            height,
            style,
        });
    }

    fn polygon(&mut self, points: &[(f32, f32)], style: PaintStyle) {
        self.calls.push(Call::Polygon {
            points: points.to_vec(),
            style,
        });
    }

    fn image(
        &mut self,
        path: &Path,
        x: f32,
        y: f32,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<()> {
        self.calls.push(Call::Image {
            path: path.to_path_buf(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        self.calls.push(Call::Text {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn multi_cell(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        line_height: f32,
        text: &str,
        border: u32,
        align: Align,
    ) {
        self.calls.push(Call::MultiCell {
            x,
            y,
            width,
            line_height,
            text: text.to_string(),
            border,
            align,
        });
    }

    fn output(self) -> Result<Vec<u8>> {
        Ok(format!("%PDF-recorded {} pages", self.pages).into_bytes())
    }
}
