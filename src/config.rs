//! Pipeline configuration – the serialisable surface consumed by the
//! document builder and the renderer (fonts, image directory, greyscale,
//! page format).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::Result;
use crate::render::transliterate_winansi;

/// Physical page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFormat {
    pub width: f32,
    pub height: f32,
    /// Top margin; the printable height of a page is `height - top_margin`.
    pub top_margin: f32,
}

impl PageFormat {
    /// A4 portrait with a 1 cm top margin.
    pub const A4: Self = Self {
        width: 595.28,
        height: 841.89,
        top_margin: 28.35,
    };
}

impl Default for PageFormat {
    fn default() -> Self {
        Self::A4
    }
}

/// A font file to register with every renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSource {
    pub family: String,
    pub path: PathBuf,
    /// Style string (`""`, `"B"`, `"bold"`, `"I"`, ...).
    #[serde(default)]
    pub style: String,
}

/// How text is prepared before it reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    /// Transliterate to what WinAnsi (CP-1252) can represent, as required by
    /// the base-14 fonts.
    #[default]
    WinAnsi,
    /// Pass text through unchanged (embedded Unicode fonts).
    Unicode,
}

impl TextEncoding {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextEncoding::WinAnsi => transliterate_winansi(text),
            TextEncoding::Unicode => text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    pub page: PageFormat,
    /// Registered fonts; the first family is the default text font.
    pub fonts: Vec<FontSource>,
    /// Base directory `<image href>` values are resolved against.
    pub image_path: Option<PathBuf>,
    pub greyscale: bool,
    pub text_encoding: TextEncoding,
    /// Text color used when a `<text>` has no `fill` (default black).
    pub default_text_color: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "svg-forge output".to_string(),
            page: PageFormat::A4,
            fonts: Vec::new(),
            image_path: None,
            greyscale: false,
            text_encoding: TextEncoding::WinAnsi,
            default_text_color: None,
        }
    }
}

impl PipelineConfig {
    /// Family used for text without an explicit font.
    pub fn default_font_family(&self) -> &str {
        self.fonts
            .first()
            .map(|f| f.family.as_str())
            .unwrap_or("Helvetica")
    }

    pub fn default_text_color(&self) -> Result<Color> {
        match &self.default_text_color {
            Some(raw) => Color::from_string(raw),
            None => Ok(Color::BLACK),
        }
    }

    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    pub fn with_font(mut self, family: &str, path: impl Into<PathBuf>, style: &str) -> Self {
        self.fonts.push(FontSource {
            family: family.to_string(),
            path: path.into(),
            style: style.to_string(),
        });
        self
    }

    pub fn with_greyscale(mut self, greyscale: bool) -> Self {
        self.greyscale = greyscale;
        self
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
