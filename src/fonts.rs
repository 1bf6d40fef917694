//! Font registry and text measurement using `ttf-parser`.
//!
//! Registered TTF/OTF files are measured with their real glyph advances. The
//! PDF base-14 families (Helvetica, Times, Courier) have no font bytes and
//! fall back to average character width heuristics.

use std::collections::HashMap;
use std::fmt;

/// Weight / slant selector for a font family.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const REGULAR: Self = Self {
        bold: false,
        italic: false,
    };
    pub const BOLD: Self = Self {
        bold: true,
        italic: false,
    };

    /// Parse a `font-weight` value or a registration style string.
    ///
    /// Accepts CSS keywords (`normal`, `bold`, `italic`, numeric weights) as
    /// well as the short `B` / `I` / `BI` forms. Unknown values are regular.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        match lower.as_str() {
            "" | "normal" | "regular" | "lighter" | "100" | "200" | "300" | "400" | "500" => {
                Self::REGULAR
            }
            "b" | "bold" | "bolder" | "600" | "700" | "800" | "900" => Self::BOLD,
            "i" | "italic" | "oblique" => Self {
                bold: false,
                italic: true,
            },
            "bi" | "ib" | "bolditalic" | "bold italic" | "italic bold" => Self {
                bold: true,
                italic: true,
            },
            other => {
                log::trace!("unknown font style {other:?}, using regular");
                Self::REGULAR
            }
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.bold, self.italic) {
            (false, false) => f.write_str("regular"),
            (true, false) => f.write_str("bold"),
            (false, true) => f.write_str("italic"),
            (true, true) => f.write_str("bold-italic"),
        }
    }
}

/// Lookup key of a registered face. Family names are case-insensitive.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub style: FontStyle,
}

impl FontKey {
    pub fn new(family: &str, style: FontStyle) -> Self {
        Self {
            family: family.trim().to_ascii_lowercase(),
            style,
        }
    }
}

/// One of the three base-14 families every PDF viewer provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFamily {
    Helvetica,
    Times,
    Courier,
}

impl BuiltinFamily {
    pub fn from_family(family: &str) -> Option<Self> {
        match family.trim().to_ascii_lowercase().as_str() {
            "helvetica" | "arial" | "sans-serif" => Some(Self::Helvetica),
            "times" | "times new roman" | "serif" => Some(Self::Times),
            "courier" | "courier new" | "monospace" => Some(Self::Courier),
            _ => None,
        }
    }

    /// Average advance as a fraction of the font size.
    fn average_advance(self, style: FontStyle) -> f32 {
        match (self, style.bold) {
            (Self::Courier, _) => 0.6,
            (_, true) => 0.55,
            (_, false) => 0.5,
        }
    }
}

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
}

/// Manages fonts registered from disk.
#[derive(Default)]
pub struct FontManager {
    fonts: HashMap<FontKey, FontData>,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TTF/OTF font from bytes.
    pub fn load_font(&mut self, family: &str, style: FontStyle, bytes: Vec<u8>) -> Result<(), String> {
        let face = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| format!("failed to parse font: {e}"))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            bytes,
        };

        self.fonts.insert(FontKey::new(family, style), data);
        Ok(())
    }

    pub fn contains(&self, key: &FontKey) -> bool {
        self.fonts.contains_key(key)
    }

    /// Measure the width of a string at a given font size (in points).
    ///
    /// Registered faces sum their glyph advances. Base-14 families and
    /// unknown keys use an average character width heuristic.
    pub fn measure_text_width(&self, text: &str, font_size: f32, key: &FontKey) -> f32 {
        let Some(data) = self.fonts.get(key) else {
            let avg = BuiltinFamily::from_family(&key.family)
                .unwrap_or(BuiltinFamily::Helvetica)
                .average_advance(key.style);
            return text.chars().count() as f32 * font_size * avg;
        };

        match ttf_parser::Face::parse(&data.bytes, 0) {
            Ok(face) => {
                let scale = font_size / data.units_per_em;
                text.chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        // Fallback for missing glyph
                        None => font_size * 0.5,
                    })
                    .sum()
            }
            Err(_) => text.chars().count() as f32 * font_size * 0.5,
        }
    }
}

/// Word-wrap text to fit within `max_width` points. Returns a vec of lines.
///
/// Explicit newlines always break. A single word wider than `max_width` is
/// kept on its own line rather than split.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    key: &FontKey,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in &words {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current_line, word)
            };
            let w = fonts.measure_text_width(&candidate, font_size, key);
            if w > max_width && !current_line.is_empty() {
                lines.push(current_line);
                current_line = word.to_string();
            } else {
                current_line = candidate;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
