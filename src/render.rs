//! `PdfBackend` implementation over `printpdf` (v0.8 ops-based API).
//!
//! Drawing calls append ops to the current page; pages are assembled into a
//! document only in [`PdfBackend::output`]. The backend works in a top-left
//! coordinate system and flips y when emitting ops.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use printpdf::font::ParsedFont;
use printpdf::*;

use crate::backend::{Align, PaintStyle, PdfBackend};
use crate::color::Color as RgbColor;
use crate::config::PageFormat;
use crate::error::{Error, Result};
use crate::fonts::{wrap_text, BuiltinFamily, FontKey, FontManager, FontStyle};

/// Horizontal padding inside a multi-line text cell (1 mm).
pub const CELL_MARGIN_PT: f32 = 2.835;

/// Default stroke width (0.2 mm).
const LINE_WIDTH_PT: f32 = 0.567;

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Font selected by `set_font`.
#[derive(Clone)]
enum ActiveFont {
    Builtin(BuiltinFont),
    Embedded(FontId),
}

pub struct PrintPdfBackend {
    doc: PdfDocument,
    format: PageFormat,
    pages: Vec<Vec<Op>>,
    fonts: FontManager,
    font_ids: HashMap<FontKey, FontId>,
    images: HashMap<PathBuf, ImageResource>,
    draw_color: RgbColor,
    fill_color: RgbColor,
    text_color: RgbColor,
    current_key: FontKey,
    current_font: ActiveFont,
    font_size: f32,
}

impl PrintPdfBackend {
    /// Create a backend with its first page already open.
    pub fn new(title: &str, format: PageFormat) -> Self {
        let mut backend = Self {
            doc: PdfDocument::new(title),
            format,
            pages: Vec::new(),
            fonts: FontManager::new(),
            font_ids: HashMap::new(),
            images: HashMap::new(),
            draw_color: RgbColor::BLACK,
            fill_color: RgbColor::BLACK,
            text_color: RgbColor::BLACK,
            current_key: FontKey::new("Helvetica", FontStyle::REGULAR),
            current_font: ActiveFont::Builtin(BuiltinFont::Helvetica),
            font_size: 12.0,
        };
        backend.add_page();
        backend
    }

    fn ops(&mut self) -> &mut Vec<Op> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// PDF coordinate system: origin at bottom-left.
    fn flip(&self, y: f32) -> f32 {
        self.format.height - y
    }

    fn point(&self, x: f32, y: f32) -> LinePoint {
        LinePoint {
            p: Point {
                x: Pt(x),
                y: Pt(self.flip(y)),
            },
            bezier: false,
        }
    }

    fn push_shape(&mut self, points: Vec<LinePoint>, style: PaintStyle) {
        let mut ops = Vec::new();
        if matches!(style, PaintStyle::Fill | PaintStyle::FillStroke) {
            ops.push(Op::SetFillColor {
                col: pdf_color(self.fill_color),
            });
        }
        if matches!(style, PaintStyle::Stroke | PaintStyle::FillStroke) {
            ops.push(Op::SetOutlineColor {
                col: pdf_color(self.draw_color),
            });
        }
        let mode = match style {
            PaintStyle::Stroke => PaintMode::Stroke,
            PaintStyle::Fill => PaintMode::Fill,
            PaintStyle::FillStroke => PaintMode::FillStroke,
        };
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
        self.ops().extend(ops);
    }

    fn write_text(&mut self, x: f32, baseline_y: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = Point {
            x: Pt(x),
            y: Pt(self.flip(baseline_y)),
        };
        let size = Pt(self.font_size);
        let col = pdf_color(self.text_color);
        let (set_font, write) = match self.current_font.clone() {
            ActiveFont::Builtin(font) => (
                Op::SetFontSizeBuiltinFont { size, font },
                Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(to_winlatin(text))],
                    font,
                },
            ),
            ActiveFont::Embedded(font) => (
                Op::SetFontSize {
                    size,
                    font: font.clone(),
                },
                Op::WriteText {
                    items: vec![TextItem::Text(text.to_string())],
                    font,
                },
            ),
        };
        self.ops().extend([
            Op::StartTextSection,
            Op::SetTextCursor { pos },
            set_font,
            Op::SetFillColor { col },
            write,
            Op::EndTextSection,
        ]);
    }

    fn load_image(&mut self, path: &Path) -> Result<()> {
        if self.images.contains_key(path) {
            return Ok(());
        }
        let image_error = |reason: String| Error::Image {
            path: path.to_path_buf(),
            reason,
        };
        let bytes = std::fs::read(path)?;

        // Decode with the `image` crate to obtain pixel dimensions.
        let dyn_img = ::image::load_from_memory(&bytes).map_err(|e| image_error(e.to_string()))?;
        let (px_width, px_height) = (dyn_img.width(), dyn_img.height());

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let raw = RawImage::decode_from_bytes(&bytes, &mut warnings)
            .map_err(|e| image_error(e.to_string()))?;
        let xobj_id = self.doc.add_image(&raw);

        self.images.insert(
            path.to_path_buf(),
            ImageResource {
                xobj_id,
                px_width,
                px_height,
            },
        );
        Ok(())
    }
}

impl PdfBackend for PrintPdfBackend {
    fn add_page(&mut self) {
        self.pages.push(vec![Op::SetOutlineThickness {
            pt: Pt(LINE_WIDTH_PT),
        }]);
    }

    fn page_count(&self) -> usize {
        self.pages.len()
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

    fn set_draw_color(&mut self, color: RgbColor) {
        self.draw_color = color;
    }

    fn set_fill_color(&mut self, color: RgbColor) {
        self.fill_color = color;
    }

    fn set_text_color(&mut self, color: RgbColor) {
        self.text_color = color;
    }

    fn add_font(&mut self, family: &str, style: FontStyle, dir: &Path, file: &str) -> Result<()> {
        let path = dir.join(file);
        let font_error = |reason: String| Error::Font {
            path: path.clone(),
            reason,
        };
        let bytes = std::fs::read(&path).map_err(|e| font_error(e.to_string()))?;

        let mut warnings = Vec::new();
        let parsed = ParsedFont::from_bytes(&bytes, 0, &mut warnings)
            .ok_or_else(|| font_error("unsupported font data".to_string()))?;
        self.fonts
            .load_font(family, style, bytes)
            .map_err(font_error)?;

        let font_id = self.doc.add_font(&parsed);
        self.font_ids.insert(FontKey::new(family, style), font_id);
        log::debug!("registered font {family} ({style}) from {}", path.display());
        Ok(())
    }

    fn set_font(&mut self, family: &str, style: FontStyle, size: f32) -> Result<()> {
        let key = FontKey::new(family, style);
        let font = if let Some(id) = self.font_ids.get(&key) {
            ActiveFont::Embedded(id.clone())
        } else if let Some(builtin) = BuiltinFamily::from_family(family) {
            ActiveFont::Builtin(builtin_font(builtin, style))
        } else {
            return Err(Error::UndefinedFont {
                family: family.to_string(),
                style,
            });
        };
        self.current_key = key;
        self.current_font = font;
        self.font_size = size;
        Ok(())
    }

    fn string_width(&self, text: &str) -> f32 {
        self.fonts
            .measure_text_width(text, self.font_size, &self.current_key)
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, style: PaintStyle) {
        let points = vec![
            self.point(x, y),
            self.point(x + width, y),
            self.point(x + width, y + height),
            self.point(x, y + height),
        ];
        self.push_shape(points, style);
    }

    fn polygon(&mut self, points: &[(f32, f32)], style: PaintStyle) {
        if points.is_empty() {
            return;
        }
        let points = points.iter().map(|&(x, y)| self.point(x, y)).collect();
        self.push_shape(points, style);
    }

    fn image(
        &mut self,
        path: &Path,
        x: f32,
        y: f32,
        width: Option<f32>,
        height: Option<f32>,
    ) -> Result<()> {
        self.load_image(path)?;
        let Some(res) = self.images.get(path) else {
            return Ok(());
        };
        let (px_w, px_h) = (res.px_width.max(1) as f32, res.px_height.max(1) as f32);

        // Intrinsic size is taken at 96 dpi; a single given side keeps the
        // aspect ratio.
        let (w, h) = match (width, height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * px_h / px_w),
            (None, Some(h)) => (h * px_w / px_h, h),
            (None, None) => (px_w * 0.75, px_h * 0.75),
        };

        // At dpi=72 printpdf renders 1 px = 1 pt, so scale = desired_pt / px_dim.
        let op = Op::UseXobject {
            id: res.xobj_id.clone(),
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(self.flip(y + h))),
                dpi: Some(72.0),
                scale_x: Some(w / px_w),
                scale_y: Some(h / px_h),
                rotate: None,
            },
        };
        self.ops().push(op);
        Ok(())
    }

    fn text(&mut self, x: f32, y: f32, text: &str) {
        self.write_text(x, y, text);
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
        let inner = width - 2.0 * CELL_MARGIN_PT;
        let lines = wrap_text(text, self.font_size, &self.current_key, inner, &self.fonts);

        for (i, line) in lines.iter().enumerate() {
            let top = y + i as f32 * line_height;
            let line_width = self.string_width(line);
            let dx = match align {
                Align::Left => CELL_MARGIN_PT,
                Align::Center => (width - line_width) / 2.0,
                Align::Right => width - CELL_MARGIN_PT - line_width,
            };
            let baseline = top + 0.5 * line_height + 0.3 * self.font_size;
            self.write_text(x + dx, baseline, line);
        }

        if border != 0 {
            let height = lines.len() as f32 * line_height;
            self.rect(x, y, width, height, PaintStyle::Stroke);
        }
    }

    fn output(self) -> Result<Vec<u8>> {
        let page_w = Mm(self.format.width * 0.352778); // pt → mm
        let page_h = Mm(self.format.height * 0.352778);

        let mut doc = self.doc;
        let pages = self
            .pages
            .into_iter()
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();
        doc.with_pages(pages);
        Ok(doc.save(&PdfSaveOptions::default(), &mut Vec::new()))
    }
}

fn pdf_color(color: RgbColor) -> printpdf::Color {
    let (r, g, b) = color.to_pdf_rgb();
    printpdf::Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

fn builtin_font(family: BuiltinFamily, style: FontStyle) -> BuiltinFont {
    match (family, style.bold, style.italic) {
        (BuiltinFamily::Helvetica, true, true) => BuiltinFont::HelveticaBoldOblique,
        (BuiltinFamily::Helvetica, true, false) => BuiltinFont::HelveticaBold,
        (BuiltinFamily::Helvetica, false, true) => BuiltinFont::HelveticaOblique,
        (BuiltinFamily::Helvetica, false, false) => BuiltinFont::Helvetica,
        (BuiltinFamily::Times, true, true) => BuiltinFont::TimesBoldItalic,
        (BuiltinFamily::Times, true, false) => BuiltinFont::TimesBold,
        (BuiltinFamily::Times, false, true) => BuiltinFont::TimesItalic,
        (BuiltinFamily::Times, false, false) => BuiltinFont::TimesRoman,
        (BuiltinFamily::Courier, true, true) => BuiltinFont::CourierBoldOblique,
        (BuiltinFamily::Courier, true, false) => BuiltinFont::CourierBold,
        (BuiltinFamily::Courier, false, true) => BuiltinFont::CourierOblique,
        (BuiltinFamily::Courier, false, false) => BuiltinFont::Courier,
    }
}

/// WinAnsi code for `c`, if the encoding has one.
fn winansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\u{20AC}' => 0x80, // euro
        '\u{201A}' => 0x82, // single low-9 quote
        '\u{0192}' => 0x83, // florin
        '\u{201E}' => 0x84, // double low-9 quote
        '\u{2026}' => 0x85, // ellipsis
        '\u{2020}' => 0x86, // dagger
        '\u{2021}' => 0x87, // double dagger
        '\u{02C6}' => 0x88, // circumflex
        '\u{2030}' => 0x89, // per mille
        '\u{0160}' => 0x8A, // S caron
        '\u{2039}' => 0x8B, // single left angle quote
        '\u{0152}' => 0x8C, // OE
        '\u{017D}' => 0x8E, // Z caron
        '\u{2018}' => 0x91, // left single quote
        '\u{2019}' => 0x92, // right single quote
        '\u{201C}' => 0x93, // left double quote
        '\u{201D}' => 0x94, // right double quote
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en-dash
        '\u{2014}' => 0x97, // em-dash
        '\u{02DC}' => 0x98, // small tilde
        '\u{2122}' => 0x99, // trademark
        '\u{0161}' => 0x9A, // s caron
        '\u{203A}' => 0x9B, // single right angle quote
        '\u{0153}' => 0x9C, // oe
        '\u{017E}' => 0x9E, // z caron
        '\u{0178}' => 0x9F, // Y diaeresis
        '\u{00A0}' => 0x20, // non-breaking space -> space
        c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
        _ => return None,
    };
    Some(byte)
}

/// Closest WinAnsi-representable letter for Latin Extended-A characters.
fn fold_latin(c: char) -> Option<char> {
    let folded = match c {
        'ą' | 'ă' | 'ā' => 'a',
        'Ą' | 'Ă' | 'Ā' => 'A',
        'ć' | 'č' | 'ĉ' | 'ċ' => 'c',
        'Ć' | 'Č' | 'Ĉ' | 'Ċ' => 'C',
        'ď' | 'đ' => 'd',
        'Ď' | 'Đ' => 'D',
        'ę' | 'ě' | 'ē' | 'ė' => 'e',
        'Ę' | 'Ě' | 'Ē' | 'Ė' => 'E',
        'ğ' | 'ģ' => 'g',
        'Ğ' | 'Ģ' => 'G',
        'ı' | 'ī' | 'į' => 'i',
        'İ' | 'Ī' | 'Į' => 'I',
        'ķ' => 'k',
        'Ķ' => 'K',
        'ĺ' | 'ľ' | 'ł' | 'ļ' => 'l',
        'Ĺ' | 'Ľ' | 'Ł' | 'Ļ' => 'L',
        'ń' | 'ň' | 'ņ' => 'n',
        'Ń' | 'Ň' | 'Ņ' => 'N',
        'ő' | 'ō' => 'o',
        'Ő' | 'Ō' => 'O',
        'ŕ' | 'ř' => 'r',
        'Ŕ' | 'Ř' => 'R',
        'ś' | 'ş' | 'ș' => 's',
        'Ś' | 'Ş' | 'Ș' => 'S',
        'ť' | 'ţ' | 'ț' => 't',
        'Ť' | 'Ţ' | 'Ț' => 'T',
        'ů' | 'ű' | 'ū' | 'ų' => 'u',
        'Ů' | 'Ű' | 'Ū' | 'Ų' => 'U',
        'ź' | 'ż' => 'z',
        'Ź' | 'Ż' => 'Z',
        _ => return None,
    };
    Some(folded)
}

/// Replace characters WinAnsi cannot encode by a close letter, or `?`.
pub fn transliterate_winansi(s: &str) -> String {
    let mut lost = 0usize;
    let out = s
        .chars()
        .map(|c| {
            if winansi_byte(c).is_some() {
                c
            } else if let Some(folded) = fold_latin(c) {
                folded
            } else {
                lost += 1;
                '?'
            }
        })
        .collect();
    if lost > 0 {
        log::warn!("{lost} character(s) not representable in WinAnsi replaced by '?'");
    }
    out
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| {
            winansi_byte(c)
                .or_else(|| fold_latin(c).map(|f| f as u8))
                .unwrap_or(b'?')
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF; printpdf passes these
    // bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}
