//! RGB colors as they appear in `fill` / `stroke` attributes.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

/// An immutable 8-bit RGB color. Derived colors are new values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse `#rgb`, `#rrggbb` or `rgb(r, g, b)`.
    ///
    /// The patterns are searched for anywhere in the input, so surrounding
    /// whitespace is tolerated. Three-digit hex is expanded by doubling each
    /// digit; `rgb()` channels above 255 are clamped.
    pub fn from_string(raw: &str) -> Result<Self> {
        static HEX: OnceLock<Regex> = OnceLock::new();
        static RGB: OnceLock<Regex> = OnceLock::new();

        let hex = HEX.get_or_init(|| Regex::new(r"#((?:[0-9A-Fa-f]{3}){1,2})").unwrap());
        if let Some(digits) = hex.captures(raw).and_then(|c| c.get(1)) {
            let digits = digits.as_str();
            let expanded: String = if digits.len() == 3 {
                digits.chars().flat_map(|c| [c, c]).collect()
            } else {
                digits.to_string()
            };
            let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16);
            return match (channel(0), channel(2), channel(4)) {
                (Ok(r), Ok(g), Ok(b)) => Ok(Self::new(r, g, b)),
                _ => Err(Error::InvalidColor(raw.to_string())),
            };
        }

        let rgb = RGB.get_or_init(|| {
            Regex::new(r"rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)").unwrap()
        });
        if let Some(caps) = rgb.captures(raw) {
            let channel = |i: usize| -> u8 {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .map(|v| v.min(255) as u8)
                    .unwrap_or(0)
            };
            return Ok(Self::new(channel(1), channel(2), channel(3)));
        }

        Err(Error::InvalidColor(raw.to_string()))
    }

    /// Luminosity projection: `0.3 R + 0.59 G + 0.11 B`, truncated.
    pub fn greyscale(&self) -> Self {
        let luminosity =
            0.3 * self.red as f64 + 0.59 * self.green as f64 + 0.11 * self.blue as f64;
        let value = (luminosity as i64).clamp(0, 255) as u8;
        Self::new(value, value, value)
    }

    /// Lighten by `percentage` (clamped to 0–100).
    pub fn lighten(&self, percentage: i32) -> Self {
        self.lighten_darken(-percentage.clamp(0, 100))
    }

    /// Darken by `percentage` (clamped to 0–100).
    pub fn darken(&self, percentage: i32) -> Self {
        self.lighten_darken(percentage.clamp(0, 100))
    }

    /// Shared signed formula: each channel becomes `c - c * pct`, where a
    /// negative `pct` lightens. `pct` is rounded to two decimals first.
    fn lighten_darken(&self, signed_percentage: i32) -> Self {
        let factor = (signed_percentage as f64 / 100.0 * 100.0).round() / 100.0;
        let adjust = |c: u8| -> u8 {
            let c = c as f64;
            (c - c * factor).round().clamp(0.0, 255.0) as u8
        };
        Self::new(adjust(self.red), adjust(self.green), adjust(self.blue))
    }

    pub(crate) fn to_pdf_rgb(self) -> (f32, f32, f32) {
        (
            self.red as f32 / 255.0,
            self.green as f32 / 255.0,
            self.blue as f32 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_hex_agree() {
        let short = Color::from_string("#fff").unwrap();
        let long = Color::from_string("#ffffff").unwrap();
        assert_eq!(short, long);
        assert_eq!(short, Color::WHITE);
    }

    #[test]
    fn short_hex_doubles_each_digit() {
        assert_eq!(Color::from_string("#f80").unwrap(), Color::new(0xff, 0x88, 0x00));
    }

    #[test]
    fn parses_rgb_function() {
        assert_eq!(
            Color::from_string("rgb(10, 20, 30)").unwrap(),
            Color::new(10, 20, 30)
        );
        assert_eq!(
            Color::from_string("rgb(300,0,0)").unwrap(),
            Color::new(255, 0, 0)
        );
    }

    #[test]
    fn rejects_named_colors() {
        let err = Color::from_string("red").unwrap_err();
        assert!(matches!(err, Error::InvalidColor(ref raw) if raw == "red"));
    }

    #[test]
    fn display_is_lowercase_six_digit_hex() {
        assert_eq!(Color::new(0xAB, 0x01, 0xFF).to_string(), "#ab01ff");
        assert_eq!(Color::BLACK.to_string(), "#000000");
    }

    #[test]
    fn display_round_trips() {
        for color in [Color::new(1, 2, 3), Color::new(250, 128, 7), Color::WHITE] {
            assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
        }
    }

    #[test]
    fn greyscale_channels_are_equal() {
        let grey = Color::new(200, 100, 50).greyscale();
        // 60 + 59 + 5.5 = 124.5 -> 124
        assert_eq!(grey, Color::new(124, 124, 124));
        let white = Color::WHITE.greyscale();
        assert!(white.red == white.green && white.green == white.blue);
    }

    #[test]
    fn lighten_and_darken_use_signed_percentage() {
        let base = Color::new(100, 50, 200);
        assert_eq!(base.darken(10), Color::new(90, 45, 180));
        assert_eq!(base.lighten(10), Color::new(110, 55, 220));
        // out-of-range percentages are clamped
        assert_eq!(base.darken(150), Color::BLACK);
        assert_eq!(base.lighten(-20), base);
        assert_eq!(Color::new(15, 0, 250).lighten(10), Color::new(17, 0, 255));
    }
}
