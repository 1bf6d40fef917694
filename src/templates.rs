//! Helpers for authoring SVG templates, plus sample templates used for
//! testing and demonstration.

use std::cell::Cell;
use std::fmt;

use crate::color::Color;
use crate::error::Result;

/// Escape HTML special characters, quotes included.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

pub fn color(raw: &str) -> Result<Color> {
    Color::from_string(raw)
}

/// Formats decimal amounts with a currency symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyFormatter {
    pub symbol: String,
    pub decimals: usize,
    pub thousands_separator: String,
    pub decimal_separator: String,
    /// `$10.00` when true, `10.00 $` otherwise.
    pub symbol_first: bool,
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            decimals: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            symbol_first: true,
        }
    }
}

impl MoneyFormatter {
    /// Empty for a missing or empty amount. Unparsable amounts are
    /// returned unchanged.
    pub fn format(&self, amount: Option<&str>) -> String {
        let raw = match amount.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return String::new(),
        };
        let value: f64 = match raw.parse() {
            Ok(v) => v,
            Err(_) => return raw.to_string(),
        };

        let fixed = format!("{:.*}", self.decimals, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let mut number = group_thousands(int_part, &self.thousands_separator);
        if let Some(frac) = frac_part {
            number.push_str(&self.decimal_separator);
            number.push_str(frac);
        }

        let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
        let sign = if negative { "-" } else { "" };
        if self.symbol_first {
            format!("{sign}{}{number}", self.symbol)
        } else {
            format!("{sign}{number} {}", self.symbol)
        }
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// A position counter for laying out repeated rows in a template:
/// `base + step * n + additional`.
///
/// With `auto` enabled every [`get`](Self::get) (and every `Display`)
/// returns the current position and then advances by one step.
#[derive(Debug, Clone)]
pub struct PositionCursor {
    base: i32,
    step: i32,
    auto: bool,
    multiplier: Cell<i32>,
    additional: Cell<i32>,
}

impl PositionCursor {
    pub fn new(base: i32, step: i32, auto: bool) -> Self {
        Self {
            base,
            step,
            auto,
            multiplier: Cell::new(0),
            additional: Cell::new(0),
        }
    }

    fn offset(&self) -> i32 {
        self.step * self.multiplier.get() + self.additional.get()
    }

    pub fn current(&self) -> i32 {
        self.base + self.offset()
    }

    pub fn get(&self) -> i32 {
        if self.auto {
            self.post_increment()
        } else {
            self.current()
        }
    }

    /// Advance, then return the new position.
    pub fn increment(&self) -> i32 {
        self.multiplier.set(self.multiplier.get() + 1);
        self.current()
    }

    /// Return the position, then advance.
    pub fn post_increment(&self) -> i32 {
        let value = self.current();
        self.multiplier.set(self.multiplier.get() + 1);
        value
    }

    /// Shift by `plus` units and [`get`](Self::get).
    pub fn additional(&self, plus: i32) -> i32 {
        self.additional.set(self.additional.get() + plus);
        self.get()
    }

    /// Same base and step, counters reset.
    pub fn copy(&self) -> Self {
        Self::new(self.base, self.step, self.auto)
    }

    /// Midpoint between the base and the current position.
    pub fn center_position(&self, adjustment: i32) -> i32 {
        (adjustment as f64 + self.base as f64 + self.offset() as f64 / 2.0) as i32
    }
}

impl fmt::Display for PositionCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Invoice: header band, a switch with a fallback, item rows and totals.
pub fn invoice_template() -> &'static str {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="800">
    <!-- header band -->
    <rect x="0" y="0" width="800" height="90" fill="#1a365d"/>
    <polygon points="640,0 800,0 800,90 700,90" fill="#2c5282"/>
    <text x="40" y="55" font-size="32" font-weight="bold" fill="#ffffff">Invoice #2024-001</text>

    <text x="40" y="140" font-size="14" font-weight="bold">From:</text>
    <text x="40" y="160" font-size="14">Acme Corp</text>
    <text x="40" y="180" font-size="14">123 Business St</text>
    <text x="760" y="140" font-size="14" font-weight="bold" text-anchor="end">To:</text>
    <text x="760" y="160" font-size="14" text-anchor="end">Client Inc</text>
    <text x="760" y="180" font-size="14" text-anchor="end">456 Client Ave</text>

    <switch>
        <foreignObject width="10" height="10"/>
        <text x="400" y="220" font-size="12" text-anchor="middle" fill="rgb(100, 100, 100)">Due in 14 days</text>
    </switch>

    <rect x="40" y="250" width="720" height="30" fill="#e2e8f0" stroke="#a0aec0"/>
    <text x="50" y="270" font-size="14" font-weight="bold">Item</text>
    <text x="750" y="270" font-size="14" font-weight="bold" text-anchor="end">Total</text>

    <text x="50" y="305" font-size="14">Web Development</text>
    <text x="750" y="305" font-size="14" text-anchor="end">$6,000.00</text>
    <text x="50" y="330" font-size="14">Design Services</text>
    <text x="750" y="330" font-size="14" text-anchor="end">$2,500.00</text>
    <text x="50" y="355" font-size="14">Hosting (Annual)</text>
    <text x="750" y="355" font-size="14" text-anchor="end">$500.00</text>

    <rect x="480" y="380" width="280" height="40" fill="#edf2f7"/>
    <text x="750" y="406" font-size="18" font-weight="bold" text-anchor="end">Total: $9,000.00</text>

    <text x="40" y="470" font-size="11" data-pdf-width="720" data-pdf-lineHeight="14" data-pdf-border="1">Payment is due within 14 days of the invoice date. Please include the invoice number with your payment so it can be matched to this document.</text>
</svg>"##
}

/// Report long enough to span several pages.
pub fn report_template() -> String {
    let mut svg = String::from(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="595">
    <text x="40" y="50" font-size="24" font-weight="bold">Quarterly Report</text>
    <text x="40" y="75" font-size="12" fill="#718096">Q4 2025</text>
"##,
    );
    let rows = PositionCursor::new(110, 40, true);
    for i in 1..=45 {
        let y = rows.get();
        let fill = if i % 2 == 0 { "#f7fafc" } else { "#ffffff" };
        svg.push_str(&format!(
            r##"    <rect x="40" y="{y}" width="515" height="30" fill="{fill}" stroke="#e2e8f0"/>
    <text x="50" y="{}" font-size="12">Line item {i}</text>
"##,
            y + 20
        ));
    }
    svg.push_str("</svg>");
    svg
}
