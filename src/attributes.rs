//! Attribute resolver – typed extraction of attribute values from markup
//! nodes, with required / default handling.
//!
//! Numeric parsing is deliberately lenient: the longest leading numeric
//! prefix is used and anything unparsable reads as zero, so `"12px"` is 12
//! and `"abc"` is 0. Integers truncate towards zero.

use std::sync::OnceLock;

use regex::Regex;

use crate::color::Color;
use crate::dom::ElementNode;
use crate::error::{Error, Result};

/// Look up a string attribute.
///
/// Absent + `required` fails with [`Error::MissingAttribute`]; absent
/// otherwise yields `default`.
pub fn attr_string(
    node: &ElementNode,
    name: &str,
    default: Option<&str>,
    required: bool,
) -> Result<Option<String>> {
    match node.attribute(name) {
        Some(value) => Ok(Some(value.to_string())),
        None if required => Err(Error::missing_attribute(node.name(), name)),
        None => Ok(default.map(str::to_string)),
    }
}

/// Look up an integer attribute (see the module docs for parsing rules).
pub fn attr_int(
    node: &ElementNode,
    name: &str,
    default: Option<i32>,
    required: bool,
) -> Result<Option<i32>> {
    match attr_string(node, name, None, required)? {
        Some(raw) => Ok(Some(parse_int(&raw))),
        None => Ok(default),
    }
}

pub fn required_string(node: &ElementNode, name: &str) -> Result<String> {
    attr_string(node, name, None, true)?.ok_or_else(|| Error::missing_attribute(node.name(), name))
}

pub fn required_int(node: &ElementNode, name: &str) -> Result<i32> {
    attr_int(node, name, None, true)?.ok_or_else(|| Error::missing_attribute(node.name(), name))
}

pub fn optional_int(node: &ElementNode, name: &str) -> Result<Option<i32>> {
    attr_int(node, name, None, false)
}

/// Optional color attribute. An empty value counts as absent.
pub fn attr_color(node: &ElementNode, name: &str) -> Result<Option<Color>> {
    match node.attribute(name) {
        Some(raw) if !raw.is_empty() => Color::from_string(raw).map(Some),
        _ => Ok(None),
    }
}

fn numeric_prefix(raw: &str) -> Option<f64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
    });
    re.find(raw.trim_start()).and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Lenient integer parse: numeric prefix, truncated, zero when absent.
pub fn parse_int(raw: &str) -> i32 {
    numeric_prefix(raw)
        .map(|v| v.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        .unwrap_or(0)
}

/// Lenient float parse: numeric prefix, zero when absent.
pub fn parse_float(raw: &str) -> f32 {
    numeric_prefix(raw).unwrap_or(0.0) as f32
}

/// Parse a `points` list (`"0,0 10,0 10 10"`) into coordinate pairs.
///
/// Commas and whitespace are interchangeable separators; a trailing
/// unpaired coordinate is dropped.
pub fn parse_points(raw: &str) -> Vec<(f32, f32)> {
    let coords: Vec<f32> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(parse_float)
        .collect();
    coords.chunks_exact(2).map(|p| (p[0], p[1])).collect()
}
