//! Color resolution.
//!
//! Callers hand in a [`Color`] (a name, a `#RRGGBB` string, or an 8-bit
//! triple) and the writer works with the resolved [`Rgb`], whose channels
//! are normalized to `[0, 1]` as content-stream color operators expect.

use crate::error::{Error, Result};
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// Named colors accepted by [`Color::Named`]. Lookup is case-insensitive.
static NAMED_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "black" => (0, 0, 0),
    "white" => (255, 255, 255),
    "red" => (255, 0, 0),
    "green" => (0, 128, 0),
    "blue" => (0, 0, 255),
    "yellow" => (255, 255, 0),
    "cyan" => (0, 255, 255),
    "magenta" => (255, 0, 255),
    "gray" => (128, 128, 128),
    "orange" => (255, 165, 0),
    "purple" => (128, 0, 128),
    "pink" => (255, 192, 203),
    "brown" => (139, 69, 19),
    "navy" => (0, 0, 128),
    "teal" => (0, 128, 128),
    "olive" => (128, 128, 0),
    "maroon" => (128, 0, 0),
    "gold" => (255, 215, 0),
    "lime" => (0, 255, 0),
};

/// A color as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Entry of the named color table, e.g. `"navy"`
    Named(String),
    /// Hex string of the form `#RRGGBB`
    Hex(String),
    /// 8-bit red, green, blue components
    Rgb(u8, u8, u8),
}

/// A resolved color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Normalize 8-bit components.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

impl Color {
    /// A named color.
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into())
    }

    /// A `#RRGGBB` color.
    pub fn hex(hex: impl Into<String>) -> Self {
        Color::Hex(hex.into())
    }

    /// Build an RGB color from integer components, rejecting anything outside 0–255.
    pub fn from_components(r: i64, g: i64, b: i64) -> Result<Self> {
        let check = |c: i64| {
            u8::try_from(c).map_err(|_| {
                Error::InvalidColor(format!("component {} out of range 0-255 in ({}, {}, {})", c, r, g, b))
            })
        };
        Ok(Color::Rgb(check(r)?, check(g)?, check(b)?))
    }

    /// Resolve to a normalized RGB triple.
    pub fn resolve(&self) -> Result<Rgb> {
        match self {
            Color::Named(name) => NAMED_COLORS
                .get(name.to_ascii_lowercase().as_str())
                .map(|&(r, g, b)| Rgb::from_u8(r, g, b))
                .ok_or_else(|| Error::InvalidColor(format!("unknown color name '{}'", name))),
            Color::Hex(hex) => parse_hex(hex),
            Color::Rgb(r, g, b) => Ok(Rgb::from_u8(*r, *g, *b)),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Rgb(0, 0, 0)
    }
}

/// Strings starting with `#` are hex colors, anything else is a name.
impl From<&str> for Color {
    fn from(s: &str) -> Self {
        if s.starts_with('#') {
            Color::Hex(s.to_string())
        } else {
            Color::Named(s.to_string())
        }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::Rgb(r, g, b)
    }
}

fn parse_hex(hex: &str) -> Result<Rgb> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| Error::InvalidColor(format!("hex color '{}' must start with '#'", hex)))?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(format!("'{}' is not of the form #RRGGBB", hex)));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|e| Error::InvalidColor(format!("'{}': {}", hex, e)))
    };
    Ok(Rgb::from_u8(channel(0)?, channel(2)?, channel(4)?))
}
