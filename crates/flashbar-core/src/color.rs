use crate::error::{FlashbarError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// An sRGB color with straight alpha, as stored in the `flash-color` setting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// 0.0 (transparent) ..= 1.0 (opaque)
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse CSS color syntax: `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#RGB`,
    /// `#RGBA`, `#RRGGBB` or `#RRGGBBAA`. Channels may be given as percentages.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| FlashbarError::InvalidColor(input.to_string()));
        }
        parse_functional(s).ok_or_else(|| FlashbarError::InvalidColor(input.to_string()))
    }

    /// `rgba(R, G, B, A)` with integer channels and a plain decimal alpha.
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }

    pub fn opacity_percent(&self) -> u8 {
        (self.alpha * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub fn with_opacity(self, percent: u8) -> Self {
        Self {
            alpha: f32::from(percent.min(100)) / 100.0,
            ..self
        }
    }

    /// Composite this color over an opaque background.
    pub fn blend_over(&self, background: (u8, u8, u8)) -> (u8, u8, u8) {
        let a = self.alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 {
            (f32::from(fg) * a + f32::from(bg) * (1.0 - a)).round() as u8
        };
        (
            mix(self.red, background.0),
            mix(self.green, background.1),
            mix(self.blue, background.2),
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::new(255, 0, 0, 0.5)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl std::str::FromStr for Rgba {
    type Err = FlashbarError;

    fn from_str(s: &str) -> Result<Self> {
        Rgba::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = FlashbarError;

    fn try_from(value: String) -> Result<Self> {
        Rgba::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_css()
    }
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (red, green, blue, alpha) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Rgba::new(red, green, blue, f32::from(alpha) / 255.0))
}

fn functional_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^rgba?\(\s*([0-9.]+%?)\s*,\s*([0-9.]+%?)\s*,\s*([0-9.]+%?)\s*(?:,\s*([0-9.]+%?)\s*)?\)$",
        )
        .expect("color pattern is valid")
    })
}

fn parse_functional(s: &str) -> Option<Rgba> {
    let caps = functional_pattern().captures(s)?;
    let red = parse_channel(caps.get(1)?.as_str())?;
    let green = parse_channel(caps.get(2)?.as_str())?;
    let blue = parse_channel(caps.get(3)?.as_str())?;
    let alpha = match caps.get(4) {
        Some(m) => parse_alpha(m.as_str())?,
        None => 1.0,
    };
    Some(Rgba::new(red, green, blue, alpha))
}

fn parse_channel(s: &str) -> Option<u8> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? * 255.0 / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(s: &str) -> Option<f32> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()?,
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
