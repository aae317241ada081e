use serde::Deserialize;
use std::fmt;

use crate::RenderError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse(s: &str) -> crate::Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let bad = || RenderError::Config(format!("invalid color '{s}': expected #rrggbb"));
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    pub fn to_svg_fill(&self) -> String {
        if (self.a - 1.0).abs() < 1e-6 {
            self.to_hex()
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_svg_fill())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        let c = Color::parse("#1D4ED8").unwrap();
        assert_eq!((c.r, c.g, c.b), (0x1D, 0x4E, 0xD8));
        assert!((c.a - 1.0).abs() < 1e-9);
        assert_eq!(Color::parse("ff0000").unwrap(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn malformed_hex_rejected() {
        for s in ["", "#12345", "#gg0000", "#ff00000", "#é0000", "#+f0000"] {
            assert!(Color::parse(s).is_err(), "{s}");
        }
    }

    #[test]
    fn svg_fill() {
        assert_eq!(Color::rgb(0, 0, 255).to_svg_fill(), "#0000ff");
        assert_eq!(Color::rgb(29, 78, 216).with_alpha(0.5).to_svg_fill(), "rgba(29,78,216,0.500)");
    }
}
