//! Colors and the particle palette.
//!
//! Colors travel through config files as hex strings, so [`Color`]
//! serializes to and from `#rrggbb` rather than a struct of channels.
//!
//! ```ignore
//! use driftfield::Color;
//!
//! let sky: Color = "#0ea5e9".parse()?;
//! assert_eq!(sky.to_string(), "#0ea5e9");
//!
//! let glass = Color::rgba(255, 255, 255, 0x80);
//! assert_eq!(glass.to_string(), "#ffffff80");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An sRGB color with 8 bits per channel.
///
/// Serialized as a `#rrggbb` hex string (or `#rrggbbaa` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha, 255 = opaque. Multiplied with a particle's opacity when drawn.
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color from red, green and blue.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidColor`] for any other length or a non-hex digit.
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || ConfigError::InvalidColor(hex.to_string());

        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Channels as `[r, g, b, a]` bytes.
    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// The brand palette particles draw their colors from: sky, violet, pink, cyan.
pub fn default_palette() -> Vec<Color> {
    vec![
        Color::rgb(0x0e, 0xa5, 0xe9),
        Color::rgb(0x8b, 0x5c, 0xf6),
        Color::rgb(0xec, 0x48, 0x99),
        Color::rgb(0x06, 0xb6, 0xd4),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let c = Color::from_hex("#0ea5e9").unwrap();
        assert_eq!(c, Color::rgb(0x0e, 0xa5, 0xe9));

        let c = Color::from_hex("8b5cf680").unwrap();
        assert_eq!(c, Color::rgba(0x8b, 0x5c, 0xf6, 0x80));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(Color::from_hex("#fff").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for c in default_palette() {
            assert_eq!(Color::from_hex(&c.to_string()).unwrap(), c);
        }
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(0xec, 0x48, 0x99)).unwrap();
        assert_eq!(json, "\"#ec4899\"");

        let back: Color = serde_json::from_str("\"#06b6d4\"").unwrap();
        assert_eq!(back, Color::rgb(0x06, 0xb6, 0xd4));

        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
