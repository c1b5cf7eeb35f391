//! Theme and tint colors
//!
//! Tint colors come in as 8 hex digits (RRGGBBAA). In dark mode the RGB
//! channels are darkened by dividing by 6 while alpha is kept, which gives a
//! dark translucent tint instead of a true inversion.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Close button hover/pressed backgrounds
pub const CLOSE_HOVER: Rgba = Rgba::new(0xC4, 0x2B, 0x1C, 0xFF);
pub const CLOSE_PRESSED: Rgba = Rgba::new(0xC8, 0x3C, 0x30, 0xFF);

/// Resolved light/dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Foreground for glyphs and text
    pub fn foreground(self) -> Rgba {
        match self {
            Self::Dark => Rgba::WHITE,
            Self::Light => Rgba::BLACK,
        }
    }

    /// Flat fill used while the backdrop effect is off
    pub fn fallback_fill(self) -> Rgba {
        match self {
            Self::Dark => Rgba::BLACK,
            Self::Light => Rgba::WHITE,
        }
    }
}

/// A 4-channel color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Darkened tint for dark mode: RGB / 6, alpha untouched
    pub fn darken_for_dark_mode(self) -> Self {
        Self {
            r: sixth(self.r),
            g: sixth(self.g),
            b: sixth(self.b),
            a: self.a,
        }
    }

    /// Packed 0xRRGGBBAA
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Packed 0xAABBGGRR, the layout compositor accent tints take
    pub const fn to_abgr(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }
}

/// `channel / 6`, rounded half to even
fn sixth(channel: u8) -> u8 {
    let quotient = channel / 6;
    match channel % 6 {
        0..=2 => quotient,
        3 if quotient % 2 == 0 => quotient,
        _ => quotient + 1,
    }
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

impl FromStr for Rgba {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 8 {
            return Err(ConfigError::InvalidColorLength(s.to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColorDigit(s.to_string()));
        }
        let bytes = s.as_bytes();
        let channel = |i: usize| (hex_value(bytes[i]) << 4) | hex_value(bytes[i + 1]);
        Ok(Self::new(channel(0), channel(2), channel(4), channel(6)))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let color: Rgba = "f2f2f299".parse().unwrap();
        assert_eq!(color, Rgba::new(0xF2, 0xF2, 0xF2, 0x99));
        assert_eq!(color.to_string(), "F2F2F299");
        assert_eq!(color.to_u32(), 0xF2F2F299);
    }

    #[test]
    fn test_abgr_packing() {
        assert_eq!(Rgba::new(0x10, 0x20, 0x30, 0x40).to_abgr(), 0x40302010);
        let tint: Rgba = "282828A0".parse().unwrap();
        assert_eq!(tint.to_abgr(), 0xA0282828);
    }

    #[test]
    fn test_dark_mode_tint() {
        let color: Rgba = "F0F0F0A0".parse().unwrap();
        assert_eq!(color.darken_for_dark_mode().to_string(), "282828A0");
    }

    #[test]
    fn test_dark_mode_tint_pads_small_channels() {
        let color: Rgba = "0C1E00FF".parse().unwrap();
        // 12/6 = 2, 30/6 = 5, 0/6 = 0
        assert_eq!(color.darken_for_dark_mode().to_string(), "020500FF");
    }

    #[test]
    fn test_sixth_rounds_half_to_even() {
        assert_eq!(sixth(3), 0);
        assert_eq!(sixth(4), 1);
        assert_eq!(sixth(9), 2);
        assert_eq!(sixth(15), 2);
        assert_eq!(sixth(255), 42);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(matches!(
            "F0F0F0".parse::<Rgba>(),
            Err(ConfigError::InvalidColorLength(_))
        ));
        assert!(matches!(
            "F0F0F0A0FF".parse::<Rgba>(),
            Err(ConfigError::InvalidColorLength(_))
        ));
    }

    #[test]
    fn test_rejects_non_hex() {
        assert!(matches!(
            "F0F0G0A0".parse::<Rgba>(),
            Err(ConfigError::InvalidColorDigit(_))
        ));
        assert!(matches!(
            "+0F0F0A0".parse::<Rgba>(),
            Err(ConfigError::InvalidColorDigit(_))
        ));
    }

    #[test]
    fn test_appearance_colors() {
        assert_eq!(Appearance::Dark.foreground(), Rgba::WHITE);
        assert_eq!(Appearance::Light.fallback_fill(), Rgba::WHITE);
        assert!(Appearance::from_dark(true).is_dark());
    }
}
