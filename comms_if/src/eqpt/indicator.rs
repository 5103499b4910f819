//! # Indicator LED Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A 24 bit colour.
///
/// In parameter files colours are written as hex strings, either `"#rrggbb"` or the short
/// `"#rgb"` form.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Colour demands for the left and right indicator LEDs.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorDems {
    pub left: Rgb,
    pub right: Rgb,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RgbParseError {
    #[error("Colour must start with '#', found {0:?}")]
    MissingHash(String),

    #[error("Colour must have 3 or 6 hex digits, found {0:?}")]
    InvalidLength(String),

    #[error("Colour contains a non-hex digit: {0:?}")]
    InvalidDigit(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = match s.strip_prefix('#') {
            Some(d) => d,
            None => return Err(RgbParseError::MissingHash(String::from(s))),
        };

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RgbParseError::InvalidDigit(String::from(s)));
        }

        // Digits are all ascii so byte slicing is safe
        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16).map_err(|_| RgbParseError::InvalidDigit(String::from(s)))
        };

        match digits.len() {
            // Short form, each digit is repeated, i.e. #faf == #ffaaff
            3 => Ok(Rgb::new(
                channel(&digits[0..1])? * 0x11,
                channel(&digits[1..2])? * 0x11,
                channel(&digits[2..3])? * 0x11,
            )),
            6 => Ok(Rgb::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(RgbParseError::InvalidLength(String::from(s))),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = RgbParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl IndicatorDems {
    /// Set both indicators to the same colour.
    pub const fn both(colour: Rgb) -> Self {
        Self {
            left: colour,
            right: colour,
        }
    }

    /// Switch both indicators off.
    pub const fn off() -> Self {
        Self::both(Rgb::OFF)
    }
}

impl From<Rgb> for IndicatorDems {
    fn from(colour: Rgb) -> Self {
        Self::both(colour)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_rgb() {
        assert_eq!("#ffaa00".parse::<Rgb>(), Ok(Rgb::new(0xff, 0xaa, 0x00)));
        assert_eq!("#8F00FF".parse::<Rgb>(), Ok(Rgb::new(0x8f, 0x00, 0xff)));
        assert_eq!("#faf".parse::<Rgb>(), Ok(Rgb::new(0xff, 0xaa, 0xff)));
        assert_eq!("#0f0".parse::<Rgb>(), Ok(Rgb::new(0, 0xff, 0)));

        assert_eq!(
            "00ff00".parse::<Rgb>(),
            Err(RgbParseError::MissingHash(String::from("00ff00")))
        );
        assert_eq!(
            "#00ff0".parse::<Rgb>(),
            Err(RgbParseError::InvalidLength(String::from("#00ff0")))
        );
        assert_eq!(
            "#00gg00".parse::<Rgb>(),
            Err(RgbParseError::InvalidDigit(String::from("#00gg00")))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgb::new(0, 0xff, 0xff).to_string(), "#00ffff");
        assert_eq!(String::from(Rgb::new(0xff, 0xaa, 0)), "#ffaa00");
    }
}
