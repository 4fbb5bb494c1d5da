//! 8-bit sRGB color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::palette::ParseColorError;

/// An 8-bit gamma-encoded RGB triple.
///
/// Serializes as a `#RRGGBB` string so palette files stay human-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn from_array(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels as floats on the 0.0..=255.0 scale.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Round and clamp float channels (0.0..=255.0 scale) back to 8 bits.
    #[inline]
    pub fn from_f32(c: [f32; 3]) -> Self {
        Self::new(to_u8(c[0]), to_u8(c[1]), to_u8(c[2]))
    }

    /// Squared Euclidean distance in 8-bit RGB space.
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    // NaN saturates to 0 through the `as` cast.
    v.round().clamp(0.0, 255.0) as u8
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::from_array(c)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` (case-insensitive,
    /// surrounding whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidHex(s.to_string()));
        }

        let hex = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| ParseColorError::InvalidHex(s.to_string()))
        };

        match s.len() {
            3 => Ok(Self::new(
                hex(&s[0..1])? * 17,
                hex(&s[1..2])? * 17,
                hex(&s[2..3])? * 17,
            )),
            6 => Ok(Self::new(hex(&s[0..2])?, hex(&s[2..4])?, hex(&s[4..6])?)),
            len => Err(ParseColorError::InvalidLength(len)),
        }
    }
}
