//! Color value type and notation conversions
//!
//! Provides the 8-bit RGB [`Color`] used throughout the engine along with:
//! - CSS-style `rgb(...)` and `#RRGGBB` parsing
//! - Hex display form
//! - Lightness / saturation measures used by enhancement and voting
//! - Coarse color family naming for display

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::{AnalysisError, Result};

/// An opaque 8-bit RGB color.
///
/// Serializes as `"rgb(r g b)"` so catalog files and results share one notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Coarse color family used for on-screen labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorFamily {
    Black,
    White,
    Red,
    Yellow,
    Green,
    Blue,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn max_channel(&self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    pub fn min_channel(&self) -> u8 {
        self.r.min(self.g).min(self.b)
    }

    /// Mean of the three channels
    pub fn brightness(&self) -> f64 {
        (self.r as f64 + self.g as f64 + self.b as f64) / 3.0
    }

    /// Chroma relative to the brightest channel, `(max - min) / max`.
    ///
    /// Black has saturation 0.
    pub fn saturation(&self) -> f64 {
        let max = self.max_channel();
        if max == 0 {
            return 0.0;
        }
        (max - self.min_channel()) as f64 / max as f64
    }

    /// HSL lightness in [0, 1], `(max + min) / 510`
    pub fn lightness(&self) -> f64 {
        (self.max_channel() as f64 + self.min_channel() as f64) / 510.0
    }

    /// HSL saturation in [0, 1]; zero for grays
    pub fn hsl_saturation(&self) -> f64 {
        let max = self.max_channel() as f64;
        let min = self.min_channel() as f64;
        if max == min {
            return 0.0;
        }
        let denominator = if self.lightness() > 0.5 {
            510.0 - max - min
        } else {
            max + min
        };
        (max - min) / denominator
    }

    /// Hexadecimal representation (e.g., "#FF0000")
    pub fn to_hex(&self) -> String {
        format!("#{:X}", Srgb::<u8>::from(*self))
    }

    /// Coarse family name by channel sums and the dominant channel
    pub fn family(&self) -> ColorFamily {
        let sum = self.r as u16 + self.g as u16 + self.b as u16;
        let max = self.max_channel();

        if sum < 150 {
            ColorFamily::Black
        } else if sum > 700 {
            ColorFamily::White
        } else if max == self.r {
            if self.g > 150 && self.b < 150 {
                ColorFamily::Yellow
            } else {
                ColorFamily::Red
            }
        } else if max == self.g {
            ColorFamily::Green
        } else {
            ColorFamily::Blue
        }
    }

    /// Parse `rgb(r g b)` / `rgb(r, g, b)` notation
    fn parse_functional(input: &str, body: &str) -> Result<Self> {
        let parts: Vec<&str> = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.len() != 3 {
            return Err(AnalysisError::InvalidColor {
                input: input.to_string(),
                reason: format!("expected 3 channels, got {}", parts.len()),
            });
        }

        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse::<u8>().map_err(|e| AnalysisError::InvalidColor {
                input: input.to_string(),
                reason: format!("channel '{}': {}", part, e),
            })?;
        }

        Ok(Self::new(channels[0], channels[1], channels[2]))
    }
}

impl FromStr for Color {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(body) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_functional(trimmed, body);
        }

        if trimmed.starts_with('#') {
            let srgb = Srgb::<u8>::from_str(trimmed).map_err(|e| AnalysisError::InvalidColor {
                input: trimmed.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(srgb.into());
        }

        Err(AnalysisError::InvalidColor {
            input: trimmed.to_string(),
            reason: "expected rgb(...) or #RRGGBB".to_string(),
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({} {} {})", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = AnalysisError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl From<Srgb<u8>> for Color {
    fn from(srgb: Srgb<u8>) -> Self {
        Self::new(srgb.red, srgb.green, srgb.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

impl From<image::Rgb<u8>> for Color {
    fn from(pixel: image::Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0;
        Self::new(r, g, b)
    }
}

impl From<Color> for image::Rgb<u8> {
    fn from(color: Color) -> Self {
        image::Rgb(color.channels())
    }
}

impl fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorFamily::Black => "Black",
            ColorFamily::White => "White",
            ColorFamily::Red => "Red",
            ColorFamily::Yellow => "Yellow",
            ColorFamily::Green => "Green",
            ColorFamily::Blue => "Blue",
        };
        f.pad(name)
    }
}
