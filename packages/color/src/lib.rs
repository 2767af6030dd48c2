#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Numeric-to-color gradient scales.
//!
//! A [`ColorScale`] maps a number in `[low, high]` onto a gradient through
//! two or more color stops, interpolating each RGB channel linearly within
//! the segment the value falls in. Out-of-range input is clamped to the
//! nearest end of the gradient rather than rejected, so marker coloring can
//! never fail at render time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors that can occur while configuring a [`ColorScale`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorScaleError {
    /// No color stops were supplied.
    #[error("a color scale needs at least one color stop")]
    EmptySpectrum,

    /// A stop was neither a known color name nor a hex triplet.
    #[error("unknown color \"{0}\": expected a color name or a hex triplet like #ff8800")]
    UnknownColor(String),
}

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `rrggbb` hex triplet without a leading `#`.
    #[must_use]
    pub fn hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linearly interpolates every channel from `self` to `other`.
    ///
    /// `t` is clamped to `[0, 1]`; channels are rounded to the nearest
    /// integer.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp_channel(self.r, other.r, t),
            g: lerp_channel(self.g, other.g, t),
            b: lerp_channel(self.b, other.b, t),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let from = f64::from(from);
    let to = f64::from(to);
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorScaleError;

    /// Parses a color name (`"red"`) or a hex triplet (`"#ff0000"`,
    /// `"ff0000"`, `"#f00"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(named) = trimmed.parse::<NamedColor>() {
            return Ok(named.rgb());
        }
        parse_hex(trimmed).ok_or_else(|| ColorScaleError::UnknownColor(s.to_string()))
    }
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let digits = s.strip_prefix('#').unwrap_or(s);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some(Rgb::new(
            u8::from_str_radix(&digits[0..2], 16).ok()?,
            u8::from_str_radix(&digits[2..4], 16).ok()?,
            u8::from_str_radix(&digits[4..6], 16).ok()?,
        )),
        3 => {
            let expand = |i: usize| u8::from_str_radix(&digits[i..=i], 16).ok().map(|v| v * 17);
            Some(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorScaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// HTML color names accepted as gradient stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NamedColor {
    Black,
    White,
    Red,
    Green,
    Lime,
    Blue,
    Navy,
    Yellow,
    Orange,
    Purple,
    Gray,
    Teal,
}

impl NamedColor {
    /// Returns the HTML definition of this color.
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Black => Rgb::new(0x00, 0x00, 0x00),
            Self::White => Rgb::new(0xff, 0xff, 0xff),
            Self::Red => Rgb::new(0xff, 0x00, 0x00),
            Self::Green => Rgb::new(0x00, 0x80, 0x00),
            Self::Lime => Rgb::new(0x00, 0xff, 0x00),
            Self::Blue => Rgb::new(0x00, 0x00, 0xff),
            Self::Navy => Rgb::new(0x00, 0x00, 0x80),
            Self::Yellow => Rgb::new(0xff, 0xff, 0x00),
            Self::Orange => Rgb::new(0xff, 0xa5, 0x00),
            Self::Purple => Rgb::new(0x80, 0x00, 0x80),
            Self::Gray => Rgb::new(0x80, 0x80, 0x80),
            Self::Teal => Rgb::new(0x00, 0x80, 0x80),
        }
    }
}

/// A linear gradient over a numeric range.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    low: f64,
    high: f64,
    stops: Vec<Rgb>,
}

impl ColorScale {
    /// Range of the sentiment scale used by the clean and sentiment views.
    pub const SENTIMENT_RANGE: (f64, f64) = (4.0, 6.0);

    /// Range of the legacy per-city scale.
    pub const LEGACY_RANGE: (f64, f64) = (0.0, 10.0);

    /// Creates a scale over `[low, high]` through `stops`, in order.
    ///
    /// A degenerate range (`high <= low`) is accepted; every value then
    /// maps to the first stop.
    ///
    /// # Errors
    ///
    /// Returns [`ColorScaleError::EmptySpectrum`] if `stops` is empty.
    pub fn configure(low: f64, high: f64, stops: &[Rgb]) -> Result<Self, ColorScaleError> {
        if stops.is_empty() {
            return Err(ColorScaleError::EmptySpectrum);
        }
        if high <= low || !(high - low).is_finite() {
            log::debug!("Degenerate color scale range [{low}, {high}], using first stop");
        }
        Ok(Self {
            low,
            high,
            stops: stops.to_vec(),
        })
    }

    /// Red-to-green over `[4, 6]`.
    #[must_use]
    pub fn sentiment() -> Self {
        Self::sentiment_over(Self::SENTIMENT_RANGE.0, Self::SENTIMENT_RANGE.1)
    }

    /// Red-to-green over a custom range.
    #[must_use]
    pub fn sentiment_over(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            stops: vec![NamedColor::Red.rgb(), NamedColor::Green.rgb()],
        }
    }

    /// White-to-blue over `[0, max]`.
    #[must_use]
    pub fn attention(max: f64) -> Self {
        Self {
            low: 0.0,
            high: max,
            stops: vec![NamedColor::White.rgb(), NamedColor::Blue.rgb()],
        }
    }

    /// Red-to-green over `[0, 10]`.
    #[must_use]
    pub fn legacy_city() -> Self {
        Self::sentiment_over(Self::LEGACY_RANGE.0, Self::LEGACY_RANGE.1)
    }

    /// Lower bound of the range.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound of the range.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// The configured color stops.
    #[must_use]
    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Returns the color for `value`.
    ///
    /// Values below `low` get the first stop, values above `high` the last.
    /// NaN and degenerate ranges get the first stop.
    #[must_use]
    pub fn color_at(&self, value: f64) -> Rgb {
        let first = self.stops[0];
        let span = self.high - self.low;
        if self.stops.len() == 1 || value.is_nan() || span <= 0.0 || !span.is_finite() {
            return first;
        }

        let segments = self.stops.len() - 1;
        let clamped = value.clamp(self.low, self.high);
        #[allow(clippy::cast_precision_loss)]
        let position = (clamped - self.low) / span * segments as f64;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (position.floor() as usize).min(segments - 1);

        #[allow(clippy::cast_precision_loss)]
        let local = position - index as f64;

        self.stops[index].lerp(self.stops[index + 1], local)
    }

    /// Evenly spaced `(value, color)` samples across the range, for
    /// legends. Always includes both ends when `count >= 2`.
    #[must_use]
    pub fn legend(&self, count: usize) -> Vec<(f64, Rgb)> {
        match count {
            0 => Vec::new(),
            1 => vec![(self.low, self.color_at(self.low))],
            _ => {
                #[allow(clippy::cast_precision_loss)]
                let step = (self.high - self.low) / (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        #[allow(clippy::cast_precision_loss)]
                        let value = step.mul_add(i as f64, self.low);
                        (value, self.color_at(value))
                    })
                    .collect()
            }
        }
    }
}
