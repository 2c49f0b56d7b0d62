//! Colours, the named palette and the density colour ramp.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// RGBA colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Fully transparent black, used for points that have no colour value.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, 1.0)
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// 8-bit channels, rounded.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }

    /// `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Linear interpolation between two colours, `t` in `[0, 1]`.
    pub fn lerp(self, other: Rgba, t: f64) -> Rgba {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(named) = palette::by_name(trimmed) {
            return Ok(named);
        }
        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| format!("unknown colour: {s}"))?;
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| format!("invalid hex colour: {s}"))
        };
        match hex.len() {
            6 => Ok(Rgba::rgb8(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Rgba::rgb8(channel(0)?, channel(2)?, channel(4)?)
                .with_alpha(channel(6)? as f64 / 255.0)),
            _ => Err(format!("invalid hex colour: {s}")),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(value: Rgba) -> Self {
        value.to_hex()
    }
}

/// Named colours used by the plots.
pub mod palette {
    use super::Rgba;

    pub const BLUE: Rgba = Rgba::rgb8(0, 142, 206);
    pub const GRAY: Rgba = Rgba::rgb8(77, 80, 94);
    pub const BORDEAUX: Rgba = Rgba::rgb8(208, 33, 85);
    pub const GREEN: Rgba = Rgba::rgb8(5, 126, 121);
    /// ROPE boundary markers.
    pub const DARK_ORANGE: Rgba = Rgba::rgb8(255, 140, 0);

    /// Colours cycled through when overlaying several posteriors.
    pub const CYCLE: [Rgba; 4] = [BLUE, BORDEAUX, GREEN, GRAY];

    /// Look a colour up by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Rgba> {
        match name.to_ascii_lowercase().as_str() {
            "blue" => Some(BLUE),
            "gray" | "grey" => Some(GRAY),
            "bordeaux" => Some(BORDEAUX),
            "green" => Some(GREEN),
            "darkorange" | "dark-orange" => Some(DARK_ORANGE),
            "black" | "k" => Some(Rgba::BLACK),
            "white" | "w" => Some(Rgba::WHITE),
            _ => None,
        }
    }
}

/// Lookup table mapping a normalised scalar to a colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    entries: Vec<Rgba>,
}

impl ColorRamp {
    /// `n` entries evenly spaced from `from` to `to`.
    pub fn linear(from: Rgba, to: Rgba, n: usize) -> Self {
        let n = n.max(2);
        let entries = (0..n)
            .map(|k| from.lerp(to, k as f64 / (n - 1) as f64))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rgba] {
        &self.entries
    }

    /// Colour for `t` in `[0, 1]`. Values below or above clamp to the end
    /// entries; NaN maps to [`Rgba::TRANSPARENT`].
    pub fn map(&self, t: f64) -> Rgba {
        if t.is_nan() {
            return Rgba::TRANSPARENT;
        }
        let n = self.entries.len();
        let idx = (t * n as f64).floor();
        let idx = if idx < 0.0 { 0 } else { (idx as usize).min(n - 1) };
        self.entries[idx]
    }

    /// Colour for `value` normalised into `[lo, hi]`. A zero-width range
    /// maps everything to the first entry.
    pub fn map_range(&self, value: f64, lo: f64, hi: f64) -> Rgba {
        if hi > lo {
            self.map((value - lo) / (hi - lo))
        } else if value.is_nan() {
            Rgba::TRANSPARENT
        } else {
            self.entries[0]
        }
    }
}

/// Light blue (low density) to dark blue (high density), 256 entries.
pub static BLUES: LazyLock<ColorRamp> = LazyLock::new(|| {
    ColorRamp::linear(
        Rgba::new(199.0 / 256.0, 224.0 / 256.0, 252.0 / 256.0, 1.0),
        Rgba::new(8.0 / 256.0, 64.0 / 256.0, 129.0 / 256.0, 1.0),
        256,
    )
});
