//! Colors, sequential color ramps and ordinal palettes.

use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation between two colors, `t` is clamped to `[0, 1]`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }

    fn named(name: &str) -> Option<Rgb> {
        let rgb = match name {
            "black" => Rgb(0, 0, 0),
            "white" => Rgb(255, 255, 255),
            "red" => Rgb(255, 0, 0),
            "green" => Rgb(0, 128, 0),
            "blue" => Rgb(0, 0, 255),
            "pink" => Rgb(255, 192, 203),
            "steelblue" => Rgb(70, 130, 180),
            "gray" | "grey" => Rgb(128, 128, 128),
            _ => return None,
        };

        Some(rgb)
    }
}

impl FromStr for Rgb {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || LayoutError::Color(s.to_owned());

        if let Some(rgb) = Rgb::named(&s.to_ascii_lowercase()) {
            return Ok(rgb);
        }

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        let hex = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
            6 => hex.to_owned(),
            _ => return Err(invalid()),
        };
        let value = u32::from_str_radix(&hex, 16).map_err(|_| invalid())?;

        Ok(Rgb(
            (value >> 16) as u8,
            (value >> 8 & 0xff) as u8,
            (value & 0xff) as u8,
        ))
    }
}

impl TryFrom<String> for Rgb {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Maps a numeric domain through evenly spread anchor colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct ColorRamp {
    anchors: Vec<Rgb>,
}

impl ColorRamp {
    pub fn new(anchors: Vec<Rgb>) -> Result<ColorRamp, LayoutError> {
        if anchors.is_empty() {
            return Err(LayoutError::Config(String::from(
                "a color ramp needs at least one anchor color",
            )));
        }

        Ok(Self { anchors })
    }

    /// Light to dark blue.
    pub fn blues() -> ColorRamp {
        Self {
            anchors: vec![Rgb(0xf7, 0xfb, 0xff), Rgb(0x6b, 0xae, 0xd6), Rgb(0x08, 0x30, 0x6b)],
        }
    }

    pub fn green_blue_pink() -> ColorRamp {
        Self {
            anchors: vec![Rgb(0, 128, 0), Rgb(0, 0, 255), Rgb(255, 192, 203)],
        }
    }

    /// The color of `value` within `domain`. Values outside the domain are
    /// clamped, a degenerate domain yields the first anchor.
    pub fn at(&self, domain: (f64, f64), value: f64) -> Rgb {
        let first = self.anchors[0];
        let (d0, d1) = domain;
        let span = d1 - d0;

        if self.anchors.len() == 1 || span == 0.0 || !span.is_finite() || !value.is_finite() {
            return first;
        }

        let t = ((value - d0) / span).clamp(0.0, 1.0);
        let segments = (self.anchors.len() - 1) as f64;
        let position = t * segments;
        let index = (position.floor() as usize).min(self.anchors.len() - 2);

        self.anchors[index].mix(self.anchors[index + 1], position - index as f64)
    }
}

impl TryFrom<Vec<Rgb>> for ColorRamp {
    type Error = LayoutError;

    fn try_from(anchors: Vec<Rgb>) -> Result<Self, Self::Error> {
        ColorRamp::new(anchors)
    }
}

impl From<ColorRamp> for Vec<Rgb> {
    fn from(ramp: ColorRamp) -> Self {
        ramp.anchors
    }
}

/// Assigns colors to categories.
///
/// Known keys get their configured color, other keys get a color derived
/// from the key itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPalette")]
pub struct Palette {
    keys: Vec<String>,
    colors: Vec<Rgb>,
}

#[derive(Deserialize)]
struct RawPalette {
    #[serde(default)]
    keys: Vec<String>,
    colors: Vec<Rgb>,
}

impl TryFrom<RawPalette> for Palette {
    type Error = LayoutError;

    fn try_from(raw: RawPalette) -> Result<Self, Self::Error> {
        Palette::ordinal(raw.keys, raw.colors)
    }
}

impl Palette {
    pub fn ordinal(keys: Vec<String>, colors: Vec<Rgb>) -> Result<Palette, LayoutError> {
        if colors.is_empty() {
            return Err(LayoutError::Config(String::from(
                "a palette needs at least one color",
            )));
        }

        Ok(Self { keys, colors })
    }

    /// Eight pastel colors used for composition breakdowns.
    pub fn categories() -> Palette {
        let colors = [
            "#FF9999", "#99FF99", "#9999FF", "#FFFF99", "#FF99FF", "#99FFFF", "#FFB366", "#B366FF",
        ]
        .iter()
        .filter_map(|c| c.parse().ok())
        .collect();

        Self {
            keys: Vec::new(),
            colors,
        }
    }

    pub fn color(&self, key: &str) -> Rgb {
        let index = self
            .keys
            .iter()
            .position(|k| k == key)
            .unwrap_or_else(|| self.keys.len() + fallback_index(key));

        self.colors[index % self.colors.len()]
    }

    /// The color of the `index`th category.
    pub fn nth(&self, index: usize) -> Rgb {
        self.colors[index % self.colors.len()]
    }
}

fn fallback_index(key: &str) -> usize {
    key.bytes()
        .fold(0usize, |hash, b| hash.wrapping_mul(31).wrapping_add(b as usize))
}
