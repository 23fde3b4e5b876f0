//! Icon assets for pictogram grids.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::LayoutError;

/// Maps icon names to asset locations: `<dir>/<file>.svg`.
///
/// File names equal icon names except for the entries of the explicit
/// exception table; nothing is inferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconTable {
    pub dir: String,
    pub exceptions: BTreeMap<String, String>,
}

impl Default for IconTable {
    fn default() -> Self {
        Self {
            dir: String::from("food"),
            exceptions: BTreeMap::from([(String::from("ice_cream"), String::from("ice-cream"))]),
        }
    }
}

impl IconTable {
    pub fn new(dir: impl Into<String>) -> IconTable {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn file_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.exceptions.get(name).map_or(name, String::as_str)
    }

    pub fn location(&self, name: &str) -> String {
        let file = self.file_name(name);

        if self.dir.is_empty() {
            format!("{file}.svg")
        } else {
            format!("{dir}/{file}.svg", dir = self.dir.trim_end_matches('/'))
        }
    }
}

/// A parsed SVG icon: its view box and the markup inside the root element.
#[derive(Debug, Clone, PartialEq)]
pub struct IconAsset {
    pub view_box: [f64; 4],
    pub content: String,
}

/// The box an icon occupies inside a square cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl IconAsset {
    pub fn parse(svg: &str) -> Result<IconAsset, LayoutError> {
        let invalid = |reason: &str| LayoutError::Config(format!("invalid icon: {reason}"));

        let start = svg.find("<svg").ok_or_else(|| invalid("no <svg> element"))?;
        let tag_end = svg[start..]
            .find('>')
            .map(|i| start + i)
            .ok_or_else(|| invalid("unterminated <svg> tag"))?;
        let tag = &svg[start..tag_end];

        let view_box = match attribute(tag, "viewBox") {
            Some(value) => parse_view_box(value).ok_or_else(|| invalid("malformed viewBox"))?,
            None => {
                let width = attribute(tag, "width").and_then(parse_length);
                let height = attribute(tag, "height").and_then(parse_length);
                match (width, height) {
                    (Some(w), Some(h)) => [0.0, 0.0, w, h],
                    _ => return Err(invalid("no viewBox and no size")),
                }
            }
        };

        let content = if tag.ends_with('/') {
            String::new()
        } else {
            let close = svg.rfind("</svg>").ok_or_else(|| invalid("no closing </svg>"))?;
            if close <= tag_end {
                return Err(invalid("no closing </svg>"));
            }
            svg[tag_end + 1..close].trim().to_owned()
        };

        Ok(Self { view_box, content })
    }

    pub fn aspect_ratio(&self) -> f64 {
        let [_, _, width, height] = self.view_box;

        if height > 0.0 { width / height } else { 1.0 }
    }

    /// Fits the icon into a `size` square cell, keeping its aspect ratio and
    /// centering it.
    pub fn fit(&self, size: f64) -> Fit {
        let ratio = self.aspect_ratio();
        let (width, height) = if ratio > 1.0 {
            (size, size / ratio)
        } else {
            (size * ratio, size)
        };

        Fit {
            x: (size - width) / 2.0,
            y: (size - height) / 2.0,
            width,
            height,
        }
    }
}

fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = tag;

    while let Some(i) = rest.find(name) {
        let preceded_by_space = rest[..i].ends_with(char::is_whitespace);
        let after = rest[i + name.len()..].trim_start();

        if preceded_by_space {
            if let Some(after) = after.strip_prefix('=') {
                let after = after.trim_start();
                let quote = after.chars().next()?;
                if quote == '"' || quote == '\'' {
                    let value = &after[1..];
                    return value.find(quote).map(|end| &value[..end]);
                }
            }
        }

        rest = &rest[i + name.len()..];
    }

    None
}

fn parse_view_box(value: &str) -> Option<[f64; 4]> {
    let numbers: Vec<f64> = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;

    numbers.try_into().ok()
}

fn parse_length(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").parse().ok()
}
