use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

/// A document-unique identifier such as `O-clip-3`, usable as an SVG
/// `id` and referenced through [`Uid::url`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Uid(String);

impl Uid {
    /// The `url(#id)` reference form used by `clip-path` and `fill`.
    pub fn url(&self) -> String {
        format!("url(#{})", self.0)
    }

    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl Display for Uid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Hands out identifiers for one render pass, so that identical scenes
/// get identical identifiers.
#[derive(Debug, Default)]
pub struct UidGenerator {
    count: u64,
}

impl UidGenerator {
    pub fn new() -> UidGenerator {
        Self::default()
    }

    pub fn next(&mut self, name: &str) -> Uid {
        self.count += 1;

        if name.is_empty() {
            Uid(format!("O-{}", self.count))
        } else {
            Uid(format!("O-{name}-{}", self.count))
        }
    }
}
