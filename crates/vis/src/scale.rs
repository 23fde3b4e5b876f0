//! Numeric scales that map data values into a visual range.

use serde::Deserialize;
use serde::Serialize;

/// The interpolation space of a [`Scale`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    /// Interpolates in square-root space, so that the area of a circle whose
    /// radius comes from this scale is proportional to the value.
    Sqrt,
}

/// How the domain of a scale is derived from the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainKind {
    /// `[0, max]`
    #[default]
    ZeroBased,
    /// `[min, max]`
    Extent,
}

/// A pure mapping from a numeric domain to a numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    domain: (f64, f64),
    range: (f64, f64),
    kind: ScaleKind,
}

impl Scale {
    pub fn new(domain: (f64, f64), range: (f64, f64), kind: ScaleKind) -> Scale {
        Self {
            domain,
            range,
            kind,
        }
    }

    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Scale {
        Self::new(domain, range, ScaleKind::Linear)
    }

    pub fn sqrt(domain: (f64, f64), range: (f64, f64)) -> Scale {
        Self::new(domain, range, ScaleKind::Sqrt)
    }

    /// A scale over `[min, max]` of the values.
    pub fn extent<I>(values: I, range: (f64, f64), kind: ScaleKind) -> Scale
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(extent(values).unwrap_or((0.0, 0.0)), range, kind)
    }

    /// A scale over `[0, max]` of the values.
    pub fn zero_based<I>(values: I, range: (f64, f64), kind: ScaleKind) -> Scale
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new((0.0, max(values).unwrap_or(0.0)), range, kind)
    }

    pub fn fit<I>(domain: DomainKind, values: I, range: (f64, f64), kind: ScaleKind) -> Scale
    where
        I: IntoIterator<Item = f64>,
    {
        match domain {
            DomainKind::ZeroBased => Self::zero_based(values, range, kind),
            DomainKind::Extent => Self::extent(values, range, kind),
        }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps `value` into the range. A degenerate domain maps everything to
    /// the start of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (lo, hi) = self.range;
        let transform = |v: f64| match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Sqrt => v.signum() * v.abs().sqrt(),
        };

        let d0 = transform(self.domain.0);
        let d1 = transform(self.domain.1);
        let span = d1 - d0;

        if span == 0.0 || !span.is_finite() || !value.is_finite() {
            return lo;
        }

        lo + (transform(value) - d0) / span * (hi - lo)
    }
}

/// Largest finite value.
pub fn max<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

/// `(min, max)` of the finite values.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
