//! Layout strategies that turn normalized data into a positioned scene.
//!
//! Every strategy derives its scales from the data it is given, so a
//! layout is a pure function of its configuration and the data. An empty
//! input yields an empty scene, and a dataset whose values are all zero
//! collapses every element to the minimum of its range.

mod band;
mod grid;
mod stack;
mod tile;
mod treemap;

use ecochart_data::Normalized;
use serde::Deserialize;
use serde::Serialize;

pub use crate::layout::band::BandDomain;
pub use crate::layout::band::BandLayout;
pub use crate::layout::band::BandScale;
pub use crate::layout::grid::CellKind;
pub use crate::layout::grid::Columns;
pub use crate::layout::grid::GridLayout;
pub use crate::layout::grid::grid_cell;
pub use crate::layout::grid::grid_rows;
pub use crate::layout::stack::Breakdown;
pub use crate::layout::stack::RadiusEncoding;
pub use crate::layout::stack::StackLayout;
pub use crate::layout::stack::radial_position;
pub use crate::layout::tile::Bounds;
pub use crate::layout::tile::Squarify;
pub use crate::layout::tile::Tiler;
pub use crate::layout::treemap::TreemapLayout;

use crate::error::Result;
use crate::scene::Scene;

pub trait LayoutStrategy: Send + Sync {
    fn layout(&self, data: &Normalized) -> Result<Scene>;
}

/// Space kept free around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

/// A layout described by configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayoutSpec {
    Band(BandLayout),
    Stack(StackLayout),
    Grid(GridLayout),
    Treemap(TreemapLayout),
}

impl LayoutStrategy for LayoutSpec {
    fn layout(&self, data: &Normalized) -> Result<Scene> {
        match self {
            LayoutSpec::Band(layout) => layout.layout(data),
            LayoutSpec::Stack(layout) => layout.layout(data),
            LayoutSpec::Grid(layout) => layout.layout(data),
            LayoutSpec::Treemap(layout) => layout.layout(data),
        }
    }
}

/// Formats a value for hover text: whole numbers without decimals, others
/// with two.
pub(crate) fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hover_values() {
        assert_eq!(format_value(15.0), "15");
        assert_eq!(format_value(59.5649), "59.56");
    }

    #[test]
    fn layout_spec_from_config() {
        let spec: LayoutSpec = serde_json::from_value(serde_json::json!({
            "kind": "grid",
            "columns": { "fixed": 8 },
            "cell": 75.0,
            "spacing": 30.0,
        }))
        .unwrap();

        let LayoutSpec::Grid(grid) = spec else {
            panic!("expected a grid layout");
        };
        assert_eq!(grid.columns, Columns::Fixed(8));
        assert_eq!(grid.cell, 75.0);
    }
}
