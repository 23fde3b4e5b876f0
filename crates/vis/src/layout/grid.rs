use ecochart_data::Normalized;
use serde::Deserialize;
use serde::Serialize;

use crate::color::Palette;
use crate::color::Rgb;
use crate::error::LayoutError;
use crate::error::Result;
use crate::layout::LayoutStrategy;
use crate::layout::format_value;
use crate::scene::Control;
use crate::scene::Point;
use crate::scene::Scene;
use crate::scene::Shape;
use crate::scene::VisualElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Columns {
    Fixed(usize),
    /// As many cells as fit in the width.
    Fit,
}

impl Default for Columns {
    fn default() -> Self {
        Columns::Fixed(8)
    }
}

/// What is drawn in each unit cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell", rename_all = "kebab-case")]
pub enum CellKind {
    Square {
        palette: Palette,
        #[serde(default = "white")]
        stroke: Rgb,
        #[serde(default = "one")]
        stroke_width: f64,
    },
    /// The icon named after the item key; the asset is attached later.
    #[default]
    Icon,
}

fn white() -> Rgb {
    Rgb(255, 255, 255)
}

fn one() -> f64 {
    1.0
}

/// The `(column, row)` of cell `index` in a grid of `columns` columns.
pub fn grid_cell(index: usize, columns: usize) -> (usize, usize) {
    (index % columns, index / columns)
}

/// The number of rows `cells` cells occupy.
pub fn grid_rows(cells: usize, columns: usize) -> usize {
    cells.div_ceil(columns)
}

/// A pictogram grid: every item is flattened into `round(value)` unit cells,
/// filled row by row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub width: f64,
    /// Fixed scene height; when unset the scene is as tall as the grid.
    pub height: Option<f64>,
    pub columns: Columns,
    pub cell: f64,
    pub spacing: f64,
    /// Center the block of cells in the scene.
    pub center: bool,
    pub cell_kind: CellKind,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: Some(600.0),
            columns: Columns::default(),
            cell: 75.0,
            spacing: 30.0,
            center: true,
            cell_kind: CellKind::default(),
        }
    }
}

impl GridLayout {
    pub fn columns(&self) -> usize {
        match self.columns {
            Columns::Fixed(columns) => columns.max(1),
            Columns::Fit => ((self.width / self.cell).floor() as usize).max(1),
        }
    }

    fn pitch(&self) -> f64 {
        self.cell + self.spacing
    }

    fn block_size(&self, columns: usize, rows: usize) -> (f64, f64) {
        let extent = |n: usize| {
            if n == 0 {
                0.0
            } else {
                n as f64 * self.pitch() - self.spacing
            }
        };

        (extent(columns), extent(rows))
    }

    fn cell_shape(&self, key: &str) -> Shape {
        match self.cell_kind {
            CellKind::Square { .. } => Shape::Rect {
                width: self.cell,
                height: self.cell,
            },
            CellKind::Icon => Shape::Icon {
                size: self.cell,
                name: key.to_owned(),
                asset: None,
            },
        }
    }
}

impl LayoutStrategy for GridLayout {
    fn layout(&self, data: &Normalized) -> Result<Scene> {
        if self.cell.is_nan() || self.cell <= 0.0 || self.spacing < 0.0 {
            return Err(LayoutError::Config(format!(
                "grid cells need a positive size and non-negative spacing, got {} and {}",
                self.cell, self.spacing
            )));
        }

        let columns = self.columns();
        let cells: Vec<_> = data
            .items()
            .into_iter()
            .flat_map(|item| {
                let count = item.value.round().max(0.0) as usize;
                std::iter::repeat_n(item, count)
            })
            .collect();

        let rows = grid_rows(cells.len(), columns);
        let (block_width, block_height) = self.block_size(columns, rows);
        let height = self.height.unwrap_or(block_height);

        let origin = if self.center {
            Point::new((self.width - block_width) / 2.0, (height - block_height) / 2.0)
        } else {
            Point::default()
        };

        let mut scene = Scene::new(self.width, height);

        for (index, item) in cells.into_iter().enumerate() {
            let (column, row) = grid_cell(index, columns);
            let position = Point::new(
                origin.x + column as f64 * self.pitch(),
                origin.y + row as f64 * self.pitch(),
            );

            let hover = format!("{}: {}", item.key, format_value(item.value));
            let key = item.key.clone();
            let mut cell = VisualElement::new(self.cell_shape(&key), position, item)
                .class("cell")
                .hover(hover)
                .toggle(Control::Highlight, key.clone());

            if let CellKind::Square {
                ref palette,
                stroke,
                stroke_width,
            } = self.cell_kind
            {
                cell = cell.color(palette.color(&key)).stroke(stroke, stroke_width);
            }

            scene.elements.push(cell);
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ecochart_data::HierarchicalNode;
    use ecochart_data::NormalizedItem;
    use proptest::prelude::*;

    fn foods() -> Normalized {
        Normalized::Tree(HierarchicalNode::branch(
            "root",
            vec![
                HierarchicalNode::leaf("banana", 3.0),
                HierarchicalNode::leaf("ice_cream", 6.6),
            ],
        ))
    }

    fn squares() -> GridLayout {
        GridLayout {
            width: 800.0,
            height: None,
            columns: Columns::Fit,
            cell: 20.0,
            spacing: 0.0,
            center: false,
            cell_kind: CellKind::Square {
                palette: Palette::ordinal(
                    vec![String::from("banana"), String::from("ice_cream")],
                    vec![Rgb(0xff, 0xe1, 0x35), Rgb(0xff, 0xda, 0xb9)],
                )
                .unwrap(),
                stroke: white(),
                stroke_width: 1.0,
            },
        }
    }

    #[test]
    fn flatten_items_into_rounded_cells() {
        let scene = squares().layout(&foods()).unwrap();

        assert_eq!(scene.elements.len(), 10);
        assert_eq!(scene.elements[2].data.key, "banana");
        assert_eq!(scene.elements[3].data.key, "ice_cream");
        assert_eq!(scene.elements[3].color, Some(Rgb(0xff, 0xda, 0xb9)));
        assert_eq!(scene.elements[3].position, Point::new(60.0, 0.0));
        assert_eq!(scene.height, 20.0);
    }

    #[test]
    fn fit_columns_to_width() {
        assert_eq!(squares().columns(), 40);
        assert_eq!(GridLayout::default().columns(), 8);
    }

    #[test]
    fn center_the_icon_block() {
        let data = Normalized::Items(vec![NormalizedItem::new("tomato", 9.0)]);

        let scene = GridLayout::default().layout(&data).unwrap();

        // 8 columns and 2 rows of 75px icons with 30px spacing
        assert_eq!(scene.elements[0].position, Point::new(95.0, 210.0));
        assert_eq!(scene.elements[8].position, Point::new(95.0, 315.0));
        assert!(matches!(scene.elements[0].shape, Shape::Icon { ref name, .. } if name == "tomato"));

        let toggle = scene.elements[0].interaction.toggle.as_ref().unwrap();
        assert_eq!(toggle.control, Control::Highlight);
        assert_eq!(toggle.value, "tomato");
    }

    #[test]
    fn empty_grid() {
        let scene = squares().layout(&Normalized::Items(Vec::new())).unwrap();

        assert!(scene.is_empty());
        assert_eq!(scene.height, 0.0);
    }

    #[test]
    fn reject_empty_cells() {
        let layout = GridLayout {
            cell: 0.0,
            ..GridLayout::default()
        };

        assert!(layout.layout(&foods()).is_err());
    }

    proptest! {
        #[test]
        fn cells_fill_rows_in_order(cells in 0usize..500, columns in 1usize..40) {
            let rows = grid_rows(cells, columns);

            prop_assert!(rows * columns >= cells);
            prop_assert!(cells == 0 || (rows - 1) * columns < cells);

            for index in 0..cells {
                let (column, row) = grid_cell(index, columns);
                prop_assert!(column < columns);
                prop_assert!(row < rows);
                prop_assert_eq!(row * columns + column, index);
            }
        }

        #[test]
        fn one_cell_per_rounded_unit(values in prop::collection::vec(0.0f64..20.0, 0..10)) {
            let items = values
                .iter()
                .enumerate()
                .map(|(i, v)| NormalizedItem::new(format!("k{i}"), *v))
                .collect();
            let expected: usize = values.iter().map(|v| v.round() as usize).sum();

            let scene = GridLayout::default().layout(&Normalized::Items(items)).unwrap();

            prop_assert_eq!(scene.elements.len(), expected);
        }
    }
}
