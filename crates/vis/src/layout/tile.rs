use serde::Serialize;

/// An axis-aligned rectangle, positioned by its top left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Bounds {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Shrinks the bounds by `padding` on every side, never below zero size.
    pub fn inset(&self, padding: f64) -> Bounds {
        let width = (self.width - 2.0 * padding).max(0.0);
        let height = (self.height - 2.0 * padding).max(0.0);

        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y + (self.height - height) / 2.0,
            width,
            height,
        }
    }

    fn is_degenerate(&self) -> bool {
        self.width <= 1e-9 || self.height <= 1e-9
    }
}

/// Partitions a rectangle into tiles whose areas are proportional to the
/// given values.
pub trait Tiler: Send + Sync {
    /// Returns one tile per value, in the order of `values`. Values that are
    /// zero, negative or not finite get an empty tile at the origin of
    /// `bounds`.
    fn tile(&self, values: &[f64], bounds: Bounds) -> Vec<Bounds>;
}

/// Squarified tiling (Bruls, Huizing and van Wijk): rows of tiles are laid
/// along the shorter side of the remaining space, and a tile joins the
/// current row as long as that does not worsen the row's worst aspect
/// ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct Squarify;

impl Tiler for Squarify {
    fn tile(&self, values: &[f64], bounds: Bounds) -> Vec<Bounds> {
        let empty = Bounds::new(bounds.x, bounds.y, 0.0, 0.0);
        let mut tiles = vec![empty; values.len()];

        let valid = |v: f64| v.is_finite() && v > 0.0;
        let total: f64 = values.iter().copied().filter(|v| valid(*v)).sum();
        if total <= 0.0 || bounds.is_degenerate() {
            return tiles;
        }

        let mut order: Vec<usize> = (0..values.len()).filter(|i| valid(values[*i])).collect();
        order.sort_by(|a, b| values[*b].total_cmp(&values[*a]).then(a.cmp(b)));

        let scale = bounds.area() / total;
        let areas: Vec<f64> = order.iter().map(|i| values[*i] * scale).collect();

        for (index, tile) in order.into_iter().zip(squarify(&areas, bounds)) {
            tiles[index] = tile;
        }

        tiles
    }
}

/// Lays out `areas`, sorted in descending order, inside `bounds`.
fn squarify(areas: &[f64], mut bounds: Bounds) -> Vec<Bounds> {
    let mut result = Vec::with_capacity(areas.len());

    let mut index = 0;
    let mut row_start = 0;
    let mut row_sum = 0.0;
    let mut row_min = f64::INFINITY;
    let mut row_max: f64 = 0.0;

    while index < areas.len() {
        let area = areas[index];
        let side = bounds.width.min(bounds.height);

        let current = if row_sum > 0.0 {
            worst_aspect_ratio(row_min, row_max, row_sum, side)
        } else {
            f64::INFINITY
        };
        let next = worst_aspect_ratio(row_min.min(area), row_max.max(area), row_sum + area, side);

        if row_sum <= 0.0 || next <= current {
            row_sum += area;
            row_min = row_min.min(area);
            row_max = row_max.max(area);
            index += 1;
            continue;
        }

        layout_row(&areas[row_start..index], row_sum, &mut bounds, &mut result);
        row_start = index;
        row_sum = 0.0;
        row_min = f64::INFINITY;
        row_max = 0.0;
    }

    if row_start < index {
        layout_row(&areas[row_start..index], row_sum, &mut bounds, &mut result);
    }

    result
}

/// Places one row along the shorter side of `bounds` and removes the space
/// it occupies. The last tile absorbs rounding error.
fn layout_row(row: &[f64], row_sum: f64, bounds: &mut Bounds, out: &mut Vec<Bounds>) {
    let horizontal = bounds.width <= bounds.height;
    let short = if horizontal { bounds.width } else { bounds.height };
    let thickness = if short > 0.0 { row_sum / short } else { 0.0 };

    let mut offset = 0.0;
    for (i, &area) in row.iter().enumerate() {
        let mut length = if thickness > 0.0 { area / thickness } else { 0.0 };
        if i == row.len() - 1 {
            length = (short - offset).max(0.0);
        }

        let tile = if horizontal {
            Bounds::new(bounds.x + offset, bounds.y, length, thickness)
        } else {
            Bounds::new(bounds.x, bounds.y + offset, thickness, length)
        };
        out.push(tile);
        offset += length;
    }

    if horizontal {
        bounds.y += thickness;
        bounds.height = (bounds.height - thickness).max(0.0);
    } else {
        bounds.x += thickness;
        bounds.width = (bounds.width - thickness).max(0.0);
    }
}

fn worst_aspect_ratio(min: f64, max: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min <= 0.0 {
        return f64::MAX;
    }

    let side_sq = side * side;
    let sum_sq = sum * sum;

    (side_sq * max / sum_sq).max(sum_sq / (side_sq * min))
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn single_value_fills_the_bounds() {
        let tiles = Squarify.tile(&[42.0], Bounds::new(10.0, 20.0, 300.0, 200.0));

        assert_eq!(tiles, vec![Bounds::new(10.0, 20.0, 300.0, 200.0)]);
    }

    #[test]
    fn classic_squarified_example() {
        // The worked example of the squarified treemap paper.
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let tiles = Squarify.tile(&values, Bounds::new(0.0, 0.0, 6.0, 4.0));

        assert_eq!(tiles[0], Bounds::new(0.0, 0.0, 3.0, 2.0));
        assert_eq!(tiles[1], Bounds::new(0.0, 2.0, 3.0, 2.0));
        assert!((tiles[2].width - 12.0 / 7.0).abs() < 1e-9);
        assert!((tiles[2].height - 7.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn tiles_keep_input_order() {
        let tiles = Squarify.tile(&[1.0, 3.0], Bounds::new(0.0, 0.0, 4.0, 1.0));

        assert!((tiles[0].area() - 1.0).abs() < 1e-9);
        assert!((tiles[1].area() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_values_get_empty_tiles() {
        let tiles = Squarify.tile(&[0.0, f64::NAN, 5.0, -1.0], Bounds::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(tiles[0].area(), 0.0);
        assert_eq!(tiles[1].area(), 0.0);
        assert_eq!(tiles[2], Bounds::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(tiles[3].area(), 0.0);
    }

    #[test]
    fn nothing_to_tile() {
        assert!(Squarify.tile(&[], Bounds::new(0.0, 0.0, 10.0, 10.0)).is_empty());
        assert_eq!(Squarify.tile(&[1.0], Bounds::default())[0].area(), 0.0);
    }

    #[test]
    fn inset_never_inverts() {
        let bounds = Bounds::new(0.0, 0.0, 10.0, 4.0).inset(3.0);

        assert_eq!(bounds, Bounds::new(3.0, 2.0, 4.0, 0.0));
    }

    proptest! {
        #[test]
        fn tiles_are_proportional_and_cover_the_bounds(
            values in prop::collection::vec(0.5f64..100.0, 1..30),
            width in 50.0f64..1000.0,
            height in 50.0f64..1000.0,
        ) {
            let bounds = Bounds::new(5.0, 7.0, width, height);
            let tiles = Squarify.tile(&values, bounds);
            let total: f64 = values.iter().sum();

            prop_assert_eq!(tiles.len(), values.len());

            let covered: f64 = tiles.iter().map(Bounds::area).sum();
            prop_assert!((covered - bounds.area()).abs() < 1e-6 * bounds.area());

            for (tile, value) in tiles.iter().zip(&values) {
                let expected = value / total * bounds.area();
                prop_assert!((tile.area() - expected).abs() < 1e-6 * bounds.area());
                prop_assert!(tile.x >= bounds.x - 1e-6);
                prop_assert!(tile.y >= bounds.y - 1e-6);
                prop_assert!(tile.x + tile.width <= bounds.x + width + 1e-6);
                prop_assert!(tile.y + tile.height <= bounds.y + height + 1e-6);
            }
        }
    }
}
