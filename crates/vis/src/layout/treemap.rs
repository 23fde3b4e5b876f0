use std::borrow::Cow;

use ecochart_data::HierarchicalNode;
use ecochart_data::Normalized;
use ecochart_data::NormalizedItem;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::color::Palette;
use crate::error::Result;
use crate::id::UidGenerator;
use crate::layout::LayoutStrategy;
use crate::layout::format_value;
use crate::layout::tile::Bounds;
use crate::layout::tile::Squarify;
use crate::layout::tile::Tiler;
use crate::scene::Anchor;
use crate::scene::Control;
use crate::scene::Label;
use crate::scene::Point;
use crate::scene::Scene;
use crate::scene::Shape;
use crate::scene::VisualElement;

/// Tiles the canvas with one labelled rectangle per leaf of a value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapLayout {
    pub width: f64,
    pub height: f64,
    /// Gap kept inside every tile before its children are tiled.
    pub padding: f64,
    pub palette: Palette,
    pub font_size: f64,
}

impl Default for TreemapLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            padding: 0.0,
            palette: Palette::categories(),
            font_size: 10.0,
        }
    }
}

impl TreemapLayout {
    /// Lays out `data` with a custom tiling algorithm. Flat items are
    /// tiled as the children of a single root.
    pub fn layout_with(&self, data: &Normalized, tiler: &dyn Tiler) -> Result<Scene> {
        let root = match *data {
            Normalized::Tree(ref root) => Cow::Borrowed(root),
            Normalized::Items(ref items) => Cow::Owned(HierarchicalNode::branch(
                "root",
                items
                    .iter()
                    .map(|item| HierarchicalNode::leaf(item.key.clone(), item.value))
                    .collect(),
            )),
        };

        let mut scene = Scene::new(self.width, self.height);
        let mut uids = UidGenerator::new();
        let bounds = Bounds::new(0.0, 0.0, self.width, self.height);

        self.place(&root, bounds, tiler, &mut uids, &mut scene.elements);
        debug!(tiles = scene.elements.len(), "laid out treemap");

        Ok(scene)
    }

    fn place(
        &self,
        node: &HierarchicalNode,
        bounds: Bounds,
        tiler: &dyn Tiler,
        uids: &mut UidGenerator,
        out: &mut Vec<VisualElement>,
    ) {
        let values: Vec<f64> = node
            .children
            .iter()
            .map(HierarchicalNode::effective_value)
            .collect();
        let tiles = tiler.tile(&values, bounds.inset(self.padding));

        for (child, tile) in node.children.iter().zip(tiles) {
            if child.is_leaf() {
                if child.value.is_some() && !child.name.is_empty() {
                    out.push(self.leaf(child, tile, uids));
                }
            } else {
                self.place(child, tile, tiler, uids, out);
            }
        }
    }

    fn leaf(&self, node: &HierarchicalNode, tile: Bounds, uids: &mut UidGenerator) -> VisualElement {
        let value = node.effective_value();
        let text = format!("{}\n{}", node.name, format_value(value));
        let label = Label::new(text, Point::new(4.0, self.font_size + 2.0))
            .anchor(Anchor::Start)
            .font_size(self.font_size);

        VisualElement::new(
            Shape::Rect {
                width: tile.width,
                height: tile.height,
            },
            Point::new(tile.x, tile.y),
            NormalizedItem::new(node.name.clone(), value),
        )
        .color(self.palette.color(&node.name))
        .class("leaf")
        .clip(uids.next("clip"))
        .label(label)
        .hover(format!("{}: {}", node.name, format_value(value)))
        .toggle(Control::Highlight, node.name.clone())
    }
}

impl LayoutStrategy for TreemapLayout {
    fn layout(&self, data: &Normalized) -> Result<Scene> {
        self.layout_with(data, &Squarify)
    }
}
