use std::f64::consts::PI;

use ecochart_data::Normalized;
use ecochart_data::NormalizedItem;
use serde::Deserialize;
use serde::Serialize;

use crate::color::ColorRamp;
use crate::color::Palette;
use crate::error::Result;
use crate::layout::LayoutStrategy;
use crate::layout::format_value;
use crate::scale::Scale;
use crate::scale::ScaleKind;
use crate::scene::Annotation;
use crate::scene::Label;
use crate::scene::Point;
use crate::scene::Scene;
use crate::scene::Shape;
use crate::scene::VisualElement;

/// How an item's value becomes a circle radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "kebab-case")]
pub enum RadiusEncoding {
    /// The radius comes from a square-root scale, so areas are proportional
    /// to values.
    Sqrt { range: (f64, f64) },
    /// The diameter comes from a linear scale; the radius is half of it.
    LinearDiameter { range: (f64, f64) },
}

impl Default for RadiusEncoding {
    fn default() -> Self {
        RadiusEncoding::Sqrt { range: (5.0, 120.0) }
    }
}

impl RadiusEncoding {
    fn scale(&self, max: f64) -> (Scale, f64) {
        match *self {
            RadiusEncoding::Sqrt { range } => (Scale::new((0.0, max), range, ScaleKind::Sqrt), 1.0),
            RadiusEncoding::LinearDiameter { range } => {
                (Scale::new((0.0, max), range, ScaleKind::Linear), 0.5)
            }
        }
    }
}

/// Component circles placed around their parent, shown when the parent is
/// hovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakdown {
    /// Distance between the parent's edge and the component centers.
    pub offset: f64,
    /// Radius range of the components, over `[0, max item value]`.
    pub range: (f64, f64),
    pub palette: Palette,
    pub legend: bool,
    /// Removed from component names in the legend.
    pub strip_prefix: Option<String>,
}

impl Default for Breakdown {
    fn default() -> Self {
        Self {
            offset: 40.0,
            range: (5.0, 90.0),
            palette: Palette::categories(),
            legend: true,
            strip_prefix: None,
        }
    }
}

impl Breakdown {
    fn display_name(&self, name: &str) -> String {
        let name = match self.strip_prefix {
            Some(ref prefix) => name.strip_prefix(prefix.as_str()).unwrap_or(name),
            None => name,
        };

        name.replace('_', " ").to_lowercase()
    }

    fn components(&self, item: &NormalizedItem, center: Point, radius: f64, scale: Scale) -> Vec<VisualElement> {
        let n = item.components.len();

        item.components
            .iter()
            .enumerate()
            .map(|(j, component)| {
                let position = radial_position(center, radius, self.offset, j, n);
                let hover = format!(
                    "{}: {}",
                    self.display_name(&component.name),
                    format_value(component.value)
                );

                VisualElement::new(
                    Shape::Circle {
                        radius: scale.map(component.value),
                    },
                    position,
                    NormalizedItem::new(component.name.clone(), component.value),
                )
                .color(self.palette.nth(j))
                .class("breakdown")
                .hover(hover)
            })
            .collect()
    }
}

/// The center of component `j` of `n`, evenly spread on a circle of radius
/// `parent_radius + offset` around `center`, starting at angle zero.
pub fn radial_position(center: Point, parent_radius: f64, offset: f64, j: usize, n: usize) -> Point {
    if n == 0 {
        return center;
    }

    let angle = j as f64 * 2.0 * PI / n as f64;
    let distance = parent_radius + offset;

    Point::new(
        center.x + distance * angle.cos(),
        center.y + distance * angle.sin(),
    )
}

/// One circle per item on the vertical center line, in data order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackLayout {
    pub width: f64,
    /// Vertical distance between consecutive circle centers.
    pub pitch: f64,
    /// The center of the first circle.
    pub top: f64,
    /// Added to `n * pitch` to get the scene height.
    pub padding: f64,
    pub radius: RadiusEncoding,
    pub colors: ColorRamp,
    /// Distance between a circle's bottom edge and its label.
    pub label_gap: f64,
    /// Appended to the value in hover text.
    pub unit: Option<String>,
    pub breakdown: Option<Breakdown>,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            pitch: 270.0,
            top: 150.0,
            padding: 150.0,
            radius: RadiusEncoding::default(),
            colors: ColorRamp::blues(),
            label_gap: 20.0,
            unit: None,
            breakdown: None,
        }
    }
}

impl StackLayout {
    fn hover(&self, item: &NormalizedItem) -> String {
        match self.unit {
            Some(ref unit) => format!("{}: {} {unit}", item.key, format_value(item.value)),
            None => format!("{}: {}", item.key, format_value(item.value)),
        }
    }
}

impl LayoutStrategy for StackLayout {
    fn layout(&self, data: &Normalized) -> Result<Scene> {
        let items = data.items();
        let max = crate::scale::max(items.iter().map(|item| item.value)).unwrap_or(0.0);
        let (radius_scale, radius_factor) = self.radius.scale(max);

        let height = items.len() as f64 * self.pitch + self.padding;
        let mut scene = Scene::new(self.width, height);

        for (i, item) in items.into_iter().enumerate() {
            let center = Point::new(self.width / 2.0, self.top + i as f64 * self.pitch);
            let radius = radius_scale.map(item.value) * radius_factor;
            let color = self.colors.at((0.0, max), item.value);
            let label = Label::new(item.key.clone(), Point::new(0.0, radius + self.label_gap));

            let children = match self.breakdown {
                Some(ref breakdown) => {
                    let scale = Scale::linear((0.0, max), breakdown.range);
                    breakdown.components(&item, center, radius, scale)
                }
                None => Vec::new(),
            };

            let hover = self.hover(&item);
            let element = VisualElement::new(Shape::Circle { radius }, center, item)
                .color(color)
                .class("item")
                .label(label)
                .hover(hover)
                .children(children);

            scene.elements.push(element);
        }

        if let Some(ref breakdown) = self.breakdown {
            if breakdown.legend {
                let mut entries: Vec<(String, _)> = Vec::new();

                for element in &scene.elements {
                    for (j, component) in element.data.components.iter().enumerate() {
                        let name = breakdown.display_name(&component.name);
                        if !entries.iter().any(|(n, _)| *n == name) {
                            entries.push((name, breakdown.palette.nth(j)));
                        }
                    }
                }

                if !entries.is_empty() {
                    scene.annotations.push(Annotation::Legend {
                        position: Point::new(20.0, 20.0),
                        entries,
                    });
                }
            }
        }

        Ok(scene)
    }
}
