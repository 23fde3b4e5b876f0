//! The scene graph: positioned shapes and labels for one render pass.

use std::sync::Arc;

use ecochart_data::NormalizedItem;
use serde::Serialize;

use crate::color::Rgb;
use crate::icon::IconAsset;
use crate::id::Uid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The geometry of an element. Rects and icons are positioned by their top
/// left corner, circles by their center.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
    Icon {
        size: f64,
        name: String,
        /// Attached once the asset is loaded; a missing asset leaves the cell blank.
        asset: Option<Arc<IconAsset>>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Start,
    Middle,
    End,
}

impl Anchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Relative to the element position.
    pub offset: Point,
    pub anchor: Anchor,
    pub font_size: f64,
}

impl Label {
    pub fn new(text: impl Into<String>, offset: Point) -> Label {
        Self {
            text: text.into(),
            offset,
            anchor: Anchor::Middle,
            font_size: 14.0,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Label {
        self.anchor = anchor;
        self
    }

    pub fn font_size(mut self, font_size: f64) -> Label {
        self.font_size = font_size;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f64,
}

/// The page control a click on an element toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Highlight,
    Bucket,
    Combination,
}

impl Control {
    pub fn as_str(&self) -> &'static str {
        match self {
            Control::Highlight => "highlight",
            Control::Bucket => "bucket",
            Control::Combination => "combination",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub control: Control,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    /// Detail text shown on hover.
    pub hover: Option<String>,
    /// Filter toggled on click.
    pub toggle: Option<Toggle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualElement {
    pub shape: Shape,
    pub position: Point,
    pub color: Option<Rgb>,
    pub stroke: Option<Stroke>,
    pub label: Option<Label>,
    pub class: Option<&'static str>,
    pub clip: Option<Uid>,
    pub data: NormalizedItem,
    pub interaction: Interaction,
    /// Elements drawn inside this element's group, e.g. a breakdown
    /// revealed on hover.
    pub children: Vec<VisualElement>,
}

impl VisualElement {
    pub fn new(shape: Shape, position: Point, data: NormalizedItem) -> VisualElement {
        Self {
            shape,
            position,
            color: None,
            stroke: None,
            label: None,
            class: None,
            clip: None,
            data,
            interaction: Interaction::default(),
            children: Vec::new(),
        }
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    pub fn stroke(mut self, color: Rgb, width: f64) -> Self {
        self.stroke = Some(Stroke { color, width });
        self
    }

    pub fn label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }

    pub fn clip(mut self, clip: Uid) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn hover(mut self, text: impl Into<String>) -> Self {
        self.interaction.hover = Some(text.into());
        self
    }

    pub fn toggle(mut self, control: Control, value: impl Into<String>) -> Self {
        self.interaction.toggle = Some(Toggle {
            control,
            value: value.into(),
        });
        self
    }

    pub fn children(mut self, children: Vec<VisualElement>) -> Self {
        self.children = children;
        self
    }

    /// The area covered by the shape itself.
    pub fn area(&self) -> f64 {
        match self.shape {
            Shape::Rect { width, height } => width * height,
            Shape::Circle { radius } => std::f64::consts::PI * radius * radius,
            Shape::Icon { size, .. } => size * size,
        }
    }
}

/// Decorations that are not bound to a data item.
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Text {
        position: Point,
        text: String,
        anchor: Anchor,
        font_size: f64,
    },
    Line {
        from: Point,
        to: Point,
    },
    Legend {
        position: Point,
        entries: Vec<(String, Rgb)>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<VisualElement>,
    pub annotations: Vec<Annotation>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Scene {
        Self {
            width,
            height,
            elements: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Icon cells in placement order.
    pub fn icons_mut(&mut self) -> impl Iterator<Item = (&str, &mut Option<Arc<IconAsset>>)> {
        self.elements
            .iter_mut()
            .filter_map(|element| match element.shape {
                Shape::Icon {
                    ref name,
                    ref mut asset,
                    ..
                } => Some((name.as_str(), asset)),
                _ => None,
            })
    }

    /// Distinct icon names, in order of first appearance.
    pub fn icon_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();

        for element in &self.elements {
            if let Shape::Icon { ref name, .. } = element.shape {
                if !names.contains(name) {
                    names.push(name.clone());
                }
            }
        }

        names
    }
}
