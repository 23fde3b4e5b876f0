use ecochart_data::Normalized;
use serde::Deserialize;
use serde::Serialize;

use crate::color::Rgb;
use crate::error::LayoutError;
use crate::error::Result;
use crate::layout::LayoutStrategy;
use crate::layout::Margins;
use crate::layout::format_value;
use crate::scale::Scale;
use crate::scale::ScaleKind;
use crate::scene::Anchor;
use crate::scene::Annotation;
use crate::scene::Point;
use crate::scene::Scene;
use crate::scene::Shape;
use crate::scene::VisualElement;

/// The categories that get a band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandDomain {
    /// Every integer in `from..=to`, e.g. a fixed range of years.
    Range { from: i64, to: i64 },
    /// The keys of the data, in data order.
    Keys,
}

/// Partitions a pixel interval into equal bands separated by padding.
///
/// Inner and outer padding are equal and the bands are centered, so the
/// first band starts `padding * step` into the interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> BandScale {
        let (start, stop) = range;
        let n = count as f64;
        let step = (stop - start) / (n - padding + padding * 2.0).max(1.0);
        let start = start + (stop - start - step * (n - padding)) * 0.5;

        Self {
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    pub fn position(&self, index: usize) -> f64 {
        self.start + self.step * index as f64
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

/// A bar chart: one band per category, bar heights from a zero-based
/// linear scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandLayout {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub padding: f64,
    pub domain: BandDomain,
    pub fill: Rgb,
    pub y_label: Option<String>,
    /// Draw the band keys below the baseline.
    pub tick_labels: bool,
}

impl Default for BandLayout {
    fn default() -> Self {
        Self {
            width: 1250.0,
            height: 600.0,
            margins: Margins::default(),
            padding: 0.2,
            domain: BandDomain::Keys,
            fill: Rgb(0, 0, 255),
            y_label: None,
            tick_labels: true,
        }
    }
}

impl BandLayout {
    pub fn baseline(&self) -> f64 {
        self.height - self.margins.bottom
    }

    fn keys(&self, data: &Normalized) -> Vec<String> {
        match self.domain {
            BandDomain::Range { from, to } => (from..=to).map(|k| k.to_string()).collect(),
            BandDomain::Keys => data.items().into_iter().map(|item| item.key).collect(),
        }
    }
}

impl LayoutStrategy for BandLayout {
    fn layout(&self, data: &Normalized) -> Result<Scene> {
        if !(0.0..1.0).contains(&self.padding) {
            return Err(LayoutError::Config(format!(
                "band padding must be in [0, 1), got {}",
                self.padding
            )));
        }

        let items = data.items();
        let keys = self.keys(data);
        let baseline = self.baseline();

        let bands = BandScale::new(
            keys.len(),
            (self.margins.left, self.width - self.margins.right),
            self.padding,
        );
        let y = Scale::zero_based(
            items.iter().map(|item| item.value),
            (baseline, self.margins.top),
            ScaleKind::Linear,
        );

        let mut scene = Scene::new(self.width, self.height);

        for item in items {
            let Some(index) = keys.iter().position(|k| *k == item.key) else {
                continue;
            };

            let top = y.map(item.value);
            let hover = format!("{}: {}", item.key, format_value(item.value));

            let bar = VisualElement::new(
                Shape::Rect {
                    width: bands.bandwidth(),
                    height: (baseline - top).abs(),
                },
                Point::new(bands.position(index), top.min(baseline)),
                item,
            )
            .color(self.fill)
            .class("bar")
            .hover(hover);

            scene.elements.push(bar);
        }

        scene.annotations.push(Annotation::Line {
            from: Point::new(self.margins.left, baseline),
            to: Point::new(self.width - self.margins.right, baseline),
        });

        if self.tick_labels {
            for (index, key) in keys.iter().enumerate() {
                scene.annotations.push(Annotation::Text {
                    position: Point::new(
                        bands.position(index) + bands.bandwidth() / 2.0,
                        baseline + 16.0,
                    ),
                    text: key.clone(),
                    anchor: Anchor::Middle,
                    font_size: 10.0,
                });
            }
        }

        if let Some(ref label) = self.y_label {
            scene.annotations.push(Annotation::Text {
                position: Point::new(self.margins.left, self.margins.top / 2.0 + 5.0),
                text: label.clone(),
                anchor: Anchor::Start,
                font_size: 10.0,
            });
        }

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ecochart_data::NormalizedItem;

    fn years() -> BandLayout {
        BandLayout {
            domain: BandDomain::Range {
                from: 1990,
                to: 2024,
            },
            ..BandLayout::default()
        }
    }

    #[test]
    fn band_scale_matches_padded_bands() {
        let bands = BandScale::new(4, (0.0, 100.0), 0.2);

        // step = 100 / (4 - 0.2 + 0.4)
        assert!((bands.step() - 100.0 / 4.2).abs() < 1e-9);
        assert!((bands.bandwidth() - 0.8 * 100.0 / 4.2).abs() < 1e-9);
        assert!((bands.position(0) - 0.2 * 100.0 / 4.2).abs() < 1e-9);
        let last_end = bands.position(3) + bands.bandwidth();
        assert!((100.0 - last_end - bands.position(0)).abs() < 1e-9);
    }

    #[test]
    fn bars_stand_on_the_baseline() {
        let layout = years();
        let data = Normalized::Items(vec![
            NormalizedItem::new("1990", 15.0),
            NormalizedItem::new("1991", 7.0),
            NormalizedItem::new("1992", 0.0),
        ]);

        let scene = layout.layout(&data).unwrap();

        assert_eq!(scene.elements.len(), 3);
        for bar in &scene.elements {
            let Shape::Rect { height, .. } = bar.shape else {
                panic!("expected bars");
            };
            assert!((bar.position.y + height - layout.baseline()).abs() < 1e-9);
        }

        let Shape::Rect { height, .. } = scene.elements[0].shape else {
            unreachable!()
        };
        assert!((height - (layout.baseline() - layout.margins.top)).abs() < 1e-9);
        assert!(scene.elements[1].position.x > scene.elements[0].position.x);
    }

    #[test]
    fn keys_outside_the_domain_are_skipped() {
        let data = Normalized::Items(vec![
            NormalizedItem::new("1989", 3.0),
            NormalizedItem::new("2000", 3.0),
        ]);

        let scene = years().layout(&data).unwrap();

        assert_eq!(scene.elements.len(), 1);
        assert_eq!(scene.elements[0].data.key, "2000");
    }

    #[test]
    fn all_zero_values_render_flat_bars() {
        let data = Normalized::Items(vec![
            NormalizedItem::new("a", 0.0),
            NormalizedItem::new("b", 0.0),
        ]);

        let scene = BandLayout::default().layout(&data).unwrap();

        assert_eq!(scene.elements.len(), 2);
        for bar in &scene.elements {
            assert!(matches!(bar.shape, Shape::Rect { height, .. } if height == 0.0));
            assert_eq!(bar.position.y, BandLayout::default().baseline());
        }
    }

    #[test]
    fn empty_data_renders_no_bars() {
        let scene = years().layout(&Normalized::Items(Vec::new())).unwrap();

        assert!(scene.is_empty());
    }

    #[test]
    fn reject_invalid_padding() {
        let layout = BandLayout {
            padding: 1.0,
            ..BandLayout::default()
        };

        assert!(layout.layout(&Normalized::Items(Vec::new())).is_err());
    }
}
