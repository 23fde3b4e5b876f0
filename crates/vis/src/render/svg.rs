use std::borrow::Cow;

use crate::render::OutputStream;
use crate::render::Render;
use crate::render::error::RenderError;
use crate::scene::Annotation;
use crate::scene::Label;
use crate::scene::Scene;
use crate::scene::Shape;
use crate::scene::VisualElement;

const STYLE: &str = "<style>\
.breakdown{opacity:0;transition:opacity .3s}\
.item:hover .breakdown{opacity:.8}\
.item:hover>.label{opacity:.3}\
text{font-family:sans-serif}\
</style>";

const LEGEND_ROW: f64 = 20.0;

impl Render for Scene {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream,
    {
        output.write(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(self.height),
        ))?;
        output.write(STYLE)?;

        let clipped: Vec<&VisualElement> = self.elements.iter().filter(|e| e.clip.is_some()).collect();
        if !clipped.is_empty() {
            output.write("<defs>")?;
            for element in clipped {
                render_clip(element, output)?;
            }
            output.write("</defs>")?;
        }

        for element in &self.elements {
            element.render(output)?;
        }

        for annotation in &self.annotations {
            annotation.render(output)?;
        }

        output.write("</svg>")
    }
}

fn render_clip<O: OutputStream>(element: &VisualElement, output: &mut O) -> Result<(), RenderError> {
    let (Some(uid), Shape::Rect { width, height }) = (element.clip.as_ref(), &element.shape) else {
        return Ok(());
    };

    output.write(&format!(
        r#"<clipPath id="{uid}"><rect x="{x}" y="{y}" width="{w}" height="{h}"/></clipPath>"#,
        x = num(element.position.x),
        y = num(element.position.y),
        w = num(*width),
        h = num(*height),
    ))
}

impl Render for VisualElement {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream,
    {
        let class = self.class.unwrap_or("element");
        output.write(&format!(
            r#"<g class="{class}" data-key="{key}""#,
            key = escape(&self.data.key)
        ))?;
        if let Some(ref toggle) = self.interaction.toggle {
            output.write(&format!(
                r#" data-toggle-control="{}" data-toggle-value="{}""#,
                toggle.control.as_str(),
                escape(&toggle.value)
            ))?;
        }
        output.write(">")?;

        self.render_shape(output)?;

        if let Some(ref label) = self.label {
            self.render_label(label, output)?;
        }

        for child in &self.children {
            child.render(output)?;
        }

        output.write("</g>")
    }
}

impl VisualElement {
    fn paint(&self) -> String {
        let mut paint = match self.color {
            Some(color) => format!(r#" fill="{color}""#),
            None => String::new(),
        };

        if let Some(stroke) = self.stroke {
            paint.push_str(&format!(
                r#" stroke="{}" stroke-width="{}""#,
                stroke.color,
                num(stroke.width)
            ));
        }

        paint
    }

    fn title(&self) -> String {
        match self.interaction.hover {
            Some(ref hover) => format!("<title>{}</title>", escape(hover)),
            None => String::new(),
        }
    }

    fn render_shape<O: OutputStream>(&self, output: &mut O) -> Result<(), RenderError> {
        let x = num(self.position.x);
        let y = num(self.position.y);
        let paint = self.paint();
        let title = self.title();

        match self.shape {
            Shape::Rect { width, height } => output.write(&format!(
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}"{paint}>{title}</rect>"#,
                w = num(width),
                h = num(height),
            )),
            Shape::Circle { radius } => output.write(&format!(
                r#"<circle cx="{x}" cy="{y}" r="{r}"{paint}>{title}</circle>"#,
                r = num(radius),
            )),
            Shape::Icon { size, ref asset, .. } => {
                output.write(&format!(
                    r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="none" pointer-events="all">{title}</rect>"#,
                    s = num(size),
                ))?;

                let Some(asset) = asset else {
                    return Ok(());
                };
                let fit = asset.fit(size);
                let [vx, vy, vw, vh] = asset.view_box;

                output.write(&format!(
                    r#"<svg x="{x}" y="{y}" width="{w}" height="{h}" viewBox="{vx} {vy} {vw} {vh}">"#,
                    x = num(self.position.x + fit.x),
                    y = num(self.position.y + fit.y),
                    w = num(fit.width),
                    h = num(fit.height),
                    vx = num(vx),
                    vy = num(vy),
                    vw = num(vw),
                    vh = num(vh),
                ))?;
                output.write(&asset.content)?;
                output.write("</svg>")
            }
        }
    }

    fn render_label<O: OutputStream>(&self, label: &Label, output: &mut O) -> Result<(), RenderError> {
        let x = self.position.x + label.offset.x;
        let y = self.position.y + label.offset.y;
        let clip = match self.clip {
            Some(ref uid) => format!(r#" clip-path="{}""#, uid.url()),
            None => String::new(),
        };

        output.write(&format!(
            r#"<text class="label" x="{x}" y="{y}" text-anchor="{anchor}" font-size="{size}"{clip}>"#,
            x = num(x),
            y = num(y),
            anchor = label.anchor.as_str(),
            size = num(label.font_size),
        ))?;

        for (i, line) in label.text.lines().enumerate() {
            let dy = if i == 0 { 0.0 } else { label.font_size * 1.2 };
            output.write(&format!(
                r#"<tspan x="{x}" dy="{dy}">{line}</tspan>"#,
                x = num(x),
                dy = num(dy),
                line = escape(line),
            ))?;
        }

        output.write("</text>")
    }
}

impl Render for Annotation {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream,
    {
        match self {
            Annotation::Text {
                position,
                text,
                anchor,
                font_size,
            } => output.write(&format!(
                r#"<text x="{x}" y="{y}" text-anchor="{anchor}" font-size="{size}">{text}</text>"#,
                x = num(position.x),
                y = num(position.y),
                anchor = anchor.as_str(),
                size = num(*font_size),
                text = escape(text),
            )),
            Annotation::Line { from, to } => output.write(&format!(
                r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="black"/>"#,
                x1 = num(from.x),
                y1 = num(from.y),
                x2 = num(to.x),
                y2 = num(to.y),
            )),
            Annotation::Legend { position, entries } => {
                output.write(&format!(
                    r#"<g class="legend" transform="translate({x},{y})">"#,
                    x = num(position.x),
                    y = num(position.y),
                ))?;

                for (i, (name, color)) in entries.iter().enumerate() {
                    let y = i as f64 * LEGEND_ROW;
                    output.write(&format!(
                        r#"<rect x="0" y="{y}" width="14" height="14" fill="{color}"/><text x="20" y="{ty}" font-size="12">{name}</text>"#,
                        y = num(y),
                        ty = num(y + 11.0),
                        name = escape(name),
                    ))?;
                }

                output.write("</g>")
            }
        }
    }
}

/// Formats a coordinate with at most two decimals.
fn num(value: f64) -> String {
    if !value.is_finite() {
        return String::from("0");
    }

    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');

    if text == "-0" {
        String::from("0")
    } else {
        text.to_owned()
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::sync::Arc;

    use ecochart_data::NormalizedItem;

    use crate::color::Rgb;
    use crate::icon::IconAsset;
    use crate::id::UidGenerator;
    use crate::scene::Control;
    use crate::scene::Point;

    fn render(scene: &Scene) -> String {
        let mut output = String::new();
        scene.render(&mut output).unwrap();
        output
    }

    #[test]
    fn format_numbers() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn escape_markup() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn render_bar_with_hover_title() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.elements.push(
            VisualElement::new(
                Shape::Rect {
                    width: 10.0,
                    height: 20.0,
                },
                Point::new(5.0, 30.0),
                NormalizedItem::new("1990", 15.0),
            )
            .color(Rgb(0, 0, 255))
            .class("bar")
            .hover("1990: 15"),
        );

        let svg = render(&scene);

        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50""#));
        assert!(svg.contains(
            r##"<g class="bar" data-key="1990"><rect x="5" y="30" width="10" height="20" fill="#0000ff"><title>1990: 15</title></rect></g>"##
        ));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn render_toggle_attributes_and_clip() {
        let mut uids = UidGenerator::new();
        let mut scene = Scene::new(100.0, 100.0);
        scene.elements.push(
            VisualElement::new(
                Shape::Rect {
                    width: 50.0,
                    height: 40.0,
                },
                Point::default(),
                NormalizedItem::new("ice_cream", 3.0),
            )
            .clip(uids.next("clip"))
            .toggle(Control::Highlight, "ice_cream")
            .label(Label::new("ice_cream\n3", Point::new(4.0, 12.0))),
        );

        let svg = render(&scene);

        assert!(svg.contains(r#"<defs><clipPath id="O-clip-1"><rect x="0" y="0" width="50" height="40"/></clipPath></defs>"#));
        assert!(svg.contains(r#"data-toggle-control="highlight" data-toggle-value="ice_cream""#));
        assert!(svg.contains(r#"clip-path="url(#O-clip-1)""#));
        assert!(svg.contains(r#"<tspan x="4" dy="0">ice_cream</tspan><tspan x="4" dy="16.8">3</tspan>"#));
    }

    #[test]
    fn render_breakdown_inside_parent_group() {
        let child = VisualElement::new(
            Shape::Circle { radius: 5.0 },
            Point::new(50.0, 10.0),
            NormalizedItem::new("farm", 1.0),
        )
        .class("breakdown");
        let parent = VisualElement::new(
            Shape::Circle { radius: 20.0 },
            Point::new(10.0, 10.0),
            NormalizedItem::new("beef", 1.0),
        )
        .class("item")
        .children(vec![child]);

        let mut output = Cursor::new(Vec::new());
        parent.render(&mut output).unwrap();
        let svg = String::from_utf8(output.into_inner()).unwrap();

        assert_eq!(
            svg,
            r#"<g class="item" data-key="beef"><circle cx="10" cy="10" r="20"></circle><g class="breakdown" data-key="farm"><circle cx="50" cy="10" r="5"></circle></g></g>"#
        );
    }

    #[test]
    fn render_icon_fitted_or_blank() {
        let asset = IconAsset::parse(r#"<svg viewBox="0 0 200 100"><path d="M0 0"/></svg>"#).unwrap();
        let icon = |asset| {
            VisualElement::new(
                Shape::Icon {
                    size: 75.0,
                    name: String::from("banana"),
                    asset,
                },
                Point::new(100.0, 0.0),
                NormalizedItem::new("banana", 1.0),
            )
        };

        let mut loaded = String::new();
        icon(Some(Arc::new(asset))).render(&mut loaded).unwrap();
        let mut blank = String::new();
        icon(None).render(&mut blank).unwrap();

        assert!(loaded.contains(
            r#"<svg x="100" y="18.75" width="75" height="37.5" viewBox="0 0 200 100"><path d="M0 0"/></svg>"#
        ));
        assert!(!blank.contains("<svg"));
        assert!(blank.contains(r#"width="75""#));
    }

    #[test]
    fn render_annotations() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.annotations.push(Annotation::Line {
            from: Point::new(0.0, 5.0),
            to: Point::new(10.0, 5.0),
        });
        scene.annotations.push(Annotation::Legend {
            position: Point::new(20.0, 20.0),
            entries: vec![(String::from("land use"), Rgb(255, 153, 153))],
        });

        let svg = render(&scene);

        assert!(svg.contains(r#"<line x1="0" y1="5" x2="10" y2="5" stroke="black"/>"#));
        assert!(svg.contains(r##"<rect x="0" y="0" width="14" height="14" fill="#ff9999"/><text x="20" y="11" font-size="12">land use</text>"##));
    }
}
