use serde::Serialize;
use tinytemplate::TinyTemplate;
use tinytemplate::format_unescaped;

use crate::render::OutputStream;
use crate::render::Render;
use crate::render::error::RenderError;
use crate::render::surface::Surface;

const TEMPLATE_NAME: &str = "index";

/// An HTML page embedding one surface.
pub struct Page<'a> {
    title: &'a str,
    surface: &'a Surface,
    alert: Option<String>,
    controls: Option<String>,
}

#[derive(Serialize)]
struct Context<'a> {
    title: &'a str,
    target: &'a str,
    svg: &'a str,
    alert: Option<&'a str>,
    controls: Option<&'a str>,
}

impl<'a> Page<'a> {
    pub fn new(title: &'a str, surface: &'a Surface) -> Page<'a> {
        Self {
            title,
            surface,
            alert: None,
            controls: None,
        }
    }

    /// A message shown above the chart, e.g. why nothing was drawn.
    pub fn alert(mut self, message: impl Into<String>) -> Self {
        self.alert = Some(message.into());
        self
    }

    /// A summary of the control values the chart was drawn for.
    pub fn controls(mut self, summary: impl Into<String>) -> Self {
        self.controls = Some(summary.into());
        self
    }
}

impl Render for Page<'_> {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream,
    {
        let mut template = TinyTemplate::new();
        template.add_formatter("unescaped", format_unescaped);
        template.add_template(TEMPLATE_NAME, include_str!("../template/index.html.tt"))?;

        let context = Context {
            title: self.title,
            target: self.surface.id(),
            svg: self.surface.svg().unwrap_or_default(),
            alert: self.alert.as_deref(),
            controls: self.controls.as_deref(),
        };

        let text = template.render(TEMPLATE_NAME, &context)?;
        output.write(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::scene::Scene;

    #[test]
    fn embed_surface_in_target_div() -> Result<(), RenderError> {
        let mut surface = Surface::new("container");
        surface.draw(&Scene::new(10.0, 10.0))?;

        let mut html = String::new();
        Page::new("Bar chart", &surface).render(&mut html)?;

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Bar chart</title>"));
        assert!(html.contains(r#"<div id="container"><svg xmlns="http://www.w3.org/2000/svg""#));
        assert!(!html.contains("class=\"alert\""));

        Ok(())
    }

    #[test]
    fn show_alert_on_empty_surface() -> Result<(), RenderError> {
        let surface = Surface::new("container");

        let mut html = String::new();
        Page::new("Icons", &surface)
            .alert("Please select at least one app!")
            .controls("bucket: less3")
            .render(&mut html)?;

        assert!(html.contains(r#"<p class="alert" role="alert">Please select at least one app!</p>"#));
        assert!(html.contains(r#"<p class="controls">bucket: less3</p>"#));
        assert!(html.contains(r#"<div id="container"></div>"#));

        Ok(())
    }
}
