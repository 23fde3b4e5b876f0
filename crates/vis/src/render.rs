//! Rendering of scenes as SVG and of surfaces as HTML pages.

pub mod error;
pub mod output;
pub mod page;
pub mod surface;

mod svg;

use std::io::Cursor;
use std::io::Write;

use crate::render::error::RenderError;
use crate::scene::Scene;

pub trait OutputStream {
    fn write(&mut self, data: &str) -> Result<(), RenderError>;
}

pub trait Render {
    fn render<O>(&self, output: &mut O) -> Result<(), RenderError>
    where
        O: OutputStream;
}

impl OutputStream for String {
    fn write(&mut self, data: &str) -> Result<(), RenderError> {
        self.push_str(data);
        Ok(())
    }
}

impl OutputStream for Cursor<Vec<u8>> {
    fn write(&mut self, data: &str) -> Result<(), RenderError> {
        self.write_all(data.as_bytes())?;
        Ok(())
    }
}

/// Renders `scene` as a standalone SVG document.
pub fn to_svg(scene: &Scene) -> Result<String, RenderError> {
    let mut svg = String::new();
    scene.render(&mut svg)?;
    Ok(svg)
}
