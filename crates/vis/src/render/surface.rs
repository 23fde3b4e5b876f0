use tracing::debug;

use crate::render::Render;
use crate::render::error::RenderError;
use crate::scene::Scene;

/// A render target identified by the id of the page element hosting it.
///
/// It holds at most one drawn scene: drawing replaces the previous drawing,
/// so redrawing the same scene is idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    id: String,
    current: Option<String>,
}

impl Surface {
    pub fn new(id: impl Into<String>) -> Surface {
        Self {
            id: id.into(),
            current: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        let mut svg = String::new();
        scene.render(&mut svg)?;

        debug!(target_id = %self.id, elements = scene.elements.len(), "drew scene");
        self.current = Some(svg);

        Ok(())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// The SVG markup of the drawn scene.
    pub fn svg(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
