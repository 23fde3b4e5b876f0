//! [ecochart]'s scaling, layout and rendering library.
//!
//! [ecochart]: https://github.com/nelusnegur/ecochart
//!
//! Normalized data goes through a [`layout::LayoutStrategy`], which derives
//! its scales from the data and returns a [`scene::Scene`]. Scenes are
//! rendered as SVG and embedded into HTML pages by the [`render`] module.
//!
//! **WARNING**: This library is ecochart's internal library and there are no
//! plans to stabilize it. The API may break at any time without notice.

pub mod color;
pub mod error;
pub mod icon;
pub mod id;
pub mod layout;
pub mod render;
pub mod scale;
pub mod scene;

pub use crate::layout::LayoutSpec;
pub use crate::layout::LayoutStrategy;
pub use crate::scene::Scene;
