//! Defines the error types of the layout stage.

use thiserror::Error;

/// The result type that uses [LayoutError] as the error type.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// The error type for computing the layout of a scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// The text is neither a known color name nor a `#rgb`/`#rrggbb` value.
    #[error("layout error: invalid color `{0}`")]
    Color(String),

    /// A layout parameter is out of its valid range.
    #[error("layout error: invalid configuration: {0}")]
    Config(String),
}
