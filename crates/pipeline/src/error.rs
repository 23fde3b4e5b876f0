//! Defines the error type of a render cycle.

use ecochart_data::error::FetchError;
use ecochart_data::error::TransformError;
use ecochart_vis::error::LayoutError;
use ecochart_vis::render::error::RenderError;
use thiserror::Error;

/// The result type that uses [PipelineError] as the error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// The error type for loading a scenario and running its cycles.
///
/// Any of these aborts the cycle; nothing is drawn for it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("config error: {0}")]
    Config(String),

    #[error("config error: unknown scenario `{0}`")]
    UnknownScenario(String),
}

impl PipelineError {
    /// The message shown to the person using the page.
    pub fn alert_message(&self) -> String {
        match self {
            PipelineError::Fetch(FetchError::Http { status, .. }) => {
                format!("HTTP-Error: {}", status.as_u16())
            }
            PipelineError::Transform(TransformError::EmptySelection(message)) => message.clone(),
            PipelineError::Transform(TransformError::Lookup { .. }) => {
                String::from("No data available for this combination!")
            }
            error => error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_messages() {
        let empty = PipelineError::from(TransformError::EmptySelection(String::from(
            "Please select at least one app!",
        )));
        let lookup = PipelineError::from(TransformError::Lookup {
            key: String::from("Gaming"),
            path: String::from("less_than_3_hours"),
        });
        let config = PipelineError::Config(String::from("missing field `source`"));

        assert_eq!(empty.alert_message(), "Please select at least one app!");
        assert_eq!(lookup.alert_message(), "No data available for this combination!");
        assert_eq!(config.alert_message(), "config error: missing field `source`");
    }
}
