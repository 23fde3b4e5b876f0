use std::io;

use ecochart_pipeline::PipelineError;
use ecochart_vis::render::error::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("CLI error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("CLI error: {0}")]
    Render(#[from] RenderError),

    #[error("CLI error: {0}")]
    Path(String),

    #[error("CLI error: could not read commands: {0}")]
    Input(#[from] io::Error),

    #[error("CLI error: the render worker stopped")]
    Worker,
}
