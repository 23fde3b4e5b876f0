use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    #[error("render error: {0}")]
    Io(#[from] io::Error),

    #[error("render error: template: {0}")]
    Template(#[from] tinytemplate::error::Error),
}
