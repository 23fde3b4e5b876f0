//! Defines the error and result types that this crate uses.

use std::io;

use reqwest::StatusCode;
use thiserror::Error;

/// The result type of fetching a dataset.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// The result type of reshaping a dataset.
pub type TransformResult<T> = std::result::Result<T, TransformError>;

/// The error type for retrieving a raw dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not complete, e.g. the connection was refused.
    #[error("fetch error: network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status code.
    #[error("fetch error: HTTP-Error: {status}{}", fmt_message(.message))]
    Http {
        /// The status code of the response.
        status: StatusCode,
        /// The response body, if any.
        message: String,
    },

    /// A [std::io::Error] encountered while reading a local dataset.
    #[error("fetch error: could not read `{location}`: {source}")]
    Io {
        /// The location that was read.
        location: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The body is not a valid JSON document.
    #[error("fetch error: invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns the HTTP status code when the failure came from the server.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            FetchError::Network(error) => error.status(),
            FetchError::Io { .. } | FetchError::Json(_) => None,
        }
    }
}

fn fmt_message(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(", message = {message}")
    }
}

/// The error type for reshaping a raw dataset into normalized items.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// An expected key is absent from a nested dataset.
    #[error("transform error: no data available for `{key}` under `{path}`")]
    Lookup {
        /// The missing key.
        key: String,
        /// The path walked so far, joined with `/`.
        path: String,
    },

    /// A calculation was triggered without any selection.
    #[error("transform error: {0}")]
    EmptySelection(String),

    /// A field exists but does not hold the expected type.
    #[error("transform error: field `{field}` {reason}")]
    Field {
        /// The field name.
        field: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl TransformError {
    pub(crate) fn lookup(key: impl Into<String>, path: &[String]) -> Self {
        TransformError::Lookup {
            key: key.into(),
            path: if path.is_empty() {
                String::from("/")
            } else {
                path.join("/")
            },
        }
    }

    pub(crate) fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TransformError::Field {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
