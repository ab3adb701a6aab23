//! Crate error types.

use thiserror::Error;

use crate::element::element_model::{ElementId, ElementTypeTag};

pub type Result<T> = std::result::Result<T, DesignerError>;

#[derive(Debug, Error)]
pub enum DesignerError {
    /// No behavior bundle registered for this type tag
    #[error("unknown element type: {0}")]
    UnknownType(ElementTypeTag),

    /// Id generation collided with an element already in the document
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),

    /// Referenced element is not in the document
    #[error("element not found: {0}")]
    NotFound(ElementId),

    /// Property edit rejected by the element type's schema
    #[error("invalid attributes for element {id}: {reason}")]
    InvalidAttributes { id: ElementId, reason: String },

    #[error("form not found: {0}")]
    FormNotFound(String),

    /// Published forms are frozen
    #[error("form {0} is published and can no longer be edited")]
    FormPublished(u64),

    #[error("form '{0}' is not published")]
    FormNotPublished(String),

    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    #[error("YAML error ({context}): {source}")]
    Yaml {
        context: String,
        source: serde_yaml::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("HTTP error ({context}): {source}")]
    Http {
        context: String,
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    HttpStatus { url: String, status: u16 },
}

impl DesignerError {
    /// The referenced element vanished; callers drop the gesture.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DesignerError::NotFound(_))
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        DesignerError::Json {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        DesignerError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
