use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content file does not start with a front matter fence")]
    MissingFrontMatter,

    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(String),

    #[error("invalid field `{field}`: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    #[error("more than one record for {}", .0.display())]
    DuplicatePath(PathBuf),

    #[error("error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ContentError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ContentError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ContentError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
