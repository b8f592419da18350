//! Error type for path parsing and logical/physical resolution.

use std::path::PathBuf;

/// Error from path construction or logical/physical resolution.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PathError {
    /// Malformed or missing required input (absolute href, empty physical
    /// path, navigation above the working folder).
    #[error("invalid path argument: {0}")]
    InvalidArgument(String),

    /// No registered mapping covers the logical path.
    #[error("no mapping covers logical path: {0}")]
    NotFound(String),

    /// I/O failure while touching a resolved physical path.
    #[error("I/O error at {}", path.display())]
    Io {
        /// Physical path the operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl PathError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
