//! In-memory representation of one published HTML output.

use docpress_paths::{FileLayer, LogicalPath, PathError};

/// Error from the post-build phase.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PostBuildError {
    /// An expected HTML output could not be loaded. Logged as a warning by
    /// the transformer; the single file is skipped and the build proceeds.
    #[error("cannot load document {path}")]
    DocumentLoad {
        /// Output path of the document.
        path: String,
        /// Underlying failure.
        #[source]
        source: PathError,
    },

    /// A transformed document could not be written back. Resource-level,
    /// fatal to the build.
    #[error("cannot persist document {path}")]
    Persist {
        /// Output path of the document.
        path: String,
        /// Underlying failure.
        #[source]
        source: PathError,
    },
}

/// One published HTML document, loaded for in-place transformation.
#[derive(Debug)]
pub struct HtmlDocument {
    logical: LogicalPath,
    content: String,
}

impl HtmlDocument {
    /// Load a document through the output file layer.
    ///
    /// Fails with [`PostBuildError::DocumentLoad`] when the file cannot be
    /// read or is not valid UTF-8.
    pub fn load(layer: &FileLayer, logical: &LogicalPath) -> Result<Self, PostBuildError> {
        let content = layer
            .read_to_string(logical)
            .map_err(|source| PostBuildError::DocumentLoad {
                path: logical.to_string(),
                source,
            })?;
        Ok(Self {
            logical: logical.clone(),
            content,
        })
    }

    /// Output path the document was loaded from.
    #[must_use]
    pub fn logical_path(&self) -> &LogicalPath {
        &self.logical
    }

    /// Current document text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the document text.
    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// Build an in-memory document without touching a layer.
    #[cfg(test)]
    pub(crate) fn for_tests(logical: LogicalPath) -> Self {
        Self {
            logical,
            content: String::new(),
        }
    }

    /// Persist the document back through the output layer.
    pub fn save(&self, layer: &FileLayer) -> Result<(), PostBuildError> {
        layer
            .write(&self.logical, &self.content)
            .map_err(|source| PostBuildError::Persist {
                path: self.logical.to_string(),
                source,
            })
    }
}
