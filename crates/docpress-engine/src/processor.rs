//! The external document-processor seam.

use docpress_links::FileLinkInfo;
use docpress_paths::LogicalPath;
use serde_json::{Map, Value};

/// Error reported by a document processor for one file.
///
/// Treated as a content error: the file is marked errored in the manifest
/// and the build continues.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ProcessorError {
    message: String,
}

impl ProcessorError {
    /// Wrap a processor failure message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What one processor produced for one source file.
#[derive(Debug, Default)]
pub struct ProcessedDocument {
    /// Destination-tree path of the produced output, if any.
    pub output_path: Option<String>,
    /// Structured metadata for the manifest (sanitized during assembly).
    pub metadata: Option<Map<String, Value>>,
    /// Raw hrefs discovered in the document, fragment/query already
    /// stripped by the parser.
    pub links: Vec<String>,
}

/// A document-type-specific processor (markdown, API model, OpenAPI).
///
/// Parsing and semantic extraction live behind this trait; the engine only
/// sees logical paths, content payloads, and discovered hrefs.
pub trait DocumentProcessor: Send + Sync {
    /// Parse one source file and report its outcome.
    fn process(
        &self,
        source: &LogicalPath,
        content: &str,
    ) -> Result<ProcessedDocument, ProcessorError>;

    /// Called with the rewritten links for a file, in discovery order, so
    /// the processor can patch them into its produced output. Not called
    /// when the file produced no output.
    fn links_resolved(&self, source: &LogicalPath, links: &[FileLinkInfo]) {
        let _ = (source, links);
    }
}
