//! Error type for link resolution.

use docpress_paths::PathError;

/// Error from href parsing or link resolution.
///
/// Link errors are local to one document: the enclosing build reports them
/// as content warnings against the offending file and continues with other
/// files.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LinkError {
    /// Href carries a fragment or query string; callers must strip those
    /// and reattach them after resolution.
    #[error("unsupported link (strip the fragment/query before resolving): {0}")]
    UnsupportedFragmentOrQuery(String),

    /// Href is absolute, external, or otherwise not a relative reference.
    #[error("unsupported link (only relative references can be rewritten): {0}")]
    NotRelative(String),

    /// Underlying path arithmetic failed (malformed segments, mismatched
    /// working-folder anchoring).
    #[error(transparent)]
    Path(#[from] PathError),
}
