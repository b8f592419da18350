//! Concurrent per-file build ledger.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Identity of one source file, as a slash-normalized build-tree path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Wrap a source-relative path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The source-relative path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(path: &str) -> Self {
        Self(path.to_owned())
    }
}

/// The outcome one processor recorded for a source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerEntry {
    /// Structured key-value metadata the processor produced, if any.
    pub metadata: Option<Map<String, Value>>,
    /// Destination-tree output path, if the file produced an output.
    pub output_path: Option<String>,
}

/// Concurrent map from source file identity to its build outcome.
///
/// The single shared mutable structure of the parallel build phase. The
/// first registration per file wins; later calls are silently ignored
/// because all processors for one file are expected to agree on its outcome
/// (divergence is a caller bug, not reported). No reader consumes the
/// ledger until all writers have finished, so the lock is only ever
/// contended for the atomic insert.
#[derive(Debug, Default)]
pub struct BuildLedger {
    entries: RwLock<HashMap<FileId, LedgerEntry>>,
}

impl BuildLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for a file, first writer wins.
    ///
    /// Idempotent: repeated calls with the same `file` never change the
    /// stored entry after the first successful registration.
    pub fn register_once(
        &self,
        file: FileId,
        metadata: Option<Map<String, Value>>,
        output_path: Option<String>,
    ) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match entries.entry(file) {
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(LedgerEntry {
                    metadata,
                    output_path,
                });
            }
            std::collections::hash_map::Entry::Occupied(occupied) => {
                if occupied.get().output_path != output_path {
                    debug!(
                        file = %occupied.key(),
                        "ignoring divergent re-registration for already-ledgered file"
                    );
                }
            }
        }
    }

    /// Number of registered files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot the ledger for single-threaded assembly.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<FileId, LedgerEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
