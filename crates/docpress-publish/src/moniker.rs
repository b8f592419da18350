//! Ordered, deduplicated version-tag sets.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the derived moniker-group key, in hex characters.
const GROUP_KEY_LEN: usize = 12;

/// An ordered, deduplicated set of version identifiers applicable to a file.
///
/// Construction sorts and dedups case-insensitively, so two files built from
/// the same applicability declaration always carry identical lists. The
/// derived [group key](Self::group) buckets files sharing the exact same
/// version applicability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonikerList(Vec<String>);

impl MonikerList {
    /// Build a list from raw moniker tags, sorting and deduplicating.
    #[must_use]
    pub fn new(monikers: impl IntoIterator<Item = String>) -> Self {
        let mut tags: Vec<String> = monikers.into_iter().collect();
        tags.sort_by_key(|t| t.to_lowercase());
        tags.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        Self(tags)
    }

    /// True for the empty set (file applies to every version).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable string key for this exact moniker combination.
    ///
    /// `None` for the empty set. The key is a truncated hex SHA-256 over the
    /// canonical joined list, so it is identical across builds and platforms.
    #[must_use]
    pub fn group(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        let digest = Sha256::digest(self.0.join(",").to_lowercase().as_bytes());
        Some(hex::encode(digest)[..GROUP_KEY_LEN].to_owned())
    }

    /// Iterate the monikers in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for MonikerList {
    fn from(monikers: Vec<String>) -> Self {
        Self::new(monikers)
    }
}
