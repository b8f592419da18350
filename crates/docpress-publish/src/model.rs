//! Persisted manifest model.
//!
//! Field names and nesting here are a stable external surface: the preview
//! server looks up output files through the serialized form, so renames are
//! breaking changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ledger::FileId;
use crate::moniker::MonikerList;

/// Site-level publish configuration, loaded from the build config file.
#[derive(Clone, Debug, Deserialize)]
pub struct PublishConfig {
    /// Site name.
    #[serde(default)]
    pub name: String,
    /// Product identity.
    #[serde(default)]
    pub product: String,
    /// Base path the site is published under.
    #[serde(default)]
    pub base_path: String,
    /// Theme branch, when not building from the default branch.
    #[serde(default)]
    pub theme_branch: Option<String>,
    /// Locale applied to every file of this build.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en-us".to_owned()
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            product: String::new(),
            base_path: String::new(),
            theme_branch: None,
            locale: default_locale(),
        }
    }
}

impl PublishConfig {
    /// Base path normalized to carry a leading slash.
    #[must_use]
    pub fn base_path_with_leading_slash(&self) -> String {
        if self.base_path.starts_with('/') {
            self.base_path.clone()
        } else {
            format!("/{}", self.base_path)
        }
    }
}

/// One row of the publish manifest.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublishItem {
    /// Site URL of the published page.
    pub url: String,
    /// Destination-tree output path; `None` when the source exists but was
    /// never published (filtered out upstream). Downstream tooling must not
    /// treat that as an error.
    pub path: Option<String>,
    /// Original source path, possibly different from the build-tree path
    /// due to redirection or aliasing.
    pub source_relative_path: String,
    /// Build locale.
    pub locale: String,
    /// Applicable version tags.
    #[serde(skip_serializing_if = "MonikerList::is_empty")]
    pub monikers: MonikerList,
    /// Group key derived from the moniker set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moniker_group: Option<String>,
    /// True if any error accumulated against the file during the build.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_error: bool,
    /// Sanitized extension metadata, inlined into the manifest row.
    #[serde(flatten)]
    pub extension_data: Map<String, Value>,
    /// Source file identity (build-tree path), not persisted.
    #[serde(skip)]
    pub source_file: FileId,
}

/// The deterministic top-level publish manifest.
#[derive(Clone, Debug, Serialize)]
pub struct PublishModel {
    /// Site name.
    pub name: String,
    /// Product identity.
    pub product: String,
    /// Base path with a leading slash.
    #[serde(rename = "basePath")]
    pub base_path: String,
    /// Theme branch, omitted when building from the default branch.
    #[serde(rename = "themeBranch", skip_serializing_if = "Option::is_none")]
    pub theme_branch: Option<String>,
    /// Ordered manifest rows.
    pub files: Vec<PublishItem>,
    /// Moniker-group key to representative moniker list, key-ordered.
    pub groups: BTreeMap<String, MonikerList>,
}

/// Drop metadata values that do not survive into the flat manifest surface.
///
/// Nested objects and arrays with non-scalar elements are removed entirely;
/// primitives and scalar-only arrays pass through unchanged.
#[must_use]
pub fn sanitize_metadata(metadata: Map<String, Value>) -> Map<String, Value> {
    metadata
        .into_iter()
        .filter(|(_, value)| match value {
            Value::Object(_) => false,
            Value::Array(items) => items
                .iter()
                .all(|item| !matches!(item, Value::Array(_) | Value::Object(_))),
            _ => true,
        })
        .collect()
}
