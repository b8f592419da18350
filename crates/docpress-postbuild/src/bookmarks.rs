//! Intra-site bookmark validation.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use docpress_paths::LogicalPath;
use docpress_publish::{PublishItem, PublishModel};
use regex::Regex;
use tracing::warn;

use crate::document::HtmlDocument;
use crate::transformer::HtmlHandler;

// good enough for rendered output; no need for a full HTML parse
static ANCHOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\b(?:id|name)\s*=\s*"([^"]+)""#).unwrap());
static HREF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"(?i)\bhref\s*=\s*"([^"#]*)#([^"]+)""##).unwrap());

/// A bookmark reference found in one document, checked during `post_handle`.
#[derive(Debug)]
struct BookmarkRef {
    /// Output path of the document containing the link.
    from: String,
    /// Source path of that document, for warning attribution.
    from_source: String,
    /// Output path of the link target, resolved against `from`.
    target: String,
    /// The `#fragment` being referenced.
    fragment: String,
}

/// Collects anchors and fragment links during the per-document pass and
/// reports broken intra-site bookmarks once every document has been seen.
///
/// Runs before the debug-info stripper so warnings can still be attributed
/// through debug markers.
pub struct BookmarkValidator {
    /// Anchors found per output path.
    anchors: HashMap<String, HashSet<String>>,
    refs: Vec<BookmarkRef>,
}

impl BookmarkValidator {
    /// Create a validator with empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchors: HashMap::new(),
            refs: Vec::new(),
        }
    }

    fn record_refs(&mut self, document: &HtmlDocument, item: &PublishItem) {
        let from = document.logical_path().clone();
        for capture in HREF_PATTERN.captures_iter(document.content()) {
            let (path_part, fragment) = (&capture[1], &capture[2]);
            if path_part.contains("://") || path_part.starts_with('/') {
                continue;
            }
            let target = if path_part.is_empty() {
                from.clone()
            } else {
                let Ok(relative) = LogicalPath::parse(path_part) else {
                    continue;
                };
                let Ok(joined) = from.join(&relative) else {
                    continue;
                };
                joined
            };
            self.refs.push(BookmarkRef {
                from: from.to_string(),
                from_source: item.source_relative_path.clone(),
                target: target.to_string(),
                fragment: fragment.to_owned(),
            });
        }
    }
}

impl Default for BookmarkValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlHandler for BookmarkValidator {
    fn name(&self) -> &'static str {
        "bookmark-validator"
    }

    fn handle(&mut self, document: &mut HtmlDocument, item: &PublishItem) {
        let found: HashSet<String> = ANCHOR_PATTERN
            .captures_iter(document.content())
            .map(|capture| capture[1].to_owned())
            .collect();
        self.anchors
            .insert(document.logical_path().to_string(), found);
        self.record_refs(document, item);
    }

    fn post_handle(&mut self, manifest: PublishModel) -> PublishModel {
        for bookmark in &self.refs {
            // targets outside the transformed set cannot be judged
            let Some(anchors) = self.anchors.get(&bookmark.target) else {
                continue;
            };
            if !anchors.contains(&bookmark.fragment) {
                warn!(
                    source = %bookmark.from_source,
                    from = %bookmark.from,
                    target = %bookmark.target,
                    fragment = %bookmark.fragment,
                    "bookmark does not exist in linked document"
                );
            }
        }
        manifest
    }
}
