//! Removal of debug attributes from published HTML.

use std::sync::LazyLock;

use docpress_publish::PublishItem;
use regex::Regex;

use crate::document::HtmlDocument;
use crate::transformer::HtmlHandler;

static DEBUG_ATTRIBUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+(?:data-raw-source|sourcefile|sourcestartlinenumber)\s*=\s*"[^"]*""#)
        .unwrap()
});

/// Strips the debug markers templates emit for troubleshooting
/// (`data-raw-source`, `sourcefile`, `sourcestartlinenumber`).
///
/// Registered last so earlier handlers can still read the markers.
#[derive(Debug, Default)]
pub struct DebugInfoStripper;

impl DebugInfoStripper {
    /// Create a stripper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HtmlHandler for DebugInfoStripper {
    fn name(&self) -> &'static str {
        "debug-info-stripper"
    }

    fn handle(&mut self, document: &mut HtmlDocument, _item: &PublishItem) {
        let stripped = DEBUG_ATTRIBUTES.replace_all(document.content(), "");
        if let std::borrow::Cow::Owned(stripped) = stripped {
            document.set_content(stripped);
        }
    }
}
