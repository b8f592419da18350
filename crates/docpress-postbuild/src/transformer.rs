//! The three-phase transformer over published HTML outputs.

use docpress_paths::{FileLayer, LogicalPath};
use docpress_publish::{PublishItem, PublishModel};
use tracing::warn;

use crate::bookmarks::BookmarkValidator;
use crate::debug_info::DebugInfoStripper;
use crate::document::{HtmlDocument, PostBuildError};

/// One independent post-build handler.
///
/// Handlers run in registration order in all three phases; a later handler
/// may depend on structure left by an earlier one.
pub trait HtmlHandler {
    /// Handler name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Invoked once before any document is touched. May return a modified
    /// manifest, which threads into the next handler.
    fn pre_handle(&mut self, manifest: PublishModel) -> PublishModel {
        manifest
    }

    /// Invoked for every loadable published HTML document.
    fn handle(&mut self, document: &mut HtmlDocument, item: &PublishItem);

    /// Invoked once after all documents were transformed, mirroring
    /// [`Self::pre_handle`].
    fn post_handle(&mut self, manifest: PublishModel) -> PublishModel {
        manifest
    }
}

/// The stock handler list: content-integrity checking first, then the
/// debug-metadata stripper unless `keep_debug_info` retains it.
#[must_use]
pub fn stock_handlers(keep_debug_info: bool) -> Vec<Box<dyn HtmlHandler>> {
    let mut handlers: Vec<Box<dyn HtmlHandler>> = vec![Box::new(BookmarkValidator::new())];
    if !keep_debug_info {
        handlers.push(Box::new(DebugInfoStripper::new()));
    }
    handlers
}

/// Applies an ordered list of handlers to every published HTML output.
pub struct HtmlPostTransformer {
    handlers: Vec<Box<dyn HtmlHandler>>,
}

impl HtmlPostTransformer {
    /// Create a transformer over a handler list fixed at configuration time.
    #[must_use]
    pub fn new(handlers: Vec<Box<dyn HtmlHandler>>) -> Self {
        Self { handlers }
    }

    /// Run the three phases over the manifest, returning the possibly
    /// updated manifest.
    ///
    /// A document that fails to load is skipped with a warning and does not
    /// abort the build; a document that fails to persist does.
    pub fn process(
        &mut self,
        mut manifest: PublishModel,
        output: &FileLayer,
    ) -> Result<PublishModel, PostBuildError> {
        for handler in &mut self.handlers {
            manifest = handler.pre_handle(manifest);
        }

        for item in &manifest.files {
            let Some(path) = item.path.as_deref() else {
                continue;
            };
            if !is_html_output(path) {
                continue;
            }
            let Ok(logical) = LogicalPath::parse(path) else {
                warn!(path, "skipping output with unparsable path");
                continue;
            };
            if !output.exists(&logical) {
                continue;
            }
            let mut document = match HtmlDocument::load(output, &logical) {
                Ok(document) => document,
                Err(error) => {
                    warn!(path, %error, "cannot load content, skipping document");
                    continue;
                }
            };
            for handler in &mut self.handlers {
                handler.handle(&mut document, item);
            }
            document.save(output)?;
        }

        for handler in &mut self.handlers {
            manifest = handler.post_handle(manifest);
        }
        Ok(manifest)
    }
}

fn is_html_output(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}
