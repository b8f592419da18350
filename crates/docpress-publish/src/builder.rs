//! Publish-model assembly.

use std::collections::BTreeMap;

use tracing::debug;

use crate::ledger::{BuildLedger, FileId, LedgerEntry};
use crate::model::{PublishConfig, PublishItem, PublishModel, sanitize_metadata};
use crate::moniker::MonikerList;

/// Per-file collaborators consulted during manifest assembly.
///
/// Implemented by the document build context; the builder itself knows
/// nothing about URL schemes, version declarations, or error bookkeeping.
pub trait FileContext: Send + Sync {
    /// Site URL of a source file.
    fn site_url(&self, file: &FileId) -> String;

    /// Original source path, when the build-tree path was introduced by
    /// redirection or aliasing. Defaults to the build-tree path itself.
    fn source_path(&self, file: &FileId) -> String {
        file.as_str().to_owned()
    }

    /// Locale override for a file; `None` applies the build-wide locale.
    fn locale_override(&self, file: &FileId) -> Option<String> {
        let _ = file;
        None
    }

    /// Version tags applicable to a file.
    fn monikers(&self, file: &FileId) -> MonikerList;

    /// True if any error was reported against the file.
    fn has_error(&self, file: &FileId) -> bool;

    /// Accumulate an error against a file (surfaces as `has_error` in the
    /// manifest; never aborts the build).
    fn report_error(&self, file: &FileId);
}

/// Assembles the deterministic publish manifest from the completed ledger.
///
/// Runs strictly after the parallel phase, single-threaded: the ordering
/// guarantees below are total orders that parallel execution would violate.
pub struct PublishModelBuilder<'a> {
    config: &'a PublishConfig,
    context: &'a dyn FileContext,
    ledger: &'a BuildLedger,
}

impl<'a> PublishModelBuilder<'a> {
    /// Create a builder over a completed ledger.
    #[must_use]
    pub fn new(
        config: &'a PublishConfig,
        context: &'a dyn FileContext,
        ledger: &'a BuildLedger,
    ) -> Self {
        Self {
            config,
            context,
            ledger,
        }
    }

    /// Assemble the manifest from the ledger plus the authoritative file
    /// list.
    ///
    /// Files known to the build but never registered in the ledger are
    /// represented with a `None` output path rather than rejected. Items are
    /// ordered by `(locale, path, url, moniker_group)` ascending with `None`
    /// sorting first, which makes repeated assembly byte-identical
    /// regardless of processor scheduling order. Assembly itself never
    /// fails.
    #[must_use]
    pub fn assemble(
        &self,
        all_known_files: &[FileId],
    ) -> (PublishModel, BTreeMap<FileId, PublishItem>) {
        let ledgered = self.ledger.snapshot();

        let mut items: BTreeMap<FileId, PublishItem> = BTreeMap::new();
        for file in all_known_files.iter().chain(ledgered.keys()) {
            if items.contains_key(file) {
                continue;
            }
            let entry = ledgered.get(file).cloned().unwrap_or_default();
            items.insert(file.clone(), self.build_item(file, entry));
        }

        let mut files: Vec<PublishItem> = items.values().cloned().collect();
        files.sort_by(|a, b| {
            (&a.locale, &a.path, &a.url, &a.moniker_group)
                .cmp(&(&b.locale, &b.path, &b.url, &b.moniker_group))
        });

        let mut groups: BTreeMap<String, MonikerList> = BTreeMap::new();
        for item in &files {
            if let Some(group) = &item.moniker_group {
                // all items of one group share an identical moniker set by
                // construction, any representative will do
                groups
                    .entry(group.clone())
                    .or_insert_with(|| item.monikers.clone());
            }
        }

        debug!(
            files = files.len(),
            groups = groups.len(),
            "assembled publish model"
        );

        let model = PublishModel {
            name: self.config.name.clone(),
            product: self.config.product.clone(),
            base_path: self.config.base_path_with_leading_slash(),
            theme_branch: self.config.theme_branch.clone(),
            files,
            groups,
        };
        (model, items)
    }

    fn build_item(&self, file: &FileId, entry: LedgerEntry) -> PublishItem {
        let monikers = self.context.monikers(file);
        let moniker_group = monikers.group();
        PublishItem {
            url: self.context.site_url(file),
            path: entry.output_path,
            source_relative_path: self.context.source_path(file),
            locale: self
                .context
                .locale_override(file)
                .unwrap_or_else(|| self.config.locale.clone()),
            monikers,
            moniker_group,
            has_error: self.context.has_error(file),
            extension_data: entry.metadata.map(sanitize_metadata).unwrap_or_default(),
            source_file: file.clone(),
        }
    }
}
