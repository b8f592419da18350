//! One-build orchestration.

use std::collections::BTreeMap;

use docpress_links::{LinkContext, resolve_link};
use docpress_paths::{FileLayer, LogicalPath};
use docpress_postbuild::{HtmlPostTransformer, PostBuildError};
use docpress_publish::{
    BuildLedger, FileContext, FileId, PublishConfig, PublishItem, PublishModel,
    PublishModelBuilder,
};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::processor::DocumentProcessor;

/// Fatal, resource-level build failure.
///
/// Per-file content problems never surface here; they accumulate into
/// `has_error` manifest flags instead.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The post-build pass could not persist a transformed document.
    #[error(transparent)]
    PostBuild(#[from] PostBuildError),
}

/// Result of one build.
#[derive(Debug)]
pub struct BuildOutput {
    /// The assembled (and possibly post-transformed) publish manifest.
    pub model: PublishModel,
    /// Manifest rows keyed by source file, for per-file lookups.
    pub manifest_by_file: BTreeMap<FileId, PublishItem>,
}

/// Drives one build over a fixed file set.
///
/// The context type supplies both the output-layout lookup used during link
/// rewriting and the per-file collaborators used during manifest assembly;
/// callers typically implement both traits on their build context.
pub struct BuildDriver<'a, C> {
    config: &'a PublishConfig,
    source: &'a FileLayer,
    context: &'a C,
}

impl<'a, C> BuildDriver<'a, C>
where
    C: FileContext + LinkContext + Sync,
{
    /// Create a driver over the source layer and build context.
    #[must_use]
    pub fn new(config: &'a PublishConfig, source: &'a FileLayer, context: &'a C) -> Self {
        Self {
            config,
            source,
            context,
        }
    }

    /// Run the parallel document phase and assemble the manifest.
    ///
    /// Document processing for independent files runs on the rayon worker
    /// pool; the ledger is the only shared mutable structure. Assembly runs
    /// strictly after the parallel phase completes.
    #[must_use]
    pub fn run(&self, files: &[FileId], processor: &dyn DocumentProcessor) -> BuildOutput {
        let ledger = BuildLedger::new();
        files
            .par_iter()
            .for_each(|file| self.process_file(file, processor, &ledger));

        let builder = PublishModelBuilder::new(self.config, self.context, &ledger);
        let (model, manifest_by_file) = builder.assemble(files);
        BuildOutput {
            model,
            manifest_by_file,
        }
    }

    /// [`Self::run`], then push declared HTML outputs through the
    /// post-build transformer.
    pub fn run_with_transform(
        &self,
        files: &[FileId],
        processor: &dyn DocumentProcessor,
        transformer: &mut HtmlPostTransformer,
        output: &FileLayer,
    ) -> Result<BuildOutput, BuildError> {
        let mut built = self.run(files, processor);
        built.model = transformer.process(built.model, output)?;
        Ok(built)
    }

    fn process_file(&self, file: &FileId, processor: &dyn DocumentProcessor, ledger: &BuildLedger) {
        let Ok(source) = LogicalPath::parse(file.as_str()) else {
            warn!(file = %file, "source path does not parse, skipping");
            self.context.report_error(file);
            return;
        };
        let content = match self.source.read_to_string(&source) {
            Ok(content) => content,
            Err(error) => {
                warn!(file = %file, %error, "cannot read source file");
                self.context.report_error(file);
                return;
            }
        };
        let processed = match processor.process(&source, &content) {
            Ok(processed) => processed,
            Err(error) => {
                warn!(file = %file, %error, "processor failed");
                self.context.report_error(file);
                return;
            }
        };

        if let Some(output_path) = &processed.output_path {
            self.resolve_links(file, &source, output_path, &processed.links, processor);
        } else if !processed.links.is_empty() {
            debug!(file = %file, "file produced no output, links left unresolved");
        }

        ledger.register_once(file.clone(), processed.metadata, processed.output_path);
    }

    fn resolve_links(
        &self,
        file: &FileId,
        source: &LogicalPath,
        output_path: &str,
        hrefs: &[String],
        processor: &dyn DocumentProcessor,
    ) {
        if hrefs.is_empty() {
            return;
        }
        let Ok(from_dest) = LogicalPath::parse(output_path) else {
            warn!(file = %file, output_path, "output path does not parse");
            self.context.report_error(file);
            return;
        };
        let mut resolved = Vec::with_capacity(hrefs.len());
        for href in hrefs {
            match resolve_link(source, &from_dest, href, self.context) {
                Ok(info) => {
                    if !info.is_resolved {
                        // broken-link policy: unresolved targets flag the file
                        self.context.report_error(file);
                    }
                    resolved.push(info);
                }
                Err(error) => {
                    warn!(file = %file, href, %error, "cannot rewrite link");
                    self.context.report_error(file);
                }
            }
        }
        processor.links_resolved(source, &resolved);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use docpress_links::FileLinkInfo;
    use docpress_paths::PathMapping;
    use docpress_publish::MonikerList;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::processor::{ProcessedDocument, ProcessorError};

    #[derive(Default)]
    struct TestContext {
        outputs: HashMap<LogicalPath, LogicalPath>,
        errors: Mutex<HashSet<FileId>>,
    }

    impl TestContext {
        fn with_output(mut self, source: &str, output: &str) -> Self {
            self.outputs.insert(
                LogicalPath::parse(source).unwrap(),
                LogicalPath::parse(output).unwrap(),
            );
            self
        }
    }

    impl FileContext for TestContext {
        fn site_url(&self, file: &FileId) -> String {
            format!("/{}", file.as_str().trim_end_matches(".md"))
        }
        fn monikers(&self, _file: &FileId) -> MonikerList {
            MonikerList::default()
        }
        fn has_error(&self, file: &FileId) -> bool {
            self.errors.lock().unwrap().contains(file)
        }
        fn report_error(&self, file: &FileId) {
            self.errors.lock().unwrap().insert(file.clone());
        }
    }

    impl LinkContext for TestContext {
        fn output_path(&self, source: &LogicalPath) -> Option<LogicalPath> {
            self.outputs.get(source).cloned()
        }
    }

    /// Renders `*.md` to the same name with `.html`, discovering every
    /// line that starts with `link:` as an href.
    #[derive(Default)]
    struct Markdownish {
        resolved: Mutex<Vec<(String, Vec<FileLinkInfo>)>>,
    }

    impl DocumentProcessor for Markdownish {
        fn process(
            &self,
            source: &LogicalPath,
            content: &str,
        ) -> Result<ProcessedDocument, ProcessorError> {
            if content.contains("!!broken!!") {
                return Err(ProcessorError::new("malformed document"));
            }
            let mut metadata = serde_json::Map::new();
            metadata.insert("title".to_owned(), json!(source.file_name()));
            Ok(ProcessedDocument {
                output_path: Some(source.to_string().replace(".md", ".html")),
                metadata: Some(metadata),
                links: content
                    .lines()
                    .filter_map(|line| line.strip_prefix("link:"))
                    .map(str::to_owned)
                    .collect(),
            })
        }

        fn links_resolved(&self, source: &LogicalPath, links: &[FileLinkInfo]) {
            self.resolved
                .lock()
                .unwrap()
                .push((source.to_string(), links.to_vec()));
        }
    }

    fn source_layer(dir: &std::path::Path) -> FileLayer {
        FileLayer::new(vec![
            PathMapping::new(LogicalPath::parse("").unwrap(), dir).unwrap(),
        ])
    }

    #[test]
    fn test_build_registers_and_orders_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.md"), "b body").unwrap();
        std::fs::write(dir.path().join("a.md"), "a body").unwrap();
        let layer = source_layer(dir.path());
        let context = TestContext::default();
        let config = PublishConfig::default();
        let driver = BuildDriver::new(&config, &layer, &context);

        let files = [FileId::from("b.md"), FileId::from("a.md")];
        let built = driver.run(&files, &Markdownish::default());

        let paths: Vec<_> = built
            .model
            .files
            .iter()
            .map(|f| f.path.clone().unwrap())
            .collect();
        assert_eq!(paths, ["a.html", "b.html"]);
        assert_eq!(
            built.manifest_by_file[&FileId::from("a.md")].extension_data["title"],
            json!("a.md")
        );
    }

    #[test]
    fn test_anchored_links_rewritten_during_build() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("articles")).unwrap();
        std::fs::write(dir.path().join("articles/a.md"), "link:~/articles/b.md").unwrap();
        std::fs::write(dir.path().join("articles/b.md"), "b").unwrap();
        let layer = source_layer(dir.path());
        let context = TestContext::default().with_output("~/articles/b.md", "articles/b.html");
        let config = PublishConfig::default();
        let driver = BuildDriver::new(&config, &layer, &context);
        let processor = Markdownish::default();

        let files = [FileId::from("articles/a.md"), FileId::from("articles/b.md")];
        driver.run(&files, &processor);

        let resolved = processor.resolved.lock().unwrap();
        let (_, links) = resolved
            .iter()
            .find(|(source, _)| source == "articles/a.md")
            .unwrap();
        assert_eq!(links[0].href, "b.html");
        assert!(links[0].is_resolved);
        assert!(!context.has_error(&FileId::from("articles/a.md")));
    }

    #[test]
    fn test_unresolved_link_marks_file_errored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "link:~/missing.md").unwrap();
        let layer = source_layer(dir.path());
        let context = TestContext::default();
        let config = PublishConfig::default();
        let driver = BuildDriver::new(&config, &layer, &context);

        let files = [FileId::from("a.md")];
        let built = driver.run(&files, &Markdownish::default());

        assert!(built.manifest_by_file[&FileId::from("a.md")].has_error);
    }

    #[test]
    fn test_fragment_link_is_content_error_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "link:b.md#frag").unwrap();
        std::fs::write(dir.path().join("ok.md"), "fine").unwrap();
        let layer = source_layer(dir.path());
        let context = TestContext::default();
        let config = PublishConfig::default();
        let driver = BuildDriver::new(&config, &layer, &context);

        let files = [FileId::from("a.md"), FileId::from("ok.md")];
        let built = driver.run(&files, &Markdownish::default());

        assert!(built.manifest_by_file[&FileId::from("a.md")].has_error);
        assert!(!built.manifest_by_file[&FileId::from("ok.md")].has_error);
    }

    #[test]
    fn test_missing_source_and_processor_failure_are_per_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.md"), "!!broken!! body").unwrap();
        let layer = source_layer(dir.path());
        let context = TestContext::default();
        let config = PublishConfig::default();
        let driver = BuildDriver::new(&config, &layer, &context);

        let files = [FileId::from("bad.md"), FileId::from("absent.md")];
        let built = driver.run(&files, &Markdownish::default());

        // both files are represented with errors and null output paths
        assert!(built.manifest_by_file[&FileId::from("bad.md")].has_error);
        assert!(built.manifest_by_file[&FileId::from("absent.md")].has_error);
        assert_eq!(built.manifest_by_file[&FileId::from("bad.md")].path, None);
    }
}
