//! End-to-end pipeline test: source tree in, transformed outputs and
//! deterministic manifest out.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use docpress_engine::{BuildDriver, DocumentProcessor, ProcessedDocument, ProcessorError};
use docpress_links::{FileLinkInfo, LinkContext};
use docpress_paths::{FileLayer, LogicalPath, PathMapping};
use docpress_postbuild::{HtmlPostTransformer, stock_handlers};
use docpress_publish::{FileContext, FileId, MonikerList, PublishConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

struct SiteContext {
    outputs: HashMap<LogicalPath, LogicalPath>,
    monikers: HashMap<FileId, MonikerList>,
    errors: Mutex<HashSet<FileId>>,
}

impl SiteContext {
    fn new(outputs: &[(&str, &str)]) -> Self {
        Self {
            outputs: outputs
                .iter()
                .map(|(s, d)| {
                    (
                        LogicalPath::parse(s).unwrap(),
                        LogicalPath::parse(d).unwrap(),
                    )
                })
                .collect(),
            monikers: HashMap::new(),
            errors: Mutex::new(HashSet::new()),
        }
    }
}

impl FileContext for SiteContext {
    fn site_url(&self, file: &FileId) -> String {
        format!("/docs/{}", file.as_str().trim_end_matches(".md"))
    }
    fn monikers(&self, file: &FileId) -> MonikerList {
        self.monikers.get(file).cloned().unwrap_or_default()
    }
    fn has_error(&self, file: &FileId) -> bool {
        self.errors.lock().unwrap().contains(file)
    }
    fn report_error(&self, file: &FileId) {
        self.errors.lock().unwrap().insert(file.clone());
    }
}

impl LinkContext for SiteContext {
    fn output_path(&self, source: &LogicalPath) -> Option<LogicalPath> {
        self.outputs.get(source).cloned()
    }
}

/// Markdown-ish processor that renders `.md` sources into `.html` outputs
/// in the output layer, patching rewritten links back into the rendered
/// file.
struct Renderer<'a> {
    output: &'a FileLayer,
}

impl DocumentProcessor for Renderer<'_> {
    fn process(
        &self,
        source: &LogicalPath,
        content: &str,
    ) -> Result<ProcessedDocument, ProcessorError> {
        let output_path = source.to_string().replace(".md", ".html");
        let links: Vec<String> = content
            .lines()
            .filter_map(|line| line.strip_prefix("link:"))
            .map(str::to_owned)
            .collect();

        let html = format!(
            "<h1 id=\"top\" sourcefile=\"{source}\">{name}</h1>\n<p>{body}</p>",
            name = source.file_name(),
            body = content.lines().next().unwrap_or(""),
        );
        let logical = LogicalPath::parse(&output_path)
            .map_err(|e| ProcessorError::new(e.to_string()))?;
        self.output
            .write(&logical, &html)
            .map_err(|e| ProcessorError::new(e.to_string()))?;

        let mut metadata = serde_json::Map::new();
        metadata.insert("title".to_owned(), json!(source.file_name()));
        metadata.insert("nested".to_owned(), json!({"dropped": true}));
        Ok(ProcessedDocument {
            output_path: Some(output_path),
            metadata: Some(metadata),
            links,
        })
    }

    fn links_resolved(&self, source: &LogicalPath, links: &[FileLinkInfo]) {
        // append resolved hrefs to the rendered output
        let output_path = source.to_string().replace(".md", ".html");
        if let Ok(logical) = LogicalPath::parse(&output_path) {
            if let Ok(current) = self.output.read_to_string(&logical) {
                let mut html = current;
                for link in links {
                    html.push_str(&format!("\n<a href=\"{}#top\">ref</a>", link.href));
                }
                let _ = self.output.write(&logical, &html);
            }
        }
    }
}

#[test]
fn test_full_pipeline_produces_transformed_outputs_and_manifest() {
    let source_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(source_dir.path().join("articles")).unwrap();
    std::fs::write(
        source_dir.path().join("articles/a.md"),
        "Intro page\nlink:~/articles/b.md",
    )
    .unwrap();
    std::fs::write(source_dir.path().join("articles/b.md"), "Target page").unwrap();

    let source = FileLayer::new(vec![
        PathMapping::new(
            LogicalPath::parse("").unwrap(),
            source_dir.path(),
        )
        .unwrap(),
    ]);
    let output = FileLayer::new(vec![
        PathMapping::new(
            LogicalPath::parse("").unwrap(),
            output_dir.path(),
        )
        .unwrap(),
    ]);

    let context = SiteContext::new(&[("~/articles/b.md", "articles/b.html")]);
    let config = PublishConfig {
        name: "docs".to_owned(),
        product: "product".to_owned(),
        base_path: "docs".to_owned(),
        ..PublishConfig::default()
    };
    let driver = BuildDriver::new(&config, &source, &context);
    let renderer = Renderer { output: &output };
    let mut transformer = HtmlPostTransformer::new(stock_handlers(false));

    let files = [
        FileId::from("articles/a.md"),
        FileId::from("articles/b.md"),
        FileId::from("articles/filtered.md"),
    ];
    let built = driver
        .run_with_transform(&files, &renderer, &mut transformer, &output)
        .unwrap();

    // manifest identity and deterministic ordering (null path first)
    assert_eq!(built.model.base_path, "/docs");
    let paths: Vec<_> = built.model.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        [
            None,
            Some("articles/a.html".to_owned()),
            Some("articles/b.html".to_owned()),
        ]
    );

    // the filtered file is represented, errored, and unpublished
    let filtered = &built.manifest_by_file[&FileId::from("articles/filtered.md")];
    assert_eq!(filtered.path, None);
    assert!(filtered.has_error);

    // sanitization dropped the nested metadata object, kept the scalar
    let a_item = &built.manifest_by_file[&FileId::from("articles/a.md")];
    assert_eq!(a_item.extension_data["title"], json!("a.md"));
    assert!(!a_item.extension_data.contains_key("nested"));

    // the anchored link was rewritten against the output layout
    let a_html =
        std::fs::read_to_string(output_dir.path().join("articles/a.html")).unwrap();
    assert!(a_html.contains("<a href=\"b.html#top\">ref</a>"));

    // the post-build stripper removed debug attributes from published HTML
    assert!(!a_html.contains("sourcefile="));
    let b_html =
        std::fs::read_to_string(output_dir.path().join("articles/b.html")).unwrap();
    assert!(!b_html.contains("sourcefile="));
}

#[test]
fn test_repeated_builds_yield_identical_manifests() {
    let source_dir = tempfile::tempdir().unwrap();
    for name in ["a.md", "b.md", "c.md", "d.md"] {
        std::fs::write(source_dir.path().join(name), format!("body of {name}")).unwrap();
    }
    let source = FileLayer::new(vec![
        PathMapping::new(
            LogicalPath::parse("").unwrap(),
            source_dir.path(),
        )
        .unwrap(),
    ]);

    struct NoWrite;
    impl DocumentProcessor for NoWrite {
        fn process(
            &self,
            source: &LogicalPath,
            _content: &str,
        ) -> Result<ProcessedDocument, ProcessorError> {
            Ok(ProcessedDocument {
                output_path: Some(source.to_string().replace(".md", ".html")),
                metadata: None,
                links: Vec::new(),
            })
        }
    }

    let context = SiteContext::new(&[]);
    let config = PublishConfig::default();
    let driver = BuildDriver::new(&config, &source, &context);
    let files: Vec<FileId> = ["d.md", "b.md", "a.md", "c.md"]
        .into_iter()
        .map(FileId::from)
        .collect();

    let first = serde_json::to_string(&driver.run(&files, &NoWrite).model).unwrap();
    let second = serde_json::to_string(&driver.run(&files, &NoWrite).model).unwrap();
    assert_eq!(first, second);
}
