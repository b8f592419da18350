//! Build driver for the docpress pipeline.
//!
//! Orchestrates one build end to end:
//!
//! 1. **Parallel document phase** - every known source file is resolved
//!    through the [`FileLayer`](docpress_paths::FileLayer), read, and handed
//!    to the external [`DocumentProcessor`]; discovered hrefs are rewritten
//!    with [`docpress_links::resolve_link`] and the per-file outcome is
//!    registered once into the shared
//!    [`BuildLedger`](docpress_publish::BuildLedger).
//! 2. **Barrier, then assembly** - the
//!    [`PublishModelBuilder`](docpress_publish::PublishModelBuilder) turns
//!    the completed ledger into the deterministic publish manifest,
//!    single-threaded.
//! 3. **Post-build pass** - declared `.html` outputs are pushed through the
//!    [`HtmlPostTransformer`](docpress_postbuild::HtmlPostTransformer).
//!
//! Errors local to one file (unsupported links, unresolvable paths,
//! processor failures) accumulate into that file's `has_error` manifest
//! flag and never abort the build; only resource-level failures are fatal.

mod driver;
mod processor;

pub use driver::{BuildDriver, BuildError, BuildOutput};
pub use processor::{DocumentProcessor, ProcessedDocument, ProcessorError};
