//! Build ledger and deterministic publish-manifest assembly.
//!
//! During the parallel build phase, independent document processors register
//! their per-file outcome into a shared [`BuildLedger`] (first writer wins).
//! After the phase barrier, [`PublishModelBuilder`] assembles the completed
//! ledger plus the authoritative source-file list into a [`PublishModel`]:
//! an ordered, deduplicated manifest with a deterministic grouping of
//! documents by applicable version ("moniker") set.
//!
//! Determinism is the point: running assembly twice over the same ledger
//! and file set yields byte-identical manifests, independent of processor
//! scheduling order.

mod builder;
mod ledger;
mod model;
mod moniker;

pub use builder::{FileContext, PublishModelBuilder};
pub use ledger::{BuildLedger, FileId, LedgerEntry};
pub use model::{PublishConfig, PublishItem, PublishModel, sanitize_metadata};
pub use moniker::MonikerList;
