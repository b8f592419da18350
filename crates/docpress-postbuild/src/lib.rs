//! Post-build transformation of published HTML outputs.
//!
//! A three-phase pass over the publish manifest, run once per build after
//! manifest assembly:
//!
//! 1. every handler's `pre_handle` threads the manifest forward,
//! 2. every published `.html` output that exists is loaded, pushed through
//!    every handler's `handle` hook in order, and persisted back,
//! 3. every handler's `post_handle` threads the manifest again, letting
//!    handlers react to side effects accumulated during the per-document
//!    pass (e.g. broken-bookmark reports).
//!
//! The handler list is built once at configuration time and is immutable
//! for the duration of the pass. Handler ordering is a correctness
//! requirement: the bookmark validator must see debug markers before the
//! debug-info stripper removes them, so [`stock_handlers`] always places
//! the validator first.

mod bookmarks;
mod debug_info;
mod document;
mod transformer;

pub use bookmarks::BookmarkValidator;
pub use debug_info::DebugInfoStripper;
pub use document::{HtmlDocument, PostBuildError};
pub use transformer::{HtmlHandler, HtmlPostTransformer, stock_handlers};
