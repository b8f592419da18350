//! Href parsing and link rewriting.
//!
//! Given a link written inside a source document, this crate computes the
//! corresponding link valid in the destination tree. The two href families
//! behave very differently:
//!
//! - **Working-folder anchored** (`~/articles/b.md`) hrefs name a *logical*
//!   target whose physical output location may differ structurally from its
//!   source location (renamed extension, moved folder). They are re-resolved
//!   against the live output map supplied by [`LinkContext`].
//! - **Document relative** (`../images/x.png`) hrefs encode an author's
//!   intent about sibling-file proximity that the pipeline preserves
//!   verbatim, so no output lookup happens for them.
//!
//! Fragments and query strings must be stripped by the caller before
//! resolution and reattached afterwards; [`resolve_link`] rejects hrefs
//! that still carry them.

mod error;
mod href;
mod resolver;

pub use error::LinkError;
pub use href::HrefPath;
pub use resolver::{FileLinkInfo, LinkContext, resolve_link};
