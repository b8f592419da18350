//! Logical paths and the logical/physical file layer.
//!
//! This crate provides the path abstraction underneath the docpress build
//! engine:
//!
//! - [`LogicalPath`] - a slash-normalized relative path inside the virtual
//!   source tree, optionally anchored at the working folder (the build root)
//! - [`PathMapping`] - binds one logical path to one physical location
//! - [`FileLayer`] - resolves logical paths against an ordered mapping list,
//!   letting overlays transparently shadow files inside larger folders
//!
//! # Working Folder Convention
//!
//! A logical path can be *working-folder anchored* (written `~/articles/a.md`),
//! meaning it names a target by its position in the overall project, or plain
//! relative (`../images/x.png`), meaning relative to the current document.
//! The two forms resolve very differently during link rewriting, so the
//! anchoring is an explicit property of the path rather than a string prefix.

mod error;
mod layer;
mod logical;
mod mapping;

pub use error::PathError;
pub use layer::FileLayer;
pub use logical::LogicalPath;
pub use mapping::PathMapping;
