//! Ordered-mapping resolution from logical paths to physical files.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PathError;
use crate::logical::LogicalPath;
use crate::mapping::PathMapping;

/// Resolves logical paths to physical files through an ordered mapping list.
///
/// Resolution picks the most specific (longest logical-prefix) matching
/// mapping; among equally specific mappings the later registration wins, so
/// an overlay registered after a large folder mapping transparently shadows
/// individual files inside it. Exact file mappings always beat folder
/// mappings.
///
/// Mappings are registered once before the parallel build phase and the
/// layer is read-only afterwards, so it is freely shared across workers.
pub struct FileLayer {
    mappings: Vec<PathMapping>,
    scratch_dir: Option<PathBuf>,
}

impl FileLayer {
    /// Create a layer over an ordered mapping list.
    #[must_use]
    pub fn new(mappings: Vec<PathMapping>) -> Self {
        Self {
            mappings,
            scratch_dir: None,
        }
    }

    /// Configure a scratch directory for move-out materialization.
    ///
    /// Files reached through an `allow_move_out` mapping are lazily copied
    /// under this directory and resolved to the copy, leaving the original
    /// tree untouched.
    #[must_use]
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    /// Find the winning mapping and the physical path it yields.
    fn find(&self, logical: &LogicalPath) -> Option<(&PathMapping, PathBuf)> {
        let query = logical.clone().from_working_folder();
        let mut best: Option<(usize, &PathMapping, PathBuf)> = None;
        for mapping in &self.mappings {
            let candidate = if mapping.is_folder() {
                // specificity: folder depth; exact file matches outrank all folders
                query.strip_prefix(mapping.logical_path()).map(|rest| {
                    (
                        mapping.logical_path().depth(),
                        physical_under(mapping.physical_path(), &rest),
                    )
                })
            } else if query == *mapping.logical_path() {
                Some((usize::MAX, mapping.physical_path().to_path_buf()))
            } else {
                None
            };
            if let Some((specificity, physical)) = candidate {
                // `>=` lets later registrations win ties
                if best.as_ref().is_none_or(|(s, _, _)| specificity >= *s) {
                    best = Some((specificity, mapping, physical));
                }
            }
        }
        best.map(|(_, mapping, physical)| (mapping, physical))
    }

    /// Resolve a logical path to a physical one.
    ///
    /// Move-out mappings resolve into the scratch tree when one is
    /// configured. Fails with [`PathError::NotFound`] when no mapping
    /// covers the path.
    pub fn resolve(&self, logical: &LogicalPath) -> Result<PathBuf, PathError> {
        let (mapping, physical) = self
            .find(logical)
            .ok_or_else(|| PathError::NotFound(logical.to_string()))?;
        if mapping.allows_move_out() {
            if let Some(scratch) = &self.scratch_dir {
                return self.materialize(logical, &physical, scratch);
            }
        }
        Ok(physical)
    }

    /// True if a mapping covers the path and the physical file exists.
    #[must_use]
    pub fn exists(&self, logical: &LogicalPath) -> bool {
        self.find(logical).is_some_and(|(_, p)| p.exists())
    }

    /// Open a resolved file for reading.
    pub fn open_read(&self, logical: &LogicalPath) -> Result<File, PathError> {
        let physical = self.resolve(logical)?;
        File::open(&physical).map_err(|e| PathError::io(physical, e))
    }

    /// Create (or truncate) a resolved file for writing.
    ///
    /// Parent directories are created as needed. Writes through a move-out
    /// mapping land in the scratch tree, never in the mapped source tree.
    pub fn open_write(&self, logical: &LogicalPath) -> Result<File, PathError> {
        let physical = self.resolve(logical)?;
        if let Some(parent) = physical.parent() {
            fs::create_dir_all(parent).map_err(|e| PathError::io(parent.to_path_buf(), e))?;
        }
        File::create(&physical).map_err(|e| PathError::io(physical, e))
    }

    /// Read a resolved file to a string.
    pub fn read_to_string(&self, logical: &LogicalPath) -> Result<String, PathError> {
        let physical = self.resolve(logical)?;
        fs::read_to_string(&physical).map_err(|e| PathError::io(physical, e))
    }

    /// Write a string through [`Self::open_write`] semantics.
    pub fn write(&self, logical: &LogicalPath, contents: &str) -> Result<(), PathError> {
        let physical = self.resolve(logical)?;
        if let Some(parent) = physical.parent() {
            fs::create_dir_all(parent).map_err(|e| PathError::io(parent.to_path_buf(), e))?;
        }
        fs::write(&physical, contents).map_err(|e| PathError::io(physical, e))
    }

    /// Copy a move-out file into the scratch tree and resolve to the copy.
    fn materialize(
        &self,
        logical: &LogicalPath,
        physical: &Path,
        scratch: &Path,
    ) -> Result<PathBuf, PathError> {
        let mut target = scratch.to_path_buf();
        for component in logical.components() {
            target.push(component);
        }
        if !target.exists() && physical.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| PathError::io(parent.to_path_buf(), e))?;
            }
            fs::copy(physical, &target).map_err(|e| PathError::io(physical.to_path_buf(), e))?;
            debug!(
                logical = %logical,
                from = %physical.display(),
                to = %target.display(),
                "materialized move-out file into scratch"
            );
        }
        Ok(target)
    }
}

fn physical_under(root: &Path, rest: &LogicalPath) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in rest.components() {
        path.push(component);
    }
    path
}
