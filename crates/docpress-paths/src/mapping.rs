//! Logical-to-physical path mappings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::PathError;
use crate::logical::LogicalPath;

/// Binds one logical path to one physical filesystem location.
///
/// Mappings are registered once per build from configuration and overlay
/// setup and are read-only afterwards. A mapping is a *folder mapping* when
/// its logical path has no file-name component; folder mappings cover every
/// logical path beneath them.
///
/// The `allow_move_out` flag marks the physical location as freely
/// relocatable: the file layer may copy it into a scratch tree instead of
/// referencing it in place, so later in-place mutation cannot corrupt an
/// externally-owned source tree.
#[derive(Clone, Debug)]
pub struct PathMapping {
    logical_path: LogicalPath,
    physical_path: PathBuf,
    allow_move_out: bool,
    properties: BTreeMap<String, String>,
}

impl PathMapping {
    /// Create a mapping from a logical path to a physical location.
    ///
    /// The logical path is anchored at the working folder. Fails with
    /// [`PathError::InvalidArgument`] if the physical path is empty.
    pub fn new(logical_path: LogicalPath, physical_path: impl Into<PathBuf>) -> Result<Self, PathError> {
        let physical_path = physical_path.into();
        if physical_path.as_os_str().is_empty() {
            return Err(PathError::InvalidArgument(
                "physical path must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            logical_path: logical_path.from_working_folder(),
            physical_path,
            allow_move_out: false,
            properties: BTreeMap::new(),
        })
    }

    /// Mark the physical location as relocatable.
    #[must_use]
    pub fn with_move_out(mut self, allow: bool) -> Self {
        self.allow_move_out = allow;
        self
    }

    /// Attach an extension property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Logical path, always working-folder anchored.
    #[must_use]
    pub fn logical_path(&self) -> &LogicalPath {
        &self.logical_path
    }

    /// Physical filesystem location.
    #[must_use]
    pub fn physical_path(&self) -> &Path {
        &self.physical_path
    }

    /// True iff the logical path has no file-name component.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.logical_path.is_folder()
    }

    /// True if the physical location may be copied/relocated.
    #[must_use]
    pub fn allows_move_out(&self) -> bool {
        self.allow_move_out
    }

    /// Look up an extension property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}
