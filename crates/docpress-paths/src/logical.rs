//! Slash-normalized relative paths with working-folder anchoring.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::error::PathError;

/// Characters percent-encoded inside a path segment when building an href.
const SEGMENT_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A document's location in the virtual source/build tree.
///
/// Always relative. `.` and `..` segments are normalized away at parse time;
/// leading `..` segments that cannot be collapsed are kept as a parent count.
/// A path may be *anchored* at the working folder (written with a leading
/// `~/`), which means "relative to the build root" rather than "relative to
/// the current document".
///
/// Equality and ordering are case-sensitive on segments.
///
/// # Examples
///
/// ```
/// use docpress_paths::LogicalPath;
///
/// let path = LogicalPath::parse("~/articles/./sub/../a.md")?;
/// assert!(path.is_from_working_folder());
/// assert_eq!(path.to_string(), "~/articles/a.md");
/// # Ok::<(), docpress_paths::PathError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalPath {
    anchored: bool,
    parent_count: usize,
    dirs: Vec<String>,
    file: String,
}

impl LogicalPath {
    /// The empty path (a self reference).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a slash (or backslash) separated relative path.
    ///
    /// Accepts an optional leading `~/` working-folder marker. Rejects
    /// absolute paths, URI-like strings with a scheme, and anchored paths
    /// that navigate above the working folder.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let normalized = raw.replace('\\', "/");
        if normalized.starts_with('/') {
            return Err(PathError::InvalidArgument(format!(
                "absolute path is not a logical path: {raw}"
            )));
        }
        if normalized.split('/').next().unwrap_or("").contains(':') {
            return Err(PathError::InvalidArgument(format!(
                "path with scheme or drive is not a logical path: {raw}"
            )));
        }

        let (anchored, rest) = match normalized.strip_prefix("~/") {
            Some(rest) => (true, rest),
            None if normalized == "~" => (true, ""),
            None => (false, normalized.as_str()),
        };

        // A trailing name segment becomes the file component; `.`/`..`/empty
        // trailers mean the path denotes a folder.
        let has_file = !rest.is_empty()
            && !rest.ends_with('/')
            && !matches!(rest.rsplit('/').next().unwrap_or(""), "." | "..");

        let mut parent_count = 0usize;
        let mut dirs: Vec<String> = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    if dirs.pop().is_none() {
                        parent_count += 1;
                    }
                }
                name => dirs.push(name.to_owned()),
            }
        }
        let file = if has_file {
            dirs.pop().unwrap_or_default()
        } else {
            String::new()
        };

        if anchored && parent_count > 0 {
            return Err(PathError::InvalidArgument(format!(
                "path navigates above the working folder: {raw}"
            )));
        }

        Ok(Self {
            anchored,
            parent_count,
            dirs,
            file,
        })
    }

    /// True if the path is anchored at the working folder.
    #[must_use]
    pub fn is_from_working_folder(&self) -> bool {
        self.anchored
    }

    /// File-name component; empty for folder paths.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file
    }

    /// True iff the path has no file-name component.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.file.is_empty()
    }

    /// True for the empty (self-reference) path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.anchored && self.parent_count == 0 && self.dirs.is_empty() && self.file.is_empty()
    }

    /// Number of directory segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.dirs.len()
    }

    /// Anchor the path at the working folder.
    ///
    /// Callers must not pass paths with uncollapsed `..` segments; those
    /// cannot be expressed from the working folder.
    #[must_use]
    pub fn from_working_folder(mut self) -> Self {
        self.anchored = true;
        self
    }

    /// Drop the working-folder anchoring, keeping the segments.
    #[must_use]
    pub fn remove_working_folder(mut self) -> Self {
        self.anchored = false;
        self
    }

    /// Rebase `rel` against this path's directory.
    ///
    /// The receiver's file-name component is dropped first, so joining
    /// `articles/a.md` with `../images/x.png` yields `images/x.png`. An
    /// anchored `rel` replaces the receiver entirely. Fails if the result
    /// would navigate above an anchored working folder.
    pub fn join(&self, rel: &Self) -> Result<Self, PathError> {
        if rel.anchored {
            return Ok(rel.clone());
        }
        let mut dirs = self.dirs.clone();
        let mut parent_count = self.parent_count;
        for _ in 0..rel.parent_count {
            if dirs.pop().is_none() {
                if self.anchored {
                    return Err(PathError::InvalidArgument(format!(
                        "joining {rel} to {self} navigates above the working folder"
                    )));
                }
                parent_count += 1;
            }
        }
        dirs.extend(rel.dirs.iter().cloned());
        Ok(Self {
            anchored: self.anchored,
            parent_count,
            dirs,
            file: rel.file.clone(),
        })
    }

    /// Relative path from `base`'s file location to this path.
    ///
    /// Both paths must share the same working-folder anchoring. A path made
    /// relative to itself is the empty path. The result is never anchored.
    pub fn make_relative_to(&self, base: &Self) -> Result<Self, PathError> {
        if self.anchored != base.anchored {
            return Err(PathError::InvalidArgument(format!(
                "cannot relate {self} to {base}: mismatched working-folder anchoring"
            )));
        }
        if self == base {
            return Ok(Self::empty());
        }
        if self.parent_count < base.parent_count {
            // The name of the directory between the two parent levels is
            // unknown, so no relative path exists.
            return Err(PathError::InvalidArgument(format!(
                "cannot compute a relative path from {base} to {self}"
            )));
        }
        if self.parent_count > base.parent_count {
            return Ok(Self {
                anchored: false,
                parent_count: (self.parent_count - base.parent_count) + base.dirs.len(),
                dirs: self.dirs.clone(),
                file: self.file.clone(),
            });
        }
        let common = self
            .dirs
            .iter()
            .zip(&base.dirs)
            .take_while(|(a, b)| a == b)
            .count();
        Ok(Self {
            anchored: false,
            parent_count: base.dirs.len() - common,
            dirs: self.dirs[common..].to_vec(),
            file: self.file.clone(),
        })
    }

    /// True if this path lives under the given folder path.
    #[must_use]
    pub fn starts_with(&self, folder: &Self) -> bool {
        folder.is_folder()
            && self.anchored == folder.anchored
            && self.parent_count == folder.parent_count
            && self.dirs.len() >= folder.dirs.len()
            && self.dirs[..folder.dirs.len()] == folder.dirs[..]
    }

    /// Remainder of this path below the given folder, unanchored.
    #[must_use]
    pub fn strip_prefix(&self, folder: &Self) -> Option<Self> {
        if !self.starts_with(folder) {
            return None;
        }
        Some(Self {
            anchored: false,
            parent_count: 0,
            dirs: self.dirs[folder.dirs.len()..].to_vec(),
            file: self.file.clone(),
        })
    }

    /// Directory and file segments in order, skipping the empty file name.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.dirs
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.file.as_str()).filter(|f| !f.is_empty()))
    }

    /// Percent-decode every segment.
    ///
    /// Fails if a segment decodes to invalid UTF-8.
    pub fn url_decode(&self) -> Result<Self, PathError> {
        let decode = |segment: &str| -> Result<String, PathError> {
            percent_decode_str(segment)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|e| {
                    PathError::InvalidArgument(format!("invalid percent-encoding in {segment}: {e}"))
                })
        };
        Ok(Self {
            anchored: self.anchored,
            parent_count: self.parent_count,
            dirs: self
                .dirs
                .iter()
                .map(|d| decode(d))
                .collect::<Result<_, _>>()?,
            file: decode(&self.file)?,
        })
    }

    /// Render the path with every segment percent-encoded, `/` preserved.
    #[must_use]
    pub fn url_encode(&self) -> String {
        let mut out = String::new();
        if self.anchored {
            out.push_str("~/");
        }
        for _ in 0..self.parent_count {
            out.push_str("../");
        }
        for dir in &self.dirs {
            out.push_str(&utf8_percent_encode(dir, SEGMENT_ENCODE).to_string());
            out.push('/');
        }
        out.push_str(&utf8_percent_encode(&self.file, SEGMENT_ENCODE).to_string());
        out
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.anchored {
            write!(f, "~/")?;
        }
        for _ in 0..self.parent_count {
            write!(f, "../")?;
        }
        for dir in &self.dirs {
            write!(f, "{dir}/")?;
        }
        write!(f, "{}", self.file)
    }
}
