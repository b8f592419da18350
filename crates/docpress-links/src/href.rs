//! Tagged parsing of raw hrefs.

use docpress_paths::LogicalPath;

use crate::error::LinkError;

/// A parsed href, tagged by its resolution family.
///
/// The tag decides which branch of [`crate::resolve_link`] applies, so the
/// resolver dispatches on the variant instead of re-deriving the branch
/// from string shape at each call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HrefPath {
    /// Anchored at the working folder; names a logical target in the
    /// overall project.
    Anchored(LogicalPath),
    /// Relative to the current document.
    Relative(LogicalPath),
}

impl HrefPath {
    /// Parse and percent-decode a raw href.
    ///
    /// Fails with [`LinkError::UnsupportedFragmentOrQuery`] if the href
    /// still carries a `#fragment` or `?query`, and with
    /// [`LinkError::NotRelative`] if it does not parse as a relative
    /// reference (absolute path, scheme, drive letter).
    pub fn parse(raw_href: &str) -> Result<Self, LinkError> {
        if raw_href.contains('#') || raw_href.contains('?') {
            return Err(LinkError::UnsupportedFragmentOrQuery(raw_href.to_owned()));
        }
        let path = LogicalPath::parse(raw_href)
            .map_err(|_| LinkError::NotRelative(raw_href.to_owned()))?
            .url_decode()?;
        if path.is_from_working_folder() {
            Ok(Self::Anchored(path))
        } else {
            Ok(Self::Relative(path))
        }
    }

    /// The parsed path, whichever family it belongs to.
    #[must_use]
    pub fn path(&self) -> &LogicalPath {
        match self {
            Self::Anchored(path) | Self::Relative(path) => path,
        }
    }
}
