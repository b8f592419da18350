//! Link rewriting against the destination tree.

use docpress_paths::LogicalPath;
use tracing::warn;

use crate::error::LinkError;
use crate::href::HrefPath;

/// Output-layout lookup for the file currently being resolved.
///
/// Implemented by the document build context; the resolver itself never
/// touches the filesystem.
pub trait LinkContext {
    /// Destination output path for a working-folder-anchored source path,
    /// if that source produced an output. When a source renders to several
    /// outputs the implementation reports the first (callers wanting a
    /// specific extension disambiguate before registering the map).
    fn output_path(&self, source: &LogicalPath) -> Option<LogicalPath>;

    /// Moniker group of the file being resolved, if any.
    fn moniker_group(&self) -> Option<&str> {
        None
    }
}

/// The resolved outcome of rewriting one link.
///
/// Constructed only by [`resolve_link`] and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileLinkInfo {
    /// The rewritten href, percent-encoded, valid from the destination file.
    pub href: String,
    /// Source-tree path of the document containing the link.
    pub from_file_in_source: LogicalPath,
    /// Destination-tree path of the document containing the link.
    pub from_file_in_dest: LogicalPath,
    /// Source-tree path of the link target.
    pub to_file_in_source: LogicalPath,
    /// Destination-tree path of the link target; `None` when the target has
    /// no registered output.
    pub to_file_in_dest: Option<LogicalPath>,
    /// The link as a source-relative path.
    pub file_link_in_source: LogicalPath,
    /// The link as a dest-relative path; `None` when unresolved.
    pub file_link_in_dest: Option<LogicalPath>,
    /// Moniker group of the resolving file, carried for grouped lookups.
    pub moniker_group: Option<String>,
    /// True iff a destination-file mapping was found for the target.
    pub is_resolved: bool,
}

/// Rewrite a link found inside one document so it is correct relative to
/// another document's output location.
///
/// `from_source`/`from_dest` are the containing document's source and
/// destination paths. `raw_href` must be a relative reference with no
/// fragment or query string.
///
/// Working-folder-anchored hrefs are re-resolved through
/// [`LinkContext::output_path`]; when the target has no registered output
/// the resolver falls back to a source-relative href, flags the result
/// `is_resolved = false`, and logs a broken-link warning. Document-relative
/// hrefs are preserved verbatim. A link whose target is the containing
/// document itself resolves to the empty href.
pub fn resolve_link(
    from_source: &LogicalPath,
    from_dest: &LogicalPath,
    raw_href: &str,
    ctx: &dyn LinkContext,
) -> Result<FileLinkInfo, LinkError> {
    let from_src = from_source.clone().remove_working_folder();
    let from_dst = from_dest.clone().remove_working_folder();

    match HrefPath::parse(raw_href)? {
        HrefPath::Anchored(target) => {
            let to_in_source = target.clone().remove_working_folder();
            let link_in_source = to_in_source.make_relative_to(&from_src)?;
            match ctx.output_path(&target) {
                Some(output) => {
                    let to_in_dest = output.remove_working_folder();
                    let resolved = to_in_dest.make_relative_to(&from_dst)?;
                    Ok(FileLinkInfo {
                        href: resolved.url_encode(),
                        from_file_in_source: from_src,
                        from_file_in_dest: from_dst,
                        to_file_in_source: to_in_source,
                        to_file_in_dest: Some(to_in_dest),
                        file_link_in_source: link_in_source,
                        file_link_in_dest: Some(resolved),
                        moniker_group: ctx.moniker_group().map(str::to_owned),
                        is_resolved: true,
                    })
                }
                None => {
                    warn!(
                        href = raw_href,
                        from = %from_src,
                        "link target has no registered output, keeping source-relative href"
                    );
                    Ok(FileLinkInfo {
                        href: link_in_source.url_encode(),
                        from_file_in_source: from_src,
                        from_file_in_dest: from_dst,
                        to_file_in_source: to_in_source,
                        to_file_in_dest: None,
                        file_link_in_source: link_in_source,
                        file_link_in_dest: None,
                        moniker_group: ctx.moniker_group().map(str::to_owned),
                        is_resolved: false,
                    })
                }
            }
        }
        HrefPath::Relative(path) => {
            // Document-relative links are promised stable across the
            // source-to-dest transform; the href passes through verbatim.
            let to_in_source = from_src.join(&path)?.remove_working_folder();
            let to_in_dest = from_dst.join(&path)?;
            Ok(FileLinkInfo {
                href: raw_href.to_owned(),
                from_file_in_source: from_src,
                from_file_in_dest: from_dst,
                to_file_in_source: to_in_source,
                to_file_in_dest: Some(to_in_dest),
                file_link_in_source: path.clone(),
                file_link_in_dest: Some(path),
                moniker_group: ctx.moniker_group().map(str::to_owned),
                is_resolved: true,
            })
        }
    }
}
