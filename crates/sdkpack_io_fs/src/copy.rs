//! Single-directory file copy: pattern-filtered and mapped.
//!
//! Neither copier recurses. Directory entries found in a source listing are
//! skipped and reported, never attempted as file copies. Every file copy is
//! isolated: a failure is recorded in the report and the next entry proceeds.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::primitives::{FsPrimitives, SpecListEntry};
use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{InstallError, SpecCopyRuleMapped, SpecCopyRulePattern};
use crate::util::SpecNameMatcher;

/// Copy direct entries of `rule.path_dir_src` whose basename matches
/// `rule.predicate` into `rule.path_dir_dst`.
///
/// Returns [`InstallError::InvalidPattern`] before touching the filesystem
/// when the predicate does not compile. All filesystem failures end up in the
/// returned [`ReportCopy`].
pub fn copy_matching(
    fs: &dyn FsPrimitives,
    rule: &SpecCopyRulePattern,
) -> Result<ReportCopy, InstallError> {
    let matcher = SpecNameMatcher::from_predicate(&rule.predicate)?;
    let mut builder_cp_report = ReportCopyBuilder::default();
    copy_dir_entries(
        fs,
        &rule.path_dir_src,
        &rule.path_dir_dst,
        Some(&matcher),
        &mut builder_cp_report,
    );
    Ok(builder_cp_report.build())
}

/// Copy every direct entry of each mapping's source directory into the
/// mapping's destination directory, mappings in order.
///
/// A missing source directory only affects its own mapping.
pub fn copy_mapped(fs: &dyn FsPrimitives, rule: &SpecCopyRuleMapped) -> ReportCopy {
    let mut builder_cp_report = ReportCopyBuilder::default();
    for (path_dir_src, path_dir_dst) in rule.iter_dir_pairs() {
        copy_dir_entries(
            fs,
            &path_dir_src,
            &path_dir_dst,
            None,
            &mut builder_cp_report,
        );
    }
    builder_cp_report.build()
}

fn copy_dir_entries(
    fs: &dyn FsPrimitives,
    path_dir_src: &Path,
    path_dir_dst: &Path,
    matcher: Option<&SpecNameMatcher>,
    builder_cp_report: &mut ReportCopyBuilder,
) {
    let mut l_entries: Vec<SpecListEntry> = match fs.list_dir(path_dir_src) {
        Ok(v) => v,
        Err(e) => {
            warn!("Failed to read directory {} ({e})", path_dir_src.display());
            builder_cp_report.add_list_error(path_dir_src, e);
            return;
        }
    };
    l_entries.sort_by(|a, b| a.name_file.cmp(&b.name_file));

    for entry in l_entries {
        builder_cp_report.add_scanned();
        if let Some(matcher) = matcher
            && !matcher.is_match(&entry.name_entry)
        {
            debug!("[unmatched] {}", entry.path_entry.display());
            continue;
        }
        builder_cp_report.add_matched();

        let path_file_dst = path_dir_dst.join(&entry.name_file);
        if entry.if_is_dir {
            warn!("[skipped] directory {}", entry.path_entry.display());
            builder_cp_report.add_skipped_dir(entry.path_entry, path_file_dst);
            continue;
        }

        match fs.copy_file(&entry.path_entry, &path_file_dst) {
            Ok(()) => {
                info!(
                    "[copied] -> {} -> {}",
                    entry.path_entry.display(),
                    path_file_dst.display()
                );
                builder_cp_report.add_copied(entry.path_entry, path_file_dst);
            }
            Err(e) => {
                warn!(
                    "[failed] {} -> {} ({e})",
                    entry.path_entry.display(),
                    path_file_dst.display()
                );
                builder_cp_report.add_copy_error(entry.path_entry, path_file_dst, e);
            }
        }
    }
}
