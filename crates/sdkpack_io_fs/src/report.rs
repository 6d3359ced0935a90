//! Stage report models and the mutable copy report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::spec::{
    EnumCopyOutcome, EnumFsErrorKind, EnumInstallStage, InstallError, SpecCopyOutcome,
    SpecFsError,
};

////////////////////////////////////////////////////////////////////////////////
// #region ResetAndBuild

/// Outcome of the Reset stage.
#[derive(Debug, Default, Clone)]
pub struct ReportReset {
    /// Destination root existed and was removed.
    pub if_removed: bool,
    pub errors: Vec<SpecFsError>,
}

/// Outcome of one layout build.
#[derive(Debug, Default, Clone)]
pub struct ReportBuild {
    /// Created directories, in creation order.
    pub paths_created: Vec<PathBuf>,
    pub errors: Vec<SpecFsError>,
}

impl ReportBuild {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Err` when any directory could not be created.
    pub fn into_result(self) -> Result<Self, InstallError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(InstallError::StageFailed {
            stage: EnumInstallStage::Build,
            n_errors: self.errors.len(),
        })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CopyReport

/// Aggregate counters and per-file outcomes for one copy call.
#[derive(Debug, Default, Clone)]
pub struct ReportCopy {
    /// Listed source entries.
    pub cnt_scanned: u64,
    /// Entries that passed the name predicate (all entries for mapped copies).
    pub cnt_matched: u64,
    pub cnt_copied: u64,
    /// Directory entries that were not attempted.
    pub cnt_skipped: u64,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
    /// List and copy failures.
    pub errors: Vec<SpecFsError>,
    /// One entry per attempted or skipped file, in processing order.
    pub outcomes: Vec<SpecCopyOutcome>,
}

impl ReportCopy {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Destination paths that were copied successfully.
    pub fn paths_copied(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|o| o.outcome == EnumCopyOutcome::Copied)
            .map(|o| o.path_file_dst.as_path())
    }

    /// Fold another report into this one (outcomes keep their order).
    pub fn merge(&mut self, other: ReportCopy) {
        self.cnt_scanned += other.cnt_scanned;
        self.cnt_matched += other.cnt_matched;
        self.cnt_copied += other.cnt_copied;
        self.cnt_skipped += other.cnt_skipped;
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
        self.outcomes.extend(other.outcomes);
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_matched".to_string(), self.cnt_matched);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} matched={} copied={} skipped={} errors={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_matched"],
            dict_counts["cnt_copied"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator used while a copy call runs.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    report: ReportCopy,
}

impl ReportCopyBuilder {
    /// Count one listed source entry.
    pub fn add_scanned(&mut self) {
        self.report.cnt_scanned += 1;
    }

    /// Count one entry that passed the name predicate.
    pub fn add_matched(&mut self) {
        self.report.cnt_matched += 1;
    }

    /// Record a listing failure for `path_dir`.
    pub fn add_list_error(&mut self, path_dir: &Path, exception: impl fmt::Display) {
        self.report
            .errors
            .push(SpecFsError::new(EnumFsErrorKind::ListFailed, path_dir, exception));
    }

    /// Record a successful copy.
    pub fn add_copied(&mut self, path_file_src: PathBuf, path_file_dst: PathBuf) {
        self.report.cnt_copied += 1;
        self.report.outcomes.push(SpecCopyOutcome {
            path_file_src,
            path_file_dst,
            outcome: EnumCopyOutcome::Copied,
        });
    }

    /// Record a failed copy; the failure is also kept in `errors`.
    pub fn add_copy_error(
        &mut self,
        path_file_src: PathBuf,
        path_file_dst: PathBuf,
        exception: impl fmt::Display,
    ) {
        let c_exception = exception.to_string();
        self.report.errors.push(SpecFsError::new(
            EnumFsErrorKind::CopyFailed,
            &path_file_dst,
            &c_exception,
        ));
        self.report.outcomes.push(SpecCopyOutcome {
            path_file_src,
            path_file_dst,
            outcome: EnumCopyOutcome::Failed(c_exception),
        });
    }

    /// Record a directory entry that was not attempted, with a warning.
    pub fn add_skipped_dir(&mut self, path_file_src: PathBuf, path_file_dst: PathBuf) {
        self.report.cnt_skipped += 1;
        self.report.warnings.push(format!(
            "Directory entry skipped: {}",
            path_file_src.display()
        ));
        self.report.outcomes.push(SpecCopyOutcome {
            path_file_src,
            path_file_dst,
            outcome: EnumCopyOutcome::SkippedDirectory,
        });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        self.report
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region InstallReport

/// Per-stage reports of one installer run.
#[derive(Debug, Default, Clone)]
pub struct ReportInstall {
    pub report_reset: ReportReset,
    pub report_build: ReportBuild,
    pub report_headers: ReportCopy,
    pub report_libraries: ReportCopy,
}

impl ReportInstall {
    /// Recorded error count per stage.
    pub fn error_counts(&self) -> BTreeMap<EnumInstallStage, usize> {
        BTreeMap::from([
            (EnumInstallStage::Reset, self.report_reset.errors.len()),
            (EnumInstallStage::Build, self.report_build.errors.len()),
            (EnumInstallStage::CopyHeaders, self.report_headers.error_count()),
            (
                EnumInstallStage::CopyLibraries,
                self.report_libraries.error_count(),
            ),
        ])
    }

    pub fn has_errors(&self) -> bool {
        self.error_counts().values().any(|n| *n > 0)
    }

    /// Every recorded error, in stage order.
    pub fn iter_errors(&self) -> impl Iterator<Item = &SpecFsError> {
        self.report_reset
            .errors
            .iter()
            .chain(&self.report_build.errors)
            .chain(&self.report_headers.errors)
            .chain(&self.report_libraries.errors)
    }
}

impl fmt::Display for ReportInstall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[INSTALL] dirs={} headers={} libraries={} errors={}",
            self.report_build.paths_created.len(),
            self.report_headers.cnt_copied,
            self.report_libraries.cnt_copied,
            self.iter_errors().count()
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
