//! Installer: Reset -> Build -> CopyHeaders -> CopyLibraries.

use tracing::{info, warn};

use crate::copy::{copy_mapped, copy_matching};
use crate::layout::build_layout;
use crate::primitives::{FsDryRun, FsPrimitives, FsStd};
use crate::report::{ReportCopy, ReportInstall, ReportReset};
use crate::spec::{
    EnumFsErrorKind, EnumInstallStage, EnumStageFailurePolicy, InstallError, SpecFsError,
    SpecInstallConfig, SpecInstallOptions,
};
use crate::util::SpecNameMatcher;

/// Sequences one SDK install run over a resolved [`SpecInstallConfig`].
#[derive(Debug, Clone)]
pub struct Installer {
    config: SpecInstallConfig,
    options: SpecInstallOptions,
}

impl Installer {
    pub fn new(config: SpecInstallConfig, options: SpecInstallOptions) -> Self {
        Self { config, options }
    }

    /// Run against the real filesystem, or [`FsDryRun`] when `if_dry_run` is set.
    pub fn run(&self) -> Result<ReportInstall, InstallError> {
        if self.options.if_dry_run {
            self.run_with(&FsDryRun)
        } else {
            self.run_with(&FsStd)
        }
    }

    /// Run all four stages with `fs`.
    ///
    /// Header predicates are compiled before Reset, so an invalid pattern
    /// fails the run without touching the destination. Under
    /// [`EnumStageFailurePolicy::BestEffort`] every stage runs regardless of
    /// earlier failures; under `FailFast` the run stops after a Reset or Build
    /// stage that recorded errors.
    pub fn run_with(&self, fs: &dyn FsPrimitives) -> Result<ReportInstall, InstallError> {
        for rule in &self.config.rules_header {
            SpecNameMatcher::from_predicate(&rule.predicate)?;
        }

        let mut report_install = ReportInstall::default();

        info!(stage = %EnumInstallStage::Reset, "stage start");
        report_install.report_reset = reset_destination(fs, &self.config);
        self.check_stage(EnumInstallStage::Reset, report_install.report_reset.errors.len())?;

        info!(stage = %EnumInstallStage::Build, "stage start");
        report_install.report_build = build_layout(fs, &self.config.layout);
        self.check_stage(EnumInstallStage::Build, report_install.report_build.errors.len())?;

        info!(stage = %EnumInstallStage::CopyHeaders, "stage start");
        let mut report_headers = ReportCopy::default();
        for rule in &self.config.rules_header {
            report_headers.merge(copy_matching(fs, rule)?);
        }
        info!("{}", report_headers.format("[HEADERS]"));
        report_install.report_headers = report_headers;

        info!(stage = %EnumInstallStage::CopyLibraries, "stage start");
        report_install.report_libraries = copy_mapped(fs, &self.config.rule_library);
        info!("{}", report_install.report_libraries.format("[LIBRARIES]"));

        Ok(report_install)
    }

    fn check_stage(&self, stage: EnumInstallStage, n_errors: usize) -> Result<(), InstallError> {
        if n_errors == 0 {
            return Ok(());
        }
        match self.options.rule_stage_failure {
            EnumStageFailurePolicy::BestEffort => {
                warn!("Stage `{stage}` recorded {n_errors} error(s); continuing");
                Ok(())
            }
            EnumStageFailurePolicy::FailFast => {
                Err(InstallError::StageFailed { stage, n_errors })
            }
        }
    }
}

/// Clear write protection under the destination root and remove it.
///
/// A missing root is not an error. Removal is attempted even when clearing
/// write protection fails; only a failed removal is recorded.
pub fn reset_destination(fs: &dyn FsPrimitives, config: &SpecInstallConfig) -> ReportReset {
    let path_dir_root = config.path_dir_dst_root();
    let mut report_reset = ReportReset::default();
    if !fs.exists(&path_dir_root) {
        return report_reset;
    }

    if let Err(e) = fs.clear_readonly(&path_dir_root) {
        warn!(
            "Failed to clear write protection under {} ({e})",
            path_dir_root.display()
        );
    }
    match fs.remove_tree(&path_dir_root) {
        Ok(()) => {
            info!(
                "Destination directory {} successfully removed.",
                path_dir_root.display()
            );
            report_reset.if_removed = true;
        }
        Err(e) => {
            warn!(
                "Failed to remove directory {} ({e}), you should manually delete it",
                path_dir_root.display()
            );
            report_reset.errors.push(SpecFsError::new(
                EnumFsErrorKind::RemoveFailed,
                &path_dir_root,
                e,
            ));
        }
    }
    report_reset
}
