//! `sdkpack_io_fs` v1:
//! SDK staging engine for native library packages.
//!
//! Modules:
//! - `spec`       : layout/copy-rule models, enums and errors
//! - `layout`     : layout tree helpers and the directory tree builder
//! - `copy`       : pattern-filtered and mapped single-directory copy
//! - `install`    : Reset -> Build -> CopyHeaders -> CopyLibraries
//! - `report`     : per-stage report models
//! - `primitives` : filesystem capability trait and implementations
//! - `conf`       : TOML config and built-in presets
//! - `util`       : shared helper functions

pub mod conf;
pub mod copy;
pub mod install;
pub mod layout;
pub mod primitives;
pub mod report;
pub mod spec;
mod util;

pub use conf::{
    EnumSdkPreset, SpecHeaderConfig, SpecLayoutConfig, SpecLibraryConfig, SpecSdkConfig,
};
pub use copy::{copy_mapped, copy_matching};
pub use install::{Installer, reset_destination};
pub use layout::build_layout;
pub use primitives::{FsDryRun, FsPrimitives, FsStd, SpecListEntry};
pub use report::{ReportBuild, ReportCopy, ReportCopyBuilder, ReportInstall, ReportReset};
pub use spec::{
    ConfigError, EnumCopyOutcome, EnumFsErrorKind, EnumInstallStage, EnumNamePatternMode,
    EnumStageFailurePolicy, InstallError, SpecCopyOutcome, SpecCopyRuleMapped,
    SpecCopyRulePattern, SpecDirectoryNode, SpecFsError, SpecInstallConfig, SpecInstallOptions,
    SpecLayout, SpecNamePredicate,
};
