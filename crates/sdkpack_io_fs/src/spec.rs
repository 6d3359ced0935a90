//! Layout/copy-rule models, policy enums and top-level error types.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for header name predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumNamePatternMode {
    /// Basename ends with the pattern (`".h"` matches `a.h`).
    #[default]
    Suffix,
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Basename contains the pattern.
    Literal,
}

/// What the installer does after Reset/Build records an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumStageFailurePolicy {
    /// Record the failure and keep going with the next stage.
    #[default]
    BestEffort,
    /// Stop the run after the first Reset or Build stage with errors.
    FailFast,
}

/// Installer stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnumInstallStage {
    Reset,
    Build,
    CopyHeaders,
    CopyLibraries,
}

impl fmt::Display for EnumInstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_name = match self {
            Self::Reset => "reset",
            Self::Build => "build",
            Self::CopyHeaders => "copy-headers",
            Self::CopyLibraries => "copy-libraries",
        };
        f.write_str(c_name)
    }
}

/// Filesystem failure category recorded in stage reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumFsErrorKind {
    /// Destination tree could not be removed.
    RemoveFailed,
    /// One layout directory could not be created.
    CreateFailed,
    /// A source directory is missing or unreadable.
    ListFailed,
    /// A single file copy failed.
    CopyFailed,
}

impl fmt::Display for EnumFsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_name = match self {
            Self::RemoveFailed => "remove failed",
            Self::CreateFailed => "create failed",
            Self::ListFailed => "list failed",
            Self::CopyFailed => "copy failed",
        };
        f.write_str(c_name)
    }
}

/// Result of one attempted file copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumCopyOutcome {
    Copied,
    /// Copy failed; carries the underlying IO error text.
    Failed(String),
    /// Source entry is a directory and was not attempted.
    SkippedDirectory,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutModel

/// One node of a destination layout template.
///
/// `name` is a single path segment. A node's full path is its parent's full
/// path joined with `name`; the tree is never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecDirectoryNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<SpecDirectoryNode>,
}

/// Rooted layout tree plus the directory the root node is created in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLayout {
    /// Existing directory that receives `root`.
    pub path_dir_anchor: PathBuf,
    pub root: SpecDirectoryNode,
}

impl SpecLayout {
    pub fn new(path_dir_anchor: impl Into<PathBuf>, root: SpecDirectoryNode) -> Self {
        Self {
            path_dir_anchor: path_dir_anchor.into(),
            root,
        }
    }

    /// Full path of the root node (the destination root).
    pub fn path_dir_root(&self) -> PathBuf {
        self.path_dir_anchor.join(&self.root.name)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CopyRules

/// Basename predicate: any include pattern matches and no exclude pattern does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecNamePredicate {
    pub patterns_include: Vec<String>,
    pub patterns_exclude: Vec<String>,
    pub rule_pattern: EnumNamePatternMode,
}

impl SpecNamePredicate {
    /// Suffix predicate over the given extensions.
    pub fn suffixes<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns_include: suffixes.into_iter().map(Into::into).collect(),
            patterns_exclude: Vec::new(),
            rule_pattern: EnumNamePatternMode::Suffix,
        }
    }

    /// `.h` and `.inl` headers.
    pub fn headers() -> Self {
        Self::suffixes([".h", ".inl"])
    }
}

/// Pattern-filtered copy of the direct entries of one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyRulePattern {
    pub path_dir_src: PathBuf,
    pub path_dir_dst: PathBuf,
    pub predicate: SpecNamePredicate,
}

/// Unfiltered copy across `(source subpath, destination subpath)` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyRuleMapped {
    pub path_dir_src_root: PathBuf,
    pub path_dir_dst_root: PathBuf,
    pub mappings: Vec<(PathBuf, PathBuf)>,
}

impl SpecCopyRuleMapped {
    /// Resolved `(source dir, destination dir)` for every mapping, in order.
    pub fn iter_dir_pairs(&self) -> impl Iterator<Item = (PathBuf, PathBuf)> + '_ {
        self.mappings.iter().map(|(path_src_sub, path_dst_sub)| {
            (
                self.path_dir_src_root.join(path_src_sub),
                self.path_dir_dst_root.join(path_dst_sub),
            )
        })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region InstallModel

/// Everything one install run needs, resolved to concrete paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecInstallConfig {
    pub layout: SpecLayout,
    pub rules_header: Vec<SpecCopyRulePattern>,
    pub rule_library: SpecCopyRuleMapped,
}

impl SpecInstallConfig {
    /// Destination root that Reset removes and Build recreates.
    pub fn path_dir_dst_root(&self) -> PathBuf {
        self.layout.path_dir_root()
    }
}

/// Run-time switches for [`crate::Installer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecInstallOptions {
    pub rule_stage_failure: EnumStageFailurePolicy,
    /// Trace mutating filesystem calls instead of performing them.
    pub if_dry_run: bool,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// One recorded filesystem failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecFsError {
    pub kind: EnumFsErrorKind,
    /// Failed path (destination for copies).
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

impl SpecFsError {
    pub fn new(kind: EnumFsErrorKind, path: &Path, exception: impl fmt::Display) -> Self {
        Self {
            kind,
            path: path.to_path_buf(),
            exception: exception.to_string(),
        }
    }
}

impl fmt::Display for SpecFsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.path.display(), self.exception)
    }
}

/// One attempted copy (or explicitly skipped directory entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyOutcome {
    pub path_file_src: PathBuf,
    pub path_file_dst: PathBuf,
    pub outcome: EnumCopyOutcome,
}

/// "Run could not start or was stopped" errors.
#[derive(Debug, Error)]
pub enum InstallError {
    /// Invalid include/exclude pattern.
    #[error("Invalid name pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
    /// A stage recorded errors under [`EnumStageFailurePolicy::FailFast`].
    #[error("Stage `{stage}` failed with {n_errors} error(s); run stopped")]
    StageFailed {
        stage: EnumInstallStage,
        n_errors: usize,
    },
}

/// Configuration loading/validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error("Unknown preset `{0}` (expected one of: v8, gfx_lib)")]
    UnknownPreset(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
