//! Library SDK configuration: TOML files and built-in presets.
//!
//! A [`SpecSdkConfig`] holds paths relative to the per-library source and
//! destination roots; [`SpecSdkConfig::resolve`] anchors it to concrete
//! roots and yields the [`SpecInstallConfig`] the installer runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::spec::{
    ConfigError, EnumNamePatternMode, SpecCopyRuleMapped, SpecCopyRulePattern,
    SpecDirectoryNode, SpecInstallConfig, SpecLayout, SpecNamePredicate,
};
use crate::util::{is_contained_relative, is_single_segment};

////////////////////////////////////////////////////////////////////////////////
// #region ConfigModel

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecSdkConfig {
    /// Directory name of the library under both roots.
    pub library_name: String,
    pub layout: SpecLayoutConfig,
    #[serde(default)]
    pub headers: Vec<SpecHeaderConfig>,
    pub libraries: SpecLibraryConfig,
}

/// Destination layout below the library root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecLayoutConfig {
    /// Relative `a/b/c` paths.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Explicit subtrees, merged with `paths`.
    #[serde(default)]
    pub nodes: Vec<SpecDirectoryNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecHeaderConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    #[serde(default = "default_header_patterns")]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub mode: EnumNamePatternMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecLibraryConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// `[source subpath, destination subpath]` pairs.
    pub mappings: Vec<(PathBuf, PathBuf)>,
}

fn default_header_patterns() -> Vec<String> {
    vec![".h".to_string(), ".inl".to_string()]
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LoadAndResolve

impl SpecSdkConfig {
    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let c_text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&c_text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_single_segment(&self.library_name) {
            return Err(ConfigError::Invalid(format!(
                "library_name must be a single path segment, got `{}`",
                self.library_name
            )));
        }
        for path in &self.layout.paths {
            if path.split(['/', '\\']).filter(|s| !s.is_empty()).any(|s| !is_single_segment(s)) {
                return Err(ConfigError::Invalid(format!("invalid layout path `{path}`")));
            }
        }
        for node in &self.layout.nodes {
            validate_node(node)?;
        }
        let mut l_relative = Vec::new();
        for header in &self.headers {
            l_relative.push(&header.source);
            l_relative.push(&header.destination);
            if header.patterns.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "header rule for `{}` has no patterns",
                    header.source.display()
                )));
            }
        }
        l_relative.push(&self.libraries.source);
        l_relative.push(&self.libraries.destination);
        for (path_src_sub, path_dst_sub) in &self.libraries.mappings {
            l_relative.push(path_src_sub);
            l_relative.push(path_dst_sub);
        }
        if let Some(path_bad) = l_relative.into_iter().find(|p| !is_contained_relative(p)) {
            return Err(ConfigError::Invalid(format!(
                "path `{}` must be relative and stay inside its root",
                path_bad.display()
            )));
        }
        Ok(())
    }

    /// Layout tree rooted at `library_name`.
    pub fn layout_root(&self) -> SpecDirectoryNode {
        let mut root = SpecDirectoryNode::from_paths(&self.library_name, &self.layout.paths);
        for node in &self.layout.nodes {
            root.merge_child(node.clone());
        }
        root
    }

    /// Anchor the config at `<root_src>/<library_name>` and `<root_dst>/<library_name>`.
    pub fn resolve(&self, root_src: &Path, root_dst: &Path) -> SpecInstallConfig {
        let path_dir_src = root_src.join(&self.library_name);
        let layout = SpecLayout::new(root_dst, self.layout_root());
        let path_dir_dst = layout.path_dir_root();

        let rules_header = self
            .headers
            .iter()
            .map(|header| SpecCopyRulePattern {
                path_dir_src: path_dir_src.join(&header.source),
                path_dir_dst: path_dir_dst.join(&header.destination),
                predicate: SpecNamePredicate {
                    patterns_include: header.patterns.clone(),
                    patterns_exclude: header.exclude.clone(),
                    rule_pattern: header.mode,
                },
            })
            .collect();
        let rule_library = SpecCopyRuleMapped {
            path_dir_src_root: path_dir_src.join(&self.libraries.source),
            path_dir_dst_root: path_dir_dst.join(&self.libraries.destination),
            mappings: self.libraries.mappings.clone(),
        };

        SpecInstallConfig {
            layout,
            rules_header,
            rule_library,
        }
    }
}

fn validate_node(node: &SpecDirectoryNode) -> Result<(), ConfigError> {
    if !is_single_segment(&node.name) {
        return Err(ConfigError::Invalid(format!(
            "layout node name must be a single path segment, got `{}`",
            node.name
        )));
    }
    node.children.iter().try_for_each(validate_node)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Presets

/// Built-in library configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumSdkPreset {
    #[default]
    V8,
    GfxLib,
}

impl EnumSdkPreset {
    pub const ALL: [EnumSdkPreset; 2] = [Self::V8, Self::GfxLib];

    pub fn name(self) -> &'static str {
        match self {
            Self::V8 => "v8",
            Self::GfxLib => "gfx_lib",
        }
    }

    pub fn config(self) -> SpecSdkConfig {
        match self {
            Self::V8 => preset_v8(),
            Self::GfxLib => preset_gfx_lib(),
        }
    }
}

impl FromStr for EnumSdkPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

fn header(source: &str, destination: &str) -> SpecHeaderConfig {
    SpecHeaderConfig {
        source: PathBuf::from(source),
        destination: PathBuf::from(destination),
        patterns: default_header_patterns(),
        exclude: Vec::new(),
        mode: EnumNamePatternMode::Suffix,
    }
}

fn mappings(pairs: &[(&str, &str)]) -> Vec<(PathBuf, PathBuf)> {
    pairs
        .iter()
        .map(|(src, dst)| (PathBuf::from(src), PathBuf::from(dst)))
        .collect()
}

fn preset_v8() -> SpecSdkConfig {
    let l_nodes = [
        SpecDirectoryNode::from_chain(2, &["include", "v8", "base", "math"]),
        SpecDirectoryNode::from_chain(1, &["lib", "X86", "X64"]),
    ]
    .into_iter()
    .flatten()
    .collect();

    SpecSdkConfig {
        library_name: "v8".to_string(),
        layout: SpecLayoutConfig {
            paths: Vec::new(),
            nodes: l_nodes,
        },
        headers: vec![
            header("v8/base", "include/v8/base"),
            header("v8/math", "include/v8/math"),
        ],
        libraries: SpecLibraryConfig {
            source: PathBuf::from("build_output"),
            destination: PathBuf::from("lib"),
            mappings: mappings(&[("x86", "X86"), ("amd64", "X64")]),
        },
    }
}

fn preset_gfx_lib() -> SpecSdkConfig {
    SpecSdkConfig {
        library_name: "gfx_lib".to_string(),
        layout: SpecLayoutConfig {
            paths: vec![
                "include/gfx".to_string(),
                "lib/X86".to_string(),
                "lib/X64".to_string(),
            ],
            nodes: Vec::new(),
        },
        headers: vec![header("gfx_lib", "include/gfx")],
        libraries: SpecLibraryConfig {
            source: PathBuf::from("build_output"),
            destination: PathBuf::from("lib"),
            mappings: mappings(&[("Win32/lib", "X86"), ("X64/lib", "X64")]),
        },
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
