//! Layout tree construction helpers and the directory tree builder.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::primitives::FsPrimitives;
use crate::report::ReportBuild;
use crate::spec::{EnumFsErrorKind, SpecDirectoryNode, SpecFsError, SpecLayout};

////////////////////////////////////////////////////////////////////////////////
// #region NodeConstruction

impl SpecDirectoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SpecDirectoryNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = SpecDirectoryNode>,
    {
        self.children.extend(children);
        self
    }

    /// Build a tree from relative `a/b/c` paths; shared prefixes are merged.
    ///
    /// ```
    /// use sdkpack_io_fs::SpecDirectoryNode;
    ///
    /// let root = SpecDirectoryNode::from_paths("gfx_lib", ["include/gfx", "lib/X86", "lib/X64"]);
    /// assert_eq!(root.children.len(), 2);
    /// assert_eq!(root.children[1].children.len(), 2);
    /// ```
    pub fn from_paths<I, S>(root_name: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Self::new(root_name);
        for path in paths {
            let l_segments = path
                .as_ref()
                .split(['/', '\\'])
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>();
            root.insert_chain(&l_segments);
        }
        root
    }

    /// Depth-tagged shorthand: the first `depth` names form a nested chain,
    /// the remaining names become children of the chain's last node.
    ///
    /// `from_chain(2, ["include", "v8", "base", "math"])` is `include/v8/{base,math}`.
    /// Returns `None` when `names` is empty or `depth` is out of range.
    pub fn from_chain<S: AsRef<str>>(depth: usize, names: &[S]) -> Option<Self> {
        if depth == 0 || depth > names.len() {
            return None;
        }
        let l_leaves = names[depth..]
            .iter()
            .map(|name| Self::new(name.as_ref()))
            .collect::<Vec<_>>();
        let mut node = Self::new(names[depth - 1].as_ref()).with_children(l_leaves);
        for name in names[..depth - 1].iter().rev() {
            node = Self::new(name.as_ref()).with_child(node);
        }
        Some(node)
    }

    /// Merge `other` into this node's children by name.
    pub fn merge_child(&mut self, other: SpecDirectoryNode) {
        match self.children.iter_mut().find(|c| c.name == other.name) {
            Some(existing) => {
                for grandchild in other.children {
                    existing.merge_child(grandchild);
                }
            }
            None => self.children.push(other),
        }
    }

    fn insert_chain(&mut self, l_segments: &[&str]) {
        let Some((c_head, l_rest)) = l_segments.split_first() else {
            return;
        };
        let n_idx = match self.children.iter().position(|c| c.name == *c_head) {
            Some(n) => n,
            None => {
                self.children.push(Self::new(*c_head));
                self.children.len() - 1
            }
        };
        self.children[n_idx].insert_chain(l_rest);
    }

    /// Full paths of this node and its descendants, in preorder, under `base`.
    pub fn paths_preorder(&self, base: &Path) -> Vec<PathBuf> {
        let mut l_paths = Vec::new();
        collect_paths(self, base, &mut l_paths);
        l_paths
    }
}

fn collect_paths(node: &SpecDirectoryNode, path_parent: &Path, l_paths: &mut Vec<PathBuf>) {
    let path_node = path_parent.join(&node.name);
    l_paths.push(path_node.clone());
    for child in &node.children {
        collect_paths(child, &path_node, l_paths);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TreeBuilder

/// Create every directory of `layout`, parent before children.
///
/// Each directory is created exactly once with a non-recursive create. A
/// failure is recorded for that path and traversal continues into its
/// children, which will usually fail too because their parent is missing.
/// Nothing is rolled back.
pub fn build_layout(fs: &dyn FsPrimitives, layout: &SpecLayout) -> ReportBuild {
    let mut report_build = ReportBuild::default();
    build_node(fs, &layout.root, &layout.path_dir_anchor, &mut report_build);
    report_build
}

fn build_node(
    fs: &dyn FsPrimitives,
    node: &SpecDirectoryNode,
    path_parent: &Path,
    report_build: &mut ReportBuild,
) {
    let path_dir = path_parent.join(&node.name);
    match fs.create_dir(&path_dir) {
        Ok(()) => {
            info!("[created] -> {}", path_dir.display());
            report_build.paths_created.push(path_dir.clone());
        }
        Err(e) => {
            warn!("Failed to create directory {} ({e})", path_dir.display());
            report_build.errors.push(SpecFsError::new(
                EnumFsErrorKind::CreateFailed,
                &path_dir,
                e,
            ));
        }
    }

    for child in &node.children {
        build_node(fs, child, &path_dir, report_build);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
