//! Filesystem primitives consumed by the layout builder and copiers.
//!
//! Every call is one blocking, all-or-nothing operation. The core only talks
//! to the filesystem through [`FsPrimitives`], so tests can substitute an
//! instrumented or failing implementation.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// One direct entry of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecListEntry {
    pub path_entry: PathBuf,
    /// Raw file name, used to build destination paths.
    pub name_file: OsString,
    /// Lossy UTF-8 rendering of `name_file` for matching and traces.
    pub name_entry: String,
    /// Entry is a directory (symlinks are resolved).
    pub if_is_dir: bool,
}

pub trait FsPrimitives {
    /// Path exists (symlinks are not followed).
    fn exists(&self, path: &Path) -> bool;

    /// Create one directory. Fails when the parent is missing or the path exists.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Clear write protection on `path` and everything below it.
    fn clear_readonly(&self, path: &Path) -> io::Result<()>;

    /// Remove `path` and everything below it.
    fn remove_tree(&self, path: &Path) -> io::Result<()>;

    /// Direct children of `path`, in no particular order.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<SpecListEntry>>;

    /// Copy a whole file, overwriting `path_dst` when present.
    fn copy_file(&self, path_src: &Path, path_dst: &Path) -> io::Result<()>;
}

////////////////////////////////////////////////////////////////////////////////
// #region RealFilesystem

/// Real filesystem backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStd;

impl FsPrimitives for FsStd {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn clear_readonly(&self, path: &Path) -> io::Result<()> {
        let meta_path = fs::symlink_metadata(path)?;
        if meta_path.file_type().is_symlink() {
            return Ok(());
        }
        make_writable(path, meta_path.permissions(), meta_path.is_dir())?;
        if meta_path.is_dir() {
            for _entry_res in fs::read_dir(path)? {
                self.clear_readonly(&_entry_res?.path())?;
            }
        }
        Ok(())
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<SpecListEntry>> {
        let mut l_entries = Vec::new();
        for _entry_res in fs::read_dir(path)? {
            let entry = _entry_res?;
            let path_entry = entry.path();
            let b_is_dir = is_dir_entry(entry.file_type(), &path_entry);
            let name_file = entry.file_name();
            l_entries.push(SpecListEntry {
                name_entry: name_file.to_string_lossy().to_string(),
                name_file,
                path_entry,
                if_is_dir: b_is_dir,
            });
        }
        Ok(l_entries)
    }

    fn copy_file(&self, path_src: &Path, path_dst: &Path) -> io::Result<()> {
        fs::copy(path_src, path_dst).map(|_| ())
    }
}

/// Directory check for one listed entry.
///
/// An unreadable file type falls back to `fs::metadata`; when that fails too
/// the entry is treated as a file so its copy fails on its own.
fn is_dir_entry(res_file_type: io::Result<fs::FileType>, path_entry: &Path) -> bool {
    match res_file_type {
        Ok(cfg_file_type) => {
            cfg_file_type.is_dir() || (cfg_file_type.is_symlink() && path_entry.is_dir())
        }
        Err(e) => {
            debug!("File type unavailable for {} ({e})", path_entry.display());
            fs::metadata(path_entry).is_ok_and(|m| m.is_dir())
        }
    }
}

#[cfg(unix)]
fn make_writable(path: &Path, mut permissions: fs::Permissions, if_is_dir: bool) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let n_mode = permissions.mode();
    let n_mode_owner = if if_is_dir { 0o700 } else { 0o600 };
    if n_mode & n_mode_owner == n_mode_owner {
        return Ok(());
    }
    permissions.set_mode(n_mode | n_mode_owner);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path, mut permissions: fs::Permissions, _if_is_dir: bool) -> io::Result<()> {
    if !permissions.readonly() {
        return Ok(());
    }
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DryRun

/// Reads the real filesystem; mutating calls are traced and skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDryRun;

impl FsPrimitives for FsDryRun {
    fn exists(&self, path: &Path) -> bool {
        FsStd.exists(path)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        info!("[dry-run] mkdir {}", path.display());
        Ok(())
    }

    fn clear_readonly(&self, path: &Path) -> io::Result<()> {
        info!("[dry-run] chmod -R u+w {}", path.display());
        Ok(())
    }

    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        info!("[dry-run] rm -r {}", path.display());
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<SpecListEntry>> {
        FsStd.list_dir(path)
    }

    fn copy_file(&self, path_src: &Path, path_dst: &Path) -> io::Result<()> {
        info!(
            "[dry-run] cp {} {}",
            path_src.display(),
            path_dst.display()
        );
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io;

    use tempfile::TempDir;

    use super::{FsDryRun, FsPrimitives, FsStd, is_dir_entry};

    #[test]
    fn create_dir_fails_when_parent_missing_or_path_exists() {
        let tmp = TempDir::new().expect("tempdir");
        let path_dir = tmp.path().join("a");

        FsStd.create_dir(&path_dir).expect("create a");
        assert!(FsStd.create_dir(&path_dir).is_err());
        assert!(FsStd.create_dir(&tmp.path().join("x/y")).is_err());
    }

    #[test]
    fn list_dir_flags_directories() {
        let tmp = TempDir::new().expect("tempdir");
        fs::create_dir(tmp.path().join("sub")).expect("mkdir sub");
        fs::write(tmp.path().join("a.h"), "a").expect("write a.h");

        let mut l_entries = FsStd.list_dir(tmp.path()).expect("list");
        l_entries.sort_by(|a, b| a.name_entry.cmp(&b.name_entry));
        assert_eq!(l_entries.len(), 2);
        assert_eq!(l_entries[0].name_entry, "a.h");
        assert!(!l_entries[0].if_is_dir);
        assert_eq!(l_entries[1].name_entry, "sub");
        assert!(l_entries[1].if_is_dir);
    }

    #[test]
    fn unreadable_file_type_falls_back_to_metadata() {
        let tmp = TempDir::new().expect("tempdir");
        let path_dir = tmp.path().join("sub");
        let path_file = tmp.path().join("a.h");
        fs::create_dir(&path_dir).expect("mkdir sub");
        fs::write(&path_file, "a").expect("write a.h");
        let err_type = || io::Error::other("stat failed");

        assert!(is_dir_entry(Err(err_type()), &path_dir));
        assert!(!is_dir_entry(Err(err_type()), &path_file));
        assert!(!is_dir_entry(Err(err_type()), &tmp.path().join("gone")));
    }

    #[test]
    fn copy_file_overwrites_destination() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("src.h");
        let path_dst = tmp.path().join("dst.h");
        fs::write(&path_src, "new").expect("write src");
        fs::write(&path_dst, "old").expect("write dst");

        FsStd.copy_file(&path_src, &path_dst).expect("copy");
        assert_eq!(fs::read_to_string(&path_dst).expect("read dst"), "new");
    }

    #[test]
    fn clear_readonly_then_remove_tree() {
        let tmp = TempDir::new().expect("tempdir");
        let path_root = tmp.path().join("sdk");
        let path_file = path_root.join("include/a.h");
        fs::create_dir_all(path_file.parent().expect("parent")).expect("mkdir");
        fs::write(&path_file, "a").expect("write");

        let mut permissions = fs::metadata(&path_file).expect("meta").permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path_file, permissions).expect("set readonly");

        FsStd.clear_readonly(&path_root).expect("clear readonly");
        assert!(!fs::metadata(&path_file).expect("meta").permissions().readonly());

        FsStd.remove_tree(&path_root).expect("remove");
        assert!(!FsStd.exists(&path_root));
    }

    #[test]
    fn dry_run_never_mutates() {
        let tmp = TempDir::new().expect("tempdir");
        let path_src = tmp.path().join("a.h");
        fs::write(&path_src, "a").expect("write");

        FsDryRun.create_dir(&tmp.path().join("new")).expect("mkdir");
        FsDryRun
            .copy_file(&path_src, &tmp.path().join("b.h"))
            .expect("copy");
        FsDryRun.remove_tree(tmp.path()).expect("remove");

        assert!(!tmp.path().join("new").exists());
        assert!(!tmp.path().join("b.h").exists());
        assert!(path_src.exists());
        assert_eq!(FsDryRun.list_dir(tmp.path()).expect("list").len(), 1);
    }
}
