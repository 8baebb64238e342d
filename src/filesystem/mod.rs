//! File system capability used by the package and project managers.
//!
//! Paths handed to a [`FileSystem`] are relative to its [`FileSystem::root`].
//! Failures surface as [`PackageError::FileSystem`] so callers can tell them
//! apart from resolution errors.

mod physical;

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{PackageError, Result};
use crate::package::PackageFile;
use crate::runtime::{is_path_under, normalize_path};

pub use physical::PhysicalFileSystem;

pub trait FileSystem {
    fn root(&self) -> &Path;
    fn file_exists(&self, path: &Path) -> bool;
    fn directory_exists(&self, path: &Path) -> bool;
    fn add_file(&self, path: &Path, contents: &mut dyn Read) -> Result<()>;
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn delete_file(&self, path: &Path) -> Result<()>;
    fn delete_directory(&self, path: &Path, recursive: bool) -> Result<()>;

    /// Files in `path` whose name matches the glob `filter`, relative to the root.
    fn get_files(&self, path: &Path, filter: &str, recursive: bool) -> Result<Vec<PathBuf>>;

    /// Immediate subdirectories of `path`, relative to the root.
    fn get_directories(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Join a package file path onto `directory`, refusing paths that escape it.
pub fn resolve_file_path(directory: &Path, package_path: &str) -> Result<PathBuf> {
    let relative = normalize_path(Path::new(package_path));
    let escapes = match relative.components().next() {
        None => true,
        Some(Component::Normal(_)) => false,
        Some(_) => true,
    };
    if escapes {
        return Err(PackageError::FileSystem {
            path: directory.join(package_path),
            source: anyhow::anyhow!("'{}' escapes the target directory", package_path),
        });
    }
    Ok(directory.join(relative))
}

/// Write every file below `directory`. Existing files are overwritten.
pub fn add_files<'a, F, I>(fs: &F, files: I, directory: &Path) -> Result<()>
where
    F: FileSystem + ?Sized,
    I: IntoIterator<Item = &'a PackageFile>,
{
    for file in files {
        let path = resolve_file_path(directory, &file.path)?;
        debug!("Adding file {:?}", path);
        fs.add_file(&path, &mut file.contents.as_slice())?;
    }
    Ok(())
}

/// Delete every file below `directory`, then prune directories left empty.
///
/// A file whose content no longer matches the package's copy was edited after
/// install; it is left in place with a warning.
pub fn delete_files<'a, F, I>(fs: &F, files: I, directory: &Path) -> Result<()>
where
    F: FileSystem + ?Sized,
    I: IntoIterator<Item = &'a PackageFile>,
{
    let mut touched = BTreeSet::new();

    for file in files {
        let path = resolve_file_path(directory, &file.path)?;
        if let Some(parent) = path.parent() {
            touched.insert(parent.to_path_buf());
        }

        if !fs.file_exists(&path) {
            continue;
        }

        let on_disk = fs.read_file(&path)?;
        if on_disk != file.contents {
            warn!("Skipping {:?} because it was modified", path);
            continue;
        }

        fs.delete_file(&path)?;
        debug!("Removed file {:?}", path);
    }

    prune_empty_directories(fs, touched, directory)
}

/// Remove each directory (and its now-empty ancestors up to and including
/// `stop_at`) if it holds nothing.
pub fn prune_empty_directories<F, I>(fs: &F, directories: I, stop_at: &Path) -> Result<()>
where
    F: FileSystem + ?Sized,
    I: IntoIterator<Item = PathBuf>,
{
    let mut candidates = BTreeSet::new();
    for directory in directories {
        let mut current = Some(directory.as_path());
        while let Some(dir) = current {
            if !is_path_under(dir, stop_at) {
                break;
            }
            candidates.insert(dir.to_path_buf());
            if dir == stop_at {
                break;
            }
            current = dir.parent();
        }
    }

    // Deepest first so parents see their children already gone
    let mut ordered: Vec<PathBuf> = candidates.into_iter().collect();
    ordered.sort_by_key(|p| std::cmp::Reverse(p.components().count()));

    for dir in ordered {
        if dir.as_os_str().is_empty() || !fs.directory_exists(&dir) {
            continue;
        }
        if fs.get_files(&dir, "*", false)?.is_empty() && fs.get_directories(&dir)?.is_empty() {
            fs.delete_directory(&dir, false)?;
            info!("Removed folder {:?}", dir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RealRuntime;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_file_path_rejects_escape() {
        let dir = Path::new("A.1.0");
        assert_eq!(
            resolve_file_path(dir, "content/readme.txt").unwrap(),
            PathBuf::from("A.1.0/content/readme.txt")
        );
        let err = resolve_file_path(dir, "../B.1.0/evil.txt").unwrap_err();
        assert!(err.is_file_system());
        assert!(resolve_file_path(dir, ".").is_err());
        assert!(resolve_file_path(Path::new(""), "../outside.txt").is_err());
        assert!(resolve_file_path(Path::new(""), "/etc/passwd").is_err());
    }

    #[test]
    fn test_add_then_delete_files_prunes_directories() {
        let runtime = RealRuntime;
        let tmp = tempdir().unwrap();
        let fs = PhysicalFileSystem::new(&runtime, tmp.path().to_path_buf());

        let files = vec![
            PackageFile::new("content/scripts/a.js", "a"),
            PackageFile::new("lib/net40/a.dll", "dll"),
        ];
        add_files(&fs, &files, Path::new("A.1.0")).unwrap();
        assert!(tmp.path().join("A.1.0/content/scripts/a.js").exists());

        delete_files(&fs, &files, Path::new("A.1.0")).unwrap();
        assert!(!tmp.path().join("A.1.0").exists());
    }

    #[test]
    fn test_delete_files_keeps_modified_file() {
        let runtime = RealRuntime;
        let tmp = tempdir().unwrap();
        let fs = PhysicalFileSystem::new(&runtime, tmp.path().to_path_buf());

        let files = vec![
            PackageFile::new("content/a.txt", "original"),
            PackageFile::new("content/b.txt", "b"),
        ];
        add_files(&fs, &files, Path::new("A.1.0")).unwrap();
        std::fs::write(tmp.path().join("A.1.0/content/a.txt"), "edited").unwrap();

        delete_files(&fs, &files, Path::new("A.1.0")).unwrap();

        assert!(tmp.path().join("A.1.0/content/a.txt").exists());
        assert!(!tmp.path().join("A.1.0/content/b.txt").exists());
    }

    #[test]
    fn test_delete_files_ignores_missing() {
        let runtime = RealRuntime;
        let tmp = tempdir().unwrap();
        let fs = PhysicalFileSystem::new(&runtime, tmp.path().to_path_buf());

        let files = vec![PackageFile::new("content/gone.txt", "x")];
        delete_files(&fs, &files, Path::new("A.1.0")).unwrap();
    }
}
