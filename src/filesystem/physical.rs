use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::FileSystem;
use crate::error::{PackageError, Result};
use crate::runtime::{Runtime, relative_path_from_dir};

/// [`FileSystem`] rooted at a directory on disk, backed by a [`Runtime`].
pub struct PhysicalFileSystem<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> PhysicalFileSystem<'a, R> {
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    fn relative(&self, full: &Path) -> PathBuf {
        relative_path_from_dir(&self.root, full).unwrap_or_else(|| full.to_path_buf())
    }

    fn write_file(&self, full: &Path, contents: &mut dyn Read) -> anyhow::Result<()> {
        if let Some(parent) = full.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }
        let mut writer = self.runtime.create_file(full)?;
        std::io::copy(contents, &mut writer).context("Failed to write file contents")?;
        Ok(())
    }

    fn collect_files(
        &self,
        dir: &Path,
        pattern: &glob::Pattern,
        recursive: bool,
        found: &mut Vec<PathBuf>,
    ) -> Result<()> {
        let entries = self
            .runtime
            .read_dir(dir)
            .map_err(PackageError::file_system(dir))?;

        for entry in entries {
            if self.runtime.is_dir(&entry) {
                if recursive {
                    self.collect_files(&entry, pattern, recursive, found)?;
                }
                continue;
            }
            let matches = entry
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()));
            if matches {
                found.push(self.relative(&entry));
            }
        }
        Ok(())
    }
}

impl<R: Runtime> FileSystem for PhysicalFileSystem<'_, R> {
    fn root(&self) -> &Path {
        &self.root
    }

    fn file_exists(&self, path: &Path) -> bool {
        let full = self.full_path(path);
        self.runtime.exists(&full) && !self.runtime.is_dir(&full)
    }

    fn directory_exists(&self, path: &Path) -> bool {
        self.runtime.is_dir(&self.full_path(path))
    }

    #[tracing::instrument(skip(self, contents))]
    fn add_file(&self, path: &Path, contents: &mut dyn Read) -> Result<()> {
        let full = self.full_path(path);
        self.write_file(&full, contents)
            .map_err(PackageError::file_system(&full))
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let full = self.full_path(path);
        self.runtime
            .read(&full)
            .map_err(PackageError::file_system(&full))
    }

    #[tracing::instrument(skip(self))]
    fn delete_file(&self, path: &Path) -> Result<()> {
        let full = self.full_path(path);
        self.runtime
            .remove_file(&full)
            .map_err(PackageError::file_system(&full))
    }

    #[tracing::instrument(skip(self))]
    fn delete_directory(&self, path: &Path, recursive: bool) -> Result<()> {
        let full = self.full_path(path);
        let result = if recursive {
            self.runtime.remove_dir_all(&full)
        } else {
            self.runtime.remove_dir(&full)
        };
        result.map_err(PackageError::file_system(&full))
    }

    fn get_files(&self, path: &Path, filter: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        let full = self.full_path(path);
        if !self.runtime.is_dir(&full) {
            return Ok(Vec::new());
        }
        let pattern = glob::Pattern::new(filter)
            .map_err(|e| PackageError::file_system(&full)(anyhow::Error::new(e)))?;

        let mut found = Vec::new();
        self.collect_files(&full, &pattern, recursive, &mut found)?;
        Ok(found)
    }

    fn get_directories(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let full = self.full_path(path);
        if !self.runtime.is_dir(&full) {
            return Ok(Vec::new());
        }
        let entries = self
            .runtime
            .read_dir(&full)
            .map_err(PackageError::file_system(&full))?;
        Ok(entries
            .into_iter()
            .filter(|entry| self.runtime.is_dir(entry))
            .map(|entry| self.relative(&entry))
            .collect())
    }
}
