use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

pub const DEFAULT_ROOT: &str = "packages";

/// Locations every command works with.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Solution-wide repository of installed packages.
    pub root: PathBuf,
    /// Directory feed packages are installed from.
    pub source: Option<PathBuf>,
    /// Project that `add`, `remove` and `update` operate on.
    pub project: PathBuf,
}

impl Config {
    /// Resolve unset locations against the current directory.
    pub fn load<R: Runtime>(
        runtime: &R,
        root: Option<PathBuf>,
        source: Option<PathBuf>,
        project: Option<PathBuf>,
    ) -> Result<Self> {
        let current_dir = runtime
            .current_dir()
            .context("Could not determine the current directory")?;

        let config = Self {
            root: absolute(&current_dir, root.unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))),
            source: source.map(|path| absolute(&current_dir, path)),
            project: project
                .map(|path| absolute(&current_dir, path))
                .unwrap_or_else(|| current_dir.clone()),
        };
        debug!("Using {:?}", config);
        Ok(config)
    }

    pub fn source(&self) -> Result<&Path> {
        self.source
            .as_deref()
            .context("No package source configured. Use --source or set REFPACK_SOURCE")
    }
}

fn absolute(current_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        current_dir.join(path)
    }
}
