use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

/// Find all package manifests below a repository root
///
/// Directory structure: `<root>/<Id>.<Version>/<Id>.<Version>.json`
#[tracing::instrument(skip(runtime, root))]
pub fn find_all_manifests<R: Runtime>(runtime: &R, root: &Path) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();

    if !runtime.exists(root) {
        return Ok(manifests);
    }

    for package_dir in runtime.read_dir(root)? {
        if !runtime.is_dir(&package_dir) {
            continue;
        }
        let Some(name) = package_dir.file_name() else {
            continue;
        };
        let manifest = package_dir.join(format!("{}.json", name.to_string_lossy()));
        if runtime.exists(&manifest) {
            manifests.push(manifest);
        }
    }

    Ok(manifests)
}
