//! Projects that reference packages: content files, assembly references and
//! the `.pp`/`.transform` file handlers.

mod physical;
pub mod preprocessor;
pub mod transform;
pub mod xml;

use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::error::{PackageError, Result};
use crate::filesystem::{FileSystem, prune_empty_directories, resolve_file_path};
use crate::package::{FrameworkName, Package, PackageFile};
use preprocessor::PREPROCESS_EXTENSION;
use transform::TRANSFORM_EXTENSION;

pub use physical::{PROJECT_FILE_NAME, PhysicalProjectSystem};

/// A project on disk that packages add content and references to.
///
/// File operations are relative to the project root.
pub trait ProjectSystem: FileSystem {
    fn project_name(&self) -> &str;
    fn target_framework(&self) -> Option<&FrameworkName>;

    /// Value used for a `$name$` token. Names are case-insensitive.
    fn property_value(&self, name: &str) -> Option<String>;

    fn reference_exists(&self, name: &str) -> bool;
    fn add_reference(&mut self, name: &str, path: &Path) -> Result<()>;
    fn remove_reference(&mut self, name: &str) -> Result<()>;
}

enum ContentKind {
    Plain,
    Preprocessed,
    Transform,
}

/// Split a content path into its handler and the project path it writes.
fn classify(relative: &str) -> (ContentKind, &str) {
    if let Some(target) = relative.strip_suffix(PREPROCESS_EXTENSION) {
        (ContentKind::Preprocessed, target)
    } else if let Some(target) = relative.strip_suffix(TRANSFORM_EXTENSION) {
        (ContentKind::Transform, target)
    } else {
        (ContentKind::Plain, relative)
    }
}

fn preprocess<P: ProjectSystem + ?Sized>(project: &P, file: &PackageFile) -> Result<String> {
    let text = String::from_utf8_lossy(&file.contents);
    preprocessor::process(&text, |name| project.property_value(name))
}

/// Copy a package's `content/` files into the project.
///
/// Plain files that already exist are left alone. `.pp` files are written with
/// their tokens replaced and `.transform` files are merged into their target.
pub fn add_content<P: ProjectSystem + ?Sized>(project: &P, package: &Package) -> Result<()> {
    for (relative, file) in package.content_files() {
        let (kind, target) = classify(relative);
        let target = resolve_file_path(Path::new(""), target)?;

        match kind {
            ContentKind::Transform => transform::apply(project, &target, &file.contents)?,
            ContentKind::Preprocessed => {
                if project.file_exists(&target) {
                    info!("{:?} already exists, skipping", target);
                    continue;
                }
                let text = preprocess(project, file)?;
                project.add_file(&target, &mut text.as_bytes())?;
                debug!("Added file {:?}", target);
            }
            ContentKind::Plain => {
                if project.file_exists(&target) {
                    info!("{:?} already exists, skipping", target);
                    continue;
                }
                project.add_file(&target, &mut file.contents.as_slice())?;
                debug!("Added file {:?}", target);
            }
        }
    }
    Ok(())
}

/// Take a package's content back out of the project.
///
/// `others` are the packages that stay referenced: a file one of them also
/// ships is kept, and their transform fragments stay merged. Files edited
/// since they were added are kept with a warning.
pub fn remove_content<P: ProjectSystem + ?Sized>(
    project: &P,
    package: &Package,
    others: &[Arc<Package>],
) -> Result<()> {
    let shared: HashSet<&str> = others
        .iter()
        .flat_map(|other| other.content_files().map(|(relative, _)| relative))
        .collect();

    let mut touched = BTreeSet::new();

    for (relative, file) in package.content_files() {
        let (kind, target) = classify(relative);
        let target = resolve_file_path(Path::new(""), target)?;
        if let Some(parent) = target.parent() {
            touched.insert(parent.to_path_buf());
        }

        match kind {
            ContentKind::Transform => {
                let fragments: Vec<&[u8]> = others
                    .iter()
                    .flat_map(|other| other.content_files())
                    .filter(|(other_relative, _)| *other_relative == relative)
                    .map(|(_, other_file)| other_file.contents.as_slice())
                    .collect();
                transform::revert(project, &target, &file.contents, &fragments)?;
            }
            ContentKind::Preprocessed => {
                if shared.contains(relative) || !project.file_exists(&target) {
                    continue;
                }
                let expected = match preprocess(project, file) {
                    Ok(text) => text.into_bytes(),
                    Err(e) => {
                        warn!("Skipping {:?}: {}", target, e);
                        continue;
                    }
                };
                delete_if_unmodified(project, &target, &expected)?;
            }
            ContentKind::Plain => {
                if shared.contains(relative) || !project.file_exists(&target) {
                    continue;
                }
                delete_if_unmodified(project, &target, &file.contents)?;
            }
        }
    }

    prune_empty_directories(project, touched, Path::new(""))
}

fn delete_if_unmodified<P: ProjectSystem + ?Sized>(
    project: &P,
    target: &Path,
    expected: &[u8],
) -> Result<()> {
    if project.read_file(target)? != expected {
        warn!("Skipping {:?} because it was modified", target);
        return Ok(());
    }
    project.delete_file(target)?;
    debug!("Removed file {:?}", target);
    Ok(())
}

/// `(reference name, path inside the package)` for every assembly of
/// `package` the project can use.
///
/// Fails before touching the project when the package ships assemblies but
/// none fit the project's framework.
pub fn compatible_references<P: ProjectSystem + ?Sized>(
    project: &P,
    package: &Package,
) -> Result<Vec<(String, String)>> {
    let references = package.assembly_references();
    if references.is_empty() {
        return Ok(Vec::new());
    }

    let framework = project.target_framework();
    let selected = crate::package::compatible_assembly_references(framework, &references)
        .ok_or_else(|| PackageError::IncompatibleFramework {
            framework: framework.map(|f| f.to_string()).unwrap_or_default(),
        })?;

    Ok(selected
        .into_iter()
        .map(|r| (r.name.clone(), r.path.clone()))
        .collect())
}
