//! `.transform` content files: XML fragments merged into a project file.

use std::path::Path;

use log::debug;

use super::xml::Element;
use crate::error::{PackageError, Result};
use crate::filesystem::FileSystem;

pub const TRANSFORM_EXTENSION: &str = ".transform";

fn invalid(path: &Path) -> impl Fn(anyhow::Error) -> PackageError + '_ {
    move |e| PackageError::InvalidTransform {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

fn parse(path: &Path, bytes: &[u8]) -> Result<Element> {
    let text = std::str::from_utf8(bytes).map_err(|e| invalid(path)(e.into()))?;
    Element::parse(text).map_err(invalid(path))
}

fn write<F: FileSystem + ?Sized>(fs: &F, path: &Path, document: &Element) -> Result<()> {
    let bytes = document.to_document().map_err(invalid(path))?;
    fs.add_file(path, &mut bytes.as_slice())
}

/// Merge `fragment` into the XML file at `target`, creating it if needed.
pub fn apply<F: FileSystem + ?Sized>(fs: &F, target: &Path, fragment: &[u8]) -> Result<()> {
    let fragment = parse(target, fragment)?;

    let mut document = if fs.file_exists(target) {
        parse(target, &fs.read_file(target)?)?
    } else {
        Element::new(fragment.name.clone())
    };

    if document.name != fragment.name {
        return Err(PackageError::InvalidTransform {
            path: target.to_path_buf(),
            reason: format!(
                "root element '{}' does not match '{}'",
                fragment.name, document.name
            ),
        });
    }

    document.merge_with(&fragment);
    debug!("Applied transform to {:?}", target);
    write(fs, target, &document)
}

/// Take back what `fragment` added to `target`, keeping whatever one of
/// `others` (fragments of packages still referenced) also contributes.
pub fn revert<F: FileSystem + ?Sized>(
    fs: &F,
    target: &Path,
    fragment: &[u8],
    others: &[&[u8]],
) -> Result<()> {
    if !fs.file_exists(target) {
        return Ok(());
    }

    let mut own = parse(target, fragment)?;
    let mut still_needed = Element::new(own.name.clone());
    for other in others {
        still_needed.merge_with(&parse(target, other)?);
    }
    own.except(&still_needed);

    let mut document = parse(target, &fs.read_file(target)?)?;
    if document.name != own.name {
        return Ok(());
    }
    document.except(&own);
    debug!("Reverted transform on {:?}", target);
    write(fs, target, &document)
}
