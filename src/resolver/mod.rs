//! Dependency resolution
//!
//! Walks package graphs to produce ordered install and uninstall plans. Both
//! walkers use an explicit frame stack instead of recursion, keep a visited set
//! for termination, and report cycles with the full chain of packages.

mod dependent_lookup;
mod install;
mod uninstall;

use std::sync::Arc;

use crate::package::Package;

pub use dependent_lookup::DependentLookup;
pub use install::{resolve_dependencies_for_install, resolve_dependencies_for_project_install};
pub use uninstall::{resolve_dependencies_for_replace, resolve_dependencies_for_uninstall};

/// A package being walked and the index of the next dependency to visit.
struct Frame {
    package: Arc<Package>,
    next_dependency: usize,
}

impl Frame {
    fn new(package: Arc<Package>) -> Self {
        Self {
            package,
            next_dependency: 0,
        }
    }
}

/// `A 1.0 => B 1.0 => A 1.0`
fn cycle_chain(stack: &[Frame], repeated: &Package) -> String {
    stack
        .iter()
        .map(|frame| frame.package.full_name())
        .chain(std::iter::once(repeated.full_name()))
        .collect::<Vec<_>>()
        .join(" => ")
}

fn on_path(stack: &[Frame], package: &Package) -> bool {
    stack.iter().any(|frame| frame.package.is_same_id(package.id()))
}
