//! Package dependencies and the rule for picking the package that satisfies one.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Package, VersionSpec};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub id: String,
    #[serde(rename = "version", default, skip_serializing_if = "Option::is_none")]
    pub version_spec: Option<VersionSpec>,
}

impl PackageDependency {
    pub fn new(id: impl Into<String>, version_spec: Option<VersionSpec>) -> Self {
        Self {
            id: id.into(),
            version_spec,
        }
    }

    pub fn is_satisfied_by(&self, package: &Package) -> bool {
        package.id().eq_ignore_ascii_case(&self.id)
            && self
                .version_spec
                .as_ref()
                .is_none_or(|spec| spec.satisfies(package.version()))
    }
}

impl fmt::Display for PackageDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version_spec {
            Some(spec) => write!(f, "{} ({})", self.id, spec.describe()),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Dependency resolution policy - pure functions over candidate packages.
pub struct DependencyResolver;

impl DependencyResolver {
    /// Pick the package satisfying `dependency` among `candidates`.
    ///
    /// With a lower bound the lowest acceptable version wins. Without one
    /// (no spec, or only a maximum) the highest acceptable version wins.
    pub fn select<I>(candidates: I, dependency: &PackageDependency) -> Option<Arc<Package>>
    where
        I: IntoIterator<Item = Arc<Package>>,
    {
        let matching = candidates
            .into_iter()
            .filter(|p| dependency.is_satisfied_by(p));

        let prefer_lowest = dependency
            .version_spec
            .as_ref()
            .is_some_and(VersionSpec::has_lower_bound);

        if prefer_lowest {
            matching.min_by(|a, b| a.version().cmp(b.version()))
        } else {
            matching.max_by(|a, b| a.version().cmp(b.version()))
        }
    }
}
