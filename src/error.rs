use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Argument cannot be null or empty: {name}")]
    InvalidArgument { name: &'static str },

    #[error("'{value}' is not a valid version string")]
    InvalidVersion { value: String },

    #[error("'{value}' is not a valid version spec: {reason}")]
    InvalidVersionSpec { value: String, reason: String },

    #[error("Unable to find package '{id}'")]
    UnknownPackage { id: String },

    // Resolution errors
    #[error("Unable to resolve dependency '{dependency}'")]
    UnresolvedDependency { dependency: String },

    #[error("Circular dependency detected '{chain}'")]
    CircularDependency { chain: String },

    #[error(
        "Conflict occurred. '{installed}' referenced but requested '{requested}'. {} '{installed}'",
        dependents_clause(.dependents)
    )]
    DependencyConflict {
        installed: String,
        requested: String,
        dependents: Vec<String>,
    },

    #[error("Unable to uninstall '{package}' because {} it", dependents_clause(.dependents))]
    PackageHasDependents {
        package: String,
        dependents: Vec<String>,
    },

    #[error("Unable to locate dependency '{dependency}'. It may have been uninstalled")]
    MissingDependency { dependency: String },

    // Project errors
    #[error(
        "Unable to find assembly references that are compatible with the target framework '{framework}'"
    )]
    IncompatibleFramework { framework: String },

    #[error("Already referencing a newer version of '{id}'")]
    AlreadyNewerVersionReferenced { id: String },

    #[error("Project does not reference '{id}'")]
    PackageNotReferenced { id: String },

    #[error("The replacement token '{token}' has no value")]
    MissingTokenValue { token: String },

    #[error("Unable to apply transform to {path:?}: {reason}")]
    InvalidTransform { path: PathBuf, reason: String },

    #[error("Invalid package manifest {path:?}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    // Wraps the file system capability's failure; the path is the one being touched
    #[error("File system operation failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl PackageError {
    pub fn file_system(path: impl Into<PathBuf>) -> impl FnOnce(anyhow::Error) -> Self {
        let path = path.into();
        move |source| PackageError::FileSystem { path, source }
    }

    /// Whether the failure came from the file system rather than from resolution logic.
    pub fn is_file_system(&self) -> bool {
        matches!(self, PackageError::FileSystem { .. })
    }
}

fn dependents_clause(dependents: &[String]) -> String {
    match dependents {
        [single] => format!("'{}' depends on", single),
        many => format!("'{}' depend on", many.join(", ")),
    }
}

pub type Result<T> = std::result::Result<T, PackageError>;
