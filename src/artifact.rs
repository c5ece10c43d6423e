use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::classpath::Entry;

/// The artifact subsystem, from our side: hand it a registry entry, get a
/// local file back. Coordinate entries may cost network I/O; that is the
/// collaborator's business.
pub trait ArtifactResolver: Send + Sync {
    fn resolve(&self, entry: &Entry) -> Result<PathBuf>;
}

/// Build-task tracker hook. Every file the loader materializes on the
/// classpath is announced here so downstream tasks observe it.
pub trait TaskTracker: Send + Sync {
    fn materialized(&self, path: &Path) -> Result<()>;
}

/// Resolver over an already-populated local repository laid out
/// Maven-style: `<root>/group/as/dirs/artifact/version/artifact-version.pkg`.
/// Path entries pass straight through. No downloading happens here.
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactResolver for LocalRepository {
    fn resolve(&self, entry: &Entry) -> Result<PathBuf> {
        match entry {
            Entry::Path(path) => Ok(path.clone()),
            Entry::Artifact(coordinate) => {
                let mut path = self.root.clone();

                for part in coordinate.group.split('.') {
                    path.push(part);
                }

                path.push(&coordinate.artifact);
                path.push(&coordinate.version);
                path.push(format!(
                    "{}-{}.{}",
                    coordinate.artifact, coordinate.version, coordinate.packaging
                ));

                if !path.exists() {
                    return Err(anyhow!(
                        "artifact {} not present in local repository at {}",
                        coordinate,
                        path.display()
                    ));
                }

                debug!("resolved {} -> {}", coordinate, path.display());
                Ok(path)
            }
        }
    }
}

/// Tracker for hosts without a build-task system.
pub struct NoopTracker;

impl TaskTracker for NoopTracker {
    fn materialized(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
