use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use parking_lot::RwLock;

use crate::error::JavaError;

/// A `group:artifactId:packaging:version` dependency identifier, resolved
/// to a local file by the artifact collaborator at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub packaging: String,
    pub version: String,
}

impl FromStr for Coordinate {
    type Err = JavaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();

        match parts.as_slice() {
            [group, artifact, packaging, version]
                if !group.is_empty()
                    && !artifact.is_empty()
                    && !packaging.is_empty()
                    && !version.is_empty() =>
            {
                Ok(Self {
                    group: group.to_string(),
                    artifact: artifact.to_string(),
                    packaging: packaging.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(JavaError::InvalidUsage(format!(
                "`{}` is not a group:artifactId:packaging:version coordinate",
                s
            ))),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.group, self.artifact, self.packaging, self.version
        )
    }
}

/// One classpath entry, either a filesystem location or an artifact
/// coordinate. Strings with exactly three colons classify as coordinates,
/// everything else is taken as a path. The registry itself never checks
/// that either actually exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Path(PathBuf),
    Artifact(Coordinate),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Path(path) => write!(f, "{}", path.display()),
            Entry::Artifact(coordinate) => write!(f, "{}", coordinate),
        }
    }
}

impl From<&str> for Entry {
    fn from(s: &str) -> Self {
        match Coordinate::from_str(s) {
            Ok(coordinate) => Entry::Artifact(coordinate),
            Err(_) => Entry::Path(PathBuf::from(s)),
        }
    }
}

impl From<String> for Entry {
    fn from(s: String) -> Self {
        Entry::from(s.as_str())
    }
}

impl From<PathBuf> for Entry {
    fn from(path: PathBuf) -> Self {
        Entry::Path(path)
    }
}

impl From<Coordinate> for Entry {
    fn from(coordinate: Coordinate) -> Self {
        Entry::Artifact(coordinate)
    }
}

/// The ordered classpath registry. Append order is precedence order, and
/// duplicates are kept as-is. Entries appended after the VM has booted are
/// silently ignored by the already-running VM; that is a limitation of the
/// one-shot bootstrap, not an error.
pub struct Classpath {
    entries: RwLock<Vec<Entry>>,
}

impl Classpath {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(vec![]),
        }
    }

    pub fn append(&self, entry: impl Into<Entry>) {
        self.entries.write().push(entry.into());
    }

    /// A point-in-time copy, in append order.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for Classpath {
    fn default() -> Self {
        Self::new()
    }
}
