use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::artifact::{ArtifactResolver, LocalRepository, NoopTracker, TaskTracker};
use crate::bridge::native::NativeBridge;
use crate::bridge::{Bridge, ClassHandle};
use crate::classpath::Classpath;
use crate::error::{JavaError, Result};
use crate::loader::Loader;
use crate::namespace::{
    canonical_name, is_class_segment, validate_segment, Namespace, NamespaceTable, Resolved,
};
use crate::properties::PropertyTable;

lazy_static! {
    /// The process-wide context over the real JVM. Append to its classpath,
    /// then traverse; the first class resolution (or an explicit `load`)
    /// boots the VM.
    pub static ref JAVA: Java = Java::new();
}

/// Everything the embedding ties together: the classpath registry, the
/// bootstrap state machine, the traversal memo tables, the property
/// snapshot, and the seams to the native layer and the artifact subsystem.
pub struct Java {
    pub(crate) bridge: Arc<dyn Bridge>,
    pub(crate) resolver: Box<dyn ArtifactResolver>,
    pub(crate) tracker: Box<dyn TaskTracker>,
    classpath: Classpath,
    namespaces: NamespaceTable,
    properties: PropertyTable,
    loader: Loader,
}

impl Java {
    /// A context over the JNI bridge and a Maven-style local repository.
    pub fn new() -> Self {
        let repository = env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_default()
            .join(".m2")
            .join("repository");

        Self::with_collaborators(
            Arc::new(NativeBridge::new()),
            Box::new(LocalRepository::new(repository)),
            Box::new(NoopTracker),
        )
    }

    pub fn with_bridge(bridge: Arc<dyn Bridge>) -> Self {
        Self::with_collaborators(bridge, Box::new(LocalRepository::new("")), Box::new(NoopTracker))
    }

    pub fn with_collaborators(
        bridge: Arc<dyn Bridge>,
        resolver: Box<dyn ArtifactResolver>,
        tracker: Box<dyn TaskTracker>,
    ) -> Self {
        Self {
            bridge,
            resolver,
            tracker,
            classpath: Classpath::new(),
            namespaces: NamespaceTable::new(),
            properties: PropertyTable::new(),
            loader: Loader::new(),
        }
    }

    /// The classpath registry. Append entries before `load`; entries added
    /// once the VM is up are ignored by it.
    pub fn classpath(&self) -> &Classpath {
        &self.classpath
    }

    /// Boot the VM. Safe to call repeatedly; only the first call does work.
    pub fn load(&self) -> Result<()> {
        self.loader.load(self)
    }

    pub fn loaded(&self) -> bool {
        self.loader.loaded()
    }

    /// Walk a dotted name segment by segment. Lowercase-initial segments
    /// descend into (memoized) package nodes; an uppercase-initial segment
    /// imports the class named by the path so far, booting the VM first if
    /// nobody has. A class terminates the walk.
    pub fn resolve(&self, dotted: &str) -> Result<Resolved> {
        let mut prefix = String::new();
        let mut current = None;

        for segment in dotted.split('.') {
            if let Some(Resolved::Class(handle)) = &current {
                return Err(JavaError::InvalidUsage(format!(
                    "cannot traverse `{}` below class {}",
                    segment,
                    handle.name()
                )));
            }

            let resolved = self.step(&prefix, segment)?;

            prefix = match &resolved {
                Resolved::Package(namespace) => namespace.name().to_string(),
                Resolved::Class(handle) => handle.name().to_string(),
            };
            current = Some(resolved);
        }

        current.ok_or_else(|| JavaError::InvalidUsage("empty dotted name".to_string()))
    }

    /// Resolve one child of an already-traversed package node.
    pub fn child(&self, parent: &Namespace, segment: &str) -> Result<Resolved> {
        self.step(parent.name(), segment)
    }

    fn step(&self, prefix: &str, segment: &str) -> Result<Resolved> {
        validate_segment(segment)?;

        let full = if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", prefix, segment)
        };

        if !is_class_segment(segment) {
            return Ok(Resolved::Package(self.namespaces.node(&full)));
        }

        let canonical = canonical_name(&full);

        if let Some(handle) = self.namespaces.binding(&canonical) {
            return Ok(Resolved::Class(handle));
        }

        // importing needs a running VM
        self.load()?;

        let raw = self.bridge.import(&full)?;
        let handle = ClassHandle::new(full, raw, Arc::clone(&self.bridge));

        Ok(Resolved::Class(self.namespaces.insert_binding(canonical, handle)))
    }

    /// One JVM system property from the post-boot snapshot.
    pub fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }
}

impl Default for Java {
    fn default() -> Self {
        Self::new()
    }
}
