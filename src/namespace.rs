use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::bridge::ClassHandle;
use crate::error::{JavaError, Result};

/// A package prefix that has been traversed but not resolved to a class,
/// e.g. `java.lang`. Nodes are created lazily and live for the process.
#[derive(Debug)]
pub struct Namespace {
    name: String,
}

impl Namespace {
    fn new(name: String) -> Self {
        Self { name }
    }

    /// The full dotted name of this package prefix.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// What a traversal step produced: descend further, or stop at a class.
#[derive(Clone, Debug)]
pub enum Resolved {
    Package(Arc<Namespace>),
    Class(ClassHandle),
}

impl Resolved {
    pub fn as_package(&self) -> Option<&Arc<Namespace>> {
        match self {
            Resolved::Package(namespace) => Some(namespace),
            Resolved::Class(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassHandle> {
        match self {
            Resolved::Package(_) => None,
            Resolved::Class(handle) => Some(handle),
        }
    }
}

/// The process-lifetime memo tables behind dotted-name traversal. Nodes are
/// keyed by full dotted name, class bindings by canonical name. Entries are
/// inserted once and never removed.
pub struct NamespaceTable {
    nodes: RwLock<HashMap<String, Arc<Namespace>>>,
    bindings: RwLock<HashMap<String, ClassHandle>>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch or lazily create the node for a full dotted name. Repeated
    /// calls hand back the same instance.
    pub fn node(&self, full_name: &str) -> Arc<Namespace> {
        if let Some(node) = self.nodes.read().get(full_name) {
            return Arc::clone(node);
        }

        let mut nodes = self.nodes.write();
        Arc::clone(
            nodes
                .entry(full_name.to_string())
                .or_insert_with(|| Arc::new(Namespace::new(full_name.to_string()))),
        )
    }

    pub fn binding(&self, canonical: &str) -> Option<ClassHandle> {
        self.bindings.read().get(canonical).cloned()
    }

    /// Insert-if-absent. If another thread got there first, their handle
    /// wins and is returned, keeping one binding per canonical name.
    pub fn insert_binding(&self, canonical: String, handle: ClassHandle) -> ClassHandle {
        let mut bindings = self.bindings.write();
        bindings.entry(canonical).or_insert(handle).clone()
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The cache key for class bindings: every segment's first character
/// uppercased, then concatenated. `java.lang.String` -> `JavaLangString`.
pub fn canonical_name(dotted: &str) -> String {
    dotted
        .split('.')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Whether a traversal segment starts a class name rather than a package.
pub fn is_class_segment(segment: &str) -> bool {
    segment.chars().next().map_or(false, char::is_uppercase)
}

/// Traversal segments must be plain Java identifiers. Anything else is a
/// misuse of what is otherwise a pure accessor.
pub fn validate_segment(segment: &str) -> Result<()> {
    let mut chars = segment.chars();

    let valid = match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(JavaError::InvalidUsage(format!(
            "`{}` is not a valid package or class segment",
            segment
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_canonical_names() {
        assert_eq!(canonical_name("java.lang.String"), "JavaLangString");
        assert_eq!(canonical_name("java.lang"), "JavaLang");
        assert_eq!(canonical_name("com.sun.tools.javac.Main"), "ComSunToolsJavacMain");
        assert_eq!(canonical_name("String"), "String");
    }

    #[test]
    fn it_classifies_segments() {
        assert!(is_class_segment("String"));
        assert!(!is_class_segment("lang"));
        assert!(!is_class_segment(""));
    }

    #[test]
    fn it_validates_segments() {
        assert!(validate_segment("lang").is_ok());
        assert!(validate_segment("String").is_ok());
        assert!(validate_segment("_internal$1").is_ok());

        assert!(validate_segment("").is_err());
        assert!(validate_segment("1abc").is_err());
        assert!(validate_segment("foo(bar)").is_err());
        assert!(validate_segment("with space").is_err());
    }

    #[test]
    fn it_returns_the_same_node_instance() {
        let table = NamespaceTable::new();
        let first = table.node("java.lang");
        let second = table.node("java.lang");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "java.lang");
    }
}
