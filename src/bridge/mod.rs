use std::fmt;
use std::sync::Arc;

use crate::error::Result;

pub mod native;

/// The raw class reference a bridge hands back from `import`. The native
/// bridge wraps a JNI global ref; substitute bridges carry the name alone.
#[derive(Clone)]
pub enum RawClass {
    Native(jni::objects::GlobalRef),
    Named(String),
}

/// An object reference that can be asked about class membership.
#[derive(Clone)]
pub enum RawObject {
    Native(jni::objects::GlobalRef),
    Named(String),
}

/// The native interop seam. One implementation talks JNI; tests substitute
/// their own to observe call counts and feed canned properties.
pub trait Bridge: Send + Sync {
    /// One-time VM initialization. Irreversible per process: a second call
    /// anywhere, through any path, must fail with `UnsupportedOperation`
    /// rather than touch the native layer again.
    fn boot(&self, classpath: &str, options: &[String]) -> Result<()>;

    /// Resolve a fully-qualified dotted name to a class reference.
    fn import(&self, class_name: &str) -> Result<RawClass>;

    fn is_instance(&self, class: &RawClass, object: &RawObject) -> Result<bool>;

    /// Enumerate the running VM's system properties as name/value pairs.
    fn system_properties(&self) -> Result<Vec<(String, String)>>;
}

struct ClassInner {
    name: String,
    raw: RawClass,
    bridge: Arc<dyn Bridge>,
}

/// A resolved, cached class. Cheap to clone; two handles compare equal only
/// when they came from the same cache entry.
#[derive(Clone)]
pub struct ClassHandle {
    inner: Arc<ClassInner>,
}

impl ClassHandle {
    pub(crate) fn new(name: String, raw: RawClass, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            inner: Arc::new(ClassInner { name, raw, bridge }),
        }
    }

    /// The fully-qualified dotted name this handle was imported under.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn raw(&self) -> &RawClass {
        &self.inner.raw
    }

    /// Capability proxy over the native "is instance" check.
    pub fn is_instance(&self, object: &JavaObject) -> Result<bool> {
        self.inner.bridge.is_instance(&self.inner.raw, &object.raw)
    }
}

impl PartialEq for ClassHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ClassHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHandle")
            .field("name", &self.inner.name)
            .finish()
    }
}

pub struct JavaObject {
    raw: RawObject,
}

impl JavaObject {
    /// Wrap a live JNI reference.
    pub fn from_global(global: jni::objects::GlobalRef) -> Self {
        Self {
            raw: RawObject::Native(global),
        }
    }

    /// A tagged stand-in object for substitute bridges.
    pub fn named(tag: impl Into<String>) -> Self {
        Self {
            raw: RawObject::Named(tag.into()),
        }
    }

    pub fn raw(&self) -> &RawObject {
        &self.raw
    }
}
