//! Embed a JVM and address its packages and classes by dotted name.
//!
//! The VM does not start when the process does. Callers first accumulate
//! classpath entries (paths or `group:artifactId:packaging:version`
//! coordinates), then either call [`Java::load`] or simply resolve a class,
//! which boots the VM over everything registered so far:
//!
//! ```no_run
//! use jvmlink::JAVA;
//!
//! JAVA.classpath().append("org.apache.ant:ant:jar:1.7.0");
//! JAVA.load()?;
//!
//! let string = JAVA.resolve("java.lang.String")?;
//! let version = JAVA.property("java.version");
//! # Ok::<(), jvmlink::JavaError>(())
//! ```
//!
//! The boot is one-shot and irreversible: the VM starts once per process
//! and cannot be restarted. Classpath entries appended after the boot are
//! ignored by the running VM.

pub mod artifact;
pub mod bridge;
pub mod classpath;
pub mod error;
pub mod java;
pub mod loader;
pub mod namespace;
pub mod properties;

pub use crate::bridge::{Bridge, ClassHandle, JavaObject, RawClass, RawObject};
pub use crate::classpath::{Classpath, Coordinate, Entry};
pub use crate::error::{JavaError, Result};
pub use crate::java::{Java, JAVA};
pub use crate::namespace::{Namespace, Resolved};
