use std::env;
use std::path::Path;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{JavaError, Result};
use crate::java::Java;

/// Names the JDK installation on platforms that do not bundle the compiler
/// toolchain with their standard JVM distribution.
pub const JAVA_HOME_VAR: &str = "JAVA_HOME";

/// VM options, whitespace-separated. The second name is tried when the
/// first is unset; both absent means no options.
pub const JAVA_OPTS_VAR: &str = "JAVA_OPTS";
pub const JAVA_OPTIONS_VAR: &str = "JAVA_OPTIONS";

/// Separator between classpath entries handed to the VM.
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// The one-shot bootstrap state machine: `NotLoaded -> Loaded`, exactly
/// once, irreversibly. The whole sequence runs under one lock so two
/// threads cannot race into the native VM-boot call.
///
/// If a step fails the state stays `NotLoaded`, but side effects already
/// taken (registry mutation, files materialized by the resolver) are not
/// rolled back. A retried load in the same process is not guaranteed safe;
/// treat a mid-bootstrap failure as fatal.
pub struct Loader {
    loaded: Mutex<bool>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            loaded: Mutex::new(false),
        }
    }

    pub fn loaded(&self) -> bool {
        *self.loaded.lock()
    }

    /// Boot the VM over everything accumulated in the classpath registry.
    /// Idempotent: once `Loaded`, further calls return immediately and the
    /// native layer is never touched again.
    pub fn load(&self, java: &Java) -> Result<()> {
        let mut loaded = self.loaded.lock();

        if *loaded {
            return Ok(());
        }

        // macOS historically ships tools.jar's contents inside its bundled
        // JVM, so only the other platforms need a JDK pointed at.
        if !cfg!(target_os = "macos") {
            let home = env::var(JAVA_HOME_VAR).map_err(|_| {
                JavaError::Configuration(format!(
                    "are we forgetting something? {} not set",
                    JAVA_HOME_VAR
                ))
            })?;

            let tools = Path::new(&home).join("lib").join("tools.jar");
            if !tools.exists() {
                return Err(JavaError::MissingDependency(format!(
                    "tools.jar is needed to compile, can't find it in {}/lib",
                    home
                )));
            }

            java.classpath().append(tools);
        }

        let mut paths = vec![];
        for entry in java.classpath().snapshot() {
            let path = java.resolver.resolve(&entry)?;
            java.tracker.materialized(&path)?;
            paths.push(path);
        }

        let options = vm_options();
        let classpath = paths
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(&PATH_SEPARATOR.to_string());

        info!(
            "loading JVM: {} classpath entries, {} options",
            paths.len(),
            options.len()
        );

        java.bridge.boot(&classpath, &options)?;
        java.properties().import(java.bridge.as_ref())?;

        *loaded = true;
        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn vm_options() -> Vec<String> {
    let raw = env::var(JAVA_OPTS_VAR)
        .or_else(|_| env::var(JAVA_OPTIONS_VAR))
        .unwrap_or_default();

    debug!("vm options: `{}`", raw);

    raw.split_whitespace().map(str::to_string).collect()
}
