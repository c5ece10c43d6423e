#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::{Mutex, MutexGuard};

use jvmlink::{Bridge, Java, JavaError, RawClass, RawObject, Result};

lazy_static! {
    static ref ENV_LOCK: Mutex<()> = Mutex::new(());
}

/// Tests that read or mutate process environment variables serialize on
/// this lock, since the test harness runs them on multiple threads.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock()
}

/// Point JAVA_HOME at a throwaway JDK layout containing lib/tools.jar.
/// Call with the env lock held.
pub fn install_fake_jdk(tag: &str) -> PathBuf {
    let home = env::temp_dir().join(format!("jvmlink-test-{}-{}", process::id(), tag));
    fs::create_dir_all(home.join("lib")).unwrap();
    fs::write(home.join("lib").join("tools.jar"), b"stub").unwrap();

    env::set_var("JAVA_HOME", &home);
    home
}

/// Call with the env lock held.
pub fn clear_vm_options() {
    env::remove_var("JAVA_OPTS");
    env::remove_var("JAVA_OPTIONS");
}

/// Substitute for the native layer: records every call, honors the
/// one-boot-per-bridge rule, and serves canned classes and properties.
pub struct RecordingBridge {
    booted: Mutex<bool>,
    boots: AtomicUsize,
    imports: Mutex<Vec<String>>,
    boot_classpath: Mutex<Option<String>>,
    boot_options: Mutex<Option<Vec<String>>>,
    classes: Vec<String>,
    properties: Vec<(String, String)>,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self {
            booted: Mutex::new(false),
            boots: AtomicUsize::new(0),
            imports: Mutex::new(vec![]),
            boot_classpath: Mutex::new(None),
            boot_options: Mutex::new(None),
            classes: vec!["java.lang.String".to_string(), "java.lang.System".to_string()],
            properties: vec![
                ("java.version".to_string(), "1.7.0".to_string()),
                ("java.class.version".to_string(), "51.0".to_string()),
            ],
        }
    }

    pub fn with_properties(mut self, properties: Vec<(String, String)>) -> Self {
        self.properties = properties;
        self
    }

    pub fn boots(&self) -> usize {
        self.boots.load(Ordering::SeqCst)
    }

    pub fn imports(&self) -> Vec<String> {
        self.imports.lock().clone()
    }

    pub fn boot_classpath(&self) -> Option<String> {
        self.boot_classpath.lock().clone()
    }

    pub fn boot_options(&self) -> Option<Vec<String>> {
        self.boot_options.lock().clone()
    }
}

impl Bridge for RecordingBridge {
    fn boot(&self, classpath: &str, options: &[String]) -> Result<()> {
        let mut booted = self.booted.lock();
        if *booted {
            return Err(JavaError::UnsupportedOperation);
        }

        *booted = true;
        self.boots.fetch_add(1, Ordering::SeqCst);
        *self.boot_classpath.lock() = Some(classpath.to_string());
        *self.boot_options.lock() = Some(options.to_vec());
        Ok(())
    }

    fn import(&self, class_name: &str) -> Result<RawClass> {
        self.imports.lock().push(class_name.to_string());

        if self.classes.iter().any(|c| c == class_name) {
            Ok(RawClass::Named(class_name.to_string()))
        } else {
            Err(JavaError::ClassNotFound(class_name.to_string()))
        }
    }

    fn is_instance(&self, class: &RawClass, object: &RawObject) -> Result<bool> {
        match (class, object) {
            (RawClass::Named(class), RawObject::Named(tag)) => Ok(class == tag),
            _ => Err(JavaError::Bridge(anyhow::anyhow!(
                "recording bridge handed a native reference"
            ))),
        }
    }

    fn system_properties(&self) -> Result<Vec<(String, String)>> {
        Ok(self.properties.clone())
    }
}

pub fn make_java(bridge: Arc<RecordingBridge>) -> Java {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Java::with_bridge(bridge)
}

/// Set up a sane environment and boot the context. Takes and releases the
/// env lock internally; use the pieces directly when a test needs custom
/// variables.
pub fn load_with_fake_jdk(java: &Java, tag: &str) -> Result<()> {
    let _env = env_lock();
    install_fake_jdk(tag);
    clear_vm_options();
    java.load()
}
