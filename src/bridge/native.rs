use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::anyhow;
use jni::objects::{JClass, JObject, JString, JValue};
use jni::{InitArgsBuilder, JNIVersion, JavaVM};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::bridge::{Bridge, RawClass, RawObject};
use crate::error::{JavaError, Result};

// The JNI invocation API refuses to create a second VM in the same process,
// and crashes on some platforms if you try. This guard turns that into a
// deterministic error before the native layer is ever reached.
static VM_CREATED: AtomicBool = AtomicBool::new(false);

/// Bridge over the JNI invocation API. Holds no VM until `boot` succeeds.
pub struct NativeBridge {
    vm: RwLock<Option<JavaVM>>,
}

impl NativeBridge {
    pub fn new() -> Self {
        Self {
            vm: RwLock::new(None),
        }
    }
}

impl Default for NativeBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge for NativeBridge {
    fn boot(&self, classpath: &str, options: &[String]) -> Result<()> {
        if VM_CREATED.swap(true, Ordering::SeqCst) {
            return Err(JavaError::UnsupportedOperation);
        }

        info!("booting JVM with classpath `{}`", classpath);

        let classpath_opt = format!("-Djava.class.path={}", classpath);
        let mut args = InitArgsBuilder::new()
            .version(JNIVersion::V8)
            .option(classpath_opt.as_str());

        for option in options {
            debug!("vm option `{}`", option);
            args = args.option(option.as_str());
        }

        let args = args.build().map_err(|e| anyhow!(e))?;
        let vm = JavaVM::new(args).map_err(|e| anyhow!(e))?;

        *self.vm.write() = Some(vm);
        Ok(())
    }

    fn import(&self, class_name: &str) -> Result<RawClass> {
        let guard = self.vm.read();
        let vm = guard
            .as_ref()
            .ok_or_else(|| JavaError::Bridge(anyhow!("import before the JVM was booted")))?;

        let mut env = vm.attach_current_thread().map_err(anyhow::Error::from)?;

        // JNI wants the internal form, slashes not dots
        let internal = class_name.replace('.', "/");

        match env.find_class(internal.as_str()) {
            Ok(class) => {
                debug!("imported `{}`", class_name);
                let global = env.new_global_ref(&class).map_err(anyhow::Error::from)?;
                Ok(RawClass::Native(global))
            }
            Err(_) => {
                // find_class leaves a pending ClassNotFoundException behind
                let _ = env.exception_clear();
                Err(JavaError::ClassNotFound(class_name.to_string()))
            }
        }
    }

    fn is_instance(&self, class: &RawClass, object: &RawObject) -> Result<bool> {
        let (class, object) = match (class, object) {
            (RawClass::Native(class), RawObject::Native(object)) => (class, object),
            _ => {
                return Err(JavaError::Bridge(anyhow!(
                    "native bridge handed a non-native reference"
                )))
            }
        };

        let guard = self.vm.read();
        let vm = guard
            .as_ref()
            .ok_or_else(|| JavaError::Bridge(anyhow!("is_instance before the JVM was booted")))?;

        let mut env = vm.attach_current_thread().map_err(anyhow::Error::from)?;

        let class_local = env.new_local_ref(class).map_err(anyhow::Error::from)?;
        let result = env
            .is_instance_of(object, JClass::from(class_local))
            .map_err(anyhow::Error::from)?;

        Ok(result)
    }

    fn system_properties(&self) -> Result<Vec<(String, String)>> {
        let guard = self.vm.read();
        let vm = guard.as_ref().ok_or_else(|| {
            JavaError::Bridge(anyhow!("system_properties before the JVM was booted"))
        })?;

        let mut env = vm.attach_current_thread().map_err(anyhow::Error::from)?;

        let properties = env
            .call_static_method(
                "java/lang/System",
                "getProperties",
                "()Ljava/util/Properties;",
                &[],
            )
            .and_then(|v| v.l())
            .map_err(anyhow::Error::from)?;

        let names = env
            .call_method(&properties, "propertyNames", "()Ljava/util/Enumeration;", &[])
            .and_then(|v| v.l())
            .map_err(anyhow::Error::from)?;

        let mut pairs = vec![];

        loop {
            let has_more = env
                .call_method(&names, "hasMoreElements", "()Z", &[])
                .and_then(|v| v.z())
                .map_err(anyhow::Error::from)?;

            if !has_more {
                break;
            }

            let name = env
                .call_method(&names, "nextElement", "()Ljava/lang/Object;", &[])
                .and_then(|v| v.l())
                .map_err(anyhow::Error::from)?;
            let name = JString::from(name);
            let name_ref: &JObject = &name;

            let value = env
                .call_method(
                    &properties,
                    "getProperty",
                    "(Ljava/lang/String;)Ljava/lang/String;",
                    &[JValue::Object(name_ref)],
                )
                .and_then(|v| v.l())
                .map_err(anyhow::Error::from)?;

            let name: String = env.get_string(&name).map_err(anyhow::Error::from)?.into();

            if value.as_raw().is_null() {
                continue;
            }

            let value = JString::from(value);
            let value: String = env.get_string(&value).map_err(anyhow::Error::from)?.into();

            pairs.push((name, value));
        }

        Ok(pairs)
    }
}
