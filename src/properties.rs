use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::bridge::Bridge;
use crate::error::Result;

/// The post-boot snapshot of JVM system properties, the host-side analogue
/// of `java.lang.System.getProperties`. Written once, immediately after a
/// successful bootstrap; later JVM-side changes are not observed.
pub struct PropertyTable {
    values: RwLock<HashMap<String, String>>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn import(&self, bridge: &dyn Bridge) -> Result<()> {
        let pairs = bridge.system_properties()?;
        debug!("imported {} system properties", pairs.len());

        let mut values = self.values.write();
        for (name, value) in pairs {
            values.insert(name, value);
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().clone()
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::new()
    }
}
