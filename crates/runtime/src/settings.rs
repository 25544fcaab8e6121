use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::{debug, warn};
use serde_json::{Map, Value};

/// Read-only key/value access to user configuration.
///
/// Reads are synchronous and never fail; a missing key yields `None` and the
/// caller applies its default.
pub trait ConfigSource: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
}

/// JSON-object backed settings store.
///
/// Values can be replaced wholesale at run time (configuration changed events)
/// or re-read from the file they were loaded from.
#[derive(Debug, Default)]
pub struct Settings {
    path: Option<PathBuf>,
    values: RwLock<Map<String, Value>>,
}

impl Settings {
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            path: None,
            values: RwLock::new(values),
        }
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields empty settings; unreadable or malformed files are
    /// logged and treated the same way.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_settings_file(&path).unwrap_or_default();

        Self {
            path: Some(path),
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.write().insert(key.into(), value);
    }

    pub fn replace(&self, values: Map<String, Value>) {
        *self.write() = values;
    }

    /// Re-read the backing file. Settings without a file are left untouched.
    pub fn reload(&self) {
        if let Some(path) = &self.path {
            let values = read_settings_file(path).unwrap_or_default();
            self.replace(values);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.values.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.values.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigSource for Settings {
    fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }
}

fn read_settings_file(path: &Path) -> Option<Map<String, Value>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No settings file at {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Failed to read settings from {}: {e}", path.display());
            return None;
        }
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            warn!("Settings file {} is not a JSON object", path.display());
            None
        }
        Err(e) => {
            warn!("Malformed settings file {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
