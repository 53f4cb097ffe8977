use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::app::Result;

/// Write-through blob store for the persistent collections.
///
/// Each collection lives in its own named blob (`{name}.json` under the data
/// directory), serialized in full after every mutation. Loading never fails:
/// an absent or unparsable blob yields the collection's default value, so a
/// corrupted file degrades to an empty collection instead of an error.
pub struct JsonStore {
    backend: Backend,
}

enum Backend {
    Dir(PathBuf),
    Memory(Mutex<HashMap<String, String>>),
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            backend: Backend::Dir(dir.as_ref().to_path_buf()),
        })
    }

    /// A store backed by a plain map, for tests and ephemeral sessions.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(HashMap::new())),
        }
    }

    /// Load the named collection, substituting the default on any failure.
    pub fn load<T>(&self, name: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match &self.backend {
            Backend::Dir(dir) => {
                let path = Self::blob_path(dir, name);
                if !path.exists() {
                    return T::default();
                }
                match fs::read_to_string(&path) {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(collection = name, error = %e, "failed to read collection, starting empty");
                        return T::default();
                    }
                }
            }
            Backend::Memory(map) => {
                let map = map.lock().unwrap_or_else(|e| e.into_inner());
                match map.get(name) {
                    Some(raw) => raw.clone(),
                    None => return T::default(),
                }
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(collection = name, error = %e, "malformed collection, starting empty");
                T::default()
            }
        }
    }

    /// Overwrite the named collection with a full serialization of `value`.
    pub fn save<T>(&self, name: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string_pretty(value)?;

        match &self.backend {
            Backend::Dir(dir) => fs::write(Self::blob_path(dir, name), raw)?,
            Backend::Memory(map) => {
                map.lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(name.to_string(), raw);
            }
        }

        Ok(())
    }

    fn blob_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.json"))
    }
}
