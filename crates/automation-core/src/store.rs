use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::Result;

/// Synchronous string persistence that survives process restarts.
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str, default: &str) -> String;
    fn put_string(&self, key: &str, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Process-local store, for hosts that persist elsewhere and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .lock()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    values: BTreeMap<String, String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// JSON file store. Every write replaces the file atomically via a tempfile
/// in the same directory.
pub struct FileStore {
    path: PathBuf,
    doc: Mutex<StoreDocument>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store; the file and
    /// its parent directories are created on the first write.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = if path.exists() {
            let data = std::fs::read_to_string(path)?;
            serde_json::from_str(&data)?
        } else {
            StoreDocument::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the store was last written, if ever.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.doc.lock().updated_at
    }
}

impl KeyValueStore for FileStore {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.doc
            .lock()
            .values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        let mut doc = self.doc.lock();
        // Memory only reflects what reached disk.
        let mut next = doc.clone();
        next.values.insert(key.to_string(), value.to_string());
        next.updated_at = Some(Utc::now());
        let data = serde_json::to_vec_pretty(&next)?;
        atomic_write(&self.path, &data)?;
        *doc = next;
        Ok(())
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
