//! Result storage.
//!
//! The [`ResultStore`] keeps at most one [`ResultRecord`] per respondent and
//! persists the whole collection as a single JSON blob through a
//! [`BlobStore`]. There are no partial updates at the storage layer.

use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::error::QuizError;
use crate::model::ResultRecord;

/// Key the result collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "quizResults";

// ---------------------------------------------------------------------------
// Blob store trait
// ---------------------------------------------------------------------------

/// Key-value blob persistence.
pub trait BlobStore: Send + Sync {
    /// Read the blob under `key`, or `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, QuizError>;

    /// Replace the blob under `key`.
    fn write(&self, key: &str, blob: &[u8]) -> Result<(), QuizError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, QuizError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(QuizError::persistence(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, QuizError> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuizError::persistence(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn write(&self, key: &str, blob: &[u8]) -> Result<(), QuizError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename over it so readers never see a
        // half-written file.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(blob)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| {
            QuizError::persistence(format!("failed to write {}: {}", path.display(), e.error))
        })?;
        Ok(())
    }
}

/// In-memory blob store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob, e.g. to simulate previously persisted data.
    pub fn with_blob(key: &str, blob: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        if let Ok(mut blobs) = store.blobs.lock() {
            blobs.insert(key.to_string(), blob.into());
        }
        store
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, QuizError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| QuizError::persistence("blob store lock poisoned"))?;
        Ok(blobs.get(key).cloned())
    }

    fn write(&self, key: &str, blob: &[u8]) -> Result<(), QuizError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(QuizError::persistence("storage quota exceeded"));
        }
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| QuizError::persistence("blob store lock poisoned"))?;
        blobs.insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Result store
// ---------------------------------------------------------------------------

/// Durable collection of result records, one per respondent.
pub struct ResultStore {
    blobs: Box<dyn BlobStore>,
    key: String,
    records: Vec<ResultRecord>,
}

impl std::fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStore")
            .field("key", &self.key)
            .field("records", &self.records.len())
            .finish()
    }
}

impl ResultStore {
    /// Load the records stored under `key`. An absent key is an empty store.
    pub fn open(blobs: Box<dyn BlobStore>, key: impl Into<String>) -> Result<Self, QuizError> {
        let key = key.into();
        let records = match blobs.read(&key)? {
            Some(bytes) => serde_json::from_slice::<Vec<ResultRecord>>(&bytes)?,
            None => Vec::new(),
        };
        tracing::debug!(key = %key, records = records.len(), "opened result store");
        Ok(Self {
            blobs,
            key,
            records,
        })
    }

    /// Like [`ResultStore::open`], but falls back to an empty store when the
    /// blob cannot be read or parsed.
    pub fn open_or_empty(blobs: Box<dyn BlobStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let loaded = blobs
            .read(&key)
            .and_then(|blob| match blob {
                Some(bytes) => Ok(serde_json::from_slice::<Vec<ResultRecord>>(&bytes)?),
                None => Ok(Vec::new()),
            });
        let records = match loaded {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(key = %key, "starting with an empty result store: {e}");
                Vec::new()
            }
        };
        Self {
            blobs,
            key,
            records,
        }
    }

    /// Insert `record`, or replace the existing record with the same
    /// respondent id in place.
    ///
    /// The updated collection is written to the blob store before it is
    /// committed in memory; if the write fails the store is unchanged.
    pub fn upsert(&mut self, record: ResultRecord) -> Result<(), QuizError> {
        let mut next = self.records.clone();
        let replaced = match next
            .iter()
            .position(|r| r.respondent_id == record.respondent_id)
        {
            Some(i) => {
                next[i] = record;
                true
            }
            None => {
                next.push(record);
                false
            }
        };

        let blob = serde_json::to_vec(&next)?;
        self.blobs.write(&self.key, &blob)?;
        self.records = next;

        tracing::debug!(records = self.records.len(), replaced, "result store updated");
        Ok(())
    }

    /// All records in store order. Replacements keep their original slot.
    pub fn all(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn get(&self, respondent_id: &str) -> Option<&ResultRecord> {
        self.records.iter().find(|r| r.respondent_id == respondent_id)
    }

    /// Distinct group ids, sorted.
    pub fn groups_present(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.group_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}
