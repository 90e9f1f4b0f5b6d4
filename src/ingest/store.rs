// src/ingest/store.rs
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::cache::Snapshot;
use crate::error::PersistenceError;

#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist the whole snapshot (best effort; callers log failures).
    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;

    /// Last persisted snapshot, `None` if nothing was stored yet.
    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;
}

/// Pretty JSON on disk, replaced via write-to-temp + rename.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_err(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait::async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_err(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), "snapshot persisted");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let snapshot = serde_json::from_slice::<Snapshot>(&bytes)?;
        Ok(Some(snapshot))
    }
}

/// Load a snapshot for seeding the cache; errors are logged and mean "none".
pub async fn load_or_none(store: &dyn SnapshotStore) -> Option<Snapshot> {
    match store.load().await {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable persisted snapshot");
            None
        }
    }
}

// --- Test helper ---
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Snapshot>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let s = Self::new();
        *s.lock() = Some(snapshot);
        s
    }

    /// Make every following `save` fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn stored(&self) -> Option<Snapshot> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Snapshot>> {
        self.slot.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("memory store set to fail".into()));
        }
        *self.lock() = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(self.stored())
    }
}
