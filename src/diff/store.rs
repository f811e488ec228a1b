//! Persistence collaborators for the difference tracker.
//!
//! A store hands out the full baseline collection and accepts a full
//! replacement; partial uploads are not supported.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::scene::ObjectRecord;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Source and sink of the persisted record collection.
pub trait RecordStore: Send + Sync {
    /// Fetch the authoritative collection.
    fn download(&self) -> StoreFuture<'_, Vec<ObjectRecord>>;

    /// Replace the whole collection.
    fn upload(&self, records: Vec<ObjectRecord>) -> StoreFuture<'_, ()>;
}

/// Store built from a download closure and an upload closure.
pub struct FnStore<D, U> {
    download: D,
    upload: U,
}

impl<D, U> FnStore<D, U> {
    pub fn new(download: D, upload: U) -> Self {
        Self { download, upload }
    }
}

impl<D, DF, U, UF> RecordStore for FnStore<D, U>
where
    D: Fn() -> DF + Send + Sync,
    DF: Future<Output = Result<Vec<ObjectRecord>>> + Send + 'static,
    U: Fn(Vec<ObjectRecord>) -> UF + Send + Sync,
    UF: Future<Output = Result<()>> + Send + 'static,
{
    fn download(&self) -> StoreFuture<'_, Vec<ObjectRecord>> {
        Box::pin((self.download)())
    }

    fn upload(&self, records: Vec<ObjectRecord>) -> StoreFuture<'_, ()> {
        Box::pin((self.upload)(records))
    }
}

/// Collection kept as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Vec<ObjectRecord>> {
        let json = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&json)?)
    }

    async fn write(&self, records: Vec<ObjectRecord>) -> Result<()> {
        let json = serde_json::to_string_pretty(&records)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write aside, then swap in place
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        log::debug!("wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn download(&self) -> StoreFuture<'_, Vec<ObjectRecord>> {
        Box::pin(self.read())
    }

    fn upload(&self, records: Vec<ObjectRecord>) -> StoreFuture<'_, ()> {
        Box::pin(self.write(records))
    }
}

/// In-memory collection. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<ObjectRecord>>>,
    uploads: Arc<AtomicUsize>,
    fail_uploads: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new(records: Vec<ObjectRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            ..Default::default()
        }
    }

    /// Current contents.
    pub fn records(&self) -> Vec<ObjectRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of successful uploads.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    /// Make subsequent uploads fail, leaving the contents untouched.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }
}

impl RecordStore for MemoryStore {
    fn download(&self) -> StoreFuture<'_, Vec<ObjectRecord>> {
        let records = self.records();
        Box::pin(async move { Ok::<_, Error>(records) })
    }

    fn upload(&self, records: Vec<ObjectRecord>) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            if self.fail_uploads.load(Ordering::SeqCst) {
                return Err(Error::Store("upload rejected".into()));
            }
            let mut stored = self
                .records
                .lock()
                .map_err(|e| Error::Store(e.to_string()))?;
            *stored = records;
            drop(stored);
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok::<(), Error>(())
        })
    }
}
