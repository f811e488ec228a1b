//! Difference tracker: reconciles session edits with the persisted collection.
//!
//! The tracker only remembers *which* objects were touched or deleted. Live
//! state is read from the scene at save time, after the baseline has been
//! downloaded, so the upload reflects the scene as it is at that moment.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::scene::{ObjectId, ObjectRecord, SceneStore};

use super::notifier::{Notifier, Severity, log_notifier};
use super::store::{FnStore, RecordStore};

/// Message sent to the notifier after a successful upload.
pub const UPLOAD_COMPLETE: &str = "upload complete";

/// Result of a save, for callers that care. Failures are already reported.
#[derive(Debug)]
pub enum SaveOutcome {
    Uploaded { records: usize },
    Failed(Error),
}

impl SaveOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, SaveOutcome::Uploaded { .. })
    }
}

/// Touched and deleted objects of one editing session.
pub struct DifferenceTracker {
    /// In enlistment order
    enlisted: IndexSet<ObjectId>,
    deleted: HashSet<ObjectId>,
    store: Option<Arc<dyn RecordStore>>,
    notifier: Notifier,
}

impl DifferenceTracker {
    pub fn new() -> Self {
        Self {
            enlisted: IndexSet::new(),
            deleted: HashSet::new(),
            store: None,
            notifier: log_notifier(),
        }
    }

    /// Use a pair of async closures as download/upload collaborators.
    pub fn set_save_load_fn<D, DF, U, UF>(&mut self, download: D, upload: U)
    where
        D: Fn() -> DF + Send + Sync + 'static,
        DF: Future<Output = Result<Vec<ObjectRecord>>> + Send + 'static,
        U: Fn(Vec<ObjectRecord>) -> UF + Send + Sync + 'static,
        UF: Future<Output = Result<()>> + Send + 'static,
    {
        self.store = Some(Arc::new(FnStore::new(download, upload)));
    }

    pub fn set_store(&mut self, store: Arc<dyn RecordStore>) {
        self.store = Some(store);
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.notifier = notifier;
    }

    /// Remember an object as touched. Idempotent.
    pub fn enlist(&mut self, id: &ObjectId) {
        if self.is_in_list(id) {
            return;
        }
        log::debug!("enlisted {}", id);
        self.enlisted.insert(id.clone());
    }

    pub fn is_in_list(&self, id: &ObjectId) -> bool {
        self.enlisted.contains(id)
    }

    /// Flag an object as deleted. Idempotent.
    pub fn remove(&mut self, id: &ObjectId) {
        self.deleted.insert(id.clone());
    }

    /// Clear the deletion flag. Idempotent.
    pub fn undo_remove(&mut self, id: &ObjectId) {
        self.deleted.remove(id);
    }

    pub fn is_deleted(&self, id: &ObjectId) -> bool {
        self.deleted.contains(id)
    }

    pub fn enlisted(&self) -> impl Iterator<Item = &ObjectId> + '_ {
        self.enlisted.iter()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    /// Forget all touched and deleted objects. Collaborators are kept.
    pub fn clear(&mut self) {
        self.enlisted.clear();
        self.deleted.clear();
    }

    /// Merge the session into the baseline and upload the result.
    ///
    /// Never fails outward: every error goes to the notifier and comes back
    /// as `SaveOutcome::Failed`. Tracked state is left as it was, so a failed
    /// save can simply be retried.
    pub async fn save(&mut self, scene: &SceneStore) -> SaveOutcome {
        match self.try_save(scene).await {
            Ok(records) => {
                log::info!("saved {} records", records);
                (self.notifier)(UPLOAD_COMPLETE, Severity::Success);
                SaveOutcome::Uploaded { records }
            }
            Err(e) => {
                log::error!("save failed: {}", e);
                (self.notifier)(&e.to_string(), Severity::Danger);
                SaveOutcome::Failed(e)
            }
        }
    }

    async fn try_save(&self, scene: &SceneStore) -> Result<usize> {
        let store = self
            .store
            .clone()
            .ok_or(Error::MissingCollaborator("record store"))?;

        let baseline = store.download().await?;
        if baseline.is_empty() {
            return Err(Error::EmptyBaseline);
        }

        let merged = self.reconcile(baseline, scene);
        let count = merged.len();
        store.upload(merged).await?;
        Ok(count)
    }

    /// Build the collection to upload from a baseline and the live scene.
    ///
    /// Untouched, undeleted baseline records pass through in order; touched
    /// objects are appended as fresh snapshots in enlistment order; deleted
    /// ids appear nowhere. A touched id missing from the scene keeps its
    /// baseline record.
    pub fn reconcile(&self, baseline: Vec<ObjectRecord>, scene: &SceneStore) -> Vec<ObjectRecord> {
        let mut snapshots: IndexMap<&ObjectId, ObjectRecord> = IndexMap::new();
        for id in self.enlisted.iter().filter(|id| !self.deleted.contains(*id)) {
            match scene.get(id) {
                Some(object) => {
                    snapshots.insert(id, object.snapshot());
                }
                None => log::warn!("enlisted object {} is not in the scene", id),
            }
        }

        let mut edited: Vec<ObjectRecord> = baseline
            .into_iter()
            .filter(|record| !snapshots.contains_key(&record.id) && !self.deleted.contains(&record.id))
            .collect();
        edited.extend(snapshots.into_values());
        edited
    }
}

impl Default for DifferenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
