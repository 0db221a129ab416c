//! # JSON Document Store
//!
//! In-memory document store with an optional JSON snapshot file.
//! The whole snapshot is rewritten after each mutation using a
//! write-temp-then-rename sequence, so a crash mid-write leaves the
//! previous snapshot intact. Snapshot writes are serialized, so
//! concurrent mutations cannot interleave in the file.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use hub_core::{doc_id, DocId, Document, HubError, HubResult, ID_FIELD};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::filter::{Filter, Sort, Update};
use crate::store::{
    DeleteResult, DocumentStore, InsertManyResult, InsertResult, UpdateResult,
};

type Collection = BTreeMap<DocId, Document>;

/// Document store backed by a single JSON snapshot file.
///
/// All operations take one lock over the full collection map, which is
/// what makes `update_one` atomic: no other operation can observe a
/// document between the filter check and the mutation.
#[derive(Debug)]
pub struct JsonStore {
    collections: RwLock<BTreeMap<String, Collection>>,
    snapshot_path: Option<PathBuf>,
    persist_lock: Mutex<()>,
}

impl JsonStore {
    /// Ephemeral store with no snapshot file
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
            snapshot_path: None,
            persist_lock: Mutex::new(()),
        }
    }

    /// Store backed by a JSON snapshot file. A missing file starts the
    /// store empty; an unreadable or corrupt file is an error rather
    /// than silent data loss.
    pub async fn open(path: impl Into<PathBuf>) -> HubResult<Self> {
        let path = path.into();
        let mut collections: BTreeMap<String, Collection> = BTreeMap::new();

        match fs::read_to_string(&path).await {
            Ok(content) => {
                let snapshot: BTreeMap<String, Vec<Document>> = serde_json::from_str(&content)
                    .map_err(|e| {
                        HubError::Store(format!("corrupt snapshot {}: {e}", path.display()))
                    })?;
                let mut total = 0usize;
                for (name, docs) in snapshot {
                    let entry = collections.entry(name).or_default();
                    for mut doc in docs {
                        let id = Self::ensure_id(&mut doc);
                        entry.insert(id, doc);
                        total += 1;
                    }
                }
                info!(path = %path.display(), documents = total, "loaded store snapshot");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no store snapshot yet, starting empty");
            }
            Err(e) => {
                return Err(HubError::Store(format!(
                    "failed to read snapshot {}: {e}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            collections: RwLock::new(collections),
            snapshot_path: Some(path),
            persist_lock: Mutex::new(()),
        })
    }

    fn ensure_id(doc: &mut Document) -> DocId {
        if let Some(id) = doc_id(doc) {
            return id;
        }
        let id = DocId::new();
        doc.insert(ID_FIELD.into(), id.into());
        id
    }

    /// Rewrites the snapshot file. `persist_lock` serializes callers,
    /// and each holder captures the store state after acquiring it, so
    /// the file is always one consistent snapshot and the last rename
    /// carries the newest state. Persistence failures are logged and
    /// swallowed; the in-memory state stays authoritative.
    async fn persist(&self) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        let _writing = self.persist_lock.lock().await;

        let snapshot: BTreeMap<String, Vec<Document>> = {
            let collections = self.collections.read().await;
            collections
                .iter()
                .map(|(name, docs)| (name.clone(), docs.values().cloned().collect()))
                .collect()
        };

        let json = match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize store snapshot");
                return;
            }
        };

        let temp = path.with_extension("tmp");
        if let Err(e) = fs::write(&temp, json).await {
            warn!(path = %temp.display(), error = %e, "failed to write store snapshot");
            return;
        }
        if let Err(e) = fs::rename(&temp, path).await {
            warn!(path = %path.display(), error = %e, "failed to replace store snapshot");
        }
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for JsonStore {
    async fn find_one(&self, collection: &str, filter: &Filter) -> HubResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.values().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<Sort>,
    ) -> HubResult<Vec<Document>> {
        let mut results: Vec<Document> = {
            let collections = self.collections.read().await;
            collections
                .get(collection)
                .map(|docs| {
                    docs.values()
                        .filter(|doc| filter.matches(doc))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };
        if let Some(sort) = sort {
            results.sort_by(|a, b| sort.compare(a, b));
        }
        Ok(results)
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> HubResult<InsertResult> {
        let id = Self::ensure_id(&mut doc);
        {
            let mut collections = self.collections.write().await;
            let entry = collections.entry(collection.to_string()).or_default();
            if entry.contains_key(&id) {
                return Err(HubError::Store(format!(
                    "duplicate _id {id} in {collection}"
                )));
            }
            entry.insert(id, doc);
        }
        self.persist().await;
        Ok(InsertResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> HubResult<InsertManyResult> {
        let mut ids = Vec::with_capacity(docs.len());
        {
            let mut collections = self.collections.write().await;
            let entry = collections.entry(collection.to_string()).or_default();

            // Validate the whole batch before touching the collection:
            // a duplicate _id rejects every document, not just its own.
            let mut prepared = Vec::with_capacity(docs.len());
            for mut doc in docs {
                let id = Self::ensure_id(&mut doc);
                if entry.contains_key(&id) || prepared.iter().any(|(taken, _)| *taken == id) {
                    return Err(HubError::Store(format!(
                        "duplicate _id {id} in {collection}"
                    )));
                }
                prepared.push((id, doc));
            }
            for (id, doc) in prepared {
                entry.insert(id, doc);
                ids.push(id);
            }
        }
        if !ids.is_empty() {
            self.persist().await;
        }
        Ok(InsertManyResult {
            acknowledged: true,
            inserted_count: ids.len() as u64,
            inserted_ids: ids,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: Update,
        upsert: bool,
    ) -> HubResult<UpdateResult> {
        let result = {
            let mut collections = self.collections.write().await;
            let entry = collections.entry(collection.to_string()).or_default();
            let target = entry
                .iter()
                .find(|(_, doc)| filter.matches(doc))
                .map(|(id, _)| *id);

            match target {
                Some(id) => {
                    let mut modified_count = 0;
                    if let Some(doc) = entry.get_mut(&id) {
                        let before = doc.clone();
                        update.apply(doc);
                        if *doc != before {
                            modified_count = 1;
                        }
                    }
                    UpdateResult {
                        acknowledged: true,
                        matched_count: 1,
                        modified_count,
                        upserted_id: None,
                    }
                }
                None if upsert => {
                    let mut doc = filter.equality_fields();
                    update.apply(&mut doc);
                    let id = Self::ensure_id(&mut doc);
                    entry.insert(id, doc);
                    UpdateResult {
                        acknowledged: true,
                        matched_count: 0,
                        modified_count: 0,
                        upserted_id: Some(id),
                    }
                }
                None => UpdateResult {
                    acknowledged: true,
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: None,
                },
            }
        };

        if result.modified_count > 0 || result.upserted_id.is_some() {
            self.persist().await;
        }
        Ok(result)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> HubResult<DeleteResult> {
        let removed = {
            let mut collections = self.collections.write().await;
            match collections.get_mut(collection) {
                Some(entry) => {
                    let target = entry
                        .iter()
                        .find(|(_, doc)| filter.matches(doc))
                        .map(|(id, _)| *id);
                    match target {
                        Some(id) => entry.remove(&id).is_some(),
                        None => false,
                    }
                }
                None => false,
            }
        };

        if removed {
            self.persist().await;
        }
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: u64::from(removed),
        })
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> HubResult<DeleteResult> {
        let deleted_count = {
            let mut collections = self.collections.write().await;
            match collections.get_mut(collection) {
                Some(entry) => {
                    let before = entry.len();
                    entry.retain(|_, doc| !filter.matches(doc));
                    (before - entry.len()) as u64
                }
                None => 0,
            }
        };

        if deleted_count > 0 {
            self.persist().await;
        }
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }
}
