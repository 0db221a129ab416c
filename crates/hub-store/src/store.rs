//! # Document Store Trait
//!
//! Collection-oriented persistence seam. Request handlers depend on
//! [`BoxedStore`] rather than a concrete engine, so the whole HTTP
//! surface can be exercised against an in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use hub_core::{DocId, Document, HubResult};
use serde::Serialize;

use crate::filter::{Filter, Sort, Update};

/// Acknowledgement for a single-document insert
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub acknowledged: bool,
    pub inserted_id: DocId,
}

/// Acknowledgement for a batch insert
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyResult {
    pub acknowledged: bool,
    pub inserted_count: u64,
    pub inserted_ids: Vec<DocId>,
}

/// Outcome of [`DocumentStore::update_one`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<DocId>,
}

/// Outcome of the delete operations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Storage operations over schemaless collections.
///
/// Collections are named by the constants in [`crate::collections`] and
/// spring into existence on first write. Result order from the finders
/// is unspecified unless a sort is given.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document matching the filter, if any
    async fn find_one(&self, collection: &str, filter: &Filter) -> HubResult<Option<Document>>;

    /// Every document matching the filter, optionally sorted
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<Sort>,
    ) -> HubResult<Vec<Document>>;

    /// Stores one document, assigning `_id` when absent. A supplied
    /// `_id` already present in the collection is an error.
    async fn insert_one(&self, collection: &str, doc: Document) -> HubResult<InsertResult>;

    /// Stores a batch of documents. A duplicate `_id` anywhere rejects
    /// the whole batch.
    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<Document>,
    ) -> HubResult<InsertManyResult>;

    /// Mutates the first matching document atomically with respect to
    /// other store operations. With `upsert`, a miss materializes a new
    /// document from the filter's equality fields plus the update.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: Update,
        upsert: bool,
    ) -> HubResult<UpdateResult>;

    /// Removes the first matching document
    async fn delete_one(&self, collection: &str, filter: &Filter) -> HubResult<DeleteResult>;

    /// Removes every matching document
    async fn delete_many(&self, collection: &str, filter: &Filter) -> HubResult<DeleteResult>;
}

/// Shared trait object handed to request handlers
pub type BoxedStore = Arc<dyn DocumentStore>;
