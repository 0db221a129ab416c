//! # hub-core
//!
//! Core types for the InventoHub backend.
//!
//! This crate provides:
//! - `Document` and `DocId` for the schemaless document model
//! - `HubError` for typed error handling with HTTP status mapping
//!
//! ## Example
//!
//! ```rust,ignore
//! use hub_core::{DocId, Document, HubResult, ID_FIELD};
//!
//! fn stamp(mut doc: Document) -> HubResult<Document> {
//!     let id = DocId::new();
//!     doc.insert(ID_FIELD.into(), id.into());
//!     Ok(doc)
//! }
//! ```

pub mod document;
pub mod error;

// Re-exports for convenience
pub use document::{doc_i64, doc_id, doc_str, DocId, Document, ID_FIELD};
pub use error::{HubError, HubResult};
