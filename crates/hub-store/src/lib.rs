//! # hub-store
//!
//! Schemaless document persistence for the InventoHub backend.
//!
//! This crate provides:
//! - `DocumentStore` trait, the persistence seam for the HTTP layer
//! - `Filter`, `Sort`, and `Update` query descriptions
//! - `JsonStore`, an in-memory engine with optional JSON snapshots
//! - Collection name constants
//!
//! ## Example
//!
//! ```rust,ignore
//! use hub_store::{collections, Filter, JsonStore, Update};
//!
//! let store = JsonStore::new();
//! store.insert_one(collections::PRODUCTS, product).await?;
//! store
//!     .update_one(
//!         collections::PRODUCTS,
//!         &Filter::new().id(id).gte("product_quantity", 1.0),
//!         Update::new().inc("saleCount", 1).inc("product_quantity", -1),
//!         false,
//!     )
//!     .await?;
//! ```

pub mod collections;
pub mod filter;
pub mod json;
pub mod store;

// Re-exports for convenience
pub use filter::{Filter, Sort, SortOrder, Update};
pub use json::JsonStore;
pub use store::{
    BoxedStore, DeleteResult, DocumentStore, InsertManyResult, InsertResult, UpdateResult,
};
