//! # mockstore - in-memory hierarchical document store
//!
//! mockstore emulates a hierarchical document database entirely in memory.
//! Data is a tree of named collections holding documents by id; each
//! document holds fields, and a document may hold nested collections of its
//! own. It is meant for tests and prototypes that need the shape of such a
//! database without a server.
//!
//! ## Quick Start
//!
//! ```rust
//! use mockstore::{doc, MockStore};
//! use mockstore::errors::ErrorKind;
//!
//! let store = MockStore::new();
//! let users = store.collection("users").unwrap();
//!
//! // write with an explicit id
//! let alice = users.document("alice").unwrap();
//! alice.set(doc! { name: "Alice", address: { city: "Paris" } }).unwrap();
//!
//! // write with a generated id
//! let bob = users.add(doc! { name: "Bob" }).unwrap();
//!
//! // recursive update of an existing document
//! alice.update(doc! { address: { zip: 75001 } }).unwrap();
//!
//! // create refuses to overwrite
//! let err = alice.create(doc! {}).unwrap_err();
//! assert_eq!(err.kind(), &ErrorKind::AlreadyExists);
//!
//! // nested collections hang off documents
//! let orders = alice.collection("orders").unwrap();
//! orders.document("o1").unwrap().set(doc! { total: 12 }).unwrap();
//!
//! for snapshot in users.documents().unwrap() {
//!     let snapshot = snapshot.unwrap();
//!     assert!(snapshot.exists());
//! }
//!
//! bob.delete().unwrap();
//! assert_eq!(users.list_documents().unwrap().len(), 1);
//! ```
//!
//! ## Design Pattern
//!
//! [MockStore] uses the PIMPL pattern: clones share one tree through an
//! `Arc`, and the tree sits behind a read/write lock so that each operation
//! is atomic with respect to every other one.
//!
//! ## Module Organization
//!
//! - [`collection`] - documents, references, snapshots and streams
//! - [`common`] - the value model, constants and shared helpers
//! - [`errors`] - error types and result definitions
//! - [`path`] - slash-separated store paths
//! - [`store`] - the store tree and the resolver walking it
//! - [`mock_store`], [`mock_store_builder`], [`store_config`] - the entry point and its configuration

pub mod collection;
pub mod common;
pub mod errors;
pub mod mock_store;
pub mod mock_store_builder;
pub mod path;
pub mod store;
pub mod store_config;

pub use common::Value;
pub use mock_store::MockStore;
pub use mock_store_builder::MockStoreBuilder;
pub use store_config::StoreConfig;
