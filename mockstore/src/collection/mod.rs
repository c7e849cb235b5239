//! Documents and the references that read and write them.
//!
//! # Documents
//!
//! A [Document] is an ordered map of field names to [Value](crate::common::Value)s.
//! Nested fields are addressed with `.`:
//!
//! ```rust
//! use mockstore::collection::Document;
//!
//! let mut doc = Document::new();
//! doc.put("name", "Alice").unwrap();
//! doc.put("address.city", "Paris").unwrap();
//! assert!(doc.contains_field("address.city"));
//! ```
//!
//! # References
//!
//! A [CollectionReference] or [DocumentReference] is a path handle into a
//! [MockStore](crate::MockStore). References are cheap to create and clone;
//! they never cache data and resolve their path on every call.
//!
//! ```rust
//! use mockstore::{doc, MockStore};
//! use mockstore::collection::merge;
//!
//! let store = MockStore::new();
//! let alice = store.collection("users").unwrap().document("alice").unwrap();
//!
//! alice.set(doc! { name: "Alice" }).unwrap();
//! alice.set_with(doc! { age: 30 }, merge()).unwrap();
//! alice.collection("orders").unwrap().add(doc! { total: 12 }).unwrap();
//!
//! assert_eq!(alice.collections().unwrap().len(), 1);
//! ```
//!
//! # Document IDs
//!
//! Documents created through [CollectionReference::add] or
//! [CollectionReference::new_document] get a random alphanumeric id, 20
//! characters long by default, that is not used by any other document of
//! the collection at the time it is generated.

mod auto_id;
mod collection_reference;
mod document;
mod document_reference;
mod document_stream;
mod set_options;
mod snapshot;

pub use auto_id::*;
pub use collection_reference::*;
pub use document::*;
pub use document_reference::*;
pub use document_stream::*;
pub use set_options::*;
pub use snapshot::*;
