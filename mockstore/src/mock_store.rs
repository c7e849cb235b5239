use std::sync::Arc;

use crate::collection::{AutoIdGenerator, CollectionReference, Document, DocumentReference};
use crate::errors::MockStoreResult;
use crate::mock_store_builder::MockStoreBuilder;
use crate::path::Path;
use crate::store::StoreTree;
use crate::store_config::StoreConfig;

/// An in-memory hierarchical document store.
///
/// `MockStore` is the entry point for all operations. It owns a tree of
/// collections, each holding documents by id, each document holding fields
/// and possibly nested collections. References obtained from the store are
/// path handles: they resolve against the live tree on every call.
///
/// `MockStore` uses the PIMPL pattern; clones share the same tree and can be
/// sent to other threads. Separate stores created with [MockStore::new] are
/// independent.
///
/// # Examples
///
/// ```rust
/// use mockstore::{doc, MockStore};
///
/// let store = MockStore::new();
/// let users = store.collection("users").unwrap();
///
/// let alice = users.document("alice").unwrap();
/// alice.set(doc! { name: "Alice", age: 30 }).unwrap();
///
/// let added = users.add(doc! { name: "Bob" }).unwrap();
/// assert_eq!(added.id().len(), 20);
///
/// let snapshot = alice.get().unwrap();
/// assert!(snapshot.exists());
/// assert_eq!(snapshot.get("age").unwrap().as_i32(), Some(&30));
/// ```
#[derive(Clone)]
pub struct MockStore {
    inner: Arc<MockStoreInner>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        MockStore::with_config(StoreConfig::new())
    }

    /// Creates a new [MockStoreBuilder] for configuring and opening a store.
    pub fn builder() -> MockStoreBuilder {
        MockStoreBuilder::new()
    }

    pub(crate) fn with_config(config: StoreConfig) -> Self {
        config.initialize();
        let inner = MockStoreInner::new(config);
        log::info!(
            "Opened store with {} top-level collections",
            inner.tree.collection_names().len()
        );
        MockStore {
            inner: Arc::new(inner),
        }
    }

    /// A reference to the collection at `path`, such as `"users"` or
    /// `"users/alice/orders"`. The collection need not exist.
    ///
    /// # Errors
    ///
    /// [ErrorKind::MalformedPath](crate::errors::ErrorKind::MalformedPath) if
    /// `path` has an empty segment or does not address a collection.
    pub fn collection(&self, path: &str) -> MockStoreResult<CollectionReference> {
        let path = Path::parse(path)?.expect_collection()?;
        Ok(CollectionReference::new(self.clone(), path))
    }

    /// A reference to the document at `path`, such as `"users/alice"`. The
    /// document need not exist.
    ///
    /// # Errors
    ///
    /// [ErrorKind::MalformedPath](crate::errors::ErrorKind::MalformedPath) if
    /// `path` has an empty segment or does not address a document.
    pub fn document(&self, path: &str) -> MockStoreResult<DocumentReference> {
        let path = Path::parse(path)?.expect_document()?;
        Ok(DocumentReference::new(self.clone(), path))
    }

    /// References to the top-level collections currently in the tree.
    pub fn collections(&self) -> Vec<CollectionReference> {
        self.inner
            .tree
            .collection_names()
            .into_iter()
            .filter_map(|name| Path::root().child(&name).ok())
            .map(|path| CollectionReference::new(self.clone(), path))
            .collect()
    }

    /// Replaces the whole tree. `data` maps top-level collection names to
    /// mappings of document id to fields.
    ///
    /// # Errors
    ///
    /// [ErrorKind::MalformedPath](crate::errors::ErrorKind::MalformedPath) if
    /// a collection name or document id in `data` is empty or contains `/`.
    /// The current tree is kept in that case.
    pub fn set_data(&self, data: Document) -> MockStoreResult<()> {
        self.inner.tree.replace(data)
    }

    /// A snapshot of the whole tree. Later writes do not affect it.
    pub fn data(&self) -> Document {
        self.inner.tree.snapshot()
    }

    /// Removes every collection and document.
    pub fn reset(&self) {
        self.inner.tree.clear();
    }

    pub fn config(&self) -> StoreConfig {
        self.inner.config.clone()
    }

    pub(crate) fn tree(&self) -> &StoreTree {
        &self.inner.tree
    }

    pub(crate) fn same_store(&self, other: &MockStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

struct MockStoreInner {
    tree: StoreTree,
    config: StoreConfig,
}

impl MockStoreInner {
    fn new(config: StoreConfig) -> Self {
        let id_generator = AutoIdGenerator::new(config.auto_id_length(), config.max_id_attempts());
        MockStoreInner {
            tree: StoreTree::new(config.initial_data(), id_generator),
            config,
        }
    }
}
