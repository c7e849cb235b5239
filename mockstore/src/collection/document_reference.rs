use std::fmt::{Debug, Formatter};

use crate::collection::{CollectionReference, Document, DocumentSnapshot, SetOptions};
use crate::errors::{MockStoreError, MockStoreResult};
use crate::mock_store::MockStore;
use crate::path::Path;

/// A handle to the document at a path.
///
/// A reference caches nothing: it holds the store and its [Path], and every
/// operation resolves the path against the live tree. Two references to the
/// same path observe each other's writes, and a reference to a document that
/// does not exist yet is valid until it is written.
///
/// # Examples
///
/// ```rust
/// use mockstore::{doc, MockStore};
///
/// let store = MockStore::new();
/// let alice = store.document("users/alice").unwrap();
/// assert!(!alice.get().unwrap().exists());
///
/// alice.set(doc! { name: "Alice", address: { city: "Paris", zip: 75001 } }).unwrap();
/// alice.update(doc! { address: { zip: 75002 } }).unwrap();
///
/// let snapshot = alice.get().unwrap();
/// assert_eq!(snapshot.get("address.city").unwrap().as_string().unwrap(), "Paris");
/// assert_eq!(snapshot.get("address.zip").unwrap().as_i32(), Some(&75002));
///
/// alice.delete().unwrap();
/// assert!(!alice.get().unwrap().exists());
/// ```
#[derive(Clone)]
pub struct DocumentReference {
    store: MockStore,
    path: Path,
}

impl DocumentReference {
    pub(crate) fn new(store: MockStore, path: Path) -> Self {
        DocumentReference { store, path }
    }

    /// The document id, the last segment of the path.
    pub fn id(&self) -> &str {
        self.path.id()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The collection containing this document.
    pub fn parent(&self) -> CollectionReference {
        // a document path always has a collection before it
        let parent = self.path.parent().unwrap_or_else(Path::root);
        CollectionReference::new(self.store.clone(), parent)
    }

    /// A nested collection of this document. `name` may also be a relative
    /// path ending at a collection, such as `"orders/o1/items"`.
    pub fn collection(&self, name: &str) -> MockStoreResult<CollectionReference> {
        let path = self.path.child(name)?.expect_collection()?;
        Ok(CollectionReference::new(self.store.clone(), path))
    }

    /// References to the nested collections currently stored in this
    /// document.
    pub fn collections(&self) -> MockStoreResult<Vec<CollectionReference>> {
        let names = self.store.tree().subcollection_names(&self.path)?;
        let mut collections = Vec::with_capacity(names.len());
        for name in names {
            collections.push(self.collection(&name)?);
        }
        Ok(collections)
    }

    /// Reads the document. Absence is reported through
    /// [DocumentSnapshot::exists], never as an error.
    pub fn get(&self) -> MockStoreResult<DocumentSnapshot> {
        let data = self.store.tree().get_document(&self.path)?;
        Ok(DocumentSnapshot::new(self.clone(), data))
    }

    /// Replaces the document with `data`, creating it (and any missing
    /// ancestors) if needed.
    pub fn set(&self, data: Document) -> MockStoreResult<()> {
        self.set_with(data, SetOptions::default())
    }

    /// Writes `data` with the given [SetOptions].
    ///
    /// With merge enabled the top-level fields of `data` are copied over the
    /// existing document and every other field is kept. Nested mappings are
    /// replaced as a whole. An absent document is created from `data`.
    pub fn set_with(&self, data: Document, options: SetOptions) -> MockStoreResult<()> {
        self.store
            .tree()
            .set_document(&self.path, data, options)
            .map_err(|err| self.wrap("set", err))
    }

    /// Writes `data` as a new document.
    ///
    /// # Errors
    ///
    /// [ErrorKind::AlreadyExists](crate::errors::ErrorKind::AlreadyExists) if the document exists.
    pub fn create(&self, data: Document) -> MockStoreResult<()> {
        self.store
            .tree()
            .create_document(&self.path, data)
            .map_err(|err| self.wrap("create", err))
    }

    /// Recursively merges `data` into the existing document.
    ///
    /// Nested mappings present on both sides are merged key by key; any
    /// other value in `data` replaces the stored one. Fields not mentioned in
    /// `data` are left alone. A top-level key holding a field path, such as
    /// `"address.zip"`, addresses the nested field.
    ///
    /// # Errors
    ///
    /// [ErrorKind::NotFound](crate::errors::ErrorKind::NotFound) if the document does not exist.
    pub fn update(&self, data: Document) -> MockStoreResult<()> {
        self.store
            .tree()
            .update_document(&self.path, &data)
            .map_err(|err| self.wrap("update", err))
    }

    /// Deletes the document. Deleting an absent document succeeds.
    pub fn delete(&self) -> MockStoreResult<()> {
        self.store
            .tree()
            .delete_document(&self.path)
            .map_err(|err| self.wrap("delete", err))
    }

    fn wrap(&self, operation: &str, err: MockStoreError) -> MockStoreError {
        let message = format!("Failed to {} document {}", operation, self.path);
        log::error!("{}: {}", message, err);
        MockStoreError::new_with_cause(&message, err.kind().clone(), err)
    }
}

impl PartialEq for DocumentReference {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.store.same_store(&other.store)
    }
}

impl Debug for DocumentReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentReference({})", self.path)
    }
}
