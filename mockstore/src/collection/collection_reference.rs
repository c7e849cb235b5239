use std::fmt::{Debug, Formatter};

use crate::collection::{Document, DocumentReference, DocumentSnapshot, DocumentStream};
use crate::errors::{MockStoreError, MockStoreResult};
use crate::mock_store::MockStore;
use crate::path::Path;

/// A handle to the collection at a path.
///
/// Like [DocumentReference], a collection reference only holds a path and
/// resolves it on every call. A collection comes into being with the first
/// document written to it.
///
/// # Examples
///
/// ```rust
/// use mockstore::{doc, MockStore};
///
/// let store = MockStore::new();
/// let users = store.collection("users").unwrap();
///
/// users.document("alice").unwrap().set(doc! { age: 30 }).unwrap();
/// let bob = users.add(doc! { age: 40 }).unwrap();
///
/// let snapshots = users.get().unwrap();
/// assert_eq!(snapshots.len(), 2);
/// assert!(users.list_documents().unwrap().contains(&bob));
/// ```
#[derive(Clone)]
pub struct CollectionReference {
    store: MockStore,
    path: Path,
}

impl CollectionReference {
    pub(crate) fn new(store: MockStore, path: Path) -> Self {
        CollectionReference { store, path }
    }

    /// The collection name, the last segment of the path.
    pub fn id(&self) -> &str {
        self.path.id()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The document containing this collection, or `None` for a top-level
    /// collection.
    pub fn parent(&self) -> Option<DocumentReference> {
        self.path
            .parent()
            .filter(Path::is_document)
            .map(|path| DocumentReference::new(self.store.clone(), path))
    }

    /// A reference to the document `id`, which need not exist. `id` may also
    /// be a relative path ending at a document, such as `"alice/orders/o1"`.
    pub fn document(&self, id: &str) -> MockStoreResult<DocumentReference> {
        let path = self.path.child(id)?.expect_document()?;
        Ok(DocumentReference::new(self.store.clone(), path))
    }

    /// A reference to a document with a freshly generated id that is not
    /// used in this collection. Nothing is written until the reference is.
    pub fn new_document(&self) -> MockStoreResult<DocumentReference> {
        let id = self.store.tree().generate_id(&self.path)?;
        self.document(&id)
    }

    /// Writes `data` as a new document with a generated id.
    pub fn add(&self, data: Document) -> MockStoreResult<DocumentReference> {
        let id = self.store.tree().add_document(&self.path, data).map_err(|err| {
            let message = format!("Failed to add document to {}", self.path);
            log::error!("{}: {}", message, err);
            MockStoreError::new_with_cause(&message, err.kind().clone(), err)
        })?;
        self.document(&id)
    }

    /// A lazy stream over the documents currently in the collection.
    pub fn documents(&self) -> MockStoreResult<DocumentStream> {
        let ids = self.store.tree().document_ids(&self.path)?;
        Ok(DocumentStream::new(self.clone(), ids))
    }

    /// Snapshots of every document currently in the collection.
    pub fn get(&self) -> MockStoreResult<Vec<DocumentSnapshot>> {
        self.documents()?.collect()
    }

    /// References to every document currently in the collection.
    pub fn list_documents(&self) -> MockStoreResult<Vec<DocumentReference>> {
        self.store
            .tree()
            .document_ids(&self.path)?
            .iter()
            .map(|id| self.document(id))
            .collect()
    }
}

impl PartialEq for CollectionReference {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.store.same_store(&other.store)
    }
}

impl Debug for CollectionReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "CollectionReference({})", self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::doc;
    use crate::errors::ErrorKind;
    use std::collections::HashSet;

    #[test]
    fn test_id_path_parent() {
        let store = MockStore::new();
        let users = store.collection("users").unwrap();
        assert_eq!(users.id(), "users");
        assert!(users.parent().is_none());

        let orders = store.collection("users/alice/orders").unwrap();
        assert_eq!(orders.path().to_string(), "users/alice/orders");
        assert_eq!(orders.parent().unwrap().id(), "alice");
    }

    #[test]
    fn test_document_parity() {
        let store = MockStore::new();
        let users = store.collection("users").unwrap();
        assert!(users.document("alice").is_ok());
        assert!(users.document("alice/orders/o1").is_ok());
        let err = users.document("alice/orders").err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::MalformedPath);
        assert!(users.document("").is_err());
    }

    #[test]
    fn test_new_document_is_unwritten() {
        let store = MockStore::new();
        let users = store.collection("users").unwrap();
        let reference = users.new_document().unwrap();
        assert_eq!(reference.id().len(), 20);
        assert!(!reference.get().unwrap().exists());
        assert!(store.data().is_empty());
    }

    #[test]
    fn test_new_document_ids_are_unique() {
        let store = MockStore::new();
        let users = store.collection("users").unwrap();
        let ids: HashSet<String> = (0..200)
            .map(|_| users.new_document().unwrap().id().to_string())
            .collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_add() {
        let store = MockStore::new();
        let users = store.collection("users").unwrap();
        let reference = users.add(doc! { name: "Alice" }).unwrap();
        assert_eq!(reference.id().len(), 20);
        assert_eq!(
            reference.get().unwrap().get("name").unwrap(),
            Value::from("Alice")
        );
    }

    #[test]
    fn test_add_many() {
        let store = MockStore::new();
        let users = store.collection("users").unwrap();
        for i in 0..100 {
            users.add(doc! { seq: i }).unwrap();
        }
        assert_eq!(users.get().unwrap().len(), 100);
    }

    #[test]
    fn test_add_to_nested_collection() {
        let store = MockStore::new();
        let orders = store.collection("users/alice/orders").unwrap();
        let reference = orders.add(doc! { total: 10 }).unwrap();
        assert_eq!(reference.path().len(), 4);
        assert!(reference.get().unwrap().exists());
    }

    #[test]
    fn test_get_and_list() {
        let store = MockStore::new();
        store.set_data(doc! { users: { alice: { age: 30 }, bob: { age: 40 } } }).unwrap();
        let users = store.collection("users").unwrap();

        let snapshots = users.get().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert!(snapshots.iter().all(|it| it.exists()));

        let references = users.list_documents().unwrap();
        let ids: Vec<&str> = references.iter().map(|it| it.id()).collect();
        assert_eq!(ids, vec!["alice", "bob"]);
    }

    #[test]
    fn test_documents_reflects_current_state() {
        let store = MockStore::new();
        let users = store.collection("users").unwrap();
        assert_eq!(users.documents().unwrap().count(), 0);
        users.document("alice").unwrap().set(doc! {}).unwrap();
        assert_eq!(users.documents().unwrap().count(), 1);
        users.document("alice").unwrap().delete().unwrap();
        assert_eq!(users.documents().unwrap().count(), 0);
    }

    #[test]
    fn test_equality_and_debug() {
        let store = MockStore::new();
        let first = store.collection("users").unwrap();
        let second = store.collection("/users/").unwrap();
        assert_eq!(first, second);
        assert_eq!(format!("{:?}", first), "CollectionReference(users)");
    }
}
