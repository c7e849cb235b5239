use log::{debug, info};

use crate::collection::{AutoIdGenerator, Document, SetOptions};
use crate::common::{atomic, expand_field_paths, validate_tree, Atomic, ReadExecutor, Value, WriteExecutor};
use crate::errors::{ErrorKind, MockStoreError, MockStoreResult};
use crate::path::Path;
use crate::store::resolver::{
    collection_mut, lookup_collection, lookup_collection_mut, lookup_document,
    lookup_document_mut,
};

/// The shared tree of a store and the operations applied to it.
///
/// Every operation holds the read or write lock of the tree for its whole
/// duration, so each call observes and leaves a consistent tree. Clones share
/// the same tree.
#[derive(Clone)]
pub struct StoreTree {
    data: Atomic<Document>,
    id_generator: AutoIdGenerator,
}

impl StoreTree {
    pub fn new(data: Document, id_generator: AutoIdGenerator) -> Self {
        StoreTree {
            data: atomic(data),
            id_generator,
        }
    }

    /// A copy of the document at `path`, or `None` if it does not exist.
    pub fn get_document(&self, path: &Path) -> MockStoreResult<Option<Document>> {
        self.data
            .read_with(|root| lookup_document(root, path).map(|found| found.cloned()))
    }

    /// Checks if the document at `path` exists.
    pub fn contains_document(&self, path: &Path) -> MockStoreResult<bool> {
        self.data
            .read_with(|root| lookup_document(root, path).map(|found| found.is_some()))
    }

    /// Writes `payload` at `path`, creating the document and every missing
    /// ancestor.
    ///
    /// Without merge the stored mapping is replaced by `payload`. With merge
    /// the top-level fields of `payload` overwrite the stored ones and the
    /// rest are kept; an absent document is created from `payload`.
    pub fn set_document(&self, path: &Path, payload: Document, options: SetOptions) -> MockStoreResult<()> {
        let (parent, id) = split_document_path(path)?;
        self.data.write_with(|root| {
            let collection = collection_mut(root, &parent)?;
            if options.is_merge() {
                if let Some(existing) = collection.get_document_mut(&id) {
                    debug!("Merging {} top-level fields into {}", payload.size(), path);
                    existing.merge_top_level(&payload);
                    return Ok(());
                }
            }

            debug!("Setting document {}", path);
            collection.insert_raw(id, Value::Document(payload));
            Ok(())
        })
    }

    /// Like [set_document](Self::set_document) without merge, but fails if
    /// the document exists.
    pub fn create_document(&self, path: &Path, payload: Document) -> MockStoreResult<()> {
        let (parent, id) = split_document_path(path)?;
        self.data.write_with(|root| {
            if lookup_document(root, path)?.is_some() {
                log::error!("Document {} already exists", path);
                return Err(MockStoreError::new(
                    &format!("Document {} already exists", path),
                    ErrorKind::AlreadyExists,
                ));
            }

            let collection = collection_mut(root, &parent)?;
            debug!("Creating document {}", path);
            collection.insert_raw(id, Value::Document(payload));
            Ok(())
        })
    }

    /// Recursively merges `payload` into the existing document at `path`.
    /// Top-level keys holding field paths address nested fields.
    ///
    /// # Errors
    ///
    /// [ErrorKind::NotFound] if the document does not exist.
    pub fn update_document(&self, path: &Path, payload: &Document) -> MockStoreResult<()> {
        let changes = expand_field_paths(payload)?;
        self.data.write_with(|root| match lookup_document_mut(root, path)? {
            Some(existing) => {
                debug!("Updating document {}", path);
                existing.merge(&changes);
                Ok(())
            }
            None => {
                log::error!("Cannot update {}, document does not exist", path);
                Err(MockStoreError::new(
                    &format!("Cannot update {}, document does not exist", path),
                    ErrorKind::NotFound,
                ))
            }
        })
    }

    /// Removes the document at `path`. Removing an absent document is not
    /// an error and the parent collection is kept even when it becomes empty.
    pub fn delete_document(&self, path: &Path) -> MockStoreResult<()> {
        let (parent, id) = split_document_path(path)?;
        self.data.write_with(|root| {
            if let Some(collection) = lookup_collection_mut(root, &parent)? {
                if collection.remove_raw(&id).is_some() {
                    debug!("Deleted document {}", path);
                }
            }
            Ok(())
        })
    }

    /// Ids of the documents currently in the collection at `path`.
    pub fn document_ids(&self, path: &Path) -> MockStoreResult<Vec<String>> {
        self.data.read_with(|root| {
            let ids = match lookup_collection(root, path)? {
                Some(collection) => mapping_keys(collection),
                None => Vec::new(),
            };
            Ok(ids)
        })
    }

    /// A fresh id not used in the collection at `path`.
    pub fn generate_id(&self, path: &Path) -> MockStoreResult<String> {
        self.data.read_with(|root| {
            let collection = lookup_collection(root, path)?;
            self.id_generator.generate(collection)
        })
    }

    /// Generates an id and writes `payload` under it in one step.
    pub fn add_document(&self, path: &Path, payload: Document) -> MockStoreResult<String> {
        self.data.write_with(|root| {
            let collection = collection_mut(root, path)?;
            let id = self.id_generator.generate(Some(collection))?;
            debug!("Adding document {} to {}", id, path);
            collection.insert_raw(id.clone(), Value::Document(payload));
            Ok(id)
        })
    }

    /// Names of the top-level collections.
    pub fn collection_names(&self) -> Vec<String> {
        self.data.read_with(mapping_keys)
    }

    /// Names of the nested collections stored in the document at `path`.
    pub fn subcollection_names(&self, path: &Path) -> MockStoreResult<Vec<String>> {
        self.data.read_with(|root| {
            let names = match lookup_document(root, path)? {
                Some(document) => mapping_keys(document),
                None => Vec::new(),
            };
            Ok(names)
        })
    }

    /// A snapshot of the whole tree.
    pub fn snapshot(&self) -> Document {
        self.data.read_with(|root| root.clone())
    }

    /// Replaces the whole tree. Fails with `MalformedPath` if a mapping sits
    /// under a key that is not a valid path segment.
    pub fn replace(&self, data: Document) -> MockStoreResult<()> {
        validate_tree(&data)?;
        info!("Replacing store tree with {} collections", data.size());
        self.data.write_with(|root| *root = data);
        Ok(())
    }

    pub fn clear(&self) {
        info!("Clearing store tree");
        self.data.write_with(|root| *root = Document::new());
    }
}

fn mapping_keys(node: &Document) -> Vec<String> {
    node.iter()
        .filter(|(_, value)| value.is_document())
        .map(|(key, _)| key)
        .collect()
}

fn split_document_path(path: &Path) -> MockStoreResult<(Path, String)> {
    let path = path.clone().expect_document()?;
    let id = path.id().to_string();
    match path.parent() {
        Some(parent) => Ok((parent, id)),
        None => {
            log::error!("Document path {} has no parent collection", path);
            Err(MockStoreError::new(
                &format!("Document path {} has no parent collection", path),
                ErrorKind::InternalError,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::merge;
    use crate::doc;

    fn tree() -> StoreTree {
        StoreTree::new(Document::new(), AutoIdGenerator::new(20, 16))
    }

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn test_get_absent() {
        let tree = tree();
        assert_eq!(tree.get_document(&path("users/alice")).unwrap(), None);
        assert!(!tree.contains_document(&path("users/alice")).unwrap());
        // reads never create
        assert!(tree.snapshot().is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let tree = tree();
        tree.set_document(&path("users/alice"), doc! { age: 30 }, SetOptions::default())
            .unwrap();
        assert_eq!(
            tree.get_document(&path("users/alice")).unwrap(),
            Some(doc! { age: 30 })
        );
    }

    #[test]
    fn test_set_replaces() {
        let tree = tree();
        let alice = path("users/alice");
        tree.set_document(&alice, doc! { age: 30, name: "Alice" }, SetOptions::default())
            .unwrap();
        tree.set_document(&alice, doc! { age: 31 }, SetOptions::default())
            .unwrap();
        assert_eq!(tree.get_document(&alice).unwrap(), Some(doc! { age: 31 }));
    }

    #[test]
    fn test_set_merge_is_shallow() {
        let tree = tree();
        let alice = path("users/alice");
        tree.set_document(&alice, doc! { a: 1, nested: { x: 1, y: 2 } }, SetOptions::default())
            .unwrap();
        tree.set_document(&alice, doc! { b: 2, nested: { z: 3 } }, merge())
            .unwrap();
        assert_eq!(
            tree.get_document(&alice).unwrap(),
            Some(doc! { a: 1, b: 2, nested: { z: 3 } })
        );
    }

    #[test]
    fn test_set_merge_on_absent_creates() {
        let tree = tree();
        let alice = path("users/alice");
        tree.set_document(&alice, doc! { a: 1 }, merge()).unwrap();
        assert_eq!(tree.get_document(&alice).unwrap(), Some(doc! { a: 1 }));
    }

    #[test]
    fn test_set_nested_materializes_ancestors() {
        let tree = tree();
        tree.set_document(&path("users/alice/orders/o1"), doc! { total: 5 }, SetOptions::default())
            .unwrap();
        assert_eq!(
            tree.snapshot(),
            doc! { users: { alice: { orders: { o1: { total: 5 } } } } }
        );
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let tree = tree();
        tree.set_document(&path("users/alice"), doc! { orders: 1 }, SetOptions::default())
            .unwrap();
        let err = tree
            .set_document(&path("users/alice/orders/o1"), doc! {}, SetOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_create() {
        let tree = tree();
        let alice = path("users/alice");
        tree.create_document(&alice, doc! { a: 1 }).unwrap();
        let err = tree.create_document(&alice, doc! { a: 2 }).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::AlreadyExists);
        assert_eq!(tree.get_document(&alice).unwrap(), Some(doc! { a: 1 }));
    }

    #[test]
    fn test_update_absent_fails() {
        let tree = tree();
        let err = tree
            .update_document(&path("users/alice"), &doc! { a: 1 })
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NotFound);
        assert!(tree.snapshot().is_empty());
    }

    #[test]
    fn test_update_is_recursive() {
        let tree = tree();
        let alice = path("users/alice");
        tree.set_document(&alice, doc! { id: 1, nested: { a: 1, b: 2 } }, SetOptions::default())
            .unwrap();
        tree.update_document(&alice, &doc! { nested: { b: 3 } }).unwrap();
        assert_eq!(
            tree.get_document(&alice).unwrap(),
            Some(doc! { id: 1, nested: { a: 1, b: 3 } })
        );
    }

    #[test]
    fn test_update_with_field_path_key() {
        let tree = tree();
        let alice = path("users/alice");
        tree.set_document(&alice, doc! { a: { b: 1, c: 2 } }, SetOptions::default())
            .unwrap();
        let mut payload = Document::new();
        payload.insert_raw("a.b".to_string(), Value::from(9));
        tree.update_document(&alice, &payload).unwrap();
        assert_eq!(
            tree.get_document(&alice).unwrap(),
            Some(doc! { a: { b: 9, c: 2 } })
        );
    }

    #[test]
    fn test_delete() {
        let tree = tree();
        let alice = path("users/alice");
        tree.set_document(&alice, doc! { a: 1 }, SetOptions::default())
            .unwrap();
        tree.delete_document(&alice).unwrap();
        assert_eq!(tree.get_document(&alice).unwrap(), None);
        // idempotent, and the empty collection stays
        tree.delete_document(&alice).unwrap();
        tree.delete_document(&path("nothing/here")).unwrap();
        assert_eq!(tree.collection_names(), vec!["users".to_string()]);
    }

    #[test]
    fn test_document_ids() {
        let tree = tree();
        tree.set_document(&path("users/b"), doc! {}, SetOptions::default()).unwrap();
        tree.set_document(&path("users/a"), doc! {}, SetOptions::default()).unwrap();
        assert_eq!(tree.document_ids(&path("users")).unwrap(), vec!["a", "b"]);
        assert!(tree.document_ids(&path("groups")).unwrap().is_empty());
    }

    #[test]
    fn test_document_ids_skips_scalars() {
        let tree = StoreTree::new(
            doc! { users: { alice: { age: 1 }, count: 2 } },
            AutoIdGenerator::new(20, 16),
        );
        assert_eq!(tree.document_ids(&path("users")).unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_add_document() {
        let tree = tree();
        let users = path("users");
        let id = tree.add_document(&users, doc! { a: 1 }).unwrap();
        assert_eq!(id.len(), 20);
        assert_eq!(
            tree.get_document(&users.child(&id).unwrap()).unwrap(),
            Some(doc! { a: 1 })
        );
    }

    #[test]
    fn test_generate_id_does_not_write() {
        let tree = tree();
        let id = tree.generate_id(&path("users")).unwrap();
        assert_eq!(id.len(), 20);
        assert!(tree.snapshot().is_empty());
    }

    #[test]
    fn test_subcollection_names() {
        let tree = tree();
        tree.set_document(&path("users/alice/orders/o1"), doc! {}, SetOptions::default())
            .unwrap();
        assert_eq!(
            tree.subcollection_names(&path("users/alice")).unwrap(),
            vec!["orders"]
        );
    }

    #[test]
    fn test_replace_snapshot_clear() {
        let tree = tree();
        tree.replace(doc! { users: { alice: {} } }).unwrap();
        let snapshot = tree.snapshot();
        tree.clear();
        assert!(tree.snapshot().is_empty());
        assert!(snapshot.contains_key("users"));
    }

    #[test]
    fn test_clones_share_tree() {
        let tree = tree();
        let clone = tree.clone();
        clone
            .set_document(&path("users/alice"), doc! { a: 1 }, SetOptions::default())
            .unwrap();
        assert!(tree.contains_document(&path("users/alice")).unwrap());
    }
}
