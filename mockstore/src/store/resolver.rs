//! Walks of the store tree along a [Path].
//!
//! The tree root is a [Document] whose keys are top-level collection names.
//! Each segment of a path selects a nested mapping from the current node:
//! collection names select a collection, document ids select a document, and
//! a nested collection is a field of its parent document. Walking therefore
//! alternates the same step regardless of segment kind; the parity of the
//! path decides what the final node stands for.

use crate::collection::Document;
use crate::errors::{ErrorKind, MockStoreError, MockStoreResult};
use crate::path::Path;

/// Finds the collection at `path` without modifying the tree.
///
/// Returns `Ok(None)` if any segment is absent or holds a non-mapping value.
///
/// # Errors
///
/// [ErrorKind::MalformedPath] if `path` does not address a collection.
pub fn lookup_collection<'a>(root: &'a Document, path: &Path) -> MockStoreResult<Option<&'a Document>> {
    ensure_collection(path)?;
    Ok(walk(root, path))
}

/// Finds the document at `path` without modifying the tree.
///
/// Returns `Ok(None)` if the document, or anything on the way to it, is
/// absent.
///
/// # Errors
///
/// [ErrorKind::MalformedPath] if `path` does not address a document.
pub fn lookup_document<'a>(root: &'a Document, path: &Path) -> MockStoreResult<Option<&'a Document>> {
    ensure_document(path)?;
    Ok(walk(root, path))
}

/// Mutable access to an existing document. Creates nothing.
pub fn lookup_document_mut<'a>(
    root: &'a mut Document,
    path: &Path,
) -> MockStoreResult<Option<&'a mut Document>> {
    ensure_document(path)?;
    Ok(walk_mut(root, path))
}

/// Mutable access to an existing collection. Creates nothing.
pub fn lookup_collection_mut<'a>(
    root: &'a mut Document,
    path: &Path,
) -> MockStoreResult<Option<&'a mut Document>> {
    ensure_collection(path)?;
    Ok(walk_mut(root, path))
}

/// Mutable access to the collection at `path`, creating every missing node
/// on the way as an empty mapping.
///
/// A missing ancestor document on a nested path is materialized holding only
/// the nested collection field.
///
/// # Errors
///
/// - [ErrorKind::MalformedPath] if `path` does not address a collection.
/// - [ErrorKind::InvalidOperation] if a segment holds a value that is not a
///   mapping. Nodes are only created after the last existing node, so the
///   tree is unchanged when this error is returned.
pub fn collection_mut<'a>(root: &'a mut Document, path: &Path) -> MockStoreResult<&'a mut Document> {
    ensure_collection(path)?;

    log::trace!("Resolving collection {} for write", path);
    let mut node = root;
    for segment in path.segments() {
        node = node.document_entry(segment).map_err(|err| {
            log::error!("Cannot resolve {} for write", path);
            MockStoreError::new_with_cause(
                &format!("Cannot resolve {} for write", path),
                ErrorKind::InvalidOperation,
                err,
            )
        })?;
    }
    Ok(node)
}

fn walk<'a>(root: &'a Document, path: &Path) -> Option<&'a Document> {
    log::trace!("Resolving {}", path);
    let mut node = root;
    for segment in path.segments() {
        node = node.get_document(segment)?;
    }
    Some(node)
}

fn walk_mut<'a>(root: &'a mut Document, path: &Path) -> Option<&'a mut Document> {
    log::trace!("Resolving {} for update", path);
    let mut node = root;
    for segment in path.segments() {
        node = node.get_document_mut(segment)?;
    }
    Some(node)
}

fn ensure_collection(path: &Path) -> MockStoreResult<()> {
    if path.is_collection() {
        Ok(())
    } else {
        log::error!("Path '{}' does not address a collection", path);
        Err(MockStoreError::new(
            &format!("Path '{}' does not address a collection", path),
            ErrorKind::MalformedPath,
        ))
    }
}

fn ensure_document(path: &Path) -> MockStoreResult<()> {
    if path.is_document() {
        Ok(())
    } else {
        log::error!("Path '{}' does not address a document", path);
        Err(MockStoreError::new(
            &format!("Path '{}' does not address a document", path),
            ErrorKind::MalformedPath,
        ))
    }
}
