use crate::collection::Document;
use crate::common::{Value, FIELD_SEPARATOR, PATH_SEPARATOR};
use crate::errors::{ErrorKind, MockStoreError, MockStoreResult};

/// Checks that every key holding a mapping can be walked as a path segment:
/// non-empty and free of `/`. Any such key may be addressed as a collection
/// name or a document id, so a tree injected from outside must pass this
/// before it replaces the store's contents.
pub(crate) fn validate_tree(tree: &Document) -> MockStoreResult<()> {
    for (key, value) in tree.iter() {
        if let Value::Document(node) = &value {
            if key.is_empty() || key.contains(PATH_SEPARATOR) {
                log::error!("Invalid collection name or document id '{}' in store tree", key);
                return Err(MockStoreError::new(
                    &format!("Invalid collection name or document id '{}' in store tree", key),
                    ErrorKind::MalformedPath,
                ));
            }
            validate_tree(node)?;
        }
    }
    Ok(())
}

/// Rewrites every top-level key holding a field path (`"a.b"`) into the
/// nested structure it addresses, so `{"a.b": 1, "c": 2}` becomes
/// `{"a": {"b": 1}, "c": 2}`. Plain keys are copied as they are.
pub(crate) fn expand_field_paths(payload: &Document) -> MockStoreResult<Document> {
    let mut expanded = Document::new();
    for (key, value) in payload.iter() {
        if key.contains(FIELD_SEPARATOR) {
            expanded.put(key.as_str(), value)?;
            continue;
        }

        if let Value::Document(incoming) = &value {
            if let Some(current) = expanded.get_document_mut(&key) {
                current.merge(incoming);
                continue;
            }
        }
        expanded.insert_raw(key, value);
    }
    Ok(expanded)
}
