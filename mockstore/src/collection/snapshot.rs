use std::collections::BTreeMap;

use crate::collection::{Document, DocumentReference};
use crate::common::Value;
use crate::errors::MockStoreResult;

/// The state of a document at the moment it was read.
///
/// A snapshot owns a copy of the fields; later writes to the store do not
/// change it. A snapshot of an absent document reports `exists() == false`
/// and reads as an empty mapping.
#[derive(Clone, Debug)]
pub struct DocumentSnapshot {
    reference: DocumentReference,
    data: Option<Document>,
}

impl DocumentSnapshot {
    pub(crate) fn new(reference: DocumentReference, data: Option<Document>) -> Self {
        DocumentSnapshot { reference, data }
    }

    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    pub fn id(&self) -> &str {
        self.reference.id()
    }

    pub fn reference(&self) -> &DocumentReference {
        &self.reference
    }

    /// The fields of the document, or an empty document if it does not
    /// exist. Nested collections stored in the document are included.
    pub fn to_document(&self) -> Document {
        self.data.clone().unwrap_or_default()
    }

    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.data
            .as_ref()
            .map(Document::to_map)
            .unwrap_or_default()
    }

    /// The value at `field_path` (for example `"address.city"`), or
    /// [Value::Null] if the field or the document is missing.
    pub fn get(&self, field_path: &str) -> MockStoreResult<Value> {
        match &self.data {
            Some(data) => data.get(field_path),
            None => Ok(Value::Null),
        }
    }
}
