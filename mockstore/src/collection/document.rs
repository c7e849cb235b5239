use im::OrdMap;
use smallvec::SmallVec;

use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, MockStoreError, MockStoreResult};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

type FieldVec = SmallVec<[String; 8]>;

/// An ordered mapping of field name to [Value].
///
/// `Document` is both the payload users read and write and the building block
/// of the store tree: a collection is a `Document` whose values are documents,
/// and a nested collection is a field of its parent document.
///
/// Field names may address embedded fields with the `.` separator, so for
/// `{"a": {"b": 1}}` the call `document.get("a.b")` returns `1`.
///
/// The map is a persistent `im::OrdMap`; cloning a document is O(1) and shares
/// structure with the original until either side is modified.
#[derive(Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct Document {
    data: OrdMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: OrdMap::new(),
        }
    }

    /// Checks if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Associates `value` with `key`, replacing any previous value.
    ///
    /// Embedded keys such as `"user.name"` create or descend into nested
    /// documents as needed.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidFieldName] if the key, or any component
    /// of an embedded key, is empty.
    ///
    /// ```rust
    /// use mockstore::collection::Document;
    /// use mockstore::common::Value;
    ///
    /// let mut doc = Document::new();
    /// doc.put("name", "Alice").unwrap();
    /// doc.put("address.city", "Paris").unwrap();
    /// assert_eq!(doc.get("address.city").unwrap(), Value::from("Paris"));
    /// ```
    pub fn put<'a, T: Into<Value>>(&mut self, key: impl Into<Cow<'a, str>>, value: T) -> MockStoreResult<()> {
        let key = key.into();
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(MockStoreError::new(
                "Document does not support empty key",
                ErrorKind::InvalidFieldName,
            ));
        }

        let value = value.into();
        if self.is_embedded(&key) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.into_owned(), value);
            Ok(())
        }
    }

    /// Returns the value for `key`, or [Value::Null] if there is none.
    ///
    /// A top-level key containing the separator wins over the embedded
    /// interpretation of the same string.
    pub fn get(&self, key: &str) -> MockStoreResult<Value> {
        match self.data.get(key) {
            Some(value) => Ok(value.clone()),
            None => {
                if self.is_embedded(key) {
                    self.get_by_embedded_key(key)
                } else {
                    Ok(Value::Null)
                }
            }
        }
    }

    /// Removes `key` (top-level or embedded). Removing a missing key is not
    /// an error.
    pub fn remove(&mut self, key: &str) -> MockStoreResult<()> {
        if self.is_embedded(key) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_remove(&splits)
        } else {
            self.data.remove(key);
            Ok(())
        }
    }

    /// Number of top-level entries.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Recursively merges `other` into this document.
    ///
    /// When both sides hold a document under the same key the two are merged
    /// key by key; in every other case the value from `other` wins. Keys only
    /// present here are kept.
    ///
    /// ```rust
    /// use mockstore::doc;
    ///
    /// let mut user = doc! { name: "Alice", address: { city: "Paris", zip: 75001 } };
    /// user.merge(&doc! { address: { zip: 75002 } });
    /// assert_eq!(user, doc! { name: "Alice", address: { city: "Paris", zip: 75002 } });
    /// ```
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            match (self.data.get_mut(key), value) {
                (Some(Value::Document(current)), Value::Document(incoming)) => {
                    current.merge(incoming);
                }
                _ => {
                    self.data.insert(key.clone(), value.clone());
                }
            }
        }
    }

    /// Copies every top-level entry of `other` into this document, replacing
    /// existing values wholesale. Nested documents are not merged.
    pub fn merge_top_level(&mut self, other: &Document) {
        for (key, value) in other.data.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }

    /// Checks if a top-level key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Checks if a top-level or embedded field exists.
    pub fn contains_field(&self, field: &str) -> bool {
        if self.contains_key(field) {
            true
        } else {
            self.fields().iter().any(|it| it == field)
        }
    }

    /// All leaf field paths, embedded ones joined with the separator.
    pub fn fields(&self) -> FieldVec {
        self.get_fields_internal("")
    }

    /// Top-level keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    /// Converts this document to a [BTreeMap] of its top-level entries.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.data.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Iterates over owned copies of the top-level entries.
    pub fn iter(&self) -> DocumentIter {
        DocumentIter {
            keys: self.data.keys().cloned().collect(),
            data: self.clone(),
            index: 0,
        }
    }

    pub(crate) fn get_ref(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// The nested document stored under `key`, if the value is one.
    pub(crate) fn get_document(&self, key: &str) -> Option<&Document> {
        self.data.get(key).and_then(Value::as_document)
    }

    pub(crate) fn get_document_mut(&mut self, key: &str) -> Option<&mut Document> {
        self.data.get_mut(key).and_then(Value::as_document_mut)
    }

    /// The nested document stored under `key`, inserting an empty one when
    /// the key is absent. Fails if the key holds a non-document value.
    pub(crate) fn document_entry(&mut self, key: &str) -> MockStoreResult<&mut Document> {
        if !self.data.contains_key(key) {
            self.data.insert(key.to_string(), Value::Document(Document::new()));
        }

        match self.data.get_mut(key) {
            Some(Value::Document(doc)) => Ok(doc),
            _ => {
                log::error!("Field {} does not hold a mapping", key);
                Err(MockStoreError::new(
                    &format!("Field {} does not hold a mapping", key),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    pub(crate) fn insert_raw(&mut self, key: String, value: Value) {
        self.data.insert(key, value);
    }

    pub(crate) fn remove_raw(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let mut json_string = String::with_capacity(self.data.len() * 30 + indent * 2);
        json_string.push_str("{\n");
        let indent_str = " ".repeat(indent + 2);
        for (key, value) in self.data.iter() {
            json_string.push_str(&format!(
                "{}\"{}\": {},\n",
                indent_str,
                key,
                value.to_pretty_json(indent + 2)
            ));
        }

        json_string.pop();
        json_string.pop();
        json_string.push_str(&format!("\n{}}}", " ".repeat(indent)));
        json_string
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        if self.data.is_empty() {
            return "{}".to_string();
        }

        let entries: Vec<String> = self
            .data
            .iter()
            .map(|(key, value)| format!("\"{}\": {}", key, value.to_debug_string(indent + 2)))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn is_embedded(&self, key: &str) -> bool {
        key.contains(FIELD_SEPARATOR)
    }

    fn get_fields_internal(&self, prefix: &str) -> FieldVec {
        let mut fields = FieldVec::new();

        for (key, value) in self.data.iter() {
            let field = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}{}{}", prefix, FIELD_SEPARATOR, key)
            };

            match value {
                Value::Document(doc) if !doc.is_empty() => {
                    fields.append(&mut doc.get_fields_internal(&field));
                }
                _ => fields.push(field),
            }
        }
        fields
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> MockStoreResult<()> {
        let (key, remaining) = match splits.split_first() {
            Some((key, remaining)) if !key.is_empty() => (*key, remaining),
            _ => {
                log::error!("Embedded key contains an empty field name");
                return Err(MockStoreError::new(
                    "Embedded key contains an empty field name",
                    ErrorKind::InvalidFieldName,
                ));
            }
        };

        if remaining.is_empty() {
            self.data.insert(key.to_string(), value);
            return Ok(());
        }

        // validate before touching the tree so a failed put leaves no trace
        if remaining.iter().any(|it| it.is_empty()) {
            log::error!("Embedded key contains an empty field name");
            return Err(MockStoreError::new(
                "Embedded key contains an empty field name",
                ErrorKind::InvalidFieldName,
            ));
        }

        match self.data.get_mut(key) {
            Some(Value::Document(nested)) => nested.deep_put(remaining, value),
            _ => {
                let mut nested = Document::new();
                nested.deep_put(remaining, value)?;
                self.data.insert(key.to_string(), Value::Document(nested));
                Ok(())
            }
        }
    }

    fn deep_remove(&mut self, splits: &[&str]) -> MockStoreResult<()> {
        let (key, remaining) = match splits.split_first() {
            Some((key, remaining)) if !key.is_empty() => (*key, remaining),
            _ => {
                log::error!("Embedded key contains an empty field name");
                return Err(MockStoreError::new(
                    "Embedded key contains an empty field name",
                    ErrorKind::InvalidFieldName,
                ));
            }
        };

        if remaining.is_empty() {
            self.data.remove(key);
            return Ok(());
        }

        if let Some(Value::Document(nested)) = self.data.get_mut(key) {
            nested.deep_remove(remaining)?;
        }
        Ok(())
    }

    fn get_by_embedded_key(&self, key: &str) -> MockStoreResult<Value> {
        let mut current = self;
        let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
        if splits.iter().any(|it| it.is_empty()) {
            log::error!("Embedded key {} contains an empty field name", key);
            return Err(MockStoreError::new(
                &format!("Embedded key {} contains an empty field name", key),
                ErrorKind::InvalidFieldName,
            ));
        }

        let (last, parents) = match splits.split_last() {
            Some(split) => split,
            None => return Ok(Value::Null),
        };

        for part in parents {
            match current.get_document(part) {
                Some(nested) => current = nested,
                None => return Ok(Value::Null),
            }
        }
        Ok(current.data.get(*last).cloned().unwrap_or(Value::Null))
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

pub struct DocumentIter {
    keys: Vec<String>,
    data: Document,
    index: usize,
}

impl Iterator for DocumentIter {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.keys.len() {
            let key = &self.keys[self.index];
            self.index += 1;
            if let Some(value) = self.data.data.get(key) {
                return Some((key.clone(), value.clone()));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.keys.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

#[doc(hidden)]
pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Keys may be bare identifiers or string literals; values may be nested
/// `{ ... }` documents, `[ ... ]` arrays or any expression convertible into a
/// [Value]. Wrap arithmetic in parentheses.
///
/// ```rust
/// use mockstore::doc;
///
/// let empty = doc! {};
/// assert!(empty.is_empty());
///
/// let user = doc! {
///     name: "Alice",
///     "last-seen": (1000 * 60),
///     address: { city: "Paris", tags: ["home", "work"] },
/// };
/// assert_eq!(user.size(), 3);
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::collection::Document::new()
    };

    () => {
        $crate::collection::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            #[allow(unused_imports)]
            use $crate::doc_value;

            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value))
                .expect(&format!("Failed to put value {} in document", stringify!($value)));
            )*
            doc
        }
    };
}

/// Helper for [doc!]: converts nested documents, arrays and expressions.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;

    fn set_up() -> Document {
        doc! {
            score: 1034,
            location: {
                state: "NY",
                city: "New York",
                address: {
                    line1: "40",
                    zip: 10001,
                },
            },
            category: ["food", "produce", "grocery"],
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("\"ABC\""), "ABC");
        assert_eq!(normalize("ABC"), "ABC");
    }

    #[test]
    fn test_new_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.size(), 0);
    }

    #[test]
    fn test_put_and_get() {
        let mut doc = Document::new();
        doc.put("name", "Alice").unwrap();
        assert_eq!(doc.get("name").unwrap(), Value::from("Alice"));
        assert_eq!(doc.get("missing").unwrap(), Value::Null);
    }

    #[test]
    fn test_put_empty_key() {
        let mut doc = Document::new();
        let err = doc.put("", 1).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFieldName);
    }

    #[test]
    fn test_put_embedded_key_creates_nested() {
        let mut doc = Document::new();
        doc.put("a.b.c", 1).unwrap();
        assert_eq!(doc, doc! { a: { b: { c: 1 } } });
    }

    #[test]
    fn test_put_embedded_key_keeps_siblings() {
        let mut doc = doc! { a: { x: 1 } };
        doc.put("a.y", 2).unwrap();
        assert_eq!(doc, doc! { a: { x: 1, y: 2 } });
    }

    #[test]
    fn test_put_embedded_key_with_empty_part_leaves_doc_untouched() {
        let mut doc = doc! { a: 1 };
        assert!(doc.put("b..c", 1).is_err());
        assert!(doc.put("b.", 1).is_err());
        assert_eq!(doc, doc! { a: 1 });
    }

    #[test]
    fn test_get_embedded() {
        let doc = set_up();
        assert_eq!(doc.get("location.city").unwrap(), Value::from("New York"));
        assert_eq!(doc.get("location.address.zip").unwrap(), Value::I32(10001));
        assert_eq!(doc.get("location.country").unwrap(), Value::Null);
        assert_eq!(doc.get("score.value").unwrap(), Value::Null);
        assert!(doc.get("location..city").is_err());
    }

    #[test]
    fn test_top_level_key_with_separator_wins() {
        let mut doc = Document::new();
        doc.insert_raw("a.b".to_string(), Value::from(1));
        doc.put("a", doc! { b: 2 }).unwrap();
        assert_eq!(doc.get("a.b").unwrap(), Value::I32(1));
    }

    #[test]
    fn test_remove() {
        let mut doc = set_up();
        doc.remove("score").unwrap();
        assert!(!doc.contains_key("score"));
        doc.remove("location.address.zip").unwrap();
        assert_eq!(doc.get("location.address.zip").unwrap(), Value::Null);
        assert_eq!(doc.get("location.address.line1").unwrap(), Value::from("40"));
        doc.remove("missing").unwrap();
        doc.remove("missing.deep").unwrap();
    }

    #[test]
    fn test_merge_is_recursive() {
        let mut doc = doc! { id: 1, nested: { a: 1, b: 2 } };
        doc.merge(&doc! { nested: { b: 3, c: 4 }, updated: true });
        assert_eq!(
            doc,
            doc! { id: 1, nested: { a: 1, b: 3, c: 4 }, updated: true }
        );
    }

    #[test]
    fn test_merge_replaces_non_document_values() {
        let mut doc = doc! { a: 1, b: { x: 1 } };
        doc.merge(&doc! { a: { y: 2 }, b: 5 });
        assert_eq!(doc, doc! { a: { y: 2 }, b: 5 });
    }

    #[test]
    fn test_merge_top_level_is_shallow() {
        let mut doc = doc! { id: 1, nested: { a: 1, b: 2 } };
        doc.merge_top_level(&doc! { nested: { c: 3 } });
        assert_eq!(doc, doc! { id: 1, nested: { c: 3 } });
    }

    #[test]
    fn test_contains_field() {
        let doc = set_up();
        assert!(doc.contains_field("score"));
        assert!(doc.contains_field("location"));
        assert!(doc.contains_field("location.address.zip"));
        assert!(!doc.contains_field("location.country"));
    }

    #[test]
    fn test_fields() {
        let doc = set_up();
        let fields = doc.fields();
        assert!(fields.contains(&"score".to_string()));
        assert!(fields.contains(&"location.state".to_string()));
        assert!(fields.contains(&"location.address.line1".to_string()));
        assert!(fields.contains(&"category".to_string()));
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn test_to_map_and_iter() {
        let doc = doc! { b: 2, a: 1 };
        let map = doc.to_map();
        assert_eq!(map.get("a"), Some(&Value::I32(1)));

        let entries: Vec<(String, Value)> = doc.iter().collect();
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[1].0, "b");
        assert_eq!(doc.iter().size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_document_entry() {
        let mut doc = doc! { value: 1 };
        doc.document_entry("child").unwrap().put("x", 1).unwrap();
        assert_eq!(doc.get("child.x").unwrap(), Value::I32(1));

        let err = doc.document_entry("value").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = doc! { a: 1 };
        let mut copy = original.clone();
        copy.put("b", 2).unwrap();
        assert_eq!(original.size(), 1);
        assert_eq!(copy.size(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Document::new().to_string(), "{}");
        let rendered = doc! { a: 1 }.to_string();
        assert!(rendered.contains("\"a\": 1"));
    }

    #[test]
    fn test_doc_macro_variants() {
        let value = 5;
        let doc = doc! {
            "quoted": 1,
            computed: (value * 2),
            list: [1, { inner: true }],
        };
        assert_eq!(doc.get("quoted").unwrap(), Value::I32(1));
        assert_eq!(doc.get("computed").unwrap(), Value::I32(10));
        let list = doc.get("list").unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);
    }
}
