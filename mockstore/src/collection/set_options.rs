/// Options for [DocumentReference::set_with](crate::collection::DocumentReference::set_with).
///
/// With `merge` disabled (the default) a set replaces the whole document.
/// With `merge` enabled the payload's top-level fields are copied over the
/// existing document and all other fields are kept. Nested mappings are
/// replaced, not merged; use
/// [DocumentReference::update](crate::collection::DocumentReference::update)
/// for a recursive merge.
///
/// # Examples
///
/// ```rust
/// use mockstore::collection::{merge, SetOptions};
///
/// assert!(merge().is_merge());
/// assert!(!SetOptions::default().is_merge());
/// assert!(SetOptions::new(true).is_merge());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SetOptions {
    merge: bool,
}

impl SetOptions {
    /// Creates a new `SetOptions`.
    ///
    /// # Arguments
    ///
    /// * `merge` - If true, merge top-level fields into the existing document
    pub fn new(merge: bool) -> Self {
        Self { merge }
    }

    /// Returns whether the set merges into the existing document.
    pub fn is_merge(&self) -> bool {
        self.merge
    }
}

/// Creates `SetOptions` with merge behavior.
pub fn merge() -> SetOptions {
    SetOptions::new(true)
}
