use crate::collection::Document;
use crate::errors::{MockStoreError, MockStoreResult};
use crate::mock_store::MockStore;
use crate::store_config::StoreConfig;

/// Builder for creating and configuring a [MockStore].
///
/// Errors raised by a setter are captured and returned from [open](Self::open);
/// after the first error the remaining setters are skipped.
///
/// # Examples
///
/// ```rust
/// use mockstore::{doc, MockStore};
///
/// let store = MockStore::builder()
///     .auto_id_length(16)
///     .max_id_attempts(4)
///     .initial_data(doc! { users: { alice: { age: 30 } } })
///     .open()
///     .unwrap();
///
/// let alice = store.document("users/alice").unwrap().get().unwrap();
/// assert!(alice.exists());
/// ```
#[derive(Default)]
pub struct MockStoreBuilder {
    error: Option<MockStoreError>,
    store_config: StoreConfig,
}

impl MockStoreBuilder {
    pub fn new() -> Self {
        MockStoreBuilder {
            error: None,
            store_config: StoreConfig::new(),
        }
    }

    /// Sets the length of generated document ids (at least 8).
    pub fn auto_id_length(mut self, length: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.store_config.set_auto_id_length(length) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Sets how many candidates id generation draws before giving up
    /// (at least 1).
    pub fn max_id_attempts(mut self, attempts: u32) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.store_config.set_max_id_attempts(attempts) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Seeds the store with a whole tree: top-level collection name to
    /// documents by id.
    pub fn initial_data(mut self, data: Document) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.store_config.set_initial_data(data) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Opens a store with the configured settings, or returns the first error
    /// captured while configuring.
    pub fn open(self) -> MockStoreResult<MockStore> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(MockStore::with_config(self.store_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use crate::errors::ErrorKind;

    #[test]
    fn test_new() {
        let builder = MockStoreBuilder::new();
        assert_eq!(builder.store_config.auto_id_length(), 20);
        assert!(builder.error.is_none());
    }

    #[test]
    fn test_open_with_defaults() {
        let store = MockStoreBuilder::new().open().unwrap();
        assert_eq!(store.config().auto_id_length(), 20);
        assert!(store.config().is_configured());
        assert!(store.collections().is_empty());
    }

    #[test]
    fn test_auto_id_length() {
        let store = MockStoreBuilder::new().auto_id_length(10).open().unwrap();
        let reference = store.collection("users").unwrap().new_document().unwrap();
        assert_eq!(reference.id().len(), 10);
    }

    #[test]
    fn test_auto_id_length_error_propagation() {
        let result = MockStoreBuilder::new().auto_id_length(2).open();
        let err = result.err().unwrap();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
        assert!(err.to_string().to_lowercase().contains("auto id length"));
    }

    #[test]
    fn test_first_error_wins() {
        let result = MockStoreBuilder::new()
            .max_id_attempts(0)
            .auto_id_length(2)
            .open();
        let err = result.err().unwrap();
        assert!(err.to_string().to_lowercase().contains("max id attempts"));
    }

    #[test]
    fn test_initial_data() {
        let store = MockStoreBuilder::new()
            .initial_data(doc! { users: { alice: { age: 30 } } })
            .open()
            .unwrap();
        let snapshot = store.document("users/alice").unwrap().get().unwrap();
        assert_eq!(snapshot.to_document(), doc! { age: 30 });
    }
}
