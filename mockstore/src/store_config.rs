//! Configuration of a [MockStore](crate::MockStore).

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::collection::Document;
use crate::common::{
    atomic, validate_tree, Atomic, ReadExecutor, WriteExecutor, DEFAULT_AUTO_ID_LENGTH,
    DEFAULT_MAX_ID_ATTEMPTS, MIN_AUTO_ID_LENGTH,
};
use crate::errors::{ErrorKind, MockStoreError, MockStoreResult};

/// Settings of a store instance.
///
/// Values can only be changed until the store opens; afterwards every setter
/// fails with [ErrorKind::InvalidOperation].
///
/// # Examples
///
/// ```rust
/// use mockstore::MockStore;
///
/// let store = MockStore::builder()
///     .auto_id_length(24)
///     .open()
///     .unwrap();
/// assert_eq!(store.config().auto_id_length(), 24);
/// ```
#[derive(Clone)]
pub struct StoreConfig {
    inner: Arc<StoreConfigInner>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        StoreConfig {
            inner: Arc::new(StoreConfigInner::new()),
        }
    }

    /// Length of generated document ids.
    pub fn auto_id_length(&self) -> usize {
        self.inner.auto_id_length.load(Ordering::Relaxed)
    }

    /// Sets the length of generated document ids.
    ///
    /// # Errors
    ///
    /// Returns error if the store is already open or `length` is below the
    /// minimum of 8.
    pub fn set_auto_id_length(&self, length: usize) -> MockStoreResult<()> {
        self.inner.set_auto_id_length(length)
    }

    /// Number of candidates drawn before id generation gives up.
    pub fn max_id_attempts(&self) -> u32 {
        self.inner.max_id_attempts.load(Ordering::Relaxed)
    }

    /// Sets the number of candidates drawn before id generation gives up.
    ///
    /// # Errors
    ///
    /// Returns error if the store is already open or `attempts` is zero.
    pub fn set_max_id_attempts(&self, attempts: u32) -> MockStoreResult<()> {
        self.inner.set_max_id_attempts(attempts)
    }

    /// The tree injected when the store opens.
    pub fn initial_data(&self) -> Document {
        self.inner.initial_data.read_with(|it| it.clone())
    }

    /// Sets the tree injected when the store opens.
    pub fn set_initial_data(&self, data: Document) -> MockStoreResult<()> {
        self.inner.set_initial_data(data)
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    pub(crate) fn initialize(&self) {
        self.inner.configured.store(true, Ordering::Relaxed);
    }
}

struct StoreConfigInner {
    configured: AtomicBool,
    auto_id_length: AtomicUsize,
    max_id_attempts: AtomicU32,
    initial_data: Atomic<Document>,
}

impl StoreConfigInner {
    fn new() -> Self {
        StoreConfigInner {
            configured: AtomicBool::from(false),
            auto_id_length: AtomicUsize::from(DEFAULT_AUTO_ID_LENGTH),
            max_id_attempts: AtomicU32::from(DEFAULT_MAX_ID_ATTEMPTS),
            initial_data: atomic(Document::new()),
        }
    }

    fn ensure_not_configured(&self, setting: &str) -> MockStoreResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after the store is open", setting);
            return Err(MockStoreError::new(
                &format!("{} cannot be changed after the store is open", setting),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    fn set_auto_id_length(&self, length: usize) -> MockStoreResult<()> {
        self.ensure_not_configured("Auto id length")?;
        if length < MIN_AUTO_ID_LENGTH {
            log::error!("Auto id length must be at least {}, got {}", MIN_AUTO_ID_LENGTH, length);
            return Err(MockStoreError::new(
                &format!("Auto id length must be at least {}, got {}", MIN_AUTO_ID_LENGTH, length),
                ErrorKind::InvalidOperation,
            ));
        }
        self.auto_id_length.store(length, Ordering::Relaxed);
        Ok(())
    }

    fn set_max_id_attempts(&self, attempts: u32) -> MockStoreResult<()> {
        self.ensure_not_configured("Max id attempts")?;
        if attempts == 0 {
            log::error!("Max id attempts must be at least 1");
            return Err(MockStoreError::new(
                "Max id attempts must be at least 1",
                ErrorKind::InvalidOperation,
            ));
        }
        self.max_id_attempts.store(attempts, Ordering::Relaxed);
        Ok(())
    }

    fn set_initial_data(&self, data: Document) -> MockStoreResult<()> {
        self.ensure_not_configured("Initial data")?;
        validate_tree(&data)?;
        self.initial_data.write_with(|it| *it = data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::doc;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new();
        assert_eq!(config.auto_id_length(), 20);
        assert_eq!(config.max_id_attempts(), 16);
        assert!(config.initial_data().is_empty());
        assert!(!config.is_configured());
    }

    #[test]
    fn test_set_auto_id_length() {
        let config = StoreConfig::new();
        config.set_auto_id_length(32).unwrap();
        assert_eq!(config.auto_id_length(), 32);

        let err = config.set_auto_id_length(4).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
        assert_eq!(config.auto_id_length(), 32);
    }

    #[test]
    fn test_set_max_id_attempts() {
        let config = StoreConfig::new();
        config.set_max_id_attempts(3).unwrap();
        assert_eq!(config.max_id_attempts(), 3);
        assert!(config.set_max_id_attempts(0).is_err());
    }

    #[test]
    fn test_set_initial_data() {
        let config = StoreConfig::new();
        config.set_initial_data(doc! { users: { alice: { age: 30 } } }).unwrap();
        assert!(config.initial_data().contains_key("users"));
    }

    #[test]
    fn test_set_initial_data_rejects_invalid_ids() {
        let config = StoreConfig::new();
        let mut users = doc! { c: { x: 2 } };
        users.insert_raw("a/b".to_string(), Value::from(doc! { x: 1 }));
        let mut data = Document::new();
        data.insert_raw("users".to_string(), Value::from(users));

        let err = config.set_initial_data(data).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedPath);
        assert!(config.initial_data().is_empty());
    }

    #[test]
    fn test_setters_fail_after_initialize() {
        let config = StoreConfig::new();
        config.initialize();
        assert!(config.is_configured());
        assert!(config.set_auto_id_length(30).is_err());
        assert!(config.set_max_id_attempts(3).is_err());
        assert!(config.set_initial_data(Document::new()).is_err());
    }

    #[test]
    fn test_clones_share_settings() {
        let config = StoreConfig::new();
        let clone = config.clone();
        clone.set_auto_id_length(12).unwrap();
        assert_eq!(config.auto_id_length(), 12);
    }
}
