use log::{debug, warn};
use rand::rngs::OsRng;
use rand::Rng;
use std::sync::Arc;

use crate::collection::Document;
use crate::common::AUTO_ID_ALPHABET;
use crate::errors::{ErrorKind, MockStoreError, MockStoreResult};

/// Produces id candidates. The generator checks them for uniqueness.
pub trait IdSource: Send + Sync {
    fn candidate(&self, length: usize) -> String;
}

/// Draws alphanumeric characters from the operating system RNG.
#[derive(Default)]
pub struct OsRngIdSource;

impl IdSource for OsRngIdSource {
    fn candidate(&self, length: usize) -> String {
        let mut rng = OsRng;
        (0..length)
            .map(|_| {
                let index = rng.gen_range(0..AUTO_ID_ALPHABET.len());
                AUTO_ID_ALPHABET[index] as char
            })
            .collect()
    }
}

/// Generates document ids that are unique within a collection at the time
/// of generation.
#[derive(Clone)]
pub struct AutoIdGenerator {
    length: usize,
    max_attempts: u32,
    source: Arc<dyn IdSource>,
}

impl AutoIdGenerator {
    pub fn new(length: usize, max_attempts: u32) -> Self {
        AutoIdGenerator::with_source(length, max_attempts, Arc::new(OsRngIdSource))
    }

    pub fn with_source(length: usize, max_attempts: u32, source: Arc<dyn IdSource>) -> Self {
        AutoIdGenerator {
            length,
            max_attempts,
            source,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns a candidate that is not a key of `collection`.
    ///
    /// # Errors
    ///
    /// [ErrorKind::InternalError] if every attempt collided.
    pub fn generate(&self, collection: Option<&Document>) -> MockStoreResult<String> {
        for attempt in 1..=self.max_attempts {
            let candidate = self.source.candidate(self.length);
            match collection {
                Some(existing) if existing.contains_key(&candidate) => {
                    warn!("Generated id {} already exists, attempt {}", candidate, attempt);
                }
                _ => {
                    debug!("Generated document id {}", candidate);
                    return Ok(candidate);
                }
            }
        }

        log::error!("Failed to generate a unique id after {} attempts", self.max_attempts);
        Err(MockStoreError::new(
            &format!("Failed to generate a unique id after {} attempts", self.max_attempts),
            ErrorKind::InternalError,
        ))
    }
}
