use std::collections::VecDeque;

use crate::collection::{CollectionReference, DocumentSnapshot};
use crate::errors::MockStoreResult;

/// A lazy stream of the documents of a collection.
///
/// The ids are captured when the stream is created. Each step reads the
/// next document from the live tree, so a document deleted after the stream
/// was created is skipped and a document changed in between is yielded with
/// its new contents. Documents added afterwards are not visited.
pub struct DocumentStream {
    collection: CollectionReference,
    pending: VecDeque<String>,
}

impl DocumentStream {
    pub(crate) fn new(collection: CollectionReference, ids: Vec<String>) -> Self {
        DocumentStream {
            collection,
            pending: ids.into(),
        }
    }

    /// Number of ids not visited yet, including ones that may have been
    /// deleted since.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl Iterator for DocumentStream {
    type Item = MockStoreResult<DocumentSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.pending.pop_front() {
            let reference = match self.collection.document(&id) {
                Ok(reference) => reference,
                Err(e) => return Some(Err(e)),
            };

            match reference.get() {
                Ok(snapshot) if snapshot.exists() => return Some(Ok(snapshot)),
                Ok(_) => {
                    log::trace!("Skipping deleted document {}", id);
                    continue;
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.pending.len()))
    }
}
