//! Slash-separated locations inside the store tree.
//!
//! Segments alternate between collection names and document ids, starting
//! with a collection: `users` is a collection, `users/alice` a document and
//! `users/alice/orders` a nested collection.

use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::{Debug, Display, Formatter};

use crate::common::PATH_SEPARATOR;
use crate::errors::{ErrorKind, MockStoreError, MockStoreResult};

type Segments = SmallVec<[String; 4]>;

/// An immutable sequence of path segments.
///
/// Every chaining method returns a new `Path`; a `Path` never refers to the
/// tree and never changes once built.
///
/// ```rust
/// use mockstore::path::Path;
///
/// let path = Path::parse("users/alice").unwrap();
/// assert!(path.is_document());
///
/// let orders = path.child("orders").unwrap();
/// assert!(orders.is_collection());
/// assert_eq!(orders.to_string(), "users/alice/orders");
/// assert_eq!(orders.parent().unwrap(), path);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path {
    segments: Segments,
}

impl Path {
    /// The empty path addressing the store root.
    pub fn root() -> Path {
        Path {
            segments: Segments::new(),
        }
    }

    /// Parses `a/b/c`. Leading and trailing separators are ignored, so
    /// `"/users/"` is the same as `"users"`; an empty string or one made only
    /// of separators is the root.
    pub fn parse(path: &str) -> MockStoreResult<Path> {
        Path::root().child(path)
    }

    /// Appends one segment or a relative `/`-separated path.
    ///
    /// # Errors
    ///
    /// [ErrorKind::MalformedPath] if `name` is empty after trimming the
    /// outer separators (unless `self` is the root) or contains an empty
    /// inner segment.
    pub fn child(&self, name: &str) -> MockStoreResult<Path> {
        let trimmed = name.trim_matches(PATH_SEPARATOR);
        if trimmed.is_empty() {
            if self.segments.is_empty() {
                // Path::parse("") and Path::parse("/") are the root
                return Ok(self.clone());
            }
            log::error!("Path segment '{}' is empty", name);
            return Err(MockStoreError::new(
                &format!("Path segment '{}' is empty", name),
                ErrorKind::MalformedPath,
            ));
        }

        let mut segments = self.segments.clone();
        for segment in trimmed.split(PATH_SEPARATOR) {
            if segment.is_empty() {
                log::error!("Path '{}' contains an empty segment", name);
                return Err(MockStoreError::new(
                    &format!("Path '{}' contains an empty segment", name),
                    ErrorKind::MalformedPath,
                ));
            }
            segments.push(segment.to_string());
        }
        Ok(Path { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Odd number of segments.
    pub fn is_collection(&self) -> bool {
        self.segments.len() % 2 == 1
    }

    /// Even, non-zero number of segments.
    pub fn is_document(&self) -> bool {
        !self.segments.is_empty() && self.segments.len() % 2 == 0
    }

    /// The last segment, or `""` for the root.
    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// The path without its last segment; `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Path { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `self` if it addresses a collection.
    pub fn expect_collection(self) -> MockStoreResult<Path> {
        if self.is_collection() {
            Ok(self)
        } else {
            log::error!("Path '{}' does not address a collection", self);
            Err(MockStoreError::new(
                &format!("Path '{}' does not address a collection", self),
                ErrorKind::MalformedPath,
            ))
        }
    }

    /// Returns `self` if it addresses a document.
    pub fn expect_document(self) -> MockStoreResult<Path> {
        if self.is_document() {
            Ok(self)
        } else {
            log::error!("Path '{}' does not address a document", self);
            Err(MockStoreError::new(
                &format!("Path '{}' does not address a document", self),
                ErrorKind::MalformedPath,
            ))
        }
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let separator = PATH_SEPARATOR.to_string();
        write!(f, "{}", self.segments.iter().join(&separator))
    }
}

impl Debug for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Path({})", self)
    }
}
