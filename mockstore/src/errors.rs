use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for mockstore operations.
///
/// Each kind names one category of failure so callers can match on it instead
/// of parsing messages.
///
/// # Examples
///
/// ```rust
/// use mockstore::errors::{ErrorKind, MockStoreError, MockStoreResult};
///
/// fn example() -> MockStoreResult<()> {
///     Err(MockStoreError::new("no such document", ErrorKind::NotFound))
/// }
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The segments of a path do not alternate collection/document correctly,
    /// or a segment is empty
    MalformedPath,
    /// The target document does not exist
    NotFound,
    /// The target document exists already
    AlreadyExists,
    /// A field name or field path component is empty
    InvalidFieldName,
    /// The operation is not valid against the current tree or configuration
    InvalidOperation,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::MalformedPath => write!(f, "Malformed path"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::AlreadyExists => write!(f, "Already exists"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// The error type of every fallible mockstore operation.
///
/// Carries a message, an [ErrorKind], an optional cause and the backtrace
/// captured where the error was created.
///
/// ```rust
/// use mockstore::errors::{ErrorKind, MockStoreError};
///
/// let cause = MockStoreError::new("field 'a' is not a mapping", ErrorKind::InvalidOperation);
/// let err = MockStoreError::new_with_cause("write failed", ErrorKind::InvalidOperation, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct MockStoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<MockStoreError>>,
    backtrace: Atomic<Backtrace>,
}

impl MockStoreError {
    /// Creates a new error with the given message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        MockStoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new error wrapping `cause`.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: MockStoreError) -> Self {
        MockStoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&MockStoreError> {
        self.cause.as_deref()
    }
}

impl Display for MockStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for MockStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // message with stack trace, or message followed by its cause chain
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for MockStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// Shorthand for `Result<T, MockStoreError>`.
pub type MockStoreResult<T> = Result<T, MockStoreError>;
