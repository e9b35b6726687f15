//! Error types for persistent data structures.

/// Returned when an operation that needs a first or last element is called on
/// an empty [`PersistentSequence`].
///
/// The error records which operation failed so that callers that propagate it
/// with `?` still get a useful message.
///
/// # Examples
///
/// ```rust
/// use fpcore::persistent::{EmptySequenceError, PersistentSequence};
///
/// let empty: PersistentSequence<i32> = PersistentSequence::new();
/// let error = empty.head().unwrap_err();
/// assert_eq!(error.operation(), "head");
/// assert_eq!(error.to_string(), "head called on an empty sequence");
/// ```
///
/// [`PersistentSequence`]: super::PersistentSequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{operation} called on an empty sequence")]
pub struct EmptySequenceError {
    operation: &'static str,
}

impl EmptySequenceError {
    #[inline]
    pub(crate) const fn new(operation: &'static str) -> Self {
        Self { operation }
    }

    /// The name of the operation that found the sequence empty.
    #[inline]
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }
}
