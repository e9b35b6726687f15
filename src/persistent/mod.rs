//! Persistent (immutable) data structures.
//!
//! - [`PersistentSequence`]: persistent singly-linked sequence with
//!   stack-safe folds
//!
//! # Structural Sharing
//!
//! Prepending with `cons` creates a new version that shares every existing
//! node with the original, so old versions stay valid and cheap to keep.
//!
//! # Examples
//!
//! ```rust
//! use fpcore::persistent::PersistentSequence;
//!
//! let sequence = PersistentSequence::new().cons(3).cons(2).cons(1);
//! assert_eq!(sequence.head(), Ok(&1));
//!
//! let extended = sequence.cons(0);
//! assert_eq!(sequence.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```

mod error;
mod sequence;

pub use error::EmptySequenceError;
pub use sequence::{PersistentSequence, PersistentSequenceIntoIterator, PersistentSequenceIterator};
