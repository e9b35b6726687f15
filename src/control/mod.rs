//! Control structures for lazy evaluation.
//!
//! This module provides:
//!
//! - [`Suspension`]: a deferred computation evaluated at most once
//! - [`LazyStream`]: a lazy, possibly infinite stream of suspended cells
//!
//! # Examples
//!
//! ## Deferred Evaluation
//!
//! ```rust
//! use fpcore::control::Suspension;
//!
//! let suspension = Suspension::new(|| 40 + 2);
//! assert!(!suspension.is_evaluated());
//! assert_eq!(*suspension.force(), 42);
//! ```
//!
//! ## Infinite Streams
//!
//! ```rust
//! use fpcore::control::LazyStream;
//!
//! let fives: Vec<i64> = LazyStream::counting_from(1)
//!     .map(|n| n * 5)
//!     .take(3)
//!     .iter()
//!     .collect();
//! assert_eq!(fives, vec![5, 10, 15]);
//! ```

mod stream;
mod suspension;

pub use stream::{LazyStream, LazyStreamIterator};
pub use suspension::Suspension;
