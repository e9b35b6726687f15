//! # fpcore
//!
//! A small functional runtime for Rust: persistent sequences, memoized
//! suspensions, lazy corecursive streams, and pure state threading.
//!
//! ## Overview
//!
//! - **Persistent Sequences**: an immutable singly-linked sequence with
//!   structural sharing and stack-safe folds
//! - **Control Structures**: [`Suspension`](control::Suspension) for
//!   evaluate-at-most-once values and [`LazyStream`](control::LazyStream) for
//!   possibly infinite streams built with `unfold`
//! - **Effects**: [`StateThread`](effect::StateThread) for pure state
//!   threading, a deterministic random generator, and a vending machine
//!   simulation built on both
//!
//! ## Feature Flags
//!
//! - `persistent`: Persistent sequence
//! - `control`: Suspension and lazy streams
//! - `effect`: State threading, random generator, machine simulation
//! - `serde`: Serialization support
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use fpcore::prelude::*;
//!
//! let evens: PersistentSequence<i64> = LazyStream::counting_from(0)
//!     .filter(|n| n % 2 == 0)
//!     .take(3)
//!     .to_persistent_sequence();
//! assert_eq!(evens, vec![0, 2, 4].into_iter().collect());
//!
//! let program = StateThread::modify(|count: i32| count + 1).then(StateThread::get());
//! assert_eq!(program.run(41), (42, 42));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use fpcore::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "control")]
    pub use crate::control::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;

    #[cfg(feature = "effect")]
    pub use crate::effect::*;
}

#[cfg(feature = "control")]
pub mod control;

#[cfg(feature = "persistent")]
pub mod persistent;

#[cfg(feature = "effect")]
pub mod effect;
