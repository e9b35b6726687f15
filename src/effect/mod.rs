//! Pure state threading and the programs built on it.
//!
//! - [`StateThread`]: a computation `S -> (A, S)` with monadic combinators
//! - [`random`]: a deterministic generator and [`Rand`] programs over it
//! - [`machine`]: a candy dispenser simulated as a state thread
//!
//! # Examples
//!
//! ```rust
//! use fpcore::effect::random::{self, SimpleRng};
//! use fpcore::effect::StateThread;
//!
//! let dice = StateThread::sequence(&(0..3).map(|_| random::roll_die()).collect());
//! let (rolls, _) = dice.run(SimpleRng::new(42));
//! assert_eq!(rolls.len(), 3);
//! assert!(rolls.iter().all(|face| (1..=6).contains(face)));
//! ```

pub mod machine;
pub mod random;
mod state;

pub use machine::{Input, Machine};
pub use random::{Rand, SimpleRng};
pub use state::StateThread;
