//! Deterministic pseudo-random numbers threaded as pure state.
//!
//! [`SimpleRng`] is a 48-bit linear congruential generator. Every draw takes
//! the generator by reference and returns the drawn value together with the
//! *next* generator, leaving the original untouched, so the same generator
//! always produces the same value.
//!
//! [`Rand<A>`] is a [`StateThread`] over `SimpleRng`. The free functions in
//! this module build `Rand` values that compose with the ordinary
//! `StateThread` combinators.
//!
//! # Examples
//!
//! ```rust
//! use fpcore::effect::random::{self, SimpleRng};
//!
//! let rng = SimpleRng::new(42);
//! let (first, next) = rng.next_int();
//! assert_eq!(first, 16_159_453);
//! assert_eq!(next.next_int().0, -1_281_479_697);
//!
//! // Same seed, same value.
//! assert_eq!(rng.next_int().0, first);
//!
//! let pair = random::both(random::int(), random::double());
//! let ((_, double), _) = pair.run(SimpleRng::new(7));
//! assert!((0.0..1.0).contains(&double));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::StateThread;
use crate::persistent::PersistentSequence;

const MULTIPLIER: u64 = 0x5_DEEC_E66D;
const INCREMENT: u64 = 0xB;
const MASK: u64 = (1 << 48) - 1;

/// Divisor mapping a non-negative `i32` into `[0, 1)`.
const UNIT_INTERVAL_DIVISOR: f64 = 2_147_483_648.0;

/// A pseudo-random generator state.
///
/// # Examples
///
/// ```rust
/// use fpcore::effect::random::SimpleRng;
///
/// let (values, _) = SimpleRng::new(42).ints(3);
/// assert_eq!(values.len(), 3);
/// assert_eq!(values.head(), Ok(&16_159_453));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimpleRng {
    seed: u64,
}

impl SimpleRng {
    /// Creates a generator from a seed. Only the low 48 bits are kept.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed: seed & MASK }
    }

    /// The current 48-bit seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws a 32-bit integer and returns the next generator.
    ///
    /// The output is bits 16 to 47 of the advanced seed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn next_int(&self) -> (i32, Self) {
        let next_seed = self.seed.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT) & MASK;
        ((next_seed >> 16) as u32 as i32, Self { seed: next_seed })
    }

    /// Draws an integer in `0..=i32::MAX`.
    ///
    /// `i32::MIN` has no positive counterpart and maps to `i32::MAX`.
    #[must_use]
    pub const fn non_negative_int(&self) -> (i32, Self) {
        let (value, next) = self.next_int();
        let magnitude = match value.checked_abs() {
            Some(magnitude) => magnitude,
            None => i32::MAX,
        };
        (magnitude, next)
    }

    /// Draws a double in `[0, 1)`.
    #[must_use]
    pub fn next_double(&self) -> (f64, Self) {
        let (value, next) = self.non_negative_int();
        (f64::from(value) / UNIT_INTERVAL_DIVISOR, next)
    }

    /// Draws an integer then a double.
    #[must_use]
    pub fn int_double(&self) -> ((i32, f64), Self) {
        let (int, after_int) = self.next_int();
        let (double, after_double) = after_int.next_double();
        ((int, double), after_double)
    }

    /// Draws a double then an integer.
    #[must_use]
    pub fn double_int(&self) -> ((f64, i32), Self) {
        let ((int, double), next) = self.int_double();
        ((double, int), next)
    }

    /// Draws three doubles in order.
    #[must_use]
    pub fn double3(&self) -> ((f64, f64, f64), Self) {
        let (first, rng) = self.next_double();
        let (second, rng) = rng.next_double();
        let (third, rng) = rng.next_double();
        ((first, second, third), rng)
    }

    /// Draws `count` integers, in generation order.
    ///
    /// The head is the first draw, not the newest one as with a version
    /// that conses each draw onto an accumulator. Iterative, so any `count`
    /// is safe.
    #[must_use]
    pub fn ints(&self, count: usize) -> (PersistentSequence<i32>, Self) {
        tracing::debug!(count, seed = self.seed, "drawing a batch of integers");
        let mut values = Vec::with_capacity(count);
        let mut rng = *self;
        for _ in 0..count {
            let (value, next) = rng.next_int();
            values.push(value);
            rng = next;
        }
        (values.into_iter().collect(), rng)
    }
}

/// A state thread that draws from a [`SimpleRng`].
pub type Rand<A> = StateThread<SimpleRng, A>;

/// Draws a 32-bit integer.
pub fn int() -> Rand<i32> {
    StateThread::new(|rng: SimpleRng| rng.next_int())
}

/// Draws an integer in `0..=i32::MAX`.
pub fn non_negative_int() -> Rand<i32> {
    StateThread::new(|rng: SimpleRng| rng.non_negative_int())
}

/// Draws a double in `[0, 1)`.
pub fn double() -> Rand<f64> {
    StateThread::new(|rng: SimpleRng| rng.next_double())
}

/// Draws an integer then a double.
pub fn int_double() -> Rand<(i32, f64)> {
    both(int(), double())
}

/// Draws a double then an integer.
pub fn double_int() -> Rand<(f64, i32)> {
    both(double(), int())
}

/// Draws three doubles.
pub fn double3() -> Rand<(f64, f64, f64)> {
    StateThread::new(|rng: SimpleRng| rng.double3())
}

/// Draws `count` integers in generation order.
pub fn ints(count: usize) -> Rand<PersistentSequence<i32>> {
    StateThread::new(move |rng: SimpleRng| rng.ints(count))
}

/// Runs `first` then `second` and pairs the results.
pub fn both<A: 'static, B: 'static>(first: Rand<A>, second: Rand<B>) -> Rand<(A, B)> {
    first.product(second)
}

/// Draws an even integer in `0..=i32::MAX - 1`.
pub fn non_negative_even() -> Rand<i32> {
    non_negative_int().map(|value| value - value % 2)
}

/// Draws an integer in `0..bound` without modulo bias.
///
/// Draws from the top partial block of `0..=i32::MAX` are rejected and
/// retried with the next generator.
///
/// # Panics
///
/// Panics if `bound` is not positive.
///
/// # Examples
///
/// ```rust
/// use fpcore::effect::random::{self, SimpleRng};
///
/// let (value, _) = random::non_negative_less_than(10).run(SimpleRng::new(42));
/// assert!((0..10).contains(&value));
/// ```
pub fn non_negative_less_than(bound: i32) -> Rand<i32> {
    assert!(bound > 0, "bound must be positive, got {bound}");
    non_negative_int().flat_map(move |value| {
        let remainder = value % bound;
        if value.checked_add(bound - 1 - remainder).is_some() {
            StateThread::unit(remainder)
        } else {
            non_negative_less_than(bound)
        }
    })
}

/// Rolls a six-sided die, yielding `1..=6`.
pub fn roll_die() -> Rand<i32> {
    non_negative_less_than(6).map(|face| face + 1)
}
