//! Deferred computation evaluated at most once.
//!
//! This module provides [`Suspension<T>`], a producer closure paired with a
//! cache cell. Nothing runs until the suspension is forced; the first
//! successful [`Suspension::force`] stores the produced value and every later
//! call returns the stored value without touching the producer again.
//!
//! # Examples
//!
//! ```rust
//! use fpcore::control::Suspension;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let calls = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&calls);
//! let suspension = Suspension::new(move || {
//!     counter.set(counter.get() + 1);
//!     42
//! });
//!
//! assert_eq!(calls.get(), 0);
//! assert_eq!(*suspension.force(), 42);
//! assert_eq!(*suspension.force(), 42);
//! assert_eq!(calls.get(), 1);
//! ```
//!
//! # Panics and Retries
//!
//! A panic raised by the producer propagates to the caller of `force`
//! unchanged. Nothing is cached in that case: the producer is kept and the
//! next `force` runs it again.
//!
//! # Thread Safety
//!
//! `Suspension` is neither `Send` nor `Sync`. Sharing one across threads
//! would need a publish-once guard around the cache, which this type does not
//! provide.

use std::cell::{Cell, OnceCell};
use std::fmt;

type Producer<T> = Box<dyn Fn() -> T>;

/// A deferred computation whose result is memoized after the first force.
///
/// # Examples
///
/// ```rust
/// use fpcore::control::Suspension;
///
/// let deferred = Suspension::new(|| "computed".to_string());
/// assert!(!deferred.is_evaluated());
/// assert_eq!(deferred.force(), "computed");
/// assert!(deferred.is_evaluated());
/// ```
pub struct Suspension<T> {
    value: OnceCell<T>,
    producer: Cell<Option<Producer<T>>>,
}

static_assertions::assert_not_impl_any!(Suspension<i32>: Send, Sync);

/// Holds the producer while it runs and hands it back if it unwinds.
struct ProducerGuard<'a, T> {
    slot: &'a Cell<Option<Producer<T>>>,
    producer: Option<Producer<T>>,
}

impl<'a, T> ProducerGuard<'a, T> {
    fn take(slot: &'a Cell<Option<Producer<T>>>) -> Self {
        let Some(producer) = slot.take() else {
            panic!("Suspension forced again while its producer was still running");
        };
        Self {
            slot,
            producer: Some(producer),
        }
    }

    fn run(mut self) -> T {
        let value = match &self.producer {
            Some(producer) => producer(),
            None => unreachable!("guard always holds a producer until it has run"),
        };
        self.producer = None;
        value
    }
}

impl<T> Drop for ProducerGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(producer) = self.producer.take() {
            tracing::trace!("suspension producer unwound; keeping it for a retry");
            self.slot.set(Some(producer));
        }
    }
}

impl<T> Suspension<T> {
    /// Creates a suspension that will run `producer` when first forced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::Suspension;
    ///
    /// let suspension = Suspension::new(|| 6 * 7);
    /// assert_eq!(*suspension.force(), 42);
    /// ```
    #[inline]
    pub fn new<F>(producer: F) -> Self
    where
        F: Fn() -> T + 'static,
    {
        Self {
            value: OnceCell::new(),
            producer: Cell::new(Some(Box::new(producer))),
        }
    }

    /// Creates a suspension that is already evaluated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::Suspension;
    ///
    /// let suspension = Suspension::ready(42);
    /// assert!(suspension.is_evaluated());
    /// ```
    #[inline]
    pub fn ready(value: T) -> Self {
        Self {
            value: OnceCell::from(value),
            producer: Cell::new(None),
        }
    }

    /// Forces evaluation and returns a reference to the cached value.
    ///
    /// The producer runs on the first call only. If it panics the panic
    /// propagates, nothing is cached, and a later call runs it again.
    ///
    /// # Panics
    ///
    /// Panics if the producer forces its own suspension while running.
    pub fn force(&self) -> &T {
        if let Some(value) = self.value.get() {
            return value;
        }
        let value = ProducerGuard::take(&self.producer).run();
        self.value.get_or_init(|| value)
    }

    /// Returns the cached value without forcing.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns `true` once a value has been cached.
    #[inline]
    pub fn is_evaluated(&self) -> bool {
        self.value.get().is_some()
    }

    /// Removes the cached value, leaving the suspension unevaluated.
    pub(crate) fn take_evaluated(&mut self) -> Option<T> {
        self.value.take()
    }

    /// Forces evaluation and takes ownership of the value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::Suspension;
    ///
    /// let suspension = Suspension::new(|| vec![1, 2, 3]);
    /// assert_eq!(suspension.into_inner(), vec![1, 2, 3]);
    /// ```
    pub fn into_inner(self) -> T {
        self.force();
        match self.value.into_inner() {
            Some(value) => value,
            None => unreachable!("a forced suspension always holds a value"),
        }
    }
}

impl<T: 'static> Suspension<T> {
    /// Derives a new suspension that applies `function` to this one's value.
    ///
    /// Neither suspension is forced until the derived one is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::Suspension;
    ///
    /// let length = Suspension::new(|| "hello".to_string()).map(|text| text.len());
    /// assert_eq!(*length.force(), 5);
    /// ```
    pub fn map<U, F>(self, function: F) -> Suspension<U>
    where
        F: Fn(&T) -> U + 'static,
    {
        Suspension::new(move || function(self.force()))
    }
}

impl<T: fmt::Debug> fmt::Debug for Suspension<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(value) => formatter.debug_tuple("Suspension").field(value).finish(),
            None => formatter
                .debug_tuple("Suspension")
                .field(&"<pending>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::rc::Rc;

    #[rstest]
    fn test_force_runs_producer_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let suspension = Suspension::new(move || {
            counter.set(counter.get() + 1);
            "value"
        });

        for _ in 0..3 {
            assert_eq!(*suspension.force(), "value");
        }
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn test_creation_does_not_run_producer() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let suspension = Suspension::new(move || counter.set(counter.get() + 1));
        assert!(!suspension.is_evaluated());
        assert!(suspension.get().is_none());
        assert_eq!(calls.get(), 0);
    }

    #[rstest]
    fn test_panicking_producer_is_retried() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let suspension = Suspension::new(move || {
            counter.set(counter.get() + 1);
            assert!(counter.get() > 1, "first attempt fails");
            10
        });

        let first = catch_unwind(AssertUnwindSafe(|| *suspension.force()));
        assert!(first.is_err());
        assert!(!suspension.is_evaluated());

        assert_eq!(*suspension.force(), 10);
        assert_eq!(*suspension.force(), 10);
        assert_eq!(attempts.get(), 2);
    }

    #[rstest]
    fn test_ready_is_evaluated() {
        let suspension = Suspension::ready(5);
        assert_eq!(suspension.get(), Some(&5));
        assert_eq!(suspension.into_inner(), 5);
    }

    #[rstest]
    fn test_map_is_deferred() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let base = Suspension::new(move || {
            counter.set(counter.get() + 1);
            20
        });
        let mapped = base.map(|value| value + 1);
        assert_eq!(calls.get(), 0);
        assert_eq!(*mapped.force(), 21);
        assert_eq!(*mapped.force(), 21);
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    #[case(Suspension::ready(1), "Suspension(1)")]
    #[case(Suspension::new(|| 1), "Suspension(\"<pending>\")")]
    fn test_debug(#[case] suspension: Suspension<i32>, #[case] expected: &str) {
        assert_eq!(format!("{suspension:?}"), expected);
    }
}
