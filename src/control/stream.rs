//! Lazy, possibly infinite streams built from memoized suspensions.
//!
//! A [`LazyStream<T>`] is either empty or a cell holding a suspended head and
//! a suspended tail. Both are forced independently and at most once, so a
//! stream can describe an unbounded sequence while only the cells that are
//! actually inspected are ever computed.
//!
//! # Corecursion
//!
//! [`LazyStream::unfold`] is the single generative primitive. Every other
//! generator ([`LazyStream::constant`], [`LazyStream::counting_from`],
//! [`LazyStream::fibonacci`], [`LazyStream::ones`]) is an `unfold` with a
//! particular step function.
//!
//! # Short-circuiting
//!
//! [`LazyStream::fold_right`] hands the combining function a *suspension* of
//! the fold over the rest of the stream. Combinators that do not need the
//! rest simply never force it, which is how `head_option`, `take_while` and
//! friends stop early even on infinite input.
//!
//! Searches (`exists`, `for_all`, `find`, `has_subsequence`) walk the cells
//! in a loop and stop at the first decisive element. `filter` and
//! `flat_map` skip unproductive cells the same way, so a match buried
//! deep in the stream costs heap, not call stack.
//!
//! # Examples
//!
//! ```rust
//! use fpcore::control::LazyStream;
//!
//! let naturals = LazyStream::unfold(0, |n| Some((n, n + 1)));
//! let first_even_squares: Vec<i64> = naturals
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * n)
//!     .take(4)
//!     .iter()
//!     .collect();
//! assert_eq!(first_even_squares, vec![0, 4, 16, 36]);
//!
//! assert!(LazyStream::counting_from(1).exists(|n| *n > 1_000));
//! ```

use std::fmt;
use std::rc::Rc;

use super::Suspension;
use crate::persistent::PersistentSequence;

/// A shared, memoized reference to the remainder of a stream.
type Tail<T> = Rc<Suspension<LazyStream<T>>>;

/// A lazy, possibly infinite stream.
///
/// Cloning a stream is cheap and shares its cells, including anything that
/// has already been forced.
///
/// # Examples
///
/// ```rust
/// use fpcore::control::LazyStream;
///
/// let stream = LazyStream::cons(|| 1, || LazyStream::cons(|| 2, LazyStream::empty));
/// assert_eq!(stream.head_option(), Some(1));
/// assert_eq!(stream.to_persistent_sequence().len(), 2);
/// ```
pub enum LazyStream<T> {
    /// The stream with no elements.
    Empty,
    /// A cell with a suspended head and a suspended tail.
    Cons(Rc<Suspension<T>>, Tail<T>),
}

impl<T> LazyStream<T> {
    /// The stream with no elements.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self::Empty
    }

    /// Returns `true` if this is the empty stream.
    ///
    /// Only the outermost cell is inspected; nothing is forced.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Takes the forced tail out of this cell if nothing else shares it.
    fn detach_evaluated_tail(&mut self) -> Option<Self> {
        match self {
            Self::Cons(_, tail) => Rc::get_mut(tail).and_then(Suspension::take_evaluated),
            Self::Empty => None,
        }
    }

    /// Returns the stream with the first `count` cells skipped.
    ///
    /// Only the tails of the skipped cells are forced, never their heads.
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        let mut current = self.clone();
        for _ in 0..count {
            let next = match &current {
                Self::Empty => break,
                Self::Cons(_, tail) => tail.force().clone(),
            };
            current = next;
        }
        current
    }
}

impl<T: 'static> LazyStream<T> {
    /// Builds a cell from a head producer and a tail producer.
    ///
    /// Neither producer runs until its part of the cell is forced, and each
    /// runs at most once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let stream: LazyStream<i32> = LazyStream::cons(|| panic!("never forced"), || panic!("never forced"));
    /// assert!(stream.take(0).is_empty());
    /// ```
    pub fn cons<H, R>(head: H, tail: R) -> Self
    where
        H: Fn() -> T + 'static,
        R: Fn() -> Self + 'static,
    {
        Self::Cons(Rc::new(Suspension::new(head)), Rc::new(Suspension::new(tail)))
    }

    /// A one-element stream whose head is already evaluated.
    #[must_use]
    pub fn singleton(value: T) -> Self {
        Self::Cons(
            Rc::new(Suspension::ready(value)),
            Rc::new(Suspension::ready(Self::Empty)),
        )
    }

    /// Generates a stream from a seed and a step function.
    ///
    /// `step(seed)` is evaluated to build the first cell: `None` yields the
    /// empty stream, `Some((value, next))` yields a cell holding `value`
    /// whose tail, when forced, is `unfold(next, step)`. Building a cell
    /// never runs `step` on the following seed, so an always-`Some` step
    /// describes an infinite stream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let powers = LazyStream::unfold(1u32, |n| n.checked_mul(2).map(|next| (n, next)));
    /// assert_eq!(powers.take(4).iter().collect::<Vec<_>>(), vec![1, 2, 4, 8]);
    ///
    /// let countdown = LazyStream::unfold(3, |n| (n > 0).then_some((n, n - 1)));
    /// assert_eq!(countdown.iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    pub fn unfold<S, F>(seed: S, step: F) -> Self
    where
        S: Clone + 'static,
        F: Fn(S) -> Option<(T, S)> + 'static,
    {
        Self::unfold_shared(seed, &Rc::new(step))
    }

    fn unfold_shared<S, F>(seed: S, step: &Rc<F>) -> Self
    where
        S: Clone + 'static,
        F: Fn(S) -> Option<(T, S)> + 'static,
    {
        match step(seed) {
            None => Self::Empty,
            Some((value, next)) => {
                let step = Rc::clone(step);
                Self::Cons(
                    Rc::new(Suspension::ready(value)),
                    Rc::new(Suspension::new(move || {
                        Self::unfold_shared(next.clone(), &step)
                    })),
                )
            }
        }
    }

    /// Returns at most the first `count` elements.
    ///
    /// Forces nothing itself; the returned stream shares the head cells of
    /// `self` and never reaches past position `count`.
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        match self {
            Self::Cons(head, tail) if count > 0 => {
                let rest = if count == 1 {
                    Suspension::ready(Self::Empty)
                } else {
                    let tail = Rc::clone(tail);
                    Suspension::new(move || tail.force().take(count - 1))
                };
                Self::Cons(Rc::clone(head), Rc::new(rest))
            }
            _ => Self::Empty,
        }
    }
}

impl<T: Clone + 'static> LazyStream<T> {
    /// An infinite stream repeating `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let sevens = LazyStream::constant(7);
    /// assert_eq!(sevens.take(3).iter().collect::<Vec<_>>(), vec![7, 7, 7]);
    /// ```
    pub fn constant(value: T) -> Self {
        Self::unfold(value, |current| Some((current.clone(), current)))
    }

    /// A finite stream over the given values.
    pub fn of<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values: Rc<[T]> = values.into_iter().collect();
        Self::unfold(0usize, move |index| {
            values.get(index).cloned().map(|value| (value, index + 1))
        })
    }

    /// A finite stream over the elements of a persistent sequence.
    pub fn from_persistent_sequence(sequence: &PersistentSequence<T>) -> Self {
        Self::unfold(sequence.clone(), |remaining| {
            remaining
                .uncons()
                .map(|(head, tail)| (head.clone(), tail))
        })
    }

    /// Folds the stream from the right, lazily.
    ///
    /// `combine` receives the head and a suspension of the fold over the
    /// tail. Ignoring that suspension stops the traversal, which makes this
    /// usable on infinite streams as long as `combine` eventually does so.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let naturals = LazyStream::counting_from(0);
    /// let first_over_ten = naturals.fold_right(
    ///     || None,
    ///     |n, rest| if n > 10 { Some(n) } else { rest.into_inner() },
    /// );
    /// assert_eq!(first_over_ten, Some(11));
    /// ```
    pub fn fold_right<B, Z, F>(&self, initial: Z, combine: F) -> B
    where
        B: 'static,
        Z: Fn() -> B + 'static,
        F: Fn(T, Suspension<B>) -> B + 'static,
    {
        self.fold_right_shared(&Rc::new(initial), &Rc::new(combine))
    }

    fn fold_right_shared<B, Z, F>(&self, initial: &Rc<Z>, combine: &Rc<F>) -> B
    where
        B: 'static,
        Z: Fn() -> B + 'static,
        F: Fn(T, Suspension<B>) -> B + 'static,
    {
        match self {
            Self::Empty => initial(),
            Self::Cons(head, tail) => {
                let tail = Rc::clone(tail);
                let initial_for_rest = Rc::clone(initial);
                let combine_for_rest = Rc::clone(combine);
                let rest = Suspension::new(move || {
                    tail.force()
                        .fold_right_shared(&initial_for_rest, &combine_for_rest)
                });
                combine(head.force().clone(), rest)
            }
        }
    }

    /// Returns `true` if some element satisfies `predicate`.
    ///
    /// Stops at the first match.
    pub fn exists<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.iter().any(|value| predicate(&value))
    }

    /// Returns `true` if every element satisfies `predicate`.
    ///
    /// Stops at the first counterexample.
    pub fn for_all<P>(&self, predicate: P) -> bool
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.iter().all(|value| predicate(&value))
    }

    /// Returns the first element, forcing only the first cell's head.
    pub fn head_option(&self) -> Option<T> {
        self.fold_right(|| None, |head, _| Some(head))
    }

    /// Returns the first element satisfying `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.iter().find(|value| predicate(value))
    }

    /// Returns the longest prefix whose elements satisfy `predicate`.
    ///
    /// Nothing past the first failing element is examined.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let small = LazyStream::counting_from(1).take_while(|n| *n < 4);
    /// assert_eq!(small.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.fold_right(Self::empty, move |head, rest| {
            if predicate(&head) {
                Self::Cons(Rc::new(Suspension::ready(head)), Rc::new(rest))
            } else {
                Self::Empty
            }
        })
    }

    /// Applies `function` to every element, lazily.
    pub fn map<U, F>(&self, function: F) -> LazyStream<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        let function = Rc::new(function);
        self.fold_right(LazyStream::empty, move |head, rest| {
            let function = Rc::clone(&function);
            LazyStream::Cons(
                Rc::new(Suspension::new(move || function(head.clone()))),
                Rc::new(rest),
            )
        })
    }

    /// Keeps the elements satisfying `predicate`, lazily.
    ///
    /// Building the result forces cells up to the first match. Rejected
    /// cells are skipped in a loop.
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.filter_shared(&Rc::new(predicate))
    }

    fn filter_shared<P>(&self, predicate: &Rc<P>) -> Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let mut current = self.clone();
        loop {
            let (head, tail) = match &current {
                Self::Empty => return Self::Empty,
                Self::Cons(head, tail) => (Rc::clone(head), Rc::clone(tail)),
            };
            if predicate(head.force()) {
                let predicate = Rc::clone(predicate);
                let rest = Suspension::new(move || tail.force().filter_shared(&predicate));
                return Self::Cons(head, Rc::new(rest));
            }
            current = tail.force().clone();
        }
    }

    /// Appends `other` after this stream.
    ///
    /// `other` is only reached once this stream has been exhausted.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        let other = other.clone();
        self.append_with(move || other.clone())
    }

    fn append_with<R>(&self, other: R) -> Self
    where
        R: Fn() -> Self + 'static,
    {
        self.fold_right(other, |head, rest| {
            Self::Cons(Rc::new(Suspension::ready(head)), Rc::new(rest))
        })
    }

    /// Maps every element to a stream and concatenates the results lazily.
    pub fn flat_map<U, F>(&self, function: F) -> LazyStream<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> LazyStream<U> + 'static,
    {
        self.flat_map_shared(&Rc::new(function))
    }

    fn flat_map_shared<U, F>(&self, function: &Rc<F>) -> LazyStream<U>
    where
        U: Clone + 'static,
        F: Fn(T) -> LazyStream<U> + 'static,
    {
        let mut current = self.clone();
        loop {
            let (head, tail) = match &current {
                Self::Empty => return LazyStream::Empty,
                Self::Cons(head, tail) => (head.force().clone(), Rc::clone(tail)),
            };
            let expanded = function(head);
            if !expanded.is_empty() {
                let function = Rc::clone(function);
                return expanded.append_with(move || tail.force().flat_map_shared(&function));
            }
            current = tail.force().clone();
        }
    }

    /// Combines two streams pairwise, stopping at the shorter one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let sums = LazyStream::counting_from(1).zip_with(&LazyStream::of(vec![10, 20]), |a, b| a + b);
    /// assert_eq!(sums.iter().collect::<Vec<_>>(), vec![11, 22]);
    /// ```
    pub fn zip_with<U, V, F>(&self, other: &LazyStream<U>, function: F) -> LazyStream<V>
    where
        U: Clone + 'static,
        V: 'static,
        F: Fn(T, U) -> V + 'static,
    {
        let seed: (Tail<T>, Tail<U>) = (
            Rc::new(Suspension::ready(self.clone())),
            Rc::new(Suspension::ready(other.clone())),
        );
        LazyStream::unfold(seed, move |(left, right)| match (left.force(), right.force()) {
            (Self::Cons(left_head, left_tail), LazyStream::Cons(right_head, right_tail)) => Some((
                function(left_head.force().clone(), right_head.force().clone()),
                (Rc::clone(left_tail), Rc::clone(right_tail)),
            )),
            _ => None,
        })
    }

    /// Pairs two streams position by position until both are exhausted.
    ///
    /// Once one side runs out its slot is `None` for every remaining
    /// position of the other side.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let pairs = LazyStream::of(vec![1, 2]).zip_all(&LazyStream::of(vec!['a']));
    /// assert_eq!(
    ///     pairs.iter().collect::<Vec<_>>(),
    ///     vec![(Some(1), Some('a')), (Some(2), None)],
    /// );
    /// ```
    pub fn zip_all<U>(&self, other: &LazyStream<U>) -> LazyStream<(Option<T>, Option<U>)>
    where
        U: Clone + 'static,
    {
        let seed: (Tail<T>, Tail<U>) = (
            Rc::new(Suspension::ready(self.clone())),
            Rc::new(Suspension::ready(other.clone())),
        );
        LazyStream::unfold(seed, |(left, right)| match (left.force(), right.force()) {
            (Self::Empty, LazyStream::Empty) => None,
            (Self::Cons(left_head, left_tail), LazyStream::Empty) => Some((
                (Some(left_head.force().clone()), None),
                (Rc::clone(left_tail), Rc::clone(&right)),
            )),
            (Self::Empty, LazyStream::Cons(right_head, right_tail)) => Some((
                (None, Some(right_head.force().clone())),
                (Rc::clone(&left), Rc::clone(right_tail)),
            )),
            (Self::Cons(left_head, left_tail), LazyStream::Cons(right_head, right_tail)) => Some((
                (Some(left_head.force().clone()), Some(right_head.force().clone())),
                (Rc::clone(left_tail), Rc::clone(right_tail)),
            )),
        })
    }

    /// Returns every suffix of the stream.
    ///
    /// The first suffix is the stream itself and the last one is the empty
    /// stream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let suffixes: Vec<Vec<i32>> = LazyStream::of(vec![1, 2])
    ///     .tails()
    ///     .iter()
    ///     .map(|suffix| suffix.iter().collect())
    ///     .collect();
    /// assert_eq!(suffixes, vec![vec![1, 2], vec![2], vec![]]);
    /// ```
    pub fn tails(&self) -> LazyStream<Self> {
        let seed: Option<Tail<T>> = Some(Rc::new(Suspension::ready(self.clone())));
        LazyStream::unfold(seed, |current| {
            let suffix = current?.force().clone();
            let next = match &suffix {
                Self::Empty => None,
                Self::Cons(_, tail) => Some(Rc::clone(tail)),
            };
            Some((suffix, next))
        })
    }

    /// Scans from the right, producing every partial fold result.
    ///
    /// The first element is the fold of the whole stream and the last one is
    /// `initial` itself. Each partial result is computed once and shared
    /// with the next, so the stream is traversed a single time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let sums = LazyStream::of(vec![1, 2, 3]).scan_right(0, |a, b| a + *b.force());
    /// assert_eq!(sums.iter().collect::<Vec<_>>(), vec![6, 5, 3, 0]);
    /// ```
    pub fn scan_right<B, F>(&self, initial: B, combine: F) -> LazyStream<B>
    where
        B: Clone + 'static,
        F: Fn(T, Suspension<B>) -> B + 'static,
    {
        let combine = Rc::new(combine);
        let (_, scanned) = self.fold_right(
            move || (initial.clone(), LazyStream::singleton(initial.clone())),
            move |head, rest: Suspension<(B, LazyStream<B>)>| {
                let rest = Rc::new(rest);
                let partial = {
                    let rest = Rc::clone(&rest);
                    Suspension::new(move || rest.force().0.clone())
                };
                let folded = combine(head, partial);
                let tail = Suspension::new(move || rest.force().1.clone());
                (
                    folded.clone(),
                    LazyStream::Cons(Rc::new(Suspension::ready(folded)), Rc::new(tail)),
                )
            },
        );
        scanned
    }

    /// Returns an iterator that forces cells as it advances.
    ///
    /// The iterator never ends on an infinite stream; bound it with
    /// [`LazyStream::take`] or an iterator adapter.
    pub fn iter(&self) -> LazyStreamIterator<T> {
        LazyStreamIterator {
            current: Rc::new(Suspension::ready(self.clone())),
        }
    }

    /// Materializes the stream into a persistent sequence.
    ///
    /// Terminates only on finite streams.
    pub fn to_persistent_sequence(&self) -> PersistentSequence<T> {
        self.iter().collect()
    }
}

impl<T: PartialEq + Clone + 'static> LazyStream<T> {
    /// Returns `true` if `prefix` is a prefix of this stream.
    ///
    /// Comparison stops as soon as `prefix` runs out, so this terminates on
    /// an infinite stream when `prefix` is finite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let naturals = LazyStream::counting_from(0);
    /// assert!(naturals.starts_with(&LazyStream::of(vec![0, 1, 2])));
    /// assert!(!naturals.starts_with(&LazyStream::of(vec![1])));
    /// ```
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.zip_all(prefix)
            .take_while(|(_, expected)| expected.is_some())
            .for_all(|(actual, expected)| actual == expected)
    }

    /// Returns `true` if `sub` occurs as a contiguous run in this stream.
    pub fn has_subsequence(&self, sub: &Self) -> bool {
        self.tails().iter().any(|suffix| suffix.starts_with(sub))
    }
}

impl LazyStream<i64> {
    /// The infinite stream `start, start + 1, start + 2, ...`.
    #[must_use]
    pub fn counting_from(start: i64) -> Self {
        Self::unfold(start, |current| Some((current, current + 1)))
    }

    /// The infinite stream of ones.
    #[must_use]
    pub fn ones() -> Self {
        Self::unfold((), |()| Some((1, ())))
    }
}

impl LazyStream<u64> {
    /// The Fibonacci numbers `0, 1, 1, 2, 3, 5, ...`.
    ///
    /// The stream ends after the largest Fibonacci number that fits in a
    /// `u64`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::control::LazyStream;
    ///
    /// let prefix: Vec<u64> = LazyStream::fibonacci().take(7).iter().collect();
    /// assert_eq!(prefix, vec![0, 1, 1, 2, 3, 5, 8]);
    /// ```
    #[must_use]
    pub fn fibonacci() -> Self {
        Self::unfold((Some(0u64), Some(1u64)), |(current, next)| {
            let current = current?;
            let following = next.and_then(|next| current.checked_add(next));
            Some((current, (next, following)))
        })
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over the elements of a [`LazyStream`].
pub struct LazyStreamIterator<T> {
    current: Tail<T>,
}

impl<T: Clone> Iterator for LazyStreamIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let (value, next) = match self.current.force() {
            LazyStream::Empty => return None,
            LazyStream::Cons(head, tail) => (head.force().clone(), Rc::clone(tail)),
        };
        self.current = next;
        Some(value)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for LazyStream<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Cons(head, tail) => Self::Cons(Rc::clone(head), Rc::clone(tail)),
        }
    }
}

impl<T> Default for LazyStream<T> {
    fn default() -> Self {
        Self::Empty
    }
}

/// Unlinks evaluated tails one cell at a time so that dropping a long,
/// fully forced stream does not recurse once per cell.
impl<T> Drop for LazyStream<T> {
    fn drop(&mut self) {
        let mut next = self.detach_evaluated_tail();
        while let Some(mut stream) = next {
            next = stream.detach_evaluated_tail();
        }
    }
}

/// Shows the cells that have been evaluated so far without forcing anything.
impl<T: fmt::Debug> fmt::Debug for LazyStream<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "LazyStream[")?;
        let mut current = self;
        let mut first = true;
        loop {
            let Self::Cons(head, tail) = current else {
                break;
            };
            if !first {
                write!(formatter, ", ")?;
            }
            first = false;
            match head.get() {
                Some(value) => write!(formatter, "{value:?}")?,
                None => write!(formatter, "?")?,
            }
            match tail.get() {
                Some(next) => current = next,
                None => {
                    write!(formatter, ", ..")?;
                    break;
                }
            }
        }
        write!(formatter, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::Cell;

    fn counted<T: Clone + 'static>(value: T, calls: &Rc<Cell<usize>>) -> impl Fn() -> T + use<T> {
        let calls = Rc::clone(calls);
        move || {
            calls.set(calls.get() + 1);
            value.clone()
        }
    }

    fn collect<T: Clone + 'static>(stream: &LazyStream<T>) -> Vec<T> {
        stream.iter().collect()
    }

    // =========================================================================
    // Laziness
    // =========================================================================

    #[rstest]
    fn test_take_zero_forces_nothing() {
        let calls = Rc::new(Cell::new(0));
        let tail_calls = Rc::clone(&calls);
        let stream = LazyStream::cons(counted(1, &calls), move || {
            tail_calls.set(tail_calls.get() + 1);
            LazyStream::empty()
        });
        assert!(stream.take(0).is_empty());
        assert_eq!(calls.get(), 0);
    }

    #[rstest]
    fn test_forcing_head_does_not_force_tail() {
        let tail_calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&tail_calls);
        let stream = LazyStream::cons(
            || 1,
            move || {
                counter.set(counter.get() + 1);
                LazyStream::empty()
            },
        );
        assert_eq!(stream.head_option(), Some(1));
        assert_eq!(tail_calls.get(), 0);
    }

    #[rstest]
    fn test_cells_are_memoized_across_clones() {
        let calls = Rc::new(Cell::new(0));
        let stream = LazyStream::cons(counted(5, &calls), LazyStream::empty);
        let shared = stream.clone();
        assert_eq!(collect(&stream), vec![5]);
        assert_eq!(collect(&shared), vec![5]);
        assert_eq!(calls.get(), 1);
    }

    #[rstest]
    fn test_unfold_does_not_step_past_built_cell() {
        let steps = Rc::new(Cell::new(0));
        let counter = Rc::clone(&steps);
        let stream = LazyStream::unfold(0, move |n| {
            counter.set(counter.get() + 1);
            Some((n, n + 1))
        });
        assert_eq!(steps.get(), 1);
        let _ = stream.take(3).to_persistent_sequence();
        assert_eq!(steps.get(), 3);
    }

    #[rstest]
    fn test_take_while_stops_at_first_failure() {
        let steps = Rc::new(Cell::new(0));
        let counter = Rc::clone(&steps);
        let stream = LazyStream::unfold(1, move |n| {
            counter.set(counter.get() + 1);
            Some((n, n + 1))
        });
        let prefix = stream.take_while(|n| *n < 3);
        assert_eq!(collect(&prefix), vec![1, 2]);
        assert_eq!(steps.get(), 3);
    }

    // =========================================================================
    // Generators
    // =========================================================================

    #[rstest]
    fn test_unfold_counts_up() {
        let stream = LazyStream::unfold(0, |s| Some((s, s + 1)));
        let expected: PersistentSequence<i32> = (0..5).collect();
        assert_eq!(stream.take(5).to_persistent_sequence(), expected);
    }

    #[rstest]
    fn test_constant_is_infinite() {
        assert_eq!(collect(&LazyStream::constant(7).take(3)), vec![7, 7, 7]);
        assert_eq!(collect(&LazyStream::ones().drop_first(1_000).take(2)), vec![1, 1]);
    }

    #[rstest]
    fn test_fibonacci_ends_before_overflow() {
        let fibonacci = LazyStream::fibonacci();
        let all = fibonacci.to_persistent_sequence();
        assert_eq!(all.len(), 94);
        assert_eq!(all.iter().last(), Some(&12_200_160_415_121_876_738));
    }

    // =========================================================================
    // Folds
    // =========================================================================

    #[rstest]
    #[case(vec![1, 2, 3], 2, true)]
    #[case(vec![1, 2, 3], 4, false)]
    #[case(vec![], 1, false)]
    fn test_exists(#[case] values: Vec<i32>, #[case] needle: i32, #[case] expected: bool) {
        assert_eq!(LazyStream::of(values).exists(move |n| *n == needle), expected);
    }

    #[rstest]
    fn test_exists_short_circuits_infinite_stream() {
        assert!(LazyStream::counting_from(0).exists(|n| *n == 50));
    }

    #[rstest]
    fn test_for_all_short_circuits_infinite_stream() {
        assert!(!LazyStream::counting_from(0).for_all(|n| *n < 10));
        assert!(LazyStream::<i32>::empty().for_all(|_| false));
    }

    #[rstest]
    fn test_fold_right_combines_from_the_right() {
        let trace = LazyStream::of(vec![1, 2, 3]).fold_right(
            || "0".to_string(),
            |n, rest| format!("({n}+{})", rest.into_inner()),
        );
        assert_eq!(trace, "(1+(2+(3+0)))");
    }

    #[rstest]
    fn test_filter_forces_only_up_to_first_match() {
        let steps = Rc::new(Cell::new(0));
        let counter = Rc::clone(&steps);
        let naturals = LazyStream::unfold(0, move |n| {
            counter.set(counter.get() + 1);
            Some((n, n + 1))
        });
        let matching = naturals.filter(|n| n % 4 == 3);
        assert_eq!(steps.get(), 4);
        assert_eq!(matching.head_option(), Some(3));
        assert_eq!(steps.get(), 4);
    }

    #[rstest]
    fn test_find_on_infinite_stream() {
        assert_eq!(LazyStream::counting_from(10).find(|n| n % 7 == 0), Some(14));
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    #[rstest]
    fn test_map_and_filter() {
        let stream = LazyStream::of(1..=6).filter(|n| n % 2 == 1).map(|n| n * 10);
        assert_eq!(collect(&stream), vec![10, 30, 50]);
    }

    #[rstest]
    fn test_map_defers_function() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mapped = LazyStream::counting_from(0).map(move |n| {
            counter.set(counter.get() + 1);
            n * 2
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(collect(&mapped.take(3)), vec![0, 2, 4]);
        assert_eq!(calls.get(), 3);
    }

    #[rstest]
    fn test_append_and_flat_map() {
        let joined = LazyStream::of(vec![1, 2]).append(&LazyStream::of(vec![3]));
        assert_eq!(collect(&joined), vec![1, 2, 3]);

        let expanded = LazyStream::of(vec![1, 2, 3]).flat_map(|n| LazyStream::constant(n).take(n));
        assert_eq!(collect(&expanded), vec![1, 2, 2, 3, 3, 3]);
    }

    #[rstest]
    fn test_drop_first_skips_cells() {
        let stream = LazyStream::of(vec![1, 2, 3, 4]);
        assert_eq!(collect(&stream.drop_first(2)), vec![3, 4]);
        assert!(stream.drop_first(10).is_empty());
    }

    // =========================================================================
    // Zipping and Searching
    // =========================================================================

    #[rstest]
    fn test_zip_all_pads_shorter_side() {
        let short = LazyStream::of(vec![1, 2]);
        let long = LazyStream::of(vec![10, 20, 30, 40]);
        assert_eq!(
            collect(&short.zip_all(&long)),
            vec![
                (Some(1), Some(10)),
                (Some(2), Some(20)),
                (None, Some(30)),
                (None, Some(40)),
            ]
        );
    }

    #[rstest]
    fn test_zip_with_infinite_and_finite() {
        let zipped = LazyStream::counting_from(0).zip_with(&LazyStream::of(vec!["a", "b"]), |n, s| format!("{s}{n}"));
        assert_eq!(collect(&zipped), vec!["a0".to_string(), "b1".to_string()]);
    }

    #[rstest]
    fn test_tails_ends_with_empty() {
        let tails = LazyStream::of(vec![1, 2, 3]).tails();
        let lengths: Vec<usize> = tails.iter().map(|suffix| suffix.iter().count()).collect();
        assert_eq!(lengths, vec![3, 2, 1, 0]);
    }

    #[rstest]
    #[case(vec![1, 2], true)]
    #[case(vec![], true)]
    #[case(vec![2], false)]
    #[case(vec![1, 2, 3, 4], false)]
    fn test_starts_with(#[case] prefix: Vec<i32>, #[case] expected: bool) {
        let stream = LazyStream::of(vec![1, 2, 3]);
        assert_eq!(stream.starts_with(&LazyStream::of(prefix)), expected);
    }

    #[rstest]
    #[case(vec![2, 3], true)]
    #[case(vec![], true)]
    #[case(vec![3, 2], false)]
    fn test_has_subsequence(#[case] sub: Vec<i32>, #[case] expected: bool) {
        let stream = LazyStream::of(vec![1, 2, 3, 4]);
        assert_eq!(stream.has_subsequence(&LazyStream::of(sub)), expected);
    }

    #[rstest]
    fn test_has_subsequence_on_infinite_stream() {
        assert!(LazyStream::counting_from(0).has_subsequence(&LazyStream::of(vec![40, 41, 42])));
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    #[rstest]
    fn test_scan_right_evaluates_each_element_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sums = LazyStream::of(vec![1, 2, 3]).scan_right(0, move |n, rest| {
            counter.set(counter.get() + 1);
            n + *rest.force()
        });
        assert_eq!(collect(&sums), vec![6, 5, 3, 0]);
        assert_eq!(calls.get(), 3);
    }

    #[rstest]
    fn test_scan_right_of_empty_is_initial() {
        let scanned = LazyStream::<i32>::empty().scan_right(9, |n, rest| n + *rest.force());
        assert_eq!(collect(&scanned), vec![9]);
    }

    // =========================================================================
    // Debug
    // =========================================================================

    #[rstest]
    fn test_debug_shows_only_evaluated_cells() {
        let stream = LazyStream::counting_from(1);
        assert_eq!(format!("{stream:?}"), "LazyStream[1, ..]");
        let _ = stream.take(3).to_persistent_sequence();
        assert_eq!(format!("{stream:?}"), "LazyStream[1, 2, 3, ..]");
        assert_eq!(format!("{:?}", LazyStream::<i32>::empty()), "LazyStream[]");
    }
}
