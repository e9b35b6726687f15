//! Persistent (immutable) singly-linked sequence.
//!
//! This module provides [`PersistentSequence`], an immutable cons-list whose
//! tails are shared between versions.
//!
//! # Overview
//!
//! - O(1) prepend (`cons`), `head`, `tail` and `len`
//! - O(n) folds, `map`, `filter`, `append` and `reverse`
//!
//! Every traversal is iterative. In particular [`PersistentSequence::fold_right`]
//! does not recurse to the end of the sequence: a left-to-right pass builds a
//! chain of deferred combination steps on the heap, and that chain is then
//! unwound in a loop. Folding, mapping or dropping sequences of hundreds of
//! thousands of elements never exhausts the call stack.
//!
//! # Examples
//!
//! ```rust
//! use fpcore::persistent::PersistentSequence;
//!
//! let sequence: PersistentSequence<i32> = (1..=5).collect();
//! assert_eq!(sequence.fold_left(0, |sum, x| sum + x), 15);
//!
//! // Right fold sees the elements from the back
//! let digits = sequence.fold_right(String::new(), |x, mut acc| {
//!     acc.push_str(&x.to_string());
//!     acc
//! });
//! assert_eq!(digits, "54321");
//! ```
//!
//! # Structural Sharing
//!
//! ```text
//! first:  1 -> 2 -> 3 -> nil
//! second = first.cons(0): 0 -> [1 -> 2 -> 3 -> nil]  // shares [1, 2, 3]
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::EmptySequenceError;

/// Internal node of a sequence. `next` is shared between versions.
struct Node<T> {
    element: T,
    next: Option<Rc<Self>>,
}

impl<T> Drop for Node<T> {
    // Unlink uniquely owned successors one at a time so that dropping a long
    // sequence does not recurse once per node.
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// A right fold deferred as data.
///
/// Built front to back by wrapping the previous continuation, then resumed
/// once with the seed. Resuming walks the chain in a loop, so the depth of
/// the fold lives on the heap instead of the call stack.
enum Continuation<'a, T> {
    Done,
    Then(&'a T, Box<Continuation<'a, T>>),
}

impl<'a, T> Continuation<'a, T> {
    fn wrap(self, element: &'a T) -> Self {
        Self::Then(element, Box::new(self))
    }

    fn resume<B, F>(self, seed: B, mut combine: F) -> B
    where
        F: FnMut(&'a T, B) -> B,
    {
        let mut continuation = self;
        let mut accumulator = seed;
        loop {
            match continuation {
                Self::Done => return accumulator,
                Self::Then(element, rest) => {
                    accumulator = combine(element, accumulator);
                    continuation = *rest;
                }
            }
        }
    }
}

/// A persistent (immutable) singly-linked sequence.
///
/// A sequence is either empty or a head element followed by a tail sequence.
/// Nodes are never mutated after construction, and a tail may be shared by
/// any number of sequences.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `cons`         | O(1)       |
/// | `head`/`tail`  | O(1)       |
/// | `len`          | O(1)       |
/// | `fold_left`    | O(n)       |
/// | `fold_right`   | O(n)       |
/// | `append`       | O(n) in the left operand |
/// | `reverse`      | O(n)       |
///
/// # Examples
///
/// ```rust
/// use fpcore::persistent::PersistentSequence;
///
/// let sequence = PersistentSequence::singleton(42);
/// assert_eq!(sequence.head(), Ok(&42));
/// assert!(sequence.tail().unwrap().is_empty());
/// ```
pub struct PersistentSequence<T> {
    head: Option<Rc<Node<T>>>,
    length: usize,
}

impl<T> PersistentSequence<T> {
    /// Creates a new empty sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = PersistentSequence::new();
    /// assert!(sequence.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            length: 0,
        }
    }

    /// Creates a sequence containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().cons(element)
    }

    /// Builds a sequence from a Vec, consuming it from the back.
    fn build_from_vec(mut elements: Vec<T>) -> Self {
        let length = elements.len();
        let mut head: Option<Rc<Node<T>>> = None;
        while let Some(element) = elements.pop() {
            head = Some(Rc::new(Node {
                element,
                next: head,
            }));
        }
        Self { head, length }
    }

    /// Prepends an element, sharing the whole of `self` as the new tail.
    ///
    /// # Complexity
    ///
    /// O(1) time and space
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence = PersistentSequence::new().cons(3).cons(2).cons(1);
    /// assert_eq!(sequence.head(), Ok(&1));
    /// assert_eq!(sequence.len(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn cons(&self, element: T) -> Self {
        Self {
            head: Some(Rc::new(Node {
                element,
                next: self.head.clone(),
            })),
            length: self.length + 1,
        }
    }

    /// Returns the first element.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySequenceError`] if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence = PersistentSequence::new().cons(2).cons(1);
    /// assert_eq!(sequence.head(), Ok(&1));
    ///
    /// let empty: PersistentSequence<i32> = PersistentSequence::new();
    /// assert!(empty.head().is_err());
    /// ```
    #[inline]
    pub fn head(&self) -> Result<&T, EmptySequenceError> {
        self.head_option()
            .ok_or(EmptySequenceError::new("head"))
    }

    /// Returns the sequence without its first element, sharing structure.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySequenceError`] if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence = PersistentSequence::new().cons(3).cons(2).cons(1);
    /// let tail = sequence.tail()?;
    /// assert_eq!(tail.head(), Ok(&2));
    /// assert_eq!(tail.len(), 2);
    /// # Ok::<(), fpcore::persistent::EmptySequenceError>(())
    /// ```
    #[inline]
    pub fn tail(&self) -> Result<Self, EmptySequenceError> {
        self.uncons()
            .map(|(_, tail)| tail)
            .ok_or(EmptySequenceError::new("tail"))
    }

    /// Replaces the first element, sharing the tail.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySequenceError`] if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence = PersistentSequence::new().cons(3).cons(2).cons(1);
    /// let replaced = sequence.set_head(10)?;
    /// assert_eq!(format!("{replaced}"), "[10, 2, 3]");
    /// assert_eq!(format!("{sequence}"), "[1, 2, 3]");
    /// # Ok::<(), fpcore::persistent::EmptySequenceError>(())
    /// ```
    pub fn set_head(&self, element: T) -> Result<Self, EmptySequenceError> {
        let (_, tail) = self
            .uncons()
            .ok_or(EmptySequenceError::new("set_head"))?;
        Ok(tail.cons(element))
    }

    /// Returns the first element, or `None` if the sequence is empty.
    #[inline]
    #[must_use]
    pub fn head_option(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.element)
    }

    /// Decomposes the sequence into its head and tail.
    ///
    /// Returns `None` if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence = PersistentSequence::new().cons(2).cons(1);
    /// if let Some((head, tail)) = sequence.uncons() {
    ///     assert_eq!(*head, 1);
    ///     assert_eq!(tail.head(), Ok(&2));
    /// }
    /// ```
    #[inline]
    #[must_use]
    pub fn uncons(&self) -> Option<(&T, Self)> {
        self.head.as_ref().map(|node| {
            let tail = Self {
                head: node.next.clone(),
                length: self.length - 1,
            };
            (&node.element, tail)
        })
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the sequence has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns an iterator over references to the elements.
    #[inline]
    pub fn iter(&self) -> PersistentSequenceIterator<'_, T> {
        PersistentSequenceIterator {
            current: self.head.as_ref(),
            remaining: self.length,
        }
    }

    /// Folds the sequence from left to right.
    ///
    /// The combining function sees the accumulator first and the element
    /// second. Runs in a loop, so it is stack-safe for any length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = (1..=4).collect();
    /// let trace = sequence.fold_left(String::from("0"), |acc, x| format!("({acc}-{x})"));
    /// assert_eq!(trace, "((((0-1)-2)-3)-4)");
    /// ```
    pub fn fold_left<'a, B, F>(&'a self, init: B, function: F) -> B
    where
        F: FnMut(B, &'a T) -> B,
    {
        self.iter().fold(init, function)
    }

    /// Folds the sequence from right to left.
    ///
    /// A left fold first wraps one continuation per element around the
    /// previous one; the resulting chain is then resumed once with `init` and
    /// unwound iteratively, combining the last element first. The depth of
    /// the fold is bounded by available heap, not by the call stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = (1..=4).collect();
    /// let trace = sequence.fold_right(String::from("0"), |x, acc| format!("({x}-{acc})"));
    /// assert_eq!(trace, "(1-(2-(3-(4-0))))");
    ///
    /// let long: PersistentSequence<u64> = (0..100_000).collect();
    /// assert_eq!(long.fold_right(0, |x, acc| x + acc), 4_999_950_000);
    /// ```
    pub fn fold_right<'a, B, F>(&'a self, init: B, function: F) -> B
    where
        F: FnMut(&'a T, B) -> B,
    {
        self.fold_left(Continuation::Done, Continuation::wrap)
            .resume(init, function)
    }

    /// Applies a function to every element, preserving order.
    ///
    /// The function is called from the first element to the last.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = (1..=3).collect();
    /// let doubled = sequence.map(|x| x * 2);
    /// assert_eq!(doubled, (2..=6).step_by(2).collect());
    /// ```
    pub fn map<U, F>(&self, mut function: F) -> PersistentSequence<U>
    where
        F: FnMut(&T) -> U,
    {
        let mapped = self.fold_left(Vec::with_capacity(self.length), |mut elements, element| {
            elements.push(function(element));
            elements
        });
        PersistentSequence::build_from_vec(mapped)
    }

    /// Returns the sequence with the first `count` elements removed.
    ///
    /// The result shares structure with `self`.
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        let mut current = self.clone();
        for _ in 0..count.min(self.length) {
            let Some((_, rest)) = current.uncons() else {
                break;
            };
            current = rest;
        }
        current
    }

    /// Returns every element but the last.
    ///
    /// Nothing can be shared with `self`, so the kept elements are copied.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySequenceError`] if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = (1..=4).collect();
    /// assert_eq!(sequence.init()?, (1..=3).collect());
    /// # Ok::<(), fpcore::persistent::EmptySequenceError>(())
    /// ```
    pub fn init(&self) -> Result<Self, EmptySequenceError>
    where
        T: Clone,
    {
        let kept = self
            .length
            .checked_sub(1)
            .ok_or(EmptySequenceError::new("init"))?;
        Ok(self.iter().take(kept).cloned().collect())
    }

    /// Drops leading elements while `predicate` holds, sharing the rest.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = (1..=6).collect();
    /// let rest = sequence.drop_while(|x| *x < 4);
    /// assert_eq!(rest, (4..=6).collect());
    /// ```
    #[must_use]
    pub fn drop_while<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut current = self.clone();
        loop {
            let next = match current.uncons() {
                Some((head, rest)) if predicate(head) => rest,
                _ => break,
            };
            current = next;
        }
        current
    }

    /// Combines two sequences pairwise, stopping at the shorter one.
    pub fn zip_with<U, V, F>(&self, other: &PersistentSequence<U>, mut function: F) -> PersistentSequence<V>
    where
        F: FnMut(&T, &U) -> V,
    {
        let zipped: Vec<V> = self
            .iter()
            .zip(other.iter())
            .map(|(left, right)| function(left, right))
            .collect();
        PersistentSequence::build_from_vec(zipped)
    }
}

impl<T: PartialEq> PersistentSequence<T> {
    /// Returns `true` if `prefix` is a prefix of this sequence.
    ///
    /// The empty sequence is a prefix of every sequence.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        prefix.length <= self.length && self.iter().zip(prefix.iter()).all(|(a, b)| a == b)
    }

    /// Returns `true` if `sub` occurs as a contiguous run inside this sequence.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = (1..=5).collect();
    /// assert!(sequence.has_subsequence(&(2..=4).collect()));
    /// assert!(!sequence.has_subsequence(&(3..=6).collect()));
    /// ```
    #[must_use]
    pub fn has_subsequence(&self, sub: &Self) -> bool {
        let mut current = self.clone();
        loop {
            if current.starts_with(sub) {
                return true;
            }
            let Some((_, rest)) = current.uncons() else {
                return false;
            };
            current = rest;
        }
    }
}

impl<T: Clone> PersistentSequence<T> {
    /// Keeps the elements that satisfy `predicate`, preserving order.
    ///
    /// Built with the stack-safe right fold, so the predicate is evaluated
    /// from the last element to the first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let sequence: PersistentSequence<i32> = (1..=6).collect();
    /// let even = sequence.filter(|x| x % 2 == 0);
    /// assert_eq!(even, vec![2, 4, 6].into_iter().collect());
    /// ```
    #[must_use]
    pub fn filter<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        self.fold_right(Self::new(), |element, accumulated| {
            if predicate(element) {
                accumulated.cons(element.clone())
            } else {
                accumulated
            }
        })
    }

    /// Concatenates `other` after `self`.
    ///
    /// Only the elements of `self` are copied; `other` is shared as the tail.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let front: PersistentSequence<i32> = (1..=2).collect();
    /// let back: PersistentSequence<i32> = (3..=4).collect();
    /// assert_eq!(front.append(&back), (1..=4).collect());
    /// ```
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        self.fold_right(other.clone(), |element, accumulated| {
            accumulated.cons(element.clone())
        })
    }

    /// Returns the elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        self.fold_left(Self::new(), |accumulated, element| {
            accumulated.cons(element.clone())
        })
    }

    /// Maps every element to a sequence and concatenates the results.
    pub fn flat_map<U, F>(&self, function: F) -> PersistentSequence<U>
    where
        U: Clone,
        F: FnMut(&T) -> PersistentSequence<U>,
    {
        self.map(function).concat()
    }
}

impl<T: Clone> PersistentSequence<PersistentSequence<T>> {
    /// Flattens a sequence of sequences into one sequence.
    ///
    /// The last inner sequence is shared rather than copied.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let nested: PersistentSequence<PersistentSequence<i32>> = vec![
    ///     (1..=2).collect(),
    ///     PersistentSequence::new(),
    ///     (3..=4).collect(),
    /// ]
    /// .into_iter()
    /// .collect();
    /// assert_eq!(nested.concat(), (1..=4).collect());
    /// ```
    #[must_use]
    pub fn concat(&self) -> PersistentSequence<T> {
        self.fold_right(PersistentSequence::new(), |inner, accumulated| {
            inner.append(&accumulated)
        })
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`PersistentSequence`].
pub struct PersistentSequenceIterator<'a, T> {
    current: Option<&'a Rc<Node<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for PersistentSequenceIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            self.current = node.next.as_ref();
            self.remaining -= 1;
            &node.element
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentSequenceIterator<'_, T> {}

/// An owning iterator over elements of a [`PersistentSequence`].
pub struct PersistentSequenceIntoIterator<T> {
    sequence: PersistentSequence<T>,
}

impl<T: Clone> Iterator for PersistentSequenceIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let (element, rest) = self
            .sequence
            .uncons()
            .map(|(head, tail)| (head.clone(), tail))?;
        self.sequence = rest;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.sequence.length, Some(self.sequence.length))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentSequenceIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for PersistentSequence<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            length: self.length,
        }
    }
}

impl<T> Default for PersistentSequence<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::build_from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone> IntoIterator for PersistentSequence<T> {
    type Item = T;
    type IntoIter = PersistentSequenceIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentSequenceIntoIterator { sequence: self }
    }
}

impl<'a, T> IntoIterator for &'a PersistentSequence<T> {
    type Item = &'a T;
    type IntoIter = PersistentSequenceIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for PersistentSequence<T> {}

impl<T: Hash> Hash for PersistentSequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentSequence<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentSequence<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (index, element) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentSequence<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.length))?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentSequenceVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::de::Visitor<'de> for PersistentSequenceVisitor<T> {
    type Value = PersistentSequence<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(element) = access.next_element()? {
            elements.push(element);
        }
        Ok(PersistentSequence::build_from_vec(elements))
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for PersistentSequence<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentSequenceVisitor {
            marker: std::marker::PhantomData,
        })
    }
}
