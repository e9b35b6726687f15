//! State threading - pure computations over an explicit state.
//!
//! A [`StateThread<S, A>`] wraps a transition `S -> (A, S)`: given a state it
//! produces a result and the state to hand to the next step. Composition
//! with [`StateThread::map`], [`StateThread::flat_map`] and
//! [`StateThread::map2`] threads the state from one step to the next without
//! any mutation.
//!
//! # Laws
//!
//! ## Functor Laws
//!
//! - Identity: `thread.map(|x| x) == thread`
//! - Composition: `thread.map(f).map(g) == thread.map(|x| g(f(x)))`
//!
//! ## Monad Laws
//!
//! - Left Identity: `StateThread::unit(a).flat_map(f) == f(a)`
//! - Right Identity: `m.flat_map(StateThread::unit) == m`
//! - Associativity: `m.flat_map(f).flat_map(g) == m.flat_map(|x| f(x).flat_map(g))`
//!
//! ## State Laws
//!
//! - Get Set: `get().flat_map(set) == unit(())`
//! - Set Get: `set(s).then(get())` returns `s`
//! - Set Set: `set(s1).then(set(s2)) == set(s2)`
//!
//! Two threads are equal when running them on equal states gives equal
//! results and equal final states.
//!
//! # Examples
//!
//! ```rust
//! use fpcore::effect::StateThread;
//!
//! fn increment() -> StateThread<i32, ()> {
//!     StateThread::modify(|count| count + 1)
//! }
//!
//! let counter = increment()
//!     .then(increment())
//!     .then(increment())
//!     .then(StateThread::get());
//!
//! assert_eq!(counter.run(0), (3, 3));
//! ```

use std::fmt;
use std::rc::Rc;

use crate::persistent::PersistentSequence;

/// A computation that threads a state of type `S` and yields an `A`.
///
/// Running the same thread twice on equal states gives equal results.
///
/// # Examples
///
/// ```rust
/// use fpcore::effect::StateThread;
///
/// let computation: StateThread<i32, i32> = StateThread::get()
///     .flat_map(|current| StateThread::set(current + 1).then(StateThread::unit(current)));
///
/// assert_eq!(computation.run(10), (10, 11));
/// ```
pub struct StateThread<S, A>
where
    S: 'static,
    A: 'static,
{
    transition: Rc<dyn Fn(S) -> (A, S)>,
}

impl<S, A> StateThread<S, A>
where
    S: 'static,
    A: 'static,
{
    /// Creates a thread from a state transition function.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    ///
    /// let thread: StateThread<i32, i32> = StateThread::new(|s: i32| (s * 2, s + 1));
    /// assert_eq!(thread.run(10), (20, 11));
    /// ```
    pub fn new<F>(transition: F) -> Self
    where
        F: Fn(S) -> (A, S) + 'static,
    {
        Self {
            transition: Rc::new(transition),
        }
    }

    /// Alias of [`StateThread::new`].
    pub fn from_transition<F>(transition: F) -> Self
    where
        F: Fn(S) -> (A, S) + 'static,
    {
        Self::new(transition)
    }

    /// Runs the thread from `initial_state`, returning the result and the
    /// final state.
    pub fn run(&self, initial_state: S) -> (A, S) {
        (self.transition)(initial_state)
    }

    /// Runs the thread and keeps only the result.
    pub fn eval(&self, initial_state: S) -> A {
        let (result, _) = self.run(initial_state);
        result
    }

    /// Runs the thread and keeps only the final state.
    pub fn exec(&self, initial_state: S) -> S {
        let (_, final_state) = self.run(initial_state);
        final_state
    }

    /// A thread that yields `value` and leaves the state untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    ///
    /// let thread: StateThread<i32, &str> = StateThread::unit("constant");
    /// assert_eq!(thread.run(42), ("constant", 42));
    /// ```
    pub fn unit(value: A) -> Self
    where
        A: Clone,
    {
        Self::new(move |state| (value.clone(), state))
    }

    /// Alias for [`StateThread::unit`].
    pub fn pure(value: A) -> Self
    where
        A: Clone,
    {
        Self::unit(value)
    }

    /// Applies `function` to the result, leaving the state transition as is.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    ///
    /// let thread: StateThread<i32, i32> = StateThread::new(|s: i32| (s, s));
    /// assert_eq!(thread.map(|value| value * 2).run(21), (42, 21));
    /// ```
    pub fn map<B, F>(self, function: F) -> StateThread<S, B>
    where
        F: Fn(A) -> B + 'static,
        B: 'static,
    {
        let transition = self.transition;
        StateThread::new(move |state| {
            let (result, next_state) = (transition)(state);
            (function(result), next_state)
        })
    }

    /// Runs this thread, feeds its result to `function`, and runs the thread
    /// it returns on the intermediate state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    ///
    /// let thread: StateThread<i32, i32> = StateThread::new(|s: i32| (s, s + 1));
    /// let chained = thread.flat_map(|value| StateThread::new(move |s: i32| (value + s, s * 2)));
    /// // First: (10, 11), then with state 11: (10 + 11, 22)
    /// assert_eq!(chained.run(10), (21, 22));
    /// ```
    pub fn flat_map<B, F>(self, function: F) -> StateThread<S, B>
    where
        F: Fn(A) -> StateThread<S, B> + 'static,
        B: 'static,
    {
        let transition = self.transition;
        StateThread::new(move |state| {
            let (result, intermediate_state) = (transition)(state);
            function(result).run(intermediate_state)
        })
    }

    /// Alias for [`StateThread::flat_map`].
    pub fn and_then<B, F>(self, function: F) -> StateThread<S, B>
    where
        F: Fn(A) -> StateThread<S, B> + 'static,
        B: 'static,
    {
        self.flat_map(function)
    }

    /// Runs this thread, discards its result, then runs `next`.
    #[must_use]
    pub fn then<B>(self, next: StateThread<S, B>) -> StateThread<S, B>
    where
        B: 'static,
    {
        self.flat_map(move |_| next.clone())
    }

    /// Runs this thread then `other`, combining both results with `function`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    ///
    /// let first: StateThread<i32, i32> = StateThread::new(|s: i32| (s, s + 1));
    /// let second: StateThread<i32, i32> = StateThread::new(|s: i32| (s * 2, s + 1));
    /// // first: (10, 11), second with 11: (22, 12)
    /// assert_eq!(first.map2(second, |a, b| a + b).run(10), (32, 12));
    /// ```
    pub fn map2<B, C, F>(self, other: StateThread<S, B>, function: F) -> StateThread<S, C>
    where
        F: Fn(A, B) -> C + 'static,
        B: 'static,
        C: 'static,
    {
        let first = self.transition;
        let second = other.transition;
        StateThread::new(move |state| {
            let (result_a, intermediate_state) = (first)(state);
            let (result_b, final_state) = (second)(intermediate_state);
            (function(result_a, result_b), final_state)
        })
    }

    /// Runs this thread then `other`, pairing their results.
    #[must_use]
    pub fn product<B>(self, other: StateThread<S, B>) -> StateThread<S, (A, B)>
    where
        B: 'static,
    {
        self.map2(other, |a, b| (a, b))
    }

    /// A thread that yields a projection of the current state.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    ///
    /// let length: StateThread<String, usize> = StateThread::gets(String::len);
    /// assert_eq!(length.run("four".to_string()), (4, "four".to_string()));
    /// ```
    pub fn gets<F>(projection: F) -> Self
    where
        F: Fn(&S) -> A + 'static,
    {
        Self::new(move |state| {
            let result = projection(&state);
            (result, state)
        })
    }

    /// Combines a sequence of threads into one that runs them in order and
    /// collects their results.
    ///
    /// Each element's transition sees the state left by the element before
    /// it, and the results keep the order of `threads`. This agrees with
    /// folding the threads from the right with [`StateThread::map2`], but
    /// the transitions run in a loop, so the call depth does not grow with
    /// the number of threads.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    /// use fpcore::persistent::PersistentSequence;
    ///
    /// let ticket = || StateThread::new(|next: u32| (next, next + 1));
    /// let tickets: PersistentSequence<StateThread<u32, u32>> = (0..3).map(|_| ticket()).collect();
    ///
    /// let (issued, next) = StateThread::sequence(&tickets).run(100);
    /// assert_eq!(issued, (100..103).collect());
    /// assert_eq!(next, 103);
    /// ```
    pub fn sequence(threads: &PersistentSequence<Self>) -> StateThread<S, PersistentSequence<A>> {
        let threads = threads.clone();
        StateThread::new(move |initial_state| {
            let mut results = Vec::with_capacity(threads.len());
            let mut state = initial_state;
            for thread in &threads {
                let (result, next_state) = thread.run(state);
                results.push(result);
                state = next_state;
            }
            (results.into_iter().collect(), state)
        })
    }

    /// Maps every element of `values` to a thread and sequences the results.
    pub fn traverse<T, F>(values: &PersistentSequence<T>, function: F) -> StateThread<S, PersistentSequence<A>>
    where
        F: FnMut(&T) -> Self,
    {
        StateThread::sequence(&values.map(function))
    }
}

// =============================================================================
// State Access
// =============================================================================

impl<S> StateThread<S, S>
where
    S: Clone + 'static,
{
    /// A thread that yields the current state without changing it.
    #[must_use]
    pub fn get() -> Self {
        Self::new(|state: S| (state.clone(), state))
    }
}

impl<S> StateThread<S, ()>
where
    S: 'static,
{
    /// A thread that replaces the state with `new_state`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fpcore::effect::StateThread;
    ///
    /// let thread: StateThread<i32, ()> = StateThread::set(100);
    /// assert_eq!(thread.exec(42), 100);
    /// ```
    pub fn set(new_state: S) -> Self
    where
        S: Clone,
    {
        Self::new(move |_| ((), new_state.clone()))
    }

    /// Alias for [`StateThread::set`].
    pub fn put(new_state: S) -> Self
    where
        S: Clone,
    {
        Self::set(new_state)
    }

    /// A thread that transforms the state with `modifier`.
    pub fn modify<F>(modifier: F) -> Self
    where
        F: Fn(S) -> S + 'static,
    {
        Self::new(move |state| ((), modifier(state)))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<S, A> Clone for StateThread<S, A>
where
    S: 'static,
    A: 'static,
{
    fn clone(&self) -> Self {
        Self {
            transition: Rc::clone(&self.transition),
        }
    }
}

impl<S, A> fmt::Display for StateThread<S, A>
where
    S: 'static,
    A: 'static,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "<StateThread>")
    }
}

static_assertions::assert_not_impl_any!(StateThread<i32, i32>: Send, Sync);
