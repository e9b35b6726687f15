//! A candy dispenser driven by coin and turn inputs.
//!
//! [`Machine::apply`] is the total transition function. [`simulate`] lifts a
//! sequence of inputs into a [`StateThread`] that applies them in order and
//! reports the final `(candies, coins)`.
//!
//! | Input | Locked | Candies | Effect |
//! |-------|--------|---------|--------|
//! | Coin  | yes    | > 0     | unlock, one more coin |
//! | Coin  | yes    | 0       | none |
//! | Coin  | no     | any     | none |
//! | Turn  | no     | > 0     | lock, one less candy |
//! | Turn  | no     | 0       | none |
//! | Turn  | yes    | any     | none |
//!
//! # Examples
//!
//! ```rust
//! use fpcore::effect::machine::{self, Input, Machine};
//!
//! let inputs = [Input::Coin, Input::Turn].repeat(4);
//! let ((candies, coins), machine) = machine::simulate_inputs(inputs).run(Machine::new(true, 5, 10));
//! assert_eq!((candies, coins), (1, 14));
//! assert!(machine.locked);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::StateThread;
use crate::persistent::PersistentSequence;

/// An action performed on the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Input {
    /// Insert a coin.
    Coin,
    /// Turn the knob.
    Turn,
}

/// The dispenser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Machine {
    /// Whether the knob is locked.
    pub locked: bool,
    /// Candies left to dispense.
    pub candies: u32,
    /// Coins collected so far.
    pub coins: u32,
}

impl Machine {
    /// Creates a machine.
    #[inline]
    #[must_use]
    pub const fn new(locked: bool, candies: u32, coins: u32) -> Self {
        Self {
            locked,
            candies,
            coins,
        }
    }

    /// Returns the machine after `input`.
    ///
    /// Inputs that do not apply in the current state leave it unchanged.
    #[must_use]
    pub fn apply(self, input: Input) -> Self {
        let next = match (input, self) {
            (Input::Coin, Self { locked: true, candies, coins }) if candies > 0 => Self {
                locked: false,
                candies,
                coins: coins.saturating_add(1),
            },
            (Input::Turn, Self { locked: false, candies, coins }) if candies > 0 => Self {
                locked: true,
                candies: candies - 1,
                coins,
            },
            _ => self,
        };
        tracing::trace!(?input, before = ?self, after = ?next, "machine transition");
        next
    }

    /// Returns the candies and coins.
    #[inline]
    #[must_use]
    pub const fn totals(&self) -> (u32, u32) {
        (self.candies, self.coins)
    }
}

/// Returns the transition for a single input as a plain function.
pub fn transition_for(input: Input) -> impl Fn(Machine) -> Machine {
    move |machine| machine.apply(input)
}

/// Builds a program that applies `inputs` in order and reports the final
/// `(candies, coins)`.
///
/// Each transition sees the machine left by every input before it.
///
/// # Examples
///
/// ```rust
/// use fpcore::effect::machine::{self, Input, Machine};
/// use fpcore::persistent::PersistentSequence;
///
/// let inputs: PersistentSequence<Input> = vec![Input::Coin, Input::Coin, Input::Turn].into_iter().collect();
/// let program = machine::simulate(&inputs);
/// assert_eq!(program.eval(Machine::new(true, 2, 0)), (1, 1));
/// ```
pub fn simulate(inputs: &PersistentSequence<Input>) -> StateThread<Machine, (u32, u32)> {
    tracing::debug!(inputs = inputs.len(), "building machine simulation");
    let transitions = inputs.map(|input| StateThread::modify(transition_for(*input)));
    StateThread::sequence(&transitions)
        .flat_map(|_| StateThread::get())
        .map(|machine| machine.totals())
}

/// Like [`simulate`], for any iterable of inputs.
pub fn simulate_inputs<I>(inputs: I) -> StateThread<Machine, (u32, u32)>
where
    I: IntoIterator<Item = Input>,
{
    simulate(&inputs.into_iter().collect())
}
