#![cfg(feature = "effect")]
//! Integration tests for the candy machine simulation.

use fpcore::effect::machine::{self, Input, Machine};
use fpcore::persistent::PersistentSequence;
use proptest::prelude::*;
use rstest::rstest;

fn inputs_of(inputs: &[Input]) -> PersistentSequence<Input> {
    inputs.iter().copied().collect()
}

#[rstest]
fn four_purchases_from_five_candies() {
    let inputs = inputs_of(&[Input::Coin, Input::Turn].repeat(4));
    let program = machine::simulate(&inputs);

    let ((candies, coins), final_machine) = program.run(Machine::new(true, 5, 10));
    assert_eq!((candies, coins), (1, 14));
    assert_eq!(final_machine, Machine::new(true, 1, 14));
}

#[rstest]
#[case(&[Input::Coin, Input::Coin, Input::Coin], Machine::new(true, 3, 0), (3, 1))]
#[case(&[Input::Turn, Input::Turn], Machine::new(true, 3, 0), (3, 0))]
#[case(&[Input::Coin, Input::Turn, Input::Turn], Machine::new(true, 3, 0), (2, 1))]
#[case(&[Input::Coin, Input::Turn], Machine::new(true, 0, 8), (0, 8))]
#[case(&[], Machine::new(false, 4, 2), (4, 2))]
fn simulate_reports_final_totals(#[case] inputs: &[Input], #[case] initial: Machine, #[case] expected: (u32, u32)) {
    assert_eq!(machine::simulate(&inputs_of(inputs)).eval(initial), expected);
}

#[rstest]
fn program_can_be_rerun_on_other_machines() {
    let program = machine::simulate_inputs([Input::Coin, Input::Turn]);
    assert_eq!(program.eval(Machine::new(true, 1, 0)), (0, 1));
    assert_eq!(program.eval(Machine::new(true, 9, 9)), (8, 10));
    assert_eq!(program.eval(Machine::new(true, 1, 0)), (0, 1));
}

#[rstest]
fn long_input_runs_do_not_exhaust_the_stack() {
    let inputs = [Input::Coin, Input::Turn].repeat(50_000);
    let program = machine::simulate_inputs(inputs);

    let (totals, final_machine) = program.run(Machine::new(true, 60_000, 0));
    assert_eq!(totals, (10_000, 50_000));
    assert_eq!(final_machine, Machine::new(true, 10_000, 50_000));
}

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![Just(Input::Coin), Just(Input::Turn)]
}

proptest! {
    #[test]
    fn prop_simulate_matches_folding_apply(
        inputs in prop::collection::vec(input_strategy(), 0..60),
        locked in any::<bool>(),
        candies in 0u32..10,
        coins in 0u32..10
    ) {
        let initial = Machine::new(locked, candies, coins);
        let expected = inputs.iter().fold(initial, |machine, input| machine.apply(*input));

        let (totals, final_machine) = machine::simulate_inputs(inputs).run(initial);
        prop_assert_eq!(final_machine, expected);
        prop_assert_eq!(totals, (expected.candies, expected.coins));
    }

    #[test]
    fn prop_candies_plus_purchases_is_conserved(
        inputs in prop::collection::vec(input_strategy(), 0..60),
        candies in 0u32..10
    ) {
        let ((remaining, coins), _) = machine::simulate_inputs(inputs).run(Machine::new(true, candies, 0));
        prop_assert!(remaining <= candies);
        prop_assert!(candies - remaining <= coins);
        prop_assert!(coins <= candies - remaining + 1);
    }
}
