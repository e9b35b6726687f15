#![cfg(feature = "persistent")]
//! Property-based tests for `PersistentSequence`.
//!
//! Every operation is checked against the equivalent `Vec` computation.

use fpcore::persistent::PersistentSequence;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn sequence_and_vec(max_size: usize) -> impl Strategy<Value = (PersistentSequence<i32>, Vec<i32>)> {
    prop::collection::vec(any::<i32>(), 0..max_size).prop_map(|elements| {
        let sequence: PersistentSequence<i32> = elements.iter().copied().collect();
        (sequence, elements)
    })
}

fn small_sequence() -> impl Strategy<Value = (PersistentSequence<i32>, Vec<i32>)> {
    sequence_and_vec(30)
}

fn to_vec(sequence: &PersistentSequence<i32>) -> Vec<i32> {
    sequence.iter().copied().collect()
}

proptest! {
    // =========================================================================
    // Structure
    // =========================================================================

    #[test]
    fn prop_len_matches_source((sequence, elements) in small_sequence()) {
        prop_assert_eq!(sequence.len(), elements.len());
        prop_assert_eq!(sequence.is_empty(), elements.is_empty());
    }

    #[test]
    fn prop_cons_leaves_original_untouched((sequence, elements) in small_sequence(), element: i32) {
        let extended = sequence.cons(element);
        prop_assert_eq!(extended.head(), Ok(&element));
        prop_assert_eq!(extended.tail(), Ok(sequence.clone()));
        prop_assert_eq!(to_vec(&sequence), elements);
    }

    #[test]
    fn prop_head_and_tail_agree_with_uncons((sequence, _) in small_sequence()) {
        match sequence.uncons() {
            Some((head, tail)) => {
                prop_assert_eq!(sequence.head(), Ok(head));
                prop_assert_eq!(sequence.tail(), Ok(tail));
            }
            None => {
                prop_assert!(sequence.head().is_err());
                prop_assert!(sequence.tail().is_err());
            }
        }
    }

    // =========================================================================
    // Folds
    // =========================================================================

    #[test]
    fn prop_fold_left_matches_iterator_fold((sequence, elements) in small_sequence()) {
        let folded = sequence.fold_left(0i64, |acc, x| acc.wrapping_mul(31).wrapping_add(i64::from(*x)));
        let expected = elements.iter().fold(0i64, |acc, x| acc.wrapping_mul(31).wrapping_add(i64::from(*x)));
        prop_assert_eq!(folded, expected);
    }

    #[test]
    fn prop_fold_right_matches_reverse_fold((sequence, elements) in small_sequence()) {
        let folded = sequence.fold_right(Vec::new(), |x, mut acc| {
            acc.push(*x);
            acc
        });
        let expected: Vec<i32> = elements.iter().rev().copied().collect();
        prop_assert_eq!(folded, expected);
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    #[test]
    fn prop_map_matches_vec((sequence, elements) in small_sequence()) {
        let mapped = sequence.map(|x| x.wrapping_mul(2));
        let expected: Vec<i32> = elements.iter().map(|x| x.wrapping_mul(2)).collect();
        prop_assert_eq!(to_vec(&mapped), expected);
    }

    #[test]
    fn prop_filter_matches_vec((sequence, elements) in small_sequence()) {
        let filtered = sequence.filter(|x| x % 3 == 0);
        let expected: Vec<i32> = elements.into_iter().filter(|x| x % 3 == 0).collect();
        prop_assert_eq!(to_vec(&filtered), expected);
    }

    #[test]
    fn prop_append_matches_concat((left, left_elements) in small_sequence(), (right, right_elements) in small_sequence()) {
        let appended = left.append(&right);
        prop_assert_eq!(appended.len(), left.len() + right.len());
        prop_assert_eq!(to_vec(&appended), [left_elements, right_elements].concat());
    }

    #[test]
    fn prop_reverse_is_involution((sequence, _) in small_sequence()) {
        prop_assert_eq!(sequence.reverse().reverse(), sequence);
    }

    #[test]
    fn prop_drop_first_matches_skip((sequence, elements) in small_sequence(), count in 0usize..40) {
        let expected: Vec<i32> = elements.into_iter().skip(count).collect();
        prop_assert_eq!(to_vec(&sequence.drop_first(count)), expected);
    }

    #[test]
    fn prop_drop_while_matches_skip_while((sequence, elements) in small_sequence()) {
        let expected: Vec<i32> = elements.into_iter().skip_while(|x| *x > 0).collect();
        prop_assert_eq!(to_vec(&sequence.drop_while(|x| *x > 0)), expected);
    }

    // =========================================================================
    // Searching
    // =========================================================================

    #[test]
    fn prop_every_slice_is_a_subsequence((sequence, elements) in small_sequence(), start in 0usize..30, width in 0usize..5) {
        let start = start.min(elements.len());
        let end = (start + width).min(elements.len());
        let slice: PersistentSequence<i32> = elements[start..end].iter().copied().collect();
        prop_assert!(sequence.has_subsequence(&slice));
    }

    #[test]
    fn prop_every_prefix_is_a_prefix((sequence, elements) in small_sequence(), length in 0usize..30) {
        let length = length.min(elements.len());
        let prefix: PersistentSequence<i32> = elements[..length].iter().copied().collect();
        prop_assert!(sequence.starts_with(&prefix));
    }
}
