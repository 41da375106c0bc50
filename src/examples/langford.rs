//! Langford pairings as an exact cover problem.
//!
//! A Langford pairing of order `n` arranges the numbers `1..=n`, each twice,
//! into a sequence of length `2n` so that the two copies of `k` are exactly
//! `k` places apart. Values and slots are all primary: each value is placed
//! once and each slot is filled once. An option places one value into one
//! admissible pair of slots.
//!
//! Pairings exist only when `n` is 0 or 3 modulo 4; both orientations of a
//! pairing are counted separately.

use crate::error::Result;
use crate::solver::engine::Search;
use crate::solver::problem::Problem;

/// The `(value, first_slot)` placement denoted by each option, in option
/// order. The second slot is `first_slot + value + 1`.
pub fn option_table(n: usize) -> Vec<(usize, usize)> {
    let mut table = Vec::new();
    for value in 1..=n {
        for first in 0..(2 * n).saturating_sub(value + 1) {
            table.push((value, first));
        }
    }
    table
}

/// Builds the exact cover formulation of the Langford pairing problem.
pub fn langford_problem(n: usize) -> Problem<String, ()> {
    let primary = (1..=n)
        .map(|v| format!("v{v}"))
        .chain((0..2 * n).map(|s| format!("s{s}")));
    let mut problem: Problem<String, ()> = Problem::new(primary, std::iter::empty());
    for (value, first) in option_table(n) {
        let second = first + value + 1;
        problem
            .add_option([
                (format!("v{value}"), None),
                (format!("s{first}"), None),
                (format!("s{second}"), None),
            ])
            .expect("a value and two distinct slots");
    }
    problem
}

/// Enumerates the Langford pairings of order `n`.
pub fn langford(n: usize) -> Result<Search> {
    langford_problem(n).solutions()
}

/// Reconstructs the paired sequence a solution describes.
pub fn sequence(n: usize, solution: &[usize]) -> Vec<usize> {
    let table = option_table(n);
    let mut slots = vec![0; 2 * n];
    for &option in solution {
        let (value, first) = table[option];
        slots[first] = value;
        slots[first + value + 1] = value;
    }
    slots
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Pairing counts for n = 1..=8, both orientations included
    /// (twice OEIS A014552).
    const KNOWN_COUNTS: [usize; 8] = [0, 0, 2, 2, 0, 0, 52, 300];

    #[test]
    fn pairing_counts_match_the_literature() {
        for (n, &expected) in KNOWN_COUNTS.iter().enumerate().take(7).map(|(i, c)| (i + 1, c)) {
            let count = langford(n).unwrap().count();
            assert_eq!(count, expected, "wrong count for n = {n}");
        }
    }

    #[test]
    fn reconstructed_sequences_have_langford_spacing() {
        let solutions: Vec<_> = langford(4).unwrap().collect();
        assert_eq!(solutions.len(), 2);
        for solution in &solutions {
            let sequence = sequence(4, solution);
            for value in 1..=4 {
                let first = sequence.iter().position(|&v| v == value).unwrap();
                assert_eq!(sequence[first + value + 1], value);
                assert_eq!(sequence.iter().filter(|&&v| v == value).count(), 2);
            }
        }
    }

    #[test]
    fn the_two_order_3_pairings_are_mirror_images() {
        let sequences: Vec<_> = langford(3)
            .unwrap()
            .map(|solution| sequence(3, &solution))
            .collect();
        assert_eq!(sequences.len(), 2);
        let mut mirrored = sequences[0].clone();
        mirrored.reverse();
        assert_eq!(mirrored, sequences[1]);
    }
}
