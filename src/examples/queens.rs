//! The n-queens problem as an exact cover with secondary items.
//!
//! Every rank and every file must hold exactly one queen, so ranks and files
//! are primary items. Each diagonal may hold at most one queen but need not
//! hold any, which is precisely what a secondary item expresses. One option
//! per square ties the four together.

use crate::error::Result;
use crate::solver::engine::Search;
use crate::solver::problem::Problem;

/// Builds the XCC formulation of the n-queens problem.
///
/// # Panics
///
/// Panics if `n` is zero; there is no empty board.
pub fn queens_problem(n: usize) -> Problem<String, ()> {
    assert!(n > 0, "board must have at least one square");
    let primary = (0..n)
        .map(|r| format!("r{r}"))
        .chain((0..n).map(|f| format!("f{f}")));
    let secondary = (0..2 * n - 1)
        .map(|d| format!("a{d}"))
        .chain((0..2 * n - 1).map(|d| format!("b{d}")));
    let mut problem: Problem<String, ()> = Problem::new(primary, secondary);
    for r in 0..n {
        for f in 0..n {
            problem
                .add_option([
                    (format!("r{r}"), None),
                    (format!("f{f}"), None),
                    (format!("a{}", r + f), None),
                    (format!("b{}", r + n - 1 - f), None),
                ])
                .expect("the four items of a square are distinct");
        }
    }
    problem
}

/// Enumerates all placements of `n` non-attacking queens on an `n`-by-`n`
/// board. Options are numbered square by square, rank-major; see [`square`].
pub fn queens(n: usize) -> Result<Search> {
    queens_problem(n).solutions()
}

/// The `(rank, file)` square denoted by an option index of [`queens`].
pub fn square(n: usize, option: usize) -> (usize, usize) {
    (option / n, option % n)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    /// Solution counts for n = 1..=8 (OEIS A000170).
    const KNOWN_COUNTS: [usize; 8] = [1, 0, 0, 2, 10, 4, 40, 92];

    #[test]
    fn solution_counts_match_the_literature() {
        for (n, &expected) in KNOWN_COUNTS.iter().enumerate().map(|(i, c)| (i + 1, c)) {
            let count = queens(n).unwrap().count();
            assert_eq!(count, expected, "wrong count for n = {n}");
        }
    }

    #[test]
    fn placements_are_mutually_non_attacking() {
        for solution in queens(6).unwrap() {
            let squares: Vec<_> = solution.iter().map(|&o| square(6, o)).collect();
            for (i, &(r1, f1)) in squares.iter().enumerate() {
                for &(r2, f2) in &squares[i + 1..] {
                    assert_ne!(r1, r2);
                    assert_ne!(f1, f2);
                    assert_ne!(r1 + f2, r2 + f1, "shared diagonal");
                    assert_ne!(r1 + f1, r2 + f2, "shared antidiagonal");
                }
            }
        }
    }

    /// Straightforward reference count: place one queen per rank and check
    /// files and diagonals pairwise.
    fn count_by_backtracking(n: usize, files: &mut Vec<usize>) -> usize {
        if files.len() == n {
            return 1;
        }
        let rank = files.len();
        let mut total = 0;
        for file in 0..n {
            let attacked = files.iter().enumerate().any(|(r, &f)| {
                f == file || r + file == rank + f || r + f == rank + file
            });
            if !attacked {
                files.push(file);
                total += count_by_backtracking(n, files);
                files.pop();
            }
        }
        total
    }

    proptest! {
        #[test]
        fn agrees_with_a_permutation_search(n in 1..=6usize) {
            let expected = count_by_backtracking(n, &mut Vec::new());
            prop_assert_eq!(queens(n).unwrap().count(), expected);
        }
    }
}
