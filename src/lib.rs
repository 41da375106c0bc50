//! Xcc is a solver for the exact cover with colors (XCC) problem.
//!
//! Given a set of *items* and a collection of *options* (each option a subset
//! of items), the exact cover problem asks for every subcollection of options
//! that contains each item exactly once. XCC generalizes this in two ways:
//! *secondary* items need to be covered at most once rather than exactly
//! once, and an occurrence of a secondary item may carry a *color*, in which
//! case any number of chosen options may share the item as long as they agree
//! on its color. Sudoku, pentomino packings, n-queens and a wide range of
//! other combinatorial problems reduce to XCC directly.
//!
//! The engine implements Knuth's Algorithm C (TAOCP 7.2.2.3) in its "dancing
//! cells" form: every item keeps the options that contain it in a contiguous
//! sparse-set array, covering swaps cells below an active-length watermark
//! instead of splicing linked lists, and a trail of fixed-size undo records
//! makes backtracking exact. Branching uses the minimum-remaining-values
//! heuristic with a deterministic tie-break, so enumeration order is stable
//! across runs.
//!
//! # Core concepts
//!
//! - **[`Problem`]**: a builder that interns item and color labels, validates
//!   each option as it is added, and starts searches.
//! - **[`Search`]**: a lazy iterator over solutions; each solution is the
//!   list of chosen option indices in selection order. The search suspends
//!   between solutions and runs only when polled.
//! - **[`covers`]**, **[`covers_colored`]**, **[`covers_bool`]**: one-call
//!   front-ends for token-list and boolean-matrix input.
//!
//! # Example: an exact cover
//!
//! Knuth's introductory example from TAOCP 7.2.2.1: cover the items `a`
//! through `g` with some of six options. The unique solution picks
//! `'c e'`, `'b g'` and `'a d f'`.
//!
//! ```
//! use xcc::solver::problem::covers;
//!
//! let options = vec![
//!     vec!["c", "e"],
//!     vec!["a", "d", "g"],
//!     vec!["b", "c", "f"],
//!     vec!["a", "d", "f"],
//!     vec!["b", "g"],
//!     vec!["d", "e", "g"],
//! ];
//! let mut solutions = covers(&options, None, None).unwrap();
//!
//! // Option indices, in the order the search selected them.
//! assert_eq!(solutions.next(), Some(vec![0, 4, 3]));
//! assert_eq!(solutions.next(), None);
//! ```
//!
//! # Example: color controls
//!
//! Secondary items `x` and `y` may be shared between options when their
//! color labels match. Here only options 3 and 1 get along:
//!
//! ```
//! use xcc::solver::problem::covers_colored;
//!
//! let options = vec![
//!     vec!["p", "q", "x", "y:A"],
//!     vec!["p", "r", "x:A", "y"],
//!     vec!["p", "x:B"],
//!     vec!["q", "x:A"],
//!     vec!["r", "y:B"],
//! ];
//! let mut solutions =
//!     covers_colored(&options, Some(&["p", "q", "r"]), Some(&["x", "y"])).unwrap();
//!
//! assert_eq!(solutions.next(), Some(vec![3, 1]));
//! assert_eq!(solutions.next(), None);
//! ```
//!
//! Input mistakes (an option repeating an item, a color on a primary item,
//! an unknown identifier, a primary item no option can cover) are reported
//! as [`Error`]s when the iterator is constructed, never mid-search.
//!
//! [`Problem`]: solver::problem::Problem
//! [`Search`]: solver::engine::Search
//! [`covers`]: solver::problem::covers
//! [`covers_colored`]: solver::problem::covers_colored
//! [`covers_bool`]: solver::problem::covers_bool
//! [`Error`]: error::Error

pub mod error;
pub mod examples;
pub mod solver;
