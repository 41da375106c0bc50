//! The backtracking search engine.
//!
//! [`Search`] drives Knuth's Algorithm C over a [`Matrix`]: repeatedly pick
//! the uncovered primary item with the fewest remaining options, try each of
//! its active options in turn, and undo every attempt through the trail. The
//! recursion is reified as a stack of [`Frame`]s so the search can suspend
//! after yielding a solution and resume exactly where it stopped when the
//! caller asks for the next one.

use tracing::{debug, trace};

use crate::solver::matrix::{ColorConflict, Matrix};
use crate::solver::problem::{ItemId, OptionId};

/// Counters describing one search, kept up to date while it runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchStats {
    /// Options the engine attempted to cover.
    pub nodes_visited: u64,
    /// Choices undone, whether after a dead end, a yielded solution, or an
    /// exhausted branch.
    pub backtracks: u64,
    /// Attempts rejected because of an incompatible color commitment.
    pub color_conflicts: u64,
    /// Solutions yielded so far.
    pub solutions: u64,
    /// Deepest branching level reached.
    pub max_depth: usize,
}

/// One level of the reified recursion.
#[derive(Debug, Clone)]
struct Frame {
    /// The primary item this level branches on.
    item: ItemId,
    /// Position of the next option to try within the item's active prefix.
    /// The prefix is restored verbatim between attempts, so the cursor keeps
    /// indexing the order seen when the item was selected.
    cursor: usize,
    /// Trail mark taken just before the currently committed option;
    /// `Some` exactly while a choice of this level is in effect.
    mark: Option<usize>,
}

/// A lazy enumeration of the solutions of one XCC problem.
///
/// Built by [`Problem::solutions`] (or the `covers*` front-ends). Each call
/// to [`next`] resumes the suspended search and runs until the next solution
/// is found or the search space is exhausted; afterwards the iterator keeps
/// reporting `None`. A solution is the list of chosen option indices in the
/// order they were selected.
///
/// The search state is owned by the iterator and allocated up front; the
/// stepping itself only swaps cells and pushes trail records. Dropping the
/// iterator simply releases the state.
///
/// [`Problem::solutions`]: crate::solver::problem::Problem::solutions
/// [`next`]: Iterator::next
#[derive(Debug)]
pub struct Search {
    matrix: Matrix,
    frames: Vec<Frame>,
    /// The options currently chosen, bottom of the search tree last.
    choices: Vec<OptionId>,
    stats: SearchStats,
    started: bool,
    exhausted: bool,
}

impl Search {
    pub(crate) fn new(matrix: Matrix) -> Self {
        Self {
            matrix,
            frames: Vec::new(),
            choices: Vec::new(),
            stats: SearchStats::default(),
            started: false,
            exhausted: false,
        }
    }

    /// Counters for the work done so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Runs the search until the next solution or exhaustion.
    ///
    /// Equivalent to [`Iterator::next`]; exposed by name for callers that
    /// want to interleave [`Search::stats`] inspection with the enumeration.
    pub fn next_solution(&mut self) -> Option<Vec<OptionId>> {
        if self.exhausted {
            return None;
        }
        let mut descending = if self.started {
            // Resuming after a yield: release the deepest choice so the
            // search moves on to that level's remaining options.
            if !self.uncommit() {
                return self.exhaust();
            }
            false
        } else {
            self.started = true;
            true
        };
        loop {
            if descending {
                match self.matrix.select_item() {
                    None => {
                        // Every primary item is covered.
                        self.stats.solutions += 1;
                        debug!(options = self.choices.len(), "solution found");
                        return Some(self.choices.clone());
                    }
                    Some(item) if self.matrix.active_len(item) == 0 => {
                        // Dead end: an uncovered item has no options left.
                        if !self.uncommit() {
                            return self.exhaust();
                        }
                    }
                    Some(item) => {
                        trace!(item, len = self.matrix.active_len(item), "branching");
                        self.frames.push(Frame {
                            item,
                            cursor: 0,
                            mark: None,
                        });
                        self.stats.max_depth = self.stats.max_depth.max(self.frames.len());
                    }
                }
                descending = false;
                continue;
            }
            let Some(frame) = self.frames.last_mut() else {
                return self.exhaust();
            };
            if frame.cursor < self.matrix.active_len(frame.item) {
                let option = self.matrix.option_at(frame.item, frame.cursor);
                frame.cursor += 1;
                let mark = self.matrix.mark();
                self.stats.nodes_visited += 1;
                match self.matrix.try_cover(option) {
                    Ok(()) => {
                        frame.mark = Some(mark);
                        self.choices.push(option);
                        descending = true;
                    }
                    Err(ColorConflict) => {
                        self.stats.color_conflicts += 1;
                        self.matrix.undo_to(mark);
                    }
                }
            } else {
                // This level has tried everything; climb out of it.
                self.frames.pop();
                if !self.uncommit() {
                    return self.exhaust();
                }
            }
        }
    }

    /// Undoes the committed choice of the deepest frame so its next sibling
    /// can be tried. Returns `false` when no frame is left, which means the
    /// whole tree has been explored.
    fn uncommit(&mut self) -> bool {
        match self.frames.last_mut() {
            Some(frame) => {
                let mark = frame.mark.take().expect("active frame must hold a choice");
                self.matrix.undo_to(mark);
                self.choices.pop();
                self.stats.backtracks += 1;
                true
            }
            None => false,
        }
    }

    fn exhaust(&mut self) -> Option<Vec<OptionId>> {
        self.exhausted = true;
        debug_assert!(self.matrix.trail_is_empty());
        debug!(
            solutions = self.stats.solutions,
            nodes = self.stats.nodes_visited,
            backtracks = self.stats.backtracks,
            "search exhausted"
        );
        None
    }
}

impl Iterator for Search {
    type Item = Vec<OptionId>;

    fn next(&mut self) -> Option<Vec<OptionId>> {
        self.next_solution()
    }
}

impl std::iter::FusedIterator for Search {}
