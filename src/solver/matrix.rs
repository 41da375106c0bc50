//! The mutable state of one exact-cover search.
//!
//! The layout follows the "dancing cells" formulation of Knuth's Algorithm C
//! (TAOCP 7.2.2.3): instead of the toroidal linked lists of the classic
//! dancing-links solvers, every item keeps its options in a contiguous slice
//! of one flat arena, partitioned into an active prefix and a hidden suffix
//! by a length marker. Hiding an option from an item is a single swap with
//! the last active cell plus a length decrement, and each swap is recorded on
//! a trail so that backtracking restores the arena byte for byte. The sparse
//! set pairing of `cells` and `pos` is due to Briggs and Torczon.

use crate::solver::problem::{ItemId, OptionId};

/// The color assigned to an occurrence of an item in an option; `0` means
/// untinted. Nonzero values are interned per secondary item.
pub(crate) type ColorId = usize;

/// The position of one occurrence of an item within an option. Nodes are
/// numbered consecutively over the flattened option table.
pub(crate) type NodeId = usize;

/// Raised by [`Matrix::try_cover`] when an option demands a color that
/// contradicts an earlier commitment. Handled entirely inside the engine;
/// callers of the crate never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColorConflict;

/// One reversible mutation, pushed as it happens and popped in LIFO order by
/// [`Matrix::undo_to`]. Every variant is small and fixed-size; the trail
/// never grows beyond the node count plus bookkeeping, so backtracking does
/// not allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrailEntry {
    /// A node was swapped from `from` to the end of its item's active prefix
    /// and the prefix shortened by one.
    CellSwap { node: NodeId, from: usize },
    /// An item left the active set with `prev_len` options remaining.
    ItemCovered { item: ItemId, prev_len: usize },
    /// A secondary item committed to a color; before that it was unassigned
    /// with `prev_len` active options.
    ColorAssigned { item: ItemId, prev_len: usize },
    /// A compatible occurrence was marked as no longer constraining.
    Purified { node: NodeId },
}

/// The sparse matrix a search dances on.
///
/// All storage is allocated by [`Matrix::new`]; the cover, hide and undo
/// operations only swap entries and adjust counters. Between engine steps the
/// active prefix of every uncovered item lists exactly the options that are
/// still selectable and color-compatible, and `pos` inverts `cells` on those
/// prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Matrix {
    n_primary: usize,
    n_items: usize,
    /// Item of each node, in option order.
    node_item: Vec<ItemId>,
    /// Color of each node; `0` for primary items and untinted occurrences.
    node_color: Vec<ColorId>,
    /// Option each node belongs to.
    node_option: Vec<OptionId>,
    /// `opt_ptr[o]..opt_ptr[o + 1]` are option `o`'s nodes.
    opt_ptr: Vec<usize>,
    /// Start of each item's slice of `cells`; `cell_start[n_items]` closes
    /// the last slice.
    cell_start: Vec<usize>,
    /// Flat arena of nodes, sliced per item. The first `len[i]` entries of
    /// item `i`'s slice are its active options.
    cells: Vec<NodeId>,
    /// Inverse of `cells`: the absolute position each node currently sits at.
    pos: Vec<usize>,
    /// Active-prefix length per item.
    len: Vec<usize>,
    /// Whether an item has been consumed by a chosen option.
    covered: Vec<bool>,
    /// Current color per item; `0` is unassigned. Primary items stay `0`.
    item_color: Vec<ColorId>,
    /// Per-node purification marks (see [`Matrix::assign_color`]).
    purified: Vec<bool>,
    trail: Vec<TrailEntry>,
}

impl Matrix {
    /// Builds the initial state from the flattened option table.
    ///
    /// `node_item[opt_ptr[o]..opt_ptr[o + 1]]` are the items of option `o`,
    /// with `node_color` carrying the matching color ids. Items `< n_primary`
    /// are primary.
    pub(crate) fn new(
        n_primary: usize,
        n_items: usize,
        node_item: &[ItemId],
        node_color: &[ColorId],
        opt_ptr: &[usize],
    ) -> Self {
        let n_data = node_item.len();
        debug_assert_eq!(*opt_ptr.last().unwrap_or(&0), n_data);

        let mut node_option = vec![0; n_data];
        for o in 0..opt_ptr.len().saturating_sub(1) {
            for node in opt_ptr[o]..opt_ptr[o + 1] {
                node_option[node] = o;
            }
        }

        // Counting sort of the nodes into per-item slices. Nodes are visited
        // in increasing order, so each item lists its options by ascending
        // option index; the engine's canonical solution order depends on this.
        let mut counts = vec![0usize; n_items];
        for &i in node_item {
            counts[i] += 1;
        }
        let mut cell_start = vec![0usize; n_items + 1];
        for i in 0..n_items {
            cell_start[i + 1] = cell_start[i] + counts[i];
        }
        let mut cells = vec![0; n_data];
        let mut pos = vec![0; n_data];
        let mut filled = vec![0usize; n_items];
        for (node, &i) in node_item.iter().enumerate() {
            let at = cell_start[i] + filled[i];
            cells[at] = node;
            pos[node] = at;
            filled[i] += 1;
        }

        Self {
            n_primary,
            n_items,
            node_item: node_item.to_vec(),
            node_color: node_color.to_vec(),
            node_option,
            opt_ptr: opt_ptr.to_vec(),
            cell_start,
            cells,
            pos,
            len: counts,
            covered: vec![false; n_items],
            item_color: vec![0; n_items],
            purified: vec![false; n_data],
            // Upper bound on live entries: one swap per node, plus one
            // cover/assign record per item and one purify mark per node.
            trail: Vec::with_capacity(2 * n_data + n_items),
        }
    }

    /// Number of options still active for `item`.
    pub(crate) fn active_len(&self, item: ItemId) -> usize {
        self.len[item]
    }

    /// The option at position `k` of `item`'s active prefix.
    pub(crate) fn option_at(&self, item: ItemId, k: usize) -> OptionId {
        debug_assert!(k < self.len[item]);
        self.node_option[self.cells[self.cell_start[item] + k]]
    }

    /// Chooses the next primary item to branch on: the uncovered item with
    /// the fewest active options, ties broken by smallest index. Returns
    /// `None` once every primary item is covered, which signals a solution.
    ///
    /// An item with an empty prefix is returned immediately: the branch is
    /// infeasible either way, and no shorter list can exist.
    pub(crate) fn select_item(&self) -> Option<ItemId> {
        let mut best: Option<(usize, ItemId)> = None;
        for i in 0..self.n_primary {
            if self.covered[i] {
                continue;
            }
            let l = self.len[i];
            if l == 0 {
                return Some(i);
            }
            match best {
                Some((shortest, _)) if l >= shortest => {}
                _ => best = Some((l, i)),
            }
        }
        best.map(|(_, i)| i)
    }

    /// Current trail height, to be passed back to [`Matrix::undo_to`].
    pub(crate) fn mark(&self) -> usize {
        self.trail.len()
    }

    /// Attempts to commit `chosen` to the partial solution.
    ///
    /// Every primary item of the option is covered, every untinted secondary
    /// item consumed, and every colored occurrence either assigns its item's
    /// color (purifying the compatible occurrences that remain) or matches
    /// the color already committed. On a mismatch the attempt stops with
    /// [`ColorConflict`]; the caller must rewind to its mark, which also
    /// discards the partial work of the failed attempt.
    pub(crate) fn try_cover(&mut self, chosen: OptionId) -> Result<(), ColorConflict> {
        for node in self.opt_ptr[chosen]..self.opt_ptr[chosen + 1] {
            let item = self.node_item[node];
            let color = self.node_color[node];
            if item < self.n_primary {
                self.cover_item(item, chosen);
            } else if self.purified[node] {
                // Already accounted for when the item committed to its color.
            } else if color == 0 {
                // An untinted occurrence claims the secondary item outright.
                self.cover_item(item, chosen);
            } else {
                match self.item_color[item] {
                    0 => self.assign_color(item, color, chosen),
                    current if current == color => {}
                    _ => return Err(ColorConflict),
                }
            }
        }
        Ok(())
    }

    /// Rewinds the trail to `mark`, undoing each mutation in reverse order.
    /// Swaps are self-inverse and the trail is strictly LIFO, so the state
    /// afterwards is identical to when the mark was taken.
    pub(crate) fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            match self.trail.pop().unwrap() {
                TrailEntry::CellSwap { node, from } => {
                    let item = self.node_item[node];
                    let last = self.cell_start[item] + self.len[item];
                    debug_assert_eq!(self.pos[node], last);
                    self.len[item] += 1;
                    self.swap_cells(from, last);
                }
                TrailEntry::ItemCovered { item, prev_len } => {
                    self.len[item] = prev_len;
                    self.covered[item] = false;
                }
                TrailEntry::ColorAssigned { item, prev_len } => {
                    self.len[item] = prev_len;
                    self.item_color[item] = 0;
                }
                TrailEntry::Purified { node } => self.purified[node] = false,
            }
        }
    }

    /// Whether every reversible mutation has been undone.
    pub(crate) fn trail_is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    /// Swaps two cells and keeps the reverse index consistent.
    fn swap_cells(&mut self, a: usize, b: usize) {
        let (na, nb) = (self.cells[a], self.cells[b]);
        self.cells.swap(a, b);
        self.pos[na] = b;
        self.pos[nb] = a;
    }

    /// Removes `node` from its item's active prefix: swap with the last
    /// active cell, shrink the prefix, record the swap.
    fn hide_node(&mut self, node: NodeId) {
        let item = self.node_item[node];
        let from = self.pos[node];
        let last = self.cell_start[item] + self.len[item] - 1;
        debug_assert!(from <= last);
        self.trail.push(TrailEntry::CellSwap { node, from });
        self.swap_cells(from, last);
        self.len[item] -= 1;
    }

    /// Hides option `q` from every item it mentions except `skip`, whose
    /// cell list the caller is iterating. Occurrences that are already
    /// outside their item's active prefix (the item was covered or assigned
    /// earlier) are left where they are.
    fn hide_option(&mut self, q: OptionId, skip: ItemId) {
        for node in self.opt_ptr[q]..self.opt_ptr[q + 1] {
            let item = self.node_item[node];
            if item == skip {
                continue;
            }
            if self.pos[node] >= self.cell_start[item] + self.len[item] {
                continue;
            }
            self.hide_node(node);
        }
    }

    /// Consumes `item` on behalf of `chosen`: every other option in its
    /// active prefix is hidden from the rest of the matrix, then the item
    /// leaves the active set. Its own cell list is never reordered, so the
    /// caller's iteration over the prefix stays valid.
    fn cover_item(&mut self, item: ItemId, chosen: OptionId) {
        debug_assert!(!self.covered[item]);
        let prev_len = self.len[item];
        for k in 0..prev_len {
            let node = self.cells[self.cell_start[item] + k];
            let q = self.node_option[node];
            if q == chosen {
                continue;
            }
            self.hide_option(q, item);
        }
        self.trail.push(TrailEntry::ItemCovered { item, prev_len });
        self.len[item] = 0;
        self.covered[item] = true;
    }

    /// Commits secondary `item` to `color`. Active options that agree on the
    /// color are purified (their occurrence of `item` stops imposing
    /// constraints); options that disagree, including untinted ones, are
    /// hidden wholesale. The item then leaves the active set.
    fn assign_color(&mut self, item: ItemId, color: ColorId, chosen: OptionId) {
        debug_assert_eq!(self.item_color[item], 0);
        let prev_len = self.len[item];
        for k in 0..prev_len {
            let node = self.cells[self.cell_start[item] + k];
            let q = self.node_option[node];
            if q == chosen {
                continue;
            }
            if self.node_color[node] == color {
                self.trail.push(TrailEntry::Purified { node });
                self.purified[node] = true;
            } else {
                self.hide_option(q, item);
            }
        }
        self.trail.push(TrailEntry::ColorAssigned { item, prev_len });
        self.item_color[item] = color;
        self.len[item] = 0;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Wikipedia's standard exact cover instance: items 1..=7 mapped to
    /// indices 0..=6, options as in the article.
    fn wikipedia() -> Matrix {
        let options: &[&[ItemId]] = &[
            &[0, 3, 6],
            &[0, 3],
            &[3, 4, 6],
            &[2, 4, 5],
            &[1, 2, 5, 6],
            &[1, 6],
        ];
        let mut node_item = Vec::new();
        let mut opt_ptr = vec![0];
        for o in options {
            node_item.extend_from_slice(o);
            opt_ptr.push(node_item.len());
        }
        let node_color = vec![0; node_item.len()];
        Matrix::new(7, 7, &node_item, &node_color, &opt_ptr)
    }

    fn active_options(m: &Matrix, item: ItemId) -> Vec<OptionId> {
        (0..m.active_len(item)).map(|k| m.option_at(item, k)).collect()
    }

    #[test]
    fn cells_list_options_in_input_order() {
        let m = wikipedia();
        assert_eq!(active_options(&m, 0), vec![0, 1]);
        assert_eq!(active_options(&m, 3), vec![0, 1, 2]);
        assert_eq!(active_options(&m, 6), vec![0, 2, 4, 5]);
        assert_eq!(active_options(&m, 1), vec![4, 5]);
    }

    #[test]
    fn reverse_index_inverts_cells() {
        let m = wikipedia();
        for (at, &node) in m.cells.iter().enumerate() {
            assert_eq!(m.pos[node], at);
        }
    }

    #[test]
    fn select_item_prefers_shortest_then_smallest() {
        let m = wikipedia();
        // Five items are tied at two active options; item 0 wins the tie.
        assert_eq!(m.select_item(), Some(0));
    }

    #[test]
    fn cover_and_undo_restore_the_matrix_exactly() {
        let mut m = wikipedia();
        let before = m.clone();

        let mark = m.mark();
        m.try_cover(1).unwrap(); // option {1, 4}: covers items 0 and 3
        assert_eq!(m.active_len(0), 0);
        assert_eq!(m.active_len(3), 0);
        // Options 0 and 2 mention a covered item, so they are gone elsewhere.
        assert_eq!(active_options(&m, 6), vec![5, 4]);
        assert_eq!(active_options(&m, 4), vec![3]);

        m.undo_to(mark);
        assert_eq!(m, before);
        assert!(m.trail_is_empty());
    }

    #[test]
    fn covering_the_last_option_of_an_item_leaves_it_empty() {
        let mut m = wikipedia();
        m.try_cover(0).unwrap(); // option {1, 4, 7} hides everything touching 1, 4, 7
        // Item 2 (input item "2") only appeared in options 4 and 5, both hidden.
        assert_eq!(m.select_item(), Some(1));
        assert_eq!(m.active_len(1), 0);
    }

    /// Primaries p, q; secondary x. Option 0: p x:1. Option 1: q x:1.
    /// Option 2: q x:2.
    fn tinted() -> Matrix {
        let node_item = vec![0, 2, 1, 2, 1, 2];
        let node_color = vec![0, 1, 0, 1, 0, 2];
        let opt_ptr = vec![0, 2, 4, 6];
        Matrix::new(2, 3, &node_item, &node_color, &opt_ptr)
    }

    #[test]
    fn color_commitment_purifies_agreeing_options_and_hides_the_rest() {
        let mut m = tinted();
        m.try_cover(0).unwrap();
        assert_eq!(m.item_color[2], 1);
        assert_eq!(m.active_len(2), 0);
        // Option 1 agrees on x:1, so only its x occurrence was neutralized
        // (node 3) and the option itself stays available for item q.
        assert!(m.purified[3]);
        assert_eq!(active_options(&m, 1), vec![1]);
        // Option 2 disagreed and was hidden wholesale.

        // The purified occurrence no longer triggers anything when its
        // option is chosen in turn.
        m.try_cover(1).unwrap();
        assert_eq!(m.select_item(), None);
    }

    #[test]
    fn conflicting_color_is_reported_and_rolls_back_cleanly() {
        let mut m = tinted();
        let outer = m.mark();
        m.try_cover(0).unwrap();
        let before = m.clone();

        let mark = m.mark();
        // Option 2 wants x:2 against the committed x:1. The attempt covers
        // item q before it trips over the color, so there is partial work
        // for the rollback to discard.
        assert_eq!(m.try_cover(2), Err(ColorConflict));
        m.undo_to(mark);
        assert_eq!(m, before);

        m.undo_to(outer);
        assert_eq!(m, tinted());
        assert!(m.trail_is_empty());
    }
}
