//! Problem construction and normalization.
//!
//! User-facing options arrive as ordered sequences of item labels, with an
//! optional color per secondary occurrence. [`Problem`] interns those labels
//! into dense indices, validates every option as it is added, and hands the
//! flattened tables to the search engine. The convenience front-ends
//! [`covers`], [`covers_colored`] and [`covers_bool`] bundle the common
//! construction patterns into one call each.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{InputError, Result};
use crate::solver::engine::Search;
use crate::solver::matrix::{ColorId, Matrix};

/// Dense index of an item. Primary items occupy `0..primary_count()`,
/// secondary items follow.
pub type ItemId = usize;
/// Index of an option, in the order the options were added.
pub type OptionId = usize;

/// An exact cover with colors (XCC) problem under construction.
///
/// `I` is the item label type and `C` the color label type; both are opaque
/// and compared by equality. Uncolored problems can use `()` for `C`.
///
/// Items are declared up front with [`Problem::new`] and referenced by label
/// in [`Problem::add_option`]; every defect in an option is reported when the
/// option is added. [`Problem::solutions`] runs the remaining whole-problem
/// checks and starts a search.
pub struct Problem<I, C = String> {
    index: HashMap<I, ItemId>,
    labels: Vec<I>,
    n_primary: usize,
    /// Color interning tables, one per secondary item. Color ids start at 1;
    /// 0 is reserved for untinted occurrences.
    palettes: Vec<HashMap<C, ColorId>>,
    node_item: Vec<ItemId>,
    node_color: Vec<ColorId>,
    opt_ptr: Vec<usize>,
}

impl<I, C> Problem<I, C>
where
    I: Eq + Hash + Clone + Display,
    C: Eq + Hash + Clone,
{
    /// Creates a problem over the given primary and secondary items.
    ///
    /// Primary items must end up covered exactly once by a solution;
    /// secondary items at most once, or several times under one color.
    /// Labels must be pairwise distinct across both lists.
    pub fn new<P, S>(primary: P, secondary: S) -> Self
    where
        P: IntoIterator<Item = I>,
        S: IntoIterator<Item = I>,
    {
        let mut labels: Vec<I> = primary.into_iter().collect();
        let n_primary = labels.len();
        labels.extend(secondary);
        let mut index = HashMap::with_capacity(labels.len());
        for (ix, label) in labels.iter().enumerate() {
            let prev = index.insert(label.clone(), ix);
            debug_assert!(prev.is_none(), "item `{label}` declared twice");
        }
        let palettes = vec![HashMap::new(); labels.len() - n_primary];
        Self {
            index,
            labels,
            n_primary,
            palettes,
            node_item: Vec::new(),
            node_color: Vec::new(),
            opt_ptr: vec![0],
        }
    }

    /// Appends an option: an ordered sequence of `(item, color)` pairs.
    ///
    /// A color may only be attached to a secondary item. An option may not
    /// mention the same item twice, colors notwithstanding. On error the
    /// option is discarded in full and the problem is left as it was.
    pub fn add_option<T>(&mut self, items: T) -> Result<()>
    where
        T: IntoIterator<Item = (I, Option<C>)>,
    {
        let option = self.opt_ptr.len() - 1;
        let start = self.node_item.len();
        for (label, color) in items {
            let item = match self.index.get(&label) {
                Some(&item) => item,
                None => {
                    self.discard_partial_option(start);
                    return Err(InputError::UnknownItem {
                        option,
                        token: label.to_string(),
                    }
                    .into());
                }
            };
            if self.node_item[start..].contains(&item) {
                self.discard_partial_option(start);
                return Err(InputError::DuplicateItem {
                    option,
                    item: label.to_string(),
                }
                .into());
            }
            let color = match color {
                None => 0,
                Some(_) if item < self.n_primary => {
                    self.discard_partial_option(start);
                    return Err(InputError::ColorOnPrimary {
                        option,
                        item: label.to_string(),
                    }
                    .into());
                }
                Some(color) => self.intern_color(item, color),
            };
            self.node_item.push(item);
            self.node_color.push(color);
        }
        self.opt_ptr.push(self.node_item.len());
        Ok(())
    }

    /// Number of options added so far.
    pub fn option_count(&self) -> usize {
        self.opt_ptr.len() - 1
    }

    /// Number of primary items.
    pub fn primary_count(&self) -> usize {
        self.n_primary
    }

    /// Total number of items, primary and secondary.
    pub fn item_count(&self) -> usize {
        self.labels.len()
    }

    /// Starts enumerating the solutions of this problem.
    ///
    /// Checks that every primary item can be covered at all, then returns a
    /// lazy iterator over solutions; each solution is the list of chosen
    /// option indices in selection order. The iterator owns its search state,
    /// so several independent enumerations of one problem may coexist.
    ///
    /// Options are only ever selected while branching on a primary item, so
    /// an option that uses no primary item never appears in a solution.
    ///
    /// # Errors
    ///
    /// `EmptyPrimary` if some primary item appears in no option. A problem
    /// with no options at all is exempt: it simply has no solutions (or
    /// exactly the empty one, if it also has no primary items).
    pub fn solutions(&self) -> Result<Search> {
        if self.option_count() > 0 {
            let mut seen = vec![false; self.n_primary];
            for &item in &self.node_item {
                if item < self.n_primary {
                    seen[item] = true;
                }
            }
            if let Some(missing) = seen.iter().position(|&covered| !covered) {
                return Err(InputError::EmptyPrimary {
                    item: self.labels[missing].to_string(),
                }
                .into());
            }
        }
        Ok(Search::new(Matrix::new(
            self.n_primary,
            self.labels.len(),
            &self.node_item,
            &self.node_color,
            &self.opt_ptr,
        )))
    }

    fn discard_partial_option(&mut self, start: usize) {
        self.node_item.truncate(start);
        self.node_color.truncate(start);
    }

    fn intern_color(&mut self, item: ItemId, color: C) -> ColorId {
        let palette = &mut self.palettes[item - self.n_primary];
        let next = palette.len() + 1;
        *palette.entry(color).or_insert(next)
    }
}

/// Enumerates the exact covers of an uncolored problem given as token lists.
///
/// Either item list may be omitted: a missing list is inferred as the tokens
/// not claimed by the other list, in order of first appearance; with both
/// lists missing, every token is primary. Tokens are opaque; in particular
/// a `:` has no meaning here, unlike in [`covers_colored`].
///
/// Each yielded solution is a list of option indices into `options`.
pub fn covers<I>(
    options: &[Vec<I>],
    primary: Option<&[I]>,
    secondary: Option<&[I]>,
) -> Result<Search>
where
    I: Eq + Hash + Clone + Display,
{
    let (primary, secondary) = infer_items(options.iter().flatten(), primary, secondary);
    let mut problem: Problem<I, ()> = Problem::new(primary, secondary);
    for option in options {
        problem.add_option(option.iter().map(|token| (token.clone(), None)))?;
    }
    problem.solutions()
}

/// Enumerates the solutions of a colored (XCC) problem given as token lists.
///
/// A token is `identifier` or `identifier:color-label`, split at the first
/// colon. Item lists name bare identifiers and may be omitted as in
/// [`covers`]; inference works on the identifier part of each token.
pub fn covers_colored<S>(
    options: &[Vec<S>],
    primary: Option<&[S]>,
    secondary: Option<&[S]>,
) -> Result<Search>
where
    S: AsRef<str>,
{
    let parsed: Vec<Vec<(&str, Option<&str>)>> = options
        .iter()
        .map(|option| option.iter().map(|token| split_token(token.as_ref())).collect())
        .collect();
    let primary: Option<Vec<&str>> =
        primary.map(|items| items.iter().map(AsRef::as_ref).collect());
    let secondary: Option<Vec<&str>> =
        secondary.map(|items| items.iter().map(AsRef::as_ref).collect());
    let (primary, secondary) = infer_items(
        parsed.iter().flatten().map(|(ident, _)| ident),
        primary.as_deref(),
        secondary.as_deref(),
    );
    let mut problem: Problem<&str, &str> = Problem::new(primary, secondary);
    for option in &parsed {
        problem.add_option(option.iter().copied())?;
    }
    problem.solutions()
}

/// Enumerates the exact covers of a boolean incidence matrix.
///
/// Columns are the items (all primary, untinted), rows are the options; a
/// `true` entry means the row's option contains the column's item. Ragged
/// rows are padded with `false`. Solutions list row indices.
pub fn covers_bool(matrix: &[Vec<bool>]) -> Result<Search> {
    let width = matrix.iter().map(Vec::len).max().unwrap_or(0);
    let mut problem: Problem<usize, ()> = Problem::new(0..width, std::iter::empty());
    for row in matrix {
        problem.add_option(
            row.iter()
                .enumerate()
                .filter(|&(_, &present)| present)
                .map(|(column, _)| (column, None)),
        )?;
    }
    problem.solutions()
}

/// Completes the primary/secondary item lists from the tokens that actually
/// occur, preserving first-appearance order for whichever list is inferred.
fn infer_items<'t, I>(
    tokens: impl Iterator<Item = &'t I>,
    primary: Option<&[I]>,
    secondary: Option<&[I]>,
) -> (Vec<I>, Vec<I>)
where
    I: Eq + Hash + Clone + 't,
{
    match (primary, secondary) {
        (Some(primary), Some(secondary)) => (primary.to_vec(), secondary.to_vec()),
        (primary, secondary) => {
            let declared: HashSet<&I> = primary
                .unwrap_or_default()
                .iter()
                .chain(secondary.unwrap_or_default())
                .collect();
            let mut inferred = Vec::new();
            let mut seen = HashSet::new();
            for token in tokens {
                if !declared.contains(token) && seen.insert(token) {
                    inferred.push(token.clone());
                }
            }
            match (primary, secondary) {
                (Some(primary), None) => (primary.to_vec(), inferred),
                (None, Some(secondary)) => (inferred, secondary.to_vec()),
                (None, None) => (inferred, Vec::new()),
                (Some(_), Some(_)) => unreachable!(),
            }
        }
    }
}

/// Splits `identifier:color-label` at the first colon. A token without a
/// colon, or with nothing after it, is a bare identifier.
fn split_token(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((ident, label)) if !label.is_empty() => (ident, Some(label)),
        Some((ident, _)) => (ident, None),
        None => (token, None),
    }
}
