//! LR(1) items and item sets.
//!
//! Productions are referenced by index into [`crate::Grammar::productions`]
//! rather than stored by value — the teacher crate already keys its SLR(1)
//! tables by state index, and indexing here gets us cheap `Copy` item cores
//! without asking `S` for anything more than `Eq + Hash + Clone`.
//!
//! A grammar on its own has no production named `START`; table construction
//! (spec.md §4.1) augments it with one whose right-hand side is the caller's
//! chosen target symbol. [`ProdRef`] lets an item point at either a real
//! production or that synthetic one without requiring `START` to be a value
//! of `S`.

use std::hash::{Hash, Hasher};

use indexmap::IndexSet;

use crate::symbol::Sym;

/// A reference to a production: either a real one (by index into
/// [`crate::Grammar::productions`]) or the synthetic augmented start
/// production `START -> target` that table construction adds on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProdRef {
    Real(usize),
    Start,
}

/// The "core" of an item — its production and cursor position, ignoring
/// lookaheads. This is the `(matched, expected)` split spec.md §3 describes:
/// `cursor` symbols have been matched, the rest are expected.
pub type Core = (ProdRef, usize);

/// An LR(1) item: a production, a cursor position, and a lookahead set.
///
/// `PartialEq`/`Eq`/`Hash` are implemented by hand rather than derived:
/// `IndexSet<Sym<S>>`'s own `PartialEq` impl requires `Sym<S>: Hash + Eq`,
/// a bound `#[derive(PartialEq)]` has no way to add for us, and `IndexSet`
/// has no `Hash` impl at all (a set's equality is order-insensitive, and
/// there's no canonical order-insensitive hash for one here). `Hash` is
/// implemented over `(production, cursor)` only — coarser than `Eq`, which
/// also compares `lookaheads`, but a coarser `Hash` is always sound: it can
/// never put two equal items in different buckets, only some unequal ones
/// in the same one.
#[derive(Debug, Clone)]
pub struct Item<S> {
    pub production: ProdRef,
    pub cursor: usize,
    pub lookaheads: IndexSet<Sym<S>>,
}

impl<S: Eq + Hash> PartialEq for Item<S> {
    fn eq(&self, other: &Self) -> bool {
        self.production == other.production
            && self.cursor == other.cursor
            && self.lookaheads == other.lookaheads
    }
}

impl<S: Eq + Hash> Eq for Item<S> {}

impl<S> Hash for Item<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.production.hash(state);
        self.cursor.hash(state);
    }
}

impl<S> Item<S>
where
    S: Clone + Eq + Hash,
{
    pub fn new(production: ProdRef, cursor: usize, lookaheads: IndexSet<Sym<S>>) -> Self {
        Self {
            production,
            cursor,
            lookaheads,
        }
    }

    pub fn core(&self) -> Core {
        (self.production, self.cursor)
    }

    /// `true` once the cursor has passed every symbol in the production —
    /// i.e. this item is ready to reduce.
    pub fn is_complete(&self, production_len: usize) -> bool {
        self.cursor >= production_len
    }
}

/// A state's items, split into the kernel (carried over a transition) and
/// the closure-derived items (recomputed every time). Both are
/// insertion-ordered: the order items are discovered in drives the order
/// table construction later visits transition symbols, which in turn
/// determines state numbering (spec.md §4.5, determinism note).
#[derive(Debug, Clone, Default)]
pub struct ItemSet<S> {
    pub kernel: IndexSet<Item<S>>,
    pub derived: IndexSet<Item<S>>,
}

impl<S> ItemSet<S>
where
    S: Clone + Eq + Hash,
{
    pub fn new(kernel: IndexSet<Item<S>>, derived: IndexSet<Item<S>>) -> Self {
        Self { kernel, derived }
    }

    /// All items in the state: kernel then derived, in discovery order.
    pub fn items(&self) -> impl Iterator<Item = &Item<S>> {
        self.kernel.iter().chain(self.derived.iter())
    }

    /// The kernel-core fingerprint used as the LALR merge key: the set of
    /// `(production, cursor)` pairs in the kernel, lookaheads stripped.
    pub fn kernel_core(&self) -> std::collections::BTreeSet<Core> {
        self.kernel.iter().map(Item::core).collect()
    }
}
