//! Closure (spec.md §4.3) and goto (spec.md §4.4).
//!
//! The closure algorithm is ported from
//! `original_source/lalr/analysis.py::_build_derived_items`. Adding every
//! derived item with its final lookahead set in one pass, without visiting
//! any item twice, needs more bookkeeping than "expand until nothing
//! changes": a naive fixed point would revisit every derived production's
//! lookahead set on every new fact, which is quadratic in grammar size for
//! deeply recursive grammars.
//!
//! Instead this keeps one `follow_sets: HashMap<S, HashSet<Sym<S>>>` — the
//! lookahead set under construction for each nonterminal reachable from the
//! kernel — and an `immediate_dependants` edge set recording "if X's follow
//! set grows, Y's must grow too" whenever that fact is discovered only
//! implicitly (a nonterminal at the end of a production's right-hand side
//! inherits the left-hand side's own follow set, which may still be
//! growing). Each time a follow set gains new lookaheads, every symbol
//! transitively reachable through that edge set is updated in the same
//! step, by walking the edges with a small nested queue.

use std::collections::HashMap;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::augmented::AugmentedGrammar;
use crate::item::{Item, ItemSet, ProdRef};
use crate::queue::Queue;
use crate::symbol::Sym;

/// The closure of `kernel`: `kernel` itself, plus every item reachable by
/// repeatedly expanding a nonterminal immediately after the cursor into its
/// own productions at cursor 0.
pub fn closure<S>(grammar: &AugmentedGrammar<'_, S>, kernel: IndexSet<Item<S>>) -> ItemSet<S>
where
    S: Clone + Eq + Hash,
{
    let derived = build_derived_items(grammar, &kernel);
    ItemSet::new(kernel, derived)
}

/// The item set reached from `item_set` by shifting over `symbol`: every
/// item expecting `symbol` next, with its cursor advanced, closed over.
pub fn goto<S>(grammar: &AugmentedGrammar<'_, S>, item_set: &ItemSet<S>, symbol: &S) -> ItemSet<S>
where
    S: Clone + Eq + Hash,
{
    let mut moved = IndexSet::new();
    for item in item_set.items() {
        if item.cursor >= grammar.len(item.production) {
            continue;
        }
        if grammar.symbol_at(item.production, item.cursor) == *symbol {
            moved.insert(Item::new(
                item.production,
                item.cursor + 1,
                item.lookaheads.clone(),
            ));
        }
    }
    closure(grammar, moved)
}

fn build_derived_items<S>(
    grammar: &AugmentedGrammar<'_, S>,
    kernel: &IndexSet<Item<S>>,
) -> IndexSet<Item<S>>
where
    S: Clone + Eq + Hash,
{
    let g = grammar.grammar;
    let mut follow_sets: HashMap<S, IndexSet<Sym<S>>> = HashMap::new();
    let mut symbol_queue: Queue<S> = Queue::new();

    for item in kernel {
        let len = grammar.len(item.production);
        if item.cursor >= len {
            continue;
        }
        let symbol = grammar.symbol_at(item.production, item.cursor);
        if g.is_terminal(&symbol) {
            continue;
        }
        let entry = follow_sets.entry(symbol.clone()).or_default();
        if len - item.cursor > 1 {
            let rest_first = grammar.symbol_at(item.production, item.cursor + 1);
            entry.extend(g.first_set(&rest_first).iter().cloned().map(Sym::User));
        } else {
            entry.extend(item.lookaheads.iter().cloned());
        }
        symbol_queue.add(symbol);
    }

    let mut production_indices: IndexSet<usize> = IndexSet::new();
    let mut immediate_dependants: HashMap<S, IndexSet<S>> = HashMap::new();

    while let Some(symbol) = symbol_queue.pop() {
        for &production_index in g.productions_for(&symbol) {
            production_indices.insert(production_index);
            let production = g.production(production_index);
            let first = production.symbols[0].clone();
            if g.is_terminal(&first) {
                continue;
            }
            symbol_queue.add(first.clone());

            let new_items: IndexSet<Sym<S>> = if production.len() > 1 {
                g.first_set(&production.symbols[1])
                    .iter()
                    .cloned()
                    .map(Sym::User)
                    .collect()
            } else {
                let existing = follow_sets.get(&production.name).cloned().unwrap_or_default();
                immediate_dependants
                    .entry(production.name.clone())
                    .or_default()
                    .insert(first.clone());
                existing
            };

            follow_sets
                .entry(first.clone())
                .or_default()
                .extend(new_items.iter().cloned());

            let mut dependants: IndexSet<S> = IndexSet::new();
            let mut dependants_queue = Queue::from_iter([first.clone()]);
            while let Some(dependant) = dependants_queue.pop() {
                if let Some(edges) = immediate_dependants.get(&dependant) {
                    dependants_queue.update(edges.iter().cloned());
                    dependants.extend(edges.iter().cloned());
                }
            }

            for dependant in dependants {
                follow_sets
                    .entry(dependant)
                    .or_default()
                    .extend(new_items.iter().cloned());
            }
        }
    }

    production_indices
        .into_iter()
        .map(|index| {
            let production = g.production(index);
            let lookaheads = follow_sets.get(&production.name).cloned().unwrap_or_default();
            Item::new(ProdRef::Real(index), 0, lookaheads)
        })
        .collect()
}
