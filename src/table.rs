//! Canonical LALR(1) table construction (spec.md §4.5) and action tables
//! (spec.md §4.6).
//!
//! State discovery mirrors `original_source/lalr/analysis.py`'s
//! `_build_transition_table`: successor kernels are looked up by their
//! kernel-core fingerprint, merged into an existing state when one matches
//! (unioning lookaheads, then recomputing that state's closure), or started
//! fresh otherwise. The Python drives this with a queue of kernel *values*,
//! which re-processes a state whenever merging produces a kernel it hasn't
//! queued before — here the worklist holds state indices instead and a
//! state is re-pushed only when a merge actually grows its lookaheads,
//! which is the same fixed point reached by a more direct route.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use crate::augmented::AugmentedGrammar;
use crate::closure::{closure, goto};
use crate::error::{CompilationError, ConflictError};
use crate::grammar::{Associativity, Grammar, Production};
use crate::item::{Core, Item, ItemSet, ProdRef};
use crate::symbol::Sym;

/// An opaque handle to a state in a [`ParseTable`]. Never constructed
/// outside this module; comparisons and hashing are by the underlying
/// index, but callers have no way to observe or choose that index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(usize);

impl State {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A compiled LALR(1) parse table: SHIFT, GOTO, REDUCE, and ACCEPT per
/// state, plus the productions a reduce action refers to. Immutable once
/// built; `ParseTable::new` is the only constructor.
#[derive(Debug, Clone)]
pub struct ParseTable<S> {
    productions: Vec<Production<S>>,
    shifts: Vec<IndexMap<S, State>>,
    gotos: Vec<IndexMap<S, State>>,
    reductions: Vec<IndexMap<Sym<S>, usize>>,
    accepts: Vec<bool>,
    /// Symbols expected at the cursor of *kernel* items only, per state —
    /// narrower than `domain(shifts) ∪ domain(gotos)`, which also reflects
    /// closure-derived items. Used only by [`crate::parse`]'s expected-symbol
    /// computation (spec.md §4.7), which is specified in terms of kernel
    /// items specifically.
    kernel_expects: Vec<IndexSet<S>>,
}

impl<S> ParseTable<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// Builds a parse table for recognizing `target` over `grammar`.
    pub fn new(grammar: &Grammar<S>, target: S) -> Result<Self, CompilationError> {
        let aug = AugmentedGrammar::new(grammar, target)?;
        let (states, transitions) = build_transition_table(&aug);
        log::debug!("LALR(1) construction settled on {} states", states.len());

        let (mut shifts, gotos) = split_shifts_and_gotos(grammar, &transitions);
        let mut reductions = build_reductions(grammar, &states)?;
        let accepts = build_accepts(&states);

        resolve_shift_reduce_conflicts(grammar, &mut shifts, &mut reductions)?;

        let kernel_expects = states
            .iter()
            .map(|item_set| {
                let mut expected = IndexSet::new();
                for item in &item_set.kernel {
                    if item.cursor < aug.len(item.production) {
                        expected.insert(aug.symbol_at(item.production, item.cursor));
                    }
                }
                expected
            })
            .collect();

        Ok(Self {
            productions: grammar.productions().to_vec(),
            shifts,
            gotos,
            reductions,
            accepts,
            kernel_expects,
        })
    }

    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        (0..self.accepts.len()).map(State)
    }

    pub fn start_state(&self) -> State {
        State(0)
    }

    pub fn shifts(&self, state: State) -> &IndexMap<S, State> {
        &self.shifts[state.0]
    }

    pub fn gotos(&self, state: State) -> &IndexMap<S, State> {
        &self.gotos[state.0]
    }

    /// Maps a lookahead (a real terminal, or [`Sym::Eof`]) to the index of
    /// the production to reduce.
    pub fn reductions(&self, state: State) -> &IndexMap<Sym<S>, usize> {
        &self.reductions[state.0]
    }

    pub fn accepts(&self, state: State) -> bool {
        self.accepts[state.0]
    }

    pub fn production(&self, index: usize) -> &Production<S> {
        &self.productions[index]
    }

    pub(crate) fn kernel_expected(&self, state: State) -> &IndexSet<S> {
        &self.kernel_expects[state.0]
    }
}

fn build_transition_table<S>(
    aug: &AugmentedGrammar<'_, S>,
) -> (Vec<ItemSet<S>>, Vec<IndexMap<S, usize>>)
where
    S: Clone + Eq + Hash,
{
    let start_kernel = IndexSet::from([Item::new(
        ProdRef::Start,
        0,
        IndexSet::from([Sym::Eof]),
    )]);
    let start_set = closure(aug, start_kernel);

    let mut states: Vec<ItemSet<S>> = vec![start_set];
    let mut transitions: Vec<IndexMap<S, usize>> = vec![IndexMap::new()];
    let mut core_index: HashMap<BTreeSet<Core>, usize> = HashMap::new();
    core_index.insert(states[0].kernel_core(), 0);

    let mut queued: Vec<bool> = vec![true];
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);

    while let Some(state_idx) = worklist.pop_front() {
        queued[state_idx] = false;
        let item_set = states[state_idx].clone();

        // Transition symbols in first-appearance order, so that successor
        // state numbering is reproducible (spec.md §4.5 determinism note).
        let mut symbols: IndexSet<S> = IndexSet::new();
        for item in item_set.items() {
            if item.cursor < aug.len(item.production) {
                symbols.insert(aug.symbol_at(item.production, item.cursor));
            }
        }

        let mut state_transitions: IndexMap<S, usize> = IndexMap::new();

        for symbol in &symbols {
            let successor = goto(aug, &item_set, symbol);
            if successor.kernel.is_empty() {
                continue;
            }
            let core = successor.kernel_core();

            let target_idx = match core_index.get(&core) {
                Some(&existing_idx) => {
                    let (merged, grew) =
                        merge_kernels(&states[existing_idx].kernel, &successor.kernel);
                    if grew {
                        log::debug!(
                            "merging lookaheads into state {existing_idx} on {symbol:?}"
                        );
                        states[existing_idx] = closure(aug, merged);
                        if !queued[existing_idx] {
                            queued[existing_idx] = true;
                            worklist.push_back(existing_idx);
                        }
                    }
                    existing_idx
                }
                None => {
                    let new_idx = states.len();
                    core_index.insert(core, new_idx);
                    states.push(successor);
                    transitions.push(IndexMap::new());
                    queued.push(true);
                    worklist.push_back(new_idx);
                    new_idx
                }
            };
            state_transitions.insert(symbol.clone(), target_idx);
        }

        transitions[state_idx] = state_transitions;
    }

    (states, transitions)
}

/// Unions the lookaheads of two kernels sharing the same core, returning
/// whether the union actually added anything new.
fn merge_kernels<S>(
    existing: &IndexSet<Item<S>>,
    incoming: &IndexSet<Item<S>>,
) -> (IndexSet<Item<S>>, bool)
where
    S: Clone + Eq + Hash,
{
    let mut grew = false;
    let mut merged = IndexSet::new();
    for item in existing {
        let mut lookaheads = item.lookaheads.clone();
        if let Some(partner) = incoming.iter().find(|other| other.core() == item.core()) {
            for lookahead in &partner.lookaheads {
                if lookaheads.insert(lookahead.clone()) {
                    grew = true;
                }
            }
        }
        merged.insert(Item::new(item.production, item.cursor, lookaheads));
    }
    (merged, grew)
}

fn split_shifts_and_gotos<S>(
    grammar: &Grammar<S>,
    transitions: &[IndexMap<S, usize>],
) -> (Vec<IndexMap<S, State>>, Vec<IndexMap<S, State>>)
where
    S: Clone + Eq + Hash,
{
    let mut shifts = Vec::with_capacity(transitions.len());
    let mut gotos = Vec::with_capacity(transitions.len());
    for state_transitions in transitions {
        let mut shift = IndexMap::new();
        let mut goto_map = IndexMap::new();
        for (symbol, &target) in state_transitions {
            if grammar.is_terminal(symbol) {
                shift.insert(symbol.clone(), State(target));
            } else {
                goto_map.insert(symbol.clone(), State(target));
            }
        }
        shifts.push(shift);
        gotos.push(goto_map);
    }
    (shifts, gotos)
}

fn build_reductions<S>(
    grammar: &Grammar<S>,
    states: &[ItemSet<S>],
) -> Result<Vec<IndexMap<Sym<S>, usize>>, ConflictError>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    let mut reductions = Vec::with_capacity(states.len());
    for (state_idx, item_set) in states.iter().enumerate() {
        let mut state_reductions: IndexMap<Sym<S>, usize> = IndexMap::new();
        for item in item_set.items() {
            let ProdRef::Real(production_index) = item.production else {
                continue;
            };
            let production = grammar.production(production_index);
            if !item.is_complete(production.len()) {
                continue;
            }
            for lookahead in &item.lookaheads {
                if let Some(&existing_index) = state_reductions.get(lookahead) {
                    if existing_index != production_index {
                        return Err(ConflictError::ReduceReduce {
                            state: state_idx,
                            terminal: format!("{lookahead:?}"),
                            production_a: grammar.production(existing_index).to_string(),
                            production_b: production.to_string(),
                        });
                    }
                } else {
                    state_reductions.insert(lookahead.clone(), production_index);
                }
            }
        }
        reductions.push(state_reductions);
    }
    Ok(reductions)
}

fn build_accepts<S>(states: &[ItemSet<S>]) -> Vec<bool>
where
    S: Clone + Eq + Hash,
{
    states
        .iter()
        .map(|item_set| {
            item_set
                .items()
                .any(|item| matches!(item.production, ProdRef::Start) && item.cursor == 1)
        })
        .collect()
}

/// Resolves shift/reduce conflicts by precedence where possible (spec.md
/// §4.6), removing whichever action loses; fails with
/// [`ConflictError::ShiftReduce`] where no precedence assignment covers the
/// conflict.
fn resolve_shift_reduce_conflicts<S>(
    grammar: &Grammar<S>,
    shifts: &mut [IndexMap<S, State>],
    reductions: &mut [IndexMap<Sym<S>, usize>],
) -> Result<(), ConflictError>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    for state_idx in 0..shifts.len() {
        let conflicting: Vec<S> = shifts[state_idx]
            .keys()
            .filter(|terminal| reductions[state_idx].contains_key(&Sym::User((*terminal).clone())))
            .cloned()
            .collect();

        for terminal in conflicting {
            let lookahead = Sym::User(terminal.clone());
            let production_index = reductions[state_idx][&lookahead];
            let production = grammar.production(production_index);

            let shift_precedence = grammar
                .precedence_level(&terminal)
                .map(|level| (level, grammar.associativity(&terminal).expect("level implies associativity")));
            let reduce_precedence = grammar.production_precedence(production);

            match (shift_precedence, reduce_precedence) {
                (Some((shift_level, _)), Some((prod_level, assoc))) => {
                    if prod_level > shift_level {
                        shifts[state_idx].shift_remove(&terminal);
                    } else if prod_level < shift_level {
                        reductions[state_idx].shift_remove(&lookahead);
                    } else {
                        match assoc {
                            Associativity::Left => {
                                shifts[state_idx].shift_remove(&terminal);
                            }
                            Associativity::Right => {
                                reductions[state_idx].shift_remove(&lookahead);
                            }
                        }
                    }
                }
                _ => {
                    let shift_state = shifts[state_idx][&terminal].0;
                    return Err(ConflictError::ShiftReduce {
                        state: state_idx,
                        terminal: format!("{terminal:?}"),
                        shift_state,
                        production: production.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
