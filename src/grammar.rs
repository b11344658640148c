//! Grammars: productions, the terminal/nonterminal partition, FIRST sets,
//! and optional operator precedence.
//!
//! The teacher crate's `Grammar` is a closed, `char`-symbol, LL(1)/SLR(1)
//! specific type built from a line-oriented textual format. This one is
//! generic over the symbol type and carries the precedence/associativity
//! data the LALR(1) conflict resolution in [`crate::table`] needs; grammar
//! text parsing is out of scope (spec.md §1).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::error::GrammarError;
use crate::queue::Queue;

/// A single rewrite rule `name -> symbols`.
///
/// `symbols` is always non-empty: the grammar this crate builds tables for
/// is epsilon-free (spec.md §1 Non-goals).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production<S> {
    pub name: S,
    pub symbols: Vec<S>,
}

impl<S> Production<S> {
    pub fn new(name: S, symbols: Vec<S>) -> Self {
        Self { name, symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<S: fmt::Debug> fmt::Display for Production<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ->", self.name)?;
        for symbol in &self.symbols {
            write!(f, " {symbol:?}")?;
        }
        Ok(())
    }
}

/// Associativity recorded for a precedence class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// An ordered group of terminals sharing a precedence level and
/// associativity. Classes later in the list passed to [`Grammar::new`] bind
/// tighter, matching `original_source/src/lalr/grammar.py`'s `Left`/`Right`.
#[derive(Debug, Clone)]
pub struct PrecedenceClass<S> {
    pub associativity: Associativity,
    pub terminals: Vec<S>,
}

impl<S> PrecedenceClass<S> {
    pub fn left(terminals: impl IntoIterator<Item = S>) -> Self {
        Self {
            associativity: Associativity::Left,
            terminals: terminals.into_iter().collect(),
        }
    }

    pub fn right(terminals: impl IntoIterator<Item = S>) -> Self {
        Self {
            associativity: Associativity::Right,
            terminals: terminals.into_iter().collect(),
        }
    }
}

/// An immutable context-free grammar: productions, the derived
/// terminal/nonterminal partition, FIRST sets, and optional precedence.
#[derive(Debug, Clone)]
pub struct Grammar<S> {
    productions: Vec<Production<S>>,
    productions_by_name: HashMap<S, Vec<usize>>,
    terminals: HashSet<S>,
    nonterminals: HashSet<S>,
    first_sets: HashMap<S, HashSet<S>>,
    precedence: HashMap<S, (usize, Associativity)>,
}

impl<S> Grammar<S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    /// Builds a grammar from its productions and an optional ordered list of
    /// precedence classes (earliest = lowest precedence).
    pub fn new(
        productions: Vec<Production<S>>,
        precedence_classes: Vec<PrecedenceClass<S>>,
    ) -> Result<Self, GrammarError> {
        for production in &productions {
            if production.is_empty() {
                return Err(GrammarError::EmptyProduction(format!("{:?}", production.name)));
            }
        }

        let nonterminals: HashSet<S> = productions.iter().map(|p| p.name.clone()).collect();

        let mut all_symbols: HashSet<S> = nonterminals.clone();
        for production in &productions {
            all_symbols.extend(production.symbols.iter().cloned());
        }
        let terminals: HashSet<S> = all_symbols
            .iter()
            .filter(|s| !nonterminals.contains(*s))
            .cloned()
            .collect();

        let mut productions_by_name: HashMap<S, Vec<usize>> = HashMap::new();
        for (index, production) in productions.iter().enumerate() {
            productions_by_name
                .entry(production.name.clone())
                .or_default()
                .push(index);
        }

        let first_sets = Self::compute_first_sets(&productions, &terminals, &nonterminals);

        let precedence = Self::build_precedence(precedence_classes, &nonterminals)?;

        Ok(Self {
            productions,
            productions_by_name,
            terminals,
            nonterminals,
            first_sets,
            precedence,
        })
    }

    /// FIRST-set computation (spec.md §4.2): seed terminals with themselves,
    /// record the inverse "which nonterminals start with this symbol" map,
    /// then breadth-first from each terminal over that inverse map.
    fn compute_first_sets(
        productions: &[Production<S>],
        terminals: &HashSet<S>,
        nonterminals: &HashSet<S>,
    ) -> HashMap<S, HashSet<S>> {
        let mut has_first_symbol: HashMap<S, HashSet<S>> = HashMap::new();
        for production in productions {
            has_first_symbol
                .entry(production.symbols[0].clone())
                .or_default()
                .insert(production.name.clone());
        }

        let mut first_sets: HashMap<S, HashSet<S>> = HashMap::new();
        for nonterminal in nonterminals {
            first_sets.insert(nonterminal.clone(), HashSet::new());
        }

        for terminal in terminals {
            first_sets.insert(terminal.clone(), HashSet::from([terminal.clone()]));

            let Some(starters) = has_first_symbol.get(terminal) else {
                continue;
            };

            let mut queue = Queue::from_iter(starters.iter().cloned());
            while let Some(nonterminal) = queue.pop() {
                first_sets
                    .entry(nonterminal.clone())
                    .or_default()
                    .insert(terminal.clone());

                if let Some(next) = has_first_symbol.get(&nonterminal) {
                    queue.update(next.iter().cloned());
                }
            }
        }

        first_sets
    }

    fn build_precedence(
        precedence_classes: Vec<PrecedenceClass<S>>,
        nonterminals: &HashSet<S>,
    ) -> Result<HashMap<S, (usize, Associativity)>, GrammarError> {
        let mut precedence = HashMap::new();
        for (level, class) in precedence_classes.into_iter().enumerate() {
            for terminal in class.terminals {
                if nonterminals.contains(&terminal) {
                    return Err(GrammarError::PrecedenceOnNonterminal(format!(
                        "{terminal:?}"
                    )));
                }
                if precedence
                    .insert(terminal.clone(), (level, class.associativity))
                    .is_some()
                {
                    return Err(GrammarError::DuplicatePrecedence(format!("{terminal:?}")));
                }
            }
        }
        Ok(precedence)
    }

    pub fn productions(&self) -> &[Production<S>] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> &Production<S> {
        &self.productions[index]
    }

    /// Indices of the productions whose name is `nonterminal`, in
    /// declaration order.
    pub fn productions_for(&self, nonterminal: &S) -> &[usize] {
        self.productions_by_name
            .get(nonterminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn terminals(&self) -> &HashSet<S> {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &HashSet<S> {
        &self.nonterminals
    }

    pub fn is_terminal(&self, symbol: &S) -> bool {
        self.terminals.contains(symbol)
    }

    pub fn is_nonterminal(&self, symbol: &S) -> bool {
        self.nonterminals.contains(symbol)
    }

    /// FIRST(symbol): for a terminal this is always `{symbol}`.
    pub fn first_set(&self, symbol: &S) -> &HashSet<S> {
        self.first_sets
            .get(symbol)
            .unwrap_or_else(|| panic!("no FIRST set recorded for symbol {symbol:?}"))
    }

    /// FIRST of a non-empty symbol sequence. Since the grammar is
    /// epsilon-free, `FIRST(alpha) == FIRST(alpha[0])` (spec.md §4.2).
    pub fn first_of_sequence(&self, symbols: &[S]) -> HashSet<S> {
        match symbols.first() {
            Some(first) => self.first_set(first).clone(),
            None => HashSet::new(),
        }
    }

    pub fn associativity(&self, terminal: &S) -> Option<Associativity> {
        self.precedence.get(terminal).map(|(_, assoc)| *assoc)
    }

    pub fn precedence_level(&self, terminal: &S) -> Option<usize> {
        self.precedence.get(terminal).map(|(level, _)| *level)
    }

    /// The precedence of a production is that of the rightmost terminal in
    /// its right-hand side that has a precedence assignment (spec.md §4.6).
    pub fn production_precedence(&self, production: &Production<S>) -> Option<(usize, Associativity)> {
        production
            .symbols
            .iter()
            .rev()
            .find_map(|symbol| self.precedence.get(symbol).copied())
    }
}
