//! The augmented grammar table construction actually builds tables over.
//!
//! spec.md §4.1: given a target nonterminal, table construction works over
//! `grammar` plus one synthetic production `START -> target`. `START` is a
//! sentinel ([`Sym::Start`]), not a value of `S`, so it cannot collide with
//! anything the caller's grammar declares; [`AugmentedGrammar`] is the thin
//! accessor that lets [`crate::closure`] and [`crate::table`] read either a
//! real production or the synthetic one through one interface.

use std::fmt;
use std::hash::Hash;

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::item::ProdRef;
use crate::symbol::Sym;

pub struct AugmentedGrammar<'g, S> {
    pub grammar: &'g Grammar<S>,
    pub target: S,
}

impl<'g, S> AugmentedGrammar<'g, S>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    pub fn new(grammar: &'g Grammar<S>, target: S) -> Result<Self, GrammarError> {
        if !grammar.is_nonterminal(&target) {
            return Err(GrammarError::UnknownTarget(format!("{target:?}")));
        }
        Ok(Self { grammar, target })
    }

    /// Number of symbols on the right-hand side of `production`.
    pub fn len(&self, production: ProdRef) -> usize {
        match production {
            ProdRef::Start => 1,
            ProdRef::Real(index) => self.grammar.production(index).len(),
        }
    }

    /// The left-hand side of `production`, as a [`Sym`] since `START` is not
    /// a value of `S`.
    pub fn name(&self, production: ProdRef) -> Sym<S> {
        match production {
            ProdRef::Start => Sym::Start,
            ProdRef::Real(index) => Sym::User(self.grammar.production(index).name.clone()),
        }
    }

    /// The symbol at `index` on the right-hand side of `production`.
    pub fn symbol_at(&self, production: ProdRef, index: usize) -> S {
        match production {
            ProdRef::Start => {
                debug_assert_eq!(index, 0, "the augmented start production has one symbol");
                self.target.clone()
            }
            ProdRef::Real(real) => self.grammar.production(real).symbols[index].clone(),
        }
    }
}
