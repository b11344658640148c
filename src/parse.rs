//! The shift-reduce parse loop (spec.md §4.7).
//!
//! [`parse`] is the entry point for callers whose token type can report its
//! own symbol and consume itself into a semantic value (the [`Token`]
//! trait); [`parse_with`] is the lower-level entry point for tokens the
//! caller doesn't own, taking `token_symbol`/`token_value` as plain closures
//! instead.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::error::{Error, ParseError};
use crate::symbol::Sym;
use crate::table::{ParseTable, State};

/// A token that knows its own grammar symbol and can be converted into the
/// semantic value carried on the parse stack. Both methods are fallible: a
/// tokenizer that classifies or materializes lazily (e.g. parsing a numeric
/// literal's text only once it is actually shifted) needs to surface that
/// failure to the caller rather than panic mid-parse.
pub trait Token<S> {
    type Value;
    type Error;

    fn symbol(&self) -> Result<S, Self::Error>;
    fn into_value(self) -> Result<Self::Value, Self::Error>;
}

/// Parses `tokens` against `table`, calling `action(production, children)`
/// for every reduction, in the order spec.md §4.7 describes.
pub fn parse<S, T>(
    table: &ParseTable<S>,
    tokens: impl IntoIterator<Item = T>,
    action: impl FnMut(usize, Vec<T::Value>) -> T::Value,
) -> Result<T::Value, Error<T::Value, T::Error>>
where
    S: Clone + Eq + Hash + fmt::Debug,
    T: Token<S>,
{
    parse_with(table, tokens, action, T::symbol, T::into_value)
}

/// As [`parse`], but for a foreign token type: `token_symbol` and
/// `token_value` take the place of the [`Token`] trait. Both may fail; the
/// resulting `E` propagates out as [`Error::Token`] the instant it occurs,
/// before `lookahead` is ever reassigned (see [`Error`]'s doc comment).
pub fn parse_with<S, T, V, E>(
    table: &ParseTable<S>,
    tokens: impl IntoIterator<Item = T>,
    mut action: impl FnMut(usize, Vec<V>) -> V,
    token_symbol: impl Fn(&T) -> Result<S, E>,
    token_value: impl Fn(T) -> Result<V, E>,
) -> Result<V, Error<V, E>>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    let mut tokens = tokens.into_iter();
    let mut state_stack: Vec<State> = vec![table.start_state()];
    let mut result_stack: Vec<V> = Vec::new();
    let mut lookahead = advance(&mut tokens, &token_symbol).map_err(Error::Token)?;

    loop {
        let state = *state_stack.last().expect("state stack is never empty");

        if lookahead.symbol.is_eof() && table.accepts(state) {
            log::trace!("accept in state {state:?}");
            return Ok(result_stack.pop().expect("exactly one value remains on accept"));
        }

        if let Sym::User(symbol) = &lookahead.symbol {
            if let Some(&next) = table.shifts(state).get(symbol) {
                log::trace!("shift {symbol:?}, state {state:?} -> {next:?}");
                state_stack.push(next);
                let token = lookahead
                    .token
                    .take()
                    .expect("a user-symbol lookahead always carries its token");
                let value = token_value(token).map_err(Error::Token)?;
                result_stack.push(value);
                lookahead = advance(&mut tokens, &token_symbol).map_err(Error::Token)?;
                continue;
            }
        }

        if let Some(&production_index) = table.reductions(state).get(&lookahead.symbol) {
            let production = table.production(production_index);
            let arity = production.len();
            let split_at = result_stack.len() - arity;
            let children = result_stack.split_off(split_at);
            state_stack.truncate(state_stack.len() - arity);
            log::trace!("reduce {production}");

            let value = action(production_index, children);
            result_stack.push(value);

            let new_top = *state_stack.last().expect("state stack is never empty");
            let goto = *table
                .gotos(new_top)
                .get(&production.name)
                .expect("a goto on the reduced production's name exists after its own reduce");
            state_stack.push(goto);
            continue;
        }

        log::trace!("no action for {:?} in state {state:?}", lookahead.symbol);
        let parse_error =
            build_parse_error(table, &state_stack, lookahead, &token_value).map_err(Error::Token)?;
        return Err(Error::Parse(parse_error));
    }
}

/// The lookahead slot: the raw token (absent at end-of-input) plus the
/// symbol it was mapped to, so the parse loop never needs to re-derive a
/// symbol from an already-consumed token.
struct Lookahead<T, S> {
    token: Option<T>,
    symbol: Sym<S>,
}

fn advance<S, T, E>(
    tokens: &mut impl Iterator<Item = T>,
    token_symbol: &impl Fn(&T) -> Result<S, E>,
) -> Result<Lookahead<T, S>, E> {
    match tokens.next() {
        Some(token) => {
            let symbol = Sym::User(token_symbol(&token)?);
            Ok(Lookahead {
                token: Some(token),
                symbol,
            })
        }
        None => Ok(Lookahead {
            token: None,
            symbol: Sym::Eof,
        }),
    }
}

fn build_parse_error<S, T, V, E>(
    table: &ParseTable<S>,
    state_stack: &[State],
    lookahead: Lookahead<T, S>,
    token_value: &impl Fn(T) -> Result<V, E>,
) -> Result<ParseError<V>, E>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    let expected = expected_symbols(table, state_stack);
    let lookahead_display = match &lookahead.symbol {
        Sym::Eof => "EOF".to_string(),
        other => format!("{other:?}"),
    };
    let lookahead_token = lookahead.token.map(token_value).transpose()?;
    Ok(ParseError::new(lookahead_token, lookahead_display, expected))
}

/// spec.md §4.7's expected-symbol simulation: candidates are the terminals
/// with a shift or reduce action at the failing state; for each, replay
/// reductions on a scratch copy of the state stack as if that terminal were
/// the lookahead, then collect the cursor symbol of every *kernel* item in
/// the state that simulation lands on. Kernel items only, not kernel +
/// derived — a candidate's own closure-derived productions would otherwise
/// contribute cursor symbols that were never actually expected here.
fn expected_symbols<S>(table: &ParseTable<S>, state_stack: &[State]) -> BTreeSet<String>
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    let state = *state_stack.last().expect("state stack is never empty");

    let mut candidates: IndexSet<S> = IndexSet::new();
    candidates.extend(table.shifts(state).keys().cloned());
    candidates.extend(table.reductions(state).keys().filter_map(Sym::as_user).cloned());

    let mut expected: IndexSet<S> = IndexSet::new();
    for terminal in candidates {
        let mut stack = state_stack.to_vec();
        loop {
            let top = *stack.last().expect("simulated stack is never empty");
            let lookahead = Sym::User(terminal.clone());
            let Some(&production_index) = table.reductions(top).get(&lookahead) else {
                break;
            };
            let production = table.production(production_index);
            let new_len = stack.len() - production.len();
            stack.truncate(new_len);
            let new_top = *stack.last().expect("simulated stack is never empty");
            let goto = *table
                .gotos(new_top)
                .get(&production.name)
                .expect("a goto exists after a simulated reduce");
            stack.push(goto);
        }
        let resulting_state = *stack.last().expect("simulated stack is never empty");
        expected.extend(table.kernel_expected(resulting_state).iter().cloned());
    }

    expected.iter().map(|symbol| format!("{symbol:?}")).collect()
}
