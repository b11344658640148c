//! Error types.
//!
//! Mirrors the taxonomy in the specification: grammar/table construction
//! failures are [`CompilationError`] (itself wrapping a [`GrammarError`] or a
//! [`ConflictError`]), parse-time failures are [`ParseError`]. As in the
//! teacher crate's `error.rs`, static messages are derived with
//! [`thiserror::Error`]; [`ParseError`]'s message is data-dependent (the
//! sorted list of expected symbols) and is built by hand instead, since that
//! isn't something a `#[error("...")]` template can express.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// Errors raised while constructing a [`crate::Grammar`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("production for {0:?} has an empty right-hand side")]
    EmptyProduction(String),

    #[error("terminal {0:?} appears in more than one precedence class")]
    DuplicatePrecedence(String),

    #[error("precedence class names {0:?}, which is a nonterminal")]
    PrecedenceOnNonterminal(String),

    #[error("target symbol {0:?} is not the name of any production")]
    UnknownTarget(String),
}

/// A shift/shift, shift/reduce, or reduce/reduce conflict detected while
/// building a [`crate::ParseTable`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConflictError {
    #[error(
        "shift/reduce conflict in state {state} on {terminal}: \
         shift to state {shift_state} or reduce {production}"
    )]
    ShiftReduce {
        state: usize,
        terminal: String,
        shift_state: usize,
        production: String,
    },

    #[error(
        "reduce/reduce conflict in state {state} on {terminal}: \
         reduce {production_a} or reduce {production_b}"
    )]
    ReduceReduce {
        state: usize,
        terminal: String,
        production_a: String,
        production_b: String,
    },
}

/// Any failure while compiling a grammar into a parse table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompilationError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),
}

pub type Result<T> = std::result::Result<T, CompilationError>;

/// Raised by the parse loop when no shift, reduce, or accept action applies.
///
/// `lookahead_token` is `None` when the failure happened at end-of-input.
/// `expected_symbols` is the sorted set of symbols (rendered via `Debug`)
/// that would have been legal in their place; it is empty exactly when the
/// only legal continuation was end-of-input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError<V> {
    pub lookahead_token: Option<V>,
    pub expected_symbols: BTreeSet<String>,
    pub(crate) lookahead_display: String,
}

impl<V> ParseError<V> {
    pub(crate) fn new(
        lookahead_token: Option<V>,
        lookahead_display: String,
        expected_symbols: BTreeSet<String>,
    ) -> Self {
        Self {
            lookahead_token,
            expected_symbols,
            lookahead_display,
        }
    }
}

impl<V> fmt::Display for ParseError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.expected_symbols.is_empty() {
            write!(f, "expected EOF instead of {}", self.lookahead_display)
        } else {
            let joined = self
                .expected_symbols
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(" or ");
            write!(f, "expected {joined} before {}", self.lookahead_display)
        }
    }
}

impl<V: fmt::Debug> std::error::Error for ParseError<V> {}

/// The error [`crate::parse`]/[`crate::parse_with`] actually return: either a
/// table-driven [`ParseError`], or a failure from the caller's own
/// `token_symbol`/`token_value` conversion (the [`crate::Token`] trait's
/// methods take this place when using [`crate::parse`]).
///
/// A token-conversion failure propagates here the moment it happens, before
/// the parse loop's lookahead slot is ever assigned its result — Rust only
/// assigns a `let`/`=` target after the right-hand side finishes evaluating,
/// so an `Err` from `token_symbol`/`token_value` leaves whatever lookahead
/// was already in place untouched, ready for the caller to retry against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error<V, E> {
    Parse(ParseError<V>),
    Token(E),
}

impl<V: fmt::Debug, E: fmt::Display> fmt::Display for Error<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "{err}"),
            Error::Token(err) => write!(f, "token conversion failed: {err}"),
        }
    }
}

impl<V: fmt::Debug, E: fmt::Debug + fmt::Display> std::error::Error for Error<V, E> {}
