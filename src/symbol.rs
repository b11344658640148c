//! Grammar symbols.
//!
//! Unlike the teacher crate's closed `char`-keyed `Symbol` enum, a symbol
//! here is any caller-supplied type. [`Sym`] wraps it with two reserved
//! sentinels — the augmented start symbol and the end-of-input marker —
//! that can never collide with a value the caller supplies, however that
//! value compares or hashes.

use std::fmt;

/// A grammar symbol: either one of the caller's own symbols, or one of the
/// two values this crate reserves for itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sym<S> {
    /// A symbol supplied by the caller. Whether it is a terminal or
    /// nonterminal is derived from the grammar, not encoded here.
    User(S),
    /// The augmented start symbol, `START`.
    Start,
    /// The end-of-input marker, `EOF`.
    Eof,
}

impl<S> Sym<S> {
    pub fn as_user(&self) -> Option<&S> {
        match self {
            Sym::User(s) => Some(s),
            Sym::Start | Sym::Eof => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Sym::Eof)
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Sym::Start)
    }
}

impl<S: fmt::Debug> fmt::Debug for Sym<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sym::User(s) => write!(f, "{s:?}"),
            Sym::Start => write!(f, "<START>"),
            Sym::Eof => write!(f, "<EOF>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_distinct_from_user_symbols() {
        let a: Sym<&str> = Sym::User("Start");
        assert_ne!(a, Sym::Start);
        assert_ne!(Sym::<&str>::Start, Sym::<&str>::Eof);
    }

    #[test]
    fn as_user_unwraps_only_user_variant() {
        assert_eq!(Sym::User(3).as_user(), Some(&3));
        assert_eq!(Sym::<i32>::Start.as_user(), None);
        assert_eq!(Sym::<i32>::Eof.as_user(), None);
    }
}
