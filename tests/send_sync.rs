//! `Grammar<S>` and `ParseTable<S>` hold no interior mutability, so both are
//! `Send + Sync` whenever `S` is — a compile-time property, checked here the
//! way a systems crate checks it (no runtime assertion needed; if this
//! doesn't compile, the property doesn't hold).

use lalr::{Grammar, ParseTable};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn grammar_and_parse_table_are_send_and_sync_over_a_send_sync_symbol() {
    assert_send_sync::<Grammar<&'static str>>();
    assert_send_sync::<ParseTable<&'static str>>();
}
