//! The lisp-list grammar from spec.md §8 scenarios 3-5:
//!
//!   expression -> string | number | symbol | list
//!   list       -> lparen rparen | lparen list_body rparen
//!   list_body  -> expression | list_body expression
//!
//! target = expression.

use lalr::{parse_with, Error, Grammar, ParseTable, Production};

fn lisp_list_grammar() -> Grammar<&'static str> {
    Grammar::new(
        vec![
            Production::new("expression", vec!["string"]),
            Production::new("expression", vec!["number"]),
            Production::new("expression", vec!["symbol"]),
            Production::new("expression", vec!["list"]),
            Production::new("list", vec!["lparen", "rparen"]),
            Production::new("list", vec!["lparen", "list_body", "rparen"]),
            Production::new("list_body", vec!["expression"]),
            Production::new("list_body", vec!["list_body", "expression"]),
        ],
        vec![],
    )
    .unwrap()
}

#[test]
fn scenario_3_reduces_a_two_element_list_left_to_right() {
    let g = lisp_list_grammar();
    let table = ParseTable::new(&g, "expression").unwrap();
    let tokens: Vec<&str> = vec!["lparen", "string", "string", "rparen"];
    let mut names: Vec<&str> = Vec::new();

    let result = parse_with(
        &table,
        tokens,
        |production_index, _children: Vec<&str>| {
            let name = table.production(production_index).name;
            names.push(name);
            name
        },
        |t: &&str| Ok::<_, String>(*t),
        |t: &str| Ok::<_, String>(t),
    )
    .unwrap();

    assert_eq!(
        names,
        vec!["expression", "list_body", "expression", "list_body", "list", "expression"]
    );
    assert_eq!(result, "expression");
}

#[test]
fn scenario_4_reports_expression_or_rparen_expected_at_eof() {
    let g = lisp_list_grammar();
    let table = ParseTable::new(&g, "expression").unwrap();
    let tokens: Vec<&str> = vec!["lparen", "string"];

    let err = parse_with(
        &table,
        tokens,
        |production_index, _children: Vec<&str>| table.production(production_index).name,
        |t: &&str| Ok::<_, String>(*t),
        |t: &str| Ok::<_, String>(t),
    )
    .unwrap_err();

    let Error::Parse(err) = err else {
        panic!("expected a ParseError, not a token-conversion failure");
    };
    assert_eq!(err.lookahead_token, None);
    assert_eq!(
        err.expected_symbols,
        std::collections::BTreeSet::from(["\"expression\"".to_string(), "\"rparen\"".to_string()])
    );
    assert_eq!(err.to_string(), "expected \"expression\" or \"rparen\" before EOF");
}

#[test]
fn scenario_5_reports_expected_eof_on_trailing_rparen() {
    let g = lisp_list_grammar();
    let table = ParseTable::new(&g, "expression").unwrap();
    let tokens: Vec<&str> = vec!["lparen", "rparen", "rparen"];

    let err = parse_with(
        &table,
        tokens,
        |production_index, _children: Vec<&str>| table.production(production_index).name,
        |t: &&str| Ok::<_, String>(*t),
        |t: &str| Ok::<_, String>(t),
    )
    .unwrap_err();

    let Error::Parse(err) = err else {
        panic!("expected a ParseError, not a token-conversion failure");
    };
    assert_eq!(err.lookahead_token, Some("rparen"));
    assert!(err.expected_symbols.is_empty());
    assert_eq!(err.to_string(), "expected EOF instead of \"rparen\"");
}
