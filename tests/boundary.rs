//! Boundary grammars from spec.md §8: self-recursion and mutual recursion,
//! exercised end-to-end through [`lalr::parse_with`] rather than just at
//! table-construction time (`src/table.rs`'s unit tests already cover
//! self/mutual recursion at the table level and the classic reduce/reduce
//! rejection case).

use lalr::{parse_with, Grammar, ParseTable, Production};

#[test]
fn self_recursive_nonterminal_parses_a_chain() {
    // A -> A x | x
    let g = Grammar::new(
        vec![Production::new("A", vec!["A", "x"]), Production::new("A", vec!["x"])],
        vec![],
    )
    .unwrap();
    let table = ParseTable::new(&g, "A").unwrap();
    let tokens: Vec<&str> = vec!["x", "x", "x"];
    let mut reduction_count = 0;

    let result = parse_with(
        &table,
        tokens,
        |_production_index, _children: Vec<&str>| {
            reduction_count += 1;
            "A"
        },
        |t: &&str| Ok::<_, String>(*t),
        |t: &str| Ok::<_, String>(t),
    )
    .unwrap();

    assert_eq!(result, "A");
    assert_eq!(reduction_count, 3);
}

#[test]
fn mutually_recursive_nonterminals_parse_their_shared_sentence() {
    // A -> B x | x ; B -> A y
    let g = Grammar::new(
        vec![
            Production::new("A", vec!["B", "x"]),
            Production::new("A", vec!["x"]),
            Production::new("B", vec!["A", "y"]),
        ],
        vec![],
    )
    .unwrap();
    let table = ParseTable::new(&g, "A").unwrap();
    let tokens: Vec<&str> = vec!["x", "y", "x"];
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

    assert_eq!(names, vec!["A", "B", "A"]);
    assert_eq!(result, "A");
}

#[test]
fn classic_lalr_merge_conflict_grammar_is_rejected() {
    // S -> a A d | b B d | a B e | b A e ; A -> c ; B -> c
    //
    // The textbook example (Aho/Sethi/Ullman) of LALR(1) introducing a
    // reduce/reduce conflict that canonical LR(1) would not have: the state
    // reached after shifting 'c' from the 'a' branch and the state reached
    // after shifting 'c' from the 'b' branch share the kernel core
    // {(A->c,1), (B->c,1)}, so LALR merges them — unioning A->c's
    // lookaheads to {d,e} and B->c's to {d,e} as well, which conflict on
    // both. This is expected LALR behavior, not a bug in the merge.
    let g = Grammar::new(
        vec![
            Production::new("S", vec!["a", "A", "d"]),
            Production::new("S", vec!["b", "B", "d"]),
            Production::new("S", vec!["a", "B", "e"]),
            Production::new("S", vec!["b", "A", "e"]),
            Production::new("A", vec!["c"]),
            Production::new("B", vec!["c"]),
        ],
        vec![],
    )
    .unwrap();

    let err = ParseTable::new(&g, "S").unwrap_err();
    assert!(matches!(
        err,
        lalr::CompilationError::Conflict(lalr::ConflictError::ReduceReduce { .. })
    ));
}
