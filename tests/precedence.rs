//! Precedence-resolved shift/reduce conflicts: spec.md §8 scenario 6.
//!
//! E -> x | E*E | E/E | E+E | E-E, with `+`/`-` binding looser than `*`/`/`,
//! both left-associative. Parses `x-x-x*x+x` and checks the resulting tree
//! is `((x-x)-(x*x))+x`.

use lalr::{parse_with, Associativity, Grammar, ParseTable, PrecedenceClass, Production};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tree {
    Leaf,
    Node(char, Box<Tree>, Box<Tree>),
}

fn expression_grammar() -> Grammar<&'static str> {
    Grammar::new(
        vec![
            Production::new("E", vec!["x"]),
            Production::new("E", vec!["E", "*", "E"]),
            Production::new("E", vec!["E", "/", "E"]),
            Production::new("E", vec!["E", "+", "E"]),
            Production::new("E", vec!["E", "-", "E"]),
        ],
        vec![
            PrecedenceClass::left(["+", "-"]),
            PrecedenceClass::left(["*", "/"]),
        ],
    )
    .unwrap()
}

#[test]
fn left_associative_precedence_classes_are_both_recorded() {
    let g = expression_grammar();
    assert_eq!(g.associativity(&"+"), Some(Associativity::Left));
    assert_eq!(g.associativity(&"*"), Some(Associativity::Left));
    assert!(g.precedence_level(&"*") > g.precedence_level(&"+"));
}

#[test]
fn scenario_6_builds_the_precedence_shaped_tree() {
    let g = expression_grammar();
    let table = ParseTable::new(&g, "E").unwrap();
    let tokens: Vec<&str> = vec!["x", "-", "x", "-", "x", "*", "x", "+", "x"];

    #[derive(Clone)]
    enum Value {
        Token(&'static str),
        Tree(Tree),
    }

    let result = parse_with(
        &table,
        tokens,
        |production_index, mut children: Vec<Value>| {
            let production = table.production(production_index);
            if production.symbols.len() == 1 {
                return Value::Tree(Tree::Leaf);
            }
            let right = children.pop().unwrap();
            let _operator = children.pop().unwrap();
            let left = children.pop().unwrap();
            let (Value::Tree(left), Value::Tree(right)) = (left, right) else {
                panic!("operands must already be reduced trees");
            };
            let operator_char = production.symbols[1].chars().next().unwrap();
            Value::Tree(Tree::Node(operator_char, Box::new(left), Box::new(right)))
        },
        |t: &&str| Ok::<_, String>(*t),
        |t: &str| Ok::<_, String>(Value::Token(t)),
    )
    .unwrap();

    let Value::Tree(tree) = result else {
        panic!("final parse result must be a tree");
    };

    let expected = Tree::Node(
        '+',
        Box::new(Tree::Node(
            '-',
            Box::new(Tree::Node('-', Box::new(Tree::Leaf), Box::new(Tree::Leaf))),
            Box::new(Tree::Node('*', Box::new(Tree::Leaf), Box::new(Tree::Leaf))),
        )),
        Box::new(Tree::Leaf),
    );
    assert_eq!(tree, expected);
}
