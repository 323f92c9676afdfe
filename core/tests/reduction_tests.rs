//! Reduction tests: which rule matches collapse into single token leaves,
//! and which keep their structure.

use abnfkit::{Grammar, SyntaxNode};

fn child_names(node: &SyntaxNode) -> Vec<Option<&str>> {
    node.children().iter().map(SyntaxNode::rule_name).collect()
}

#[test]
fn core_rule_runs_collapse_into_one_leaf() {
    let grammar = Grammar::parse("street-name = 1*VCHAR").unwrap();
    let node = grammar.match_rule("street-name", "Fake").unwrap().unwrap();
    assert_eq!(
        node,
        SyntaxNode::Token {
            rule: Some("street-name".to_owned()),
            value: "Fake".to_owned(),
        }
    );
}

#[test]
fn anonymous_literals_merge_with_core_matches() {
    let grammar = Grammar::parse("word = ALPHA \"-\" ALPHA").unwrap();
    let node = grammar.match_rule("word", "a-b").unwrap().unwrap();
    // The bare "-" literal carries no rule tag and is always merge-eligible.
    assert_eq!(node.value(), Some("a-b"));
    assert!(node.is_terminal());
}

#[test]
fn non_core_child_keeps_the_parent_structural() {
    let grammar = Grammar::parse(
        "zip-part = town-name \",\" SP state 1*2SP zip-code CRLF\n\
         town-name = 1*(ALPHA / SP)\n\
         state = 2ALPHA\n\
         zip-code = 5DIGIT [\"-\" 4DIGIT]",
    )
    .unwrap();

    let node = grammar
        .match_rule("zip-part", "Springfield, IL 55555\r\n")
        .unwrap()
        .unwrap();

    // town-name is tagged with a non-core rule, so zip-part must not reduce
    // to a single token; town-name stays a distinct terminal child.
    assert!(!node.is_terminal());
    assert_eq!(node.rule_name(), Some("zip-part"));
    assert_eq!(
        child_names(&node),
        vec![
            Some("town-name"),
            None, // the bare "," literal
            Some("SP"),
            Some("state"),
            Some("SP"),
            Some("zip-code"),
            Some("CRLF"),
        ]
    );

    let town = node.find("town-name").unwrap();
    assert!(town.is_terminal());
    assert_eq!(town.value(), Some("Springfield"));

    assert_eq!(node.find("zip-code").and_then(SyntaxNode::value), Some("55555"));
    assert_eq!(node.text(), "Springfield, IL 55555\r\n");
}

#[test]
fn reduction_is_decided_at_every_rule_boundary() {
    let grammar = Grammar::parse(
        "entry = word \":\" item\n\
         item = word word\n\
         word = 1*ALPHA",
    )
    .unwrap();

    let node = grammar.match_rule("entry", "key:ab cd").unwrap();
    // "word" reduces (all ALPHA), but "item" holds two non-core word tokens
    // and stays structural, as does "entry" above it.
    assert!(node.is_none());

    let grammar = Grammar::parse(
        "entry = word \":\" item\n\
         item = word SP word\n\
         word = 1*ALPHA",
    )
    .unwrap();
    let node = grammar.match_rule("entry", "key:ab cd").unwrap().unwrap();

    assert_eq!(child_names(&node), vec![Some("word"), None, Some("item")]);
    let item = node.find("item").unwrap();
    assert!(!item.is_terminal());
    assert_eq!(child_names(item), vec![Some("word"), Some("SP"), Some("word")]);
    for word in item.children().iter().filter(|c| c.rule_name() == Some("word")) {
        assert!(word.is_terminal());
    }
}

#[test]
fn zero_width_match_reduces_to_empty_token() {
    let grammar = Grammar::parse("maybe = *1\"abc\"").unwrap();
    assert_eq!(
        grammar.match_rule("maybe", "").unwrap(),
        Some(SyntaxNode::Token {
            rule: Some("maybe".to_owned()),
            value: String::new(),
        })
    );
}

#[test]
fn finalized_trees_are_plain_data() {
    // A finalized tree can be cloned and compared freely; it holds no claim
    // on any stream.
    let grammar = Grammar::parse("word = 1*ALPHA").unwrap();
    let node = grammar.match_rule("word", "hello").unwrap().unwrap();
    let copy = node.clone();
    drop(node);
    assert_eq!(copy.value(), Some("hello"));
}
