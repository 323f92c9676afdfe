#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use abnfkit::{Grammar, Stream};

const GRAMMAR: &str = r#"record = key ":" value *(";" SP key ":" value)
key = 1*(ALPHA / "-")
value = 1*(ALPHA / DIGIT) ["." 1*DIGIT]
line = record CRLF
number = 1*DIGIT ["." 1*DIGIT]"#;

const RULES: &[&str] = &["record", "key", "value", "line", "number"];

#[derive(Arbitrary, Debug)]
struct Case<'a> {
    rule_index: u8,
    input: &'a str,
}

// Whatever the input, a no-match must restore the stream cursor exactly,
// and a match must have consumed the whole input with the tree's leaf
// concatenation reproducing it.
fuzz_target!(|case: Case<'_>| {
    let grammar = Grammar::parse(GRAMMAR).expect("fuzz grammar loads");
    let rule = RULES[case.rule_index as usize % RULES.len()];

    let mut stream = Stream::new(case.input);
    match grammar.match_stream(rule, &mut stream).expect("no undefined rules") {
        Some(node) => {
            assert!(stream.is_fully_consumed());
            assert_eq!(node.text(), case.input);
        }
        None => assert_eq!(stream.cursor(), 0),
    }
});
