#![no_main]

use libfuzzer_sys::fuzz_target;

use abnfkit::Grammar;

// Arbitrary grammar text must either load or fail with a GrammarError;
// it must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        if let Ok(grammar) = Grammar::parse(source) {
            // Display rendering of every loaded rule must not panic either.
            for rule in grammar.rule_table().rules() {
                let _ = rule.to_string();
            }
        }
    }
});
