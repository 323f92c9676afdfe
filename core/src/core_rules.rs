//! The fixed ABNF core-rule set (RFC 5234, appendix B.1).
//!
//! Built once, lazily, as an immutable table and merged into every grammar's
//! rule table at load time; never mutated afterwards.

use once_cell::sync::Lazy;

use crate::element::RuleElement;
use crate::rule::{Rule, RuleTable};

static CORE_RULES: Lazy<RuleTable> = Lazy::new(build);

/// The shared core-rule table. Callers clone it (via
/// [`RuleTable::with_core_rules`]) rather than mutating it.
pub(crate) fn core_rules() -> &'static RuleTable {
    &CORE_RULES
}

fn range(min: u32, max: u32) -> RuleElement {
    RuleElement::CharRange { min, max }
}

fn single(code: u32) -> RuleElement {
    range(code, code)
}

fn reference(name: &str) -> RuleElement {
    RuleElement::RuleRef(name.to_owned())
}

fn literal(value: &str) -> RuleElement {
    RuleElement::Literal(value.to_owned())
}

fn build() -> RuleTable {
    let mut table = RuleTable::new();

    table.insert(Rule::core(
        "ALPHA",
        RuleElement::Alternative(vec![range(0x41, 0x5A), range(0x61, 0x7A)]),
    ));
    table.insert(Rule::core(
        "BIT",
        RuleElement::Alternative(vec![literal("0"), literal("1")]),
    ));
    table.insert(Rule::core("CHAR", range(0x01, 0x7F)));
    table.insert(Rule::core("CR", single(0x0D)));
    table.insert(Rule::core(
        "CRLF",
        RuleElement::Group(vec![reference("CR"), reference("LF")]),
    ));
    table.insert(Rule::core(
        "CTL",
        RuleElement::Alternative(vec![range(0x00, 0x1F), single(0x7F)]),
    ));
    table.insert(Rule::core("DIGIT", range(0x30, 0x39)));
    table.insert(Rule::core("DQUOTE", single(0x22)));
    // Literal matching is case-sensitive in this engine, so the letter
    // digits are ranges covering both cases rather than quoted literals.
    table.insert(Rule::core(
        "HEXDIG",
        RuleElement::Alternative(vec![
            reference("DIGIT"),
            range(0x41, 0x46),
            range(0x61, 0x66),
        ]),
    ));
    table.insert(Rule::core("HTAB", single(0x09)));
    table.insert(Rule::core("LF", single(0x0A)));
    table.insert(Rule::core(
        "LWSP",
        RuleElement::Repetition {
            min: 0,
            max: None,
            element: Box::new(RuleElement::Alternative(vec![
                reference("WSP"),
                RuleElement::Group(vec![reference("CRLF"), reference("WSP")]),
            ])),
        },
    ));
    table.insert(Rule::core("OCTET", range(0x00, 0xFF)));
    table.insert(Rule::core("SP", single(0x20)));
    table.insert(Rule::core("VCHAR", range(0x21, 0x7E)));
    table.insert(Rule::core(
        "WSP",
        RuleElement::Alternative(vec![reference("SP"), reference("HTAB")]),
    ));

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: &[&str] = &[
        "ALPHA", "BIT", "CHAR", "CR", "CRLF", "CTL", "DIGIT", "DQUOTE", "HEXDIG", "HTAB", "LF",
        "LWSP", "OCTET", "SP", "VCHAR", "WSP",
    ];

    #[test]
    fn every_core_rule_is_present_and_flagged() {
        let table = core_rules();
        assert_eq!(table.len(), NAMES.len());
        for name in NAMES {
            let rule = table.get(name).unwrap_or_else(|| panic!("missing {name}"));
            assert!(rule.is_core(), "{name} not flagged core");
        }
    }

    #[test]
    fn core_rules_match_their_alphabet() {
        let table = RuleTable::with_core_rules();
        assert!(table.match_rule("ALPHA", "q").unwrap().is_some());
        assert!(table.match_rule("ALPHA", "4").unwrap().is_none());
        assert!(table.match_rule("DIGIT", "4").unwrap().is_some());
        assert!(table.match_rule("CRLF", "\r\n").unwrap().is_some());
        assert!(table.match_rule("HEXDIG", "f").unwrap().is_some());
        assert!(table.match_rule("HEXDIG", "F").unwrap().is_some());
        assert!(table.match_rule("HEXDIG", "g").unwrap().is_none());
        assert!(table.match_rule("WSP", " ").unwrap().is_some());
        assert!(table.match_rule("LWSP", " \t \r\n ").unwrap().is_some());
    }

    #[test]
    fn core_matches_reduce_to_single_tokens() {
        let table = RuleTable::with_core_rules();
        let node = table.match_rule("CRLF", "\r\n").unwrap().unwrap();
        assert!(node.is_terminal());
        assert_eq!(node.rule_name(), Some("CRLF"));
        assert_eq!(node.value(), Some("\r\n"));
    }
}
