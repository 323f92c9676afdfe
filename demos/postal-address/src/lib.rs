#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Postal-address demo.
//!
//! Drives the matching engine end to end with the postal-address example
//! grammar from RFC 5234, and shows how to walk the resulting tree into a
//! plain struct.

use abnfkit::{Grammar, GrammarError, MatchError, SyntaxNode};
use thiserror::Error;

/// The RFC 5234 postal-address example grammar.
pub const POSTAL_GRAMMAR: &str = r#"postal-address = name-part street zip-part

name-part = *(personal-part SP) last-name [SP suffix] CRLF
name-part =/ personal-part CRLF

personal-part = first-name / (initial ".")
first-name = *ALPHA
initial = ALPHA
last-name = *ALPHA
suffix = ("Jr." / "Sr." / 1*("I" / "V" / "X"))

street = [apt SP] house-num SP street-name CRLF
apt = 1*4DIGIT
house-num = 1*8(DIGIT / ALPHA)
street-name = 1*VCHAR

zip-part = town-name "," SP state 1*2SP zip-code CRLF
town-name = 1*(ALPHA / SP)
state = 2ALPHA
zip-code = 5DIGIT ["-" 4DIGIT]"#;

#[derive(Error, Debug)]
pub enum AddressError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Loads the postal-address grammar.
pub fn postal_grammar() -> Result<Grammar, AddressError> {
    Ok(Grammar::parse(POSTAL_GRAMMAR)?)
}

/// Fields extracted from a matched `postal-address` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    pub last_name: String,
    pub street: String,
    pub town: String,
    pub state: String,
    pub zip_code: String,
}

/// Matches `input` against `postal-address` and pulls the interesting spans
/// out of the tree. `Ok(None)` means the input is not a postal address.
pub fn parse_postal_address(input: &str) -> Result<Option<PostalAddress>, AddressError> {
    let grammar = postal_grammar()?;
    let Some(node) = grammar.match_rule("postal-address", input)? else {
        return Ok(None);
    };
    Ok(Some(PostalAddress {
        last_name: span(&node, "last-name"),
        street: span(&node, "street").trim_end().to_owned(),
        town: span(&node, "town-name"),
        state: span(&node, "state"),
        zip_code: span(&node, "zip-code"),
    }))
}

fn span(node: &SyntaxNode, rule: &str) -> String {
    node.find(rule).map(SyntaxNode::text).unwrap_or_default()
}
