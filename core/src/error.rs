//! Error types for grammar loading and matching.
//!
//! Ordinary no-match is not an error: matching APIs return `Ok(None)` for
//! input that simply does not fit a rule, with the stream restored. The
//! types here cover the two genuine failure channels — a defective grammar
//! text, and a defective rule table encountered mid-match.

use thiserror::Error;

/// Fatal configuration error raised during matching.
///
/// Distinct from ordinary no-match: this aborts the match immediately and
/// is never silently folded into a `None` result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// A rule reference names a rule absent from the rule table. The
    /// grammar itself is invalid.
    #[error("undefined rule: {name}")]
    UndefinedRule { name: String },
}

/// Error raised while parsing grammar text into a rule table.
///
/// Lines are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("line {line}: missing rule name")]
    MissingRuleName { line: usize },

    #[error("line {line}: expected `=` after rule name `{rule}`")]
    MissingEquals { line: usize, rule: String },

    #[error("line {line}: empty definition")]
    EmptyDefinition { line: usize },

    #[error("line {line}: unterminated string literal")]
    UnterminatedLiteral { line: usize },

    #[error("line {line}: invalid numeric value")]
    InvalidValue { line: usize },

    #[error("line {line}: invalid repetition count")]
    InvalidRepetition { line: usize },

    #[error("line {line}: repetition prefix without an element")]
    DanglingRepetition { line: usize },

    #[error("line {line}: unclosed `{delimiter}` group")]
    UnclosedGroup { line: usize, delimiter: char },

    #[error("line {line}: unexpected character `{found}`")]
    UnexpectedChar { line: usize, found: char },

    #[error("line {line}: unexpected end of line")]
    UnexpectedEnd { line: usize },

    #[error("line {line}: duplicate definition of rule `{rule}`")]
    DuplicateRule { line: usize, rule: String },

    #[error("line {line}: incremental definition of undefined rule `{rule}`")]
    UndefinedIncremental { line: usize, rule: String },
}
