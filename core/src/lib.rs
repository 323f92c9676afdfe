//! A backtracking ABNF grammar-matching engine.
//!
//! Load a grammar with [`Grammar::parse`] (or build a [`RuleTable`] by hand),
//! then match input against a named rule to obtain a [`SyntaxNode`] tree.

mod core_rules;
mod element;
mod error;
mod grammar;
mod predicate;
mod rule;
mod stream;
mod tree;

pub use element::RuleElement;
pub use error::{GrammarError, MatchError};
pub use grammar::Grammar;
pub use predicate::{LiteralPredicate, Predicate, RangePredicate};
pub use rule::{Rule, RuleTable};
pub use stream::{Lease, Stream};
pub use tree::SyntaxNode;
