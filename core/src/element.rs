//! The grammar node taxonomy and the element-matching algorithm.

use std::fmt;

use crate::error::MatchError;
use crate::predicate::{LiteralPredicate, Predicate, RangePredicate};
use crate::rule::RuleTable;
use crate::stream::Stream;
use crate::tree::{MatchNode, release_nodes};

/// One element of a rule definition.
///
/// Elements are immutable grammar structure; all match state lives on the
/// stream and in the accumulator nodes. The enum is closed and matched
/// exhaustively, so adding a variant is a compile-checked change.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleElement {
    /// An exact, case-sensitive string.
    Literal(String),
    /// One unit whose code point lies in the inclusive `[min, max]` range.
    CharRange { min: u32, max: u32 },
    /// A sequence matched left to right; fails as a whole if any child fails.
    Group(Vec<RuleElement>),
    /// An optional sequence: a repetition of the sequence with minimum 0 and
    /// maximum 1. Never fails.
    Optional(Vec<RuleElement>),
    /// Ordered choice: the first branch that matches wins and is never
    /// reconsidered at this level.
    Alternative(Vec<RuleElement>),
    /// Greedy bounded repetition; `max: None` means unbounded.
    ///
    /// The repeated element must not match zero width when `max` is
    /// unbounded, or matching loops without progress; guarding against such
    /// grammars is the caller's responsibility.
    Repetition {
        min: usize,
        max: Option<usize>,
        element: Box<RuleElement>,
    },
    /// A reference to a named rule. Referencing a name absent from the rule
    /// table is a fatal configuration error, not a no-match.
    RuleRef(String),
}

/// `None` is ordinary no-match; the stream is guaranteed restored.
pub(crate) type Matched = Option<Vec<MatchNode>>;

impl RuleElement {
    pub(crate) fn match_stream(
        &self,
        stream: &mut Stream,
        table: &RuleTable,
    ) -> Result<Matched, MatchError> {
        match self {
            RuleElement::Literal(value) => {
                Ok(match_predicate(&LiteralPredicate::new(value), stream))
            }
            RuleElement::CharRange { min, max } => {
                Ok(match_predicate(&RangePredicate::new(*min, *max), stream))
            }
            RuleElement::Group(elements) => match_sequence(elements, stream, table),
            RuleElement::Optional(elements) => {
                match_repetition(0, Some(1), stream, |s| match_sequence(elements, s, table))
            }
            RuleElement::Alternative(branches) => {
                for branch in branches {
                    if let Some(nodes) = branch.match_stream(stream, table)? {
                        return Ok(Some(nodes));
                    }
                }
                Ok(None)
            }
            RuleElement::Repetition { min, max, element } => {
                match_repetition(*min, *max, stream, |s| element.match_stream(s, table))
            }
            RuleElement::RuleRef(name) => {
                let rule = table
                    .get(name)
                    .ok_or_else(|| MatchError::UndefinedRule { name: name.clone() })?;
                Ok(rule.match_stream(stream, table)?.map(|node| vec![node]))
            }
        }
    }
}

fn match_predicate(predicate: &dyn Predicate, stream: &mut Stream) -> Matched {
    predicate
        .apply(stream)
        .map(|lease| vec![MatchNode::terminal(lease)])
}

/// Matches each element in order. On any child failure, every node produced
/// by prior children is released in reverse order and the sequence reports
/// no-match.
fn match_sequence(
    elements: &[RuleElement],
    stream: &mut Stream,
    table: &RuleTable,
) -> Result<Matched, MatchError> {
    let mut nodes = Vec::new();
    for element in elements {
        match element.match_stream(stream, table)? {
            Some(matched) => nodes.extend(matched),
            None => {
                release_nodes(nodes, stream);
                return Ok(None);
            }
        }
    }
    Ok(Some(nodes))
}

/// Greedy repetition: accumulates matches of `attempt` from zero up to `max`
/// occurrences, stopping at the first failure. A count below `min` releases
/// everything accumulated; there is no backtracking to a smaller count on
/// downstream failure.
fn match_repetition(
    min: usize,
    max: Option<usize>,
    stream: &mut Stream,
    mut attempt: impl FnMut(&mut Stream) -> Result<Matched, MatchError>,
) -> Result<Matched, MatchError> {
    let mut nodes = Vec::new();
    let mut count = 0usize;
    while max.is_none_or(|limit| count < limit) {
        match attempt(stream)? {
            Some(matched) => {
                nodes.extend(matched);
                count += 1;
            }
            None => break,
        }
    }
    if count < min {
        release_nodes(nodes, stream);
        return Ok(None);
    }
    Ok(Some(nodes))
}

impl fmt::Display for RuleElement {
    /// Renders the element back to ABNF notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleElement::Literal(value) => write!(f, "\"{value}\""),
            RuleElement::CharRange { min, max } if min == max => write!(f, "%x{min:02X}"),
            RuleElement::CharRange { min, max } => write!(f, "%x{min:02X}-{max:02X}"),
            RuleElement::Group(elements) => {
                f.write_str("(")?;
                write_joined(f, elements, " ")?;
                f.write_str(")")
            }
            RuleElement::Optional(elements) => {
                f.write_str("[")?;
                write_joined(f, elements, " ")?;
                f.write_str("]")
            }
            RuleElement::Alternative(branches) => write_joined(f, branches, " / "),
            RuleElement::Repetition { min, max, element } => {
                match max {
                    Some(limit) if *min == *limit => write!(f, "{min}")?,
                    Some(limit) => {
                        if *min > 0 {
                            write!(f, "{min}")?;
                        }
                        write!(f, "*{limit}")?;
                    }
                    None => {
                        if *min > 0 {
                            write!(f, "{min}")?;
                        }
                        f.write_str("*")?;
                    }
                }
                write!(f, "{element}")
            }
            RuleElement::RuleRef(name) => f.write_str(name),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    elements: &[RuleElement],
    separator: &str,
) -> fmt::Result {
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{element}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repetition(min: usize, max: Option<usize>, element: RuleElement) -> RuleElement {
        RuleElement::Repetition {
            min,
            max,
            element: Box::new(element),
        }
    }

    #[test]
    fn display_renders_abnf_notation() {
        let literal = RuleElement::Literal("abc".to_owned());
        assert_eq!(literal.to_string(), "\"abc\"");

        assert_eq!(
            RuleElement::CharRange { min: 0x41, max: 0x5A }.to_string(),
            "%x41-5A"
        );
        assert_eq!(RuleElement::CharRange { min: 0x0D, max: 0x0D }.to_string(), "%x0D");

        let alt = RuleElement::Alternative(vec![
            RuleElement::Literal("abc".to_owned()),
            RuleElement::Group(vec![
                RuleElement::Literal("xyz".to_owned()),
                RuleElement::Literal("123".to_owned()),
            ]),
        ]);
        assert_eq!(alt.to_string(), "\"abc\" / (\"xyz\" \"123\")");

        assert_eq!(
            RuleElement::Optional(vec![RuleElement::RuleRef("suffix".to_owned())]).to_string(),
            "[suffix]"
        );
    }

    #[test]
    fn display_renders_repetition_prefixes() {
        let abc = || RuleElement::Literal("abc".to_owned());
        assert_eq!(repetition(2, Some(4), abc()).to_string(), "2*4\"abc\"");
        assert_eq!(repetition(0, Some(5), abc()).to_string(), "*5\"abc\"");
        assert_eq!(repetition(2, None, abc()).to_string(), "2*\"abc\"");
        assert_eq!(repetition(0, None, abc()).to_string(), "*\"abc\"");
        assert_eq!(repetition(5, Some(5), abc()).to_string(), "5\"abc\"");
    }
}
