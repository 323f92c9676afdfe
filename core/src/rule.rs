//! Named rules, the rule table, and the top-level match driver.

use std::collections::HashMap;
use std::fmt;

use crate::core_rules::core_rules;
use crate::element::RuleElement;
use crate::error::MatchError;
use crate::stream::Stream;
use crate::tree::{MatchNode, SyntaxNode, reduce, release_nodes};

/// A named grammar production wrapping one definition element.
///
/// `is_core` marks membership in the fixed foundational rule set (ALPHA,
/// DIGIT, SP, ...); it controls whether terminal matches of this rule are
/// eligible to be merged into an ancestor's reduced token value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    definition: RuleElement,
    is_core: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>, definition: RuleElement) -> Self {
        Self {
            name: name.into(),
            definition,
            is_core: false,
        }
    }

    /// A rule belonging to the foundational core set.
    pub fn core(name: impl Into<String>, definition: RuleElement) -> Self {
        Self {
            name: name.into(),
            definition,
            is_core: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &RuleElement {
        &self.definition
    }

    pub fn is_core(&self) -> bool {
        self.is_core
    }

    /// Extends this rule with an alternative definition (ABNF `=/`).
    ///
    /// If the existing definition is already an [`RuleElement::Alternative`],
    /// the new definition is appended as a further branch; otherwise the
    /// existing and new definitions become the first two branches of a fresh
    /// alternative. Branch order is declaration order, which matters under
    /// ordered choice.
    pub fn merge_alternative(&mut self, definition: RuleElement) {
        let existing = std::mem::replace(&mut self.definition, RuleElement::Alternative(Vec::new()));
        self.definition = match existing {
            RuleElement::Alternative(mut branches) => {
                branches.push(definition);
                RuleElement::Alternative(branches)
            }
            other => RuleElement::Alternative(vec![other, definition]),
        };
    }

    /// Matches this rule's definition and applies the reduction decision
    /// tagged with this rule's name, yielding exactly one node.
    pub(crate) fn match_stream(
        &self,
        stream: &mut Stream,
        table: &RuleTable,
    ) -> Result<Option<MatchNode>, MatchError> {
        match self.definition.match_stream(stream, table)? {
            Some(children) => Ok(Some(reduce(&self.name, children, table))),
            None => Ok(None),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.definition)
    }
}

/// The name → rule mapping consulted whenever a rule reference is matched.
///
/// Tables are mutated only while a grammar is being loaded; matching never
/// changes them.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: HashMap<String, Rule>,
}

impl RuleTable {
    /// An empty table, without the core-rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-loaded with the RFC 5234 core rules, each flagged core.
    pub fn with_core_rules() -> Self {
        core_rules().clone()
    }

    /// Inserts a rule under its own name, replacing any previous entry.
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.name().to_owned(), rule)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Rule> {
        self.rules.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Whether `name` is defined and flagged core. Unknown names are not
    /// core, which keeps reduction conservative.
    pub fn is_core(&self, name: &str) -> bool {
        self.get(name).is_some_and(Rule::is_core)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Matches `input` in full against the named rule.
    ///
    /// Equivalent to [`RuleTable::match_stream`] on a fresh stream over
    /// `input`.
    pub fn match_rule(
        &self,
        name: &str,
        input: &str,
    ) -> Result<Option<SyntaxNode>, MatchError> {
        let mut stream = Stream::new(input);
        self.match_stream(name, &mut stream)
    }

    /// The top-level driver: matches the named rule against `stream` via a
    /// synthetic anonymous root reference and requires the stream to be
    /// fully consumed.
    ///
    /// Returns `Ok(None)` — with the stream restored to its entry position —
    /// if the rule does not match or matches only a strict prefix of the
    /// remaining input. Referencing an undefined rule is a fatal
    /// [`MatchError::UndefinedRule`], regardless of input.
    pub fn match_stream(
        &self,
        name: &str,
        stream: &mut Stream,
    ) -> Result<Option<SyntaxNode>, MatchError> {
        // Synthetic root: an anonymous rule whose definition is a reference
        // to the requested name. Its single matched child is the result.
        let root = RuleElement::RuleRef(name.to_owned());
        match root.match_stream(stream, self)? {
            Some(nodes) if stream.is_fully_consumed() => {
                debug_assert_eq!(nodes.len(), 1, "rule reference yields one node");
                Ok(nodes.into_iter().next().map(MatchNode::finalize))
            }
            Some(nodes) => {
                // Prefix match: release so the caller's stream is untouched.
                release_nodes(nodes, stream);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
