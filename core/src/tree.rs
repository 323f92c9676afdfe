//! Syntax tree nodes, the match-time accumulator, and the reduction pass
//! that collapses runs of core-rule terminals into single token leaves.

use crate::rule::RuleTable;
use crate::stream::{Lease, Stream};

/// A node of a finalized syntax tree.
///
/// Structural nodes carry a rule name and ordered children; terminal nodes
/// carry an optional rule name (`None` for anonymous terminals produced by
/// bare literals and ranges) and the exact matched text. Finalized nodes
/// hold no claim on the stream: the leases that backed the match are
/// stripped when the tree is finalized, so a finished tree is plain data.
///
/// Invariant: concatenating the matched text of all terminal leaves in
/// left-to-right order reproduces exactly the input span the node matched;
/// [`SyntaxNode::text`] computes that span.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// A structural match of a named rule.
    Rule {
        name: String,
        children: Vec<SyntaxNode>,
    },
    /// A terminal token.
    Token {
        rule: Option<String>,
        value: String,
    },
}

impl SyntaxNode {
    /// The name of the rule this node matched, if any.
    pub fn rule_name(&self) -> Option<&str> {
        match self {
            SyntaxNode::Rule { name, .. } => Some(name),
            SyntaxNode::Token { rule, .. } => rule.as_deref(),
        }
    }

    /// The matched text of a terminal node; `None` for structural nodes.
    pub fn value(&self) -> Option<&str> {
        match self {
            SyntaxNode::Rule { .. } => None,
            SyntaxNode::Token { value, .. } => Some(value),
        }
    }

    /// Ordered children; empty for terminal nodes.
    pub fn children(&self) -> &[SyntaxNode] {
        match self {
            SyntaxNode::Rule { children, .. } => children,
            SyntaxNode::Token { .. } => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SyntaxNode::Token { .. })
    }

    /// The full input span this node matched: the in-order concatenation of
    /// every terminal leaf's text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            SyntaxNode::Rule { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            SyntaxNode::Token { value, .. } => out.push_str(value),
        }
    }

    /// Depth-first search for the first descendant (including `self`)
    /// matching `rule`.
    pub fn find(&self, rule: &str) -> Option<&SyntaxNode> {
        if self.rule_name() == Some(rule) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(rule))
    }
}

/// The match-time accumulator.
///
/// Nodes of this form are speculative: until the enclosing rule's entire
/// definition has matched, they may still be released, returning their
/// leases to the stream in reverse acquisition order. Release and
/// finalization both consume the node, so neither can happen twice.
#[derive(Debug)]
pub(crate) enum MatchNode {
    Rule {
        name: String,
        children: Vec<MatchNode>,
    },
    Token {
        rule: Option<String>,
        value: String,
        /// Leases backing this token, in acquisition order.
        leases: Vec<Lease>,
    },
}

impl MatchNode {
    /// An anonymous terminal wrapping a single predicate lease.
    pub(crate) fn terminal(lease: Lease) -> Self {
        MatchNode::Token {
            rule: None,
            value: lease.text().to_owned(),
            leases: vec![lease],
        }
    }

    /// Returns this node's claim on the stream, children before parents
    /// reversed, leases last-acquired-first.
    pub(crate) fn release(self, stream: &mut Stream) {
        match self {
            MatchNode::Rule { children, .. } => release_nodes(children, stream),
            MatchNode::Token { leases, .. } => {
                for lease in leases.into_iter().rev() {
                    lease.release(stream);
                }
            }
        }
    }

    /// Converts the accumulator into a finalized node, dropping all leases.
    /// Nothing further will backtrack once a tree is finalized.
    pub(crate) fn finalize(self) -> SyntaxNode {
        match self {
            MatchNode::Rule { name, children } => SyntaxNode::Rule {
                name,
                children: children.into_iter().map(MatchNode::finalize).collect(),
            },
            MatchNode::Token { rule, value, .. } => SyntaxNode::Token { rule, value },
        }
    }
}

/// Releases a list of sibling nodes in reverse creation order.
pub(crate) fn release_nodes(nodes: Vec<MatchNode>, stream: &mut Stream) {
    for node in nodes.into_iter().rev() {
        node.release(stream);
    }
}

/// The reduction decision, made independently at every rule boundary.
///
/// If every child is a terminal whose rule tag is absent (anonymous) or
/// names a core rule, the children collapse into one terminal tagged with
/// the current rule's name; the merged token keeps the children's leases so
/// it remains releasable until finalization. Otherwise the children are
/// held unmodified under a structural node. An empty child list reduces to
/// an empty-valued token.
pub(crate) fn reduce(name: &str, children: Vec<MatchNode>, table: &RuleTable) -> MatchNode {
    let collapsible = children.iter().all(|child| match child {
        MatchNode::Token { rule, .. } => rule.as_deref().is_none_or(|tag| table.is_core(tag)),
        MatchNode::Rule { .. } => false,
    });

    if collapsible {
        let mut value = String::new();
        let mut leases = Vec::new();
        for child in children {
            if let MatchNode::Token {
                value: text,
                leases: child_leases,
                ..
            } = child
            {
                value.push_str(&text);
                leases.extend(child_leases);
            }
        }
        MatchNode::Token {
            rule: Some(name.to_owned()),
            value,
            leases,
        }
    } else {
        MatchNode::Rule {
            name: name.to_owned(),
            children,
        }
    }
}
