//! The grammar-text parser: ABNF source in, rule table out.
//!
//! A character-by-character recursive-descent scan with no backtracking.
//! Each non-blank line defines a rule (`name = elements`) or extends one
//! (`name =/ elements`); `;` starts a comment running to end of line. The
//! resulting table is pre-loaded with the RFC 5234 core rules.

use std::iter::Peekable;
use std::str::Chars;

use crate::element::RuleElement;
use crate::error::{GrammarError, MatchError};
use crate::rule::{Rule, RuleTable};
use crate::stream::Stream;
use crate::tree::SyntaxNode;

/// A loaded grammar: a rule table ready for matching.
#[derive(Debug, Clone)]
pub struct Grammar {
    table: RuleTable,
}

impl Grammar {
    /// Parses ABNF grammar text.
    ///
    /// # Example
    ///
    /// ```
    /// use abnfkit::Grammar;
    ///
    /// let grammar = Grammar::parse(r#"greeting = "hello" 1*SP name
    /// name = 1*ALPHA"#).unwrap();
    /// let node = grammar.match_rule("greeting", "hello world").unwrap();
    /// assert!(node.is_some());
    /// ```
    pub fn parse(source: &str) -> Result<Self, GrammarError> {
        let mut table = RuleTable::with_core_rules();

        for (index, text) in source.lines().enumerate() {
            let line = index + 1;
            let mut scanner = Scanner::new(text, line);

            scanner.skip_whitespace();
            if scanner.at_end() {
                continue;
            }

            let name = scanner.rule_name()?;
            scanner.skip_whitespace();
            let incremental = scanner.defined_as(&name)?;
            let elements = scanner.alternation_list(None)?;
            scanner.expect_line_end()?;
            let definition = wrap_sequence(elements);

            if incremental {
                match table.get_mut(&name) {
                    Some(rule) => rule.merge_alternative(definition),
                    None => return Err(GrammarError::UndefinedIncremental { line, rule: name }),
                }
            } else {
                if table.contains(&name) {
                    return Err(GrammarError::DuplicateRule { line, rule: name });
                }
                table.insert(Rule::new(name, definition));
            }
        }

        Ok(Self { table })
    }

    pub fn rule_table(&self) -> &RuleTable {
        &self.table
    }

    pub fn into_rule_table(self) -> RuleTable {
        self.table
    }

    /// Matches `input` in full against the named rule. See
    /// [`RuleTable::match_rule`].
    pub fn match_rule(
        &self,
        name: &str,
        input: &str,
    ) -> Result<Option<SyntaxNode>, MatchError> {
        self.table.match_rule(name, input)
    }

    /// Matches against a caller-positioned stream. See
    /// [`RuleTable::match_stream`].
    pub fn match_stream(
        &self,
        name: &str,
        stream: &mut Stream,
    ) -> Result<Option<SyntaxNode>, MatchError> {
        self.table.match_stream(name, stream)
    }
}

/// A sequence of one element is that element; longer sequences group.
fn wrap_sequence(mut elements: Vec<RuleElement>) -> RuleElement {
    if elements.len() == 1 {
        elements.remove(0)
    } else {
        RuleElement::Group(elements)
    }
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            chars: text.chars().peekable(),
            line,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }

    /// Skips spaces and tabs; a `;` comment swallows the rest of the line.
    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.bump();
        }
        if self.peek() == Some(';') {
            while self.bump().is_some() {}
        }
    }

    fn at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// A rule name: a letter followed by letters, digits, and hyphens.
    fn rule_name(&mut self) -> Result<String, GrammarError> {
        match self.peek() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return Err(GrammarError::MissingRuleName { line: self.line }),
        }
        let mut name = String::new();
        while let Some(unit) = self.peek() {
            if unit.is_ascii_alphanumeric() || unit == '-' {
                name.push(unit);
                self.bump();
            } else {
                break;
            }
        }
        Ok(name)
    }

    /// Consumes `=` or `=/`; returns `true` for the incremental form.
    fn defined_as(&mut self, rule: &str) -> Result<bool, GrammarError> {
        if self.bump() != Some('=') {
            return Err(GrammarError::MissingEquals {
                line: self.line,
                rule: rule.to_owned(),
            });
        }
        if self.peek() == Some('/') {
            self.bump();
            return Ok(true);
        }
        Ok(false)
    }

    /// An alternation of concatenations, returned as an element list with
    /// sequence semantics: a single-branch alternation is the branch's own
    /// element list, a multi-branch one is a one-element list holding the
    /// [`RuleElement::Alternative`].
    fn alternation_list(
        &mut self,
        terminator: Option<char>,
    ) -> Result<Vec<RuleElement>, GrammarError> {
        let first = self.concatenation_list(terminator)?;
        self.skip_whitespace();
        if self.peek() != Some('/') {
            return Ok(first);
        }

        let mut branches = vec![wrap_sequence(first)];
        while self.peek() == Some('/') {
            self.bump();
            branches.push(wrap_sequence(self.concatenation_list(terminator)?));
            self.skip_whitespace();
        }
        Ok(vec![RuleElement::Alternative(branches)])
    }

    /// A whitespace-separated run of (optionally repetition-prefixed)
    /// elements, up to `/`, the terminator, or end of line.
    fn concatenation_list(
        &mut self,
        terminator: Option<char>,
    ) -> Result<Vec<RuleElement>, GrammarError> {
        let mut elements = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some('/') => break,
                Some(unit) if Some(unit) == terminator => break,
                Some(_) => elements.push(self.repeated_element()?),
            }
        }
        if elements.is_empty() {
            return Err(GrammarError::EmptyDefinition { line: self.line });
        }
        Ok(elements)
    }

    /// An element, honoring an optional `min*max` / `*max` / `min*` / `*` /
    /// exact-count repetition prefix.
    fn repeated_element(&mut self) -> Result<RuleElement, GrammarError> {
        let mut min = None;
        let mut starred = false;
        let mut max = None;

        if matches!(self.peek(), Some(unit) if unit.is_ascii_digit()) {
            min = Some(self.count()?);
        }
        if self.peek() == Some('*') {
            self.bump();
            starred = true;
            if matches!(self.peek(), Some(unit) if unit.is_ascii_digit()) {
                max = Some(self.count()?);
            }
        }

        let prefixed = min.is_some() || starred;
        self.skip_whitespace();
        if self.at_end() && prefixed {
            return Err(GrammarError::DanglingRepetition { line: self.line });
        }

        let element = self.element()?;
        Ok(match (min, starred, max) {
            (None, false, _) => element,
            (Some(exact), false, _) => RuleElement::Repetition {
                min: exact,
                max: Some(exact),
                element: Box::new(element),
            },
            (at_least, true, at_most) => RuleElement::Repetition {
                min: at_least.unwrap_or(0),
                max: at_most,
                element: Box::new(element),
            },
        })
    }

    fn element(&mut self) -> Result<RuleElement, GrammarError> {
        match self.peek() {
            Some('"') => self.literal(),
            Some('%') => self.value_range(),
            Some('(') => {
                self.bump();
                let inner = self.alternation_list(Some(')'))?;
                self.expect_close(')')?;
                Ok(RuleElement::Group(inner))
            }
            Some('[') => {
                self.bump();
                let inner = self.alternation_list(Some(']'))?;
                self.expect_close(']')?;
                Ok(RuleElement::Optional(inner))
            }
            Some(unit) if unit.is_ascii_alphabetic() => {
                Ok(RuleElement::RuleRef(self.rule_name()?))
            }
            Some(found) => Err(GrammarError::UnexpectedChar {
                line: self.line,
                found,
            }),
            None => Err(GrammarError::UnexpectedEnd { line: self.line }),
        }
    }

    fn literal(&mut self) -> Result<RuleElement, GrammarError> {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(RuleElement::Literal(value)),
                Some(unit) => value.push(unit),
                None => return Err(GrammarError::UnterminatedLiteral { line: self.line }),
            }
        }
    }

    /// A numeric value: `%b`/`%d`/`%x`, one value or an inclusive range.
    fn value_range(&mut self) -> Result<RuleElement, GrammarError> {
        self.bump(); // '%'
        let radix = match self.bump() {
            Some('b') | Some('B') => 2,
            Some('d') | Some('D') => 10,
            Some('x') | Some('X') => 16,
            _ => return Err(GrammarError::InvalidValue { line: self.line }),
        };
        let min = self.radix_number(radix)?;
        if self.peek() != Some('-') {
            return Ok(RuleElement::CharRange { min, max: min });
        }
        self.bump();
        let max = self.radix_number(radix)?;
        if min > max {
            return Err(GrammarError::InvalidValue { line: self.line });
        }
        Ok(RuleElement::CharRange { min, max })
    }

    fn radix_number(&mut self, radix: u32) -> Result<u32, GrammarError> {
        let mut digits = String::new();
        while let Some(unit) = self.peek() {
            if unit.is_digit(radix) {
                digits.push(unit);
                self.bump();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(GrammarError::InvalidValue { line: self.line });
        }
        u32::from_str_radix(&digits, radix)
            .map_err(|_| GrammarError::InvalidValue { line: self.line })
    }

    fn count(&mut self) -> Result<usize, GrammarError> {
        let mut digits = String::new();
        while let Some(unit) = self.peek() {
            if unit.is_ascii_digit() {
                digits.push(unit);
                self.bump();
            } else {
                break;
            }
        }
        digits
            .parse()
            .map_err(|_| GrammarError::InvalidRepetition { line: self.line })
    }

    fn expect_close(&mut self, delimiter: char) -> Result<(), GrammarError> {
        if self.bump() == Some(delimiter) {
            Ok(())
        } else {
            Err(GrammarError::UnclosedGroup {
                line: self.line,
                delimiter,
            })
        }
    }

    fn expect_line_end(&mut self) -> Result<(), GrammarError> {
        self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(found) => Err(GrammarError::UnexpectedChar {
                line: self.line,
                found,
            }),
        }
    }
}
