//! Context-free grammars in a small plain-text format, and the LL(1) tables built from them.
//!
//! A grammar is written one rule per line:
//!
//! ```text
//! # comment
//! expr      -> term expr_tail
//! expr_tail -> PLUS term expr_tail
//!            | @
//! ```
//!
//! Symbols starting with an uppercase letter are terminals, `@` derives the empty string, `$`
//! marks the end of input, and everything else is a nonterminal. The first rule defines the
//! start symbol.

pub mod error;
pub mod table;

use error::{
    DanglingContinuation,
    DuplicateRule,
    EmptyAlternative,
    EmptyGrammar,
    MissingArrow,
    MissingLeftHandSide,
    UndefinedNonterminal,
};
use mathtree_error::Error;
use std::{collections::HashMap, fmt, ops::Range, str::FromStr};
pub use table::{build_tables, ParseTable};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The source of the bundled expression grammar.
pub const EXPRESSION_GRAMMAR: &str = include_str!("../../grammar/expr.grammar");

/// A symbol of a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Symbol {
    /// A terminal, matched against the kind of an input token.
    Terminal(String),

    /// A nonterminal, expanded through the predictive table.
    Nonterminal(String),

    /// The empty string, written `@`.
    Epsilon,

    /// The end of the input, written `$`.
    End,
}

impl Symbol {
    /// Classifies a word of grammar text by the lexical convention of the format.
    pub fn classify(word: &str) -> Self {
        match word {
            "@" => Symbol::Epsilon,
            "$" => Symbol::End,
            _ if word.starts_with(|c: char| c.is_ascii_uppercase()) => Symbol::Terminal(word.to_string()),
            _ => Symbol::Nonterminal(word.to_string()),
        }
    }

    /// Returns the text of the symbol as written in grammar text.
    pub fn as_str(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::Nonterminal(name) => name,
            Symbol::Epsilon => "@",
            Symbol::End => "$",
        }
    }

    /// Returns true if the symbol is a terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Returns true if the symbol is a nonterminal.
    pub fn is_nonterminal(&self) -> bool {
        matches!(self, Symbol::Nonterminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule of a grammar: a nonterminal and the alternatives it can expand to.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// The nonterminal this rule defines.
    pub lhs: String,

    /// The alternatives of the rule, in the order they were written.
    pub alternatives: Vec<Vec<Symbol>>,

    /// The region of the grammar text the rule was defined in.
    pub span: Range<usize>,
}

/// An ordered context-free grammar. The left-hand side of the first rule is the start symbol.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Grammar {
    /// The rules of the grammar, in definition order.
    rules: Vec<Rule>,

    /// Maps each nonterminal to the index of its rule.
    index: HashMap<String, usize>,
}

impl Grammar {
    /// Creates a grammar from its rules, checking that no nonterminal is defined twice and that
    /// every nonterminal used is defined.
    pub fn new(rules: Vec<Rule>) -> Result<Self, Error> {
        if rules.is_empty() {
            return Err(Error::detached(EmptyGrammar));
        }

        let mut index = HashMap::new();
        for (i, rule) in rules.iter().enumerate() {
            if let Some(&previous) = index.get(&rule.lhs) {
                let previous: &Rule = &rules[previous];
                return Err(Error::new(
                    vec![previous.span.clone(), rule.span.clone()],
                    DuplicateRule { nonterminal: rule.lhs.clone() },
                ));
            }
            index.insert(rule.lhs.clone(), i);
        }

        for rule in &rules {
            for alternative in &rule.alternatives {
                if alternative.is_empty() {
                    return Err(Error::new(
                        vec![rule.span.clone()],
                        EmptyAlternative { nonterminal: rule.lhs.clone() },
                    ));
                }

                let undefined = alternative.iter().find(|symbol| match symbol {
                    Symbol::Nonterminal(name) => !index.contains_key(name),
                    _ => false,
                });
                if let Some(symbol) = undefined {
                    return Err(Error::new(
                        vec![rule.span.clone()],
                        UndefinedNonterminal { nonterminal: symbol.to_string() },
                    ));
                }
            }
        }

        Ok(Self { rules, index })
    }

    /// Parses the bundled expression grammar.
    pub fn expression() -> Result<Self, Error> {
        EXPRESSION_GRAMMAR.parse()
    }

    /// Returns the start symbol of the grammar.
    pub fn start(&self) -> &str {
        // `new` rejects grammars without rules
        &self.rules[0].lhs
    }

    /// Returns the rules of the grammar, in definition order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the rule defining the given nonterminal.
    pub fn rule(&self, nonterminal: &str) -> Option<&Rule> {
        self.index.get(nonterminal).map(|&i| &self.rules[i])
    }

    /// Returns an iterator over every symbol used in a right-hand side of the grammar.
    pub fn symbols(&self) -> impl Iterator<Item = (&Rule, &Symbol)> + '_ {
        self.rules
            .iter()
            .flat_map(|rule| rule.alternatives.iter().flatten().map(move |symbol| (rule, symbol)))
    }
}

/// A rule being read from grammar text, which may still receive continuation lines.
struct PendingRule {
    lhs: String,
    words: Vec<String>,
    span: Range<usize>,
}

impl PendingRule {
    /// Splits the collected words on `|` into alternatives.
    fn finish(self) -> Rule {
        let alternatives = self.words
            .split(|word| word == "|")
            .map(|words| words.iter().map(|word| Symbol::classify(word)).collect())
            .collect();
        Rule { lhs: self.lhs, alternatives, span: self.span }
    }
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut rules = Vec::new();
        let mut pending: Option<PendingRule> = None;
        let mut offset = 0;

        for raw_line in source.split_inclusive('\n') {
            let line_start = offset;
            offset += raw_line.len();

            let trimmed = raw_line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let start = line_start + (raw_line.len() - raw_line.trim_start().len());
            let span = start..start + trimmed.len();

            if trimmed.starts_with('|') {
                let Some(rule) = pending.as_mut() else {
                    return Err(Error::new(vec![span], DanglingContinuation));
                };
                rule.words.extend(trimmed.split_whitespace().map(str::to_string));
                rule.span.end = span.end;
                continue;
            }

            let mut words = trimmed.split_whitespace();
            let lhs = words.next().unwrap_or_default();
            if lhs == "->" {
                return Err(Error::new(vec![span], MissingLeftHandSide));
            }
            if words.next() != Some("->") {
                return Err(Error::new(vec![span], MissingArrow));
            }

            if let Some(rule) = pending.take() {
                rules.push(rule.finish());
            }
            pending = Some(PendingRule {
                lhs: lhs.to_string(),
                words: words.map(str::to_string).collect(),
                span,
            });
        }

        if let Some(rule) = pending.take() {
            rules.push(rule.finish());
        }

        Grammar::new(rules)
    }
}
