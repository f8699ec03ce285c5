//! FIRST and FOLLOW sets, and the LL(1) predictive table derived from them.

use log::{debug, warn};
use mathtree_error::Error;
use std::collections::{BTreeSet, HashMap};
use super::{
    error::{GrammarConflict, UnknownTerminal},
    Grammar,
    Symbol,
};

/// A set of terminals, possibly including [`Symbol::Epsilon`] and [`Symbol::End`].
pub type SymbolSet = BTreeSet<Symbol>;

/// The predictive parsing tables of an LL(1) grammar.
///
/// The tables are built once by [`build_tables`] and are read-only afterwards; any number of
/// parses can share them.
#[derive(Debug, Clone)]
pub struct ParseTable {
    /// The grammar the tables were built from.
    grammar: Grammar,

    /// The FIRST set of every symbol in the grammar.
    first: HashMap<Symbol, SymbolSet>,

    /// The FOLLOW set of every symbol in the grammar.
    follow: HashMap<Symbol, SymbolSet>,

    /// Maps a nonterminal and a lookahead terminal to the index of the alternative to expand.
    table: HashMap<(String, Symbol), usize>,
}

impl ParseTable {
    /// Returns the grammar the tables were built from.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Returns the start symbol of the grammar.
    pub fn start(&self) -> &str {
        self.grammar.start()
    }

    /// Returns the FIRST set of the given symbol.
    pub fn first(&self, symbol: &Symbol) -> Option<&SymbolSet> {
        self.first.get(symbol)
    }

    /// Returns the FOLLOW set of the given symbol.
    pub fn follow(&self, symbol: &Symbol) -> Option<&SymbolSet> {
        self.follow.get(symbol)
    }

    /// Returns the FIRST set of a sequence of symbols.
    pub fn first_of_sequence(&self, sequence: &[Symbol]) -> SymbolSet {
        first_of_sequence(&self.first, sequence)
    }

    /// Returns true if the given symbol can derive the empty string.
    pub fn is_nullable(&self, symbol: &Symbol) -> bool {
        self.first(symbol).is_some_and(|set| set.contains(&Symbol::Epsilon))
    }

    /// Returns the alternative to expand for the given nonterminal when the next input symbol is
    /// `lookahead`.
    pub fn lookup(&self, nonterminal: &str, lookahead: &Symbol) -> Option<&[Symbol]> {
        let index = *self.table.get(&(nonterminal.to_string(), lookahead.clone()))?;
        self.grammar
            .rule(nonterminal)
            .and_then(|rule| rule.alternatives.get(index))
            .map(Vec::as_slice)
    }

    /// Returns the number of filled cells in the predictive table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the predictive table has no filled cells.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Computes the FIRST set of a sequence of symbols from the FIRST sets of its symbols.
///
/// The set contains [`Symbol::Epsilon`] only if every symbol of the sequence is nullable, which
/// includes the empty sequence.
fn first_of_sequence(first: &HashMap<Symbol, SymbolSet>, sequence: &[Symbol]) -> SymbolSet {
    let mut result = SymbolSet::new();
    for symbol in sequence {
        let Some(set) = first.get(symbol) else {
            return result;
        };
        result.extend(set.iter().filter(|s| **s != Symbol::Epsilon).cloned());
        if !set.contains(&Symbol::Epsilon) {
            return result;
        }
    }
    result.insert(Symbol::Epsilon);
    result
}

/// Computes the FIRST set of every symbol by iterating to a fixed point.
fn compute_first(grammar: &Grammar, terminals: &BTreeSet<String>) -> HashMap<Symbol, SymbolSet> {
    let mut first = HashMap::new();
    for terminal in terminals {
        let symbol = Symbol::Terminal(terminal.clone());
        first.insert(symbol.clone(), SymbolSet::from([symbol]));
    }
    first.insert(Symbol::Epsilon, SymbolSet::from([Symbol::Epsilon]));
    first.insert(Symbol::End, SymbolSet::from([Symbol::End]));
    for rule in grammar.rules() {
        first.insert(Symbol::Nonterminal(rule.lhs.clone()), SymbolSet::new());
    }

    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.rules() {
            let lhs = Symbol::Nonterminal(rule.lhs.clone());
            for alternative in &rule.alternatives {
                let set = first_of_sequence(&first, alternative);
                let entry = first.entry(lhs.clone()).or_default();
                let before = entry.len();
                entry.extend(set);
                changed |= entry.len() != before;
            }
        }
    }

    first
}

/// Computes the FOLLOW set of every symbol by iterating to a fixed point. The FOLLOW set of the
/// start symbol is seeded with [`Symbol::End`], and a terminal follows only itself.
fn compute_follow(grammar: &Grammar, first: &HashMap<Symbol, SymbolSet>) -> HashMap<Symbol, SymbolSet> {
    let mut follow: HashMap<Symbol, SymbolSet> = HashMap::new();
    for symbol in first.keys() {
        match symbol {
            Symbol::Terminal(_) => {
                follow.insert(symbol.clone(), SymbolSet::from([symbol.clone()]));
            },
            Symbol::Nonterminal(_) => {
                follow.insert(symbol.clone(), SymbolSet::new());
            },
            Symbol::Epsilon | Symbol::End => (),
        }
    }
    follow
        .entry(Symbol::Nonterminal(grammar.start().to_string()))
        .or_default()
        .insert(Symbol::End);

    let mut changed = true;
    while changed {
        changed = false;
        for rule in grammar.rules() {
            let lhs = Symbol::Nonterminal(rule.lhs.clone());
            for alternative in &rule.alternatives {
                for (i, symbol) in alternative.iter().enumerate() {
                    if !symbol.is_nonterminal() {
                        continue;
                    }

                    let rest = first_of_sequence(first, &alternative[i + 1..]);
                    let mut additions = rest
                        .iter()
                        .filter(|s| **s != Symbol::Epsilon)
                        .cloned()
                        .collect::<SymbolSet>();
                    if rest.contains(&Symbol::Epsilon) {
                        additions.extend(follow.get(&lhs).into_iter().flatten().cloned());
                    }

                    let entry = follow.entry(symbol.clone()).or_default();
                    let before = entry.len();
                    entry.extend(additions);
                    changed |= entry.len() != before;
                }
            }
        }
    }

    follow
}

/// Builds the FIRST sets, FOLLOW sets, and predictive table of the given grammar.
///
/// `terminals` is the terminal alphabet of the tokenizer; a grammar using any other terminal is
/// rejected. A grammar whose alternatives claim the same table cell is not LL(1) and is rejected
/// with a [`GrammarConflict`].
pub fn build_tables<I, T>(grammar: Grammar, terminals: I) -> Result<ParseTable, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let terminals = terminals.into_iter().map(Into::into).collect::<BTreeSet<String>>();

    for (rule, symbol) in grammar.symbols() {
        if let Symbol::Terminal(name) = symbol {
            if !terminals.contains(name) {
                return Err(Error::new(vec![rule.span.clone()], UnknownTerminal {
                    terminal: name.clone(),
                    alphabet: terminals.iter().cloned().collect(),
                }));
            }
        }
    }

    let first = compute_first(&grammar, &terminals);
    let follow = compute_follow(&grammar, &first);

    let mut table = HashMap::new();
    for rule in grammar.rules() {
        let lhs = Symbol::Nonterminal(rule.lhs.clone());
        for (index, alternative) in rule.alternatives.iter().enumerate() {
            let mut lookahead = first_of_sequence(&first, alternative);
            if lookahead.remove(&Symbol::Epsilon) {
                lookahead.extend(follow.get(&lhs).into_iter().flatten().cloned());
            }

            for terminal in lookahead {
                let key = (rule.lhs.clone(), terminal);
                if let Some(&existing) = table.get(&key) {
                    if existing != index {
                        warn!("conflict in `{}` on `{}`: alternatives {} and {}", rule.lhs, key.1, existing, index);
                        return Err(Error::new(vec![rule.span.clone()], GrammarConflict {
                            nonterminal: rule.lhs.clone(),
                            lookahead: key.1.to_string(),
                            first: existing,
                            second: index,
                        }));
                    }
                }
                table.insert(key, index);
            }
        }
    }

    debug!(
        "built predictive table: {} rules, {} terminals, {} cells",
        grammar.rules().len(),
        terminals.len(),
        table.len(),
    );

    Ok(ParseTable { grammar, first, follow, table })
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::TokenKind;
    use pretty_assertions::assert_eq;
    use super::*;

    fn set(words: &[&str]) -> SymbolSet {
        words.iter().map(|word| Symbol::classify(word)).collect()
    }

    fn nt(name: &str) -> Symbol {
        Symbol::Nonterminal(name.to_string())
    }

    fn expression_table() -> ParseTable {
        build_tables(Grammar::expression().unwrap(), TokenKind::alphabet()).unwrap()
    }

    #[test]
    fn first_sets() {
        let table = expression_table();
        let operand = set(&["LPAREN", "SIN", "COS", "TAN", "LOG", "VAR", "NUMBER", "CONST"]);

        let mut factor = operand.clone();
        factor.insert(Symbol::classify("MINUS"));
        assert_eq!(table.first(&nt("expr")), Some(&factor));
        assert_eq!(table.first(&nt("body")), Some(&operand));
        assert_eq!(table.first(&nt("expr_tail")), Some(&set(&["PLUS", "MINUS", "@"])));
        assert_eq!(table.first(&nt("prefix")), Some(&set(&["MINUS", "@"])));
        assert!(table.is_nullable(&nt("term_tail")));
        assert!(!table.is_nullable(&nt("term")));
    }

    #[test]
    fn follow_sets() {
        let table = expression_table();

        assert_eq!(table.follow(&nt("expr")), Some(&set(&["$", "RPAREN"])));
        assert_eq!(table.follow(&nt("term")), Some(&set(&["$", "RPAREN", "PLUS", "MINUS"])));
        assert_eq!(
            table.follow(&nt("body")),
            Some(&set(&["$", "RPAREN", "PLUS", "MINUS", "TIMES", "DIVIDE"])),
        );
        assert_eq!(
            table.follow(&nt("funbody")),
            Some(&set(&["$", "RPAREN", "PLUS", "MINUS", "TIMES", "DIVIDE", "CARET", "UNDERSCORE"])),
        );
        assert_eq!(table.follow(&Symbol::classify("PLUS")), Some(&set(&["PLUS"])));
    }

    #[test]
    fn first_of_sequences() {
        let table = expression_table();
        assert_eq!(table.first_of_sequence(&[]), set(&["@"]));
        assert_eq!(
            table.first_of_sequence(&[nt("prefix"), Symbol::classify("CARET")]),
            set(&["MINUS", "CARET"]),
        );
    }

    #[test]
    fn table_entries() {
        let table = expression_table();

        assert_eq!(
            table.lookup("expr_tail", &Symbol::classify("PLUS")),
            Some(&[nt("addop"), nt("term"), nt("expr_tail")][..]),
        );
        assert_eq!(table.lookup("expr_tail", &Symbol::End), Some(&[Symbol::Epsilon][..]));
        assert_eq!(table.lookup("body_tail", &Symbol::classify("RPAREN")), Some(&[Symbol::Epsilon][..]));
        assert_eq!(table.lookup("expo", &Symbol::classify("VAR")), Some(&[nt("var")][..]));
        assert_eq!(table.lookup("expr", &Symbol::classify("PLUS")), None);
        assert_eq!(table.lookup("expr", &Symbol::classify("SYMBOL")), None);
    }

    #[test]
    fn reject_conflict() {
        let grammar = "s -> VAR PLUS | VAR MINUS".parse::<Grammar>().unwrap();
        let err = build_tables(grammar, TokenKind::alphabet()).unwrap_err();
        assert_eq!(err.downcast_ref::<GrammarConflict>(), Some(&GrammarConflict {
            nonterminal: "s".to_string(),
            lookahead: "VAR".to_string(),
            first: 0,
            second: 1,
        }));
    }

    #[test]
    fn reject_unknown_terminal() {
        let grammar = "s -> COMMA".parse::<Grammar>().unwrap();
        let err = build_tables(grammar, ["VAR"]).unwrap_err();
        assert_eq!(err.downcast_ref::<UnknownTerminal>().map(|k| k.terminal.as_str()), Some("COMMA"));
    }

    #[test]
    fn nullable_chain() {
        // `a` is nullable only through `b` and `c`
        let grammar = "
            s -> a VAR
            a -> b c
            b -> PLUS | @
            c -> MINUS | @
        ".parse::<Grammar>().unwrap();
        let table = build_tables(grammar, TokenKind::alphabet()).unwrap();

        assert_eq!(table.first(&nt("a")), Some(&set(&["PLUS", "MINUS", "@"])));
        assert_eq!(table.follow(&nt("b")), Some(&set(&["MINUS", "VAR"])));
        assert_eq!(table.lookup("a", &Symbol::classify("VAR")), Some(&[nt("b"), nt("c")][..]));
    }
}
