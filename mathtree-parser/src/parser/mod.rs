//! The table-driven predictive parser.
//!
//! The parser keeps an explicit stack of grammar symbols instead of recursing, so the depth of
//! the input does not affect the depth of the call stack. It never backtracks: every decision is
//! made from the top of the stack and the current token.

pub mod error;
pub mod tree;

use error::{ExpectedEof, UnexpectedEof, UnexpectedToken};
use log::trace;
use mathtree_error::Error;
use crate::{
    grammar::{ParseTable, Symbol},
    tokenizer::TokenStream,
};
pub use tree::{NodeId, NodeRef, SyntaxNode, SyntaxTree};

/// A parser for the language described by a [`ParseTable`].
///
/// The parser holds no state of its own between parses, and can be shared freely.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'table> {
    table: &'table ParseTable,
}

impl<'table> Parser<'table> {
    /// Creates a parser that uses the given tables.
    pub fn new(table: &'table ParseTable) -> Self {
        Self { table }
    }

    /// Tokenizes and parses the given source.
    pub fn parse_str(&self, source: &str) -> Result<SyntaxTree, Error> {
        self.parse(&mut TokenStream::new(source))
    }

    /// Returns the terminals that may begin the given symbol, for error messages.
    fn expected(&self, symbol: &Symbol) -> Vec<String> {
        match symbol {
            Symbol::Nonterminal(_) => self.table
                .first(symbol)
                .into_iter()
                .flatten()
                .filter(|s| **s != Symbol::Epsilon)
                .map(Symbol::to_string)
                .collect(),
            _ => vec![symbol.to_string()],
        }
    }

    /// Parses the whole token stream into a syntax tree.
    pub fn parse(&self, stream: &mut TokenStream) -> Result<SyntaxTree, Error> {
        let mut tree = SyntaxTree::new();
        let mut stack = vec![
            (Symbol::End, None),
            (Symbol::Nonterminal(self.table.start().to_string()), None),
        ];

        while let Some((top, parent)) = stack.pop() {
            let Some(token) = stream.current() else {
                // input is exhausted: only the end marker and nullable symbols may remain
                let span = stream.current_span();
                match top {
                    Symbol::End => break,
                    Symbol::Epsilon => continue,
                    Symbol::Nonterminal(_) if self.table.is_nullable(&top) => {
                        trace!("{} derives nothing at end of input", top);
                        tree.push(parent, top, None, span);
                        continue;
                    },
                    _ => {
                        return Err(Error::new(vec![span], UnexpectedEof {
                            expected: self.expected(&top),
                        }));
                    },
                }
            };

            let lookahead = Symbol::Terminal(token.terminal().to_string());
            match top {
                Symbol::Terminal(_) => {
                    if top != lookahead {
                        return Err(Error::new(vec![token.span.clone()], UnexpectedToken {
                            expected: self.expected(&top),
                            found: token.terminal().to_string(),
                            lexeme: token.lexeme.to_string(),
                        }));
                    }
                    tree.push(parent, top, Some(token.lexeme.to_string()), token.span.clone());
                    stream.advance();
                },
                Symbol::Nonterminal(ref name) => {
                    let Some(alternative) = self.table.lookup(name, &lookahead) else {
                        return Err(Error::new(vec![token.span.clone()], UnexpectedToken {
                            expected: self.expected(&top),
                            found: token.terminal().to_string(),
                            lexeme: token.lexeme.to_string(),
                        }));
                    };
                    trace!("expand {} on {}", name, lookahead);

                    let span = token.span.start..token.span.start;
                    let node = tree.push(parent, top.clone(), None, span);
                    stack.extend(
                        alternative
                            .iter()
                            .rev()
                            .filter(|symbol| **symbol != Symbol::Epsilon)
                            .map(|symbol| (symbol.clone(), Some(node))),
                    );
                },
                Symbol::End => {
                    return Err(Error::new(vec![token.span.clone()], ExpectedEof));
                },
                Symbol::Epsilon => (),
            }
        }

        if stream.has_next() {
            return Err(Error::new(vec![stream.current_span()], ExpectedEof));
        }

        tree.finish_spans();
        Ok(tree)
    }
}

/// Parses the token stream with the given tables.
pub fn parse(table: &ParseTable, stream: &mut TokenStream) -> Result<SyntaxTree, Error> {
    Parser::new(table).parse(stream)
}

#[cfg(test)]
mod tests {
    use crate::{grammar::{build_tables, Grammar}, tokenizer::TokenKind};
    use pretty_assertions::assert_eq;
    use super::*;

    fn expression_table() -> ParseTable {
        build_tables(Grammar::expression().unwrap(), TokenKind::alphabet()).unwrap()
    }

    /// Returns the terminal leaves of the tree, in source order.
    fn leaves(tree: &SyntaxTree) -> Vec<String> {
        fn visit(node: NodeRef, out: &mut Vec<String>) {
            if let Some(lexeme) = node.lexeme() {
                out.push(lexeme.to_string());
            }
            for child in node.children() {
                visit(child, out);
            }
        }

        let mut out = Vec::new();
        if let Some(root) = tree.root() {
            visit(root, &mut out);
        }
        out
    }

    #[test]
    fn parse_sum() {
        let table = expression_table();
        let tree = Parser::new(&table).parse_str("x + 2").unwrap();
        let root = tree.root().unwrap();

        assert_eq!(root.symbol(), &Symbol::Nonterminal("expr".to_string()));
        assert_eq!(root.span(), 0..5);
        assert_eq!(leaves(&tree), vec!["x", "+", "2"]);

        let children = root.children().map(|c| c.symbol().to_string()).collect::<Vec<_>>();
        assert_eq!(children, vec!["term", "expr_tail"]);
    }

    #[test]
    fn parse_nested() {
        let table = expression_table();
        let tree = Parser::new(&table)
            .parse_str("x*log(e)_(e^(x-1))/(x-1)")
            .unwrap();
        assert_eq!(
            leaves(&tree).concat(),
            "x*log(e)_(e^(x-1))/(x-1)",
        );
    }

    #[test]
    fn epsilon_nodes_are_empty() {
        let table = expression_table();
        let tree = Parser::new(&table).parse_str("y").unwrap();
        let root = tree.root().unwrap();
        let tail = root.child(1).unwrap();

        assert_eq!(tail.symbol().as_str(), "expr_tail");
        assert!(tail.is_empty());
        assert_eq!(tail.parent().map(|p| p.id()), Some(root.id()));
    }

    #[test]
    fn unexpected_token() {
        let table = expression_table();
        let err = Parser::new(&table).parse_str("x + * 2").unwrap_err();
        let kind = err.downcast_ref::<UnexpectedToken>().unwrap();

        assert_eq!(err.spans, vec![4..5]);
        assert_eq!(kind.found, "TIMES");
        assert!(kind.expected.contains(&"VAR".to_string()));
        assert!(kind.expected.contains(&"MINUS".to_string()));
    }

    #[test]
    fn mismatched_terminal() {
        let table = expression_table();
        let err = Parser::new(&table).parse_str("log(2) x").unwrap_err();
        let kind = err.downcast_ref::<UnexpectedToken>().unwrap();

        assert_eq!(kind.expected, vec!["UNDERSCORE".to_string()]);
        assert_eq!(kind.lexeme, "x");
    }

    #[test]
    fn unexpected_eof() {
        let table = expression_table();
        let err = Parser::new(&table).parse_str("(x + 1").unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnexpectedEof>(),
            Some(&UnexpectedEof { expected: vec!["RPAREN".to_string()] }),
        );
        assert_eq!(err.spans, vec![6..6]);
    }

    #[test]
    fn empty_input() {
        let table = expression_table();
        let err = Parser::new(&table).parse_str("   ").unwrap_err();
        assert!(err.is::<UnexpectedEof>());
    }

    #[test]
    fn trailing_input() {
        let table = expression_table();
        let err = Parser::new(&table).parse_str("x )").unwrap_err();
        assert!(err.is::<ExpectedEof>());
        assert_eq!(err.spans, vec![2..3]);
    }

    #[test]
    fn unknown_character() {
        let table = expression_table();
        let err = Parser::new(&table).parse_str("x # y").unwrap_err();
        assert_eq!(err.downcast_ref::<UnexpectedToken>().map(|k| k.found.as_str()), Some("SYMBOL"));
    }

    #[test]
    fn display_tree() {
        let table = expression_table();
        let tree = Parser::new(&table).parse_str("-z").unwrap();
        let text = tree.to_string();

        assert!(text.starts_with("expr\n  term\n    factor\n      prefix\n        MINUS `-`\n"), "{}", text);
    }
}
