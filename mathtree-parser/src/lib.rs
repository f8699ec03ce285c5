//! Parsing for `mathtree`: a tokenizer, a plain-text grammar format, the LL(1) table builder, and
//! a table-driven predictive parser producing a raw syntax tree.
//!
//! The tables are built once and passed to every parse:
//!
//! ```
//! use mathtree_parser::{grammar::{build_tables, Grammar}, parser::Parser, tokenizer::TokenKind};
//!
//! let table = build_tables(Grammar::expression().unwrap(), TokenKind::alphabet()).unwrap();
//! let tree = Parser::new(&table).parse_str("2*x^2 - 5*x*x").unwrap();
//! assert_eq!(tree.root().unwrap().symbol().as_str(), "expr");
//! ```

pub mod grammar;
pub mod parser;
pub mod tokenizer;

use grammar::{build_tables, Grammar, ParseTable};
use mathtree_error::Error;
use tokenizer::TokenKind;

/// Builds the predictive tables of the bundled expression grammar over the tokenizer's terminal
/// alphabet.
pub fn expression_table() -> Result<ParseTable, Error> {
    build_tables(Grammar::expression()?, TokenKind::alphabet())
}
