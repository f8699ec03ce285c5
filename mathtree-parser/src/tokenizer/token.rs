use logos::Logos;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The different kinds of tokens that can be produced by the tokenizer.
///
/// Every kind except [`TokenKind::Whitespace`] is a terminal of the parser grammar, named by
/// [`TokenKind::name`].
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Times,

    #[token("/")]
    Divide,

    #[token("^")]
    Caret,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("_")]
    Underscore,

    #[token("sin")]
    Sin,

    #[token("cos")]
    Cos,

    #[token("tan")]
    Tan,

    #[token("log")]
    Log,

    #[token("e", priority = 3)]
    #[token("pi")]
    Const,

    #[regex(r"[a-zA-Z]")]
    Var,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Every token kind that is a terminal of the parser grammar.
    pub const TERMINALS: [TokenKind; 16] = [
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Times,
        TokenKind::Divide,
        TokenKind::Caret,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::Underscore,
        TokenKind::Sin,
        TokenKind::Cos,
        TokenKind::Tan,
        TokenKind::Log,
        TokenKind::Const,
        TokenKind::Var,
        TokenKind::Number,
        TokenKind::Symbol,
    ];

    /// The name of the terminal this kind of token matches in the parser grammar.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Times => "TIMES",
            TokenKind::Divide => "DIVIDE",
            TokenKind::Caret => "CARET",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Underscore => "UNDERSCORE",
            TokenKind::Sin => "SIN",
            TokenKind::Cos => "COS",
            TokenKind::Tan => "TAN",
            TokenKind::Log => "LOG",
            TokenKind::Const => "CONST",
            TokenKind::Var => "VAR",
            TokenKind::Number => "NUMBER",
            TokenKind::Symbol => "SYMBOL",
        }
    }

    /// Returns the terminal alphabet of the tokenizer, the names of all terminal token kinds.
    pub fn alphabet() -> impl Iterator<Item = &'static str> {
        Self::TERMINALS.into_iter().map(Self::name)
    }

    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}

impl Token<'_> {
    /// Returns true if the token represents whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// The name of the grammar terminal this token matches.
    pub fn terminal(&self) -> &'static str {
        self.kind.name()
    }
}
