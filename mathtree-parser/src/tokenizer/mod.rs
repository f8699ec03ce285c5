pub mod token;

use logos::{Lexer, Logos};
use std::ops::Range;
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer, including
/// whitespace. Characters the tokenizer cannot classify become [`TokenKind::Symbol`] tokens.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

/// A fixed-length stream of non-whitespace tokens with a cursor, read by the table-driven parser.
#[derive(Debug, Clone)]
pub struct TokenStream<'source> {
    /// The tokens in the stream, with whitespace removed.
    tokens: Box<[Token<'source>]>,

    /// The index of the current token.
    cursor: usize,

    /// The length of the source the tokens were produced from.
    source_len: usize,
}

impl<'source> TokenStream<'source> {
    /// Tokenizes the given source into a stream, dropping whitespace.
    pub fn new(source: &'source str) -> Self {
        let tokens = tokenize_complete(source)
            .into_vec()
            .into_iter()
            .filter(|token| !token.is_whitespace())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { tokens, cursor: 0, source_len: source.len() }
    }

    /// Returns the current token, or [`None`] if the stream is exhausted.
    pub fn current(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Moves the cursor past the current token and returns it.
    pub fn advance(&mut self) -> Option<&Token<'source>> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// Returns true if there is input remaining in the stream.
    pub fn has_next(&self) -> bool {
        self.cursor < self.tokens.len()
    }

    /// Returns true if every token in the stream has been consumed.
    pub fn is_end(&self) -> bool {
        !self.has_next()
    }

    /// Returns the span of the current token, or an empty span at the end of the source if the
    /// stream is exhausted.
    pub fn current_span(&self) -> Range<usize> {
        self.current()
            .map(|token| token.span.clone())
            .unwrap_or(self.source_len..self.source_len)
    }

    /// Returns the number of non-whitespace tokens in the stream.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the stream contains no tokens at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "2*x^2 - 5",
            [
                (TokenKind::Number, "2"),
                (TokenKind::Times, "*"),
                (TokenKind::Var, "x"),
                (TokenKind::Caret, "^"),
                (TokenKind::Number, "2"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Minus, "-"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "5"),
            ],
        );
    }

    #[test]
    fn keywords_over_variables() {
        compare_tokens(
            "sinx + log(e)_pi",
            [
                (TokenKind::Sin, "sin"),
                (TokenKind::Var, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Plus, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Log, "log"),
                (TokenKind::LParen, "("),
                (TokenKind::Const, "e"),
                (TokenKind::RParen, ")"),
                (TokenKind::Underscore, "_"),
                (TokenKind::Const, "pi"),
            ],
        );
    }

    #[test]
    fn decimals_and_symbols() {
        compare_tokens(
            "3.25 # y",
            [
                (TokenKind::Number, "3.25"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "#"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Var, "y"),
            ],
        );
    }

    #[test]
    fn stream_skips_whitespace() {
        let mut stream = TokenStream::new("x  +\t1");
        assert_eq!(stream.len(), 3);
        assert!(stream.has_next());

        assert_eq!(stream.advance().map(|t| t.kind), Some(TokenKind::Var));
        assert_eq!(stream.current().map(|t| t.lexeme), Some("+"));
        stream.advance();
        assert_eq!(stream.advance().map(|t| t.span.clone()), Some(5..6));

        assert!(stream.is_end());
        assert_eq!(stream.current(), None);
        assert_eq!(stream.current_span(), 6..6);
    }

    #[test]
    fn alphabet_names() {
        let alphabet = TokenKind::alphabet().collect::<Vec<_>>();
        assert_eq!(alphabet.len(), 16);
        assert!(alphabet.contains(&"UNDERSCORE"));
        assert!(!alphabet.contains(&"WHITESPACE"));
    }
}
