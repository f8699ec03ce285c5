use ariadne::Fmt;
use mathtree_attrs::ErrorKind;
use mathtree_error::EXPR;

/// A variable was used during evaluation without a value bound to it.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown variable `{}`", name),
    labels = ["this variable"],
    help = if suggestions.is_empty() {
        format!("bind a value to {} before evaluating", name.fg(EXPR))
    } else {
        format!("did you mean: {}", suggestions.join(", "))
    },
)]
pub struct UnboundVariable {
    /// The name of the variable.
    pub name: String,

    /// Bound variables with a similar name.
    pub suggestions: Vec<String>,
}

/// An expression grew past the node limit while being canonicalized.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is too large to simplify",
    labels = ["this expression"],
    help = format!("the expression reached {} nodes, over the limit of {}", found, limit),
)]
pub struct NodeLimitExceeded {
    /// The configured node limit.
    pub limit: usize,

    /// The size the expression reached.
    pub found: usize,
}

/// An expression is nested deeper than the depth limit.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression is nested too deeply",
    labels = ["this subexpression"],
    help = format!("expressions may be nested at most {} levels deep", limit),
)]
pub struct DepthLimitExceeded {
    /// The configured depth limit.
    pub limit: usize,
}

/// Canonicalization did not settle on a fixed point within the round limit.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expression did not settle on a canonical form",
    labels = ["this expression"],
    note = format!("gave up after {} rounds", rounds),
)]
pub struct RoundLimitExceeded {
    /// The number of rounds performed.
    pub rounds: usize,
}

/// The syntax tree had a shape the tree builder does not understand. This happens when the
/// tables were built from a grammar other than the bundled one.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot build an expression from `{}`", symbol),
    labels = ["this part of the input"],
    help = "the grammar must use the nonterminal names of the bundled expression grammar",
)]
pub struct UnexpectedSyntax {
    /// The grammar symbol of the offending syntax node.
    pub symbol: String,
}

/// A numeric literal could not be read as a number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number `{}`", lexeme),
    labels = ["this literal"],
)]
pub struct InvalidNumber {
    /// The text of the literal.
    pub lexeme: String,
}
