use ariadne::Fmt;
use mathtree_attrs::ErrorKind;
use mathtree_error::EXPR;

/// A rule line is missing the `->` separating its left-hand side from its alternatives.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "malformed grammar rule",
    labels = ["this line"],
    help = format!("rules are written as {}", "name -> symbols | symbols".fg(EXPR)),
)]
pub struct MissingArrow;

/// A rule line starts with `->`, without naming the nonterminal it defines.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "grammar rule has no left-hand side",
    labels = ["this line"],
    help = "name the nonterminal being defined before the `->`",
)]
pub struct MissingLeftHandSide;

/// A rule has an alternative with no symbols.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("rule `{}` has an empty alternative", nonterminal),
    labels = ["in this rule"],
    help = format!("write {} for an alternative deriving the empty string", "@".fg(EXPR)),
)]
pub struct EmptyAlternative {
    /// The nonterminal whose rule has the empty alternative.
    pub nonterminal: String,
}

/// A `|` continuation line appeared before any rule.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "continuation line does not belong to any rule",
    labels = ["this line"],
    help = "lines starting with `|` add alternatives to the rule above them",
)]
pub struct DanglingContinuation;

/// A nonterminal was defined by more than one rule.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("nonterminal `{}` is defined more than once", nonterminal),
    labels = ["first defined here", "defined again here"],
    help = "list every alternative in one rule, using `|` continuation lines if needed",
)]
pub struct DuplicateRule {
    /// The nonterminal defined twice.
    pub nonterminal: String,
}

/// A nonterminal was used on a right-hand side but never defined.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("nonterminal `{}` has no rule", nonterminal),
    labels = ["used in this rule"],
)]
pub struct UndefinedNonterminal {
    /// The nonterminal that was used.
    pub nonterminal: String,
}

/// A terminal was used that the tokenizer never produces.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("terminal `{}` is not produced by the tokenizer", terminal),
    labels = ["used in this rule"],
    help = format!("the tokenizer produces: {}", alphabet.join(", ")),
)]
pub struct UnknownTerminal {
    /// The terminal that was used.
    pub terminal: String,

    /// The terminal alphabet of the tokenizer.
    pub alphabet: Vec<String>,
}

/// The grammar text contained no rules.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "grammar has no rules",
    help = "add at least one rule; the first rule names the start symbol",
)]
pub struct EmptyGrammar;

/// Two alternatives of a nonterminal claimed the same predictive table cell, so the grammar is
/// not LL(1).
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "grammar is not LL(1): `{}` has two alternatives starting with `{}`",
        nonterminal,
        lookahead,
    ),
    labels = ["in this rule"],
    note = format!("alternatives {} and {} conflict", first + 1, second + 1),
)]
pub struct GrammarConflict {
    /// The nonterminal whose alternatives conflict.
    pub nonterminal: String,

    /// The lookahead terminal both alternatives claim.
    pub lookahead: String,

    /// The index of the alternative registered first.
    pub first: usize,

    /// The index of the alternative that claimed the cell again.
    pub second: usize,
}
