use ariadne::Fmt;
use mathtree_attrs::ErrorKind;
use mathtree_error::EXPR;

/// Formats a list of expected terminals for display in a label.
fn one_of(expected: &[String]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [single] => format!("`{}`", single),
        _ => format!(
            "one of: {}",
            expected.iter().map(|t| format!("`{}`", t)).collect::<Vec<_>>().join(", "),
        ),
    }
}

/// The end of the input was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("expected {} here", one_of(expected))],
    help = format!("you might need to add another {}", "expression".fg(EXPR)),
)]
pub struct UnexpectedEof {
    /// The terminals that could have continued the input.
    pub expected: Vec<String>,
}

/// The end of the input was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected token `{}`", lexeme),
    labels = [format!("expected {}", one_of(expected))],
    help = format!("found {}", found),
)]
pub struct UnexpectedToken {
    /// The terminals that were expected.
    pub expected: Vec<String>,

    /// The terminal that was found.
    pub found: String,

    /// The text of the token that was found.
    pub lexeme: String,
}
