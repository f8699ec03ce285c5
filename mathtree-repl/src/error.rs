use ariadne::Fmt;
use mathtree_attrs::ErrorKind;
use mathtree_error::EXPR;

/// A variable binding after `;` was not of the form `name=value`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid binding `{}`", text.trim()),
    labels = ["expected `name=value`"],
    help = format!("bind variables after a semicolon: {}", "x^2 ; x=3, y=0.5".fg(EXPR)),
)]
pub struct InvalidBinding {
    /// The text of the binding.
    pub text: String,
}

/// A command-line argument could not be understood.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = format!("invalid argument `{}`: {}", argument, reason))]
pub struct InvalidArgument {
    /// The offending argument.
    pub argument: String,

    /// Why the argument was rejected.
    pub reason: String,
}
