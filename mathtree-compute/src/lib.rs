//! Symbolic algebra over single-variable-friendly expression trees.
//!
//! Source text is parsed with the tables from [`mathtree_parser`], folded into a [`MathNode`] by
//! [`build`], and brought to a canonical form by [`canonicalize`]. Canonicalization also reports
//! an [`ExclusionSet`]: the points at which the original expression is undefined, which
//! simplification may have hidden (`x/x` becomes `1`, but is still undefined at `x = 0`).
//!
//! ```
//! use mathtree_compute::{build::parse_expression, canonicalize, differentiate};
//!
//! let table = mathtree_parser::expression_table().unwrap();
//! let node = parse_expression(&table, "2*x^2 - 5*x*x").unwrap();
//!
//! let (canonical, exclusions) = canonicalize(&node).unwrap();
//! assert_eq!(canonical.to_string(), "-3*x^2");
//! assert!(exclusions.is_empty());
//!
//! let (derivative, _) = differentiate(&node, "x").unwrap();
//! assert_eq!(derivative.to_string(), "-6*x");
//! ```

pub mod build;
pub mod derivative;
pub mod error;
pub mod exclusion;
pub mod node;
pub mod numerical;
pub mod simplify;
pub mod step_collector;

pub use derivative::{derivative, differentiate};
pub use exclusion::ExclusionSet;
pub use node::MathNode;
pub use numerical::{evaluate, Ctxt};
pub use simplify::{canonicalize, Limits};
pub use step_collector::StepCollector;

#[cfg(test)]
pub(crate) mod test_support {
    use mathtree_parser::grammar::ParseTable;
    use once_cell::sync::Lazy;

    /// The tables of the bundled grammar, built once for every test.
    pub static TABLE: Lazy<ParseTable> = Lazy::new(|| mathtree_parser::expression_table().unwrap());
}
