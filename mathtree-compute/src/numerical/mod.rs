//! Numerical evaluation.

pub mod ctxt;
pub mod eval;

pub use ctxt::Ctxt;
pub use eval::{evaluate, evaluate_checked};
