//! Node-local rewrite rules.
//!
//! Each rule receives the already-simplified children of a node and returns the simplified node,
//! reporting every rewrite it performs to the step collector.

pub mod add;
pub mod logarithm;
pub mod multiply;
pub mod power;
pub mod trigonometry;
