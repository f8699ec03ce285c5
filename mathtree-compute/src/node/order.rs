//! The total order used to sort the addends of a sum and the factors of a product.
//!
//! Nodes are ordered first by the rank of their variant (sums lowest, numbers highest), then by a
//! variant-specific key. Two nodes compare equal exactly when they are structurally equal.

use std::cmp::Ordering;
use super::MathNode;

impl MathNode {
    /// Returns the rank of the node's variant.
    pub fn rank(&self) -> u8 {
        match self {
            MathNode::Sum(_) => 0,
            MathNode::Product(_) => 1,
            MathNode::Power { .. } => 2,
            MathNode::Logarithm { .. } => 3,
            MathNode::Trig { .. } => 4,
            MathNode::Variable(_) => 5,
            MathNode::Number(_) => 6,
        }
    }
}

impl PartialOrd for MathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (MathNode::Sum(a), MathNode::Sum(b)) => a.cmp(b),
            (MathNode::Product(a), MathNode::Product(b)) => a.numerator().cmp(b.numerator())
                .then_with(|| a.denominator().cmp(b.denominator()))
                .then_with(|| a.coefficient().cmp(&b.coefficient())),
            (
                MathNode::Power { base: a_base, exponent: a_exp },
                MathNode::Power { base: b_base, exponent: b_exp },
            ) => a_base.cmp(b_base).then_with(|| a_exp.cmp(b_exp)),
            (
                MathNode::Logarithm { base: a_base, body: a_body },
                MathNode::Logarithm { base: b_base, body: b_body },
            ) => a_base.cmp(b_base).then_with(|| a_body.cmp(b_body)),
            (
                MathNode::Trig { func: a_func, body: a_body },
                MathNode::Trig { func: b_func, body: b_body },
            ) => a_func.cmp(b_func).then_with(|| a_body.cmp(b_body)),
            (MathNode::Variable(a), MathNode::Variable(b)) => a.cmp(b),
            (MathNode::Number(a), MathNode::Number(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::node::{Constant, TrigFunc};
    use super::*;

    #[test]
    fn sort_by_rank_then_key() {
        let mut nodes = vec![
            MathNode::real(3.0),
            MathNode::constant(Constant::Pi),
            MathNode::var("y"),
            MathNode::trig(TrigFunc::Cos, MathNode::var("x")),
            MathNode::power(MathNode::var("x"), MathNode::real(2.0)),
            MathNode::var("x"),
            MathNode::real(-1.0),
            MathNode::var("a") + MathNode::var("b"),
        ];
        nodes.sort();

        assert_eq!(nodes, vec![
            MathNode::var("a") + MathNode::var("b"),
            MathNode::power(MathNode::var("x"), MathNode::real(2.0)),
            MathNode::trig(TrigFunc::Cos, MathNode::var("x")),
            MathNode::var("x"),
            MathNode::var("y"),
            MathNode::real(-1.0),
            MathNode::real(3.0),
            MathNode::constant(Constant::Pi),
        ]);
    }
}
