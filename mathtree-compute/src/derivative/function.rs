//! Derivatives of logarithms and trigonometric functions.

use crate::node::{Coefficient, MathNode, TrigFunc};
use super::{derivative, MultBuilder};

/// `(log(a)_f)' = f' / (f * ln(a))`
///
/// A base that depends on the variable is rewritten as `ln(f) / ln(a)` first.
pub(super) fn logarithm(base: &MathNode, body: &MathNode, var: &str) -> MathNode {
    if base.depends_on(var) {
        let quotient = MathNode::ln(body.clone()) / MathNode::ln(base.clone());
        return derivative(&quotient, var);
    }

    let mut product = MultBuilder::default();
    product.mult(derivative(body, var));
    product.div(body.clone());
    product.div(MathNode::ln(base.clone()));
    product.into()
}

/// `sin(f)' = f' * cos(f)`
/// `cos(f)' = -f' * sin(f)`
/// `tan(f)' = f' / cos(f)^2`
pub(super) fn trig(func: TrigFunc, body: &MathNode, var: &str) -> MathNode {
    let mut product = MultBuilder::default();
    product.mult(derivative(body, var));
    match func {
        TrigFunc::Sin => product.mult(MathNode::trig(TrigFunc::Cos, body.clone())),
        TrigFunc::Cos => {
            product.scale(Coefficient::MINUS_ONE);
            product.mult(MathNode::trig(TrigFunc::Sin, body.clone()));
        },
        TrigFunc::Tan => product.div(MathNode::power(
            MathNode::trig(TrigFunc::Cos, body.clone()),
            MathNode::real(2.0),
        )),
    }
    product.into()
}
