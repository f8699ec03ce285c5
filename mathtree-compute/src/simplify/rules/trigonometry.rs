//! Simplification rules for trigonometric functions.

use crate::{
    node::{Constant, MathNode, TrigFunc},
    simplify::step::Step,
    step_collector::StepCollector,
};

/// Simplifies a trigonometric function whose body is already simplified.
///
/// `sin(0) = 0`, `cos(0) = 1`, `tan(0) = 0`
/// `sin(pi) = 0`, `cos(pi) = -1`, `tan(pi) = 0`
pub fn simplify_trig(func: TrigFunc, body: MathNode, steps: &mut dyn StepCollector<Step>) -> MathNode {
    let at_zero = body.is_zero();
    let at_pi = body == MathNode::constant(Constant::Pi);
    if !at_zero && !at_pi {
        return MathNode::trig(func, body);
    }

    steps.push(Step::TrigOfConstant);
    match (func, at_zero) {
        (TrigFunc::Sin | TrigFunc::Tan, _) => MathNode::zero(),
        (TrigFunc::Cos, true) => MathNode::one(),
        (TrigFunc::Cos, false) => MathNode::real(-1.0),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn known_angles() {
        let pi = MathNode::constant(Constant::Pi);
        assert_eq!(simplify_trig(TrigFunc::Sin, MathNode::zero(), &mut ()), MathNode::zero());
        assert_eq!(simplify_trig(TrigFunc::Cos, MathNode::zero(), &mut ()), MathNode::one());
        assert_eq!(simplify_trig(TrigFunc::Cos, pi.clone(), &mut ()), MathNode::real(-1.0));
        assert_eq!(simplify_trig(TrigFunc::Tan, pi, &mut ()), MathNode::zero());
    }

    #[test]
    fn unknown_angles() {
        let x = MathNode::var("x");
        assert_eq!(simplify_trig(TrigFunc::Sin, x.clone(), &mut ()), MathNode::trig(TrigFunc::Sin, x));
    }
}
