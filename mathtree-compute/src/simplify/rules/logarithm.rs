//! Simplification rules for logarithms.

use crate::{
    node::MathNode,
    simplify::step::Step,
    step_collector::StepCollector,
};

/// Results this close to an integer are rounded to it, so that `log(2)_8` is exactly `3`.
const ROUNDING_TOLERANCE: f64 = 1e-12;

/// Simplifies a logarithm whose base and body are already simplified.
///
/// `log(a)_a = 1`
/// `log(a)_1 = 0`
/// `log(a)_(a^b) = b`
/// `log(2)_8 = 3`
///
/// The base is never rejected here; an invalid base is reported by the logarithm's exclusions.
pub fn simplify_logarithm(base: MathNode, body: MathNode, steps: &mut dyn StepCollector<Step>) -> MathNode {
    if body == base {
        steps.push(Step::LogarithmOfBase);
        return MathNode::one();
    }

    if body.is_real(1.0) {
        steps.push(Step::LogarithmOfOne);
        return MathNode::zero();
    }

    if let MathNode::Power { base: power_base, exponent } = &body {
        if **power_base == base {
            steps.push(Step::LogarithmOfPower);
            return (**exponent).clone();
        }
    }

    if let (Some(a), Some(x)) = (base.as_real(), body.as_real()) {
        if a > 0.0 && a != 1.0 && x > 0.0 {
            let value = x.ln() / a.ln();
            let rounded = value.round();
            steps.push(Step::FoldConstant);
            return if (value - rounded).abs() < ROUNDING_TOLERANCE {
                MathNode::real(rounded)
            } else {
                MathNode::real(value)
            };
        }
    }

    MathNode::log(base, body)
}
