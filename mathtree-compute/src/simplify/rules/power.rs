//! Simplification rules for powers.

use log::trace;
use crate::{
    node::{Coefficient, MathNode},
    simplify::{simplify_with, step::Step},
    step_collector::StepCollector,
};
use super::multiply::simplify_product;

/// Returns the exponent as an `i32` if it is an integer real within range.
fn integer_exponent(exponent: &MathNode) -> Option<i32> {
    let value = exponent.as_real()?;
    (value.fract() == 0.0 && value.abs() <= i32::MAX as f64).then_some(value as i32)
}

/// Simplifies a power whose base and exponent are already simplified.
///
/// `a^0 = 1`
/// `a^1 = a`
/// `1^a = 1`
/// `2^3 = 8`
/// `a^(log(a)_b) = b`
/// `a^(-b) = 1/a^b`
/// `(a^b)^2 = a^(2*b)`
/// `(2*a)^2 = 4*a^2`
pub fn simplify_power(base: MathNode, exponent: MathNode, steps: &mut dyn StepCollector<Step>) -> MathNode {
    if exponent.is_real(0.0) {
        steps.push(Step::PowerZero);
        return MathNode::one();
    }

    if exponent.is_real(1.0) {
        steps.push(Step::PowerOne);
        return base;
    }

    if base.is_real(1.0) {
        steps.push(Step::PowerOfOne);
        return MathNode::one();
    }

    if let (Some(b), Some(e)) = (base.as_real(), exponent.as_real()) {
        let value = b.powf(e);
        if value.is_finite() && (b >= 0.0 || e.fract() == 0.0) && !(b == 0.0 && e < 0.0) {
            steps.push(Step::FoldConstant);
            return MathNode::real(value);
        }
    }

    if let MathNode::Logarithm { base: log_base, body } = &exponent {
        if **log_base == base {
            steps.push(Step::PowerOfLogarithm);
            return (**body).clone();
        }
    }

    if exponent.is_negative() {
        trace!("relocate {}^({}) below the fraction line", base, exponent);
        steps.push(Step::RelocatePower);
        let positive = simplify_with(&-exponent, steps);
        let relocated = simplify_power(base, positive, steps);
        return simplify_product(Vec::new(), vec![relocated], Coefficient::ONE, steps);
    }

    let Some(n) = integer_exponent(&exponent) else {
        return MathNode::power(base, exponent);
    };

    match base {
        MathNode::Power { base: inner, exponent: inner_exp } => {
            steps.push(Step::PowerOfPower);
            let product = simplify_product(vec![*inner_exp, exponent], Vec::new(), Coefficient::ONE, steps);
            simplify_power(*inner, product, steps)
        },
        MathNode::Product(p) if p.coefficient().powi(n).value().is_finite() => {
            steps.push(Step::PowerOfProduct);
            let (numerator, denominator, coefficient) = p.into_parts();
            let exponent = f64::from(n);
            let numerator = numerator
                .into_iter()
                .map(|factor| simplify_power(factor, MathNode::real(exponent), steps))
                .collect::<Vec<_>>();
            let denominator = denominator
                .into_iter()
                .map(|factor| simplify_power(factor, MathNode::real(exponent), steps))
                .collect::<Vec<_>>();
            simplify_product(numerator, denominator, coefficient.powi(n), steps)
        },
        base => MathNode::power(base, exponent),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::node::{Constant, Product};
    use super::*;

    fn x() -> MathNode {
        MathNode::var("x")
    }

    #[test]
    fn trivial_exponents() {
        assert_eq!(simplify_power(x(), MathNode::zero(), &mut ()), MathNode::one());
        assert_eq!(simplify_power(x(), MathNode::one(), &mut ()), x());
        assert_eq!(simplify_power(MathNode::one(), x(), &mut ()), MathNode::one());
    }

    #[test]
    fn folds_numbers() {
        assert_eq!(simplify_power(MathNode::real(2.0), MathNode::real(10.0), &mut ()), MathNode::real(1024.0));
        assert_eq!(simplify_power(MathNode::real(-8.0), MathNode::real(2.0), &mut ()), MathNode::real(64.0));

        // not real, left for the exclusions
        let root = simplify_power(MathNode::real(-8.0), MathNode::real(0.5), &mut ());
        assert_eq!(root, MathNode::power(MathNode::real(-8.0), MathNode::real(0.5)));
    }

    #[test]
    fn exponential_of_logarithm() {
        let e = MathNode::constant(Constant::E);
        assert_eq!(simplify_power(e, MathNode::ln(x()), &mut ()), x());
    }

    #[test]
    fn relocates_negative_exponent() {
        let mut steps = Vec::new();
        let node = simplify_power(x(), MathNode::real(-2.0), &mut steps);
        assert_eq!(node, MathNode::product(vec![], vec![MathNode::power(x(), MathNode::real(2.0))]));
        assert!(steps.contains(&Step::RelocatePower));

        let node = simplify_power(x(), MathNode::real(-1.0), &mut ());
        assert_eq!(node, MathNode::product(vec![], vec![x()]));
    }

    #[test]
    fn distributes_over_product() {
        let base = MathNode::Product(Product::new(vec![x()], vec![MathNode::var("y")], Coefficient::from(3.0)));
        let node = simplify_power(base, MathNode::real(2.0), &mut ());
        assert_eq!(node, MathNode::Product(Product::new(
            vec![MathNode::power(x(), MathNode::real(2.0))],
            vec![MathNode::power(MathNode::var("y"), MathNode::real(2.0))],
            Coefficient::from(9.0),
        )));
    }

    #[test]
    fn nested_powers() {
        let base = MathNode::power(x(), MathNode::var("n"));
        let node = simplify_power(base, MathNode::real(3.0), &mut ());
        assert_eq!(
            node,
            MathNode::power(x(), MathNode::scaled(Coefficient::from(3.0), MathNode::var("n"))),
        );
    }
}
