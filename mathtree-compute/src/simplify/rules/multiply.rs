//! Simplification rules for products, including combining like factors.

use log::trace;
use crate::{
    node::{Coefficient, MathNode},
    simplify::{fraction::{Fraction, Side}, step::Step},
    step_collector::StepCollector,
};
use super::{add::simplify_sum, power::simplify_power};

/// Simplifies a product whose factors are already simplified.
///
/// `a*(b*c) = a*b*c`
/// `2*a*3 = 6*a`
/// `a/(b/c) = a*c/b`
/// `a^3/a = a^2`
/// `0*a = 0`
pub fn simplify_product(
    numerator: Vec<MathNode>,
    denominator: Vec<MathNode>,
    coefficient: Coefficient,
    steps: &mut dyn StepCollector<Step>,
) -> MathNode {
    let mut fraction = Fraction::new(coefficient);
    for factor in numerator {
        fraction.push(factor, Side::Numerator, steps);
    }
    for factor in denominator {
        fraction.push(factor, Side::Denominator, steps);
    }
    fraction.abbreviate(steps);
    fraction.into_node(steps)
}

/// Combines factors on one side of a product that share the same base, by adding their
/// exponents.
///
/// `a*a = a^2`
/// `a^2*a^b = a^(2+b)`
/// `e*e = e^2`
pub fn merge_factors(factors: Vec<MathNode>, steps: &mut dyn StepCollector<Step>) -> Vec<MathNode> {
    let mut groups: Vec<(MathNode, Vec<MathNode>)> = Vec::with_capacity(factors.len());
    let mut merged = false;

    for factor in factors {
        let (base, exponent) = factor.mul_dim();
        match groups.iter_mut().find(|(existing, _)| *existing == base) {
            Some((_, exponents)) => {
                exponents.push(exponent);
                merged = true;
            },
            None => groups.push((base, vec![exponent])),
        }
    }

    if merged {
        trace!("combined like factors into {} groups", groups.len());
        steps.push(Step::CombineLikeFactors);
    }

    groups
        .into_iter()
        .map(|(base, mut exponents)| {
            if exponents.len() == 1 {
                let exponent = exponents.remove(0);
                if exponent.is_real(1.0) {
                    base
                } else {
                    MathNode::power(base, exponent)
                }
            } else {
                let exponent = simplify_sum(exponents, steps);
                simplify_power(base, exponent, steps)
            }
        })
        .collect()
}
