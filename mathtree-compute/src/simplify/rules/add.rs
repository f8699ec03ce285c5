//! Simplification rules for sums, including combining like terms.

use log::trace;
use crate::{
    node::{Coefficient, MathNode},
    simplify::step::Step,
    step_collector::StepCollector,
};

/// Simplifies a sum whose addends are already simplified.
///
/// `a+(b+c) = a+b+c`
/// `1+2+a = a+3`
/// `a+0 = a`
///
/// The addends of the result are sorted. A sum left with no addends is `0`, and a sum of one
/// addend is that addend.
pub fn simplify_sum(addends: Vec<MathNode>, steps: &mut dyn StepCollector<Step>) -> MathNode {
    let mut flat = Vec::with_capacity(addends.len());
    for addend in addends {
        match addend {
            MathNode::Sum(inner) => {
                steps.push(Step::FlattenSum);
                flat.extend(inner);
            },
            other => flat.push(other),
        }
    }

    let mut reals = Vec::new();
    let mut rest = Vec::with_capacity(flat.len());
    for addend in flat {
        match addend.as_real() {
            Some(value) => reals.push(value),
            None => rest.push(addend),
        }
    }

    if reals.len() > 1 {
        steps.push(Step::FoldConstant);
    }
    reals.sort_by(f64::total_cmp);
    let constant = reals.iter().sum::<f64>();

    let before = rest.len();
    rest.retain(|addend| !addend.is_zero());
    if rest.len() != before || (!reals.is_empty() && constant == 0.0) {
        steps.push(Step::AddZero);
    }
    if constant != 0.0 || constant.is_nan() {
        rest.push(MathNode::real(constant));
    }
    rest.sort();

    match rest.len() {
        0 => MathNode::zero(),
        1 => rest.remove(0),
        _ => MathNode::Sum(rest),
    }
}

/// Combines addends that share the same addition key, by adding their coefficients.
///
/// `2*a+3*a = 5*a`
/// `a-a = 0`
pub fn merge_addends(addends: Vec<MathNode>, steps: &mut dyn StepCollector<Step>) -> Vec<MathNode> {
    let mut groups: Vec<(Coefficient, MathNode)> = Vec::with_capacity(addends.len());
    let mut merged = false;

    for addend in addends {
        let (coefficient, key) = addend.add_dim();
        match groups.iter_mut().find(|(_, existing)| *existing == key) {
            Some((total, _)) => {
                *total = *total + coefficient;
                merged = true;
            },
            None => groups.push((coefficient, key)),
        }
    }

    if merged {
        trace!("combined like terms into {} groups", groups.len());
        steps.push(Step::CombineLikeTerms);
    }

    groups
        .into_iter()
        .map(|(coefficient, key)| MathNode::from_add_dim(coefficient, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn folds_and_sorts() {
        let mut steps = Vec::new();
        let sum = simplify_sum(
            vec![MathNode::real(2.0), MathNode::var("y") + MathNode::real(-2.0), MathNode::var("x")],
            &mut steps,
        );
        assert_eq!(sum, MathNode::Sum(vec![MathNode::var("x"), MathNode::var("y")]));
        assert!(steps.contains(&Step::FlattenSum));
        assert!(steps.contains(&Step::FoldConstant));
    }

    #[test]
    fn collapses_to_identity() {
        assert_eq!(simplify_sum(vec![], &mut ()), MathNode::zero());
        assert_eq!(simplify_sum(vec![MathNode::real(0.0), MathNode::var("a")], &mut ()), MathNode::var("a"));
    }

    #[test]
    fn merges_like_terms() {
        let a = MathNode::var("a");
        let merged = merge_addends(vec![
            MathNode::scaled(Coefficient::from(2.0), a.clone()),
            MathNode::real(1.0),
            MathNode::scaled(Coefficient::from(3.0), a.clone()),
            MathNode::real(4.0),
        ], &mut ());
        assert_eq!(merged, vec![MathNode::scaled(Coefficient::from(5.0), a), MathNode::real(5.0)]);
    }

    #[test]
    fn cancels_opposites() {
        let a = MathNode::var("a");
        let merged = merge_addends(vec![a.clone(), -a], &mut ());
        assert_eq!(merged, vec![MathNode::zero()]);
    }
}
