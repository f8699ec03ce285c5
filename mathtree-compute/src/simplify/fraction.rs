//! Tools to help build products, which are fractions of factors.

use log::trace;
use crate::{
    node::{Coefficient, MathNode, Number, Product},
    step_collector::StepCollector,
};
use super::{rules::{add::simplify_sum, power::simplify_power}, step::Step};

/// The side of the fraction line a factor is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Numerator,
    Denominator,
}

impl Side {
    /// Returns the opposite side.
    fn flip(self) -> Self {
        match self {
            Side::Numerator => Side::Denominator,
            Side::Denominator => Side::Numerator,
        }
    }
}

/// A product under construction.
///
/// Factors are routed as they are pushed: real numbers are folded into the coefficient, and
/// nested products are flattened, with their denominators moving to the opposite side.
#[derive(Debug, Clone)]
pub(crate) struct Fraction {
    numerator: Vec<MathNode>,
    denominator: Vec<MathNode>,
    coefficient: Coefficient,

    /// Whether a zero was pushed to the denominator.
    zero_divisor: bool,
}

impl Fraction {
    /// Creates an empty fraction with the given coefficient.
    pub(crate) fn new(coefficient: Coefficient) -> Self {
        Self { numerator: Vec::new(), denominator: Vec::new(), coefficient, zero_divisor: false }
    }

    /// Adds a factor to the given side of the fraction.
    pub(crate) fn push(&mut self, factor: MathNode, side: Side, steps: &mut dyn StepCollector<Step>) {
        // a zero divisor keeps the product undefined
        if side == Side::Denominator && factor.is_zero() {
            self.zero_divisor = true;
            return;
        }

        match factor {
            MathNode::Number(Number::Real(value)) => {
                steps.push(Step::FoldCoefficient);
                self.coefficient = match side {
                    Side::Numerator => self.coefficient * Coefficient::from(value),
                    Side::Denominator => self.coefficient / Coefficient::from(value),
                };
            },
            MathNode::Product(p) => {
                let (numerator, denominator, coefficient) = p.into_parts();
                steps.push(match side {
                    Side::Denominator if !denominator.is_empty() => Step::InvertFraction,
                    _ => Step::FlattenProduct,
                });
                self.coefficient = match side {
                    Side::Numerator => self.coefficient * coefficient,
                    Side::Denominator => self.coefficient / coefficient,
                };
                for inner in numerator {
                    self.push(inner, side, steps);
                }
                for inner in denominator {
                    self.push(inner, side.flip(), steps);
                }
            },
            other => match side {
                Side::Numerator => self.numerator.push(other),
                Side::Denominator => self.denominator.push(other),
            },
        }
    }

    /// Cancels factors with the same base on both sides of the fraction line by subtracting their
    /// exponents.
    ///
    /// `a^3/a = a^2`
    /// `a/a^3 = 1/a^2`
    /// `a^b/a^c = a^(b-c)`
    pub(crate) fn abbreviate(&mut self, steps: &mut dyn StepCollector<Step>) {
        'outer: loop {
            for i in 0..self.numerator.len() {
                let (base, upper) = self.numerator[i].mul_dim();
                if base.is_zero() {
                    continue;
                }
                let Some(j) = self.denominator.iter().position(|d| d.mul_dim().0 == base) else {
                    continue;
                };

                self.numerator.remove(i);
                let (_, lower) = self.denominator.remove(j).mul_dim();
                trace!("cancel {} across the fraction line", base);
                steps.push(Step::Abbreviate);

                match (upper.as_real(), lower.as_real()) {
                    (Some(upper), Some(lower)) => {
                        let difference = upper - lower;
                        if difference > 0.0 {
                            let factor = simplify_power(base, MathNode::real(difference), steps);
                            self.push(factor, Side::Numerator, steps);
                        } else if difference < 0.0 {
                            let factor = simplify_power(base, MathNode::real(-difference), steps);
                            self.push(factor, Side::Denominator, steps);
                        }
                    },
                    _ => {
                        let exponent = simplify_sum(vec![upper, -lower], steps);
                        let factor = simplify_power(base, exponent, steps);
                        self.push(factor, Side::Numerator, steps);
                    },
                }
                continue 'outer;
            }
            break;
        }
    }

    /// Builds the node for the fraction.
    ///
    /// A coefficient of zero makes the whole product `0`. A zero divisor replaces every other
    /// divisor, leaving `numerator/0`. A scalar coefficient over a single sum is distributed over
    /// the sum's addends. A product with no factors is its coefficient, and a product of a single
    /// factor with coefficient `1` is that factor.
    pub(crate) fn into_node(mut self, steps: &mut dyn StepCollector<Step>) -> MathNode {
        if self.coefficient.is_zero() {
            steps.push(Step::MultiplyZero);
            return MathNode::zero();
        }

        if self.zero_divisor {
            trace!("dividing by zero, dropping the other divisors");
            self.denominator = vec![MathNode::zero()];
        }

        self.numerator.sort();
        self.denominator.sort();

        if self.denominator.is_empty() && !self.coefficient.is_one() {
            if let [MathNode::Sum(addends)] = self.numerator.as_slice() {
                steps.push(Step::DistributeCoefficient);
                let coefficient = self.coefficient;
                let addends = addends
                    .iter()
                    .map(|addend| {
                        let (inner, key) = addend.add_dim();
                        MathNode::from_add_dim(coefficient * inner, key)
                    })
                    .collect();
                return simplify_sum(addends, steps);
            }
        }

        match (self.numerator.len(), self.denominator.len()) {
            (0, 0) => MathNode::real(self.coefficient.value()),
            (1, 0) if self.coefficient.is_one() => self.numerator.remove(0),
            _ => MathNode::Product(Product::new(self.numerator, self.denominator, self.coefficient)),
        }
    }
}
