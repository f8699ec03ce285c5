//! Symbolic differentiation.
//!
//! [`derivative`] applies the differentiation rules of each node kind without simplifying the
//! result. [`differentiate`] canonicalizes its input, differentiates it, and canonicalizes the
//! result.

mod function;

use log::debug;
use mathtree_error::Error;
use crate::{
    exclusion::ExclusionSet,
    node::{Coefficient, MathNode, Number, Product},
    simplify::{canonicalize_with, step::Step, Limits},
    step_collector::StepCollector,
};

/// Helper struct to build a product of nodes while applying basic simplification rules. If any of
/// the nodes are zero, the product is reduced to zero.
#[derive(Debug, Clone)]
struct MultBuilder {
    numerator: Vec<MathNode>,
    denominator: Vec<MathNode>,
    coefficient: Coefficient,
    zero: bool,
}

impl Default for MultBuilder {
    fn default() -> Self {
        Self {
            numerator: Vec::new(),
            denominator: Vec::new(),
            coefficient: Coefficient::ONE,
            zero: false,
        }
    }
}

impl From<MultBuilder> for MathNode {
    fn from(value: MultBuilder) -> Self {
        if value.zero {
            return MathNode::zero();
        }
        match (value.numerator.len(), value.denominator.len()) {
            (0, 0) => MathNode::real(value.coefficient.value()),
            (1, 0) if value.coefficient.is_one() => value.numerator.into_iter().next().unwrap_or_else(MathNode::one),
            _ => MathNode::Product(Product::new(value.numerator, value.denominator, value.coefficient)),
        }
    }
}

impl MultBuilder {
    /// Multiplies the product by the node.
    fn mult(&mut self, node: MathNode) {
        if self.zero {
            return;
        }
        if node.is_zero() {
            self.zero = true;
            self.numerator.clear();
            self.denominator.clear();
            return;
        }

        match node {
            MathNode::Number(Number::Real(value)) => self.coefficient = self.coefficient * Coefficient::from(value),
            other => self.numerator.push(other),
        }
    }

    /// Divides the product by the node, which must not be zero.
    fn div(&mut self, node: MathNode) {
        if self.zero || node.is_real(1.0) {
            return;
        }
        self.denominator.push(node);
    }

    /// Scales the product by the coefficient.
    fn scale(&mut self, coefficient: Coefficient) {
        if coefficient.is_zero() {
            self.mult(MathNode::zero());
        } else {
            self.coefficient = self.coefficient * coefficient;
        }
    }
}

/// Helper struct to build a summation of nodes while applying basic simplification rules. Only
/// non-zero nodes are added to the sum.
#[derive(Debug, Clone, Default)]
struct SumBuilder(Vec<MathNode>);

impl From<SumBuilder> for MathNode {
    fn from(mut value: SumBuilder) -> Self {
        match value.0.len() {
            0 => MathNode::zero(),
            1 => value.0.remove(0),
            _ => MathNode::Sum(value.0),
        }
    }
}

impl SumBuilder {
    fn add(&mut self, node: MathNode) {
        if !node.is_zero() {
            self.0.push(node);
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(addends: &[MathNode], var: &str) -> MathNode {
    let mut sum = SumBuilder::default();
    for addend in addends {
        sum.add(derivative(addend, var));
    }
    sum.into()
}

/// `(c * f * g / h)' = c * (f' * g / h + f * g' / h - f * g * h' / h^2)`
///
/// Factors that do not depend on the variable scale every term.
fn product_rule(product: &Product, var: &str) -> MathNode {
    let (const_num, num): (Vec<_>, Vec<_>) = product.numerator().iter().partition(|f| !f.depends_on(var));
    let (const_den, den): (Vec<_>, Vec<_>) = product.denominator().iter().partition(|f| !f.depends_on(var));

    let constant_part = |builder: &mut MultBuilder| {
        builder.scale(product.coefficient());
        for factor in &const_num {
            builder.mult((*factor).clone());
        }
        for factor in &const_den {
            builder.div((*factor).clone());
        }
    };

    // `c/g` uses the reciprocal rule, `(c/g)' = -c * g' / g^2`
    if num.is_empty() && den.len() == 1 {
        let mut term = MultBuilder::default();
        constant_part(&mut term);
        term.scale(Coefficient::MINUS_ONE);
        term.mult(derivative(den[0], var));
        term.div(MathNode::power(den[0].clone(), MathNode::real(2.0)));
        return term.into();
    }

    let mut outer_sum = SumBuilder::default();
    for derivative_index in 0..num.len() {
        let mut term = MultBuilder::default();
        constant_part(&mut term);
        for (index, factor) in num.iter().enumerate() {
            if index == derivative_index {
                term.mult(derivative(factor, var));
            } else {
                term.mult((*factor).clone());
            }
        }
        for factor in &den {
            term.div((*factor).clone());
        }
        outer_sum.add(term.into());
    }

    for derivative_index in 0..den.len() {
        let mut term = MultBuilder::default();
        constant_part(&mut term);
        term.scale(Coefficient::MINUS_ONE);
        for factor in &num {
            term.mult((*factor).clone());
        }
        term.mult(derivative(den[derivative_index], var));
        for factor in &den {
            term.div((*factor).clone());
        }
        term.div(den[derivative_index].clone());
        outer_sum.add(term.into());
    }

    outer_sum.into()
}

/// Returns `exponent - 1`.
fn decrement(exponent: &MathNode) -> MathNode {
    match exponent.as_real() {
        Some(value) => MathNode::real(value - 1.0),
        None => exponent.clone() + MathNode::real(-1.0),
    }
}

/// `(f^c)' = c * f^(c-1) * f'`
/// `(a^g)' = a^g * ln(a) * g'`
/// `(f^g)' = (e^(g * ln(f)))' = f^g * (g * ln(f))'`
fn power_rule(base: &MathNode, exponent: &MathNode, var: &str) -> MathNode {
    let mut product = MultBuilder::default();
    if !exponent.depends_on(var) {
        product.mult(exponent.clone());
        product.mult(MathNode::power(base.clone(), decrement(exponent)));
        product.mult(derivative(base, var));
    } else if !base.depends_on(var) {
        product.mult(MathNode::power(base.clone(), exponent.clone()));
        product.mult(MathNode::ln(base.clone()));
        product.mult(derivative(exponent, var));
    } else {
        let logarithmic = exponent.clone() * MathNode::ln(base.clone());
        product.mult(MathNode::power(base.clone(), exponent.clone()));
        product.mult(derivative(&logarithmic, var));
    }
    product.into()
}

/// Computes the derivative of the node with respect to the variable.
///
/// The result is not simplified; pass it through
/// [`canonicalize`](crate::simplify::canonicalize) or use [`differentiate`].
pub fn derivative(node: &MathNode, var: &str) -> MathNode {
    if !node.depends_on(var) {
        return MathNode::zero();
    }

    match node {
        MathNode::Sum(addends) => sum_rule(addends, var),
        MathNode::Product(p) => product_rule(p, var),
        MathNode::Power { base, exponent } => power_rule(base, exponent, var),
        MathNode::Logarithm { base, body } => function::logarithm(base, body, var),
        MathNode::Trig { func, body } => function::trig(*func, body, var),
        MathNode::Variable(name) if name == var => MathNode::one(),
        MathNode::Variable(_) | MathNode::Number(_) => MathNode::zero(),
    }
}

/// Differentiates the node with respect to the variable, returning the canonical derivative with
/// the exclusions of both the input and the derivative.
pub fn differentiate(node: &MathNode, var: &str) -> Result<(MathNode, ExclusionSet), Error> {
    differentiate_with(node, var, &Limits::default(), &mut ())
}

/// Differentiates the node within the given limits, reporting each rewrite to the step collector.
pub fn differentiate_with(
    node: &MathNode,
    var: &str,
    limits: &Limits,
    steps: &mut dyn StepCollector<Step>,
) -> Result<(MathNode, ExclusionSet), Error> {
    let (canonical, mut exclusions) = canonicalize_with(node, limits, steps)?;
    let raw = derivative(&canonical, var);
    debug!("d/d{} of {} is {}", var, canonical, raw);

    let (result, derived) = canonicalize_with(&raw, limits, steps)?;
    exclusions.extend(derived);
    Ok((result, exclusions))
}
