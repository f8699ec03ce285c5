//! Domain exclusions: the points where an expression is undefined.
//!
//! An [`ExclusionSet`] is a disjunction of clause groups, and each group is a conjunction of
//! [`Clause`]s. An expression is undefined at a point if every clause of any one group holds
//! there. A group with no clauses holds everywhere.
//!
//! Each node contributes groups according to its kind:
//!
//! - every denominator factor `d` of a product: `d == 0`
//! - a power `f^g`: `f < 0 and g mod 1 != 0`
//! - a logarithm `log(a)_f`: `a <= 0`, `a == 1`, and `f <= 0`, as three groups
//! - a tangent `tan(f)`: `(f - pi/2) mod pi == 0`

use log::trace;
use mathtree_error::Error;
use std::fmt;
use crate::{
    node::{Coefficient, Constant, MathNode, Number, Product, TrigFunc},
    numerical::{ctxt::Ctxt, eval::evaluate},
    simplify::{canonical_form, Limits},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Results of a modulus this close to the threshold (or to the modulus itself) are treated as
/// equal to it.
const MODULUS_TOLERANCE: f64 = 1e-9;

/// The comparison a [`Clause`] makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
}

impl Comparator {
    /// Returns the symbol of the comparator.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
        }
    }
}

/// A single condition, `operand [mod modulus] comparator threshold`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Clause {
    /// The expression being compared.
    pub operand: MathNode,

    /// If present, the operand is reduced modulo this number before comparing.
    pub modulus: Option<Number>,

    /// The comparison to make.
    pub comparator: Comparator,

    /// The value the operand is compared with.
    pub threshold: Number,
}

impl Clause {
    /// Creates the clause `operand comparator threshold`.
    pub fn new(operand: MathNode, comparator: Comparator, threshold: f64) -> Self {
        Self { operand, modulus: None, comparator, threshold: Number::real(threshold) }
    }

    /// Creates the clause `operand mod modulus comparator threshold`.
    pub fn modulo(operand: MathNode, modulus: Number, comparator: Comparator, threshold: f64) -> Self {
        Self { operand, modulus: Some(modulus), comparator, threshold: Number::real(threshold) }
    }

    /// Compares an evaluated operand. A NaN operand satisfies no comparison.
    fn test(&self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let threshold = self.threshold.value();

        match self.modulus {
            Some(modulus) => {
                let modulus = modulus.value();
                let rem = value.rem_euclid(modulus);
                let on_threshold = (rem - threshold).abs() < MODULUS_TOLERANCE
                    || (rem - modulus - threshold).abs() < MODULUS_TOLERANCE;
                match self.comparator {
                    Comparator::Eq => on_threshold,
                    Comparator::Ne => !on_threshold,
                    Comparator::Lt => rem < threshold,
                    Comparator::Le => rem <= threshold,
                }
            },
            None => match self.comparator {
                Comparator::Eq => value == threshold,
                Comparator::Ne => value != threshold,
                Comparator::Lt => value < threshold,
                Comparator::Le => value <= threshold,
            },
        }
    }

    /// Returns true if the clause holds with the variable values in the context.
    pub fn holds(&self, ctxt: &Ctxt) -> Result<bool, Error> {
        Ok(self.test(evaluate(&self.operand, ctxt)?))
    }

    /// Returns whether the clause holds, if the operand has no variables and evaluates to a
    /// number.
    pub fn constant_truth(&self) -> Option<bool> {
        if !self.operand.variables().is_empty() {
            return None;
        }
        let value = evaluate(&self.operand, &Ctxt::new()).ok()?;
        (!value.is_nan()).then(|| self.test(value))
    }

    /// Canonicalizes the operand, then strips factors that cannot change whether it is zero.
    ///
    /// `x^2 == 0` becomes `x == 0`, and `3*x == 0` becomes `x == 0`.
    pub fn tidy(self, limits: &Limits) -> Result<Self, Error> {
        let mut operand = canonical_form(&self.operand, limits)?;
        let zero_test = self.modulus.is_none()
            && self.threshold == Number::real(0.0)
            && matches!(self.comparator, Comparator::Eq | Comparator::Ne);

        while zero_test {
            match &operand {
                MathNode::Power { base, exponent } if exponent.as_real().is_some_and(|n| n > 0.0) => {
                    operand = (**base).clone();
                },
                MathNode::Product(p) if p.denominator().is_empty() && p.numerator().len() == 1 => {
                    operand = p.numerator()[0].clone();
                },
                _ => break,
            }
        }

        Ok(Self { operand, ..self })
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modulus {
            Some(modulus) => {
                if matches!(self.operand, MathNode::Sum(_) | MathNode::Product(_)) {
                    write!(f, "({}) mod {}", self.operand, modulus)?;
                } else {
                    write!(f, "{} mod {}", self.operand, modulus)?;
                }
            },
            None => write!(f, "{}", self.operand)?,
        }
        write!(f, " {} {}", self.comparator.symbol(), self.threshold)
    }
}

/// The set of points where an expression is undefined, as an OR of AND-groups of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExclusionSet {
    groups: Vec<Vec<Clause>>,
}

/// Returns the clause matching the poles of `tan(body)`.
///
/// The excluded set is `body = pi/2 + k*pi` for every integer `k`, written as
/// `(body - pi/2) mod pi == 0`. The zeros of `tan` at `body = k*pi` are not excluded.
fn tan_poles(body: &MathNode) -> Clause {
    let half_pi = MathNode::Product(Product::new(
        vec![MathNode::constant(Constant::Pi)],
        Vec::new(),
        Coefficient::new(-1.0, 2.0),
    ));
    Clause::modulo(body.clone() + half_pi, Number::Const(Constant::Pi), Comparator::Eq, 0.0)
}

impl ExclusionSet {
    /// Creates an empty set, excluding nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the clause groups.
    pub fn groups(&self) -> &[Vec<Clause>] {
        &self.groups
    }

    /// Returns true if the set excludes nothing.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns true if the set contains a group with no clauses, which excludes every point.
    pub fn excludes_everything(&self) -> bool {
        self.groups.iter().any(Vec::is_empty)
    }

    /// Adds a group of clauses, unless an equal group is already present.
    pub fn push_group(&mut self, mut group: Vec<Clause>) {
        group.sort();
        group.dedup();
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
    }

    /// Adds every group of the other set.
    pub fn extend(&mut self, other: ExclusionSet) {
        for group in other.groups {
            self.push_group(group);
        }
    }

    /// Collects the groups contributed by every node of the tree.
    pub fn collect(node: &MathNode) -> Self {
        let mut set = Self::new();
        for node in node.post_order_iter() {
            match node {
                MathNode::Product(p) => {
                    for factor in p.denominator() {
                        set.push_group(vec![Clause::new(factor.clone(), Comparator::Eq, 0.0)]);
                    }
                },
                MathNode::Power { base, exponent } => set.push_group(vec![
                    Clause::new((**base).clone(), Comparator::Lt, 0.0),
                    Clause::modulo((**exponent).clone(), Number::real(1.0), Comparator::Ne, 0.0),
                ]),
                MathNode::Logarithm { base, body } => {
                    set.push_group(vec![Clause::new((**base).clone(), Comparator::Le, 0.0)]);
                    set.push_group(vec![Clause::new((**base).clone(), Comparator::Eq, 1.0)]);
                    set.push_group(vec![Clause::new((**body).clone(), Comparator::Le, 0.0)]);
                },
                MathNode::Trig { func: TrigFunc::Tan, body } => {
                    set.push_group(vec![tan_poles(body)]);
                },
                _ => (),
            }
        }
        set
    }

    /// Canonicalizes every clause, then drops groups containing a clause that can never hold and
    /// clauses that always hold.
    pub fn tidy(self, limits: &Limits) -> Result<Self, Error> {
        let mut tidy = Self::new();
        'groups: for group in self.groups {
            let mut kept = Vec::with_capacity(group.len());
            for clause in group {
                let clause = clause.tidy(limits)?;
                match clause.constant_truth() {
                    Some(false) => {
                        trace!("drop exclusion group, `{}` never holds", clause);
                        continue 'groups;
                    },
                    Some(true) => (),
                    None => kept.push(clause),
                }
            }
            tidy.push_group(kept);
        }
        Ok(tidy)
    }

    /// Returns true if the point given by the context is excluded.
    pub fn is_excluded(&self, ctxt: &Ctxt) -> Result<bool, Error> {
        'groups: for group in &self.groups {
            for clause in group {
                if !clause.holds(ctxt)? {
                    continue 'groups;
                }
            }
            return Ok(true);
        }
        Ok(false)
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.groups.is_empty() {
            return write!(f, "none");
        }
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, " or ")?;
            }
            if group.is_empty() {
                write!(f, "everywhere")?;
            }
            for (j, clause) in group.iter().enumerate() {
                if j > 0 {
                    write!(f, " and ")?;
                }
                write!(f, "{}", clause)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{build::parse_expression, simplify::canonicalize, test_support::TABLE};
    use pretty_assertions::assert_eq;
    use super::*;

    fn exclusions(source: &str) -> ExclusionSet {
        let node = parse_expression(&TABLE, source).unwrap();
        canonicalize(&node).unwrap().1
    }

    fn x() -> MathNode {
        MathNode::var("x")
    }

    #[test]
    fn natural_logarithm() {
        let set = exclusions("log(e)_x");
        assert_eq!(set.groups(), &[vec![Clause::new(x(), Comparator::Le, 0.0)]]);
        assert_eq!(set.to_string(), "x <= 0");
    }

    #[test]
    fn no_exclusions() {
        assert!(exclusions("2*x^2 - 5*x*x + sin(x)").is_empty());
    }

    #[test]
    fn cancelled_divisors_are_remembered() {
        let set = exclusions("x^99999*sin(x)/x^99998");
        assert_eq!(set.groups(), &[vec![Clause::new(x(), Comparator::Eq, 0.0)]]);
    }

    #[test]
    fn relocated_powers() {
        let set = exclusions("y*x^(-2)");
        assert_eq!(set.groups(), &[vec![Clause::new(x(), Comparator::Eq, 0.0)]]);
    }

    #[test]
    fn fractional_power() {
        let set = exclusions("x^0.5");
        assert_eq!(set.groups(), &[vec![Clause::new(x(), Comparator::Lt, 0.0)]]);

        let set = exclusions("2^x");
        assert!(set.is_empty());

        let set = exclusions("x^y");
        assert_eq!(set.to_string(), "x < 0 and y mod 1 != 0");
        assert!(set.is_excluded(&Ctxt::new().with_var("x", -1.0).with_var("y", 0.5)).unwrap());
        assert!(!set.is_excluded(&Ctxt::new().with_var("x", -1.0).with_var("y", 2.0)).unwrap());
    }

    #[test]
    fn tangent_poles() {
        let set = exclusions("tan(x)");
        assert_eq!(set.groups().len(), 1);
        assert_eq!(set.to_string(), "(-pi/2 + x) mod pi == 0");

        let at = |x: f64| set.is_excluded(&Ctxt::new().with_var("x", x)).unwrap();
        assert!(at(std::f64::consts::FRAC_PI_2));
        assert!(at(-std::f64::consts::FRAC_PI_2));
        assert!(at(3.0 * std::f64::consts::FRAC_PI_2));
        assert!(!at(0.0));
        assert!(!at(std::f64::consts::PI));

        assert_eq!(tan_poles(&x()).to_string(), "(x - pi/2) mod pi == 0");
    }

    #[test]
    fn logarithm_base() {
        let set = exclusions("log(x)_2");
        assert_eq!(set.groups(), &[
            vec![Clause::new(x(), Comparator::Le, 0.0)],
            vec![Clause::new(x(), Comparator::Eq, 1.0)],
        ]);

        // an invalid constant base excludes everything
        let set = exclusions("log(1)_x");
        assert!(set.excludes_everything());
        assert!(set.is_excluded(&Ctxt::new().with_var("x", 5.0)).unwrap());
    }

    #[test]
    fn division_by_zero_literal() {
        let set = exclusions("x/0");
        assert!(set.excludes_everything());
        assert_eq!(set.to_string(), "everywhere");
    }

    #[test]
    fn deduplicates_groups() {
        let mut set = ExclusionSet::new();
        set.push_group(vec![Clause::new(x(), Comparator::Eq, 0.0), Clause::new(x(), Comparator::Le, 0.0)]);
        set.push_group(vec![Clause::new(x(), Comparator::Le, 0.0), Clause::new(x(), Comparator::Eq, 0.0)]);
        assert_eq!(set.groups().len(), 1);
    }
}
