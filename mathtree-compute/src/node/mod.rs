//! The algebraic expression tree.
//!
//! A [`MathNode`] is an immutable value: every transformation in this crate (simplification,
//! merging, negation, differentiation) builds and returns a new tree. Trees own their children,
//! so they cannot contain cycles or back-references.

pub mod coefficient;
mod dim;
mod display;
pub mod iter;
pub mod number;
mod order;

use iter::NodeIter;
use std::{collections::BTreeSet, ops::{Add, Div, Mul, Neg}};
pub use coefficient::Coefficient;
pub use number::{Constant, Number};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A trigonometric function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrigFunc {
    Sin,
    Cos,
    Tan,
}

impl TrigFunc {
    /// Returns the function with the given name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(TrigFunc::Sin),
            "cos" => Some(TrigFunc::Cos),
            "tan" => Some(TrigFunc::Tan),
            _ => None,
        }
    }

    /// Returns the name of the function.
    pub fn name(self) -> &'static str {
        match self {
            TrigFunc::Sin => "sin",
            TrigFunc::Cos => "cos",
            TrigFunc::Tan => "tan",
        }
    }
}

/// A product of factors, split into a numerator and a denominator, scaled by a numeric
/// coefficient.
///
/// The coefficient is only readable; a product with a different coefficient is a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Product {
    numerator: Vec<MathNode>,
    denominator: Vec<MathNode>,
    coefficient: Coefficient,
}

impl Product {
    /// Creates a product. No simplification is performed.
    pub fn new(numerator: Vec<MathNode>, denominator: Vec<MathNode>, coefficient: Coefficient) -> Self {
        Self { numerator, denominator, coefficient }
    }

    /// Returns the factors above the fraction line.
    pub fn numerator(&self) -> &[MathNode] {
        &self.numerator
    }

    /// Returns the factors below the fraction line.
    pub fn denominator(&self) -> &[MathNode] {
        &self.denominator
    }

    /// Returns the numeric coefficient.
    pub fn coefficient(&self) -> Coefficient {
        self.coefficient
    }

    /// Returns a copy of this product with the given coefficient.
    pub fn with_coefficient(&self, coefficient: Coefficient) -> Self {
        Self::new(self.numerator.clone(), self.denominator.clone(), coefficient)
    }

    /// Consumes the product, returning its numerator, denominator, and coefficient.
    pub fn into_parts(self) -> (Vec<MathNode>, Vec<MathNode>, Coefficient) {
        (self.numerator, self.denominator, self.coefficient)
    }
}

/// A node of the algebraic expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MathNode {
    /// A sum of addends.
    Sum(Vec<MathNode>),

    /// A product, with its own numerator, denominator, and coefficient.
    Product(Product),

    /// `base^exponent`.
    Power {
        base: Box<MathNode>,
        exponent: Box<MathNode>,
    },

    /// The logarithm of `body` in the given `base`.
    Logarithm {
        base: Box<MathNode>,
        body: Box<MathNode>,
    },

    /// A trigonometric function applied to `body`.
    Trig {
        func: TrigFunc,
        body: Box<MathNode>,
    },

    /// A named variable.
    Variable(String),

    /// A real number or symbolic constant.
    Number(Number),
}

impl MathNode {
    /// Creates a real number.
    pub fn real(value: f64) -> Self {
        MathNode::Number(Number::real(value))
    }

    /// Creates a symbolic constant.
    pub fn constant(c: Constant) -> Self {
        MathNode::Number(Number::Const(c))
    }

    pub fn zero() -> Self {
        Self::real(0.0)
    }

    pub fn one() -> Self {
        Self::real(1.0)
    }

    /// Creates a variable.
    pub fn var(name: impl Into<String>) -> Self {
        MathNode::Variable(name.into())
    }

    /// Creates a product of the given factors over the given divisors, with coefficient `1`.
    pub fn product(numerator: Vec<MathNode>, denominator: Vec<MathNode>) -> Self {
        MathNode::Product(Product::new(numerator, denominator, Coefficient::ONE))
    }

    /// Creates the product `coefficient * node`.
    pub fn scaled(coefficient: Coefficient, node: MathNode) -> Self {
        MathNode::Product(Product::new(vec![node], Vec::new(), coefficient))
    }

    /// Creates `base^exponent`.
    pub fn power(base: MathNode, exponent: MathNode) -> Self {
        MathNode::Power { base: Box::new(base), exponent: Box::new(exponent) }
    }

    /// Creates the logarithm of `body` in the given `base`.
    pub fn log(base: MathNode, body: MathNode) -> Self {
        MathNode::Logarithm { base: Box::new(base), body: Box::new(body) }
    }

    /// Creates the natural logarithm of `body`.
    pub fn ln(body: MathNode) -> Self {
        Self::log(Self::constant(Constant::E), body)
    }

    /// Applies a trigonometric function to `body`.
    pub fn trig(func: TrigFunc, body: MathNode) -> Self {
        MathNode::Trig { func, body: Box::new(body) }
    }

    /// Returns the value of this node if it is a real literal.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            MathNode::Number(n) => n.as_real(),
            _ => None,
        }
    }

    /// Returns true if this node is the real literal `value`.
    pub fn is_real(&self, value: f64) -> bool {
        self.as_real() == Some(value)
    }

    /// Returns true if this node is the literal `0`, or a product scaled by `0`.
    pub fn is_zero(&self) -> bool {
        match self {
            MathNode::Product(p) => p.coefficient().is_zero(),
            _ => self.is_real(0.0),
        }
    }

    /// Returns true if this node carries a negative sign: a negative real literal, or a product
    /// with a negative coefficient.
    pub fn is_negative(&self) -> bool {
        match self {
            MathNode::Number(Number::Real(value)) => *value < 0.0,
            MathNode::Product(p) => p.coefficient().is_negative(),
            _ => false,
        }
    }

    /// Returns an iterator that traverses the tree in left-to-right post-order.
    pub fn post_order_iter(&self) -> NodeIter<'_> {
        NodeIter::new(self)
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.post_order_iter().count()
    }

    /// Returns the number of levels of the tree; a leaf has depth `1`.
    ///
    /// The tree is walked with an explicit stack, so this is safe to call on trees of any depth.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            match node {
                MathNode::Sum(addends) => stack.extend(addends.iter().map(|a| (a, depth + 1))),
                MathNode::Product(p) => stack.extend(
                    p.numerator().iter().chain(p.denominator()).map(|f| (f, depth + 1)),
                ),
                MathNode::Power { base: lhs, exponent: rhs }
                    | MathNode::Logarithm { base: lhs, body: rhs } => {
                    stack.push((lhs, depth + 1));
                    stack.push((rhs, depth + 1));
                },
                MathNode::Trig { body, .. } => stack.push((body, depth + 1)),
                MathNode::Variable(_) | MathNode::Number(_) => (),
            }
        }
        deepest
    }

    /// Returns true if the variable appears anywhere in the tree.
    pub fn depends_on(&self, var: &str) -> bool {
        self.post_order_iter()
            .any(|node| matches!(node, MathNode::Variable(name) if name == var))
    }

    /// Returns the names of every variable in the tree.
    pub fn variables(&self) -> BTreeSet<&str> {
        self.post_order_iter()
            .filter_map(|node| match node {
                MathNode::Variable(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl From<f64> for MathNode {
    fn from(value: f64) -> Self {
        Self::real(value)
    }
}

impl From<Constant> for MathNode {
    fn from(c: Constant) -> Self {
        Self::constant(c)
    }
}

impl Neg for MathNode {
    type Output = Self;

    /// Negates the node: numbers flip their sign, sums negate every addend, and products negate
    /// their coefficient. Any other node is scaled by `-1`.
    fn neg(self) -> Self {
        match self {
            MathNode::Number(Number::Real(value)) => Self::real(-value),
            MathNode::Sum(addends) => MathNode::Sum(addends.into_iter().map(Neg::neg).collect()),
            MathNode::Product(p) => {
                let (numerator, denominator, coefficient) = p.into_parts();
                MathNode::Product(Product::new(numerator, denominator, -coefficient))
            },
            other => Self::scaled(Coefficient::MINUS_ONE, other),
        }
    }
}

impl Neg for &MathNode {
    type Output = MathNode;

    fn neg(self) -> MathNode {
        -self.clone()
    }
}

impl Add for MathNode {
    type Output = Self;

    /// Builds the sum of both nodes, splicing in the addends of either side if it is already a
    /// sum.
    fn add(self, rhs: Self) -> Self {
        let mut addends = match self {
            MathNode::Sum(addends) => addends,
            other => vec![other],
        };
        match rhs {
            MathNode::Sum(rhs) => addends.extend(rhs),
            other => addends.push(other),
        }
        MathNode::Sum(addends)
    }
}

impl Mul for MathNode {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::product(vec![self, rhs], Vec::new())
    }
}

impl Div for MathNode {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::product(vec![self], vec![rhs])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn negation() {
        let x = MathNode::var("x");
        assert_eq!(-MathNode::real(2.0), MathNode::real(-2.0));
        assert_eq!(-x.clone(), MathNode::scaled(Coefficient::MINUS_ONE, x.clone()));
        assert_eq!(
            -(x.clone() + MathNode::real(1.0)),
            MathNode::Sum(vec![MathNode::scaled(Coefficient::MINUS_ONE, x.clone()), MathNode::real(-1.0)]),
        );
        assert_eq!(-(-x.clone()), MathNode::scaled(Coefficient::ONE, x));
    }

    #[test]
    fn addition_splices_sums() {
        let sum = MathNode::var("a") + MathNode::var("b") + MathNode::var("c");
        assert_eq!(sum, MathNode::Sum(vec![MathNode::var("a"), MathNode::var("b"), MathNode::var("c")]));
    }

    #[test]
    fn variables_and_dependence() {
        let node = MathNode::trig(TrigFunc::Sin, MathNode::var("x")) / MathNode::power(MathNode::var("y"), MathNode::real(2.0));
        assert!(node.depends_on("x"));
        assert!(node.depends_on("y"));
        assert!(!node.depends_on("z"));
        assert_eq!(node.variables().into_iter().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(node.node_count(), 6);
        assert_eq!(node.depth(), 3);
        assert_eq!(MathNode::var("x").depth(), 1);
    }
}
