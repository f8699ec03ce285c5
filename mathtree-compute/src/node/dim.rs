//! Equivalence keys deciding which nodes can be combined by addition or multiplication.

use super::{Coefficient, MathNode, Number, Product};

impl MathNode {
    /// Splits the node into a coefficient and an addition key. Two nodes with equal keys can be
    /// added by adding their coefficients.
    ///
    /// Real numbers share the key `1`, while the symbolic constants `e` and `pi` are their own
    /// keys. A product is keyed by its factors with the coefficient stripped.
    pub fn add_dim(&self) -> (Coefficient, MathNode) {
        match self {
            MathNode::Number(Number::Real(value)) => (Coefficient::from(*value), MathNode::one()),
            MathNode::Product(p) => {
                let key = match (p.numerator(), p.denominator()) {
                    ([single], []) => single.clone(),
                    _ => MathNode::Product(p.with_coefficient(Coefficient::ONE)),
                };
                (p.coefficient(), key)
            },
            other => (Coefficient::ONE, other.clone()),
        }
    }

    /// Rebuilds a node from a coefficient and an addition key, the inverse of
    /// [`MathNode::add_dim`].
    pub fn from_add_dim(coefficient: Coefficient, key: MathNode) -> MathNode {
        if coefficient.is_zero() {
            return MathNode::zero();
        }
        match key {
            MathNode::Number(Number::Real(value)) if value == 1.0 => MathNode::real(coefficient.value()),
            MathNode::Product(p) => {
                let (numerator, denominator, _) = p.into_parts();
                MathNode::Product(Product::new(numerator, denominator, coefficient))
            },
            key if coefficient.is_one() => key,
            key => MathNode::scaled(coefficient, key),
        }
    }

    /// Splits the node into a multiplication key and an exponent. Two factors with equal keys can
    /// be multiplied by adding their exponents.
    pub fn mul_dim(&self) -> (MathNode, MathNode) {
        match self {
            MathNode::Power { base, exponent } => ((**base).clone(), (**exponent).clone()),
            other => (other.clone(), MathNode::one()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::node::Constant;
    use super::*;

    #[test]
    fn addition_keys() {
        let x = MathNode::var("x");
        assert_eq!(MathNode::real(4.0).add_dim(), (Coefficient::from(4.0), MathNode::one()));
        assert_eq!(
            MathNode::constant(Constant::E).add_dim(),
            (Coefficient::ONE, MathNode::constant(Constant::E)),
        );
        assert_eq!(
            MathNode::scaled(Coefficient::from(-3.0), x.clone()).add_dim(),
            (Coefficient::from(-3.0), x.clone()),
        );

        let over = MathNode::Product(Product::new(vec![x.clone()], vec![MathNode::var("y")], Coefficient::from(2.0)));
        let (coefficient, key) = over.add_dim();
        assert_eq!(coefficient, Coefficient::from(2.0));
        assert_eq!(MathNode::from_add_dim(coefficient, key), over);
    }

    #[test]
    fn multiplication_keys() {
        let x = MathNode::var("x");
        let square = MathNode::power(x.clone(), MathNode::real(2.0));
        assert_eq!(square.mul_dim(), (x.clone(), MathNode::real(2.0)));
        assert_eq!(x.mul_dim(), (x.clone(), MathNode::one()));
    }
}
