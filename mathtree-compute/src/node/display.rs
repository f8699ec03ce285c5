//! Plain-text rendering of nodes. The output parses back to an equal canonical tree.

use std::fmt::{self, Display, Formatter};
use super::{MathNode, Number, Product};

/// Writes the node, surrounded by parentheses if `wrap` is true.
fn write_wrapped(f: &mut Formatter<'_>, node: &MathNode, wrap: bool) -> fmt::Result {
    if wrap {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

/// Returns true if the node can be written as a function argument or logarithm base without
/// parentheses.
fn is_atomic(node: &MathNode) -> bool {
    match node {
        MathNode::Variable(_) => true,
        MathNode::Number(Number::Const(_)) => true,
        MathNode::Number(Number::Real(value)) => *value >= 0.0,
        _ => false,
    }
}

/// Returns true if the node can be written as the base of a power without parentheses.
fn is_power_base(node: &MathNode) -> bool {
    is_atomic(node) || matches!(node, MathNode::Logarithm { .. } | MathNode::Trig { .. })
}

/// Returns true if the node can be written as one factor of a product without parentheses.
fn is_factor(node: &MathNode) -> bool {
    !matches!(node, MathNode::Sum(_) | MathNode::Product(_))
        && !matches!(node, MathNode::Number(Number::Real(value)) if *value < 0.0)
}

/// Writes a product as its coefficient, its factors, and then one `/` per divisor.
///
/// A leading `-` binds to the first factor only, and negating a sum distributes over its
/// addends. So a negated product whose first factor is a sum is written as `-(...)` around the
/// whole product. The denominator coefficient is written as a divisor of its own, so that it is
/// never read back as the coefficient of a sum.
fn fmt_product(f: &mut Formatter<'_>, p: &Product) -> fmt::Result {
    let coefficient = p.coefficient();
    let mut first = true;
    let mut negated = false;

    if coefficient.numer() == -1.0 && !p.numerator().is_empty() {
        negated = p.numerator().first().map_or(false, |factor| !is_factor(factor));
        write!(f, "{}", if negated { "-(" } else { "-" })?;
    } else if coefficient.numer() != 1.0 || p.numerator().is_empty() {
        write!(f, "{}", coefficient.numer())?;
        first = false;
    }
    for factor in p.numerator() {
        if !first {
            write!(f, "*")?;
        }
        write_wrapped(f, factor, !is_factor(factor))?;
        first = false;
    }

    if coefficient.denom() != 1.0 {
        write!(f, "/{}", coefficient.denom())?;
    }
    match p.denominator() {
        [] => (),
        [factor] => {
            write!(f, "/")?;
            write_wrapped(f, factor, !is_factor(factor))?;
        },
        factors => {
            write!(f, "/(")?;
            for (i, factor) in factors.iter().enumerate() {
                if i > 0 {
                    write!(f, "*")?;
                }
                write_wrapped(f, factor, !is_factor(factor))?;
            }
            write!(f, ")")?;
        },
    }

    if negated {
        write!(f, ")")?;
    }
    Ok(())
}

impl Display for MathNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MathNode::Sum(addends) => {
                let mut iter = addends.iter();
                match iter.next() {
                    Some(first) => write_wrapped(f, first, matches!(first, MathNode::Sum(_)))?,
                    None => return write!(f, "0"),
                }
                for addend in iter {
                    if addend.is_negative() {
                        write!(f, " - ")?;
                        write_wrapped(f, &-addend, false)?;
                    } else {
                        write!(f, " + ")?;
                        write_wrapped(f, addend, matches!(addend, MathNode::Sum(_)))?;
                    }
                }
                Ok(())
            },
            MathNode::Product(p) => fmt_product(f, p),
            MathNode::Power { base, exponent } => {
                write_wrapped(f, base, !is_power_base(base))?;
                write!(f, "^")?;
                write_wrapped(
                    f,
                    exponent,
                    !is_power_base(exponent) && !matches!(**exponent, MathNode::Power { .. }),
                )
            },
            MathNode::Logarithm { base, body } => {
                write!(f, "log({})_", base)?;
                write_wrapped(f, body, !is_atomic(body))
            },
            MathNode::Trig { func, body } => write!(f, "{}({})", func.name(), body),
            MathNode::Variable(name) => write!(f, "{}", name),
            MathNode::Number(n) => write!(f, "{}", n),
        }
    }
}
