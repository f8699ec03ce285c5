//! Numerical evaluation of expression trees.
//!
//! Evaluation follows IEEE-754: a point outside the domain of the expression evaluates to NaN
//! instead of failing, so callers can sample an expression over a range without handling errors
//! at every point. Only a missing variable binding is an error.

use mathtree_error::Error;
use crate::{
    error::UnboundVariable,
    exclusion::ExclusionSet,
    node::{MathNode, TrigFunc},
};
use super::ctxt::Ctxt;

/// `cos` values closer to zero than this are treated as poles of `tan`.
const TAN_POLE_TOLERANCE: f64 = 1e-12;

impl TrigFunc {
    /// Applies the function to a value in radians. The tangent is NaN at its poles.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            TrigFunc::Sin => value.sin(),
            TrigFunc::Cos => value.cos(),
            TrigFunc::Tan => {
                if value.cos().abs() < TAN_POLE_TOLERANCE {
                    f64::NAN
                } else {
                    value.tan()
                }
            },
        }
    }
}

/// Raises `base` to `exponent`, returning NaN where the result is not a real number.
fn real_power(base: f64, exponent: f64) -> f64 {
    if base < 0.0 && exponent.fract() != 0.0 {
        f64::NAN
    } else if base == 0.0 && exponent < 0.0 {
        f64::NAN
    } else {
        base.powf(exponent)
    }
}

/// Returns the logarithm of `body` in `base`, or NaN outside its domain.
fn real_logarithm(base: f64, body: f64) -> f64 {
    if base <= 0.0 || base == 1.0 || body <= 0.0 {
        f64::NAN
    } else {
        body.ln() / base.ln()
    }
}

/// Evaluates the expression with the variable values in the context.
///
/// Returns an [`UnboundVariable`] error if the expression uses a variable the context does not
/// bind.
pub fn evaluate(node: &MathNode, ctxt: &Ctxt) -> Result<f64, Error> {
    Ok(match node {
        MathNode::Sum(addends) => {
            let mut total = 0.0;
            for addend in addends {
                total += evaluate(addend, ctxt)?;
            }
            total
        },
        MathNode::Product(p) => {
            let mut numerator = p.coefficient().numer();
            for factor in p.numerator() {
                numerator *= evaluate(factor, ctxt)?;
            }
            let mut denominator = p.coefficient().denom();
            for factor in p.denominator() {
                denominator *= evaluate(factor, ctxt)?;
            }
            if denominator == 0.0 {
                f64::NAN
            } else {
                numerator / denominator
            }
        },
        MathNode::Power { base, exponent } => real_power(evaluate(base, ctxt)?, evaluate(exponent, ctxt)?),
        MathNode::Logarithm { base, body } => real_logarithm(evaluate(base, ctxt)?, evaluate(body, ctxt)?),
        MathNode::Trig { func, body } => func.apply(evaluate(body, ctxt)?),
        MathNode::Variable(name) => ctxt.get_var(name).ok_or_else(|| Error::detached(UnboundVariable {
            name: name.clone(),
            suggestions: ctxt.get_similar_vars(name).into_iter().map(str::to_string).collect(),
        }))?,
        MathNode::Number(n) => n.value(),
    })
}

/// Evaluates the expression, returning NaN if the point is in the exclusion set.
///
/// Use this with the exclusions of the original expression to evaluate its canonical form, which
/// may be defined at points where the original was not (`x/x` is `1` everywhere but `x = 0`).
pub fn evaluate_checked(node: &MathNode, exclusions: &ExclusionSet, ctxt: &Ctxt) -> Result<f64, Error> {
    if exclusions.is_excluded(ctxt)? {
        return Ok(f64::NAN);
    }
    evaluate(node, ctxt)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_absolute_error_msg,
        afe_is_absolute_eq,
        afe_is_relative_eq,
        afe_relative_error_msg,
        assert_float_absolute_eq,
        assert_float_relative_eq,
    };
    use crate::{
        build::parse_expression,
        simplify::canonicalize,
        test_support::TABLE,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval_at(source: &str, x: f64) -> f64 {
        let node = parse_expression(&TABLE, source).unwrap();
        evaluate(&node, &Ctxt::new().with_var("x", x)).unwrap()
    }

    #[test]
    fn arithmetic() {
        assert_float_absolute_eq!(eval_at("2*x^2 - 5*x*x", 2.0), -12.0, 1e-12);
        assert_float_absolute_eq!(eval_at("log(2)_x + sin(pi/2)", 8.0), 4.0, 1e-12);
        assert_float_relative_eq!(eval_at("e^x", 1.0), std::f64::consts::E);
        assert_float_absolute_eq!(eval_at("-x^2", 3.0), -9.0, 1e-12);
    }

    #[test]
    fn reciprocal_at_zero_is_nan() {
        assert!(eval_at("1/x", 0.0).is_nan());
    }

    #[test]
    fn domain_violations_are_nan() {
        assert!(eval_at("x^0.5", -4.0).is_nan());
        assert!(eval_at("log(e)_x", 0.0).is_nan());
        assert!(eval_at("log(x)_2", 1.0).is_nan());
        assert!(eval_at("tan(x)", std::f64::consts::FRAC_PI_2).is_nan());
        assert_float_absolute_eq!(eval_at("x^3", -2.0), -8.0, 1e-12);
    }

    #[test]
    fn unbound_variable() {
        let node = parse_expression(&TABLE, "x + y").unwrap();
        let ctxt = Ctxt::new().with_var("x", 1.0).with_var("z", 2.0);
        let err = evaluate(&node, &ctxt).unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnboundVariable>(),
            Some(&UnboundVariable { name: "y".to_string(), suggestions: vec!["x".to_string(), "z".to_string()] }),
        );
        assert!(err.spans.is_empty());
    }

    #[test]
    fn checked_evaluation_uses_exclusions() {
        let node = parse_expression(&TABLE, "x/x").unwrap();
        let (canonical, exclusions) = canonicalize(&node).unwrap();
        assert_eq!(canonical, MathNode::one());

        assert!(evaluate_checked(&canonical, &exclusions, &Ctxt::new().with_var("x", 0.0)).unwrap().is_nan());
        assert_float_absolute_eq!(
            evaluate_checked(&canonical, &exclusions, &Ctxt::new().with_var("x", 3.0)).unwrap(),
            1.0,
            1e-12
        );
    }
}
