//! Reduction of expressions to a canonical form.
//!
//! Canonicalization alternates two passes over the tree:
//!
//! - [`simplify`] rewrites every node bottom-up with node-local rules: constant folding, trivial
//!   exponents, exponential / logarithm identities, relocation of negative powers across the
//!   fraction line, cancellation of common factors, and collapsing of empty or single-element sums
//!   and products. Every sum and product it returns is sorted.
//! - [`merge_similar`] combines like terms (by their addition key) and like factors (by their
//!   multiplication key), which can expose new node-local rewrites.
//!
//! [`canonicalize`] runs `simplify`, `merge_similar`, `simplify` in rounds until a round leaves the
//! tree unchanged, so that canonicalizing a canonical tree returns it unchanged. Rounds are
//! bounded by [`Limits`].
//!
//! While doing so it accumulates the [`ExclusionSet`] of every intermediate tree, so that
//! cancelling `x/x` to `1` still remembers that `x == 0` is undefined.
//!
//! ```
//! use mathtree_compute::{build::parse_expression, simplify::canonicalize};
//!
//! let table = mathtree_parser::expression_table().unwrap();
//! let node = parse_expression(&table, "2*x^2 - 5*x*x").unwrap();
//! let (canonical, exclusions) = canonicalize(&node).unwrap();
//!
//! assert_eq!(canonical.to_string(), "-3*x^2");
//! assert!(exclusions.is_empty());
//! ```

mod fraction;
pub mod rules;
pub mod step;

use log::debug;
use mathtree_error::Error;
use crate::{
    error::{DepthLimitExceeded, NodeLimitExceeded, RoundLimitExceeded},
    exclusion::ExclusionSet,
    node::{MathNode, Product},
    step_collector::StepCollector,
};
use rules::{
    add::{merge_addends, simplify_sum},
    logarithm::simplify_logarithm,
    multiply::{merge_factors, simplify_product},
    power::simplify_power,
    trigonometry::simplify_trig,
};
use step::Step;

/// Bounds on the work canonicalization may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// The largest number of nodes any intermediate tree may have.
    pub max_nodes: usize,

    /// The deepest nesting any tree may have. The tree builder enforces it while building, so the
    /// recursive passes never see a deeper tree.
    pub max_depth: usize,

    /// The largest number of `simplify`, `merge_similar`, `simplify` rounds to run while looking
    /// for a fixed point.
    pub max_rounds: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nodes: 100_000,
            max_depth: 64,
            max_rounds: 64,
        }
    }
}

/// Simplifies every node of the tree bottom-up.
pub fn simplify(node: &MathNode) -> MathNode {
    simplify_with(node, &mut ())
}

/// Simplifies every node of the tree bottom-up, reporting each rewrite to the step collector.
pub fn simplify_with(node: &MathNode, steps: &mut dyn StepCollector<Step>) -> MathNode {
    match node {
        MathNode::Sum(addends) => {
            let addends = addends.iter().map(|addend| simplify_with(addend, steps)).collect();
            simplify_sum(addends, steps)
        },
        MathNode::Product(p) => {
            let numerator = p.numerator().iter().map(|factor| simplify_with(factor, steps)).collect();
            let denominator = p.denominator().iter().map(|factor| simplify_with(factor, steps)).collect();
            simplify_product(numerator, denominator, p.coefficient(), steps)
        },
        MathNode::Power { base, exponent } => {
            let base = simplify_with(base, steps);
            let exponent = simplify_with(exponent, steps);
            simplify_power(base, exponent, steps)
        },
        MathNode::Logarithm { base, body } => {
            let base = simplify_with(base, steps);
            let body = simplify_with(body, steps);
            simplify_logarithm(base, body, steps)
        },
        MathNode::Trig { func, body } => {
            let body = simplify_with(body, steps);
            simplify_trig(*func, body, steps)
        },
        MathNode::Variable(_) | MathNode::Number(_) => node.clone(),
    }
}

/// Combines like terms and like factors throughout the tree, bottom-up.
///
/// The result is not necessarily sorted or collapsed; run [`simplify`] on it afterwards.
pub fn merge_similar(node: &MathNode) -> MathNode {
    merge_similar_with(node, &mut ())
}

/// Combines like terms and like factors throughout the tree, reporting each rewrite to the step
/// collector.
pub fn merge_similar_with(node: &MathNode, steps: &mut dyn StepCollector<Step>) -> MathNode {
    match node {
        MathNode::Sum(addends) => {
            let addends = addends.iter().map(|addend| merge_similar_with(addend, steps)).collect();
            MathNode::Sum(merge_addends(addends, steps))
        },
        MathNode::Product(p) => {
            let numerator = p.numerator().iter().map(|factor| merge_similar_with(factor, steps)).collect();
            let denominator = p.denominator().iter().map(|factor| merge_similar_with(factor, steps)).collect();
            MathNode::Product(Product::new(
                merge_factors(numerator, steps),
                merge_factors(denominator, steps),
                p.coefficient(),
            ))
        },
        MathNode::Power { base, exponent } => MathNode::power(
            merge_similar_with(base, steps),
            merge_similar_with(exponent, steps),
        ),
        MathNode::Logarithm { base, body } => MathNode::log(
            merge_similar_with(base, steps),
            merge_similar_with(body, steps),
        ),
        MathNode::Trig { func, body } => MathNode::trig(*func, merge_similar_with(body, steps)),
        MathNode::Variable(_) | MathNode::Number(_) => node.clone(),
    }
}

/// Returns an error if the tree is larger than the node limit, or deeper than the depth limit.
fn check_size(node: &MathNode, limits: &Limits) -> Result<(), Error> {
    let found = node.node_count();
    if found > limits.max_nodes {
        return Err(Error::detached(NodeLimitExceeded { limit: limits.max_nodes, found }));
    }
    if node.depth() > limits.max_depth {
        return Err(Error::detached(DepthLimitExceeded { limit: limits.max_depth }));
    }
    Ok(())
}

/// Runs canonicalization rounds until a fixed point, calling `visit` with the input and every
/// intermediate tree.
fn run_rounds(
    node: &MathNode,
    limits: &Limits,
    steps: &mut dyn StepCollector<Step>,
    mut visit: impl FnMut(&MathNode),
) -> Result<MathNode, Error> {
    check_size(node, limits)?;
    visit(node);

    let mut current = node.clone();
    for round in 1..=limits.max_rounds {
        let simplified = simplify_with(&current, steps);
        check_size(&simplified, limits)?;
        visit(&simplified);

        let merged = merge_similar_with(&simplified, steps);
        check_size(&merged, limits)?;
        visit(&merged);

        let next = simplify_with(&merged, steps);
        check_size(&next, limits)?;
        visit(&next);

        debug!("canonicalization round {}: {}", round, next);
        if next == current {
            return Ok(next);
        }
        current = next;
    }

    Err(Error::detached(RoundLimitExceeded { rounds: limits.max_rounds }))
}

/// Returns the canonical form of the tree, without computing exclusions.
pub fn canonical_form(node: &MathNode, limits: &Limits) -> Result<MathNode, Error> {
    run_rounds(node, limits, &mut (), |_| ())
}

/// Reduces the tree to its canonical form, returning it with the set of points where the
/// original expression is undefined.
pub fn canonicalize(node: &MathNode) -> Result<(MathNode, ExclusionSet), Error> {
    canonicalize_with(node, &Limits::default(), &mut ())
}

/// Reduces the tree to its canonical form within the given limits, reporting each rewrite to the
/// step collector.
pub fn canonicalize_with(
    node: &MathNode,
    limits: &Limits,
    steps: &mut dyn StepCollector<Step>,
) -> Result<(MathNode, ExclusionSet), Error> {
    let mut exclusions = ExclusionSet::new();
    let canonical = run_rounds(node, limits, steps, |stage| exclusions.extend(ExclusionSet::collect(stage)))?;
    let exclusions = exclusions.tidy(limits)?;
    debug!("canonical form {} with {} exclusion groups", canonical, exclusions.groups().len());
    Ok((canonical, exclusions))
}

#[cfg(test)]
mod tests {
    use crate::{
        build::parse_expression,
        node::{Coefficient, Constant, TrigFunc},
        test_support::TABLE,
    };
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
    use super::*;

    fn canonical(source: &str) -> MathNode {
        let node = parse_expression(&TABLE, source).unwrap();
        canonicalize(&node).unwrap().0
    }

    fn x() -> MathNode {
        MathNode::var("x")
    }

    #[test]
    fn like_term_merge() {
        assert_eq!(
            canonical("2*x^2 - 5*x*x"),
            MathNode::scaled(Coefficient::from(-3.0), MathNode::power(x(), MathNode::real(2.0))),
        );
    }

    #[test]
    fn identity_collapse() {
        assert_eq!(canonical("x*log(e)_(e^(x-1))/(x-1)"), x());
    }

    #[test]
    fn fraction_inversion() {
        let node = canonical("x/((x-1)/(x-2))");
        assert_eq!(node, canonical("x*(x-2)/(x-1)"));
        assert_eq!(node, MathNode::product(
            vec![MathNode::Sum(vec![x(), MathNode::real(-2.0)]), x()],
            vec![MathNode::Sum(vec![x(), MathNode::real(-1.0)])],
        ));
        assert_eq!(node.to_string(), "(x - 2)*x/(x - 1)");
    }

    #[test]
    fn huge_exponents_cancel() {
        assert_eq!(
            canonical("x^99999*sin(x)/x^99998"),
            MathNode::product(vec![MathNode::trig(TrigFunc::Sin, x()), x()], vec![]),
        );
    }

    #[test]
    fn negative_exponents_move_down() {
        assert_eq!(canonical("x^(-2)*y"), canonical("y/x^2"));
        assert_eq!(canonical("2*x^(-1)"), MathNode::Product(Product::new(vec![], vec![x()], Coefficient::from(2.0))));
    }

    #[test]
    fn cancel_to_zero() {
        assert_eq!(canonical("x - x"), MathNode::zero());
        assert_eq!(canonical("x/x"), MathNode::one());
        assert_eq!(canonical("0*sin(x)"), MathNode::zero());
        assert_eq!(canonical("(x+1)^0"), MathNode::one());
    }

    #[test]
    fn constants_stay_symbolic() {
        assert_eq!(
            canonical("pi + pi"),
            MathNode::scaled(Coefficient::from(2.0), MathNode::constant(Constant::Pi)),
        );
        assert_eq!(canonical("e*e"), MathNode::power(MathNode::constant(Constant::E), MathNode::real(2.0)));
        assert_eq!(canonical("2^3 + log(2)_8"), MathNode::real(11.0));
        assert_eq!(canonical("cos(pi)"), MathNode::real(-1.0));
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(
            canonical("-x^2"),
            MathNode::scaled(Coefficient::MINUS_ONE, MathNode::power(x(), MathNode::real(2.0))),
        );
    }

    #[test]
    fn display_round_trips() {
        for source in [
            "x^2 - 5",
            "(x - 2)*x/(x - 1)",
            "log(e)_x",
            "sin(x)*x",
            "-x/(2*y)",
            "e^(2*x)",
            "1/(x + 1)",
            "-(y*(x+1))",
            "-((x+1)/y)",
            "y/(2*(x+1))",
            "y/2/(x+1)",
            "x/(y*(x-x))",
        ] {
            let node = canonical(source);
            assert_eq!(canonical(&node.to_string()), node, "{}", source);
        }
    }

    #[test]
    fn negated_product_of_sum() {
        let node = canonical("-(y*(x+1))");
        assert!(node.is_negative());
        assert_eq!(canonical("-((x + 1)*y)"), node);
        assert_eq!(canonical("(x+1)*y - (x+1)*y"), MathNode::zero());
        assert_eq!(canonical(&node.to_string()), node);
    }

    #[test]
    fn zero_divisor_inside_product() {
        let node = canonical("x/(y*(x-x))");
        assert_eq!(node, canonical("x/(y*0)"));
        assert_eq!(node, MathNode::product(vec![x()], vec![MathNode::zero()]));
        assert_eq!(node.to_string(), "x/0");
    }

    /// Writes a random expression in `x` and `y` at most `depth` operators deep.
    fn random_source(rng: &mut StdRng, depth: usize) -> String {
        let leaf = |rng: &mut StdRng| match rng.gen_range(0..4) {
            0 => "x".to_string(),
            1 => "y".to_string(),
            _ => rng.gen_range(1..=5).to_string(),
        };
        if depth == 0 || rng.gen_bool(0.25) {
            return leaf(rng);
        }

        match rng.gen_range(0..7) {
            0 => format!("({} + {})", random_source(rng, depth - 1), random_source(rng, depth - 1)),
            1 => format!("({} - {})", random_source(rng, depth - 1), random_source(rng, depth - 1)),
            2 => format!("{}*{}", random_source(rng, depth - 1), random_source(rng, depth - 1)),
            3 => format!("({})/{}", random_source(rng, depth - 1), leaf(rng)),
            4 => format!("({})^2", random_source(rng, depth - 1)),
            5 => format!("sin({})", random_source(rng, depth - 1)),
            _ => format!("-({})", random_source(rng, depth - 1)),
        }
    }

    /// Returns true if a real literal sits directly inside a product, other than a lone zero
    /// divisor.
    fn has_loose_number(node: &MathNode) -> bool {
        node.post_order_iter().any(|inner| match inner {
            MathNode::Product(p) => {
                let is_number = |factor: &MathNode| factor.as_real().is_some();
                p.numerator().iter().any(is_number)
                    || (p.denominator().iter().any(is_number) && p.denominator() != [MathNode::zero()])
            },
            _ => false,
        })
    }

    #[test]
    fn random_expressions() {
        let mut rng = StdRng::seed_from_u64(0x6d61_7468);
        for _ in 0..300 {
            let source = random_source(&mut rng, 4);
            let node = canonical(&source);

            let (twice, _) = canonicalize(&node).unwrap();
            assert_eq!(twice, node, "not idempotent: {}", source);

            let displayed = node.to_string();
            assert_eq!(canonical(&displayed), node, "{} displays as {}", source, displayed);

            assert!(!has_loose_number(&node), "{} has a number factor in {}", source, displayed);
        }
    }

    #[test]
    fn idempotence() {
        for source in [
            "2*x^2 - 5*x*x",
            "x/((x-1)/(x-2))",
            "log(2)_(x^3) + 3*log(2)_x",
            "(x+1)*(x+1)/(x+1)^3",
            "e^(x*log(e)_2) + 2^x",
            "tan(x)^2/sin(x)",
        ] {
            let once = canonical(source);
            let (twice, _) = canonicalize(&once).unwrap();
            assert_eq!(twice, once, "{}", source);
        }
    }

    #[test]
    fn order_insensitive() {
        let mut rng = rand::thread_rng();
        let mut terms = vec!["3*x^2", "x*y", "sin(x)", "log(2)_y", "4", "y^2*x", "e"];
        let mut factors = vec!["x", "(y + 1)", "cos(x)", "2", "x^3", "pi"];
        let sum = canonical(&terms.join(" + "));
        let product = canonical(&factors.join("*"));

        for _ in 0..20 {
            terms.shuffle(&mut rng);
            factors.shuffle(&mut rng);
            assert_eq!(canonical(&terms.join(" + ")), sum);
            assert_eq!(canonical(&factors.join("*")), product);

            let k = rng.gen_range(1..10);
            assert_eq!(
                canonical(&format!("{}*x + x*{}", k, 10 - k)),
                MathNode::scaled(Coefficient::from(10.0), x()),
            );
        }
    }

    #[test]
    fn node_limit() {
        let node = parse_expression(&TABLE, "x + y + z").unwrap();
        let limits = Limits { max_nodes: 3, ..Limits::default() };
        let err = canonicalize_with(&node, &limits, &mut ()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<NodeLimitExceeded>(),
            Some(&NodeLimitExceeded { limit: 3, found: 4 }),
        );
    }

    #[test]
    fn depth_limit() {
        let node = parse_expression(&TABLE, "sin(sin(sin(x)))").unwrap();
        let limits = Limits { max_depth: 3, ..Limits::default() };
        let err = canonicalize_with(&node, &limits, &mut ()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DepthLimitExceeded>(),
            Some(&DepthLimitExceeded { limit: 3 }),
        );

        let limits = Limits { max_depth: 4, ..Limits::default() };
        assert!(canonicalize_with(&node, &limits, &mut ()).is_ok());
    }

    #[test]
    fn round_limit() {
        let node = parse_expression(&TABLE, "x*x").unwrap();
        let limits = Limits { max_rounds: 1, ..Limits::default() };
        let err = canonicalize_with(&node, &limits, &mut ()).unwrap_err();
        assert!(err.is::<RoundLimitExceeded>());
    }

    #[test]
    fn collects_steps() {
        let node = parse_expression(&TABLE, "a/(b/c) + 0").unwrap();
        let mut steps = Vec::new();
        canonicalize_with(&node, &Limits::default(), &mut steps).unwrap();
        assert!(steps.contains(&Step::InvertFraction));
        assert!(steps.contains(&Step::AddZero));
    }
}
