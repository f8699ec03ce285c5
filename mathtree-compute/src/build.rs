//! Folding of the grammar-shaped syntax tree into a [`MathNode`].
//!
//! The tree builder understands the nonterminals of the bundled expression grammar. Chains of
//! `+` / `-` become a [`MathNode::Sum`], chains of `*` / `/` become a [`MathNode::Product`], and a
//! leading `-` negates the node it applies to with the node's own negation rule.
//!
//! Like the parser, the builder walks the syntax tree with an explicit stack instead of
//! recursing. It tracks the depth of every node it builds and stops with a
//! [`DepthLimitExceeded`] error as soon as one is nested deeper than [`Limits::max_depth`], so the
//! recursive passes over the result are never handed a tree that could exhaust the call stack.

use mathtree_error::Error;
use mathtree_parser::{
    grammar::ParseTable,
    parser::{NodeRef, Parser, SyntaxTree},
};
use crate::{
    error::{DepthLimitExceeded, InvalidNumber, UnexpectedSyntax},
    node::{Constant, MathNode, TrigFunc},
    simplify::Limits,
};

/// Returns the error for a syntax node the builder does not understand.
fn unexpected(node: NodeRef) -> Error {
    Error::new(vec![node.span()], UnexpectedSyntax { symbol: node.symbol().to_string() })
}

/// The value of a syntax node whose children have all been built.
enum Partial<'tree> {
    /// A terminal, an operator nonterminal, or a nonterminal that derived nothing.
    Syntax(NodeRef<'tree>),

    /// A built node and its depth.
    Node(MathNode, usize),

    /// The operators and operands of an `expr_tail`, `term_tail` or `body_tail`, in reverse
    /// source order.
    Chain(Vec<(&'tree str, MathNode, usize)>),
}

/// The built children of one syntax node.
struct Parts<'tree> {
    node: NodeRef<'tree>,
    parts: std::vec::IntoIter<Partial<'tree>>,
}

impl<'tree> Parts<'tree> {
    fn next(&mut self) -> Result<Partial<'tree>, Error> {
        self.parts.next().ok_or_else(|| unexpected(self.node))
    }

    /// Takes the next child, which must be a terminal or operator.
    fn syntax(&mut self) -> Result<NodeRef<'tree>, Error> {
        match self.next()? {
            Partial::Syntax(node) => Ok(node),
            _ => Err(unexpected(self.node)),
        }
    }

    /// Takes the next child, which must be a built node.
    fn node(&mut self) -> Result<(MathNode, usize), Error> {
        match self.next()? {
            Partial::Node(node, depth) => Ok((node, depth)),
            _ => Err(unexpected(self.node)),
        }
    }

    /// Takes the next child, which must be a chain.
    fn chain(&mut self) -> Result<Vec<(&'tree str, MathNode, usize)>, Error> {
        match self.next()? {
            Partial::Chain(chain) => Ok(chain),
            _ => Err(unexpected(self.node)),
        }
    }
}

/// Returns the text of a terminal node.
fn lexeme<'tree>(node: NodeRef<'tree>) -> Result<&'tree str, Error> {
    node.lexeme().ok_or_else(|| unexpected(node))
}

/// Negates a built node. Numbers and products keep their depth; a sum may gain a level in its
/// addends, and any other node is wrapped in a product.
fn negate(node: MathNode, depth: usize) -> (MathNode, usize) {
    let depth = match node {
        MathNode::Number(_) | MathNode::Product(_) => depth,
        _ => depth + 1,
    };
    (-node, depth)
}

/// Combines the children of a syntax node into its value.
fn combine<'tree>(node: NodeRef<'tree>, mut parts: Parts<'tree>) -> Result<Partial<'tree>, Error> {
    if node.symbol().is_terminal() {
        return Ok(Partial::Syntax(node));
    }

    let built = match node.symbol().as_str() {
        "expr" | "term" => {
            let (first, first_depth) = parts.node()?;
            let chain = parts.chain()?;
            if chain.is_empty() {
                return Ok(Partial::Node(first, first_depth));
            }

            let mut depth = first_depth;
            let mut numerator = vec![first];
            let mut denominator = Vec::new();
            for (op, operand, operand_depth) in chain.into_iter().rev() {
                match op {
                    "MINUS" => {
                        let (negated, negated_depth) = negate(operand, operand_depth);
                        depth = depth.max(negated_depth);
                        numerator.push(negated);
                    },
                    "DIVIDE" => {
                        depth = depth.max(operand_depth);
                        denominator.push(operand);
                    },
                    _ => {
                        depth = depth.max(operand_depth);
                        numerator.push(operand);
                    },
                }
            }

            let built = if node.symbol().as_str() == "expr" {
                MathNode::Sum(numerator)
            } else {
                MathNode::product(numerator, denominator)
            };
            (built, depth + 1)
        },
        "expr_tail" | "term_tail" => {
            if node.is_empty() {
                return Ok(Partial::Chain(Vec::new()));
            }
            let op = parts.syntax()?;
            let (operand, depth) = parts.node()?;
            let mut chain = parts.chain()?;
            chain.push((op.symbol().as_str(), operand, depth));
            return Ok(Partial::Chain(chain));
        },
        "body_tail" => {
            if node.is_empty() {
                return Ok(Partial::Chain(Vec::new()));
            }
            let op = parts.syntax()?;
            let (exponent, depth) = parts.node()?;
            return Ok(Partial::Chain(vec![(op.symbol().as_str(), exponent, depth)]));
        },
        "addop" | "mulop" | "trifunc" | "prefix" => {
            if node.is_empty() {
                return Ok(Partial::Syntax(node));
            }
            return Ok(Partial::Syntax(parts.syntax()?));
        },
        "factor" => {
            let prefix = parts.syntax()?;
            let (body, depth) = parts.node()?;
            if prefix.is_empty() {
                (body, depth)
            } else {
                negate(body, depth)
            }
        },
        "body" => {
            let (base, base_depth) = parts.node()?;
            match parts.chain()?.pop() {
                Some((_, exponent, depth)) => (MathNode::power(base, exponent), base_depth.max(depth) + 1),
                None => (base, base_depth),
            }
        },
        "expo" | "funbody" | "function" => match node.children().len() {
            3 => {
                parts.syntax()?;
                parts.node()?
            },
            1 => parts.node()?,
            _ => return Err(unexpected(node)),
        },
        "triangular" => {
            let name = parts.syntax()?;
            let func = TrigFunc::from_name(lexeme(name)?).ok_or_else(|| unexpected(name))?;
            let (body, depth) = parts.node()?;
            (MathNode::trig(func, body), depth + 1)
        },
        "logarithm" => {
            parts.syntax()?;
            let (base, base_depth) = parts.node()?;
            parts.syntax()?;
            let (body, body_depth) = parts.node()?;
            (MathNode::log(base, body), base_depth.max(body_depth) + 1)
        },
        "var" => (MathNode::var(lexeme(parts.syntax()?)?), 1),
        "num" => {
            let leaf = parts.syntax()?;
            let text = lexeme(leaf)?;
            let number = match leaf.symbol().as_str() {
                "CONST" => Constant::from_name(text)
                    .map(MathNode::constant)
                    .ok_or_else(|| unexpected(leaf))?,
                _ => text
                    .parse::<f64>()
                    .map(MathNode::real)
                    .map_err(|_| Error::new(vec![leaf.span()], InvalidNumber { lexeme: text.to_string() }))?,
            };
            (number, 1)
        },
        _ => return Err(unexpected(node)),
    };

    Ok(Partial::Node(built.0, built.1))
}

/// Builds the algebraic tree from a syntax tree produced with the bundled expression grammar.
pub fn build(tree: &SyntaxTree) -> Result<MathNode, Error> {
    build_with(tree, &Limits::default())
}

/// Builds the algebraic tree, failing if any node would be nested deeper than the depth limit.
pub fn build_with(tree: &SyntaxTree, limits: &Limits) -> Result<MathNode, Error> {
    let root = tree.root()
        .ok_or_else(|| Error::detached(UnexpectedSyntax { symbol: "$".to_string() }))?;

    // post-order walk: a node is combined once all of its children have been
    let mut stack = vec![(root, false)];
    let mut values: Vec<Partial> = Vec::new();
    while let Some((node, expanded)) = stack.pop() {
        if !expanded {
            stack.push((node, true));
            let children = node.children().collect::<Vec<_>>();
            stack.extend(children.into_iter().rev().map(|child| (child, false)));
            continue;
        }

        let count = node.children().len();
        let start = values.len().checked_sub(count).ok_or_else(|| unexpected(node))?;
        let parts = Parts { node, parts: values.split_off(start).into_iter() };
        let partial = combine(node, parts)?;
        if let Partial::Node(_, depth) = &partial {
            if *depth > limits.max_depth {
                return Err(Error::new(vec![node.span()], DepthLimitExceeded { limit: limits.max_depth }));
            }
        }
        values.push(partial);
    }

    match values.pop() {
        Some(Partial::Node(node, _)) if values.is_empty() => Ok(node),
        _ => Err(unexpected(root)),
    }
}

/// Parses the source with the given tables and builds its algebraic tree.
pub fn parse_expression(table: &ParseTable, source: &str) -> Result<MathNode, Error> {
    parse_expression_with(table, source, &Limits::default())
}

/// Parses the source with the given tables and builds its algebraic tree within the limits.
pub fn parse_expression_with(table: &ParseTable, source: &str, limits: &Limits) -> Result<MathNode, Error> {
    let tree = Parser::new(table).parse_str(source)?;
    build_with(&tree, limits)
}

#[cfg(test)]
mod tests {
    use crate::{node::{Coefficient, Product}, test_support::TABLE};
    use mathtree_parser::{
        grammar::{build_tables, Grammar},
        parser::error::UnexpectedToken,
        tokenizer::TokenKind,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> MathNode {
        parse_expression(&TABLE, source).unwrap()
    }

    fn x() -> MathNode {
        MathNode::var("x")
    }

    #[test]
    fn sums_and_products() {
        assert_eq!(parse("2*x^2 - 5*x*x"), MathNode::Sum(vec![
            MathNode::product(vec![MathNode::real(2.0), MathNode::power(x(), MathNode::real(2.0))], vec![]),
            MathNode::Product(Product::new(vec![MathNode::real(5.0), x(), x()], vec![], Coefficient::MINUS_ONE)),
        ]));
        assert_eq!(parse("a/b*c"), MathNode::product(vec![MathNode::var("a"), MathNode::var("c")], vec![MathNode::var("b")]));
    }

    #[test]
    fn unary_minus() {
        assert_eq!(parse("-3"), MathNode::real(-3.0));
        assert_eq!(parse("-x^2"), -MathNode::power(x(), MathNode::real(2.0)));
        assert_eq!(parse("x - 1"), MathNode::Sum(vec![x(), MathNode::real(-1.0)]));
    }

    #[test]
    fn powers_are_right_associative() {
        assert_eq!(
            parse("x^y^2"),
            MathNode::power(x(), MathNode::power(MathNode::var("y"), MathNode::real(2.0))),
        );
        assert_eq!(parse("x^-1"), MathNode::power(x(), MathNode::real(-1.0)));
    }

    #[test]
    fn functions() {
        assert_eq!(parse("sin x"), MathNode::trig(TrigFunc::Sin, x()));
        assert_eq!(parse("loge_x"), MathNode::ln(x()));
        assert_eq!(parse("tan(x + 1)"), MathNode::trig(TrigFunc::Tan, x() + MathNode::one()));
        assert_eq!(
            parse("log(e)_(e^(x-1))"),
            MathNode::ln(MathNode::power(MathNode::constant(Constant::E), x() + MathNode::real(-1.0))),
        );
        assert_eq!(parse("log(2)_cos(pi)"), MathNode::log(
            MathNode::real(2.0),
            MathNode::trig(TrigFunc::Cos, MathNode::constant(Constant::Pi)),
        ));
    }

    #[test]
    fn decimals() {
        assert_eq!(parse("0.25*x"), MathNode::product(vec![MathNode::real(0.25), x()], vec![]));
    }

    #[test]
    fn parse_errors_pass_through() {
        let err = parse_expression(&TABLE, "x + * 2").unwrap_err();
        assert!(err.is::<UnexpectedToken>());
    }

    #[test]
    fn foreign_grammar() {
        let grammar = "s -> VAR".parse::<Grammar>().unwrap();
        let table = build_tables(grammar, TokenKind::alphabet()).unwrap();
        let err = parse_expression(&table, "x").unwrap_err();
        assert_eq!(
            err.downcast_ref::<UnexpectedSyntax>(),
            Some(&UnexpectedSyntax { symbol: "s".to_string() }),
        );
        assert_eq!(err.spans, vec![0..1]);
    }

    fn nested_sin(levels: usize) -> String {
        format!("{}x{}", "sin(".repeat(levels), ")".repeat(levels))
    }

    #[test]
    fn nested_functions() {
        let node = parse(&nested_sin(40));
        assert_eq!(node.depth(), 41);
    }

    #[test]
    fn depth_limit() {
        let err = parse_expression(&TABLE, &nested_sin(3000)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DepthLimitExceeded>(),
            Some(&DepthLimitExceeded { limit: Limits::default().max_depth }),
        );

        let limits = Limits { max_depth: 3, ..Limits::default() };
        assert!(parse_expression_with(&TABLE, &nested_sin(2), &limits).is_ok());
        let err = parse_expression_with(&TABLE, &nested_sin(3), &limits).unwrap_err();
        assert!(err.is::<DepthLimitExceeded>());
    }

    #[test]
    fn negation_keeps_product_depth() {
        let limits = Limits { max_depth: 2, ..Limits::default() };
        assert_eq!(parse_expression_with(&TABLE, "-(-(-(2*x)))", &limits).unwrap().depth(), 2);
    }

    #[test]
    fn long_flat_sum() {
        let source = vec!["x"; 5000].join(" + ");
        match parse(&source) {
            MathNode::Sum(addends) => assert_eq!(addends.len(), 5000),
            other => panic!("expected a sum, got {:?}", other),
        }
    }
}
