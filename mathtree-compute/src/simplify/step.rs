use std::fmt;

/// A step taken while canonicalizing an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `a+(b+c) = a+b+c`
    FlattenSum,

    /// `a+0 = a`
    AddZero,

    /// A sub-expression made only of real numbers was evaluated.
    FoldConstant,

    /// `2*(a+b) = 2*a+2*b`
    DistributeCoefficient,

    /// `2*a+3*a = 5*a`
    CombineLikeTerms,

    /// `a*(b*c) = a*b*c`
    FlattenProduct,

    /// `a/(b/c) = a*c/b`
    InvertFraction,

    /// A real factor was moved into the coefficient of a product.
    FoldCoefficient,

    /// `0*a = 0`
    MultiplyZero,

    /// `a^3/a = a^2`
    Abbreviate,

    /// `a*a = a^2`
    CombineLikeFactors,

    /// `a^0 = 1`
    PowerZero,

    /// `a^1 = a`
    PowerOne,

    /// `1^a = 1`
    PowerOfOne,

    /// `a^(log(a)_b) = b`
    PowerOfLogarithm,

    /// `(a^b)^2 = a^(2*b)`
    PowerOfPower,

    /// `(a*b)^2 = a^2*b^2`
    PowerOfProduct,

    /// `a^(-b) = 1/a^b`
    RelocatePower,

    /// `log(a)_a = 1`
    LogarithmOfBase,

    /// `log(a)_1 = 0`
    LogarithmOfOne,

    /// `log(a)_(a^b) = b`
    LogarithmOfPower,

    /// `sin(pi) = 0`
    TrigOfConstant,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Step::FlattenSum => "flatten nested sums",
            Step::AddZero => "remove zero terms",
            Step::FoldConstant => "evaluate constant expression",
            Step::DistributeCoefficient => "distribute coefficient over sum",
            Step::CombineLikeTerms => "combine like terms",
            Step::FlattenProduct => "flatten nested products",
            Step::InvertFraction => "multiply by the reciprocal of a fraction",
            Step::FoldCoefficient => "move number into coefficient",
            Step::MultiplyZero => "multiply by zero",
            Step::Abbreviate => "cancel common factors",
            Step::CombineLikeFactors => "combine like factors",
            Step::PowerZero => "raise to the power of zero",
            Step::PowerOne => "raise to the power of one",
            Step::PowerOfOne => "raise one to a power",
            Step::PowerOfLogarithm => "raise a base to a logarithm in that base",
            Step::PowerOfPower => "multiply exponents of nested powers",
            Step::PowerOfProduct => "distribute power over product",
            Step::RelocatePower => "move negative power across the fraction line",
            Step::LogarithmOfBase => "logarithm of its own base",
            Step::LogarithmOfOne => "logarithm of one",
            Step::LogarithmOfPower => "logarithm of a power of its base",
            Step::TrigOfConstant => "evaluate trigonometric function at a known angle",
        };
        write!(f, "{}", text)
    }
}
