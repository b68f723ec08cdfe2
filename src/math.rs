//! Arithmetic and symbolic math.

mod arithmetic;
mod calculus;
mod expr;
mod lexer;
mod parser;
mod poly;
mod simplify;
mod solve;

use thiserror::Error;

pub use arithmetic::evaluate_arithmetic;
pub use calculus::{Limit, differentiate, integrate, limit_at_infinity};
pub use expr::Expr;
pub use parser::parse;
pub use simplify::simplify;
pub use solve::{Solution, solve};

/// Deepest nesting of parentheses, signs and powers the parsers accept.
const MAX_DEPTH: usize = 256;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown name '{0}'")]
    UnknownName(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("an equation needs exactly one '='")]
    NotAnEquation,

    #[error("expression is nested too deeply")]
    TooDeep,

    #[error("expression is too long")]
    TooLong,

    #[error("{0}")]
    Unsupported(String),
}

pub type MathResult<T> = std::result::Result<T, MathError>;

/// Formats a number the way replies show it: integers without a decimal
/// point, everything else with at most ten decimals.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    if value.abs() >= 1e15 {
        return format!("{value}");
    }

    let rounded = (value * 1e10).round() / 1e10;
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{rounded:.0}");
    }

    let text = format!("{rounded:.10}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_have_no_decimal_point() {
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn fractions_are_trimmed() {
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
    }

    #[test]
    fn infinities_use_symbol() {
        assert_eq!(format_number(f64::INFINITY), "∞");
        assert_eq!(format_number(f64::NEG_INFINITY), "-∞");
    }
}
