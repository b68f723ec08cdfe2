//! Keyword-driven symbolic math: solve, differentiate, integrate, simplify
//! and limits as x approaches infinity.

use log::debug;

use crate::math::{self, MathError, MathResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Solve,
    Differentiate,
    Integrate,
    Simplify,
    Limit,
}

/// Keywords in the order they are checked.
const KEYWORDS: [(&str, Operation); 6] = [
    ("solve", Operation::Solve),
    ("differentiate", Operation::Differentiate),
    ("derivative", Operation::Differentiate),
    ("integrate", Operation::Integrate),
    ("simplify", Operation::Simplify),
    ("limit", Operation::Limit),
];

/// Answers a symbolic math request, or `None` when no keyword is present.
///
/// Failures are reported in the reply rather than returned.
pub fn solve_symbolic(message: &str) -> Option<String> {
    let message = message.to_lowercase();
    let (keyword, operation, position) = KEYWORDS
        .iter()
        .find_map(|(keyword, op)| message.find(keyword).map(|pos| (*keyword, *op, pos)))?;

    let argument = strip_connective(&message[position + keyword.len()..]);
    debug!("Symbolic {:?} of '{}'", operation, argument);

    Some(match run(operation, argument) {
        Ok(reply) => reply,
        Err(e) => format!("Sorry, I couldn't solve that. Error: {e}"),
    })
}

/// Drops a leading "of" as in "derivative of x^2".
fn strip_connective(argument: &str) -> &str {
    let argument = argument.trim();
    argument
        .strip_prefix("of ")
        .map_or(argument, str::trim_start)
}

fn run(operation: Operation, argument: &str) -> MathResult<String> {
    match operation {
        Operation::Solve => {
            let (lhs, rhs) = split_equation(argument)?;
            let solution = math::solve(&math::parse(lhs)?, &math::parse(rhs)?)?;
            Ok(format!("Solution: {solution}"))
        }
        Operation::Differentiate => {
            let derivative = math::differentiate(&math::parse(argument)?);
            Ok(format!("Derivative: {derivative}"))
        }
        Operation::Integrate => {
            let integral = math::integrate(&math::parse(argument)?)?;
            Ok(format!("Integral: {integral}"))
        }
        Operation::Simplify => {
            let simplified = math::simplify(&math::parse(argument)?);
            Ok(format!("Simplified: {simplified}"))
        }
        Operation::Limit => {
            let limit = math::limit_at_infinity(&math::parse(argument)?)?;
            Ok(format!("Limit as x approaches ∞: {limit}"))
        }
    }
}

fn split_equation(argument: &str) -> MathResult<(&str, &str)> {
    let mut sides = argument.split('=');
    match (sides.next(), sides.next(), sides.next()) {
        (Some(lhs), Some(rhs), None) => Ok((lhs, rhs)),
        _ => Err(MathError::NotAnEquation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(message: &str) -> String {
        solve_symbolic(message).expect("keyword present")
    }

    #[test]
    fn solves_equations() {
        assert_eq!(reply("solve x^2 - 5x + 6 = 0"), "Solution: [2, 3]");
        assert_eq!(reply("solve 2*x + 1 = 7"), "Solution: [3]");
        assert_eq!(reply("Solve x**2 = 4"), "Solution: [-2, 2]");
    }

    #[test]
    fn differentiates() {
        assert_eq!(reply("differentiate x^3"), "Derivative: 3*x^2");
        assert_eq!(reply("derivative of sin(x)"), "Derivative: cos(x)");
    }

    #[test]
    fn integrates_and_simplifies() {
        assert_eq!(reply("integrate 2*x"), "Integral: x^2");
        assert_eq!(reply("simplify (x^2 - 1)/(x - 1)"), "Simplified: x + 1");
    }

    #[test]
    fn limits_at_infinity() {
        assert_eq!(reply("limit 1/x"), "Limit as x approaches ∞: 0");
        assert_eq!(reply("limit of x^2"), "Limit as x approaches ∞: ∞");
    }

    #[test]
    fn failures_are_reported_in_the_reply() {
        assert_eq!(
            reply("solve x + 1"),
            "Sorry, I couldn't solve that. Error: an equation needs exactly one '='"
        );
        assert_eq!(
            reply("differentiate y^2"),
            "Sorry, I couldn't solve that. Error: unknown name 'y'"
        );
        assert!(reply("integrate x*sin(x)").starts_with("Sorry, I couldn't solve that. Error:"));
    }

    #[test]
    fn oversized_input_is_reported() {
        let nested = format!("simplify {}x{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(
            reply(&nested),
            "Sorry, I couldn't solve that. Error: expression is too long"
        );
        assert_eq!(
            reply(&format!("differentiate {}x", "-".repeat(300))),
            "Sorry, I couldn't solve that. Error: expression is nested too deeply"
        );
    }

    #[test]
    fn nested_powers_are_not_expanded() {
        assert_eq!(reply("simplify ((x^64)^64)^64"), "Simplified: x^262144");
    }

    #[test]
    fn messages_without_keywords_fall_through() {
        assert_eq!(solve_symbolic("hello there"), None);
    }
}
