//! Restricted arithmetic: numbers, `+ - * / %`, unary signs and parentheses.

use log::debug;

use super::lexer::{Token, tokenize};
use super::{MAX_DEPTH, MathError, MathResult, format_number};

/// Evaluates a plain arithmetic question such as "5 plus 3".
///
/// Returns `None` when the message is not an arithmetic expression, so the
/// caller can try the next handler.
pub fn evaluate_arithmetic(message: &str) -> Option<String> {
    let expression = normalize_operators(message);
    if !is_arithmetic(&expression) {
        return None;
    }

    let tokens = tokenize(&expression).ok()?;
    match Evaluator::new(&tokens).run() {
        Ok(value) if value.is_finite() => Some(format!("The answer is: {}", format_number(value))),
        Ok(_) => None,
        Err(MathError::DivisionByZero) => Some("Sorry, I can't divide by zero.".to_string()),
        Err(e) => {
            debug!("Arithmetic rejected '{expression}': {e}");
            None
        }
    }
}

/// Rewrites spoken operators into symbols, word by word.
fn normalize_operators(message: &str) -> String {
    let words: Vec<&str> = message.split_whitespace().collect();
    let mut out: Vec<&str> = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let word = words[i];
        let next = words.get(i + 1).copied();
        let symbol = match (word, next) {
            ("divided", Some("by")) => {
                i += 1;
                "/"
            }
            ("plus", _) => "+",
            ("minus", _) => "-",
            ("times" | "into" | "x", _) => "*",
            ("over", _) => "/",
            ("mod" | "modulo", _) => "%",
            _ => word,
        };
        out.push(symbol);
        i += 1;
    }

    out.join(" ")
}

fn is_arithmetic(expression: &str) -> bool {
    expression.chars().any(|c| c.is_ascii_digit())
        && expression.chars().all(|c| {
            c.is_ascii_digit()
                || c.is_whitespace()
                || matches!(c, '+' | '-' | '*' | '/' | '%' | '.' | '(' | ')')
        })
}

struct Evaluator<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn run(mut self) -> MathResult<f64> {
        let value = self.sum()?;
        match self.tokens.get(self.pos) {
            None => Ok(value),
            Some(token) => Err(MathError::UnexpectedToken(token.describe())),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn sum(&mut self) -> MathResult<f64> {
        let mut value = self.product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.product()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.product()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn product(&mut self) -> MathResult<f64> {
        let mut value = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(op @ (Token::Star | Token::Slash | Token::Percent)) => op.clone(),
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Token::Star => value * rhs,
                Token::Slash if rhs == 0.0 => return Err(MathError::DivisionByZero),
                Token::Slash => value / rhs,
                Token::Percent if rhs == 0.0 => return Err(MathError::DivisionByZero),
                // Sign follows the divisor
                _ => value - rhs * (value / rhs).floor(),
            };
        }
    }

    fn unary(&mut self) -> MathResult<f64> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MathError::TooDeep);
        }
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> MathResult<f64> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.atom(),
        }
    }

    fn atom(&mut self) -> MathResult<f64> {
        let token = self.peek().cloned().ok_or(MathError::UnexpectedEnd)?;
        self.pos += 1;
        match token {
            Token::Number(value) => Ok(value),
            Token::LParen => {
                let value = self.sum()?;
                match self.peek() {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(other) => Err(MathError::UnexpectedToken(other.describe())),
                    None => Err(MathError::UnexpectedEnd),
                }
            }
            other => Err(MathError::UnexpectedToken(other.describe())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_nesting_falls_through() {
        let nested = format!("{}1{}", "(".repeat(100_000), ")".repeat(100_000));
        assert_eq!(evaluate_arithmetic(&nested), None);

        let signs = format!("{}1", "- ".repeat(1000));
        assert_eq!(evaluate_arithmetic(&signs), None);

        let shallow = format!("{}2 + 3{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(evaluate_arithmetic(&shallow).as_deref(), Some("The answer is: 5"));
    }

    #[test]
    fn spoken_addition() {
        assert_eq!(
            evaluate_arithmetic("5 plus 3").as_deref(),
            Some("The answer is: 8")
        );
    }

    #[test]
    fn precedence_and_parentheses() {
        assert_eq!(
            evaluate_arithmetic("2 + 3 * 4").as_deref(),
            Some("The answer is: 14")
        );
        assert_eq!(
            evaluate_arithmetic("(2 + 3) * 4").as_deref(),
            Some("The answer is: 20")
        );
        assert_eq!(
            evaluate_arithmetic("-(4 - 10)").as_deref(),
            Some("The answer is: 6")
        );
    }

    #[test]
    fn spoken_operators() {
        assert_eq!(
            evaluate_arithmetic("6 into 7").as_deref(),
            Some("The answer is: 42")
        );
        assert_eq!(
            evaluate_arithmetic("9 divided by 4").as_deref(),
            Some("The answer is: 2.25")
        );
        assert_eq!(
            evaluate_arithmetic("17 mod 5").as_deref(),
            Some("The answer is: 2")
        );
        assert_eq!(
            evaluate_arithmetic("2.5 x 4").as_deref(),
            Some("The answer is: 10")
        );
        assert_eq!(
            evaluate_arithmetic("10 minus 15").as_deref(),
            Some("The answer is: -5")
        );
    }

    #[test]
    fn modulo_follows_divisor_sign() {
        assert_eq!(
            evaluate_arithmetic("-7 % 3").as_deref(),
            Some("The answer is: 2")
        );
    }

    #[test]
    fn division_by_zero_is_an_apology_not_a_panic() {
        assert_eq!(
            evaluate_arithmetic("10 divided by 0").as_deref(),
            Some("Sorry, I can't divide by zero.")
        );
        assert_eq!(
            evaluate_arithmetic("4 mod 0").as_deref(),
            Some("Sorry, I can't divide by zero.")
        );
    }

    #[test]
    fn non_arithmetic_falls_through() {
        assert_eq!(evaluate_arithmetic("hello there"), None);
        assert_eq!(evaluate_arithmetic("solve x + 1 = 2"), None);
        assert_eq!(evaluate_arithmetic("( )"), None);
        assert_eq!(evaluate_arithmetic("5 +"), None);
        assert_eq!(evaluate_arithmetic("2 (3)"), None);
    }

    #[test]
    fn code_injection_is_not_arithmetic() {
        assert_eq!(evaluate_arithmetic("__import__('os').system('ls')"), None);
    }
}
