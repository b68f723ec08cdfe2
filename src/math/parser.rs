//! Recursive-descent parser for symbolic expressions.
//!
//! Grammar:
//! ```text
//! sum     := product (("+" | "-") product)*
//! product := unary (("*" | "/") unary | power)*
//! unary   := ("-" | "+") unary | power
//! power   := atom ("^" unary)?
//! atom    := number | "x" | "pi" | "e" | func "(" sum ")" | "(" sum ")"
//! ```
//! A `power` directly following another factor is an implicit
//! multiplication, so `2x` and `3(x + 1)` parse as products.

use super::expr::{Constant, Expr, Func};
use super::lexer::{Token, tokenize};
use super::{MAX_DEPTH, MathError, MathResult};

/// Longest token sequence accepted for symbolic work.
const MAX_TOKENS: usize = 512;

/// Parses an expression in `x`.
pub fn parse(input: &str) -> MathResult<Expr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(MathError::UnexpectedEnd);
    }
    if tokens.len() > MAX_TOKENS {
        return Err(MathError::TooLong);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.sum()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token::Equals) => Err(MathError::Unsupported(
            "'=' is only allowed in equations".to_string(),
        )),
        Some(token) => Err(MathError::UnexpectedToken(token.describe())),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> MathResult<Token> {
        let token = self.peek().cloned().ok_or(MathError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> MathResult<()> {
        let token = self.next()?;
        if &token == expected {
            Ok(())
        } else {
            Err(MathError::UnexpectedToken(token.describe()))
        }
    }

    fn sum(&mut self) -> MathResult<Expr> {
        let mut expr = self.product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    expr = Expr::add(expr, self.product()?);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    expr = Expr::sub(expr, self.product()?);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn product(&mut self) -> MathResult<Expr> {
        let mut expr = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    expr = Expr::mul(expr, self.unary()?);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    expr = Expr::div(expr, self.unary()?);
                }
                Some(Token::Percent) => {
                    return Err(MathError::Unsupported(
                        "'%' is not supported in symbolic expressions".to_string(),
                    ));
                }
                Some(Token::Number(_) | Token::Ident(_) | Token::LParen) => {
                    expr = Expr::mul(expr, self.power()?);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn unary(&mut self) -> MathResult<Expr> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MathError::TooDeep);
        }
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> MathResult<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::neg(self.unary()?))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> MathResult<Expr> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::pow(base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> MathResult<Expr> {
        match self.next()? {
            Token::Number(value) => Ok(Expr::num(value)),
            Token::LParen => {
                let inner = self.sum()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => self.named(&name),
            other => Err(MathError::UnexpectedToken(other.describe())),
        }
    }

    fn named(&mut self, name: &str) -> MathResult<Expr> {
        match name {
            "x" => Ok(Expr::Var),
            "pi" => Ok(Expr::Const(Constant::Pi)),
            "e" => Ok(Expr::Const(Constant::E)),
            _ => {
                let func = Func::from_name(name)
                    .ok_or_else(|| MathError::UnknownName(name.to_string()))?;
                self.expect(&Token::LParen)?;
                let arg = self.sum()?;
                self.expect(&Token::RParen)?;
                Ok(Expr::call(func, arg))
            }
        }
    }
}
