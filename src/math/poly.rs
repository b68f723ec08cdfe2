//! Dense polynomials in `x` with floating-point coefficients.

use super::expr::Expr;
use super::simplify::sum_of;

const EPSILON: f64 = 1e-12;
const MAX_POWER: f64 = 64.0;
/// Expansions past this degree are not treated as polynomials.
const MAX_DEGREE: usize = 256;

/// `coeffs[i]` is the coefficient of `x^i`; trailing zeros are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    coeffs: Vec<f64>,
}

impl Poly {
    pub fn new(mut coeffs: Vec<f64>) -> Poly {
        while coeffs.last().is_some_and(|c| c.abs() < EPSILON) {
            coeffs.pop();
        }
        Poly { coeffs }
    }

    pub fn constant(value: f64) -> Poly {
        Poly::new(vec![value])
    }

    pub fn x() -> Poly {
        Poly::new(vec![0.0, 1.0])
    }

    /// Converts an expression to a polynomial when it is one.
    pub fn from_expr(expr: &Expr) -> Option<Poly> {
        match expr {
            Expr::Num(v) => Some(Poly::constant(*v)),
            Expr::Var => Some(Poly::x()),
            Expr::Const(_) | Expr::Call(..) => None,
            Expr::Add(a, b) => Some(Poly::from_expr(a)?.add(&Poly::from_expr(b)?)),
            Expr::Sub(a, b) => Some(Poly::from_expr(a)?.sub(&Poly::from_expr(b)?)),
            Expr::Mul(a, b) => {
                let (a, b) = (Poly::from_expr(a)?, Poly::from_expr(b)?);
                if a.degree() + b.degree() > MAX_DEGREE {
                    return None;
                }
                Some(a.mul(&b))
            }
            Expr::Neg(a) => Some(Poly::from_expr(a)?.scale(-1.0)),
            Expr::Div(a, b) => {
                let divisor = Poly::from_expr(b)?.as_constant()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(Poly::from_expr(a)?.scale(1.0 / divisor))
            }
            Expr::Pow(base, exponent) => {
                let n = Poly::from_expr(exponent)?.as_constant()?;
                if n < 0.0 || n > MAX_POWER || n.fract() != 0.0 {
                    return None;
                }
                let base = Poly::from_expr(base)?;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let n = n as u32;
                if base.degree() * n as usize > MAX_DEGREE {
                    return None;
                }
                Some(base.pow(n))
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn coeff(&self, power: usize) -> f64 {
        self.coeffs.get(power).copied().unwrap_or(0.0)
    }

    pub fn leading(&self) -> f64 {
        self.coeffs.last().copied().unwrap_or(0.0)
    }

    pub fn as_constant(&self) -> Option<f64> {
        match self.coeffs.len() {
            0 => Some(0.0),
            1 => Some(self.coeffs[0]),
            _ => None,
        }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let len = self.coeffs.len().max(other.coeffs.len());
        Poly::new((0..len).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.scale(-1.0))
    }

    pub fn scale(&self, factor: f64) -> Poly {
        Poly::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::new(Vec::new());
        }
        let mut out = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Poly::new(out)
    }

    pub fn pow(&self, n: u32) -> Poly {
        (0..n).fold(Poly::constant(1.0), |acc, _| acc.mul(self))
    }

    /// Long division; `None` when dividing by the zero polynomial.
    pub fn div_rem(&self, divisor: &Poly) -> Option<(Poly, Poly)> {
        if divisor.is_zero() {
            return None;
        }
        let mut remainder = self.coeffs.clone();
        let d = divisor.degree();
        if self.is_zero() || self.degree() < d {
            return Some((Poly::new(Vec::new()), self.clone()));
        }

        let mut quotient = vec![0.0; self.degree() - d + 1];
        for k in (0..quotient.len()).rev() {
            let factor = remainder[k + d] / divisor.leading();
            quotient[k] = factor;
            for (j, c) in divisor.coeffs.iter().enumerate() {
                remainder[k + j] -= factor * c;
            }
        }
        remainder.truncate(d);
        let remainder = Poly::new(remainder.into_iter().map(snap).collect());
        Some((Poly::new(quotient.into_iter().map(snap).collect()), remainder))
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn derivative(&self) -> Poly {
        Poly::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * i as f64)
                .collect(),
        )
    }

    /// Antiderivative with zero constant term
    #[allow(clippy::cast_precision_loss)]
    pub fn integral(&self) -> Poly {
        let mut out = vec![0.0];
        out.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c / (i + 1) as f64),
        );
        Poly::new(out)
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// Canonical expression, highest power first.
    pub fn to_expr(&self) -> Expr {
        let terms = self
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .map(|(power, c)| (*c, monomial(power)))
            .collect();
        sum_of(terms)
    }
}

#[allow(clippy::cast_precision_loss)]
fn monomial(power: usize) -> Expr {
    match power {
        0 => Expr::num(1.0),
        1 => Expr::Var,
        n => Expr::pow(Expr::Var, Expr::num(n as f64)),
    }
}

/// Rounds away floating-point noise near integers and zero.
fn snap(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        rounded
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::parse;

    fn poly(input: &str) -> Poly {
        Poly::from_expr(&parse(input).expect("valid expression")).expect("polynomial")
    }

    #[test]
    fn expands_products_and_powers() {
        assert_eq!(poly("(x + 1)^2").coefficients(), &[1.0, 2.0, 1.0]);
        assert_eq!(poly("2x(x - 3)").coefficients(), &[0.0, -6.0, 2.0]);
        assert_eq!(poly("x^2/2").coefficients(), &[0.0, 0.0, 0.5]);
    }

    #[test]
    fn non_polynomials_are_rejected() {
        let e = parse("sin(x) + 1").expect("valid expression");
        assert!(Poly::from_expr(&e).is_none());
        let e = parse("1/x").expect("valid expression");
        assert!(Poly::from_expr(&e).is_none());
        let e = parse("x^0.5").expect("valid expression");
        assert!(Poly::from_expr(&e).is_none());
    }

    #[test]
    fn oversized_expansions_are_rejected() {
        let e = parse("((x^64)^64)^64").expect("valid expression");
        assert!(Poly::from_expr(&e).is_none());
        let e = parse("(x^2 + 1)^64 * (x^2 + 1)^64 * x").expect("valid expression");
        assert!(Poly::from_expr(&e).is_none());
        assert_eq!(poly("(x^4)^64").degree(), 256);
    }

    #[test]
    fn exact_division() {
        let (q, r) = poly("x^2 - 1").div_rem(&poly("x - 1")).expect("nonzero divisor");
        assert_eq!(q.coefficients(), &[1.0, 1.0]);
        assert!(r.is_zero());
    }

    #[test]
    fn division_with_remainder() {
        let (q, r) = poly("x^2 + 1").div_rem(&poly("x")).expect("nonzero divisor");
        assert_eq!(q.coefficients(), &[0.0, 1.0]);
        assert_eq!(r.coefficients(), &[1.0]);
    }

    #[test]
    fn calculus_on_coefficients() {
        let p = poly("x^3 + 2x");
        assert_eq!(p.derivative().coefficients(), &[2.0, 0.0, 3.0]);
        assert_eq!(poly("2x").integral().coefficients(), &[0.0, 0.0, 1.0]);
        assert_eq!(p.eval(2.0), 12.0);
    }

    #[test]
    fn canonical_form_lists_highest_power_first() {
        assert_eq!(poly("6 - 5x + x^2").to_expr().to_string(), "x^2 - 5*x + 6");
        assert_eq!(poly("x - x").to_expr().to_string(), "0");
        assert_eq!(poly("-x + 1").to_expr().to_string(), "-x + 1");
    }
}
