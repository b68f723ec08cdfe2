//! Polynomial equation solving.

use std::fmt;

use super::expr::Expr;
use super::poly::Poly;
use super::simplify::simplify;
use super::{MathError, MathResult, format_number};

const ROOT_TOLERANCE: f64 = 1e-9;
const MAX_CONSTANT_FOR_SEARCH: f64 = 1e6;

/// One root of an equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Root {
    Real(f64),
    Complex { re: f64, im: f64 },
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Root::Real(value) => write!(f, "{}", format_number(*value)),
            Root::Complex { re, im } => {
                let magnitude = if (im.abs() - 1.0).abs() < 1e-12 {
                    "i".to_string()
                } else {
                    format!("{}i", format_number(im.abs()))
                };
                let sign = if *im < 0.0 { "-" } else { "+" };
                if re.abs() < 1e-12 {
                    let sign = if *im < 0.0 { "-" } else { "" };
                    write!(f, "{sign}{magnitude}")
                } else {
                    write!(f, "{} {sign} {magnitude}", format_number(*re))
                }
            }
        }
    }
}

/// Outcome of solving an equation.
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    /// Listed roots; empty when there is no solution
    Roots(Vec<Root>),
    /// The equation holds for every x
    AllValues,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solution::AllValues => write!(f, "every x satisfies the equation"),
            Solution::Roots(roots) => {
                let listed: Vec<String> = roots.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", listed.join(", "))
            }
        }
    }
}

/// Solves `lhs = rhs` for `x`.
pub fn solve(lhs: &Expr, rhs: &Expr) -> MathResult<Solution> {
    let difference = Expr::sub(lhs.clone(), rhs.clone());

    let (numerator, excluded) = match Poly::from_expr(&difference) {
        Some(poly) => (poly, None),
        None => match simplify(&difference) {
            Expr::Div(top, bottom) => match (Poly::from_expr(&top), Poly::from_expr(&bottom)) {
                (Some(top), Some(bottom)) => (top, Some(bottom)),
                _ => return Err(not_polynomial()),
            },
            simplified => (Poly::from_expr(&simplified).ok_or_else(not_polynomial)?, None),
        },
    };

    if numerator.degree() == 0 {
        return Ok(if numerator.is_zero() && excluded.is_none() {
            Solution::AllValues
        } else {
            Solution::Roots(Vec::new())
        });
    }

    let mut roots = polynomial_roots(&numerator)?;
    if let Some(bottom) = excluded {
        roots.retain(|root| match root {
            Root::Real(value) => bottom.eval(*value).abs() > ROOT_TOLERANCE,
            Root::Complex { .. } => true,
        });
    }
    Ok(Solution::Roots(roots))
}

fn not_polynomial() -> MathError {
    MathError::Unsupported("only polynomial equations in x can be solved".to_string())
}

/// Roots of a non-constant polynomial: real roots ascending, then complex.
fn polynomial_roots(poly: &Poly) -> MathResult<Vec<Root>> {
    let mut remaining = poly.clone();
    let mut roots: Vec<Root> = Vec::new();

    while remaining.degree() > 2 {
        let Some(root) = rational_root(&remaining) else {
            return Err(MathError::Unsupported(format!(
                "cannot solve polynomial equations of degree {}",
                remaining.degree()
            )));
        };
        roots.push(Root::Real(root));
        let divisor = Poly::new(vec![-root, 1.0]);
        remaining = remaining
            .div_rem(&divisor)
            .map(|(quotient, _)| quotient)
            .ok_or_else(|| MathError::Unsupported("polynomial division failed".to_string()))?;
    }

    roots.extend(low_degree_roots(&remaining));

    let mut real: Vec<f64> = Vec::new();
    let mut complex: Vec<Root> = Vec::new();
    for root in roots {
        match root {
            Root::Real(value) => {
                if !real.iter().any(|r| (r - value).abs() < ROOT_TOLERANCE) {
                    real.push(value);
                }
            }
            complex_root => complex.push(complex_root),
        }
    }
    real.sort_by(f64::total_cmp);

    let mut all: Vec<Root> = real.into_iter().map(Root::Real).collect();
    all.extend(complex);
    Ok(all)
}

fn low_degree_roots(poly: &Poly) -> Vec<Root> {
    match poly.degree() {
        1 => vec![Root::Real(clean(-poly.coeff(0) / poly.coeff(1)))],
        2 => {
            let (a, b, c) = (poly.coeff(2), poly.coeff(1), poly.coeff(0));
            let discriminant = b * b - 4.0 * a * c;
            if discriminant.abs() < ROOT_TOLERANCE {
                vec![Root::Real(clean(-b / (2.0 * a)))]
            } else if discriminant > 0.0 {
                let sqrt = discriminant.sqrt();
                vec![
                    Root::Real(clean((-b - sqrt) / (2.0 * a))),
                    Root::Real(clean((-b + sqrt) / (2.0 * a))),
                ]
            } else {
                let re = clean(-b / (2.0 * a));
                let im = clean((-discriminant).sqrt() / (2.0 * a).abs());
                vec![Root::Complex { re, im: -im }, Root::Complex { re, im }]
            }
        }
        _ => Vec::new(),
    }
}

/// Finds a rational root p/q of an integer-coefficient polynomial.
fn rational_root(poly: &Poly) -> Option<f64> {
    let coeffs = poly.coefficients();
    if coeffs.iter().any(|c| c.fract().abs() > 1e-12) {
        return None;
    }
    if coeffs[0].abs() < 1e-12 {
        return Some(0.0);
    }

    let constant = coeffs[0].abs();
    let leading = poly.leading().abs();
    if constant > MAX_CONSTANT_FOR_SEARCH || leading > MAX_CONSTANT_FOR_SEARCH {
        return None;
    }

    let numerators = divisors(constant);
    let denominators = divisors(leading);
    for p in &numerators {
        for q in &denominators {
            for candidate in [p / q, -p / q] {
                if poly.eval(candidate).abs() < ROOT_TOLERANCE {
                    return Some(candidate);
                }
            }
        }
    }
    None
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn divisors(value: f64) -> Vec<f64> {
    let n = value.round() as u64;
    (1..=n)
        .filter(|d| n % d == 0)
        .map(|d| d as f64)
        .collect()
}

fn clean(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < ROOT_TOLERANCE {
        rounded + 0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::parse;

    fn solved(lhs: &str, rhs: &str) -> MathResult<Solution> {
        solve(
            &parse(lhs).expect("valid lhs"),
            &parse(rhs).expect("valid rhs"),
        )
    }

    #[test]
    fn linear_equation() {
        assert_eq!(
            solved("2x + 4", "0"),
            Ok(Solution::Roots(vec![Root::Real(-2.0)]))
        );
        assert_eq!(
            solved("3x", "x + 5").map(|s| s.to_string()),
            Ok("[2.5]".to_string())
        );
    }

    #[test]
    fn quadratic_with_two_real_roots() {
        let solution = solved("x^2 - 5x + 6", "0").expect("solvable");
        assert_eq!(solution.to_string(), "[2, 3]");
    }

    #[test]
    fn quadratic_with_double_root() {
        let solution = solved("x^2 + 2x + 1", "0").expect("solvable");
        assert_eq!(solution.to_string(), "[-1]");
    }

    #[test]
    fn quadratic_with_complex_roots() {
        assert_eq!(solved("x^2 + 1", "0").expect("solvable").to_string(), "[-i, i]");
        assert_eq!(
            solved("x^2 - 2x + 5", "0").expect("solvable").to_string(),
            "[1 - 2i, 1 + 2i]"
        );
    }

    #[test]
    fn cubic_with_rational_roots() {
        let solution = solved("x^3 - 6x^2 + 11x - 6", "0").expect("solvable");
        assert_eq!(solution.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn rational_equation_excludes_poles() {
        let solution = solved("(x^2 - 1)/(x - 1)", "0").expect("solvable");
        assert_eq!(solution.to_string(), "[-1]");
    }

    #[test]
    fn degenerate_equations() {
        assert_eq!(solved("x", "x"), Ok(Solution::AllValues));
        assert_eq!(solved("x + 1", "x"), Ok(Solution::Roots(Vec::new())));
    }

    #[test]
    fn non_polynomial_is_unsupported() {
        assert!(matches!(solved("sin(x)", "0"), Err(MathError::Unsupported(_))));
    }
}
