//! Differentiation, integration of elementary forms, and limits at +∞.

use std::fmt;

use super::expr::{Constant, Expr, Func};
use super::poly::Poly;
use super::simplify::simplify;
use super::{MathError, MathResult, format_number};

/// Derivative with respect to `x`, simplified.
pub fn differentiate(expr: &Expr) -> Expr {
    simplify(&derive(expr))
}

fn derive(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(_) | Expr::Const(_) => Expr::num(0.0),
        Expr::Var => Expr::num(1.0),
        Expr::Add(a, b) => Expr::add(derive(a), derive(b)),
        Expr::Sub(a, b) => Expr::sub(derive(a), derive(b)),
        Expr::Neg(a) => Expr::neg(derive(a)),
        Expr::Mul(a, b) => Expr::add(
            Expr::mul(derive(a), (**b).clone()),
            Expr::mul((**a).clone(), derive(b)),
        ),
        Expr::Div(a, b) => Expr::div(
            Expr::sub(
                Expr::mul(derive(a), (**b).clone()),
                Expr::mul((**a).clone(), derive(b)),
            ),
            Expr::pow((**b).clone(), Expr::num(2.0)),
        ),
        Expr::Pow(base, exponent) if exponent.is_constant() => Expr::mul(
            Expr::mul(
                (**exponent).clone(),
                Expr::pow(
                    (**base).clone(),
                    Expr::sub((**exponent).clone(), Expr::num(1.0)),
                ),
            ),
            derive(base),
        ),
        Expr::Pow(base, exponent) if base.is_constant() => Expr::mul(
            Expr::mul(expr.clone(), Expr::call(Func::Ln, (**base).clone())),
            derive(exponent),
        ),
        Expr::Pow(base, exponent) => Expr::mul(
            expr.clone(),
            Expr::add(
                Expr::mul(derive(exponent), Expr::call(Func::Ln, (**base).clone())),
                Expr::div(
                    Expr::mul((**exponent).clone(), derive(base)),
                    (**base).clone(),
                ),
            ),
        ),
        Expr::Call(func, arg) => {
            let inner = (**arg).clone();
            let outer = match func {
                Func::Sin => Expr::call(Func::Cos, inner),
                Func::Cos => Expr::neg(Expr::call(Func::Sin, inner)),
                Func::Tan => Expr::div(
                    Expr::num(1.0),
                    Expr::pow(Expr::call(Func::Cos, inner), Expr::num(2.0)),
                ),
                Func::Exp => Expr::call(Func::Exp, inner),
                Func::Ln => Expr::div(Expr::num(1.0), inner),
                Func::Sqrt => Expr::div(
                    Expr::num(1.0),
                    Expr::mul(Expr::num(2.0), Expr::call(Func::Sqrt, inner)),
                ),
            };
            Expr::mul(outer, derive(arg))
        }
    }
}

/// Antiderivative with respect to `x`, without the constant of integration.
pub fn integrate(expr: &Expr) -> MathResult<Expr> {
    let simplified = simplify(expr);
    Ok(simplify(&antiderivative(&simplified)?))
}

fn antiderivative(expr: &Expr) -> MathResult<Expr> {
    if let Some(poly) = Poly::from_expr(expr) {
        return Ok(poly.integral().to_expr());
    }
    if expr.is_constant() {
        return Ok(Expr::mul(expr.clone(), Expr::Var));
    }

    match expr {
        Expr::Add(a, b) => Ok(Expr::add(antiderivative(a)?, antiderivative(b)?)),
        Expr::Sub(a, b) => Ok(Expr::sub(antiderivative(a)?, antiderivative(b)?)),
        Expr::Neg(a) => Ok(Expr::neg(antiderivative(a)?)),
        Expr::Mul(a, b) if a.is_constant() => Ok(Expr::mul((**a).clone(), antiderivative(b)?)),
        Expr::Mul(a, b) if b.is_constant() => Ok(Expr::mul(antiderivative(a)?, (**b).clone())),
        Expr::Div(a, b) if b.is_constant() => Ok(Expr::div(antiderivative(a)?, (**b).clone())),
        Expr::Div(a, b) if a.is_constant() => {
            let slope = linear_slope(b).ok_or_else(|| cannot_integrate(expr))?;
            Ok(Expr::mul(
                Expr::div((**a).clone(), Expr::num(slope)),
                Expr::call(Func::Ln, (**b).clone()),
            ))
        }
        Expr::Pow(base, exponent) if exponent.is_constant() => {
            let slope = linear_slope(base).ok_or_else(|| cannot_integrate(expr))?;
            match exponent.as_num() {
                Some(n) if (n + 1.0).abs() < 1e-12 => Ok(Expr::div(
                    Expr::call(Func::Ln, (**base).clone()),
                    Expr::num(slope),
                )),
                _ => {
                    let raised = Expr::add((**exponent).clone(), Expr::num(1.0));
                    Ok(Expr::div(
                        Expr::pow((**base).clone(), raised.clone()),
                        Expr::mul(raised, Expr::num(slope)),
                    ))
                }
            }
        }
        Expr::Pow(base, exponent) if base.is_constant() => {
            let slope = linear_slope(exponent).ok_or_else(|| cannot_integrate(expr))?;
            let scale = if **base == Expr::Const(Constant::E) {
                Expr::num(slope)
            } else {
                Expr::mul(Expr::num(slope), Expr::call(Func::Ln, (**base).clone()))
            };
            Ok(Expr::div(expr.clone(), scale))
        }
        Expr::Call(func, arg) => {
            let slope = linear_slope(arg).ok_or_else(|| cannot_integrate(expr))?;
            let u = (**arg).clone();
            let primitive = match func {
                Func::Sin => Expr::neg(Expr::call(Func::Cos, u)),
                Func::Cos => Expr::call(Func::Sin, u),
                Func::Tan => Expr::neg(Expr::call(Func::Ln, Expr::call(Func::Cos, u))),
                Func::Exp => Expr::call(Func::Exp, u),
                Func::Ln => Expr::sub(Expr::mul(u.clone(), Expr::call(Func::Ln, u.clone())), u),
                Func::Sqrt => Expr::mul(
                    Expr::div(Expr::num(2.0), Expr::num(3.0)),
                    Expr::pow(u, Expr::num(1.5)),
                ),
            };
            Ok(Expr::div(primitive, Expr::num(slope)))
        }
        _ => Err(cannot_integrate(expr)),
    }
}

/// Slope `a` when the expression is `a*x + b` with `a != 0`.
fn linear_slope(expr: &Expr) -> Option<f64> {
    let poly = Poly::from_expr(expr)?;
    if poly.degree() == 1 {
        Some(poly.coeff(1))
    } else {
        None
    }
}

fn cannot_integrate(expr: &Expr) -> MathError {
    MathError::Unsupported(format!("cannot integrate {expr}"))
}

/// Value of a limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    Finite(f64),
    PositiveInfinity,
    NegativeInfinity,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Finite(value) => write!(f, "{}", format_number(*value)),
            Limit::PositiveInfinity => write!(f, "∞"),
            Limit::NegativeInfinity => write!(f, "-∞"),
        }
    }
}

const SAMPLE_POINTS: [f64; 3] = [1e3, 1e6, 1e9];

/// Limit of the expression as `x` approaches +∞.
///
/// Polynomials and rational functions are decided from their degrees and
/// leading coefficients; anything else is sampled at growing `x`.
pub fn limit_at_infinity(expr: &Expr) -> MathResult<Limit> {
    if let Some(limit) = rational_limit(expr) {
        return Ok(limit);
    }
    let simplified = simplify(expr);
    if let Some(limit) = rational_limit(&simplified) {
        return Ok(limit);
    }
    sampled_limit(&simplified)
}

fn rational_limit(expr: &Expr) -> Option<Limit> {
    let (top, bottom) = match expr {
        Expr::Div(a, b) => (Poly::from_expr(a)?, Poly::from_expr(b)?),
        other => (Poly::from_expr(other)?, Poly::constant(1.0)),
    };
    if bottom.is_zero() {
        return None;
    }
    if top.is_zero() {
        return Some(Limit::Finite(0.0));
    }

    let ratio = top.leading() / bottom.leading();
    Some(match top.degree().cmp(&bottom.degree()) {
        std::cmp::Ordering::Less => Limit::Finite(0.0),
        std::cmp::Ordering::Equal => Limit::Finite(ratio),
        std::cmp::Ordering::Greater if ratio > 0.0 => Limit::PositiveInfinity,
        std::cmp::Ordering::Greater => Limit::NegativeInfinity,
    })
}

fn sampled_limit(expr: &Expr) -> MathResult<Limit> {
    let values = SAMPLE_POINTS.map(|x| expr.eval(x));
    let undetermined = || {
        MathError::Unsupported("the limit does not exist or could not be determined".to_string())
    };

    if values.iter().any(|v| v.is_nan()) {
        return Err(undetermined());
    }

    let [first, middle, last] = values;
    let growing = last.abs() > 1e6 && last.abs() > middle.abs() && middle.abs() > first.abs();
    if last.is_infinite() || growing {
        return Ok(if last > 0.0 {
            Limit::PositiveInfinity
        } else {
            Limit::NegativeInfinity
        });
    }

    let settled = (last - middle).abs() <= 1e-6 * last.abs().max(1.0);
    if settled {
        let rounded = (last * 1e6).round() / 1e6;
        return Ok(Limit::Finite(rounded + 0.0));
    }

    Err(undetermined())
}
