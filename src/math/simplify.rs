//! Algebraic simplification.
//!
//! Polynomial subtrees are expanded into canonical form; other sums and
//! products are flattened, like terms and equal bases are merged, and a
//! handful of identities are applied to powers and function calls.

use super::expr::{Constant, Expr, Func};
use super::poly::Poly;

/// Returns a simplified copy of the expression.
pub fn simplify(expr: &Expr) -> Expr {
    if let Some(poly) = Poly::from_expr(expr) {
        return poly.to_expr();
    }

    match expr {
        Expr::Num(_) | Expr::Var | Expr::Const(_) => expr.clone(),
        Expr::Add(..) | Expr::Sub(..) | Expr::Neg(_) => simplify_sum(expr),
        Expr::Div(a, b) => simplify_rational(a, b).unwrap_or_else(|| simplify_product(expr)),
        Expr::Mul(..) => simplify_product(expr),
        Expr::Pow(base, exponent) => simplify_pow(simplify(base), simplify(exponent)),
        Expr::Call(func, arg) => simplify_call(*func, simplify(arg)),
    }
}

/// Builds `c1*t1 + c2*t2 + ...`, dropping zero terms. A unit of `1` marks a
/// constant term.
pub fn sum_of(terms: Vec<(f64, Expr)>) -> Expr {
    let mut result: Option<Expr> = None;
    for (coef, unit) in terms {
        if coef.abs() < 1e-12 {
            continue;
        }
        let magnitude = scaled_unit(coef.abs(), unit);
        result = Some(match result {
            None if coef < 0.0 => negate(magnitude),
            None => magnitude,
            Some(acc) if coef < 0.0 => Expr::sub(acc, magnitude),
            Some(acc) => Expr::add(acc, magnitude),
        });
    }
    result.unwrap_or(Expr::Num(0.0))
}

fn scaled_unit(magnitude: f64, unit: Expr) -> Expr {
    if is_one(&unit) {
        build_product(magnitude, Vec::new(), Vec::new())
    } else {
        build_product(magnitude, vec![unit], Vec::new())
    }
}

fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Num(v) => Expr::Num(-v),
        other => Expr::neg(other),
    }
}

fn is_one(expr: &Expr) -> bool {
    matches!(expr, Expr::Num(v) if (*v - 1.0).abs() < 1e-12)
}

fn is_zero(expr: &Expr) -> bool {
    matches!(expr, Expr::Num(v) if v.abs() < 1e-12)
}

/// Writes `coef * numer / denom`, showing simple fractional coefficients as
/// fractions.
fn build_product(coef: f64, numer: Vec<Expr>, denom: Vec<Expr>) -> Expr {
    if coef.abs() < 1e-12 {
        return Expr::Num(0.0);
    }

    let negative = coef < 0.0;
    let (top, bottom) = as_fraction(coef.abs());

    let mut top_factors = Vec::with_capacity(numer.len() + 1);
    if (top - 1.0).abs() > 1e-12 || numer.is_empty() {
        top_factors.push(Expr::Num(top));
    }
    top_factors.extend(numer);

    let mut bottom_factors = Vec::with_capacity(denom.len() + 1);
    if (bottom - 1.0).abs() > 1e-12 {
        bottom_factors.push(Expr::Num(bottom));
    }
    bottom_factors.extend(denom);

    let top = chain_product(top_factors);
    let result = if bottom_factors.is_empty() {
        top
    } else {
        Expr::div(top, chain_product(bottom_factors))
    };

    if negative { negate(result) } else { result }
}

fn chain_product(factors: Vec<Expr>) -> Expr {
    factors
        .into_iter()
        .reduce(Expr::mul)
        .unwrap_or(Expr::Num(1.0))
}

/// Splits a positive coefficient into a small fraction when one fits.
fn as_fraction(value: f64) -> (f64, f64) {
    if value.fract().abs() < 1e-12 {
        return (value, 1.0);
    }
    for denominator in 2..=12_u32 {
        let denominator = f64::from(denominator);
        let numerator = value * denominator;
        if (numerator - numerator.round()).abs() < 1e-9 {
            return (numerator.round(), denominator);
        }
    }
    (value, 1.0)
}

fn simplify_sum(expr: &Expr) -> Expr {
    let mut terms = Vec::new();
    gather_terms(expr, 1.0, &mut terms);

    let mut poly = Poly::constant(0.0);
    let mut others: Vec<(f64, Expr)> = Vec::new();
    for (coef, unit) in terms {
        if let Some(p) = Poly::from_expr(&unit) {
            poly = poly.add(&p.scale(coef));
        } else if let Some(existing) = others.iter_mut().find(|(_, u)| *u == unit) {
            existing.0 += coef;
        } else {
            others.push((coef, unit));
        }
    }

    let mut all: Vec<(f64, Expr)> = Vec::new();
    let coefficients = poly.coefficients().to_vec();
    for (power, coef) in coefficients.iter().enumerate().rev() {
        if power == 0 {
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let unit = if power == 1 {
            Expr::Var
        } else {
            Expr::pow(Expr::Var, Expr::Num(power as f64))
        };
        all.push((*coef, unit));
    }
    all.extend(others);
    all.push((poly.coeff(0), Expr::Num(1.0)));

    sum_of(all)
}

fn gather_terms(expr: &Expr, sign: f64, out: &mut Vec<(f64, Expr)>) {
    match expr {
        Expr::Add(a, b) => {
            gather_terms(a, sign, out);
            gather_terms(b, sign, out);
        }
        Expr::Sub(a, b) => {
            gather_terms(a, sign, out);
            gather_terms(b, -sign, out);
        }
        Expr::Neg(a) => gather_terms(a, -sign, out),
        other => flatten_terms(simplify(other), sign, out),
    }
}

/// Flattens an already simplified expression into signed terms.
fn flatten_terms(expr: Expr, sign: f64, out: &mut Vec<(f64, Expr)>) {
    match expr {
        Expr::Add(a, b) => {
            flatten_terms(*a, sign, out);
            flatten_terms(*b, sign, out);
        }
        Expr::Sub(a, b) => {
            flatten_terms(*a, sign, out);
            flatten_terms(*b, -sign, out);
        }
        Expr::Neg(a) => flatten_terms(*a, -sign, out),
        other => {
            let (coef, unit) = split_coefficient(other);
            out.push((sign * coef, unit));
        }
    }
}

fn split_coefficient(term: Expr) -> (f64, Expr) {
    match term {
        Expr::Num(v) => (v, Expr::Num(1.0)),
        Expr::Mul(a, b) if a.as_num().is_some() => {
            let (coef, unit) = split_coefficient(*b);
            (a.as_num().unwrap_or(1.0) * coef, unit)
        }
        Expr::Div(a, b) if b.as_num().is_some_and(|d| d != 0.0) => {
            let (coef, unit) = split_coefficient(*a);
            (coef / b.as_num().unwrap_or(1.0), unit)
        }
        other => (1.0, other),
    }
}

/// Cancels a polynomial quotient when the division is exact.
fn simplify_rational(numer: &Expr, denom: &Expr) -> Option<Expr> {
    let top = Poly::from_expr(numer)?;
    let bottom = Poly::from_expr(denom)?;
    let (quotient, remainder) = top.div_rem(&bottom)?;
    if remainder.is_zero() {
        Some(quotient.to_expr())
    } else {
        None
    }
}

fn simplify_product(expr: &Expr) -> Expr {
    let mut coef = 1.0;
    let mut factors: Vec<(Expr, f64)> = Vec::new();
    gather_factors(expr, 1.0, &mut coef, &mut factors);

    if coef.abs() < 1e-12 && !factors.iter().any(|(b, e)| is_zero(b) && *e < 0.0) {
        return Expr::Num(0.0);
    }

    let mut merged: Vec<(Expr, f64)> = Vec::new();
    for (base, exponent) in factors {
        if let Some(existing) = merged.iter_mut().find(|(b, _)| *b == base) {
            existing.1 += exponent;
        } else {
            merged.push((base, exponent));
        }
    }

    let mut numer = Vec::new();
    let mut denom = Vec::new();
    for (base, exponent) in merged {
        if exponent.abs() < 1e-12 {
            continue;
        }
        let target = if exponent > 0.0 { &mut numer } else { &mut denom };
        let power = exponent.abs();
        if (power - 1.0).abs() < 1e-12 {
            target.push(base);
        } else {
            target.push(Expr::pow(base, Expr::Num(power)));
        }
    }

    build_product(coef, numer, denom)
}

fn gather_factors(expr: &Expr, sign: f64, coef: &mut f64, out: &mut Vec<(Expr, f64)>) {
    match expr {
        Expr::Mul(a, b) => {
            gather_factors(a, sign, coef, out);
            gather_factors(b, sign, coef, out);
        }
        Expr::Div(a, b) => {
            gather_factors(a, sign, coef, out);
            gather_factors(b, -sign, coef, out);
        }
        Expr::Neg(a) => {
            *coef = -*coef;
            gather_factors(a, sign, coef, out);
        }
        other => flatten_factors(simplify(other), sign, coef, out),
    }
}

/// Flattens an already simplified expression into `(base, exponent)` pairs.
fn flatten_factors(expr: Expr, sign: f64, coef: &mut f64, out: &mut Vec<(Expr, f64)>) {
    match expr {
        Expr::Num(v) if v != 0.0 || sign > 0.0 => *coef *= v.powf(sign),
        Expr::Mul(a, b) => {
            flatten_factors(*a, sign, coef, out);
            flatten_factors(*b, sign, coef, out);
        }
        Expr::Div(a, b) => {
            flatten_factors(*a, sign, coef, out);
            flatten_factors(*b, -sign, coef, out);
        }
        Expr::Neg(a) => {
            *coef = -*coef;
            flatten_factors(*a, sign, coef, out);
        }
        Expr::Pow(base, exponent) if exponent.as_num().is_some() => {
            let power = exponent.as_num().unwrap_or(1.0);
            out.push((*base, sign * power));
        }
        other => out.push((other, sign)),
    }
}

fn simplify_pow(base: Expr, exponent: Expr) -> Expr {
    if is_zero(&exponent) || is_one(&base) {
        return Expr::Num(1.0);
    }
    if is_one(&exponent) {
        return base;
    }
    if let (Some(b), Some(e)) = (base.as_num(), exponent.as_num()) {
        let value = b.powf(e);
        if value.is_finite() {
            return Expr::Num(value);
        }
    }
    match (base, exponent) {
        (Expr::Pow(inner, e1), Expr::Num(e2)) if e1.as_num().is_some() => {
            simplify_pow(*inner, Expr::Num(e1.as_num().unwrap_or(1.0) * e2))
        }
        (Expr::Call(Func::Sqrt, inner), Expr::Num(e)) if (e - 2.0).abs() < 1e-12 => *inner,
        (base, exponent) => Expr::pow(base, exponent),
    }
}

fn simplify_call(func: Func, arg: Expr) -> Expr {
    match (func, &arg) {
        (Func::Ln, Expr::Call(Func::Exp, inner)) | (Func::Exp, Expr::Call(Func::Ln, inner)) => {
            (**inner).clone()
        }
        (Func::Ln, Expr::Const(Constant::E)) => Expr::Num(1.0),
        (Func::Ln, Expr::Pow(base, exponent)) if **base == Expr::Const(Constant::E) => {
            (**exponent).clone()
        }
        (Func::Sqrt, Expr::Num(v)) if *v >= 0.0 && v.sqrt().fract() == 0.0 => Expr::Num(v.sqrt()),
        (Func::Sin | Func::Tan | Func::Sqrt, Expr::Num(v)) if *v == 0.0 => Expr::Num(0.0),
        (Func::Cos | Func::Exp, Expr::Num(v)) if *v == 0.0 => Expr::Num(1.0),
        (Func::Ln, Expr::Num(v)) if (*v - 1.0).abs() < 1e-12 => Expr::Num(0.0),
        _ => Expr::call(func, arg),
    }
}
