//! Operator table for postfix formulas.
//!
//! Each keyword maps to a pure function over its operands. Adding an operator
//! means adding a row to [`OPERATORS`].

use super::eval::EvalError;

/// An operator and the function it applies.
#[derive(Clone, Copy, Debug)]
pub enum Operator {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> Result<f64, EvalError>),
}

impl Operator {
    /// Number of stack values the operator consumes.
    pub fn arity(self) -> usize {
        match self {
            Operator::Unary(_) => 1,
            Operator::Binary(_) => 2,
        }
    }
}

/// Recognised operator keywords.
pub const OPERATORS: &[(&str, Operator)] = &[
    ("+", Operator::Binary(add)),
    ("-", Operator::Binary(sub)),
    ("*", Operator::Binary(mul)),
    ("/", Operator::Binary(div)),
    ("lg", Operator::Unary(ln)),
    ("sin", Operator::Unary(sin)),
];

/// Look up the operator for a token, if it is one.
pub fn lookup_operator(token: &str) -> Option<Operator> {
    OPERATORS
        .iter()
        .find(|(keyword, _)| *keyword == token)
        .map(|(_, op)| *op)
}

fn add(lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    Ok(lhs + rhs)
}

fn sub(lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    Ok(lhs - rhs)
}

fn mul(lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    Ok(lhs * rhs)
}

fn div(lhs: f64, rhs: f64) -> Result<f64, EvalError> {
    if rhs == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(lhs / rhs)
}

// `lg` is the natural log.
fn ln(x: f64) -> f64 {
    x.ln()
}

fn sin(x: f64) -> f64 {
    x.sin()
}
