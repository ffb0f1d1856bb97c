//! Postfix expression evaluation.
//!
//! Formulas reach the evaluator with every cell reference already replaced by
//! a number (see [`substitute_references`](super::substitute_references)).
//! Tokens are separated by whitespace and evaluated left to right against a
//! single stack.

use thiserror::Error;

use super::ops::{Operator, lookup_operator};

/// Reasons a formula fails to produce a number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// A single lexical unit of a postfix formula.
#[derive(Clone, Copy, Debug)]
pub enum Token<'a> {
    Number(f64),
    Operator(&'a str, Operator),
}

/// Split a formula into tokens. Anything that is neither an operator keyword
/// nor a floating-point literal is malformed.
pub fn tokenize(expression: &str) -> Result<Vec<Token<'_>>, EvalError> {
    expression
        .split_whitespace()
        .map(|word| {
            if let Some(op) = lookup_operator(word) {
                return Ok(Token::Operator(word, op));
            }
            word.parse::<f64>().map(Token::Number).map_err(|_| {
                EvalError::MalformedExpression(format!("unrecognised token '{}'", word))
            })
        })
        .collect()
}

/// Evaluate a fully substituted postfix formula.
pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    let tokens = tokenize(expression)?;
    let mut stack: Vec<f64> = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token {
            Token::Number(n) => stack.push(n),
            Token::Operator(word, op) => {
                if stack.len() < op.arity() {
                    return Err(EvalError::MalformedExpression(format!(
                        "'{}' needs {} operand(s), found {}",
                        word,
                        op.arity(),
                        stack.len()
                    )));
                }
                let result = match op {
                    Operator::Unary(f) => {
                        let x = stack.pop().unwrap_or_default();
                        f(x)
                    }
                    Operator::Binary(f) => {
                        // The right operand was pushed last.
                        let rhs = stack.pop().unwrap_or_default();
                        let lhs = stack.pop().unwrap_or_default();
                        f(lhs, rhs)?
                    }
                };
                stack.push(result);
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        [] => Err(EvalError::MalformedExpression("empty expression".to_string())),
        values => Err(EvalError::MalformedExpression(format!(
            "{} values left on the stack",
            values.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_literal() {
        assert_eq!(evaluate("10"), Ok(10.0));
        assert_eq!(evaluate("  -2.5 "), Ok(-2.5));
    }

    #[test]
    fn test_evaluate_operand_order() {
        assert_eq!(evaluate("10 4 -"), Ok(6.0));
        assert_eq!(evaluate("200 40 /"), Ok(5.0));
        assert_eq!(evaluate("2 3 4 * +"), Ok(14.0));
    }

    #[test]
    fn test_evaluate_unary() {
        assert_eq!(evaluate("1 lg"), Ok(0.0));
        assert_eq!(evaluate("0 sin"), Ok(0.0));
        let e = evaluate("2.718281828459045 lg 3 *").unwrap();
        assert!((e - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        assert_eq!(evaluate("5 0 /"), Err(EvalError::DivisionByZero));
        assert_eq!(evaluate("5 2 2 - /"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_evaluate_malformed() {
        assert!(matches!(evaluate(""), Err(EvalError::MalformedExpression(_))));
        assert!(matches!(evaluate("1 2"), Err(EvalError::MalformedExpression(_))));
        assert!(matches!(evaluate("1 +"), Err(EvalError::MalformedExpression(_))));
        assert!(matches!(evaluate("sin"), Err(EvalError::MalformedExpression(_))));
        assert!(matches!(evaluate("1 2 %"), Err(EvalError::MalformedExpression(_))));
        assert!(matches!(evaluate("A 1 +"), Err(EvalError::MalformedExpression(_))));
    }

    #[test]
    fn test_evaluate_is_stateless() {
        assert!(evaluate("1 +").is_err());
        assert_eq!(evaluate("1 1 +"), Ok(2.0));
    }
}
