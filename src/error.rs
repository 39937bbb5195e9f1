use thiserror::Error;

use crate::number::Number;

/// Why a statement could not produce a value. The display text of each
/// variant is exactly what the calculator prints for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("evaluation error: {0}")]
    Evaluation(String),
    #[error("unknown variable: {0}")]
    UnknownVariable(String),
    #[error("unknown function")]
    UnknownFunction,
    #[error("unsupported operator")]
    UnsupportedOperator,
    #[error("unsupported unary operator")]
    UnsupportedUnaryOperator,
    #[error("unsupported expression type")]
    UnsupportedExpression,
    #[error("error in range syntax")]
    RangeSyntax,
}

pub type EvalResult = Result<Number, CalcError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("invalid timer expression")]
    InvalidExpression,
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),
}
