use std::fmt;

use tracing::debug;

use crate::env::{Bindings, Environment};
use crate::error::CalcError;
use crate::expr::{evaluate, insert_implicit_multiplication};
use crate::number::Number;

/// One comma-separated piece of an input line, classified by shape only.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment { name: String, value_expr: String },
    FunctionDefinition { name: String, param: String, body: String },
    FunctionCall { name: String, arg_expr: String },
    PlainExpression(String),
}

/// What a statement printed. Errors are ordinary outcomes: a failing
/// statement never stops the ones after it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Number),
    Assigned { name: String, value: Number },
    Defined { name: String, param: String, body: String },
    Error(CalcError),
}

impl From<Result<Number, CalcError>> for Outcome {
    fn from(result: Result<Number, CalcError>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(err) => Outcome::Error(err),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(value) => write!(f, "{}", value),
            Outcome::Assigned { name, value } => write!(f, "{} = {}", name, value),
            Outcome::Defined { name, param, body } => write!(f, "{}({}) = {}", name, param, body),
            Outcome::Error(err) => write!(f, "{}", err),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits a leading `[A-Za-z_]\w*` identifier off `text`.
fn split_ident(text: &str) -> Option<(&str, &str)> {
    let first = text.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let end = text
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(text.len(), |(i, _)| i);
    Some(text.split_at(end))
}

/// Splits a leading run of one or more word characters off `text`.
fn split_word(text: &str) -> Option<(&str, &str)> {
    let end = text
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(text.len(), |(i, _)| i);
    if end == 0 {
        None
    } else {
        Some(text.split_at(end))
    }
}

/// Matches `name(word)` at the start of `text`, returning both names and
/// whatever follows the closing parenthesis.
pub(crate) fn split_call_signature(text: &str) -> Option<(&str, &str, &str)> {
    let (name, rest) = split_ident(text)?;
    let rest = rest.strip_prefix('(')?;
    let (param, rest) = split_word(rest)?;
    let rest = rest.strip_prefix(')')?;
    Some((name, param, rest))
}

/// `name(param) = body`, matched from the start of `text`.
pub fn parse_definition(text: &str) -> Option<Statement> {
    let (name, param, rest) = split_call_signature(text)?;
    let body = rest.trim_start().strip_prefix('=')?.trim_start();
    if body.is_empty() {
        return None;
    }
    Some(Statement::FunctionDefinition {
        name: name.to_owned(),
        param: param.to_owned(),
        body: insert_implicit_multiplication(body),
    })
}

/// Anything holding `=`, unless it starts with `f(`.
pub fn parse_assignment(text: &str) -> Option<Statement> {
    if text.trim().starts_with("f(") {
        return None;
    }
    let (name, value_expr) = text.split_once('=')?;
    Some(Statement::Assignment {
        name: name.trim().to_owned(),
        value_expr: value_expr.trim().to_owned(),
    })
}

/// `name(arg)` at the start of `text`, `arg` being non-empty and free of `)`.
/// Anything after the closing parenthesis is ignored.
pub fn parse_call(text: &str) -> Option<Statement> {
    let (name, rest) = split_ident(text)?;
    let rest = rest.strip_prefix('(')?;
    let (arg_expr, _) = rest.split_once(')')?;
    if arg_expr.is_empty() {
        return None;
    }
    Some(Statement::FunctionCall {
        name: name.to_owned(),
        arg_expr: arg_expr.to_owned(),
    })
}

impl Statement {
    /// Tries definition, assignment and call in that order; anything else is
    /// a plain expression.
    pub fn classify(text: &str) -> Statement {
        parse_definition(text)
            .or_else(|| parse_assignment(text))
            .or_else(|| parse_call(text))
            .unwrap_or_else(|| Statement::PlainExpression(text.to_owned()))
    }

    pub fn execute(self, env: &mut Environment) -> Outcome {
        debug!("executing {:?}", self);
        match self {
            Statement::Assignment { name, value_expr } => match evaluate(&value_expr, env, None) {
                Ok(value) => {
                    env.set_variable(&name, value);
                    Outcome::Assigned { name, value }
                }
                Err(err) => Outcome::Error(err),
            },
            Statement::FunctionDefinition { name, param, body } => {
                env.define_function(&name, &param, &body);
                Outcome::Defined { name, param, body }
            }
            Statement::FunctionCall { name, arg_expr } => {
                call_function(&name, &arg_expr, env).into()
            }
            Statement::PlainExpression(expr) => evaluate(&expr, env, None).into(),
        }
    }
}

fn call_function(name: &str, arg_expr: &str, env: &Environment) -> Result<Number, CalcError> {
    let function = env.function(name).ok_or(CalcError::UnknownFunction)?;
    let arg = evaluate(arg_expr, env, None)?;
    let mut locals = Bindings::new();
    locals.insert(function.param.clone(), arg);
    evaluate(&function.body, env, Some(&locals))
}

pub fn try_function_definition(text: &str, env: &mut Environment) -> Option<Outcome> {
    parse_definition(text).map(|stmt| stmt.execute(env))
}

pub fn try_assignment(text: &str, env: &mut Environment) -> Option<Outcome> {
    parse_assignment(text).map(|stmt| stmt.execute(env))
}

pub fn try_function_call(text: &str, env: &mut Environment) -> Option<Outcome> {
    parse_call(text).map(|stmt| stmt.execute(env))
}
