//! Whole input lines: range sweeps (`f(x) | x=2..-1`), brace batches
//! (`{f(1), f(2)}`) and plain comma-separated statements.

use tracing::debug;

use crate::env::{Bindings, Environment};
use crate::error::CalcError;
use crate::expr::evaluate;
use crate::number::Number;
use crate::statement::{split_call_signature, Outcome, Statement};

/// `var = start..end`, both ends inclusive, stepping towards `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub var: String,
    pub start: i64,
    pub end: i64,
}

fn split_signed_int(text: &str) -> Option<(i64, &str)> {
    let digits_from = usize::from(text.starts_with('-'));
    let end = text[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |i| i + digits_from);
    if end == digits_from {
        return None;
    }
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

impl RangeSpec {
    /// Matched from the start of `text`; trailing text is ignored.
    pub fn parse(text: &str) -> Option<RangeSpec> {
        let end = text
            .char_indices()
            .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
            .map_or(text.len(), |(i, _)| i);
        if end == 0 {
            return None;
        }
        let (var, rest) = text.split_at(end);
        let rest = rest.trim_start().strip_prefix('=')?.trim_start();
        let (start, rest) = split_signed_int(rest)?;
        let rest = rest.strip_prefix("..")?;
        let (end, _) = split_signed_int(rest)?;
        Some(RangeSpec {
            var: var.to_owned(),
            start,
            end,
        })
    }

    pub fn values(&self) -> Box<dyn Iterator<Item = i64>> {
        if self.end >= self.start {
            Box::new(self.start..=self.end)
        } else {
            Box::new((self.end..=self.start).rev())
        }
    }
}

/// Evaluates the body of the function named in `call_part` once per value of
/// the range, binding each value to the function's own parameter.
fn sweep(call_part: &str, range_part: &str, env: &Environment) -> Option<Vec<Outcome>> {
    let range = RangeSpec::parse(range_part)?;
    let (name, _, _) = split_call_signature(call_part)?;
    let function = env.function(name)?;
    debug!("sweeping {} over {:?}", name, range);

    let mut locals = Bindings::new();
    let outcomes: Vec<Outcome> = range
        .values()
        .map(|value| {
            locals.insert(function.param.clone(), Number::Int(value));
            Outcome::from(evaluate(&function.body, env, Some(&locals)))
        })
        .collect();
    Some(outcomes)
}

/// Runs one input line, returning one outcome per statement in input order.
pub fn process(line: &str, env: &mut Environment) -> Vec<Outcome> {
    let line = line.trim();

    if let Some((call_part, range_part)) = line.split_once('|') {
        return sweep(call_part.trim(), range_part.trim(), env)
            .unwrap_or_else(|| vec![Outcome::Error(CalcError::RangeSyntax)]);
    }

    let line = line
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(line);

    line.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let stmt = Statement::classify(piece);
            debug!("'{}' -> {:?}", piece, stmt);
            stmt.execute(env)
        })
        .collect()
}
