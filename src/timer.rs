//! The duration mini-language. Every form expands to a list of minutes:
//!
//! * `25` is a single timer.
//! * `25-5-10` is the literal list `[25, 5, 10]`.
//! * `25x4` repeats 25 four times; a third segment multiplies the base
//!   (`25x4x2` is four 50s). A `-d` on the last segment lowers each successive
//!   timer by `d` (`25x4-5` is `[25, 20, 15, 10]`).
//! * `work,break` interleaves two of the forms above, repeating the last break
//!   as needed so every work timer is followed by one.

use tracing::debug;

use crate::error::TimerError;

/// Braces anywhere at the ends are dropped, as is all whitespace.
pub fn normalize(expr: &str) -> String {
    expr.trim()
        .trim_matches(|c| c == '{' || c == '}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

pub fn parse(expr: &str) -> Result<Vec<i64>, TimerError> {
    let expr = normalize(expr);
    let timers = match expr.split_once(',') {
        Some((work, rest)) => {
            if rest.contains(',') {
                return Err(TimerError::InvalidExpression);
            }
            interleave(parse_sequence(work)?, parse_sequence(rest)?)?
        }
        None => parse_sequence(&expr)?,
    };
    debug!("'{}' expands to {:?}", expr, timers);
    Ok(timers)
}

fn interleave(work: Vec<i64>, breaks: Vec<i64>) -> Result<Vec<i64>, TimerError> {
    if work.is_empty() {
        return Ok(Vec::new());
    }
    let last_break = *breaks.last().ok_or(TimerError::InvalidExpression)?;
    let padded = breaks.into_iter().chain(std::iter::repeat(last_break));
    Ok(work
        .into_iter()
        .zip(padded)
        .flat_map(|(w, b)| [w, b])
        .collect())
}

fn parse_int(piece: &str) -> Result<i64, TimerError> {
    piece
        .parse()
        .map_err(|_| TimerError::InvalidNumber(piece.to_owned()))
}

/// A multiplier segment: `n` or `n-d`.
struct Segment {
    value: i64,
    decrement: Option<i64>,
}

impl Segment {
    fn parse(text: &str) -> Result<Segment, TimerError> {
        match text.split_once('-') {
            Some((value, decrement)) => Ok(Segment {
                value: parse_int(value)?,
                decrement: Some(parse_int(decrement)?),
            }),
            None => Ok(Segment {
                value: parse_int(text)?,
                decrement: None,
            }),
        }
    }
}

fn parse_sequence(expr: &str) -> Result<Vec<i64>, TimerError> {
    if expr.contains('x') {
        let segments = expr
            .split('x')
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if !(2..=3).contains(&segments.len()) {
            return Err(TimerError::InvalidExpression);
        }

        let base = segments[0].value;
        let reps = segments[1].value;
        let mult = segments.get(2).map_or(1, |s| s.value);
        let decrement = segments.last().and_then(|s| s.decrement).unwrap_or(0);

        let start = base.saturating_mul(mult);
        return Ok((0..reps.max(0))
            .map(|i| start.saturating_sub(decrement.saturating_mul(i)))
            .collect());
    }

    if expr.contains('-') {
        return expr.split('-').map(parse_int).collect();
    }

    if !expr.is_empty() && expr.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(vec![parse_int(expr)?]);
    }

    Err(TimerError::InvalidExpression)
}
