use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::CalcError;
use crate::format::format_float;

/// A calculator value. Integers stay integers through `+ - *` and negation,
/// falling back to floating point only when i64 would overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(x) => x == 0.0,
        }
    }

    /// True division: the quotient is always a float.
    pub fn try_div(self, rhs: Number) -> Result<Number, CalcError> {
        if rhs.is_zero() {
            let msg = match (self, rhs) {
                (Number::Int(_), Number::Int(_)) => "division by zero",
                _ => "float division by zero",
            };
            return Err(CalcError::Evaluation(msg.to_owned()));
        }
        Ok(Number::Float(self.to_f64() / rhs.to_f64()))
    }

    pub fn try_pow(self, rhs: Number) -> Result<Number, CalcError> {
        if let (Number::Int(base), Number::Int(exp)) = (self, rhs) {
            if exp >= 0 {
                let exact = u32::try_from(exp)
                    .ok()
                    .and_then(|exp| base.checked_pow(exp));
                if let Some(n) = exact {
                    return Ok(Number::Int(n));
                }
            }
        }

        let (base, exp) = (self.to_f64(), rhs.to_f64());
        if base == 0.0 && exp < 0.0 {
            return Err(CalcError::Evaluation(
                "0.0 cannot be raised to a negative power".to_owned(),
            ));
        }
        if base < 0.0 && exp.is_finite() && exp.fract() != 0.0 {
            return Err(CalcError::Evaluation(
                "complex result not supported".to_owned(),
            ));
        }
        let result = base.powf(exp);
        if result.is_infinite() && base.is_finite() && exp.is_finite() {
            return Err(CalcError::Evaluation(
                "numerical result out of range".to_owned(),
            ));
        }
        Ok(Number::Float(result))
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_add(b)
                .map_or(Number::Float(a as f64 + b as f64), Number::Int),
            (a, b) => Number::Float(a.to_f64() + b.to_f64()),
        }
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_sub(b)
                .map_or(Number::Float(a as f64 - b as f64), Number::Int),
            (a, b) => Number::Float(a.to_f64() - b.to_f64()),
        }
    }
}

impl Mul for Number {
    type Output = Number;

    fn mul(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a
                .checked_mul(b)
                .map_or(Number::Float(a as f64 * b as f64), Number::Int),
            (a, b) => Number::Float(a.to_f64() * b.to_f64()),
        }
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Int(n) => n.checked_neg().map_or(Number::Float(-(n as f64)), Number::Int),
            Number::Float(x) => Number::Float(-x),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}
