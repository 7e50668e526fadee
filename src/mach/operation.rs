use super::val::{to_int32, Val};
use crate::error;
use crate::lang::Error;
use std::cmp::Ordering;

type Result<T> = std::result::Result<T, Error>;

/// ## Operators
///
/// Arithmetic follows the generated script: doubles throughout, `+` joins
/// text when either side is a string, bitwise operators truncate to 32 bits,
/// comparisons yield -1 or 0.

pub struct Operation {}

impl Operation {
    pub fn negate(val: Val) -> Result<Val> {
        Ok(Val::Number(-val.to_number()?))
    }

    pub fn not(val: Val) -> Result<Val> {
        Ok(Val::Number(!to_int32(val.to_number()?) as f64))
    }

    pub fn add(lhs: Val, rhs: Val) -> Result<Val> {
        match (&lhs, &rhs) {
            (Val::Number(l), Val::Number(r)) => Ok(Val::Number(l + r)),
            _ => Ok(Val::String(format!("{}{}", lhs, rhs).into())),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(lhs.to_number()? - rhs.to_number()?))
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(lhs.to_number()? * rhs.to_number()?))
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::nonzero_divisor(lhs, rhs)?;
        Ok(Val::Number(l / r))
    }

    pub fn divide_int(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::nonzero_divisor(lhs, rhs)?;
        Ok(Val::Number(to_int32(l / r) as f64))
    }

    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = Operation::nonzero_divisor(lhs, rhs)?;
        Ok(Val::Number(l % r))
    }

    fn nonzero_divisor(lhs: Val, rhs: Val) -> Result<(f64, f64)> {
        let l = lhs.to_number()?;
        let r = rhs.to_number()?;
        if r == 0.0 {
            return Err(error!(DivisionByZero));
        }
        Ok((l, r))
    }

    pub fn power(lhs: Val, rhs: Val) -> Result<Val> {
        let l = lhs.to_number()?;
        let r = rhs.to_number()?;
        if r.is_nan() || (l.abs() == 1.0 && r.is_infinite()) {
            return Ok(Val::Number(f64::NAN));
        }
        Ok(Val::Number(l.powf(r)))
    }

    pub fn and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Operation::int32_pair(lhs, rhs, |l, r| l & r)?))
    }

    pub fn or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Operation::int32_pair(lhs, rhs, |l, r| l | r)?))
    }

    pub fn xor(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Operation::int32_pair(lhs, rhs, |l, r| l ^ r)?))
    }

    fn int32_pair(lhs: Val, rhs: Val, f: fn(i32, i32) -> i32) -> Result<f64> {
        let l = to_int32(lhs.to_number()?);
        let r = to_int32(rhs.to_number()?);
        Ok(f(l, r) as f64)
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from(lhs == rhs))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from(lhs != rhs))
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from(Operation::less_bool(&lhs, &rhs)?))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from(Operation::less_equal_bool(&lhs, &rhs)?))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from(Operation::less_bool(&rhs, &lhs)?))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::from(Operation::less_equal_bool(&rhs, &lhs)?))
    }

    pub fn less_bool(lhs: &Val, rhs: &Val) -> Result<bool> {
        Ok(Operation::order(lhs, rhs)? == Some(Ordering::Less))
    }

    pub fn less_equal_bool(lhs: &Val, rhs: &Val) -> Result<bool> {
        Ok(matches!(
            Operation::order(lhs, rhs)?,
            Some(Ordering::Less) | Some(Ordering::Equal)
        ))
    }

    /// `None` when either side is NaN.
    fn order(lhs: &Val, rhs: &Val) -> Result<Option<Ordering>> {
        match (lhs, rhs) {
            (Val::Number(l), Val::Number(r)) => Ok(l.partial_cmp(r)),
            (Val::String(l), Val::String(r)) => Ok(Some(l.chars().cmp(r.chars()))),
            _ => Err(error!(TypeMismatch)),
        }
    }
}
