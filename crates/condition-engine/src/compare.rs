//! Relational comparison between resolved values.
//!
//! Two values are comparable when they have the same kind, or when both
//! belong to the same numeric family. Nothing is widened across families:
//! `i64` never meets `u64` and integers never meet floats.

use crate::ast::BinaryOperator;
use crate::error::{ConditionError, Result};
use crate::value::{Family, Value};
use std::cmp::Ordering;

/// Relational operators understood by [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::Less => "<",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::GreaterEqual => ">=",
        }
    }

    /// Applies the operator to an ordering. `None` (unordered floats)
    /// satisfies only `!=`.
    fn holds(&self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (Comparison::NotEqual, None) => true,
            (_, None) => false,
            (Comparison::Equal, Some(o)) => o == Ordering::Equal,
            (Comparison::NotEqual, Some(o)) => o != Ordering::Equal,
            (Comparison::Less, Some(o)) => o == Ordering::Less,
            (Comparison::LessEqual, Some(o)) => o != Ordering::Greater,
            (Comparison::Greater, Some(o)) => o == Ordering::Greater,
            (Comparison::GreaterEqual, Some(o)) => o != Ordering::Less,
        }
    }
}

impl TryFrom<BinaryOperator> for Comparison {
    type Error = ConditionError;

    fn try_from(op: BinaryOperator) -> Result<Self> {
        match op {
            BinaryOperator::Equal => Ok(Comparison::Equal),
            BinaryOperator::NotEqual => Ok(Comparison::NotEqual),
            BinaryOperator::Less => Ok(Comparison::Less),
            BinaryOperator::LessEqual => Ok(Comparison::LessEqual),
            BinaryOperator::Greater => Ok(Comparison::Greater),
            BinaryOperator::GreaterEqual => Ok(Comparison::GreaterEqual),
            other => Err(ConditionError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `a` and `b` may be compared with each other.
pub fn comparable(a: &Value, b: &Value) -> bool {
    let (ka, kb) = (a.kind(), b.kind());
    ka == kb || (ka.family() == kb.family() && is_numeric(ka.family()))
}

fn is_numeric(family: Family) -> bool {
    matches!(family, Family::Signed | Family::Unsigned | Family::Float)
}

/// Evaluates `a <op> b`.
pub fn compare(op: Comparison, a: &Value, b: &Value) -> Result<bool> {
    if !comparable(a, b) {
        return Err(ConditionError::MismatchedTypes(a.kind(), b.kind()));
    }
    if !a.family().is_ordered() {
        return compare_unordered(op, a, b);
    }

    let ordering = match (a, b) {
        (Value::SignedInt(x), Value::SignedInt(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => unsigned(a).zip(unsigned(b)).map(|(x, y)| x.cmp(&y)),
    };
    Ok(op.holds(ordering))
}

fn unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::UnsignedInt(n) => Some(*n),
        Value::Byte(b) => Some(u64::from(*b)),
        _ => None,
    }
}

/// Equality for kinds without an ordering (`bool`, `nil`, opaque data).
fn compare_unordered(op: Comparison, a: &Value, b: &Value) -> Result<bool> {
    match op {
        Comparison::Equal => Ok(a == b),
        Comparison::NotEqual => Ok(a != b),
        _ => Err(ConditionError::UnorderedType(a.kind())),
    }
}
