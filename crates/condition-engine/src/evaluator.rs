//! Condition evaluation.
//!
//! Two mutually recursive walks share the expression tree: [`Evaluator::condition`]
//! reduces a node to a boolean, and [`Evaluator::operand`] reduces a node to
//! a [`Value`] for use on either side of a relational operator.

use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::compare::{compare, Comparison};
use crate::context::Context;
use crate::error::{ConditionError, Result};
use crate::parser::parse_expression;
use crate::resolver::{resolve, resolve_identifier};
use crate::value::Value;
use log::{debug, trace};

/// Parses `text` and evaluates it against `context`.
///
/// # Examples
///
/// ```
/// use condition_engine::{evaluate, Context};
///
/// let ctx = Context::new().with("active", true).with("uid", 200);
/// assert!(evaluate("active && uid <= 200", &ctx).unwrap());
/// ```
pub fn evaluate(text: &str, context: &Context) -> Result<bool> {
    debug!("Evaluating condition: {}", text);
    let expr = parse_expression(text).map_err(|err| {
        debug!("Condition {:?} rejected: {}", text, err);
        err
    })?;
    evaluate_expression(&expr, context)
}

/// Evaluates an already parsed expression against `context`.
///
/// Redundant outer parentheses are ignored. After that the expression must
/// be a binary expression, a unary expression or an identifier; a bare
/// literal is never a condition.
pub fn evaluate_expression(expr: &Expression, context: &Context) -> Result<bool> {
    let root = expr.ungrouped();
    let result = match root {
        Expression::BinaryOp { .. } | Expression::UnaryOp { .. } | Expression::Identifier { .. } => {
            Evaluator::new(context).condition(root)
        }
        other => Err(ConditionError::UnsupportedTopLevel(other.kind())),
    };

    match &result {
        Ok(value) => trace!("Condition {} evaluated to {}", expr, value),
        Err(err) => debug!("Condition {} failed: {}", expr, err),
    }
    result
}

/// Tree walker bound to one context.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    context: &'a Context,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }

    /// Reduces a node to a boolean.
    pub fn condition(&self, expr: &Expression) -> Result<bool> {
        match expr {
            Expression::Group { inner } => self.condition(inner.ungrouped()),

            Expression::BinaryOp { op: BinaryOperator::And, left, right } => {
                if !self.condition(left)? {
                    trace!("Short-circuit: left side of && is false, skipping {}", right);
                    return Ok(false);
                }
                self.condition(right)
            }

            Expression::BinaryOp { op: BinaryOperator::Or, left, right } => {
                if self.condition(left)? {
                    trace!("Short-circuit: left side of || is true, skipping {}", right);
                    return Ok(true);
                }
                self.condition(right)
            }

            Expression::BinaryOp { op, left, right } => {
                let comparison = Comparison::try_from(*op)?;
                let a = self.operand(left)?;
                let b = self.operand(right)?;
                compare(comparison, &a, &b)
            }

            Expression::UnaryOp { op: UnaryOperator::Not, operand } => Ok(!self.condition(operand)?),

            Expression::UnaryOp { op, .. } => Err(ConditionError::UnsupportedOperator(op.to_string())),

            Expression::Identifier { name } => {
                let value = resolve_identifier(name, self.context)?;
                value.as_bool().ok_or_else(|| ConditionError::NonBooleanCondition {
                    expression: name.clone(),
                    kind: value.kind(),
                })
            }

            Expression::Literal { .. } => Err(ConditionError::UnsupportedExpression(expr.kind())),
        }
    }

    /// Reduces a comparison operand to a value.
    ///
    /// Identifiers and literals resolve directly. Logical sub-expressions
    /// (`!active`, `a && b`, nested comparisons) become `Bool` values.
    pub fn operand(&self, expr: &Expression) -> Result<Value> {
        match expr {
            Expression::Identifier { .. } | Expression::Literal { .. } => resolve(expr, self.context),
            Expression::Group { inner } => self.operand(inner),
            Expression::UnaryOp { op: UnaryOperator::Neg, operand } => negate(self.operand(operand)?),
            Expression::UnaryOp { .. } | Expression::BinaryOp { .. } => self.condition(expr).map(Value::Bool),
        }
    }
}

fn negate(value: Value) -> Result<Value> {
    match value {
        Value::SignedInt(n) => n
            .checked_neg()
            .map(Value::SignedInt)
            .ok_or_else(|| ConditionError::UnsupportedOperator(format!("- on {} (overflow)", n))),
        Value::Float(n) => Ok(Value::Float(-n)),
        other => Err(ConditionError::UnsupportedOperator(format!("- on {}", other.kind()))),
    }
}
