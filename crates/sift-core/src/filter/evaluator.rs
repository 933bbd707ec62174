//! Filter evaluation against JSON items.
//!
//! This module provides the [`FilterEvaluator`] for evaluating parsed expressions
//! against `serde_json::Value` items.
//!
//! # Example
//!
//! ```
//! use sift_core_rs::filter::{Expression, FilterEvaluator};
//! use serde_json::json;
//!
//! let expr = Expression::parse(&json!({"address": {"country": {"EQ": "uk"}}})).unwrap();
//! let evaluator = FilterEvaluator::new(&expr);
//!
//! assert!(evaluator.matches(&json!({"address": {"country": "uk"}})));
//! assert!(!evaluator.matches(&json!({"address": {"country": "us"}})));
//! ```

use std::cmp::Ordering;

use serde_json::{Number, Value};

use super::ast::{Clause, Comparison, Expression, FieldClause};
use super::error::{FilterError, FilterResult};

/// Default maximum recursion depth for a single evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Evaluates a parsed expression against items.
///
/// Evaluation is pure: neither the item nor the expression is modified, and
/// the evaluator holds no state between calls.
///
/// # Sequence semantics
///
/// When the value under evaluation is an array, the expression must match
/// *every* element (an empty array matches). This applies to the item itself
/// and to array-valued fields, so `{"teams": {"name": {"EQ": "Users"}}}` only
/// matches records whose teams are all named "Users".
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    expression: &'a Expression,
    max_depth: usize,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new evaluator with [`DEFAULT_MAX_DEPTH`].
    pub fn new(expression: &'a Expression) -> Self {
        Self {
            expression,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum recursion depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the maximum recursion depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns true if the item matches the expression.
    ///
    /// Exceeding the depth limit counts as a non-match.
    pub fn matches(&self, item: &Value) -> bool {
        self.evaluate(item).unwrap_or(false)
    }

    /// Evaluates the expression against an item.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DepthExceeded`] if evaluation recurses deeper
    /// than [`max_depth`](Self::max_depth).
    pub fn evaluate(&self, item: &Value) -> FilterResult<bool> {
        self.match_expression(item, self.expression, 0)
    }

    /// Returns the matching items in their original order.
    ///
    /// The returned references point into `items`; nothing is copied.
    pub fn filter_items<'b, I>(&self, items: I) -> Vec<&'b Value>
    where
        I: IntoIterator<Item = &'b Value>,
    {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }

    /// Like [`filter_items`](Self::filter_items), but stops at the first
    /// item that exceeds the depth limit.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DepthExceeded`] for the first such item.
    pub fn try_filter_items<'b, I>(&self, items: I) -> FilterResult<Vec<&'b Value>>
    where
        I: IntoIterator<Item = &'b Value>,
    {
        let mut matched = Vec::new();
        for item in items {
            if self.evaluate(item)? {
                matched.push(item);
            }
        }
        Ok(matched)
    }

    fn descend(&self, depth: usize) -> FilterResult<usize> {
        let next = depth + 1;
        if next > self.max_depth {
            return Err(FilterError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        Ok(next)
    }

    fn match_expression(
        &self,
        item: &Value,
        expression: &Expression,
        depth: usize,
    ) -> FilterResult<bool> {
        if let Value::Array(elements) = item {
            let depth = self.descend(depth)?;
            for element in elements {
                if !self.match_expression(element, expression, depth)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        for clause in &expression.clauses {
            if !self.match_clause(item, clause, depth)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn match_clause(&self, item: &Value, clause: &Clause, depth: usize) -> FilterResult<bool> {
        match clause {
            Clause::Malformed { .. } => Ok(false),
            Clause::And(inner) => self.match_expression(item, inner, self.descend(depth)?),
            // Errors propagate before negation so a depth failure never turns into a match.
            Clause::Not(inner) => Ok(!self.match_expression(item, inner, self.descend(depth)?)?),
            Clause::Or(alternatives) => {
                let depth = self.descend(depth)?;
                for alternative in alternatives {
                    if self.match_clause(item, alternative, depth)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Clause::Field(field) => self.match_field(item, field, depth),
        }
    }

    fn match_field(&self, item: &Value, field: &FieldClause, depth: usize) -> FilterResult<bool> {
        let operators = &field.operators;

        // Absent and null are handled alike: only `IS_NULL: true` can pass.
        let value = match item.get(field.name.as_str()) {
            Some(value) if !value.is_null() => value,
            _ => return Ok(operators.requires_null()),
        };

        if operators.requires_null() {
            return Ok(false);
        }

        if !operators
            .comparisons
            .iter()
            .all(|comparison| compare(value, comparison))
        {
            return Ok(false);
        }

        // Structured values are matched against the whole field object.
        if value.is_object() || value.is_array() {
            return self.match_expression(value, &field.nested, self.descend(depth)?);
        }

        Ok(true)
    }
}

/// Returns true if `value` satisfies `comparison`.
fn compare(value: &Value, comparison: &Comparison) -> bool {
    match comparison {
        Comparison::Eq(operand) => values_equal(value, operand),
        Comparison::Neq(operand) => !values_equal(value, operand),
        Comparison::Gt(operand) => compare_values(value, operand) == Some(Ordering::Greater),
        Comparison::Gte(operand) => matches!(
            compare_values(value, operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Comparison::Lt(operand) => compare_values(value, operand) == Some(Ordering::Less),
        Comparison::Lte(operand) => matches!(
            compare_values(value, operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Comparison::In(candidates) => candidates.iter().any(|c| values_equal(value, c)),
        Comparison::NotIn(candidates) => !candidates.iter().any(|c| values_equal(value, c)),
        Comparison::NotASequence { .. } => false,
    }
}

/// Compare two JSON values, returning an ordering if the types are comparable.
///
/// - Numbers: compared as integers when both fit, otherwise as f64
/// - Strings: compared lexicographically
/// - Booleans: false < true
/// - Null == Null
/// - Arrays, objects and mismatched types: returns `None`
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}

/// Exact equality between two JSON values.
///
/// Numbers are equal when numerically equal (`1 == 1.0`); arrays and objects
/// are compared structurally. Values of different types are never equal.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => left == right,
    }
}
