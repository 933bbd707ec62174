//! Builds typed expressions from their JSON form.
//!
//! Only the root is validated strictly. Anything malformed below it is kept in
//! the tree as a clause or comparison that never matches, so evaluation fails
//! closed instead of raising. Below the root, an array in mapping position is
//! read as a mapping keyed by its indices (`"0"`, `"1"`, ...).

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::ast::{Clause, Combinator, Comparison, Expression, FieldClause, Operator, OperatorSet};
use super::error::{FilterError, FilterResult};

/// Parser for JSON filter expressions.
pub struct ExpressionParser;

impl ExpressionParser {
    /// Parses an expression from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::NotAnObject`] if `value` is not a JSON object.
    ///
    /// # Example
    ///
    /// ```
    /// use sift_core_rs::filter::{Clause, ExpressionParser};
    /// use serde_json::json;
    ///
    /// let expr = ExpressionParser::parse(&json!({"NOT": {"id": {"EQ": 2}}})).unwrap();
    /// assert!(matches!(expr.clauses[0], Clause::Not(_)));
    /// ```
    pub fn parse(value: &Value) -> FilterResult<Expression> {
        match value {
            Value::Object(map) => Ok(parse_mapping(map)),
            other => Err(FilterError::not_an_object(value_kind(other))),
        }
    }

    /// Parses an expression from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidJson`] if `input` is not valid JSON, or
    /// [`FilterError::NotAnObject`] if it is valid JSON but not an object.
    pub fn parse_str(input: &str) -> FilterResult<Expression> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| FilterError::invalid_json(e.to_string()))?;
        Self::parse(&value)
    }
}

impl std::str::FromStr for Expression {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpressionParser::parse_str(s)
    }
}

/// Returns a short name for the kind of a JSON value.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_mapping(map: &Map<String, Value>) -> Expression {
    Expression {
        clauses: map
            .iter()
            .map(|(key, value)| parse_clause(key, value))
            .collect(),
    }
}

/// Reads a value in mapping position. Arrays are keyed by their indices.
fn as_mapping(value: &Value) -> Option<Cow<'_, Map<String, Value>>> {
    match value {
        Value::Object(map) => Some(Cow::Borrowed(map)),
        Value::Array(items) => Some(Cow::Owned(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item.clone()))
                .collect(),
        )),
        _ => None,
    }
}

fn parse_clause(key: &str, value: &Value) -> Clause {
    let Some(map) = as_mapping(value) else {
        return Clause::Malformed {
            key: key.to_string(),
            value: value.clone(),
        };
    };

    match Combinator::from_key(key) {
        Some(Combinator::And) => Clause::And(parse_mapping(&map)),
        Some(Combinator::Not) => Clause::Not(parse_mapping(&map)),
        Some(Combinator::Or) => Clause::Or(
            map.iter()
                .map(|(key, value)| parse_clause(key, value))
                .collect(),
        ),
        None => Clause::Field(parse_field(key, &map)),
    }
}

/// Builds a field clause from the mapping attached to `name`.
///
/// The operator keys are collected into the operator set. The whole mapping,
/// operator keys included, also becomes the nested expression; at that level
/// an operator keyword is just another field name.
pub(super) fn parse_field(name: &str, map: &Map<String, Value>) -> FieldClause {
    let mut operators = OperatorSet::new();

    for (key, value) in map {
        if let Some(operator) = Operator::from_key(key) {
            match Comparison::from_operator(operator, value) {
                Some(comparison) => operators.comparisons.push(comparison),
                None => operators.is_null = Some(value.clone()),
            }
        }
    }

    FieldClause {
        name: name.to_string(),
        operators,
        nested: parse_mapping(map),
    }
}
