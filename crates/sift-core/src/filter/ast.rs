//! Typed expression tree for declarative filters.
//!
//! The JSON form of an expression is inspected once by the
//! [`ExpressionParser`](super::ExpressionParser) and turned into the closed
//! types below; evaluation never looks at raw keys again.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::parser::{self, ExpressionParser};

/// Boolean combinator keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `AND`: the nested expression must match.
    And,
    /// `OR`: at least one alternative must match.
    Or,
    /// `NOT`: the nested expression must not match.
    Not,
}

impl Combinator {
    /// All combinators, in keyword order.
    pub const ALL: [Combinator; 3] = [Combinator::And, Combinator::Or, Combinator::Not];

    /// The reserved key for this combinator.
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
            Combinator::Not => "NOT",
        }
    }

    /// Looks up a combinator by its exact reserved key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == key)
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operator keywords accepted inside a field's operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Neq,
    IsNull,
}

impl Operator {
    /// All operators, in keyword order.
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::NotIn,
        Operator::Neq,
        Operator::IsNull,
    ];

    /// The reserved key for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Neq => "NEQ",
            Operator::IsNull => "IS_NULL",
        }
    }

    /// Looks up an operator by its exact reserved key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == key)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparison applied to a field's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
    Eq(Value),
    Neq(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    /// `IN` or `NOT_IN` with an operand that is not an array. Never passes.
    NotASequence {
        /// Which of the two membership operators was used.
        operator: Operator,
        /// The operand as written.
        operand: Value,
    },
}

impl Comparison {
    /// Builds the comparison for `operator`, or `None` for `IS_NULL`, which
    /// is not a comparison.
    pub fn from_operator(operator: Operator, operand: &Value) -> Option<Self> {
        let comparison = match operator {
            Operator::Eq => Comparison::Eq(operand.clone()),
            Operator::Neq => Comparison::Neq(operand.clone()),
            Operator::Gt => Comparison::Gt(operand.clone()),
            Operator::Gte => Comparison::Gte(operand.clone()),
            Operator::Lt => Comparison::Lt(operand.clone()),
            Operator::Lte => Comparison::Lte(operand.clone()),
            Operator::In | Operator::NotIn => match operand {
                Value::Array(items) if operator == Operator::In => Comparison::In(items.clone()),
                Value::Array(items) => Comparison::NotIn(items.clone()),
                other => Comparison::NotASequence {
                    operator,
                    operand: other.clone(),
                },
            },
            Operator::IsNull => return None,
        };
        Some(comparison)
    }

    /// The operator keyword this comparison was written with.
    pub fn operator(&self) -> Operator {
        match self {
            Comparison::Eq(_) => Operator::Eq,
            Comparison::Neq(_) => Operator::Neq,
            Comparison::Gt(_) => Operator::Gt,
            Comparison::Gte(_) => Operator::Gte,
            Comparison::Lt(_) => Operator::Lt,
            Comparison::Lte(_) => Operator::Lte,
            Comparison::In(_) => Operator::In,
            Comparison::NotIn(_) => Operator::NotIn,
            Comparison::NotASequence { operator, .. } => *operator,
        }
    }

    /// The operand in its JSON form.
    pub fn operand(&self) -> Value {
        match self {
            Comparison::Eq(v)
            | Comparison::Neq(v)
            | Comparison::Gt(v)
            | Comparison::Gte(v)
            | Comparison::Lt(v)
            | Comparison::Lte(v) => v.clone(),
            Comparison::In(items) | Comparison::NotIn(items) => Value::Array(items.clone()),
            Comparison::NotASequence { operand, .. } => operand.clone(),
        }
    }
}

/// The operators attached to one field, combined with implicit AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorSet {
    /// The `IS_NULL` operand as written. Only the literal `true` requires
    /// the field to be null or absent; any other operand reads as `false`.
    pub is_null: Option<Value>,

    /// Comparisons in the order they were written.
    pub comparisons: Vec<Comparison>,
}

impl OperatorSet {
    /// Creates an empty operator set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `IS_NULL: true` is present.
    pub fn requires_null(&self) -> bool {
        matches!(self.is_null, Some(Value::Bool(true)))
    }

    /// Returns true if neither `IS_NULL` nor any comparison is present.
    pub fn is_empty(&self) -> bool {
        self.is_null.is_none() && self.comparisons.is_empty()
    }

    /// Adds a comparison built from `operator` and `operand`.
    pub fn with(mut self, operator: Operator, operand: impl Into<Value>) -> Self {
        let operand = operand.into();
        match Comparison::from_operator(operator, &operand) {
            Some(comparison) => self.comparisons.push(comparison),
            None => self.is_null = Some(operand),
        }
        self
    }

    /// `EQ value`
    pub fn eq(self, value: impl Into<Value>) -> Self {
        self.with(Operator::Eq, value)
    }

    /// `NEQ value`
    pub fn neq(self, value: impl Into<Value>) -> Self {
        self.with(Operator::Neq, value)
    }

    /// `GT value`
    pub fn gt(self, value: impl Into<Value>) -> Self {
        self.with(Operator::Gt, value)
    }

    /// `GTE value`
    pub fn gte(self, value: impl Into<Value>) -> Self {
        self.with(Operator::Gte, value)
    }

    /// `LT value`
    pub fn lt(self, value: impl Into<Value>) -> Self {
        self.with(Operator::Lt, value)
    }

    /// `LTE value`
    pub fn lte(self, value: impl Into<Value>) -> Self {
        self.with(Operator::Lte, value)
    }

    /// `IN [values...]`
    pub fn is_in<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.comparisons
            .push(Comparison::In(values.into_iter().map(Into::into).collect()));
        self
    }

    /// `NOT_IN [values...]`
    pub fn not_in<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.comparisons
            .push(Comparison::NotIn(values.into_iter().map(Into::into).collect()));
        self
    }

    /// `IS_NULL flag`
    pub fn is_null(mut self, flag: bool) -> Self {
        self.is_null = Some(Value::Bool(flag));
        self
    }

    /// The operand written for `operator`, if present.
    pub fn operand(&self, operator: Operator) -> Option<Value> {
        match operator {
            Operator::IsNull => self.is_null.clone(),
            _ => self
                .comparisons
                .iter()
                .rev()
                .find(|comparison| comparison.operator() == operator)
                .map(Comparison::operand),
        }
    }

    /// The operators in their JSON form, `IS_NULL` first.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(flag) = &self.is_null {
            map.insert(Operator::IsNull.as_str().to_string(), flag.clone());
        }
        for comparison in &self.comparisons {
            map.insert(
                comparison.operator().as_str().to_string(),
                comparison.operand(),
            );
        }
        map
    }
}

/// A field key and the object attached to it.
///
/// The object is read two ways. Its operator keys test the field's own value.
/// When that value is a record or a sequence, the whole object is also
/// matched against it as an expression. Operator keys stay in that
/// expression, where they name fields like any other key, so
/// `{"address": {"EQ": 1}}` fails on a record-valued `address`.
///
/// Build one with [`FieldClause::new`] or the parser so that both views stay
/// in step.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldClause {
    /// Name of the field on the item.
    pub name: String,
    /// Operators applied to the field's value.
    pub operators: OperatorSet,
    /// The whole object, operator keys included, applied to a structured
    /// field value.
    pub nested: Expression,
}

impl FieldClause {
    /// Builds the clause for `{name: {...operators, ...nested}}`.
    ///
    /// The result is the same as parsing that object, so an operator keyword
    /// among the `nested` clause keys is read as an operator.
    pub fn new(name: impl Into<String>, operators: OperatorSet, nested: Expression) -> Self {
        let name = name.into();
        let mut map = operators.to_map();
        map.extend(clauses_to_map(&nested.clauses));
        parser::parse_field(&name, &map)
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        for clause in &self.nested.clauses {
            let value = Operator::from_key(clause.key())
                .and_then(|operator| self.operators.operand(operator))
                .unwrap_or_else(|| clause.to_value());
            map.insert(clause.key().to_string(), value);
        }
        for (key, value) in self.operators.to_map() {
            map.entry(key).or_insert(value);
        }
        Value::Object(map)
    }
}

/// One key of an expression mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `AND`: the nested expression must match.
    And(Expression),

    /// `OR`: each entry is an alternative evaluated on its own; one must match.
    Or(Vec<Clause>),

    /// `NOT`: the nested expression must not match.
    Not(Expression),

    /// A field key with its operator set and the expression over its object.
    Field(FieldClause),

    /// A key whose value is neither an object nor an array. Never matches.
    Malformed {
        /// The key as written.
        key: String,
        /// The offending value.
        value: Value,
    },
}

impl Clause {
    /// A field clause with only operators.
    pub fn field(name: impl Into<String>, operators: OperatorSet) -> Self {
        Clause::Field(FieldClause::new(name, operators, Expression::new()))
    }

    /// A field clause with only a nested expression.
    pub fn nested(name: impl Into<String>, nested: Expression) -> Self {
        Clause::Field(FieldClause::new(name, OperatorSet::new(), nested))
    }

    /// `AND { ... }`
    pub fn and(inner: Expression) -> Self {
        Clause::And(inner)
    }

    /// `OR { alternative, ... }`
    pub fn or(alternatives: impl IntoIterator<Item = Clause>) -> Self {
        Clause::Or(alternatives.into_iter().collect())
    }

    /// `NOT { ... }`
    pub fn negate(inner: Expression) -> Self {
        Clause::Not(inner)
    }

    /// The key this clause occupies in the JSON form.
    pub fn key(&self) -> &str {
        match self {
            Clause::And(_) => Combinator::And.as_str(),
            Clause::Or(_) => Combinator::Or.as_str(),
            Clause::Not(_) => Combinator::Not.as_str(),
            Clause::Field(field) => &field.name,
            Clause::Malformed { key, .. } => key,
        }
    }

    /// The value this clause holds in the JSON form.
    pub fn to_value(&self) -> Value {
        match self {
            Clause::And(inner) | Clause::Not(inner) => inner.to_value(),
            Clause::Or(alternatives) => Value::Object(clauses_to_map(alternatives)),
            Clause::Field(field) => field.to_value(),
            Clause::Malformed { value, .. } => value.clone(),
        }
    }
}

/// A filter expression: a set of clauses that must all match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    /// Clauses in the order they were written.
    pub clauses: Vec<Clause>,
}

impl Expression {
    /// Creates an empty expression, which matches every item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an expression from its JSON form. See [`ExpressionParser::parse`].
    pub fn parse(value: &Value) -> super::FilterResult<Self> {
        ExpressionParser::parse(value)
    }

    /// Appends a clause.
    pub fn with(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Appends a field clause with operators.
    ///
    /// # Example
    ///
    /// ```
    /// use sift_core_rs::filter::{Expression, OperatorSet};
    /// use serde_json::json;
    ///
    /// let expr = Expression::new().field("age", OperatorSet::new().gte(18));
    /// assert_eq!(expr.to_value(), json!({"age": {"GTE": 18}}));
    /// ```
    pub fn field(self, name: impl Into<String>, operators: OperatorSet) -> Self {
        self.with(Clause::field(name, operators))
    }

    /// Appends a field clause matched against a structured field value.
    pub fn nested(self, name: impl Into<String>, nested: Expression) -> Self {
        self.with(Clause::nested(name, nested))
    }

    /// Appends an `AND` clause.
    pub fn and(self, inner: Expression) -> Self {
        self.with(Clause::and(inner))
    }

    /// Appends an `OR` clause over the given alternatives.
    pub fn or(self, alternatives: impl IntoIterator<Item = Clause>) -> Self {
        self.with(Clause::or(alternatives))
    }

    /// Appends a `NOT` clause.
    pub fn negate(self, inner: Expression) -> Self {
        self.with(Clause::negate(inner))
    }

    /// Returns true if the expression has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Converts the expression back to its JSON form.
    ///
    /// Clauses sharing a key collapse to the last one, since a JSON object
    /// cannot repeat keys. An array written in mapping position comes back as
    /// the equivalent object keyed by index.
    pub fn to_value(&self) -> Value {
        Value::Object(clauses_to_map(&self.clauses))
    }
}

fn clauses_to_map(clauses: &[Clause]) -> Map<String, Value> {
    clauses
        .iter()
        .map(|clause| (clause.key().to_string(), clause.to_value()))
        .collect()
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ExpressionParser::parse(&value).map_err(serde::de::Error::custom)
    }
}
