//! Declarative filter expressions and their evaluator.
//!
//! An expression is a JSON object. Its keys are combined with implicit AND and
//! fall into two groups.
//!
//! # Combinators
//!
//! - `AND` - the nested expression must match
//! - `OR` - each entry of the nested object is an alternative; one must match
//! - `NOT` - the nested expression must not match
//!
//! # Field keys
//!
//! Any other key names a field of the item. Its value is an object holding
//! operators for the field's value:
//!
//! - `EQ`, `NEQ` - exact equality / inequality
//! - `GT`, `GTE`, `LT`, `LTE` - ordering within numbers, strings or booleans
//! - `IN`, `NOT_IN` - membership in an array operand
//! - `IS_NULL` - `true` requires the field to be null or absent
//!
//! When the field's value is a record or an array, the whole object is also
//! matched against it as a nested expression. Operator keys stay in that
//! expression, where they are ordinary field names, so operators only combine
//! with nested keys on scalar fields. Arrays require every element to match.
//!
//! Absent and null fields only pass `IS_NULL: true`. An array in place of an
//! object is read as an object keyed by index (`"0"`, `"1"`, ...). A key whose
//! value is neither never matches.
//!
//! # Reserved names
//!
//! Inside a field's object the operator keywords are always operators, and at
//! any level the combinator keywords are always combinators, so a record field
//! named like a keyword cannot be addressed.
//!
//! # Example
//!
//! ```
//! use sift_core_rs::filter::{Expression, FilterEvaluator};
//! use serde_json::json;
//!
//! let items = vec![
//!     json!({"id": 1, "name": "Joe", "lastname": "Doe"}),
//!     json!({"id": 2, "name": "Alice", "lastname": null}),
//! ];
//!
//! let expr: Expression = r#"{"OR": {"id": {"EQ": 1}, "lastname": {"IS_NULL": true}}}"#
//!     .parse()
//!     .unwrap();
//! let evaluator = FilterEvaluator::new(&expr);
//!
//! assert_eq!(evaluator.filter_items(&items).len(), 2);
//! ```

mod ast;
mod diagnostics;
mod error;
mod evaluator;
mod parser;

pub use ast::{Clause, Combinator, Comparison, Expression, FieldClause, Operator, OperatorSet};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{FilterError, FilterResult};
pub use evaluator::{compare_values, values_equal, FilterEvaluator, DEFAULT_MAX_DEPTH};
pub use parser::{value_kind, ExpressionParser};

#[cfg(test)]
mod tests;
