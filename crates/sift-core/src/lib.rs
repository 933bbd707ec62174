//! Declarative predicate matching over in-memory JSON records.
//!
//! Filters are written as data (a `WHERE` clause in JSON form), compiled once
//! into an [`Expression`](filter::Expression), and evaluated against
//! `serde_json::Value` items. See the [`filter`](mod@filter) module for the syntax.
//!
//! ```
//! use serde_json::json;
//! use sift_core_rs::filter::Expression;
//!
//! let items = vec![
//!     json!({"id": 1, "address": {"country": "us"}}),
//!     json!({"id": 2, "address": {"country": "uk"}}),
//! ];
//! let expr = Expression::parse(&json!({"address": {"country": {"EQ": "uk"}}})).unwrap();
//!
//! let matched = sift_core_rs::filter(&items, &expr);
//! assert_eq!(matched, vec![&items[1]]);
//! ```

pub mod filter;

use serde_json::Value;

use crate::filter::{Expression, FilterEvaluator};

/// Returns true if `item` matches `expression`.
///
/// Never fails: malformed parts of the expression, and evaluations that
/// exceed the default depth limit, count as a non-match.
pub fn matches(item: &Value, expression: &Expression) -> bool {
    FilterEvaluator::new(expression).matches(item)
}

/// Returns the items matching `expression`, in their original order.
///
/// The result borrows from `items`, so each element is the very value that
/// was passed in.
pub fn filter<'a, I>(items: I, expression: &Expression) -> Vec<&'a Value>
where
    I: IntoIterator<Item = &'a Value>,
{
    FilterEvaluator::new(expression).filter_items(items)
}
