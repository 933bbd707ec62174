//! Filtering tests against a small fixture of user records.
//!
//! Each record has scalar fields, a nullable `lastname`, a nested `address`
//! record and a `teams` sequence of records.

use serde_json::{json, Value};
use sift_core_rs::filter::{Clause, Expression, FilterEvaluator, OperatorSet};
use sift_core_rs::{filter, matches};

fn items() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Joe",
            "lastname": "Doe",
            "address": {"country": "us"},
            "teams": [
                {"id": 1, "name": "Admins"},
                {"id": 2, "name": "Developers"}
            ]
        }),
        json!({
            "id": 2,
            "name": "Alice",
            "lastname": null,
            "address": {"country": "uk"},
            "teams": [
                {"id": 2, "name": "Developers"}
            ]
        }),
        json!({
            "id": 3,
            "name": "Bob",
            "lastname": "Sinclair",
            "address": {"country": "de"},
            "teams": [
                {"id": 3, "name": "Users"}
            ]
        }),
    ]
}

fn expr(value: Value) -> Expression {
    Expression::parse(&value).unwrap()
}

/// Runs the filter and returns the matched ids.
fn ids(items: &[Value], where_clause: Value) -> Vec<i64> {
    filter(items, &expr(where_clause))
        .into_iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Simple operations
// ============================================================================

#[test]
fn test_eq_single_result() {
    let items = items();
    let result = filter(&items, &expr(json!({"name": {"EQ": "Alice"}})));
    assert_eq!(result.len(), 1);
    assert!(std::ptr::eq(result[0], &items[1]));
}

#[test]
fn test_eq_no_result() {
    let items = items();
    assert!(ids(&items, json!({"name": {"EQ": "Carol"}})).is_empty());
}

#[test]
fn test_multiple_operators_are_anded() {
    let items = items();
    assert!(ids(&items, json!({"id": {"EQ": 2, "IN": [1, 3]}})).is_empty());
    assert_eq!(ids(&items, json!({"id": {"GT": 1, "IN": [1, 2]}})), vec![2]);
}

#[test]
fn test_multiple_fields_are_anded() {
    let items = items();
    assert_eq!(
        ids(&items, json!({"id": {"EQ": 2}, "name": {"EQ": "Alice"}})),
        vec![2]
    );
    assert!(ids(&items, json!({"id": {"EQ": 2}, "name": {"EQ": "Bob"}})).is_empty());
}

// ============================================================================
// Deep operations
// ============================================================================

#[test]
fn test_nested_record() {
    let items = items();
    assert_eq!(ids(&items, json!({"address": {"country": {"EQ": "uk"}}})), vec![2]);
    assert!(ids(&items, json!({"address": {"country": {"EQ": "fr"}}})).is_empty());
}

#[test]
fn test_sequence_field_all_of() {
    let items = items();
    assert_eq!(ids(&items, json!({"teams": {"name": {"EQ": "Users"}}})), vec![3]);
    // Joe also belongs to Developers, but not every one of his teams does.
    assert!(ids(&items, json!({"teams": {"name": {"EQ": "Developers"}}})).is_empty());
    assert!(ids(&items, json!({"teams": {"name": {"EQ": "Guests"}}})).is_empty());
}

#[test]
fn test_sequence_field_every_element_in_set() {
    let items = items();
    assert_eq!(
        ids(
            &items,
            json!({"teams": {"name": {"IN": ["Admins", "Developers"]}}})
        ),
        vec![1, 2]
    );
}

#[test]
fn test_operators_on_record_field_never_match() {
    let items = items();
    assert!(ids(&items, json!({"address": {"IS_NULL": false}})).is_empty());
    assert!(ids(&items, json!({"address": {"EQ": {"country": "uk"}}})).is_empty());
    assert!(ids(&items, json!({"address": {"NEQ": "x"}})).is_empty());
    assert!(ids(
        &items,
        json!({"address": {"NEQ": "x", "country": {"EQ": "uk"}}})
    )
    .is_empty());
}

#[test]
fn test_operators_on_sequence_field_never_match() {
    let items = items();
    assert!(ids(&items, json!({"teams": {"IS_NULL": false}})).is_empty());
    assert!(ids(
        &items,
        json!({"teams": {"IS_NULL": false, "name": {"EQ": "Users"}}})
    )
    .is_empty());
}

#[test]
fn test_combinator_inside_record_field() {
    let items = items();
    assert_eq!(
        ids(&items, json!({"address": {"AND": {"country": {"EQ": "us"}}}})),
        vec![1]
    );
    assert_eq!(
        ids(
            &items,
            json!({"address": {"OR": {"country": {"EQ": "uk"}, "city": {"IS_NULL": true}}}})
        ),
        vec![1, 2, 3]
    );
}

// ============================================================================
// Combinators
// ============================================================================

#[test]
fn test_and_expression() {
    let items = items();
    assert_eq!(
        ids(&items, json!({"AND": {"id": {"EQ": 2}, "name": {"EQ": "Alice"}}})),
        vec![2]
    );
}

#[test]
fn test_or_expression_preserves_order() {
    let items = items();
    let result = filter(
        &items,
        &expr(json!({"OR": {"id": {"EQ": 1}, "name": {"EQ": "Alice"}}})),
    );
    assert_eq!(result.len(), 2);
    assert!(std::ptr::eq(result[0], &items[0]));
    assert!(std::ptr::eq(result[1], &items[1]));
}

#[test]
fn test_not_expression() {
    let items = items();
    assert_eq!(ids(&items, json!({"NOT": {"id": {"EQ": 2}}})), vec![1, 3]);
}

#[test]
fn test_builder_matches_parsed_expression() {
    let items = items();
    let built = Expression::new()
        .or([
            Clause::field("id", OperatorSet::new().eq(1)),
            Clause::field("name", OperatorSet::new().eq("Alice")),
        ])
        .negate(Expression::new().nested(
            "address",
            Expression::new().field("country", OperatorSet::new().eq("uk")),
        ));
    assert_eq!(filter(&items, &built), vec![&items[0]]);
}

// ============================================================================
// Null handling
// ============================================================================

#[test]
fn test_is_null() {
    let items = items();
    assert_eq!(ids(&items, json!({"lastname": {"IS_NULL": true}})), vec![2]);
    assert_eq!(ids(&items, json!({"lastname": {"IS_NULL": false}})), vec![1, 3]);
}

#[test]
fn test_null_field_fails_comparisons() {
    let items = items();
    assert_eq!(ids(&items, json!({"lastname": {"NEQ": "Doe"}})), vec![3]);
}

#[test]
fn test_unknown_field() {
    let items = items();
    assert!(ids(&items, json!({"unknownField": {"EQ": 2}})).is_empty());
    assert_eq!(
        ids(&items, json!({"unknownField": {"IS_NULL": true}})),
        vec![1, 2, 3]
    );
    assert!(ids(&items, json!({"unknownField": {"IS_NULL": false}})).is_empty());
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_comparison_operators() {
    let items = items();
    assert_eq!(ids(&items, json!({"id": {"GT": 2}})), vec![3]);
    assert_eq!(ids(&items, json!({"id": {"GTE": 2}})), vec![2, 3]);
    assert_eq!(ids(&items, json!({"id": {"LT": 2}})), vec![1]);
    assert_eq!(ids(&items, json!({"id": {"LTE": 2}})), vec![1, 2]);
    assert_eq!(ids(&items, json!({"id": {"NEQ": 2}})), vec![1, 3]);
    assert_eq!(ids(&items, json!({"id": {"IN": [2]}})), vec![2]);
    assert_eq!(ids(&items, json!({"id": {"NOT_IN": [2]}})), vec![1, 3]);
}

#[test]
fn test_membership_operand_not_array() {
    let items = items();
    assert!(ids(&items, json!({"id": {"IN": 2}})).is_empty());
    assert!(ids(&items, json!({"id": {"NOT_IN": 2}})).is_empty());
}

#[test]
fn test_field_has_primitive() {
    let items = items();
    assert!(ids(&items, json!({"id": 2})).is_empty());
    for item in &items {
        assert!(!matches(item, &expr(json!({"id": 2}))));
    }
}

#[test]
fn test_array_where_object_expected() {
    let items = items();
    assert_eq!(ids(&items, json!({"id": [7]})), vec![1, 2, 3]);
    assert_eq!(ids(&items, json!({"AND": []})), vec![1, 2, 3]);
    assert_eq!(ids(&items, json!({"address": []})), vec![1, 2, 3]);
    assert!(ids(&items, json!({"AND": [{"id": {"EQ": 1}}]})).is_empty());
    assert_eq!(
        ids(&items, json!({"OR": [{"IS_NULL": true}], "id": {"GT": 1}})),
        vec![2, 3]
    );
}

// ============================================================================
// Collection properties
// ============================================================================

#[test]
fn test_filter_is_idempotent() {
    let items = items();
    let expressions = [
        json!({"name": {"EQ": "Alice"}}),
        json!({"OR": {"id": {"EQ": 1}, "name": {"EQ": "Alice"}}}),
        json!({"NOT": {"id": {"EQ": 2}}}),
        json!({"teams": {"name": {"EQ": "Users"}}}),
        json!({"lastname": {"IS_NULL": false}}),
        json!({}),
    ];
    for where_clause in expressions {
        let expression = expr(where_clause);
        let once = filter(&items, &expression);
        let twice = filter(once.iter().copied(), &expression);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_filter_returns_input_references() {
    let items = items();
    let result = filter(&items, &expr(json!({"id": {"GTE": 1}})));
    assert_eq!(result.len(), items.len());
    for (matched, original) in result.iter().zip(&items) {
        assert!(std::ptr::eq(*matched, original));
    }
}

#[test]
fn test_filter_does_not_modify_inputs() {
    let items = items();
    let snapshot = items.clone();
    let where_clause = json!({"OR": {"teams": {"id": {"GT": 1}}, "NOT": {"id": 1}}});
    let expression = expr(where_clause.clone());
    let _ = filter(&items, &expression);
    assert_eq!(items, snapshot);
    assert_eq!(expression.to_value(), where_clause);
}

#[test]
fn test_filter_empty_collection() {
    let items: Vec<Value> = Vec::new();
    assert!(filter(&items, &expr(json!({"id": {"EQ": 1}}))).is_empty());
}

#[test]
fn test_evaluator_shared_across_threads() {
    let items = items();
    let expression = expr(json!({"address": {"country": {"IN": ["us", "de"]}}}));
    let evaluator = FilterEvaluator::new(&expression);

    std::thread::scope(|scope| {
        let handles: Vec<_> = items
            .iter()
            .map(|item| scope.spawn(move || evaluator.matches(item)))
            .collect();
        let results: Vec<bool> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert_eq!(results, vec![true, false, true]);
    });
}
