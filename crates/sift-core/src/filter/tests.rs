//! Tests for the expression parser.

use super::*;
use serde_json::json;

fn parse(value: serde_json::Value) -> Expression {
    ExpressionParser::parse(&value).unwrap()
}

// ==================== Field Clause Tests ====================

#[test]
fn test_parse_empty() {
    assert!(parse(json!({})).is_empty());
}

#[test]
fn test_parse_field_with_operators() {
    let expr = parse(json!({"name": {"EQ": "Alice"}}));
    assert_eq!(
        expr,
        Expression::new().field("name", OperatorSet::new().eq("Alice"))
    );
}

#[test]
fn test_parse_all_operators() {
    let expr = parse(json!({
        "id": {
            "EQ": 1, "GT": 0, "GTE": 1, "LT": 9, "LTE": 8,
            "IN": [1, 2], "NOT_IN": [3], "NEQ": 4, "IS_NULL": false
        }
    }));
    let Clause::Field(field) = &expr.clauses[0] else {
        panic!("expected field clause");
    };
    assert_eq!(field.name, "id");
    assert_eq!(field.operators.is_null, Some(json!(false)));
    let operators: Vec<Operator> = field
        .operators
        .comparisons
        .iter()
        .map(Comparison::operator)
        .collect();
    assert_eq!(
        operators,
        vec![
            Operator::Eq,
            Operator::Gt,
            Operator::Gte,
            Operator::Lt,
            Operator::Lte,
            Operator::In,
            Operator::NotIn,
            Operator::Neq,
        ]
    );
    assert_eq!(field.nested.clauses.len(), 9);
    assert!(field
        .nested
        .clauses
        .iter()
        .all(|clause| Operator::from_key(clause.key()).is_some()));
}

#[test]
fn test_parse_field_operators_and_nested() {
    let expr = parse(json!({"teams": {"IS_NULL": false, "name": {"EQ": "Users"}}}));
    assert_eq!(
        expr,
        Expression::new().with(Clause::Field(FieldClause::new(
            "teams",
            OperatorSet::new().is_null(false),
            Expression::new().field("name", OperatorSet::new().eq("Users")),
        )))
    );

    let Clause::Field(field) = &expr.clauses[0] else {
        panic!("expected field clause");
    };
    assert_eq!(
        field.nested.clauses[0],
        Clause::Malformed {
            key: "IS_NULL".to_string(),
            value: json!(false),
        }
    );
    assert_eq!(field.nested.clauses[1].key(), "name");
}

#[test]
fn test_parse_deep_nesting() {
    let expr = parse(json!({"a": {"b": {"c": {"EQ": 1}}}}));
    assert_eq!(
        expr,
        Expression::new().nested(
            "a",
            Expression::new().nested("b", Expression::new().field("c", OperatorSet::new().eq(1)))
        )
    );
}

#[test]
fn test_parse_membership_operand_not_array() {
    let expr = parse(json!({"id": {"IN": 2, "NOT_IN": "x"}}));
    let Clause::Field(field) = &expr.clauses[0] else {
        panic!("expected field clause");
    };
    assert_eq!(
        field.operators.comparisons,
        vec![
            Comparison::NotASequence {
                operator: Operator::In,
                operand: json!(2),
            },
            Comparison::NotASequence {
                operator: Operator::NotIn,
                operand: json!("x"),
            },
        ]
    );
}

// ==================== Malformed Tests ====================

#[test]
fn test_parse_primitive_field_value() {
    let expr = parse(json!({"id": 2}));
    assert_eq!(
        expr.clauses,
        vec![Clause::Malformed {
            key: "id".to_string(),
            value: json!(2),
        }]
    );
}

#[test]
fn test_parse_primitive_combinator_value() {
    let expr = parse(json!({"AND": 1, "OR": null, "NOT": "x"}));
    assert!(expr
        .clauses
        .iter()
        .all(|clause| matches!(clause, Clause::Malformed { .. })));
    assert_eq!(expr.clauses.len(), 3);
}

#[test]
fn test_parse_array_combinator_value() {
    let expr = parse(json!({"NOT": [{}]}));
    assert_eq!(
        expr,
        Expression::new().negate(Expression::new().nested("0", Expression::new()))
    );
}

// ==================== Combinator Tests ====================

#[test]
fn test_parse_and() {
    let expr = parse(json!({"AND": {"id": {"EQ": 2}, "name": {"EQ": "Alice"}}}));
    assert_eq!(
        expr,
        Expression::new().and(
            Expression::new()
                .field("id", OperatorSet::new().eq(2))
                .field("name", OperatorSet::new().eq("Alice"))
        )
    );
}

#[test]
fn test_parse_or_alternatives_are_clauses() {
    let expr = parse(json!({"OR": {"id": {"EQ": 1}, "NOT": {"id": {"EQ": 3}}, "x": 5}}));
    assert_eq!(
        expr,
        Expression::new().or([
            Clause::field("id", OperatorSet::new().eq(1)),
            Clause::negate(Expression::new().field("id", OperatorSet::new().eq(3))),
            Clause::Malformed {
                key: "x".to_string(),
                value: json!(5),
            },
        ])
    );
}

#[test]
fn test_parse_not() {
    let expr = parse(json!({"NOT": {"id": {"EQ": 2}}}));
    assert_eq!(
        expr,
        Expression::new().negate(Expression::new().field("id", OperatorSet::new().eq(2)))
    );
}

#[test]
fn test_parse_combinator_inside_field() {
    let expr = parse(json!({"address": {"OR": {"country": {"EQ": "uk"}}}}));
    assert_eq!(
        expr,
        Expression::new().nested(
            "address",
            Expression::new().or([Clause::field("country", OperatorSet::new().eq("uk"))])
        )
    );
}

// ==================== Reserved Name Tests ====================

#[test]
fn test_operator_keyword_at_expression_level_is_a_field() {
    let expr = parse(json!({"EQ": {"GT": 1}}));
    assert_eq!(
        expr,
        Expression::new().field("EQ", OperatorSet::new().gt(1))
    );
}

#[test]
fn test_keywords_are_case_sensitive() {
    let expr = parse(json!({"and": {"id": {"eq": 1}}}));
    let Clause::Field(field) = &expr.clauses[0] else {
        panic!("expected field clause");
    };
    assert_eq!(field.name, "and");
    assert!(field.operators.is_empty());
    assert_eq!(field.nested.clauses[0].key(), "id");
}

#[test]
fn test_parse_preserves_key_order() {
    let expr = parse(json!({"z": {"EQ": 1}, "a": {"EQ": 2}, "m": {"EQ": 3}}));
    let keys: Vec<&str> = expr.clauses.iter().map(Clause::key).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_parse_then_to_value() {
    let value = json!({
        "name": {"EQ": "Alice"},
        "OR": {"id": {"IN": [1, 3]}, "lastname": {"IS_NULL": true}},
        "NOT": {"address": {"country": {"EQ": "us"}}},
        "id": 2
    });
    assert_eq!(parse(value.clone()).to_value(), value);
}
