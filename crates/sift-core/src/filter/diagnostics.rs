//! Shape diagnostics for parsed expressions.
//!
//! Malformed parts of an expression never raise; they silently fail to match.
//! [`Expression::diagnostics`] surfaces them, along with keys that look like a
//! misspelled keyword, so callers can report them before filtering.

use std::fmt;

use serde_json::Value;
use strsim::levenshtein;

use super::ast::{Clause, Combinator, Comparison, Expression, Operator};
use super::parser::value_kind;

/// Maximum edit distance for a keyword suggestion on longer keys.
const MAX_SUGGESTION_DISTANCE: usize = 1;

/// Keys no longer than this only get a suggestion on an exact match after
/// normalization, since short names are too close to everything.
const SHORT_KEY_LEN: usize = 3;

/// Common spellings that are not near-misses by edit distance.
const ALIASES: [(&str, Operator); 4] = [
    ("NIN", Operator::NotIn),
    ("NE", Operator::Neq),
    ("NOTIN", Operator::NotIn),
    ("ISNULL", Operator::IsNull),
];

/// What is wrong with a part of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The key's value is neither an object nor an array, so the key can
    /// never match.
    NotAMapping {
        /// Kind of value found instead.
        found: &'static str,
        /// A keyword the key may have been meant as.
        suggestion: Option<&'static str>,
    },

    /// `IN` or `NOT_IN` was given a non-array operand.
    NotASequence {
        /// The membership operator.
        operator: Operator,
    },

    /// `IS_NULL` was given something other than a boolean.
    NonBooleanIsNull,

    /// A field key that looks like a combinator but is treated as a field name.
    LooksLikeCombinator {
        /// The combinator it resembles.
        suggestion: Combinator,
    },
}

/// A finding about one key of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Keys leading from the root to the offending key.
    pub path: Vec<String>,
    /// What is wrong.
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// The path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// The message without the path.
    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::NotAMapping {
                found,
                suggestion: Some(keyword),
            } => format!("expected an object, found {found}; did you mean '{keyword}'?"),
            DiagnosticKind::NotAMapping {
                found,
                suggestion: None,
            } => format!("expected an object, found {found}; this key never matches"),
            DiagnosticKind::NotASequence { operator } => {
                format!("{operator} expects an array operand; this operator never matches")
            }
            DiagnosticKind::NonBooleanIsNull => {
                "IS_NULL expects a boolean; other operands are treated as false".to_string()
            }
            DiagnosticKind::LooksLikeCombinator { suggestion } => {
                format!("treated as a field name; did you mean the '{suggestion}' combinator?")
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.message())
    }
}

impl Expression {
    /// Reports malformed keys and likely keyword typos, in tree order.
    ///
    /// An empty result means every key of the expression can take part in a
    /// match.
    ///
    /// # Example
    ///
    /// ```
    /// use sift_core_rs::filter::{DiagnosticKind, Expression};
    /// use serde_json::json;
    ///
    /// let expr = Expression::parse(&json!({"id": {"_eq": 2}})).unwrap();
    /// let diagnostics = expr.diagnostics();
    /// assert_eq!(diagnostics[0].path_string(), "id._eq");
    /// assert_eq!(
    ///     diagnostics[0].kind,
    ///     DiagnosticKind::NotAMapping { found: "number", suggestion: Some("EQ") }
    /// );
    /// ```
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();
        let mut path = Vec::new();
        walk_expression(self, &mut path, &mut found);
        found
    }
}

fn walk_expression(expression: &Expression, path: &mut Vec<String>, found: &mut Vec<Diagnostic>) {
    for clause in &expression.clauses {
        walk_clause(clause, path, found);
    }
}

fn walk_clause(clause: &Clause, path: &mut Vec<String>, found: &mut Vec<Diagnostic>) {
    path.push(clause.key().to_string());

    match clause {
        Clause::Malformed { key, value } => found.push(Diagnostic {
            path: path.clone(),
            kind: DiagnosticKind::NotAMapping {
                found: value_kind(value),
                suggestion: suggest_keyword(key),
            },
        }),
        Clause::And(inner) | Clause::Not(inner) => walk_expression(inner, path, found),
        Clause::Or(alternatives) => {
            for alternative in alternatives {
                walk_clause(alternative, path, found);
            }
        }
        Clause::Field(field) => {
            if let Some(suggestion) = suggest_combinator(&field.name) {
                found.push(Diagnostic {
                    path: path.clone(),
                    kind: DiagnosticKind::LooksLikeCombinator { suggestion },
                });
            }

            if let Some(operand) = &field.operators.is_null {
                if !matches!(operand, Value::Bool(_)) {
                    found.push(Diagnostic {
                        path: child_path(path, Operator::IsNull.as_str()),
                        kind: DiagnosticKind::NonBooleanIsNull,
                    });
                }
            }

            for comparison in &field.operators.comparisons {
                if let Comparison::NotASequence { operator, .. } = comparison {
                    found.push(Diagnostic {
                        path: child_path(path, operator.as_str()),
                        kind: DiagnosticKind::NotASequence {
                            operator: *operator,
                        },
                    });
                }
            }

            // Operator keys were reported above.
            for clause in &field.nested.clauses {
                if Operator::from_key(clause.key()).is_none() {
                    walk_clause(clause, path, found);
                }
            }
        }
    }

    path.pop();
}

fn child_path(path: &[String], key: &str) -> Vec<String> {
    let mut child = path.to_vec();
    child.push(key.to_string());
    child
}

/// Suggests the keyword a malformed key was probably meant as.
fn suggest_keyword(key: &str) -> Option<&'static str> {
    let candidates = Operator::ALL
        .into_iter()
        .map(Operator::as_str)
        .chain(Combinator::ALL.into_iter().map(Combinator::as_str));
    let normalized = normalize(key);

    if let Some((_, operator)) = ALIASES.iter().find(|(alias, _)| *alias == normalized) {
        return Some(operator.as_str());
    }

    let max_distance = if normalized.chars().count() <= SHORT_KEY_LEN {
        0
    } else {
        MAX_SUGGESTION_DISTANCE
    };
    find_similar_keyword(key, &normalized, candidates, max_distance)
}

/// Suggests the combinator a field name was probably meant as.
///
/// Only case and prefix differences count here: field names such as `note`
/// are legitimately one edit away from a combinator.
fn suggest_combinator(name: &str) -> Option<Combinator> {
    let normalized = normalize(name);
    let candidates = Combinator::ALL.into_iter().map(Combinator::as_str);
    let keyword = find_similar_keyword(name, &normalized, candidates, 0)?;
    Combinator::from_key(keyword)
}

fn normalize(key: &str) -> String {
    key.trim_start_matches(&['_', '$'][..]).to_uppercase()
}

/// Finds the closest keyword by Levenshtein distance on the normalized key.
///
/// Returns `None` for keys that already are a keyword.
fn find_similar_keyword(
    key: &str,
    normalized: &str,
    candidates: impl Iterator<Item = &'static str>,
    max_distance: usize,
) -> Option<&'static str> {
    let (best_match, best_distance) = candidates
        .map(|keyword| (keyword, levenshtein(normalized, keyword)))
        .min_by_key(|(_, distance)| *distance)?;

    if best_match != key && best_distance <= max_distance {
        Some(best_match)
    } else {
        None
    }
}
