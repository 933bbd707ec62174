//! Output formatting utilities for the sift CLI.
//!
//! Matched items are written as JSON; diagnostics as a colored report or JSON.

use owo_colors::OwoColorize;
use serde_json::Value;
use sift_core_rs::filter::Diagnostic;

/// Formats matched items as a JSON array.
pub fn format_items_json(items: &[&Value], pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(items)
    } else {
        serde_json::to_string(items)
    }
}

/// Formats matched items as JSON Lines, one compact item per line.
pub fn format_items_lines(items: &[&Value]) -> serde_json::Result<String> {
    let mut output = String::new();
    for item in items {
        output.push_str(&serde_json::to_string(item)?);
        output.push('\n');
    }
    Ok(output)
}

/// Formats the diagnostics of an expression as a human-readable report.
pub fn format_diagnostics_table(diagnostics: &[Diagnostic], use_colors: bool) -> String {
    if diagnostics.is_empty() {
        let ok = "Expression OK";
        return if use_colors {
            format!("{}\n", ok.green().bold())
        } else {
            format!("{ok}\n")
        };
    }

    let mut output = String::new();
    for diagnostic in diagnostics {
        let label = "warning";
        let path = diagnostic.path_string();
        if use_colors {
            output.push_str(&format!(
                "{}: {}: {}\n",
                label.yellow().bold(),
                path.cyan(),
                diagnostic.message()
            ));
        } else {
            output.push_str(&format!("{label}: {path}: {}\n", diagnostic.message()));
        }
    }

    let summary = format!(
        "{} warning{}",
        diagnostics.len(),
        if diagnostics.len() == 1 { "" } else { "s" }
    );
    if use_colors {
        output.push_str(&format!("\n{}\n", summary.dimmed()));
    } else {
        output.push_str(&format!("\n{summary}\n"));
    }
    output
}

/// Formats the diagnostics of an expression as JSON.
pub fn format_diagnostics_json(
    expression: &Value,
    diagnostics: &[Diagnostic],
) -> serde_json::Result<String> {
    let entries: Vec<Value> = diagnostics
        .iter()
        .map(|diagnostic| {
            serde_json::json!({
                "path": diagnostic.path,
                "message": diagnostic.message(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "expression": expression,
        "ok": diagnostics.is_empty(),
        "diagnostics": entries,
    });
    serde_json::to_string_pretty(&output)
}
