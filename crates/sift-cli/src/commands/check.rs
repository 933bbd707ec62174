//! Check command implementation.
//!
//! Parses an expression and reports the parts of it that can never match.

use sift_core_rs::filter::Diagnostic;

use super::config::load_config;
use super::expression::load_expression;
use super::{CommandContext, Result};
use crate::cli::ExpressionSource;
use crate::output::{format_diagnostics_json, format_diagnostics_table};

/// Executes the check command.
///
/// Parse failures are errors; diagnostics are reported but do not fail.
pub fn execute(ctx: &CommandContext, source: &ExpressionSource) -> Result<Vec<Diagnostic>> {
    let config = load_config(ctx)?;
    let expression = load_expression(ctx, source, &config)?;
    let diagnostics = expression.diagnostics();

    if ctx.verbose {
        eprintln!(
            "Parsed {} top-level clause(s), {} diagnostic(s)",
            expression.clauses.len(),
            diagnostics.len()
        );
    }

    if ctx.json_output {
        println!(
            "{}",
            format_diagnostics_json(&expression.to_value(), &diagnostics)?
        );
    } else if !ctx.quiet {
        let use_colors = ctx.use_colors && config.color();
        print!("{}", format_diagnostics_table(&diagnostics, use_colors));
    }

    Ok(diagnostics)
}
