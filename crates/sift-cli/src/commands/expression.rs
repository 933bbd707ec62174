//! Resolves the filter expression named on the command line.

use std::fs;

use sift_core_rs::filter::{Expression, ExpressionParser};

use super::config::Config;
use super::{CommandContext, CommandError, Result};
use crate::cli::ExpressionSource;

/// Reads and parses the expression from whichever source was given.
pub fn load_expression(
    ctx: &CommandContext,
    source: &ExpressionSource,
    config: &Config,
) -> Result<Expression> {
    let text = expression_text(source, config)?;
    if ctx.verbose {
        eprintln!("Expression: {}", text.trim());
    }
    Ok(ExpressionParser::parse_str(&text)?)
}

/// Returns the JSON text of the expression.
fn expression_text(source: &ExpressionSource, config: &Config) -> Result<String> {
    if let Some(inline) = &source.inline {
        return Ok(inline.clone());
    }

    if let Some(path) = &source.where_file {
        return Ok(fs::read_to_string(path)?);
    }

    if let Some(name) = &source.saved {
        return config.filters.get(name).cloned().ok_or_else(|| {
            let known: Vec<&str> = config.filters.keys().map(String::as_str).collect();
            let hint = if known.is_empty() {
                "no filters are saved".to_string()
            } else {
                format!("saved filters: {}", known.join(", "))
            };
            CommandError::Config(format!("Unknown saved filter '{}' ({})", name, hint))
        });
    }

    Err(CommandError::Input(
        "no expression given; use --where, --where-file or --saved".to_string(),
    ))
}
