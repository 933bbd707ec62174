//! Filter command implementation.
//!
//! Reads a collection of JSON items, keeps those matching an expression and
//! prints them as JSON.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value;
use sift_core_rs::filter::{value_kind, FilterEvaluator};

use super::config::load_config;
use super::expression::load_expression;
use super::{CommandContext, CommandError, Result};
use crate::cli::ExpressionSource;
use crate::output::{format_items_json, format_items_lines};

/// Options for the filter command.
#[derive(Debug)]
pub struct FilterOptions {
    /// Input file; stdin when `None` or `-`.
    pub input: Option<PathBuf>,
    /// Where the expression comes from.
    pub source: ExpressionSource,
    /// Read and write JSON Lines.
    pub lines: bool,
    /// Print the matched array on a single line.
    pub compact: bool,
    /// Print only the number of matches.
    pub count: bool,
    /// Depth limit overriding the config.
    pub max_depth: Option<u32>,
    /// Count items over the depth limit as non-matching instead of failing.
    pub skip_deep: bool,
}

/// Executes the filter command.
pub fn execute(ctx: &CommandContext, opts: &FilterOptions) -> Result<()> {
    let config = load_config(ctx)?;
    let expression = load_expression(ctx, &opts.source, &config)?;
    let max_depth = opts
        .max_depth
        .map_or_else(|| config.max_depth(), |depth| depth as usize);

    let input = read_input(opts.input.as_deref())?;
    let items = parse_items(&input, opts.lines)?;

    let started = Instant::now();
    let evaluator = FilterEvaluator::new(&expression).with_max_depth(max_depth);
    let matched = if opts.skip_deep {
        evaluator.filter_items(&items)
    } else {
        evaluator.try_filter_items(&items)?
    };

    if ctx.verbose {
        eprintln!(
            "Matched {} of {} items in {:?} (max depth {})",
            matched.len(),
            items.len(),
            started.elapsed(),
            max_depth
        );
    }

    if opts.count {
        if ctx.json_output {
            println!("{}", serde_json::json!({ "count": matched.len() }));
        } else {
            println!("{}", matched.len());
        }
    } else if opts.lines {
        print!("{}", format_items_lines(&matched)?);
    } else {
        let pretty = !opts.compact && config.pretty();
        println!("{}", format_items_json(&matched, pretty)?);
    }

    Ok(())
}

/// Reads the raw input from a file, or from stdin for `None` and `-`.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Parses the input as a JSON array of items, or as JSON Lines.
///
/// Blank lines are skipped in JSON Lines input.
fn parse_items(input: &str, lines: bool) -> Result<Vec<Value>> {
    if lines {
        return input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<Value>(line).map_err(|e| {
                    CommandError::Input(format!("line {}: invalid JSON: {}", index + 1, e))
                })
            })
            .collect();
    }

    let value: Value = serde_json::from_str(input)
        .map_err(|e| CommandError::Input(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Array(items) => Ok(items),
        other => Err(CommandError::Input(format!(
            "expected a JSON array of items, found {}",
            value_kind(&other)
        ))),
    }
}
