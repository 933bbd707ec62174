//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the sift CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// sift - Filter JSON records with declarative expressions
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// JSON output for reports and errors
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use (default: ~/.config/sift/config.toml)
    #[arg(long, global = true, env = "SIFT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the items that match an expression
    ///
    /// An item that nests deeper than the depth limit stops the command with
    /// an error. Pass --skip-deep to count such items as non-matching instead,
    /// which is what the library's `filter` function does.
    #[command(alias = "f")]
    Filter {
        /// Input file with a JSON array of items (stdin when absent or "-")
        input: Option<PathBuf>,

        #[command(flatten)]
        source: ExpressionSource,

        /// Read and write one JSON item per line
        #[arg(short, long)]
        lines: bool,

        /// Print the matched array on a single line
        #[arg(long)]
        compact: bool,

        /// Print only the number of matched items
        #[arg(short, long)]
        count: bool,

        /// Maximum expression nesting depth (default: from config, or 128)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        max_depth: Option<u32>,

        /// Treat items that exceed the depth limit as non-matching instead of failing
        #[arg(long)]
        skip_deep: bool,
    },

    /// Parse an expression and report suspicious parts
    #[command(alias = "c")]
    Check {
        #[command(flatten)]
        source: ExpressionSource,
    },

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Where the filter expression comes from. Exactly one must be given.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ExpressionSource {
    /// Expression as inline JSON, e.g. '{"age": {"GTE": 18}}'
    #[arg(short = 'w', long = "where", value_name = "JSON")]
    pub inline: Option<String>,

    /// Read the expression from a JSON file
    #[arg(long, value_name = "PATH")]
    pub where_file: Option<PathBuf>,

    /// Use a filter saved in the config file
    #[arg(short, long, value_name = "NAME")]
    pub saved: Option<String>,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config in $EDITOR
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. output.pretty, filters.adults)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
