//! Command dispatch module for routing CLI commands to their handlers.

use std::path::PathBuf;

use crate::cli::{Cli, Commands, ConfigCommands, ExpressionSource, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands routed from the parsed CLI.
pub trait RunCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// A parsed command, borrowing its arguments from the CLI.
pub enum Dispatch<'a> {
    Filter {
        input: &'a Option<PathBuf>,
        source: &'a ExpressionSource,
        lines: bool,
        compact: bool,
        count: bool,
        max_depth: Option<u32>,
        skip_deep: bool,
    },
    Check(&'a ExpressionSource),
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> Dispatch<'a> {
    /// Create a dispatch from the CLI command.
    pub fn from_cli(cli: &'a Cli) -> Self {
        match &cli.command {
            Some(Commands::Filter {
                input,
                source,
                lines,
                compact,
                count,
                max_depth,
                skip_deep,
            }) => Self::Filter {
                input,
                source,
                lines: *lines,
                compact: *compact,
                count: *count,
                max_depth: *max_depth,
                skip_deep: *skip_deep,
            },
            Some(Commands::Check { source }) => Self::Check(source),
            Some(Commands::Config { command }) => Self::Config(command),
            Some(Commands::Completions { shell }) => Self::Completions(shell),
            None => Self::Help,
        }
    }
}

impl RunCommand for Dispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Filter {
                input,
                source,
                lines,
                compact,
                count,
                max_depth,
                skip_deep,
            } => {
                let opts = commands::filter::FilterOptions {
                    input: (*input).clone(),
                    source: (*source).clone(),
                    lines: *lines,
                    compact: *compact,
                    count: *count,
                    max_depth: *max_depth,
                    skip_deep: *skip_deep,
                };
                commands::filter::execute(ctx, &opts)
            }
            Self::Check(source) => commands::check::execute(ctx, source).map(|_| ()),
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("sift - Filter JSON records with declarative expressions");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Edit) => commands::config::execute_edit(ctx),
    }
}
