//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/sift/config.toml.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use sift_core_rs::filter::{Expression, DEFAULT_MAX_DEPTH};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# sift configuration

# Config schema version (do not modify)
version = 1

# Evaluation settings
[engine]
# max_depth = 128           # Maximum expression nesting depth

# Output preferences
[output]
# color = true              # Enable colors in reports
# pretty = true             # Pretty-print matched items

# Saved filters, usable with `sift filter --saved <name>`
[filters]
# adults = '{"age": {"GTE": 18}}'
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Evaluation settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Saved filter expressions in their JSON form, by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            engine: EngineConfig::default(),
            output: OutputConfig::default(),
            filters: BTreeMap::new(),
        }
    }
}

impl Config {
    /// The configured depth limit, or the engine default.
    pub fn max_depth(&self) -> usize {
        self.engine
            .max_depth
            .map_or(DEFAULT_MAX_DEPTH, |depth| depth as usize)
    }

    /// Whether matched items are pretty-printed. Defaults to true.
    pub fn pretty(&self) -> bool {
        self.output.pretty.unwrap_or(true)
    }

    /// Whether colors are enabled. Defaults to true.
    pub fn color(&self) -> bool {
        self.output.color.unwrap_or(true)
    }
}

/// Evaluation configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum expression nesting depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Pretty-print matched items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

/// Gets the default config directory path.
/// Uses XDG-style paths: ~/.config/sift/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("sift"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("sift"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path, preferring an explicit `--config` path.
pub fn get_config_path(ctx: &CommandContext) -> Result<PathBuf> {
    if let Some(path) = &ctx.config_path {
        return Ok(path.clone());
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
pub fn load_config(ctx: &CommandContext) -> Result<Config> {
    let path = get_config_path(ctx)?;
    load_config_from(&path)
}

/// Loads the configuration from `path`, or the defaults if it does not exist.
fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema; later versions get a step here each.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to `path`, creating its directory if needed.
fn save_config(path: &Path, config: &Config) -> Result<()> {
    ensure_parent_dir(path)?;

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }
    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx)?;
    let config = load_config_from(&path)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors && config.color() {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("[engine]");
            println!("  max_depth: {}", config.max_depth());

            println!("\n[output]");
            println!("  color: {}", config.color());
            println!("  pretty: {}", config.pretty());

            println!("\n[filters]");
            if config.filters.is_empty() {
                println!("  (none)");
            }
            for (name, expression) in &config.filters {
                println!("  {}: {}", name, expression);
            }
        } else {
            println!("(No config file exists. Run 'sift config edit' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config edit command.
pub fn execute_edit(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx)?;
    ensure_parent_dir(&path)?;

    // Create default config if it doesn't exist
    if !path.exists() {
        fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;

        if !ctx.quiet && !ctx.json_output {
            eprintln!("Created default config at: {}", path.display());
        }
    }

    let editor = env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| "vi".to_string());

    if ctx.verbose {
        eprintln!("Opening {} with {}", path.display(), editor);
    }

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .map_err(|e| CommandError::Config(format!("Failed to open editor '{}': {}", editor, e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if status.success() { "success" } else { "error" },
            "editor": editor,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if status.success() {
            println!("Config saved.");
        } else {
            eprintln!("Editor exited with error");
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let path = get_config_path(ctx)?;
    let mut config = load_config_from(&path)?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&path, &config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Validates `value` for `key` and stores it in `config`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let (section, field) = match key.split_once('.') {
        Some((section, field)) => (Some(section), field),
        None => (None, key),
    };

    match (section, field) {
        (Some("engine"), "max_depth") => {
            let depth = value
                .parse::<u32>()
                .ok()
                .filter(|depth| *depth > 0)
                .ok_or_else(|| {
                    CommandError::Config(format!(
                        "Invalid max_depth value '{}'. Use a positive integer",
                        value
                    ))
                })?;
            config.engine.max_depth = Some(depth);
        }
        (Some("output"), "color") => {
            config.output.color = Some(parse_bool(value)?);
        }
        (Some("output"), "pretty") => {
            config.output.pretty = Some(parse_bool(value)?);
        }
        (Some("filters"), name) if !name.is_empty() => {
            value.parse::<Expression>().map_err(|e| {
                CommandError::Config(format!("Invalid filter '{}': {}", name, e))
            })?;
            config.filters.insert(name.to_string(), value.to_string());
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: engine.max_depth, output.color, output.pretty, filters.<name>",
                key
            )));
        }
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path(ctx)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
