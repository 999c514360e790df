//! Configuration management for the monaco preprocessor.
//!
//! Handles:
//! - Command-line argument parsing
//! - Rendering options from TOML files and book.toml's `[preprocessor.monaco]`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Command-line arguments for the monaco preprocessor
#[derive(Debug, Parser)]
#[command(name = "mdbook-monaco")]
#[command(about = "mdBook preprocessor embedding multi-file Monaco editors")]
#[command(version)]
pub struct Args {
    /// Options file layered over the user config
    #[arg(long, help = "TOML file with monaco options")]
    pub config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Exit successfully if the renderer is supported
    Supports { renderer: String },

    /// Transform a markdown file and print the result
    Render { path: PathBuf },

    /// Write the editor session script into a theme directory
    Install {
        theme_dir: PathBuf,
        #[arg(long, help = "Overwrite an existing script")]
        force: bool,
    },

    /// Drive an editor session over the first monaco block of a markdown file
    Session {
        path: PathBuf,
        #[arg(long, help = "JSON file holding saved edits")]
        store: PathBuf,
        #[arg(long, help = "File to switch to")]
        activate: Option<String>,
        #[arg(long, help = "Replace the active file's text")]
        edit: Option<String>,
    },
}

/// Options controlling how monaco blocks are rendered
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MonacoOptions {
    /// CSS min-height of the editor mount point
    pub min_height: String,
    /// Abort the build on a malformed block instead of leaving it as is
    pub fail_on_error: bool,
    /// Renderers whose output can host the editor
    pub renderers: Vec<String>,
}

impl Default for MonacoOptions {
    fn default() -> Self {
        Self {
            min_height: "200px".to_string(),
            fail_on_error: false,
            renderers: vec!["html".to_string()],
        }
    }
}

impl MonacoOptions {
    pub fn supports_renderer(&self, renderer: &str) -> bool {
        self.renderers.iter().any(|r| r == renderer)
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Subcommand, `None` for the preprocessor protocol
    pub command: Option<Command>,
    /// Option files that were loaded, lowest precedence first
    pub config_files: Vec<PathBuf>,
    /// Log level
    pub log_level: String,
    file_options: Map<String, Value>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        Self::build(args, dirs::config_dir())
    }

    fn build(args: Args, user_config_dir: Option<PathBuf>) -> Result<Self> {
        let mut config_files = Vec::new();

        // User config is optional, an explicit --config is not
        if let Some(dir) = user_config_dir {
            let user_file = dir.join("mdbook-monaco").join("config.toml");
            if user_file.is_file() {
                config_files.push(user_file);
            }
        }
        if let Some(path) = args.config {
            config_files.push(path);
        }

        let mut file_options = Map::new();
        for path in &config_files {
            overlay(&mut file_options, load_options_file(path)?);
        }

        Ok(Config {
            command: args.command,
            config_files,
            log_level: args.log_level,
            file_options,
        })
    }

    /// Options from config files alone
    pub fn options(&self) -> Result<MonacoOptions> {
        self.options_for_book(None)
    }

    /// Options from config files overlaid with a book's `[preprocessor.monaco]` table
    pub fn options_for_book(&self, book_table: Option<&Value>) -> Result<MonacoOptions> {
        let mut merged = self.file_options.clone();
        if let Some(Value::Object(table)) = book_table {
            overlay(&mut merged, table.clone());
        }

        serde_json::from_value(Value::Object(merged)).context("invalid monaco options")
    }
}

fn load_options_file(path: &Path) -> Result<Map<String, Value>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn overlay(base: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        base.insert(key, value);
    }
}
