//! CLI definitions.

pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use algotrade_config::{load_config, AppConfig};

#[derive(Parser)]
#[command(name = "algotrade")]
#[command(author, version, about = "Indicator strategy signals and budget simulation")]
pub struct Cli {
    /// Configuration file path; defaults apply when it does not exist
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a strategy over historical bars and simulate its trades
    Backtest(BacktestArgs),
    /// List available strategies
    Strategies,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Strategy to run; defaults to `strategy.name` from the configuration
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Data file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Symbol label; defaults to the data file name
    #[arg(short = 'S', long)]
    pub symbol: Option<String>,

    /// Initial budget; defaults to `backtest.initial_budget`
    #[arg(short, long)]
    pub budget: Option<f64>,

    /// Strategy parameter override (key=value, value parsed as JSON when possible)
    #[arg(short, long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Strategy configuration file (JSON object)
    #[arg(long)]
    pub strategy_config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the report (JSON) or the trade list (`.csv`) to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

/// Load the application configuration; a missing file falls back to
/// defaults layered with environment overrides.
pub fn app_config(path: &Path) -> Result<AppConfig> {
    let file = path.exists().then_some(path);
    load_config(file).with_context(|| format!("Failed to load configuration {}", path.display()))
}
