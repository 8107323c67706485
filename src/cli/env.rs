use std::path::PathBuf;

use clap::Parser;

use super::commands::Commands;
use super::output::OutputFormat;

/// Inspect and serve docgate permissions and approval rules.
#[derive(Parser)]
#[command(name = "docgate", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Config file; defaults to ./config/docgate.yaml, then the user config dir
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Force debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Render results as human text, JSON or YAML
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Seed file applied after the configured seeds; repeatable
    #[arg(long = "seed", value_name = "FILE", global = true)]
    pub seeds: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
