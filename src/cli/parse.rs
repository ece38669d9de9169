//! CLI parse: clap types for Iconforge. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Iconforge CLI - themed icon pack generation
#[derive(Parser)]
#[command(name = "iconforge")]
#[command(about = "Generate themed line-icon packs with a generative model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root (where iconforge.toml is looked up)
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (replaces the project iconforge.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate an icon pack for a theme
    Generate {
        /// Theme, e.g. "Smart Home"
        theme: String,
        /// Number of icons (10, 50 and 100 are the usual sizes)
        #[arg(long, short = 'n', default_value = "10")]
        count: usize,
        /// Write one SVG file per icon into this directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write an Illustrator import script (.jsx) to this file
        #[arg(long)]
        script: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
        /// Only show icons from this group
        #[arg(long)]
        group: Option<String>,
        /// Only show icons whose name or description contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// List suggested themes
    Themes,
    /// Print the resolved configuration as TOML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
