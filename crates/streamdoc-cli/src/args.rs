//! CLI argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "streamdoc.toml";

/// Prompt sent when none is given on the command line
pub const DEFAULT_PROMPT: &str = "给我各类销售额Top5的报表，并用柱状图展示";

#[derive(Parser, Debug)]
#[command(name = "streamdoc")]
#[command(about = "Stream a chat answer and render it as a live document")]
#[command(version)]
pub struct Cli {
    /// Message to send to the chat endpoint
    #[arg(default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Chat endpoint URL (overrides config file and environment)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Wrap width in columns
    #[arg(long)]
    pub width: Option<usize>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Print the raw document (markdown text and slot markers) instead of rendering it
    #[arg(long)]
    pub raw: bool,
}
