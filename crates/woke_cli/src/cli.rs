//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// woke-ls - woke inclusive-language linter for editors
#[derive(Parser)]
#[command(name = "woke-ls")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the LSP server on stdio
    Lsp,

    /// Lint files once and print the diagnostics
    Check {
        /// Files to lint
        #[arg(required_unless_present = "stdin")]
        files: Vec<PathBuf>,

        /// Lint text read from standard input
        #[arg(long)]
        stdin: bool,

        /// Path or name of the woke executable
        #[arg(short, long, value_name = "PATH")]
        executable: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Extra arguments passed to woke
        #[arg(last = true)]
        custom_args: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
