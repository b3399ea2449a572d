//! woke-ls CLI
//!
//! Serves the woke language server, or checks files once from the shell.

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{Cli, Commands};
use commands::{CheckOptions, run_check, run_lsp};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout carries the LSP stream or the check report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_issues) => {
            if has_issues {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Lsp => run_lsp().map(|_| false),
        Commands::Check {
            files,
            stdin,
            executable,
            format,
            custom_args,
        } => run_check(CheckOptions {
            files,
            stdin,
            executable,
            format,
            custom_args,
        }),
    }
}
