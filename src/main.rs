// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use emoji_dump::config::Config;
use emoji_dump::error::{ErrorBuilder, ManifestError, OutputError};
use emoji_dump::manifest::Manifest;
use emoji_dump::pipeline::{self, RunSummary};
use emoji_dump::retry_command;

/// Exit codes following sysexits.h conventions
mod exit_codes {
    /// Success - the run completed (possibly with recorded failures)
    pub const SUCCESS: i32 = 0;
    /// General error - unspecified error
    pub const ERROR: i32 = 1;
    /// Usage error - the output directory would swallow the working directory
    pub const USAGE: i32 = 64;
    /// Data error - the manifest is not valid emoji JSON
    pub const DATA_ERR: i32 = 65;
    /// I/O error - manifest or output directory not accessible
    pub const IO_ERR: i32 = 74;
}

use exit_codes::*;

/// Download a custom emoji pack and recreate its aliases as symlinks.
///
/// Examples:
///   emoji-dump emoji.json
///   emoji-dump failures.json --output retry-output
#[derive(Parser)]
#[command(name = "emoji-dump", version, about, long_about = None)]
struct Cli {
    /// Emoji manifest: JSON with an "emoji" object of name -> URL or "alias:<name>"
    manifest: PathBuf,

    /// Output directory (wiped at the start of every run)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Where to write the retry manifest if any download fails
    #[arg(long, value_name = "FILE")]
    failures: Option<PathBuf>,

    /// Don't draw the progress bar or stage headers
    #[arg(long)]
    no_progress: bool,

    /// Quiet mode: only errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode: detailed output for debugging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_current_dir()
        .context("Failed to determine the current directory")?
        .with_progress(!cli.no_progress && !cli.quiet);
    if let Some(output) = &cli.output {
        config = config.with_output_dir(output);
    }
    if let Some(failures) = &cli.failures {
        config = config.with_failures_path(failures);
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    let manifest = Manifest::load(&cli.manifest)?;
    let summary = pipeline::run(&manifest, &config)?;

    print_summary(&summary, &config, cli.quiet);
    Ok(())
}

fn print_summary(summary: &RunSummary, config: &Config, quiet: bool) {
    if !quiet {
        for skipped in &summary.skipped {
            println!("{} {}: {}", "[!]".yellow(), skipped.alias, skipped.reason);
        }
        println!();
        println!(
            "{} Done. {} images and {} aliases saved to {}",
            "[OK]".green(),
            summary.downloaded,
            summary.linked,
            config.output_dir.display()
        );
    }

    if summary.failures.is_empty() {
        return;
    }

    match &summary.failures_path {
        Some(path) => {
            let program = std::env::args()
                .next()
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
            println!();
            println!(
                "{} {} images failed to download. These have been recorded in {}.",
                "[X]".red(),
                summary.failures.len(),
                path.display()
            );
            println!("To retry these, rename the output directory to something else and then run:");
            println!("  {}", retry_command(&program, path).cyan());
        }
        None => {
            println!();
            println!(
                "{} {} images failed to download, and the retry manifest could not be written:",
                "[X]".red(),
                summary.failures.len()
            );
            for (name, url) in summary.failures.iter() {
                println!("  {} {}", name, url);
            }
        }
    }
}

/// Render a fatal error with hints and pick the exit code for it.
fn report_fatal(error: &anyhow::Error, manifest: &Path) -> i32 {
    if let Some(e) = error.downcast_ref::<ManifestError>() {
        let (title, code) = match e {
            ManifestError::Read { .. } => ("Could not read the emoji manifest", IO_ERR),
            ManifestError::Format { .. } => ("The emoji manifest is not valid", DATA_ERR),
        };
        let message = ErrorBuilder::new(title)
            .cause(e.to_string())
            .fix(format!("Check the path: {}", manifest.display()))
            .fix("The file must look like {\"emoji\": {\"name\": \"https://...\"}}")
            .fix("Export it again from Slack's emoji.list API")
            .build();
        eprintln!("{}", message.red());
        return code;
    }

    if let Some(e) = error.downcast_ref::<OutputError>() {
        let builder = ErrorBuilder::new("Could not prepare the output directory").cause(e.to_string());
        let (builder, code) = match e {
            OutputError::Io { .. } => (
                builder.fix("Check permissions on the working directory"),
                IO_ERR,
            ),
            OutputError::ContainsWorkingDir { .. } => (
                builder.fix("The output directory is wiped on every run"),
                USAGE,
            ),
        };
        let message = builder.fix("Pick another location with --output <DIR>").build();
        eprintln!("{}", message.red());
        return code;
    }

    eprintln!("{} {:#}", "[X]".red(), error);
    ERROR
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let code = match run(&cli) {
        Ok(()) => SUCCESS,
        Err(e) => {
            tracing::debug!("Fatal error: {:?}", e);
            report_fatal(&e, &cli.manifest)
        }
    };

    std::process::exit(code);
}
