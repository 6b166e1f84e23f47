mod commands;
mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{generate, GenerateArgs};
use slicegen_parser::LoadError;
use tracing_subscriber::EnvFilter;

/// Slicegen CLI - Redux Toolkit slices from an initial state object
#[derive(Parser, Debug)]
#[command(name = "slicegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate types, slice and store modules from an initState file
    Generate(GenerateArgs),
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = std::env::current_dir()
        .context("Cannot get current directory")
        .and_then(|cwd| match cli.command {
            Command::Generate(args) => generate(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), error_message(&err));
        if let Some(report) = source_report(&err) {
            eprintln!();
            eprintln!("{}", report);
        }
        eprintln!();
        std::process::exit(1);
    }
}

/// The context chain on one line, skipping causes already quoted by their parent
fn error_message(err: &anyhow::Error) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if parts.last().is_some_and(|parent| parent.contains(&text)) {
            continue;
        }
        parts.push(text);
    }
    parts.join(": ")
}

/// Source-annotated report when a state module failed to parse
fn source_report(err: &anyhow::Error) -> Option<String> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<LoadError>())
        .filter(|load_error| matches!(load_error, LoadError::Parse { .. }))
        .map(LoadError::report)
}
