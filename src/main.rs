//! pkgcat - Operator package catalog browser
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use pkgcat::cli::{commands, Cli, Commands};
use pkgcat::config::ConfigManager;
use pkgcat::error::PkgcatResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> PkgcatResult<()> {
    let cli = Cli::parse();

    // 0 = warn, 1 = info, 2+ = debug; stderr keeps stdout clean for pipes
    let filter = match cli.verbose {
        0 => EnvFilter::new("pkgcat=warn"),
        1 => EnvFilter::new("pkgcat=info"),
        _ => EnvFilter::new("pkgcat=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let mut config = manager.load()?;
    cli.apply_overrides(&mut config);

    match cli.command {
        Commands::List(args) => commands::list(args, &config),
        Commands::Show(args) => commands::show(args, &config),
        Commands::Dump(args) => commands::dump(args, &config),
        Commands::Cache(args) => commands::cache(args, &config),
        Commands::Config(args) => commands::config(args, &manager, &config),
    }
}
