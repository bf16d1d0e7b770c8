#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use miette::Result;
use monoguard_core::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "monoguard")]
#[command(author, version, about = "Monorepo dependency-graph consistency engine", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory (repository root)
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Make sure every package's declared dependencies match real imports
    Deps {
        /// Exit non-zero instead of making changes
        #[arg(short = 'd', long)]
        dry_run: bool,
    },

    /// Make sure every cli plugin is registered with the hub package
    CliDeps {
        /// Exit non-zero instead of making changes
        #[arg(short = 'd', long)]
        dry_run: bool,
    },

    /// Print every local file a package depends on, directly or transitively
    ComputeDepsForPackage {
        /// Package name to resolve (e.g. "@acme/logger")
        package_name: String,
    },

    /// List discovered internal packages
    Packages,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Commands::Deps { dry_run } => commands::deps::run(&cwd, dry_run, cli.json),
        Commands::CliDeps { dry_run } => commands::cli_deps::run(&cwd, dry_run, cli.json),
        Commands::ComputeDepsForPackage { package_name } => {
            commands::compute::run(&cwd, &package_name, cli.json)
        }
        Commands::Packages => commands::packages::run(&cwd, cli.json),
    }
}
