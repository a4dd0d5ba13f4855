mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, version::VersionSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "slashctl",
    about = "Lint and version a repository of markdown slash commands",
    version,
    propagate_version = true
)]
struct Cli {
    /// Repository root (default: auto-detect from .slashctl.yaml, .command-metadata.json or .git/)
    #[arg(long, global = true, env = "SLASHCTL_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Enable debug logging
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every workflow and tool command
    Validate {
        /// Write the report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Run validation and write tests/validation_report.md (CI entry point)
    Test,

    /// List discovered commands
    List,

    /// Manage per-command semantic versions
    Version {
        #[command(subcommand)]
        subcommand: VersionSubcommand,
    },

    /// Inspect and validate .slashctl.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved repository root");

    let result = match cli.command {
        Commands::Validate { output } => cmd::validate::run(&root, output.as_deref(), cli.json),
        Commands::Test => cmd::validate::run_tests(&root),
        Commands::List => cmd::list::run(&root, cli.json),
        Commands::Version { subcommand } => cmd::version::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
