use crate::output::print_json;
use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use slashctl_core::config::Config;
use slashctl_core::types::ChangeType;
use slashctl_core::version::{InitOptions, InitOutcome, Registry, ReleaseNotes};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum VersionSubcommand {
    /// Start tracking a command at version 1.0.0
    Init {
        /// Path to the command's markdown file
        command: PathBuf,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, num_args = 1..)]
        tags: Vec<String>,
        #[arg(long, num_args = 1..)]
        dependencies: Vec<String>,
    },

    /// Start tracking every workflow and tool that is not tracked yet
    InitAll,

    /// Bump a command's version and record what changed
    Update {
        /// Command name
        command: String,
        #[arg(value_enum)]
        change: Bump,
        /// What changed in this release
        #[arg(long, num_args = 1.., required = true)]
        changes: Vec<String>,
        /// Breaking changes
        #[arg(long, num_args = 1..)]
        breaking: Vec<String>,
        /// Deprecated features
        #[arg(long, num_args = 1..)]
        deprecated: Vec<String>,
    },

    /// Print the version report for all tracked commands
    Report,

    /// Show a command's version history
    Show {
        /// Command name
        command: String,
    },

    /// Exit non-zero unless the command's version is at least REQUIRED
    Check {
        /// Command name
        command: String,
        /// Minimum version (MAJOR.MINOR.PATCH)
        required: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

impl From<Bump> for ChangeType {
    fn from(b: Bump) -> Self {
        match b {
            Bump::Major => ChangeType::Major,
            Bump::Minor => ChangeType::Minor,
            Bump::Patch => ChangeType::Patch,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: VersionSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let mut registry = Registry::load(root).context("failed to load command metadata")?;

    match subcmd {
        VersionSubcommand::Init {
            command,
            description,
            tags,
            dependencies,
        } => {
            let opts = InitOptions {
                description: description.unwrap_or_default(),
                tags,
                dependencies,
            };
            init(root, &config, &mut registry, &command, opts, json)
        }
        VersionSubcommand::InitAll => init_all(root, &config, &mut registry, json),
        VersionSubcommand::Update {
            command,
            change,
            changes,
            breaking,
            deprecated,
        } => {
            let notes = ReleaseNotes {
                changes,
                breaking,
                deprecated,
            };
            update(root, &config, &mut registry, &command, change.into(), notes, json)
        }
        VersionSubcommand::Report => report(&registry, json),
        VersionSubcommand::Show { command } => show(&registry, &command, json),
        VersionSubcommand::Check { command, required } => {
            check(&registry, &command, &required, json)
        }
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

fn init(
    root: &Path,
    config: &Config,
    registry: &mut Registry,
    command: &Path,
    opts: InitOptions,
    json: bool,
) -> anyhow::Result<()> {
    // relative paths are taken from the repository root, not the cwd
    let path = if command.is_absolute() || command.exists() {
        command.to_path_buf()
    } else {
        root.join(command)
    };
    let outcome = registry
        .initialize(root, config, &path, opts, chrono::Utc::now())
        .with_context(|| format!("failed to initialize {}", path.display()))?;

    let (name, initialized) = match &outcome {
        InitOutcome::Initialized { name } => (name, true),
        InitOutcome::AlreadyInitialized { name } => (name, false),
    };
    if json {
        return print_json(&serde_json::json!({
            "name": name,
            "initialized": initialized,
        }));
    }
    if initialized {
        println!("Initialized {name} at version 1.0.0");
    } else {
        println!("Command {name} already initialized");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// init-all
// ---------------------------------------------------------------------------

fn init_all(
    root: &Path,
    config: &Config,
    registry: &mut Registry,
    json: bool,
) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    let added = registry
        .initialize_all(root, config, now)
        .context("failed to initialize commands")?;

    if json {
        return print_json(&serde_json::json!({ "initialized": added }));
    }
    for name in &added {
        println!("Initialized {name}");
    }
    if added.is_empty() {
        println!("All commands are already tracked.");
    }
    println!();
    println!("{}", "=".repeat(50));
    println!("{}", registry.render_report(now));
    Ok(())
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

fn update(
    root: &Path,
    config: &Config,
    registry: &mut Registry,
    command: &str,
    change: ChangeType,
    notes: ReleaseNotes,
    json: bool,
) -> anyhow::Result<()> {
    let bump = registry
        .update(root, config, command, change, notes, chrono::Utc::now())
        .with_context(|| format!("failed to update {command}"))?;

    if json {
        return print_json(&bump);
    }
    println!("Updated {} from {} to {}", bump.name, bump.from, bump.to);
    if !bump.stamped {
        println!("(no command file found for '{}'; frontmatter not updated)", bump.name);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// report / show
// ---------------------------------------------------------------------------

fn report(registry: &Registry, json: bool) -> anyhow::Result<()> {
    if json {
        let all: Vec<_> = registry.iter().collect();
        return print_json(&all);
    }
    println!("{}", registry.render_report(chrono::Utc::now()));
    Ok(())
}

fn show(registry: &Registry, command: &str, json: bool) -> anyhow::Result<()> {
    let meta = registry
        .get(command)
        .ok_or_else(|| anyhow::anyhow!("command '{command}' is not tracked"))?;

    if json {
        return print_json(meta);
    }

    println!("{} ({}) v{}", meta.name, meta.kind, meta.current_version);
    if !meta.description.is_empty() {
        println!("  {}", meta.description);
    }
    if !meta.tags.is_empty() {
        println!("  tags: {}", meta.tags.join(", "));
    }
    if !meta.dependencies.is_empty() {
        println!("  depends on: {}", meta.dependencies.join(", "));
    }
    println!();
    for release in meta.version_history.iter().rev() {
        let date = release.released.get(..10).unwrap_or(&release.released);
        println!("  {:<10} {}", release.version, date);
        for c in &release.breaking_changes {
            println!("    ! {c}");
        }
        for c in &release.changes {
            println!("    - {c}");
        }
        for c in &release.deprecated_features {
            println!("    ~ {c}");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn check(registry: &Registry, command: &str, required: &str, json: bool) -> anyhow::Result<()> {
    let compatible = registry
        .is_compatible(command, required)
        .with_context(|| format!("failed to check {command}"))?;
    let current = registry.get(command).map(|m| m.current_version.as_str());

    if json {
        print_json(&serde_json::json!({
            "name": command,
            "required": required,
            "current": current,
            "compatible": compatible,
        }))?;
    } else {
        match current {
            Some(v) => println!("{command} v{v} (requires >= {required})"),
            None => println!("{command} is not tracked (requires >= {required})"),
        }
    }

    if !compatible {
        anyhow::bail!("{command} does not satisfy >= {required}");
    }
    Ok(())
}
