use crate::error::{Result, SlashError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const WORKFLOWS_DIR: &str = "workflows";
pub const TOOLS_DIR: &str = "tools";

pub const CONFIG_FILE: &str = ".slashctl.yaml";
pub const METADATA_FILE: &str = ".command-metadata.json";
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";
pub const REPORT_FILE: &str = "tests/validation_report.md";

pub const COMMAND_EXT: &str = "md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(METADATA_FILE)
}

pub fn changelog_path(root: &Path) -> PathBuf {
    root.join(CHANGELOG_FILE)
}

pub fn report_path(root: &Path) -> PathBuf {
    root.join(REPORT_FILE)
}

pub fn command_path(root: &Path, dir: &str, name: &str) -> PathBuf {
    root.join(dir).join(format!("{name}.{COMMAND_EXT}"))
}

// ---------------------------------------------------------------------------
// Command name validation
// ---------------------------------------------------------------------------

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").unwrap())
}

pub fn is_command_name(name: &str) -> bool {
    name_re().is_match(name)
}

pub fn validate_command_name(name: &str) -> Result<()> {
    if !is_command_name(name) {
        return Err(SlashError::InvalidCommandName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
